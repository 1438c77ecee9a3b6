// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR encapsulation catalog.
//!
//! Every CDR stream begins with a four-byte encapsulation header
//! `{0x00, kind, options_hi, options_lo}`. The kind byte selects the
//! byte order, the XCDR version, and the member-header mode of the body.
//! Kind values follow RTPS v2.3 Section 10.5, Table 10.3.

use crate::core::{CdrError, Result};

/// Size of the CDR encapsulation header (4 bytes).
pub const ENCAPSULATION_HEADER_SIZE: usize = 4;

/// PID terminating an XCDR1 parameter list.
pub const SENTINEL_PID: u16 = 0x3F02;

/// PID introducing the 12-byte long-form XCDR1 member header.
pub const EXTENDED_PID: u16 = 0x3F01;

/// Must-understand flag in an XCDR1 short PID (bit 14).
pub const MUST_UNDERSTAND_FLAG: u16 = 0x4000;

/// Must-understand flag in an XCDR2 EMHEADER (bit 31).
pub const EMHEADER_MUST_UNDERSTAND: u32 = 0x8000_0000;

/// Bit position of the length code in an XCDR2 EMHEADER (bits 28-30).
pub const EMHEADER_LENGTH_CODE_SHIFT: u32 = 28;

/// Member id field in an XCDR2 EMHEADER (bits 0-27).
pub const EMHEADER_ID_MASK: u32 = 0x0FFF_FFFF;

/// CDR encapsulation kind.
///
/// Defines the byte order, XCDR version, and member-header mode of the
/// stream body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum EncapsulationKind {
    /// Plain CDR, big-endian (XCDR1)
    CdrBe = 0x00,
    /// Plain CDR, little-endian (XCDR1)
    #[default]
    CdrLe = 0x01,
    /// Parameter-list CDR, big-endian (XCDR1)
    PlCdrBe = 0x02,
    /// Parameter-list CDR, little-endian (XCDR1)
    PlCdrLe = 0x03,
    /// Plain CDR2, big-endian (XCDR2)
    Cdr2Be = 0x10,
    /// Plain CDR2, little-endian (XCDR2)
    Cdr2Le = 0x11,
    /// Parameter-list CDR2, big-endian (XCDR2)
    PlCdr2Be = 0x12,
    /// Parameter-list CDR2, little-endian (XCDR2)
    PlCdr2Le = 0x13,
    /// Delimited CDR2, big-endian (XCDR2)
    DelimitedCdr2Be = 0x14,
    /// Delimited CDR2, little-endian (XCDR2)
    DelimitedCdr2Le = 0x15,
}

impl EncapsulationKind {
    /// Parse a kind byte from an encapsulation header.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Self::CdrBe),
            0x01 => Ok(Self::CdrLe),
            0x02 => Ok(Self::PlCdrBe),
            0x03 => Ok(Self::PlCdrLe),
            0x10 => Ok(Self::Cdr2Be),
            0x11 => Ok(Self::Cdr2Le),
            0x12 => Ok(Self::PlCdr2Be),
            0x13 => Ok(Self::PlCdr2Le),
            0x14 => Ok(Self::DelimitedCdr2Be),
            0x15 => Ok(Self::DelimitedCdr2Le),
            other => Err(CdrError::invalid_encapsulation(other)),
        }
    }

    /// Check if this encapsulation uses XCDR2 encoding rules.
    #[must_use]
    pub const fn is_cdr2(self) -> bool {
        matches!(
            self,
            Self::Cdr2Be
                | Self::Cdr2Le
                | Self::PlCdr2Be
                | Self::PlCdr2Le
                | Self::DelimitedCdr2Be
                | Self::DelimitedCdr2Le
        )
    }

    /// Check if this encapsulation uses little endian byte order.
    #[must_use]
    pub const fn is_little_endian(self) -> bool {
        matches!(
            self,
            Self::CdrLe | Self::PlCdrLe | Self::Cdr2Le | Self::PlCdr2Le | Self::DelimitedCdr2Le
        )
    }

    /// Check if the body is a parameter list (PID or EMHEADER members).
    #[must_use]
    pub const fn is_parameter_list(self) -> bool {
        matches!(
            self,
            Self::PlCdrBe | Self::PlCdrLe | Self::PlCdr2Be | Self::PlCdr2Le
        )
    }

    /// Check if the body is a delimited aggregate (DHEADER-prefixed).
    #[must_use]
    pub const fn is_delimited(self) -> bool {
        matches!(self, Self::DelimitedCdr2Be | Self::DelimitedCdr2Le)
    }

    /// Get the alignment of 64-bit values for this encapsulation.
    /// XCDR1 aligns them to 8 bytes, XCDR2 to 4.
    #[must_use]
    pub const fn eight_byte_alignment(self) -> usize {
        if self.is_cdr2() {
            4
        } else {
            8
        }
    }
}
