// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! XCDR2 length-code catalog.
//!
//! Bits 28-30 of an XCDR2 EMHEADER carry a 3-bit length code that
//! determines how the member's byte size is derived. Codes 0-3 encode
//! fixed sizes in the header itself; codes 4-7 are followed by a NEXTINT
//! word, which for codes 5-7 is also the first four bytes of the member
//! body ("reused").

use crate::core::{CdrError, Result};

/// XCDR2 EMHEADER length code (LC 0-7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LengthCode {
    /// LC 0: the member is exactly 1 byte
    Size1 = 0,
    /// LC 1: the member is exactly 2 bytes
    Size2 = 1,
    /// LC 2: the member is exactly 4 bytes
    Size4 = 2,
    /// LC 3: the member is exactly 8 bytes
    Size8 = 3,
    /// LC 4: NEXTINT holds the member byte length
    Length = 4,
    /// LC 5: NEXTINT holds the member byte length and is reused as the
    /// first four bytes of the member body
    LengthReused = 5,
    /// LC 6: NEXTINT holds the member length in 4-byte units, reused
    Length4Reused = 6,
    /// LC 7: NEXTINT holds the member length in 8-byte units, reused
    Length8Reused = 7,
}

impl LengthCode {
    /// Parse a 3-bit length code.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Size1),
            1 => Ok(Self::Size2),
            2 => Ok(Self::Size4),
            3 => Ok(Self::Size8),
            4 => Ok(Self::Length),
            5 => Ok(Self::LengthReused),
            6 => Ok(Self::Length4Reused),
            7 => Ok(Self::Length8Reused),
            other => Err(CdrError::bad_length_code(
                other,
                "length code out of range 0-7",
            )),
        }
    }

    /// Pick the smallest length code for an object size.
    ///
    /// Only codes 0-4 are selected; the reused codes 5-7 are opt-in
    /// optimizations the caller must request explicitly.
    #[must_use]
    pub const fn for_object_size(object_size: usize) -> Self {
        match object_size {
            1 => Self::Size1,
            2 => Self::Size2,
            4 => Self::Size4,
            8 => Self::Size8,
            _ => Self::Length,
        }
    }

    /// Get the fixed object size for codes 0-3, `None` for codes 4-7.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Size1 => Some(1),
            Self::Size2 => Some(2),
            Self::Size4 => Some(4),
            Self::Size8 => Some(8),
            _ => None,
        }
    }

    /// Check if the NEXTINT word doubles as the first four bytes of the
    /// member body (LC 5-7).
    #[must_use]
    pub const fn is_reused(self) -> bool {
        matches!(
            self,
            Self::LengthReused | Self::Length4Reused | Self::Length8Reused
        )
    }

    /// Compute the NEXTINT word to emit after an EMHEADER with this code.
    ///
    /// Returns `None` for codes 0-3 (after validating the object size
    /// against the fixed size), the scaled length for codes 4-7. Sizes
    /// inconsistent with the code are rejected.
    pub fn nextint_for_object_size(self, object_size: usize) -> Result<Option<u32>> {
        if let Some(expected) = self.fixed_size() {
            if object_size != expected {
                return Err(CdrError::bad_length_code(
                    self as u8,
                    format!("object size {object_size} is not exactly {expected}"),
                ));
            }
            return Ok(None);
        }
        let nextint = match self {
            Self::Length4Reused => {
                if object_size % 4 != 0 {
                    return Err(CdrError::bad_length_code(
                        self as u8,
                        format!("object size {object_size} is not a multiple of 4"),
                    ));
                }
                (object_size >> 2) as u32
            }
            Self::Length8Reused => {
                if object_size % 8 != 0 {
                    return Err(CdrError::bad_length_code(
                        self as u8,
                        format!("object size {object_size} is not a multiple of 8"),
                    ));
                }
                (object_size >> 3) as u32
            }
            _ => object_size as u32,
        };
        Ok(Some(nextint))
    }
}
