// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error types for CDR encoding and decoding.
//!
//! Every failure mode of the codec maps to one variant:
//! - Reads past the end of the input buffer
//! - Malformed encapsulation headers and strings
//! - Member headers that cannot be represented on the wire

use std::fmt;

/// Errors that can occur while encoding or decoding a CDR stream.
#[derive(Debug, Clone)]
pub enum CdrError {
    /// A read or padding skip would exceed the input buffer
    BufferTooSmall {
        /// Requested bytes (including any alignment padding)
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when the error occurred
        cursor_pos: u64,
    },

    /// Unknown encapsulation kind byte at position 1
    InvalidEncapsulation {
        /// The unrecognized kind byte
        kind: u8,
    },

    /// A string was missing its null terminator or held invalid UTF-8
    InvalidString {
        /// What was wrong with the string
        reason: String,
        /// Cursor position when the error occurred
        cursor_pos: u64,
    },

    /// An XCDR2 member id exceeds the 28-bit EMHEADER id field
    IdTooLarge {
        /// The offending member id
        id: u32,
    },

    /// A length code outside 0-7, or an object size inconsistent with the code
    BadLengthCode {
        /// The length code
        code: u8,
        /// Why the code was rejected
        reason: String,
    },

    /// A sentinel or delimiter did not match the bytes on the wire
    IntegrityViolation {
        /// Description of the mismatch
        detail: String,
    },
}

impl CdrError {
    /// Create a buffer too small error.
    pub fn buffer_too_small(requested: usize, available: usize, cursor_pos: u64) -> Self {
        CdrError::BufferTooSmall {
            requested,
            available,
            cursor_pos,
        }
    }

    /// Create an invalid encapsulation error.
    pub fn invalid_encapsulation(kind: u8) -> Self {
        CdrError::InvalidEncapsulation { kind }
    }

    /// Create an invalid string error.
    pub fn invalid_string(reason: impl Into<String>, cursor_pos: u64) -> Self {
        CdrError::InvalidString {
            reason: reason.into(),
            cursor_pos,
        }
    }

    /// Create an id too large error.
    pub fn id_too_large(id: u32) -> Self {
        CdrError::IdTooLarge { id }
    }

    /// Create a bad length code error.
    pub fn bad_length_code(code: u8, reason: impl Into<String>) -> Self {
        CdrError::BadLengthCode {
            code,
            reason: reason.into(),
        }
    }

    /// Create an integrity violation error.
    pub fn integrity(detail: impl Into<String>) -> Self {
        CdrError::IntegrityViolation {
            detail: detail.into(),
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CdrError::BufferTooSmall {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            CdrError::InvalidEncapsulation { kind } => {
                vec![("kind", format!("0x{kind:02X}"))]
            }
            CdrError::InvalidString { reason, cursor_pos } => vec![
                ("reason", reason.clone()),
                ("cursor", cursor_pos.to_string()),
            ],
            CdrError::IdTooLarge { id } => vec![("id", format!("0x{id:08X}"))],
            CdrError::BadLengthCode { code, reason } => {
                vec![("code", code.to_string()), ("reason", reason.clone())]
            }
            CdrError::IntegrityViolation { detail } => vec![("detail", detail.clone())],
        }
    }
}

impl fmt::Display for CdrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdrError::BufferTooSmall {
                requested,
                available,
                cursor_pos,
            } => write!(
                f,
                "Buffer too small: requested {requested} bytes at position {cursor_pos}, but only {available} bytes available"
            ),
            CdrError::InvalidEncapsulation { kind } => {
                write!(f, "Invalid encapsulation kind: 0x{kind:02X}")
            }
            CdrError::InvalidString { reason, cursor_pos } => {
                write!(f, "Invalid string at position {cursor_pos}: {reason}")
            }
            CdrError::IdTooLarge { id } => write!(
                f,
                "Member id 0x{id:08X} exceeds the 28-bit EMHEADER id field"
            ),
            CdrError::BadLengthCode { code, reason } => {
                write!(f, "Bad length code {code}: {reason}")
            }
            CdrError::IntegrityViolation { detail } => {
                write!(f, "Integrity violation: {detail}")
            }
        }
    }
}

impl std::error::Error for CdrError {}

/// Result type for cdrcodec operations.
pub type Result<T> = std::result::Result<T, CdrError>;
