// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # cdrcodec
//!
//! OMG Common Data Representation (CDR) wire codec for DDS-RTPS and
//! ROS 2 payloads, covering the Extended CDR version 1 (XCDR1) and
//! version 2 (XCDR2) variants plus the parameter-list and delimited
//! encodings used by DDS-XTypes.
//!
//! The library is a pure codec: the caller drives the field order and
//! the codec handles alignment, endianness, buffer growth, and the
//! member-header formats.
//!
//! ## Architecture
//!
//! - [`encapsulation`] - The catalog of the ten encapsulation kinds and
//!   the reserved wire constants
//! - [`length_code`] - The XCDR2 EMHEADER length-code catalog
//! - [`writer`] - [`CdrWriter`], producing a contiguous encoded stream
//!   over a growable owned buffer
//! - [`reader`] - [`CdrReader`], the symmetric inverse over a borrowed
//!   buffer
//!
//! ## Example: Encoding
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cdrcodec::{CdrWriter, EncapsulationKind};
//!
//! let mut writer = CdrWriter::with_kind(EncapsulationKind::Cdr2Le);
//! writer.uint32(42)?;
//! writer.string("base_link", true)?;
//! writer.float64_array(&[1.0, 2.0, 3.0], true)?;
//! let data = writer.finish();
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Decoding
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut writer = cdrcodec::CdrWriter::with_kind(cdrcodec::EncapsulationKind::Cdr2Le);
//! # writer.uint32(42)?;
//! # writer.string("base_link", true)?;
//! # writer.float64_array(&[1.0, 2.0, 3.0], true)?;
//! # let data = writer.finish();
//! use cdrcodec::CdrReader;
//!
//! let mut reader = CdrReader::new(&data)?;
//! let id = reader.read_u32()?;
//! let frame = reader.read_string()?;
//! let count = reader.sequence_length()?;
//! let samples = reader.read_f64_array(count as usize)?;
//! # assert_eq!(id, 42);
//! # assert_eq!(frame, "base_link");
//! # assert_eq!(samples, vec![1.0, 2.0, 3.0]);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use crate::core::{CdrError, Result};

// Encapsulation catalog and wire constants
pub mod encapsulation;

pub use encapsulation::{
    EncapsulationKind, EMHEADER_ID_MASK, EMHEADER_LENGTH_CODE_SHIFT, EMHEADER_MUST_UNDERSTAND,
    ENCAPSULATION_HEADER_SIZE, EXTENDED_PID, MUST_UNDERSTAND_FLAG, SENTINEL_PID,
};

// XCDR2 length-code catalog
pub mod length_code;

pub use length_code::LengthCode;

// Writer and reader (peers)
pub mod reader;
pub mod writer;

pub use reader::{CdrReader, MemberHeader};
pub use writer::{CdrWriter, BUFFER_COPY_THRESHOLD, DEFAULT_CAPACITY};
