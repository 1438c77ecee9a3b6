// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout cdrcodec.
//!
//! This module provides the foundational types for the library:
//! - [`CdrError`] - Structured codec errors
//! - [`Result`] - Crate-wide result alias

pub mod error;

pub use error::{CdrError, Result};
