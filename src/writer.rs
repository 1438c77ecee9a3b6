// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR writer producing a contiguous encoded byte sequence.
//!
//! The writer owns a growable buffer, starts it with the four-byte
//! encapsulation header, and appends typed values with proper alignment.
//! Alignment is calculated as `(offset - origin) % size`; the origin is
//! re-set after every XCDR1 parameter-list member header so the member
//! body aligns as if it started a fresh stream.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tracing::trace;

use crate::core::{CdrError, Result};
use crate::encapsulation::{
    EncapsulationKind, EMHEADER_ID_MASK, EMHEADER_LENGTH_CODE_SHIFT, EMHEADER_MUST_UNDERSTAND,
    ENCAPSULATION_HEADER_SIZE, EXTENDED_PID, MUST_UNDERSTAND_FLAG, SENTINEL_PID,
};
use crate::length_code::LengthCode;

/// Default initial capacity for the write buffer.
pub const DEFAULT_CAPACITY: usize = 16;

/// Minimum element count for the bulk-copy array fast path.
///
/// Below this, per-element writes are cheaper than the alignment and
/// slice bookkeeping of a bulk copy. Any value >= 1 is correct.
pub const BUFFER_COPY_THRESHOLD: usize = 10;

/// Check whether a primitive array qualifies for the bulk-copy fast path:
/// the stream byte order must match the host's and the element count must
/// amortize the setup cost.
pub(crate) fn bulk_copy_eligible(stream_little_endian: bool, count: usize) -> bool {
    count >= BUFFER_COPY_THRESHOLD && stream_little_endian == cfg!(target_endian = "little")
}

macro_rules! impl_array_write {
    ($name:ident, $elem:ty, $width:expr, $scalar:ident, $bulk:ident) => {
        #[doc = concat!(
            "Write a `", stringify!($elem),
            "` array, optionally preceded by its length, bulk-copying when the fast path applies."
        )]
        pub fn $name(&mut self, values: &[$elem], write_length: bool) -> Result<&mut Self> {
            if write_length {
                self.sequence_length(values.len())?;
            }
            if bulk_copy_eligible(self.little_endian, values.len()) {
                let alignment = if $width == 8 {
                    self.eight_byte_alignment
                } else {
                    $width
                };
                let byte_len = values.len() * $width;
                self.align(alignment, byte_len);
                let end = self.offset + byte_len;
                if self.little_endian {
                    LittleEndian::$bulk(values, &mut self.buffer[self.offset..end]);
                } else {
                    BigEndian::$bulk(values, &mut self.buffer[self.offset..end]);
                }
                self.offset = end;
            } else {
                for &v in values {
                    self.$scalar(v)?;
                }
            }
            Ok(self)
        }
    };
}

/// CDR writer for producing CDR-encoded data.
///
/// Handles all four encapsulation families (plain/parameter-list, XCDR1
/// and XCDR2 plus delimited XCDR2), including:
/// - Alignment relative to the current origin
/// - Endianness of the stream plus forced big-endian transport fields
/// - XCDR1 vs XCDR2 64-bit alignment and member-header layouts
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use cdrcodec::CdrWriter;
///
/// let mut writer = CdrWriter::new();
/// writer.int32(42)?;
/// writer.string("hello", true)?;
/// let data = writer.finish();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CdrWriter {
    /// Output buffer
    buffer: Vec<u8>,
    /// Current write position
    offset: usize,
    /// Origin offset for alignment calculation
    origin: usize,
    /// Encapsulation kind
    kind: EncapsulationKind,
    /// Whether to use little endian encoding
    little_endian: bool,
    /// Alignment of 64-bit values (8 for XCDR1, 4 for XCDR2)
    eight_byte_alignment: usize,
}

impl Default for CdrWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CdrWriter {
    /// Create a new writer with default settings (CDR_LE, default capacity).
    #[must_use]
    pub fn new() -> Self {
        Self::with_kind_and_capacity(EncapsulationKind::default(), DEFAULT_CAPACITY)
    }

    /// Create a new writer with the specified encapsulation kind.
    #[must_use]
    pub fn with_kind(kind: EncapsulationKind) -> Self {
        Self::with_kind_and_capacity(kind, DEFAULT_CAPACITY)
    }

    /// Create a new writer with the specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_kind_and_capacity(EncapsulationKind::default(), capacity)
    }

    /// Create a new writer with the specified kind and initial capacity.
    #[must_use]
    pub fn with_kind_and_capacity(kind: EncapsulationKind, capacity: usize) -> Self {
        let buffer = Vec::with_capacity(capacity.max(ENCAPSULATION_HEADER_SIZE));
        Self::init(buffer, kind)
    }

    /// Create a new writer reusing a pre-owned buffer's allocation.
    #[must_use]
    pub fn with_buffer(buffer: Vec<u8>) -> Self {
        Self::with_kind_and_buffer(EncapsulationKind::default(), buffer)
    }

    /// Create a new writer with the specified kind, reusing a pre-owned
    /// buffer's allocation. Any existing content is discarded.
    #[must_use]
    pub fn with_kind_and_buffer(kind: EncapsulationKind, mut buffer: Vec<u8>) -> Self {
        buffer.clear();
        Self::init(buffer, kind)
    }

    fn init(mut buffer: Vec<u8>, kind: EncapsulationKind) -> Self {
        // Encapsulation header: {0x00, kind, options_hi, options_lo}
        buffer.push(0);
        buffer.push(kind as u8);
        buffer.push(0);
        buffer.push(0);

        Self {
            buffer,
            offset: ENCAPSULATION_HEADER_SIZE,
            origin: ENCAPSULATION_HEADER_SIZE,
            kind,
            little_endian: kind.is_little_endian(),
            eight_byte_alignment: kind.eight_byte_alignment(),
        }
    }

    /// Get the encapsulation kind.
    #[must_use]
    pub const fn kind(&self) -> EncapsulationKind {
        self.kind
    }

    /// Get the current size of the encoded data.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.offset
    }

    /// Get a reference to the encoded data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.buffer[..self.offset]
    }

    /// Consume the writer and return the encoded data.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.buffer.truncate(self.offset);
        self.buffer
    }

    /// Reset the writer to start a new message.
    ///
    /// Keeps the allocated buffer but rewinds to a fresh header.
    pub fn reset(&mut self) {
        self.offset = ENCAPSULATION_HEADER_SIZE;
        self.origin = ENCAPSULATION_HEADER_SIZE;
    }

    /// Reset the alignment origin to the current offset.
    ///
    /// Subsequent fields align as if the stream started here. XCDR1
    /// member headers do this implicitly; hosts encoding nested
    /// aggregates by hand may need it explicitly.
    pub fn reset_origin(&mut self) {
        self.origin = self.offset;
    }

    /// Ensure there's enough buffer for additional bytes, growing by
    /// doubling when short. Growth preserves all previously written
    /// offsets but changes the buffer identity.
    fn reserve(&mut self, additional: usize) {
        let needed = self.offset + additional;
        if needed > self.buffer.len() {
            let new_len = needed.max(self.buffer.len() * 2);
            trace!(
                old_len = self.buffer.len(),
                new_len,
                "growing write buffer"
            );
            self.buffer.resize(new_len, 0);
        }
    }

    /// Align to the specified boundary relative to the origin, writing
    /// zero padding bytes.
    ///
    /// # Arguments
    ///
    /// * `size` - The alignment boundary (e.g., 4 for 4-byte alignment)
    /// * `bytes_to_write` - How many bytes will be written after alignment
    fn align(&mut self, size: usize, bytes_to_write: usize) {
        let alignment = (self.offset - self.origin) % size;
        if alignment > 0 {
            let padding = size - alignment;
            self.reserve(padding + bytes_to_write);
            for _ in 0..padding {
                self.buffer[self.offset] = 0;
                self.offset += 1;
            }
        } else {
            self.reserve(bytes_to_write);
        }
    }

    /// Write bytes to the buffer. The caller must have reserved space.
    fn write_bytes_at_offset(&mut self, bytes: &[u8]) {
        self.buffer[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
    }

    /// Write an 8-bit signed integer.
    pub fn int8(&mut self, value: i8) -> Result<&mut Self> {
        self.uint8(value as u8)
    }

    /// Write an 8-bit unsigned integer.
    pub fn uint8(&mut self, value: u8) -> Result<&mut Self> {
        self.reserve(1);
        self.buffer[self.offset] = value;
        self.offset += 1;
        Ok(self)
    }

    /// Write a 16-bit signed integer.
    pub fn int16(&mut self, value: i16) -> Result<&mut Self> {
        self.align(2, 2);
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes_at_offset(&bytes);
        Ok(self)
    }

    /// Write a 16-bit unsigned integer.
    pub fn uint16(&mut self, value: u16) -> Result<&mut Self> {
        self.align(2, 2);
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes_at_offset(&bytes);
        Ok(self)
    }

    /// Write a 32-bit signed integer.
    pub fn int32(&mut self, value: i32) -> Result<&mut Self> {
        self.align(4, 4);
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes_at_offset(&bytes);
        Ok(self)
    }

    /// Write a 32-bit unsigned integer.
    pub fn uint32(&mut self, value: u32) -> Result<&mut Self> {
        self.align(4, 4);
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes_at_offset(&bytes);
        Ok(self)
    }

    /// Write a 64-bit signed integer.
    pub fn int64(&mut self, value: i64) -> Result<&mut Self> {
        self.align(self.eight_byte_alignment, 8);
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes_at_offset(&bytes);
        Ok(self)
    }

    /// Write a 64-bit unsigned integer.
    pub fn uint64(&mut self, value: u64) -> Result<&mut Self> {
        self.align(self.eight_byte_alignment, 8);
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes_at_offset(&bytes);
        Ok(self)
    }

    /// Write a 32-bit float.
    pub fn float32(&mut self, value: f32) -> Result<&mut Self> {
        self.align(4, 4);
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes_at_offset(&bytes);
        Ok(self)
    }

    /// Write a 64-bit double.
    pub fn float64(&mut self, value: f64) -> Result<&mut Self> {
        self.align(self.eight_byte_alignment, 8);
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes_at_offset(&bytes);
        Ok(self)
    }

    /// Write a 16-bit unsigned integer in big-endian byte order,
    /// regardless of the stream's endianness. Used for transport-layer
    /// fields that are always network order.
    pub fn uint16_be(&mut self, value: u16) -> Result<&mut Self> {
        self.align(2, 2);
        self.write_bytes_at_offset(&value.to_be_bytes());
        Ok(self)
    }

    /// Write a 32-bit unsigned integer in big-endian byte order.
    pub fn uint32_be(&mut self, value: u32) -> Result<&mut Self> {
        self.align(4, 4);
        self.write_bytes_at_offset(&value.to_be_bytes());
        Ok(self)
    }

    /// Write a 64-bit unsigned integer in big-endian byte order.
    pub fn uint64_be(&mut self, value: u64) -> Result<&mut Self> {
        self.align(self.eight_byte_alignment, 8);
        self.write_bytes_at_offset(&value.to_be_bytes());
        Ok(self)
    }

    /// Write a string as a counted, null-terminated UTF-8 byte sequence.
    ///
    /// When `write_length` is set, a 4-byte aligned uint32 equal to the
    /// UTF-8 byte length plus one (the terminator is counted) precedes
    /// the bytes.
    pub fn string(&mut self, value: &str, write_length: bool) -> Result<&mut Self> {
        let bytes = value.as_bytes();
        if write_length {
            self.uint32((bytes.len() + 1) as u32)?;
        }
        self.reserve(bytes.len() + 1);
        self.buffer[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.buffer[self.offset + bytes.len()] = 0;
        self.offset += bytes.len() + 1;
        Ok(self)
    }

    /// Write a sequence length (the count prefix of ordinary sequences).
    pub fn sequence_length(&mut self, value: usize) -> Result<&mut Self> {
        self.uint32(value as u32)
    }

    /// Write a DHEADER: the uint32 byte length preceding a delimited
    /// aggregate so a reader may skip it.
    pub fn d_header(&mut self, object_size: usize) -> Result<&mut Self> {
        self.uint32(object_size as u32)
    }

    /// Write an EMHEADER for a parameter-list member.
    ///
    /// Dispatches on the encapsulation version:
    /// - XCDR1 writes a short PID, or the 12-byte Extended PID form when
    ///   the id exceeds 0x3F00 or the size exceeds 0xFFFF, then re-sets
    ///   the alignment origin so the member body aligns to its own start.
    /// - XCDR2 writes the packed 32-bit EMHEADER; the length code is the
    ///   smallest of LC 0-4 unless one is supplied. LC 5-7 must be
    ///   requested explicitly.
    ///
    /// All validation happens before any byte is written.
    pub fn em_header(
        &mut self,
        must_understand: bool,
        id: u32,
        object_size: usize,
        length_code: Option<LengthCode>,
    ) -> Result<&mut Self> {
        if self.kind.is_cdr2() {
            self.member_header_v2(must_understand, id, object_size, length_code)
        } else {
            self.member_header_v1(must_understand, id, object_size)
        }
    }

    fn member_header_v1(
        &mut self,
        must_understand: bool,
        id: u32,
        object_size: usize,
    ) -> Result<&mut Self> {
        self.align(4, 4);
        let flags = if must_understand {
            MUST_UNDERSTAND_FLAG
        } else {
            0
        };
        if id <= 0x3F00 && object_size <= 0xFFFF {
            self.uint16(flags | id as u16)?;
            self.uint16(object_size as u16)?;
        } else {
            self.uint16(flags | EXTENDED_PID)?;
            self.uint16(8)?;
            self.uint32(id)?;
            self.uint32(object_size as u32)?;
        }
        // PUSH(ORIGIN=0): the member body aligns relative to its own start
        self.reset_origin();
        Ok(self)
    }

    fn member_header_v2(
        &mut self,
        must_understand: bool,
        id: u32,
        object_size: usize,
        length_code: Option<LengthCode>,
    ) -> Result<&mut Self> {
        if id > EMHEADER_ID_MASK {
            return Err(CdrError::id_too_large(id));
        }
        let code = length_code.unwrap_or(LengthCode::for_object_size(object_size));
        let nextint = code.nextint_for_object_size(object_size)?;
        let flags = if must_understand {
            EMHEADER_MUST_UNDERSTAND
        } else {
            0
        };
        self.uint32(flags | ((code as u32) << EMHEADER_LENGTH_CODE_SHIFT) | id)?;
        if let Some(word) = nextint {
            self.uint32(word)?;
        }
        Ok(self)
    }

    /// Write the sentinel terminating an XCDR1 parameter list. No-op on
    /// XCDR2, where the DHEADER delimits the aggregate instead.
    pub fn sentinel_header(&mut self) -> Result<&mut Self> {
        if self.kind.is_cdr2() {
            return Ok(self);
        }
        self.align(4, 4);
        self.uint16(SENTINEL_PID)?;
        self.uint16(0)?;
        Ok(self)
    }

    /// Write raw bytes with no alignment or length prefix.
    pub fn bytes(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.reserve(data.len());
        self.write_bytes_at_offset(data);
        Ok(self)
    }

    /// Write an `i8` array, optionally preceded by its length.
    pub fn int8_array(&mut self, values: &[i8], write_length: bool) -> Result<&mut Self> {
        if write_length {
            self.sequence_length(values.len())?;
        }
        self.reserve(values.len());
        for &v in values {
            self.buffer[self.offset] = v as u8;
            self.offset += 1;
        }
        Ok(self)
    }

    /// Write a `u8` array, optionally preceded by its length.
    pub fn uint8_array(&mut self, values: &[u8], write_length: bool) -> Result<&mut Self> {
        if write_length {
            self.sequence_length(values.len())?;
        }
        self.bytes(values)
    }

    impl_array_write!(int16_array, i16, 2, int16, write_i16_into);
    impl_array_write!(uint16_array, u16, 2, uint16, write_u16_into);
    impl_array_write!(int32_array, i32, 4, int32, write_i32_into);
    impl_array_write!(uint32_array, u32, 4, uint32, write_u32_into);
    impl_array_write!(int64_array, i64, 8, int64, write_i64_into);
    impl_array_write!(uint64_array, u64, 8, uint64, write_u64_into);
    impl_array_write!(float32_array, f32, 4, float32, write_f32_into);
    impl_array_write!(float64_array, f64, 8, float64, write_f64_into);
}
