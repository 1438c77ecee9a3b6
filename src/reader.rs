// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR reader consuming a contiguous encoded byte sequence.
//!
//! The reader borrows a caller-supplied buffer and never mutates or
//! resizes it. It tracks:
//! - `offset`: current read position in the buffer
//! - `origin`: alignment reference point, re-set after each XCDR1
//!   parameter-list member header
//!
//! Alignment is calculated as `(offset - origin) % size`, matching the
//! DDS-XTypes rules. A failed read leaves the cursor where it was.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tracing::debug;

use crate::core::{CdrError, Result};
use crate::encapsulation::{
    EncapsulationKind, EMHEADER_ID_MASK, EMHEADER_LENGTH_CODE_SHIFT, EMHEADER_MUST_UNDERSTAND,
    ENCAPSULATION_HEADER_SIZE, EXTENDED_PID, MUST_UNDERSTAND_FLAG, SENTINEL_PID,
};
use crate::length_code::LengthCode;
use crate::writer::bulk_copy_eligible;

/// A decoded parameter-list member header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberHeader {
    /// Whether a decoder that does not recognize the member must reject
    /// the message
    pub must_understand: bool,
    /// Member id
    pub id: u32,
    /// Serialized byte length of the member
    pub object_size: usize,
    /// True for XCDR2 length codes 5-7: the NEXTINT word was left in the
    /// stream and is re-consumed as the first four bytes of the member
    pub read_raw: bool,
}

macro_rules! impl_array_read {
    ($name:ident, $elem:ty, $width:expr, $scalar:ident, $bulk:ident) => {
        #[doc = concat!(
            "Read `count` `", stringify!($elem),
            "` values, bulk-copying when the fast path applies."
        )]
        pub fn $name(&mut self, count: usize) -> Result<Vec<$elem>> {
            let byte_len = self.array_byte_length(count, $width)?;
            if bulk_copy_eligible(self.little_endian, count) {
                let alignment = if $width == 8 {
                    self.eight_byte_alignment
                } else {
                    $width
                };
                let pos = self.checkout(alignment, byte_len)?;
                let mut values = vec![<$elem>::default(); count];
                if self.little_endian {
                    LittleEndian::$bulk(&self.data[pos..pos + byte_len], &mut values);
                } else {
                    BigEndian::$bulk(&self.data[pos..pos + byte_len], &mut values);
                }
                self.offset = pos + byte_len;
                Ok(values)
            } else {
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(self.$scalar()?);
                }
                Ok(values)
            }
        }
    };
}

/// CDR reader over CDR-encoded data.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use cdrcodec::CdrReader;
///
/// let data = vec![0x00, 0x01, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00];
/// let mut reader = CdrReader::new(&data)?;
/// assert_eq!(reader.read_u32()?, 42);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CdrReader<'a> {
    /// The data buffer (includes the encapsulation header)
    data: &'a [u8],
    /// Current read position
    offset: usize,
    /// Origin offset for alignment calculation
    origin: usize,
    /// Encapsulation kind from the header
    kind: EncapsulationKind,
    /// Whether the data uses little endian encoding
    little_endian: bool,
    /// Alignment of 64-bit values (8 for XCDR1, 4 for XCDR2)
    eight_byte_alignment: usize,
}

impl<'a> CdrReader<'a> {
    /// Create a new reader from CDR-encoded data.
    ///
    /// The data must start with the 4-byte encapsulation header. The
    /// option bytes are ignored; an unrecognized kind byte is rejected.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < ENCAPSULATION_HEADER_SIZE {
            return Err(CdrError::buffer_too_small(
                ENCAPSULATION_HEADER_SIZE,
                data.len(),
                0,
            ));
        }
        let kind = EncapsulationKind::from_u8(data[1])?;
        if data[2] != 0 || data[3] != 0 {
            debug!(
                options = ?[data[2], data[3]],
                "ignoring nonzero encapsulation options"
            );
        }

        Ok(Self {
            data,
            offset: ENCAPSULATION_HEADER_SIZE,
            origin: ENCAPSULATION_HEADER_SIZE,
            kind,
            little_endian: kind.is_little_endian(),
            eight_byte_alignment: kind.eight_byte_alignment(),
        })
    }

    /// Get the encapsulation kind.
    #[must_use]
    pub const fn kind(&self) -> EncapsulationKind {
        self.kind
    }

    /// Get the current position relative to the data start.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.offset
    }

    /// Get the remaining bytes available to read.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Check if at end of buffer.
    #[inline]
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Compute the offset after aligning to `size` relative to the origin.
    fn aligned_offset(&self, size: usize) -> usize {
        let alignment = (self.offset - self.origin) % size;
        if alignment > 0 {
            self.offset + (size - alignment)
        } else {
            self.offset
        }
    }

    /// Align and bounds-check a read of `width` bytes. Returns the start
    /// position without moving the cursor, so a failure leaves the
    /// reader untouched.
    fn checkout(&self, size: usize, width: usize) -> Result<usize> {
        let pos = self.aligned_offset(size);
        if pos + width > self.data.len() {
            return Err(CdrError::buffer_too_small(
                pos - self.offset + width,
                self.remaining(),
                self.offset as u64,
            ));
        }
        Ok(pos)
    }

    /// Validate an array read of `count` elements of `width` bytes,
    /// returning the total byte length. Checked before any allocation so
    /// a hostile count cannot trigger one.
    fn array_byte_length(&self, count: usize, width: usize) -> Result<usize> {
        let byte_len = count.checked_mul(width).ok_or_else(|| {
            CdrError::buffer_too_small(usize::MAX, self.remaining(), self.offset as u64)
        })?;
        if byte_len > self.remaining() {
            return Err(CdrError::buffer_too_small(
                byte_len,
                self.remaining(),
                self.offset as u64,
            ));
        }
        Ok(byte_len)
    }

    /// Align to the specified boundary, relative to the origin.
    pub fn align(&mut self, size: usize) -> Result<()> {
        let pos = self.aligned_offset(size);
        if pos > self.data.len() {
            return Err(CdrError::buffer_too_small(
                pos - self.offset,
                self.remaining(),
                self.offset as u64,
            ));
        }
        self.offset = pos;
        Ok(())
    }

    /// Reset the alignment origin to the current offset.
    ///
    /// XCDR1 member headers do this implicitly; hosts decoding nested
    /// aggregates by hand may need it explicitly.
    pub fn reset_origin(&mut self) {
        self.origin = self.offset;
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        if self.offset >= self.data.len() {
            return Err(CdrError::buffer_too_small(1, 0, self.offset as u64));
        }
        let value = self.data[self.offset];
        self.offset += 1;
        Ok(value)
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a `u16` value.
    pub fn read_u16(&mut self) -> Result<u16> {
        let pos = self.checkout(2, 2)?;
        let bytes = [self.data[pos], self.data[pos + 1]];
        self.offset = pos + 2;
        Ok(if self.little_endian {
            u16::from_le_bytes(bytes)
        } else {
            u16::from_be_bytes(bytes)
        })
    }

    /// Read an `i16` value.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read a `u32` value.
    pub fn read_u32(&mut self) -> Result<u32> {
        let pos = self.checkout(4, 4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[pos..pos + 4]);
        self.offset = pos + 4;
        Ok(if self.little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    /// Read an `f32` value.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Read an `i32` value.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a `u64` value, aligned per the encapsulation (8 bytes for
    /// XCDR1, 4 for XCDR2).
    pub fn read_u64(&mut self) -> Result<u64> {
        let pos = self.checkout(self.eight_byte_alignment, 8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[pos..pos + 8]);
        self.offset = pos + 8;
        Ok(if self.little_endian {
            u64::from_le_bytes(bytes)
        } else {
            u64::from_be_bytes(bytes)
        })
    }

    /// Read an `i64` value.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Read an `f64` value, aligned per the encapsulation.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a `u16` in big-endian byte order regardless of the stream's
    /// endianness. Counterpart of the writer's transport-layer fields.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let pos = self.checkout(2, 2)?;
        let bytes = [self.data[pos], self.data[pos + 1]];
        self.offset = pos + 2;
        Ok(u16::from_be_bytes(bytes))
    }

    /// Read a `u32` in big-endian byte order.
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let pos = self.checkout(4, 4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[pos..pos + 4]);
        self.offset = pos + 4;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Read a `u64` in big-endian byte order.
    pub fn read_u64_be(&mut self) -> Result<u64> {
        let pos = self.checkout(self.eight_byte_alignment, 8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[pos..pos + 8]);
        self.offset = pos + 8;
        Ok(u64::from_be_bytes(bytes))
    }

    /// Read a counted, null-terminated UTF-8 string.
    ///
    /// The length prefix counts the terminator; the terminator and the
    /// UTF-8 payload are both validated.
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_u32()? as usize;
        if length == 0 {
            return Ok(String::new());
        }
        let bytes = self.read_bytes(length)?;
        if bytes[length - 1] != 0 {
            return Err(CdrError::invalid_string(
                "missing null terminator",
                (self.offset - 1) as u64,
            ));
        }
        let value = std::str::from_utf8(&bytes[..length - 1]).map_err(|e| {
            CdrError::invalid_string(format!("invalid UTF-8: {e}"), (self.offset - length) as u64)
        })?;
        Ok(value.to_string())
    }

    /// Read a sequence length (the count prefix of ordinary sequences).
    pub fn sequence_length(&mut self) -> Result<u32> {
        self.read_u32()
    }

    /// Read a DHEADER: the uint32 byte length of the delimited aggregate
    /// that follows.
    pub fn d_header(&mut self) -> Result<u32> {
        self.read_u32()
    }

    /// Read an EMHEADER for a parameter-list member.
    ///
    /// For XCDR2 length codes 5-7, `read_raw` is set and the NEXTINT
    /// word is left in the stream: it is re-consumed as the first four
    /// bytes of the member's serialized form.
    pub fn em_header(&mut self) -> Result<MemberHeader> {
        if self.kind.is_cdr2() {
            self.member_header_v2()
        } else {
            self.member_header_v1()
        }
    }

    fn member_header_v1(&mut self) -> Result<MemberHeader> {
        self.align(4)?;
        let pid = self.read_u16()?;
        let must_understand = pid & MUST_UNDERSTAND_FLAG != 0;
        let id_raw = pid & 0x3FFF;
        let header = if id_raw == EXTENDED_PID {
            // Long form: the short length field is always 8, then the
            // real id and size follow as uint32s
            let _short_length = self.read_u16()?;
            let id = self.read_u32()?;
            let object_size = self.read_u32()? as usize;
            MemberHeader {
                must_understand,
                id,
                object_size,
                read_raw: false,
            }
        } else {
            let object_size = self.read_u16()? as usize;
            MemberHeader {
                must_understand,
                id: u32::from(id_raw),
                object_size,
                read_raw: false,
            }
        };
        // PUSH(ORIGIN=0): the member body aligns relative to its own start
        self.reset_origin();
        Ok(header)
    }

    fn member_header_v2(&mut self) -> Result<MemberHeader> {
        let header = self.read_u32()?;
        let must_understand = header & EMHEADER_MUST_UNDERSTAND != 0;
        let code = LengthCode::from_u8(((header >> EMHEADER_LENGTH_CODE_SHIFT) & 0x7) as u8)?;
        let id = header & EMHEADER_ID_MASK;

        let (object_size, read_raw) = match code.fixed_size() {
            Some(size) => (size, false),
            None => {
                let nextint = if code.is_reused() {
                    self.peek_u32()?
                } else {
                    self.read_u32()?
                };
                let size = match code {
                    LengthCode::Length4Reused => nextint as usize * 4,
                    LengthCode::Length8Reused => nextint as usize * 8,
                    _ => nextint as usize,
                };
                (size, code.is_reused())
            }
        };

        Ok(MemberHeader {
            must_understand,
            id,
            object_size,
            read_raw,
        })
    }

    /// Read a `u32` without consuming it. Alignment padding is consumed.
    fn peek_u32(&mut self) -> Result<u32> {
        let pos = self.checkout(4, 4)?;
        self.offset = pos;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[pos..pos + 4]);
        Ok(if self.little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    /// Consume and validate the sentinel terminating an XCDR1 parameter
    /// list. No-op on XCDR2.
    pub fn sentinel_header(&mut self) -> Result<()> {
        if self.kind.is_cdr2() {
            return Ok(());
        }
        self.align(4)?;
        let pid = self.read_u16()?;
        let length = self.read_u16()?;
        if pid & 0x3FFF != SENTINEL_PID || length != 0 {
            return Err(CdrError::integrity(format!(
                "expected sentinel, found pid 0x{pid:04X} with length {length}"
            )));
        }
        Ok(())
    }

    /// Read a byte slice. The returned view aliases the input buffer.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(CdrError::buffer_too_small(
                count,
                self.remaining(),
                self.offset as u64,
            ));
        }
        let start = self.offset;
        self.offset += count;
        Ok(&self.data[start..self.offset])
    }

    /// Skip bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        if count > self.remaining() {
            return Err(CdrError::buffer_too_small(
                count,
                self.remaining(),
                self.offset as u64,
            ));
        }
        self.offset += count;
        Ok(())
    }

    /// Peek at the next byte without advancing the position.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        if self.offset < self.data.len() {
            Some(self.data[self.offset])
        } else {
            None
        }
    }

    /// Read `count` bytes as a `u8` array. The returned view aliases the
    /// input buffer; copy it if it must outlive the buffer.
    pub fn read_u8_array(&mut self, count: usize) -> Result<&'a [u8]> {
        self.read_bytes(count)
    }

    /// Read `count` bytes as an `i8` array.
    pub fn read_i8_array(&mut self, count: usize) -> Result<Vec<i8>> {
        let bytes = self.read_bytes(count)?;
        Ok(bytes.iter().map(|&b| b as i8).collect())
    }

    impl_array_read!(read_i16_array, i16, 2, read_i16, read_i16_into);
    impl_array_read!(read_u16_array, u16, 2, read_u16, read_u16_into);
    impl_array_read!(read_i32_array, i32, 4, read_i32, read_i32_into);
    impl_array_read!(read_u32_array, u32, 4, read_u32, read_u32_into);
    impl_array_read!(read_i64_array, i64, 8, read_i64, read_i64_into);
    impl_array_read!(read_u64_array, u64, 8, read_u64, read_u64_into);
    impl_array_read!(read_f32_array, f32, 4, read_f32, read_f32_into);
    impl_array_read!(read_f64_array, f64, 8, read_f64, read_f64_into);
}
