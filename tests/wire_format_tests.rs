// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte-exact wire format tests against hand-computed streams.

use cdrcodec::{CdrReader, CdrWriter, EncapsulationKind, LengthCode};

// ============================================================================
// Encapsulation Header
// ============================================================================

#[test]
fn test_header_layout() {
    for (kind, byte) in [
        (EncapsulationKind::CdrBe, 0x00u8),
        (EncapsulationKind::CdrLe, 0x01),
        (EncapsulationKind::PlCdrBe, 0x02),
        (EncapsulationKind::PlCdrLe, 0x03),
        (EncapsulationKind::Cdr2Be, 0x10),
        (EncapsulationKind::Cdr2Le, 0x11),
        (EncapsulationKind::PlCdr2Be, 0x12),
        (EncapsulationKind::PlCdr2Le, 0x13),
        (EncapsulationKind::DelimitedCdr2Be, 0x14),
        (EncapsulationKind::DelimitedCdr2Le, 0x15),
    ] {
        let writer = CdrWriter::with_kind(kind);
        assert_eq!(writer.data(), &[0x00, byte, 0x00, 0x00]);

        let data = writer.finish();
        let reader = CdrReader::new(&data).expect("create reader");
        assert_eq!(reader.kind(), kind);
    }
}

#[test]
fn test_reader_accepts_nonzero_options() {
    let data = vec![0x00, 0x01, 0x12, 0x34, 0x2A, 0x00, 0x00, 0x00];
    let mut reader = CdrReader::new(&data).expect("create reader");
    assert_eq!(reader.read_u32().expect("read u32"), 42);
}

// ============================================================================
// Known-Good Byte Streams
// ============================================================================

#[test]
fn test_uint8_array_with_length_xcdr1_le() {
    let mut writer = CdrWriter::new();
    writer
        .uint8_array(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11], true)
        .expect("array");
    assert_eq!(
        writer.data(),
        &[
            0x00, 0x01, 0x00, 0x00, // encapsulation header
            0x0B, 0x00, 0x00, 0x00, // length 11
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
        ]
    );
}

#[test]
fn test_float64_after_uint8_xcdr1_le() {
    let mut writer = CdrWriter::new();
    writer.uint8(1).expect("uint8");
    writer.float64(1.0).expect("float64");
    assert_eq!(
        writer.data(),
        &[
            0x00, 0x01, 0x00, 0x00, // encapsulation header
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // u8 + 7 pad
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F, // 1.0
        ]
    );
}

#[test]
fn test_float64_after_uint8_xcdr2_le() {
    let mut writer = CdrWriter::with_kind(EncapsulationKind::Cdr2Le);
    writer.uint8(1).expect("uint8");
    writer.float64(1.0).expect("float64");
    assert_eq!(
        writer.data(),
        &[
            0x00, 0x11, 0x00, 0x00, // encapsulation header
            0x01, 0x00, 0x00, 0x00, // u8 + 3 pad (4-byte pre-alignment)
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F, // 1.0
        ]
    );
}

#[test]
fn test_emheader_xcdr1_short() {
    let mut writer = CdrWriter::with_kind(EncapsulationKind::PlCdrLe);
    writer.em_header(true, 0x0012, 4, None).expect("em header");
    assert_eq!(writer.data()[4..], [0x12, 0x40, 0x04, 0x00]);

    // Origin was reset to 8: the next u64 needs no padding
    writer.uint64(0).expect("uint64");
    assert_eq!(writer.size(), 16);
}

#[test]
fn test_emheader_xcdr1_extended() {
    let mut writer = CdrWriter::with_kind(EncapsulationKind::PlCdrLe);
    writer
        .em_header(true, 0x40000000, 16, None)
        .expect("em header");
    assert_eq!(
        writer.data()[4..],
        [0x01, 0x7F, 0x08, 0x00, 0x00, 0x00, 0x00, 0x40, 0x10, 0x00, 0x00, 0x00]
    );
}

#[test]
fn test_emheader_xcdr2_lc6() {
    let mut writer = CdrWriter::with_kind(EncapsulationKind::PlCdr2Le);
    writer
        .em_header(false, 0x1234, 12, Some(LengthCode::Length4Reused))
        .expect("em header");
    assert_eq!(writer.data()[4..8], [0x34, 0x12, 0x00, 0x60]);
    assert_eq!(writer.data()[8..12], [0x03, 0x00, 0x00, 0x00]);

    let data = writer.finish();
    let mut reader = CdrReader::new(&data).expect("create reader");
    let member = reader.em_header().expect("read em header");
    assert_eq!(member.object_size, 12);
    assert!(member.read_raw);
}

#[test]
fn test_sentinel_bytes() {
    let mut writer = CdrWriter::with_kind(EncapsulationKind::PlCdrLe);
    writer.sentinel_header().expect("sentinel");
    assert_eq!(writer.data()[4..], [0x02, 0x3F, 0x00, 0x00]);

    let mut writer = CdrWriter::with_kind(EncapsulationKind::PlCdr2Le);
    writer.sentinel_header().expect("sentinel");
    assert_eq!(writer.size(), 4);
}

#[test]
fn test_string_bytes() {
    let mut writer = CdrWriter::new();
    writer.string("abc", true).expect("string");
    assert_eq!(
        writer.data()[4..],
        [0x04, 0x00, 0x00, 0x00, 0x61, 0x62, 0x63, 0x00]
    );
}

// ============================================================================
// Alignment Properties
// ============================================================================

#[test]
fn test_scalar_alignment_property() {
    // After each scalar of width W, (offset - origin) % W == 0
    for kind in [EncapsulationKind::CdrLe, EncapsulationKind::Cdr2Le] {
        let mut writer = CdrWriter::with_kind(kind);
        let origin = 4;

        writer.uint8(1).expect("u8");
        writer.uint16(2).expect("u16");
        assert_eq!((writer.size() - origin) % 2, 0);
        writer.uint8(3).expect("u8");
        writer.uint32(4).expect("u32");
        assert_eq!((writer.size() - origin) % 4, 0);
        writer.uint8(5).expect("u8");
        writer.uint64(6).expect("u64");
        let w64 = kind.eight_byte_alignment();
        assert_eq!((writer.size() - origin) % w64, 0);
    }
}

#[test]
fn test_xcdr1_vs_xcdr2_sizes_diverge() {
    // u8 + u64: 20 bytes under XCDR1, 16 under XCDR2
    let mut v1 = CdrWriter::with_kind(EncapsulationKind::CdrLe);
    v1.uint8(1).expect("u8");
    v1.uint64(2).expect("u64");
    assert_eq!(v1.size(), 20);

    let mut v2 = CdrWriter::with_kind(EncapsulationKind::Cdr2Le);
    v2.uint8(1).expect("u8");
    v2.uint64(2).expect("u64");
    assert_eq!(v2.size(), 16);
}

#[test]
fn test_big_endian_scalar_bytes() {
    let mut writer = CdrWriter::with_kind(EncapsulationKind::CdrBe);
    writer.uint32(0x12345678).expect("u32");
    writer.float32(1.0).expect("f32");
    assert_eq!(
        writer.data()[4..],
        [0x12, 0x34, 0x56, 0x78, 0x3F, 0x80, 0x00, 0x00]
    );
}

// ============================================================================
// Reference Stream Decode
// ============================================================================

/// Decode a tf2_msgs/TFMessage stream captured from a ROS 2 publisher.
///
/// Exercises string alignment, inter-field padding, and 8-byte float
/// alignment against a fixed reference byte sequence.
#[test]
fn test_decode_captured_tf_message() {
    let data: Vec<u8> = vec![
        0x00, 0x01, 0x00, 0x00, // encapsulation header (CDR_LE)
        0x01, 0x00, 0x00, 0x00, // transforms length = 1
        0xcc, 0xe0, 0xd1, 0x58, // stamp.sec = 1490149580
        0xf0, 0x89, 0xf9, 0x06, // stamp.nanosec = 117017840
        0x0a, 0x00, 0x00, 0x00, // frame_id length = 10
        0x62, 0x61, 0x73, 0x65, 0x5f, 0x6c, 0x69, 0x6e, 0x6b, 0x00, // "base_link\0"
        0x00, 0x00, // padding to 4
        0x06, 0x00, 0x00, 0x00, // child_frame_id length = 6
        0x72, 0x61, 0x64, 0x61, 0x72, 0x00, // "radar\0"
        0x00, 0x00, // padding to 8
        0xae, 0x47, 0xe1, 0x7a, 0x14, 0xae, 0x0e, 0x40, // translation.x = 3.835
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // translation.y = 0
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // translation.z = 0
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // rotation.x = 0
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // rotation.y = 0
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // rotation.z = 0
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f, // rotation.w = 1.0
    ];

    let mut reader = CdrReader::new(&data).expect("create reader");
    assert_eq!(reader.sequence_length().expect("transforms length"), 1);
    assert_eq!(reader.read_u32().expect("stamp.sec"), 1490149580);
    assert_eq!(reader.read_u32().expect("stamp.nanosec"), 117017840);
    assert_eq!(reader.read_string().expect("frame_id"), "base_link");
    assert_eq!(reader.read_string().expect("child_frame_id"), "radar");
    assert!((reader.read_f64().expect("translation.x") - 3.835).abs() < 1e-12);
    for _ in 0..5 {
        assert_eq!(reader.read_f64().expect("zero component"), 0.0);
    }
    assert_eq!(reader.read_f64().expect("rotation.w"), 1.0);
    assert!(reader.is_at_end());
}

/// The same message must re-encode to the identical byte sequence.
#[test]
fn test_reencode_captured_tf_message() {
    let mut writer = CdrWriter::new();
    writer.sequence_length(1).expect("transforms length");
    writer.uint32(1490149580).expect("stamp.sec");
    writer.uint32(117017840).expect("stamp.nanosec");
    writer.string("base_link", true).expect("frame_id");
    writer.string("radar", true).expect("child_frame_id");
    for v in [3.835, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0] {
        writer.float64(v).expect("transform component");
    }

    let data = writer.finish();
    assert_eq!(data.len(), 100);
    assert_eq!(&data[20..30], b"base_link\0");
    assert_eq!(&data[36..42], b"radar\0");
    assert_eq!(data[44..52], 3.835f64.to_le_bytes());
    assert_eq!(data[92..100], 1.0f64.to_le_bytes());
}

// ============================================================================
// Error Surfaces
// ============================================================================

#[test]
fn test_truncated_buffer_errors() {
    use cdrcodec::CdrError;

    let err = CdrReader::new(&[0x00, 0x01]).unwrap_err();
    assert!(matches!(err, CdrError::BufferTooSmall { .. }));

    let data = vec![0x00, 0x01, 0x00, 0x00, 0x01, 0x02];
    let mut reader = CdrReader::new(&data).expect("create reader");
    assert!(reader.read_u32().is_err());
    assert!(reader.read_u16().is_ok());
    assert!(reader.read_u8().is_err());
}

#[test]
fn test_unknown_kind_byte_errors() {
    use cdrcodec::CdrError;

    let err = CdrReader::new(&[0x00, 0x16, 0x00, 0x00]).unwrap_err();
    assert!(matches!(
        err,
        CdrError::InvalidEncapsulation { kind: 0x16 }
    ));
}
