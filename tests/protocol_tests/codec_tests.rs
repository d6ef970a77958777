//! Codec Tests
//!
//! Tests for header encoding/decoding and the stream helpers.

use std::io::Cursor;
use iscsi_responder::protocol::{
    decode_header, encode_header, read_frame, read_header, write_header, Header, HEADER_SIZE,
    WIRE_FIELDS_LEN,
};
use iscsi_responder::IscsiError;

fn sample_header() -> Header {
    Header {
        operation: 0x01,
        flags: 0x81,
        task_tag: 0xDEAD_BEEF,
        data_or_length: 0x0000_0200,
        connection_id: 0x0102_0304,
        logical_unit: 0x1122_3344_5566_7788,
    }
}

// =============================================================================
// Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_header() {
    let header = sample_header();
    let encoded = encode_header(&header).unwrap();
    let decoded = decode_header(&encoded).unwrap();

    assert_eq!(decoded, header);
}

#[test]
fn test_encode_decode_extreme_values() {
    let headers = [
        Header::default(),
        Header {
            operation: u8::MAX,
            flags: u8::MAX,
            task_tag: u32::MAX,
            data_or_length: u32::MAX,
            connection_id: u32::MAX,
            logical_unit: u64::MAX,
        },
        Header {
            operation: 0x80,
            flags: 0x01,
            task_tag: 1,
            data_or_length: 1 << 31,
            connection_id: 0xFFFF_0000,
            logical_unit: 1 << 63,
        },
    ];

    for header in &headers {
        let encoded = encode_header(header).unwrap();
        assert_eq!(encoded.len(), HEADER_SIZE);
        assert_eq!(decode_header(&encoded).unwrap(), *header);
    }
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let header = sample_header();
    let mut bytes = encode_header(&header).unwrap().to_vec();
    bytes.extend_from_slice(b"data segment that belongs to the caller");

    assert_eq!(decode_header(&bytes).unwrap(), header);
}

#[test]
fn test_decode_ignores_unnamed_header_bytes() {
    let header = sample_header();
    let mut bytes = encode_header(&header).unwrap().to_vec();
    for b in &mut bytes[WIRE_FIELDS_LEN..] {
        *b = 0xAB;
    }

    assert_eq!(decode_header(&bytes).unwrap(), header);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_decode_empty_input() {
    let result = decode_header(&[]);
    assert!(matches!(
        result,
        Err(IscsiError::IncompleteMessage { expected: 48, actual: 0 })
    ));
}

#[test]
fn test_decode_one_byte_short() {
    let bytes = [0u8; HEADER_SIZE - 1];
    let result = decode_header(&bytes);
    assert!(matches!(
        result,
        Err(IscsiError::IncompleteMessage { expected: 48, actual: 47 })
    ));
}

#[test]
fn test_decode_every_short_length() {
    let bytes = [0x03u8; HEADER_SIZE];
    for len in 0..HEADER_SIZE {
        let result = decode_header(&bytes[..len]);
        assert!(
            matches!(result, Err(IscsiError::IncompleteMessage { .. })),
            "length {} should be incomplete",
            len
        );
    }
}

#[test]
fn test_decode_exact_length_succeeds() {
    let bytes = [0u8; HEADER_SIZE];
    assert_eq!(decode_header(&bytes).unwrap(), Header::default());
}

#[test]
fn test_incomplete_message_display() {
    let err = decode_header(&[0x01, 0x00, 0x00]).unwrap_err();
    assert!(err.to_string().contains("Incomplete iSCSI message"));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_header() {
    let header = sample_header();

    let mut buffer = Vec::new();
    write_header(&mut buffer, &header).unwrap();
    assert_eq!(buffer.len(), HEADER_SIZE);

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_header(&mut cursor).unwrap(), Some(header));
    assert_eq!(read_header(&mut cursor).unwrap(), None);
}

#[test]
fn test_stream_multiple_headers() {
    let headers: Vec<Header> = (0..4u32)
        .map(|i| Header {
            operation: i as u8,
            task_tag: i * 10,
            ..sample_header()
        })
        .collect();

    let mut buffer = Vec::new();
    for header in &headers {
        write_header(&mut buffer, header).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &headers {
        assert_eq!(read_header(&mut cursor).unwrap().as_ref(), Some(expected));
    }
}

#[test]
fn test_read_frame_clean_eof() {
    let mut cursor = Cursor::new(Vec::<u8>::new());
    assert!(read_frame(&mut cursor).unwrap().is_none());
}

#[test]
fn test_read_frame_truncated_stream() {
    let mut cursor = Cursor::new(vec![0x03u8; 20]);
    let result = read_frame(&mut cursor);
    assert!(matches!(result, Err(IscsiError::MalformedHeader(_))));
}

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_layout() {
    let encoded = encode_header(&sample_header()).unwrap();

    // [op][flags][task_tag(4)][data(4)][cid(4)][lun(8)][zero(26)]
    assert_eq!(encoded[0], 0x01);
    assert_eq!(encoded[1], 0x81);
    assert_eq!(&encoded[2..6], &[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(&encoded[6..10], &[0x00, 0x00, 0x02, 0x00]);
    assert_eq!(&encoded[10..14], &[0x01, 0x02, 0x03, 0x04]);
    assert_eq!(
        &encoded[14..22],
        &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]
    );
    assert!(encoded[WIRE_FIELDS_LEN..].iter().all(|&b| b == 0));
}

#[test]
fn test_decode_hand_built_bytes() {
    let mut bytes = [0u8; HEADER_SIZE];
    bytes[0] = 0x06;
    bytes[2..6].copy_from_slice(&7u32.to_be_bytes());
    bytes[10..14].copy_from_slice(&2u32.to_be_bytes());
    bytes[14..22].copy_from_slice(&5u64.to_be_bytes());

    let header = decode_header(&bytes).unwrap();
    assert_eq!(header.operation, 0x06);
    assert_eq!(header.flags, 0);
    assert_eq!(header.task_tag, 7);
    assert_eq!(header.data_or_length, 0);
    assert_eq!(header.connection_id, 2);
    assert_eq!(header.logical_unit, 5);
}
