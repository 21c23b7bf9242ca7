//! Tests for block header parsing and record iteration
//!
//! These tests verify:
//! - Header fields and block end computation
//! - Version and wire type validation
//! - Class-name bound
//! - Empty block policy
//! - Record offsets within a block

use std::io::Cursor;

use recindex::block::{consume_marker, read_block_header, BlockFrame, BlockRecords, ByteSource};
use recindex::config::{EmptyBlockPolicy, IndexerConfig, VarintMode};
use recindex::IndexError;

#[path = "../common/mod.rs"]
mod common;

use common::{encode_varint, header_bytes, BlockFile, RECORD_KEY};

// =============================================================================
// Helper Functions
// =============================================================================

/// Source positioned right after the first marker of `bytes`
fn after_marker(bytes: Vec<u8>) -> ByteSource<Cursor<Vec<u8>>> {
    let mut src = ByteSource::new(Cursor::new(bytes), 32);
    assert!(consume_marker(&mut src, false).unwrap().is_found());
    src
}

fn expect_header(frame: BlockFrame) -> recindex::block::BlockHeader {
    match frame {
        BlockFrame::Header(header) => header,
        other => panic!("expected header, got {:?}", other),
    }
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_parse_header() {
    let file = BlockFile::new().block("com.example.Tweet", &[b"abc"]);
    let mut src = after_marker(file.bytes.clone());

    let header = expect_header(read_block_header(&mut src, &IndexerConfig::default()).unwrap());

    assert_eq!(header.offset, 16);
    assert_eq!(header.version, 1);
    assert_eq!(header.class_name, "com.example.Tweet");
    assert_eq!(header.end, file.end);
    assert_eq!(header.end, 20 + header.length as u64);
}

#[test]
fn test_wrong_version_is_unsupported() {
    let file = BlockFile::new().block_with_version(2, "X", &[b"abc"]);
    let mut src = after_marker(file.bytes);

    assert!(matches!(
        read_block_header(&mut src, &IndexerConfig::default()),
        Err(IndexError::UnsupportedVersion { version: 2, .. })
    ));
}

#[test]
fn test_missing_length_is_end() {
    let file = BlockFile::new().empty_block(0);
    let mut bytes = file.bytes;
    bytes.truncate(16 + 2);
    let mut src = after_marker(bytes);

    assert_eq!(
        read_block_header(&mut src, &IndexerConfig::default()).unwrap(),
        BlockFrame::End
    );
}

#[test]
fn test_non_positive_length_is_skipped_by_default() {
    for length in [0, -7] {
        let file = BlockFile::new().empty_block(length);
        let mut src = after_marker(file.bytes);

        assert_eq!(
            read_block_header(&mut src, &IndexerConfig::default()).unwrap(),
            BlockFrame::Empty { offset: 16, length }
        );
    }
}

#[test]
fn test_non_positive_length_rejected_when_strict() {
    let config = IndexerConfig::builder()
        .empty_block_policy(EmptyBlockPolicy::Reject)
        .build();
    let file = BlockFile::new().empty_block(0);
    let mut src = after_marker(file.bytes);

    assert!(matches!(
        read_block_header(&mut src, &config),
        Err(IndexError::EmptyBlock { offset: 16 })
    ));
}

#[test]
fn test_version_with_wrong_wire_type_is_malformed() {
    let mut body = vec![0x0a, 0x01]; // field 1, length-delimited
    body.extend_from_slice(&header_bytes(1, "X")[2..]);
    let mut bytes = recindex::block::MARKER.to_vec();
    bytes.extend_from_slice(&(body.len() as i32).to_le_bytes());
    bytes.extend_from_slice(&body);
    let mut src = after_marker(bytes);

    assert!(matches!(
        read_block_header(&mut src, &IndexerConfig::default()),
        Err(IndexError::MalformedHeader { offset: 20, .. })
    ));
}

#[test]
fn test_oversized_class_name_is_malformed() {
    let name = "n".repeat(1024);
    let file = BlockFile::new().block(&name, &[]);
    let mut src = after_marker(file.bytes);

    assert!(matches!(
        read_block_header(&mut src, &IndexerConfig::default()),
        Err(IndexError::MalformedHeader { .. })
    ));
}

#[test]
fn test_class_name_limit_is_configurable() {
    let config = IndexerConfig::builder().max_class_name_len(8).build();
    let file = BlockFile::new().block("1234567", &[]);
    let mut src = after_marker(file.bytes);
    assert!(read_block_header(&mut src, &config).is_ok());

    let file = BlockFile::new().block("12345678", &[]);
    let mut src = after_marker(file.bytes);
    assert!(read_block_header(&mut src, &config).is_err());
}

#[test]
fn test_header_overrunning_block_is_malformed() {
    let body = header_bytes(1, "com.example.Long");
    let mut bytes = recindex::block::MARKER.to_vec();
    bytes.extend_from_slice(&3i32.to_le_bytes());
    bytes.extend_from_slice(&body);
    let mut src = after_marker(bytes);

    assert!(matches!(
        read_block_header(&mut src, &IndexerConfig::default()),
        Err(IndexError::MalformedHeader { offset: 16, .. })
    ));
}

// =============================================================================
// Record Iterator Tests
// =============================================================================

#[test]
fn test_records_yield_payload_offsets() {
    let file = BlockFile::new().block("X", &[b"first", b"", b"third record"]);
    let mut src = after_marker(file.bytes.clone());
    let header = expect_header(read_block_header(&mut src, &IndexerConfig::default()).unwrap());

    let starts: Vec<u64> = BlockRecords::new(&mut src, &header, VarintMode::Strict)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(starts, file.record_starts);
    assert_eq!(src.position(), header.end);
    for (start, record) in starts.iter().zip(&file.records) {
        let start = *start as usize;
        assert_eq!(&file.bytes[start..start + record.len()], record.as_slice());
    }
}

#[test]
fn test_block_without_records() {
    let file = BlockFile::new().block("X", &[]);
    let mut src = after_marker(file.bytes);
    let header = expect_header(read_block_header(&mut src, &IndexerConfig::default()).unwrap());

    assert_eq!(BlockRecords::new(&mut src, &header, VarintMode::Strict).count(), 0);
}

#[test]
fn test_record_overrunning_block_fails_once() {
    let mut body = header_bytes(1, "X");
    body.push(RECORD_KEY);
    encode_varint(&mut body, 50);
    body.extend_from_slice(b"short");

    let mut bytes = recindex::block::MARKER.to_vec();
    bytes.extend_from_slice(&(body.len() as i32).to_le_bytes());
    bytes.extend_from_slice(&body);
    let mut src = after_marker(bytes);
    let header = expect_header(read_block_header(&mut src, &IndexerConfig::default()).unwrap());

    let mut records = BlockRecords::new(&mut src, &header, VarintMode::Strict);
    assert!(matches!(records.next(), Some(Err(IndexError::MalformedHeader { .. }))));
    assert!(records.next().is_none());
}

#[test]
fn test_record_with_bad_key_is_malformed() {
    let mut body = header_bytes(1, "X");
    body.push(0x9a); // continuation bit set
    body.push(0x01);

    let mut bytes = recindex::block::MARKER.to_vec();
    bytes.extend_from_slice(&(body.len() as i32).to_le_bytes());
    bytes.extend_from_slice(&body);
    let mut src = after_marker(bytes);
    let header = expect_header(read_block_header(&mut src, &IndexerConfig::default()).unwrap());

    let mut records = BlockRecords::new(&mut src, &header, VarintMode::Strict);
    assert!(matches!(records.next(), Some(Err(IndexError::MalformedHeader { .. }))));
}
