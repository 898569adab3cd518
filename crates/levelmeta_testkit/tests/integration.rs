//! Integration tests for the session record codec.

use std::io;

use levelmeta_codec::{CodecError, DecodeConfig, RecordDecoder, SessionRecord};
use levelmeta_testkit::prelude::*;
use proptest::prelude::*;

fn golden() -> GoldenTest {
    GoldenTest::with_default_dir("session_record")
}

#[test]
fn golden_memtable_flush() {
    let record = scenarios::memtable_flush();
    golden().assert_bytes("memtable_flush", &record.encode());
    golden().assert_text("memtable_flush_text", &record.to_string());
}

#[test]
fn golden_new_database() {
    golden().assert_bytes("new_database", &scenarios::new_database().encode());
}

#[test]
fn shared_vectors_hold() {
    init_test_tracing();
    for vector in record_vectors().iter().chain(rejection_vectors().iter()) {
        if let Err(mismatch) = vector.verify() {
            panic!("{mismatch}");
        }
    }
}

#[test]
fn manifest_file_roundtrip() {
    let manifest = TempManifest::new();
    let record = scenarios::compaction(3, 8, 6);
    manifest.write_record(&record).unwrap();
    assert_eq!(manifest.read_record().unwrap(), record);
}

#[test]
fn torn_manifest_reports_truncation() {
    let manifest = TempManifest::new();
    let record = scenarios::memtable_flush();
    manifest.write_record(&record).unwrap();
    // Drop the final key byte.
    manifest.truncate(manifest.len() - 1);
    let err = manifest.read_record().unwrap_err();
    assert!(err.is_truncation(), "unexpected error {err}");
}

#[test]
fn manifest_with_appended_unknown_tag_still_reads() {
    let manifest = TempManifest::new();
    let record = scenarios::new_database();
    manifest.write_record(&record).unwrap();
    manifest.append_raw(&[0x64]);
    assert_eq!(manifest.read_record().unwrap(), record);
}

#[test]
fn manifest_with_retired_tag_is_refused() {
    let manifest = TempManifest::new();
    manifest.write_record(&scenarios::new_database()).unwrap();
    manifest.append_raw(&[0x09, 0x05]);
    let err = manifest.read_record().unwrap_err();
    assert!(err.is_unsupported_format());
}

#[test]
fn encoder_stops_at_full_sink() {
    let record = scenarios::compaction(1, 4, 4);
    let encoded = record.encode();
    let mut sink = FailingWriter::new(encoded.len() / 2);
    let err = record.encode_to(&mut sink).unwrap_err();
    assert!(matches!(err, CodecError::Io(ref e) if e.kind() == io::ErrorKind::WriteZero));
    assert_eq!(sink.accepted(), &encoded[..encoded.len() / 2]);
    assert_eq!(sink.rejected_writes(), 1);
}

#[test]
fn encoder_fits_exact_budget() {
    let record = scenarios::compaction(1, 2, 2);
    let mut sink = FailingWriter::new(record.encoded_len());
    record.encode_to(&mut sink).unwrap();
    assert_eq!(sink.accepted(), &record.encode()[..]);
}

#[test]
fn decoder_handles_single_byte_reads() {
    let record = scenarios::compaction(2, 5, 3);
    let encoded = record.encode();
    let mut reader = ByteAtATimeReader::new(&encoded);
    let mut decoded = SessionRecord::new();
    RecordDecoder::new(&mut reader).decode_into(&mut decoded).unwrap();
    assert_eq!(decoded, record);
    assert!(reader.reads() > encoded.len());
}

#[test]
fn decoder_retries_interrupted_reads() {
    let record = scenarios::memtable_flush();
    let encoded = record.encode();
    let mut decoded = SessionRecord::new();
    decoded.decode_from(InterruptingReader::new(&encoded)).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn decoder_surfaces_source_failure() {
    let encoded = scenarios::memtable_flush().encode();
    let mut decoded = SessionRecord::new();
    let err = decoded
        .decode_from(ErrorReader::new(&encoded, 5, io::ErrorKind::ConnectionReset))
        .unwrap_err();
    assert!(matches!(err, CodecError::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset));
    // Fields completed before the failure are kept.
    assert_eq!(decoded.log_num(), Some(7));
    assert_eq!(decoded.sequence(), Some(42));
    assert!(decoded.new_tables().is_empty());
}

#[test]
fn size_limit_applies_to_keys() {
    let mut record = SessionRecord::new();
    record.add_compact_pointer(0, vec![b'k'; 64]);
    let encoded = record.encode();
    let mut decoded = SessionRecord::new();
    let err = RecordDecoder::with_config(&encoded[..], DecodeConfig::new().max_bytes_len(63))
        .decode_into(&mut decoded)
        .unwrap_err();
    assert!(matches!(
        err,
        CodecError::SizeLimitExceeded {
            claimed: 64,
            max_allowed: 63
        }
    ));
}

#[test]
fn stress_roundtrips_succeed() {
    let config = StressConfig {
        operations: 1_000,
        threads: 8,
        tables_per_record: 8,
    };
    assert_eq!(stress_sequential_roundtrips(&config).mismatches, 0);
    assert_eq!(stress_concurrent_roundtrips(&config).mismatches, 0);
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn roundtrip(record in session_record_strategy()) {
        let encoded = record.encode();
        prop_assert_eq!(encoded.len(), record.encoded_len());
        let decoded = SessionRecord::from_bytes(&encoded).unwrap();
        prop_assert_eq!(&decoded, &record);
    }

    #[test]
    fn clean_cuts_decode_to_prefix(record in session_record_strategy()) {
        let encoded = record.encode();
        for cut in field_boundaries(&record) {
            let prefix = SessionRecord::from_bytes(&encoded[..cut]).unwrap();
            prop_assert_eq!(&prefix.encode()[..], &encoded[..cut]);
        }
    }

    #[test]
    fn mid_field_cuts_fail(record in session_record_strategy()) {
        let encoded = record.encode();
        let boundaries = field_boundaries(&record);
        for cut in 0..encoded.len() {
            if boundaries.contains(&cut) {
                continue;
            }
            let err = SessionRecord::from_bytes(&encoded[..cut]).unwrap_err();
            prop_assert!(err.is_truncation(), "cut {} gave {}", cut, err);
        }
    }

    #[test]
    fn unknown_tags_between_fields_are_ignored(
        record in session_record_strategy(),
        tag in prop_oneof![Just(0u8), Just(8u8), 10u8..128],
    ) {
        let mut spliced = Vec::new();
        for part in split_fields(&record) {
            spliced.push(tag);
            spliced.extend_from_slice(&part.encode());
        }
        spliced.push(tag);
        prop_assert_eq!(SessionRecord::from_bytes(&spliced).unwrap(), record);
    }

    #[test]
    fn retired_tag_at_any_boundary_is_refused(record in session_record_strategy()) {
        let encoded = record.encode();
        for cut in field_boundaries(&record) {
            let mut bytes = encoded[..cut].to_vec();
            bytes.extend_from_slice(&[0x09, 0x01]);
            bytes.extend_from_slice(&encoded[cut..]);
            let err = SessionRecord::from_bytes(&bytes).unwrap_err();
            prop_assert!(err.is_unsupported_format());
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        fuzz_record_decode(&data);
        fuzz_record_decode_limited(&data);
        fuzz_record_roundtrip(&data);
    }
}
