//! Fuzz testing harnesses for the session record codec.
//!
//! These targets can be driven by cargo-fuzz or by proptest with arbitrary
//! byte vectors.

use levelmeta_codec::{decode_record, DecodeConfig, RecordDecoder, SessionRecord};

/// Fuzz target for record decoding.
///
/// Arbitrary bytes must either decode or return an error, never panic.
pub fn fuzz_record_decode(data: &[u8]) {
    let _ = decode_record(data);
}

/// Fuzz target for record decoding under a tight length limit.
pub fn fuzz_record_decode_limited(data: &[u8]) {
    let mut record = SessionRecord::new();
    let _ = RecordDecoder::with_config(data, DecodeConfig::new().max_bytes_len(16))
        .decode_into(&mut record);
}

/// Fuzz target for record roundtrip.
///
/// Whatever decodes must re-encode to bytes that decode to the same record,
/// and re-encoding again must be byte-stable.
pub fn fuzz_record_roundtrip(data: &[u8]) {
    if let Ok(record) = decode_record(data) {
        let encoded = record.encode();
        let decoded = decode_record(&encoded).expect("canonical encoding must decode");
        assert_eq!(decoded, record, "Roundtrip mismatch");
        assert_eq!(decoded.encode(), encoded, "Re-encoding is not stable");
    }
}
