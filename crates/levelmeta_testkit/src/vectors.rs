//! Byte-exact session record test vectors.
//!
//! Each vector is a hex input, the hex the decoded record re-encodes to, or
//! the error the decoder must report. Vectors serialize to JSON so other
//! manifest readers can be checked against the same bytes.

use levelmeta_codec::{CodecError, SessionRecord};
use serde::{Deserialize, Serialize};

use crate::golden::{hex_decode, hex_encode};

/// A test vector that can be shared across implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Input data (hex-encoded).
    pub input_hex: String,
    /// Re-encoding of the decoded record (hex-encoded).
    pub expected_hex: String,
    /// Expected error message fragment (if this should fail).
    pub expected_error: Option<String>,
}

impl TestVector {
    fn ok(id: &str, description: &str, input_hex: &str, expected_hex: &str) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            input_hex: input_hex.into(),
            expected_hex: expected_hex.into(),
            expected_error: None,
        }
    }

    fn err(id: &str, description: &str, input_hex: &str, expected_error: &str) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            input_hex: input_hex.into(),
            expected_hex: String::new(),
            expected_error: Some(expected_error.into()),
        }
    }

    /// Decode the input bytes.
    ///
    /// # Errors
    ///
    /// Whatever the decoder reports for this input.
    pub fn decode(&self) -> Result<SessionRecord, CodecError> {
        SessionRecord::from_bytes(&hex_decode(&self.input_hex))
    }

    /// Check this vector against the codec, returning a description of the
    /// first mismatch.
    ///
    /// # Errors
    ///
    /// Returns a message when the decoder's behaviour differs from the vector.
    pub fn verify(&self) -> Result<(), String> {
        match (self.decode(), &self.expected_error) {
            (Ok(record), None) => {
                let actual = hex_encode(&record.encode());
                if actual == self.expected_hex {
                    Ok(())
                } else {
                    Err(format!(
                        "{}: expected {}, re-encoded {}",
                        self.id, self.expected_hex, actual
                    ))
                }
            }
            (Err(err), Some(fragment)) if err.to_string().contains(fragment.as_str()) => Ok(()),
            (Err(err), Some(fragment)) => Err(format!(
                "{}: expected error containing {fragment:?}, got {err}",
                self.id
            )),
            (Err(err), None) => Err(format!("{}: unexpected error {err}", self.id)),
            (Ok(record), Some(fragment)) => Err(format!(
                "{}: expected error containing {fragment:?}, decoded {record:?}",
                self.id
            )),
        }
    }
}

/// Vectors for records that decode successfully.
pub fn record_vectors() -> Vec<TestVector> {
    vec![
        TestVector::ok("record_empty", "Empty record", "", ""),
        TestVector::ok(
            "record_log_seq_table",
            "log=7, seq=42, new table level 1 num 3 size 1024 a..z",
            "0207042a07010380080161017a",
            "0207042a07010380080161017a",
        ),
        TestVector::ok(
            "record_comparator",
            "Bytewise comparator name",
            "011a6c6576656c64622e4279746577697365436f6d70617261746f72",
            "011a6c6576656c64622e4279746577697365436f6d70617261746f72",
        ),
        TestVector::ok(
            "record_all_fields",
            "Every field kind, multi-byte varints, key with NUL byte",
            "011a6c6576656c64622e4279746577697365436f6d70617261746f72\
             020503ac020480808080100501036b0001060211070012802001610163",
            "011a6c6576656c64622e4279746577697365436f6d70617261746f72\
             020503ac020480808080100501036b0001060211070012802001610163",
        ),
        TestVector::ok(
            "record_reordered_input",
            "New table before log number re-encodes in canonical order",
            "0700010100000205",
            "0205070001010000",
        ),
        TestVector::ok(
            "record_unknown_tag",
            "Tag 100 is skipped",
            "640205",
            "0205",
        ),
        TestVector::ok(
            "record_retired_tag_8",
            "Tag 8 (large value refs) is skipped",
            "080301",
            "0301",
        ),
        TestVector::ok(
            "record_non_utf8_comparator",
            "Comparator name bytes are kept even when not UTF-8",
            "0102fffe",
            "0102fffe",
        ),
        TestVector::ok(
            "record_wide_level",
            "Deleted table at level 2^32",
            "06808080801001",
            "06808080801001",
        ),
        TestVector::ok(
            "record_boundary_prefix",
            "Prefix ending exactly after the sequence field",
            "0207042a",
            "0207042a",
        ),
    ]
}

/// Vectors for inputs the decoder must reject.
pub fn rejection_vectors() -> Vec<TestVector> {
    vec![
        TestVector::err(
            "reject_prev_log_num",
            "Reserved previous-log-number tag",
            "0905",
            "unsupported database format",
        ),
        TestVector::err(
            "reject_prev_log_num_after_fields",
            "Reserved tag after valid fields",
            "020709",
            "unsupported database format",
        ),
        TestVector::err(
            "reject_truncated_varint",
            "Sequence varint cut after a continuation byte",
            "0480",
            "unexpected end of input",
        ),
        TestVector::err(
            "reject_missing_value",
            "Log number tag with no value",
            "02",
            "unexpected end of input",
        ),
        TestVector::err(
            "reject_truncated_key",
            "Compaction pointer key shorter than its length",
            "0500036162",
            "unexpected end of input",
        ),
        TestVector::err(
            "reject_truncated_new_table",
            "New table missing its largest key",
            "07010380080161",
            "unexpected end of input",
        ),
        TestVector::err(
            "reject_varint_overflow",
            "Eleven-byte varint",
            "02ffffffffffffffffffff01",
            "varint overflows",
        ),
    ]
}

/// Generate all test vectors as JSON for cross-implementation use.
pub fn all_vectors_json() -> String {
    let vectors = AllTestVectors {
        records: record_vectors(),
        rejections: rejection_vectors(),
    };

    serde_json::to_string_pretty(&vectors).expect("Failed to serialize vectors")
}

#[derive(Debug, Serialize, Deserialize)]
struct AllTestVectors {
    records: Vec<TestVector>,
    rejections: Vec<TestVector>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_vectors() {
        for vector in record_vectors() {
            vector.verify().unwrap();
        }
    }

    #[test]
    fn test_rejection_vectors() {
        for vector in rejection_vectors() {
            vector.verify().unwrap();
        }
    }

    #[test]
    fn test_all_vectors_json() {
        let json = all_vectors_json();
        let parsed: AllTestVectors = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.records.len(), record_vectors().len());
        assert_eq!(parsed.rejections.len(), rejection_vectors().len());
        assert!(json.contains("reject_prev_log_num"));
    }
}
