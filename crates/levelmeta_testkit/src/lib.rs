//! # levelmeta testkit
//!
//! Test utilities for the session record codec.
//!
//! This crate provides:
//! - Record fixtures and a temporary manifest file
//! - Property-based test generators using proptest
//! - Golden test utilities for format verification
//! - Fault-injecting readers and writers
//! - Fuzz testing harnesses
//! - Stress testing utilities
//! - Cross-implementation test vectors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use levelmeta_testkit::prelude::*;
//!
//! #[test]
//! fn survives_a_file_roundtrip() {
//!     let manifest = TempManifest::new();
//!     manifest.write_record(&scenarios::memtable_flush()).unwrap();
//!     assert_eq!(manifest.read_record().unwrap(), scenarios::memtable_flush());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faults;
pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod golden;
pub mod stress;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faults::*;
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
    pub use crate::stress::*;
    pub use crate::vectors::*;
}

pub use faults::*;
pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use golden::*;
pub use stress::*;
pub use vectors::*;
