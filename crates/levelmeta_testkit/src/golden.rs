//! Golden files for the session record format.
//!
//! A golden file holds the exact bytes (or rendered text) a record must
//! produce. Any change to the wire layout shows up as a failed comparison
//! here before it reaches a real manifest.

use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that turns comparisons into rewrites.
pub const UPDATE_GOLDEN_ENV: &str = "UPDATE_GOLDEN";

/// A named group of golden files in one directory.
///
/// Files are named `<name>_<case>.golden` (or `<name>.golden` for an empty
/// case).
pub struct GoldenTest {
    name: String,
    dir: PathBuf,
    update: bool,
}

/// How a golden comparison turned out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoldenOutcome {
    /// File contents equal the actual output.
    Match,
    /// File contents differ from the actual output.
    Mismatch {
        /// Bytes stored in the golden file.
        expected: Vec<u8>,
    },
    /// No golden file exists yet.
    Missing,
    /// The file was (re)written from the actual output.
    Updated,
}

impl GoldenTest {
    /// Golden files for `name` stored under `dir`.
    pub fn new(name: impl Into<String>, dir: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            dir: dir.as_ref().to_path_buf(),
            update: std::env::var_os(UPDATE_GOLDEN_ENV).is_some(),
        }
    }

    /// Golden files under `docs/test_vectors/` at the workspace root.
    pub fn with_default_dir(name: impl Into<String>) -> Self {
        let workspace = Path::new(env!("CARGO_MANIFEST_DIR"))
            .ancestors()
            .nth(2)
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self::new(name, workspace.join("docs").join("test_vectors"))
    }

    /// Path of the golden file for `case`.
    pub fn path(&self, case: &str) -> PathBuf {
        if case.is_empty() {
            self.dir.join(format!("{}.golden", self.name))
        } else {
            self.dir.join(format!("{}_{}.golden", self.name, case))
        }
    }

    /// Compare `actual` with the golden file for `case` without panicking.
    ///
    /// In update mode the file is rewritten and [`GoldenOutcome::Updated`]
    /// returned.
    ///
    /// # Errors
    ///
    /// I/O errors other than a missing file.
    pub fn compare(&self, case: &str, actual: &[u8]) -> std::io::Result<GoldenOutcome> {
        let path = self.path(case);
        if self.update {
            fs::create_dir_all(&self.dir)?;
            fs::write(&path, actual)?;
            return Ok(GoldenOutcome::Updated);
        }
        match fs::read(&path) {
            Ok(expected) if expected == actual => Ok(GoldenOutcome::Match),
            Ok(expected) => Ok(GoldenOutcome::Mismatch { expected }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(GoldenOutcome::Missing),
            Err(e) => Err(e),
        }
    }

    /// Panic unless `actual` equals the golden bytes for `case`.
    pub fn assert_bytes(&self, case: &str, actual: &[u8]) {
        self.check(case, actual, |bytes| hex_encode(bytes));
    }

    /// Panic unless `actual` equals the golden text for `case`.
    pub fn assert_text(&self, case: &str, actual: &str) {
        self.check(case, actual.as_bytes(), |bytes| {
            String::from_utf8_lossy(bytes).into_owned()
        });
    }

    fn check(&self, case: &str, actual: &[u8], render: impl Fn(&[u8]) -> String) {
        let path = self.path(case);
        let outcome = self
            .compare(case, actual)
            .unwrap_or_else(|e| panic!("cannot access golden file {}: {e}", path.display()));
        match outcome {
            GoldenOutcome::Match | GoldenOutcome::Updated => {}
            GoldenOutcome::Missing => panic!(
                "golden file {} is missing; set {UPDATE_GOLDEN_ENV}=1 to create it\nactual: {}",
                path.display(),
                render(actual)
            ),
            GoldenOutcome::Mismatch { expected } => panic!(
                "golden mismatch for {}/{case}\nexpected: {}\nactual:   {}\nset {UPDATE_GOLDEN_ENV}=1 to accept",
                self.name,
                render(&expected),
                render(actual)
            ),
        }
    }
}

/// Lowercase hex without separators.
pub fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Parse hex, ignoring ASCII whitespace. Panics on malformed input.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let digits: Vec<u8> = hex
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    assert!(digits.len() % 2 == 0, "odd number of hex digits");
    digits
        .chunks_exact(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).expect("hex digits are ASCII");
            u8::from_str_radix(pair, 16).expect("invalid hex digit")
        })
        .collect()
}
