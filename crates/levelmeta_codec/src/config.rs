//! Decoder configuration.

/// Default cap on a single length-prefixed field. 256 MB is far beyond
/// any real key or comparator name.
pub const DEFAULT_MAX_BYTES_LEN: u64 = 256 * 1024 * 1024;

/// Limits applied while decoding untrusted manifest bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Largest length-prefixed payload (comparator name or key) accepted.
    pub max_bytes_len: u64,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_bytes_len: DEFAULT_MAX_BYTES_LEN,
        }
    }
}

impl DecodeConfig {
    /// Creates a configuration with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the largest accepted length-prefixed payload.
    #[must_use]
    pub const fn max_bytes_len(mut self, value: u64) -> Self {
        self.max_bytes_len = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_default() {
        assert_eq!(DecodeConfig::new().max_bytes_len, DEFAULT_MAX_BYTES_LEN);
        assert_eq!(DecodeConfig::new().max_bytes_len(16).max_bytes_len, 16);
    }
}
