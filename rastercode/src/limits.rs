//! Configurable limits for rebuilding codes from raw tokens.

/// Limits enforced when a [`RasterCode`](crate::RasterCode) is rebuilt from an
/// external token buffer.
///
/// Codes produced by [`RasterCodeEncoder`](crate::RasterCodeEncoder) are never
/// checked against limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum dimensionality of a code.
    pub max_dims: usize,

    /// Maximum number of tokens in a code.
    pub max_tokens: usize,

    /// Maximum number of positions a code may describe.
    pub max_points: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dims: 16,
            // 64 MiB of tokens
            max_tokens: 16 * 1024 * 1024,
            max_points: 1 << 40,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_dims: 4,
            max_tokens: 1024,
            max_points: 65_536,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_dims: usize::MAX,
            max_tokens: usize::MAX,
            max_points: u64::MAX,
        }
    }
}
