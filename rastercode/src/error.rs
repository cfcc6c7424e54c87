//! Error types for raster code operations.

use std::fmt;

/// Result type for raster code operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors that can occur while building, validating or traversing raster codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// A position was requested before the first successful advance.
    NoCurrentElement,

    /// Attempted to advance past the last encoded position.
    EndOfCode {
        /// Number of positions consumed so far.
        consumed: u64,
    },

    /// Attempted to jump past the last encoded position.
    JumpOutOfBounds {
        /// Number of steps requested.
        requested: u64,
        /// Number of positions still available.
        remaining: u64,
    },

    /// A token was read past the end of the buffer.
    TruncatedCode {
        /// Index of the missing token.
        index: usize,
        /// Length of the token buffer.
        len: usize,
    },

    /// An escape marker names a dimension the code does not have.
    InvalidEscape {
        /// Index of the escape token.
        index: usize,
        /// Highest changed dimension named by the escape.
        changed: usize,
        /// Dimensionality of the code.
        dims: usize,
    },

    /// A run ends before it starts.
    InvalidRun {
        /// Index of the run start token.
        index: usize,
        /// Relative run start.
        start: i32,
        /// Relative run end.
        end: i32,
    },

    /// A stored coordinate plus its offset does not fit in an `i64`.
    CoordinateOverflow {
        /// Index of the token being translated.
        index: usize,
        /// Dimension of the coordinate.
        dim: usize,
    },

    /// Dimensionality of an offset or fragment disagrees with the cursor.
    DimensionMismatch { expected: usize, found: usize },

    /// A code must have at least one dimension.
    InvalidDimensions { dims: usize },

    /// The zero offset is not backed by caller storage and cannot be modified.
    FixedOffset,

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: u64,
        actual: u64,
    },
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Dimensions,
    Tokens,
    Points,
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCurrentElement => write!(f, "cursor has no current element"),
            Self::EndOfCode { consumed } => {
                write!(f, "no position left to advance to after {consumed} positions")
            }
            Self::JumpOutOfBounds {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "jump of {requested} positions out of bounds, only {remaining} remaining"
                )
            }
            Self::TruncatedCode { index, len } => {
                write!(f, "token {index} read past end of code with {len} tokens")
            }
            Self::InvalidEscape {
                index,
                changed,
                dims,
            } => {
                write!(
                    f,
                    "escape at token {index} changes dimension {changed} of a {dims}-dimensional code"
                )
            }
            Self::InvalidRun { index, start, end } => {
                write!(f, "run at token {index} ends at {end} before its start {start}")
            }
            Self::CoordinateOverflow { index, dim } => {
                write!(f, "token {index} overflows dimension {dim} when translated")
            }
            Self::DimensionMismatch { expected, found } => {
                write!(
                    f,
                    "dimension mismatch: expected {expected} dimensions, found {found}"
                )
            }
            Self::InvalidDimensions { dims } => {
                write!(f, "invalid dimensionality {dims}, at least 1 is required")
            }
            Self::FixedOffset => write!(f, "the zero offset cannot be modified"),
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dimensions => "dimensions",
            Self::Tokens => "tokens",
            Self::Points => "points",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for RasterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_no_current_element() {
        let msg = RasterError::NoCurrentElement.to_string();
        assert!(msg.contains("no current element"));
    }

    #[test]
    fn error_display_jump_out_of_bounds() {
        let err = RasterError::JumpOutOfBounds {
            requested: 12,
            remaining: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("12"), "should mention requested steps");
        assert!(msg.contains('5'), "should mention remaining positions");
    }

    #[test]
    fn error_display_truncated_code() {
        let err = RasterError::TruncatedCode { index: 7, len: 7 };
        let msg = err.to_string();
        assert!(msg.contains("token 7"));
        assert!(msg.contains("7 tokens"));
    }

    #[test]
    fn error_display_invalid_escape() {
        let err = RasterError::InvalidEscape {
            index: 4,
            changed: 3,
            dims: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("dimension 3"));
        assert!(msg.contains("2-dimensional"));
    }

    #[test]
    fn error_display_coordinate_overflow() {
        let err = RasterError::CoordinateOverflow { index: 3, dim: 0 };
        assert_eq!(
            err.to_string(),
            "token 3 overflows dimension 0 when translated"
        );
    }

    #[test]
    fn error_display_limits_exceeded() {
        let err = RasterError::LimitsExceeded {
            kind: LimitKind::Tokens,
            limit: 16,
            actual: 20,
        };
        assert_eq!(err.to_string(), "tokens limit exceeded: 20 > 16");
    }

    #[test]
    fn error_equality() {
        let err1 = RasterError::EndOfCode { consumed: 3 };
        let err2 = RasterError::EndOfCode { consumed: 3 };
        let err3 = RasterError::EndOfCode { consumed: 4 };
        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<RasterError>();
    }
}
