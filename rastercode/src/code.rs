//! The immutable encoded region.

use crate::cursor::RasterCodeCursor;
use crate::decode::Runs;
use crate::encoder::RasterCodeEncoder;
use crate::error::{LimitKind, RasterError, RasterResult};
use crate::limits::Limits;
use crate::offset::Offset;
use crate::position::PositionCursor;

/// Component-wise bounding box of a set of positions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Smallest coordinate per dimension.
    pub min: Vec<i64>,
    /// Largest coordinate per dimension.
    pub max: Vec<i64>,
}

impl Bounds {
    /// Bounding box of a single position.
    #[must_use]
    pub fn point(position: &[i64]) -> Self {
        Self {
            min: position.to_vec(),
            max: position.to_vec(),
        }
    }

    /// Grows the box to cover `position`.
    pub fn include(&mut self, position: &[i64]) {
        for ((min, max), &value) in self.min.iter_mut().zip(&mut self.max).zip(position) {
            *min = (*min).min(value);
            *max = (*max).max(value);
        }
    }

    /// Returns `true` if `position` lies inside the box.
    #[must_use]
    pub fn contains(&self, position: &[i64]) -> bool {
        position.len() == self.min.len()
            && position
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(&value, (&min, &max))| min <= value && value <= max)
    }

    /// Number of dimensions of the box.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.min.len()
    }
}

/// A run-length encoded set of n-dimensional integer positions.
///
/// The code is a flat buffer of `i32` tokens:
///
/// ```text
/// [baseX] [dim 1 .. dim n-1]          header
/// ( [-k  dim 1 .. dim k]? start end )* runs
/// ```
///
/// `start` and `end` are the inclusive dimension-0 bounds of a run, relative to
/// `baseX`. A negative token in front of a run is an escape: the next `k`
/// tokens are the new absolute coordinates of dimensions `1..=k`. The
/// dimensionality is not stored in the buffer.
///
/// Point count and bounding box are cached alongside the tokens. A code is
/// immutable and can be walked by any number of cursors at once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawRasterCode", into = "RawRasterCode")
)]
pub struct RasterCode {
    dims: usize,
    tokens: Vec<i32>,
    len: u64,
    bounds: Option<Bounds>,
}

impl RasterCode {
    pub(crate) const fn from_parts(
        dims: usize,
        tokens: Vec<i32>,
        len: u64,
        bounds: Option<Bounds>,
    ) -> Self {
        Self {
            dims,
            tokens,
            len,
            bounds,
        }
    }

    /// An empty code in `dims` dimensions.
    #[must_use]
    pub const fn empty(dims: usize) -> Self {
        Self::from_parts(dims, Vec::new(), 0, None)
    }

    /// Encodes positions that are already in canonical scan order.
    ///
    /// `baseX` is the smallest dimension-0 coordinate among `positions`.
    ///
    /// # Panics
    ///
    /// Panics if `dims` is zero.
    #[must_use]
    pub fn from_positions<P: AsRef<[i64]>>(dims: usize, positions: &[P]) -> Self {
        let base_x = positions
            .iter()
            .map(|position| position.as_ref()[0])
            .min()
            .unwrap_or(0);
        let mut encoder = RasterCodeEncoder::new(dims, base_x);
        for position in positions {
            encoder.add(position.as_ref());
        }
        encoder.finish()
    }

    /// Rebuilds a code from a raw token buffer.
    ///
    /// The buffer is walked once to check its structure and to recompute the
    /// point count and bounding box.
    pub fn from_tokens(dims: usize, tokens: Vec<i32>, limits: &Limits) -> RasterResult<Self> {
        if dims == 0 {
            return Err(RasterError::InvalidDimensions { dims });
        }
        if dims > limits.max_dims {
            return Err(RasterError::LimitsExceeded {
                kind: LimitKind::Dimensions,
                limit: limits.max_dims as u64,
                actual: dims as u64,
            });
        }
        if tokens.len() > limits.max_tokens {
            return Err(RasterError::LimitsExceeded {
                kind: LimitKind::Tokens,
                limit: limits.max_tokens as u64,
                actual: tokens.len() as u64,
            });
        }

        let mut len = 0u64;
        let mut bounds: Option<Bounds> = None;
        for run in Runs::new(dims, &tokens) {
            let run = run?;
            len = len.saturating_add(run.len());
            if len > limits.max_points {
                return Err(RasterError::LimitsExceeded {
                    kind: LimitKind::Points,
                    limit: limits.max_points,
                    actual: len,
                });
            }
            let last = run.last();
            match &mut bounds {
                Some(bounds) => bounds.include(&run.start),
                None => bounds = Some(Bounds::point(&run.start)),
            }
            if let Some(bounds) = &mut bounds {
                bounds.include(&last);
            }
        }
        Ok(Self::from_parts(dims, tokens, len, bounds))
    }

    /// Dimensionality of the encoded positions.
    #[must_use]
    pub const fn dims(&self) -> usize {
        self.dims
    }

    /// Number of encoded positions.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if the code holds no position.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Bounding box of the encoded positions, `None` for an empty code.
    #[must_use]
    pub const fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    /// The raw token buffer.
    #[must_use]
    pub fn tokens(&self) -> &[i32] {
        &self.tokens
    }

    /// Consumes the code and returns its token buffer.
    #[must_use]
    pub fn into_tokens(self) -> Vec<i32> {
        self.tokens
    }

    /// The header's dimension-0 base, `None` for an empty code.
    #[must_use]
    pub fn base_x(&self) -> Option<i32> {
        self.tokens.first().copied()
    }

    /// Iterates over the runs of the code without translation.
    #[must_use]
    pub fn runs(&self) -> Runs<'_> {
        Runs::new(self.dims, &self.tokens)
    }

    /// Number of runs. Walks the whole buffer.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs().take_while(Result::is_ok).count()
    }

    /// A cursor over the code without translation.
    #[must_use]
    pub fn cursor(&self) -> RasterCodeCursor<'_> {
        RasterCodeCursor::new(self)
    }

    /// A cursor over the code translated by `offset`.
    pub fn cursor_with_offset<'a>(
        &'a self,
        offset: Offset<'a>,
    ) -> RasterResult<RasterCodeCursor<'a>> {
        RasterCodeCursor::with_offset(self, offset)
    }

    /// Iterates over the encoded positions without translation.
    #[must_use]
    pub fn positions(&self) -> PositionCursor<RasterCodeCursor<'_>> {
        PositionCursor::new(self.cursor())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawRasterCode {
    dims: usize,
    tokens: Vec<i32>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRasterCode> for RasterCode {
    type Error = RasterError;

    fn try_from(raw: RawRasterCode) -> RasterResult<Self> {
        Self::from_tokens(raw.dims, raw.tokens, &Limits::default())
    }
}

#[cfg(feature = "serde")]
impl From<RasterCode> for RawRasterCode {
    fn from(code: RasterCode) -> Self {
        Self {
            dims: code.dims,
            tokens: code.tokens,
        }
    }
}
