//! Forward cursor over a list of raster code fragments.

use crate::code::RasterCode;
use crate::cursor::{CursorState, RegionCursor};
use crate::decode::RunDecoder;
use crate::error::{RasterError, RasterResult};
use crate::offset::Offset;

/// Cursor over an ordered list of [`RasterCode`] fragments sharing one
/// [`Offset`].
///
/// The fragments are walked as if their buffers were concatenated: every
/// position of fragment 0 in its own encoding order, then fragment 1, and so
/// on. Empty fragments are skipped. Fragments are expected to be disjoint but
/// this is not checked; a position present in two fragments is visited twice.
#[derive(Debug, Clone)]
pub struct UnionRasterCodeCursor<'a> {
    fragments: Vec<&'a RasterCode>,
    offset: Offset<'a>,
    decoder: RunDecoder,
    /// Index of the fragment being decoded.
    fragment: usize,
    started: bool,
    consumed: u64,
    len: u64,
}

impl<'a> UnionRasterCodeCursor<'a> {
    /// Creates a cursor over `dims`-dimensional fragments without translation.
    pub fn new<I>(dims: usize, fragments: I) -> RasterResult<Self>
    where
        I: IntoIterator<Item = &'a RasterCode>,
    {
        Self::with_offset(fragments, Offset::zero(dims))
    }

    /// Creates a cursor that adds `offset` to every decoded coordinate.
    ///
    /// The offset fixes the dimensionality; every fragment must match it.
    pub fn with_offset<I>(fragments: I, offset: Offset<'a>) -> RasterResult<Self>
    where
        I: IntoIterator<Item = &'a RasterCode>,
    {
        let dims = offset.dims();
        if dims == 0 {
            return Err(RasterError::InvalidDimensions { dims });
        }
        let fragments: Vec<&'a RasterCode> = fragments.into_iter().collect();
        let mut len = 0u64;
        for fragment in &fragments {
            if fragment.dims() != dims {
                return Err(RasterError::DimensionMismatch {
                    expected: dims,
                    found: fragment.dims(),
                });
            }
            len += fragment.len();
        }
        Ok(Self {
            fragments,
            offset,
            decoder: RunDecoder::new(dims),
            fragment: 0,
            started: false,
            consumed: 0,
            len,
        })
    }

    /// The fragments being walked.
    #[must_use]
    pub fn fragments(&self) -> &[&'a RasterCode] {
        &self.fragments
    }

    /// Index of the fragment the current position belongs to, `None` before
    /// the first advance.
    #[must_use]
    pub const fn fragment_index(&self) -> Option<usize> {
        if self.started {
            Some(self.fragment)
        } else {
            None
        }
    }

    /// The translation applied while decoding.
    #[must_use]
    pub const fn offset(&self) -> Offset<'a> {
        self.offset
    }

    /// Current traversal state.
    #[must_use]
    pub fn state(&self) -> CursorState {
        if !self.started {
            if self.next_non_empty(0).is_some() {
                CursorState::BeforeFirst
            } else {
                CursorState::Empty
            }
        } else if self.has_next() {
            CursorState::InRun
        } else {
            CursorState::Exhausted
        }
    }

    fn next_non_empty(&self, from: usize) -> Option<usize> {
        self.fragments
            .iter()
            .skip(from)
            .position(|fragment| !fragment.is_empty())
            .map(|index| index + from)
    }

    fn enter_fragment(&mut self, index: usize) -> RasterResult<()> {
        let fragment = self.fragments[index];
        let tokens = fragment.tokens();
        self.decoder.load_header(tokens, self.offset)?;
        self.decoder.decode_next_run(tokens, self.offset)?;
        self.fragment = index;
        tracing::trace!(fragment = index, "entered raster code fragment");
        Ok(())
    }
}

impl RegionCursor for UnionRasterCodeCursor<'_> {
    fn dims(&self) -> usize {
        self.offset.dims()
    }

    fn len(&self) -> u64 {
        self.len
    }

    fn consumed(&self) -> u64 {
        self.consumed
    }

    fn reset(&mut self) {
        self.started = false;
        self.fragment = 0;
        self.consumed = 0;
    }

    fn advance(&mut self) -> RasterResult<()> {
        if !self.started {
            let Some(first) = self.next_non_empty(0) else {
                return Err(RasterError::EndOfCode { consumed: 0 });
            };
            self.enter_fragment(first)?;
            self.started = true;
        } else if self.decoder.in_run() {
            self.decoder.step();
        } else {
            let fragment = self.fragments[self.fragment];
            let tokens = fragment.tokens();
            if self.decoder.has_more_tokens(tokens) {
                self.decoder.decode_next_run(tokens, self.offset)?;
            } else if let Some(next) = self.next_non_empty(self.fragment + 1) {
                self.enter_fragment(next)?;
            } else {
                return Err(RasterError::EndOfCode {
                    consumed: self.consumed,
                });
            }
        }
        self.consumed += 1;
        Ok(())
    }

    fn has_next(&self) -> bool {
        if !self.started {
            return self.next_non_empty(0).is_some();
        }
        self.decoder.in_run()
            || self
                .decoder
                .has_more_tokens(self.fragments[self.fragment].tokens())
            || self.next_non_empty(self.fragment + 1).is_some()
    }

    fn position(&self) -> RasterResult<&[i64]> {
        if self.started {
            Ok(self.decoder.position())
        } else {
            Err(RasterError::NoCurrentElement)
        }
    }
}
