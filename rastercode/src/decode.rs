//! Run-level decoding shared by every cursor.

use crate::error::{RasterError, RasterResult};
use crate::offset::Offset;

/// Decode state for one token buffer: the current position, the inclusive end
/// of the current run along dimension 0, and the index of the next token.
///
/// The decoder does not own the buffer, so one decoder can be moved from
/// fragment to fragment by reloading the header.
#[derive(Debug, Clone)]
pub(crate) struct RunDecoder {
    pos: Vec<i64>,
    base_x: i64,
    run_end: i64,
    idx: usize,
}

impl RunDecoder {
    /// Creates a decoder for `dims`-dimensional codes. `dims` is at least 1.
    pub(crate) fn new(dims: usize) -> Self {
        Self {
            pos: vec![0; dims.max(1)],
            base_x: 0,
            run_end: 0,
            idx: 0,
        }
    }

    pub(crate) fn position(&self) -> &[i64] {
        &self.pos
    }

    pub(crate) const fn run_end(&self) -> i64 {
        self.run_end
    }

    /// Index of the next unread token.
    pub(crate) const fn token_index(&self) -> usize {
        self.idx
    }

    pub(crate) fn in_run(&self) -> bool {
        self.pos[0] < self.run_end
    }

    /// Moves one step along dimension 0 inside the current run.
    #[inline]
    pub(crate) fn step(&mut self) {
        self.pos[0] += 1;
    }

    pub(crate) const fn has_more_tokens(&self, tokens: &[i32]) -> bool {
        self.idx < tokens.len()
    }

    /// Reads the header (`baseX` and the initial values of dimensions
    /// `1..dims`) and leaves the decoder in front of the first run.
    pub(crate) fn load_header(&mut self, tokens: &[i32], offset: Offset<'_>) -> RasterResult<()> {
        self.idx = 0;
        self.base_x = i64::from(self.read(tokens)?);
        for dim in 1..self.pos.len() {
            self.pos[dim] = self.read_translated(tokens, dim, offset.get(dim))?;
        }
        Ok(())
    }

    /// Reads the next run, consuming an escape marker and its coordinates
    /// first if present. Returns the highest dimension the escape rewrote, or
    /// zero when the run only moved along dimension 0.
    pub(crate) fn decode_next_run(
        &mut self,
        tokens: &[i32],
        offset: Offset<'_>,
    ) -> RasterResult<usize> {
        let dims = self.pos.len();
        let mut start_index = self.idx;
        let mut token = self.read(tokens)?;
        let mut changed = 0;
        if token < 0 {
            changed = token.unsigned_abs() as usize;
            if changed >= dims {
                return Err(RasterError::InvalidEscape {
                    index: start_index,
                    changed,
                    dims,
                });
            }
            for dim in 1..=changed {
                self.pos[dim] = self.read_translated(tokens, dim, offset.get(dim))?;
            }
            start_index = self.idx;
            token = self.read(tokens)?;
        }
        let end = self.read(tokens)?;
        if end < token {
            return Err(RasterError::InvalidRun {
                index: start_index,
                start: token,
                end,
            });
        }
        let translated = self.base_x.checked_add(offset.get(0)).and_then(|x_offset| {
            Some((
                x_offset.checked_add(i64::from(token))?,
                x_offset.checked_add(i64::from(end))?,
            ))
        });
        let Some((start, run_end)) = translated else {
            return Err(RasterError::CoordinateOverflow {
                index: start_index,
                dim: 0,
            });
        };
        self.pos[0] = start;
        self.run_end = run_end;
        Ok(changed)
    }

    /// Reads an absolute coordinate for `dim` and applies its offset.
    fn read_translated(&mut self, tokens: &[i32], dim: usize, offset: i64) -> RasterResult<i64> {
        let index = self.idx;
        let value = self.read(tokens)?;
        i64::from(value)
            .checked_add(offset)
            .ok_or(RasterError::CoordinateOverflow { index, dim })
    }

    #[inline]
    fn read(&mut self, tokens: &[i32]) -> RasterResult<i32> {
        let token = tokens
            .get(self.idx)
            .copied()
            .ok_or(RasterError::TruncatedCode {
                index: self.idx,
                len: tokens.len(),
            })?;
        self.idx += 1;
        Ok(token)
    }
}

/// One maximal stretch of positions along dimension 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// First position of the run.
    pub start: Vec<i64>,
    /// Inclusive last coordinate along dimension 0.
    pub end: i64,
    /// Highest dimension rewritten by the escape in front of this run, zero if
    /// the run carried no escape.
    pub escape: usize,
}

impl Run {
    /// Number of positions in the run.
    #[must_use]
    pub fn len(&self) -> u64 {
        (self.end - self.start[0]).unsigned_abs() + 1
    }

    /// A run always holds at least one position.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Last position of the run.
    #[must_use]
    pub fn last(&self) -> Vec<i64> {
        let mut last = self.start.clone();
        last[0] = self.end;
        last
    }
}

/// Iterator over the runs of a code, without translation.
///
/// Yields an error at most once, then stops.
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    tokens: &'a [i32],
    decoder: RunDecoder,
    started: bool,
    failed: bool,
}

impl<'a> Runs<'a> {
    pub(crate) fn new(dims: usize, tokens: &'a [i32]) -> Self {
        Self {
            tokens,
            decoder: RunDecoder::new(dims),
            started: false,
            failed: false,
        }
    }

    fn next_run(&mut self) -> RasterResult<Option<Run>> {
        let offset = Offset::zero(0);
        if !self.started {
            self.started = true;
            if self.tokens.is_empty() {
                return Ok(None);
            }
            self.decoder.load_header(self.tokens, offset)?;
            if !self.decoder.has_more_tokens(self.tokens) {
                return Err(RasterError::TruncatedCode {
                    index: self.decoder.token_index(),
                    len: self.tokens.len(),
                });
            }
        }
        if !self.decoder.has_more_tokens(self.tokens) {
            return Ok(None);
        }
        let escape = self.decoder.decode_next_run(self.tokens, offset)?;
        Ok(Some(Run {
            start: self.decoder.position().to_vec(),
            end: self.decoder.run_end(),
            escape,
        }))
    }
}

impl Iterator for Runs<'_> {
    type Item = RasterResult<Run>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_run() {
            Ok(run) => run.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
