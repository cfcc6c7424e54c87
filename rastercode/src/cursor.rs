//! Forward cursor over a single raster code.

use crate::code::RasterCode;
use crate::decode::RunDecoder;
use crate::error::{RasterError, RasterResult};
use crate::offset::Offset;

/// Where a cursor stands in its traversal.
///
/// The header and first run are decoded by the first
/// [`advance`](RegionCursor::advance), not by [`reset`](RegionCursor::reset),
/// so a reset cursor over a code with no runs stays `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// The code has no runs; there is nothing to visit and no position.
    Empty,
    /// Positioned in front of the first element.
    BeforeFirst,
    /// Positioned on an element with more to follow.
    InRun,
    /// Positioned on the last element; `advance` fails from here.
    Exhausted,
}

/// Forward traversal shared by the single-code and union cursors.
///
/// Cursors follow a two-phase protocol: after construction or
/// [`reset`](Self::reset) they stand in front of the first element, and
/// [`advance`](Self::advance) moves onto the next one.
pub trait RegionCursor {
    /// Dimensionality of the decoded positions.
    fn dims(&self) -> usize;

    /// Total number of positions the cursor visits.
    fn len(&self) -> u64;

    /// Number of successful advances since the last reset.
    fn consumed(&self) -> u64;

    /// Returns to the position in front of the first element.
    fn reset(&mut self);

    /// Moves onto the next element.
    fn advance(&mut self) -> RasterResult<()>;

    /// Returns `true` if [`advance`](Self::advance) would succeed.
    fn has_next(&self) -> bool;

    /// The current decoded position, translated by the cursor's offset.
    fn position(&self) -> RasterResult<&[i64]>;

    /// Returns `true` if there is nothing to visit.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of positions left after the current one.
    fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.consumed())
    }

    /// Advances `steps` times.
    ///
    /// Each step goes through [`advance`](Self::advance), so a jump costs
    /// O(`steps`) and never skips whole runs. The range is checked first; an
    /// out-of-range jump leaves the cursor where it was.
    fn jump_fwd(&mut self, steps: u64) -> RasterResult<()> {
        let remaining = self.remaining();
        if steps > remaining {
            return Err(RasterError::JumpOutOfBounds {
                requested: steps,
                remaining,
            });
        }
        for _ in 0..steps {
            self.advance()?;
        }
        Ok(())
    }
}

/// Cursor over one [`RasterCode`], translated by a borrowed [`Offset`].
///
/// Runs are decoded lazily, one at a time. Cloning a cursor copies only its
/// scan state; the clone shares the code and the offset and moves
/// independently of the original.
#[derive(Debug, Clone)]
pub struct RasterCodeCursor<'a> {
    code: &'a RasterCode,
    offset: Offset<'a>,
    decoder: RunDecoder,
    started: bool,
    consumed: u64,
}

impl<'a> RasterCodeCursor<'a> {
    /// Creates a cursor without translation.
    #[must_use]
    pub fn new(code: &'a RasterCode) -> Self {
        Self {
            code,
            offset: Offset::zero(code.dims()),
            decoder: RunDecoder::new(code.dims()),
            started: false,
            consumed: 0,
        }
    }

    /// Creates a cursor that adds `offset` to every decoded coordinate.
    pub fn with_offset(code: &'a RasterCode, offset: Offset<'a>) -> RasterResult<Self> {
        offset.ensure_dims(code.dims())?;
        Ok(Self {
            offset,
            ..Self::new(code)
        })
    }

    /// The code being walked.
    #[must_use]
    pub const fn code(&self) -> &'a RasterCode {
        self.code
    }

    /// The translation applied while decoding.
    #[must_use]
    pub const fn offset(&self) -> Offset<'a> {
        self.offset
    }

    /// Current traversal state.
    #[must_use]
    pub fn state(&self) -> CursorState {
        match (self.started, self.code.is_empty()) {
            (false, true) => CursorState::Empty,
            (false, false) => CursorState::BeforeFirst,
            (true, _) if self.has_next() => CursorState::InRun,
            (true, _) => CursorState::Exhausted,
        }
    }
}

impl RegionCursor for RasterCodeCursor<'_> {
    fn dims(&self) -> usize {
        self.code.dims()
    }

    fn len(&self) -> u64 {
        self.code.len()
    }

    fn consumed(&self) -> u64 {
        self.consumed
    }

    fn reset(&mut self) {
        self.started = false;
        self.consumed = 0;
    }

    fn advance(&mut self) -> RasterResult<()> {
        let code = self.code;
        let tokens = code.tokens();
        if !self.started {
            if tokens.is_empty() {
                return Err(RasterError::EndOfCode { consumed: 0 });
            }
            self.decoder.load_header(tokens, self.offset)?;
            self.decoder.decode_next_run(tokens, self.offset)?;
            self.started = true;
        } else if self.decoder.in_run() {
            self.decoder.step();
        } else if self.decoder.has_more_tokens(tokens) {
            self.decoder.decode_next_run(tokens, self.offset)?;
        } else {
            return Err(RasterError::EndOfCode {
                consumed: self.consumed,
            });
        }
        self.consumed += 1;
        Ok(())
    }

    fn has_next(&self) -> bool {
        if self.started {
            self.decoder.in_run() || self.decoder.has_more_tokens(self.code.tokens())
        } else {
            !self.code.is_empty()
        }
    }

    fn position(&self) -> RasterResult<&[i64]> {
        if self.started {
            Ok(self.decoder.position())
        } else {
            Err(RasterError::NoCurrentElement)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(cursor: &mut RasterCodeCursor<'_>) -> Vec<Vec<i64>> {
        let mut out = Vec::new();
        while cursor.has_next() {
            cursor.advance().unwrap();
            out.push(cursor.position().unwrap().to_vec());
        }
        out
    }

    #[test]
    fn empty_code_has_nothing() {
        let code = RasterCode::empty(2);
        let mut cursor = code.cursor();
        assert_eq!(cursor.state(), CursorState::Empty);
        assert!(!cursor.has_next());
        assert_eq!(cursor.position(), Err(RasterError::NoCurrentElement));
        assert_eq!(cursor.advance(), Err(RasterError::EndOfCode { consumed: 0 }));
        cursor.reset();
        assert!(!cursor.has_next());
    }

    #[test]
    fn position_before_first_advance_fails() {
        let code = RasterCode::from_positions(1, &[[0]]);
        let cursor = code.cursor();
        assert_eq!(cursor.state(), CursorState::BeforeFirst);
        assert_eq!(cursor.position(), Err(RasterError::NoCurrentElement));
    }

    #[test]
    fn walks_runs_and_escapes() {
        let positions = vec![vec![0, 0, 0], vec![1, 0, 0], vec![0, 1, 0]];
        let code = RasterCode::from_positions(3, &positions);
        let mut cursor = code.cursor();
        assert_eq!(collect(&mut cursor), positions);
        assert_eq!(cursor.state(), CursorState::Exhausted);
        assert_eq!(cursor.consumed(), 3);
        assert_eq!(cursor.advance(), Err(RasterError::EndOfCode { consumed: 3 }));
        assert_eq!(cursor.position().unwrap(), &[0, 1, 0]);
    }

    #[test]
    fn state_moves_through_run() {
        let code = RasterCode::from_positions(2, &[[0, 0], [1, 0]]);
        let mut cursor = code.cursor();
        cursor.advance().unwrap();
        assert_eq!(cursor.state(), CursorState::InRun);
        cursor.advance().unwrap();
        assert_eq!(cursor.state(), CursorState::Exhausted);
    }

    #[test]
    fn reset_returns_to_before_first() {
        let code = RasterCode::from_positions(1, &[[0], [1]]);
        let mut cursor = code.cursor();
        cursor.jump_fwd(2).unwrap();
        assert_eq!(cursor.state(), CursorState::Exhausted);
        cursor.reset();
        assert_eq!(cursor.state(), CursorState::BeforeFirst);
        assert_eq!(cursor.position(), Err(RasterError::NoCurrentElement));

        let empty = RasterCode::empty(1);
        let mut cursor = empty.cursor();
        cursor.reset();
        assert_eq!(cursor.state(), CursorState::Empty);
        assert_eq!(cursor.position(), Err(RasterError::NoCurrentElement));
    }

    #[test]
    fn offset_overflow_is_an_error() {
        let code = RasterCode::from_positions(1, &[[0], [1]]);
        let mut values = [i64::MAX];
        let mut cursor = code.cursor_with_offset(Offset::from_mut(&mut values)).unwrap();
        assert_eq!(
            cursor.advance(),
            Err(RasterError::CoordinateOverflow { index: 1, dim: 0 })
        );
        assert_eq!(cursor.state(), CursorState::BeforeFirst);
    }

    #[test]
    fn reset_restarts_traversal() {
        let code = RasterCode::from_positions(2, &[[3, 1], [4, 1], [9, 2]]);
        let mut cursor = code.cursor();
        let first = collect(&mut cursor);
        cursor.reset();
        assert_eq!(cursor.consumed(), 0);
        assert_eq!(collect(&mut cursor), first);
    }

    #[test]
    fn offset_translates_positions() {
        let code = RasterCode::from_positions(2, &[[0, 0], [1, 0], [0, 1]]);
        let mut values = [10, -3];
        let offset = Offset::from_mut(&mut values);
        let mut cursor = code.cursor_with_offset(offset).unwrap();
        assert_eq!(
            collect(&mut cursor),
            vec![vec![10, -3], vec![11, -3], vec![10, -2]]
        );
    }

    #[test]
    fn offset_change_applies_from_next_run() {
        let code = RasterCode::from_positions(2, &[[0, 0], [1, 0], [0, 1], [1, 1]]);
        let mut values = [0, 0];
        let offset = Offset::from_mut(&mut values);
        let mut cursor = code.cursor_with_offset(offset).unwrap();
        cursor.advance().unwrap();
        offset.translate(&[100, 100]).unwrap();
        cursor.advance().unwrap();
        assert_eq!(cursor.position().unwrap(), &[1, 0]);
        cursor.advance().unwrap();
        assert_eq!(cursor.position().unwrap(), &[100, 101]);
    }

    #[test]
    fn offset_dimension_mismatch_is_rejected() {
        let code = RasterCode::from_positions(2, &[[0, 0]]);
        let mut values = [0, 0, 0];
        let result = RasterCodeCursor::with_offset(&code, Offset::from_mut(&mut values));
        assert!(matches!(
            result,
            Err(RasterError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn jump_matches_repeated_advance() {
        let code = RasterCode::from_positions(2, &[[0, 0], [1, 0], [2, 0], [5, 0], [0, 3]]);
        for steps in 1..=code.len() {
            let mut stepped = code.cursor();
            for _ in 0..steps {
                stepped.advance().unwrap();
            }
            let mut jumped = code.cursor();
            jumped.jump_fwd(steps).unwrap();
            assert_eq!(jumped.position().unwrap(), stepped.position().unwrap());
        }
    }

    #[test]
    fn jump_zero_is_noop() {
        let code = RasterCode::from_positions(1, &[[0], [1]]);
        let mut cursor = code.cursor();
        cursor.jump_fwd(0).unwrap();
        assert_eq!(cursor.state(), CursorState::BeforeFirst);
    }

    #[test]
    fn jump_out_of_bounds_leaves_cursor() {
        let code = RasterCode::from_positions(1, &[[0], [1], [2]]);
        let mut cursor = code.cursor();
        cursor.advance().unwrap();
        assert_eq!(
            cursor.jump_fwd(3),
            Err(RasterError::JumpOutOfBounds {
                requested: 3,
                remaining: 2
            })
        );
        assert_eq!(cursor.position().unwrap(), &[0]);
        cursor.jump_fwd(2).unwrap();
        assert_eq!(cursor.position().unwrap(), &[2]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn clone_is_independent() {
        let code = RasterCode::from_positions(2, &[[0, 0], [1, 0], [0, 1]]);
        let mut original = code.cursor();
        original.advance().unwrap();
        let mut copy = original.clone();
        copy.advance().unwrap();
        copy.advance().unwrap();
        assert_eq!(original.position().unwrap(), &[0, 0]);
        assert_eq!(copy.position().unwrap(), &[0, 1]);
        original.advance().unwrap();
        assert_eq!(original.position().unwrap(), &[1, 0]);
        assert_eq!(copy.position().unwrap(), &[0, 1]);
    }
}
