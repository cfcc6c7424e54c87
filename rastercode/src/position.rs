//! Owned positions and iterator adapters over cursors.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Deref, DerefMut};

use crate::cursor::RegionCursor;
use crate::error::RasterResult;
use crate::union::UnionRasterCodeCursor;

/// An owned n-dimensional integer position.
///
/// Positions handed out by a [`PositionCursor`] are independent copies: they
/// can be kept and modified while the cursor moves on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position(Vec<i64>);

impl Position {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(coords: Vec<i64>) -> Self {
        Self(coords)
    }

    /// Number of coordinates.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    /// Returns the coordinates as a vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }

    /// Returns this position shifted by `delta`.
    #[must_use]
    pub fn translated(&self, delta: &[i64]) -> Self {
        Self(self.0.iter().zip(delta).map(|(a, b)| a + b).collect())
    }
}

impl Deref for Position {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        &self.0
    }
}

impl DerefMut for Position {
    fn deref_mut(&mut self) -> &mut [i64] {
        &mut self.0
    }
}

impl AsRef<[i64]> for Position {
    fn as_ref(&self) -> &[i64] {
        &self.0
    }
}

impl From<Vec<i64>> for Position {
    fn from(coords: Vec<i64>) -> Self {
        Self(coords)
    }
}

impl From<&[i64]> for Position {
    fn from(coords: &[i64]) -> Self {
        Self(coords.to_vec())
    }
}

impl From<Position> for Vec<i64> {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, coord) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{coord}")?;
        }
        write!(f, ")")
    }
}

/// Iterator adapter yielding each decoded position as an owned [`Position`].
///
/// The adapter keeps the two-phase cursor underneath: [`current`](Self::current)
/// re-reads the last position returned by `next`. A decode error is yielded
/// once as `Some(Err(..))`, after which iteration stops until
/// [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct PositionCursor<C> {
    cursor: C,
    failed: bool,
}

/// [`PositionCursor`] over a list of fragments.
pub type UnionPositionCursor<'a> = PositionCursor<UnionRasterCodeCursor<'a>>;

impl<C: RegionCursor> PositionCursor<C> {
    /// Wraps a cursor. Iteration continues from the cursor's current state.
    pub const fn new(cursor: C) -> Self {
        Self {
            cursor,
            failed: false,
        }
    }

    /// The wrapped cursor.
    pub const fn cursor(&self) -> &C {
        &self.cursor
    }

    /// Unwraps the cursor.
    pub fn into_inner(self) -> C {
        self.cursor
    }

    /// Copy of the current position.
    pub fn current(&self) -> RasterResult<Position> {
        self.cursor.position().map(Position::from)
    }

    /// Returns `true` if another position follows.
    pub fn has_next(&self) -> bool {
        !self.failed && self.cursor.has_next()
    }

    /// Returns `true` once a decode error has been yielded.
    pub const fn failed(&self) -> bool {
        self.failed
    }

    /// Restarts iteration from the first position.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.failed = false;
    }

    /// Skips `steps` positions; see [`RegionCursor::jump_fwd`].
    pub fn jump_fwd(&mut self, steps: u64) -> RasterResult<()> {
        self.cursor.jump_fwd(steps)
    }
}

impl<C: RegionCursor> Iterator for PositionCursor<C> {
    type Item = RasterResult<Position>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let result = self.cursor.advance().and_then(|()| self.current());
        self.failed = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if !self.has_next() {
            return (0, Some(0));
        }
        // A malformed code may fail before `remaining` positions are decoded.
        (1, usize::try_from(self.cursor.remaining()).ok())
    }
}

impl<C: RegionCursor> FusedIterator for PositionCursor<C> {}
