//! Caller-owned translation applied to decoded positions.

use std::cell::Cell;

use crate::error::{RasterError, RasterResult};

/// A translation vector shared between the caller and any number of cursors.
///
/// The offset borrows caller storage as `Cell`s instead of copying it, so one
/// [`RasterCode`](crate::RasterCode) can be walked at many translations. Every
/// copy of an `Offset` aliases the same cells: a write through one copy is seen
/// by all cursors holding another. Cursors apply the offset while decoding a
/// run, so a change made mid-traversal takes effect from the next run header
/// onwards (dimension 0 from the next run, higher dimensions from the next
/// escape or fragment that rewrites them).
///
/// `Offset` is `!Sync`; threads that walk the same code need their own offsets.
#[derive(Debug, Clone, Copy)]
pub struct Offset<'a> {
    repr: Repr<'a>,
}

#[derive(Debug, Clone, Copy)]
enum Repr<'a> {
    Zero(usize),
    Cells(&'a [Cell<i64>]),
}

impl<'a> Offset<'a> {
    /// The identity translation in `dims` dimensions.
    #[must_use]
    pub const fn zero(dims: usize) -> Self {
        Self {
            repr: Repr::Zero(dims),
        }
    }

    /// Shares caller-owned cells as the translation.
    #[must_use]
    pub const fn new(cells: &'a [Cell<i64>]) -> Self {
        Self {
            repr: Repr::Cells(cells),
        }
    }

    /// Borrows a mutable slice as a shared translation for `'a`.
    ///
    /// The slice stays writable through [`set`](Self::set) and
    /// [`translate`](Self::translate) on any copy of the returned offset.
    pub fn from_mut(values: &'a mut [i64]) -> Self {
        Self::new(Cell::from_mut(values).as_slice_of_cells())
    }

    /// Number of dimensions of the translation.
    #[must_use]
    pub const fn dims(&self) -> usize {
        match self.repr {
            Repr::Zero(dims) => dims,
            Repr::Cells(cells) => cells.len(),
        }
    }

    /// Returns `true` for an offset created by [`zero`](Self::zero).
    #[must_use]
    pub const fn is_fixed_zero(&self) -> bool {
        matches!(self.repr, Repr::Zero(_))
    }

    /// Current translation along `dim`; zero outside the offset's range.
    #[inline]
    #[must_use]
    pub fn get(&self, dim: usize) -> i64 {
        match self.repr {
            Repr::Zero(_) => 0,
            Repr::Cells(cells) => cells.get(dim).map_or(0, Cell::get),
        }
    }

    /// Overwrites the translation along `dim`.
    pub fn set(&self, dim: usize, value: i64) -> RasterResult<()> {
        let cell = self.cell(dim)?;
        cell.set(value);
        Ok(())
    }

    /// Adds `delta` component-wise to the translation.
    pub fn translate(&self, delta: &[i64]) -> RasterResult<()> {
        let Repr::Cells(cells) = self.repr else {
            return Err(RasterError::FixedOffset);
        };
        if delta.len() != cells.len() {
            return Err(RasterError::DimensionMismatch {
                expected: cells.len(),
                found: delta.len(),
            });
        }
        for (cell, d) in cells.iter().zip(delta) {
            cell.set(cell.get() + d);
        }
        Ok(())
    }

    /// Snapshot of the current translation.
    #[must_use]
    pub fn to_vec(&self) -> Vec<i64> {
        (0..self.dims()).map(|dim| self.get(dim)).collect()
    }

    pub(crate) fn ensure_dims(&self, dims: usize) -> RasterResult<()> {
        if self.dims() != dims {
            return Err(RasterError::DimensionMismatch {
                expected: dims,
                found: self.dims(),
            });
        }
        Ok(())
    }

    fn cell(&self, dim: usize) -> RasterResult<&'a Cell<i64>> {
        match self.repr {
            Repr::Zero(_) => Err(RasterError::FixedOffset),
            Repr::Cells(cells) => cells.get(dim).ok_or(RasterError::DimensionMismatch {
                expected: cells.len(),
                found: dim + 1,
            }),
        }
    }
}
