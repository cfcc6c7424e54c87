//! Incremental raster code encoder.

use crate::code::{Bounds, RasterCode};

/// Builds a [`RasterCode`] from positions delivered in canonical scan order.
///
/// Positions must arrive with dimension 0 varying fastest: inside a run,
/// dimension 0 grows by exactly one between calls and dimensions `1..n` stay
/// fixed. Any change in a higher dimension, or a gap along dimension 0, starts a
/// new run. The order is a caller contract and is not checked; feeding
/// positions out of order produces a code that decodes to a different
/// sequence. The same holds for `base_x`, which must not exceed any dimension-0
/// coordinate passed to [`add`](Self::add).
///
/// `base_x` is stored as a 32-bit token, as are all coordinates relative to it
/// and the absolute values of dimensions `1..n`. Values outside the `i32` range
/// are truncated.
#[derive(Debug)]
pub struct RasterCodeEncoder {
    dims: usize,
    base_x: i64,
    tokens: Vec<i32>,
    /// Last position added.
    prev: Vec<i64>,
    /// Dimension-0 start of the open run.
    run_start: i64,
    len: u64,
    bounds: Option<Bounds>,
}

impl RasterCodeEncoder {
    /// Creates an encoder for `dims`-dimensional positions.
    ///
    /// # Panics
    ///
    /// Panics if `dims` is zero.
    #[must_use]
    pub fn new(dims: usize, base_x: i64) -> Self {
        Self::with_capacity(dims, base_x, 0)
    }

    /// Creates an encoder with room for `tokens` tokens.
    ///
    /// # Panics
    ///
    /// Panics if `dims` is zero.
    #[must_use]
    pub fn with_capacity(dims: usize, base_x: i64, tokens: usize) -> Self {
        assert!(dims > 0, "raster codes need at least one dimension");
        Self {
            dims,
            base_x,
            tokens: Vec::with_capacity(tokens),
            prev: vec![0; dims],
            run_start: 0,
            len: 0,
            bounds: None,
        }
    }

    /// Dimensionality of the encoded positions.
    #[must_use]
    pub const fn dims(&self) -> usize {
        self.dims
    }

    /// Number of positions added so far.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if no position was added yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bounding box of the positions added so far.
    #[must_use]
    pub const fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    /// Appends one position.
    ///
    /// `position` must follow the previous position in canonical scan order.
    /// Order is not checked.
    ///
    /// # Panics
    ///
    /// Panics if `position` does not have [`dims`](Self::dims) coordinates.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add(&mut self, position: &[i64]) {
        assert_eq!(
            position.len(),
            self.dims,
            "position has {} coordinates, encoder expects {}",
            position.len(),
            self.dims
        );

        self.len += 1;
        match &mut self.bounds {
            Some(bounds) => bounds.include(position),
            None => self.bounds = Some(Bounds::point(position)),
        }

        if self.len == 1 {
            self.tokens.push(self.base_x as i32);
            self.tokens
                .extend(position[1..].iter().map(|&value| value as i32));
            self.run_start = position[0];
            self.prev.copy_from_slice(position);
            return;
        }

        let changed = (1..self.dims)
            .rev()
            .find(|&dim| position[dim] != self.prev[dim]);
        match changed {
            None if position[0] == self.prev[0] + 1 => {}
            changed => {
                self.close_run();
                if let Some(dim) = changed {
                    self.tokens.push(-(dim as i32));
                    self.tokens
                        .extend(position[1..=dim].iter().map(|&value| value as i32));
                }
                self.run_start = position[0];
            }
        }
        self.prev.copy_from_slice(position);
    }

    /// Flushes the open run and returns the finished code.
    #[must_use]
    pub fn finish(mut self) -> RasterCode {
        if self.len > 0 {
            self.close_run();
        }
        self.tokens.shrink_to_fit();
        tracing::debug!(
            dims = self.dims,
            points = self.len,
            tokens = self.tokens.len(),
            "raster code finished"
        );
        RasterCode::from_parts(self.dims, self.tokens, self.len, self.bounds)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn close_run(&mut self) {
        self.tokens.push((self.run_start - self.base_x) as i32);
        self.tokens.push((self.prev[0] - self.base_x) as i32);
    }
}
