//! Run-length raster codes for sets of n-dimensional integer positions.
//!
//! A [`RasterCode`] stores a region as runs along dimension 0, with escape
//! markers whenever a higher dimension changes. [`RasterCodeEncoder`] builds a
//! code from positions in canonical scan order; [`RasterCodeCursor`] and
//! [`UnionRasterCodeCursor`] walk one code or a list of fragments without ever
//! materializing the point set.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Flat buffers** - A code is a `Vec<i32>`; decoding cost follows the runs touched.
//! - **Borrowed translation** - One code is walked at many offsets without re-encoding.
//! - **Explicit errors** - Reading past a buffer or a region returns an error, never panics.
//!
//! # Example
//!
//! ```
//! use rastercode::{Offset, RasterCodeEncoder, RegionCursor};
//!
//! let mut encoder = RasterCodeEncoder::new(2, 0);
//! encoder.add(&[0, 0]);
//! encoder.add(&[1, 0]);
//! encoder.add(&[0, 1]);
//! let code = encoder.finish();
//!
//! let mut shift = [10, 20];
//! let offset = Offset::from_mut(&mut shift);
//! let mut cursor = code.cursor_with_offset(offset).unwrap();
//! cursor.advance().unwrap();
//! assert_eq!(cursor.position().unwrap(), &[10, 20]);
//! cursor.jump_fwd(2).unwrap();
//! assert_eq!(cursor.position().unwrap(), &[10, 21]);
//! assert!(!cursor.has_next());
//! ```

mod code;
mod cursor;
mod decode;
mod encoder;
mod error;
mod limits;
mod offset;
mod position;
mod union;

pub use code::{Bounds, RasterCode};
pub use cursor::{CursorState, RasterCodeCursor, RegionCursor};
pub use decode::{Run, Runs};
pub use encoder::RasterCodeEncoder;
pub use error::{LimitKind, RasterError, RasterResult};
pub use limits::Limits;
pub use offset::Offset;
pub use position::{Position, PositionCursor, UnionPositionCursor};
pub use union::UnionRasterCodeCursor;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let code = RasterCode::empty(1);
        let _ = code.cursor();
        let _ = Limits::default();
        let _ = Offset::zero(1);
        let _: RasterResult<()> = Ok(());
    }

    #[test]
    fn doctest_example() {
        let mut encoder = RasterCodeEncoder::new(2, 0);
        encoder.add(&[0, 0]);
        encoder.add(&[1, 0]);
        encoder.add(&[0, 1]);
        let code = encoder.finish();

        let mut shift = [10, 20];
        let offset = Offset::from_mut(&mut shift);
        let mut cursor = code.cursor_with_offset(offset).unwrap();
        cursor.advance().unwrap();
        assert_eq!(cursor.position().unwrap(), &[10, 20]);
        cursor.jump_fwd(2).unwrap();
        assert_eq!(cursor.position().unwrap(), &[10, 21]);
        assert!(!cursor.has_next());
    }

    #[test]
    fn multi_dimension_escape() {
        let code = RasterCode::from_positions(3, &[[0, 0, 0], [1, 0, 0], [0, 1, 0]]);
        let runs: Vec<Run> = code.runs().collect::<RasterResult<_>>().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].start, vec![0, 0, 0]);
        assert_eq!(runs[0].end, 1);
        assert_eq!(runs[1].start, vec![0, 1, 0]);
        assert_eq!(runs[1].escape, 1);
    }
}
