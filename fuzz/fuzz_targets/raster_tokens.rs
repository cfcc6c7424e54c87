#![no_main]

use libfuzzer_sys::fuzz_target;
use rastercode::{Limits, Offset, RasterCode, RegionCursor, UnionRasterCodeCursor};

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let dims = usize::from(first % 5);
    let tokens: Vec<i32> = rest
        .chunks_exact(4)
        .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    let Ok(code) = RasterCode::from_tokens(dims, tokens, &Limits::for_testing()) else {
        return;
    };

    // Accepted codes must decode exactly `len` positions inside their bounds.
    let mut cursor = code.cursor();
    let mut visited = 0u64;
    while cursor.has_next() {
        cursor.advance().expect("has_next promised a position");
        let position = cursor.position().expect("cursor is on a position");
        if let Some(bounds) = code.bounds() {
            assert!(bounds.contains(position));
        }
        visited += 1;
    }
    assert_eq!(visited, code.len());
    assert!(cursor.advance().is_err());

    let mut offset_values = vec![1i64; dims];
    let offset = Offset::from_mut(&mut offset_values);
    let fragments = [&code, &code];
    let mut union = UnionRasterCodeCursor::with_offset(fragments, offset).expect("dims match");
    assert_eq!(union.remaining(), 2 * code.len());
    if code.len() > 0 {
        union.jump_fwd(code.len()).expect("jump within union");
        assert_eq!(union.remaining(), code.len());
    }
});
