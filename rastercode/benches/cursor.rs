use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rastercode::{RasterCode, RasterCodeEncoder, RegionCursor, UnionRasterCodeCursor};

/// Filled ball of radius `r`, x fastest.
fn ball(r: i64) -> Vec<[i64; 3]> {
    let mut positions = Vec::new();
    for z in -r..=r {
        for y in -r..=r {
            for x in -r..=r {
                if x * x + y * y + z * z <= r * r {
                    positions.push([x, y, z]);
                }
            }
        }
    }
    positions
}

fn encode(positions: &[[i64; 3]]) -> RasterCode {
    let base_x = positions.iter().map(|p| p[0]).min().unwrap_or(0);
    let mut encoder = RasterCodeEncoder::new(3, base_x);
    for position in positions {
        encoder.add(position);
    }
    encoder.finish()
}

fn walk(cursor: &mut impl RegionCursor) -> i64 {
    let mut sum = 0;
    while cursor.has_next() {
        cursor.advance().unwrap();
        sum += cursor.position().unwrap()[0];
    }
    sum
}

fn bench_cursor(c: &mut Criterion) {
    let positions = ball(24);
    let code = encode(&positions);
    let mid = positions.len() / 2;
    let halves = [encode(&positions[..mid]), encode(&positions[mid..])];

    let mut group = c.benchmark_group("raster code");
    group.throughput(Throughput::Elements(positions.len() as u64));

    group.bench_function("encode ball r=24", |b| {
        b.iter(|| black_box(encode(black_box(&positions))));
    });
    group.bench_function("walk ball r=24", |b| {
        b.iter(|| black_box(walk(&mut code.cursor())));
    });
    group.bench_function("walk union of two halves", |b| {
        b.iter(|| {
            let mut cursor = UnionRasterCodeCursor::new(3, &halves).unwrap();
            black_box(walk(&mut cursor))
        });
    });
    group.bench_function("jump to middle", |b| {
        b.iter(|| {
            let mut cursor = code.cursor();
            cursor.jump_fwd(black_box(code.len() / 2)).unwrap();
            black_box(cursor.position().map(<[i64]>::to_vec))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_cursor);
criterion_main!(benches);
