//! Encoding, inspection and decoding tools for raster codes.
//!
//! This crate backs the `rlregion-tools` binary:
//!
//! - Encode a JSON list of positions into a raster code
//! - Explain a code run by run, with its header and escapes
//! - Decode one code, or a list of fragments, at a chosen offset
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what the codec is doing.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use rastercode::{
    Bounds, Offset, Position, PositionCursor, RasterCode, RasterCodeCursor, RasterCodeEncoder,
    RasterResult, UnionRasterCodeCursor,
};
use serde::Serialize;

pub mod logging;

/// Parses a JSON array of positions, e.g. `[[0, 0], [1, 0]]`.
pub fn parse_positions(json: &str) -> Result<Vec<Vec<i64>>> {
    serde_json::from_str(json).context("parse positions json")
}

/// Sorts positions into canonical scan order (dimension 0 fastest) and drops
/// duplicates.
pub fn sort_scan_order(positions: &mut Vec<Vec<i64>>) {
    positions.sort_by(|a, b| a.iter().rev().cmp(b.iter().rev()));
    positions.dedup();
}

/// Encodes positions that are in canonical scan order.
///
/// `dims` defaults to the length of the first position; `base_x` defaults to
/// the smallest dimension-0 coordinate.
pub fn encode_positions(
    positions: &[Vec<i64>],
    dims: Option<usize>,
    base_x: Option<i64>,
) -> Result<RasterCode> {
    let Some(dims) = dims.or_else(|| positions.first().map(Vec::len)) else {
        bail!("cannot infer dimensionality of an empty position list");
    };
    if dims == 0 {
        bail!("positions need at least one coordinate");
    }
    if let Some((index, position)) = positions
        .iter()
        .enumerate()
        .find(|(_, position)| position.len() != dims)
    {
        bail!(
            "position {index} has {} coordinates, expected {dims}",
            position.len()
        );
    }
    let min_x = positions.iter().map(|position| position[0]).min();
    let base_x = match (base_x, min_x) {
        (Some(base), Some(min)) if base > min => {
            bail!("base x {base} exceeds smallest x coordinate {min}")
        }
        (Some(base), _) => base,
        (None, min) => min.unwrap_or(0),
    };
    if i32::try_from(base_x).is_err() {
        tracing::warn!(base_x, "base x does not fit in 32 bits and will be truncated");
    }

    let mut encoder = RasterCodeEncoder::new(dims, base_x);
    for position in positions {
        encoder.add(position);
    }
    Ok(encoder.finish())
}

/// One run of an inspected code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEntry {
    /// First position of the run.
    pub start: Vec<i64>,
    /// Inclusive dimension-0 end.
    pub end: i64,
    /// Number of positions in the run.
    pub len: u64,
    /// Highest dimension rewritten by an escape in front of the run.
    pub escape: Option<usize>,
}

/// Structure summary of a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub dims: usize,
    pub points: u64,
    pub tokens: usize,
    pub base_x: Option<i32>,
    pub bounds: Option<Bounds>,
    pub escapes: usize,
    pub runs: Vec<RunEntry>,
}

/// Walks every run of `code`.
pub fn inspect_code(code: &RasterCode) -> Result<InspectReport> {
    let mut runs = Vec::new();
    for run in code.runs() {
        let run = run.context("walk runs")?;
        runs.push(RunEntry {
            len: run.len(),
            end: run.end,
            escape: (run.escape > 0).then_some(run.escape),
            start: run.start,
        });
    }
    Ok(InspectReport {
        dims: code.dims(),
        points: code.len(),
        tokens: code.tokens().len(),
        base_x: code.base_x(),
        bounds: code.bounds().cloned(),
        escapes: runs.iter().filter(|run| run.escape.is_some()).count(),
        runs,
    })
}

/// Renders an inspection report for humans.
pub fn format_inspect_pretty(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "dims: {} points: {} tokens: {}",
        report.dims, report.points, report.tokens
    );
    match report.base_x {
        Some(base_x) => {
            let _ = writeln!(out, "base x: {base_x}");
        }
        None => {
            let _ = writeln!(out, "empty code");
        }
    }
    if let Some(bounds) = &report.bounds {
        let _ = writeln!(out, "bounds: {:?} ..= {:?}", bounds.min, bounds.max);
    }
    let _ = writeln!(
        out,
        "runs: {} ({} with escapes)",
        report.runs.len(),
        report.escapes
    );
    for run in &report.runs {
        let escape = run
            .escape
            .map(|dim| format!(" [escape dims 1..={dim}]"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:?} -> x={} ({} positions){escape}",
            run.start, run.end, run.len
        );
    }
    out
}

/// Decodes one code, or several as a union, translated by `offset`.
///
/// An empty `offset` means no translation.
pub fn decode_codes(codes: &[RasterCode], offset: &[i64]) -> Result<Vec<Vec<i64>>> {
    let Some(first) = codes.first() else {
        return Ok(Vec::new());
    };
    let dims = first.dims();
    let mut values = if offset.is_empty() {
        vec![0; dims]
    } else {
        offset.to_vec()
    };
    let offset = Offset::from_mut(&mut values);

    let positions: Vec<Vec<i64>> = if let [code] = codes {
        let cursor = RasterCodeCursor::with_offset(code, offset).context("offset")?;
        PositionCursor::new(cursor)
            .map(|position| position.map(Position::into_vec))
            .collect::<RasterResult<Vec<_>>>()
            .context("decode code")?
    } else {
        let cursor = UnionRasterCodeCursor::with_offset(codes, offset).context("fragments")?;
        tracing::debug!(fragments = codes.len(), "decoding fragment union");
        PositionCursor::new(cursor)
            .map(|position| position.map(Position::into_vec))
            .collect::<RasterResult<Vec<_>>>()
            .context("decode fragments")?
    };
    Ok(positions)
}

/// Renders positions one per line.
pub fn format_positions_pretty(positions: &[Vec<i64>]) -> String {
    let mut out = String::new();
    for position in positions {
        let coords: Vec<String> = position.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "({})", coords.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_positions_json() {
        let positions = parse_positions("[[0, 1], [2, 3]]").unwrap();
        assert_eq!(positions, vec![vec![0, 1], vec![2, 3]]);
        assert!(parse_positions("{}").is_err());
    }

    #[test]
    fn sort_puts_last_dimension_first() {
        let mut positions = vec![vec![1, 1], vec![0, 1], vec![5, 0], vec![0, 1]];
        sort_scan_order(&mut positions);
        assert_eq!(positions, vec![vec![5, 0], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn encode_infers_dims_and_base() {
        let positions = vec![vec![4, 0], vec![5, 0], vec![2, 1]];
        let code = encode_positions(&positions, None, None).unwrap();
        assert_eq!(code.dims(), 2);
        assert_eq!(code.base_x(), Some(2));
    }

    #[test]
    fn encode_rejects_ragged_positions() {
        let positions = vec![vec![0, 0], vec![1]];
        let err = encode_positions(&positions, None, None).unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn encode_rejects_base_above_minimum() {
        let positions = vec![vec![0]];
        assert!(encode_positions(&positions, None, Some(1)).is_err());
    }

    #[test]
    fn encode_empty_needs_dims() {
        assert!(encode_positions(&[], None, None).is_err());
        let code = encode_positions(&[], Some(3), None).unwrap();
        assert!(code.is_empty());
        assert_eq!(code.dims(), 3);
    }

    #[test]
    fn inspect_reports_runs_and_escapes() {
        let positions = vec![vec![0, 0, 0], vec![1, 0, 0], vec![0, 1, 0]];
        let code = encode_positions(&positions, None, None).unwrap();
        let report = inspect_code(&code).unwrap();
        assert_eq!(report.points, 3);
        assert_eq!(report.tokens, 9);
        assert_eq!(report.escapes, 1);
        assert_eq!(report.runs[0].len, 2);
        assert_eq!(report.runs[1].escape, Some(1));

        let pretty = format_inspect_pretty(&report);
        assert!(pretty.contains("runs: 2 (1 with escapes)"));
        assert!(pretty.contains("[escape dims 1..=1]"));
    }

    #[test]
    fn decode_single_with_offset() {
        let code = encode_positions(&[vec![0, 0], vec![1, 0]], None, None).unwrap();
        let positions = decode_codes(&[code], &[10, 10]).unwrap();
        assert_eq!(positions, vec![vec![10, 10], vec![11, 10]]);
    }

    #[test]
    fn decode_union_without_offset() {
        let a = encode_positions(&[vec![0]], None, None).unwrap();
        let b = encode_positions(&[], Some(1), None).unwrap();
        let c = encode_positions(&[vec![4], vec![5]], None, None).unwrap();
        let positions = decode_codes(&[a, b, c], &[]).unwrap();
        assert_eq!(positions, vec![vec![0], vec![4], vec![5]]);
        assert_eq!(format_positions_pretty(&positions), "(0)\n(4)\n(5)\n");
    }

    #[test]
    fn decode_reports_malformed_code() {
        let mut encoder = RasterCodeEncoder::new(1, 5);
        encoder.add(&[3]);
        let err = decode_codes(&[encoder.finish()], &[]).unwrap_err();
        assert!(format!("{err:#}").contains("escape at token 1"));
    }

    #[test]
    fn decode_rejects_offset_of_wrong_length() {
        let code = encode_positions(&[vec![0, 0]], None, None).unwrap();
        assert!(decode_codes(&[code], &[1]).is_err());
    }

    #[test]
    fn code_json_roundtrip() {
        let code = encode_positions(&[vec![0, 0], vec![0, 1]], None, None).unwrap();
        let json = serde_json::to_string(&code).unwrap();
        let back: RasterCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
