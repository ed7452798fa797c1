// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Stroke pattern for lines and markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    // odd, so each segment both starts and ends with ink
    fn pieces(self) -> usize {
        match self {
            LineStyle::Solid => 1,
            LineStyle::Dashed => 15,
            LineStyle::Dotted => 41,
        }
    }
}

fn lerp(a: f64, b: f64, f: f64) -> f64 {
    a * (1.0 - f) + b * f
}

/// Splits a polyline into the pieces that are actually stroked for `style`.
pub fn segments(points: &[(f64, f64)], style: LineStyle) -> Vec<Vec<(f64, f64)>> {
    if points.len() < 2 {
        return Vec::new();
    }
    if style == LineStyle::Solid {
        return vec![points.to_vec()];
    }

    let n = style.pieces();
    let mut pieces = Vec::with_capacity((points.len() - 1) * (n / 2 + 1));
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        for i in (0..n).step_by(2) {
            let a = i as f64 / n as f64;
            let b = (i + 1) as f64 / n as f64;
            pieces.push(vec![
                (lerp(x0, x1, a), lerp(y0, y1, a)),
                (lerp(x0, x1, b), lerp(y0, y1, b)),
            ]);
        }
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_is_one_piece() {
        let line = [(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)];
        assert_eq!(segments(&line, LineStyle::Solid), vec![line.to_vec()]);
    }

    #[test]
    fn dashed_covers_both_ends() {
        let pieces = segments(&[(0.0, 0.0), (0.0, 15.0)], LineStyle::Dashed);
        assert_eq!(pieces.len(), 8);
        assert_eq!(pieces[0][0], (0.0, 0.0));
        assert!((pieces[7][1].1 - 15.0).abs() < 1e-9);
        // gaps between dashes
        assert!((pieces[1][0].1 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn dotted_is_denser_than_dashed() {
        let line = [(0.0, 0.0), (1.0, 0.0)];
        assert!(
            segments(&line, LineStyle::Dotted).len() > segments(&line, LineStyle::Dashed).len()
        );
    }

    #[test]
    fn single_point_draws_nothing() {
        assert!(segments(&[(1.0, 1.0)], LineStyle::Dashed).is_empty());
    }
}
