// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Antimeridian cutting for polygon rings.
//!
//! Rings whose consecutive longitudes jump by more than 180° cross the
//! antimeridian. Such rings are unwrapped into a continuous longitude range
//! and clipped against each 360°‑wide window they touch, so that every piece
//! lies within `[-180, 180]`. Rings that go all the way around a pole are
//! closed along that pole first.

use alloc::vec::Vec;

use cartory_geo::{Coord, lon_lat};

#[cfg(not(feature = "std"))]
use crate::float::FloatFuncs as _;

const AREA_EPSILON: f64 = 1e-12;

/// Returns `true` if any consecutive pair of positions jumps across the
/// antimeridian.
pub(crate) fn crosses_antimeridian(ring: &[Coord<f64>]) -> bool {
    ring.windows(2)
        .any(|pair| (pair[1].x - pair[0].x).abs() > 180.0)
}

/// Calls `f` with each piece of `ring` after cutting along the antimeridian.
///
/// Rings that do not cross the antimeridian are passed through unchanged and
/// without allocating. Pieces are closed (first position repeated last).
pub(crate) fn for_each_piece(ring: &[Coord<f64>], mut f: impl FnMut(&[Coord<f64>])) {
    if !crosses_antimeridian(ring) {
        f(ring);
        return;
    }

    let mut unwrapped = unwrap(ring);
    let (Some(&first), Some(&last)) = (unwrapped.first(), unwrapped.last()) else {
        return;
    };
    if (last.x - first.x).abs() > 180.0 {
        // Encircles a pole: walk along the pole back to the start.
        let mean_lat = unwrapped.iter().map(|p| p.y).sum::<f64>() / unwrapped.len() as f64;
        let pole = if mean_lat < 0.0 { -90.0 } else { 90.0 };
        unwrapped.push(lon_lat(last.x, pole));
        unwrapped.push(lon_lat(first.x, pole));
        unwrapped.push(first);
    }
    // Drop the closing duplicate; clipping treats the ring as implicitly closed.
    if unwrapped.len() > 1 && unwrapped.first() == unwrapped.last() {
        unwrapped.pop();
    }

    let (min_lon, max_lon) = unwrapped
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.x), hi.max(p.x))
        });

    let mut window = window_index(min_lon);
    let last_window = window_index(max_lon);
    let mut shifted = Vec::with_capacity(unwrapped.len());
    while window <= last_window {
        let offset = 360.0 * f64::from(window);
        shifted.clear();
        shifted.extend(unwrapped.iter().map(|p| lon_lat(p.x - offset, p.y)));
        let clipped = clip(&clip(&shifted, 180.0, |lon| lon <= 180.0), -180.0, |lon| {
            lon >= -180.0
        });
        if clipped.len() >= 3 && signed_area(&clipped).abs() > AREA_EPSILON {
            let mut piece = clipped;
            piece.push(piece[0]);
            f(&piece);
        }
        window += 1;
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "unwrapped longitudes stay within a few turns of the origin"
)]
fn window_index(lon: f64) -> i32 {
    // Window `k` covers longitudes in `(360k - 180, 360k + 180]`.
    ((lon - 180.0) / 360.0).ceil() as i32
}

fn unwrap(ring: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut out = Vec::with_capacity(ring.len() + 3);
    let Some(&start) = ring.first() else {
        return out;
    };
    out.push(start);
    let mut acc = start.x;
    for pair in ring.windows(2) {
        let mut delta = pair[1].x - pair[0].x;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        acc += delta;
        out.push(lon_lat(acc, pair[1].y));
    }
    out
}

/// Sutherland–Hodgman clip of a closed ring against a vertical edge.
fn clip(points: &[Coord<f64>], edge: f64, inside: impl Fn(f64) -> bool) -> Vec<Coord<f64>> {
    let mut out = Vec::with_capacity(points.len() + 4);
    let Some(&tail) = points.last() else {
        return out;
    };
    let mut prev = tail;
    for &cur in points {
        let cur_in = inside(cur.x);
        let prev_in = inside(prev.x);
        if cur_in {
            if !prev_in {
                out.push(intersect(prev, cur, edge));
            }
            out.push(cur);
        } else if prev_in {
            out.push(intersect(prev, cur, edge));
        }
        prev = cur;
    }
    out
}

fn intersect(a: Coord<f64>, b: Coord<f64>, edge: f64) -> Coord<f64> {
    let t = (edge - a.x) / (b.x - a.x);
    lon_lat(edge, a.y + t * (b.y - a.y))
}

fn signed_area(points: &[Coord<f64>]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use cartory_geo::{Coord, lon_lat};

    use super::{crosses_antimeridian, for_each_piece};

    fn pieces(ring: &[Coord<f64>]) -> Vec<Vec<Coord<f64>>> {
        let mut out = Vec::new();
        for_each_piece(ring, |piece| out.push(piece.to_vec()));
        out
    }

    #[test]
    fn ordinary_rings_pass_through() {
        let ring = vec![
            lon_lat(0.0, 0.0),
            lon_lat(10.0, 0.0),
            lon_lat(10.0, 10.0),
            lon_lat(0.0, 0.0),
        ];
        assert!(!crosses_antimeridian(&ring));
        assert_eq!(pieces(&ring), vec![ring]);
    }

    #[test]
    fn crossing_ring_is_split_in_two() {
        // A box from 170°E to 170°W.
        let ring = vec![
            lon_lat(170.0, 0.0),
            lon_lat(-170.0, 0.0),
            lon_lat(-170.0, 10.0),
            lon_lat(170.0, 10.0),
            lon_lat(170.0, 0.0),
        ];
        assert!(crosses_antimeridian(&ring));
        let out = pieces(&ring);
        assert_eq!(out.len(), 2);
        for piece in &out {
            assert_eq!(piece.first(), piece.last(), "pieces are closed");
            assert!(
                piece.iter().all(|p| (-180.0..=180.0).contains(&p.x)),
                "piece stays within the antimeridian: {piece:?}"
            );
        }
        let east = out.iter().find(|p| p.iter().any(|q| q.x == 170.0)).unwrap();
        assert!(east.iter().any(|q| q.x == 180.0));
        let west = out.iter().find(|p| p.iter().any(|q| q.x == -170.0)).unwrap();
        assert!(west.iter().any(|q| q.x == -180.0));
    }

    #[test]
    fn polar_ring_is_closed_along_the_pole() {
        // A ring around the south pole at -70°, traversed eastwards with an
        // antimeridian jump.
        let mut ring = Vec::new();
        for i in 0..=8 {
            ring.push(lon_lat(-180.0 + 45.0 * f64::from(i), -70.0));
        }
        ring.push(lon_lat(-180.0, -70.0));
        let out = pieces(&ring);
        assert!(!out.is_empty());
        let lats: Vec<f64> = out.iter().flatten().map(|p| p.y).collect();
        assert!(lats.contains(&-90.0), "closed along the south pole");
        assert!(
            out.iter().flatten().all(|p| (-180.0..=180.0).contains(&p.x)),
            "all pieces are within range"
        );
    }
}
