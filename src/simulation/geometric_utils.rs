//! Geometric utility functions for hexagon footprints and 2D rotations.

use geo::{Coord, LineString, Polygon};

/// Ratio between inner and outer radius of a regular hexagon (sin 60°).
pub const HEX_RADIUS_RATIO: f32 = 0.866_025_4;

/// Builds the footprint of a vertical hexagon (points up and down, flat sides
/// left and right).
///
/// # Arguments
///
/// * `center` - Center of the hexagon
/// * `inner_radius` - Distance from the center to a flat side
/// * `outer_radius` - Distance from the center to a corner
pub fn hexagon(center: Coord<f32>, inner_radius: f32, outer_radius: f32) -> Polygon<f32> {
    let Coord { x, y } = center;
    let half = 0.5 * outer_radius;
    let exterior = LineString::from(vec![
        (x, y + outer_radius),
        (x + inner_radius, y + half),
        (x + inner_radius, y - half),
        (x, y - outer_radius),
        (x - inner_radius, y - half),
        (x - inner_radius, y + half),
        (x, y + outer_radius),
    ]);
    Polygon::new(exterior, vec![])
}

/// Rotates a vector by `theta` radians using the matrix `[[cos, -sin], [sin, cos]]`.
#[inline]
pub fn rotate(v: Coord<f32>, theta: f32) -> Coord<f32> {
    let (s, c) = theta.sin_cos();
    Coord {
        x: c * v.x - s * v.y,
        y: s * v.x + c * v.y,
    }
}

/// Euclidean length of a vector.
#[inline]
pub fn length(v: Coord<f32>) -> f32 {
    v.x.hypot(v.y)
}

/// Scales a vector to unit length; zero vectors fall back to +x.
pub fn normalize(v: Coord<f32>) -> Coord<f32> {
    let len = length(v);
    if len > f32::EPSILON {
        v / len
    } else {
        Coord { x: 1.0, y: 0.0 }
    }
}
