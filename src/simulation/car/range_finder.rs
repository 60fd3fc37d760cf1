//! Range finder sense - distance to the nearest wall along each sensor ray.

use ndarray::Array1;

use super::super::params::Params;
use super::super::track::HexGrid;
use super::Car;
use super::sense::Sense;

/// Marches each ray outward in unit steps until it hits a wall.
///
/// Outputs the step at which the first wall was found, or `sensor_range` when
/// nothing is within range.
pub struct RangeFinder;

impl RangeFinder {
    /// Creates a new range finder.
    pub fn new() -> Self {
        Self
    }
}

impl Default for RangeFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Sense for RangeFinder {
    fn sense(&self, car: &Car, track: &HexGrid, params: &Params) -> Array1<f32> {
        let steps = params.sensor_range.max(0.0) as usize;
        let origin = car.position();

        car.sensor_directions(params)
            .into_iter()
            .map(|ray| {
                (0..steps)
                    .find(|&d| track.occupied_at(origin + ray * d as f32))
                    .map_or(params.sensor_range, |d| d as f32)
            })
            .collect()
    }

    fn input_size(&self, params: &Params) -> usize {
        params.sensor_count
    }

    fn name(&self) -> &'static str {
        "RangeFinder"
    }
}
