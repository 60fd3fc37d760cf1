//! Speedometer sense - lets the brain feel how fast the car goes.

use ndarray::{Array1, arr1};

use super::super::params::Params;
use super::super::track::HexGrid;
use super::Car;
use super::sense::Sense;

/// Outputs the car's current speed, unscaled.
pub struct Speedometer;

impl Speedometer {
    /// Creates a new speedometer.
    pub fn new() -> Self {
        Self
    }
}

impl Default for Speedometer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sense for Speedometer {
    fn sense(&self, car: &Car, _track: &HexGrid, _params: &Params) -> Array1<f32> {
        arr1(&[car.speed()])
    }

    fn input_size(&self, _params: &Params) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "Speedometer"
    }
}
