//! Abstract sense trait for car perception.
//!
//! Senses collect information from the track and convert it into
//! neural network inputs for the car's brain.

use ndarray::Array1;

use super::super::params::Params;
use super::super::track::HexGrid;
use super::Car;

/// Trait for sensory modalities that cars use to perceive their surroundings.
pub trait Sense {
    /// Process sensory information and return neural network inputs.
    ///
    /// # Arguments
    ///
    /// * `car` - The car doing the sensing
    /// * `track` - The track being driven
    /// * `params` - Simulation parameters
    ///
    /// # Returns
    ///
    /// A 1D array of length `input_size(params)`.
    fn sense(&self, car: &Car, track: &HexGrid, params: &Params) -> Array1<f32>;

    /// Returns the number of neural network inputs this sense produces.
    fn input_size(&self, params: &Params) -> usize;

    /// Returns a human-readable name for this sense.
    fn name(&self) -> &'static str;
}
