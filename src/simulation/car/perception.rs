//! Perception system that combines multiple senses into brain inputs.

use ndarray::{Array1, s};

use super::super::params::Params;
use super::super::track::HexGrid;
use super::Car;
use super::sense::Sense;

/// Manages multiple senses and concatenates their outputs, in order, into a
/// single input vector for the brain.
pub struct Perception {
    /// Ordered list of senses that contribute to perception
    senses: Vec<Box<dyn Sense>>,
}

impl Perception {
    /// Creates a new perception system that queries senses in the order given.
    pub fn new(senses: Vec<Box<dyn Sense>>) -> Self {
        Self { senses }
    }

    /// Process all senses and return combined brain inputs.
    pub fn perceive(&self, car: &Car, track: &HexGrid, params: &Params) -> Array1<f32> {
        let mut combined_inputs = Array1::zeros(self.total_input_size(params));

        let mut offset = 0;
        for sense in &self.senses {
            let sense_size = sense.input_size(params);
            let sense_outputs = sense.sense(car, track, params);
            combined_inputs
                .slice_mut(s![offset..offset + sense_size])
                .assign(&sense_outputs);
            offset += sense_size;
        }

        combined_inputs
    }

    /// Returns the sum of input sizes from all senses.
    pub fn total_input_size(&self, params: &Params) -> usize {
        self.senses.iter().map(|s| s.input_size(params)).sum()
    }

    /// Returns a reference to the senses in this perception system.
    pub fn senses(&self) -> &[Box<dyn Sense>] {
        &self.senses
    }
}

impl Default for Perception {
    fn default() -> Self {
        use super::range_finder::RangeFinder;
        use super::speedometer::Speedometer;

        Self::new(vec![Box::new(RangeFinder::new()), Box::new(Speedometer::new())])
    }
}
