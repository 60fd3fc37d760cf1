//! Car module containing kinematics and the sensor system.

mod car;
mod perception;
mod range_finder;
mod sense;
mod speedometer;

// Re-export everything from the car module
pub use car::*;

// Re-export sensor system components
pub use perception::Perception;
pub use range_finder::RangeFinder;
pub use sense::Sense;
pub use speedometer::Speedometer;
