use geo::Coord;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::super::brain::Brain;
use super::super::geometric_utils::{normalize, rotate};
use super::super::params::Params;
use super::super::track::HexGrid;
use super::perception::Perception;

/// How a car entered its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Freshly initialized controller.
    Random,
    /// Best car of the previous generation, carried over unchanged.
    Elite,
    /// Copy of a selected parent.
    Parent,
    /// Crossover child of two parents.
    Offspring,
    /// Mutated copy of another member.
    Mutant,
    /// Controller loaded from a snapshot.
    Restored,
}

/// Position, heading and speed a car starts from and resets to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position in pixels.
    pub pos: Coord<f32>,
    /// Unit heading vector.
    pub direction: Coord<f32>,
    /// Speed in pixels per second.
    pub speed: f32,
}

impl Pose {
    /// Start pose described by the parameters, starting at minimum speed.
    pub fn from_params(params: &Params) -> Self {
        let [x, y] = params.start_pos;
        let [dx, dy] = params.start_direction;
        Self {
            pos: Coord { x, y },
            direction: normalize(Coord { x: dx, y: dy }),
            speed: params.min_speed,
        }
    }
}

/// A simulated car driven by a neural network.
///
/// Once crashed, a car is frozen: neither [`Car::integrate`] nor
/// [`Car::steer`] changes it until [`Car::reset`].
#[derive(Debug, Clone)]
pub struct Car {
    pos: Coord<f32>,
    direction: Coord<f32>,
    speed: f32,
    crashed: bool,
    distance: f32,
    start: Pose,
    /// Neural network that controls the car.
    pub brain: Brain,
    /// How the car entered the current generation.
    pub origin: Origin,
}

impl Car {
    /// Creates a car at its start pose.
    pub fn new(start: Pose, brain: Brain, origin: Origin) -> Self {
        Self {
            pos: start.pos,
            direction: start.direction,
            speed: start.speed,
            crashed: false,
            distance: 0.0,
            start,
            brain,
            origin,
        }
    }

    /// Current position in pixels.
    pub fn position(&self) -> Coord<f32> {
        self.pos
    }

    /// Current unit heading.
    pub fn direction(&self) -> Coord<f32> {
        self.direction
    }

    /// Current speed.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Heading scaled by speed.
    pub fn velocity(&self) -> Coord<f32> {
        self.direction * self.speed
    }

    /// Whether the car has hit a wall or left the area.
    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    /// Distance driven since the last reset; the car's fitness.
    pub fn distance_traveled(&self) -> f32 {
        self.distance
    }

    /// Pose the car resets to.
    pub fn start(&self) -> Pose {
        self.start
    }

    /// Restores the start pose and clears distance and crash state.
    pub fn reset(&mut self) {
        self.pos = self.start.pos;
        self.direction = self.start.direction;
        self.speed = self.start.speed;
        self.distance = 0.0;
        self.crashed = false;
    }

    /// Moves the car along its heading, damps its speed and checks for a crash.
    ///
    /// Damping is applied once per call regardless of `dt`.
    pub fn integrate(&mut self, track: &HexGrid, params: &Params, dt: f32) {
        if self.crashed {
            return;
        }
        let step = self.speed * dt;
        self.pos = self.pos + self.direction * step;
        self.distance += step;
        self.speed = (self.speed * params.damping).clamp(params.min_speed, params.max_speed);

        if track.occupied_at(self.pos) {
            self.crashed = true;
        }
    }

    /// Applies a throttle and a turn command, both expected in `[-1, 1]`.
    ///
    /// Braking (negative throttle) is twice as strong as acceleration with the
    /// default parameters. Speed stays within `[min_speed, max_speed]`.
    pub fn steer(&mut self, params: &Params, throttle: f32, turn: f32, dt: f32) {
        if self.crashed {
            return;
        }
        let theta = turn * dt * params.max_turn_rate;
        self.direction = normalize(rotate(self.direction, theta));

        let rate = if throttle > 0.0 {
            params.acceleration
        } else {
            params.braking
        };
        self.speed = (self.speed + throttle * rate * dt).clamp(params.min_speed, params.max_speed);
    }

    /// Unit vectors of the range finder rays, spread evenly across the field
    /// of view from `-fov / 2` to `+fov / 2` around the heading.
    pub fn sensor_directions(&self, params: &Params) -> Vec<Coord<f32>> {
        let count = params.sensor_count;
        let step = if count > 1 {
            params.sensor_fov / (count as f32 - 1.0)
        } else {
            0.0
        };
        (0..count)
            .map(|i| {
                let angle = -0.5 * params.sensor_fov + i as f32 * step;
                rotate(self.direction, angle)
            })
            .collect()
    }

    /// End points of the range finder rays at full range, for drawing.
    pub fn sensor_rays(&self, params: &Params) -> Vec<Coord<f32>> {
        self.sensor_directions(params)
            .into_iter()
            .map(|d| self.pos + d * params.sensor_range)
            .collect()
    }

    /// Reads all senses of `perception`; with [`Perception::default`] that is
    /// one distance per ray followed by the current speed.
    pub fn read_sensors(&self, perception: &Perception, track: &HexGrid, params: &Params) -> Array1<f32> {
        perception.perceive(self, track, params)
    }

    /// Senses the track, asks the brain for a command and steers accordingly.
    pub fn update(&mut self, perception: &Perception, track: &HexGrid, params: &Params, dt: f32) {
        if self.crashed {
            return;
        }
        let readings = self.read_sensors(perception, track, params);
        let steering = self.brain.infer(&readings);
        self.steer(params, steering.throttle, steering.turn, dt);
    }
}
