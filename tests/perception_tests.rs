#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use geo::Coord;
use ndarray::{Array1, Array2, arr1};
use neurodrive::simulation::brain::Brain;
use neurodrive::simulation::car::{Car, Origin, Perception, Pose, RangeFinder, Sense, Speedometer};
use neurodrive::simulation::params::Params;
use neurodrive::simulation::track::HexGrid;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::Cell;
use std::rc::Rc;

fn open_track() -> HexGrid {
    HexGrid::from_cells(50.0, 800, 600, Array2::from_elem((13, 15), true))
}

fn create_car(params: &Params, pos: Coord<f32>) -> Car {
    let mut rng = StdRng::seed_from_u64(11);
    let start = Pose {
        pos,
        ..Pose::from_params(params)
    };
    Car::new(start, Brain::random_init(params.sensor_count, &mut rng), Origin::Random)
}

#[test]
fn test_range_finder_size() {
    let params = Params::default();
    let range_finder = RangeFinder::new();

    assert_eq!(range_finder.input_size(&params), params.sensor_count);
    assert_eq!(range_finder.name(), "RangeFinder");
}

#[test]
fn test_speedometer_size() {
    let params = Params::default();
    let speedometer = Speedometer::new();

    assert_eq!(speedometer.input_size(&params), 1);
    assert_eq!(speedometer.name(), "Speedometer");
}

#[test]
fn test_perception_combines_senses() {
    let params = Params::default();
    let perception = Perception::default();

    assert_eq!(perception.senses().len(), 2);
    assert_eq!(perception.total_input_size(&params), params.sensor_count + 1);
}

#[test]
fn test_sensor_directions_span_fov() {
    let params = Params::default();
    let car = create_car(&params, Coord { x: 400.0, y: 300.0 });
    let directions = car.sensor_directions(&params);

    assert_eq!(directions.len(), params.sensor_count);
    for d in &directions {
        assert!((d.x.hypot(d.y) - 1.0).abs() < 1e-5);
    }

    let half = 0.5 * params.sensor_fov;
    let first = directions[0];
    let last = directions[params.sensor_count - 1];
    assert!((first.x - half.cos()).abs() < 1e-5);
    assert!((first.y + half.sin()).abs() < 1e-5);
    assert!((last.x - half.cos()).abs() < 1e-5);
    assert!((last.y - half.sin()).abs() < 1e-5);

    // Middle ray points straight ahead.
    let middle = directions[params.sensor_count / 2];
    assert!((middle.x - 1.0).abs() < 1e-5);
    assert!(middle.y.abs() < 1e-5);
}

#[test]
fn test_readings_shape_and_bounds() {
    let params = Params::default();
    let track = HexGrid::new(params.cell_distance, params.area_width, params.area_height);
    let car = create_car(&params, Coord { x: 80.0, y: 70.0 });

    let readings = car.read_sensors(&Perception::default(), &track, &params);

    assert_eq!(readings.len(), params.sensor_count + 1);
    for &r in readings.iter().take(params.sensor_count) {
        assert!((0.0..=params.sensor_range).contains(&r));
    }
    assert_eq!(readings[params.sensor_count], car.speed());
}

#[test]
fn test_no_obstacle_reads_max_range() {
    let params = Params::default();
    let car = create_car(&params, Coord { x: 400.0, y: 300.0 });

    let readings = car.read_sensors(&Perception::default(), &open_track(), &params);

    for &r in readings.iter().take(params.sensor_count) {
        assert_eq!(r, params.sensor_range);
    }
}

#[test]
fn test_area_edge_is_detected() {
    let params = Params::default();
    let car = create_car(&params, Coord { x: 750.0, y: 300.0 });

    let readings = car.read_sensors(&Perception::default(), &open_track(), &params);

    // Straight ahead the area ends 50 pixels away.
    assert_eq!(readings[params.sensor_count / 2], 50.0);
    // Slanted rays reach the edge later.
    assert!(readings[0] > 50.0);
    assert!(readings[params.sensor_count - 1] > 50.0);
}

#[test]
fn test_inside_wall_reads_zero() {
    let params = Params::default();
    let track = HexGrid::from_cells(50.0, 800, 600, Array2::from_elem((13, 15), false));
    let car = create_car(&params, Coord { x: 400.0, y: 300.0 });

    let readings = car.read_sensors(&Perception::default(), &track, &params);

    for &r in readings.iter().take(params.sensor_count) {
        assert_eq!(r, 0.0);
    }
}

#[test]
fn test_sensor_rays_end_at_range() {
    let params = Params::default();
    let car = create_car(&params, Coord { x: 400.0, y: 300.0 });

    for end in car.sensor_rays(&params) {
        let dist = (end.x - 400.0).hypot(end.y - 300.0);
        assert!((dist - params.sensor_range).abs() < 1e-3);
    }
}

#[test]
fn test_custom_perception() {
    let params = Params::default();
    let car = create_car(&params, Coord { x: 400.0, y: 300.0 });
    let perception = Perception::new(vec![Box::new(Speedometer::new())]);

    let inputs = perception.perceive(&car, &open_track(), &params);
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0], params.min_speed);
}

/// Counts how often it is queried; `Rc<Cell<_>>` keeps it single-threaded.
struct CallCounter {
    calls: Rc<Cell<usize>>,
}

impl Sense for CallCounter {
    fn sense(&self, _car: &Car, _track: &HexGrid, _params: &Params) -> Array1<f32> {
        self.calls.set(self.calls.get() + 1);
        arr1(&[self.calls.get() as f32])
    }

    fn input_size(&self, _params: &Params) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "CallCounter"
    }
}

#[test]
fn test_perception_is_reused_across_reads() {
    let params = Params::default();
    let track = open_track();
    let car = create_car(&params, Coord { x: 400.0, y: 300.0 });
    let calls = Rc::new(Cell::new(0));
    let perception = Perception::new(vec![
        Box::new(Speedometer::new()),
        Box::new(CallCounter { calls: Rc::clone(&calls) }),
    ]);

    for expected in 1..=3 {
        let inputs = car.read_sensors(&perception, &track, &params);
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1], expected as f32);
    }
    assert_eq!(calls.get(), 3);
}
