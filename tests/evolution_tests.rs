#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use geo::Coord;
use ndarray::Array2;
use neurodrive::simulation::brain::Brain;
use neurodrive::simulation::car::{Car, Origin, Pose};
use neurodrive::simulation::evolution::{EvolutionEngine, rank_by_fitness};
use neurodrive::simulation::params::Params;
use neurodrive::simulation::track::HexGrid;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn open_track() -> HexGrid {
    HexGrid::from_cells(50.0, 800, 600, Array2::from_elem((13, 15), true))
}

/// Cars that have driven `10 * dt` pixels each at minimum speed.
fn driven_cars(params: &Params, dts: &[f32]) -> Vec<Car> {
    let track = open_track();
    let mut rng = StdRng::seed_from_u64(21);
    let start = Pose {
        pos: Coord { x: 400.0, y: 300.0 },
        ..Pose::from_params(params)
    };
    dts.iter()
        .map(|&dt| {
            let mut car = Car::new(start, Brain::random_init(params.sensor_count, &mut rng), Origin::Random);
            car.integrate(&track, params, dt);
            car
        })
        .collect()
}

#[test]
fn test_single_zero_fitness_car() {
    let params = Params::default();
    let engine = EvolutionEngine::new(&params);
    let cars = driven_cars(&params, &[0.0]);

    let next = engine.evolve(&cars, &mut StdRng::seed_from_u64(1));

    // elite + 5 parents + 10 offspring + 10 mutants
    assert_eq!(next.len(), 26);
    assert!(next.iter().all(|car| car.brain == cars[0].brain || car.origin == Origin::Mutant));
}

#[test]
fn test_generation_layout() {
    let params = Params::default();
    let engine = EvolutionEngine::new(&params);
    let cars = driven_cars(&params, &[1.0, 3.0, 0.5, 2.0, 4.0, 0.0]);

    let next = engine.evolve(&cars, &mut StdRng::seed_from_u64(2));

    assert_eq!(next.len(), 26);
    assert_eq!(next[0].origin, Origin::Elite);
    assert!(next[1..6].iter().all(|car| car.origin == Origin::Parent));
    assert!(next[6..16].iter().all(|car| car.origin == Origin::Offspring));
    assert!(next[16..].iter().all(|car| car.origin == Origin::Mutant));
}

#[test]
fn test_elite_is_best_car() {
    let params = Params::default();
    let engine = EvolutionEngine::new(&params);
    let cars = driven_cars(&params, &[1.0, 3.0, 0.5, 4.0, 2.0]);

    let next = engine.evolve(&cars, &mut StdRng::seed_from_u64(3));

    assert_eq!(next[0].brain, cars[3].brain);
}

#[test]
fn test_next_generation_is_reset() {
    let params = Params::default();
    let engine = EvolutionEngine::new(&params);
    let cars = driven_cars(&params, &[1.0, 3.0, 2.0]);

    let next = engine.evolve(&cars, &mut StdRng::seed_from_u64(4));

    for car in &next {
        assert_eq!(car.distance_traveled(), 0.0);
        assert!(!car.is_crashed());
        assert_eq!(car.position(), Coord { x: 400.0, y: 300.0 });
        assert_eq!(car.speed(), params.min_speed);
    }
}

#[test]
fn test_input_is_untouched() {
    let params = Params::default();
    let engine = EvolutionEngine::new(&params);
    let cars = driven_cars(&params, &[1.0, 3.0, 2.0]);
    let before: Vec<(Brain, f32)> = cars.iter().map(|c| (c.brain.clone(), c.distance_traveled())).collect();

    let _ = engine.evolve(&cars, &mut StdRng::seed_from_u64(5));

    let after: Vec<(Brain, f32)> = cars.iter().map(|c| (c.brain.clone(), c.distance_traveled())).collect();
    assert_eq!(before, after);
}

#[test]
fn test_empty_population() {
    let engine = EvolutionEngine::new(&Params::default());
    let next = engine.evolve(&[], &mut StdRng::seed_from_u64(6));
    assert!(next.is_empty());
}

#[test]
fn test_rank_by_fitness_ascending() {
    let params = Params::default();
    let cars = driven_cars(&params, &[2.0, 0.0, 4.0, 1.0]);

    let ranked: Vec<f32> = rank_by_fitness(&cars).iter().map(|c| c.distance_traveled()).collect();

    for pair in ranked.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
    assert_eq!(ranked.len(), 4);
}

#[test]
fn test_selection_falls_back_to_uniform() {
    let params = Params::default();
    let engine = EvolutionEngine::new(&params);
    let cars = driven_cars(&params, &[0.0, 0.0, 0.0]);
    let ranked = rank_by_fitness(&cars);
    let mut rng = StdRng::seed_from_u64(7);

    let mut seen = [false; 3];
    for _ in 0..50 {
        let picks = engine.select_parents(&ranked, &mut rng);
        assert_eq!(picks.len(), params.parent_count);
        for i in picks {
            seen[i] = true;
        }
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn test_selection_prefers_only_fit_car() {
    let params = Params::default();
    let engine = EvolutionEngine::new(&params);
    let cars = driven_cars(&params, &[0.0, 2.0, 0.0]);
    let ranked = rank_by_fitness(&cars);
    let mut rng = StdRng::seed_from_u64(8);

    for _ in 0..20 {
        let picks = engine.select_parents(&ranked, &mut rng);
        assert!(picks.iter().all(|&i| i == ranked.len() - 1));
    }
}

#[test]
fn test_breed_counts_pairs() {
    let params = Params::default();
    let engine = EvolutionEngine::new(&params);
    let mut rng = StdRng::seed_from_u64(9);

    let five = driven_cars(&params, &[1.0; 5]);
    assert_eq!(engine.breed(&five, &mut rng).len(), 10);

    let two = driven_cars(&params, &[1.0; 2]);
    let offspring = engine.breed(&two, &mut rng);
    assert_eq!(offspring.len(), 1);
    assert_eq!(offspring[0].origin, Origin::Offspring);

    let one = driven_cars(&params, &[1.0]);
    assert!(engine.breed(&one, &mut rng).is_empty());
}

#[test]
fn test_mutate_leaves_source() {
    let params = Params::default();
    let engine = EvolutionEngine::new(&params);
    let cars = driven_cars(&params, &[1.0]);
    let original = cars[0].brain.clone();

    let mutant = engine.mutate(&cars[0], &mut StdRng::seed_from_u64(10));

    assert_eq!(cars[0].brain, original);
    assert_eq!(mutant.origin, Origin::Mutant);
    assert_eq!(mutant.distance_traveled(), 0.0);
    assert!(mutant.brain.validate(params.sensor_count).is_ok());
}

#[test]
fn test_custom_group_sizes() {
    let params = Params {
        parent_count: 3,
        mutation_count: 2,
        ..Params::default()
    };
    let engine = EvolutionEngine::new(&params);
    let cars = driven_cars(&params, &[1.0, 2.0, 3.0, 4.0]);

    let next = engine.evolve(&cars, &mut StdRng::seed_from_u64(11));

    // 1 + 3 + 3 + 2
    assert_eq!(next.len(), 9);
}
