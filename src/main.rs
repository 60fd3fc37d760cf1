use clap::Parser;
use macroquad::prelude::*;
use neurodrive::simulation::params::Params;
use neurodrive::simulation::population::{Simulation, Snapshot};
use neurodrive::simulation::track::Cell;
use tracing::{error, info};

mod graphics;

/// Evolve neural network drivers on an editable hexagon track.
///
/// Left mouse opens cells, right mouse walls them, R ends the current
/// generation, S saves the controllers, Escape quits.
#[derive(Parser, Debug)]
#[command(name = "neurodrive", version)]
struct Args {
    /// JSON parameter file; missing fields take their defaults.
    #[arg(long)]
    config: Option<String>,
    /// Seed for the random number generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Snapshot to restore controllers from.
    #[arg(long)]
    load: Option<String>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Neurodrive".to_owned(),
        window_width: 800,
        window_height: 600,
        ..Default::default()
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn build_simulation(args: &Args) -> Result<Simulation, Box<dyn std::error::Error>> {
    let mut params = match &args.config {
        Some(path) => Params::load_from_file(path)?,
        None => Params::default(),
    };
    if args.seed.is_some() {
        params.seed = args.seed;
    }

    let sim = match &args.load {
        Some(path) => {
            let snapshot = Snapshot::load_from_file(path)?;
            info!(path = %path, cars = snapshot.brains.len(), "restoring snapshot");
            Simulation::from_snapshot(params, snapshot)?
        }
        None => Simulation::new(params)?,
    };
    Ok(sim)
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    let args = Args::parse();

    let mut sim = match build_simulation(&args) {
        Ok(sim) => sim,
        Err(err) => {
            error!(%err, "failed to start simulation");
            return;
        }
    };

    info!(
        cars = sim.cars().len(),
        rows = sim.track().rows(),
        cols = sim.track().cols(),
        "starting self-driving car evolution"
    );

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::R) {
            sim.request_end();
        }
        if is_key_pressed(KeyCode::S) {
            let path = format!(
                "neurodrive-gen{}-{}.json",
                sim.generation(),
                chrono::Local::now().format("%Y%m%d-%H%M%S")
            );
            match sim.save_to_file(&path) {
                Ok(()) => info!(path = %path, "snapshot saved"),
                Err(err) => error!(%err, "failed to save snapshot"),
            }
        }

        let point = graphics::from_screen(Vec2::from(mouse_position()), sim.track());
        if is_mouse_button_down(MouseButton::Left) {
            sim.set_cell(point, Cell::Open);
        } else if is_mouse_button_down(MouseButton::Right) {
            sim.set_cell(point, Cell::Wall);
        }

        sim.step(get_frame_time());

        graphics::clear();
        graphics::draw_track(sim.track());
        graphics::draw_cars(&sim);
        graphics::draw_stats(&sim);

        next_frame().await
    }
}
