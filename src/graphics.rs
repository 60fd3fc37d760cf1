use geo::Coord;
use macroquad::prelude::*;
use neurodrive::simulation::car::Origin;
use neurodrive::simulation::population::Simulation;
use neurodrive::simulation::track::{Cell, HexGrid};

const BACKGROUND: Color = Color::new(0.235, 0.235, 0.235, 1.0);
const STAT_COLOR: Color = YELLOW;

trait ToScreen {
    type Output;
    fn to_screen(&self, track: &HexGrid) -> Self::Output;
}

impl ToScreen for Coord<f32> {
    type Output = Vec2;
    fn to_screen(&self, track: &HexGrid) -> Vec2 {
        let scale = screen_scale(track);
        vec2(self.x * scale, self.y * scale)
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, track: &HexGrid) -> f32 {
        self * screen_scale(track)
    }
}

/// Uniform scale fitting the whole track into the window.
fn screen_scale(track: &HexGrid) -> f32 {
    let scale_x = screen_width() / track.width() as f32;
    let scale_y = screen_height() / track.height() as f32;
    scale_x.min(scale_y)
}

/// Converts a window position (e.g. the mouse) back to track pixels.
pub fn from_screen(pos: Vec2, track: &HexGrid) -> Coord<f32> {
    let scale = screen_scale(track);
    Coord {
        x: pos.x / scale,
        y: pos.y / scale,
    }
}

pub fn clear() {
    clear_background(BACKGROUND);
}

pub fn draw_track(track: &HexGrid) {
    let thickness = 2.0_f32.to_screen(track);
    for hex in track.cells() {
        let (fill, line) = match hex.cell {
            Cell::Wall => (
                Color::from_rgba(60, 190, 50, 255),
                Color::from_rgba(40, 170, 30, 255),
            ),
            Cell::Open => (
                Color::from_rgba(140, 150, 120, 255),
                Color::from_rgba(120, 130, 100, 255),
            ),
        };

        let center = hex.center.to_screen(track);
        let corners: Vec<Vec2> = hex
            .footprint
            .exterior()
            .coords()
            .map(|c| c.to_screen(track))
            .collect();

        for pair in corners.windows(2) {
            draw_triangle(center, pair[0], pair[1], fill);
        }
        for pair in corners.windows(2) {
            draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, thickness, line);
        }
    }
}

pub fn draw_cars(sim: &Simulation) {
    let track = sim.track();
    let params = sim.params();
    let sensor_color = Color::from_rgba(90, 90, 90, 255);

    // Elite last so it stays on top.
    let mut cars: Vec<_> = sim.cars().iter().collect();
    cars.sort_by_key(|car| car.origin == Origin::Elite);

    for car in cars {
        let color = match car.origin {
            Origin::Parent => Color::from_rgba(255, 0, 0, 255),
            Origin::Mutant => Color::from_rgba(255, 0, 255, 255),
            Origin::Elite => Color::from_rgba(255, 255, 255, 255),
            Origin::Random | Origin::Offspring | Origin::Restored => {
                Color::from_rgba(190, 220, 170, 255)
            }
        };
        let pos = car.position().to_screen(track);

        if !car.is_crashed() {
            for end in car.sensor_rays(params) {
                let end = end.to_screen(track);
                draw_line(pos.x, pos.y, end.x, end.y, 1.0, sensor_color);
            }
            let tip = (car.position() + car.velocity()).to_screen(track);
            draw_line(pos.x, pos.y, tip.x, tip.y, 2.0, color);
        }

        let radius = (if car.is_crashed() { 6.0_f32 } else { 8.0_f32 }).to_screen(track);
        draw_circle(pos.x, pos.y, radius, color);

        let label = format!("{}", car.distance_traveled() as i64);
        let size = measure_text(&label, None, 16, 1.0);
        draw_text(
            &label,
            pos.x - size.width - radius,
            pos.y + 0.5 * size.height,
            16.0,
            STAT_COLOR,
        );
    }
}

pub fn draw_stats(sim: &Simulation) {
    let x = screen_width() - 200.0;
    let line_height = 24.0;
    let lines = [
        format!("FPS: {:3}", get_fps()),
        format!("Time: {:2.0}", sim.elapsed()),
        format!("Generation: {:3}", sim.generation()),
        format!("Alive: {:3}", sim.alive_count()),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, x, 20.0 + line_height * (i as f32 + 1.0), 24.0, STAT_COLOR);
    }
}
