//! Hexagonal occupancy grid and its pixel-resolution collision bitmap.
//!
//! The grid stores one flag per hexagon (`true` = open road). Every wall hexagon
//! is rasterized into a bitmap covering the whole simulated area so that point
//! queries cost a single array lookup, no matter how many sensor rays ask.

use geo::{BoundingRect, Coord, Intersects, Polygon};
use ndarray::{Array2, ArrayView2, s};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::geometric_utils::{HEX_RADIUS_RATIO, hexagon};

/// State of a single hexagon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Drivable road.
    Open,
    /// Obstacle; driving into it crashes the car.
    Wall,
}

impl From<bool> for Cell {
    fn from(open: bool) -> Self {
        if open { Cell::Open } else { Cell::Wall }
    }
}

/// A grid cell as handed to the renderer.
#[derive(Debug, Clone)]
pub struct HexCell {
    /// Grid row.
    pub row: usize,
    /// Grid column.
    pub col: usize,
    /// Occupancy of the cell.
    pub cell: Cell,
    /// Center in pixel coordinates.
    pub center: Coord<f32>,
    /// Hexagon footprint in pixel coordinates.
    pub footprint: Polygon<f32>,
}

/// Rectangular grid of vertical hexagons with a collision bitmap.
#[derive(Debug, Clone)]
pub struct HexGrid {
    inner_radius: f32,
    outer_radius: f32,
    width: usize,
    height: usize,
    /// Occupancy per cell, indexed `[row, col]`; `true` is open road.
    open: Array2<bool>,
    /// Collision bitmap, indexed `[y, x]`; `true` where a wall covers the pixel.
    walls: Array2<bool>,
}

impl HexGrid {
    /// Creates a grid filling a `width` x `height` pixel area.
    ///
    /// Every cell starts as a wall except a rectangular loop of road one cell
    /// in from the border.
    ///
    /// # Arguments
    ///
    /// * `cell_distance` - Distance between neighbouring hexagon centers
    /// * `width` - Area width in pixels
    /// * `height` - Area height in pixels
    pub fn new(cell_distance: f32, width: usize, height: usize) -> Self {
        let inner_radius = 0.5 * cell_distance;
        let outer_radius = inner_radius / HEX_RADIUS_RATIO;

        let cols = grid_count((width as f32 + 1.0) / (2.0 * inner_radius) - 1.0);
        let rows = grid_count((height as f32 + 4.0) / (1.5 * outer_radius) - 1.0);

        let mut open = Array2::from_elem((rows, cols), false);
        if rows >= 4 && cols >= 4 {
            open.slice_mut(s![1, 1..cols - 2]).fill(true);
            open.slice_mut(s![rows - 2, 1..cols - 2]).fill(true);
            open.slice_mut(s![2..rows - 2, 1]).fill(true);
            open.slice_mut(s![2..rows - 2, cols - 2]).fill(true);
        }

        Self::from_cells(cell_distance, width, height, open)
    }

    /// Creates a grid from an explicit occupancy matrix (`[row, col]`, `true` = open).
    pub fn from_cells(cell_distance: f32, width: usize, height: usize, open: Array2<bool>) -> Self {
        let inner_radius = 0.5 * cell_distance;
        let mut grid = Self {
            inner_radius,
            outer_radius: inner_radius / HEX_RADIUS_RATIO,
            width,
            height,
            open,
            walls: Array2::from_elem((height, width), false),
        };
        grid.rebuild_cache();
        grid
    }

    /// Distance from a cell center to its flat sides.
    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    /// Distance from a cell center to its corners.
    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    /// Number of cell rows.
    pub fn rows(&self) -> usize {
        self.open.nrows()
    }

    /// Number of cell columns.
    pub fn cols(&self) -> usize {
        self.open.ncols()
    }

    /// Area width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Area height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only view of the collision bitmap (`[y, x]`).
    pub fn collision_bitmap(&self) -> ArrayView2<'_, bool> {
        self.walls.view()
    }

    /// Returns the state of a cell, or `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.open.get((row, col)).map(|&open| Cell::from(open))
    }

    /// Pixel position of a cell center. Odd rows are shifted right by one inner radius.
    pub fn cell_center(&self, row: usize, col: usize) -> Coord<f32> {
        let shift = if row % 2 == 1 { self.inner_radius } else { 0.0 };
        Coord {
            x: col as f32 * 2.0 * self.inner_radius + self.inner_radius + shift,
            y: row as f32 * 1.5 * self.outer_radius + self.outer_radius,
        }
    }

    /// Hexagon footprint of a cell in pixel coordinates.
    pub fn footprint(&self, row: usize, col: usize) -> Polygon<f32> {
        hexagon(self.cell_center(row, col), self.inner_radius, self.outer_radius)
    }

    /// Iterates over every cell with its drawable footprint.
    pub fn cells(&self) -> impl Iterator<Item = HexCell> + '_ {
        self.open.indexed_iter().map(|((row, col), &open)| HexCell {
            row,
            col,
            cell: Cell::from(open),
            center: self.cell_center(row, col),
            footprint: self.footprint(row, col),
        })
    }

    /// Returns `true` if the point lies on a wall or outside the area.
    #[inline]
    pub fn occupied_at(&self, point: Coord<f32>) -> bool {
        if point.x.is_nan() || point.y.is_nan() || point.x < 0.0 || point.y < 0.0 {
            return true;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        self.walls.get((y, x)).copied().unwrap_or(true)
    }

    /// Maps a pixel position to the `(row, col)` of the cell under it.
    pub fn cell_index(&self, point: Coord<f32>) -> Option<(usize, usize)> {
        let row = ((point.y + 4.0) / (1.5 * self.outer_radius)).floor();
        if row.is_nan() || row < 0.0 {
            return None;
        }
        let row = row as usize;
        let x = if row % 2 == 1 {
            point.x - self.inner_radius
        } else {
            point.x
        };
        let col = ((x + 1.0) / (2.0 * self.inner_radius)).floor();
        if col.is_nan() || col < 0.0 {
            return None;
        }
        let col = col as usize;
        (row < self.rows() && col < self.cols()).then_some((row, col))
    }

    /// Sets the cell under a pixel position and rebuilds the collision bitmap
    /// if the cell changed.
    ///
    /// # Returns
    ///
    /// `true` if a cell changed, `false` if it already had that state or the
    /// point is outside the grid.
    pub fn set_cell(&mut self, point: Coord<f32>, cell: Cell) -> bool {
        let Some((row, col)) = self.cell_index(point) else {
            debug!(x = point.x, y = point.y, "cell edit outside the grid ignored");
            return false;
        };
        let open = cell == Cell::Open;
        if self.open[[row, col]] == open {
            return false;
        }
        self.open[[row, col]] = open;
        debug!(row, col, ?cell, "cell changed");
        self.rebuild_cache();
        true
    }

    /// Clears the collision bitmap and rasterizes every wall hexagon into it.
    pub fn rebuild_cache(&mut self) {
        self.walls.fill(false);
        if self.width == 0 || self.height == 0 {
            return;
        }

        let mut wall_cells = 0usize;
        for ((row, col), &open) in self.open.indexed_iter() {
            if open {
                continue;
            }
            wall_cells += 1;
            let footprint = self.footprint(row, col);
            rasterize(&footprint, &mut self.walls);
        }
        debug!(wall_cells, "collision bitmap rebuilt");
    }
}

/// Marks every pixel whose center lies inside (or on the edge of) `polygon`.
fn rasterize(polygon: &Polygon<f32>, bitmap: &mut Array2<bool>) {
    let Some(bounds) = polygon.bounding_rect() else {
        return;
    };
    let (height, width) = bitmap.dim();
    let x_start = bounds.min().x.floor().max(0.0) as usize;
    let y_start = bounds.min().y.floor().max(0.0) as usize;
    let x_end = (bounds.max().x.ceil().max(0.0) as usize).min(width);
    let y_end = (bounds.max().y.ceil().max(0.0) as usize).min(height);

    for y in y_start..y_end {
        for x in x_start..x_end {
            let pixel = Coord {
                x: x as f32 + 0.5,
                y: y as f32 + 0.5,
            };
            if polygon.intersects(&pixel) {
                bitmap[[y, x]] = true;
            }
        }
    }
}

/// Converts a fractional cell count to an integer, rounding up past one half.
fn grid_count(count: f32) -> usize {
    let count = count.max(0.0);
    if count.fract() > 0.5 {
        (count + 1.0) as usize
    } else {
        count as usize
    }
}
