pub mod cell;
pub mod grid;

use std::sync::mpsc::Sender;

pub use cell::{Cell, Wall};
pub use grid::{Grid, GridEvent};

use crate::error::{MazeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// The four orthogonal directions, in counter-clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Step in cell units (x grows right, y grows down).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Direction {
        Direction::ALL[index % 4]
    }

    pub fn opposite(self) -> Direction {
        Direction::from_index(self.index() + 2)
    }

    pub fn turn_left(self) -> Direction {
        Direction::from_index(self.index() + 1)
    }

    pub fn turn_right(self) -> Direction {
        Direction::from_index(self.index() + 3)
    }

    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }
}

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub xl: u32,
    pub yl: u32,
    pub xh: u32,
    pub yh: u32,
}

impl Rect {
    pub fn new(xl: u32, yl: u32, xh: u32, yh: u32) -> Self {
        debug_assert!(xl <= xh && yl <= yh, "inverted rectangle");
        Rect { xl, yl, xh, yh }
    }

    pub fn width(&self) -> u32 {
        self.xh - self.xl + 1
    }

    pub fn height(&self) -> u32 {
        self.yh - self.yl + 1
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.xl..=self.xh).contains(&x) && (self.yl..=self.yh).contains(&y)
    }

    pub fn is_border(&self, x: u32, y: u32) -> bool {
        x == self.xl || y == self.yl || x == self.xh || y == self.yh
    }
}

/// A bitmap plus the active rectangle every algorithm works inside.
///
/// Cells sit at odd offsets from the rectangle's top-left corner, wall
/// junctions (vertices) at even offsets, and the wall between two adjacent
/// cells at the pixel between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    grid: Grid,
    active: Rect,
}

impl Maze {
    /// Smallest active rectangle, in pixels, that holds one cell.
    pub const MIN_SIZE: u32 = 3;

    /// Creates a maze of `cells_x` by `cells_y` cells, with every pixel a wall.
    /// n cells in each dimension -> n + 1 walls -> 2n + 1 total
    pub fn new(cells_x: u32, cells_y: u32, sender: Option<Sender<GridEvent>>) -> Result<Self> {
        let width = cells_x.checked_mul(2).and_then(|w| w.checked_add(1));
        let height = cells_y.checked_mul(2).and_then(|h| h.checked_add(1));
        let (Some(width), Some(height)) = (width, height) else {
            return Err(MazeError::TooLarge {
                width: u32::MAX,
                height: u32::MAX,
                max: Grid::MAX_PIXELS,
            });
        };
        let grid = Grid::new(width, height, true, sender)?;
        Ok(Maze::from_grid(grid))
    }

    /// Wraps an existing bitmap with the whole bitmap active.
    pub fn from_grid(grid: Grid) -> Self {
        let active = grid.bounds();
        Maze { grid, active }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn active(&self) -> Rect {
        self.active
    }

    /// Restrict every later operation to `rect`.
    pub fn set_active(&mut self, rect: Rect) -> Result<()> {
        if rect.xl > rect.xh
            || rect.yl > rect.yh
            || rect.xh >= self.grid.width()
            || rect.yh >= self.grid.height()
        {
            return Err(MazeError::BadRect {
                xl: rect.xl,
                yl: rect.yl,
                xh: rect.xh,
                yh: rect.yh,
                width: self.grid.width(),
                height: self.grid.height(),
            });
        }
        self.active = rect;
        Ok(())
    }

    /// Reallocates the bitmap, keeping the overlapping area when `preserve`
    /// is set, and makes the whole new bitmap active.
    pub fn resize(&mut self, width: u32, height: u32, preserve: bool) -> Result<()> {
        self.grid.resize(width, height, preserve, true)?;
        self.active = self.grid.bounds();
        Ok(())
    }

    /// Fails with [`MazeError::TooSmall`] unless the active rectangle is at
    /// least `min` pixels in both directions.
    pub fn require_size(&self, min: u32) -> Result<()> {
        if self.active.width() < min || self.active.height() < min || self.grid.width() == 0 {
            return Err(MazeError::TooSmall {
                width: self.active.width(),
                height: self.active.height(),
                min,
            });
        }
        Ok(())
    }

    /// Width of the maze in cells.
    pub fn cells_x(&self) -> u32 {
        (self.active.xh - self.active.xl) / 2
    }

    /// Height of the maze in cells.
    pub fn cells_y(&self) -> u32 {
        (self.active.yh - self.active.yl) / 2
    }

    pub fn cell_count(&self) -> usize {
        self.cells_x() as usize * self.cells_y() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Whether the pixel lies inside the active rectangle.
    pub fn legal(&self, x: u32, y: u32) -> bool {
        self.active.contains(x, y)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 < self.cells_x() && cell.1 < self.cells_y()
    }

    /// Row-major index of a cell.
    pub fn index(&self, cell: Cell) -> usize {
        cell.1 as usize * self.cells_x() as usize + cell.0 as usize
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        let cx = self.cells_x() as usize;
        Cell((index % cx) as u32, (index / cx) as u32)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (cx, cy) = (self.cells_x(), self.cells_y());
        (0..cy).flat_map(move |y| (0..cx).map(move |x| Cell(x, y)))
    }

    pub fn pixel(&self, cell: Cell) -> (u32, u32) {
        (
            self.active.xl + cell.0 * 2 + 1,
            self.active.yl + cell.1 * 2 + 1,
        )
    }

    /// Pixel of the vertex `(vx, vy)`, in vertex units (0..=cells).
    pub fn vertex(&self, vx: u32, vy: u32) -> (u32, u32) {
        (self.active.xl + vx * 2, self.active.yl + vy * 2)
    }

    /// The wall segment on the `dir` side of `cell`.
    pub fn wall(&self, cell: Cell, dir: Direction) -> Wall {
        let (x, y) = self.pixel(cell);
        let (dx, dy) = dir.delta();
        Wall(x.wrapping_add_signed(dx), y.wrapping_add_signed(dy))
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.grid.get(x, y)
    }

    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if self.legal(x, y) {
            self.grid.set(x, y, on);
        }
    }

    pub fn is_wall(&self, wall: Wall) -> bool {
        self.grid.get(wall.0, wall.1)
    }

    pub fn set_wall_pixel(&mut self, wall: Wall, on: bool) {
        self.set(wall.0, wall.1, on);
    }

    /// A cell is open when its center pixel is off.
    pub fn is_open(&self, cell: Cell) -> bool {
        let (x, y) = self.pixel(cell);
        !self.grid.get(x, y)
    }

    pub fn set_open(&mut self, cell: Cell, open: bool) {
        let (x, y) = self.pixel(cell);
        self.set(x, y, !open);
    }

    pub fn has_wall(&self, cell: Cell, dir: Direction) -> bool {
        self.is_wall(self.wall(cell, dir))
    }

    pub fn set_wall(&mut self, cell: Cell, dir: Direction, on: bool) {
        let wall = self.wall(cell, dir);
        self.set_wall_pixel(wall, on);
    }

    /// The adjacent cell in `dir`, if it is inside the maze.
    pub fn neighbor(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        cell.step(dir).filter(|&c| self.contains(c))
    }

    /// In-bounds neighbors of a cell, with the direction leading to each.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(cell, dir).map(|n| (dir, n)))
    }

    /// Whether one can walk from `cell` to its neighbor in `dir`.
    pub fn passable(&self, cell: Cell, dir: Direction) -> bool {
        match self.neighbor(cell, dir) {
            Some(next) => {
                self.is_open(cell) && self.is_open(next) && !self.has_wall(cell, dir)
            }
            None => false,
        }
    }

    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        self.neighbors(cell)
            .filter(move |&(dir, _)| self.passable(cell, dir))
    }

    pub fn open_count(&self, cell: Cell) -> usize {
        self.open_neighbors(cell).count()
    }

    /// An open cell with exactly one way out.
    pub fn is_dead_end(&self, cell: Cell) -> bool {
        self.is_open(cell) && self.open_count(cell) == 1
    }

    /// Open the wall toward `dir` and both cells on either side of it.
    pub fn carve(&mut self, cell: Cell, dir: Direction) {
        debug_assert!(self.neighbor(cell, dir).is_some(), "carving out of the maze");
        self.set_open(cell, true);
        self.set_wall(cell, dir, false);
        if let Some(next) = self.neighbor(cell, dir) {
            self.set_open(next, true);
        }
    }

    /// Set every pixel of the active rectangle.
    pub fn fill_active(&mut self, on: bool) {
        self.grid.fill_rect(self.active, on);
    }

    /// Clears everything inside the active rectangle, keeping its border walls.
    pub fn clear_interior(&mut self) {
        let rect = self.active;
        (rect.yl..=rect.yh).for_each(|y| {
            (rect.xl..=rect.xh).for_each(|x| {
                self.grid.set(x, y, rect.is_border(x, y));
            });
        });
    }

    /// Whether the pixel at `(x, y)` is a vertex of the active rectangle.
    pub fn is_vertex(&self, x: u32, y: u32) -> bool {
        self.legal(x, y) && (x - self.active.xl) % 2 == 0 && (y - self.active.yl) % 2 == 0
    }

    /// A pole is an on vertex, away from the border, with no wall segment
    /// attached to it.
    pub fn is_pole(&self, x: u32, y: u32) -> bool {
        self.is_vertex(x, y)
            && !self.active.is_border(x, y)
            && self.grid.get(x, y)
            && !self.grid.get(x - 1, y)
            && !self.grid.get(x + 1, y)
            && !self.grid.get(x, y - 1)
            && !self.grid.get(x, y + 1)
    }

    /// The two end vertices of the wall on the `dir` side of `cell`.
    pub fn wall_ends(&self, cell: Cell, dir: Direction) -> [(u32, u32); 2] {
        let Wall(x, y) = self.wall(cell, dir);
        match dir.orientation() {
            // Walls to the left or right run vertically
            Orientation::Horizontal => [(x, y - 1), (x, y + 1)],
            Orientation::Vertical => [(x - 1, y), (x + 1, y)],
        }
    }

    /// The cell whose right or lower side is `wall`, with that direction.
    /// `None` for pixels that are not an interior wall segment.
    pub fn wall_side(&self, wall: Wall) -> Option<(Cell, Direction)> {
        if !self.legal(wall.0, wall.1) || self.active.is_border(wall.0, wall.1) {
            return None;
        }
        let (rx, ry) = (wall.0 - self.active.xl, wall.1 - self.active.yl);
        match (rx % 2, ry % 2) {
            (0, 1) => Some((Cell(rx / 2 - 1, ry / 2), Direction::Right)),
            (1, 0) => Some((Cell(rx / 2, ry / 2 - 1), Direction::Down)),
            _ => None,
        }
    }

    /// Whether any wall segment leaves the vertex at `(x, y)`, other than `except`.
    pub fn vertex_has_segment(&self, x: u32, y: u32, except: Wall) -> bool {
        if self.active.is_border(x, y) {
            return true;
        }
        [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
            .into_iter()
            .any(|(sx, sy)| Wall(sx, sy) != except && self.grid.get(sx, sy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maze_dimensions() {
        let maze = Maze::new(5, 4, None).unwrap();
        assert_eq!(maze.grid().width(), 11);
        assert_eq!(maze.grid().height(), 9);
        assert_eq!(maze.cells_x(), 5);
        assert_eq!(maze.cells_y(), 4);
        assert_eq!(maze.cell_count(), 20);
    }

    #[test]
    fn test_carve() {
        let mut maze = Maze::new(5, 5, None).unwrap();
        maze.carve(Cell(1, 1), Direction::Right);
        assert!(maze.passable(Cell(1, 1), Direction::Right));
        assert!(maze.passable(Cell(2, 1), Direction::Left));
        // Check that the wall has been removed in the grid
        assert!(!maze.grid().get(4, 3));
        assert!(maze.is_dead_end(Cell(1, 1)));
    }

    #[test]
    fn test_out_of_bounds() {
        let maze = Maze::new(5, 5, None).unwrap();
        assert!(!maze.contains(Cell(5, 5)));
        assert!(!maze.contains(Cell(0, 5)));
        assert!(!maze.contains(Cell(5, 0)));
        assert!(maze.contains(Cell(4, 4)));
        assert_eq!(maze.neighbor(Cell(4, 0), Direction::Right), None);
        assert_eq!(maze.neighbors(Cell(0, 0)).count(), 2);
    }

    #[test]
    fn test_active_rectangle() {
        let mut maze = Maze::new(6, 6, None).unwrap();
        maze.set_active(Rect::new(2, 2, 8, 6)).unwrap();
        assert_eq!(maze.cells_x(), 3);
        assert_eq!(maze.cells_y(), 2);
        assert_eq!(maze.pixel(Cell(0, 0)), (3, 3));
        assert!(maze.legal(8, 6));
        assert!(!maze.legal(9, 6));
        assert!(maze.set_active(Rect::new(0, 0, 13, 3)).is_err());
    }

    #[test]
    fn test_clear_interior_and_poles() {
        let mut maze = Maze::new(3, 3, None).unwrap();
        maze.clear_interior();
        assert!(maze.grid().get(0, 3));
        assert!(!maze.grid().get(2, 2));
        maze.set(2, 2, true);
        assert!(maze.is_pole(2, 2));
        maze.set(2, 3, true);
        assert!(!maze.is_pole(2, 2));
    }

    #[test]
    fn test_directions() {
        assert_eq!(Direction::Up.turn_left(), Direction::Left);
        assert_eq!(Direction::Up.turn_right(), Direction::Right);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_wall_side() {
        let maze = Maze::new(4, 3, None).unwrap();
        let wall = maze.wall(Cell(2, 1), Direction::Down);
        assert_eq!(maze.wall_side(wall), Some((Cell(2, 1), Direction::Down)));
        let wall = maze.wall(Cell(1, 2), Direction::Left);
        assert_eq!(maze.wall_side(wall), Some((Cell(0, 2), Direction::Right)));
        // Border and vertex pixels are not interior segments
        assert_eq!(maze.wall_side(Wall(0, 3)), None);
        assert_eq!(maze.wall_side(Wall(2, 2)), None);
    }
}
