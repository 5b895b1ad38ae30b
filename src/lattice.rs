//! Explicit graph views of a maze.
//!
//! A perfect maze is a spanning tree of the cells, and by planar duality its
//! walls form a spanning tree of the wall vertices, with the whole border
//! counted as one vertex. [`Lattice`] builds either graph as plain arrays
//! (nodes, links and adjacency in compressed rows) so that the generators
//! that work in both directions, and the repair passes working on cells or
//! on walls, are written once.

use crate::error::{Result, alloc_vec, alloc_with_capacity};
use crate::maze::{Cell, Direction, Maze, Wall};

/// Which way a generator builds the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// Start from solid rock and carve passages between cells
    #[default]
    Carve,
    /// Start from an empty room and add walls between vertices
    Build,
}

/// An edge of the lattice and the pixel that stands for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub a: u32,
    pub b: u32,
    pub wall: Wall,
}

impl Link {
    pub fn other(&self, node: u32) -> u32 {
        if node == self.a { self.b } else { self.a }
    }
}

pub struct Lattice {
    mode: Mode,
    /// Pixel per node. The border super-node has none.
    pixels: Vec<Option<(u32, u32)>>,
    links: Vec<Link>,
    /// `adjacency[offsets[n]..offsets[n + 1]]` are the links of node `n`
    offsets: Vec<u32>,
    adjacency: Vec<u32>,
}

impl Lattice {
    /// Node standing for the whole border in a wall lattice.
    pub const BORDER: u32 = 0;

    pub fn new(maze: &Maze, mode: Mode) -> Result<Self> {
        match mode {
            Mode::Carve => Lattice::cells(maze),
            Mode::Build => Lattice::walls(maze),
        }
    }

    /// Cells as nodes, joined to their right and lower neighbors.
    pub fn cells(maze: &Maze) -> Result<Self> {
        let (cx, cy) = (maze.cells_x(), maze.cells_y());
        let mut pixels = alloc_with_capacity(maze.cell_count(), "lattice nodes")?;
        pixels.extend(maze.cells().map(|cell| Some(maze.pixel(cell))));

        let link_count = (cx.saturating_sub(1) * cy + cx * cy.saturating_sub(1)) as usize;
        let mut links = alloc_with_capacity(link_count, "lattice links")?;
        for cell in maze.cells() {
            let i = maze.index(cell) as u32;
            if cell.0 + 1 < cx {
                links.push(Link {
                    a: i,
                    b: i + 1,
                    wall: maze.wall(cell, Direction::Right),
                });
            }
            if cell.1 + 1 < cy {
                links.push(Link {
                    a: i,
                    b: i + cx,
                    wall: maze.wall(cell, Direction::Down),
                });
            }
        }
        Lattice::assemble(Mode::Carve, pixels, links)
    }

    /// Interior vertices plus the border as nodes, joined by the wall
    /// segments that are not part of the border.
    pub fn walls(maze: &Maze) -> Result<Self> {
        let (cx, cy) = (maze.cells_x(), maze.cells_y());
        let inner_x = cx.saturating_sub(1);
        let inner_y = cy.saturating_sub(1);
        let node_of = |vx: u32, vy: u32| -> u32 {
            if vx == 0 || vy == 0 || vx >= cx || vy >= cy {
                Lattice::BORDER
            } else {
                1 + (vy - 1) * inner_x + (vx - 1)
            }
        };

        let mut pixels = alloc_with_capacity(1 + (inner_x * inner_y) as usize, "lattice nodes")?;
        pixels.push(None);
        for vy in 1..cy {
            for vx in 1..cx {
                pixels.push(Some(maze.vertex(vx, vy)));
            }
        }

        let mut links = alloc_with_capacity(2 * (cx as usize + 1) * (cy as usize + 1), "lattice links")?;
        for vy in 0..=cy {
            for vx in 0..=cx {
                let (x, y) = maze.vertex(vx, vy);
                if vx < cx {
                    let (a, b) = (node_of(vx, vy), node_of(vx + 1, vy));
                    if a != Lattice::BORDER || b != Lattice::BORDER {
                        links.push(Link {
                            a,
                            b,
                            wall: Wall(x + 1, y),
                        });
                    }
                }
                if vy < cy {
                    let (a, b) = (node_of(vx, vy), node_of(vx, vy + 1));
                    if a != Lattice::BORDER || b != Lattice::BORDER {
                        links.push(Link {
                            a,
                            b,
                            wall: Wall(x, y + 1),
                        });
                    }
                }
            }
        }
        Lattice::assemble(Mode::Build, pixels, links)
    }

    fn assemble(mode: Mode, pixels: Vec<Option<(u32, u32)>>, links: Vec<Link>) -> Result<Self> {
        let nodes = pixels.len();
        let mut offsets = alloc_vec(nodes + 1, 0u32, "lattice adjacency")?;
        for link in &links {
            offsets[link.a as usize + 1] += 1;
            offsets[link.b as usize + 1] += 1;
        }
        for i in 0..nodes {
            offsets[i + 1] += offsets[i];
        }
        let mut adjacency = alloc_vec(links.len() * 2, 0u32, "lattice adjacency")?;
        let mut fill = offsets.clone();
        for (id, link) in links.iter().enumerate() {
            for node in [link.a, link.b] {
                adjacency[fill[node as usize] as usize] = id as u32;
                fill[node as usize] += 1;
            }
        }
        Ok(Lattice {
            mode,
            pixels,
            links,
            offsets,
            adjacency,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn node_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, id: u32) -> Link {
        self.links[id as usize]
    }

    /// Ids of the links touching `node`.
    pub fn links_of(&self, node: u32) -> &[u32] {
        let start = self.offsets[node as usize] as usize;
        let end = self.offsets[node as usize + 1] as usize;
        &self.adjacency[start..end]
    }

    pub fn node_pixel(&self, node: u32) -> Option<(u32, u32)> {
        self.pixels[node as usize]
    }

    /// The cell a node of a cell lattice stands for.
    pub fn cell(&self, maze: &Maze, node: u32) -> Cell {
        maze.cell_at(node as usize)
    }

    /// Whether a node takes part in the maze as it stands: every cell does,
    /// a vertex only when its pixel is on.
    pub fn is_present(&self, maze: &Maze, node: u32) -> bool {
        match (self.mode, self.pixels[node as usize]) {
            (Mode::Carve, _) | (Mode::Build, None) => true,
            (Mode::Build, Some((x, y))) => maze.get(x, y),
        }
    }

    /// Whether the link is currently a passage (cells) or a wall (vertices).
    pub fn is_linked(&self, maze: &Maze, id: u32) -> bool {
        let link = self.link(id);
        match self.mode {
            Mode::Carve => {
                !maze.is_wall(link.wall)
                    && !self.pixel_on(maze, link.a)
                    && !self.pixel_on(maze, link.b)
            }
            Mode::Build => maze.is_wall(link.wall),
        }
    }

    fn pixel_on(&self, maze: &Maze, node: u32) -> bool {
        self.pixels[node as usize].is_some_and(|(x, y)| maze.get(x, y))
    }

    fn set_node(&self, maze: &mut Maze, node: u32, on: bool) {
        if let Some((x, y)) = self.pixels[node as usize] {
            maze.set(x, y, on);
        }
    }

    /// Open a passage (cells) or raise a wall (vertices) along the link.
    pub fn connect(&self, maze: &mut Maze, id: u32) {
        let link = self.link(id);
        let on = self.mode == Mode::Build;
        maze.set_wall_pixel(link.wall, on);
        self.set_node(maze, link.a, on);
        self.set_node(maze, link.b, on);
    }

    /// Undo a link: close the passage or knock down the wall.
    pub fn disconnect(&self, maze: &mut Maze, id: u32) {
        let link = self.link(id);
        maze.set_wall_pixel(link.wall, self.mode == Mode::Carve);
    }

    /// Mark a node as part of the growing maze.
    pub fn open_node(&self, maze: &mut Maze, node: u32) {
        self.set_node(maze, node, self.mode == Mode::Build);
    }

    /// Blank canvas for a generator: solid rock for carving (optionally with
    /// every cell already open), or an empty walled room for building.
    pub fn prepare(&self, maze: &mut Maze, open_nodes: bool) {
        match self.mode {
            Mode::Carve => {
                maze.fill_active(true);
                if open_nodes {
                    (0..self.node_count() as u32).for_each(|n| self.set_node(maze, n, false));
                }
            }
            Mode::Build => maze.clear_interior(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_lattice_shape() {
        let maze = Maze::new(3, 2, None).unwrap();
        let lattice = Lattice::cells(&maze).unwrap();
        assert_eq!(lattice.node_count(), 6);
        // 2 horizontal links per row, 3 vertical links
        assert_eq!(lattice.links().len(), 7);
        assert_eq!(lattice.links_of(0).len(), 2);
        assert_eq!(lattice.links_of(4).len(), 3);
    }

    #[test]
    fn test_wall_lattice_shape() {
        let maze = Maze::new(3, 3, None).unwrap();
        let lattice = Lattice::walls(&maze).unwrap();
        // Border plus a 2x2 block of interior vertices
        assert_eq!(lattice.node_count(), 5);
        // Every interior wall segment: 2*3 + 3*2
        assert_eq!(lattice.links().len(), 12);
        assert_eq!(lattice.links_of(1).len(), 4);
        assert_eq!(lattice.links_of(Lattice::BORDER).len(), 8);
    }

    #[test]
    fn test_connect_both_modes() {
        let mut maze = Maze::new(2, 2, None).unwrap();
        let cells = Lattice::cells(&maze).unwrap();
        cells.prepare(&mut maze, true);
        assert!(!cells.is_linked(&maze, 0));
        cells.connect(&mut maze, 0);
        assert!(cells.is_linked(&maze, 0));
        cells.disconnect(&mut maze, 0);
        assert!(!cells.is_linked(&maze, 0));

        let walls = Lattice::walls(&maze).unwrap();
        walls.prepare(&mut maze, false);
        assert!(!walls.is_linked(&maze, 0));
        walls.connect(&mut maze, 0);
        assert!(walls.is_linked(&maze, 0));
        assert!(walls.is_present(&maze, 1));
    }
}
