use crate::{
    context::{GenerationContext, Outcome},
    error::{Result, alloc_with_capacity},
    maze::{Cell, Direction, Maze},
};

/// What to do when the carver is boxed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Pop the stack and resume from the previous cell
    Backtrack,
    /// Sweep the grid for an unvisited cell next to the maze
    Hunt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Extending a passage from this cell
    Carving(Cell),
    /// Looking for a cell to restart from
    Hunting,
    Done,
}

/// Stepwise carver shared by the recursive backtracker and hunt-and-kill.
/// Visited cells are the open ones.
pub struct Carver {
    strategy: Strategy,
    phase: Phase,
    stack: Vec<Cell>,
    /// First row that may still hold unvisited cells
    hunt_row: u32,
}

impl Carver {
    /// Fill the active rectangle with walls and open a random starting cell.
    pub fn start(maze: &mut Maze, ctx: &mut GenerationContext, strategy: Strategy) -> Result<Self> {
        let capacity = match strategy {
            Strategy::Backtrack => maze.cell_count(),
            Strategy::Hunt => 0,
        };
        let stack = alloc_with_capacity(capacity, "backtrack stack")?;

        maze.fill_active(true);
        let start = Cell(
            ctx.below(maze.cells_x() as usize) as u32,
            ctx.below(maze.cells_y() as usize) as u32,
        );
        maze.set_open(start, true);

        Ok(Carver {
            strategy,
            phase: Phase::Carving(start),
            stack,
            hunt_row: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance by one transition and return the new phase.
    pub fn step(&mut self, maze: &mut Maze, ctx: &mut GenerationContext) -> Phase {
        self.phase = match self.phase {
            Phase::Carving(cell) => self.extend(maze, ctx, cell),
            Phase::Hunting => self.hunt(maze, ctx),
            Phase::Done => Phase::Done,
        };
        self.phase
    }

    /// Step until done or out of budget.
    pub fn run(&mut self, maze: &mut Maze, ctx: &mut GenerationContext) -> Outcome {
        while self.phase != Phase::Done {
            if ctx.budget.is_exhausted() {
                return Outcome::Truncated;
            }
            self.step(maze, ctx);
        }
        Outcome::Complete
    }

    fn extend(&mut self, maze: &mut Maze, ctx: &mut GenerationContext, cell: Cell) -> Phase {
        let unvisited = maze
            .neighbors(cell)
            .filter(|&(_, n)| !maze.is_open(n))
            .map(|(dir, _)| dir)
            .collect::<Vec<Direction>>();

        match ctx.pick_among(&unvisited) {
            Some(dir) => {
                maze.carve(cell, dir);
                ctx.budget.spend();
                if self.strategy == Strategy::Backtrack {
                    // Put the cell back first so we can look at another neighbor of this cell later
                    self.stack.push(cell);
                }
                match maze.neighbor(cell, dir) {
                    Some(next) => Phase::Carving(next),
                    None => Phase::Done,
                }
            }
            None => match self.strategy {
                Strategy::Backtrack => self.stack.pop().map_or(Phase::Done, Phase::Carving),
                Strategy::Hunt => Phase::Hunting,
            },
        }
    }

    fn hunt(&mut self, maze: &mut Maze, ctx: &mut GenerationContext) -> Phase {
        let (cx, cy) = (maze.cells_x(), maze.cells_y());
        for y in self.hunt_row..cy {
            let mut complete = true;
            for x in 0..cx {
                let cell = Cell(x, y);
                if maze.is_open(cell) {
                    continue;
                }
                complete = false;
                let visited = maze
                    .neighbors(cell)
                    .filter(|&(_, n)| maze.is_open(n))
                    .map(|(dir, _)| dir)
                    .collect::<Vec<Direction>>();
                if let Some(dir) = ctx.pick_among(&visited) {
                    maze.carve(cell, dir);
                    ctx.budget.spend();
                    return Phase::Carving(cell);
                }
            }
            if complete && y == self.hunt_row {
                self.hunt_row += 1;
            }
        }
        Phase::Done
    }
}

pub fn recursive_backtrack(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let mut carver = Carver::start(maze, ctx, Strategy::Backtrack)?;
    Ok(carver.run(maze, ctx))
}

pub fn hunt_and_kill(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let mut carver = Carver::start(maze, ctx, Strategy::Hunt)?;
    Ok(carver.run(maze, ctx))
}
