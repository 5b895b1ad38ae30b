use crate::{
    context::{GenerationContext, Outcome},
    error::{Result, alloc_vec},
    maze::{Cell, Direction, Maze},
};

/// Row sets as circular doubly-linked lists over column indices.
///
/// Sets in one row never interleave, so each list stays sorted and two
/// neighbors share a set exactly when `right[x] == x + 1`.
struct RowSets {
    left: Vec<u32>,
    right: Vec<u32>,
}

impl RowSets {
    fn new(width: usize) -> Result<Self> {
        let mut left = alloc_vec(width, 0u32, "eller row sets")?;
        left.iter_mut().enumerate().for_each(|(i, l)| *l = i as u32);
        let right = left.clone();
        Ok(RowSets { left, right })
    }

    fn same(&self, x: u32) -> bool {
        self.right[x as usize] == x + 1
    }

    fn alone(&self, x: u32) -> bool {
        self.left[x as usize] == x
    }

    /// Splice the set of `x + 1` into the set of `x`.
    fn join(&mut self, x: u32) {
        let (i, j) = (x as usize, x as usize + 1);
        let (ri, lj) = (self.right[i], self.left[j]);
        self.right[lj as usize] = ri;
        self.left[ri as usize] = lj;
        self.right[i] = j as u32;
        self.left[j] = x;
    }

    /// Take `x` out of its set, making it a singleton.
    fn split(&mut self, x: u32) {
        let i = x as usize;
        let (l, r) = (self.left[i], self.right[i]);
        self.left[r as usize] = l;
        self.right[l as usize] = r;
        self.left[i] = x;
        self.right[i] = x;
    }
}

/// Eller's algorithm: one row of state, linear time.
pub fn eller(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let (cx, cy) = (maze.cells_x(), maze.cells_y());
    let mut sets = RowSets::new(cx as usize)?;
    maze.fill_active(true);

    for y in 0..cy {
        let last_row = y + 1 == cy;
        for x in 0..cx {
            if ctx.budget.is_exhausted() {
                return Ok(Outcome::Truncated);
            }
            let cell = Cell(x, y);
            maze.set_open(cell, true);

            if x + 1 < cx && !sets.same(x) && (last_row || ctx.prefers_horizontal()) {
                sets.join(x);
                maze.carve(cell, Direction::Right);
                ctx.budget.spend();
            }
            if last_row {
                continue;
            }
            if !sets.alone(x) && ctx.prefers_horizontal() {
                // Wall below: the cell underneath starts a set of its own
                sets.split(x);
            } else {
                maze.carve(cell, Direction::Down);
                ctx.budget.spend();
            }
        }
    }
    Ok(Outcome::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_sets() {
        let mut sets = RowSets::new(4).unwrap();
        assert!(!sets.same(0));
        sets.join(0);
        sets.join(1);
        assert!(sets.same(0) && sets.same(1));
        assert!(!sets.alone(1));
        sets.split(1);
        assert!(sets.alone(1));
        assert_eq!(sets.right[0], 2);
        assert_eq!(sets.left[2], 0);
    }

    #[test]
    fn test_eller_spans() {
        let mut maze = Maze::new(12, 9, None).unwrap();
        let mut ctx = GenerationContext::seeded(17);
        assert!(eller(&mut maze, &mut ctx).unwrap().is_complete());
        assert_eq!(ctx.budget.spent(), 12 * 9 - 1);
        assert!(maze.cells().all(|c| maze.is_open(c)));
    }
}
