use crate::{
    context::{GenerationContext, Outcome},
    error::Result,
    maze::{Cell, Direction, Maze, Orientation},
};

/// An undivided area, in cells.
#[derive(Debug, Clone, Copy)]
struct Area {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Starts from an empty room and splits it with walls, each wall with a
/// single gap, until every area is narrower than `Settings::division_min`.
pub fn recursive_division(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    // Clear all walls in the maze, except the boundary walls
    maze.clear_interior();
    let min = ctx.settings.division_min.max(2);

    let mut stack = vec![Area {
        x: 0,
        y: 0,
        width: maze.cells_x(),
        height: maze.cells_y(),
    }];
    while let Some(area) = stack.pop() {
        if area.width < min || area.height < min {
            continue;
        }
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }

        let orientation = match area.width.cmp(&area.height) {
            std::cmp::Ordering::Less => Orientation::Horizontal,
            std::cmp::Ordering::Greater => Orientation::Vertical,
            std::cmp::Ordering::Equal => {
                if ctx.prefers_horizontal() {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                }
            }
        };

        match orientation {
            Orientation::Horizontal => {
                // Wall below row `y_wall`, with one gap
                let diff = ctx.below(area.height as usize - 1) as u32;
                let y_wall = area.y + diff;
                let x_hole = area.x + ctx.below(area.width as usize) as u32;
                for x in area.x..area.x + area.width {
                    raise_segment(maze, Cell(x, y_wall), Direction::Down, x != x_hole);
                }
                stack.push(Area {
                    height: diff + 1,
                    ..area
                });
                stack.push(Area {
                    y: y_wall + 1,
                    height: area.height - diff - 1,
                    ..area
                });
            }
            Orientation::Vertical => {
                let diff = ctx.below(area.width as usize - 1) as u32;
                let x_wall = area.x + diff;
                let y_hole = area.y + ctx.below(area.height as usize) as u32;
                for y in area.y..area.y + area.height {
                    raise_segment(maze, Cell(x_wall, y), Direction::Right, y != y_hole);
                }
                stack.push(Area {
                    width: diff + 1,
                    ..area
                });
                stack.push(Area {
                    x: x_wall + 1,
                    width: area.width - diff - 1,
                    ..area
                });
            }
        }
        ctx.budget.spend();
    }
    Ok(Outcome::Complete)
}

/// Turn on both end vertices of the wall on the `dir` side of `cell`, and
/// the segment itself unless it is the gap.
fn raise_segment(maze: &mut Maze, cell: Cell, dir: Direction, solid: bool) {
    for (x, y) in maze.wall_ends(cell, dir) {
        maze.set(x, y, true);
    }
    maze.set_wall(cell, dir, solid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Settings;

    #[test]
    fn test_division_is_perfect() {
        let mut maze = Maze::new(10, 8, None).unwrap();
        let mut ctx = GenerationContext::seeded(4);
        assert!(recursive_division(&mut maze, &mut ctx).unwrap().is_complete());
        assert!(crate::analysis::is_perfect(&maze));
    }

    #[test]
    fn test_division_leaves_rooms() {
        let mut maze = Maze::new(12, 12, None).unwrap();
        let mut ctx = GenerationContext::new(Settings {
            seed: Some(4),
            division_min: 5,
            ..Settings::default()
        });
        recursive_division(&mut maze, &mut ctx).unwrap();
        // Rooms hold cycles, so there are more open edges than a tree has
        assert!(crate::analysis::open_edge_count(&maze) > maze.cell_count() - 1);
        assert_eq!(crate::analysis::component_count(&maze).unwrap(), 1);
    }
}
