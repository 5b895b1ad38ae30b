use crate::maze::Maze;

/// Clear every wall vertex with no segment attached. Returns how many were
/// removed.
pub fn remove_poles(maze: &mut Maze) -> usize {
    let (cx, cy) = (maze.cells_x(), maze.cells_y());
    let mut removed = 0;
    for vy in 1..cy {
        for vx in 1..cx {
            let (x, y) = maze.vertex(vx, vy);
            if maze.is_pole(x, y) {
                maze.set(x, y, false);
                removed += 1;
            }
        }
    }
    tracing::debug!("[repair] removed {} poles", removed);
    removed
}
