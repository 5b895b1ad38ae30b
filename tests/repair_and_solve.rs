//! Property tests for the repair passes and the solvers.

use proptest::prelude::*;

use bitmaze::{
    Cell, GenerationContext, Maze,
    analysis::{component_count, dead_end_count, is_perfect, open_edge_count},
    context::Symmetry,
    generators::{Generator, generate_maze},
    repair::{braid, crack_dead_ends, enforce_symmetry, remove_isolations, remove_loops},
    solvers::{
        Solver, all_shortest_paths, default_endpoints, fill_dead_ends, shortest_path, solve_maze,
    },
};

fn any_generator() -> impl Strategy<Value = Generator> {
    (0..Generator::ALL.len()).prop_map(|i| Generator::ALL[i])
}

fn generated(generator: Generator, seed: u64, cells_x: u32, cells_y: u32) -> (Maze, GenerationContext) {
    let mut maze = Maze::new(cells_x, cells_y, None).unwrap();
    let mut ctx = GenerationContext::seeded(seed);
    generate_maze(&mut maze, generator, &mut ctx).unwrap();
    (maze, ctx)
}

/// Arbitrary pixels inside the border of a maze.
fn noise(cells_x: u32, cells_y: u32) -> impl Strategy<Value = Maze> {
    let (width, height) = (cells_x * 2 + 1, cells_y * 2 + 1);
    proptest::collection::vec(any::<bool>(), (width * height) as usize).prop_map(move |bits| {
        let mut maze = Maze::new(cells_x, cells_y, None).unwrap();
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                maze.set(x, y, bits[(y * width + x) as usize]);
            }
        }
        maze
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// No open cell is left with a single way out.
    #[test]
    fn prop_braid_removes_dead_ends(
        generator in any_generator(),
        seed in any::<u64>(),
        cells_x in 2u32..12,
        cells_y in 2u32..12,
    ) {
        let (mut maze, mut ctx) = generated(generator, seed, cells_x, cells_y);
        prop_assert!(braid(&mut maze, &mut ctx).unwrap().is_complete());
        prop_assert!(maze.cells().all(|c| maze.open_count(c) != 1), "{}", generator);
        prop_assert_eq!(component_count(&maze).unwrap(), 1);
    }

    /// Whatever the bitmap holds, one connected section is left and every
    /// cell is open.
    #[test]
    fn prop_isolations_removed(
        maze in (2u32..9, 2u32..9).prop_flat_map(|(x, y)| noise(x, y)),
        seed in any::<u64>(),
    ) {
        let mut maze = maze;
        let mut ctx = GenerationContext::seeded(seed);
        prop_assert!(remove_isolations(&mut maze, &mut ctx).unwrap().is_complete());
        prop_assert_eq!(component_count(&maze).unwrap(), 1);
        prop_assert!(maze.cells().all(|c| maze.is_open(c)));
    }

    /// Loop removal on a braided maze gives back a perfect maze.
    #[test]
    fn prop_remove_loops_after_braid(
        seed in any::<u64>(),
        cells_x in 2u32..10,
        cells_y in 2u32..10,
    ) {
        let (mut maze, mut ctx) = generated(Generator::Kruskal, seed, cells_x, cells_y);
        braid(&mut maze, &mut ctx).unwrap();
        remove_loops(&mut maze, &mut ctx).unwrap();
        prop_assert!(is_perfect(&maze));
    }

    /// Filling converges: a second pass changes nothing, and in a perfect
    /// maze what is left is exactly the shortest route.
    #[test]
    fn prop_dead_end_fill_is_idempotent(
        generator in any_generator(),
        seed in any::<u64>(),
        cells_x in 2u32..12,
        cells_y in 2u32..12,
    ) {
        let (mut maze, mut ctx) = generated(generator, seed, cells_x, cells_y);
        let (start, end) = default_endpoints(&maze);
        let route = shortest_path(&maze, start, end).unwrap().unwrap();

        fill_dead_ends(&mut maze, start, end, &mut ctx);
        let once = maze.clone();
        fill_dead_ends(&mut maze, start, end, &mut ctx);
        prop_assert_eq!(&maze, &once);
        prop_assert_eq!(maze.cells().filter(|&c| maze.is_open(c)).count(), route.len());
    }

    /// Every solver that answers gives a valid route between the endpoints,
    /// never shorter than the BFS one.
    #[test]
    fn prop_solver_routes_are_valid(
        generator in any_generator(),
        seed in any::<u64>(),
        cells_x in 2u32..10,
        cells_y in 2u32..10,
        braided in any::<bool>(),
    ) {
        let (mut maze, mut ctx) = generated(generator, seed, cells_x, cells_y);
        if braided {
            braid(&mut maze, &mut ctx).unwrap();
        }
        let (start, end) = default_endpoints(&maze);
        let best = shortest_path(&maze, start, end).unwrap().unwrap();
        let on_some_shortest = all_shortest_paths(&maze, start, end).unwrap();
        prop_assert!(best.cells().iter().all(|c| on_some_shortest.contains(c)));

        for solver in Solver::ALL {
            let mut copy = maze.clone();
            let Some(route) = solve_maze(&mut copy, solver, start, end, &mut ctx).unwrap() else {
                // Only the heuristic walkers may give up
                prop_assert!(matches!(solver, Solver::Pledge | Solver::Backtrack), "{}", solver);
                continue;
            };
            prop_assert!(route.is_valid(&copy), "{}", solver);
            prop_assert_eq!(route.cells().first(), Some(&start));
            prop_assert_eq!(route.cells().last(), Some(&end));
            prop_assert!(route.len() >= best.len(), "{}", solver);
        }
    }

    /// Endpoints anywhere inside a perfect maze, not just the corners: every
    /// solver returns, and all but Pledge and the backtracking search answer.
    #[test]
    fn prop_solvers_with_inner_endpoints(
        generator in any_generator(),
        seed in any::<u64>(),
        cells_x in 2u32..9,
        cells_y in 2u32..9,
        from in any::<(u32, u32)>(),
        to in any::<(u32, u32)>(),
    ) {
        let (maze, mut ctx) = generated(generator, seed, cells_x, cells_y);
        let start = Cell(from.0 % cells_x, from.1 % cells_y);
        let end = Cell(to.0 % cells_x, to.1 % cells_y);
        prop_assume!(start != end);
        let best = shortest_path(&maze, start, end).unwrap().unwrap();

        for solver in Solver::ALL {
            let mut copy = maze.clone();
            let Some(route) = solve_maze(&mut copy, solver, start, end, &mut ctx).unwrap() else {
                prop_assert!(matches!(solver, Solver::Pledge | Solver::Backtrack), "{}", solver);
                continue;
            };
            prop_assert!(route.is_valid(&copy), "{}", solver);
            prop_assert_eq!(route.cells().first(), Some(&start));
            prop_assert_eq!(route.cells().last(), Some(&end));
            // A tree has one route between any two cells
            prop_assert_eq!(&route, &best, "{}", solver);
        }
    }
}

#[test]
fn test_crack_keeps_perfect_mazes_connected() {
    let (mut maze, mut ctx) = generated(Generator::Wilson, 5, 12, 12);
    let before = dead_end_count(&maze);
    crack_dead_ends(&mut maze, &mut ctx).unwrap();
    assert!(dead_end_count(&maze) < before);
    assert!(open_edge_count(&maze) >= maze.cell_count());
    assert_eq!(component_count(&maze).unwrap(), 1);
}

#[test]
fn test_symmetry_on_every_generator() {
    for generator in Generator::ALL {
        for symmetry in [Symmetry::Horizontal, Symmetry::Vertical, Symmetry::Rotate180, Symmetry::Rotate90] {
            let (mut maze, mut ctx) = generated(generator, 17, 9, 9);
            enforce_symmetry(&mut maze, &mut ctx, symmetry).unwrap();
            assert_eq!(component_count(&maze).unwrap(), 1, "{generator} {symmetry:?}");
            assert!(maze.cells().all(|c| maze.is_open(c)), "{generator} {symmetry:?}");
            if symmetry == Symmetry::Horizontal {
                let grid = maze.grid();
                let mirrored = (0..grid.height()).all(|y| {
                    (0..grid.width()).all(|x| grid.get(x, y) == grid.get(grid.width() - 1 - x, y))
                });
                assert!(mirrored, "{generator}");
            }
        }
    }
}

#[test]
fn test_solvers_on_open_room() {
    let mut maze = Maze::new(6, 4, None).unwrap();
    maze.clear_interior();
    let (start, end) = (Cell(0, 0), Cell(5, 3));
    let mut ctx = GenerationContext::seeded(0);
    let route = solve_maze(&mut maze, Solver::Bfs, start, end, &mut ctx).unwrap().unwrap();
    assert_eq!(route.len(), 9);
    // Every cell of an open room is on some shortest route between opposite corners
    assert_eq!(all_shortest_paths(&maze, start, end).unwrap().len(), 24);
}
