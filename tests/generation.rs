//! Property tests for the maze generators.

use proptest::prelude::*;

use bitmaze::{
    Cell, GenerationContext, Maze, Outcome,
    analysis::{component_count, is_perfect, open_edge_count},
    context::{Settings, TreePick},
    generators::{Generator, generate_maze},
    lattice::Mode,
    solvers::{all_shortest_paths, default_endpoints, distance_map, shortest_path},
};

fn any_generator() -> impl Strategy<Value = Generator> {
    (0..Generator::ALL.len()).prop_map(|i| Generator::ALL[i])
}

fn any_tree_pick() -> impl Strategy<Value = TreePick> {
    prop_oneof![
        Just(TreePick::Newest),
        Just(TreePick::Random),
        Just(TreePick::Oldest),
        (1u32..6).prop_map(TreePick::Window),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A completed generation is a spanning tree: every cell open, one
    /// component, and one passage fewer than there are cells.
    #[test]
    fn prop_generators_span(
        generator in any_generator(),
        seed in any::<u64>(),
        cells_x in 1u32..14,
        cells_y in 1u32..14,
        bias in -10i32..=10,
        run in 0u32..4,
        tree_pick in any_tree_pick(),
    ) {
        let mut maze = Maze::new(cells_x, cells_y, None).unwrap();
        let mut ctx = GenerationContext::new(Settings {
            seed: Some(seed),
            bias,
            run,
            tree_pick,
            ..Settings::default()
        });
        let outcome = generate_maze(&mut maze, generator, &mut ctx).unwrap();
        prop_assert_eq!(outcome, Outcome::Complete);
        prop_assert_eq!(open_edge_count(&maze), maze.cell_count() - 1, "{}", generator);
        prop_assert_eq!(component_count(&maze).unwrap(), 1, "{}", generator);
        prop_assert!(maze.cells().all(|c| maze.is_open(c)));
    }

    /// Building walls instead of carving passages gives the same guarantee.
    #[test]
    fn prop_build_mode_spans(
        generator in any_generator().prop_filter("builds walls", |g| g.can_build()),
        seed in any::<u64>(),
        cells_x in 1u32..12,
        cells_y in 1u32..12,
    ) {
        let mut maze = Maze::new(cells_x, cells_y, None).unwrap();
        let mut ctx = GenerationContext::new(Settings {
            seed: Some(seed),
            mode: Mode::Build,
            ..Settings::default()
        });
        generate_maze(&mut maze, generator, &mut ctx).unwrap();
        prop_assert!(is_perfect(&maze), "{}", generator);
    }

    /// Same seed, algorithm and size: byte-identical bitmaps.
    #[test]
    fn prop_seeded_generation_is_deterministic(
        generator in any_generator(),
        seed in any::<u64>(),
        cells_x in 1u32..10,
        cells_y in 1u32..10,
    ) {
        let build = || {
            let mut maze = Maze::new(cells_x, cells_y, None).unwrap();
            let mut ctx = GenerationContext::seeded(seed);
            generate_maze(&mut maze, generator, &mut ctx).unwrap();
            maze
        };
        let (a, b) = (build(), build());
        prop_assert_eq!(a.grid().words(), b.grid().words());
    }

    /// A budget too small to finish stops the pass without an error.
    #[test]
    fn prop_budget_truncates(
        generator in any_generator().prop_filter("spends per passage", |&g| g != Generator::Division),
        seed in any::<u64>(),
        cells in 3u32..10,
        fraction in 0.0f64..1.0,
    ) {
        let mut maze = Maze::new(cells, cells, None).unwrap();
        let limit = ((maze.cell_count() - 1) as f64 * fraction) as u64;
        let mut ctx = GenerationContext::new(Settings {
            seed: Some(seed),
            budget: Some(limit),
            ..Settings::default()
        });
        let outcome = generate_maze(&mut maze, generator, &mut ctx).unwrap();
        prop_assert_eq!(outcome, Outcome::Truncated, "{}", generator);
        prop_assert!(ctx.budget.spent() <= limit);
    }
}

#[test]
fn test_backtracker_five_by_five() {
    let mut maze = Maze::new(5, 5, None).unwrap();
    assert_eq!((maze.grid().width(), maze.grid().height()), (11, 11));
    let mut ctx = GenerationContext::seeded(42);
    generate_maze(&mut maze, Generator::Backtrack, &mut ctx).unwrap();

    assert_eq!(open_edge_count(&maze), 24);
    assert_eq!(component_count(&maze).unwrap(), 1);

    let (start, end) = default_endpoints(&maze);
    let route = shortest_path(&maze, start, end).unwrap().unwrap();
    let distance = distance_map(&maze, start).unwrap()[maze.index(end)].unwrap();
    assert_eq!(route.len(), distance as usize + 1);
    // Seed 42 runs along the top row and down the right edge
    assert_eq!(distance, 8);
    assert_eq!(route.len(), 9);
    assert_eq!(route.cells()[4], Cell(4, 0));
    // The route is the only shortest one
    assert_eq!(all_shortest_paths(&maze, start, end).unwrap().len(), route.len());

    // Same seed, same maze
    let mut again = Maze::new(5, 5, None).unwrap();
    generate_maze(&mut again, Generator::Backtrack, &mut GenerationContext::seeded(42)).unwrap();
    assert_eq!(again, maze);
}

#[test]
fn test_eller_large() {
    let mut maze = Maze::new(100, 100, None).unwrap();
    let mut ctx = GenerationContext::seeded(7);
    let outcome = generate_maze(&mut maze, Generator::Eller, &mut ctx).unwrap();
    assert!(outcome.is_complete());
    // One carve per passage, nothing more
    assert_eq!(ctx.budget.spent(), 100 * 100 - 1);
    assert!(is_perfect(&maze));
}

#[test]
fn test_active_rectangle_is_respected() {
    let mut maze = Maze::new(8, 8, None).unwrap();
    maze.set_active(bitmaze::maze::Rect::new(2, 4, 12, 14)).unwrap();
    let mut ctx = GenerationContext::seeded(3);
    generate_maze(&mut maze, Generator::Kruskal, &mut ctx).unwrap();
    assert_eq!((maze.cells_x(), maze.cells_y()), (5, 5));
    assert!(is_perfect(&maze));

    // Pixels outside the rectangle keep their initial wall state
    let grid = maze.grid();
    assert!((0..grid.width()).all(|x| grid.get(x, 0) && grid.get(x, 3)));
    assert!((0..grid.height()).all(|y| grid.get(0, y) && grid.get(16, y)));
}
