//! Distribution tests over the spanning trees of small cell grids.
//!
//! Wilson and Aldous-Broder sample uniformly, so their tree counts over the
//! 192 trees of a 3x3 grid are checked with a chi-squared statistic.
//! Random-order Kruskal, simple Prim and the growing tree in random mode
//! are biased samplers; for them every one of the 15 trees of a 2x3 grid
//! must still show up.

use std::collections::BTreeMap;

use bitmaze::{
    GenerationContext, Maze,
    analysis::{count_spanning_trees, is_perfect, open_edges},
    context::{Settings, TreePick},
    generators::{Generator, generate_maze},
};

/// Generate `samples` mazes from one seeded context and count each tree.
fn tally(
    (cells_x, cells_y): (u32, u32),
    generator: Generator,
    settings: Settings,
    samples: usize,
) -> BTreeMap<Vec<bool>, usize> {
    let mut ctx = GenerationContext::new(settings);
    let mut counts = BTreeMap::new();
    for _ in 0..samples {
        let mut maze = Maze::new(cells_x, cells_y, None).unwrap();
        ctx.reset_budget(None);
        generate_maze(&mut maze, generator, &mut ctx).unwrap();
        assert!(is_perfect(&maze), "{generator}");
        *counts.entry(open_edges(&maze)).or_insert(0) += 1;
    }
    counts
}

fn chi_squared(counts: &BTreeMap<Vec<bool>, usize>, trees: usize, samples: usize) -> f64 {
    let expected = samples as f64 / trees as f64;
    let seen = counts
        .values()
        .map(|&n| (n as f64 - expected).powi(2) / expected)
        .sum::<f64>();
    // Trees never drawn contribute `expected` each
    seen + (trees - counts.len()) as f64 * expected
}

fn seeded(seed: u64) -> Settings {
    Settings {
        seed: Some(seed),
        ..Settings::default()
    }
}

#[test]
fn test_uniform_samplers() {
    let trees = count_spanning_trees(3, 3).round() as usize;
    assert_eq!(trees, 192);
    let samples = trees * 60;
    for generator in [Generator::Wilson, Generator::AldousBroder] {
        let counts = tally((3, 3), generator, seeded(1234), samples);
        assert_eq!(counts.len(), trees, "{generator}");
        // 191 degrees of freedom: mean 191, standard deviation about 19.5
        let statistic = chi_squared(&counts, trees, samples);
        assert!(statistic < 320.0, "{generator}: chi-squared {statistic:.1}");
    }
}

#[test]
fn test_biased_samplers_reach_every_tree() {
    let trees = count_spanning_trees(2, 3).round() as usize;
    assert_eq!(trees, 15);
    let samples = 20_000;
    let random_tree = Settings {
        tree_pick: TreePick::Random,
        ..seeded(99)
    };
    for (generator, settings) in [
        (Generator::Kruskal, seeded(99)),
        (Generator::Prim, seeded(99)),
        (Generator::PrimWeighted, seeded(99)),
        (Generator::GrowingTree, random_tree),
    ] {
        let counts = tally((2, 3), generator, settings, samples);
        assert_eq!(counts.len(), trees, "{generator}");
    }
}
