use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use bitmaze::{
    app::{App, Job, Repair},
    context::{Settings, Symmetry, TreePick},
    generators::Generator,
    lattice::Mode,
    random::RandomPolicy,
    solvers::Solver,
};

/// How the growing tree picks its next active cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Pick {
    Newest,
    Random,
    Oldest,
    /// Random among the `--window` newest
    Window,
}

/// Generate, repair and solve mazes drawn on a bitmap.
#[derive(Parser)]
#[command(about, long_about = None, version)]
struct Args {
    /// Maze width in cells
    #[arg(short = 'W', long, default_value_t = 20)]
    width: u32,

    /// Maze height in cells
    #[arg(short = 'H', long, default_value_t = 12)]
    height: u32,

    /// Generation algorithm
    #[arg(value_enum, short, long, default_value_t = Generator::Backtrack)]
    generator: Generator,

    /// Carve passages, or add walls for the generators that can
    #[arg(value_enum, short, long, default_value_t = Mode::Carve)]
    mode: Mode,

    /// Seed for reproducible mazes
    #[arg(short, long)]
    seed: Option<u64>,

    /// Direction bias: positive favors horizontal passages, negative vertical ones
    #[arg(long, default_value_t = 0, allow_hyphen_values = true,
          value_parser = clap::value_parser!(i32).range(-(RandomPolicy::MAX_BIAS as i64)..=RandomPolicy::MAX_BIAS as i64))]
    bias: i32,

    /// Longest run of repeated directions the policy may add after a pick, 0 for none
    #[arg(long, default_value_t = 0)]
    run: u32,

    /// Stop after this many carved or filled cells
    #[arg(long)]
    budget: Option<u64>,

    /// Growing tree cell selection
    #[arg(value_enum, long, default_value_t = Pick::Newest)]
    tree_pick: Pick,

    /// Window size for `--tree-pick window`
    #[arg(long, default_value_t = 5)]
    window: u32,

    /// Number of seeds for the growing forest
    #[arg(long, default_value_t = 4)]
    forest_trees: u32,

    /// Recursive division leaves rooms narrower than this open
    #[arg(long, default_value_t = 2)]
    division_min: u32,

    /// Repairs to apply after generation, in order
    #[arg(value_enum, short, long)]
    repair: Vec<Repair>,

    /// Remove every dead end
    #[arg(short, long, default_value_t = false)]
    braid: bool,

    /// Make the maze symmetric
    #[arg(value_enum, long)]
    symmetry: Option<Symmetry>,

    /// Dead-end cracking passes after `--symmetry`; the last may leave poles
    #[arg(long, default_value_t = 4)]
    symmetry_passes: u32,

    /// Solving algorithm
    #[arg(value_enum, long, default_value_t = Solver::Bfs)]
    solver: Solver,

    /// Skip solving
    #[arg(long, default_value_t = false)]
    no_solve: bool,

    /// Animate generation and solving in the terminal
    #[arg(short, long, default_value_t = false)]
    animate: bool,

    /// Delay after each animated pixel, in microseconds
    #[arg(long)]
    delay_us: Option<u64>,

    /// Where to write logs
    #[arg(long, default_value = "bitmaze.log")]
    log_file: PathBuf,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

impl Args {
    fn job(&self) -> Job {
        let tree_pick = match self.tree_pick {
            Pick::Newest => TreePick::Newest,
            Pick::Random => TreePick::Random,
            Pick::Oldest => TreePick::Oldest,
            Pick::Window => TreePick::Window(self.window.max(1)),
        };
        Job {
            width: self.width,
            height: self.height,
            generator: self.generator,
            settings: Settings {
                seed: self.seed,
                bias: self.bias,
                run: self.run,
                budget: self.budget,
                mode: self.mode,
                tree_pick,
                forest_trees: self.forest_trees,
                division_min: self.division_min,
                symmetry_passes: self.symmetry_passes,
            },
            repairs: self.repair.clone(),
            braid: self.braid,
            symmetry: self.symmetry,
            solver: (!self.no_solve).then_some(self.solver),
        }
    }
}

/// Log to a file so records never land in the middle of the terminal drawing.
/// The returned guard flushes the writer when dropped.
fn init_logging(path: &Path, debug: bool) -> anyhow::Result<WorkerGuard> {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log file {} has no file name", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = init_logging(&args.log_file, args.debug)?;

    if args.mode == Mode::Build && !args.generator.can_build() {
        tracing::warn!("{} only carves, ignoring --mode build", args.generator);
        eprintln!("{} only carves, ignoring --mode build", args.generator);
    }

    let job = args.job();
    tracing::info!("Starting {} on {}x{} cells", job.generator, job.width, job.height);
    let app = App::default().with_frame_delay(args.delay_us.map(Duration::from_micros));

    if args.animate {
        match app.animate(job)? {
            Some(report) => report.summary().iter().for_each(|line| println!("{}", line)),
            None => println!("Cancelled."),
        }
    } else {
        app.print(&job, &mut std::io::stdout())?;
    }
    Ok(())
}
