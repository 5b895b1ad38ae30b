use bitmaze::{
    app::{App, Job},
    generators::Generator,
    solvers::Solver,
};

/// Time every generator followed by a BFS solve, with the display hook
/// attached. Usage: `profile [iterations] [size]`.
fn main() -> anyhow::Result<()> {
    let app = App::default();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let iterations = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    let size = args.next().and_then(|s| s.parse::<u32>().ok()).unwrap_or(255);

    for generator in Generator::ALL {
        let mut job = Job::new(size, size, generator);
        job.settings.seed = Some(0);
        job.solver = Some(Solver::Bfs);
        let elapsed = app.profile(&job, iterations)?;
        println!(
            "{:<32} {:>12.3?} per run",
            generator.to_string(),
            elapsed / iterations as u32
        );
    }
    Ok(())
}
