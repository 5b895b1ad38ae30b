//! Terminal front end: runs a generate, repair and solve pipeline and
//! either prints the result or animates it from the display hook.

mod renderer;

pub use renderer::{Glyph, Renderer, RendererStatus, write_grid};

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    time::{Duration, Instant},
};

use anyhow::anyhow;
use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    terminal::{self, ClearType},
};

use crate::{
    analysis,
    context::{GenerationContext, Outcome, Settings, Symmetry},
    error::Result,
    generators::{Generator, generate_maze},
    maze::{Cell, GridEvent, Maze},
    repair,
    solvers::{Route, Solver, default_endpoints, solve_maze},
};

/// Topology fixes the pipeline can apply after generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Repair {
    Isolations,
    Detachments,
    Poles,
    Loops,
    Crack,
}

impl std::fmt::Display for Repair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repair::Isolations => write!(f, "Remove Isolations"),
            Repair::Detachments => write!(f, "Remove Detachments"),
            Repair::Poles => write!(f, "Remove Poles"),
            Repair::Loops => write!(f, "Remove Loops"),
            Repair::Crack => write!(f, "Crack Dead Ends"),
        }
    }
}

/// One generate, repair and solve run.
#[derive(Debug, Clone)]
pub struct Job {
    /// Maze size in cells
    pub width: u32,
    pub height: u32,
    pub generator: Generator,
    pub settings: Settings,
    /// Applied in order after generation
    pub repairs: Vec<Repair>,
    pub braid: bool,
    pub symmetry: Option<Symmetry>,
    pub solver: Option<Solver>,
}

impl Job {
    pub fn new(width: u32, height: u32, generator: Generator) -> Self {
        Job {
            width,
            height,
            generator,
            settings: Settings::default(),
            repairs: Vec::new(),
            braid: false,
            symmetry: None,
            solver: Some(Solver::Bfs),
        }
    }
}

/// What a finished job produced.
#[derive(Debug)]
pub struct Report {
    pub maze: Maze,
    /// `Truncated` when the budget ran out or the run was cancelled
    pub outcome: Outcome,
    /// Budget units spent over the whole pipeline
    pub steps: u64,
    pub endpoints: (Cell, Cell),
    pub route: Option<Route>,
}

impl Report {
    /// Pixel coordinates of the endpoints, for drawing.
    pub fn endpoint_pixels(&self) -> ((u32, u32), (u32, u32)) {
        (
            self.maze.pixel(self.endpoints.0),
            self.maze.pixel(self.endpoints.1),
        )
    }

    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "{}x{} cells, {:?} after {} steps",
                self.maze.cells_x(),
                self.maze.cells_y(),
                self.outcome,
                self.steps
            ),
            format!(
                "{} passages, {} dead ends, {} sections",
                analysis::open_edge_count(&self.maze),
                analysis::dead_end_count(&self.maze),
                analysis::component_count(&self.maze).unwrap_or(0)
            ),
        ];
        lines.push(match &self.route {
            Some(route) => format!(
                "Route from {} to {}: {} cells",
                self.endpoints.0,
                self.endpoints.1,
                route.len()
            ),
            None => "No route found".to_string(),
        });
        lines
    }
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|c| c.load(Ordering::Relaxed))
}

fn combine(a: Outcome, b: Outcome) -> Outcome {
    if a.is_complete() { b } else { Outcome::Truncated }
}

fn apply_repair(maze: &mut Maze, repair: Repair, ctx: &mut GenerationContext) -> Result<Outcome> {
    tracing::debug!("[repair] {}", repair);
    match repair {
        Repair::Isolations => repair::remove_isolations(maze, ctx),
        Repair::Detachments => repair::remove_detachments(maze, ctx),
        Repair::Poles => {
            let removed = repair::remove_poles(maze);
            tracing::debug!("[repair] removed {} poles", removed);
            Ok(Outcome::Complete)
        }
        Repair::Loops => repair::remove_loops(maze, ctx),
        Repair::Crack => repair::crack_dead_ends(maze, ctx),
    }
}

/// Run `job` start to finish. Every pixel change is published on `sender`
/// when one is given; the sender is dropped before returning so a listener
/// sees the channel disconnect. `cancel` is checked between passes.
pub fn run_job(job: &Job, sender: Option<Sender<GridEvent>>, cancel: Option<&AtomicBool>) -> Result<Report> {
    let mut maze = Maze::new(job.width, job.height, sender)?;
    let mut ctx = GenerationContext::new(job.settings.clone());
    let mut outcome = generate_maze(&mut maze, job.generator, &mut ctx)?;

    for &fix in &job.repairs {
        if is_cancelled(cancel) {
            break;
        }
        outcome = combine(outcome, apply_repair(&mut maze, fix, &mut ctx)?);
    }
    if job.braid && !is_cancelled(cancel) {
        tracing::debug!("[repair] braid");
        outcome = combine(outcome, repair::braid(&mut maze, &mut ctx)?);
    }
    if let Some(symmetry) = job.symmetry.filter(|_| !is_cancelled(cancel)) {
        tracing::debug!("[repair] {:?} symmetry", symmetry);
        outcome = combine(outcome, repair::enforce_symmetry(&mut maze, &mut ctx, symmetry)?);
    }

    let endpoints = default_endpoints(&maze);
    let route = match job.solver.filter(|_| !is_cancelled(cancel)) {
        Some(solver) => solve_maze(&mut maze, solver, endpoints.0, endpoints.1, &mut ctx)?,
        None => None,
    };
    if is_cancelled(cancel) {
        outcome = Outcome::Truncated;
    }

    maze.grid_mut().set_sender(None);
    Ok(Report {
        maze,
        outcome,
        steps: ctx.budget.spent(),
        endpoints,
        route,
    })
}

pub struct App {
    /// Delay after each animated pixel. `None` picks one from the maze size.
    pub frame_delay: Option<Duration>,
    /// How often the input thread checks for render done/cancel flags
    user_input_event_poll_timeout: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self {
            frame_delay: None,
            user_input_event_poll_timeout: Duration::from_millis(100),
        }
    }
}

impl App {
    /// Whole animation time aimed for when no delay is given
    const ANIMATION_TARGET: Duration = Duration::from_secs(8);

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    pub fn with_frame_delay(mut self, delay: Option<Duration>) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Delay per pixel update so an animation of a `width` by `height` cell
    /// maze takes roughly [`App::ANIMATION_TARGET`].
    fn frame_delay_for(&self, width: u32, height: u32) -> Duration {
        if let Some(delay) = self.frame_delay {
            return delay;
        }
        // Each cell is carved once and its wall opened once, more or less
        let updates = (width as u64 * height as u64 * 2).max(1);
        let per_update = App::ANIMATION_TARGET.as_micros() as u64 / updates;
        Duration::from_micros(per_update.clamp(20, 5_000))
    }

    /// Run `job` without a display hook and print the finished maze.
    pub fn print<W: Write>(&self, job: &Job, out: &mut W) -> anyhow::Result<Report> {
        let report = run_job(job, None, None)?;
        let overlay = report
            .route
            .as_ref()
            .map(|route| route.overlay(&report.maze))
            .transpose()?;
        let endpoints = overlay.as_ref().map(|_| report.endpoint_pixels());
        write_grid(out, report.maze.grid(), overlay.as_ref(), endpoints)?;
        for line in report.summary() {
            writeln!(out, "{}", line)?;
        }
        Ok(report)
    }

    /// Run `job` on a compute thread and animate it in the alternate screen.
    /// Returns `None` when the user cancelled with Esc.
    pub fn animate(&self, job: Job) -> anyhow::Result<Option<Report>> {
        let mut stdout = std::io::stdout();
        App::setup_terminal(&mut stdout)?;
        let result = self.animate_in_terminal(job);
        App::restore_terminal(&mut stdout)?;
        result
    }

    fn animate_in_terminal(&self, job: Job) -> anyhow::Result<Option<Report>> {
        // Flag to indicate rendering is done. Set to true by the render thread when it finishes.
        let render_done = Arc::new(AtomicBool::new(false));
        // Flag to indicate rendering should be cancelled. Set to true by the input thread on Esc.
        let render_cancel = Arc::new(AtomicBool::new(false));

        let poll_timeout = self.user_input_event_poll_timeout;
        let done_for_input = render_done.clone();
        let cancel_for_input = render_cancel.clone();
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            App::listen_for_esc(poll_timeout, &done_for_input, &cancel_for_input)
        });

        let (grid_event_tx, grid_event_rx) = std::sync::mpsc::channel::<GridEvent>();
        let delay = self.frame_delay_for(job.width, job.height);
        let cancel_for_render = render_cancel.clone();
        let done_for_render = render_done.clone();
        let render_thread_handle = std::thread::spawn(move || {
            let mut renderer = Renderer::new(delay);
            let status = renderer.render(grid_event_rx, &cancel_for_render, &done_for_render);
            (renderer, status)
        });

        let cancel_for_compute = render_cancel.clone();
        let compute_thread_handle = std::thread::spawn(move || {
            run_job(&job, Some(grid_event_tx), Some(&cancel_for_compute))
            // The maze drops its sender before returning, ending the render loop
        });

        let report = compute_thread_handle
            .join()
            .map_err(|_| anyhow!("compute thread panicked"))?;
        let (mut renderer, status) = render_thread_handle
            .join()
            .map_err(|_| anyhow!("render thread panicked"))?;
        // Make sure the input thread stops even if rendering failed
        render_done.store(true, Ordering::Relaxed);
        let _ = input_thread_handle.join();

        let report = report?;
        if status? == RendererStatus::Cancelled {
            tracing::info!("Rendering was cancelled by user.");
            return Ok(None);
        }

        if let Some(route) = &report.route {
            let overlay = route.overlay(&report.maze)?;
            renderer.draw_overlay(&overlay, report.endpoint_pixels())?;
        }
        renderer.print_below(&report.summary())?;
        App::wait_for_esc()?;
        Ok(Some(report))
    }

    /// Run `job` `iterations` times with the display hook attached and a
    /// listener that discards every event. Returns the total time spent.
    pub fn profile(&self, job: &Job, iterations: usize) -> anyhow::Result<Duration> {
        let (grid_event_tx, grid_event_rx) = std::sync::mpsc::channel::<GridEvent>();
        let drain_thread_handle = std::thread::spawn(move || grid_event_rx.iter().count());

        let started = Instant::now();
        for _ in 0..iterations {
            run_job(job, Some(grid_event_tx.clone()), None)?;
        }
        let elapsed = started.elapsed();
        drop(grid_event_tx);

        let events = drain_thread_handle
            .join()
            .map_err(|_| anyhow!("drain thread panicked"))?;
        tracing::info!(
            "[profile] {} x{}: {:?}, {} grid events",
            job.generator,
            iterations,
            elapsed,
            events
        );
        Ok(elapsed)
    }

    /// Poll for key presses until Esc, or until rendering is done.
    fn listen_for_esc(
        event_poll_timeout: Duration,
        render_done: &AtomicBool,
        render_cancel: &AtomicBool,
    ) -> std::io::Result<()> {
        loop {
            // Check if render is done or canceled
            if render_done.load(Ordering::Relaxed) || render_cancel.load(Ordering::Relaxed) {
                return Ok(());
            }

            // Poll for events with a timeout
            if !event::poll(event_poll_timeout)? {
                continue;
            }

            if let event::Event::Key(event::KeyEvent {
                code: KeyCode::Esc,
                kind: event::KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                tracing::debug!("[input loop] Esc key pressed, exiting");
                render_cancel.store(true, Ordering::Relaxed);
                return Ok(());
            }
        }
    }

    /// Wait for the user to press the Esc key
    /// This function blocks until Esc is pressed
    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if code == KeyCode::Esc && kind == event::KeyEventKind::Press {
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_job_pipeline() {
        let mut job = Job::new(10, 8, Generator::Wilson);
        job.settings.seed = Some(21);
        job.repairs = vec![Repair::Poles, Repair::Crack];
        job.braid = true;
        let report = run_job(&job, None, None).unwrap();
        assert!(report.outcome.is_complete());
        assert_eq!(analysis::component_count(&report.maze).unwrap(), 1);
        assert_eq!(analysis::dead_end_count(&report.maze), 0);
        let route = report.route.unwrap();
        assert!(route.is_valid(&report.maze));
        assert_eq!(route.cells()[0], report.endpoints.0);
    }

    #[test]
    fn test_run_job_publishes_events_then_disconnects() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut job = Job::new(5, 5, Generator::Kruskal);
        job.settings.seed = Some(2);
        let report = run_job(&job, Some(tx), None).unwrap();

        // Sender is gone, so collecting ends
        let events = rx.iter().collect::<Vec<_>>();
        assert!(matches!(events[0], GridEvent::Initial { width: 11, height: 11, on: true }));
        let opened = events
            .iter()
            .filter(|e| matches!(e, GridEvent::Update { new: false, .. }))
            .count();
        // 25 cells and 24 passages
        assert_eq!(opened, 49);
        assert!(analysis::is_perfect(&report.maze));
    }

    #[test]
    fn test_cancelled_job_is_truncated() {
        let cancel = AtomicBool::new(true);
        let mut job = Job::new(6, 6, Generator::Prim);
        job.braid = true;
        let report = run_job(&job, None, Some(&cancel)).unwrap();
        assert_eq!(report.outcome, Outcome::Truncated);
        assert!(report.route.is_none());
    }

    #[test]
    fn test_print_draws_route() {
        let mut job = Job::new(4, 3, Generator::Sidewinder);
        job.settings.seed = Some(9);
        let mut out = Vec::new();
        let report = App::default().print(&job, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let route = report.route.unwrap();
        // Cells and the walls between them, minus the two endpoints
        assert_eq!(text.matches("🟨").count(), 2 * route.len() - 1 - 2);
        assert!(text.contains("Route from (0, 0) to (3, 2)"));
    }

    #[test]
    fn test_frame_delay() {
        let app = App::default();
        assert_eq!(app.frame_delay_for(1000, 1000), Duration::from_micros(20));
        assert_eq!(app.frame_delay_for(3, 3), Duration::from_millis(5));
        let fixed = App::default().with_frame_delay(Some(Duration::ZERO));
        assert_eq!(fixed.frame_delay_for(3, 3), Duration::ZERO);
    }
}
