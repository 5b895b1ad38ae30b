use std::{
    fmt,
    io::{Stdout, Write},
    sync::{atomic::AtomicBool, mpsc::Receiver},
    time::Duration,
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::maze::{Grid, GridEvent};

/// What a single bitmap pixel is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Wall,
    Passage,
    /// Part of the solution overlay
    Route,
    Start,
    Goal,
}

impl Glyph {
    /// The width of each pixel when rendered, in character widths.
    pub const WIDTH: u16 = 2;

    pub fn of(on: bool) -> Glyph {
        if on { Glyph::Wall } else { Glyph::Passage }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Glyph::Wall => "⬜".with(Color::White),
            Glyph::Passage => "  ".with(Color::Reset),
            Glyph::Route => "🟨".with(Color::Yellow),
            Glyph::Start => "🟩".with(Color::Green),
            Glyph::Goal => "🟥".with(Color::Red),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::WIDTH as usize,
                "Each pixel must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Pick the glyph of pixel `(x, y)`: endpoints first, then the overlay,
/// then the maze itself.
fn glyph_at(
    grid: &Grid,
    overlay: Option<&Grid>,
    endpoints: Option<((u32, u32), (u32, u32))>,
    x: u32,
    y: u32,
) -> Glyph {
    match endpoints {
        Some((start, _)) if start == (x, y) => Glyph::Start,
        Some((_, goal)) if goal == (x, y) => Glyph::Goal,
        _ if overlay.is_some_and(|o| o.get(x, y)) => Glyph::Route,
        _ => Glyph::of(grid.get(x, y)),
    }
}

/// Print the whole bitmap row by row, with an optional route overlay and
/// endpoint pixels on top.
pub fn write_grid<W: Write>(
    out: &mut W,
    grid: &Grid,
    overlay: Option<&Grid>,
    endpoints: Option<((u32, u32), (u32, u32))>,
) -> std::io::Result<()> {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            out.queue(style::Print(glyph_at(grid, overlay, endpoints, x, y)))?;
        }
        out.queue(style::Print("\r\n"))?;
    }
    out.flush()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererStatus {
    Completed,
    Cancelled,
}

/// Draws grid events as they arrive on the display hook channel.
pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Current grid dimensions (width, height) in pixels
    grid_dims: Option<(u32, u32)>,
    /// Whether the grid fits the terminal. Updates are dropped when it doesn't.
    visible: bool,
    /// Time to wait after each drawn event, so the animation can be followed
    render_refresh_time: Duration,
}

impl Renderer {
    pub fn new(render_refresh_time: Duration) -> Self {
        Self {
            stdout: std::io::stdout(),
            grid_dims: None,
            visible: false,
            render_refresh_time,
        }
    }

    /// Terminal position of a pixel, if the terminal can address it.
    fn screen_pos(x: u32, y: u32) -> Option<(u16, u16)> {
        let column = u16::try_from(x).ok()?.checked_mul(Glyph::WIDTH)?;
        Some((column, u16::try_from(y).ok()?))
    }

    /// Check if terminal size is sufficient for the given grid dimensions.
    /// If not, print a message and return Ok(false).
    fn check_resize(stdout: &mut Stdout, width: u32, height: u32) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let fits = Renderer::screen_pos(width, height)
            .is_some_and(|(columns, rows)| columns <= term_width && rows < term_height);
        if !fits {
            let msg = format!(
                "Terminal size ({}x{}) is too small to animate a {}x{} pixel grid. Drawing is skipped.\r\n",
                term_width, term_height, width, height
            );
            queue!(
                stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
            )?;
            stdout.flush()?;
        }
        Ok(fits)
    }

    fn draw_pixel(&mut self, x: u32, y: u32, glyph: Glyph) -> std::io::Result<()> {
        let Some((width, height)) = self.grid_dims else {
            return Ok(());
        };
        if !self.visible || x >= width || y >= height {
            return Ok(());
        }
        if let Some((column, row)) = Renderer::screen_pos(x, y) {
            queue!(self.stdout, cursor::MoveTo(column, row), style::Print(glyph))?;
        }
        Ok(())
    }

    /// Render a single grid event to the terminal.
    fn render_grid_event(&mut self, event: &GridEvent) -> std::io::Result<()> {
        match *event {
            GridEvent::Initial { width, height, on } => {
                self.grid_dims = Some((width, height));
                self.visible = Renderer::check_resize(&mut self.stdout, width, height)?;
                if !self.visible {
                    return Ok(());
                }
                queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
                for _y in 0..height {
                    for _x in 0..width {
                        self.stdout.queue(style::Print(Glyph::of(on)))?;
                    }
                    self.stdout.queue(style::Print("\r\n"))?;
                }
            }
            GridEvent::Resize { width, height } => {
                // Pixel contents are unknown here; later updates repaint them
                tracing::debug!("[renderer] grid resized to {}x{}", width, height);
                self.grid_dims = Some((width, height));
                self.visible = Renderer::check_resize(&mut self.stdout, width, height)?;
                if self.visible {
                    self.stdout.queue(terminal::Clear(ClearType::All))?;
                }
            }
            GridEvent::Update { coord, new, .. } => {
                self.draw_pixel(coord.0, coord.1, Glyph::of(new))?;
            }
        }
        self.stdout.flush()
    }

    /// Render loop that drains the grid event channel until every sender is gone.
    /// Returns Cancelled as soon as `cancel` is seen set.
    pub fn render(
        &mut self,
        grid_event_rx: Receiver<GridEvent>,
        cancel: &AtomicBool,
        done: &AtomicBool,
    ) -> std::io::Result<RendererStatus> {
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::Hide)?;
        self.stdout.flush()?;

        // Block and wait for the next grid event, exit once the channel disconnects
        while let Ok(event) = grid_event_rx.recv() {
            if cancel.load(std::sync::atomic::Ordering::Relaxed) {
                return Ok(RendererStatus::Cancelled);
            }
            self.render_grid_event(&event)?;
            if matches!(event, GridEvent::Update { .. }) && self.visible {
                std::thread::sleep(self.render_refresh_time);
            }
        }
        done.store(true, std::sync::atomic::Ordering::Relaxed);
        Ok(RendererStatus::Completed)
    }

    /// Paint the solution overlay and endpoints over the finished maze.
    pub fn draw_overlay(
        &mut self,
        overlay: &Grid,
        endpoints: ((u32, u32), (u32, u32)),
    ) -> std::io::Result<()> {
        for y in 0..overlay.height() {
            for x in 0..overlay.width() {
                if overlay.get(x, y) {
                    self.draw_pixel(x, y, Glyph::Route)?;
                }
            }
        }
        self.draw_pixel(endpoints.0.0, endpoints.0.1, Glyph::Start)?;
        self.draw_pixel(endpoints.1.0, endpoints.1.1, Glyph::Goal)?;
        self.stdout.flush()
    }

    /// Print lines below the maze.
    pub fn print_below(&mut self, lines: &[String]) -> std::io::Result<()> {
        let row = self
            .grid_dims
            .filter(|_| self.visible)
            .and_then(|(_, height)| u16::try_from(height).ok())
            .unwrap_or(1);
        self.stdout.queue(cursor::MoveTo(0, row))?;
        for line in lines {
            queue!(
                self.stdout,
                style::PrintStyledContent(line.as_str().with(Color::Green).attribute(Attribute::Bold)),
                style::Print("\r\n")
            )?;
        }
        queue!(
            self.stdout,
            style::PrintStyledContent(
                "Press Esc to exit...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            ),
            cursor::Show
        )?;
        self.stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_widths() {
        for glyph in [Glyph::Wall, Glyph::Passage, Glyph::Route, Glyph::Start, Glyph::Goal] {
            // The Display impl asserts the width in debug builds
            assert!(!glyph.to_string().is_empty());
        }
    }

    #[test]
    fn test_write_grid() {
        let mut grid = Grid::new(3, 2, true, None).unwrap();
        grid.set(1, 0, false);
        let mut overlay = Grid::new(3, 2, false, None).unwrap();
        overlay.set(1, 1, true);

        let mut out = Vec::new();
        write_grid(&mut out, &grid, Some(&overlay), Some(((0, 1), (2, 1)))).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("⬜").count(), 2);
        assert_eq!(text.matches("🟨").count(), 1);
        assert_eq!(text.matches("🟩").count(), 1);
        assert_eq!(text.matches("🟥").count(), 1);
        assert_eq!(text.matches("\r\n").count(), 2);
    }
}
