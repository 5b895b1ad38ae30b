use std::sync::mpsc::Sender;

use crate::error::{MazeError, Result, alloc_vec};

use super::Rect;

/// Changes published to the display hook. Sending never blocks and a dropped
/// receiver is ignored, so rendering has no way to feed back into a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    /// Grid created with every pixel set to `on`.
    Initial { width: u32, height: u32, on: bool },
    /// Grid reallocated to a new size. Pixels must be re-read afterwards.
    Resize { width: u32, height: u32 },
    /// A single pixel changed.
    Update { coord: (u32, u32), old: bool, new: bool },
}

/// A bit per pixel, packed row by row into `u64` words.
/// On pixels are walls, off pixels are passages.
pub struct Grid {
    words: Vec<u64>,
    /// Words per row
    stride: usize,
    width: u32,
    height: u32,
    sender: Option<Sender<GridEvent>>,
}

impl Grid {
    /// Largest bitmap, in pixels, that `new` and `resize` will allocate.
    pub const MAX_PIXELS: u64 = 1 << 30;

    pub fn new(width: u32, height: u32, on: bool, sender: Option<Sender<GridEvent>>) -> Result<Self> {
        Grid::check_size(width, height)?;
        let stride = Grid::stride_for(width);
        let words = alloc_vec(stride * height as usize, Grid::fill_word(on), "grid bitmap")?;
        let mut grid = Grid {
            words,
            stride,
            width,
            height,
            sender,
        };
        grid.clear_padding();
        if let Some(s) = &grid.sender {
            let _ = s.send(GridEvent::Initial { width, height, on });
        }
        Ok(grid)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The whole bitmap as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width.saturating_sub(1), self.height.saturating_sub(1))
    }

    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Raw storage, for byte-level comparisons of two grids.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Attach or detach the display hook.
    pub fn set_sender(&mut self, sender: Option<Sender<GridEvent>>) {
        self.sender = sender;
    }

    fn check_size(width: u32, height: u32) -> Result<()> {
        let pixels = width as u64 * height as u64;
        if pixels > Grid::MAX_PIXELS {
            return Err(MazeError::TooLarge {
                width,
                height,
                max: Grid::MAX_PIXELS,
            });
        }
        Ok(())
    }

    fn stride_for(width: u32) -> usize {
        (width as usize).div_ceil(64)
    }

    fn fill_word(on: bool) -> u64 {
        if on { u64::MAX } else { 0 }
    }

    /// Keep bits past the right edge of each row at zero so whole-word
    /// comparisons between grids of equal size are meaningful.
    fn clear_padding(&mut self) {
        let tail = self.width as usize % 64;
        if tail == 0 || self.stride == 0 {
            return;
        }
        let mask = (1u64 << tail) - 1;
        for y in 0..self.height as usize {
            self.words[y * self.stride + self.stride - 1] &= mask;
        }
    }

    /// Word index and bit mask of a pixel known to be in bounds.
    fn locate(&self, x: u32, y: u32) -> (usize, u64) {
        let index = y as usize * self.stride + x as usize / 64;
        (index, 1u64 << (x % 64))
    }

    /// Out-of-bounds pixels read as off.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let (index, mask) = self.locate(x, y);
        self.words[index] & mask != 0
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if !self.in_bounds(x, y) {
            return;
        }
        let (index, mask) = self.locate(x, y);
        let old = self.words[index] & mask != 0;
        if old == on {
            return;
        }
        if on {
            self.words[index] |= mask;
        } else {
            self.words[index] &= !mask;
        }
        if let Some(sender) = &self.sender {
            let _ = sender.send(GridEvent::Update {
                coord: (x, y),
                old,
                new: on,
            });
        }
    }

    /// Set every pixel.
    pub fn fill(&mut self, on: bool) {
        let bounds = self.bounds();
        if self.width > 0 && self.height > 0 {
            self.fill_rect(bounds, on);
        }
    }

    /// Set every pixel of `rect`, clipped to the bitmap.
    pub fn fill_rect(&mut self, rect: Rect, on: bool) {
        let xh = rect.xh.min(self.width.saturating_sub(1));
        let yh = rect.yh.min(self.height.saturating_sub(1));
        for y in rect.yl..=yh {
            for x in rect.xl..=xh {
                self.set(x, y, on);
            }
        }
    }

    /// Reallocate to `width` x `height`. With `preserve`, the overlapping
    /// top-left area keeps its pixels and new area is set to `on`; without it
    /// every pixel becomes `on`. Fails without touching the grid when the
    /// size is over budget or the allocation fails.
    pub fn resize(&mut self, width: u32, height: u32, preserve: bool, on: bool) -> Result<()> {
        Grid::check_size(width, height)?;
        let stride = Grid::stride_for(width);
        let words = alloc_vec(stride * height as usize, Grid::fill_word(on), "grid bitmap")?;
        let sender = self.sender.take();
        let old = std::mem::replace(
            self,
            Grid {
                words,
                stride,
                width,
                height,
                sender,
            },
        );
        self.clear_padding();
        if preserve {
            for y in 0..old.height.min(height) {
                for x in 0..old.width.min(width) {
                    let (index, mask) = self.locate(x, y);
                    if old.get(x, y) {
                        self.words[index] |= mask;
                    } else {
                        self.words[index] &= !mask;
                    }
                }
            }
        }
        if let Some(s) = &self.sender {
            let _ = s.send(GridEvent::Resize { width, height });
        }
        Ok(())
    }

    /// Number of on pixels inside `rect`.
    pub fn count_on(&self, rect: Rect) -> usize {
        (rect.yl..=rect.yh)
            .flat_map(|y| (rect.xl..=rect.xh).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
            .count()
    }
}

impl Clone for Grid {
    /// Clones never inherit the display hook.
    fn clone(&self) -> Self {
        Grid {
            words: self.words.clone(),
            stride: self.stride,
            width: self.width,
            height: self.height,
            sender: None,
        }
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.words == other.words
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid {}x{}", self.width, self.height)?;
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", if self.get(x, y) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
