use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MazeError {
    #[error("active rectangle {width}x{height} is smaller than the {min}x{min} minimum")]
    TooSmall { width: u32, height: u32, min: u32 },

    #[error("bitmap of {width}x{height} pixels exceeds the limit of {max} pixels")]
    TooLarge { width: u32, height: u32, max: u64 },

    #[error("rectangle ({xl},{yl})-({xh},{yh}) does not fit a {width}x{height} bitmap")]
    BadRect {
        xl: u32,
        yl: u32,
        xh: u32,
        yh: u32,
        width: u32,
        height: u32,
    },

    #[error("rotational symmetry needs a square active rectangle, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },

    #[error("failed to allocate {what}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },
}

pub type Result<T> = std::result::Result<T, MazeError>;

/// Allocate a vector of `len` copies of `value`, reporting failure instead of aborting.
pub(crate) fn alloc_vec<T: Clone>(len: usize, value: T, what: &'static str) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|source| MazeError::Allocation { what, source })?;
    v.resize(len, value);
    Ok(v)
}

/// Empty vector with room for `capacity` elements.
pub(crate) fn alloc_with_capacity<T>(capacity: usize, what: &'static str) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)
        .map_err(|source| MazeError::Allocation { what, source })?;
    Ok(v)
}
