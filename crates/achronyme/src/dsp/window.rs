//! Cosine-sum window functions.
//!
//! All windows are defined for `n = 0..N-1` and require `N >= 2` since the
//! `N - 1` denominator degenerates otherwise.

use std::f64::consts::TAU;

use crate::error::{Error, EvalResult};

fn check_length(function: &'static str, size: usize) -> EvalResult<()> {
    if size < 2 {
        return Err(Error::invalid_argument(
            function,
            format!("window length must be at least 2, got {size}"),
        ));
    }
    Ok(())
}

/// `0.5 * (1 - cos(2*pi*n / (N-1)))`
pub(crate) fn hanning(size: usize) -> EvalResult<Vec<f64>> {
    check_length("hanning", size)?;
    let denom = (size - 1) as f64;
    Ok((0..size)
        .map(|n| 0.5 * (1.0 - (TAU * n as f64 / denom).cos()))
        .collect())
}

/// `0.54 - 0.46 * cos(2*pi*n / (N-1))`
pub(crate) fn hamming(size: usize) -> EvalResult<Vec<f64>> {
    check_length("hamming", size)?;
    let denom = (size - 1) as f64;
    Ok((0..size)
        .map(|n| 0.54 - 0.46 * (TAU * n as f64 / denom).cos())
        .collect())
}

/// `0.42 - 0.5 * cos(2*pi*n / (N-1)) + 0.08 * cos(4*pi*n / (N-1))`
pub(crate) fn blackman(size: usize) -> EvalResult<Vec<f64>> {
    check_length("blackman", size)?;
    let denom = (size - 1) as f64;
    Ok((0..size)
        .map(|n| {
            let phase = TAU * n as f64 / denom;
            0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
        })
        .collect())
}
