//! Single-pass assembly of the `[frequency, magnitude, phase]` spectrum.
//!
//! When `shift` is set, the reordering is one permutation applied to the
//! frequency axis and the FFT bins together, so row `i` always describes
//! one physical frequency across all three columns. The frequency column is
//! never sorted independently of the bins.

use std::f64::consts::TAU;

use super::fft::{fft, to_complex};
use crate::{
    error::{Error, EvalResult},
    matrix::Matrix,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct SpectrumOptions {
    /// Sampling frequency in Hz.
    pub fs: f64,
    /// Center the zero-frequency bin.
    pub shift: bool,
    /// Report angular frequency (rad/s) instead of Hz.
    pub angular: bool,
    /// Keep only rows with `|omega| <= range`.
    pub omega_range: Option<f64>,
}

/// Computes the spectrum matrix with columns `[omega, magnitude, phase]`.
pub(crate) fn fft_spectrum(signal: &[f64], options: SpectrumOptions) -> EvalResult<Matrix> {
    if signal.is_empty() {
        return Err(Error::invalid_argument("fftspectrum", "signal must be non-empty"));
    }
    if options.fs <= 0.0 {
        return Err(Error::invalid_argument(
            "fftspectrum",
            format!("sampling frequency must be positive, got {}", options.fs),
        ));
    }

    let bins = fft(&to_complex(signal));
    let n = bins.len();
    let half = n / 2;
    let resolution = options.fs / n as f64;

    let mut rows: Vec<f64> = Vec::with_capacity(3 * n);
    for i in 0..n {
        // One permutation drives both the source bin and its frequency:
        // with shift, output position i reads bin (i + n/2) % n, and bins at
        // or above the Nyquist index map to negative frequencies.
        let source = if options.shift { (i + half) % n } else { i };
        let signed_index = if options.shift && source >= half {
            source as f64 - n as f64
        } else {
            source as f64
        };

        let mut omega = signed_index * resolution;
        if options.angular {
            omega *= TAU;
        }
        if let Some(range) = options.omega_range {
            if omega.abs() > range {
                continue;
            }
        }

        let bin = bins[source];
        rows.extend_from_slice(&[omega, bin.norm(), bin.arg()]);
    }

    if rows.is_empty() {
        return Err(Error::invalid_argument(
            "fftspectrum",
            "the requested frequency range excludes every bin",
        ));
    }
    Matrix::new(rows.len() / 3, 3, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(signal: &[f64], shift: bool, omega_range: Option<f64>) -> Matrix {
        fft_spectrum(
            signal,
            SpectrumOptions {
                fs: 8.0,
                shift,
                angular: false,
                omega_range,
            },
        )
        .unwrap()
    }

    #[test]
    fn unshifted_frequencies_ascend_from_zero() {
        let m = spectrum(&[1.0; 8], false, None);
        assert_eq!(m.rows(), 8);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(1, 0), 1.0);
        assert_eq!(m.get(7, 0), 7.0);
    }

    #[test]
    fn shifted_frequencies_center_zero() {
        let m = spectrum(&[1.0; 8], true, None);
        assert_eq!(m.get(0, 0), -4.0);
        assert_eq!(m.get(4, 0), 0.0);
        assert_eq!(m.get(7, 0), 3.0);
    }

    #[test]
    fn shift_permutes_magnitude_together_with_frequency() {
        // A constant signal has all its energy in the zero bin; after the
        // shift that bin must sit exactly at the row whose frequency is 0.
        let m = spectrum(&[1.0; 8], true, None);
        for r in 0..m.rows() {
            let expected = if m.get(r, 0) == 0.0 { 8.0 } else { 0.0 };
            assert!(
                (m.get(r, 1) - expected).abs() < 1e-12,
                "row {r}: frequency {} carries magnitude {}",
                m.get(r, 0),
                m.get(r, 1)
            );
        }
    }

    #[test]
    fn omega_range_retains_only_small_frequencies() {
        let m = spectrum(&[1.0; 8], true, Some(2.0));
        assert_eq!(m.rows(), 5);
        for r in 0..m.rows() {
            assert!(m.get(r, 0).abs() <= 2.0);
        }
    }

    #[test]
    fn empty_range_is_rejected() {
        let err = fft_spectrum(
            &[1.0; 8],
            SpectrumOptions {
                fs: 8.0,
                shift: false,
                angular: false,
                omega_range: Some(-1.0),
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }
}
