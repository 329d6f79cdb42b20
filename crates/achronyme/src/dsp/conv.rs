//! Linear convolution, direct and via the FFT.

use num_complex::Complex64;
use num_traits::Zero;

use super::fft::{fft, ifft};

/// Direct convolution. Output length is `x.len() + h.len() - 1`.
///
/// Callers validate that both inputs are non-empty.
pub(crate) fn conv_direct(x: &[f64], h: &[f64]) -> Vec<f64> {
    let out_len = x.len() + h.len() - 1;
    let mut out = vec![0.0; out_len];
    for (i, &a) in x.iter().enumerate() {
        if a == 0.0 {
            continue;
        }
        for (j, &b) in h.iter().enumerate() {
            out[i + j] += a * b;
        }
    }
    out
}

/// FFT convolution: zero-pad both operands to the next power of two at or
/// above the output length, multiply the spectra, invert, and keep the real
/// part of the first `N + M - 1` samples.
pub(crate) fn conv_fft(x: &[f64], h: &[f64]) -> Vec<f64> {
    let out_len = x.len() + h.len() - 1;
    let n = out_len.next_power_of_two();

    let mut a: Vec<Complex64> = x.iter().map(|&v| Complex64::from(v)).collect();
    let mut b: Vec<Complex64> = h.iter().map(|&v| Complex64::from(v)).collect();
    a.resize(n, Complex64::zero());
    b.resize(n, Complex64::zero());

    let spectrum: Vec<Complex64> = fft(&a)
        .into_iter()
        .zip(fft(&b))
        .map(|(fa, fb)| fa * fb)
        .collect();

    ifft(&spectrum).iter().take(out_len).map(|z| z.re).collect()
}
