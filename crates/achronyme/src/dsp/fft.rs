//! Radix-2 Cooley-Tukey FFT and the naive DFT reference.
//!
//! `fft` zero-pads its input to the next power of two; the output length is
//! the padded length. `ifft` accepts exactly the representation `fft`
//! produces and inverts it by the conjugation identity. The `O(N^2)` `dft`
//! is kept as a cross-validation reference for tests and for callers that
//! need an unpadded transform.

use std::f64::consts::TAU;

use num_complex::Complex64;
use num_traits::Zero;

/// Widens a real signal to the complex plane.
pub(crate) fn to_complex(signal: &[f64]) -> Vec<Complex64> {
    signal.iter().map(|&x| Complex64::from(x)).collect()
}

/// Forward transform, zero-padded to the next power of two.
pub(crate) fn fft(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len().max(1).next_power_of_two();
    let mut buf = input.to_vec();
    buf.resize(n, Complex64::zero());
    fft_in_place(&mut buf);
    buf
}

/// Inverse transform: conjugate, forward transform, conjugate, scale by
/// `1/N` where `N` is the (padded) length.
pub(crate) fn ifft(input: &[Complex64]) -> Vec<Complex64> {
    let conjugated: Vec<Complex64> = input.iter().map(|z| z.conj()).collect();
    let mut out = fft(&conjugated);
    let scale = 1.0 / out.len() as f64;
    for z in &mut out {
        *z = z.conj() * scale;
    }
    out
}

/// Recursive decimation-in-time butterfly. `buf.len()` must be a power of
/// two.
fn fft_in_place(buf: &mut [Complex64]) {
    let n = buf.len();
    if n <= 1 {
        return;
    }
    debug_assert!(n.is_power_of_two());

    let mut even: Vec<Complex64> = buf.iter().step_by(2).copied().collect();
    let mut odd: Vec<Complex64> = buf.iter().skip(1).step_by(2).copied().collect();
    fft_in_place(&mut even);
    fft_in_place(&mut odd);

    let half = n / 2;
    for k in 0..half {
        let twiddle = Complex64::from_polar(1.0, -TAU * k as f64 / n as f64) * odd[k];
        buf[k] = even[k] + twiddle;
        buf[k + half] = even[k] - twiddle;
    }
}

/// Naive `O(N^2)` discrete Fourier transform. No padding.
pub(crate) fn dft(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len();
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let mut acc = Complex64::zero();
        for (j, &x) in input.iter().enumerate() {
            let angle = -TAU * (k * j) as f64 / n as f64;
            acc += x * Complex64::from_polar(1.0, angle);
        }
        out.push(acc);
    }
    out
}

/// `sqrt(re^2 + im^2)` per bin.
pub(crate) fn magnitudes(bins: &[Complex64]) -> Vec<f64> {
    bins.iter().map(|z| z.norm()).collect()
}

/// `atan2(im, re)` per bin.
pub(crate) fn phases(bins: &[Complex64]) -> Vec<f64> {
    bins.iter().map(|z| z.arg()).collect()
}

/// Moves the zero-frequency bin to the center: `[split..] ++ [..split]`
/// with `split = ceil(n / 2)`.
pub(crate) fn fftshift<T: Copy>(data: &[T]) -> Vec<T> {
    let split = (data.len() + 1) / 2;
    let mut out = Vec::with_capacity(data.len());
    out.extend_from_slice(&data[split..]);
    out.extend_from_slice(&data[..split]);
    out
}

/// Inverse of [`fftshift`]; identical for even lengths.
pub(crate) fn ifftshift<T: Copy>(data: &[T]) -> Vec<T> {
    let split = data.len() / 2;
    let mut out = Vec::with_capacity(data.len());
    out.extend_from_slice(&data[split..]);
    out.extend_from_slice(&data[..split]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[Complex64], expected: &[Complex64], tolerance: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).norm() <= tolerance,
                "bin {i}: {a} differs from {e} by more than {tolerance}"
            );
        }
    }

    #[test]
    fn impulse_transforms_to_a_flat_spectrum() {
        let mut signal = vec![Complex64::zero(); 8];
        signal[0] = Complex64::from(1.0);
        let bins = fft(&signal);
        assert_close(&bins, &vec![Complex64::from(1.0); 8], 1e-12);
    }

    #[test]
    fn constant_signal_concentrates_in_bin_zero() {
        let signal = vec![Complex64::from(1.0); 8];
        let bins = fft(&signal);
        assert!((bins[0] - Complex64::from(8.0)).norm() < 1e-12);
        for bin in &bins[1..] {
            assert!(bin.norm() < 1e-12);
        }
    }

    #[test]
    fn non_power_of_two_input_pads_to_the_next_power() {
        let bins = fft(&to_complex(&[1.0, 2.0, 3.0]));
        assert_eq!(bins.len(), 4);
    }

    #[test]
    fn fft_matches_the_naive_dft_on_power_of_two_lengths() {
        let signal = to_complex(&[0.5, -1.25, 3.0, 2.0, -0.75, 0.0, 1.5, -2.0]);
        assert_close(&fft(&signal), &dft(&signal), 1e-9);
    }

    #[test]
    fn ifft_inverts_fft() {
        let signal = to_complex(&[1.0, -2.0, 3.5, 0.25, -4.0, 6.0, -1.5, 0.0]);
        let round_trip = ifft(&fft(&signal));
        assert_close(&round_trip, &signal, 1e-10);
    }

    #[test]
    fn shift_centers_the_zero_bin_and_inverts() {
        assert_eq!(fftshift(&[0, 1, 2, 3]), vec![2, 3, 0, 1]);
        assert_eq!(fftshift(&[0, 1, 2, 3, 4]), vec![3, 4, 0, 1, 2]);
        let data = [0, 1, 2, 3, 4];
        assert_eq!(ifftshift(&fftshift(&data)), data.to_vec());
    }
}
