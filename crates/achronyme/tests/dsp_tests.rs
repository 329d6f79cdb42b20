//! DSP identities pinned through the public API: round-trips, Parseval,
//! convolution agreement, and spectrum ordering.

use achronyme::{Complex64, Session, Value};
use proptest::prelude::*;

fn eval_value(source: &str) -> Value {
    Session::new().eval_value(source).unwrap()
}

fn vector_literal(v: &[f64]) -> String {
    let items: Vec<String> = v.iter().map(|x| format!("{x:?}")).collect();
    format!("[{}]", items.join(", "))
}

fn as_complex_vector(value: Value) -> Vec<Complex64> {
    match value {
        Value::ComplexVector(v) => v,
        other => panic!("expected a complex vector, got {other:?}"),
    }
}

fn as_vector(value: Value) -> Vec<f64> {
    match value {
        Value::Vector(v) => v,
        other => panic!("expected a vector, got {other:?}"),
    }
}

#[test]
fn fft_mag_of_a_constant_signal_concentrates_in_bin_zero() {
    let mags = as_vector(eval_value("fft_mag([1,1,1,1,1,1,1,1])"));
    assert_eq!(mags.len(), 8);
    assert!((mags[0] - 8.0).abs() < 1e-12);
    for (bin, mag) in mags.iter().enumerate().skip(1) {
        assert!(mag.abs() < 1e-12, "bin {bin} carries magnitude {mag}");
    }
}

#[test]
fn fft_and_dft_agree_on_power_of_two_lengths() {
    let source = "[0.5, -1.25, 3.0, 2.0, -0.75, 0.0, 1.5, -2.0]";
    let fft_bins = as_complex_vector(eval_value(&format!("fft({source})")));
    let dft_bins = as_complex_vector(eval_value(&format!("dft({source})")));
    for (f, d) in fft_bins.iter().zip(&dft_bins) {
        assert!((f - d).norm() < 1e-9);
    }
}

#[test]
fn ifft_inverts_fft_including_padded_lengths() {
    // Length 6 pads to 8; the round trip reproduces the padded signal.
    let signal = [1.0, -2.0, 3.0, -4.0, 5.0, -6.0];
    let mut session = Session::new();
    session.eval(&format!("let v = {}", vector_literal(&signal))).unwrap();
    let out = as_complex_vector(session.eval_value("ifft(fft(v))").unwrap());
    assert_eq!(out.len(), 8);
    for (i, z) in out.iter().enumerate() {
        let expected = signal.get(i).copied().unwrap_or(0.0);
        assert!((z.re - expected).abs() < 1e-10, "sample {i}");
        assert!(z.im.abs() < 1e-10, "sample {i} imaginary part {}", z.im);
    }
}

#[test]
fn windows_match_their_closed_forms() {
    let hanning = as_vector(eval_value("hanning(8)"));
    let hamming = as_vector(eval_value("hamming(8)"));
    let blackman = as_vector(eval_value("blackman(8)"));
    for n in 0..8 {
        let phase = std::f64::consts::TAU * n as f64 / 7.0;
        assert!((hanning[n] - 0.5 * (1.0 - phase.cos())).abs() < 1e-12);
        assert!((hamming[n] - (0.54 - 0.46 * phase.cos())).abs() < 1e-12);
        assert!((blackman[n] - (0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos())).abs() < 1e-12);
    }
}

#[test]
fn degenerate_window_lengths_are_invalid() {
    assert!(Session::new().eval("hanning(1)").is_err());
}

#[test]
fn fftshift_round_trips_through_ifftshift() {
    assert_eq!(
        Session::new().eval("ifftshift(fftshift([1, 2, 3, 4, 5]))").unwrap(),
        "[1, 2, 3, 4, 5]"
    );
}

#[test]
fn spectrum_rows_keep_frequency_and_magnitude_in_lockstep() {
    // cos(2*pi*t) sampled at 8 Hz for one second: energy sits at +-1 Hz.
    let samples: Vec<f64> = (0..8)
        .map(|n| (std::f64::consts::TAU * n as f64 / 8.0).cos())
        .collect();
    let mut session = Session::new();
    session.eval(&format!("let s = {}", vector_literal(&samples))).unwrap();
    let matrix = match session.eval_value("fft_spectrum(s, 8, 1)").unwrap() {
        Value::Matrix(m) => m,
        other => panic!("expected matrix, got {other:?}"),
    };
    assert_eq!((matrix.rows(), matrix.cols()), (8, 3));
    for r in 0..matrix.rows() {
        let frequency = matrix.get(r, 0);
        let magnitude = matrix.get(r, 1);
        let expected = if frequency.abs() == 1.0 { 4.0 } else { 0.0 };
        assert!(
            (magnitude - expected).abs() < 1e-9,
            "row {r}: frequency {frequency} carries magnitude {magnitude}"
        );
    }
}

#[test]
fn spectrum_omega_range_filters_rows() {
    let matrix = match eval_value("fft_spectrum([1,1,1,1,1,1,1,1], 8, 1, 0, 2)") {
        Value::Matrix(m) => m,
        other => panic!("expected matrix, got {other:?}"),
    };
    for r in 0..matrix.rows() {
        assert!(matrix.get(r, 0).abs() <= 2.0);
    }
    assert_eq!(matrix.rows(), 5);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn ifft_fft_round_trip(signal in prop::collection::vec(-1000.0f64..1000.0, 1..256)) {
        let mut session = Session::new();
        session.eval(&format!("let v = {}", vector_literal(&signal))).unwrap();
        let out = as_complex_vector(session.eval_value("ifft(fft(v))").unwrap());
        for (i, z) in out.iter().enumerate() {
            let expected = signal.get(i).copied().unwrap_or(0.0);
            prop_assert!((z.re - expected).abs() < 1e-9);
            prop_assert!(z.im.abs() < 1e-9);
        }
    }

    #[test]
    fn parseval_identity(signal in prop::collection::vec(-1.0f64..1.0, 1..128)) {
        // Compare energy over the zero-padded signal, which is what the
        // transform actually sees.
        let mut session = Session::new();
        session.eval(&format!("let v = {}", vector_literal(&signal))).unwrap();
        let bins = as_complex_vector(session.eval_value("fft(v)").unwrap());
        let n = bins.len() as f64;
        let time_energy: f64 = signal.iter().map(|x| x * x).sum();
        let freq_energy: f64 = bins.iter().map(|z| z.norm_sqr()).sum::<f64>() / n;
        let scale = time_energy.max(1.0);
        prop_assert!(((time_energy - freq_energy) / scale).abs() < 1e-8);
    }

    #[test]
    fn conv_and_conv_fft_agree(
        x in prop::collection::vec(-1.0f64..1.0, 1..96),
        h in prop::collection::vec(-1.0f64..1.0, 1..96),
    ) {
        let mut session = Session::new();
        session.eval(&format!("let x = {}", vector_literal(&x))).unwrap();
        session.eval(&format!("let h = {}", vector_literal(&h))).unwrap();
        let direct = as_vector(session.eval_value("conv(x, h)").unwrap());
        let fast = as_vector(session.eval_value("conv_fft(x, h)").unwrap());
        prop_assert_eq!(direct.len(), x.len() + h.len() - 1);
        prop_assert_eq!(direct.len(), fast.len());
        for (d, f) in direct.iter().zip(&fast) {
            prop_assert!((d - f).abs() < 1e-10);
        }
    }
}
