//! DSP builtins: transforms, convolution, windows, and the spectrum matrix.

use num_complex::Complex64;

use super::{index_arg, number_arg, vector_arg, Builtin};
use crate::{
    dsp::{
        conv,
        fft::{self, dft, fft as fft_kernel, ifft, to_complex},
        spectrum::{fft_spectrum, SpectrumOptions},
        window,
    },
    error::{Error, EvalResult},
    value::Value,
};

/// Accepts a real or complex vector as transform input.
fn transform_input(function: &'static str, value: &Value) -> EvalResult<Vec<Complex64>> {
    match value {
        Value::Vector(v) => Ok(to_complex(v)),
        Value::ComplexVector(v) => Ok(v.clone()),
        other => Err(Error::type_error(function, "vector", other.type_name())),
    }
}

pub(crate) fn unary(builtin: Builtin, value: &Value) -> EvalResult<Value> {
    match builtin {
        Builtin::Fft => Ok(Value::ComplexVector(fft_kernel(&transform_input("fft", value)?))),
        Builtin::Ifft => Ok(Value::ComplexVector(ifft(&transform_input("ifft", value)?))),
        Builtin::FftMag => Ok(Value::Vector(fft::magnitudes(&fft_kernel(&transform_input(
            "fftmag", value,
        )?)))),
        Builtin::FftPhase => Ok(Value::Vector(fft::phases(&fft_kernel(&transform_input(
            "fftphase", value,
        )?)))),
        Builtin::Dft => Ok(Value::ComplexVector(dft(&transform_input("dft", value)?))),
        Builtin::DftMag => Ok(Value::Vector(fft::magnitudes(&dft(&transform_input(
            "dftmag", value,
        )?)))),
        Builtin::DftPhase => Ok(Value::Vector(fft::phases(&dft(&transform_input(
            "dftphase", value,
        )?)))),
        Builtin::Hanning => Ok(Value::Vector(window::hanning(index_arg("hanning", value)?)?)),
        Builtin::Hamming => Ok(Value::Vector(window::hamming(index_arg("hamming", value)?)?)),
        Builtin::Blackman => Ok(Value::Vector(window::blackman(index_arg("blackman", value)?)?)),
        Builtin::FftShift => shift(builtin, value),
        Builtin::IfftShift => shift(builtin, value),
        other => unreachable!("{other} is not a DSP builtin"),
    }
}

fn shift(builtin: Builtin, value: &Value) -> EvalResult<Value> {
    let forward = builtin == Builtin::FftShift;
    match value {
        Value::Vector(v) => Ok(Value::Vector(if forward {
            fft::fftshift(v)
        } else {
            fft::ifftshift(v)
        })),
        Value::ComplexVector(v) => Ok(Value::ComplexVector(if forward {
            fft::fftshift(v)
        } else {
            fft::ifftshift(v)
        })),
        other => Err(Error::type_error(builtin.to_string(), "vector", other.type_name())),
    }
}

pub(crate) fn convolve(builtin: Builtin, x: &Value, h: &Value) -> EvalResult<Value> {
    let name = if builtin == Builtin::Conv { "conv" } else { "convfft" };
    let x = vector_arg(name, x)?;
    let h = vector_arg(name, h)?;
    if x.is_empty() || h.is_empty() {
        return Err(Error::invalid_argument(name, "operands must be non-empty"));
    }
    let out = if builtin == Builtin::Conv {
        conv::conv_direct(x, h)
    } else {
        conv::conv_fft(x, h)
    };
    Ok(Value::Vector(out))
}

/// `fftSpectrum(signal, fs, [shift], [angular], [omegaRange])`.
pub(crate) fn spectrum(args: &[Value]) -> EvalResult<Value> {
    if args.len() > 5 {
        return Err(Error::invalid_argument(
            "fftspectrum",
            format!("expects at most 5 arguments, received {}", args.len()),
        ));
    }
    let signal = vector_arg("fftspectrum", &args[0])?;
    let fs = number_arg("fftspectrum", &args[1])?;
    let shift = match args.get(2) {
        Some(v) => truthy("fftspectrum", v)?,
        None => false,
    };
    let angular = match args.get(3) {
        Some(v) => truthy("fftspectrum", v)?,
        None => false,
    };
    let omega_range = match args.get(4) {
        Some(v) => Some(number_arg("fftspectrum", v)?),
        None => None,
    };
    let matrix = fft_spectrum(
        signal,
        SpectrumOptions {
            fs,
            shift,
            angular,
            omega_range,
        },
    )?;
    Ok(Value::Matrix(matrix))
}

fn truthy(function: &'static str, value: &Value) -> EvalResult<bool> {
    value
        .is_truthy()
        .ok_or_else(|| Error::type_error(function, "number flag", value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fft_of_a_real_vector_is_a_complex_vector() {
        let out = unary(Builtin::Fft, &Value::Vector(vec![1.0, 0.0, 0.0, 0.0])).unwrap();
        let Value::ComplexVector(bins) = out else { panic!("expected complex vector") };
        assert_eq!(bins.len(), 4);
    }

    #[test]
    fn fftmag_of_a_constant_signal() {
        let out = unary(Builtin::FftMag, &Value::Vector(vec![1.0; 8])).unwrap();
        let Value::Vector(mags) = out else { panic!("expected vector") };
        assert!((mags[0] - 8.0).abs() < 1e-12);
        assert!(mags[1..].iter().all(|&m| m.abs() < 1e-12));
    }

    #[test]
    fn window_length_must_be_a_number() {
        let err = unary(Builtin::Hanning, &Value::Vector(vec![1.0])).unwrap_err();
        assert!(matches!(err, Error::Type { .. }));
    }

    #[test]
    fn spectrum_defaults_and_range() {
        let out = spectrum(&[Value::Vector(vec![1.0; 8]), Value::Number(8.0)]).unwrap();
        let Value::Matrix(m) = out else { panic!("expected matrix") };
        assert_eq!((m.rows(), m.cols()), (8, 3));
    }
}
