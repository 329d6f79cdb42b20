//! Builtin function registry: names, arities, and dispatch.
//!
//! Builtins live in one registry keyed by lowercased name, so `fftMag`,
//! `fftmag` and the `fft_mag` alias all resolve to the same entry. Arity is
//! declared per entry and checked uniformly before dispatch. Constants are
//! looked up case-insensitively and separately from functions.

mod complex_fns;
mod dsp_fns;
mod hof;
mod math;
mod matrix_fns;
mod reductions;
mod vector;

use std::{fmt, str::FromStr};

use strum::{Display, EnumString};

use crate::{
    error::{Error, EvalResult},
    evaluate::Interpreter,
    function::Function,
    matrix::Matrix,
    value::Value,
};

/// Declared argument-count contract for a builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Variadic,
}

impl Arity {
    pub(crate) fn accepts(self, received: usize) -> bool {
        match self {
            Self::Exact(n) => received == n,
            Self::AtLeast(n) => received >= n,
            Self::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(1) => f.write_str("exactly 1 argument"),
            Self::Exact(n) => write!(f, "exactly {n} arguments"),
            Self::AtLeast(1) => f.write_str("at least 1 argument"),
            Self::AtLeast(n) => write!(f, "at least {n} arguments"),
            Self::Variadic => f.write_str("any number of arguments"),
        }
    }
}

/// Every builtin function in the registry.
///
/// strum derives `Display` and `FromStr`; all names serialize to lowercase,
/// and the camelCase builtins also accept an underscore alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    // Trig and hyperbolic.
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    // Exponential and logarithmic.
    Exp,
    Ln,
    Log,
    Log10,
    Log2,
    // Power and root.
    Sqrt,
    Cbrt,
    Pow,
    // Rounding and sign.
    Floor,
    Ceil,
    Round,
    Trunc,
    Sign,
    Abs,
    // Reductions over vectors.
    Sum,
    Mean,
    Std,
    Min,
    Max,
    // Complex accessors.
    Complex,
    Real,
    Imag,
    Conj,
    Arg,
    // Vector operations.
    Dot,
    Cross,
    Norm,
    Normalize,
    Linspace,
    // Matrix operations.
    Transpose,
    Det,
    Inverse,
    Trace,
    Identity,
    #[strum(to_string = "issymmetric", serialize = "is_symmetric")]
    IsSymmetric,
    #[strum(to_string = "ispositivedefinite", serialize = "is_positive_definite")]
    IsPositiveDefinite,
    // Decompositions.
    Lu,
    Qr,
    Cholesky,
    Svd,
    // Eigensolvers.
    #[strum(to_string = "poweriteration", serialize = "power_iteration")]
    PowerIteration,
    #[strum(to_string = "qreigenvalues", serialize = "qr_eigenvalues")]
    QrEigenvalues,
    Eig,
    // DSP.
    Fft,
    Ifft,
    #[strum(to_string = "fftmag", serialize = "fft_mag")]
    FftMag,
    #[strum(to_string = "fftphase", serialize = "fft_phase")]
    FftPhase,
    Dft,
    #[strum(to_string = "dftmag", serialize = "dft_mag")]
    DftMag,
    #[strum(to_string = "dftphase", serialize = "dft_phase")]
    DftPhase,
    Conv,
    #[strum(to_string = "convfft", serialize = "conv_fft")]
    ConvFft,
    Hanning,
    Hamming,
    Blackman,
    #[strum(to_string = "fftshift", serialize = "fft_shift")]
    FftShift,
    #[strum(to_string = "ifftshift", serialize = "ifft_shift")]
    IfftShift,
    #[strum(to_string = "fftspectrum", serialize = "fft_spectrum")]
    FftSpectrum,
    // Higher-order functions.
    Map,
    Filter,
    Reduce,
    Pipe,
    Compose,
}

/// Case-insensitive registry lookup.
pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    Builtin::from_str(&name.to_ascii_lowercase()).ok()
}

/// Case-insensitive mathematical constants.
pub(crate) fn constant(name: &str) -> Option<f64> {
    use std::f64::consts;
    let value = match name.to_ascii_lowercase().as_str() {
        "pi" => consts::PI,
        "e" => consts::E,
        "phi" => 1.618_033_988_749_895,
        "sqrt2" => consts::SQRT_2,
        "sqrt3" => 1.732_050_807_568_877_2,
        "ln2" => consts::LN_2,
        "ln10" => consts::LN_10,
        "tau" => consts::TAU,
        _ => return None,
    };
    Some(value)
}

impl Builtin {
    /// Declared arity, checked uniformly before dispatch.
    pub(crate) fn arity(self) -> Arity {
        match self {
            Self::Atan2
            | Self::Pow
            | Self::Complex
            | Self::Dot
            | Self::Cross
            | Self::Conv
            | Self::ConvFft
            | Self::Filter => Arity::Exact(2),
            Self::Linspace
            | Self::Reduce
            | Self::PowerIteration
            | Self::QrEigenvalues
            | Self::Eig => Arity::Exact(3),
            Self::Log | Self::Compose => Arity::AtLeast(1),
            Self::Map | Self::Pipe | Self::FftSpectrum => Arity::AtLeast(2),
            _ => Arity::Exact(1),
        }
    }

    /// Dispatches the call. Arguments are already evaluated, left-to-right.
    pub(crate) fn call(self, args: Vec<Value>, interp: &mut Interpreter) -> EvalResult<Value> {
        let arity = self.arity();
        if !arity.accepts(args.len()) {
            return Err(Error::ArityMismatch {
                function: self.to_string(),
                expected: arity,
                received: args.len(),
            });
        }
        match self {
            Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Asin
            | Self::Acos
            | Self::Atan
            | Self::Sinh
            | Self::Cosh
            | Self::Tanh
            | Self::Exp
            | Self::Ln
            | Self::Log10
            | Self::Log2
            | Self::Sqrt
            | Self::Cbrt
            | Self::Floor
            | Self::Ceil
            | Self::Round
            | Self::Trunc
            | Self::Sign
            | Self::Abs => math::unary(self, one(args)),
            Self::Atan2 => {
                let (y, x) = two(args);
                math::atan2(&y, &x)
            }
            Self::Log => math::log(&args),
            Self::Pow => {
                let (base, exponent) = two(args);
                math::pow(&base, &exponent)
            }

            Self::Sum | Self::Mean | Self::Std | Self::Min | Self::Max => {
                reductions::reduce_vector(self, &one(args))
            }

            Self::Complex => {
                let (re, im) = two(args);
                complex_fns::make_complex(&re, &im)
            }
            Self::Real | Self::Imag | Self::Conj | Self::Arg => {
                complex_fns::accessor(self, one(args))
            }

            Self::Dot => {
                let (a, b) = two(args);
                vector::dot(&a, &b)
            }
            Self::Cross => {
                let (a, b) = two(args);
                vector::cross(&a, &b)
            }
            Self::Norm => vector::norm(&one(args)),
            Self::Normalize => vector::normalize(&one(args)),
            Self::Linspace => {
                let (start, stop, count) = three(args);
                vector::linspace(&start, &stop, &count)
            }

            Self::Transpose
            | Self::Det
            | Self::Inverse
            | Self::Trace
            | Self::Identity
            | Self::IsSymmetric
            | Self::IsPositiveDefinite
            | Self::Lu
            | Self::Qr
            | Self::Cholesky
            | Self::Svd => matrix_fns::unary(self, &one(args)),
            Self::PowerIteration | Self::QrEigenvalues | Self::Eig => {
                let (m, max_iter, tol) = three(args);
                matrix_fns::eigen(self, &m, &max_iter, &tol)
            }

            Self::Fft
            | Self::Ifft
            | Self::FftMag
            | Self::FftPhase
            | Self::Dft
            | Self::DftMag
            | Self::DftPhase
            | Self::Hanning
            | Self::Hamming
            | Self::Blackman
            | Self::FftShift
            | Self::IfftShift => dsp_fns::unary(self, &one(args)),
            Self::Conv | Self::ConvFft => {
                let (x, h) = two(args);
                dsp_fns::convolve(self, &x, &h)
            }
            Self::FftSpectrum => dsp_fns::spectrum(&args),

            Self::Map => hof::map(args, interp),
            Self::Filter => {
                let (predicate, v) = two(args);
                hof::filter(&predicate, &v, interp)
            }
            Self::Reduce => {
                let (f, init, v) = three(args);
                hof::reduce(&f, init, &v, interp)
            }
            Self::Pipe => hof::pipe(args, interp),
            Self::Compose => hof::compose(args),
        }
    }
}

fn one(args: Vec<Value>) -> Value {
    let mut iter = args.into_iter();
    iter.next().expect("arity checked")
}

fn two(args: Vec<Value>) -> (Value, Value) {
    let mut iter = args.into_iter();
    let a = iter.next().expect("arity checked");
    let b = iter.next().expect("arity checked");
    (a, b)
}

fn three(args: Vec<Value>) -> (Value, Value, Value) {
    let mut iter = args.into_iter();
    let a = iter.next().expect("arity checked");
    let b = iter.next().expect("arity checked");
    let c = iter.next().expect("arity checked");
    (a, b, c)
}

// Shared argument converters. The function name lands in the error message.

pub(crate) fn number_arg(function: &'static str, value: &Value) -> EvalResult<f64> {
    value
        .as_number()
        .ok_or_else(|| Error::type_error(function, "number", value.type_name()))
}

/// A nonnegative integral number, e.g. a window length or iteration budget.
pub(crate) fn index_arg(function: &'static str, value: &Value) -> EvalResult<usize> {
    let n = number_arg(function, value)?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
        return Err(Error::invalid_argument(
            function,
            format!("expected a nonnegative integer, got {n}"),
        ));
    }
    Ok(n as usize)
}

pub(crate) fn vector_arg<'v>(function: &'static str, value: &'v Value) -> EvalResult<&'v [f64]> {
    match value {
        Value::Vector(v) => Ok(v),
        other => Err(Error::type_error(function, "vector", other.type_name())),
    }
}

pub(crate) fn matrix_arg<'v>(function: &'static str, value: &'v Value) -> EvalResult<&'v Matrix> {
    match value {
        Value::Matrix(m) => Ok(m),
        other => Err(Error::type_error(function, "matrix", other.type_name())),
    }
}

pub(crate) fn function_arg<'v>(function: &'static str, value: &'v Value) -> EvalResult<&'v Function> {
    match value {
        Value::Function(f) => Ok(f),
        other => Err(Error::type_error(function, "function", other.type_name())),
    }
}
