//! DSP kernels: FFT/IFFT, the naive DFT reference, convolution, window
//! functions, and single-pass spectrum assembly.

pub(crate) mod conv;
pub(crate) mod fft;
pub(crate) mod spectrum;
pub(crate) mod window;
