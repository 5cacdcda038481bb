//! Error types for decoder construction.

use core::fmt;

/// Errors that can occur when constructing a [`QuadratureDecoder`].
///
/// Decoding itself never fails — invalid transitions are counted as missed
/// pulses, not reported as errors — so only construction has an error path.
///
/// [`QuadratureDecoder`]: crate::decoder::QuadratureDecoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderError {
    /// `counts_per_revolution` was zero, which would make the radian
    /// conversion in `read_position` divide by zero.
    ZeroCountsPerRevolution,
}

impl fmt::Display for DecoderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecoderError::ZeroCountsPerRevolution => {
                write!(f, "counts per revolution must be greater than zero")
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecoderError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DecoderError::ZeroCountsPerRevolution => {
                defmt::write!(f, "counts per revolution must be greater than zero")
            }
        }
    }
}
