// src/core/error.rs
//
// Construction-time failures of the detection cascade.

use thiserror::Error;

/// Errors raised while building detection stages.
///
/// Once a stage is constructed it never fails on well-formed input, so
/// everything here is reported before the first sample is processed.
#[derive(Debug, Error)]
pub enum ToneDetectError {
    #[error("window size must be even, got {0} samples")]
    OddWindowSize(usize),

    #[error("window size must be positive")]
    EmptyWindow,

    #[error("sample rate must be positive, got {0} Hz")]
    InvalidSampleRate(f64),

    #[error("frequency {frequency} Hz exceeds the Nyquist limit of {nyquist} Hz")]
    NyquistViolation { frequency: f64, nyquist: f64 },

    #[error("at least one target frequency is required")]
    NoFrequencies,

    #[error("frequency resolution must be positive, got {0} Hz")]
    InvalidResolution(f64),

    #[error("{what}: expected {expected} values, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("tone '{symbol}' requires no frequencies")]
    EmptyTone { symbol: String },

    #[error("spectral transform failed: {0}")]
    Fft(String),
}

pub type Result<T> = std::result::Result<T, ToneDetectError>;
