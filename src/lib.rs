//! tonedetect - Capture multi-frequency tone sequences from audio streams
//!
//! Recognizes sequences of multi-frequency tones (DTMF and custom sets) in
//! live or file based audio and reports each sequence with the time span it
//! covered.
//!
//! ## Module Structure
//!
//! - `core` - Streaming detection cascade (window, frequency, tone, sequence)
//! - `sources` - Sample sources: stdin, ffmpeg, audio files, memory, silence
//! - `normalization` - Raw sample conversion to [-1, 1]
//! - `generators` - Synthetic test signals
//! - `config` - Detection thresholds and presets
//! - `detection` - Sequence events, run status and audio capture
//! - `cli` - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tonedetect::config::{ConfigPreset, PipelineConfig};
//! use tonedetect::core::{DetectionPipeline, ToneSet};
//!
//! let config = PipelineConfig::from_preset(ConfigPreset::Streaming);
//! let mut pipeline = DetectionPipeline::new(8000.0, ToneSet::dtmf(), &config)?;
//!
//! for event in pipeline.process(&samples)? {
//!     println!("{} at {:.2}s", event.symbols_string(), event.start);
//! }
//! for event in pipeline.flush()? {
//!     println!("{} at {:.2}s", event.symbols_string(), event.start);
//! }
//! ```
//!
//! ## Detection stages
//!
//! | Stage              | Input                  | Output                        |
//! |--------------------|------------------------|-------------------------------|
//! | Window             | sample chunks          | 50% overlapping windows       |
//! | Frequency detector | window                 | amplitude per frequency       |
//! | Tone detector      | amplitudes, time span  | newly reported symbols        |
//! | Sequence detector  | symbols, time span     | completed symbol sequences    |

// Streaming detection cascade
pub mod core;

// Command-line interface
pub mod cli;

// Configuration and presets
pub mod config;

// Detection result types
pub mod detection;

pub mod generators;
pub mod normalization;
pub mod sources;

// Re-export commonly used types at crate root for convenience
pub use config::{ConfigPreset, PipelineConfig, PipelineConfigBuilder};
pub use crate::core::{
    DetectionPipeline, FrequencyDetector, Result, Timespan, Tone, ToneDetectError, ToneDetector,
    ToneSequence, ToneSequenceDetector, ToneSet, ToneThresholds, TuningOptions, Window,
};
pub use detection::{CaptureBuffer, SequenceEvent, Status};
pub use sources::SampleSource;
