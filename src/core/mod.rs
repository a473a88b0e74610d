//! Core streaming detection cascade
//!
//! Window engine, frequency detector, tone detector and tone sequence
//! detector, plus the pipeline that chains them.

pub mod dsp;
pub mod error;
pub mod frequency;
pub mod pipeline;
pub mod sequence;
pub mod timespan;
pub mod tone_detector;
pub mod tones;
pub mod window;

pub use error::{Result, ToneDetectError};
pub use frequency::FrequencyDetector;
pub use pipeline::DetectionPipeline;
pub use sequence::{ToneSequence, ToneSequenceDetector};
pub use timespan::Timespan;
pub use tone_detector::{ToneDetector, ToneThresholds};
pub use tones::{Tone, ToneSet};
pub use window::{TuningOptions, Window};
