//! Configuration module for tonedetect

mod profiles;

pub use profiles::{ConfigPreset, PipelineConfig, PipelineConfigBuilder};
