// src/config/profiles.rs
//
// Detection thresholds and window policy, with presets for common use cases

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::dsp::WindowType;
use crate::core::tone_detector::ToneThresholds;
use crate::core::window::TuningOptions;

/// Preset configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigPreset {
    /// Report sequences of at least two tones
    Standard,
    /// Report every tone as its own sequence
    Streaming,
    /// User-defined settings
    Custom,
}

impl ConfigPreset {
    pub fn name(&self) -> &'static str {
        match self {
            ConfigPreset::Standard => "standard",
            ConfigPreset::Streaming => "streaming",
            ConfigPreset::Custom => "custom",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfigPreset::Standard => "Sequences of two or more tones, one second apart at most",
            ConfigPreset::Streaming => "Every detected tone is reported",
            ConfigPreset::Custom => "User-defined settings",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "streaming" | "stream" => Some(Self::Streaming),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Standard, Self::Streaming]
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Preset this was derived from
    pub preset: ConfigPreset,
    /// Minimum amplitude of every frequency of a tone [0..1]
    pub min_tone_amp: f64,
    /// Maximum amplitude range between the frequencies of a tone [0..1]
    pub max_inter_tone_amp: f64,
    /// Seconds a tone must be present before it is detected
    pub min_presence: f64,
    /// Seconds a tone must be absent before it can be detected again
    pub min_pause: f64,
    /// Maximum seconds between two tones of the same sequence
    pub max_tone_interval: f64,
    /// Minimum number of tones in a reported sequence
    pub min_sequence_length: usize,
    pub window_function: WindowType,
    /// Frequency resolution in Hz, derived from the tones when unset
    pub min_frequency_resolution: Option<f64>,
    pub power_of_2: bool,
    pub use_padding: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_preset(ConfigPreset::Standard)
    }
}

impl PipelineConfig {
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Standard | ConfigPreset::Custom => Self::standard(preset),
            ConfigPreset::Streaming => Self::streaming(),
        }
    }

    fn standard(preset: ConfigPreset) -> Self {
        Self {
            preset,
            min_tone_amp: 0.1,
            max_inter_tone_amp: 0.1,
            min_presence: 0.04,
            min_pause: 0.04,
            max_tone_interval: 1.0,
            min_sequence_length: 2,
            window_function: WindowType::Rectangle,
            min_frequency_resolution: None,
            power_of_2: true,
            use_padding: true,
        }
    }

    fn streaming() -> Self {
        Self {
            preset: ConfigPreset::Streaming,
            min_sequence_length: 1,
            ..Self::standard(ConfigPreset::Streaming)
        }
    }

    pub fn thresholds(&self) -> ToneThresholds {
        ToneThresholds {
            min_tone_amp: self.min_tone_amp,
            max_inter_tone_amp: self.max_inter_tone_amp,
            min_presence: self.min_presence,
            min_pause: self.min_pause,
        }
    }

    pub fn tuning(&self) -> TuningOptions {
        TuningOptions {
            min_resolution: self.min_frequency_resolution,
            power_of_2: self.power_of_2,
            use_padding: self.use_padding,
        }
    }

    /// Seconds of silence appended after a finite source so that a pending
    /// sequence is closed.
    pub fn trailing_silence(&self) -> f64 {
        2.0 * self.max_tone_interval
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }
}

/// Builder for custom configurations
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn from_preset(preset: ConfigPreset) -> Self {
        Self {
            config: PipelineConfig::from_preset(preset),
        }
    }

    /// Start from an existing configuration, e.g. one loaded from disk.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn min_tone_amp(mut self, amp: f64) -> Self {
        self.config.min_tone_amp = amp.max(0.0);
        self
    }

    pub fn max_inter_tone_amp(mut self, amp: f64) -> Self {
        self.config.max_inter_tone_amp = amp.max(0.0);
        self
    }

    pub fn min_presence(mut self, seconds: f64) -> Self {
        self.config.min_presence = seconds.max(0.0);
        self
    }

    pub fn min_pause(mut self, seconds: f64) -> Self {
        self.config.min_pause = seconds.max(0.0);
        self
    }

    pub fn max_tone_interval(mut self, seconds: f64) -> Self {
        self.config.max_tone_interval = seconds.max(0.0);
        self
    }

    pub fn min_sequence_length(mut self, length: usize) -> Self {
        self.config.min_sequence_length = length;
        self
    }

    pub fn window_function(mut self, window: WindowType) -> Self {
        self.config.window_function = window;
        self
    }

    pub fn min_frequency_resolution(mut self, hz: Option<f64>) -> Self {
        self.config.min_frequency_resolution = hz;
        self
    }

    pub fn power_of_2(mut self, enabled: bool) -> Self {
        self.config.power_of_2 = enabled;
        self
    }

    pub fn use_padding(mut self, enabled: bool) -> Self {
        self.config.use_padding = enabled;
        self
    }

    pub fn build(mut self) -> PipelineConfig {
        self.config.preset = ConfigPreset::Custom;
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
