//! CLI argument definitions with preset support

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigPreset, PipelineConfig, PipelineConfigBuilder};
use crate::core::dsp::WindowType;
use crate::core::tones::ToneSet;
use crate::normalization::SampleFormat;

/// Detect multi-frequency tone sequences in audio streams
#[derive(Parser, Debug)]
#[command(name = "tonedetect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode any ffmpeg input (file, URL, device) and detect tones
    Ffmpeg {
        /// Input passed to `ffmpeg -i`
        #[arg(short, long)]
        source: String,

        /// ffmpeg binary to run
        #[arg(long, env = "TONEDETECT_FFMPEG", default_value = "ffmpeg")]
        ffmpeg: PathBuf,

        #[command(flatten)]
        detection: DetectionArgs,
    },

    /// Read raw little-endian mono samples from stdin
    Stdin {
        /// Sample format: u8, i16, i32 or f32
        #[arg(long, default_value = "i16")]
        source_type: String,

        #[command(flatten)]
        detection: DetectionArgs,
    },

    /// Decode audio files; directories are searched recursively
    File {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        detection: DetectionArgs,
    },

    /// Write a WAV file containing a tone sequence
    Generate {
        /// Symbols to render, one character each
        #[arg(long)]
        symbols: String,

        #[arg(short, long)]
        output: PathBuf,

        /// Tone set JSON file (built-in DTMF when omitted)
        #[arg(long)]
        tones: Option<PathBuf>,

        #[arg(long, default_value_t = 8000)]
        sample_rate: u32,

        /// Seconds per tone
        #[arg(long, default_value_t = 0.1)]
        tone_length: f64,

        /// Seconds of silence between tones and around the sequence
        #[arg(long, default_value_t = 0.1)]
        gap_length: f64,

        #[arg(long, default_value_t = 0.5)]
        amplitude: f64,
    },

    /// List configuration presets and exit
    Presets,
}

/// Options shared by every detecting subcommand
#[derive(Args, Debug, Clone)]
pub struct DetectionArgs {
    /// Tone set JSON file (built-in DTMF when omitted)
    #[arg(long)]
    pub tones: Option<PathBuf>,

    /// Sample rate of the analysed stream in Hz
    #[arg(long, default_value_t = 8000)]
    pub sample_rate: u32,

    /// Configuration preset: standard or streaming
    #[arg(long, default_value = "standard")]
    pub preset: String,

    /// Pipeline configuration JSON file, applied before individual overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum amplitude of every tone frequency [0..1]
    #[arg(long)]
    pub min_tone_level: Option<f64>,

    /// Maximum amplitude range between the frequencies of a tone [0..1]
    #[arg(long)]
    pub max_tone_range: Option<f64>,

    /// Seconds a tone must be present
    #[arg(long)]
    pub min_tone_on: Option<f64>,

    /// Seconds a tone must be absent before it repeats
    #[arg(long)]
    pub min_tone_off: Option<f64>,

    /// Maximum seconds between tones of one sequence
    #[arg(long)]
    pub max_tone_interval: Option<f64>,

    /// Minimum number of tones per sequence
    #[arg(long)]
    pub min_seq_length: Option<usize>,

    /// Windowing function: rectangle or hanning
    #[arg(long)]
    pub window: Option<String>,

    /// Print detections as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Save the audio around each detected sequence
    #[arg(long)]
    pub capture_audio: bool,

    #[arg(long, default_value = "captures")]
    pub capture_audio_dir: PathBuf,

    /// Seconds of audio kept for capture
    #[arg(long, default_value_t = 10.0)]
    pub capture_audio_length: f64,

    /// Seconds between status lines
    #[arg(long, default_value_t = 10)]
    pub status_interval: i64,
}

impl DetectionArgs {
    /// Pipeline configuration from preset, optional file and individual overrides.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let base = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => {
                let Some(preset) = ConfigPreset::from_name(&self.preset) else {
                    bail!("Unknown preset: {}", self.preset);
                };
                PipelineConfig::from_preset(preset)
            }
        };

        let overridden = self.min_tone_level.is_some()
            || self.max_tone_range.is_some()
            || self.min_tone_on.is_some()
            || self.min_tone_off.is_some()
            || self.max_tone_interval.is_some()
            || self.min_seq_length.is_some()
            || self.window.is_some();
        if !overridden {
            return Ok(base);
        }

        let mut builder = PipelineConfigBuilder::from_config(base);
        if let Some(v) = self.min_tone_level {
            builder = builder.min_tone_amp(v);
        }
        if let Some(v) = self.max_tone_range {
            builder = builder.max_inter_tone_amp(v);
        }
        if let Some(v) = self.min_tone_on {
            builder = builder.min_presence(v);
        }
        if let Some(v) = self.min_tone_off {
            builder = builder.min_pause(v);
        }
        if let Some(v) = self.max_tone_interval {
            builder = builder.max_tone_interval(v);
        }
        if let Some(v) = self.min_seq_length {
            builder = builder.min_sequence_length(v);
        }
        if let Some(name) = &self.window {
            let Some(window) = WindowType::from_name(name) else {
                bail!("Unknown window function: {}", name);
            };
            builder = builder.window_function(window);
        }
        Ok(builder.build())
    }

    pub fn tone_set(&self) -> Result<ToneSet> {
        load_tones(self.tones.as_deref())
    }
}

/// Tones from a JSON file, or the DTMF grid.
pub fn load_tones(path: Option<&Path>) -> Result<ToneSet> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read tones: {}", path.display()))?;
            ToneSet::from_json_str(&json)
                .with_context(|| format!("Invalid tones: {}", path.display()))
        }
        None => Ok(ToneSet::dtmf()),
    }
}

pub fn parse_sample_format(name: &str) -> Result<SampleFormat> {
    match SampleFormat::from_name(name) {
        Some(format) => Ok(format),
        None => bail!("Unknown source type: {} (expected u8, i16, i32 or f32)", name),
    }
}

/// Print available presets
pub fn print_presets() {
    println!("Available configuration presets:\n");
    for preset in ConfigPreset::all() {
        let config = PipelineConfig::from_preset(preset);
        println!("  {:<10} {}", preset.name(), preset.description());
        println!(
            "  {:<10} min length {}, max interval {:.2}s, on {:.3}s, off {:.3}s\n",
            "",
            config.min_sequence_length,
            config.max_tone_interval,
            config.min_presence,
            config.min_pause
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    fn detection(cli: Cli) -> DetectionArgs {
        match cli.command {
            Commands::Stdin { detection, .. }
            | Commands::File { detection, .. }
            | Commands::Ffmpeg { detection, .. } => detection,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let args = detection(parse(&["tonedetect", "stdin"]));
        assert_eq!(args.sample_rate, 8000);
        assert_eq!(args.pipeline_config().unwrap(), PipelineConfig::default());
        assert_eq!(args.tone_set().unwrap().len(), 16);
    }

    #[test]
    fn test_overrides() {
        let args = detection(parse(&[
            "tonedetect",
            "file",
            "a.wav",
            "--preset",
            "streaming",
            "--min-tone-on",
            "0.08",
            "--window",
            "hanning",
        ]));
        let config = args.pipeline_config().unwrap();
        assert_eq!(config.preset, ConfigPreset::Custom);
        assert_eq!(config.min_sequence_length, 1);
        assert_eq!(config.min_presence, 0.08);
        assert_eq!(config.window_function, WindowType::Hanning);
    }

    #[test]
    fn test_rejects_unknown_names() {
        let args = detection(parse(&["tonedetect", "stdin", "--preset", "loud"]));
        assert!(args.pipeline_config().is_err());

        let args = detection(parse(&["tonedetect", "stdin", "--window", "kaiser"]));
        assert!(args.pipeline_config().is_err());

        assert!(parse_sample_format("i24").is_err());
        assert_eq!(parse_sample_format("u8").unwrap(), SampleFormat::U8);
    }

    #[test]
    fn test_file_requires_paths() {
        assert!(Cli::try_parse_from(["tonedetect", "file"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = parse(&["tonedetect", "-vv", "stdin"]);
        assert_eq!(cli.verbose, 2);
    }
}
