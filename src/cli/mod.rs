// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{load_tones, parse_sample_format, print_presets, Cli, Commands, DetectionArgs};
pub use output::{format_event, format_json, format_summary, print_event};
