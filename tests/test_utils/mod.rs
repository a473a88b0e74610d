// Shared helpers for the integration tests: signal assembly and running the
// pipeline or the binary over it.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tonedetect::config::PipelineConfig;
use tonedetect::core::{DetectionPipeline, ToneSet};
use tonedetect::detection::SequenceEvent;
use tonedetect::generators::{generate_signal, silence};

pub const SAMPLE_RATE: f64 = 8000.0;

/// Piecewise signal: each segment is `(frequencies, amplitudes, seconds)`,
/// an empty frequency list is silence.
pub struct SignalBuilder {
    sample_rate: f64,
    samples: Vec<f32>,
}

impl SignalBuilder {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
        }
    }

    pub fn silence(mut self, seconds: f64) -> Self {
        self.samples.extend(silence(self.sample_rate, seconds));
        self
    }

    pub fn tone(mut self, frequencies: &[f64], amplitudes: &[f64], seconds: f64) -> Self {
        let signal = generate_signal(self.sample_rate, seconds, frequencies, amplitudes)
            .expect("frequencies and amplitudes differ in length");
        self.samples.extend(signal);
        self
    }

    /// Play the DTMF `symbol` with every frequency at `amplitude`.
    pub fn dtmf(self, symbol: &str, amplitude: f64, seconds: f64) -> Self {
        let tones = ToneSet::dtmf();
        let tone = tones.find(symbol).expect("not a DTMF symbol").clone();
        let amps = vec![amplitude; tone.frequencies.len()];
        self.tone(&tone.frequencies, &amps, seconds)
    }

    pub fn build(self) -> Vec<f32> {
        self.samples
    }
}

/// Feed `samples` in chunks of `chunk_len`, flush, and collect every event.
pub fn detect(samples: &[f32], config: &PipelineConfig, chunk_len: usize) -> Vec<SequenceEvent> {
    let mut pipeline =
        DetectionPipeline::new(SAMPLE_RATE, ToneSet::dtmf(), config).expect("valid pipeline");
    let mut events = Vec::new();
    for chunk in samples.chunks(chunk_len.max(1)) {
        events.extend(pipeline.process(chunk).expect("process"));
    }
    events.extend(pipeline.flush().expect("flush"));
    events
}

pub fn symbols(events: &[SequenceEvent]) -> Vec<String> {
    events.iter().map(|e| e.symbols_string()).collect()
}

pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for &s in samples {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

pub fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tonedetect"))
}

pub fn run_tonedetect<I, S>(args: I) -> std::process::Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(binary_path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute tonedetect")
}

/// Non-empty stdout lines parsed as JSON.
pub fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("stdout line is JSON"))
        .collect()
}
