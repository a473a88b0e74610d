//! Audio capture of detected sequences

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use super::result::SequenceEvent;
use crate::generators::sample_count;

/// Keeps the most recent samples of the stream and writes them out as a WAV
/// file whenever a sequence is detected.
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
    sample_rate: u32,
    directory: Option<PathBuf>,
}

impl CaptureBuffer {
    pub fn new(directory: &Path, seconds: f64, sample_rate: u32) -> Self {
        let capacity = sample_count(sample_rate as f64, seconds.max(0.0));
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            sample_rate,
            directory: Some(directory.to_path_buf()),
        }
    }

    /// A capture that never stores or writes anything.
    pub fn disabled() -> Self {
        Self {
            samples: VecDeque::new(),
            capacity: 0,
            sample_rate: 0,
            directory: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.directory.is_some() && self.capacity > 0
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn add(&mut self, chunk: &[f32]) {
        if !self.is_enabled() {
            return;
        }
        let tail = &chunk[chunk.len().saturating_sub(self.capacity)..];
        let overflow = (self.samples.len() + tail.len()).saturating_sub(self.capacity);
        self.samples.drain(..overflow);
        self.samples.extend(tail);
    }

    /// Path the capture of `event` is written to.
    pub fn path_for(&self, event: &SequenceEvent) -> Option<PathBuf> {
        self.directory
            .as_ref()
            .map(|dir| dir.join(format!("{}.wav", event.label())))
    }

    /// Write the buffered audio for `event`, scaled so its peak hits full range.
    pub fn write(&self, event: &SequenceEvent) -> Result<Option<PathBuf>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let Some(path) = self.path_for(event) else {
            return Ok(None);
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create capture dir: {}", dir.display()))?;
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("Failed to create capture file: {}", path.display()))?;

        let peak = self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let scale = if peak > 0.0 { i16::MAX as f32 / peak } else { 0.0 };
        for &sample in &self.samples {
            writer.write_sample((sample * scale).round() as i16)?;
        }
        writer.finalize()?;

        debug!("Captured {} samples for sequence {}", self.samples.len(), event.id);
        info!("Audio saved as {}", path.display());
        Ok(Some(path))
    }
}
