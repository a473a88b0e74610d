//! Sample sources feeding the detection pipeline
//!
//! Every source produces normalized mono chunks in [-1, 1] and reports how
//! many raw bytes it has consumed so far.

mod ffmpeg;
mod file;
mod pcm;

pub use ffmpeg::FfmpegSource;
pub use file::FileSource;
pub use pcm::{PcmReader, StdinSource};

use crate::generators::sample_count;

/// Default number of bytes read per part from byte streams.
pub const DEFAULT_PART_LENGTH: usize = 1024;

/// Producer of normalized sample chunks.
pub trait SampleSource {
    /// Next chunk of samples, `None` once the source is exhausted.
    fn next_chunk(&mut self) -> anyhow::Result<Option<Vec<f32>>>;

    /// Raw bytes consumed so far.
    fn bytes_consumed(&self) -> u64;

    /// Native sample rate when the source knows it.
    fn sample_rate(&self) -> Option<u32> {
        None
    }
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn next_chunk(&mut self) -> anyhow::Result<Option<Vec<f32>>> {
        (**self).next_chunk()
    }

    fn bytes_consumed(&self) -> u64 {
        (**self).bytes_consumed()
    }

    fn sample_rate(&self) -> Option<u32> {
        (**self).sample_rate()
    }
}

/// Samples already held in memory, handed out in fixed size parts.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    samples: Vec<f32>,
    part_length: usize,
    pos: usize,
}

impl InMemorySource {
    pub fn new(samples: Vec<f32>) -> Self {
        Self::with_part_length(samples, 4096)
    }

    pub fn with_part_length(samples: Vec<f32>, part_length: usize) -> Self {
        Self {
            samples,
            part_length: part_length.max(1),
            pos: 0,
        }
    }
}

impl SampleSource for InMemorySource {
    fn next_chunk(&mut self) -> anyhow::Result<Option<Vec<f32>>> {
        if self.pos >= self.samples.len() {
            return Ok(None);
        }
        let end = (self.pos + self.part_length).min(self.samples.len());
        let chunk = self.samples[self.pos..end].to_vec();
        self.pos = end;
        Ok(Some(chunk))
    }

    fn bytes_consumed(&self) -> u64 {
        (self.pos * std::mem::size_of::<f32>()) as u64
    }
}

/// A fixed duration of zeros.
#[derive(Debug, Clone)]
pub struct SilenceSource {
    remaining: usize,
    part_length: usize,
}

impl SilenceSource {
    pub fn new(duration: f64, sample_rate: f64) -> Self {
        Self {
            remaining: sample_count(sample_rate, duration.max(0.0)),
            part_length: 1024,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl SampleSource for SilenceSource {
    fn next_chunk(&mut self) -> anyhow::Result<Option<Vec<f32>>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let n = self.remaining.min(self.part_length);
        self.remaining -= n;
        Ok(Some(vec![0.0; n]))
    }

    /// Silence is synthesized, nothing is read.
    fn bytes_consumed(&self) -> u64 {
        0
    }
}
