// src/core/pipeline.rs
//
// Two-phase driver: samples go into the window, every completed window runs
// through frequency, tone and sequence detection before the next one is
// built.

use log::{debug, info};

use super::error::{Result, ToneDetectError};
use super::frequency::FrequencyDetector;
use super::sequence::ToneSequenceDetector;
use super::tone_detector::ToneDetector;
use super::tones::ToneSet;
use super::window::Window;
use crate::config::PipelineConfig;
use crate::detection::{CaptureBuffer, SequenceEvent, Status};
use crate::generators::sample_count;
use crate::sources::SampleSource;

/// The full detection cascade over one stream.
#[derive(Debug)]
pub struct DetectionPipeline {
    window: Window,
    frequencies: FrequencyDetector,
    tones: ToneDetector,
    sequences: ToneSequenceDetector,
    trailing_silence: f64,
    sequence_count: usize,
}

impl DetectionPipeline {
    pub fn new(sample_rate: f64, tones: ToneSet, config: &PipelineConfig) -> Result<Self> {
        if tones.is_empty() {
            return Err(ToneDetectError::NoFrequencies);
        }
        let window = Window::tuned(
            sample_rate,
            tones.frequencies(),
            config.window_function,
            config.tuning(),
        )?;
        let frequencies = FrequencyDetector::new(tones.frequencies());

        info!(
            "Detecting {} tones at {} Hz: window {} + {} pads, {:.1} ms per window",
            tones.len(),
            sample_rate,
            window.nsamples(),
            window.npads(),
            window.temporal_resolution() * 1000.0
        );

        Ok(Self {
            window,
            frequencies,
            tones: ToneDetector::new(tones, config.thresholds()),
            sequences: ToneSequenceDetector::new(
                config.max_tone_interval,
                config.min_sequence_length,
            ),
            trailing_silence: config.trailing_silence(),
            sequence_count: 0,
        })
    }

    /// Replace the global minimum amplitude with one per frequency.
    pub fn with_frequency_thresholds(mut self, thresholds: &[f64]) -> Result<Self> {
        self.tones = self.tones.with_frequency_thresholds(thresholds)?;
        Ok(self)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn tones(&self) -> &ToneSet {
        self.tones.tones()
    }

    pub fn sequence_count(&self) -> usize {
        self.sequence_count
    }

    /// Feed a chunk of normalized samples, returning the sequences it completed.
    pub fn process(&mut self, samples: &[f32]) -> Result<Vec<SequenceEvent>> {
        let Self {
            window,
            frequencies,
            tones,
            sequences,
            sequence_count,
            ..
        } = self;

        let mut events = Vec::new();
        let mut failure = None;

        window.update(samples, |w| {
            if failure.is_some() {
                return;
            }
            let amplitudes = match frequencies.update(w) {
                Ok(amplitudes) => amplitudes,
                Err(e) => {
                    failure = Some(e);
                    return;
                }
            };
            let new_tones = tones.update(w, &amplitudes);
            if let Some(sequence) = sequences.update(w, &new_tones) {
                *sequence_count += 1;
                events.push(SequenceEvent::new(*sequence_count, sequence));
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(events),
        }
    }

    /// Push enough silence through the cascade to close a pending sequence.
    pub fn flush(&mut self) -> Result<Vec<SequenceEvent>> {
        let chunk_len = self.window.nsamples();
        let mut remaining =
            sample_count(self.window.sample_rate(), self.trailing_silence) + chunk_len;
        debug!("Flushing with {} samples of silence", remaining);

        let silence = vec![0.0f32; chunk_len];
        let mut events = Vec::new();
        while remaining > 0 {
            let n = remaining.min(chunk_len);
            events.extend(self.process(&silence[..n])?);
            remaining -= n;
        }
        Ok(events)
    }

    /// Drain `source`, then flush.
    ///
    /// `on_event` sees every sequence in order; `capture` is fed every chunk
    /// and writes one file per sequence.
    pub fn run<S, F>(
        &mut self,
        source: &mut S,
        status: &mut Status,
        capture: &mut CaptureBuffer,
        mut on_event: F,
    ) -> anyhow::Result<()>
    where
        S: SampleSource + ?Sized,
        F: FnMut(&SequenceEvent) -> anyhow::Result<()>,
    {
        while let Some(chunk) = source.next_chunk()? {
            capture.add(&chunk);
            for event in self.process(&chunk)? {
                capture.write(&event)?;
                status.update_sequences(event.symbols_string());
                on_event(&event)?;
            }
            status.update_bytes(source.bytes_consumed());
            status.maybe_report();
        }

        for event in self.flush()? {
            capture.write(&event)?;
            status.update_sequences(event.symbols_string());
            on_event(&event)?;
        }
        status.update_bytes(source.bytes_consumed());
        info!("{}", status.summary());
        Ok(())
    }
}
