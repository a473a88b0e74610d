// src/generators.rs
//
// Synthetic test signals: sums of sinusoids, silence and tone sequences.

use std::f64::consts::PI;

use crate::core::error::{Result, ToneDetectError};
use crate::core::tones::ToneSet;

/// Number of samples covering `duration` seconds.
pub fn sample_count(sample_rate: f64, duration: f64) -> usize {
    (duration * sample_rate).round().max(0.0) as usize
}

/// Sample instants `start, start + 1/sr, ...` spanning `duration` seconds.
pub fn generate_time_samples(sample_rate: f64, duration: f64, start: f64) -> Vec<f64> {
    (0..sample_count(sample_rate, duration))
        .map(|i| start + i as f64 / sample_rate)
        .collect()
}

/// Encode a set of frequencies into a time signal.
///
/// `frequencies` and `amplitudes` are paired by position.
pub fn generate_signal(
    sample_rate: f64,
    duration: f64,
    frequencies: &[f64],
    amplitudes: &[f64],
) -> Result<Vec<f32>> {
    generate_signal_at(sample_rate, duration, frequencies, amplitudes, 0.0)
}

/// Like [`generate_signal`], with the phase of a signal that began `start` seconds earlier.
pub fn generate_signal_at(
    sample_rate: f64,
    duration: f64,
    frequencies: &[f64],
    amplitudes: &[f64],
    start: f64,
) -> Result<Vec<f32>> {
    if frequencies.len() != amplitudes.len() {
        return Err(ToneDetectError::LengthMismatch {
            what: "signal amplitudes",
            expected: frequencies.len(),
            actual: amplitudes.len(),
        });
    }

    Ok(generate_time_samples(sample_rate, duration, start)
        .into_iter()
        .map(|t| {
            frequencies
                .iter()
                .zip(amplitudes)
                .map(|(&f, &a)| a * (2.0 * PI * f * t).sin())
                .sum::<f64>() as f32
        })
        .collect())
}

pub fn silence(sample_rate: f64, duration: f64) -> Vec<f32> {
    vec![0.0; sample_count(sample_rate, duration)]
}

/// Render `symbols` as consecutive tones separated by silent gaps.
///
/// Every frequency of a tone is played at `amplitude`. Unknown symbols are
/// rendered as silence of the tone's length.
pub fn generate_tone_sequence(
    tones: &ToneSet,
    symbols: &[&str],
    sample_rate: f64,
    tone_duration: f64,
    gap_duration: f64,
    amplitude: f64,
) -> Result<Vec<f32>> {
    let mut samples = Vec::new();
    for (i, symbol) in symbols.iter().enumerate() {
        if i > 0 {
            samples.extend(silence(sample_rate, gap_duration));
        }
        match tones.find(symbol) {
            Some(tone) => {
                let amps = vec![amplitude; tone.frequencies.len()];
                samples.extend(generate_signal(sample_rate, tone_duration, &tone.frequencies, &amps)?);
            }
            None => samples.extend(silence(sample_rate, tone_duration)),
        }
    }
    Ok(samples)
}
