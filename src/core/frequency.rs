// src/core/frequency.rs
//
// Spectral amplitude at a fixed list of target frequencies.

use std::sync::Arc;

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use super::error::{Result, ToneDetectError};
use super::window::Window;

/// Measures the amplitude of target frequencies in completed windows.
///
/// Amplitudes are scaled so that a pure sinusoid of amplitude `A` sitting
/// exactly on a bin reads as `A`, whatever windowing function is used.
/// No thresholding happens here.
pub struct FrequencyDetector {
    frequencies: Vec<f64>,
    planner: RealFftPlanner<f32>,
    fft: Option<Arc<dyn RealToComplex<f32>>>,
    input: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl FrequencyDetector {
    /// Order is preserved and duplicates are evaluated independently.
    pub fn new(frequencies: &[f64]) -> Self {
        Self {
            frequencies: frequencies.to_vec(),
            planner: RealFftPlanner::new(),
            fft: None,
            input: Vec::new(),
            spectrum: Vec::new(),
            scratch: Vec::new(),
        }
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Spectral bin for `frequency` given the window's bin spacing.
    ///
    /// Ties round half away from zero, so a frequency exactly between two
    /// bins maps to the upper one.
    pub fn frequency_to_bin(frequency: f64, bin_resolution: f64) -> usize {
        (frequency / bin_resolution).round().max(0.0) as usize
    }

    /// Amplitudes of the target frequencies in `window`, in construction order.
    pub fn update(&mut self, window: &Window) -> Result<Vec<f64>> {
        self.transform(window)?;

        let nbins = self.spectrum.len();
        let norm = (2.0 / window.nsamples() as f64) * window.windowing().normalizer() as f64;
        let bin_resolution = window.bin_resolution();

        let amplitudes = self
            .frequencies
            .iter()
            .map(|&f| {
                let bin = Self::frequency_to_bin(f, bin_resolution).min(nbins - 1);
                norm * self.spectrum[bin].norm() as f64
            })
            .collect();

        Ok(amplitudes)
    }

    /// Windowed one-sided spectrum of the live window, written to `self.spectrum`.
    fn transform(&mut self, window: &Window) -> Result<()> {
        let ntotal = window.ntotal();
        let fft = match &self.fft {
            Some(fft) if fft.len() == ntotal => Arc::clone(fft),
            _ => {
                let fft = self.planner.plan_fft_forward(ntotal);
                self.input = fft.make_input_vec();
                self.spectrum = fft.make_output_vec();
                self.scratch = fft.make_scratch_vec();
                self.fft = Some(Arc::clone(&fft));
                fft
            }
        };

        let nsamples = window.nsamples();
        let coefficients = window.windowing().values();
        for ((dst, &s), &w) in self.input[..nsamples]
            .iter_mut()
            .zip(window.data())
            .zip(coefficients)
        {
            *dst = s * w;
        }
        self.input[nsamples..].fill(0.0);

        fft.process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)
            .map_err(|e| ToneDetectError::Fft(e.to_string()))
    }
}

impl std::fmt::Debug for FrequencyDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrequencyDetector")
            .field("frequencies", &self.frequencies)
            .field("fft_len", &self.fft.as_ref().map(|fft| fft.len()))
            .finish()
    }
}
