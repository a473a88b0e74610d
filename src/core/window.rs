// src/core/window.rs
//
// Sliding analysis window with 50% overlap.
//
// Samples are copied into a fixed buffer of `nsamples + npads` values. Every
// time `nsamples` unread samples have been absorbed the window is handed to
// the caller, then the second half of the data region is moved to the front.
// Consecutive windows therefore share exactly `nsamples / 2` samples.

use log::debug;

use super::dsp::{dedup_frequencies, min_frequency_spacing, WindowType, WindowingFunction};
use super::error::{Result, ToneDetectError};
use super::timespan::Timespan;

/// Knobs for [`Window::tuned`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningOptions {
    /// Required frequency resolution in Hz. Derived from the targets when `None`.
    pub min_resolution: Option<f64>,
    /// Round the total window length up to the next power of two.
    pub power_of_2: bool,
    /// Spend the extra power-of-two length on zero padding instead of data.
    pub use_padding: bool,
}

impl Default for TuningOptions {
    fn default() -> Self {
        Self {
            min_resolution: None,
            power_of_2: true,
            use_padding: true,
        }
    }
}

/// Overlapping analysis window over a sample stream.
#[derive(Debug, Clone)]
pub struct Window {
    nsamples: usize,
    npads: usize,
    sample_rate: f64,
    values: Vec<f32>,
    windowing: WindowingFunction,
    shifts: u64,
    idx: usize,
}

impl Window {
    pub fn new(
        nsamples: usize,
        sample_rate: f64,
        npads: usize,
        window_type: WindowType,
    ) -> Result<Self> {
        if nsamples == 0 {
            return Err(ToneDetectError::EmptyWindow);
        }
        if nsamples % 2 != 0 {
            return Err(ToneDetectError::OddWindowSize(nsamples));
        }
        if !(sample_rate > 0.0) {
            return Err(ToneDetectError::InvalidSampleRate(sample_rate));
        }

        Ok(Self {
            nsamples,
            npads,
            sample_rate,
            values: vec![0.0; nsamples + npads],
            windowing: WindowingFunction::new(nsamples, window_type),
            shifts: 0,
            idx: 0,
        })
    }

    /// Build a window just large enough to resolve `frequencies`.
    ///
    /// Without an explicit resolution, half the smallest spacing between two
    /// target frequencies is used, or a fifth of the frequency when only one
    /// is given.
    pub fn tuned(
        sample_rate: f64,
        frequencies: &[f64],
        window_type: WindowType,
        options: TuningOptions,
    ) -> Result<Self> {
        if !(sample_rate > 0.0) {
            return Err(ToneDetectError::InvalidSampleRate(sample_rate));
        }

        let unique = dedup_frequencies(frequencies);
        let highest = unique
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, f| Some(acc.map_or(f, |m| m.max(f))))
            .ok_or(ToneDetectError::NoFrequencies)?;

        let nyquist = sample_rate / 2.0;
        if highest > nyquist {
            return Err(ToneDetectError::NyquistViolation {
                frequency: highest,
                nyquist,
            });
        }

        let min_resolution = match options.min_resolution {
            Some(r) => r,
            None => match min_frequency_spacing(&unique) {
                Some(spacing) => spacing / 2.0,
                None => unique[0] / 5.0,
            },
        };
        if !(min_resolution > 0.0) || !min_resolution.is_finite() {
            return Err(ToneDetectError::InvalidResolution(min_resolution));
        }

        let mut nsamples = (sample_rate / min_resolution).ceil() as usize;
        if nsamples % 2 != 0 {
            nsamples += 1;
        }

        let mut npads = 0;
        if options.power_of_2 {
            let total = nsamples.next_power_of_two();
            if options.use_padding {
                npads = total - nsamples;
            } else {
                nsamples = total;
            }
        }

        debug!(
            "Tuned window: {} samples + {} pads at {} Hz (resolution {:.2} Hz)",
            nsamples, npads, sample_rate, min_resolution
        );

        Self::new(nsamples, sample_rate, npads, window_type)
    }

    /// Absorb a chunk of samples, invoking `on_window` for every completed window.
    ///
    /// Only one window is alive at a time; callers that want to keep its
    /// contents must copy them before returning.
    pub fn update<F>(&mut self, samples: &[f32], mut on_window: F)
    where
        F: FnMut(&Window),
    {
        let half = self.nsamples / 2;
        let mut rest = samples;

        while !rest.is_empty() {
            let nconsume = (self.nsamples - self.idx).min(rest.len());
            self.values[self.idx..self.idx + nconsume].copy_from_slice(&rest[..nconsume]);
            self.idx += nconsume;
            rest = &rest[nconsume..];

            if self.idx == self.nsamples {
                on_window(self);
                self.values.copy_within(half..self.nsamples, 0);
                self.idx = half;
                self.shifts += 1;
            }
        }
    }

    /// Same as [`Window::update`] for a sequence of chunks.
    pub fn update_parts<I, P, F>(&mut self, parts: I, mut on_window: F)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[f32]>,
        F: FnMut(&Window),
    {
        for part in parts {
            self.update(part.as_ref(), &mut on_window);
        }
    }

    pub fn nsamples(&self) -> usize {
        self.nsamples
    }

    pub fn npads(&self) -> usize {
        self.npads
    }

    /// Data samples plus zero padding.
    pub fn ntotal(&self) -> usize {
        self.nsamples + self.npads
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Whole buffer including padding.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Data region only.
    pub fn data(&self) -> &[f32] {
        &self.values[..self.nsamples]
    }

    pub fn windowing(&self) -> &WindowingFunction {
        &self.windowing
    }

    /// Number of shifts performed so far, i.e. the index of the live window.
    pub fn shifts(&self) -> u64 {
        self.shifts
    }

    /// Duration covered by the data samples of one window.
    pub fn temporal_resolution(&self) -> f64 {
        self.nsamples as f64 / self.sample_rate
    }

    /// Frequency resolution of the data samples, ignoring padding.
    pub fn frequency_resolution(&self) -> f64 {
        self.sample_rate / self.nsamples as f64
    }

    /// Spacing of spectral bins, including padding.
    pub fn bin_resolution(&self) -> f64 {
        self.sample_rate / self.ntotal() as f64
    }

    /// Center of the live window in seconds since stream start.
    pub fn temporal_center(&self) -> f64 {
        let half_res = self.temporal_resolution() / 2.0;
        half_res * (1 + self.shifts) as f64
    }

    /// Stream interval covered by the live window.
    pub fn temporal_range(&self) -> Timespan {
        let center = self.temporal_center();
        let half_res = self.temporal_resolution() / 2.0;
        Timespan::new(center - half_res, center + half_res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_windows(window: &mut Window, samples: &[f32]) -> Vec<Vec<f32>> {
        let mut out = Vec::new();
        window.update(samples, |w| out.push(w.values().to_vec()));
        out
    }

    #[test]
    fn test_window_properties() {
        let w = Window::new(100, 1000.0, 10, WindowType::Rectangle).unwrap();
        assert_eq!(w.ntotal(), 110);
        assert_eq!(w.frequency_resolution(), 10.0);
        assert_eq!(w.bin_resolution(), 1000.0 / 110.0);
        assert_eq!(w.temporal_resolution(), 0.1);
        assert_eq!(w.shifts(), 0);
        assert_eq!(w.values().len(), 110);
    }

    #[test]
    fn test_odd_size_rejected() {
        let err = Window::new(5, 1000.0, 0, WindowType::Rectangle).unwrap_err();
        assert!(matches!(err, ToneDetectError::OddWindowSize(5)));
        assert!(Window::new(0, 1000.0, 0, WindowType::Rectangle).is_err());
        assert!(Window::new(4, 0.0, 0, WindowType::Rectangle).is_err());
    }

    #[test]
    fn test_window_yields_correctly() {
        let data: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let mut w = Window::new(4, 10.0, 2, WindowType::Rectangle).unwrap();

        let windows = collect_windows(&mut w, &data);
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0], vec![0.0, 1.0, 2.0, 3.0, 0.0, 0.0]);
        assert_eq!(windows[1], vec![2.0, 3.0, 4.0, 5.0, 0.0, 0.0]);
        assert_eq!(windows[2], vec![4.0, 5.0, 6.0, 7.0, 0.0, 0.0]);
        assert_eq!(windows[3], vec![6.0, 7.0, 8.0, 9.0, 0.0, 0.0]);
    }

    #[test]
    fn test_chunking_does_not_matter() {
        let data: Vec<f32> = (0..37).map(|i| i as f32).collect();

        let mut whole = Window::new(6, 10.0, 0, WindowType::Rectangle).unwrap();
        let expected = collect_windows(&mut whole, &data);

        let mut chunked = Window::new(6, 10.0, 0, WindowType::Rectangle).unwrap();
        let mut got = Vec::new();
        let parts: Vec<&[f32]> = data.chunks(5).collect();
        chunked.update_parts(parts, |w| got.push(w.values().to_vec()));

        assert_eq!(expected, got);
        assert_eq!(whole.shifts(), chunked.shifts());
    }

    #[test]
    fn test_consecutive_windows_overlap_by_half() {
        let data: Vec<f32> = (0..200).map(|i| i as f32).collect();
        let mut w = Window::new(8, 100.0, 3, WindowType::Rectangle).unwrap();
        let windows = collect_windows(&mut w, &data);

        for pair in windows.windows(2) {
            assert_eq!(pair[0][4..8], pair[1][0..4]);
        }
    }

    #[test]
    fn test_window_shifts_correctly() {
        let data: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let mut w = Window::new(4, 10.0, 0, WindowType::Rectangle).unwrap();

        let mut ranges = Vec::new();
        w.update(&data, |w| ranges.push((w.temporal_center(), w.temporal_range())));

        assert!((ranges[0].0 - 0.2).abs() < 1e-12);
        assert_eq!(ranges[0].1.start(), Some(0.0));
        assert!((ranges[0].1.end().unwrap() - 0.4).abs() < 1e-12);

        assert!((ranges[1].0 - 0.4).abs() < 1e-12);
        assert!((ranges[1].1.start().unwrap() - 0.2).abs() < 1e-12);
        assert!((ranges[1].1.end().unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_window_tunes_correctly() {
        let opts = TuningOptions {
            min_resolution: Some(10.0),
            power_of_2: false,
            use_padding: false,
        };
        let w = Window::tuned(1000.0, &[10.0], WindowType::Rectangle, opts).unwrap();
        assert_eq!(w.nsamples(), 100);
        assert_eq!(w.temporal_resolution(), 0.1);
        assert_eq!(w.frequency_resolution(), 10.0);
        assert_eq!(w.bin_resolution(), 10.0);

        let opts = TuningOptions {
            min_resolution: None,
            power_of_2: false,
            use_padding: false,
        };
        let w = Window::tuned(1000.0, &[10.0, 20.0], WindowType::Rectangle, opts).unwrap();
        // Half the spacing between 10 and 20 Hz.
        assert_eq!(w.nsamples(), 200);
        assert_eq!(w.frequency_resolution(), 5.0);

        let opts = TuningOptions {
            min_resolution: Some(10.0),
            power_of_2: true,
            use_padding: true,
        };
        let w = Window::tuned(1000.0, &[10.0, 20.0], WindowType::Rectangle, opts).unwrap();
        assert_eq!(w.ntotal(), 128);
        assert_eq!(w.nsamples(), 100);
        assert_eq!(w.npads(), 28);
        assert_eq!(w.frequency_resolution(), 10.0);
        assert_eq!(w.bin_resolution(), 1000.0 / 128.0);
        assert_eq!(w.temporal_resolution(), 0.1);

        let opts = TuningOptions {
            min_resolution: Some(10.0),
            power_of_2: true,
            use_padding: false,
        };
        let w = Window::tuned(1000.0, &[10.0, 20.0], WindowType::Rectangle, opts).unwrap();
        assert_eq!(w.nsamples(), 128);
        assert_eq!(w.npads(), 0);
    }

    #[test]
    fn test_single_frequency_uses_fifth() {
        let opts = TuningOptions {
            min_resolution: None,
            power_of_2: false,
            use_padding: false,
        };
        let w = Window::tuned(1000.0, &[50.0], WindowType::Rectangle, opts).unwrap();
        assert_eq!(w.nsamples(), 100);
    }

    #[test]
    fn test_odd_requirement_rounds_up_to_even() {
        let opts = TuningOptions {
            min_resolution: Some(36.5),
            power_of_2: false,
            use_padding: false,
        };
        let w = Window::tuned(8000.0, &[697.0, 770.0], WindowType::Rectangle, opts).unwrap();
        assert_eq!(w.nsamples(), 220);

        let opts = TuningOptions {
            min_resolution: Some(7.0),
            ..opts
        };
        // 1001 / 7 = 143 samples, bumped to 144.
        let w = Window::tuned(1001.0, &[100.0], WindowType::Rectangle, opts).unwrap();
        assert_eq!(w.nsamples(), 144);
    }

    #[test]
    fn test_tuning_is_deterministic() {
        let freqs = [697.0, 770.0, 852.0, 941.0, 1209.0, 1336.0, 1477.0, 1633.0];
        let a = Window::tuned(8000.0, &freqs, WindowType::Hanning, TuningOptions::default()).unwrap();
        let b = Window::tuned(8000.0, &freqs, WindowType::Hanning, TuningOptions::default()).unwrap();
        assert_eq!((a.nsamples(), a.npads()), (b.nsamples(), b.npads()));
        assert_eq!((a.nsamples(), a.npads()), (220, 36));
    }

    #[test]
    fn test_nyquist_violation() {
        let err = Window::tuned(
            1000.0,
            &[100.0, 600.0],
            WindowType::Rectangle,
            TuningOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ToneDetectError::NyquistViolation { .. }));

        assert!(Window::tuned(1000.0, &[], WindowType::Rectangle, TuningOptions::default()).is_err());
    }
}
