// src/core/tone_detector.rs
//
// Duration based hysteresis on top of per-window frequency amplitudes.

use log::{debug, trace};

use super::error::{Result, ToneDetectError};
use super::timespan::Timespan;
use super::tones::ToneSet;
use super::window::Window;

/// Thresholds for [`ToneDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneThresholds {
    /// Minimum amplitude of every required frequency.
    pub min_tone_amp: f64,
    /// Maximum spread between the amplitudes of a tone's frequencies.
    pub max_inter_tone_amp: f64,
    /// Seconds a tone must be present before it is reported.
    pub min_presence: f64,
    /// Seconds a reported tone must be absent before it can be reported again.
    pub min_pause: f64,
}

impl Default for ToneThresholds {
    fn default() -> Self {
        Self {
            min_tone_amp: 0.1,
            max_inter_tone_amp: 0.1,
            min_presence: 0.04,
            min_pause: 0.04,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ToneState {
    on: Timespan,
    off: Timespan,
    reported: bool,
}

/// Decides when configured tones become active.
///
/// A tone is reported once after it was present for `min_presence` seconds
/// and stays silent until it was absent for `min_pause` seconds. Durations
/// are measured on window time spans, not window counts.
#[derive(Debug, Clone)]
pub struct ToneDetector {
    tones: ToneSet,
    thresholds: ToneThresholds,
    min_amplitudes: Vec<f64>,
    states: Vec<ToneState>,
}

impl ToneDetector {
    pub fn new(tones: ToneSet, thresholds: ToneThresholds) -> Self {
        let min_amplitudes = vec![thresholds.min_tone_amp; tones.frequencies().len()];
        let states = vec![ToneState::default(); tones.len()];
        Self {
            tones,
            thresholds,
            min_amplitudes,
            states,
        }
    }

    /// Use a separate minimum amplitude per frequency.
    ///
    /// `thresholds` is aligned with [`ToneSet::frequencies`].
    pub fn with_frequency_thresholds(mut self, thresholds: &[f64]) -> Result<Self> {
        let expected = self.tones.frequencies().len();
        if thresholds.len() != expected {
            return Err(ToneDetectError::LengthMismatch {
                what: "per-frequency amplitude thresholds",
                expected,
                actual: thresholds.len(),
            });
        }
        self.min_amplitudes = thresholds.to_vec();
        Ok(self)
    }

    pub fn tones(&self) -> &ToneSet {
        &self.tones
    }

    pub fn thresholds(&self) -> &ToneThresholds {
        &self.thresholds
    }

    /// Whether the tone at `index` is currently in the reported state.
    pub fn is_reported(&self, index: usize) -> bool {
        self.states[index].reported
    }

    /// Forget all accumulated presence and absence.
    pub fn reset(&mut self) {
        for state in &mut self.states {
            *state = ToneState::default();
        }
    }

    fn is_active(&self, tone: usize, amplitudes: &[f64]) -> bool {
        let ids = self.tones.frequency_ids(tone);

        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &id in ids {
            let amp = amplitudes[id];
            if amp < self.min_amplitudes[id] {
                return false;
            }
            lo = lo.min(amp);
            hi = hi.max(amp);
        }

        hi - lo <= self.thresholds.max_inter_tone_amp
    }

    /// Symbols that became active with this window.
    ///
    /// `amplitudes` is aligned with [`ToneSet::frequencies`].
    pub fn update(&mut self, window: &Window, amplitudes: &[f64]) -> Vec<String> {
        let span = window.temporal_range();
        let mut new_tones = Vec::new();

        for i in 0..self.states.len() {
            let active = self.is_active(i, amplitudes);
            let state = &mut self.states[i];

            if active {
                state.on.union(&span);
                if !state.reported && state.on.duration() >= self.thresholds.min_presence {
                    // Stays silent while still active until min_pause of absence.
                    state.reported = true;
                    state.off.reset();
                    let symbol = self.tones.symbol(i);
                    debug!("Tone '{}' active at {}", symbol, span);
                    new_tones.push(symbol.to_string());
                }
            } else if state.reported {
                state.off.union(&span);
                if state.off.duration() >= self.thresholds.min_pause {
                    trace!("Tone '{}' released at {}", self.tones.symbol(i), span);
                    state.reported = false;
                    state.on.reset();
                }
            }
        }

        new_tones
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dsp::WindowType;

    // 10 samples per window at 100 Hz: windows are 0.1 s long, 0.05 s apart.
    fn window() -> Window {
        Window::new(10, 100.0, 0, WindowType::Rectangle).unwrap()
    }

    fn tones() -> ToneSet {
        let mut set = ToneSet::new();
        set.add_tone(&[10.0, 20.0], Some("a")).unwrap();
        set.add_tone(&[30.0], Some("b")).unwrap();
        set
    }

    fn thresholds(min_presence: f64, min_pause: f64) -> ToneThresholds {
        ToneThresholds {
            min_tone_amp: 0.5,
            max_inter_tone_amp: 0.2,
            min_presence,
            min_pause,
        }
    }

    /// Feed one amplitude vector per window and collect what gets reported.
    fn run(detector: &mut ToneDetector, frames: &[[f64; 3]]) -> Vec<Vec<String>> {
        let mut wnd = window();
        let samples = vec![0.0f32; 10 + 5 * (frames.len() - 1)];
        let mut out = Vec::new();
        let mut i = 0;
        wnd.update(&samples, |w| {
            out.push(detector.update(w, &frames[i]));
            i += 1;
        });
        out
    }

    const ON: [f64; 3] = [1.0, 1.0, 0.0];
    const OFF: [f64; 3] = [0.0, 0.0, 0.0];

    #[test]
    fn test_reports_after_min_presence() {
        let mut d = ToneDetector::new(tones(), thresholds(0.14, 0.1));
        let out = run(&mut d, &[ON, ON, ON, ON]);
        // Accumulated spans: 0.1 s, then 0.15 s.
        assert!(out[0].is_empty());
        assert_eq!(out[1], vec!["a".to_string()]);
        assert!(out[2].is_empty());
        assert!(out[3].is_empty());
        assert!(d.is_reported(0));
        assert!(!d.is_reported(1));
    }

    #[test]
    fn test_no_reemit_before_min_pause() {
        let mut d = ToneDetector::new(tones(), thresholds(0.09, 0.3));
        // The absence span grows to 0.2 s across both blips, short of 0.3 s.
        let out = run(&mut d, &[ON, OFF, ON, OFF, ON]);
        let total: usize = out.iter().map(|v| v.len()).sum();
        assert_eq!(total, 1);
        assert_eq!(out[0], vec!["a".to_string()]);
        assert!(d.is_reported(0));
    }

    #[test]
    fn test_reemits_after_min_pause() {
        let mut d = ToneDetector::new(tones(), thresholds(0.09, 0.12));
        let out = run(&mut d, &[ON, OFF, OFF, ON, ON]);
        assert_eq!(out[0], vec!["a".to_string()]);
        assert!(out[1].is_empty());
        assert!(out[2].is_empty());
        assert_eq!(out[3], vec!["a".to_string()]);
        assert!(out[4].is_empty());
    }

    #[test]
    fn test_inactive_window_keeps_presence_progress() {
        // Presence before an unreported gap still counts: [0, 0.1] + [0.1, 0.2].
        let mut d = ToneDetector::new(tones(), thresholds(0.14, 0.1));
        let out = run(&mut d, &[ON, OFF, ON]);
        assert!(out[0].is_empty());
        assert!(out[1].is_empty());
        assert_eq!(out[2], vec!["a".to_string()]);
    }

    #[test]
    fn test_amplitude_spread_rejects_tone() {
        let mut d = ToneDetector::new(tones(), thresholds(0.09, 0.1));
        let lopsided = [1.0, 0.6, 0.0];
        let out = run(&mut d, &[lopsided; 10]);
        assert!(out.iter().all(|v| v.is_empty()));
    }

    #[test]
    fn test_simultaneous_tones() {
        let mut d = ToneDetector::new(tones(), thresholds(0.09, 0.1));
        let out = run(&mut d, &[[0.9, 0.8, 0.7]]);
        assert_eq!(out[0], vec!["a".to_string(), "b".to_string()]);

        d.reset();
        assert!(!d.is_reported(0));
        assert!(!d.is_reported(1));
    }

    #[test]
    fn test_frequency_thresholds_must_align() {
        let d = ToneDetector::new(tones(), thresholds(0.09, 0.1));
        let err = d.clone().with_frequency_thresholds(&[0.1, 0.1]).unwrap_err();
        assert!(matches!(
            err,
            ToneDetectError::LengthMismatch { expected: 3, actual: 2, .. }
        ));

        let mut d = d.with_frequency_thresholds(&[0.1, 0.1, 0.9]).unwrap();
        let out = run(&mut d, &[[0.2, 0.2, 0.5]]);
        assert_eq!(out[0], vec!["a".to_string()]);
    }
}
