// src/core/sequence.rs
//
// Groups reported tones into sequences separated by silence.

use log::debug;

use super::timespan::Timespan;
use super::window::Window;

/// A completed run of symbols and the stream interval it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSequence {
    pub symbols: Vec<String>,
    pub span: Timespan,
}

/// Accumulates reported tones until a long enough gap closes the sequence.
///
/// A pending sequence is only flushed when a later window starts more than
/// `max_tone_interval` seconds after the last tone, so finite streams need
/// trailing silence to release their final sequence.
#[derive(Debug, Clone)]
pub struct ToneSequenceDetector {
    max_tone_interval: f64,
    min_sequence_length: usize,
    symbols: Vec<String>,
    span: Timespan,
}

impl ToneSequenceDetector {
    pub fn new(max_tone_interval: f64, min_sequence_length: usize) -> Self {
        Self {
            max_tone_interval,
            min_sequence_length,
            symbols: Vec::new(),
            span: Timespan::empty(),
        }
    }

    pub fn max_tone_interval(&self) -> f64 {
        self.max_tone_interval
    }

    pub fn min_sequence_length(&self) -> usize {
        self.min_sequence_length
    }

    /// Symbols collected since the last flush.
    pub fn pending(&self) -> &[String] {
        &self.symbols
    }

    pub fn update(&mut self, window: &Window, new_tones: &[String]) -> Option<ToneSequence> {
        let range = window.temporal_range();
        let mut flushed = None;

        // An empty accumulator has nothing to close.
        if let (Some(last), Some(start)) = (self.span.end(), range.start()) {
            if start - last > self.max_tone_interval {
                if self.symbols.len() >= self.min_sequence_length {
                    debug!(
                        "Sequence of {} symbols closed at {:.2}s",
                        self.symbols.len(),
                        start
                    );
                    flushed = Some(ToneSequence {
                        symbols: std::mem::take(&mut self.symbols),
                        span: self.span,
                    });
                } else if !self.symbols.is_empty() {
                    debug!("Dropping short sequence {:?}", self.symbols);
                }
                self.symbols.clear();
                self.span.reset();
            }
        }

        if !new_tones.is_empty() {
            self.span.union(&range);
            self.symbols.extend_from_slice(new_tones);
        }

        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dsp::WindowType;

    /// Windows are 0.1 s long and 0.05 s apart; `tones[i]` is reported in window `i`.
    fn run(detector: &mut ToneSequenceDetector, tones: &[Vec<&str>]) -> Vec<(usize, ToneSequence)> {
        let mut wnd = Window::new(10, 100.0, 0, WindowType::Rectangle).unwrap();
        let samples = vec![0.0f32; 10 + 5 * (tones.len() - 1)];
        let mut out = Vec::new();
        let mut i = 0;
        wnd.update(&samples, |w| {
            let new: Vec<String> = tones[i].iter().map(|s| s.to_string()).collect();
            if let Some(seq) = detector.update(w, &new) {
                out.push((i, seq));
            }
            i += 1;
        });
        out
    }

    fn silence(n: usize) -> Vec<Vec<&'static str>> {
        vec![Vec::new(); n]
    }

    #[test]
    fn test_flushes_after_gap() {
        let mut d = ToneSequenceDetector::new(0.33, 2);
        let mut frames = vec![vec!["1"], vec![], vec!["2"]];
        frames.extend(silence(10));

        let out = run(&mut d, &frames);
        assert_eq!(out.len(), 1);
        let (at, seq) = &out[0];
        assert_eq!(seq.symbols, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(seq.span.start(), Some(0.0));
        assert!((seq.span.end().unwrap() - 0.2).abs() < 1e-9);
        // First window starting more than 0.33 s after 0.2 s begins at 0.55 s.
        assert_eq!(*at, 11);
        assert!(d.pending().is_empty());
    }

    #[test]
    fn test_short_sequence_discarded() {
        let mut d = ToneSequenceDetector::new(0.33, 2);
        let mut frames = vec![vec!["1"]];
        frames.extend(silence(12));
        frames.push(vec!["2"]);
        frames.push(vec!["3"]);
        frames.extend(silence(12));

        let out = run(&mut d, &frames);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1.symbols, vec!["2".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_pending_without_gap() {
        let mut d = ToneSequenceDetector::new(1.0, 1);
        let out = run(&mut d, &[vec!["1"], vec![], vec!["2"], vec![]]);
        assert!(out.is_empty());
        assert_eq!(d.pending(), &["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_multiple_symbols_in_one_window() {
        let mut d = ToneSequenceDetector::new(0.2, 2);
        let mut frames = vec![vec!["a", "b"]];
        frames.extend(silence(8));

        let out = run(&mut d, &frames);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1.symbols, vec!["a".to_string(), "b".to_string()]);
    }
}
