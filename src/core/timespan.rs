// src/core/timespan.rs
//
// Start/end accumulator in stream-relative seconds.

use serde::{Deserialize, Serialize};

/// A time span represented by two time points.
///
/// A span is either empty or covers `[start, end]`. Emptiness is tracked
/// explicitly, so a zero-length span sitting at the very beginning of the
/// stream is still a real span.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timespan {
    bounds: Option<(f64, f64)>,
}

impl Timespan {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            bounds: Some((start.min(end), start.max(end))),
        }
    }

    pub fn empty() -> Self {
        Self { bounds: None }
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn reset(&mut self) {
        self.bounds = None;
    }

    /// Extend this span so it also covers `other`.
    pub fn union(&mut self, other: &Timespan) {
        self.bounds = match (self.bounds, other.bounds) {
            (None, b) => b,
            (a, None) => a,
            (Some((s0, e0)), Some((s1, e1))) => Some((s0.min(s1), e0.max(e1))),
        };
    }

    pub fn start(&self) -> Option<f64> {
        self.bounds.map(|(s, _)| s)
    }

    pub fn end(&self) -> Option<f64> {
        self.bounds.map(|(_, e)| e)
    }

    /// Length in seconds, zero when empty.
    pub fn duration(&self) -> f64 {
        self.bounds.map_or(0.0, |(s, e)| e - s)
    }

    pub fn center(&self) -> Option<f64> {
        self.bounds.map(|(s, e)| (s + e) * 0.5)
    }
}

impl std::fmt::Display for Timespan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.bounds {
            Some((s, e)) => write!(f, "{:.2}s-{:.2}s", s, e),
            None => write!(f, "(empty)"),
        }
    }
}
