//! Digital Signal Processing utilities

pub mod windows;

pub use windows::{create_window, WindowType, WindowingFunction};

/// Remove repeated frequencies, keeping first occurrences in order.
pub fn dedup_frequencies(frequencies: &[f64]) -> Vec<f64> {
    let mut unique: Vec<f64> = Vec::with_capacity(frequencies.len());
    for &f in frequencies {
        if !unique.contains(&f) {
            unique.push(f);
        }
    }
    unique
}

/// Smallest distance between any two distinct frequencies.
///
/// Returns `None` when fewer than two distinct frequencies are given.
pub fn min_frequency_spacing(frequencies: &[f64]) -> Option<f64> {
    let mut sorted = dedup_frequencies(frequencies);
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |m| m.min(d))))
}
