//! Window function implementations

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    #[default]
    Rectangle,
    Hanning,
}

impl WindowType {
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Rectangle => "rectangle",
            WindowType::Hanning => "hanning",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "rectangle" | "rect" | "none" => Some(Self::Rectangle),
            "hanning" | "hann" => Some(Self::Hanning),
            _ => None,
        }
    }
}

impl std::fmt::Display for WindowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Create window coefficients of the given size.
///
/// Hanning is the symmetric variant, `0.5 - 0.5 cos(2 pi i / (n - 1))`.
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f32> {
    match window_type {
        WindowType::Rectangle => vec![1.0; size],
        WindowType::Hanning => {
            if size == 1 {
                return vec![1.0];
            }
            let denom = (size - 1) as f64;
            (0..size)
                .map(|i| (0.5 - 0.5 * (2.0 * PI * i as f64 / denom).cos()) as f32)
                .collect()
        }
    }
}

/// Window coefficients for the data region of an analysis window, together
/// with the factor that undoes the amplitude attenuation they introduce.
#[derive(Debug, Clone)]
pub struct WindowingFunction {
    window_type: WindowType,
    values: Vec<f32>,
    normalizer: f32,
}

impl WindowingFunction {
    pub fn new(size: usize, window_type: WindowType) -> Self {
        let values = create_window(size, window_type);
        let sum: f64 = values.iter().map(|&v| v as f64).sum();
        let normalizer = if sum > 0.0 {
            (size as f64 / sum) as f32
        } else {
            1.0
        };
        Self {
            window_type,
            values,
            normalizer,
        }
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Reciprocal of the average coefficient.
    pub fn normalizer(&self) -> f32 {
        self.normalizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hanning_window() {
        let window = create_window(5, WindowType::Hanning);
        assert!(window[0].abs() < 1e-6);
        assert!((window[2] - 1.0).abs() < 1e-6);
        assert!(window[4].abs() < 1e-6);
    }

    #[test]
    fn test_normalizer() {
        let rect = WindowingFunction::new(64, WindowType::Rectangle);
        assert_eq!(rect.normalizer(), 1.0);

        // Average of a long symmetric Hann tends to one half.
        let hann = WindowingFunction::new(4096, WindowType::Hanning);
        assert!((hann.normalizer() - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_window_type_names() {
        assert_eq!(WindowType::from_name("Hann"), Some(WindowType::Hanning));
        assert_eq!(WindowType::from_name("rectangle"), Some(WindowType::Rectangle));
        assert_eq!(WindowType::from_name("blackman"), None);
    }
}
