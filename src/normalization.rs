// src/normalization.rs
//
// Conversion of raw PCM data to floating point samples in [-1, 1].

use serde::{Deserialize, Serialize};

/// Integral sample types with a fixed bit depth.
pub trait PcmSample: Copy {
    const BITS: u32;
    const SIGNED: bool;

    fn to_f64(self) -> f64;
}

macro_rules! impl_pcm_sample {
    ($t:ty, $bits:expr, $signed:expr) => {
        impl PcmSample for $t {
            const BITS: u32 = $bits;
            const SIGNED: bool = $signed;

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_pcm_sample!(u8, 8, false);
impl_pcm_sample!(i8, 8, true);
impl_pcm_sample!(u16, 16, false);
impl_pcm_sample!(i16, 16, true);
impl_pcm_sample!(i32, 32, true);

/// Map integral samples onto [-1, 1] using the full range of their type.
///
/// Unsigned data is centered first, so `0` maps to `-1` for `u8`.
pub fn normalize_by_bit_depth<T: PcmSample>(data: &[T]) -> Vec<f32> {
    let absolute_max = 2f64.powi(T::BITS as i32 - 1);
    let offset = if T::SIGNED { 0.0 } else { absolute_max };
    data.iter()
        .map(|&s| ((s.to_f64() - offset) / absolute_max) as f32)
        .collect()
}

/// Signed 16 bit PCM, the format produced by the ffmpeg source.
pub fn normalize_pcm16(data: &[i16]) -> Vec<f32> {
    normalize_by_bit_depth(data)
}

/// Stretch arbitrary values so that their minimum maps to -1 and maximum to 1.
///
/// Constant input maps to silence.
pub fn normalize_by_value_range(data: &[f64]) -> Vec<f32> {
    let (min, max) = data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if !(range > 0.0) {
        return vec![0.0; data.len()];
    }
    data.iter()
        .map(|&v| ((v - min) / range * 2.0 - 1.0) as f32)
        .collect()
}

/// Binary layout of raw little endian sample streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    U8,
    #[default]
    I16,
    I32,
    F32,
}

impl SampleFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "u8" | "uint8" => Some(Self::U8),
            "i16" | "int16" | "s16le" => Some(Self::I16),
            "i32" | "int32" | "s32le" => Some(Self::I32),
            "f32" | "float32" | "f32le" => Some(Self::F32),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleFormat::U8 => "u8",
            SampleFormat::I16 => "i16",
            SampleFormat::I32 => "i32",
            SampleFormat::F32 => "f32",
        }
    }

    /// Bytes per sample.
    pub fn width(&self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::I16 => 2,
            SampleFormat::I32 | SampleFormat::F32 => 4,
        }
    }

    /// Decode whole samples from `bytes`; a trailing partial sample is ignored.
    pub fn decode(&self, bytes: &[u8]) -> Vec<f32> {
        let width = self.width();
        let whole = &bytes[..bytes.len() - bytes.len() % width];
        match self {
            SampleFormat::U8 => normalize_by_bit_depth(whole),
            SampleFormat::I16 => {
                let raw: Vec<i16> = whole
                    .chunks_exact(2)
                    .map(|b| i16::from_le_bytes([b[0], b[1]]))
                    .collect();
                normalize_pcm16(&raw)
            }
            SampleFormat::I32 => {
                let raw: Vec<i32> = whole
                    .chunks_exact(4)
                    .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .collect();
                normalize_by_bit_depth(&raw)
            }
            SampleFormat::F32 => whole
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]).clamp(-1.0, 1.0))
                .collect(),
        }
    }
}

impl std::fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f32], expected: &[f32], tol: f32) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= tol, "{} vs {}", a, e);
        }
    }

    #[test]
    fn test_bit_depth_normalization() {
        assert_close(&normalize_by_bit_depth(&[0u8, 255]), &[-1.0, 1.0], 0.01);
        assert_close(&normalize_by_bit_depth(&[-128i8, 0, 127]), &[-1.0, 0.0, 1.0], 0.01);
        assert_close(&normalize_pcm16(&[i16::MIN, 0, 16384]), &[-1.0, 0.0, 0.5], 1e-6);
    }

    #[test]
    fn test_value_range_normalization() {
        assert_close(&normalize_by_value_range(&[0.0, 1000.0]), &[-1.0, 1.0], 1e-6);
        assert_close(&normalize_by_value_range(&[2.0, 3.0, 4.0]), &[-1.0, 0.0, 1.0], 1e-6);
        assert_close(&normalize_by_value_range(&[5.0, 5.0]), &[0.0, 0.0], 0.0);
    }

    #[test]
    fn test_decode_formats() {
        let bytes = [0x00, 0x40, 0x00, 0xC0, 0x7F];
        assert_close(&SampleFormat::I16.decode(&bytes), &[0.5, -0.5], 1e-6);

        let bytes = 0.25f32.to_le_bytes();
        assert_close(&SampleFormat::F32.decode(&bytes), &[0.25], 0.0);

        assert_close(&SampleFormat::U8.decode(&[128]), &[0.0], 0.0);
        assert_eq!(SampleFormat::from_name("int16"), Some(SampleFormat::I16));
        assert_eq!(SampleFormat::from_name("f64"), None);
    }
}
