// src/core/tones.rs
//
// Tone symbols and the frequency sets that define them.

use serde::{Deserialize, Deserializer, Serialize};

use super::dsp::{dedup_frequencies, min_frequency_spacing};
use super::error::{Result, ToneDetectError};

/// Low frequency group (rows of the DTMF keypad).
pub const DTMF_LOW_FREQS: [f64; 4] = [697.0, 770.0, 852.0, 941.0];
/// High frequency group (columns of the DTMF keypad).
pub const DTMF_HIGH_FREQS: [f64; 4] = [1209.0, 1336.0, 1477.0, 1633.0];

const DTMF_GRID: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// A symbol that is present when all of its frequencies are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    #[serde(alias = "f")]
    pub frequencies: Vec<f64>,
    #[serde(alias = "sym", deserialize_with = "symbol_from_any")]
    pub symbol: String,
}

impl Tone {
    pub fn new(frequencies: &[f64], symbol: impl Into<String>) -> Self {
        Self {
            frequencies: frequencies.to_vec(),
            symbol: symbol.into(),
        }
    }
}

/// Accept both `"sym": "4"` and `"sym": 4` in tone files.
fn symbol_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSymbol {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawSymbol::deserialize(deserializer)? {
        RawSymbol::Text(s) => s,
        RawSymbol::Integer(i) => i.to_string(),
        RawSymbol::Float(f) => f.to_string(),
    })
}

/// Ordered collection of tones.
///
/// Frequencies are deduplicated across all tones into one list; every tone
/// refers to its frequencies by index into that list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToneSet {
    tones: Vec<Tone>,
    frequencies: Vec<f64>,
    indices: Vec<Vec<usize>>,
}

impl ToneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tones(tones: Vec<Tone>) -> Result<Self> {
        let mut set = Self::new();
        for tone in tones {
            set.push(tone)?;
        }
        Ok(set)
    }

    /// Add a tone. Without a symbol, the tone's position is used.
    pub fn add_tone(&mut self, frequencies: &[f64], symbol: Option<&str>) -> Result<()> {
        let symbol = symbol
            .map(str::to_string)
            .unwrap_or_else(|| self.tones.len().to_string());
        self.push(Tone::new(frequencies, symbol))
    }

    fn push(&mut self, tone: Tone) -> Result<()> {
        if tone.frequencies.is_empty() {
            return Err(ToneDetectError::EmptyTone {
                symbol: tone.symbol,
            });
        }
        self.insert(tone);
        Ok(())
    }

    /// Register `tone`, which must have at least one frequency.
    fn insert(&mut self, tone: Tone) {
        let ids = dedup_frequencies(&tone.frequencies)
            .into_iter()
            .map(|f| match self.frequency_index(f) {
                Some(id) => id,
                None => {
                    self.frequencies.push(f);
                    self.frequencies.len() - 1
                }
            })
            .collect();

        self.indices.push(ids);
        self.tones.push(tone);
    }

    /// The standard 16 symbol DTMF keypad.
    pub fn dtmf() -> Self {
        let mut set = Self::new();
        for (row, &low) in DTMF_LOW_FREQS.iter().enumerate() {
            for (col, &high) in DTMF_HIGH_FREQS.iter().enumerate() {
                set.insert(Tone::new(&[low, high], DTMF_GRID[row][col].to_string()));
            }
        }
        set
    }

    /// Parse a JSON array of `{ "frequencies": [...], "symbol": ... }` records.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let tones: Vec<Tone> = serde_json::from_str(json)?;
        Ok(Self::from_tones(tones)?)
    }

    pub fn to_json_string(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.tones)?)
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// All distinct frequencies across all tones.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Indices into [`ToneSet::frequencies`] required by the tone at `tone`.
    pub fn frequency_ids(&self, tone: usize) -> &[usize] {
        &self.indices[tone]
    }

    pub fn frequency_index(&self, frequency: f64) -> Option<usize> {
        self.frequencies.iter().position(|&f| f == frequency)
    }

    pub fn symbol(&self, tone: usize) -> &str {
        &self.tones[tone].symbol
    }

    /// Find the tone for a symbol.
    pub fn find(&self, symbol: &str) -> Option<&Tone> {
        self.tones.iter().find(|t| t.symbol == symbol)
    }

    /// Smallest distance between two distinct configured frequencies.
    pub fn min_frequency_spacing(&self) -> Option<f64> {
        min_frequency_spacing(&self.frequencies)
    }
}
