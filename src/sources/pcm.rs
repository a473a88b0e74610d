// src/sources/pcm.rs
//
// Raw PCM byte streams: standard input and anything else implementing Read.

use std::io::{ErrorKind, Read, Stdin};

use anyhow::{Context, Result};

use super::{SampleSource, DEFAULT_PART_LENGTH};
use crate::normalization::SampleFormat;

/// Reads raw little endian PCM in parts and normalizes it.
///
/// Bytes belonging to a sample split across two reads are carried over.
pub struct PcmReader<R: Read> {
    reader: R,
    format: SampleFormat,
    buffer: Vec<u8>,
    carry: Vec<u8>,
    bytes_read: u64,
}

impl<R: Read> PcmReader<R> {
    pub fn new(reader: R, format: SampleFormat, part_length: usize) -> Self {
        Self {
            reader,
            format,
            buffer: vec![0; part_length.max(format.width())],
            carry: Vec::with_capacity(format.width()),
            bytes_read: 0,
        }
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R: Read> SampleSource for PcmReader<R> {
    fn next_chunk(&mut self) -> Result<Option<Vec<f32>>> {
        loop {
            let n = match self.reader.read(&mut self.buffer) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("Failed to read PCM data"),
            };
            if n == 0 {
                return Ok(None);
            }
            self.bytes_read += n as u64;

            self.carry.extend_from_slice(&self.buffer[..n]);
            let whole = self.carry.len() - self.carry.len() % self.format.width();
            if whole == 0 {
                continue;
            }

            let samples = self.format.decode(&self.carry[..whole]);
            self.carry.drain(..whole);
            return Ok(Some(samples));
        }
    }

    fn bytes_consumed(&self) -> u64 {
        self.bytes_read
    }
}

/// Raw PCM piped into standard input.
pub struct StdinSource {
    inner: PcmReader<Stdin>,
}

impl StdinSource {
    pub fn new(format: SampleFormat) -> Self {
        Self {
            inner: PcmReader::new(std::io::stdin(), format, DEFAULT_PART_LENGTH),
        }
    }
}

impl SampleSource for StdinSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<f32>>> {
        self.inner.next_chunk()
    }

    fn bytes_consumed(&self) -> u64 {
        self.inner.bytes_consumed()
    }
}
