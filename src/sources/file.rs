// src/sources/file.rs
//
// Streaming decode of local audio files with Symphonia.
// Packets are decoded one at a time and mixed down to mono, so memory use
// does not grow with file length.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::SampleSource;

/// Audio file decoded at its native sample rate.
pub struct FileSource {
    path: PathBuf,
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: usize,
    sample_buf: Option<SampleBuffer<f32>>,
    sample_buf_frames: u64,
    bytes_read: u64,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension() {
            hint.with_extension(ext.to_str().unwrap_or(""));
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .context("Failed to probe file format - may be corrupted or unsupported")?;
        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .context("No supported audio track found in file")?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .context("File does not specify sample rate")?;
        let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
        if channels == 0 {
            bail!("File reports 0 audio channels");
        }

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .context("Failed to create decoder for audio codec")?;

        debug!(
            "Opened {}: {} Hz, {} channel(s)",
            path.display(),
            sample_rate,
            channels
        );

        Ok(Self {
            path: path.to_path_buf(),
            format,
            decoder,
            track_id,
            sample_rate,
            channels,
            sample_buf: None,
            sample_buf_frames: 0,
            bytes_read: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}

/// Average interleaved channels into one.
pub fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

impl SampleSource for FileSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<f32>>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(None)
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != self.track_id {
                continue;
            }
            self.bytes_read += packet.buf().len() as u64;

            let decoded = match self.decoder.decode(&packet) {
                Ok(buf) => buf,
                Err(SymphoniaError::DecodeError(msg)) => {
                    debug!("Skipping undecodable packet in {}: {}", self.path.display(), msg);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            let frames = decoded.capacity() as u64;
            if self.sample_buf.is_none() || frames > self.sample_buf_frames {
                self.sample_buf = Some(SampleBuffer::new(frames, spec));
                self.sample_buf_frames = frames;
            }

            if let Some(buf) = self.sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                let channels = spec.channels.count();
                let mono = mix_to_mono(buf.samples(), channels);
                if !mono.is_empty() {
                    return Ok(Some(mono));
                }
            }
        }
    }

    fn bytes_consumed(&self) -> u64 {
        self.bytes_read
    }

    fn sample_rate(&self) -> Option<u32> {
        Some(self.sample_rate)
    }
}
