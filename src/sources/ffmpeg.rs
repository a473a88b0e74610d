// src/sources/ffmpeg.rs
//
// Decode any input FFmpeg understands (files, network streams) into mono
// 16 bit PCM through a child process.

use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{bail, Context, Result};
use log::{debug, warn};

use super::{PcmReader, SampleSource, DEFAULT_PART_LENGTH};
use crate::normalization::SampleFormat;

pub struct FfmpegSource {
    child: Child,
    reader: PcmReader<ChildStdout>,
    finished: bool,
}

impl FfmpegSource {
    pub fn spawn(source: &str, ffmpeg_binary: &Path, sample_rate: u32) -> Result<Self> {
        Self::spawn_with_part_length(source, ffmpeg_binary, sample_rate, DEFAULT_PART_LENGTH)
    }

    pub fn spawn_with_part_length(
        source: &str,
        ffmpeg_binary: &Path,
        sample_rate: u32,
        part_length: usize,
    ) -> Result<Self> {
        let args = Self::command_args(source, sample_rate);
        debug!("Spawning {} {}", ffmpeg_binary.display(), args.join(" "));

        let mut child = Command::new(ffmpeg_binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to execute FFmpeg at {}", ffmpeg_binary.display()))?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => bail!("FFmpeg stdout was not captured"),
        };

        Ok(Self {
            child,
            reader: PcmReader::new(stdout, SampleFormat::I16, part_length),
            finished: false,
        })
    }

    /// Arguments asking FFmpeg for raw mono s16le at `sample_rate` on stdout.
    pub fn command_args(source: &str, sample_rate: u32) -> Vec<String> {
        vec![
            "-i".to_string(),
            source.to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "s16le".to_string(),
            "-acodec".to_string(),
            "pcm_s16le".to_string(),
            "-ar".to_string(),
            sample_rate.to_string(),
            "-ac".to_string(),
            "1".to_string(),
            "-".to_string(),
        ]
    }
}

impl SampleSource for FfmpegSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<f32>>> {
        if self.finished {
            return Ok(None);
        }

        match self.reader.next_chunk()? {
            Some(chunk) => Ok(Some(chunk)),
            None => {
                self.finished = true;
                let status = self.child.wait().context("Failed to wait for FFmpeg")?;
                if !status.success() {
                    warn!("FFmpeg exited with {}", status);
                }
                Ok(None)
            }
        }
    }

    fn bytes_consumed(&self) -> u64 {
        self.reader.bytes_consumed()
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
