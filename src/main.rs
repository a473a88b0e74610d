// src/main.rs
use anyhow::{bail, Context, Result};
use clap::Parser;
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{error, info, LevelFilter};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use tonedetect::cli::{self, Cli, Commands, DetectionArgs};
use tonedetect::core::DetectionPipeline;
use tonedetect::detection::{CaptureBuffer, SequenceEvent, Status};
use tonedetect::generators::generate_tone_sequence;
use tonedetect::sources::{FfmpegSource, FileSource, SampleSource, StdinSource};

const AUDIO_EXTENSIONS: [&str; 7] = ["flac", "wav", "mp3", "ogg", "m4a", "aac", "aiff"];

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Ffmpeg {
            source,
            ffmpeg,
            detection,
        } => {
            let mut input = FfmpegSource::spawn(&source, &ffmpeg, detection.sample_rate)?;
            detect_stream(&mut input, &detection, None)?;
        }
        Commands::Stdin {
            source_type,
            detection,
        } => {
            let format = cli::parse_sample_format(&source_type)?;
            let mut input = StdinSource::new(format);
            detect_stream(&mut input, &detection, None)?;
        }
        Commands::File { paths, detection } => detect_files(&paths, &detection)?,
        Commands::Generate {
            symbols,
            output,
            tones,
            sample_rate,
            tone_length,
            gap_length,
            amplitude,
        } => generate(
            &symbols,
            &output,
            tones.as_deref(),
            sample_rate,
            tone_length,
            gap_length,
            amplitude,
        )?,
        Commands::Presets => cli::print_presets(),
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.format_timestamp_millis().init();
}

/// Run the pipeline over one source and print every sequence. Returns the count.
fn detect_stream(
    source: &mut dyn SampleSource,
    args: &DetectionArgs,
    label: Option<&str>,
) -> Result<usize> {
    let sample_rate = source.sample_rate().unwrap_or(args.sample_rate);
    let config = args.pipeline_config()?;
    let mut pipeline = DetectionPipeline::new(sample_rate as f64, args.tone_set()?, &config)?;

    let mut capture = if args.capture_audio {
        CaptureBuffer::new(&args.capture_audio_dir, args.capture_audio_length, sample_rate)
    } else {
        CaptureBuffer::disabled()
    };
    let mut status = Status::new(args.status_interval);

    let mut count = 0;
    pipeline.run(source, &mut status, &mut capture, |event: &SequenceEvent| {
        count += 1;
        cli::print_event(event, label, args.json)
    })?;
    Ok(count)
}

fn detect_files(paths: &[PathBuf], args: &DetectionArgs) -> Result<()> {
    let mut files = Vec::new();
    for path in paths {
        files.extend(collect_audio_files(path)?);
    }

    if files.is_empty() {
        println!("{}", "No audio files found!".red());
        return Ok(());
    }
    info!("Found {} audio file(s)", files.len());

    if files.len() == 1 {
        let mut source = FileSource::open(&files[0])?;
        detect_stream(&mut source, args, None)?;
        return Ok(());
    }

    // Captures are named by sequence id, which restarts per file.
    if args.capture_audio {
        bail!("--capture-audio supports a single input file only");
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {wide_msg}")
            .context("Invalid progress template")?,
    );

    let results: Vec<(String, usize)> = files
        .par_iter()
        .progress_with(bar.clone())
        .map(|path| {
            let label = path.display().to_string();
            let count = FileSource::open(path)
                .and_then(|mut source| detect_stream(&mut source, args, Some(&label)))
                .unwrap_or_else(|e| {
                    error!("{}: {:#}", label, e);
                    0
                });
            (label, count)
        })
        .collect();
    bar.finish_and_clear();

    println!("{}", cli::format_summary(&results));
    Ok(())
}

fn collect_audio_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        for entry in WalkDir::new(path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if let Some(ext) = path.extension() {
                if AUDIO_EXTENSIONS.contains(&ext.to_str().unwrap_or("").to_lowercase().as_str()) {
                    files.push(path.to_path_buf());
                }
            }
        }
    } else {
        bail!("No such file or directory: {}", path.display());
    }

    Ok(files)
}

fn generate(
    symbols: &str,
    output: &Path,
    tones: Option<&Path>,
    sample_rate: u32,
    tone_length: f64,
    gap_length: f64,
    amplitude: f64,
) -> Result<()> {
    let tones = cli::load_tones(tones)?;
    let symbols: Vec<String> = symbols.chars().map(String::from).collect();
    let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
    for symbol in &symbols {
        if tones.find(symbol).is_none() {
            bail!("Symbol '{}' is not part of the tone set", symbol);
        }
    }

    let sr = sample_rate as f64;
    let mut samples = tonedetect::generators::silence(sr, gap_length);
    samples.extend(generate_tone_sequence(
        &tones,
        &symbols,
        sr,
        tone_length,
        gap_length,
        amplitude,
    )?);
    samples.extend(tonedetect::generators::silence(sr, gap_length));

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(output, spec)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for sample in &samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;

    println!(
        "Wrote {} ({:.2}s) to {}",
        symbols.concat().green(),
        samples.len() as f64 / sr,
        output.display().to_string().cyan()
    );
    Ok(())
}
