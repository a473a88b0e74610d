//! Run status owned by the driving loop

use chrono::{DateTime, Duration, Local};
use log::info;

/// Progress of one pipeline run.
///
/// The driver updates it after every chunk and asks it to log a summary;
/// a line is only emitted once `refresh_interval` has elapsed.
#[derive(Debug, Clone)]
pub struct Status {
    pub sequence_count: usize,
    pub last_sequence: Option<String>,
    pub since: DateTime<Local>,
    pub last_update: DateTime<Local>,
    pub bytes_processed: u64,
    refresh_interval: Duration,
    last_report: DateTime<Local>,
}

impl Status {
    pub fn new(refresh_seconds: i64) -> Self {
        let now = Local::now();
        Self {
            sequence_count: 0,
            last_sequence: None,
            since: now,
            last_update: now,
            bytes_processed: 0,
            refresh_interval: Duration::seconds(refresh_seconds.max(0)),
            last_report: now,
        }
    }

    pub fn update_bytes(&mut self, total_bytes: u64) {
        self.bytes_processed = total_bytes;
        self.last_update = Local::now();
    }

    /// Count a detected sequence, keeping only the most recent one.
    pub fn update_sequences(&mut self, sequence: String) {
        self.sequence_count += 1;
        self.last_sequence = Some(sequence);
        self.last_update = Local::now();
    }

    pub fn summary(&self) -> String {
        let now = Local::now();
        format!(
            "Status {} sequences, running since: {}, last updated: {}, bytes processed: {}",
            self.sequence_count,
            pretty_duration(now - self.since, ""),
            pretty_duration(now - self.last_update, " ago"),
            pretty_size(self.bytes_processed)
        )
    }

    /// Log the summary if the refresh interval has passed. Returns whether it did.
    pub fn maybe_report(&mut self) -> bool {
        let now = Local::now();
        if now - self.last_report < self.refresh_interval {
            return false;
        }
        self.last_report = now;
        info!("{}", self.summary());
        true
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Human readable byte count using binary units.
pub fn pretty_size(bytes: u64) -> String {
    let mut num = bytes as f64;
    for unit in ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"] {
        if num.abs() < 1024.0 {
            return format!("{:.1}{}Bytes", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1}ZiBytes", num)
}

/// Human readable elapsed time.
pub fn pretty_duration(elapsed: Duration, suffix: &str) -> String {
    let seconds = elapsed.num_seconds();
    if seconds < 0 {
        return String::new();
    }
    match seconds {
        0..=9 => "just now".to_string(),
        10..=59 => format!("{} seconds{}", seconds, suffix),
        60..=119 => format!("a minute{}", suffix),
        120..=3599 => format!("{:.2} minutes{}", seconds as f64 / 60.0, suffix),
        3600..=7199 => format!("an hour{}", suffix),
        7200..=86399 => format!("{:.2} hours{}", seconds as f64 / 3600.0, suffix),
        _ => format!("{} days{}", elapsed.num_days(), suffix),
    }
}
