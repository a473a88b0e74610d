//! Output formatting for detected sequences

use colorful::Colorful;
use serde::Serialize;

use crate::detection::SequenceEvent;

/// One JSON line per sequence.
#[derive(Debug, Serialize)]
struct JsonEvent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    id: usize,
    sequence: String,
    symbols: &'a [String],
    start: f64,
    end: f64,
}

/// Format an event for terminal output.
pub fn format_event(event: &SequenceEvent, source: Option<&str>) -> String {
    let prefix = match source {
        Some(source) => format!("{} ", source.cyan()),
        None => String::new(),
    };
    format!(
        "{}{} {} {}",
        prefix,
        format!("#{}", event.label()).dark_gray(),
        event.symbols_string().green().bold(),
        format!("[{:.2}s - {:.2}s]", event.start, event.end).dark_gray()
    )
}

/// Format an event as a single line of JSON.
pub fn format_json(event: &SequenceEvent, source: Option<&str>) -> anyhow::Result<String> {
    let json = JsonEvent {
        source,
        id: event.id,
        sequence: event.symbols_string(),
        symbols: &event.symbols,
        start: event.start,
        end: event.end,
    };
    Ok(serde_json::to_string(&json)?)
}

pub fn print_event(event: &SequenceEvent, source: Option<&str>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", format_json(event, source)?);
    } else {
        println!("{}", format_event(event, source));
    }
    Ok(())
}

/// Summary after a batch of files.
pub fn format_summary(results: &[(String, usize)]) -> String {
    let total: usize = results.iter().map(|(_, n)| n).sum();
    let with_sequences = results.iter().filter(|(_, n)| *n > 0).count();
    format!(
        "\n{}\n  {} files analysed\n  {} sequences in {} files",
        "Summary:".bold(),
        results.len(),
        total,
        with_sequences
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> SequenceEvent {
        SequenceEvent {
            id: 3,
            symbols: vec!["0".to_string(), "6".to_string(), "#".to_string()],
            start: 1.25,
            end: 2.5,
        }
    }

    #[test]
    fn test_format_event() {
        let line = format_event(&event(), Some("call.wav"));
        assert!(line.contains("call.wav"));
        assert!(line.contains("#003"));
        assert!(line.contains("06#"));
        assert!(line.contains("[1.25s - 2.50s]"));
    }

    #[test]
    fn test_format_json() {
        let line = format_json(&event(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["sequence"], "06#");
        assert_eq!(value["symbols"][2], "#");
        assert_eq!(value["start"], 1.25);
        assert!(value.get("source").is_none());
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(&[("a.wav".into(), 2), ("b.wav".into(), 0)]);
        assert!(summary.contains("2 files analysed"));
        assert!(summary.contains("2 sequences in 1 files"));
    }
}
