//! Trip log report
//!
//! Renders the trip log for the administrator, as plain text or JSON.

use crate::config::LogFormat;
use anyhow::{Context, Result};
use std::fmt::Write;
use train_advisory::TripLog;

pub fn render_log(log: &TripLog, format: LogFormat) -> Result<String> {
    match format {
        LogFormat::Txt => Ok(render_txt(log)),
        LogFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(log).context("Failed to serialize trip log")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn render_txt(log: &TripLog) -> String {
    let mut out = String::new();

    if log.is_empty() {
        out.push_str("Trip log is empty.\n");
        return out;
    }

    // Writing to a String cannot fail
    let _ = writeln!(out, "Trip log: {} entries", log.len());
    for entry in log.iter() {
        let _ = writeln!(out, "\n[{}]", entry.timestamp().format("%Y-%m-%d %H:%M:%S%.3f UTC"));
        for line in entry.lines() {
            let _ = writeln!(out, "  {}", line);
        }
    }

    out
}
