//! Rendering of recognized entries for stdout.

use ocs_bridge::RecognitionEntry;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Position {
  left: u32,
  top: u32,
  right: u32,
  bottom: u32,
}

#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
  text: &'a str,
  position: Position,
  confidence: f32,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
  file: &'a str,
  frame: u32,
  entries: Vec<JsonEntry<'a>>,
}

/// Cuts `value` down to `places` decimals without rounding up.
pub fn truncate_to(value: f32, places: i32) -> f32 {
  let multiplier = 10f32.powi(places);
  (value * multiplier).floor() / multiplier
}

pub fn raw_line(entry: &RecognitionEntry) -> String {
  format!(
    "{},{},{},{},{},{:.2}",
    entry.text, entry.left, entry.top, entry.right, entry.bottom, entry.confidence
  )
}

pub fn render_raw(entries: &[RecognitionEntry]) -> String {
  entries.iter().map(|e| raw_line(e) + "\n").collect()
}

pub fn render_json(
  file: &str,
  frame: u32,
  entries: &[RecognitionEntry],
) -> serde_json::Result<String> {
  let report = JsonReport {
    file,
    frame,
    entries: entries
      .iter()
      .map(|e| JsonEntry {
        text: &e.text,
        position: Position {
          left: e.left,
          top: e.top,
          right: e.right,
          bottom: e.bottom,
        },
        confidence: truncate_to(e.confidence, 2),
      })
      .collect(),
  };
  serde_json::to_string(&report)
}
