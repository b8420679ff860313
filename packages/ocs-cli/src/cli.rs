//! Command line arguments backing the `ocs` binary.
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "ocs",
  about = "Replay recorded OCR observations and print word-level results",
  version
)]
pub struct Args {
  /// Log pipeline progress to stderr
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// Run a recorded frame through word segmentation and normalization
  Recognize {
    /// JSON recording of engine observations
    recording: PathBuf,

    /// OCR languages, e.g. 'en-US+ru-RU+de-DE', or just 'en-US'
    #[arg(long, short = 'l', default_value = "en-US")]
    languages: String,

    /// How to output the recognized text
    #[arg(long, short = 'o', value_enum, default_value_t = OutputType::Raw)]
    output_type: OutputType,

    /// Frame number echoed in the output
    #[arg(long, default_value_t = 0)]
    frame: u32,

    /// Image width in pixels (defaults to the recorded width)
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels (defaults to the recorded height)
    #[arg(long)]
    height: Option<u32>,
  },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
  /// One `text,left,top,right,bottom,confidence` line per word
  Raw,
  /// A single JSON document
  Json,
}
