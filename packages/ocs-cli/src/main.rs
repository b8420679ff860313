mod cli;
mod output;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Args, Commands, OutputType};
use ocs_bridge::{ImageView, LanguageList, OcrError, Recognition, Recognizer, ReplayEngine, Request};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

/// Largest blank canvas built for a replay, per side.
const MAX_CANVAS_SIDE: u32 = 16_384;

/// Replays one recorded frame. The recording carries the observations, so a
/// blank canvas of the requested size stands in for the pixels.
fn recognize_frame(
  engine: ReplayEngine,
  frame: u32,
  languages: &str,
  width: u32,
  height: u32,
) -> Result<Recognition, OcrError> {
  let languages = LanguageList::parse(languages)?;
  if width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
    return Err(OcrError::InvalidImage(format!(
      "{width}x{height} exceeds {MAX_CANVAS_SIDE} pixels per side"
    )));
  }
  let bytes_per_line = width
    .checked_mul(3)
    .ok_or_else(|| OcrError::InvalidImage(format!("width {width} is too large")))?;
  let pixels = vec![0u8; bytes_per_line as usize * height as usize];
  let image = ImageView::new(&pixels, width, height, bytes_per_line)?;
  let request = Request::new(frame, languages, image);
  Ok(Recognizer::new(engine).recognize(&request))
}

async fn run(args: Args) -> Result<()> {
  match args.command {
    Commands::Version => {
      println!("ocs {}", env!("CARGO_PKG_VERSION"));
      Ok(())
    }
    Commands::Recognize {
      recording,
      languages,
      output_type,
      frame,
      width,
      height,
    } => {
      let json = tokio::fs::read_to_string(&recording)
        .await
        .with_context(|| format!("Failed to read recording {}", recording.display()))?;
      let engine = ReplayEngine::from_json(&json)
        .with_context(|| format!("Failed to parse recording {}", recording.display()))?;

      let width = width.unwrap_or(engine.recording().width);
      let height = height.unwrap_or(engine.recording().height);
      debug!(frame, width, height, %languages, "replaying {}", recording.display());

      let outcome = tokio::task::spawn_blocking(move || {
        recognize_frame(engine, frame, &languages, width, height)
      })
      .await
      .context("Recognition task failed")??;

      let entries = match outcome {
        Recognition::Failure(message) => bail!("OCR failed: {message}"),
        Recognition::Empty => Vec::new(),
        Recognition::Success(entries) => entries,
      };

      match output_type {
        OutputType::Raw => print!("{}", output::render_raw(&entries)),
        OutputType::Json => {
          let file = recording.to_string_lossy();
          println!("{}", output::render_json(&file, frame, &entries)?);
        }
      }
      Ok(())
    }
  }
}

#[tokio::main]
async fn main() {
  let args = Args::parse();
  init_tracing(args.verbose);

  if let Err(e) = run(args).await {
    eprintln!("Error: {:#}", e);
    std::process::exit(1);
  }
}
