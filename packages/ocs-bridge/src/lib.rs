//! # ocs-bridge
//!
//! Normalizes sentence-level text observations from an OCR engine into
//! word-level entries in image pixel space, and hands them across a C ABI
//! with caller-managed ownership.
//!
//! - **Geometry**: engine boxes are clamped into the unit square and flipped
//!   from a bottom-left origin to top-left pixel coordinates
//! - **Segmentation**: sentences are split into locale-aware words and
//!   words shorter than three characters are dropped
//! - **Marshaling**: results become parallel C arrays delivered through a
//!   single completion callback and released with `ocs_free_ocr_results`
//!
//! ## Quick Start
//!
//! ```ignore
//! use ocs_bridge::prelude::*;
//!
//! let engine = ReplayEngine::from_json(&std::fs::read_to_string("frame.json")?)?;
//! let image = ImageView::new(&pixels, width, height, width * 3)?;
//! let request = Request::new(0, "en-US".parse()?, image);
//!
//! match Recognizer::new(engine).recognize(&request) {
//!     Recognition::Success(entries) => {
//!         for e in entries {
//!             println!("{} [{},{} {},{}] {:.2}", e.text, e.left, e.top, e.right, e.bottom, e.confidence);
//!         }
//!     }
//!     Recognition::Empty => println!("no text"),
//!     Recognition::Failure(message) => eprintln!("OCR error: {message}"),
//! }
//! ```

pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod ffi;
pub mod geometry;
pub mod image;
pub mod language;
pub mod marshal;
pub mod processor;
pub mod recognizer;
pub mod replay;
pub mod segment;

pub use config::{RecognitionLevel, RecognitionOptions};
pub use engine::{Observation, RecognitionEngine, Request, TextCandidate};
pub use entry::RecognitionEntry;
pub use error::OcrError;
pub use ffi::{dispatch, install_engine, ocs_do_ocr, ocs_free_ocr_results, CompletionCallback};
pub use geometry::{NormalizedRect, PixelBox};
pub use image::ImageView;
pub use language::LanguageList;
pub use marshal::{MarshaledResult, RawResult};
pub use processor::ObservationProcessor;
pub use recognizer::{Recognition, Recognizer};
pub use replay::{RecordedCandidate, RecordedObservation, Recording, ReplayEngine};
pub use segment::{LocaleWords, WordBoundaries};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ImageView, LanguageList, NormalizedRect, ObservationProcessor, OcrError, PixelBox,
        Recognition, RecognitionEngine, RecognitionEntry, Recognizer, ReplayEngine, Request,
    };
}
