use tracing::{debug, warn};

use crate::engine::{RecognitionEngine, Request};
use crate::entry::RecognitionEntry;
use crate::error::OcrError;
use crate::processor::ObservationProcessor;
use crate::segment::{LocaleWords, WordBoundaries};

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    Success(Vec<RecognitionEntry>),
    /// Nothing readable in the frame. Not an error.
    Empty,
    Failure(String),
}

impl Recognition {
    pub fn entries(&self) -> &[RecognitionEntry] {
        match self {
            Recognition::Success(entries) => entries,
            Recognition::Empty | Recognition::Failure(_) => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Recognition::Failure(_))
    }
}

impl From<Result<Vec<RecognitionEntry>, OcrError>> for Recognition {
    fn from(result: Result<Vec<RecognitionEntry>, OcrError>) -> Self {
        match result {
            Ok(entries) if entries.is_empty() => Recognition::Empty,
            Ok(entries) => Recognition::Success(entries),
            Err(e) => Recognition::Failure(e.to_string()),
        }
    }
}

/// Runs an engine and normalizes whatever it reports.
pub struct Recognizer<E, B = LocaleWords> {
    engine: E,
    processor: ObservationProcessor<B>,
}

impl<E: RecognitionEngine> Recognizer<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            processor: ObservationProcessor::default(),
        }
    }
}

impl<E: RecognitionEngine, B: WordBoundaries> Recognizer<E, B> {
    pub fn with_boundaries(engine: E, boundaries: B) -> Self {
        Self {
            engine,
            processor: ObservationProcessor::new(boundaries),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn try_recognize(&self, request: &Request<'_>) -> Result<Vec<RecognitionEntry>, OcrError> {
        debug!(
            frame = request.frame_id,
            languages = %request.languages,
            width = request.image.width(),
            height = request.image.height(),
            "recognizing frame"
        );
        let observations = self.engine.recognize(request)?;
        Ok(self
            .processor
            .process(&observations, request.image.width(), request.image.height()))
    }

    pub fn recognize(&self, request: &Request<'_>) -> Recognition {
        let outcome = Recognition::from(self.try_recognize(request));
        if let Recognition::Failure(message) = &outcome {
            warn!(frame = request.frame_id, "OCR error: {message}");
        }
        outcome
    }
}
