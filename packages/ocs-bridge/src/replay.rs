//! Deterministic engine that replays observations recorded as JSON.
//!
//! ```json
//! {
//!   "width": 100,
//!   "height": 50,
//!   "observations": [
//!     {
//!       "bounding_box": { "x": 0.1, "y": 0.4, "width": 0.8, "height": 0.2 },
//!       "candidates": [{ "text": "Hello World", "confidence": 0.87 }],
//!       "missing": []
//!     }
//!   ]
//! }
//! ```
//!
//! Word boxes are interpolated from the observation box by character
//! position. Words listed in `missing` have no box, and a top-level
//! `failure` makes every request fail with that message.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{Observation, RecognitionEngine, Request, TextCandidate};
use crate::error::OcrError;
use crate::geometry::NormalizedRect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(default)]
    pub observations: Vec<RecordedObservation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedObservation {
    pub bounding_box: NormalizedRect,
    /// Best reading first.
    #[serde(default)]
    pub candidates: Vec<RecordedCandidate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedCandidate {
    pub text: String,
    pub confidence: f32,
}

struct ReplayCandidate {
    text: String,
    confidence: f32,
    bounds: NormalizedRect,
    missing: Vec<String>,
}

struct ReplayObservation(Option<ReplayCandidate>);

impl TextCandidate for ReplayCandidate {
    fn text(&self) -> &str {
        &self.text
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn bounding_box(&self, range: Range<usize>) -> Result<Option<NormalizedRect>, OcrError> {
        let word = self
            .text
            .get(range.clone())
            .filter(|word| !word.is_empty())
            .ok_or_else(|| {
                OcrError::Geometry(format!(
                    "range {range:?} does not select text in {:?}",
                    self.text
                ))
            })?;
        if self.missing.iter().any(|m| m == word) {
            return Ok(None);
        }

        let total = self.text.chars().count() as f64;
        let start = self.text[..range.start].chars().count() as f64;
        let len = word.chars().count() as f64;
        let b = &self.bounds;
        Ok(Some(NormalizedRect::new(
            b.x + b.width * start / total,
            b.y,
            b.width * len / total,
            b.height,
        )))
    }
}

impl Observation for ReplayObservation {
    fn top_candidate(&self) -> Option<&dyn TextCandidate> {
        self.0.as_ref().map(|c| c as &dyn TextCandidate)
    }
}

#[derive(Debug, Clone)]
pub struct ReplayEngine {
    recording: Recording,
}

impl ReplayEngine {
    pub fn new(recording: Recording) -> Self {
        Self { recording }
    }

    pub fn from_json(json: &str) -> Result<Self, OcrError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }
}

impl RecognitionEngine for ReplayEngine {
    fn recognize(&self, request: &Request<'_>) -> Result<Vec<Box<dyn Observation>>, OcrError> {
        if let Some(failure) = &self.recording.failure {
            return Err(OcrError::EngineError(failure.clone()));
        }
        debug!(
            frame = request.frame_id,
            observations = self.recording.observations.len(),
            level = ?request.options.recognition_level,
            "replaying recorded observations"
        );
        Ok(self
            .recording
            .observations
            .iter()
            .map(|obs| {
                let candidate = obs.candidates.first().map(|c| ReplayCandidate {
                    text: c.text.clone(),
                    confidence: c.confidence,
                    bounds: obs.bounding_box,
                    missing: obs.missing.clone(),
                });
                Box::new(ReplayObservation(candidate)) as Box<dyn Observation>
            })
            .collect())
    }
}
