use tracing::debug;

use crate::engine::Observation;
use crate::entry::RecognitionEntry;
use crate::segment::{segment, LocaleWords, WordBoundaries};

/// Turns engine sentence observations into pixel-space word entries.
///
/// Entries come out in observation order, then word order inside each
/// observation. Overlapping boxes from different observations are kept as
/// separate entries.
#[derive(Debug, Clone, Default)]
pub struct ObservationProcessor<B = LocaleWords> {
    boundaries: B,
}

impl<B: WordBoundaries> ObservationProcessor<B> {
    pub fn new(boundaries: B) -> Self {
        Self { boundaries }
    }

    pub fn process(
        &self,
        observations: &[Box<dyn Observation>],
        image_width: u32,
        image_height: u32,
    ) -> Vec<RecognitionEntry> {
        let mut entries = Vec::new();
        for observation in observations {
            let Some(candidate) = observation.top_candidate() else {
                continue;
            };
            let confidence = candidate.confidence();
            let words = segment(candidate.text(), &self.boundaries, |range| {
                candidate.bounding_box(range)
            });
            entries.extend(words.into_iter().map(|word| {
                RecognitionEntry::from_word(
                    word.text,
                    &word.bounds,
                    confidence,
                    image_width,
                    image_height,
                )
            }));
        }
        debug!(
            observations = observations.len(),
            entries = entries.len(),
            "processed observations"
        );
        entries
    }
}
