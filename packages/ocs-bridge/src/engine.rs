use std::ops::Range;

use crate::config::RecognitionOptions;
use crate::error::OcrError;
use crate::geometry::NormalizedRect;
use crate::image::ImageView;
use crate::language::LanguageList;

/// One unit of work: a single frame recognized with a single language list.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub frame_id: u32,
    pub languages: LanguageList,
    pub image: ImageView<'a>,
    pub options: RecognitionOptions,
}

impl<'a> Request<'a> {
    pub fn new(frame_id: u32, languages: LanguageList, image: ImageView<'a>) -> Self {
        let options = RecognitionOptions::for_image_height(image.height());
        Self {
            frame_id,
            languages,
            image,
            options,
        }
    }

    pub fn with_options(mut self, options: RecognitionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Best reading of an observation as reported by the engine.
pub trait TextCandidate {
    fn text(&self) -> &str;

    /// Engine confidence in `0..=1`.
    fn confidence(&self) -> f32;

    /// Box of `range` (byte offsets into [`text`](Self::text), on char
    /// boundaries) in normalized, bottom-left-origin coordinates.
    ///
    /// `Ok(None)` and `Err(_)` both mean this one word has no usable box.
    fn bounding_box(&self, range: Range<usize>) -> Result<Option<NormalizedRect>, OcrError>;
}

/// A span of recognized text, usually one line or sentence.
pub trait Observation {
    fn top_candidate(&self) -> Option<&dyn TextCandidate>;
}

pub trait RecognitionEngine: Send + Sync {
    fn recognize(&self, request: &Request<'_>) -> Result<Vec<Box<dyn Observation>>, OcrError>;
}

impl<T: RecognitionEngine + ?Sized> RecognitionEngine for &T {
    fn recognize(&self, request: &Request<'_>) -> Result<Vec<Box<dyn Observation>>, OcrError> {
        (**self).recognize(request)
    }
}

impl<T: RecognitionEngine + ?Sized> RecognitionEngine for Box<T> {
    fn recognize(&self, request: &Request<'_>) -> Result<Vec<Box<dyn Observation>>, OcrError> {
        (**self).recognize(request)
    }
}
