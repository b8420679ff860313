use crate::geometry::{NormalizedRect, PixelBox};

/// One recognized word in image pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionEntry {
    pub text: String,
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    /// Percent, `0..=100`.
    pub confidence: f32,
}

impl RecognitionEntry {
    /// Clamps `bounds`, flips it into pixel space and scales `confidence`
    /// from `0..=1` to percent.
    pub fn from_word(
        text: &str,
        bounds: &NormalizedRect,
        confidence: f32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let PixelBox {
            left,
            top,
            right,
            bottom,
        } = bounds.clamp().axis_flip(image_width, image_height);
        Self {
            text: text.to_string(),
            left,
            top,
            right,
            bottom,
            confidence: scale_confidence(confidence),
        }
    }
}

pub fn scale_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        return 0.0;
    }
    (confidence * 100.0).clamp(0.0, 100.0)
}
