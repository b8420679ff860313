/// Smallest text the engine is asked to look for, in pixels.
pub const MIN_TEXT_HEIGHT_PX: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionLevel {
    Fast,
    #[default]
    Accurate,
}

/// Per-request hints handed to the recognition engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecognitionOptions {
    pub recognition_level: RecognitionLevel,
    pub uses_language_correction: bool,
    /// Fraction of the image height; text shorter than this is ignored.
    pub minimum_text_height: f32,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            recognition_level: RecognitionLevel::Accurate,
            uses_language_correction: true,
            minimum_text_height: 0.0,
        }
    }
}

impl RecognitionOptions {
    /// Defaults with the minimum text height pinned to 8 px of `image_height`.
    pub fn for_image_height(image_height: u32) -> Self {
        let minimum_text_height = if image_height == 0 {
            0.0
        } else {
            (MIN_TEXT_HEIGHT_PX / image_height as f32).min(1.0)
        };
        Self {
            minimum_text_height,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_prefer_accuracy() {
        let opts = RecognitionOptions::default();
        assert_eq!(opts.recognition_level, RecognitionLevel::Accurate);
        assert!(opts.uses_language_correction);
    }

    #[test]
    fn minimum_height_scales_with_image() {
        assert_eq!(RecognitionOptions::for_image_height(800).minimum_text_height, 0.01);
        assert_eq!(RecognitionOptions::for_image_height(4).minimum_text_height, 1.0);
        assert_eq!(RecognitionOptions::for_image_height(0).minimum_text_height, 0.0);
    }
}
