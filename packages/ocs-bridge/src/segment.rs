//! Splits recognized sentences into words and attaches a box to each one.

use std::fmt;
use std::ops::Range;

use icu_segmenter::WordSegmenter;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::OcrError;
use crate::geometry::NormalizedRect;

/// Words shorter than this are single letters or punctuation noise.
pub const MIN_WORD_CHARS: usize = 3;

/// Word-boundary enumeration over a recognized string.
pub trait WordBoundaries {
    /// Byte ranges of every word in `text`, left to right.
    fn word_ranges(&self, text: &str) -> Vec<Range<usize>>;
}

/// ICU word boundaries: UAX #29 rules, dictionary segmentation for Chinese
/// and Japanese, and an LSTM model for Thai, Lao, Khmer and Burmese.
///
/// Only word-like segments (letters, digits, ideographs) are returned, so
/// whitespace and punctuation never show up.
pub struct LocaleWords {
    segmenter: WordSegmenter,
}

impl LocaleWords {
    pub fn new() -> Self {
        Self {
            segmenter: WordSegmenter::new_auto(),
        }
    }
}

impl Default for LocaleWords {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocaleWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleWords").finish_non_exhaustive()
    }
}

impl WordBoundaries for LocaleWords {
    fn word_ranges(&self, text: &str) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut breaks = self.segmenter.segment_str(text);
        let mut start = 0;
        while let Some(end) = breaks.next() {
            if end > start && breaks.is_word_like() {
                ranges.push(start..end);
            }
            start = end;
        }
        ranges
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub range: Range<usize>,
}

/// A token together with the box the engine reported for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub range: Range<usize>,
    pub bounds: NormalizedRect,
}

/// User-perceived characters, so combining marks don't inflate short words.
pub fn char_count(word: &str) -> usize {
    word.graphemes(true).count()
}

/// Words of `text` long enough to keep, in string order.
pub fn tokens<'a, B>(text: &'a str, boundaries: &B) -> Vec<Token<'a>>
where
    B: WordBoundaries + ?Sized,
{
    boundaries
        .word_ranges(text)
        .into_iter()
        .filter_map(|range| {
            let word = text.get(range.clone())?;
            (char_count(word) >= MIN_WORD_CHARS).then_some(Token { text: word, range })
        })
        .collect()
}

/// Tokenizes `text` and looks up a box for every surviving token.
///
/// A failed or empty lookup drops that token only.
pub fn segment<'a, B, L>(text: &'a str, boundaries: &B, mut lookup: L) -> Vec<Word<'a>>
where
    B: WordBoundaries + ?Sized,
    L: FnMut(Range<usize>) -> Result<Option<NormalizedRect>, OcrError>,
{
    let mut words = Vec::new();
    for token in tokens(text, boundaries) {
        match lookup(token.range.clone()) {
            Ok(Some(bounds)) => words.push(Word {
                text: token.text,
                range: token.range,
                bounds,
            }),
            Ok(None) => trace!(word = token.text, "no bounding box, skipping"),
            Err(e) => trace!(word = token.text, error = %e, "bounding box lookup failed, skipping"),
        }
    }
    words
}
