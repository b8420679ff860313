//! Owned form of a completion and its conversion to and from raw pointers.
//!
//! Inside Rust a completion is a [`MarshaledResult`]; dropping it frees
//! every buffer exactly once. Raw pointers only exist while the result is
//! on the other side of the C boundary, between [`MarshaledResult::into_raw`]
//! and [`release`] (or [`MarshaledResult::from_raw`]).

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::entry::RecognitionEntry;
use crate::recognizer::Recognition;

/// Pointer form of a completion, as handed to the callback.
///
/// Exactly one shape is ever produced:
/// - success: `count > 0`, every array non-null, `error` null
/// - empty: `count == 0`, everything null
/// - failure: `count == 0`, arrays null, `error` non-null
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawResult {
    pub count: u32,
    pub texts: *mut *mut c_char,
    pub lefts: *mut u32,
    pub tops: *mut u32,
    pub rights: *mut u32,
    pub bottoms: *mut u32,
    pub confidences: *mut f32,
    pub error: *mut c_char,
}

impl RawResult {
    pub const fn empty() -> Self {
        Self {
            count: 0,
            texts: ptr::null_mut(),
            lefts: ptr::null_mut(),
            tops: ptr::null_mut(),
            rights: ptr::null_mut(),
            bottoms: ptr::null_mut(),
            confidences: ptr::null_mut(),
            error: ptr::null_mut(),
        }
    }

    /// True when nothing needs releasing.
    pub fn is_null(&self) -> bool {
        self.texts.is_null()
            && self.lefts.is_null()
            && self.tops.is_null()
            && self.rights.is_null()
            && self.bottoms.is_null()
            && self.confidences.is_null()
            && self.error.is_null()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct MarshaledResult {
    texts: Vec<CString>,
    lefts: Vec<u32>,
    tops: Vec<u32>,
    rights: Vec<u32>,
    bottoms: Vec<u32>,
    confidences: Vec<f32>,
    error: Option<CString>,
}

/// NUL-terminated copy; interior NULs are dropped rather than truncating.
fn c_string(text: &str) -> CString {
    CString::new(text.replace('\0', "")).unwrap_or_default()
}

fn leak<T>(values: Vec<T>) -> *mut T {
    if values.is_empty() {
        return ptr::null_mut();
    }
    Box::into_raw(values.into_boxed_slice()).cast::<T>()
}

/// # Safety
/// `data` must be null or come from [`leak`] with exactly `len` elements.
unsafe fn reclaim<T>(data: *mut T, len: usize) -> Vec<T> {
    if data.is_null() || len == 0 {
        return Vec::new();
    }
    Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)).into_vec()
}

fn kept<T>(values: Vec<T>, keep: &[bool]) -> Vec<T> {
    values
        .into_iter()
        .zip(keep)
        .filter_map(|(value, &keep)| keep.then_some(value))
        .collect()
}

impl MarshaledResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failure(message: &str) -> Self {
        Self {
            error: Some(c_string(message)),
            ..Self::default()
        }
    }

    pub fn success(entries: Vec<RecognitionEntry>) -> Self {
        if entries.len() > u32::MAX as usize {
            return Self::failure(&format!("{} entries exceed the u32 count", entries.len()));
        }

        let count = entries.len();
        let mut result = Self {
            texts: Vec::with_capacity(count),
            lefts: Vec::with_capacity(count),
            tops: Vec::with_capacity(count),
            rights: Vec::with_capacity(count),
            bottoms: Vec::with_capacity(count),
            confidences: Vec::with_capacity(count),
            error: None,
        };
        for entry in entries {
            result.texts.push(c_string(&entry.text));
            result.lefts.push(entry.left);
            result.tops.push(entry.top);
            result.rights.push(entry.right);
            result.bottoms.push(entry.bottom);
            result.confidences.push(entry.confidence);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn error(&self) -> Option<&CStr> {
        self.error.as_deref()
    }

    pub fn texts(&self) -> &[CString] {
        &self.texts
    }

    pub fn confidences(&self) -> &[f32] {
        &self.confidences
    }

    /// Reads the arrays back into entries.
    pub fn entries(&self) -> Vec<RecognitionEntry> {
        (0..self.len())
            .map(|i| RecognitionEntry {
                text: self.texts[i].to_string_lossy().into_owned(),
                left: self.lefts[i],
                top: self.tops[i],
                right: self.rights[i],
                bottom: self.bottoms[i],
                confidence: self.confidences[i],
            })
            .collect()
    }

    pub fn into_recognition(self) -> Recognition {
        if let Some(error) = &self.error {
            return Recognition::Failure(error.to_string_lossy().into_owned());
        }
        if self.is_empty() {
            return Recognition::Empty;
        }
        Recognition::Success(self.entries())
    }

    /// Hands ownership of every buffer to the caller.
    pub fn into_raw(self) -> RawResult {
        let count = self.texts.len() as u32;
        let texts: Vec<*mut c_char> = self.texts.into_iter().map(CString::into_raw).collect();
        RawResult {
            count,
            texts: leak(texts),
            lefts: leak(self.lefts),
            tops: leak(self.tops),
            rights: leak(self.rights),
            bottoms: leak(self.bottoms),
            confidences: leak(self.confidences),
            error: self.error.map_or(ptr::null_mut(), CString::into_raw),
        }
    }

    /// Takes ownership back from a [`RawResult`].
    ///
    /// An index whose text pointer is null is dropped from every array, so
    /// the arrays stay parallel.
    ///
    /// # Safety
    /// `raw` must come from [`into_raw`](Self::into_raw) and must not be
    /// reclaimed or released again afterwards.
    pub unsafe fn from_raw(raw: RawResult) -> Self {
        let count = raw.count as usize;
        let texts = reclaim(raw.texts, count);
        let keep: Vec<bool> = texts.iter().map(|text| !text.is_null()).collect();
        Self {
            texts: texts
                .into_iter()
                .filter(|text| !text.is_null())
                .map(|text| CString::from_raw(text))
                .collect(),
            lefts: kept(reclaim(raw.lefts, count), &keep),
            tops: kept(reclaim(raw.tops, count), &keep),
            rights: kept(reclaim(raw.rights, count), &keep),
            bottoms: kept(reclaim(raw.bottoms, count), &keep),
            confidences: kept(reclaim(raw.confidences, count), &keep),
            error: (!raw.error.is_null()).then(|| CString::from_raw(raw.error)),
        }
    }
}

impl From<Recognition> for MarshaledResult {
    fn from(recognition: Recognition) -> Self {
        match recognition {
            Recognition::Success(entries) => Self::success(entries),
            Recognition::Empty => Self::empty(),
            Recognition::Failure(message) => Self::failure(&message),
        }
    }
}

/// Frees every buffer of a completion: the strings, then the arrays, then
/// the error message. All-null input is a no-op.
///
/// # Safety
/// Every non-null pointer in `raw` must come from
/// [`MarshaledResult::into_raw`] with the same `count`, and must not be
/// released twice.
pub unsafe fn release(raw: RawResult) {
    let count = raw.count as usize;

    let texts = reclaim(raw.texts, count);
    for &text in &texts {
        if !text.is_null() {
            drop(CString::from_raw(text));
        }
    }
    drop(texts);

    drop(reclaim(raw.lefts, count));
    drop(reclaim(raw.tops, count));
    drop(reclaim(raw.rights, count));
    drop(reclaim(raw.bottoms, count));
    drop(reclaim(raw.confidences, count));

    if !raw.error.is_null() {
        drop(CString::from_raw(raw.error));
    }
}
