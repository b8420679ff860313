//! C ABI: `ocs_do_ocr` / `ocs_free_ocr_results`.
//!
//! Every request completes through the callback exactly once, before
//! `ocs_do_ocr` returns. Whatever the callback receives belongs to the
//! caller until it is passed to `ocs_free_ocr_results`.

use std::any::Any;
use std::ffi::{c_char, c_void, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;

use tracing::{error, info};

use crate::engine::{RecognitionEngine, Request};
use crate::error::OcrError;
use crate::image::ImageView;
use crate::language::LanguageList;
use crate::marshal::{release, MarshaledResult, RawResult};
use crate::recognizer::{Recognition, Recognizer};

/// Completion callback.
///
/// Arguments: frame id, count, texts, lefts, tops, rights, bottoms,
/// confidences, error message, user data.
pub type CompletionCallback = unsafe extern "C" fn(
    u32,
    u32,
    *mut *mut c_char,
    *mut u32,
    *mut u32,
    *mut u32,
    *mut u32,
    *mut f32,
    *mut c_char,
    *mut c_void,
);

static ENGINE: OnceLock<Box<dyn RecognitionEngine>> = OnceLock::new();

/// Sets the engine behind `ocs_do_ocr`. Can only be done once per process.
pub fn install_engine(engine: Box<dyn RecognitionEngine>) -> Result<(), OcrError> {
    ENGINE
        .set(engine)
        .map_err(|_| OcrError::EngineAlreadyInstalled)?;
    info!("recognition engine installed");
    Ok(())
}

/// # Safety
/// `languages` must be null or a valid NUL-terminated string.
unsafe fn parse_languages(languages: *const c_char) -> Result<LanguageList, OcrError> {
    if languages.is_null() {
        return Err(OcrError::MissingLanguages);
    }
    let languages = CStr::from_ptr(languages)
        .to_str()
        .map_err(|e| OcrError::InvalidLanguages(e.to_string()))?;
    LanguageList::parse(languages)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Runs one request against `engine` and completes it through `callback`.
///
/// Input errors complete as failures without touching the engine. Panics
/// are caught and reported as failures too.
///
/// # Safety
/// - `languages` must be null or a valid NUL-terminated string
/// - `data` must be null or point to `bytes_per_line * height` readable bytes
/// - `callback` must be safe to call with `user_data`
#[allow(clippy::too_many_arguments)]
pub unsafe fn dispatch<E>(
    engine: &E,
    frame_id: u32,
    languages: *const c_char,
    data: *const u8,
    width: u32,
    height: u32,
    bytes_per_line: u32,
    callback: Option<CompletionCallback>,
    user_data: *mut c_void,
) where
    E: RecognitionEngine + ?Sized,
{
    let Some(callback) = callback else {
        error!(frame = frame_id, "no completion callback, dropping request");
        return;
    };

    let outcome = catch_unwind(AssertUnwindSafe(|| -> Result<Recognition, OcrError> {
        let languages = parse_languages(languages)?;
        let image = ImageView::from_raw(data, width, height, bytes_per_line)?;
        let request = Request::new(frame_id, languages, image);
        Ok(Recognizer::new(engine).recognize(&request))
    }))
    .unwrap_or_else(|payload| {
        Ok(Recognition::Failure(format!(
            "internal error: {}",
            panic_message(payload.as_ref())
        )))
    })
    .unwrap_or_else(|e: OcrError| {
        error!(frame = frame_id, "rejected request: {e}");
        Recognition::Failure(e.to_string())
    });

    complete(callback, frame_id, outcome, user_data);
}

unsafe fn complete(
    callback: CompletionCallback,
    frame_id: u32,
    outcome: Recognition,
    user_data: *mut c_void,
) {
    let raw = MarshaledResult::from(outcome).into_raw();
    callback(
        frame_id,
        raw.count,
        raw.texts,
        raw.lefts,
        raw.tops,
        raw.rights,
        raw.bottoms,
        raw.confidences,
        raw.error,
        user_data,
    );
}

/// Recognize text in a packed 24-bit sRGB frame.
///
/// # Arguments
/// - `frame_id`: echoed back to the callback
/// - `languages`: `+`-separated language tags, e.g. `en-US+de-DE`
/// - `data`, `width`, `height`, `bytes_per_line`: the frame, 3 bytes per pixel
/// - `callback`: invoked exactly once before this function returns
/// - `user_data`: passed through to `callback`
///
/// # Memory
/// Any non-null pointer the callback receives must be freed with
/// `ocs_free_ocr_results`, once.
///
/// # Safety
/// - `languages` must be null or a valid NUL-terminated string
/// - `data` must be null or point to `bytes_per_line * height` readable bytes
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn ocs_do_ocr(
    frame_id: u32,
    languages: *const c_char,
    data: *const u8,
    width: u32,
    height: u32,
    bytes_per_line: u32,
    callback: Option<CompletionCallback>,
    user_data: *mut c_void,
) {
    match ENGINE.get() {
        Some(engine) => dispatch(
            &**engine,
            frame_id,
            languages,
            data,
            width,
            height,
            bytes_per_line,
            callback,
            user_data,
        ),
        None => {
            error!(frame = frame_id, "{}", OcrError::NoEngine);
            if let Some(callback) = callback {
                let outcome = Recognition::Failure(OcrError::NoEngine.to_string());
                complete(callback, frame_id, outcome, user_data);
            }
        }
    }
}

/// Free everything a completion handed over.
///
/// Calling this with all-null pointers is a no-op.
///
/// # Safety
/// - pointers must be exactly those passed to the callback, with its `count`
/// - must be called at most once per completion
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn ocs_free_ocr_results(
    count: u32,
    texts: *mut *mut c_char,
    lefts: *mut u32,
    tops: *mut u32,
    rights: *mut u32,
    bottoms: *mut u32,
    confidences: *mut f32,
    error: *mut c_char,
) {
    release(RawResult {
        count,
        texts,
        lefts,
        tops,
        rights,
        bottoms,
        confidences,
        error,
    });
}
