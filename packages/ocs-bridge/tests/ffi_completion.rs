//! Drives the C entry points the way a foreign caller would: completion
//! data is copied out inside the callback and then released.

use std::ffi::{c_char, c_void, CStr, CString};
use std::ptr;

use ocs_bridge::{
    dispatch, install_engine, ocs_do_ocr, ocs_free_ocr_results, Observation, OcrError,
    RecognitionEngine, RecognitionEntry, ReplayEngine, Request,
};

#[derive(Debug, Default)]
struct Completion {
    calls: u32,
    frame_id: u32,
    count: u32,
    arrays_null: bool,
    entries: Vec<RecognitionEntry>,
    error: Option<String>,
}

unsafe extern "C" fn on_complete(
    frame_id: u32,
    count: u32,
    texts: *mut *mut c_char,
    lefts: *mut u32,
    tops: *mut u32,
    rights: *mut u32,
    bottoms: *mut u32,
    confidences: *mut f32,
    error: *mut c_char,
    user_data: *mut c_void,
) {
    let completion = &mut *(user_data as *mut Completion);
    completion.calls += 1;
    completion.frame_id = frame_id;
    completion.count = count;
    completion.arrays_null = texts.is_null()
        && lefts.is_null()
        && tops.is_null()
        && rights.is_null()
        && bottoms.is_null()
        && confidences.is_null();

    if !error.is_null() {
        completion.error = Some(CStr::from_ptr(error).to_string_lossy().into_owned());
    }
    for i in 0..count as usize {
        completion.entries.push(RecognitionEntry {
            text: CStr::from_ptr(*texts.add(i)).to_string_lossy().into_owned(),
            left: *lefts.add(i),
            top: *tops.add(i),
            right: *rights.add(i),
            bottom: *bottoms.add(i),
            confidence: *confidences.add(i),
        });
    }

    ocs_free_ocr_results(count, texts, lefts, tops, rights, bottoms, confidences, error);
}

struct Frame {
    languages: Option<CString>,
    width: u32,
    height: u32,
    bytes_per_line: u32,
    pixels: Option<Vec<u8>>,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        Self {
            languages: Some(CString::new("en-US").unwrap()),
            width,
            height,
            bytes_per_line: width * 3,
            pixels: Some(vec![0u8; (width * 3 * height) as usize]),
        }
    }

    fn languages(mut self, languages: Option<&str>) -> Self {
        self.languages = languages.map(|l| CString::new(l).unwrap());
        self
    }

    fn run<E: RecognitionEngine + ?Sized>(&self, engine: &E, frame_id: u32) -> Completion {
        let mut completion = Completion::default();
        unsafe {
            dispatch(
                engine,
                frame_id,
                self.languages.as_ref().map_or(ptr::null(), |l| l.as_ptr()),
                self.pixels.as_ref().map_or(ptr::null(), |p| p.as_ptr()),
                self.width,
                self.height,
                self.bytes_per_line,
                Some(on_complete),
                &mut completion as *mut Completion as *mut c_void,
            );
        }
        completion
    }
}

fn replay(json: &str) -> ReplayEngine {
    ReplayEngine::from_json(json).unwrap()
}

const HELLO_WORLD: &str = r#"{
    "width": 100,
    "height": 50,
    "observations": [
        {
            "bounding_box": { "x": 0.1, "y": 0.4, "width": 0.8, "height": 0.2 },
            "candidates": [{ "text": "Hello World", "confidence": 0.87 }]
        }
    ]
}"#;

#[test]
fn hello_world_end_to_end() {
    let completion = Frame::new(100, 50).run(&replay(HELLO_WORLD), 7);

    assert_eq!(completion.calls, 1);
    assert_eq!(completion.frame_id, 7);
    assert_eq!(completion.count, 2);
    assert!(completion.error.is_none());

    let texts: Vec<_> = completion.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["Hello", "World"]);
    for entry in &completion.entries {
        assert!(entry.left <= entry.right && entry.right <= 100, "{entry:?}");
        assert!(entry.top <= entry.bottom && entry.bottom <= 50, "{entry:?}");
        assert!((0.0..=100.0).contains(&entry.confidence));
        assert_eq!(entry.top, 20);
        assert_eq!(entry.bottom, 30);
    }
    assert_eq!(completion.entries[0].confidence, completion.entries[1].confidence);
    assert_eq!(completion.entries[0].confidence, 87.0);
}

#[test]
fn no_text_completes_empty() {
    let engine = replay(r#"{"width": 10, "height": 10, "observations": []}"#);
    let completion = Frame::new(10, 10).run(&engine, 1);

    assert_eq!(completion.calls, 1);
    assert_eq!(completion.count, 0);
    assert!(completion.arrays_null);
    assert!(completion.error.is_none());
}

#[test]
fn only_short_words_completes_empty() {
    let engine = replay(
        r#"{"width": 10, "height": 10, "observations": [
            { "bounding_box": {"x": 0, "y": 0, "width": 1, "height": 1},
              "candidates": [{"text": "a to be", "confidence": 0.9}] }
        ]}"#,
    );
    let completion = Frame::new(10, 10).run(&engine, 1);
    assert_eq!(completion.count, 0);
    assert!(completion.error.is_none());
}

#[test]
fn malformed_languages_complete_with_error() {
    let engine = replay(HELLO_WORLD);
    for languages in [Some(""), Some("+"), Some("en US"), None] {
        let completion = Frame::new(100, 50).languages(languages).run(&engine, 2);
        assert_eq!(completion.calls, 1);
        assert_eq!(completion.count, 0);
        assert!(completion.arrays_null);
        assert!(completion.error.is_some(), "{languages:?}");
    }

    let completion = Frame::new(100, 50).languages(None).run(&engine, 2);
    assert_eq!(completion.error.as_deref(), Some("missing languages string"));
}

#[test]
fn non_utf8_languages_complete_with_error() {
    let mut frame = Frame::new(100, 50);
    frame.languages = Some(CString::new(vec![0xff, 0xfe]).unwrap());
    let completion = frame.run(&replay(HELLO_WORLD), 2);
    assert_eq!(completion.calls, 1);
    assert_eq!(completion.count, 0);
    assert!(completion.arrays_null);
    assert!(completion
        .error
        .unwrap()
        .starts_with("invalid languages string"));
}

#[test]
fn unreadable_image_completes_with_error() {
    let engine = replay(HELLO_WORLD);

    let mut short_stride = Frame::new(100, 50);
    short_stride.bytes_per_line = 299;
    let completion = short_stride.run(&engine, 3);
    assert_eq!(completion.count, 0);
    assert!(completion.error.unwrap().starts_with("invalid image"));

    let mut null_pixels = Frame::new(100, 50);
    null_pixels.pixels = None;
    let completion = null_pixels.run(&engine, 3);
    assert!(completion.arrays_null);
    assert!(completion.error.is_some());
}

#[test]
fn padded_stride_is_accepted() {
    let mut frame = Frame::new(100, 50);
    frame.bytes_per_line = 304;
    frame.pixels = Some(vec![0u8; 304 * 50]);
    let completion = frame.run(&replay(HELLO_WORLD), 4);
    assert_eq!(completion.count, 2);
}

#[test]
fn engine_failure_completes_with_error() {
    let engine = replay(r#"{"width": 10, "height": 10, "failure": "request handler failed"}"#);
    let completion = Frame::new(10, 10).run(&engine, 5);
    assert_eq!(completion.calls, 1);
    assert_eq!(completion.count, 0);
    assert_eq!(
        completion.error.as_deref(),
        Some("engine error: request handler failed")
    );
}

#[test]
fn entries_keep_observation_order() {
    // the second observation is higher up in the image but still comes second
    let engine = replay(
        r#"{"width": 200, "height": 100, "observations": [
            { "bounding_box": {"x": 0.0, "y": 0.1, "width": 0.5, "height": 0.1},
              "candidates": [{"text": "lower left", "confidence": 0.6}] },
            { "bounding_box": {"x": 0.0, "y": 0.8, "width": 0.5, "height": 0.1},
              "candidates": [{"text": "upper text", "confidence": 0.9}] }
        ]}"#,
    );
    let completion = Frame::new(200, 100).run(&engine, 6);
    let texts: Vec<_> = completion.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["lower", "left", "upper", "text"]);
    assert!(completion.entries[0].top > completion.entries[2].top);
    assert_eq!(completion.entries[0].confidence, 60.0);
    assert_eq!(completion.entries[2].confidence, 90.0);
}

#[test]
fn missing_word_box_is_skipped() {
    let engine = replay(
        r#"{"width": 100, "height": 50, "observations": [
            { "bounding_box": {"x": 0.0, "y": 0.0, "width": 1.0, "height": 0.5},
              "candidates": [{"text": "keep drop keep", "confidence": 0.5}],
              "missing": ["drop"] }
        ]}"#,
    );
    let completion = Frame::new(100, 50).run(&engine, 8);
    let texts: Vec<_> = completion.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["keep", "keep"]);
}

#[test]
fn japanese_line_delivers_words() {
    let engine = replay(
        r#"{"width": 100, "height": 50, "observations": [
            { "bounding_box": {"x": 0.0, "y": 0.0, "width": 1.0, "height": 0.5},
              "candidates": [{"text": "新しいコンピュータを使います", "confidence": 0.8}] }
        ]}"#,
    );
    let completion = Frame::new(100, 50).languages(Some("ja-JP")).run(&engine, 10);
    assert!(completion.error.is_none());
    assert!(completion.count >= 1);
    assert!(completion.entries.iter().any(|e| e.text == "コンピュータ"));
}

struct Explodes;

impl RecognitionEngine for Explodes {
    fn recognize(&self, _request: &Request<'_>) -> Result<Vec<Box<dyn Observation>>, OcrError> {
        panic!("engine exploded")
    }
}

#[test]
fn engine_panic_completes_with_error() {
    let completion = Frame::new(10, 10).run(&Explodes, 9);
    assert_eq!(completion.calls, 1);
    assert_eq!(completion.count, 0);
    assert_eq!(
        completion.error.as_deref(),
        Some("internal error: engine exploded")
    );
}

#[test]
fn missing_callback_does_nothing() {
    let frame = Frame::new(10, 10);
    let pixels = frame.pixels.as_ref().unwrap();
    unsafe {
        dispatch(
            &replay(HELLO_WORLD),
            0,
            frame.languages.as_ref().unwrap().as_ptr(),
            pixels.as_ptr(),
            10,
            10,
            30,
            None,
            ptr::null_mut(),
        );
    }
}

#[test]
fn free_with_all_null_is_noop() {
    unsafe {
        ocs_free_ocr_results(
            0,
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
        );
    }
}

#[test]
fn installed_engine_serves_exported_entry_point() {
    install_engine(Box::new(replay(HELLO_WORLD))).unwrap();
    assert!(matches!(
        install_engine(Box::new(replay(HELLO_WORLD))),
        Err(OcrError::EngineAlreadyInstalled)
    ));

    let frame = Frame::new(100, 50);
    let mut completion = Completion::default();
    unsafe {
        ocs_do_ocr(
            11,
            frame.languages.as_ref().unwrap().as_ptr(),
            frame.pixels.as_ref().unwrap().as_ptr(),
            100,
            50,
            300,
            Some(on_complete),
            &mut completion as *mut Completion as *mut c_void,
        );
    }
    assert_eq!(completion.calls, 1);
    assert_eq!(completion.frame_id, 11);
    assert_eq!(completion.count, 2);
}
