use focalcrop::{Analyzer, Candidate, Config, CropError, Preset, Rect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Create a JS `Error` with a `code` property.
fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

/// Convert a `CropError` into a JS `Error` with a machine-readable `code` property.
fn to_js_error(e: CropError) -> JsValue {
    let code = match &e {
        CropError::Decode(_) => "DECODE_ERROR",
        CropError::InvalidDimensions => "INVALID_DIMENSIONS",
        CropError::ZeroDimensions => "ZERO_DIMENSIONS",
        CropError::InvalidConfig(_) => "INVALID_CONFIG",
        CropError::ClassifierLoad(_) => "CLASSIFIER_LOAD",
        CropError::NoCandidates => "NO_CANDIDATES",
        // Never escapes the library, mapped for completeness.
        CropError::Detector(_) => "DETECTOR_ERROR",
    };
    make_error(code, &e.to_string())
}

fn string_to_preset(preset: &str) -> Result<Preset, JsValue> {
    match preset {
        "general" => Ok(Preset::General),
        "face-detect" => Ok(Preset::FaceDetect),
        _ => Err(make_error(
            "INVALID_OPTIONS",
            &format!("unknown preset: {preset}"),
        )),
    }
}

/// Build a `Config` from a JS options object.
///
/// The optional `preset` key picks the base configuration; every other key
/// is a camelCase `Config` field that overrides it.
fn parse_options(options: JsValue) -> Result<Config, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(Config::default());
    }
    if !options.is_object() {
        return Err(make_error("INVALID_OPTIONS", "options must be an object"));
    }

    let preset = js_sys::Reflect::get(&options, &"preset".into())?;
    let base = match preset.as_string() {
        Some(name) => Config::default().preset(string_to_preset(&name)?),
        None if preset.is_undefined() || preset.is_null() => Config::default(),
        None => return Err(make_error("INVALID_OPTIONS", "preset must be a string")),
    };

    let base = serde_wasm_bindgen::to_value(&base)
        .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid options: {e}")))?;
    let merged = js_sys::Object::assign(&js_sys::Object::new(), base.unchecked_ref());
    let merged = js_sys::Object::assign(&merged, options.unchecked_ref());

    serde_wasm_bindgen::from_value(merged.into())
        .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid options: {e}")))
}

/// Build a plain `{ x, y, width, height }` JS object from a `Rect`.
fn build_rect_object(rect: &Rect) -> Result<js_sys::Object, JsValue> {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"x".into(), &JsValue::from(rect.min_x))?;
    js_sys::Reflect::set(&obj, &"y".into(), &JsValue::from(rect.min_y))?;
    js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(rect.width()))?;
    js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(rect.height()))?;
    Ok(obj)
}

/// A rect object with an extra `score` breakdown.
fn build_candidate_object(candidate: &Candidate) -> Result<JsValue, JsValue> {
    let obj = build_rect_object(&candidate.rect)?;
    let s = &candidate.score;
    let score = js_sys::Object::new();
    js_sys::Reflect::set(&score, &"detail".into(), &JsValue::from(s.detail))?;
    js_sys::Reflect::set(&score, &"skin".into(), &JsValue::from(s.skin))?;
    js_sys::Reflect::set(&score, &"saturation".into(), &JsValue::from(s.saturation))?;
    js_sys::Reflect::set(&score, &"face".into(), &JsValue::from(s.face))?;
    js_sys::Reflect::set(&score, &"total".into(), &JsValue::from(s.total))?;
    js_sys::Reflect::set(&obj, &"score".into(), &score)?;
    Ok(JsValue::from(obj))
}

/// Find the best crop of an image for the given aspect ratio.
///
/// @param input - Raw image bytes (JPEG, PNG, or WebP)
/// @param width - Target width (0 leaves the axis open)
/// @param height - Target height (0 leaves the axis open)
/// @param options - Optional object: `preset` ("general" | "face-detect")
///   plus any camelCase config field
/// @returns `{ x, y, width, height }` in source pixels
#[wasm_bindgen(js_name = "findBestCrop")]
pub fn find_best_crop(
    input: &[u8],
    width: u32,
    height: u32,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let config = parse_options(options)?;
    let rect = Analyzer::new(config)
        .find_best_crop_from_bytes(input, width, height)
        .map_err(to_js_error)?;
    Ok(build_rect_object(&rect)?.into())
}

/// Score every candidate crop, in generation order.
///
/// Same parameters as `findBestCrop`. Each entry is
/// `{ x, y, width, height, score: { detail, skin, saturation, face, total } }`.
#[wasm_bindgen(js_name = "findAllCrops")]
pub fn find_all_crops(
    input: &[u8],
    width: u32,
    height: u32,
    options: JsValue,
) -> Result<js_sys::Array, JsValue> {
    let config = parse_options(options)?;
    let candidates = Analyzer::new(config)
        .find_all_crops_from_bytes(input, width, height)
        .map_err(to_js_error)?;

    let out = js_sys::Array::new();
    for c in &candidates {
        out.push(&build_candidate_object(c)?);
    }
    Ok(out)
}
