use focalcrop_wasm::{find_all_crops, find_best_crop};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

/// Black PNG with a checkered green block on the right.
fn make_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if x >= width * 3 / 4 && y >= height / 3 && y < height * 2 / 3 && (x + y) % 2 == 0 {
            *pixel = Rgb([0, 255, 0]);
        }
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    js_sys::Reflect::get(obj, &key.into()).unwrap()
}

fn get_f64(obj: &JsValue, key: &str) -> f64 {
    get(obj, key).as_f64().unwrap()
}

fn error_code(err: &JsValue) -> String {
    get(err, "code").as_string().unwrap()
}

fn options(pairs: &[(&str, JsValue)]) -> JsValue {
    let obj = js_sys::Object::new();
    for (k, v) in pairs {
        js_sys::Reflect::set(&obj, &(*k).into(), v).unwrap();
    }
    obj.into()
}

#[wasm_bindgen_test]
fn best_crop_with_synthetic_png() {
    let png = make_test_png(200, 100);
    let crop = find_best_crop(&png, 100, 100, JsValue::UNDEFINED).unwrap();

    let (x, w) = (get_f64(&crop, "x"), get_f64(&crop, "width"));
    assert_eq!(w, get_f64(&crop, "height"));
    assert!(x + w <= 200.0);
    assert!(x + w > 150.0, "crop should reach the detail, got x={x} w={w}");
}

#[wasm_bindgen_test]
fn all_crops_carry_scores() {
    let png = make_test_png(120, 80);
    let all = find_all_crops(&png, 1, 1, JsValue::NULL).unwrap();

    assert!(all.length() > 0);
    for c in all.iter() {
        let score = get(&c, "score");
        assert!(get_f64(&score, "total").is_finite());
        assert_eq!(get_f64(&c, "width"), get_f64(&c, "height"));
    }
}

#[wasm_bindgen_test]
fn option_fields_override_the_preset() {
    let png = make_test_png(120, 80);
    let coarse = find_all_crops(&png, 1, 1, options(&[("step", 40.into())])).unwrap();
    let fine = find_all_crops(&png, 1, 1, options(&[("step", 4.into())])).unwrap();
    assert!(fine.length() > coarse.length());

    let general = options(&[("preset", "general".into()), ("prescale", false.into())]);
    assert!(find_best_crop(&png, 1, 1, general).is_ok());
}

#[wasm_bindgen_test]
fn face_detect_preset_needs_a_classifier() {
    let png = make_test_png(120, 80);
    let err = find_best_crop(&png, 1, 1, options(&[("preset", "face-detect".into())])).unwrap_err();
    assert_eq!(error_code(&err), "CLASSIFIER_LOAD");
    assert!(err.is_instance_of::<js_sys::Error>());
}

#[wasm_bindgen_test]
fn unknown_preset_is_invalid_options() {
    let png = make_test_png(40, 40);
    let err = find_best_crop(&png, 1, 1, options(&[("preset", "portrait".into())])).unwrap_err();
    assert_eq!(error_code(&err), "INVALID_OPTIONS");
}

#[wasm_bindgen_test]
fn bad_config_is_invalid_config() {
    let png = make_test_png(40, 40);
    let err = find_best_crop(&png, 1, 1, options(&[("step", 0.into())])).unwrap_err();
    assert_eq!(error_code(&err), "INVALID_CONFIG");
}

#[wasm_bindgen_test]
fn zero_target_is_invalid_dimensions() {
    let png = make_test_png(40, 40);
    let err = find_best_crop(&png, 0, 0, JsValue::UNDEFINED).unwrap_err();
    assert_eq!(error_code(&err), "INVALID_DIMENSIONS");
}

#[wasm_bindgen_test]
fn invalid_input_returns_decode_error() {
    let err = find_best_crop(b"not an image", 1, 1, JsValue::UNDEFINED).unwrap_err();
    assert_eq!(error_code(&err), "DECODE_ERROR");
}
