use image::RgbaImage;
use log::{debug, warn};

use crate::error::{CropError, Result};
use crate::geometry::Rect;

/// Smallest share of the image a face box must exceed to be kept.
pub const MIN_FACE_AREA_RATIO: f64 = 0.05;

/// Pluggable face detection backend.
///
/// Implement this trait to provide a custom face detector (ONNX, dlib, a
/// cascade classifier, etc.) and pass it to
/// [`crate::Analyzer::face_detector`].
///
/// Return [`CropError::ClassifierLoad`] when the detector cannot run at all
/// because its model is missing or corrupt; the analysis aborts. Any other
/// error is treated as a per-call failure and the analysis continues
/// without faces.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Result<Vec<Rect>>;
}

/// Run `detector` over `image` and keep the boxes large enough to matter.
///
/// Boxes are clipped to the image, filtered to those covering strictly more
/// than [`MIN_FACE_AREA_RATIO`] of it, and returned largest first.
pub fn locate(image: &RgbaImage, detector: &dyn FaceDetector) -> Result<Vec<Rect>> {
    let (width, height) = image.dimensions();
    let gray = image::imageops::grayscale(image);

    let boxes = match detector.detect(gray.as_raw(), width, height) {
        Ok(boxes) => boxes,
        Err(e @ CropError::ClassifierLoad(_)) => return Err(e),
        Err(e) => {
            warn!("face detection failed, continuing without faces: {e}");
            return Ok(Vec::new());
        }
    };
    let detected = boxes.len();

    let min_area = (width as f64 * height as f64) * MIN_FACE_AREA_RATIO;
    let mut faces: Vec<Rect> = boxes
        .into_iter()
        .map(|r| r.clamp_to(width, height))
        .filter(|r| r.area() as f64 > min_area)
        .collect();
    faces.sort_by(|a, b| {
        b.area()
            .cmp(&a.area())
            .then(a.min_y.cmp(&b.min_y))
            .then(a.min_x.cmp(&b.min_x))
    });

    debug!(
        "located {} face(s), {} below {:.0}px discarded",
        faces.len(),
        detected - faces.len(),
        min_area
    );
    Ok(faces)
}

/// Sum of `area(face) / area(crop)` over faces fully inside `crop`.
///
/// Partial overlaps contribute nothing.
pub fn face_score(crop: &Rect, faces: &[Rect]) -> f64 {
    let area = crop.area();
    if area == 0 {
        return 0.0;
    }
    faces
        .iter()
        .filter(|f| crop.contains_rect(f))
        .map(|f| f.area() as f64 / area as f64)
        .sum()
}
