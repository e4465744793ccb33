use std::io::Cursor;
use std::path::Path;

use log::debug;

use crate::error::{CropError, Result};
use crate::faces::FaceDetector;
use crate::geometry::Rect;

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is read once at construction; each call to
/// [`FaceDetector::detect`] builds a fresh detector around a clone of it, so
/// one instance can be shared across threads.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace model file (e.g. `seeta_fd_frontal_v1.0.bin`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| CropError::ClassifierLoad(format!("{}: {e}", path.display())))?;
        debug!("loaded face model from {}", path.display());
        Self::from_bytes(&data)
    }

    /// Load a SeetaFace model from memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(CropError::ClassifierLoad("model data is empty".into()));
        }
        let model = rustface::read_model(Cursor::new(data))
            .map_err(|e| CropError::ClassifierLoad(e.to_string()))?;
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Result<Vec<Rect>> {
        let expected = width as usize * height as usize;
        if gray.len() != expected {
            return Err(CropError::Detector(format!(
                "expected {expected} gray bytes, got {}",
                gray.len()
            )));
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                Rect::from_xywh(
                    bbox.x(),
                    bbox.y(),
                    bbox.width() as i32,
                    bbox.height() as i32,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_classifier_load_error() {
        let err = RustfaceDetector::from_file("/nonexistent/seeta_fd.bin").err();
        assert!(matches!(err, Some(CropError::ClassifierLoad(_))));
    }

    #[test]
    fn empty_model_is_a_classifier_load_error() {
        assert!(matches!(
            RustfaceDetector::from_bytes(&[]).err(),
            Some(CropError::ClassifierLoad(_))
        ));
    }
}
