//! Content-aware cropping: pick the most interesting region of an image for a
//! given aspect ratio.
//!
//! Candidate crops are scored against three per-pixel feature maps (edge
//! detail, skin tone and colour saturation) weighted by a positional
//! importance function that favours the crop centre and the rule-of-thirds
//! lines. Optional face boxes from a pluggable [`FaceDetector`] add a bonus
//! for every face a candidate fully contains.
//!
//! # Example
//!
//! ```no_run
//! use focalcrop::{Analyzer, Config};
//!
//! let img = image::open("photo.jpg").unwrap();
//! let crop = Analyzer::new(Config::default())
//!     .find_best_crop(&img, 250, 250)
//!     .unwrap();
//! println!("best square crop: {crop:?}");
//!
//! let thumb = focalcrop::crop_image(&img, crop);
//! thumb.save("thumb.jpg").unwrap();
//! ```
#![warn(missing_docs)]

use std::borrow::Cow;

use image::{DynamicImage, RgbaImage};
use log::{debug, Level};

/// Candidate generation.
pub mod candidates;
/// Analysis parameters and presets.
pub mod config;
mod error;
/// Face detection seam and face scoring.
pub mod faces;
pub mod features;
/// Integer rectangles.
pub mod geometry;
/// Analysis geometry and downsampling.
pub mod prescale;
/// Resampling seam.
pub mod resize;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
pub mod score;
pub mod telemetry;

/// A scored crop proposal.
pub use candidates::Candidate;
/// Analysis parameters and named presets.
pub use config::{Config, Preset};
/// Error type and result alias returned by focalcrop operations.
pub use error::{CropError, Result};
/// Face detection trait.
pub use faces::FaceDetector;
/// Crop rectangle.
pub use geometry::Rect;
/// Resampling trait and its `image`-backed default.
pub use resize::{ImageResizer, Resizer};
#[cfg(feature = "rustface")]
/// Detector that loads a SeetaFace model from disk or memory.
pub use rustface_backend::RustfaceDetector;
/// Per-candidate score breakdown.
pub use score::Score;

use prescale::Plan;
use telemetry::timing_guard;

/// Diagnostics for one analysis, in native image coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analysis {
    /// The winning candidate, rescaled to native resolution.
    pub best: Candidate,
    /// How many candidates were scored.
    pub candidate_count: usize,
    /// `analysis / native` scale the features were computed at.
    pub prescale_factor: f64,
    /// Faces that contributed to scoring, largest first.
    pub faces: Vec<Rect>,
}

/// Builder for crop analysis.
///
/// Holds the configuration and the pluggable resizer and face detector. One
/// analyzer can serve any number of images; it keeps no per-image state.
pub struct Analyzer {
    config: Config,
    resizer: Box<dyn Resizer>,
    /// User-provided face detector. When `None` and face detection is
    /// enabled, the built-in rustface backend is loaded from
    /// `Config::face_detect_classifier`.
    detector: Option<Box<dyn FaceDetector>>,
}

/// Scored candidates and faces, still in analysis space.
struct Run {
    plan: Plan,
    candidates: Vec<Candidate>,
    faces: Vec<Rect>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Analyzer {
    /// Create an analyzer with `config` and the default bicubic resizer.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            resizer: Box::new(ImageResizer::default()),
            detector: None,
        }
    }

    /// Replace the resampling backend used for prescaling.
    pub fn resizer(mut self, resizer: Box<dyn Resizer>) -> Self {
        self.resizer = resizer;
        self
    }

    /// Provide a custom face detector implementation.
    ///
    /// The detector is only consulted when face detection is enabled in the
    /// configuration (or through [`Analyzer::find_faces`]).
    ///
    /// ```no_run
    /// use focalcrop::{Analyzer, Config, FaceDetector, Rect, Result};
    ///
    /// struct MyDetector;
    /// impl FaceDetector for MyDetector {
    ///     fn detect(&self, gray: &[u8], width: u32, height: u32) -> Result<Vec<Rect>> {
    ///         // Your detection logic here
    ///         Ok(vec![])
    ///     }
    /// }
    ///
    /// let img = image::open("portrait.jpg").unwrap();
    /// let crop = Analyzer::new(Config::face_detect())
    ///     .face_detector(Box::new(MyDetector))
    ///     .find_best_crop(&img, 3, 4)
    ///     .unwrap();
    /// ```
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Best crop of `image` with the aspect ratio `width : height`.
    ///
    /// Either dimension may be 0, meaning the other axis alone decides the
    /// scale and the open axis is square. The result is in native pixel
    /// coordinates and lies inside the image.
    pub fn find_best_crop(&self, image: &DynamicImage, width: u32, height: u32) -> Result<Rect> {
        self.analyze(image, width, height).map(|a| a.best.rect)
    }

    /// Every scored candidate in generation order (scale, then y, then x),
    /// in native pixel coordinates. Callers sort as they see fit.
    pub fn find_all_crops(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<Vec<Candidate>> {
        let run = self.run(image, width, height)?;
        let plan = run.plan;
        Ok(run
            .candidates
            .into_iter()
            .map(|c| Candidate {
                rect: plan.to_native(c.rect),
                score: c.score,
            })
            .collect())
    }

    /// Best crop together with its score and the analysis diagnostics.
    pub fn analyze(&self, image: &DynamicImage, width: u32, height: u32) -> Result<Analysis> {
        let run = self.run(image, width, height)?;
        let top = score::best(&run.candidates).ok_or(CropError::NoCandidates)?;
        let best = Candidate {
            rect: run.plan.to_native(top.rect),
            score: top.score,
        };
        debug!(
            "best crop {:?} scored {:.4} out of {} candidates",
            best.rect,
            best.score.total,
            run.candidates.len()
        );

        Ok(Analysis {
            best,
            candidate_count: run.candidates.len(),
            prescale_factor: run.plan.prescale_factor,
            faces: run
                .faces
                .into_iter()
                .map(|f| run.plan.to_native(f))
                .collect(),
        })
    }

    /// Detect faces in `image`, in native pixel coordinates, largest first.
    ///
    /// Runs regardless of `Config::face_detect_enabled`; the image is
    /// prescaled first when the configuration asks for it.
    pub fn find_faces(&self, image: &DynamicImage) -> Result<Vec<Rect>> {
        self.config.validate()?;
        let (w, h) = (image.width(), image.height());
        if w == 0 || h == 0 {
            return Err(CropError::ZeroDimensions);
        }
        let plan = prescale::plan(w, h, w, h, &self.config)?;

        let rgba = rgba(image);
        let analysed = prescale::prepare(&rgba, &plan, self.resizer.as_ref());
        let faces = self.with_detector(|d| faces::locate(&analysed, d))?;
        Ok(faces.into_iter().map(|f| plan.to_native(f)).collect())
    }

    /// Decode `bytes` (JPEG, PNG or WebP) and run [`Analyzer::find_best_crop`].
    pub fn find_best_crop_from_bytes(&self, bytes: &[u8], width: u32, height: u32) -> Result<Rect> {
        self.find_best_crop(&decode(bytes)?, width, height)
    }

    /// Decode `bytes` (JPEG, PNG or WebP) and run [`Analyzer::find_all_crops`].
    pub fn find_all_crops_from_bytes(
        &self,
        bytes: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Candidate>> {
        self.find_all_crops(&decode(bytes)?, width, height)
    }

    fn run(&self, image: &DynamicImage, width: u32, height: u32) -> Result<Run> {
        let _total = timing_guard("crop analysis", Level::Debug);
        self.config.validate()?;
        let plan = prescale::plan(image.width(), image.height(), width, height, &self.config)?;

        let rgba = rgba(image);
        let analysed = {
            let _t = timing_guard("prescale", Level::Trace);
            prescale::prepare(&rgba, &plan, self.resizer.as_ref())
        };

        let faces = if self.config.face_detect_enabled {
            let _t = timing_guard("face detection", Level::Trace);
            self.with_detector(|d| faces::locate(&analysed, d))?
        } else {
            Vec::new()
        };

        let features = {
            let _t = timing_guard("feature extraction", Level::Trace);
            features::extract(&analysed, &self.config)
        };

        let mut candidates = candidates::generate(
            plan.analysis_width,
            plan.analysis_height,
            plan.crop_width,
            plan.crop_height,
            plan.real_min_scale,
            &self.config,
        );
        debug!("generated {} candidates", candidates.len());

        {
            let _t = timing_guard("scoring", Level::Trace);
            score::score_all(&features, &mut candidates, &faces, &self.config);
        }

        Ok(Run {
            plan,
            candidates,
            faces,
        })
    }

    /// Run `f` with the configured detector, loading the built-in one if
    /// none was supplied.
    fn with_detector<T>(&self, f: impl FnOnce(&dyn FaceDetector) -> Result<T>) -> Result<T> {
        match &self.detector {
            Some(d) => f(d.as_ref()),
            None => {
                let loaded = load_classifier(&self.config.face_detect_classifier)?;
                f(loaded.as_ref())
            }
        }
    }
}

/// Best crop using the general preset and the default resizer.
pub fn find_best_crop(image: &DynamicImage, width: u32, height: u32) -> Result<Rect> {
    Analyzer::default().find_best_crop(image, width, height)
}

/// Every candidate using the general preset and the default resizer.
pub fn find_all_crops(image: &DynamicImage, width: u32, height: u32) -> Result<Vec<Candidate>> {
    Analyzer::default().find_all_crops(image, width, height)
}

/// Cut `rect` out of `image`, clipped to the image bounds.
pub fn crop_image(image: &DynamicImage, rect: Rect) -> DynamicImage {
    let r = rect.canon().clamp_to(image.width(), image.height());
    image.crop_imm(
        r.min_x as u32,
        r.min_y as u32,
        r.width() as u32,
        r.height() as u32,
    )
}

fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| CropError::Decode(e.to_string()))
}

fn rgba(image: &DynamicImage) -> Cow<'_, RgbaImage> {
    match image.as_rgba8() {
        Some(buf) => Cow::Borrowed(buf),
        None => Cow::Owned(image.to_rgba8()),
    }
}

#[cfg(feature = "rustface")]
fn load_classifier(path: &str) -> Result<Box<dyn FaceDetector>> {
    if path.is_empty() {
        return Err(CropError::ClassifierLoad(
            "face detection is enabled but no classifier is configured".into(),
        ));
    }
    Ok(Box::new(RustfaceDetector::from_file(path)?))
}

#[cfg(not(feature = "rustface"))]
fn load_classifier(path: &str) -> Result<Box<dyn FaceDetector>> {
    Err(CropError::ClassifierLoad(if path.is_empty() {
        "face detection is enabled but no detector or classifier is configured".into()
    } else {
        format!("{path}: built without the `rustface` feature")
    }))
}
