use crate::config::Config;
use crate::geometry::Rect;
use crate::score::Score;

/// Tolerance on the scale sweep so a scale that should equal the minimum
/// is not dropped to float rounding.
const SCALE_EPSILON: f64 = 1e-9;

/// A crop proposal and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Proposed crop.
    pub rect: Rect,
    /// Filled in once by the scorer.
    pub score: Score,
}

impl Candidate {
    pub(crate) fn new(rect: Rect) -> Self {
        Self {
            rect,
            score: Score::default(),
        }
    }
}

/// Enumerate crop rectangles over scale, then y, then x.
///
/// Scales run from `config.max_scale` down to `real_min_scale` inclusive in
/// `config.scale_step` decrements; positions advance by `config.step`. A
/// zero crop dimension falls back to the image's shorter side. Identical
/// rectangles emitted at different scales are kept.
pub fn generate(
    width: u32,
    height: u32,
    crop_width: f64,
    crop_height: f64,
    real_min_scale: f64,
    config: &Config,
) -> Vec<Candidate> {
    let min_dimension = width.min(height) as f64;
    let crop_w = if crop_width != 0.0 {
        crop_width
    } else {
        min_dimension
    };
    let crop_h = if crop_height != 0.0 {
        crop_height
    } else {
        min_dimension
    };
    let (width, height) = (width as f64, height as f64);
    let step = config.step as usize;

    let mut out = Vec::new();
    for i in 0u32.. {
        let scale = config.max_scale - i as f64 * config.scale_step;
        if scale < real_min_scale - SCALE_EPSILON {
            break;
        }
        let (w, h) = (crop_w * scale, crop_h * scale);
        if w < 1.0 || h < 1.0 {
            break;
        }

        for y in (0..).step_by(step).take_while(|&y| y as f64 + h <= height) {
            for x in (0..).step_by(step).take_while(|&x| x as f64 + w <= width) {
                out.push(Candidate::new(Rect::from_xywh(
                    x,
                    y,
                    w.trunc() as i32,
                    h.trunc() as i32,
                )));
            }
        }
    }
    out
}
