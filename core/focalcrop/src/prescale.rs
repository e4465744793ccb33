use std::borrow::Cow;

use image::RgbaImage;
use log::debug;

use crate::config::Config;
use crate::error::{CropError, Result};
use crate::geometry::Rect;
use crate::resize::Resizer;

/// Geometry of one analysis, in prescaled (analysis) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plan {
    /// Native source width.
    pub source_width: u32,
    /// Native source height.
    pub source_height: u32,
    /// `analysis / native`, at most 1.
    pub prescale_factor: f64,
    /// Width of the image the features are computed on.
    pub analysis_width: u32,
    /// Height of the image the features are computed on.
    pub analysis_height: u32,
    /// Full-scale crop width; 0 when the caller left width open.
    pub crop_width: f64,
    /// Full-scale crop height; 0 when the caller left height open.
    pub crop_height: f64,
    /// Smallest candidate scale worth generating.
    pub real_min_scale: f64,
}

impl Plan {
    /// Map an analysis-space rectangle back to native resolution.
    pub fn to_native(&self, rect: Rect) -> Rect {
        rect.unscale(self.prescale_factor)
            .clamp_to(self.source_width, self.source_height)
    }
}

/// Work out the analysis geometry for cropping a `source_width` ×
/// `source_height` image to a `target_width` × `target_height` aspect.
pub fn plan(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
    config: &Config,
) -> Result<Plan> {
    if target_width == 0 && target_height == 0 {
        return Err(CropError::InvalidDimensions);
    }
    if source_width == 0 || source_height == 0 {
        return Err(CropError::ZeroDimensions);
    }

    let (src_w, src_h) = (source_width as f64, source_height as f64);
    // A zero target gives an infinite ratio, leaving the other axis in charge.
    let scale = (src_w / target_width as f64).min(src_h / target_height as f64);

    let prescale_factor = prescale_factor(source_width, source_height, config);
    let analysis_width = ((src_w * prescale_factor) as u32).max(1);
    let analysis_height = ((src_h * prescale_factor) as u32).max(1);

    let crop_width = (target_width as f64 * scale * prescale_factor)
        .trunc()
        .min(analysis_width as f64);
    let crop_height = (target_height as f64 * scale * prescale_factor)
        .trunc()
        .min(analysis_height as f64);

    let real_min_scale = config.max_scale.min((1.0 / scale).max(config.min_scale));

    let plan = Plan {
        source_width,
        source_height,
        prescale_factor,
        analysis_width,
        analysis_height,
        crop_width,
        crop_height,
        real_min_scale,
    };
    debug!(
        "source {source_width}x{source_height}, scale {scale:.4}, prescale {prescale_factor:.4}, \
         crop {crop_width}x{crop_height}, min scale {real_min_scale:.3}"
    );
    Ok(plan)
}

/// Factor that brings the shorter side down to `prescale_min`, or 1.0.
pub fn prescale_factor(width: u32, height: u32, config: &Config) -> f64 {
    if !config.prescale {
        return 1.0;
    }
    let f = config.prescale_min / width.min(height) as f64;
    if f < 1.0 {
        f
    } else {
        1.0
    }
}

/// Produce the pixel buffer the features are computed on.
pub fn prepare<'a>(image: &'a RgbaImage, plan: &Plan, resizer: &dyn Resizer) -> Cow<'a, RgbaImage> {
    if plan.prescale_factor >= 1.0 {
        return Cow::Borrowed(image);
    }
    Cow::Owned(resizer.resize(image, plan.analysis_width, plan.analysis_height))
}
