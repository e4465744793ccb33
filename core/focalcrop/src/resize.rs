use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Pluggable resampling backend used for prescaling.
///
/// Implement this to route prescaling through a SIMD or GPU resizer.
pub trait Resizer: Send + Sync {
    /// Resample `image` to `width` × `height`.
    ///
    /// A zero on one axis means "preserve the aspect ratio" on that axis.
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage;
}

/// Resizer backed by `image::imageops::resize`.
#[derive(Debug, Clone, Copy)]
pub struct ImageResizer {
    filter: FilterType,
}

impl ImageResizer {
    /// Create a resizer with the given sampling filter.
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for ImageResizer {
    /// Bicubic (Catmull-Rom) sampling.
    fn default() -> Self {
        Self::new(FilterType::CatmullRom)
    }
}

impl Resizer for ImageResizer {
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        let (width, height) = resolve_dimensions(image.width(), image.height(), width, height);
        imageops::resize(image, width, height, self.filter)
    }
}

/// Fill in a zero axis from the source aspect ratio. Both zero keeps the
/// source size.
pub(crate) fn resolve_dimensions(src_w: u32, src_h: u32, width: u32, height: u32) -> (u32, u32) {
    match (width, height) {
        (0, 0) => (src_w, src_h),
        (0, h) => {
            let w = (src_w as f64 * h as f64 / src_h.max(1) as f64).round() as u32;
            (w.max(1), h)
        }
        (w, 0) => {
            let h = (src_h as f64 * w as f64 / src_w.max(1) as f64).round() as u32;
            (w, h.max(1))
        }
        (w, h) => (w, h),
    }
}
