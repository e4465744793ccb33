//! Per-pixel feature maps: edge energy, skin likelihood and saturation.
//!
//! The three maps share one RGBA buffer so the scorer reads all of them with
//! a single pixel fetch: R holds skin, G holds edge/detail and B holds
//! saturation. Each extractor only reads the source pixels and only produces
//! its own channel.

use image::{Rgba, RgbaImage};

use crate::config::Config;

/// Reference skin tone direction in RGB space.
const SKIN_COLOR: [f64; 3] = [0.78, 0.57, 0.44];

/// Edge, skin and saturation intensities in `[0, 255]`.
#[derive(Debug, Clone)]
pub struct FeatureMap {
    buffer: RgbaImage,
}

impl FeatureMap {
    /// Width of the analysed image.
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Height of the analysed image.
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Skin likelihood at `(x, y)`.
    pub fn skin(&self, x: u32, y: u32) -> u8 {
        self.buffer.get_pixel(x, y)[0]
    }

    /// Edge/detail intensity at `(x, y)`.
    pub fn detail(&self, x: u32, y: u32) -> u8 {
        self.buffer.get_pixel(x, y)[1]
    }

    /// Saturation intensity at `(x, y)`.
    pub fn saturation(&self, x: u32, y: u32) -> u8 {
        self.buffer.get_pixel(x, y)[2]
    }

    /// `[skin, detail, saturation]` at `(x, y)`.
    pub(crate) fn sample(&self, x: u32, y: u32) -> [u8; 3] {
        let Rgba([r, g, b, _]) = *self.buffer.get_pixel(x, y);
        [r, g, b]
    }

    /// The packed buffer, for debug rendering.
    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }
}

/// Run all three extractors over `image`.
pub fn extract(image: &RgbaImage, config: &Config) -> FeatureMap {
    let lumas = luma_plane(image);

    let (edge, (skin, sat)) = join(
        || edge_plane(&lumas, image.width(), image.height()),
        || {
            join(
                || skin_plane(image, &lumas, config),
                || saturation_plane(image, &lumas, config),
            )
        },
    );

    let mut buffer = RgbaImage::new(image.width(), image.height());
    for (i, pixel) in buffer.pixels_mut().enumerate() {
        *pixel = Rgba([skin[i], edge[i], sat[i], 255]);
    }
    FeatureMap { buffer }
}

#[cfg(feature = "parallel")]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}

/// Perceptual luma with the weights the scorer was tuned against.
pub(crate) fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.0722 * r as f64 + 0.7152 * g as f64 + 0.5126 * b as f64
}

/// HSL saturation in `[0, 1]`.
pub(crate) fn saturation(r: u8, g: u8, b: u8) -> f64 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return 0.0;
    }
    let max = max as f64 / 255.0;
    let min = min as f64 / 255.0;

    let l = (max + min) / 2.0;
    let d = max - min;
    if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    }
}

/// Similarity to the reference skin tone; 1.0 is an exact hue match.
pub(crate) fn skin_similarity(r: u8, g: u8, b: u8) -> f64 {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let mag = (r * r + g * g + b * b).sqrt();
    if mag == 0.0 {
        return 0.0;
    }
    let rd = r / mag - SKIN_COLOR[0];
    let gd = g / mag - SKIN_COLOR[1];
    let bd = b / mag - SKIN_COLOR[2];
    1.0 - (rd * rd + gd * gd + bd * bd).sqrt()
}

fn clamp_channel(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Threshold-and-band gate shared by the skin and saturation maps.
fn gated(raw: f64, lightness: f64, threshold: f64, min: f64, max: f64) -> u8 {
    if raw > threshold && lightness >= min && lightness <= max {
        clamp_channel((raw - threshold) * (255.0 / (1.0 - threshold)))
    } else {
        0
    }
}

fn luma_plane(image: &RgbaImage) -> Vec<f64> {
    image
        .pixels()
        .map(|&Rgba([r, g, b, _])| luma(r, g, b))
        .collect()
}

fn edge_plane(lumas: &[f64], width: u32, height: u32) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let mut out = vec![0u8; w * h];
    // Border pixels have no full neighbourhood and stay at 0.
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let i = y * w + x;
            let lightness =
                lumas[i] * 4.0 - lumas[i - w] - lumas[i - 1] - lumas[i + 1] - lumas[i + w];
            out[i] = clamp_channel(lightness);
        }
    }
    out
}

fn skin_plane(image: &RgbaImage, lumas: &[f64], config: &Config) -> Vec<u8> {
    image
        .pixels()
        .zip(lumas)
        .map(|(&Rgba([r, g, b, _]), &l)| {
            gated(
                skin_similarity(r, g, b),
                l / 255.0,
                config.skin_threshold,
                config.skin_brightness_min,
                config.skin_brightness_max,
            )
        })
        .collect()
}

fn saturation_plane(image: &RgbaImage, lumas: &[f64], config: &Config) -> Vec<u8> {
    image
        .pixels()
        .zip(lumas)
        .map(|(&Rgba([r, g, b, _]), &l)| {
            gated(
                saturation(r, g, b),
                l / 255.0,
                config.saturation_threshold,
                config.saturation_brightness_min,
                config.saturation_brightness_max,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn uniform_grey_has_no_features() {
        let map = extract(&solid(6, 5, [128, 128, 128]), &Config::default());
        for y in 0..5 {
            for x in 0..6 {
                assert_eq!(map.detail(x, y), 0);
                assert_eq!(map.skin(x, y), 0);
                assert_eq!(map.saturation(x, y), 0);
            }
        }
    }

    #[test]
    fn bright_pixel_produces_edge_and_border_stays_zero() {
        let mut img = solid(5, 5, [0, 0, 0]);
        img.put_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let map = extract(&img, &Config::default());
        assert_eq!(map.detail(2, 2), 255);
        // Dark neighbours see a negative response, clamped to 0.
        assert_eq!(map.detail(1, 2), 0);
        for i in 0..5 {
            assert_eq!(map.detail(i, 0), 0);
            assert_eq!(map.detail(0, i), 0);
            assert_eq!(map.detail(i, 4), 0);
            assert_eq!(map.detail(4, i), 0);
        }
    }

    #[test]
    fn border_pixels_are_zero_even_with_contrast() {
        let mut img = solid(4, 4, [0, 0, 0]);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        img.put_pixel(3, 1, Rgba([255, 255, 255, 255]));
        let map = extract(&img, &Config::default());
        assert_eq!(map.detail(0, 0), 0);
        assert_eq!(map.detail(3, 1), 0);
    }

    #[test]
    fn tiny_images_do_not_panic() {
        let map = extract(&solid(1, 1, [200, 10, 10]), &Config::default());
        assert_eq!(map.detail(0, 0), 0);
        let map = extract(&solid(2, 3, [200, 10, 10]), &Config::default());
        assert_eq!(map.width(), 2);
        assert_eq!(map.height(), 3);
    }

    #[test]
    fn skin_tone_lights_up_skin_channel() {
        // Parallel to the reference vector, mid brightness.
        let map = extract(&solid(3, 3, [199, 145, 112]), &Config::default());
        assert!(map.skin(1, 1) > 150, "skin = {}", map.skin(1, 1));
    }

    #[test]
    fn pure_green_is_not_skin() {
        let map = extract(&solid(3, 3, [0, 255, 0]), &Config::default());
        assert_eq!(map.skin(1, 1), 0);
    }

    #[test]
    fn saturated_colour_lights_up_saturation_channel() {
        // Pure green: saturation 1.0, lightness 0.715 within [0.05, 0.9].
        let map = extract(&solid(3, 3, [0, 255, 0]), &Config::default());
        assert!(map.saturation(1, 1) >= 254);
    }

    #[test]
    fn saturation_outside_brightness_band_is_gated() {
        // White has no saturation at all.
        let map = extract(&solid(3, 3, [255, 255, 255]), &Config::default());
        assert_eq!(map.saturation(1, 1), 0);
        // Very dark red: lightness below saturation_brightness_min.
        let map = extract(&solid(3, 3, [20, 0, 0]), &Config::default());
        assert_eq!(map.saturation(1, 1), 0);
    }

    #[test]
    fn black_pixels_have_zero_skin_similarity() {
        assert_eq!(skin_similarity(0, 0, 0), 0.0);
    }

    #[test]
    fn hsl_saturation_values() {
        assert_eq!(saturation(10, 10, 10), 0.0);
        assert!((saturation(255, 0, 0) - 1.0).abs() < 1e-12);
        // max 0.8, min 0.4, l = 0.6 > 0.5 -> 0.4 / (2 - 1.2) = 0.5
        assert!((saturation(204, 102, 102) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn luma_weights() {
        assert!((luma(255, 0, 0) - 0.0722 * 255.0).abs() < 1e-9);
        assert!((luma(0, 0, 255) - 0.5126 * 255.0).abs() < 1e-9);
    }

    #[test]
    fn channels_are_independent() {
        let mut img = solid(5, 5, [0, 0, 0]);
        img.put_pixel(2, 2, Rgba([0, 255, 0, 255]));
        let map = extract(&img, &Config::default());
        let [skin, detail, sat] = map.sample(2, 2);
        assert_eq!(skin, 0);
        assert_eq!(detail, 255);
        assert!(sat >= 254);
        assert_eq!(map.as_image().get_pixel(2, 2)[3], 255);
    }
}
