use crate::error::{CropError, Result};

/// Named parameter sets.
///
/// A preset is only a fully-populated [`Config`]; there is no separate
/// code path behind it. Apply one with [`Config::preset`] and then override
/// individual fields as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Preset {
    /// General-purpose scoring, prescaling on, face detection off.
    ///
    /// - 8px feature sampling stride
    /// - candidate scales from 1.0 down to 0.9
    /// - light detail/skin/saturation weights
    #[default]
    General,

    /// Tuned for face-aware cropping.
    ///
    /// - heavier detail (5.2), skin (5.8) and saturation (5.5) weights
    /// - 2px feature sampling stride
    /// - full-size candidates only, no prescaling
    /// - face detection on; the classifier path must be filled in by the caller
    FaceDetect,
}

/// Every tunable of the analysis.
///
/// Weights and thresholds are all supplied up front; nothing in the engine
/// mutates a `Config` once an analysis starts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Config {
    /// Weight of the edge/detail accumulator in the total.
    pub detail_weight: f64,

    /// Added to the detail gate when accumulating skin.
    pub skin_bias: f64,
    /// Lower bound of normalized luma for a pixel to count as skin.
    pub skin_brightness_min: f64,
    /// Upper bound of normalized luma for a pixel to count as skin.
    pub skin_brightness_max: f64,
    /// Minimum skin similarity, in `[0, 1)`.
    pub skin_threshold: f64,
    /// Weight of the skin accumulator in the total.
    pub skin_weight: f64,

    /// Lower bound of normalized luma for a pixel to count as saturated.
    pub saturation_brightness_min: f64,
    /// Upper bound of normalized luma for a pixel to count as saturated.
    pub saturation_brightness_max: f64,
    /// Minimum HSL saturation, in `[0, 1)`.
    pub saturation_threshold: f64,
    /// Added to the detail gate when accumulating saturation.
    pub saturation_bias: f64,
    /// Weight of the saturation accumulator in the total.
    pub saturation_weight: f64,

    /// Feature-map sampling stride used while scoring a candidate.
    ///
    /// Roughly `step * min_scale` rounded down to a power of two works well.
    pub score_down_sample: u32,
    /// Pixel stride between candidate positions.
    pub step: u32,
    /// Decrement between candidate scales.
    pub scale_step: f64,
    /// Smallest candidate scale.
    pub min_scale: f64,
    /// Largest candidate scale.
    pub max_scale: f64,
    /// Fraction of the half-extent, measured from the crop border, that is
    /// penalized by `edge_weight`.
    pub edge_radius: f64,
    /// Border penalty multiplier. Negative.
    pub edge_weight: f64,
    /// Importance of every pixel outside the candidate. Negative.
    pub outside_importance: f64,
    /// Reward content sitting on the thirds lines of the crop.
    pub rule_of_thirds: bool,

    /// Downsample large sources before analysis.
    pub prescale: bool,
    /// Smaller source side is brought down to this many pixels when
    /// prescaling.
    pub prescale_min: f64,

    /// Locate faces and reward candidates that fully contain them.
    pub face_detect_enabled: bool,
    /// Path to the classifier model used by the built-in detector.
    pub face_detect_classifier: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detail_weight: 0.2,
            skin_bias: 0.01,
            skin_brightness_min: 0.2,
            skin_brightness_max: 1.0,
            skin_threshold: 0.8,
            skin_weight: 1.8,
            saturation_brightness_min: 0.05,
            saturation_brightness_max: 0.9,
            saturation_threshold: 0.4,
            saturation_bias: 0.2,
            saturation_weight: 0.3,
            score_down_sample: 8,
            step: 8,
            scale_step: 0.1,
            min_scale: 0.9,
            max_scale: 1.0,
            edge_radius: 0.4,
            edge_weight: -20.0,
            outside_importance: -0.5,
            rule_of_thirds: true,
            prescale: true,
            prescale_min: 400.0,
            face_detect_enabled: false,
            face_detect_classifier: String::new(),
        }
    }
}

impl Config {
    /// The general-purpose preset. Same as [`Config::default`].
    pub fn general() -> Self {
        Self::default()
    }

    /// The face-detection preset.
    pub fn face_detect() -> Self {
        Self {
            detail_weight: 5.2,
            skin_weight: 5.8,
            saturation_weight: 5.5,
            score_down_sample: 2,
            min_scale: 1.0,
            max_scale: 1.0,
            prescale: false,
            face_detect_enabled: true,
            ..Self::default()
        }
    }

    /// Replace every field with the values of `preset`.
    ///
    /// ```
    /// use focalcrop::{Config, Preset};
    ///
    /// let config = Config::default()
    ///     .preset(Preset::FaceDetect)
    ///     .face_detect_classifier("models/seeta_fd_frontal_v1.0.bin");
    /// assert!(config.face_detect_enabled);
    /// ```
    pub fn preset(self, preset: Preset) -> Self {
        match preset {
            Preset::General => Self::general(),
            Preset::FaceDetect => Self::face_detect(),
        }
    }

    /// Set the detail weight.
    pub fn detail_weight(mut self, weight: f64) -> Self {
        self.detail_weight = weight;
        self
    }

    /// Set the skin weight.
    pub fn skin_weight(mut self, weight: f64) -> Self {
        self.skin_weight = weight;
        self
    }

    /// Set the saturation weight.
    pub fn saturation_weight(mut self, weight: f64) -> Self {
        self.saturation_weight = weight;
        self
    }

    /// Set the border penalty multiplier.
    pub fn edge_weight(mut self, weight: f64) -> Self {
        self.edge_weight = weight;
        self
    }

    /// Set the scoring stride.
    pub fn score_down_sample(mut self, stride: u32) -> Self {
        self.score_down_sample = stride;
        self
    }

    /// Set the candidate position stride.
    pub fn step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// Set the candidate scale range.
    pub fn scale_range(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    /// Enable or disable the rule-of-thirds bonus.
    pub fn rule_of_thirds(mut self, enable: bool) -> Self {
        self.rule_of_thirds = enable;
        self
    }

    /// Enable or disable prescaling.
    pub fn prescale(mut self, enable: bool) -> Self {
        self.prescale = enable;
        self
    }

    /// Enable or disable face detection.
    pub fn face_detection(mut self, enable: bool) -> Self {
        self.face_detect_enabled = enable;
        self
    }

    /// Set the classifier model path used by the built-in detector.
    pub fn face_detect_classifier(mut self, path: impl Into<String>) -> Self {
        self.face_detect_classifier = path.into();
        self
    }

    /// Check that the parameters describe a terminating, well-defined search.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("detailWeight", self.detail_weight),
            ("skinBias", self.skin_bias),
            ("skinWeight", self.skin_weight),
            ("saturationBias", self.saturation_bias),
            ("saturationWeight", self.saturation_weight),
            ("edgeRadius", self.edge_radius),
            ("edgeWeight", self.edge_weight),
            ("outsideImportance", self.outside_importance),
            ("skinBrightnessMin", self.skin_brightness_min),
            ("skinBrightnessMax", self.skin_brightness_max),
            ("saturationBrightnessMin", self.saturation_brightness_min),
            ("saturationBrightnessMax", self.saturation_brightness_max),
        ];
        if let Some((name, _)) = weights.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite")));
        }

        for (name, threshold) in [
            ("skinThreshold", self.skin_threshold),
            ("saturationThreshold", self.saturation_threshold),
        ] {
            if !(0.0..1.0).contains(&threshold) {
                return Err(invalid(format!(
                    "{name} must be in [0, 1), got {threshold}"
                )));
            }
        }

        if self.score_down_sample == 0 {
            return Err(invalid("scoreDownSample must be > 0".into()));
        }
        if self.step == 0 {
            return Err(invalid("step must be > 0".into()));
        }
        if !(self.scale_step.is_finite() && self.scale_step > 0.0) {
            return Err(invalid(format!(
                "scaleStep must be > 0, got {}",
                self.scale_step
            )));
        }
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return Err(invalid(format!(
                "minScale must be > 0, got {}",
                self.min_scale
            )));
        }
        if !self.max_scale.is_finite() || self.min_scale > self.max_scale {
            return Err(invalid(format!(
                "minScale ({}) must not exceed maxScale ({})",
                self.min_scale, self.max_scale
            )));
        }
        if self.prescale && !(self.prescale_min.is_finite() && self.prescale_min >= 1.0) {
            return Err(invalid(format!(
                "prescaleMin must be >= 1, got {}",
                self.prescale_min
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> CropError {
    CropError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
        Config::face_detect().validate().unwrap();
    }

    #[test]
    fn face_detect_preset_differs_only_in_tuning() {
        let general = Config::general();
        let face = Config::face_detect();
        assert_eq!(face.detail_weight, 5.2);
        assert_eq!(face.skin_weight, 5.8);
        assert_eq!(face.saturation_weight, 5.5);
        assert_eq!(face.score_down_sample, 2);
        assert!(face.face_detect_enabled);
        assert!(!face.prescale);
        assert_eq!(face.edge_weight, general.edge_weight);
        assert_eq!(face.skin_threshold, general.skin_threshold);
    }

    #[test]
    fn preset_replaces_everything() {
        let config = Config::default()
            .detail_weight(9.0)
            .preset(Preset::General);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn preset_can_be_overridden() {
        let config = Config::default()
            .preset(Preset::FaceDetect)
            .face_detection(false)
            .face_detect_classifier("model.bin");
        assert!(!config.face_detect_enabled);
        assert_eq!(config.face_detect_classifier, "model.bin");
        assert_eq!(config.detail_weight, 5.2);
    }

    #[test]
    fn zero_strides_rejected() {
        assert!(matches!(
            Config::default().step(0).validate(),
            Err(CropError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::default().score_down_sample(0).validate(),
            Err(CropError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_positive_scale_step_rejected() {
        let config = Config {
            scale_step: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_scale_range_rejected() {
        assert!(Config::default().scale_range(1.0, 0.5).validate().is_err());
        assert!(Config::default().scale_range(0.0, 1.0).validate().is_err());
    }

    #[test]
    fn threshold_of_one_rejected() {
        let config = Config {
            skin_threshold: 1.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_weight_rejected() {
        assert!(Config::default().detail_weight(f64::NAN).validate().is_err());
    }
}
