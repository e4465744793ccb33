//! Candidate scoring against the feature map.

use crate::candidates::Candidate;
use crate::config::Config;
use crate::faces;
use crate::features::FeatureMap;
use crate::geometry::Rect;

/// Accumulated evidence for one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    /// Importance-weighted skin response.
    pub skin: f64,
    /// Importance-weighted edge/detail response.
    pub detail: f64,
    /// Importance-weighted saturation response.
    pub saturation: f64,
    /// Share of the candidate area covered by fully contained faces.
    pub face: f64,
    /// Area-normalized weighted sum plus the face term.
    pub total: f64,
}

impl Score {
    /// `(detail*wd + skin*ws + saturation*wsat) / area + face`.
    pub fn total_for(&self, area: i64, config: &Config) -> f64 {
        if area <= 0 {
            return self.face;
        }
        (self.detail * config.detail_weight
            + self.skin * config.skin_weight
            + self.saturation * config.saturation_weight)
            / area as f64
            + self.face
    }
}

/// Peaks at 1.0 on the thirds lines of the normalized distance from centre.
fn thirds(x: f64) -> f64 {
    let x = (((x - 1.0 / 3.0 + 1.0) % 2.0) * 0.5 - 0.5) * 16.0;
    (1.0 - x * x).max(0.0)
}

/// Positional weight of pixel `(x, y)` for a crop `rect`.
pub fn importance(rect: &Rect, x: i32, y: i32, config: &Config) -> f64 {
    if !rect.contains_point(x, y) {
        return config.outside_importance;
    }

    let xf = (x - rect.min_x) as f64 / rect.width() as f64;
    let yf = (y - rect.min_y) as f64 / rect.height() as f64;

    let px = (0.5 - xf).abs() * 2.0;
    let py = (0.5 - yf).abs() * 2.0;

    let dx = (px - 1.0 + config.edge_radius).max(0.0);
    let dy = (py - 1.0 + config.edge_radius).max(0.0);
    let d = (dx * dx + dy * dy) * config.edge_weight;

    let mut s = 1.41 - (px * px + py * py).sqrt();
    if config.rule_of_thirds {
        s += ((s + d + 0.5).max(0.0) * 1.2) * (thirds(px) + thirds(py));
    }

    s + d
}

/// Score one crop against the feature map and the located faces.
///
/// `faces` is ignored unless face detection is enabled in `config`.
pub fn score(features: &FeatureMap, rect: &Rect, faces: &[Rect], config: &Config) -> Score {
    let (width, height) = (features.width(), features.height());
    let ds = config.score_down_sample.max(1);
    let mut score = Score::default();

    let mut y = 0;
    while y + ds <= height {
        let mut x = 0;
        while x + ds <= width {
            let [skin, detail, sat] = features.sample(x, y);
            let imp = importance(rect, x as i32, y as i32, config);
            let det = detail as f64 / 255.0;

            score.skin += skin as f64 / 255.0 * (det + config.skin_bias) * imp;
            score.detail += det * imp;
            score.saturation += sat as f64 / 255.0 * (det + config.saturation_bias) * imp;
            x += ds;
        }
        y += ds;
    }

    if config.face_detect_enabled {
        score.face = faces::face_score(rect, faces);
    }
    score.total = score.total_for(rect.area(), config);
    score
}

/// Score every candidate in place. Each candidate only writes its own slot.
pub fn score_all(
    features: &FeatureMap,
    candidates: &mut [Candidate],
    faces: &[Rect],
    config: &Config,
) {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        candidates
            .par_iter_mut()
            .for_each(|c| c.score = score(features, &c.rect, faces, config));
    }
    #[cfg(not(feature = "parallel"))]
    for c in candidates.iter_mut() {
        c.score = score(features, &c.rect, faces, config);
    }
}

/// First candidate with the strictly greatest total.
pub fn best(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut top: Option<&Candidate> = None;
    for c in candidates {
        match top {
            Some(t) if c.score.total <= t.score.total => {}
            _ => top = Some(c),
        }
    }
    top
}
