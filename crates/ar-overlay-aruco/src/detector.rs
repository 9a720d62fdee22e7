//! End-to-end marker detection: candidates -> decode -> match -> dedup.

use crate::decode::decode_quad;
use crate::matcher::Matcher;
use crate::quads::find_quad_candidates;
use crate::Dictionary;
use ar_overlay_core::GrayImageView;
use nalgebra::Point2;
use std::collections::HashSet;

/// Detection-stage tunables.
#[derive(Clone, Debug)]
pub struct DetectorParams {
    /// Minimum candidate side length in pixels.
    pub min_side_px: f32,
    /// Maximum bounding-box aspect ratio for candidates (and its inverse).
    pub max_aspect_ratio: f32,
    /// Accepted dark-pixel fill ratio range for candidate components.
    pub min_fill: f32,
    pub max_fill: f32,
    /// Fraction of the quad side to inset the sample lattice (0.0..~0.08).
    pub inset_frac: f32,
    /// Require border-black ratio >= this.
    pub min_border_score: f32,
    /// Maximum Hamming distance for dictionary matching.
    pub max_hamming: u8,
    /// If true, keep only the best detection per marker id.
    pub dedup_by_id: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_side_px: 14.0,
            max_aspect_ratio: 1.5,
            min_fill: 0.2,
            max_fill: 0.95,
            inset_frac: 0.05,
            min_border_score: 0.85,
            max_hamming: 0,
            dedup_by_id: true,
        }
    }
}

/// One decoded marker.
#[derive(Clone, Debug)]
pub struct MarkerDetection {
    pub id: u32,
    /// Quarter turns clockwise the marker appears rotated in the scene.
    pub rotation: u8,
    pub hamming: u8,
    /// Combined border / Hamming quality in [0, 1].
    pub score: f32,
    pub border_score: f32,
    /// Observed inner bits (row-major, black = 1).
    pub code: u64,
    /// Whether the decoder inverted polarity.
    pub inverted: bool,
    /// Corners in image space, canonical marker order: corner 0 is the
    /// marker's own top-left, then clockwise, regardless of scene rotation.
    pub corners: [Point2<f32>; 4],
}

/// Scene-level ArUco detector for a fixed dictionary.
pub struct ArucoDetector {
    params: DetectorParams,
    matcher: Matcher,
}

impl ArucoDetector {
    pub fn new(dict: Dictionary, params: DetectorParams) -> Self {
        let matcher = Matcher::new(dict, params.max_hamming);
        Self { params, matcher }
    }

    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    #[inline]
    pub fn dictionary(&self) -> &Dictionary {
        self.matcher.dictionary()
    }

    /// Detect markers in a grayscale scene.
    pub fn detect(&self, img: &GrayImageView<'_>) -> Vec<MarkerDetection> {
        let candidates = find_quad_candidates(img, &self.params);
        log::debug!("quad candidates: {}", candidates.len());

        let bits = self.matcher.dictionary().marker_size();
        let bit_count = self.matcher.dictionary().bit_count().max(1) as f32;

        let mut out = Vec::new();
        for quad in &candidates {
            let Some(obs) = decode_quad(img, quad, bits, &self.params) else {
                continue;
            };
            let Some(m) = self.matcher.match_code(obs.code) else {
                continue;
            };

            let ham_pen = 1.0 - (m.hamming as f32 / bit_count);
            let score = (obs.border_score * ham_pen).clamp(0.0, 1.0);

            // The quad is read in image order (TL, TR, BR, BL); rotate so
            // corner 0 is the marker's canonical top-left.
            let rot = m.rotation as usize;
            let corners =
                std::array::from_fn(|k| quad.corners[(k + rot) % 4]);

            out.push(MarkerDetection {
                id: m.id,
                rotation: m.rotation,
                hamming: m.hamming,
                score,
                border_score: obs.border_score,
                code: obs.code,
                inverted: obs.inverted,
                corners,
            });
        }

        log::debug!("decoded markers: {}", out.len());

        if self.params.dedup_by_id {
            dedup_by_id_keep_best(out)
        } else {
            out
        }
    }
}

fn dedup_by_id_keep_best(mut dets: Vec<MarkerDetection>) -> Vec<MarkerDetection> {
    dets.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(dets.len());
    for d in dets {
        if seen.insert(d.id) {
            out.push(d);
        }
    }
    out
}
