//! Marker decoding from a single image quad.
//!
//! A candidate quad is mapped onto a canonical square through a four-point
//! homography; the marker's cell grid (payload plus one border cell on each
//! side) is then sampled at cell centers and binarized with an Otsu
//! threshold taken from a denser sample grid over the same region.

use crate::detector::DetectorParams;
use crate::quads::QuadCandidate;
use crate::threshold::otsu_threshold;
use ar_overlay_core::{homography_from_4pt, GrayImageView};
use nalgebra::Point2;

/// Marker border width in cells. ArUco markers carry a single black ring.
pub(crate) const BORDER_CELLS: usize = 1;

/// Quads with a mean side below this cannot be sampled reliably.
pub(crate) const MIN_SIDE_PX: f32 = 12.0;

/// Subdivision factor for the threshold sample grid.
const THRESH_SUBDIV: usize = 3;

/// Raw bits read from one quad, before dictionary matching.
#[derive(Clone, Copy, Debug)]
pub(crate) struct QuadObservation {
    /// Observed inner bits (row-major, black = 1).
    pub code: u64,
    /// Fraction of border cells that read black.
    pub border_score: f32,
    /// Whether polarity was inverted to maximize `border_score`.
    pub inverted: bool,
}

/// Decode the cell grid of one candidate quad.
///
/// `bits` is the inner grid side (dictionary marker size). Returns `None`
/// when the quad is too small, degenerate, touches the image border, or its
/// border ring does not read black.
pub(crate) fn decode_quad(
    img: &GrayImageView<'_>,
    quad: &QuadCandidate,
    bits: usize,
    params: &DetectorParams,
) -> Option<QuadObservation> {
    let cells = bits + 2 * BORDER_CELLS;
    if bits * bits > 64 {
        return None;
    }

    let s = quad.mean_side();
    if s < MIN_SIDE_PX {
        return None;
    }

    let canonical = [
        Point2::new(0.0f32, 0.0),
        Point2::new(s, 0.0),
        Point2::new(s, s),
        Point2::new(0.0, s),
    ];
    let h = homography_from_4pt(&canonical, &quad.corners)?;

    // Inset pulls the sample lattice toward the quad center so that edge
    // bleed from neighboring cells never lands on a sample point. Each
    // sample must stay inside its own cell, which bounds the usable inset
    // at s / (2 * (cells - 1)).
    let max_inset_frac = 1.0 / (2.0 * (cells as f32 - 1.0));
    let inset = params.inset_frac.clamp(0.0, max_inset_frac) * s;
    let side = s - 2.0 * inset;
    let step = side / cells as f32;

    let mut samples = Vec::with_capacity(cells * cells);
    for cy in 0..cells {
        for cx in 0..cells {
            let p = Point2::new(
                inset + (cx as f32 + 0.5) * step,
                inset + (cy as f32 + 0.5) * step,
            );
            let q = h.apply(p);
            samples.push(img.sample_mean_3x3(q.x, q.y)?);
        }
    }

    let mut thr_samples = Vec::with_capacity(cells * cells * THRESH_SUBDIV * THRESH_SUBDIV);
    let fine = cells * THRESH_SUBDIV;
    let fine_step = side / fine as f32;
    for ty in 0..fine {
        for tx in 0..fine {
            let p = Point2::new(
                inset + (tx as f32 + 0.5) * fine_step,
                inset + (ty as f32 + 0.5) * fine_step,
            );
            let q = h.apply(p);
            if let Some(v) = img.sample_mean_3x3(q.x, q.y) {
                thr_samples.push(v);
            }
        }
    }

    decode_samples(&samples, &thr_samples, cells, bits, params.min_border_score)
}

/// Binarize the cell samples and pack the payload, searching both
/// polarities and keeping the one with the better border score.
fn decode_samples(
    samples: &[u8],
    thr_samples: &[u8],
    cells: usize,
    bits: usize,
    min_border_score: f32,
) -> Option<QuadObservation> {
    if samples.len() != cells * cells {
        return None;
    }

    let thr = if thr_samples.is_empty() {
        otsu_threshold(samples)
    } else {
        otsu_threshold(thr_samples)
    };

    let mut best: Option<QuadObservation> = None;

    for inverted in [false, true] {
        let mut border_ok = 0u32;
        let mut border_total = 0u32;
        let mut code = 0u64;

        for cy in 0..cells {
            for cx in 0..cells {
                // Same inclusive split as the candidate stage: the
                // threshold bin itself belongs to the dark class.
                let mut is_black = samples[cy * cells + cx] <= thr;
                if inverted {
                    is_black = !is_black;
                }

                let is_border = cx < BORDER_CELLS
                    || cy < BORDER_CELLS
                    || cx >= cells - BORDER_CELLS
                    || cy >= cells - BORDER_CELLS;
                if is_border {
                    border_total += 1;
                    if is_black {
                        border_ok += 1;
                    }
                } else if is_black {
                    let bx = cx - BORDER_CELLS;
                    let by = cy - BORDER_CELLS;
                    code |= 1u64 << (by * bits + bx);
                }
            }
        }

        let border_score = border_ok as f32 / border_total.max(1) as f32;
        if border_score < min_border_score {
            continue;
        }

        if best
            .as_ref()
            .map(|b| border_score > b.border_score)
            .unwrap_or(true)
        {
            best = Some(QuadObservation {
                code,
                border_score,
                inverted,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::draw_marker;
    use crate::Dictionary;

    fn quad_for(x0: f32, y0: f32, side: f32) -> QuadCandidate {
        QuadCandidate {
            corners: [
                Point2::new(x0, y0),
                Point2::new(x0 + side, y0),
                Point2::new(x0 + side, y0 + side),
                Point2::new(x0, y0 + side),
            ],
        }
    }

    #[test]
    fn decodes_a_rendered_marker() {
        let dict = Dictionary::aruco_original();
        let marker = draw_marker(&dict, 923, 10).expect("draw");
        // Pad so 3x3 sampling taps never leave the image.
        let pad = 6usize;
        let mut canvas =
            ar_overlay_core::GrayImage::filled(marker.width + 2 * pad, marker.height + 2 * pad, 255);
        for y in 0..marker.height {
            for x in 0..marker.width {
                canvas.data[(y + pad) * canvas.width + (x + pad)] =
                    marker.data[y * marker.width + x];
            }
        }

        let quad = quad_for(pad as f32, pad as f32, marker.width as f32 - 1.0);
        let obs = decode_quad(
            &canvas.view(),
            &quad,
            dict.marker_size(),
            &DetectorParams::default(),
        )
        .expect("decode");

        assert_eq!(obs.code, dict.code(923).unwrap());
        assert!(!obs.inverted);
        assert!(obs.border_score > 0.99);
    }

    #[test]
    fn uniform_quad_only_decodes_as_all_ones() {
        // A featureless region thresholds to its own constant value, so
        // every cell reads black. The packed code is all ones, which no
        // dictionary id uses, so it dies at the matching stage.
        let canvas = ar_overlay_core::GrayImage::filled(100, 100, 255);
        let quad = quad_for(20.0, 20.0, 50.0);
        let obs = decode_quad(&canvas.view(), &quad, 5, &DetectorParams::default())
            .expect("uniform reading");
        assert_eq!(obs.code, (1u64 << 25) - 1);
    }

    #[test]
    fn tiny_quads_are_rejected() {
        let canvas = ar_overlay_core::GrayImage::filled(100, 100, 0);
        let quad = quad_for(10.0, 10.0, 8.0);
        assert!(decode_quad(&canvas.view(), &quad, 5, &DetectorParams::default()).is_none());
    }
}
