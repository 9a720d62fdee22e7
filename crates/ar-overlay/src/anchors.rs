//! Anchor layout: which marker ids bound the overlay region, and which of
//! each marker's corners contributes the reference point.
//!
//! The mapping is positional by construction: the id at position `i` of the
//! layout contributes its canonical corner `i`, so the top-left marker
//! donates its own top-left corner, the top-right marker its top-right, and
//! so on. Detected corners are already in canonical marker order, which is
//! what makes this selection well defined under marker rotation.

use crate::OverlayError;
use ar_overlay_aruco::{Dictionary, MarkerDetection};
use nalgebra::Point2;

/// Anchor ids of the original tool, in TL, TR, BR, BL order.
pub const DEFAULT_ANCHOR_IDS: [u32; 4] = [923, 1001, 241, 1007];

/// Validated marker-id -> quadrilateral-corner mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorLayout {
    ids: [u32; 4],
}

impl AnchorLayout {
    /// Build a layout from four distinct ids valid for `dict`.
    pub fn new(ids: [u32; 4], dict: &Dictionary) -> Result<Self, OverlayError> {
        for (k, &id) in ids.iter().enumerate() {
            if id as usize >= dict.len() {
                return Err(OverlayError::AnchorIdOutOfRange {
                    id,
                    dictionary_len: dict.len(),
                });
            }
            if ids[..k].contains(&id) {
                return Err(OverlayError::DuplicateAnchorId { id });
            }
        }
        Ok(Self { ids })
    }

    /// Anchor ids in TL, TR, BR, BL order.
    #[inline]
    pub fn ids(&self) -> [u32; 4] {
        self.ids
    }

    /// Assemble the destination quadrilateral from detections.
    ///
    /// Exactly four markers must have been detected (the original tool's
    /// gate), and every anchor id must be among them. Output corners are in
    /// TL, TR, BR, BL order.
    pub fn reference_points(
        &self,
        markers: &[MarkerDetection],
    ) -> Result<[Point2<f32>; 4], OverlayError> {
        if markers.len() != 4 {
            return Err(OverlayError::MarkerCount {
                found: markers.len(),
            });
        }

        let mut refs = [Point2::new(0.0f32, 0.0); 4];
        for (k, &id) in self.ids.iter().enumerate() {
            let det = markers
                .iter()
                .find(|d| d.id == id)
                .ok_or(OverlayError::AnchorMissing { id })?;
            refs[k] = det.corners[k];
        }
        Ok(refs)
    }
}

impl Default for AnchorLayout {
    fn default() -> Self {
        Self {
            ids: DEFAULT_ANCHOR_IDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(id: u32, x0: f32, y0: f32, side: f32) -> MarkerDetection {
        MarkerDetection {
            id,
            rotation: 0,
            hamming: 0,
            score: 1.0,
            border_score: 1.0,
            code: 0,
            inverted: false,
            corners: [
                Point2::new(x0, y0),
                Point2::new(x0 + side, y0),
                Point2::new(x0 + side, y0 + side),
                Point2::new(x0, y0 + side),
            ],
        }
    }

    fn four_markers() -> Vec<MarkerDetection> {
        vec![
            det(923, 50.0, 50.0, 40.0),
            det(1001, 510.0, 50.0, 40.0),
            det(241, 510.0, 360.0, 40.0),
            det(1007, 50.0, 360.0, 40.0),
        ]
    }

    #[test]
    fn selects_one_corner_per_anchor() {
        let layout = AnchorLayout::default();
        let refs = layout.reference_points(&four_markers()).expect("refs");

        assert_eq!(refs[0], Point2::new(50.0, 50.0)); // TL marker, own TL
        assert_eq!(refs[1], Point2::new(550.0, 50.0)); // TR marker, own TR
        assert_eq!(refs[2], Point2::new(550.0, 400.0)); // BR marker, own BR
        assert_eq!(refs[3], Point2::new(50.0, 400.0)); // BL marker, own BL
    }

    #[test]
    fn marker_count_gate_fires_before_id_lookup() {
        let layout = AnchorLayout::default();
        for n in [0usize, 1, 2, 3] {
            let markers: Vec<_> = four_markers().into_iter().take(n).collect();
            match layout.reference_points(&markers) {
                Err(OverlayError::MarkerCount { found }) => assert_eq!(found, n),
                other => panic!("expected MarkerCount, got {other:?}"),
            }
        }

        let mut five = four_markers();
        five.push(det(7, 0.0, 0.0, 10.0));
        assert!(matches!(
            layout.reference_points(&five),
            Err(OverlayError::MarkerCount { found: 5 })
        ));
    }

    #[test]
    fn missing_anchor_id_fails_loudly() {
        let layout = AnchorLayout::default();
        let mut markers = four_markers();
        markers[1] = det(999, 510.0, 50.0, 40.0); // 1001 replaced
        match layout.reference_points(&markers) {
            Err(OverlayError::AnchorMissing { id }) => assert_eq!(id, 1001),
            other => panic!("expected AnchorMissing, got {other:?}"),
        }
    }

    #[test]
    fn layout_rejects_duplicates_and_out_of_range_ids() {
        let dict = Dictionary::aruco_original();
        assert!(matches!(
            AnchorLayout::new([1, 2, 1, 4], &dict),
            Err(OverlayError::DuplicateAnchorId { id: 1 })
        ));
        assert!(matches!(
            AnchorLayout::new([1, 2, 3, 2048], &dict),
            Err(OverlayError::AnchorIdOutOfRange { id: 2048, .. })
        ));
        assert!(AnchorLayout::new(DEFAULT_ANCHOR_IDS, &dict).is_ok());
    }
}
