//! Machine-readable run report for the CLI.

use crate::render::OverlayResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stage timings in milliseconds.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct TimingsMs {
    pub load_images: u64,
    pub render: u64,
    pub total: u64,
}

/// One detected marker, flattened for JSON output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarkerReport {
    pub id: u32,
    pub rotation: u8,
    pub hamming: u8,
    pub score: f32,
    pub corners: [[f32; 2]; 4],
}

/// Summary of one overlay run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub scene_path: String,
    pub source_path: String,
    pub output_path: String,
    pub scene_width: u32,
    pub anchor_ids: [u32; 4],
    pub reference_points: Option<[[f32; 2]; 4]>,
    pub markers: Vec<MarkerReport>,
    pub error: Option<String>,
    pub timings_ms: TimingsMs,
}

impl RunReport {
    pub fn new(
        scene_path: &Path,
        source_path: &Path,
        output_path: &Path,
        scene_width: u32,
        anchor_ids: [u32; 4],
    ) -> Self {
        Self {
            scene_path: scene_path.display().to_string(),
            source_path: source_path.display().to_string(),
            output_path: output_path.display().to_string(),
            scene_width,
            anchor_ids,
            reference_points: None,
            markers: Vec::new(),
            error: None,
            timings_ms: TimingsMs::default(),
        }
    }

    /// Record a successful render.
    pub fn set_result(&mut self, result: &OverlayResult) {
        self.reference_points = Some(result.reference_points.map(|p| [p.x, p.y]));
        self.markers = result
            .markers
            .iter()
            .map(|m| MarkerReport {
                id: m.id,
                rotation: m.rotation,
                hamming: m.hamming,
                score: m.score,
                corners: m.corners.map(|c| [c.x, c.y]),
            })
            .collect();
    }

    /// Record a failed or early-exited run.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let mut report = RunReport::new(
            Path::new("scene.png"),
            Path::new("source.png"),
            Path::new("out.png"),
            600,
            [923, 1001, 241, 1007],
        );
        report.set_error("expected exactly 4 markers in the scene, found 0");
        report.timings_ms.total = 12;

        let json = serde_json::to_string(&report).expect("serialize");
        let back: RunReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.anchor_ids, [923, 1001, 241, 1007]);
        assert!(back.error.is_some());
        assert_eq!(back.timings_ms.total, 12);
    }
}
