//! Marker-anchored planar image overlay.
//!
//! The pipeline is a single linear pass: resize the scene to a display
//! width, detect ArUco markers, assemble the destination quadrilateral from
//! four anchor markers, warp the source image onto it, rasterize and dilate
//! a quad mask, and alpha-composite warped over scene.
//!
//! ## Quickstart
//!
//! ```no_run
//! use ar_overlay::{render, OverlayParams};
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scene = ImageReader::open("scene.png")?.decode()?.to_rgb8();
//! let source = ImageReader::open("source.png")?.decode()?.to_rgb8();
//!
//! let result = render(&scene, &source, &OverlayParams::default())?;
//! result.output.save("overlay.png")?;
//! # Ok(())
//! # }
//! ```

mod anchors;
mod composite;
mod mask;
mod render;
mod report;
mod scene;
mod warp;

pub use ar_overlay_aruco as aruco;
pub use ar_overlay_core as core;

pub use anchors::{AnchorLayout, DEFAULT_ANCHOR_IDS};
pub use composite::composite;
pub use mask::{dilate_3x3, quad_mask};
pub use render::{render, OverlayParams, OverlayResult};
pub use report::{MarkerReport, RunReport, TimingsMs};
pub use scene::{gray_view, resize_to_width};
pub use warp::warp_into_scene;

/// Errors produced by the overlay pipeline.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// The scene did not contain exactly four decoded markers. The original
    /// tool treats this as a clean early exit, so CLI callers map it to a
    /// message and a zero status rather than a failure.
    #[error("expected exactly 4 markers in the scene, found {found}")]
    MarkerCount { found: usize },

    /// A required anchor id was not among the four detections.
    #[error("anchor marker id {id} not found among the detected markers")]
    AnchorMissing { id: u32 },

    /// An anchor layout listed the same id twice.
    #[error("duplicate anchor marker id {id}")]
    DuplicateAnchorId { id: u32 },

    /// An anchor id does not exist in the dictionary.
    #[error("anchor marker id {id} outside dictionary (len {dictionary_len})")]
    AnchorIdOutOfRange { id: u32, dictionary_len: usize },

    /// The reference points admit no stable homography.
    #[error("destination quadrilateral is degenerate")]
    DegenerateQuad,

    /// The source image has a zero dimension.
    #[error("source image is empty")]
    EmptySource,
}
