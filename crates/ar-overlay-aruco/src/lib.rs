//! ArUco marker detection for raw (unrectified) scene images.
//!
//! This crate covers:
//! - the classic ArUco Original dictionary (5x5 inner bits, 1024 ids),
//!   generated from its row codification instead of embedded tables,
//! - matching observed marker codes against the dictionary under rotation,
//! - quad candidate extraction from a binarized scene,
//! - decoding candidates through a per-quad homography.
//!
//! Detected corners are reported in the marker's canonical order: corner 0
//! is the marker's own top-left however the marker is rotated in the scene.

mod decode;
mod detector;
mod dictionary;
mod draw;
mod matcher;
mod quads;
mod threshold;

pub use detector::{ArucoDetector, DetectorParams, MarkerDetection};
pub use dictionary::Dictionary;
pub use draw::draw_marker;
pub use matcher::{rotate_code_cw, CodeMatch, Matcher};
