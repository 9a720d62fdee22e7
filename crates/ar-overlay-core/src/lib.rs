//! Core geometric and raster primitives for the `ar-overlay` workspace.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete marker detector or image container; callers adapt
//! their pixel buffers into [`GrayImageView`] at the boundary.

mod homography;
mod image;
mod logger;

pub use homography::{homography_from_4pt, Homography};
pub use image::{GrayImage, GrayImageView};
pub use logger::init_with_level;
