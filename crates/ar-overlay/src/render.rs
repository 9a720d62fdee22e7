//! The end-to-end overlay pipeline.

use crate::anchors::AnchorLayout;
use crate::composite::composite;
use crate::mask::{dilate_3x3, quad_mask};
use crate::scene::{gray_view, resize_to_width};
use crate::warp::warp_into_scene;
use crate::OverlayError;
use ar_overlay_aruco::{ArucoDetector, DetectorParams, Dictionary, MarkerDetection};
use ar_overlay_core::homography_from_4pt;
use image::RgbImage;
use nalgebra::Point2;

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct OverlayParams {
    /// Display width the scene is resized to before detection.
    pub scene_width: u32,
    /// Marker-id to quad-corner mapping.
    pub anchors: AnchorLayout,
    /// Marker detection tunables.
    pub detector: DetectorParams,
    /// 3x3 dilation iterations applied to the quad mask.
    pub dilate_iterations: usize,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            scene_width: 600,
            anchors: AnchorLayout::default(),
            detector: DetectorParams::default(),
            dilate_iterations: 2,
        }
    }
}

/// Everything the pipeline produces, including intermediates.
#[derive(Debug)]
pub struct OverlayResult {
    /// Scene after the display-width resize.
    pub scene: RgbImage,
    /// Source warped into scene coordinates.
    pub warped: RgbImage,
    /// Dilated destination-quad mask.
    pub mask: image::GrayImage,
    /// Composited output.
    pub output: RgbImage,
    /// Destination quadrilateral, TL, TR, BR, BL.
    pub reference_points: [Point2<f32>; 4],
    /// The four marker detections the quad was assembled from.
    pub markers: Vec<MarkerDetection>,
}

/// Run the full overlay: resize, detect, assemble, warp, mask, composite.
pub fn render(
    scene: &RgbImage,
    source: &RgbImage,
    params: &OverlayParams,
) -> Result<OverlayResult, OverlayError> {
    let (src_w, src_h) = source.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(OverlayError::EmptySource);
    }

    log::info!("preparing scene ({} px wide)", params.scene_width);
    let scene = resize_to_width(scene, params.scene_width);
    let (out_w, out_h) = scene.dimensions();

    log::info!("detecting markers");
    let gray = image::imageops::grayscale(&scene);
    let detector = ArucoDetector::new(Dictionary::aruco_original(), params.detector.clone());
    let markers = detector.detect(&gray_view(&gray));
    log::info!("detected {} marker(s)", markers.len());

    let reference_points = params.anchors.reference_points(&markers)?;

    log::info!("building overlay");
    let source_quad = [
        Point2::new(0.0f32, 0.0),
        Point2::new(src_w as f32, 0.0),
        Point2::new(src_w as f32, src_h as f32),
        Point2::new(0.0, src_h as f32),
    ];
    let h = homography_from_4pt(&source_quad, &reference_points)
        .ok_or(OverlayError::DegenerateQuad)?;

    let warped =
        warp_into_scene(source, &h, out_w, out_h).ok_or(OverlayError::DegenerateQuad)?;

    let mask = quad_mask(&reference_points, out_w, out_h);
    let mask = dilate_3x3(&mask, params.dilate_iterations);

    let output = composite(&warped, &scene, &mask);

    Ok(OverlayResult {
        scene,
        warped,
        mask,
        output,
        reference_points,
        markers,
    })
}
