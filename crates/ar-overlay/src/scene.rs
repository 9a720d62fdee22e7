//! Scene preparation: display-width resize and gray-view adaptation.

use ar_overlay_core::GrayImageView;
use image::imageops::FilterType;
use image::RgbImage;

/// Resize to a fixed display width, preserving aspect ratio.
///
/// Returns the input unchanged when it already has the target width.
pub fn resize_to_width(img: &RgbImage, width: u32) -> RgbImage {
    if img.width() == width || img.width() == 0 {
        return img.clone();
    }
    let height = ((img.height() as f64 * width as f64 / img.width() as f64).round() as u32).max(1);
    image::imageops::resize(img, width, height, FilterType::Triangle)
}

/// Adapt an `image::GrayImage` into the core view type.
pub fn gray_view(img: &image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}
