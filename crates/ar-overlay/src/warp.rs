//! Perspective warp of an RGB source into the scene's coordinate frame.

use ar_overlay_core::Homography;
use image::RgbImage;
use nalgebra::Point2;

/// Warp `src` through `h_scene_from_src` onto an `out_w` x `out_h` canvas.
///
/// Inverse mapping: every output pixel center is pulled back into source
/// coordinates and bilinearly sampled per channel. Pixels mapping outside
/// the source stay black. Returns `None` when the homography cannot be
/// inverted.
pub fn warp_into_scene(
    src: &RgbImage,
    h_scene_from_src: &Homography,
    out_w: u32,
    out_h: u32,
) -> Option<RgbImage> {
    let inv = h_scene_from_src.inverse()?;
    let (sw, sh) = (src.width() as f32, src.height() as f32);

    let mut out = RgbImage::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
            let q = inv.apply(p);
            if q.x < 0.0 || q.y < 0.0 || q.x > sw || q.y > sh {
                continue; // stays black
            }
            let px = sample_bilinear_rgb(src, q.x - 0.5, q.y - 0.5);
            out.put_pixel(x, y, px);
        }
    }
    Some(out)
}

/// Bilinear sample of an RGB image with edge clamping.
fn sample_bilinear_rgb(img: &RgbImage, x: f32, y: f32) -> image::Rgb<u8> {
    let w = img.width() as i32;
    let h = img.height() as i32;

    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let at = |xi: i32, yi: i32| -> [f32; 3] {
        let xc = xi.clamp(0, w - 1) as u32;
        let yc = yi.clamp(0, h - 1) as u32;
        let p = img.get_pixel(xc, yc).0;
        [p[0] as f32, p[1] as f32, p[2] as f32]
    };

    let p00 = at(x0, y0);
    let p10 = at(x0 + 1, y0);
    let p01 = at(x0, y0 + 1);
    let p11 = at(x0 + 1, y0 + 1);

    let mut out = [0u8; 3];
    for c in 0..3 {
        let a = p00[c] + fx * (p10[c] - p00[c]);
        let b = p01[c] + fx * (p11[c] - p01[c]);
        out[c] = (a + fy * (b - a)).round().clamp(0.0, 255.0) as u8;
    }
    image::Rgb(out)
}
