//! Mask-weighted alpha compositing.

use image::{GrayImage, RgbImage};

/// Blend `warped` over `scene` weighted by `mask`:
/// `out = warped * m + scene * (1 - m)` with `m = mask / 255` replicated
/// across the three channels.
///
/// Where the mask is 0 the output is bit-identical to the scene; where it
/// is 255 it is bit-identical to the warped image. All three inputs must
/// share dimensions.
pub fn composite(warped: &RgbImage, scene: &RgbImage, mask: &GrayImage) -> RgbImage {
    assert_eq!(warped.dimensions(), scene.dimensions());
    assert_eq!(mask.dimensions(), scene.dimensions());

    let (w, h) = scene.dimensions();
    let mut out = RgbImage::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let mv = mask.get_pixel(x, y).0[0];
            // Fast paths keep fully-masked pixels exact.
            if mv == 0 {
                out.put_pixel(x, y, *scene.get_pixel(x, y));
                continue;
            }
            if mv == 255 {
                out.put_pixel(x, y, *warped.get_pixel(x, y));
                continue;
            }

            let m = mv as f32 / 255.0;
            let wp = warped.get_pixel(x, y).0;
            let sp = scene.get_pixel(x, y).0;
            let mut px = [0u8; 3];
            for c in 0..3 {
                let v = wp[c] as f32 * m + sp[c] as f32 * (1.0 - m);
                px[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            out.put_pixel(x, y, image::Rgb(px));
        }
    }

    out
}
