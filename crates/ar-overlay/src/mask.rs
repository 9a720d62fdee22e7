//! Quadrilateral mask rasterization and dilation.

use image::GrayImage;
use nalgebra::Point2;

/// Coverage supersampling factor per axis (16 samples per pixel).
const SUBSAMPLES: u32 = 4;

/// Rasterize the filled convex quadrilateral into a `w` x `h` mask.
///
/// Interior pixels are 255, exterior 0, and boundary pixels carry a
/// supersampled coverage value in between (anti-aliased edges). Corner
/// order must trace the quad boundary (TL, TR, BR, BL).
pub fn quad_mask(quad: &[Point2<f32>; 4], w: u32, h: u32) -> GrayImage {
    let mut mask = GrayImage::new(w, h);

    // Restrict rasterization to the quad's bounding box.
    let min_x = quad.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
    let min_y = quad.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_x = quad.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
    let max_y = quad.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

    let x0 = (min_x.floor().max(0.0)) as u32;
    let y0 = (min_y.floor().max(0.0)) as u32;
    let x1 = (max_x.ceil().min(w as f32 - 1.0).max(0.0)) as u32;
    let y1 = (max_y.ceil().min(h as f32 - 1.0).max(0.0)) as u32;
    if min_x > w as f32 || min_y > h as f32 || max_x < 0.0 || max_y < 0.0 {
        return mask;
    }

    let step = 1.0 / SUBSAMPLES as f32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let mut hits = 0u32;
            for sy in 0..SUBSAMPLES {
                for sx in 0..SUBSAMPLES {
                    let p = Point2::new(
                        x as f32 + (sx as f32 + 0.5) * step,
                        y as f32 + (sy as f32 + 0.5) * step,
                    );
                    if inside_convex_quad(quad, p) {
                        hits += 1;
                    }
                }
            }
            let total = SUBSAMPLES * SUBSAMPLES;
            mask.put_pixel(x, y, image::Luma([((hits * 255) / total) as u8]));
        }
    }

    mask
}

/// Point-in-convex-polygon test via consistent edge cross-product signs.
fn inside_convex_quad(quad: &[Point2<f32>; 4], p: Point2<f32>) -> bool {
    let mut pos = false;
    let mut neg = false;
    for k in 0..4 {
        let a = quad[k];
        let b = quad[(k + 1) % 4];
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if cross > 0.0 {
            pos = true;
        } else if cross < 0.0 {
            neg = true;
        }
        if pos && neg {
            return false;
        }
    }
    true
}

/// Dilate with a 3x3 square structuring element, `iterations` times.
///
/// Grows the covered region by one pixel (Chebyshev) per iteration and
/// never shrinks it.
pub fn dilate_3x3(mask: &GrayImage, iterations: usize) -> GrayImage {
    let (w, h) = mask.dimensions();
    let mut cur = mask.clone();

    for _ in 0..iterations {
        let mut next = cur.clone();
        for y in 0..h {
            for x in 0..w {
                let mut m = 0u8;
                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                            continue;
                        }
                        m = m.max(cur.get_pixel(nx as u32, ny as u32).0[0]);
                    }
                }
                next.put_pixel(x, y, image::Luma([m]));
            }
        }
        cur = next;
    }

    cur
}
