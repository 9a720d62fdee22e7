#![allow(dead_code)]

use ar_overlay::aruco::{draw_marker, Dictionary};
use image::{Rgb, RgbImage};

pub const ANCHOR_IDS: [u32; 4] = [923, 1001, 241, 1007];

/// Side length of a marker rendered at 7 px per cell (7 cells).
pub const MARKER_SIDE: u32 = 49;

pub fn blit_marker(
    scene: &mut RgbImage,
    dict: &Dictionary,
    id: u32,
    cell_px: usize,
    x0: u32,
    y0: u32,
) {
    let marker = draw_marker(dict, id, cell_px).expect("valid marker id");
    for y in 0..marker.height {
        for x in 0..marker.width {
            let v = marker.data[y * marker.width + x];
            scene.put_pixel(x0 + x as u32, y0 + y as u32, Rgb([v, v, v]));
        }
    }
}

/// A 600x450 white scene with four anchor markers placed so that the
/// reference corners land on (50,50), (550,50), (550,400), (50,400).
///
/// The outermost dark pixel centers of a side-49 marker blitted at
/// `(x0, y0)` are `(x0, y0)` and `(x0 + 48, y0 + 48)`; each marker is
/// offset so the corner it contributes sits on its target point.
pub fn four_marker_scene(ids: [u32; 4]) -> RgbImage {
    let dict = Dictionary::aruco_original();
    let mut scene = RgbImage::from_pixel(600, 450, Rgb([255, 255, 255]));
    blit_marker(&mut scene, &dict, ids[0], 7, 50, 50);
    blit_marker(&mut scene, &dict, ids[1], 7, 502, 50);
    blit_marker(&mut scene, &dict, ids[2], 7, 502, 352);
    blit_marker(&mut scene, &dict, ids[3], 7, 50, 352);
    scene
}

pub fn red_source() -> RgbImage {
    RgbImage::from_pixel(100, 100, Rgb([255, 0, 0]))
}
