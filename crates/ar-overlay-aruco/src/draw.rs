//! Synthetic marker rendering, used by tests and scene tooling.

use crate::decode::BORDER_CELLS;
use crate::Dictionary;
use ar_overlay_core::GrayImage;

/// Render marker `id` as a grayscale image, `cell_px` pixels per cell.
///
/// The image covers the black border ring plus the payload grid; no white
/// quiet zone is added. Returns `None` for ids outside the dictionary or a
/// zero `cell_px`.
pub fn draw_marker(dict: &Dictionary, id: u32, cell_px: usize) -> Option<GrayImage> {
    if cell_px == 0 {
        return None;
    }
    let code = dict.code(id)?;
    let bits = dict.marker_size();
    let cells = bits + 2 * BORDER_CELLS;
    let side = cells * cell_px;

    let mut img = GrayImage::filled(side, side, 255);
    for cy in 0..cells {
        for cx in 0..cells {
            let is_border = cx < BORDER_CELLS
                || cy < BORDER_CELLS
                || cx >= cells - BORDER_CELLS
                || cy >= cells - BORDER_CELLS;
            let is_black = if is_border {
                true
            } else {
                let bx = cx - BORDER_CELLS;
                let by = cy - BORDER_CELLS;
                (code >> (by * bits + bx)) & 1 == 1
            };
            if !is_black {
                continue;
            }
            for yy in 0..cell_px {
                for xx in 0..cell_px {
                    img.data[(cy * cell_px + yy) * side + (cx * cell_px + xx)] = 0;
                }
            }
        }
    }
    Some(img)
}
