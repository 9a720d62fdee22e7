//! Quad candidate extraction from a binarized scene.
//!
//! The marker border is a connected ring of dark pixels, so flood-filling
//! dark components and keeping square-ish ones yields one candidate per
//! marker (isolated dark payload cells form components far below the size
//! threshold). Corners are the component points extremal along the two
//! diagonal directions, which is exact for axis-aligned markers and a good
//! seed for modestly rotated ones.

use crate::detector::DetectorParams;
use crate::threshold::otsu_threshold;
use ar_overlay_core::GrayImageView;
use nalgebra::Point2;
use std::collections::VecDeque;

/// One candidate quadrilateral, corners in TL, TR, BR, BL image order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct QuadCandidate {
    pub corners: [Point2<f32>; 4],
}

impl QuadCandidate {
    /// Mean side length in pixels.
    pub fn mean_side(&self) -> f32 {
        let mut sum = 0.0f32;
        for k in 0..4 {
            let a = self.corners[k];
            let b = self.corners[(k + 1) % 4];
            sum += (b - a).norm();
        }
        sum / 4.0
    }
}

/// Extremal component points along the image diagonals.
struct Extremes {
    tl: (i32, i32), // min x + y
    tr: (i32, i32), // max x - y
    br: (i32, i32), // max x + y
    bl: (i32, i32), // min x - y
}

impl Extremes {
    fn seed(x: i32, y: i32) -> Self {
        Self {
            tl: (x, y),
            tr: (x, y),
            br: (x, y),
            bl: (x, y),
        }
    }

    fn update(&mut self, x: i32, y: i32) {
        if x + y < self.tl.0 + self.tl.1 {
            self.tl = (x, y);
        }
        if x - y > self.tr.0 - self.tr.1 {
            self.tr = (x, y);
        }
        if x + y > self.br.0 + self.br.1 {
            self.br = (x, y);
        }
        if x - y < self.bl.0 - self.bl.1 {
            self.bl = (x, y);
        }
    }

    fn corners(&self) -> [Point2<f32>; 4] {
        [self.tl, self.tr, self.br, self.bl]
            .map(|(x, y)| Point2::new(x as f32, y as f32))
    }
}

/// Find dark square-ish components and return their corner quads.
pub(crate) fn find_quad_candidates(
    img: &GrayImageView<'_>,
    params: &DetectorParams,
) -> Vec<QuadCandidate> {
    let w = img.width;
    let h = img.height;
    if w == 0 || h == 0 {
        return Vec::new();
    }

    // The Otsu split is inclusive: the threshold is the last bin of the
    // dark class, so equality counts as dark (a pure-black class on a
    // mid-gray scene yields thr = 0).
    let thr = otsu_threshold(img.data);
    let dark = |idx: usize| img.data[idx] <= thr;

    let mut visited = vec![false; w * h];
    let mut queue = VecDeque::new();
    let mut out = Vec::new();

    for y0 in 0..h {
        for x0 in 0..w {
            let idx0 = y0 * w + x0;
            if visited[idx0] || !dark(idx0) {
                continue;
            }

            visited[idx0] = true;
            queue.push_back((x0 as i32, y0 as i32));

            let mut count = 0usize;
            let mut min_x = x0 as i32;
            let mut min_y = y0 as i32;
            let mut max_x = x0 as i32;
            let mut max_y = y0 as i32;
            let mut extremes = Extremes::seed(x0 as i32, y0 as i32);

            while let Some((x, y)) = queue.pop_front() {
                count += 1;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
                extremes.update(x, y);

                for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                    if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                        continue;
                    }
                    let nidx = ny as usize * w + nx as usize;
                    if visited[nidx] || !dark(nidx) {
                        continue;
                    }
                    visited[nidx] = true;
                    queue.push_back((nx, ny));
                }
            }

            let bw = (max_x - min_x + 1) as f32;
            let bh = (max_y - min_y + 1) as f32;
            if bw < params.min_side_px || bh < params.min_side_px {
                continue;
            }
            let aspect = bw / bh;
            if aspect > params.max_aspect_ratio || aspect < 1.0 / params.max_aspect_ratio {
                continue;
            }
            let fill = count as f32 / (bw * bh);
            if fill < params.min_fill || fill > params.max_fill {
                continue;
            }

            let quad = QuadCandidate {
                corners: extremes.corners(),
            };
            if quad.mean_side() >= params.min_side_px {
                out.push(quad);
            }
        }
    }

    out
}
