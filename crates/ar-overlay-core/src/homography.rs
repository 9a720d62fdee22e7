//! Planar projective transforms and the exact four-point estimator.

use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

/// A 3x3 projective transform between planes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    /// Apply to a point, dividing out the projective scale.
    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        Point2::new((v[0] / w) as f32, (v[1] / w) as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > 1e-12 {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

/// Hartley normalization of four points: translate to the centroid, scale so
/// the mean distance from it is sqrt(2).
fn normalize_points4(pts: &[Point2<f32>; 4]) -> ([Point2<f64>; 4], Matrix3<f64>) {
    let n = 4.0_f64;
    let mut cx = 0.0_f64;
    let mut cy = 0.0_f64;
    for p in pts {
        cx += p.x as f64;
        cy += p.y as f64;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0_f64;
    for p in pts {
        let dx = p.x as f64 - cx;
        let dy = p.y as f64 - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    let t = hartley_normalization(cx, cy, mean_dist);

    let mut out = [Point2::new(0.0_f64, 0.0_f64); 4];
    for (i, p) in pts.iter().enumerate() {
        let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
        out[i] = Point2::new(v[0], v[1]);
    }

    (out, t)
}

fn fix_scale(h: Matrix3<f64>) -> Option<Matrix3<f64>> {
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(h / s)
}

/// Compute H such that `dst ~ H * src`, from exactly four correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Returns `None`
/// when the correspondences are degenerate (for example three collinear
/// points) and no stable solution exists.
pub fn homography_from_4pt(src: &[Point2<f32>; 4], dst: &[Point2<f32>; 4]) -> Option<Homography> {
    // Unknowns: [h11 h12 h13 h21 h22 h23 h31 h32], with h33 = 1.
    // For each correspondence (x,y)->(u,v):
    // h11 x + h12 y + h13 - u h31 x - u h32 y = u
    // h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let (src_n, t_src) = normalize_points4(src);
    let (dst_n, t_dst) = normalize_points4(dst);

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let x = src_n[k].x;
        let y = src_n[k].y;
        let u = dst_n[k].x;
        let v = dst_n[k].y;

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b)?;

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    // Denormalize: H = T_dst^{-1} * Hn * T_src, then pin h33 = 1.
    let t_dst_inv = t_dst.try_inverse()?;
    let h = fix_scale(t_dst_inv * hn * t_src)?;

    Some(Homography::new(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point2<f32>, b: Point2<f32>, tol: f32) {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.6},{:.6}) ~ ({:.6},{:.6}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn inverse_undoes_the_forward_map() {
        let h = Homography::new(Matrix3::new(
            1.05, -0.08, 42.0, //
            0.03, 0.97, -18.0, //
            0.0007, -0.0003, 1.0,
        ));
        let inv = h.inverse().expect("invertible");

        for p in [
            Point2::new(10.0_f32, 10.0),
            Point2::new(-35.0_f32, 240.0),
            Point2::new(580.0_f32, 15.0),
            Point2::new(300.0_f32, 225.0),
        ] {
            assert_close(inv.apply(h.apply(p)), p, 1e-3);
        }
    }

    #[test]
    fn solve_matches_a_known_projective_map() {
        let truth = Homography::new(Matrix3::new(
            0.92, -0.03, 64.0, //
            0.06, 1.15, 25.0, //
            -0.0006, 0.0011, 1.0,
        ));

        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(100.0_f32, 0.0),
            Point2::new(100.0_f32, 100.0),
            Point2::new(0.0_f32, 100.0),
        ];
        let dst = src.map(|p| truth.apply(p));

        let solved = homography_from_4pt(&src, &dst).expect("solvable");

        // Agreement must extend beyond the four fitted corners.
        for p in [
            Point2::new(50.0_f32, 50.0),
            Point2::new(12.0_f32, 88.0),
            Point2::new(97.0_f32, 3.0),
        ] {
            assert_close(solved.apply(p), truth.apply(p), 1e-3);
        }
    }

    #[test]
    fn source_rectangle_corners_land_on_destination() {
        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(100.0_f32, 0.0),
            Point2::new(100.0_f32, 100.0),
            Point2::new(0.0_f32, 100.0),
        ];
        let dst = [
            Point2::new(50.0_f32, 50.0),
            Point2::new(550.0_f32, 50.0),
            Point2::new(550.0_f32, 400.0),
            Point2::new(50.0_f32, 400.0),
        ];

        let h = homography_from_4pt(&src, &dst).expect("solve");
        for k in 0..4 {
            assert_close(h.apply(src[k]), dst[k], 1e-3);
        }
    }

    #[test]
    fn collinear_points_are_rejected() {
        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(1.0_f32, 0.0),
            Point2::new(2.0_f32, 0.0),
            Point2::new(3.0_f32, 0.0),
        ];
        let dst = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(1.0_f32, 1.0),
            Point2::new(2.0_f32, 0.0),
            Point2::new(3.0_f32, 1.0),
        ];
        assert!(homography_from_4pt(&src, &dst).is_none());
    }
}
