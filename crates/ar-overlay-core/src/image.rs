//! Lightweight row-major grayscale buffers.
//!
//! Reads outside the buffer return 0, so samplers near the border degrade
//! toward black instead of panicking.

/// Borrowed view over a row-major grayscale buffer (`len = width * height`).
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl<'a> GrayImageView<'a> {
    /// Pixel value at integer coordinates; 0 outside the image.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// Bilinear sample at subpixel coordinates.
    #[inline]
    pub fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let p00 = self.get(x0, y0) as f32;
        let p10 = self.get(x0 + 1, y0) as f32;
        let p01 = self.get(x0, y0 + 1) as f32;
        let p11 = self.get(x0 + 1, y0 + 1) as f32;

        let a = p00 + fx * (p10 - p00);
        let b = p01 + fx * (p11 - p01);
        a + fy * (b - a)
    }

    /// Bilinear sample quantized to `u8`.
    #[inline]
    pub fn sample_bilinear_u8(&self, x: f32, y: f32) -> u8 {
        self.sample_bilinear(x, y).clamp(0.0, 255.0) as u8
    }

    /// Mean over the 3x3 neighborhood centred on `(x, y)`.
    ///
    /// Returns `None` if any tap would fall outside the image.
    pub fn sample_mean_3x3(&self, x: f32, y: f32) -> Option<u8> {
        let ix = x.floor() as i32;
        let iy = y.floor() as i32;
        if ix - 1 < 0 || iy - 1 < 0 || ix + 1 >= self.width as i32 || iy + 1 >= self.height as i32 {
            return None;
        }

        let mut sum = 0u32;
        for dy in -1..=1 {
            for dx in -1..=1 {
                sum += self.get(ix + dx, iy + dy) as u32;
            }
        }
        Some((sum / 9) as u8)
    }
}

/// Owned row-major grayscale buffer.
#[derive(Clone, Debug)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// All-zero (black) image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height],
        }
    }

    /// Constant-fill image.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Borrow as a [`GrayImageView`].
    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker2x2() -> GrayImage {
        GrayImage {
            width: 2,
            height: 2,
            data: vec![0, 100, 200, 50],
        }
    }

    #[test]
    fn get_is_zero_outside() {
        let img = checker2x2();
        let v = img.view();
        assert_eq!(v.get(-1, 0), 0);
        assert_eq!(v.get(0, 2), 0);
        assert_eq!(v.get(1, 1), 50);
    }

    #[test]
    fn bilinear_interpolates_between_pixels() {
        let img = checker2x2();
        let v = img.view();
        assert_eq!(v.sample_bilinear(0.0, 0.0), 0.0);
        assert_eq!(v.sample_bilinear(0.5, 0.0), 50.0);
        assert_eq!(v.sample_bilinear(0.0, 0.5), 100.0);
    }

    #[test]
    fn mean_3x3_requires_full_neighborhood() {
        let img = GrayImage::filled(5, 5, 10);
        let v = img.view();
        assert_eq!(v.sample_mean_3x3(2.0, 2.0), Some(10));
        assert_eq!(v.sample_mean_3x3(0.0, 2.0), None);
    }
}
