use crate::{BorderMode, Interpolation};
use image::RgbImage;
use nalgebra::Matrix3;
use rayon::prelude::*;

/// Warps `src` into a `width` x `height` image under a projective
/// transform, with linear sampling and a black border.
///
/// `matrix` maps destination coordinates into the source image (inverse
/// mapping); callers holding the forward homography invert it first.
pub fn warp_perspective(
    src: &RgbImage,
    matrix: &Matrix3<f32>,
    width: u32,
    height: u32,
) -> RgbImage {
    warp_perspective_ex(
        src,
        matrix,
        width,
        height,
        Interpolation::Linear,
        BorderMode::Constant(0),
    )
}

pub fn warp_perspective_ex(
    src: &RgbImage,
    matrix: &Matrix3<f32>,
    width: u32,
    height: u32,
    interpolation: Interpolation,
    border: BorderMode,
) -> RgbImage {
    let mut dst = RgbImage::new(width, height);
    let samples: &mut [u8] = &mut dst;

    samples
        .par_chunks_mut(width as usize * 3)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as f32;
            for x in 0..width as usize {
                let (sx, sy) = transform_point(matrix, x as f32, y);
                let px = interpolate_sample(src, sx, sy, interpolation, border);
                for (c, v) in px.into_iter().enumerate() {
                    row[x * 3 + c] = v.clamp(0.0, 255.0) as u8;
                }
            }
        });

    dst
}

fn transform_point(matrix: &Matrix3<f32>, x: f32, y: f32) -> (f32, f32) {
    let w = matrix[(2, 0)] * x + matrix[(2, 1)] * y + matrix[(2, 2)];
    let u = matrix[(0, 0)] * x + matrix[(0, 1)] * y + matrix[(0, 2)];
    let v = matrix[(1, 0)] * x + matrix[(1, 1)] * y + matrix[(1, 2)];
    if w.abs() > 1e-10 {
        (u / w, v / w)
    } else {
        (u, v)
    }
}

fn interpolate_sample(
    src: &RgbImage,
    x: f32,
    y: f32,
    interpolation: Interpolation,
    border: BorderMode,
) -> [f32; 3] {
    match interpolation {
        Interpolation::Nearest => {
            sample_pixel(src, x.round() as isize, y.round() as isize, border)
        }
        Interpolation::Linear => sample_bilinear(src, x, y, border),
    }
}

fn sample_bilinear(src: &RgbImage, x: f32, y: f32, border: BorderMode) -> [f32; 3] {
    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let v00 = sample_pixel(src, x0, y0, border);
    let v10 = sample_pixel(src, x0 + 1, y0, border);
    let v01 = sample_pixel(src, x0, y0 + 1, border);
    let v11 = sample_pixel(src, x0 + 1, y0 + 1, border);

    let mut out = [0.0f32; 3];
    for c in 0..3 {
        let top = v00[c] * (1.0 - fx) + v10[c] * fx;
        let bottom = v01[c] * (1.0 - fx) + v11[c] * fx;
        out[c] = top * (1.0 - fy) + bottom * fy;
    }
    out
}

fn sample_pixel(src: &RgbImage, x: isize, y: isize, border: BorderMode) -> [f32; 3] {
    let width = src.width() as isize;
    let height = src.height() as isize;

    let (ix, iy) = match border {
        BorderMode::Constant(v) => {
            if x < 0 || x >= width || y < 0 || y >= height {
                return [v as f32; 3];
            }
            (x, y)
        }
        BorderMode::Replicate => {
            if width == 0 || height == 0 {
                return [0.0; 3];
            }
            (x.clamp(0, width - 1), y.clamp(0, height - 1))
        }
    };

    let p = src.get_pixel(ix as u32, iy as u32);
    [p[0] as f32, p[1] as f32, p[2] as f32]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn identity_preserves_pixels() {
        let mut img = RgbImage::new(7, 7);
        img.put_pixel(5, 4, Rgb([180, 20, 90]));
        let out = warp_perspective(&img, &Matrix3::identity(), 7, 7);
        assert_eq!(out.get_pixel(5, 4), &Rgb([180, 20, 90]));
    }

    #[test]
    fn translation_moves_point() {
        let mut img = RgbImage::new(8, 8);
        img.put_pixel(2, 2, Rgb([255, 0, 0]));

        // dst(x, y) samples src(x - 2, y - 1)
        let m = Matrix3::new(1.0, 0.0, -2.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0);
        let out = warp_perspective_ex(
            &img,
            &m,
            8,
            8,
            Interpolation::Nearest,
            BorderMode::Constant(0),
        );
        assert_eq!(out.get_pixel(4, 3), &Rgb([255, 0, 0]));
        assert_eq!(out.get_pixel(2, 2), &Rgb([0, 0, 0]));
    }

    #[test]
    fn repeated_warp_of_same_frame_is_identical() {
        let mut img = RgbImage::new(32, 24);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8]);
        }
        let m = Matrix3::new(0.9, 0.05, 1.0, -0.02, 1.1, 2.0, 1e-4, -2e-4, 1.0);

        let a = warp_perspective(&img, &m, 20, 15);
        let b = warp_perspective(&img, &m, 20, 15);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn constant_border_fills_outside_samples() {
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 200, 200]));
        // Shift far off the source; everything samples the border.
        let m = Matrix3::new(1.0, 0.0, 100.0, 0.0, 1.0, 100.0, 0.0, 0.0, 1.0);
        let out = warp_perspective_ex(
            &img,
            &m,
            4,
            4,
            Interpolation::Linear,
            BorderMode::Constant(17),
        );
        assert!(out.pixels().all(|p| *p == Rgb([17, 17, 17])));
    }

    #[test]
    fn replicate_border_clamps_to_edge() {
        let mut img = RgbImage::from_pixel(4, 4, Rgb([10, 10, 10]));
        img.put_pixel(3, 3, Rgb([99, 99, 99]));
        let m = Matrix3::new(1.0, 0.0, 100.0, 0.0, 1.0, 100.0, 0.0, 0.0, 1.0);
        let out = warp_perspective_ex(
            &img,
            &m,
            2,
            2,
            Interpolation::Nearest,
            BorderMode::Replicate,
        );
        assert!(out.pixels().all(|p| *p == Rgb([99, 99, 99])));
    }
}
