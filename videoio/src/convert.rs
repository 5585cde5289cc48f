//! Packed-YUV to RGB conversion for camera frames.

use crate::{Result, VideoError};
use image::RgbImage;

/// Converts a packed YUYV (YUV 4:2:2) buffer to RGB.
///
/// YUYV stores two horizontally adjacent pixels as `Y0 U Y1 V`, sharing the
/// chroma pair, which is why the width must be even. Conversion uses BT.601
/// integer arithmetic.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    if width % 2 != 0 {
        return Err(VideoError::Backend(format!(
            "YUYV requires an even width, got {}",
            width
        )));
    }
    let expected = width as usize * height as usize * 2;
    if data.len() < expected {
        return Err(VideoError::ReadFailed(format!(
            "short YUYV buffer: {} bytes for {}x{} ({} expected)",
            data.len(),
            width,
            height,
            expected
        )));
    }

    let mut rgb = RgbImage::new(width, height);
    let out: &mut [u8] = &mut rgb;
    for (pair, chunk) in data[..expected].chunks_exact(4).enumerate() {
        let (y0, u, y1, v) = (
            chunk[0] as i32,
            chunk[1] as i32,
            chunk[2] as i32,
            chunk[3] as i32,
        );
        let base = pair * 6;
        write_bt601(&mut out[base..base + 3], y0, u, v);
        write_bt601(&mut out[base + 3..base + 6], y1, u, v);
    }

    Ok(rgb)
}

fn write_bt601(dst: &mut [u8], y: i32, u: i32, v: i32) {
    let c = y - 16;
    let d = u - 128;
    let e = v - 128;
    dst[0] = clamp_u8((298 * c + 409 * e + 128) >> 8);
    dst[1] = clamp_u8((298 * c - 100 * d - 208 * e + 128) >> 8);
    dst[2] = clamp_u8((298 * c + 516 * d + 128) >> 8);
}

fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn black_and_white_levels() {
        // Two pixel pairs: studio black then studio white.
        let data = [16, 128, 16, 128, 235, 128, 235, 128];
        let rgb = yuyv_to_rgb(&data, 4, 1).unwrap();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([0, 0, 0]));
        assert_eq!(rgb.get_pixel(2, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(3, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn bt601_red() {
        let data = [81, 90, 81, 240];
        let rgb = yuyv_to_rgb(&data, 2, 1).unwrap();
        let p = rgb.get_pixel(0, 0);
        assert_eq!(p, &Rgb([255, 0, 0]));
    }

    #[test]
    fn short_buffer_is_an_error() {
        let data = [16, 128, 16];
        assert!(matches!(
            yuyv_to_rgb(&data, 2, 1),
            Err(VideoError::ReadFailed(_))
        ));
    }

    #[test]
    fn odd_width_is_rejected() {
        let data = [16, 128, 16, 128];
        assert!(yuyv_to_rgb(&data, 3, 1).is_err());
    }
}
