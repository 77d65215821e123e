//! Image preparation for text recognition
//!
//! Burned-in overlay text sits on low-contrast imagery of varying polarity
//! (light-on-dark on most ultrasound frames, dark-on-light on prints).
//! [`prepare`] normalizes both before recognition: upscale, grayscale with
//! contrast stretch, local adaptive thresholding, then polarity inversion
//! when the frame reads as light text on a dark background.
//!
//! The pipeline is pure and deterministic; identical inputs produce
//! identical prepared images.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

/// Inputs narrower than this are upscaled 2x before recognition
pub const UPSCALE_WIDTH_THRESHOLD: u32 = 1000;

/// Pivot of the contrast stretch, in gray levels
pub const CONTRAST_PIVOT: f64 = 50.0;

/// Gain of the contrast stretch
pub const CONTRAST_GAIN: f64 = 1.5;

/// Half-width of the local-mean window, in pixels
pub const WINDOW_HALF_WIDTH: usize = 15;

/// A pixel must exceed its local mean by this much to binarize white
pub const THRESHOLD_OFFSET: f64 = 15.0;

/// Minimum fraction of light pixels; below it the image is inverted so
/// recognition always sees dark text on a light background
pub const MIN_LIGHT_RATIO: f64 = 0.30;

/// Prepares a raster image for text recognition
///
/// Steps:
/// 1. Upscale 2x (bilinear) when the input is narrower than
///    [`UPSCALE_WIDTH_THRESHOLD`].
/// 2. Grayscale (`0.299R + 0.587G + 0.114B`) with a contrast stretch around
///    [`CONTRAST_PIVOT`].
/// 3. Adaptive thresholding: each pixel binarizes white only when brighter
///    than the mean of its local window plus [`THRESHOLD_OFFSET`]. The
///    window is clipped at the borders, so images smaller than the window
///    still process correctly.
/// 4. Polarity normalization: if fewer than [`MIN_LIGHT_RATIO`] of the
///    pixels came out white, every channel is inverted.
///
/// The output is a new RGB image at the (possibly upscaled) input
/// resolution with all three channels equal and either 0 or 255. An
/// entirely uniform input degenerates to a single color, which simply
/// yields no text downstream. A zero-sized input is returned unchanged;
/// the orchestrator rejects those before this stage.
pub fn prepare(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let rgb = if width < UPSCALE_WIDTH_THRESHOLD {
        image
            .resize_exact(width * 2, height * 2, FilterType::Triangle)
            .to_rgb8()
    } else {
        image.to_rgb8()
    };
    let (width, height) = rgb.dimensions();
    let (w, h) = (width as usize, height as usize);

    let gray = enhanced_grayscale(&rgb);
    let (mut binary, light) = adaptive_threshold(&gray, w, h);

    let light_ratio = light as f64 / (w * h) as f64;
    if light_ratio < MIN_LIGHT_RATIO {
        for value in &mut binary {
            *value = 255 - *value;
        }
    }

    let out = RgbImage::from_fn(width, height, |x, y| {
        let v = binary[y as usize * w + x as usize];
        Rgb([v, v, v])
    });
    DynamicImage::ImageRgb8(out)
}

/// Grayscale conversion with the contrast stretch applied
fn enhanced_grayscale(rgb: &RgbImage) -> Vec<u8> {
    rgb.pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            let enhanced = (luma - CONTRAST_PIVOT) * CONTRAST_GAIN + CONTRAST_PIVOT;
            enhanced.clamp(0.0, 255.0).round() as u8
        })
        .collect()
}

/// Binarizes against the clipped local-window mean
///
/// Uses an integral image so the cost is linear in the pixel count rather
/// than quadratic in the window size; the arithmetic is identical to
/// summing the window directly. Returns the binary buffer and the number
/// of white pixels.
fn adaptive_threshold(gray: &[u8], w: usize, h: usize) -> (Vec<u8>, usize) {
    let stride = w + 1;
    let mut integral = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += gray[y * w + x] as u64;
            integral[(y + 1) * stride + (x + 1)] = integral[y * stride + (x + 1)] + row_sum;
        }
    }

    let mut binary = vec![0u8; w * h];
    let mut light = 0usize;

    for y in 0..h {
        let y0 = y.saturating_sub(WINDOW_HALF_WIDTH);
        let y1 = (y + WINDOW_HALF_WIDTH).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(WINDOW_HALF_WIDTH);
            let x1 = (x + WINDOW_HALF_WIDTH).min(w);

            let sum = (integral[y1 * stride + x1] + integral[y0 * stride + x0])
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let count = ((y1 - y0) * (x1 - x0)) as f64;
            let local_mean = sum as f64 / count;

            if gray[y * w + x] as f64 > local_mean + THRESHOLD_OFFSET {
                binary[y * w + x] = 255;
                light += 1;
            }
        }
    }

    (binary, light)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: u32, height: u32, level: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([level, level, level]),
        ))
    }

    fn light_fraction(image: &DynamicImage) -> f64 {
        let rgb = image.to_rgb8();
        let light = rgb.pixels().filter(|p| p.0[0] > 128).count();
        light as f64 / (rgb.width() * rgb.height()) as f64
    }

    fn assert_binary(image: &DynamicImage) {
        let rgb = image.to_rgb8();
        for pixel in rgb.pixels() {
            let [r, g, b] = pixel.0;
            assert!(r == 0 || r == 255, "channel not binary: {}", r);
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
    }

    #[test]
    fn test_uniform_gray_degenerates_to_binary() {
        let prepared = prepare(&uniform(100, 100, 128));
        assert_binary(&prepared);

        // Nothing exceeds its own local mean, so thresholding goes all
        // black and polarity normalization flips it to all white.
        let rgb = prepared.to_rgb8();
        assert!(rgb.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_narrow_input_upscaled_2x() {
        let prepared = prepare(&uniform(100, 80, 40));
        assert_eq!(prepared.dimensions(), (200, 160));
    }

    #[test]
    fn test_wide_input_not_upscaled() {
        let prepared = prepare(&uniform(1000, 50, 40));
        assert_eq!(prepared.dimensions(), (1000, 50));
    }

    #[test]
    fn test_width_just_below_threshold_upscaled() {
        let prepared = prepare(&uniform(999, 10, 40));
        assert_eq!(prepared.dimensions(), (1998, 20));
    }

    #[test]
    fn test_polarity_light_text_on_dark() {
        // Sparse bright dots on black, like overlay text on ultrasound
        let mut img = RgbImage::from_pixel(60, 60, Rgb([10, 10, 10]));
        for i in 0..10 {
            img.put_pixel(5 + i * 5, 30, Rgb([255, 255, 255]));
        }
        let prepared = prepare(&DynamicImage::ImageRgb8(img));
        assert_binary(&prepared);
        assert!(light_fraction(&prepared) >= MIN_LIGHT_RATIO);
    }

    #[test]
    fn test_polarity_dark_text_on_light() {
        let mut img = RgbImage::from_pixel(60, 60, Rgb([230, 230, 230]));
        for i in 0..10 {
            img.put_pixel(5 + i * 5, 30, Rgb([0, 0, 0]));
        }
        let prepared = prepare(&DynamicImage::ImageRgb8(img));
        assert_binary(&prepared);
        assert!(light_fraction(&prepared) >= MIN_LIGHT_RATIO);
    }

    #[test]
    fn test_gradient_stays_binary() {
        let img = RgbImage::from_fn(40, 40, |x, _| {
            let v = (x * 6) as u8;
            Rgb([v, v, v])
        });
        let prepared = prepare(&DynamicImage::ImageRgb8(img));
        assert_binary(&prepared);
        assert!(light_fraction(&prepared) >= MIN_LIGHT_RATIO);
    }

    #[test]
    fn test_image_smaller_than_window() {
        let prepared = prepare(&uniform(5, 5, 200));
        assert_eq!(prepared.dimensions(), (10, 10));
        assert_binary(&prepared);
    }

    #[test]
    fn test_single_pixel() {
        let prepared = prepare(&uniform(1, 1, 77));
        assert_eq!(prepared.dimensions(), (2, 2));
        assert_binary(&prepared);
    }

    #[test]
    fn test_zero_sized_input_passes_through() {
        let empty = DynamicImage::new_rgb8(0, 0);
        let prepared = prepare(&empty);
        assert_eq!(prepared.dimensions(), (0, 0));
    }

    #[test]
    fn test_deterministic() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(30, 30, |x, y| {
            let v = ((x * 7 + y * 13) % 256) as u8;
            Rgb([v, v, v])
        }));
        let first = prepare(&img).to_rgb8();
        let second = prepare(&img).to_rgb8();
        assert_eq!(first.as_raw(), second.as_raw());
    }
}
