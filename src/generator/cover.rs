//! Cover images: format sniffing for supplied covers and placeholder rendering.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::error::{Error, Result};

/// Produces cover image bytes when the caller supplied none.
///
/// Any `Fn(&str) -> Result<Vec<u8>>` closure taking the book title is a
/// generator.
pub trait CoverGenerator {
    fn generate(&self, title: &str) -> Result<Vec<u8>>;
}

impl<F> CoverGenerator for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn generate(&self, title: &str) -> Result<Vec<u8>> {
        self(title)
    }
}

/// Renders a plain fixed-size PNG: a blank canvas with a framed band whose
/// shade is derived from the title.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderCover {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub frame: [u8; 3],
}

impl Default for PlaceholderCover {
    fn default() -> Self {
        Self {
            width: 600,
            height: 800,
            background: [255, 255, 255],
            frame: [40, 40, 40],
        }
    }
}

impl PlaceholderCover {
    fn accent(title: &str) -> Rgb<u8> {
        let seed = title
            .chars()
            .fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(c as u32));
        let [r, g, b, _] = seed.to_le_bytes();
        // Keep the band light so it reads as a placeholder.
        Rgb([160 + r % 96, 160 + g % 96, 160 + b % 96])
    }

    /// Renders the canvas for `title`.
    pub fn render(&self, title: &str) -> RgbImage {
        let (width, height) = (self.width, self.height);
        let mut canvas = RgbImage::from_pixel(width, height, Rgb(self.background));

        let margin = width.min(height) / 20;
        let border = (margin / 4).max(1);
        let band_top = height * 2 / 5;
        let band_bottom = height * 3 / 5;
        let accent = Self::accent(title);
        let frame = Rgb(self.frame);

        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            let inside_margin =
                x >= margin && x < width - margin && y >= margin && y < height - margin;
            if !inside_margin {
                continue;
            }
            let on_frame = x < margin + border
                || x >= width - margin - border
                || y < margin + border
                || y >= height - margin - border;
            if on_frame {
                *pixel = frame;
            } else if y >= band_top && y < band_bottom {
                *pixel = accent;
            }
        }
        canvas
    }
}

impl CoverGenerator for PlaceholderCover {
    fn generate(&self, title: &str) -> Result<Vec<u8>> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Unsupported(
                "Placeholder cover dimensions must be non-zero".to_string(),
            ));
        }
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(self.render(title)).write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Determines `(extension, MIME type)` of an image from its leading bytes.
///
/// # Supported formats
///
/// - PNG: image/png
/// - JPEG: image/jpeg
/// - GIF: image/gif
/// - WebP: image/webp
/// - BMP: image/bmp
pub fn image_file_info(bytes: &[u8]) -> Result<(&'static str, &'static str)> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok(("png", "image/png")),
        Ok(ImageFormat::Jpeg) => Ok(("jpg", "image/jpeg")),
        Ok(ImageFormat::Gif) => Ok(("gif", "image/gif")),
        Ok(ImageFormat::WebP) => Ok(("webp", "image/webp")),
        Ok(ImageFormat::Bmp) => Ok(("bmp", "image/bmp")),
        Ok(format) => Err(Error::Unsupported(format!("Cover image format {:?}", format))),
        Err(_) => Err(Error::Unsupported(
            "Cover data is not a recognized image".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_png_of_fixed_size() {
        let bytes = PlaceholderCover::default().generate("测试书名").unwrap();
        assert_eq!(image_file_info(&bytes).unwrap(), ("png", "image/png"));

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (600, 800));
    }

    #[test]
    fn test_placeholder_draws_frame_and_band() {
        let cover = PlaceholderCover::default();
        let canvas = cover.render("标题");
        // Corner stays background, the frame line is dark, the band is tinted.
        assert_eq!(canvas.get_pixel(0, 0), &Rgb(cover.background));
        assert_eq!(canvas.get_pixel(300, 30), &Rgb(cover.frame));
        assert_eq!(
            canvas.get_pixel(300, 400),
            &PlaceholderCover::accent("标题")
        );
    }

    #[test]
    fn test_zero_sized_placeholder_is_rejected() {
        let cover = PlaceholderCover {
            width: 0,
            ..Default::default()
        };
        assert!(cover.generate("x").is_err());
    }

    #[test]
    fn test_closure_generator() {
        let generator = |title: &str| -> Result<Vec<u8>> { Ok(title.as_bytes().to_vec()) };
        assert_eq!(generator.generate("abc").unwrap(), b"abc".to_vec());
    }

    #[test]
    fn test_image_file_info_rejects_text() {
        assert!(image_file_info(b"definitely not an image").is_err());
    }
}
