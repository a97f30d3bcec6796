/// Decoded source pictures and per-pixel colour access
use crate::error::PictureCloudError;
use image::RgbImage;
use std::path::Path;

/// 8-bit RGB colour of one pixel
pub type Colour = [u8; 3];

/// Read-only pixel grid addressed by 0-based column and row, row 0 at the top.
pub trait PixelSource: Sync {
    /// Width and height in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Colour at `(col, row)`
    fn pixel(&self, col: u32, row: u32) -> Result<Colour, PictureCloudError>;
}

/// Picture fully decoded into memory before sampling
pub struct SourceImage {
    pixels: RgbImage,
}

impl SourceImage {
    /// Decode an image file in one pass. Alpha is discarded.
    pub fn open(path: &Path) -> Result<Self, PictureCloudError> {
        let decoded = image::open(path).map_err(|err| {
            PictureCloudError::ImageRead(format!("{}: {}", path.display(), err))
        })?;

        Ok(Self {
            pixels: decoded.to_rgb8(),
        })
    }

    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }
}

impl PixelSource for SourceImage {
    fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn pixel(&self, col: u32, row: u32) -> Result<Colour, PictureCloudError> {
        self.pixels
            .get_pixel_checked(col, row)
            .map(|pixel| pixel.0)
            .ok_or_else(|| {
                let (width, height) = self.pixels.dimensions();
                PictureCloudError::ImageRead(format!(
                    "pixel ({col}, {row}) is outside the {width}x{height} image"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn reads_pixels_by_column_and_row() {
        let image = SourceImage::from_rgb(RgbImage::from_fn(3, 2, |x, y| {
            Rgb([x as u8, y as u8, 200])
        }));

        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.pixel(2, 1).unwrap(), [2, 1, 200]);
        assert_eq!(image.pixel(0, 0).unwrap(), [0, 0, 200]);
    }

    #[test]
    fn out_of_range_pixel_is_a_read_error() {
        let image = SourceImage::from_rgb(RgbImage::new(2, 2));
        assert!(matches!(
            image.pixel(2, 0),
            Err(PictureCloudError::ImageRead(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = SourceImage::open(Path::new("does/not/exist.png"));
        match result {
            Err(PictureCloudError::ImageRead(message)) => assert!(message.contains("exist.png")),
            _ => panic!("expected an image read error"),
        }
    }
}
