use crate::{
    colors::Rgba,
    png::{ColorType, PngError},
};

/// A rectangular, row-major grid of 8 bit samples. Channels of a pixel are
/// interleaved (`R, G, B[, A]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pub width: u32,
    pub height: u32,
    pub color_type: ColorType,
    pub data: Vec<u8>,
}

impl PixelGrid {
    pub fn new(width: u32, height: u32, color_type: ColorType, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            color_type,
            data,
        }
    }

    /// Builds a grid by asking `pixel_at(x, y)` for every pixel. Alpha is
    /// dropped for `Truecolor`.
    pub fn from_fn<F>(width: u32, height: u32, color_type: ColorType, mut pixel_at: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgba,
    {
        let samples = color_type.samples_per_pixel();
        let mut data = Vec::with_capacity(width as usize * height as usize * samples);

        for y in 0..height {
            for x in 0..width {
                let pixel = pixel_at(x, y);
                data.extend_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a][..samples]);
            }
        }

        Self::new(width, height, color_type, data)
    }

    pub fn filled(width: u32, height: u32, color_type: ColorType, color: Rgba) -> Self {
        Self::from_fn(width, height, color_type, |_, _| color)
    }

    /// `fill` with a one pixel `border` around the outermost rows and columns.
    pub fn bordered(
        width: u32,
        height: u32,
        color_type: ColorType,
        fill: Rgba,
        border: Rgba,
    ) -> Self {
        Self::from_fn(width, height, color_type, |x, y| {
            let on_edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            if on_edge {
                border
            } else {
                fill
            }
        })
    }

    /// Bytes in one row, without the filter byte.
    pub fn row_length(&self) -> usize {
        self.width as usize * self.color_type.samples_per_pixel()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let samples = self.color_type.samples_per_pixel();
        let start = y as usize * self.row_length() + x as usize * samples;
        let pixel = self.data.get(start..start + samples)?;
        let alpha = pixel.get(3).copied().unwrap_or(u8::MAX);

        Some(Rgba::new(pixel[0], pixel[1], pixel[2], alpha))
    }

    /// Checks that the dimensions are encodable and that `data` matches them.
    pub fn check_geometry(&self) -> Result<(), PngError> {
        let invalid_dimensions = || PngError::InvalidDimensions {
            width: self.width,
            height: self.height,
        };

        if self.width == 0 || self.height == 0 {
            return Err(invalid_dimensions());
        }

        if self.width > crate::png::MAX_DIMENSION || self.height > crate::png::MAX_DIMENSION {
            return Err(invalid_dimensions());
        }

        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(self.color_type.samples_per_pixel()))
            .ok_or_else(invalid_dimensions)?;

        if expected != self.data.len() {
            return Err(PngError::ChannelMismatch {
                expected,
                actual: self.data.len(),
            });
        }

        Ok(())
    }
}
