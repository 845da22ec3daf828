use std::io::{self, Write};

use crate::{
    png::{
        color_type::ColorType,
        consts::{IHDR_CHUNK_TYPE, IHDR_DATA_LENGTH, MAX_DIMENSION, SUPPORTED_BIT_DEPTH},
        PngError,
    },
    png_assert,
};

use super::{write_chunk, Chunk};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompressionMethod {
    Deflate,
    Other(u8),
}

impl From<u8> for CompressionMethod {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Deflate,
            other => Self::Other(other),
        }
    }
}

impl From<&CompressionMethod> for u8 {
    fn from(value: &CompressionMethod) -> Self {
        match value {
            CompressionMethod::Deflate => 0,
            CompressionMethod::Other(other) => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterMethod {
    Adaptive,
    Other(u8),
}

impl From<u8> for FilterMethod {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Adaptive,
            other => Self::Other(other),
        }
    }
}

impl From<&FilterMethod> for u8 {
    fn from(value: &FilterMethod) -> Self {
        match value {
            FilterMethod::Adaptive => 0,
            FilterMethod::Other(other) => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterlaceMethod {
    NoInterlace,
    Other(u8),
}

impl From<u8> for InterlaceMethod {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::NoInterlace,
            other => Self::Other(other),
        }
    }
}

impl From<&InterlaceMethod> for u8 {
    fn from(value: &InterlaceMethod) -> Self {
        match value {
            InterlaceMethod::NoInterlace => 0,
            InterlaceMethod::Other(other) => *other,
        }
    }
}

#[derive(Debug)]
pub struct Ihdr {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    compression_method: CompressionMethod,
    filter_method: FilterMethod,
    interlace_method: InterlaceMethod,
}

impl Ihdr {
    pub fn new(width: u32, height: u32, color_type: ColorType) -> Self {
        Self {
            width,
            height,
            bit_depth: SUPPORTED_BIT_DEPTH,
            color_type,
            compression_method: CompressionMethod::Deflate,
            filter_method: FilterMethod::Adaptive,
            interlace_method: InterlaceMethod::NoInterlace,
        }
    }

    pub fn to_data(&self) -> [u8; IHDR_DATA_LENGTH] {
        let mut data = [0; IHDR_DATA_LENGTH];
        data[0..4].copy_from_slice(&self.width.to_be_bytes());
        data[4..8].copy_from_slice(&self.height.to_be_bytes());
        data[8] = self.bit_depth;
        data[9] = (&self.color_type).into();
        data[10] = (&self.compression_method).into();
        data[11] = (&self.filter_method).into();
        data[12] = (&self.interlace_method).into();

        data
    }

    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        write_chunk(sink, IHDR_CHUNK_TYPE, &self.to_data())
    }

    pub fn from_chunk(chunk: &Chunk) -> Result<Self, PngError> {
        png_assert!(
            chunk.chunk_type == IHDR_CHUNK_TYPE,
            format!("Expected IHDR chunk, found {}", chunk.name())
        );

        png_assert!(
            chunk.chunk_data.len() == IHDR_DATA_LENGTH,
            format!(
                "Invalid IHDR chunk size, expected {}, received {}",
                IHDR_DATA_LENGTH,
                chunk.chunk_data.len()
            )
        );

        let data = chunk.chunk_data;
        let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        let bit_depth = data[8];
        let color_type_byte = data[9];
        let compression_method = CompressionMethod::from(data[10]);
        let filter_method = FilterMethod::from(data[11]);
        let interlace_method = InterlaceMethod::from(data[12]);

        png_assert!(
            (1..=MAX_DIMENSION).contains(&width) && (1..=MAX_DIMENSION).contains(&height),
            format!("Invalid image dimensions {width}x{height}")
        );

        Ok(Self {
            width,
            height,
            bit_depth,
            color_type: ColorType::try_from(color_type_byte)?,
            compression_method,
            filter_method,
            interlace_method,
        })
    }

    pub fn check_compatibility(&self) -> Result<(), PngError> {
        if self.bit_depth != SUPPORTED_BIT_DEPTH {
            return Err(PngError::Unsupported(format!(
                "bit depth {} (only {SUPPORTED_BIT_DEPTH} is supported)",
                self.bit_depth
            )));
        }

        if let CompressionMethod::Other(method) = self.compression_method {
            return Err(PngError::Unsupported(format!("compression method {method}")));
        }

        if let FilterMethod::Other(method) = self.filter_method {
            return Err(PngError::Unsupported(format!("filter method {method}")));
        }

        if let InterlaceMethod::Other(method) = self.interlace_method {
            return Err(PngError::Unsupported(format!("interlace method {method}")));
        }

        Ok(())
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.color_type.samples_per_pixel() * (self.bit_depth as usize / 8)
    }

    /// Bytes in one row, without the filter byte.
    pub fn row_length(&self) -> Result<usize, PngError> {
        (self.width as usize)
            .checked_mul(self.bytes_per_pixel())
            .ok_or_else(|| PngError::Malformed(format!("image width {} is too large", self.width)))
    }

    /// Size of the decompressed image data: every row plus its filter byte.
    pub fn image_data_length(&self) -> Result<usize, PngError> {
        (self.height as usize)
            .checked_mul(self.row_length()? + 1)
            .ok_or_else(|| {
                PngError::Malformed(format!("image height {} is too large", self.height))
            })
    }
}
