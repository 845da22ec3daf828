use std::io::Write;

use chunks::{idat::Idat, iend::Iend, ihdr::Ihdr, Chunk};
use consts::{
    CHUNK_METADATA_LENGTH, IDAT_CHUNK_TYPE, IEND_CHUNK_TYPE, IHDR_CHUNK_TYPE, IHDR_DATA_LENGTH,
    PLTE_CHUNK_TYPE,
};
use deflate::uncompress_scanlines;
use log::{debug, warn};
use serialization::scanlines_to_pixels;

use crate::{binary::byte_reader::ByteReader, image::PixelGrid, png_assert};

pub use chunks::write_chunk;
pub use color_type::ColorType;
pub use config::{CompressionLevel, PngConfig};
pub use consts::{MAX_DIMENSION, PNG_SIGNATURE};
pub use crc::{crc32, CrcCalculator};
pub use deflate::compress_scanlines;
pub use error::PngError;
pub use serialization::build_scanlines;

mod chunks;
mod color_type;
mod config;
mod consts;
mod crc;
mod deflate;
mod error;
mod filter;
mod serialization;

/// Encodes `grid` with the default configuration.
pub fn encode(grid: &PixelGrid) -> Result<Vec<u8>, PngError> {
    encode_png(grid, &PngConfig::default())
}

/// Decodes a truecolor PNG back into a [`PixelGrid`].
pub fn decode(bytes: &[u8]) -> Result<PixelGrid, PngError> {
    decode_png(bytes)
}

/// Produces signature, IHDR, a single IDAT and IEND. Nothing is returned
/// unless the whole file was assembled.
pub fn encode_png(grid: &PixelGrid, config: &PngConfig) -> Result<Vec<u8>, PngError> {
    let scanlines = build_scanlines(grid)?;
    let compressed_data = compress_scanlines(&scanlines, config.compression_level)?;
    let ihdr = Ihdr::new(grid.width, grid.height, grid.color_type);

    let mut encoded_png: Vec<u8> = Vec::with_capacity(
        PNG_SIGNATURE.len()
            + 3 * CHUNK_METADATA_LENGTH
            + IHDR_DATA_LENGTH
            + compressed_data.len(),
    );
    encoded_png.extend_from_slice(PNG_SIGNATURE);
    ihdr.write_to(&mut encoded_png)?;
    Idat::write_to(&compressed_data, &mut encoded_png)?;
    Iend::write_to(&mut encoded_png)?;

    debug!(
        "encoded {}x{} {:?} image: {} scanline bytes, {} compressed, {} total",
        grid.width,
        grid.height,
        grid.color_type,
        scanlines.len(),
        compressed_data.len(),
        encoded_png.len()
    );

    Ok(encoded_png)
}

/// Encodes into memory first and only then writes to `sink`, so a failed
/// encode leaves the sink untouched.
pub fn encode_png_to<W: Write>(
    grid: &PixelGrid,
    config: &PngConfig,
    sink: &mut W,
) -> Result<(), PngError> {
    let encoded_png = encode_png(grid, config)?;
    sink.write_all(&encoded_png)?;

    Ok(())
}

pub fn decode_png(bytes: &[u8]) -> Result<PixelGrid, PngError> {
    let mut reader = ByteReader::new(bytes);

    match reader.read_bytes(PNG_SIGNATURE.len()) {
        Some(signature) if signature == PNG_SIGNATURE => {}
        _ => return Err(PngError::BadSignature),
    }

    let ihdr = Ihdr::from_chunk(&Chunk::from_reader(&mut reader)?)?;
    ihdr.check_compatibility()?;

    let mut compressed_data: Vec<u8> = Vec::new();
    let mut idat_chunks = 0;

    loop {
        if reader.is_finished() {
            return Err(PngError::TruncatedChunk(
                "input ended before the IEND chunk".to_string(),
            ));
        }

        let chunk = Chunk::from_reader(&mut reader)?;

        match chunk.chunk_type {
            IDAT_CHUNK_TYPE => {
                compressed_data.extend_from_slice(chunk.chunk_data);
                idat_chunks += 1;
            }
            IEND_CHUNK_TYPE => break,
            IHDR_CHUNK_TYPE => {
                return Err(PngError::Malformed("duplicate IHDR chunk".to_string()));
            }
            PLTE_CHUNK_TYPE => debug!("skipping suggested palette of a truecolor image"),
            _ if chunk.is_ancillary() => {
                debug!(
                    "skipping ancillary {} chunk ({} bytes)",
                    chunk.name(),
                    chunk.chunk_data.len()
                )
            }
            _ => {
                return Err(PngError::Unsupported(format!(
                    "critical chunk {}",
                    chunk.name()
                )))
            }
        }
    }

    png_assert!(idat_chunks > 0, "no IDAT chunk before IEND".to_string());

    if !reader.is_finished() {
        warn!(
            "ignoring {} bytes after the IEND chunk",
            reader.number_of_bytes_left()
        );
    }

    let filtered_scanlines = uncompress_scanlines(&compressed_data, ihdr.image_data_length()?)?;
    let grid = scanlines_to_pixels(&ihdr, &filtered_scanlines)?;

    debug!(
        "decoded {}x{} {:?} image from {} IDAT chunk(s)",
        grid.width, grid.height, grid.color_type, idat_chunks
    );

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Rgba;

    fn magenta_2x2() -> PixelGrid {
        PixelGrid::filled(2, 2, ColorType::TrueColorAlpha, Rgba::new(255, 0, 255, 255))
    }

    fn gradient(width: u32, height: u32, color_type: ColorType) -> PixelGrid {
        PixelGrid::from_fn(width, height, color_type, |x, y| {
            Rgba::new(x as u8, y as u8, (x * y) as u8, (x + y) as u8)
        })
    }

    /// Offsets of `(data_start, data_end)` for every chunk after the signature.
    fn chunk_data_ranges(png: &[u8]) -> Vec<(usize, usize)> {
        let mut ranges = Vec::new();
        let mut offset = PNG_SIGNATURE.len();

        while offset < png.len() {
            let length = u32::from_be_bytes(png[offset..offset + 4].try_into().unwrap()) as usize;
            ranges.push((offset + 8, offset + 8 + length));
            offset += CHUNK_METADATA_LENGTH + length;
        }

        ranges
    }

    #[test]
    fn magenta_header_and_round_trip() {
        let grid = magenta_2x2();
        let png = encode(&grid).unwrap();

        assert_eq!(&png[..8], PNG_SIGNATURE);
        assert_eq!(&png[8..16], b"\x00\x00\x00\x0dIHDR");
        assert_eq!(&png[16..29], &[0, 0, 0, 2, 0, 0, 0, 2, 8, 6, 0, 0, 0]);
        assert_eq!(decode(&png).unwrap(), grid);
    }

    #[test]
    fn single_black_pixel_layout() {
        let grid = PixelGrid::new(1, 1, ColorType::Truecolor, vec![0, 0, 0]);
        let png = encode(&grid).unwrap();
        let compressed = compress_scanlines(&[0, 0, 0, 0], CompressionLevel::Default).unwrap();

        assert_eq!(png.len(), 8 + 25 + (12 + compressed.len()) + 12);
        assert_eq!(&png[png.len() - 12..], b"\x00\x00\x00\x00IEND\xae\x42\x60\x82");
        assert_eq!(png[25], 2);
    }

    #[test]
    fn round_trips_both_color_types() {
        for color_type in [ColorType::Truecolor, ColorType::TrueColorAlpha] {
            for (width, height) in [(1, 1), (3, 7), (16, 16), (256, 3)] {
                let grid = gradient(width, height, color_type);
                let png = encode(&grid).unwrap();

                assert_eq!(decode(&png).unwrap(), grid, "{width}x{height} {color_type:?}");
            }
        }
    }

    #[test]
    fn compression_levels_do_not_change_pixels() {
        let grid = gradient(40, 40, ColorType::TrueColorAlpha);

        for level in [
            CompressionLevel::None,
            CompressionLevel::Fast,
            CompressionLevel::Default,
            CompressionLevel::Best,
        ] {
            let png = encode_png(&grid, &PngConfig::new().compression_level(level)).unwrap();
            assert_eq!(decode(&png).unwrap(), grid, "{level:?}");
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let grid = gradient(33, 9, ColorType::Truecolor);

        assert_eq!(encode(&grid).unwrap(), encode(&grid).unwrap());
    }

    #[test]
    fn any_flipped_data_byte_fails_the_checksum() {
        let png = encode(&gradient(4, 4, ColorType::TrueColorAlpha)).unwrap();

        for (start, end) in chunk_data_ranges(&png) {
            for index in start..end {
                let mut corrupted = png.clone();
                corrupted[index] ^= 0x40;

                assert!(
                    matches!(decode(&corrupted), Err(PngError::BadChecksum { .. })),
                    "byte {index} was not caught"
                );
            }
        }
    }

    #[test]
    fn corrupted_signature_is_rejected() {
        let png = encode(&magenta_2x2()).unwrap();

        for index in 0..8 {
            let mut corrupted = png.clone();
            corrupted[index] = corrupted[index].wrapping_add(1);
            assert!(matches!(decode(&corrupted), Err(PngError::BadSignature)));
        }

        assert!(matches!(decode(&png[8..]), Err(PngError::BadSignature)));
        assert!(matches!(decode(&png[..5]), Err(PngError::BadSignature)));
        assert!(matches!(decode(&[]), Err(PngError::BadSignature)));
    }

    #[test]
    fn truncated_files_are_rejected() {
        let png = encode(&magenta_2x2()).unwrap();

        for len in [12, 20, 33, 45, png.len() - 12, png.len() - 1] {
            assert!(
                matches!(decode(&png[..len]), Err(PngError::TruncatedChunk(_))),
                "length {len}"
            );
        }
    }

    #[test]
    fn invalid_dimensions_produce_no_bytes() {
        let mut sink = Vec::new();
        let zero_width = PixelGrid::new(0, 2, ColorType::Truecolor, Vec::new());

        assert!(matches!(
            encode_png_to(&zero_width, &PngConfig::default(), &mut sink),
            Err(PngError::InvalidDimensions { width: 0, height: 2 })
        ));
        assert!(sink.is_empty());

        let too_tall = PixelGrid::new(1, MAX_DIMENSION + 1, ColorType::Truecolor, Vec::new());
        assert!(matches!(
            encode(&too_tall),
            Err(PngError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let grid = PixelGrid::new(2, 2, ColorType::Truecolor, vec![0; 16]);

        assert!(matches!(
            encode(&grid),
            Err(PngError::ChannelMismatch {
                expected: 12,
                actual: 16
            })
        ));
    }

    #[test]
    fn encode_to_sink_matches_encode() {
        let grid = magenta_2x2();
        let mut sink = Vec::new();
        encode_png_to(&grid, &PngConfig::default(), &mut sink).unwrap();

        assert_eq!(sink, encode(&grid).unwrap());
    }

    #[test]
    fn skips_ancillary_and_split_idat_chunks() {
        let grid = gradient(5, 5, ColorType::Truecolor);
        let scanlines = build_scanlines(&grid).unwrap();
        let compressed = compress_scanlines(&scanlines, CompressionLevel::Best).unwrap();
        let (first, second) = compressed.split_at(compressed.len() / 2);

        let mut png = PNG_SIGNATURE.to_vec();
        Ihdr::new(5, 5, ColorType::Truecolor).write_to(&mut png).unwrap();
        write_chunk(&mut png, *b"tEXt", b"Comment\0placeholder").unwrap();
        write_chunk(&mut png, IDAT_CHUNK_TYPE, first).unwrap();
        write_chunk(&mut png, IDAT_CHUNK_TYPE, second).unwrap();
        write_chunk(&mut png, *b"tIME", &[7, 234, 10, 16, 0, 0, 0]).unwrap();
        write_chunk(&mut png, IEND_CHUNK_TYPE, &[]).unwrap();

        assert_eq!(decode(&png).unwrap(), grid);
    }

    #[test]
    fn oversized_image_data_is_not_buffered() {
        let inflated = vec![0; 16 << 20];
        let compressed = compress_scanlines(&inflated, CompressionLevel::Best).unwrap();

        let mut png = PNG_SIGNATURE.to_vec();
        Ihdr::new(1, 1, ColorType::Truecolor).write_to(&mut png).unwrap();
        write_chunk(&mut png, IDAT_CHUNK_TYPE, &compressed).unwrap();
        write_chunk(&mut png, IEND_CHUNK_TYPE, &[]).unwrap();

        let ihdr = Ihdr::new(1, 1, ColorType::Truecolor);
        let scanlines =
            uncompress_scanlines(&compressed, ihdr.image_data_length().unwrap()).unwrap();
        assert_eq!(scanlines.len(), 5);

        let grid = decode(&png).unwrap();
        assert_eq!(grid, PixelGrid::new(1, 1, ColorType::Truecolor, vec![0, 0, 0]));
    }

    #[test]
    fn unknown_critical_chunk_is_unsupported() {
        let grid = magenta_2x2();
        let compressed =
            compress_scanlines(&build_scanlines(&grid).unwrap(), CompressionLevel::Fast).unwrap();

        let mut png = PNG_SIGNATURE.to_vec();
        Ihdr::new(2, 2, ColorType::TrueColorAlpha).write_to(&mut png).unwrap();
        write_chunk(&mut png, *b"ABCD", &[1]).unwrap();
        write_chunk(&mut png, IDAT_CHUNK_TYPE, &compressed).unwrap();
        write_chunk(&mut png, IEND_CHUNK_TYPE, &[]).unwrap();

        assert!(matches!(decode(&png), Err(PngError::Unsupported(_))));
    }

    #[test]
    fn missing_idat_is_malformed() {
        let mut png = PNG_SIGNATURE.to_vec();
        Ihdr::new(2, 2, ColorType::TrueColorAlpha).write_to(&mut png).unwrap();
        write_chunk(&mut png, IEND_CHUNK_TYPE, &[]).unwrap();

        assert!(matches!(decode(&png), Err(PngError::Malformed(_))));
    }
}
