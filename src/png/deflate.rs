use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder};

use super::{config::CompressionLevel, PngError};

pub fn compress_scanlines(
    scanlines: &[u8],
    compression_level: CompressionLevel,
) -> Result<Vec<u8>, PngError> {
    let mut e = ZlibEncoder::new(Vec::new(), compression_level.into());
    e.write_all(scanlines)?;

    Ok(e.finish()?)
}

/// Inflates at most `expected_length + 1` bytes. The one extra byte is enough
/// to tell that the stream holds trailing data without buffering all of it.
pub fn uncompress_scanlines(
    compressed: &[u8],
    expected_length: usize,
) -> Result<Vec<u8>, PngError> {
    let mut d = ZlibDecoder::new(compressed).take(expected_length as u64 + 1);
    let mut scanlines =
        Vec::with_capacity(expected_length.min(compressed.len().saturating_mul(4)));
    d.read_to_end(&mut scanlines)
        .map_err(PngError::Decompress)?;

    Ok(scanlines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_a_zlib_stream() {
        let raw = [0, 255, 0, 255, 255, 0, 255, 0, 255];
        let compressed = compress_scanlines(&raw, CompressionLevel::Default).unwrap();

        assert_eq!(compressed[0] & 0x0f, 8);
        assert_eq!(((compressed[0] as u16) << 8 | compressed[1] as u16) % 31, 0);
        assert_eq!(uncompress_scanlines(&compressed, raw.len()).unwrap(), raw);
    }

    #[test]
    fn stored_level_still_inflates() {
        let raw = vec![7; 1000];
        let compressed = compress_scanlines(&raw, CompressionLevel::None).unwrap();

        assert!(compressed.len() > raw.len());
        assert_eq!(uncompress_scanlines(&compressed, raw.len()).unwrap(), raw);
    }

    #[test]
    fn stops_one_byte_past_the_expected_length() {
        let raw = vec![0; 4 << 20];
        let compressed = compress_scanlines(&raw, CompressionLevel::Best).unwrap();
        let scanlines = uncompress_scanlines(&compressed, 4).unwrap();

        assert_eq!(scanlines, [0, 0, 0, 0, 0]);
        assert!(scanlines.capacity() < 4096);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            uncompress_scanlines(&[0x12, 0x34, 0x56], 16),
            Err(PngError::Decompress(_))
        ));
    }
}
