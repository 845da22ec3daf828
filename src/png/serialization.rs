use crate::image::PixelGrid;

use super::{chunks::ihdr::Ihdr, filter::remove_scanlines_filter, PngError};

const NO_FILTER: u8 = 0;

/// Prefixes every row with filter type None. The result is exactly
/// `height * (1 + row_length)` bytes.
pub fn build_scanlines(grid: &PixelGrid) -> Result<Vec<u8>, PngError> {
    grid.check_geometry()?;

    let row_length = grid.row_length();
    let mut scanlines: Vec<u8> = Vec::with_capacity(grid.height as usize * (row_length + 1));

    for row in grid.data.chunks_exact(row_length) {
        scanlines.push(NO_FILTER);
        scanlines.extend_from_slice(row);
    }

    Ok(scanlines)
}

/// Turns decompressed image data back into pixels for the geometry in `ihdr`.
pub fn scanlines_to_pixels(ihdr: &Ihdr, filtered: &[u8]) -> Result<PixelGrid, PngError> {
    let height = ihdr.height as usize;
    let bytes_per_pixel = ihdr.bytes_per_pixel();
    let row_length = ihdr.row_length()?;
    let expected = ihdr.image_data_length()?;

    if filtered.len() < expected {
        return Err(PngError::Malformed(format!(
            "image data is {} bytes after decompression, expected {expected}",
            filtered.len()
        )));
    }

    if filtered.len() > expected {
        log::warn!("ignoring trailing image data after {expected} bytes");
    }

    let data = remove_scanlines_filter(&filtered[..expected], height, row_length, bytes_per_pixel)?;

    Ok(PixelGrid::new(ihdr.width, ihdr.height, ihdr.color_type, data))
}
