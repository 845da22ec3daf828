use super::PngError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdaptiveFilterType {
    None,
    Sub,
    Up,
    Average,
    Paeth,
}

impl AdaptiveFilterType {
    fn revert_filter(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        match self {
            AdaptiveFilterType::None => x,
            AdaptiveFilterType::Sub => x.wrapping_add(a),
            AdaptiveFilterType::Up => x.wrapping_add(b),
            AdaptiveFilterType::Average => x.wrapping_add(((a as u16 + b as u16) / 2) as u8),
            AdaptiveFilterType::Paeth => x.wrapping_add(paeth_predictor(a, b, c)),
        }
    }

    fn from_byte(byte: u8) -> Result<Self, PngError> {
        Ok(match byte {
            0 => AdaptiveFilterType::None,
            1 => AdaptiveFilterType::Sub,
            2 => AdaptiveFilterType::Up,
            3 => AdaptiveFilterType::Average,
            4 => AdaptiveFilterType::Paeth,
            f => {
                return Err(PngError::Malformed(format!(
                    "Unrecognized adaptive filter type {f}"
                )));
            }
        })
    }
}

fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let (a, b, c) = (a as i16, b as i16, c as i16);
    let p = a + b - c;
    let pa = p.abs_diff(a);
    let pb = p.abs_diff(b);
    let pc = p.abs_diff(c);

    if pa <= pb && pa <= pc {
        a as u8
    } else if pb <= pc {
        b as u8
    } else {
        c as u8
    }
}

/// Undoes per-row filtering. `filtered` holds `height` rows of
/// `1 + row_length` bytes each, the first byte of every row naming its filter.
pub fn remove_scanlines_filter(
    filtered: &[u8],
    height: usize,
    row_length: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, PngError> {
    let mut unfiltered: Vec<u8> = Vec::with_capacity(height * row_length);

    for (row, scanline) in filtered.chunks_exact(row_length + 1).take(height).enumerate() {
        let filter_type = AdaptiveFilterType::from_byte(scanline[0])?;
        let current = row * row_length;

        for col in 0..row_length {
            let x = scanline[col + 1];
            let a = if col >= bytes_per_pixel {
                unfiltered[current + col - bytes_per_pixel]
            } else {
                0
            };
            let (b, c) = if row > 0 {
                let previous = current - row_length;
                let b = unfiltered[previous + col];
                let c = if col >= bytes_per_pixel {
                    unfiltered[previous + col - bytes_per_pixel]
                } else {
                    0
                };
                (b, c)
            } else {
                (0, 0)
            };

            unfiltered.push(filter_type.revert_filter(x, a, b, c));
        }
    }

    Ok(unfiltered)
}
