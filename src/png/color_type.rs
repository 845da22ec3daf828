use super::PngError;

/// Color types the encoder can emit, both at 8 bits per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorType {
    Truecolor,
    TrueColorAlpha,
}

impl ColorType {
    pub fn samples_per_pixel(&self) -> usize {
        match self {
            ColorType::Truecolor => 3,
            ColorType::TrueColorAlpha => 4,
        }
    }
}

impl TryFrom<u8> for ColorType {
    type Error = PngError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Truecolor),
            6 => Ok(Self::TrueColorAlpha),
            0 | 3 | 4 => Err(PngError::Unsupported(format!(
                "color type {value} (only truecolor and truecolor with alpha are supported)"
            ))),
            _ => Err(PngError::Malformed(format!("Unrecognized color type {value}"))),
        }
    }
}

impl From<&ColorType> for u8 {
    fn from(value: &ColorType) -> Self {
        match value {
            ColorType::Truecolor => 2,
            ColorType::TrueColorAlpha => 6,
        }
    }
}
