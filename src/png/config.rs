use flate2::Compression;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompressionLevel {
    None,
    Fast,
    #[default]
    Default,
    Best,
}

impl CompressionLevel {
    pub fn to_zlib_level(self) -> u32 {
        match self {
            CompressionLevel::None => 0,
            CompressionLevel::Fast => 1,
            CompressionLevel::Default => 6,
            CompressionLevel::Best => 9,
        }
    }
}

impl From<CompressionLevel> for Compression {
    fn from(value: CompressionLevel) -> Self {
        Compression::new(value.to_zlib_level())
    }
}

impl TryFrom<&str> for CompressionLevel {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "fast" => Ok(Self::Fast),
            "default" => Ok(Self::Default),
            "best" => Ok(Self::Best),
            other => Err(format!(
                "unknown compression level {other}, expected one of none, fast, default, best"
            )),
        }
    }
}

/// Encoder settings. Everything not listed here is fixed by the encoder:
/// 8 bit samples, filter type None, no interlacing and a single IDAT chunk.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngConfig {
    pub compression_level: CompressionLevel,
}

impl PngConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compression_level(mut self, compression_level: CompressionLevel) -> Self {
        self.compression_level = compression_level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names() {
        assert_eq!(CompressionLevel::try_from("BEST"), Ok(CompressionLevel::Best));
        assert_eq!(CompressionLevel::try_from("none"), Ok(CompressionLevel::None));
        assert!(CompressionLevel::try_from("ultra").is_err());
    }

    #[test]
    fn builder_overrides_default() {
        assert_eq!(PngConfig::new().compression_level, CompressionLevel::Default);

        let config = PngConfig::new().compression_level(CompressionLevel::Fast);
        assert_eq!(config.compression_level, CompressionLevel::Fast);
        assert_eq!(Compression::from(config.compression_level).level(), 1);
    }
}
