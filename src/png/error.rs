use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PngError {
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file does not appear to be a png file (signature missing)")]
    BadSignature,

    #[error("crc mismatch in {chunk} chunk: stored {expected:#010x}, computed {computed:#010x}")]
    BadChecksum {
        chunk: String,
        expected: u32,
        computed: u32,
    },

    #[error("truncated chunk: {0}")]
    TruncatedChunk(String),

    #[error("unsupported png feature: {0}")]
    Unsupported(String),

    #[error("png parse error: {0}")]
    Malformed(String),

    #[error("zlib stream error: {0}")]
    Decompress(io::Error),
}

#[macro_export]
macro_rules! png_assert {
    ($assert_value:expr, $msg:expr) => {
        if !$assert_value {
            return Err($crate::png::PngError::Malformed($msg));
        }
    };
}
