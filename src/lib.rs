//! Minimal PNG writer for truecolor images, with a checksum-verifying decoder
//! for reading its output back.

mod binary;
pub mod colors;
pub mod image;
pub mod png;

pub use image::PixelGrid;
pub use png::{decode, encode, ColorType, CompressionLevel, PngConfig, PngError};
