use std::io::{self, Write};

use crate::png::consts::IDAT_CHUNK_TYPE;

use super::write_chunk;

pub struct Idat;

impl Idat {
    /// Writes the whole compressed stream as a single IDAT chunk.
    pub fn write_to<W: Write>(compressed: &[u8], sink: &mut W) -> io::Result<()> {
        write_chunk(sink, IDAT_CHUNK_TYPE, compressed)
    }
}
