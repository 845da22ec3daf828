use std::io::{self, Write};

use crate::png::consts::IEND_CHUNK_TYPE;

use super::write_chunk;

pub struct Iend;

impl Iend {
    pub fn write_to<W: Write>(sink: &mut W) -> io::Result<()> {
        write_chunk(sink, IEND_CHUNK_TYPE, &[])
    }
}
