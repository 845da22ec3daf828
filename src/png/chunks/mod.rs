use std::io::{self, Write};

use log::trace;

use crate::binary::byte_reader::ByteReader;

use super::{
    consts::{CHUNK_MAX_LENGTH, CHUNK_METADATA_LENGTH},
    crc::CrcCalculator,
    PngError,
};

pub mod idat;
pub mod iend;
pub mod ihdr;

/// A single `length | type | data | crc` block, borrowed from the buffer it
/// was built from or parsed out of.
#[derive(Debug)]
pub struct Chunk<'a> {
    pub chunk_type: [u8; 4],
    pub chunk_data: &'a [u8],
    crc: u32,
}

impl<'a> Chunk<'a> {
    pub fn new(chunk_type: [u8; 4], chunk_data: &'a [u8]) -> Chunk<'a> {
        let crc = Self::compute_crc(chunk_type, chunk_data);

        Self {
            chunk_type,
            chunk_data,
            crc,
        }
    }

    fn compute_crc(chunk_type: [u8; 4], chunk_data: &[u8]) -> u32 {
        let mut crc_calculator = CrcCalculator::new();
        crc_calculator.update_crc(&chunk_type);
        crc_calculator.update_crc(chunk_data);

        crc_calculator.get_crc()
    }

    /// Parses the next chunk and verifies its crc before handing it out.
    pub fn from_reader(reader: &mut ByteReader<'a>) -> Result<Chunk<'a>, PngError> {
        let start = reader.offset;
        let (length, chunk_type) = match (reader.read_u32_be(), reader.read_array::<4>()) {
            (Some(length), Some(chunk_type)) => (length, chunk_type),
            _ => {
                return Err(PngError::TruncatedChunk(format!(
                    "chunk at offset {start} is smaller than {CHUNK_METADATA_LENGTH} bytes"
                )))
            }
        };
        let name = chunk_name(&chunk_type);

        let chunk_data = reader.read_bytes(length as usize).ok_or_else(|| {
            PngError::TruncatedChunk(format!(
                "{name} chunk declares {length} data bytes, only {} remain",
                reader.number_of_bytes_left()
            ))
        })?;
        let crc = reader.read_u32_be().ok_or_else(|| {
            PngError::TruncatedChunk(format!("{name} chunk is missing its crc"))
        })?;

        let computed = Self::compute_crc(chunk_type, chunk_data);
        if computed != crc {
            return Err(PngError::BadChecksum {
                chunk: name,
                expected: crc,
                computed,
            });
        }
        trace!("read {name} chunk, {length} bytes at offset {start}");

        Ok(Chunk {
            chunk_type,
            chunk_data,
            crc,
        })
    }

    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        let length = u32::try_from(self.chunk_data.len())
            .ok()
            .filter(|length| *length <= CHUNK_MAX_LENGTH)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "{} chunk data of {} bytes exceeds the maximum chunk length",
                        self.name(),
                        self.chunk_data.len()
                    ),
                )
            })?;

        sink.write_all(&length.to_be_bytes())?;
        sink.write_all(&self.chunk_type)?;
        sink.write_all(self.chunk_data)?;
        sink.write_all(&self.crc.to_be_bytes())?;
        trace!("wrote {} chunk, {length} bytes", self.name());

        Ok(())
    }

    pub fn name(&self) -> String {
        chunk_name(&self.chunk_type)
    }

    /// Ancillary chunks have bit 5 set in the first byte of their type.
    pub fn is_ancillary(&self) -> bool {
        self.chunk_type[0] & 0x20 != 0
    }
}

/// Serializes `chunk_data` as one chunk of type `chunk_type` into `sink`.
pub fn write_chunk<W: Write>(
    sink: &mut W,
    chunk_type: [u8; 4],
    chunk_data: &[u8],
) -> io::Result<()> {
    Chunk::new(chunk_type, chunk_data).write_to(sink)
}

fn chunk_name(chunk_type: &[u8; 4]) -> String {
    String::from_utf8_lossy(chunk_type).into_owned()
}
