const CRC_POLYNOMIAL: u32 = 0xedb88320;
const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
    let mut table = [0; 256];
    let mut n = 0;

    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;

        while k < 8 {
            c = if c & 1 == 1 {
                CRC_POLYNOMIAL ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }

        table[n] = c;
        n += 1;
    }

    table
}

/// Incremental CRC-32 as used by PNG chunk trailers.
///
/// Lets a chunk's type and data be fed separately without concatenating them.
pub struct CrcCalculator {
    c: u32,
}

impl CrcCalculator {
    pub fn new() -> Self {
        Self { c: 0xffffffff }
    }

    pub fn update_crc(&mut self, bytes: &[u8]) {
        for byte in bytes {
            let index = (self.c ^ (*byte as u32)) & 0xff;
            self.c = CRC_TABLE[index as usize] ^ (self.c >> 8)
        }
    }

    pub fn get_crc(&self) -> u32 {
        self.c ^ 0xffffffff
    }

    pub fn reset(&mut self) {
        self.c = 0xffffffff;
    }
}

impl Default for CrcCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-32 of a single byte span.
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = CrcCalculator::new();
    crc.update_crc(bytes);

    crc.get_crc()
}
