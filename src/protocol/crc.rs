//! IEEE 802.3 CRC-32 (reflected polynomial 0xEDB88320, init and final xor 0xFFFFFFFF)
//!
//! `crc32` is the table-driven form used on the ingress path. `crc32_bitwise`
//! is the bit-serial reduction; both produce identical output for every input.

pub const CRC32_POLY: u32 = 0xEDB8_8320;
const CRC32_INIT: u32 = 0xFFFF_FFFF;

static CRC32_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ CRC32_POLY } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Table-driven CRC-32 over `data`
pub fn crc32(data: &[u8]) -> u32 {
    let crc = data.iter().fold(CRC32_INIT, |crc, &byte| {
        CRC32_TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8)
    });
    !crc
}

/// Bit-serial CRC-32, one polynomial step per input bit
pub fn crc32_bitwise(data: &[u8]) -> u32 {
    let mut crc = CRC32_INIT;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ CRC32_POLY } else { crc >> 1 };
        }
    }
    !crc
}
