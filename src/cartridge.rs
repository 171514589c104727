/*!
Cartridge with Game Boy header parser and Mapper integration.

Features:
- Parse the header at $0100-$014F from bytes or file path
- Validate the header checksum ($014D) before anything can execute the image
- Compute the global checksum ($014E-$014F); reported, not enforced
- Determine ROM/RAM sizes and the bank controller, then construct a concrete Mapper
  (ROM only, MBC1, MBC5) and delegate CPU mapping through it

Header layout:
- $0100-$0103 entry point, $0104-$0133 logo
- $0134-$0143 title (NUL padded; $013F-$0142 manufacturer code, $0143 CGB flag on newer carts)
- $0144-$0145 new licensee, $0146 SGB flag, $0147 cartridge type
- $0148 ROM size (32 KiB << n), $0149 RAM size
- $014A destination, $014B old licensee, $014C version
- $014D header checksum, $014E-$014F global checksum (big-endian)
*/

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::mapper::{Mapper, MapperKind, RomOnly};
use crate::mappers::{Mbc1, Mbc5};

pub mod labels;

/// First byte past the header.
pub const HEADER_END: usize = 0x0150;

#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("failed to read ROM file: {0}")]
    Io(#[from] std::io::Error),

    #[error("ROM image too small for a header ({len} bytes)")]
    TooSmall { len: usize },

    #[error("header checksum mismatch: header says {expected:#04x}, computed {computed:#04x}")]
    Checksum { expected: u8, computed: u8 },

    #[error("unsupported cartridge type {0:#04x}")]
    UnsupportedMapper(u8),

    #[error("invalid ROM size code {0:#04x}")]
    InvalidRomSize(u8),

    #[error("invalid RAM size code {0:#04x}")]
    InvalidRamSize(u8),
}

/// Parsed cartridge header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub entry: [u8; 4],
    pub title: String,
    pub manufacturer: String,
    pub cgb_flag: u8,
    pub new_licensee: String,
    pub sgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub destination: u8,
    pub old_licensee: u8,
    pub version: u8,
    pub header_checksum: u8,
    pub global_checksum: u16,
}

impl Header {
    /// Decode the header fields. `rom` must be at least `HEADER_END` bytes long.
    fn parse(rom: &[u8]) -> Self {
        let title_bytes = &rom[0x0134..=0x0143];
        let title: String = title_bytes
            .iter()
            .take_while(|&&b| b != 0)
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|&b| b as char)
            .collect();
        let manufacturer: String = rom[0x013F..=0x0142]
            .iter()
            .filter(|b| b.is_ascii_alphanumeric())
            .map(|&b| b as char)
            .collect();
        let new_licensee: String = rom[0x0144..=0x0145]
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '?' })
            .collect();

        Self {
            entry: [rom[0x0100], rom[0x0101], rom[0x0102], rom[0x0103]],
            title: title.trim_end().to_string(),
            manufacturer,
            cgb_flag: rom[0x0143],
            new_licensee,
            sgb_flag: rom[0x0146],
            cartridge_type: rom[0x0147],
            rom_size_code: rom[0x0148],
            ram_size_code: rom[0x0149],
            destination: rom[0x014A],
            old_licensee: rom[0x014B],
            version: rom[0x014C],
            header_checksum: rom[0x014D],
            global_checksum: u16::from_be_bytes([rom[0x014E], rom[0x014F]]),
        }
    }

    /// Licensee label, preferring the new code when the old one defers to it.
    pub fn licensee(&self) -> &'static str {
        if self.old_licensee == 0x33 {
            labels::new_licensee(&self.new_licensee)
        } else {
            labels::old_licensee(self.old_licensee)
        }
    }

    pub fn cartridge_type_name(&self) -> &'static str {
        labels::cartridge_type(self.cartridge_type)
    }

    pub fn destination_name(&self) -> &'static str {
        labels::destination(self.destination)
    }
}

/// Header checksum over $0134-$014C: `x = x - byte - 1`, wrapping.
pub fn header_checksum(rom: &[u8]) -> u8 {
    rom[0x0134..=0x014C]
        .iter()
        .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
}

/// 16-bit sum of every byte except the two global checksum bytes.
pub fn global_checksum(rom: &[u8]) -> u16 {
    rom.iter()
        .enumerate()
        .filter(|(i, _)| *i != 0x014E && *i != 0x014F)
        .fold(0u16, |sum, (_, &b)| sum.wrapping_add(b as u16))
}

/// ROM size in bytes for header code $0148.
pub fn rom_size(code: u8) -> Result<usize, CartridgeError> {
    match code {
        0x00..=0x08 => Ok((32 * 1024) << code),
        other => Err(CartridgeError::InvalidRomSize(other)),
    }
}

/// External RAM size in bytes for header code $0149.
pub fn ram_size(code: u8) -> Result<usize, CartridgeError> {
    match code {
        0x00 => Ok(0),
        0x02 => Ok(8 * 1024),
        0x03 => Ok(32 * 1024),
        0x04 => Ok(128 * 1024),
        0x05 => Ok(64 * 1024),
        other => Err(CartridgeError::InvalidRamSize(other)),
    }
}

pub struct Cartridge {
    header: Header,
    mapper: Box<dyn Mapper>,
    rom_len: usize,
    ram_len: usize,
    global_checksum_ok: bool,
}

// Debug implemented manually; the mapper trait object is summarized by kind.
impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("title", &self.header.title)
            .field("mapper", &self.mapper.kind())
            .field("rom_len", &self.rom_len)
            .field("ram_len", &self.ram_len)
            .field("global_checksum_ok", &self.global_checksum_ok)
            .finish()
    }
}

impl Cartridge {
    // -------------- Construction --------------

    /// Validate a raw ROM image and construct its Mapper.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_END {
            return Err(CartridgeError::TooSmall { len: data.len() });
        }

        let header = Header::parse(&data);
        let computed = header_checksum(&data);
        if computed != header.header_checksum {
            return Err(CartridgeError::Checksum {
                expected: header.header_checksum,
                computed,
            });
        }

        let declared_rom = rom_size(header.rom_size_code)?;
        let ram_len = ram_size(header.ram_size_code)?;
        if data.len() != declared_rom {
            log::warn!(
                "ROM image is {} bytes but header declares {}",
                data.len(),
                declared_rom
            );
        }

        let global_checksum_ok = global_checksum(&data) == header.global_checksum;
        if !global_checksum_ok {
            log::debug!("global checksum mismatch (not enforced)");
        }

        let rom_len = data.len();
        let mapper: Box<dyn Mapper> = match header.cartridge_type {
            0x00 | 0x08 | 0x09 => Box::new(RomOnly::new(data, ram_len)),
            0x01..=0x03 => Box::new(Mbc1::new(data, ram_len)),
            0x19..=0x1B => Box::new(Mbc5::new(data, ram_len, false)),
            0x1C..=0x1E => Box::new(Mbc5::new(data, ram_len, true)),
            other => return Err(CartridgeError::UnsupportedMapper(other)),
        };

        log::info!(
            "loaded cartridge \"{}\": {} ({}), ROM {} KiB, RAM {} KiB",
            header.title,
            header.cartridge_type_name(),
            mapper.kind(),
            rom_len / 1024,
            ram_len / 1024
        );

        Ok(Self {
            header,
            mapper,
            rom_len,
            ram_len,
            global_checksum_ok,
        })
    }

    /// Load and validate a ROM image from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    // -------------- Metadata --------------

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn mapper_kind(&self) -> MapperKind {
        self.mapper.kind()
    }

    pub fn rom_len(&self) -> usize {
        self.rom_len
    }

    pub fn ram_len(&self) -> usize {
        self.ram_len
    }

    pub fn global_checksum_ok(&self) -> bool {
        self.global_checksum_ok
    }

    // -------------- CPU mapping (delegates to mapper) --------------

    #[inline]
    pub fn read_rom(&self, addr: u16) -> u8 {
        self.mapper.read_rom(addr)
    }

    #[inline]
    pub fn write_rom(&mut self, addr: u16, value: u8) -> bool {
        self.mapper.write_rom(addr, value)
    }

    #[inline]
    pub fn read_ram(&self, addr: u16) -> Option<u8> {
        self.mapper.read_ram(addr)
    }

    #[inline]
    pub fn write_ram(&mut self, addr: u16, value: u8) -> bool {
        self.mapper.write_ram(addr, value)
    }

    pub fn reset(&mut self) {
        self.mapper.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_rom, build_rom_with, fix_header_checksum};

    #[test]
    fn loads_valid_rom_only_image() {
        let rom = build_rom(&[0x00]);
        let cart = Cartridge::from_bytes(rom).expect("valid image");
        assert_eq!(cart.title(), "TESTROM");
        assert_eq!(cart.mapper_kind(), MapperKind::RomOnly);
        assert_eq!(cart.rom_len(), 32 * 1024);
        assert_eq!(cart.ram_len(), 0);
        assert!(cart.global_checksum_ok());
        assert_eq!(cart.header().cartridge_type_name(), "ROM ONLY");
    }

    #[test]
    fn every_flipped_header_bit_is_rejected() {
        let rom = build_rom(&[]);
        for addr in 0x0134..=0x014D {
            for bit in 0..8 {
                let mut bad = rom.clone();
                bad[addr] ^= 1 << bit;
                match Cartridge::from_bytes(bad) {
                    Err(CartridgeError::Checksum { .. }) => {}
                    other => panic!("{addr:#06x} bit {bit}: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn too_small_image() {
        match Cartridge::from_bytes(vec![0; 0x100]) {
            Err(CartridgeError::TooSmall { len }) => assert_eq!(len, 0x100),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn checksum_matches_reference_formula() {
        let mut rom = vec![0u8; HEADER_END];
        // All-zero header: 25 bytes, each subtracting 1.
        assert_eq!(header_checksum(&rom), 0u8.wrapping_sub(25));
        rom[0x0134] = 0xFF;
        assert_eq!(header_checksum(&rom), 0u8.wrapping_sub(25).wrapping_sub(0xFF));
    }

    #[test]
    fn selects_mapper_from_type_byte() {
        let mbc1 = build_rom_with(0x03, 0x01, 0x02, &[]);
        let cart = Cartridge::from_bytes(mbc1).expect("mbc1");
        assert_eq!(cart.mapper_kind(), MapperKind::Mbc1);
        assert_eq!(cart.rom_len(), 64 * 1024);
        assert_eq!(cart.ram_len(), 8 * 1024);

        let mbc5 = build_rom_with(0x1B, 0x00, 0x03, &[]);
        let cart = Cartridge::from_bytes(mbc5).expect("mbc5");
        assert_eq!(cart.mapper_kind(), MapperKind::Mbc5);
        assert_eq!(cart.ram_len(), 32 * 1024);
    }

    #[test]
    fn unsupported_and_invalid_codes() {
        let mut rom = build_rom(&[]);
        rom[0x0147] = 0x0F; // MBC3+TIMER+BATTERY
        fix_header_checksum(&mut rom);
        assert!(matches!(
            Cartridge::from_bytes(rom),
            Err(CartridgeError::UnsupportedMapper(0x0F))
        ));

        let mut rom = build_rom(&[]);
        rom[0x0148] = 0x20;
        fix_header_checksum(&mut rom);
        assert!(matches!(
            Cartridge::from_bytes(rom),
            Err(CartridgeError::InvalidRomSize(0x20))
        ));

        let mut rom = build_rom(&[]);
        rom[0x0149] = 0x01;
        fix_header_checksum(&mut rom);
        assert!(matches!(
            Cartridge::from_bytes(rom),
            Err(CartridgeError::InvalidRamSize(0x01))
        ));
    }

    #[test]
    fn global_checksum_is_reported_not_enforced() {
        let mut rom = build_rom(&[]);
        rom[0x4000] ^= 0xFF;
        let cart = Cartridge::from_bytes(rom).expect("still loads");
        assert!(!cart.global_checksum_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Cartridge::from_file("/nonexistent/dir/rom.gb").unwrap_err();
        assert!(matches!(err, CartridgeError::Io(_)));
    }

    #[test]
    fn licensee_lookup() {
        let mut rom = build_rom(&[]);
        rom[0x014B] = 0x33;
        rom[0x0144] = b'0';
        rom[0x0145] = b'1';
        fix_header_checksum(&mut rom);
        let cart = Cartridge::from_bytes(rom).expect("valid");
        assert_eq!(cart.header().licensee(), "Nintendo R&D1");
    }
}
