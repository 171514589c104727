/*!
RAM module: fixed-size memory blocks owned by the Bus.

DMG address map for the on-board memories:
- $8000-$9FFF: 8 KiB video RAM (plain storage; no PPU access restrictions)
- $C000-$DFFF: 8 KiB work RAM
- $E000-$FDFF: Echo of $C000-$DDFF (mask with & 0x1FFF)
- $FE00-$FE9F: 160-byte OAM (plain storage)
- $FF80-$FFFE: 127-byte high RAM

Each block is addressed by offset from its own base; the CPU-visible
decoder (`cpu_interface`) subtracts the base before calling in. Offsets
wrap modulo the block size, which gives the echo region for free.
*/

/// Size of DMG work RAM (in bytes).
pub const WRAM_SIZE: usize = 0x2000;
/// Size of video RAM (in bytes).
pub const VRAM_SIZE: usize = 0x2000;
/// Size of object attribute memory (in bytes).
pub const OAM_SIZE: usize = 0xA0;
/// Size of high RAM (in bytes).
pub const HRAM_SIZE: usize = 0x7F;

/// A fixed-size RAM block with wrapping offset access.
#[derive(Clone, Debug)]
pub struct Ram<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> Default for Ram<N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Ram<N> {
    /// Create a new RAM block initialized to 0.
    #[inline]
    pub fn new() -> Self {
        Self { data: [0; N] }
    }

    /// Clear contents to 0.
    #[inline]
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Read the byte at `offset` (wrapped into the block).
    #[inline]
    pub fn read(&self, offset: u16) -> u8 {
        self.data[Self::index(offset)]
    }

    /// Write the byte at `offset` (wrapped into the block).
    #[inline]
    pub fn write(&mut self, offset: u16, value: u8) {
        self.data[Self::index(offset)] = value;
    }

    /// Expose the internal slice (read-only). Useful for diagnostics or hashing.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn index(offset: u16) -> usize {
        offset as usize % N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_and_init() {
        let r: Ram<WRAM_SIZE> = Ram::new();
        assert_eq!(r.as_slice().len(), WRAM_SIZE);
        assert!(r.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn offsets_wrap_within_block() {
        let mut r: Ram<WRAM_SIZE> = Ram::new();
        r.write(0x0001, 0xAA);
        // Echo region offset ($E001 - $C000 = 0x2001) lands on the same byte.
        assert_eq!(r.read(0x2001), 0xAA);
        r.write(0x2001, 0x55);
        assert_eq!(r.read(0x0001), 0x55);
    }

    #[test]
    fn odd_sized_blocks() {
        let mut hram: Ram<HRAM_SIZE> = Ram::new();
        hram.write(0x7E, 0x42);
        assert_eq!(hram.read(0x7E), 0x42);
        hram.reset();
        assert_eq!(hram.read(0x7E), 0x00);
    }
}
