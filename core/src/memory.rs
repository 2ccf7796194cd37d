use crate::constants::{FONT, MEMORY_SIZE};
use crate::error::{Error, Result};

/// # Memory
/// 4096 bytes of flat, byte addressable memory.
///
/// - `0x000..0x050` the font sprites, written once at construction
/// - `0x200..` the loaded program followed by whatever working data it uses
///
/// Every access is bounds checked and anything past `0xFFF` is a `MemoryFault`.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Error::MemoryFault {
                address: addr as usize,
            })
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        let cell = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Error::MemoryFault {
                address: addr as usize,
            })?;
        *cell = value;
        Ok(())
    }

    /// Reads `len` contiguous bytes starting at `origin`.
    pub fn read_block(&self, origin: u16, len: usize) -> Result<&[u8]> {
        let range = Self::range(origin, len)?;
        Ok(&self.bytes[range])
    }

    /// Copies `bytes` into memory starting at `origin`.
    /// Nothing is written unless the whole block fits.
    pub fn load_block(&mut self, origin: u16, bytes: &[u8]) -> Result<()> {
        let range = Self::range(origin, bytes.len())?;
        self.bytes[range].copy_from_slice(bytes);
        Ok(())
    }

    fn range(origin: u16, len: usize) -> Result<std::ops::Range<usize>> {
        let start = origin as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            // Name the first address that doesn't exist
            return Err(Error::MemoryFault {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
