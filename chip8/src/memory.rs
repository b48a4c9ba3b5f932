use std::fmt::Display;

use crate::error::Chip8Error;
use crate::{ADDR_MASK, FONT_ADDR, FONT_DATA, MEM_SIZE, ROM_ADDR};

pub struct Memory {
    pub(crate) data: [u8; MEM_SIZE],
}

impl Memory {
    /// Create a zeroed memory with the built-in font loaded at `FONT_ADDR`
    pub fn new() -> Self {
        let mut data = [0; MEM_SIZE];
        data[FONT_ADDR..FONT_ADDR + FONT_DATA.len()].copy_from_slice(&FONT_DATA);
        Self { data }
    }

    /// Copy a program into memory at `ROM_ADDR`. Programs that don't fit are
    /// rejected whole, memory is left untouched
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        let max = MEM_SIZE - ROM_ADDR;
        if program.len() > max {
            return Err(Chip8Error::RomTooLarge {
                size: program.len(),
                max,
            });
        }

        self.data[ROM_ADDR..ROM_ADDR + program.len()].copy_from_slice(program);
        log::debug!("loaded {} byte program at {:#05x}", program.len(), ROM_ADDR);
        Ok(())
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.data[(addr & ADDR_MASK) as usize]
    }

    /// Read the big-endian word at `addr`, wrapping at the end of memory
    pub fn read_word(&self, addr: u16) -> u16 {
        (self.read(addr) as u16) << 8 | self.read(addr.wrapping_add(1)) as u16
    }

    /// Write a byte on behalf of a running program. The interpreter area
    /// below `ROM_ADDR` is read-only to programs, such writes are dropped
    pub fn write(&mut self, addr: u16, value: u8) {
        let addr = (addr & ADDR_MASK) as usize;
        if addr < ROM_ADDR {
            log::debug!("dropped write of {:#04x} to reserved {:#05x}", value, addr);
            return;
        }
        self.data[addr] = value;
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const BYTES_PER_LINE: usize = 16;
        for (line, chunk) in self.data.chunks(BYTES_PER_LINE).enumerate() {
            write!(f, "{:04X}: ", line * BYTES_PER_LINE)?;
            for byte in chunk {
                write!(f, "{:02X} ", byte)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Memory;
    use crate::error::Chip8Error;
    use crate::{FONT_DATA, MEM_SIZE, ROM_ADDR};

    #[test]
    fn test_font_loaded() {
        let memory = Memory::new();
        assert_eq!(memory.data[0..80], FONT_DATA);
        assert!(memory.data[80..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_load_program_max_size() {
        let mut memory = Memory::new();
        let program = vec![0xAB; MEM_SIZE - ROM_ADDR];
        assert!(memory.load_program(&program).is_ok());
        assert_eq!(memory.data[ROM_ADDR], 0xAB);
        assert_eq!(memory.data[MEM_SIZE - 1], 0xAB);
    }

    #[test]
    fn test_load_program_too_large() {
        let mut memory = Memory::new();
        let program = vec![0xAB; MEM_SIZE - ROM_ADDR + 1];
        assert_eq!(
            memory.load_program(&program),
            Err(Chip8Error::RomTooLarge {
                size: 3585,
                max: 3584
            })
        );
        assert_eq!(memory.data[ROM_ADDR], 0);
    }

    #[test]
    fn test_read_wraps_to_12_bits() {
        let mut memory = Memory::new();
        memory.write(0xFFF, 0x12);
        memory.write(0x300, 0x34);
        assert_eq!(memory.read(0x1FFF), 0x12);
        assert_eq!(memory.read(0x1300), 0x34);
        assert_eq!(memory.read_word(0xFFF), 0x12F0);
    }

    #[test]
    fn test_write_reserved_dropped() {
        let mut memory = Memory::new();
        memory.write(0x000, 0x00);
        memory.write(0x1FF, 0xFF);
        assert_eq!(memory.data[0], FONT_DATA[0]);
        assert_eq!(memory.data[0x1FF], 0);
    }

    #[test]
    fn test_hex_dump() {
        let memory = Memory::new();
        let dump = memory.to_string();
        assert!(dump.starts_with("0000: F0 90 90 90 F0 20 60 20 20 70 F0 10 F0 80 F0 F0 \n"));
        assert_eq!(dump.lines().count(), MEM_SIZE / 16);
    }
}
