use std::ops::{Index, IndexMut};

use crate::REGISTER_COUNT;

/// VF doubles as the carry, borrow and collision flag
pub const FLAG: u8 = 0xF;

/// The 16 general-purpose registers V0 through VF. Indices are taken from a
/// single opcode nibble, so only the low 4 bits are used.
pub struct Registers([u8; REGISTER_COUNT]);

impl Index<u8> for Registers {
    type Output = u8;

    fn index(&self, register: u8) -> &Self::Output {
        &self.0[(register & 0xF) as usize]
    }
}

impl IndexMut<u8> for Registers {
    fn index_mut(&mut self, register: u8) -> &mut Self::Output {
        &mut self.0[(register & 0xF) as usize]
    }
}

impl Registers {
    pub fn new() -> Self {
        Self([0; REGISTER_COUNT])
    }

    pub fn set_flag(&mut self, value: bool) {
        self[FLAG] = value as u8;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Registers;

    #[test]
    fn test_flag_is_vf() {
        let mut v = Registers::new();
        v.set_flag(true);
        assert_eq!(v[0xF], 1);
        v.set_flag(false);
        assert_eq!(v[0xF], 0);
    }

    #[test]
    fn test_index_uses_low_nibble() {
        let mut v = Registers::new();
        v[0x13] = 7;
        assert_eq!(v[3], 7);
    }
}
