use std::fmt::Display as FmtDisplay;

/// The fixed bit-fields of a raw opcode. All fields are extracted up front;
/// each instruction only looks at the ones it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub c: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl From<u16> for Opcode {
    fn from(opcode: u16) -> Self {
        Opcode {
            c: ((opcode & 0xF000) >> 12) as u8,
            x: ((opcode & 0x0F00) >> 8) as u8,
            y: ((opcode & 0x00F0) >> 4) as u8,
            n: (opcode & 0x000F) as u8,
            nn: (opcode & 0x00FF) as u8,
            nnn: opcode & 0x0FFF,
        }
    }
}

/// A decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEq(u8, u8),
    /// 4XNN
    SkipNe(u8, u8),
    /// 5XY0
    SkipRegEq(u8, u8),
    /// 6XNN
    Set(u8, u8),
    /// 7XNN
    Add(u8, u8),
    /// 8XY0
    RegSet(u8, u8),
    /// 8XY1
    RegOr(u8, u8),
    /// 8XY2
    RegAnd(u8, u8),
    /// 8XY3
    RegXor(u8, u8),
    /// 8XY4
    RegAdd(u8, u8),
    /// 8XY5
    RegSubRight(u8, u8),
    /// 8XY6
    RegShiftRight(u8),
    /// 8XY7
    RegSubLeft(u8, u8),
    /// 8XYE
    RegShiftLeft(u8),
    /// 9XY0
    SkipRegNe(u8, u8),
    /// ANNN
    SetIndex(u16),
    /// BNNN
    JumpWithOffset(u16),
    /// CXNN
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipIfKeyDown(u8),
    /// EXA1
    SkipIfKeyUp(u8),
    /// FX07
    DtGet(u8),
    /// FX0A
    GetKey(u8),
    /// FX15
    DtSet(u8),
    /// FX18
    StSet(u8),
    /// FX1E
    AddToIndex(u8),
    /// FX29
    FontCharacter(u8),
    /// FX33
    Bcd(u8),
    /// FX55
    MemoryStore(u8),
    /// FX65
    MemoryLoad(u8),
}

impl Instruction {
    /// Decode a raw opcode, returning `None` for anything outside the instruction set
    pub fn decode(raw: u16) -> Option<Self> {
        use Instruction::*;

        let op = Opcode::from(raw);
        let instruction = match op.c {
            0x0 => match raw {
                0x00E0 => Cls,
                0x00EE => Return,
                _ => return None,
            },
            0x1 => Jump(op.nnn),
            0x2 => Call(op.nnn),
            0x3 => SkipEq(op.x, op.nn),
            0x4 => SkipNe(op.x, op.nn),
            0x5 if op.n == 0 => SkipRegEq(op.x, op.y),
            0x6 => Set(op.x, op.nn),
            0x7 => Add(op.x, op.nn),
            0x8 => match op.n {
                0x0 => RegSet(op.x, op.y),
                0x1 => RegOr(op.x, op.y),
                0x2 => RegAnd(op.x, op.y),
                0x3 => RegXor(op.x, op.y),
                0x4 => RegAdd(op.x, op.y),
                0x5 => RegSubRight(op.x, op.y),
                0x6 => RegShiftRight(op.x),
                0x7 => RegSubLeft(op.x, op.y),
                0xE => RegShiftLeft(op.x),
                _ => return None,
            },
            0x9 if op.n == 0 => SkipRegNe(op.x, op.y),
            0xA => SetIndex(op.nnn),
            0xB => JumpWithOffset(op.nnn),
            0xC => Random(op.x, op.nn),
            0xD => Draw(op.x, op.y, op.n),
            0xE => match op.nn {
                0x9E => SkipIfKeyDown(op.x),
                0xA1 => SkipIfKeyUp(op.x),
                _ => return None,
            },
            0xF => match op.nn {
                0x07 => DtGet(op.x),
                0x0A => GetKey(op.x),
                0x15 => DtSet(op.x),
                0x18 => StSet(op.x),
                0x1E => AddToIndex(op.x),
                0x29 => FontCharacter(op.x),
                0x33 => Bcd(op.x),
                0x55 => MemoryStore(op.x),
                0x65 => MemoryLoad(op.x),
                _ => return None,
            },
            _ => return None,
        };
        Some(instruction)
    }
}

impl FmtDisplay for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "cls"),
            Return => write!(f, "ret"),
            Jump(nnn) => write!(f, "jp {:#05x}", nnn),
            Call(nnn) => write!(f, "call {:#05x}", nnn),
            SkipEq(x, nn) => write!(f, "se v{:x}, {:#04x}", x, nn),
            SkipNe(x, nn) => write!(f, "sne v{:x}, {:#04x}", x, nn),
            SkipRegEq(x, y) => write!(f, "se v{:x}, v{:x}", x, y),
            Set(x, nn) => write!(f, "ld v{:x}, {:#04x}", x, nn),
            Add(x, nn) => write!(f, "add v{:x}, {:#04x}", x, nn),
            RegSet(x, y) => write!(f, "ld v{:x}, v{:x}", x, y),
            RegOr(x, y) => write!(f, "or v{:x}, v{:x}", x, y),
            RegAnd(x, y) => write!(f, "and v{:x}, v{:x}", x, y),
            RegXor(x, y) => write!(f, "xor v{:x}, v{:x}", x, y),
            RegAdd(x, y) => write!(f, "add v{:x}, v{:x}", x, y),
            RegSubRight(x, y) => write!(f, "sub v{:x}, v{:x}", x, y),
            RegShiftRight(x) => write!(f, "shr v{:x}", x),
            RegSubLeft(x, y) => write!(f, "subn v{:x}, v{:x}", x, y),
            RegShiftLeft(x) => write!(f, "shl v{:x}", x),
            SkipRegNe(x, y) => write!(f, "sne v{:x}, v{:x}", x, y),
            SetIndex(nnn) => write!(f, "ld i, {:#05x}", nnn),
            JumpWithOffset(nnn) => write!(f, "jp v0, {:#05x}", nnn),
            Random(x, nn) => write!(f, "rnd v{:x}, {:#04x}", x, nn),
            Draw(x, y, n) => write!(f, "drw v{:x}, v{:x}, {}", x, y, n),
            SkipIfKeyDown(x) => write!(f, "skp v{:x}", x),
            SkipIfKeyUp(x) => write!(f, "sknp v{:x}", x),
            DtGet(x) => write!(f, "ld v{:x}, dt", x),
            GetKey(x) => write!(f, "ld v{:x}, k", x),
            DtSet(x) => write!(f, "ld dt, v{:x}", x),
            StSet(x) => write!(f, "ld st, v{:x}", x),
            AddToIndex(x) => write!(f, "add i, v{:x}", x),
            FontCharacter(x) => write!(f, "ld f, v{:x}", x),
            Bcd(x) => write!(f, "ld b, v{:x}", x),
            MemoryStore(x) => write!(f, "ld [i], v{:x}", x),
            MemoryLoad(x) => write!(f, "ld v{:x}, [i]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Instruction, Instruction::*, Opcode};

    #[test]
    fn test_opcode_fields() {
        let op = Opcode::from(0xD12F);
        assert_eq!(op.c, 0xD);
        assert_eq!(op.x, 0x1);
        assert_eq!(op.y, 0x2);
        assert_eq!(op.n, 0xF);
        assert_eq!(op.nn, 0x2F);
        assert_eq!(op.nnn, 0x12F);
    }

    #[test]
    fn test_decode() {
        let cases = [
            (0x00E0, Cls),
            (0x00EE, Return),
            (0x1ABC, Jump(0xABC)),
            (0x2ABC, Call(0xABC)),
            (0x3F12, SkipEq(0xF, 0x12)),
            (0x4F12, SkipNe(0xF, 0x12)),
            (0x5FA0, SkipRegEq(0xF, 0xA)),
            (0x6FAB, Set(0xF, 0xAB)),
            (0x7FAB, Add(0xF, 0xAB)),
            (0x8FA0, RegSet(0xF, 0xA)),
            (0x8FA1, RegOr(0xF, 0xA)),
            (0x8FA2, RegAnd(0xF, 0xA)),
            (0x8FA3, RegXor(0xF, 0xA)),
            (0x8FA4, RegAdd(0xF, 0xA)),
            (0x8FA5, RegSubRight(0xF, 0xA)),
            (0x8FA6, RegShiftRight(0xF)),
            (0x8FA7, RegSubLeft(0xF, 0xA)),
            (0x8FAE, RegShiftLeft(0xF)),
            (0x9FA0, SkipRegNe(0xF, 0xA)),
            (0xAFAB, SetIndex(0xFAB)),
            (0xBFAB, JumpWithOffset(0xFAB)),
            (0xCFAB, Random(0xF, 0xAB)),
            (0xDFAB, Draw(0xF, 0xA, 0xB)),
            (0xEF9E, SkipIfKeyDown(0xF)),
            (0xEFA1, SkipIfKeyUp(0xF)),
            (0xF907, DtGet(0x9)),
            (0xF90A, GetKey(0x9)),
            (0xF915, DtSet(0x9)),
            (0xF918, StSet(0x9)),
            (0xF91E, AddToIndex(0x9)),
            (0xF929, FontCharacter(0x9)),
            (0xF933, Bcd(0x9)),
            (0xF955, MemoryStore(0x9)),
            (0xF965, MemoryLoad(0x9)),
        ];

        for (raw, expected) in cases {
            assert_eq!(Instruction::decode(raw), Some(expected), "{:#06x}", raw);
        }
    }

    #[test]
    fn test_decode_unknown() {
        for raw in [0x0000, 0x0123, 0x00E1, 0x5AB1, 0x8AB8, 0x8ABF, 0x9AB1, 0xE19F, 0xF1FF] {
            assert_eq!(Instruction::decode(raw), None, "{:#06x}", raw);
        }
    }

    #[test]
    fn test_mnemonic() {
        assert_eq!(Draw(0x1, 0x2, 5).to_string(), "drw v1, v2, 5");
        assert_eq!(SetIndex(0x2A0).to_string(), "ld i, 0x2a0");
        assert_eq!(Set(0xA, 0x0F).to_string(), "ld va, 0x0f");
    }
}
