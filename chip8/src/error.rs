use thiserror::Error;

/// Conditions reported by the interpreter. None of them leave the machine
/// in an unsteppable state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("program too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("stack overflow calling subroutine at {addr:#05x}")]
    StackOverflow { addr: u16 },

    #[error("stack underflow returning from {addr:#05x}")]
    StackUnderflow { addr: u16 },

    #[error("unknown opcode {opcode:#06x} at {addr:#05x}")]
    UnknownOpcode { opcode: u16, addr: u16 },
}
