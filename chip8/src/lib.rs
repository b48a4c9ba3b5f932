mod display;
mod error;
mod instruction;
mod keypad;
mod memory;
mod registers;
mod stack;

use std::fmt::Display as FmtDisplay;
use std::path::Path;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::display::Display;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::stack::Stack;

pub use crate::display::FrameBuffer;
pub use crate::error::Chip8Error;
pub use crate::instruction::{Instruction, Opcode};
pub use crate::keypad::Key;

pub const FONT_CHAR_LENGTH: usize = 5;

pub const FONT_DATA: [u8; FONT_CHAR_LENGTH * 0x10] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub const FONT_ADDR: usize = 0x000;

pub const MEM_SIZE: usize = 0x1000;
pub const ADDR_MASK: u16 = 0x0FFF;
pub const ROM_ADDR: usize = 0x200;
pub const MAX_ROM_SIZE: usize = MEM_SIZE - ROM_ADDR;
pub const STACK_SIZE: usize = 12;
pub const REGISTER_COUNT: usize = 0x10;
pub const KEY_COUNT: usize = 0x10;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

const SPRITE_WIDTH: usize = 8;

struct Chip8Config {
    ops_per_cycle: usize,
}

impl Chip8Config {
    pub fn new() -> Self {
        Self { ops_per_cycle: 11 }
    }
}

pub struct Chip8 {
    config: Chip8Config,
    /// 4 KiB of RAM holding the font at 0x000 and the program from 0x200
    memory: Memory,
    /// A frame buffer containing binary pixel states
    display: Display,
    /// A hexadecimal keypad containing 16 key states labelled 0 through F
    keypad: Keypad,
    /// Return addresses for subroutine calls
    stack: Stack,
    /// 16 8-bit general-purpose variable registers numbered 0 through F hexadecimal
    v: Registers,
    /// The program counter points to the next instruction in memory
    pc: u16,
    /// The index register is used to point at locations in memory
    i: u16,
    /// The delay timer is decremented at a rate of 60 Hz until it reaches 0
    dt: u8,
    /// The sound timer is decremented at a rate of 60 Hz until it reaches 0, and plays a tone as long as it's not 0
    st: u8,
    /// Source for CXNN
    rng: StdRng,
}

impl Chip8 {
    /// Create a machine whose random source is seeded from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create a machine with a reproducible random source
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            config: Chip8Config::new(),
            memory: Memory::new(),
            display: Display::new(),
            keypad: Keypad::new(),
            stack: Stack::new(),
            v: Registers::new(),
            pc: ROM_ADDR as u16,
            i: 0,
            dt: 0,
            st: 0,
            rng,
        }
    }

    /* Config builder functions */
    pub fn ops_per_cycle(mut self, value: usize) -> Self {
        self.config.ops_per_cycle = value;
        self
    }

    /// Return every part of the machine state to power-on values. The
    /// configuration and random source are kept
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.display = Display::new();
        self.keypad = Keypad::new();
        self.stack = Stack::new();
        self.v = Registers::new();
        self.pc = ROM_ADDR as u16;
        self.i = 0;
        self.dt = 0;
        self.st = 0;
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_program(rom)?;
        self.pc = ROM_ADDR as u16;
        Ok(())
    }

    pub fn load_rom_from_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let buf = std::fs::read(path).with_context(|| format!("read rom file {}", path.display()))?;
        self.load_rom(&buf).context("load rom from file")?;
        Ok(())
    }

    pub fn is_fb_dirty(&self) -> bool {
        self.display.dirty
    }

    pub fn is_sound_playing(&self) -> bool {
        self.st > 0
    }

    /// Snapshot the frame buffer, clearing the dirty flag
    pub fn fb(&mut self) -> FrameBuffer {
        self.display.fb()
    }

    pub fn is_pixel_set(&self, x: usize, y: usize) -> bool {
        self.display.is_set(x, y)
    }

    /// The frame buffer as text, one line per row, `#` for lit pixels
    pub fn render_text(&self) -> String {
        self.display.to_string()
    }

    pub fn set_key(&mut self, index: usize, pressed: bool) {
        self.keypad.set_key(index, pressed);
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn register(&self, x: u8) -> u8 {
        self.v[x]
    }

    pub fn delay_timer(&self) -> u8 {
        self.dt
    }

    pub fn sound_timer(&self) -> u8 {
        self.st
    }

    /// Decrement both timers once, stopping at zero. Call at 60 Hz
    pub fn tick_timers(&mut self) {
        self.dt = self.dt.saturating_sub(1);
        self.st = self.st.saturating_sub(1);
    }

    /// Run one 60 Hz frame: tick the timers then execute `ops_per_cycle`
    /// instructions. Faulting instructions are logged and skipped
    pub fn cycle(&mut self) {
        self.tick_timers();
        for _ in 0..self.config.ops_per_cycle {
            if let Err(e) = self.step() {
                log::warn!("{}", e);
            }
        }
    }

    /// Fetch, decode and execute a single instruction
    pub fn step(&mut self) -> Result<Instruction, Chip8Error> {
        let addr = self.pc;
        let opcode = self.fetch();
        let Some(instruction) = Instruction::decode(opcode) else {
            return Err(Chip8Error::UnknownOpcode { opcode, addr });
        };
        log::trace!("{:#05x}: {:04X} {}", addr, opcode, instruction);
        self.execute(instruction)?;
        Ok(instruction)
    }

    fn fetch(&mut self) -> u16 {
        let opcode = self.memory.read_word(self.pc);
        self.pc = self.pc.wrapping_add(2);
        opcode
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;

        match instruction {
            Cls => self.op_cls(),
            Return => self.op_sub_return()?,
            Jump(nnn) => self.op_jump(nnn),
            Call(nnn) => self.op_sub_call(nnn)?,
            SkipEq(x, nn) => self.op_skip_eq(x, nn),
            SkipNe(x, nn) => self.op_skip_ne(x, nn),
            SkipRegEq(x, y) => self.op_skip_reg_eq(x, y),
            Set(x, nn) => self.op_set(x, nn),
            Add(x, nn) => self.op_add(x, nn),
            RegSet(x, y) => self.op_reg_set(x, y),
            RegOr(x, y) => self.op_reg_or(x, y),
            RegAnd(x, y) => self.op_reg_and(x, y),
            RegXor(x, y) => self.op_reg_xor(x, y),
            RegAdd(x, y) => self.op_reg_add(x, y),
            RegSubRight(x, y) => self.op_reg_sub_right(x, y),
            RegShiftRight(x) => self.op_reg_shift_right(x),
            RegSubLeft(x, y) => self.op_reg_sub_left(x, y),
            RegShiftLeft(x) => self.op_reg_shift_left(x),
            SkipRegNe(x, y) => self.op_skip_reg_ne(x, y),
            SetIndex(nnn) => self.op_set_index(nnn),
            JumpWithOffset(nnn) => self.op_jump_with_offset(nnn),
            Random(x, nn) => self.op_random(x, nn),
            Draw(x, y, n) => self.op_display(x, y, n),
            SkipIfKeyDown(x) => self.op_skip_if_key_down(x),
            SkipIfKeyUp(x) => self.op_skip_if_key_up(x),
            DtGet(x) => self.op_dt_get(x),
            GetKey(x) => self.op_get_key(x),
            DtSet(x) => self.op_dt_set(x),
            StSet(x) => self.op_st_set(x),
            AddToIndex(x) => self.op_add_to_index(x),
            FontCharacter(x) => self.op_font_character(x),
            Bcd(x) => self.op_convert_to_decimal(x),
            MemoryStore(x) => self.op_memory_store(x),
            MemoryLoad(x) => self.op_memory_load(x),
        }
        Ok(())
    }

    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /* Operations */

    /// 0x00E0
    fn op_cls(&mut self) {
        self.display.clear();
    }

    /// 0x00EE
    fn op_sub_return(&mut self) -> Result<(), Chip8Error> {
        let addr = self.pc.wrapping_sub(2);
        self.pc = self.stack.pop().ok_or(Chip8Error::StackUnderflow { addr })?;
        Ok(())
    }

    /// 0x1NNN
    fn op_jump(&mut self, nnn: u16) {
        self.pc = nnn;
    }

    /// 0x2NNN
    fn op_sub_call(&mut self, nnn: u16) -> Result<(), Chip8Error> {
        if !self.stack.push(self.pc) {
            return Err(Chip8Error::StackOverflow { addr: nnn });
        }
        self.pc = nnn;
        Ok(())
    }

    /// 0x3XNN
    fn op_skip_eq(&mut self, x: u8, nn: u8) {
        if self.v[x] == nn {
            self.skip();
        }
    }

    /// 0x4XNN
    fn op_skip_ne(&mut self, x: u8, nn: u8) {
        if self.v[x] != nn {
            self.skip();
        }
    }

    /// 0x5XY0
    fn op_skip_reg_eq(&mut self, x: u8, y: u8) {
        if self.v[x] == self.v[y] {
            self.skip();
        }
    }

    /// 0x6XNN
    fn op_set(&mut self, x: u8, nn: u8) {
        self.v[x] = nn;
    }

    /// 0x7XNN
    fn op_add(&mut self, x: u8, nn: u8) {
        self.v[x] = self.v[x].wrapping_add(nn);
    }

    /// 0x8XY0
    fn op_reg_set(&mut self, x: u8, y: u8) {
        self.v[x] = self.v[y];
    }

    /// 0x8XY1
    fn op_reg_or(&mut self, x: u8, y: u8) {
        self.v[x] |= self.v[y];
    }

    /// 0x8XY2
    fn op_reg_and(&mut self, x: u8, y: u8) {
        self.v[x] &= self.v[y];
    }

    /// 0x8XY3
    fn op_reg_xor(&mut self, x: u8, y: u8) {
        self.v[x] ^= self.v[y];
    }

    // The flag is written last in the arithmetic ops below, so VF as an
    // operand still ends up holding the flag.

    /// 0x8XY4
    fn op_reg_add(&mut self, x: u8, y: u8) {
        let (sum, overflow) = self.v[x].overflowing_add(self.v[y]);
        self.v[x] = sum;
        self.v.set_flag(overflow);
    }

    /// 0x8XY5
    fn op_reg_sub_right(&mut self, x: u8, y: u8) {
        let (diff, borrow) = self.v[x].overflowing_sub(self.v[y]);
        self.v[x] = diff;
        self.v.set_flag(!borrow);
    }

    /// 0x8XY6
    fn op_reg_shift_right(&mut self, x: u8) {
        let flag = self.v[x] & 0x1;
        self.v[x] >>= 1;
        self.v.set_flag(flag == 1);
    }

    /// 0x8XY7
    fn op_reg_sub_left(&mut self, x: u8, y: u8) {
        let (diff, borrow) = self.v[y].overflowing_sub(self.v[x]);
        self.v[x] = diff;
        self.v.set_flag(!borrow);
    }

    /// 0x8XYE
    fn op_reg_shift_left(&mut self, x: u8) {
        let flag = self.v[x] >> 7 & 0x1;
        self.v[x] <<= 1;
        self.v.set_flag(flag == 1);
    }

    /// 0x9XY0
    fn op_skip_reg_ne(&mut self, x: u8, y: u8) {
        if self.v[x] != self.v[y] {
            self.skip();
        }
    }

    /// 0xANNN
    fn op_set_index(&mut self, nnn: u16) {
        self.i = nnn;
    }

    /// 0xBNNN
    fn op_jump_with_offset(&mut self, nnn: u16) {
        self.pc = nnn + self.v[0] as u16;
    }

    /// 0xCXNN
    fn op_random(&mut self, x: u8, nn: u8) {
        self.v[x] = nn & self.rng.random::<u8>();
    }

    /// 0xDXYN
    fn op_display(&mut self, x: u8, y: u8, n: u8) {
        let vx = self.v[x] as usize % SCREEN_WIDTH;
        let vy = self.v[y] as usize % SCREEN_HEIGHT;
        let mut collision = false;

        for row in 0..n as usize {
            let y = (vy + row) % SCREEN_HEIGHT;
            let byte = self.memory.read(self.i.wrapping_add(row as u16));
            for col in 0..SPRITE_WIDTH {
                if (byte >> (7 - col)) & 0x1 == 1 {
                    let x = (vx + col) % SCREEN_WIDTH;
                    collision |= self.display.toggle(x, y);
                }
            }
        }

        self.v.set_flag(collision);
    }

    /// 0xEX9E
    fn op_skip_if_key_down(&mut self, x: u8) {
        if self.keypad.is_key_down(self.v[x]) {
            self.skip();
        }
    }

    /// 0xEXA1
    fn op_skip_if_key_up(&mut self, x: u8) {
        if self.keypad.is_key_up(self.v[x]) {
            self.skip();
        }
    }

    /// 0xFX07
    fn op_dt_get(&mut self, x: u8) {
        self.v[x] = self.dt;
    }

    /// 0xFX0A
    fn op_get_key(&mut self, x: u8) {
        match self.keypad.first_pressed() {
            Some(key) => self.v[x] = key,
            // run this instruction again on the next step
            None => self.pc = self.pc.wrapping_sub(2),
        }
    }

    /// 0xFX15
    fn op_dt_set(&mut self, x: u8) {
        self.dt = self.v[x];
    }

    /// 0xFX18
    fn op_st_set(&mut self, x: u8) {
        self.st = self.v[x];
    }

    /// 0xFX1E
    fn op_add_to_index(&mut self, x: u8) {
        self.i = self.i.wrapping_add(self.v[x] as u16);
    }

    /// 0xFX29
    fn op_font_character(&mut self, x: u8) {
        self.i = (FONT_ADDR + FONT_CHAR_LENGTH * self.v[x] as usize) as u16;
    }

    /// 0xFX33
    fn op_convert_to_decimal(&mut self, x: u8) {
        let n = self.v[x];
        self.memory.write(self.i, n / 100 % 10);
        self.memory.write(self.i.wrapping_add(1), n / 10 % 10);
        self.memory.write(self.i.wrapping_add(2), n % 10);
    }

    /// 0xFX55
    fn op_memory_store(&mut self, x: u8) {
        for r in 0..=x {
            self.memory.write(self.i.wrapping_add(r as u16), self.v[r]);
        }
    }

    /// 0xFX65
    fn op_memory_load(&mut self, x: u8) {
        for r in 0..=x {
            self.v[r] = self.memory.read(self.i.wrapping_add(r as u16));
        }
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl FmtDisplay for Chip8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Registers ===")?;
        for (r, value) in self.v.as_slice().iter().enumerate() {
            write!(f, "V{:X}={:02X} ", r, value)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "PC={:04X} I={:04X} SP={} DT={:02X} ST={:02X}",
            self.pc,
            self.i,
            self.stack.len(),
            self.dt,
            self.st
        )?;
        write!(f, "=== Memory ===\n{}", self.memory)
    }
}
