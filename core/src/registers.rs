use crate::constants::{PROGRAM_START, REGISTER_COUNT, STACK_SIZE};
use crate::error::{Error, Result};

/// # Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Stack
/// - (sp) the number of return addresses currently on the stack
/// - 16 slots of return addresses for nested subroutine calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    v: [u8; REGISTER_COUNT],
    i: u16,
    pc: u16,
    sp: usize,
    stack: [u16; STACK_SIZE],
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_SIZE],
        }
    }

    /// Value of register Vx. Only the low nibble of `x` is used.
    pub fn v(&self, x: u8) -> u8 {
        self.v[(x & 0xF) as usize]
    }

    pub fn set_v(&mut self, x: u8, value: u8) {
        self.v[(x & 0xF) as usize] = value;
    }

    /// V0..=Vx
    pub fn v_range(&self, x: u8) -> &[u8] {
        &self.v[..=(x & 0xF) as usize]
    }

    pub fn v_range_mut(&mut self, x: u8) -> &mut [u8] {
        &mut self.v[..=(x & 0xF) as usize]
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn set_i(&mut self, addr: u16) {
        self.i = addr;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, addr: u16) {
        self.pc = addr;
    }

    /// Moves the pc on by one instruction
    pub fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn push(&mut self, addr: u16) -> Result<()> {
        if self.sp == STACK_SIZE {
            return Err(Error::StackOverflow);
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
