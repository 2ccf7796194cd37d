/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, stored big-endian. Their behavior is cased on some
/// combination of:
/// - `(n, _, _, _)` the family; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a family (5, 8 and 9)
/// - `(_, _, n, n)` more specific behavior within a family (0, E and F)
///
/// Nibbles not used to select the operation carry its operands:
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` either the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` the height of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    raw: u16,
}

impl Opcode {
    pub fn new(raw: u16) -> Self {
        Opcode { raw }
    }

    /// Joins the two bytes at pc into an opcode
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode::new(u16::from_be_bytes([high, low]))
    }

    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// The opcode's four nibbles, most significant first.
    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    /// `[x___]`
    pub fn family(&self) -> u8 {
        (self.raw >> 12) as u8
    }

    /// `[_x__]`
    pub fn x(&self) -> u8 {
        ((self.raw >> 8) & 0xF) as u8
    }

    /// `[__y_]`
    pub fn y(&self) -> u8 {
        ((self.raw >> 4) & 0xF) as u8
    }

    /// `[___n]`
    pub fn n(&self) -> u8 {
        (self.raw & 0xF) as u8
    }

    /// `[__kk]`
    pub fn kk(&self) -> u8 {
        (self.raw & 0xFF) as u8
    }

    /// `[_nnn]`
    pub fn nnn(&self) -> u16 {
        self.raw & 0x0FFF
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04X}", self.raw)
    }
}
