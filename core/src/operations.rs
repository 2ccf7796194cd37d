use log::debug;
use rand::Rng;

use crate::constants::{FLAG, FONT_GLYPH_SIZE};
use crate::error::Result;
use crate::input::InputPort;
use crate::opcode::Opcode;
use crate::signal::StopSignal;
use crate::state::{State, Status};

/// The outside world as seen by an operation
pub struct Io<'a> {
    pub input: &'a mut dyn InputPort,
    pub stop: &'a StopSignal,
}

// Every operation runs after the pc has already been moved past its own opcode, so skipping
// the next instruction is a single `advance_pc`.

/// clear
pub fn cls(_op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    state.frame_buffer.clear();
    state.draw_flag = true;
    Ok(())
}

/// PC = STACK.pop()
pub fn ret(_op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let addr = state.registers.pop()?;
    state.registers.set_pc(addr);
    Ok(())
}

/// PC = nnn
pub fn jp(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    state.registers.set_pc(op.nnn());
    Ok(())
}

/// STACK.push(PC); PC = nnn
pub fn call(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let pc = state.registers.pc();
    state.registers.push(pc)?;
    state.registers.set_pc(op.nnn());
    Ok(())
}

/// if Vx == kk then skip
pub fn se_byte(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let equal = state.registers.v(op.x()) == op.kk();
    skip_if(state, equal);
    Ok(())
}

/// if Vx != kk then skip
pub fn sne_byte(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let differ = state.registers.v(op.x()) != op.kk();
    skip_if(state, differ);
    Ok(())
}

/// if Vx == Vy then skip
pub fn se_reg(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (vx, vy) = operands(op, state);
    skip_if(state, vx == vy);
    Ok(())
}

/// Vx = kk
pub fn ld_byte(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    state.registers.set_v(op.x(), op.kk());
    Ok(())
}

/// Vx += kk
/// Overflow wraps and is otherwise dropped; VF is left alone
pub fn add_byte(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let sum = state.registers.v(op.x()).wrapping_add(op.kk());
    state.registers.set_v(op.x(), sum);
    Ok(())
}

/// Vx = Vy
pub fn ld_reg(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    state.registers.set_v(op.x(), state.registers.v(op.y()));
    Ok(())
}

/// Vx |= Vy
pub fn or(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (vx, vy) = operands(op, state);
    state.registers.set_v(op.x(), vx | vy);
    Ok(())
}

/// Vx &= Vy
pub fn and(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (vx, vy) = operands(op, state);
    state.registers.set_v(op.x(), vx & vy);
    Ok(())
}

/// Vx ^= Vy
pub fn xor(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (vx, vy) = operands(op, state);
    state.registers.set_v(op.x(), vx ^ vy);
    Ok(())
}

/// Vx += Vy; VF = carry
pub fn add_reg(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (vx, vy) = operands(op, state);
    let (sum, carry) = vx.overflowing_add(vy);
    set_with_flag(op, state, sum, carry as u8);
    Ok(())
}

/// Vx -= Vy; VF = !borrow
pub fn sub(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (vx, vy) = operands(op, state);
    set_with_flag(op, state, vx.wrapping_sub(vy), (vx >= vy) as u8);
    Ok(())
}

/// Vx = Vy >> 1; VF = the bit shifted out
pub fn shr(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (_, vy) = operands(op, state);
    set_with_flag(op, state, vy >> 1, vy & 0x1);
    Ok(())
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (vx, vy) = operands(op, state);
    set_with_flag(op, state, vy.wrapping_sub(vx), (vy >= vx) as u8);
    Ok(())
}

/// Vx = Vy << 1; VF = the bit shifted out
pub fn shl(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (_, vy) = operands(op, state);
    set_with_flag(op, state, vy << 1, vy >> 7);
    Ok(())
}

/// if Vx != Vy then skip
pub fn sne_reg(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (vx, vy) = operands(op, state);
    skip_if(state, vx != vy);
    Ok(())
}

/// I = nnn
pub fn ld_i(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    state.registers.set_i(op.nnn());
    Ok(())
}

/// PC = nnn + V0
pub fn jp_v0(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let addr = op.nnn() + u16::from(state.registers.v(0x0));
    state.registers.set_pc(addr);
    Ok(())
}

/// Vx = rand_byte & kk
pub fn rnd(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let byte: u8 = state.rng.gen();
    state.registers.set_v(op.x(), byte & op.kk());
    Ok(())
}

/// draw_sprite(x=Vx y=Vy height=n)
/// XORs the n byte sprite at memory[I..I+n] onto the frame buffer at (Vx, Vy) with wrapping.
/// VF is set if any pixel was erased
/// Vx and Vy are read before VF is overwritten, so a coordinate in VF is its old value
pub fn drw(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let (x, y) = operands(op, state);
    let sprite = state
        .memory
        .read_block(state.registers.i(), op.n() as usize)?;
    let collision = state.frame_buffer.draw_sprite(x, y, sprite);
    state.registers.set_v(FLAG, collision as u8);
    state.draw_flag = true;
    Ok(())
}

/// if key Vx is down then skip
pub fn skp(op: Opcode, state: &mut State, io: &mut Io) -> Result<()> {
    let down = io.input.is_key_down(state.registers.v(op.x()));
    skip_if(state, down);
    Ok(())
}

/// if key Vx is up then skip
pub fn sknp(op: Opcode, state: &mut State, io: &mut Io) -> Result<()> {
    let down = io.input.is_key_down(state.registers.v(op.x()));
    skip_if(state, !down);
    Ok(())
}

/// Vx = DT
pub fn ld_from_delay(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    state.registers.set_v(op.x(), state.timers.delay());
    Ok(())
}

/// Vx = await key press
/// If the machine is stopped while waiting the pc is wound back so the wait starts over when
/// execution resumes.
pub fn ld_key(op: Opcode, state: &mut State, io: &mut Io) -> Result<()> {
    state.status.set(Status::WaitingForKey);
    debug!("waiting for a key press for V{:X}", op.x());

    match io.input.wait_for_key_press(io.stop) {
        Some(key) => {
            debug!("got key {:X}", key);
            state.registers.set_v(op.x(), key);
        }
        None => {
            let pc = state.registers.pc();
            state.registers.set_pc(pc.wrapping_sub(2));
        }
    }

    state.status.set(Status::Running);
    Ok(())
}

/// DT = Vx
pub fn ld_delay(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    state.timers.set_delay(state.registers.v(op.x()));
    Ok(())
}

/// ST = Vx
pub fn ld_sound(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    state.timers.set_sound(state.registers.v(op.x()));
    Ok(())
}

/// I += Vx
pub fn add_i(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let addr = state
        .registers
        .i()
        .wrapping_add(u16::from(state.registers.v(op.x())));
    state.registers.set_i(addr);
    Ok(())
}

/// I = Vx * 5
/// Points I at the font glyph for the digit in Vx, see `constants::FONT`
pub fn ld_font(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let glyph = u16::from(state.registers.v(op.x())) * FONT_GLYPH_SIZE;
    state.registers.set_i(glyph);
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
pub fn ld_bcd(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let vx = state.registers.v(op.x());
    let bcd = [vx / 100, vx / 10 % 10, vx % 10];
    state.memory.load_block(state.registers.i(), &bcd)
}

/// mem[I..=I+x] = V0..=Vx
pub fn store_registers(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    state
        .memory
        .load_block(state.registers.i(), state.registers.v_range(op.x()))
}

/// V0..=Vx = mem[I..=I+x]
pub fn load_registers(op: Opcode, state: &mut State, _io: &mut Io) -> Result<()> {
    let bytes = state
        .memory
        .read_block(state.registers.i(), op.x() as usize + 1)?;
    state.registers.v_range_mut(op.x()).copy_from_slice(bytes);
    Ok(())
}

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.registers.advance_pc();
    }
}

fn operands(op: Opcode, state: &State) -> (u8, u8) {
    (state.registers.v(op.x()), state.registers.v(op.y()))
}

/// Writes Vx and then VF, so that the flag wins when x is F
fn set_with_flag(op: Opcode, state: &mut State, value: u8, flag: u8) {
    state.registers.set_v(op.x(), value);
    state.registers.set_v(FLAG, flag);
}
