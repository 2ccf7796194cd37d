use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// An operation from `operations`, ready to be applied to the machine
pub type Operation = fn(Opcode, &mut State, &mut Io<'_>) -> Result<()>;

/// Selects the correct Operation for a given Opcode
pub fn from_op(op: Opcode) -> Result<Operation> {
    let operation: Operation = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => cls,
        (0x0, 0x0, 0xE, 0xE) => ret,
        (0x1, ..) => jp,
        (0x2, ..) => call,
        (0x3, ..) => se_byte,
        (0x4, ..) => sne_byte,
        (0x5, .., 0x0) => se_reg,
        (0x6, ..) => ld_byte,
        (0x7, ..) => add_byte,
        (0x8, .., 0x0) => ld_reg,
        (0x8, .., 0x1) => or,
        (0x8, .., 0x2) => and,
        (0x8, .., 0x3) => xor,
        (0x8, .., 0x4) => add_reg,
        (0x8, .., 0x5) => sub,
        (0x8, .., 0x6) => shr,
        (0x8, .., 0x7) => subn,
        (0x8, .., 0xE) => shl,
        (0x9, .., 0x0) => sne_reg,
        (0xA, ..) => ld_i,
        (0xB, ..) => jp_v0,
        (0xC, ..) => rnd,
        (0xD, ..) => drw,
        (0xE, _, 0x9, 0xE) => skp,
        (0xE, _, 0xA, 0x1) => sknp,
        (0xF, _, 0x0, 0x7) => ld_from_delay,
        (0xF, _, 0x0, 0xA) => ld_key,
        (0xF, _, 0x1, 0x5) => ld_delay,
        (0xF, _, 0x1, 0x8) => ld_sound,
        (0xF, _, 0x1, 0xE) => add_i,
        (0xF, _, 0x2, 0x9) => ld_font,
        (0xF, _, 0x3, 0x3) => ld_bcd,
        (0xF, _, 0x5, 0x5) => store_registers,
        (0xF, _, 0x6, 0x5) => load_registers,
        _ => return Err(Error::UnknownOpcode { opcode: op.raw() }),
    };
    Ok(operation)
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, PROGRAM_START};
    use crate::input::InputPort;
    use crate::signal::StopSignal;
    use crate::state::Status;

    /// Keys held down for the whole test, plus a queue of presses for `Fx0A`
    #[derive(Default)]
    struct ScriptedInput {
        down: [bool; 16],
        presses: Vec<u8>,
    }

    impl InputPort for ScriptedInput {
        fn is_key_down(&self, key: u8) -> bool {
            self.down.get(key as usize).copied().unwrap_or(false)
        }

        fn wait_for_key_press(&mut self, _stop: &StopSignal) -> Option<u8> {
            if self.presses.is_empty() {
                None
            } else {
                Some(self.presses.remove(0))
            }
        }
    }

    fn state() -> State {
        State::new(Some(0))
    }

    /// Runs a single opcode the way the interpreter does: pc moves past it first
    fn exec_with(op: u16, state: &mut State, input: &mut ScriptedInput) -> Result<()> {
        let op = Opcode::new(op);
        let stop = StopSignal::new();
        let mut io = Io { input, stop: &stop };
        state.registers.advance_pc();
        from_op(op)?(op, state, &mut io)
    }

    fn exec(op: u16, state: &mut State) {
        exec_with(op, state, &mut ScriptedInput::default()).unwrap();
    }

    fn lit(state: &State) -> usize {
        state
            .frame_buffer
            .rows()
            .iter()
            .flatten()
            .filter(|&&p| p == 1)
            .count()
    }

    #[test]
    fn test_unknown_opcodes() {
        for op in [0x0000, 0x00E1, 0x5121, 0x8128, 0x812F, 0x9121, 0xE19F, 0xF100, 0xFFFF] {
            assert_eq!(
                from_op(Opcode::new(op)).err(),
                Some(Error::UnknownOpcode { opcode: op })
            );
        }
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = state();
        state.frame_buffer.set(0, 0, true);
        exec(0x00E0, &mut state);
        assert_eq!(lit(&state), 0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_00e0_cls_is_idempotent() {
        let mut state = state();
        state.frame_buffer.draw_sprite(3, 4, &[0xFF, 0xFF]);
        exec(0x00E0, &mut state);
        let once = state.frame_buffer;
        state.draw_flag = false;
        exec(0x00E0, &mut state);
        assert_eq!(state.frame_buffer, once);
        assert_eq!(lit(&state), 0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = state();
        state.registers.push(0x0ABC).unwrap();
        exec(0x00EE, &mut state);
        assert_eq!(state.registers.sp(), 0x0);
        assert_eq!(state.registers.pc(), 0x0ABC);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let mut state = state();
        assert_eq!(
            exec_with(0x00EE, &mut state, &mut ScriptedInput::default()),
            Err(Error::StackUnderflow)
        );
    }

    #[test]
    fn test_1nnn_jp() {
        let mut state = state();
        exec(0x1ABC, &mut state);
        assert_eq!(state.registers.pc(), 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = state();
        state.registers.set_pc(0x0ABC);
        exec(0x2123, &mut state);
        assert_eq!(state.registers.sp(), 0x1);
        assert_eq!(state.registers.pc(), 0x0123);
        // returns to the instruction after the call
        assert_eq!(state.registers.pop(), Ok(0x0ABE));
    }

    #[test]
    fn test_2nnn_call_overflows_on_seventeenth() {
        let mut state = state();
        for _ in 0..16 {
            exec(0x2200, &mut state);
        }
        assert_eq!(state.registers.sp(), 16);
        assert_eq!(
            exec_with(0x2200, &mut state, &mut ScriptedInput::default()),
            Err(Error::StackOverflow)
        );
    }

    #[test]
    fn test_3xkk_se_skips() {
        let mut state = state();
        state.registers.set_v(0x1, 0x11);
        exec(0x3111, &mut state);
        assert_eq!(state.registers.pc(), 0x0204);
    }

    #[test]
    fn test_3xkk_se_doesntskip() {
        let mut state = state();
        exec(0x3111, &mut state);
        assert_eq!(state.registers.pc(), 0x0202);
    }

    #[test]
    fn test_4xkk_sne_skips() {
        let mut state = state();
        exec(0x4111, &mut state);
        assert_eq!(state.registers.pc(), 0x0204);
    }

    #[test]
    fn test_4xkk_sne_doesntskip() {
        let mut state = state();
        state.registers.set_v(0x1, 0x11);
        exec(0x4111, &mut state);
        assert_eq!(state.registers.pc(), 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = state();
        state.registers.set_v(0x1, 0x11);
        state.registers.set_v(0x2, 0x11);
        exec(0x5120, &mut state);
        assert_eq!(state.registers.pc(), 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut state = state();
        state.registers.set_v(0x1, 0x11);
        exec(0x5120, &mut state);
        assert_eq!(state.registers.pc(), 0x0202);
    }

    #[test]
    fn test_6xkk_ld_every_byte() {
        let mut state = state();
        for x in 0..16u16 {
            for kk in 0..=0xFFu16 {
                exec(0x6000 | x << 8 | kk, &mut state);
                assert_eq!(state.registers.v(x as u8), kk as u8);
            }
        }
    }

    #[test]
    fn test_7xkk_add() {
        let mut state = state();
        state.registers.set_v(0x1, 0x1);
        exec(0x7122, &mut state);
        assert_eq!(state.registers.v(0x1), 0x23);
    }

    #[test]
    fn test_7xkk_add_wraps_without_carry() {
        let mut state = state();
        state.registers.set_v(0x1, 0xFF);
        state.registers.set_v(0xF, 0x7);
        exec(0x7102, &mut state);
        assert_eq!(state.registers.v(0x1), 0x01);
        assert_eq!(state.registers.v(0xF), 0x7);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = state();
        state.registers.set_v(0x2, 0x1);
        exec(0x8120, &mut state);
        assert_eq!(state.registers.v(0x1), 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = state();
        state.registers.set_v(0x1, 0x6);
        state.registers.set_v(0x2, 0x3);
        exec(0x8121, &mut state);
        assert_eq!(state.registers.v(0x1), 0x7);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = state();
        state.registers.set_v(0x1, 0x6);
        state.registers.set_v(0x2, 0x3);
        exec(0x8122, &mut state);
        assert_eq!(state.registers.v(0x1), 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = state();
        state.registers.set_v(0x1, 0x6);
        state.registers.set_v(0x2, 0x3);
        exec(0x8123, &mut state);
        assert_eq!(state.registers.v(0x1), 0x5);
    }

    #[test]
    fn test_8xy4_add_all_operands() {
        let mut state = state();
        for a in 0..=0xFFu16 {
            for b in 0..=0xFFu16 {
                state.registers.set_v(0x1, a as u8);
                state.registers.set_v(0x2, b as u8);
                exec(0x8124, &mut state);
                assert_eq!(state.registers.v(0x1), ((a + b) % 256) as u8);
                assert_eq!(state.registers.v(0xF), (a + b > 255) as u8);
            }
        }
    }

    #[test]
    fn test_8xy5_sub_all_operands() {
        let mut state = state();
        for a in 0..=0xFFu8 {
            for b in 0..=0xFFu8 {
                state.registers.set_v(0x1, a);
                state.registers.set_v(0x2, b);
                exec(0x8125, &mut state);
                assert_eq!(state.registers.v(0x1), a.wrapping_sub(b));
                assert_eq!(state.registers.v(0xF), (a >= b) as u8);
            }
        }
    }

    #[test]
    fn test_8xy5_sub_equal_is_not_borrow() {
        let mut state = state();
        state.registers.set_v(0x1, 0x11);
        state.registers.set_v(0x2, 0x11);
        exec(0x8125, &mut state);
        assert_eq!(state.registers.v(0x1), 0x0);
        assert_eq!(state.registers.v(0xF), 0x1);
    }

    #[test]
    fn test_8xy6_shr_reads_vy() {
        let mut state = state();
        state.registers.set_v(0x1, 0xFF);
        state.registers.set_v(0x2, 0x5);
        exec(0x8126, &mut state);
        assert_eq!(state.registers.v(0x1), 0x2);
        assert_eq!(state.registers.v(0xF), 0x1);
    }

    #[test]
    fn test_8xy6_shr_nolsb() {
        let mut state = state();
        state.registers.set_v(0x2, 0x4);
        exec(0x8126, &mut state);
        assert_eq!(state.registers.v(0x1), 0x2);
        assert_eq!(state.registers.v(0xF), 0x0);
    }

    #[test]
    fn test_8xy7_subn_noborrow() {
        let mut state = state();
        state.registers.set_v(0x1, 0x11);
        state.registers.set_v(0x2, 0x33);
        exec(0x8127, &mut state);
        assert_eq!(state.registers.v(0x1), 0x22);
        assert_eq!(state.registers.v(0xF), 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut state = state();
        state.registers.set_v(0x1, 0x12);
        state.registers.set_v(0x2, 0x11);
        exec(0x8127, &mut state);
        assert_eq!(state.registers.v(0x1), 0xFF);
        assert_eq!(state.registers.v(0xF), 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = state();
        state.registers.set_v(0x2, 0xFF);
        exec(0x812E, &mut state);
        // 0xFF * 2 = 0x01FE
        assert_eq!(state.registers.v(0x1), 0xFE);
        assert_eq!(state.registers.v(0xF), 0x1);
    }

    #[test]
    fn test_8xye_shl_nomsb() {
        let mut state = state();
        state.registers.set_v(0x2, 0x4);
        exec(0x812E, &mut state);
        assert_eq!(state.registers.v(0x1), 0x8);
        assert_eq!(state.registers.v(0xF), 0x0);
    }

    #[test]
    fn test_8xy4_flag_wins_over_vf_result() {
        let mut state = state();
        state.registers.set_v(0xF, 0xFF);
        state.registers.set_v(0x1, 0x02);
        exec(0x8F14, &mut state);
        assert_eq!(state.registers.v(0xF), 0x1);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = state();
        state.registers.set_v(0x1, 0x11);
        exec(0x9120, &mut state);
        assert_eq!(state.registers.pc(), 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut state = state();
        state.registers.set_v(0x1, 0x11);
        state.registers.set_v(0x2, 0x11);
        exec(0x9120, &mut state);
        assert_eq!(state.registers.pc(), 0x0202);
    }

    #[test]
    fn test_annn_ld() {
        let mut state = state();
        exec(0xAABC, &mut state);
        assert_eq!(state.registers.i(), 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = state();
        state.registers.set_v(0x0, 0x2);
        exec(0xBABC, &mut state);
        assert_eq!(state.registers.pc(), 0xABE);
    }

    #[test]
    fn test_cxkk_rnd_is_masked() {
        let mut state = state();
        for _ in 0..64 {
            exec(0xC10F, &mut state);
            assert_eq!(state.registers.v(0x1) & 0xF0, 0);
        }
        exec(0xC100, &mut state);
        assert_eq!(state.registers.v(0x1), 0);
    }

    #[test]
    fn test_cxkk_rnd_is_seeded() {
        let mut a = State::new(Some(7));
        let mut b = State::new(Some(7));
        for _ in 0..8 {
            exec(0xC1FF, &mut a);
            exec(0xC1FF, &mut b);
            assert_eq!(a.registers.v(0x1), b.registers.v(0x1));
        }
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = state();
        state.registers.set_v(0x0, 0x1);
        // Draw the 0x0 glyph with a 1x 1y offset
        exec(0xD005, &mut state);
        let mut expected = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        expected[1][1..5].copy_from_slice(&[1, 1, 1, 1]);
        expected[2][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[3][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[4][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[5][1..5].copy_from_slice(&[1, 1, 1, 1]);
        assert_eq!(state.frame_buffer.rows(), &expected);
        assert_eq!(state.registers.v(0xF), 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_dxyn_drw_twice_erases() {
        let mut state = state();
        state.registers.set_v(0x0, 0x3C);
        state.registers.set_v(0x1, 0x1E);
        exec(0xD015, &mut state);
        assert_eq!(state.registers.v(0xF), 0x0);
        exec(0xD015, &mut state);
        assert_eq!(state.registers.v(0xF), 0x1);
        assert_eq!(lit(&state), 0);
    }

    #[test]
    fn test_dxyn_drw_reads_vf_before_reset() {
        let mut state = state();
        state.registers.set_v(0xF, 10);
        // Draw the 0x0 glyph at x=VF, y=V0
        exec(0xDF05, &mut state);
        assert!(state.frame_buffer.is_set(10, 0));
        assert!(!state.frame_buffer.is_set(0, 0));
        assert_eq!(state.registers.v(0xF), 0x0);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut state = state();
        state.frame_buffer.set(0, 0, true);
        exec(0xD001, &mut state);
        assert_eq!(state.registers.v(0xF), 0x1)
    }

    #[test]
    fn test_dxyn_drw_empty_sprite_still_redraws() {
        let mut state = state();
        state.registers.set_v(0xF, 0x1);
        state.registers.set_i(0x300);
        exec(0xD003, &mut state);
        assert_eq!(state.registers.v(0xF), 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_dxyn_drw_past_end_of_memory_faults() {
        let mut state = state();
        state.registers.set_i(0xFFE);
        assert_eq!(
            exec_with(0xD003, &mut state, &mut ScriptedInput::default()),
            Err(Error::MemoryFault { address: 0x1000 })
        );
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = state();
        let mut input = ScriptedInput::default();
        input.down[0xE] = true;
        state.registers.set_v(0x1, 0xE);
        exec_with(0xE19E, &mut state, &mut input).unwrap();
        assert_eq!(state.registers.pc(), 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        let mut state = state();
        exec(0xE19E, &mut state);
        assert_eq!(state.registers.pc(), 0x0202);
    }

    #[test]
    fn test_ex9e_skp_out_of_range_key() {
        let mut state = state();
        let mut input = ScriptedInput::default();
        input.down = [true; 16];
        state.registers.set_v(0x1, 0x10);
        exec_with(0xE19E, &mut state, &mut input).unwrap();
        assert_eq!(state.registers.pc(), 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        let mut state = state();
        exec(0xE1A1, &mut state);
        assert_eq!(state.registers.pc(), 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = state();
        let mut input = ScriptedInput::default();
        input.down[0xE] = true;
        state.registers.set_v(0x1, 0xE);
        exec_with(0xE1A1, &mut state, &mut input).unwrap();
        assert_eq!(state.registers.pc(), 0x0202);
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = state();
        state.timers.set_delay(0xF);
        exec(0xF107, &mut state);
        assert_eq!(state.registers.v(0x1), 0xF);
    }

    #[test]
    fn test_fx0a_ld_stores_key() {
        let mut state = state();
        let mut input = ScriptedInput {
            presses: vec![0xB],
            ..Default::default()
        };
        exec_with(0xF30A, &mut state, &mut input).unwrap();
        assert_eq!(state.registers.v(0x3), 0xB);
        assert_eq!(state.registers.pc(), 0x0202);
        assert_eq!(state.status.get(), Status::Running);
    }

    #[test]
    fn test_fx0a_ld_cancelled_repeats() {
        let mut state = state();
        exec_with(0xF30A, &mut state, &mut ScriptedInput::default()).unwrap();
        assert_eq!(state.registers.v(0x3), 0x0);
        assert_eq!(state.registers.pc(), PROGRAM_START);
        assert_eq!(state.status.get(), Status::Running);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = state();
        state.registers.set_v(0x1, 0xF);
        exec(0xF115, &mut state);
        assert_eq!(state.timers.delay(), 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = state();
        state.registers.set_v(0x1, 0xF);
        exec(0xF118, &mut state);
        assert_eq!(state.timers.sound(), 0xF);
        assert!(state.timers.tone_active());
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = state();
        state.registers.set_i(0x1);
        state.registers.set_v(0x1, 0x1);
        exec(0xF11E, &mut state);
        assert_eq!(state.registers.i(), 0x2);
    }

    #[test]
    fn test_fx1e_add_is_not_masked_to_twelve_bits() {
        let mut state = state();
        state.registers.set_i(0xFFF);
        state.registers.set_v(0x1, 0x2);
        exec(0xF11E, &mut state);
        assert_eq!(state.registers.i(), 0x1001);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = state();
        state.registers.set_v(0x1, 0x2);
        exec(0xF129, &mut state);
        assert_eq!(state.registers.i(), 0xA);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = state();
        // 0x7B -> 123
        state.registers.set_v(0x1, 0x7B);
        state.registers.set_i(0x300);
        exec(0xF133, &mut state);
        assert_eq!(state.memory.read_block(0x300, 3).unwrap(), &[0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_fx33_ld_small_values() {
        let mut state = state();
        state.registers.set_v(0x1, 7);
        state.registers.set_i(0x300);
        exec(0xF133, &mut state);
        assert_eq!(state.memory.read_block(0x300, 3).unwrap(), &[0x0, 0x0, 0x7]);
    }

    #[test]
    fn test_fx55_ld() {
        let mut state = state();
        exec(0xA300, &mut state);
        assert_eq!(state.registers.i(), 0x300);
        state.registers.set_v(0x0, 0x1);
        state.registers.set_v(0x1, 0x2);
        state.registers.set_v(0x2, 0x3);
        state.registers.set_v(0x3, 0x4);
        exec(0xF255, &mut state);
        assert_eq!(
            state.memory.read_block(0x300, 4).unwrap(),
            &[0x1, 0x2, 0x3, 0x0]
        );
        assert_eq!(state.registers.i(), 0x300);
    }

    #[test]
    fn test_fx55_ld_past_end_of_memory_faults() {
        let mut state = state();
        state.registers.set_i(0xFFF);
        assert_eq!(
            exec_with(0xF155, &mut state, &mut ScriptedInput::default()),
            Err(Error::MemoryFault { address: 0x1000 })
        );
    }

    #[test]
    fn test_fx65_ld() {
        let mut state = state();
        state.registers.set_i(0x300);
        state
            .memory
            .load_block(0x300, &[0x1, 0x2, 0x3, 0x4, 0x5])
            .unwrap();
        exec(0xF465, &mut state);
        assert_eq!(state.registers.v_range(0x4), &[0x1, 0x2, 0x3, 0x4, 0x5]);
        assert_eq!(state.registers.v(0x5), 0x0);
    }
}
