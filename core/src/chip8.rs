use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, trace, warn};

use crate::config::Config;
use crate::constants::PROGRAM_START;
use crate::display::DisplaySink;
use crate::error::Result;
use crate::frame_buffer::FrameBuffer;
use crate::input::InputPort;
use crate::instruction::from_op;
use crate::opcode::Opcode;
use crate::operations::Io;
use crate::signal::StopSignal;
use crate::state::{SharedStatus, State, Status};
use crate::timers::Timers;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `config` it was built with
///
/// Supplies interfaces for:
/// - loading programs
/// - stepping the CPU one instruction at a time
/// - running the instruction task alongside the timer task until told to stop
/// - inspecting its frame buffer and timers for rendering and sound by the host
pub struct Chip8 {
    state: State,
    config: Config,
}

impl Chip8 {
    pub fn new(config: Config) -> Self {
        Chip8 {
            state: State::new(config.seed),
            config,
        }
    }

    /// Copies a program into memory at 0x200
    ///
    /// # Arguments
    /// * `program` the raw bytes of a ROM
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.state.memory.load_block(PROGRAM_START, program)?;
        info!("loaded {} byte program", program.len());
        Ok(())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status.get()
    }

    /// A handle on the status that can be watched from another thread while `run` is going
    pub fn shared_status(&self) -> SharedStatus {
        self.state.status.clone()
    }

    /// A handle on the timers that stays valid wherever the machine itself ends up
    pub fn timers(&self) -> Timers {
        self.state.timers.clone()
    }

    pub fn tone_active(&self) -> bool {
        self.state.timers.tone_active()
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Marks the current frame as rendered
    pub fn clear_redraw(&mut self) {
        self.state.draw_flag = false;
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at the pc
    /// - moves the pc past it
    /// - executes it
    pub fn step(&mut self, input: &mut dyn InputPort, stop: &StopSignal) -> Result<()> {
        let op = self.get_op()?;
        trace!(
            "{} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.registers.v_range(0xF),
            self.state.registers.i(),
            self.state.registers.pc()
        );
        self.state.registers.advance_pc();

        let operation = from_op(op)?;
        operation(op, &mut self.state, &mut Io { input, stop })
    }

    /// Runs the machine until `stop` is raised or an instruction faults.
    ///
    /// The timer task is started first and always joined before returning. `display` is handed
    /// the frame after every instruction that changed it. However the run ends, `stop` is left
    /// raised.
    pub fn run(
        &mut self,
        input: &mut dyn InputPort,
        display: &mut dyn DisplaySink,
        stop: &StopSignal,
    ) -> Result<()> {
        let timer = self
            .state
            .timers
            .spawn(self.config.timer_hz, stop.clone());

        let result = self.run_until_stopped(input, display, stop);
        if let Err(e) = &result {
            error!("halted at pc {:04X}: {}", self.state.registers.pc(), e);
        }

        stop.raise();
        if timer.join().is_err() {
            warn!("timer task panicked");
        }
        result
    }

    fn run_until_stopped(
        &mut self,
        input: &mut dyn InputPort,
        display: &mut dyn DisplaySink,
        stop: &StopSignal,
    ) -> Result<()> {
        let cycle_time = Duration::from_secs(1) / self.config.instructions_per_second.max(1);
        let mut deadline = Instant::now();

        while !stop.is_raised() {
            self.step(input, stop)?;

            if let Some(frame) = self.get_frame() {
                display.on_redraw(frame);
                self.clear_redraw();
            }

            // Handle timing
            deadline += cycle_time;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            } else {
                // Don't try to catch up after a key wait or a slow frame
                deadline = now;
            }
        }
        Ok(())
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<Opcode> {
        let bytes = self.state.memory.read_block(self.state.registers.pc(), 2)?;
        Ok(Opcode::from_bytes(bytes[0], bytes[1]))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
