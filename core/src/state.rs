use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::frame_buffer::FrameBuffer;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::timers::Timers;

/// What the instruction task is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Blocked inside `Fx0A` until a key is pressed
    WaitingForKey,
}

/// The instruction task's `Status`, readable from other threads while it runs.
///
/// Clones observe the same status.
#[derive(Debug, Clone, Default)]
pub struct SharedStatus(Arc<AtomicBool>);

impl SharedStatus {
    pub fn get(&self) -> Status {
        if self.0.load(Ordering::SeqCst) {
            Status::WaitingForKey
        } else {
            Status::Running
        }
    }

    pub fn set(&self, status: Status) {
        self.0
            .store(status == Status::WaitingForKey, Ordering::SeqCst);
    }
}

/// The whole of the machine's state.
///
/// Owned by the instruction task and handed to every operation by `&mut`; only `timers` is
/// shared with anything else, along with `status`.
///
/// ## Memory
/// - 4096 bytes of addressable memory, font at 0x000 and program from 0x200
///
/// ## CPU
/// - the V0..VF registers, I, pc and the call stack (see `Registers`)
///
/// ## Display
/// - a 64x32 frame buffer with the contents of the next frame to be drawn
/// - a draw flag, set whenever the frame buffer changes and cleared once it has been rendered
///
/// ## Timers
/// - the delay and sound timers, counted down by the timer task
pub struct State {
    pub memory: Memory,
    pub registers: Registers,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub timers: Timers,
    pub status: SharedStatus,
    pub rng: StdRng,
}

impl State {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        State {
            memory: Memory::new(),
            registers: Registers::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            timers: Timers::new(),
            status: SharedStatus::default(),
            rng,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(None)
    }
}
