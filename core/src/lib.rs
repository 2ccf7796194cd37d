pub use chip8::Chip8;
pub use config::Config;
pub use constants::CLOCK_SPEED;
pub use display::{ChannelSink, DisplaySink};
pub use error::{Error, Result};
pub use frame_buffer::FrameBuffer;
pub use input::{InputPort, Keypad, KeypadHandle};
pub use memory::Memory;
pub use opcode::Opcode;
pub use registers::Registers;
pub use signal::StopSignal;
pub use state::{SharedStatus, State, Status};
pub use timers::Timers;

mod chip8;
mod config;
pub mod constants;
mod display;
mod error;
mod frame_buffer;
mod input;
mod instruction;
mod memory;
mod opcode;
mod operations;
mod registers;
mod signal;
pub mod state;
mod timers;
