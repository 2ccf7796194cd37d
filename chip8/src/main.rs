//! Runs a Chip-8 ROM in an SDL2 window.
//!
//! ```text
//! chip8 roms/PONG --ips 700 --scale 12
//! ```
//!
//! The keypad is mapped onto the left four columns of a QWERTY keyboard (see `keymap`).
//! Escape or closing the window quits. Set `RUST_LOG=debug` (or `trace` to see every
//! instruction) for logging.

use std::path::PathBuf;

use clap::Parser;

use chip8_core::CLOCK_SPEED;

mod beeper;
mod keymap;
mod rom;
mod run;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions per second
    #[arg(short, long, default_value_t = CLOCK_SPEED)]
    ips: u32,

    /// Size of each Chip-8 pixel on screen
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// Seed for the random number generator, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Don't play a tone while the sound timer is running
    #[arg(short, long)]
    mute: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    run::run(args)
}
