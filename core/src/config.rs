use crate::constants::{CLOCK_SPEED, TIMER_SPEED};

/// Tunables for a `Chip8` run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Target rate of the instruction task
    pub instructions_per_second: u32,
    /// Rate at which the delay and sound timers count down
    pub timer_hz: u32,
    /// Seed for the random number generator behind `Cxkk`; drawn from entropy when `None`
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instructions_per_second: CLOCK_SPEED,
            timer_hz: TIMER_SPEED,
            seed: None,
        }
    }
}
