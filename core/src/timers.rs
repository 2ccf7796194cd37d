use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;

use crate::signal::StopSignal;

/// # Timers
/// The delay and sound timers. Both count down towards 0 at a fixed rate, independent of how
/// fast instructions are executed, and stop there.
///
/// They are the only state shared between the instruction task and the timer task, so each
/// counter is an atomic and clones of `Timers` all refer to the same pair.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    delay: Arc<AtomicU8>,
    sound: Arc<AtomicU8>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self) -> u8 {
        self.delay.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, value: u8) {
        self.delay.store(value, Ordering::SeqCst);
    }

    pub fn sound(&self) -> u8 {
        self.sound.load(Ordering::SeqCst)
    }

    pub fn set_sound(&self, value: u8) {
        self.sound.store(value, Ordering::SeqCst);
    }

    /// Whether a tone should currently be playing
    pub fn tone_active(&self) -> bool {
        self.sound() > 0
    }

    /// Decrements both timers by one unless they're already at 0
    pub fn tick(&self) {
        for counter in [&self.delay, &self.sound] {
            // An Err only means the counter was already 0
            let _ = counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        }
    }

    /// Starts the timer task: a thread that calls `tick` `hz` times a second until `stop` is
    /// raised.
    ///
    /// Ticks are scheduled against absolute deadlines so oversleeping on one tick doesn't push
    /// back all the ones after it.
    pub fn spawn(&self, hz: u32, stop: StopSignal) -> JoinHandle<()> {
        let timers = self.clone();
        let period = Duration::from_secs(1) / hz.max(1);
        let mut deadline = Instant::now();

        thread::spawn(move || {
            debug!("timer task started at {}Hz", hz);
            loop {
                deadline += period;
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                }
                if stop.is_raised() {
                    break;
                }
                timers.tick();
            }
            debug!("timer task stopped");
        })
    }
}
