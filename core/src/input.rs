use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::signal::StopSignal;

/// How often a blocked key wait checks whether it should give up
const KEY_WAIT_POLL: Duration = Duration::from_millis(10);

/// Reads the state of the hexadecimal keypad.
///
/// Keys are identified by their hex value, 0x0..=0xF.
pub trait InputPort {
    /// Whether `key` is currently held down. Values above 0xF are never down.
    fn is_key_down(&self, key: u8) -> bool;

    /// Blocks until a key is pressed and returns it.
    ///
    /// Returns `None` only if `stop` was raised before a key arrived.
    fn wait_for_key_press(&mut self, stop: &StopSignal) -> Option<u8>;
}

type KeyStates = Arc<[AtomicBool; 16]>;

/// # Keypad
/// An `InputPort` fed from another thread through a `KeypadHandle`.
///
/// The host's event loop owns the handle and reports presses and releases as they happen; the
/// instruction task owns the keypad.
pub struct Keypad {
    keys: KeyStates,
    presses: Receiver<u8>,
}

/// The writing end of a `Keypad`
#[derive(Clone)]
pub struct KeypadHandle {
    keys: KeyStates,
    presses: Sender<u8>,
}

impl Keypad {
    pub fn new() -> (Keypad, KeypadHandle) {
        let keys: KeyStates = Arc::new(Default::default());
        let (sender, receiver) = mpsc::channel();
        (
            Keypad {
                keys: Arc::clone(&keys),
                presses: receiver,
            },
            KeypadHandle {
                keys,
                presses: sender,
            },
        )
    }
}

impl InputPort for Keypad {
    fn is_key_down(&self, key: u8) -> bool {
        self.keys
            .get(key as usize)
            .map_or(false, |state| state.load(Ordering::SeqCst))
    }

    /// Only presses that happen while waiting count; anything queued beforehand is dropped.
    fn wait_for_key_press(&mut self, stop: &StopSignal) -> Option<u8> {
        while self.presses.try_recv().is_ok() {}

        while !stop.is_raised() {
            match self.presses.recv_timeout(KEY_WAIT_POLL) {
                Ok(key) => return Some(key),
                Err(RecvTimeoutError::Timeout) => (),
                // Nobody can press anything any more, only a stop can end the wait
                Err(RecvTimeoutError::Disconnected) => thread::sleep(KEY_WAIT_POLL),
            }
        }
        None
    }
}

impl KeypadHandle {
    /// Marks `key` as held down. Keys above 0xF are ignored.
    pub fn press(&self, key: u8) {
        if let Some(state) = self.keys.get(key as usize) {
            state.store(true, Ordering::SeqCst);
            // The keypad may already be gone if the machine stopped
            let _ = self.presses.send(key);
        }
    }

    /// Marks `key` as released. Keys above 0xF are ignored.
    pub fn release(&self, key: u8) {
        if let Some(state) = self.keys.get(key as usize) {
            state.store(false, Ordering::SeqCst);
        }
    }
}
