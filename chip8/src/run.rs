use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use log::{debug, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_core::constants::TIMER_SPEED;
use chip8_core::{ChannelSink, Chip8, Config, FrameBuffer, Keypad, KeypadHandle, StopSignal};
use chip8_display::Display;

use crate::beeper::Beeper;
use crate::keymap::keymap;
use crate::rom;
use crate::Args;

/// How long the event loop waits between polls, roughly one display refresh
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Loads the ROM and runs it until the window is closed or the program faults.
///
/// The instruction task gets its own thread; this one keeps the SDL2 window, pumping events
/// into the keypad and drawing whatever frames come back.
pub fn run(args: Args) -> anyhow::Result<()> {
    let program = rom::load(&args.rom)?;

    let mut chip8 = Chip8::new(Config {
        instructions_per_second: args.ips,
        timer_hz: TIMER_SPEED,
        seed: args.seed,
    });
    chip8
        .load_program(&program)
        .with_context(|| format!("unable to load {}", args.rom.display()))?;
    let timers = chip8.timers();

    // Get SDL2 context
    let sdl = sdl2::init()
        .map_err(|e| anyhow!(e))
        .context("unable to initialise SDL2")?;
    let mut display = Display::new(&sdl, args.scale)
        .map_err(|e| anyhow!(e))
        .context("unable to open window")?;
    let beeper = if args.mute {
        None
    } else {
        Some(
            Beeper::new(&sdl)
                .map_err(|e| anyhow!(e))
                .context("unable to open audio device")?,
        )
    };
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let (mut keypad, keys) = Keypad::new();
    let (mut sink, frames) = ChannelSink::new();
    let stop = StopSignal::new();

    let instructions = {
        let stop = stop.clone();
        thread::Builder::new()
            .name("instructions".into())
            .spawn(move || chip8.run(&mut keypad, &mut sink, &stop))
            .context("unable to start instruction task")?
    };
    info!("running {}", args.rom.display());

    let pumped = loop {
        if stop.is_raised() {
            break Ok(());
        }
        if !handle_events(&mut events, &keys) {
            debug!("quit requested");
            break Ok(());
        }
        if let Err(e) = render_latest(&mut display, &frames) {
            break Err(anyhow!(e).context("unable to render frame"));
        }
        if let Some(beeper) = &beeper {
            beeper.set_active(timers.tone_active());
        }
        thread::sleep(FRAME_TIME);
    };

    stop.raise();
    if let Some(beeper) = &beeper {
        beeper.set_active(false);
    }
    let ran = instructions
        .join()
        .map_err(|_| anyhow!("instruction task panicked"))?;

    pumped?;
    ran.context("program halted")
}

/// Forwards keypad events. Returns false once the user has asked to quit.
fn handle_events(events: &mut sdl2::EventPump, keys: &KeypadHandle) -> bool {
    for event in events.poll_iter() {
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => return false,
            Event::KeyDown {
                keycode: Some(key),
                repeat: false,
                ..
            } => {
                if let Some(kc) = keymap(key) {
                    keys.press(kc);
                }
            }
            Event::KeyUp {
                keycode: Some(key), ..
            } => {
                if let Some(kc) = keymap(key) {
                    keys.release(kc);
                }
            }
            _ => continue,
        };
    }
    true
}

/// Draws the newest frame sent since the last call, skipping any older ones
fn render_latest(display: &mut Display, frames: &Receiver<FrameBuffer>) -> Result<(), String> {
    match frames.try_iter().last() {
        Some(frame) => display.render(&frame),
        None => Ok(()),
    }
}
