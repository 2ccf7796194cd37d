use std::sync::mpsc::{self, Receiver, Sender};

use crate::frame_buffer::FrameBuffer;

/// Something that can show a frame.
///
/// `on_redraw` is only called when the frame buffer has changed since the last call.
pub trait DisplaySink {
    fn on_redraw(&mut self, frame: &FrameBuffer);
}

impl<F> DisplaySink for F
where
    F: FnMut(&FrameBuffer),
{
    fn on_redraw(&mut self, frame: &FrameBuffer) {
        self(frame)
    }
}

/// Sends copies of each redrawn frame to a receiver on another thread
pub struct ChannelSink {
    frames: Sender<FrameBuffer>,
}

impl ChannelSink {
    pub fn new() -> (ChannelSink, Receiver<FrameBuffer>) {
        let (frames, receiver) = mpsc::channel();
        (ChannelSink { frames }, receiver)
    }
}

impl DisplaySink for ChannelSink {
    fn on_redraw(&mut self, frame: &FrameBuffer) {
        // A closed receiver just means nobody is watching any more
        let _ = self.frames.send(*frame);
    }
}
