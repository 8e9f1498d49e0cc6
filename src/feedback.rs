use std::cell::RefCell;
use std::io::{self, Write};

/// Keystroke feedback sink. Calls are fire-and-forget and must never fail.
pub trait Feedback {
    fn play_correct(&self);
    fn play_incorrect(&self);
}

/// Feedback that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn play_correct(&self) {}
    fn play_incorrect(&self) {}
}

/// Rings the terminal bell on mistakes
#[derive(Debug, Clone, Copy, Default)]
pub struct BellFeedback;

impl Feedback for BellFeedback {
    fn play_correct(&self) {}

    fn play_incorrect(&self) {
        let mut out = io::stdout();
        let _ = out.write_all(b"\x07").and_then(|_| out.flush());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Correct,
    Incorrect,
}

/// Remembers every signal it receives
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    signals: RefCell<Vec<Signal>>,
}

impl RecordingFeedback {
    pub fn signals(&self) -> Vec<Signal> {
        self.signals.borrow().clone()
    }
}

impl Feedback for RecordingFeedback {
    fn play_correct(&self) {
        self.signals.borrow_mut().push(Signal::Correct);
    }

    fn play_incorrect(&self) {
        self.signals.borrow_mut().push(Signal::Incorrect);
    }
}
