use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

use crate::errors::ErrorPositions;
use crate::feedback::Feedback;
use crate::history::{History, HistoryEntry};
use crate::metrics;
use crate::order::RoundOrder;
use crate::timer::{Clock, DeadlineTimer, SystemClock, TimerToken, TransitionTimer};

pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EnginePhase {
    /// No texts loaded
    Idle,
    /// Typing the current text
    Active,
    /// Between a finished text and the next one; keystrokes are ignored
    Transitioning,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Ignored,
    Correct,
    Incorrect,
    Completed(HistoryEntry),
}

/// Display state of one character of the current text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    Current,
    Pending,
}

/// Settings read each time a transition is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSettings {
    pub auto_advance: bool,
    pub advance_delay: Duration,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

/// Per-text typing state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub typed: String,
    /// Characters judged correct so far; the index of the next target
    pub cursor: usize,
    pub errors: ErrorPositions,
    pub started_at: Option<SystemTime>,
    pub finished_at: Option<SystemTime>,
}

/// Keystrokes judged since the last reset; these survive moving between texts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyCounts {
    pub total: usize,
    pub correct: usize,
}

/// Typing session engine: shuffled rounds over a text pool, keystroke
/// judging, live metrics and the pause between texts
#[derive(Debug)]
pub struct Engine<C: Clock = SystemClock, T: TransitionTimer = DeadlineTimer> {
    pool: Vec<String>,
    order: RoundOrder,
    round_position: usize,
    round_number: u32,
    current: Vec<char>,
    session: SessionState,
    counts: KeyCounts,
    history: History,
    phase: EnginePhase,
    settings: TransitionSettings,
    pending: Option<TimerToken>,
    next_token: u64,
    clock: C,
    timer: T,
    rng: StdRng,
}

impl<C: Clock, T: TransitionTimer> Engine<C, T> {
    pub fn new(clock: C, timer: T, rng: StdRng, settings: TransitionSettings) -> Self {
        Self {
            pool: Vec::new(),
            order: RoundOrder::default(),
            round_position: 0,
            round_number: 1,
            current: Vec::new(),
            session: SessionState::default(),
            counts: KeyCounts::default(),
            history: History::default(),
            phase: EnginePhase::Idle,
            settings,
            pending: None,
            next_token: 0,
            clock,
            timer,
            rng,
        }
    }

    /// Loads a new text pool and starts over: fresh shuffle, empty history
    pub fn initialize(&mut self, pool: &[String]) {
        info!(texts = pool.len(), "loading text pool");
        self.pool = pool.to_vec();
        self.reset();
    }

    /// Starts the whole practice session over with the current pool
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.history.clear();
        self.counts = KeyCounts::default();
        self.round_number = 1;
        self.round_position = 0;
        self.order = RoundOrder::shuffled(self.pool.len(), &mut self.rng);

        if self.order.is_empty() {
            self.current.clear();
            self.session = SessionState::default();
            self.phase = EnginePhase::Idle;
            debug!("no texts, engine idle");
        } else {
            self.load_current();
            debug!(order = ?self.order.as_slice(), "new round order");
        }
    }

    pub fn update_settings(&mut self, settings: TransitionSettings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> TransitionSettings {
        self.settings
    }

    /// Judges one typed character against the current target
    pub fn submit_key(&mut self, key: char, feedback: &dyn Feedback) -> KeyOutcome {
        if self.phase != EnginePhase::Active {
            return KeyOutcome::Ignored;
        }
        let Some(&target) = self.current.get(self.session.cursor) else {
            return KeyOutcome::Ignored;
        };

        let now = self.clock.now();
        if self.session.cursor == 0 && self.session.started_at.is_none() {
            self.session.started_at = Some(now);
        }

        if key != target {
            feedback.play_incorrect();
            self.session.errors.insert(self.session.cursor);
            self.counts.total += 1;
            return KeyOutcome::Incorrect;
        }

        feedback.play_correct();
        let before = self.counts;

        self.session.typed.push(key);
        self.session.cursor += 1;
        self.counts.total += 1;
        self.counts.correct += 1;

        if self.session.cursor == self.current.len() {
            let entry = self.complete_text(now, before);
            return KeyOutcome::Completed(entry);
        }
        KeyOutcome::Correct
    }

    /// Moves on right away, without recording the current text
    pub fn skip_to_next(&mut self) {
        if self.phase == EnginePhase::Idle {
            return;
        }
        self.cancel_pending();
        self.advance();
    }

    /// Timer callback; only the pending token advances, anything else is stale
    pub fn on_timer_fired(&mut self, token: TimerToken) -> bool {
        if self.pending != Some(token) {
            debug!(?token, "ignoring stale transition timer");
            return false;
        }
        self.pending = None;
        self.advance();
        true
    }

    fn complete_text(
        &mut self,
        now: SystemTime,
        before: KeyCounts,
    ) -> HistoryEntry {
        let elapsed = self
            .session
            .started_at
            .and_then(|start| now.duration_since(start).ok())
            .unwrap_or(Duration::ZERO);
        let text = self.current_text().unwrap_or_default().to_string();

        let entry = HistoryEntry {
            text_index: self.current_text_index().unwrap_or_default(),
            round: self.round_number,
            wpm: metrics::completion_wpm(&text, elapsed),
            accuracy: metrics::completion_accuracy(before.correct, before.total),
            errors: self.session.errors.len(),
            elapsed_secs: elapsed.as_secs_f64(),
            text_length: self.current.len(),
            completed_at: DateTime::<Local>::from(now),
            text,
        };
        info!(
            text_index = entry.text_index,
            wpm = entry.wpm,
            accuracy = entry.accuracy,
            errors = entry.errors,
            "text completed"
        );

        self.session.finished_at = Some(now);
        self.history.push(entry.clone());
        self.begin_transition();
        entry
    }

    fn begin_transition(&mut self) {
        self.cancel_pending();
        self.phase = EnginePhase::Transitioning;

        if self.settings.auto_advance {
            let token = TimerToken(self.next_token);
            self.next_token += 1;
            self.timer.schedule(self.settings.advance_delay, token);
            self.pending = Some(token);
            let delay_ms = self.settings.advance_delay.as_millis() as u64;
            debug!(?token, delay_ms, "transition scheduled");
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.timer.cancel(token);
            debug!(?token, "transition cancelled");
        }
    }

    fn advance(&mut self) {
        if self.pool.is_empty() {
            self.phase = EnginePhase::Idle;
            return;
        }

        self.round_position += 1;
        if self.round_position >= self.order.len() {
            self.order = RoundOrder::shuffled(self.pool.len(), &mut self.rng);
            self.round_position = 0;
            self.round_number += 1;
            info!(round = self.round_number, "starting new round");
        }
        self.load_current();
    }

    fn load_current(&mut self) {
        self.current = self.current_text().unwrap_or_default().chars().collect();
        self.session = SessionState::default();
        self.phase = EnginePhase::Active;
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase == EnginePhase::Transitioning
    }

    pub fn current_text_index(&self) -> Option<usize> {
        self.order.get(self.round_position)
    }

    pub fn current_text(&self) -> Option<&str> {
        self.current_text_index()
            .and_then(|i| self.pool.get(i))
            .map(String::as_str)
    }

    pub fn typed(&self) -> &str {
        &self.session.typed
    }

    pub fn cursor(&self) -> usize {
        self.session.cursor
    }

    pub fn error_positions(&self) -> &ErrorPositions {
        &self.session.errors
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn counts(&self) -> KeyCounts {
        self.counts
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn round_position(&self) -> usize {
        self.round_position
    }

    pub fn round_order(&self) -> &RoundOrder {
        &self.order
    }

    /// True while on the last text of the current round
    pub fn is_round_complete(&self) -> bool {
        self.order.is_last(self.round_position)
    }

    pub fn total_texts(&self) -> usize {
        self.pool.len()
    }

    pub fn live_wpm(&self) -> u32 {
        let elapsed = self
            .session
            .started_at
            .map(|start| self.clock.now().duration_since(start).unwrap_or_default());
        metrics::live_wpm(&self.session.typed, elapsed)
    }

    pub fn live_accuracy(&self) -> u32 {
        metrics::live_accuracy(self.counts.correct, self.counts.total)
    }

    pub fn char_states(&self) -> Vec<(char, CharState)> {
        let cursor = self.session.cursor;
        self.current
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let state = if i < cursor {
                    if self.session.errors.contains(i) {
                        CharState::Incorrect
                    } else {
                        CharState::Correct
                    }
                } else if i == cursor {
                    CharState::Current
                } else {
                    CharState::Pending
                };
                (c, state)
            })
            .collect()
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn pending_transition(&self) -> Option<TimerToken> {
        self.pending
    }
}
