use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{ConfigStore, Settings, SettingsOverrides};
use crate::engine::{Engine, KeyOutcome};
use crate::feedback::{BellFeedback, Feedback, SilentFeedback};
use crate::history::HistoryEntry;
use crate::history_log::HistoryLog;
use crate::runtime::AppEvent;
use crate::texts::TextSource;
use crate::timer::{Clock, DeadlineTimer, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Typing,
    History,
}

/// Terminal application state: the engine plus everything around it
pub struct App<C: Clock + Clone = SystemClock> {
    pub engine: Engine<C, DeadlineTimer<C>>,
    pub texts: TextSource,
    pub view: View,
    pub should_quit: bool,
    /// Effective settings, command line overrides included
    settings: Settings,
    /// What goes back to the store; never carries command line overrides
    stored: Settings,
    store: Box<dyn ConfigStore>,
    feedback: Box<dyn Feedback>,
    history_log: Option<HistoryLog>,
}

impl App {
    pub fn new(
        store: Box<dyn ConfigStore>,
        overrides: &SettingsOverrides,
        texts: TextSource,
        history_log: Option<HistoryLog>,
    ) -> Self {
        Self::with_parts(
            SystemClock,
            StdRng::from_entropy(),
            store,
            overrides,
            texts,
            Box::new(BellFeedback),
            history_log,
        )
    }
}

impl<C: Clock + Clone> App<C> {
    pub fn with_parts(
        clock: C,
        rng: StdRng,
        store: Box<dyn ConfigStore>,
        overrides: &SettingsOverrides,
        texts: TextSource,
        feedback: Box<dyn Feedback>,
        history_log: Option<HistoryLog>,
    ) -> Self {
        let stored = store.load();
        let settings = overrides.apply(stored.clone());

        let mut engine = Engine::new(
            clock.clone(),
            DeadlineTimer::new(clock),
            rng,
            settings.transition(),
        );
        engine.initialize(texts.active());
        info!(mode = %texts.mode(), "session started");

        Self {
            engine,
            texts,
            view: View::Typing,
            should_quit: false,
            settings,
            stored,
            store,
            feedback,
            history_log,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Resize => {}
        }
    }

    /// Time left before a scheduled transition falls due
    pub fn until_transition(&self) -> Option<Duration> {
        self.engine.timer().remaining()
    }

    /// Hands a due transition token back to the engine
    pub fn on_tick(&mut self) {
        if let Some(token) = self.engine.timer_mut().take_due() {
            self.engine.on_timer_fired(token);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.engine.skip_to_next(),
            KeyCode::Up if ctrl => self.change_settings(Settings::increase_delay),
            KeyCode::Down if ctrl => self.change_settings(Settings::decrease_delay),
            KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
                'c' => self.should_quit = true,
                'r' => {
                    info!("session reset");
                    self.engine.reset();
                }
                'a' => self.change_settings(|s| s.auto_advance = !s.auto_advance),
                's' => self.change_settings(|s| s.sound_enabled = !s.sound_enabled),
                't' => self.change_settings(|s| s.show_stats = !s.show_stats),
                'h' => self.toggle_view(),
                'o' => self.switch_texts(),
                _ => {}
            },
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::ALT | KeyModifiers::SUPER) =>
            {
                if self.view == View::Typing {
                    self.type_char(c);
                }
            }
            _ => {}
        }
    }

    pub fn type_char(&mut self, c: char) -> KeyOutcome {
        let feedback: &dyn Feedback = if self.settings.sound_enabled {
            self.feedback.as_ref()
        } else {
            &SilentFeedback
        };
        let outcome = self.engine.submit_key(c, feedback);
        if let KeyOutcome::Completed(entry) = &outcome {
            self.log_completion(entry);
        }
        outcome
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Typing => View::History,
            View::History => View::Typing,
        };
    }

    /// Flips between sample and custom texts and starts over on the new pool
    pub fn switch_texts(&mut self) {
        if self.texts.toggle() {
            info!(mode = %self.texts.mode(), "switching texts");
            self.engine.initialize(self.texts.active());
        }
    }

    /// Applies `change` to both the effective and the stored settings and saves the latter
    fn change_settings(&mut self, change: impl Fn(&mut Settings)) {
        change(&mut self.settings);
        change(&mut self.stored);
        self.engine.update_settings(self.settings.transition());

        if let Err(err) = self.store.save(&self.stored) {
            warn!(%err, "failed to save settings");
        }
    }

    fn log_completion(&self, entry: &HistoryEntry) {
        let Some(log) = &self.history_log else {
            return;
        };
        if let Err(err) = log.append(entry) {
            warn!(path = %log.path().display(), %err, "failed to append to history log");
        }
    }

    pub fn status_line(&self) -> String {
        let round = self.engine.round_number();
        if self.engine.is_transitioning() {
            if !self.settings.auto_advance {
                "Text completed! Press Tab to continue or enable auto-advance (Ctrl+A).".to_string()
            } else if self.engine.is_round_complete() {
                format!("Round {} completed! Starting round {}...", round, round + 1)
            } else {
                "Moving to next text...".to_string()
            }
        } else if self.engine.total_texts() == 0 {
            "No texts loaded".to_string()
        } else {
            format!(
                "Round {} • Text {} of {} • {}",
                round,
                self.engine.current_text_index().unwrap_or_default() + 1,
                self.engine.total_texts(),
                self.texts.mode()
            )
        }
    }
}
