use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// What the terminal loop hands to `App::handle_event`
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// Nothing arrived; time to redraw and check the transition deadline
    Tick,
}

/// Where terminal input comes from
pub trait EventSource {
    /// Waits up to `timeout`. `None` when nothing the app cares about arrived.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>>;
}

/// The real terminal, read through crossterm
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            // key releases would otherwise be typed twice on some terminals
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Resize(_, _) => Some(AppEvent::Resize),
            _ => None,
        })
    }
}

/// Replays queued events without waiting, then reports nothing
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<AppEvent>,
    waits: Vec<Duration>,
}

impl ScriptedEvents {
    pub fn new<I: IntoIterator<Item = AppEvent>>(events: I) -> Self {
        Self {
            queue: events.into_iter().collect(),
            waits: Vec::new(),
        }
    }

    pub fn push(&mut self, event: AppEvent) {
        self.queue.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Every timeout the runner asked for, oldest first
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        self.waits.push(timeout);
        Ok(self.queue.pop_front())
    }
}

/// Longest the loop may block: the stats refresh interval, cut short when a
/// transition falls due sooner
pub fn wait_for(refresh: Duration, until_transition: Option<Duration>) -> Duration {
    until_transition.map_or(refresh, |left| left.min(refresh))
}

/// Drives the terminal loop one event at a time
pub struct Runner<E: EventSource> {
    events: E,
    refresh: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(events: E, refresh: Duration) -> Self {
        Self { events, refresh }
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Next input, or `Tick` once the wait runs out
    pub fn step(&mut self, until_transition: Option<Duration>) -> io::Result<AppEvent> {
        let timeout = wait_for(self.refresh, until_transition);
        Ok(self.events.next_event(timeout)?.unwrap_or(AppEvent::Tick))
    }
}
