use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

/// Source of the current time for keystroke and completion timestamps
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<SystemTime>>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}

/// Identifies one scheduled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Cancellable one-shot timer driving the pause between texts.
///
/// A scheduled token is handed back to `Engine::on_timer_fired` by whoever
/// drives the event loop once its delay has elapsed. A cancelled token must
/// never be handed back.
pub trait TransitionTimer {
    fn schedule(&mut self, delay: Duration, token: TimerToken);
    fn cancel(&mut self, token: TimerToken);
}

/// Timer polled from the terminal loop on every tick
#[derive(Debug, Clone, Default)]
pub struct DeadlineTimer<C: Clock = SystemClock> {
    clock: C,
    pending: Option<(SystemTime, TimerToken)>,
}

impl<C: Clock> DeadlineTimer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.pending.map(|(_, token)| token)
    }

    /// Time left before the pending token is due
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.map(|(deadline, _)| {
            deadline
                .duration_since(self.clock.now())
                .unwrap_or(Duration::ZERO)
        })
    }

    /// Removes and returns the pending token once its deadline has passed
    pub fn take_due(&mut self) -> Option<TimerToken> {
        match self.pending {
            Some((deadline, token)) if self.clock.now() >= deadline => {
                self.pending = None;
                Some(token)
            }
            _ => None,
        }
    }
}

impl<C: Clock> TransitionTimer for DeadlineTimer<C> {
    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        self.pending = Some((self.clock.now() + delay, token));
    }

    fn cancel(&mut self, token: TimerToken) {
        if self.pending() == Some(token) {
            self.pending = None;
        }
    }
}

/// Timer that records every request and fires nothing on its own
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    pub scheduled: Vec<(Duration, TimerToken)>,
    pub cancelled: Vec<TimerToken>,
}

impl ManualTimer {
    /// Most recently scheduled token that has not been cancelled
    pub fn pending(&self) -> Option<TimerToken> {
        self.scheduled
            .last()
            .map(|&(_, token)| token)
            .filter(|token| !self.cancelled.contains(token))
    }

    pub fn last_delay(&self) -> Option<Duration> {
        self.scheduled.last().map(|&(delay, _)| delay)
    }
}

impl TransitionTimer for ManualTimer {
    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        self.scheduled.push((delay, token));
    }

    fn cancel(&mut self, token: TimerToken) {
        self.cancelled.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_shared_time() {
        let clock = ManualClock::default();
        let handle = clock.clone();
        let start = clock.now();

        handle.advance(Duration::from_millis(250));

        assert_eq!(clock.now(), start + Duration::from_millis(250));
    }

    #[test]
    fn test_deadline_timer_fires_after_delay() {
        let clock = ManualClock::default();
        let mut timer = DeadlineTimer::new(clock.clone());

        timer.schedule(Duration::from_millis(1500), TimerToken(1));
        assert_eq!(timer.take_due(), None);
        assert_eq!(timer.remaining(), Some(Duration::from_millis(1500)));

        clock.advance(Duration::from_millis(1499));
        assert_eq!(timer.take_due(), None);

        clock.advance(Duration::from_millis(1));
        assert_eq!(timer.take_due(), Some(TimerToken(1)));
        assert_eq!(timer.take_due(), None);
        assert_eq!(timer.pending(), None);
    }

    #[test]
    fn test_deadline_timer_cancel() {
        let clock = ManualClock::default();
        let mut timer = DeadlineTimer::new(clock.clone());

        timer.schedule(Duration::from_millis(10), TimerToken(4));
        timer.cancel(TimerToken(4));
        clock.advance(Duration::from_secs(1));

        assert_eq!(timer.take_due(), None);
    }

    #[test]
    fn test_deadline_timer_ignores_cancel_of_other_token() {
        let clock = ManualClock::default();
        let mut timer = DeadlineTimer::new(clock.clone());

        timer.schedule(Duration::ZERO, TimerToken(2));
        timer.cancel(TimerToken(1));

        assert_eq!(timer.take_due(), Some(TimerToken(2)));
    }

    #[test]
    fn test_deadline_timer_reschedule_replaces() {
        let clock = ManualClock::default();
        let mut timer = DeadlineTimer::new(clock.clone());

        timer.schedule(Duration::from_millis(10), TimerToken(1));
        timer.schedule(Duration::from_millis(20), TimerToken(2));
        clock.advance(Duration::from_millis(20));

        assert_eq!(timer.take_due(), Some(TimerToken(2)));
        assert_eq!(timer.take_due(), None);
    }

    #[test]
    fn test_manual_timer_pending() {
        let mut timer = ManualTimer::default();
        assert_eq!(timer.pending(), None);

        timer.schedule(Duration::from_secs(1), TimerToken(1));
        assert_eq!(timer.pending(), Some(TimerToken(1)));
        assert_eq!(timer.last_delay(), Some(Duration::from_secs(1)));

        timer.cancel(TimerToken(1));
        assert_eq!(timer.pending(), None);
    }
}
