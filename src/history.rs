use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::metrics::round_half_up;

/// Result of one completed text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text_index: usize,
    pub round: u32,
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
    pub elapsed_secs: f64,
    pub text_length: usize,
    pub completed_at: DateTime<Local>,
    pub text: String,
}

/// Completed texts in the order they were finished
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// WPM of the last `n` entries, oldest first
    pub fn recent_wpm(&self, n: usize) -> Vec<u32> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).map(|e| e.wpm).collect()
    }

    pub fn summary(&self) -> Option<HistorySummary> {
        HistorySummary::from_entries(&self.entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Trend {
    #[strum(serialize = "+")]
    Up,
    #[strum(serialize = "-")]
    Down,
    #[strum(serialize = "")]
    Flat,
}

/// Difference between the last two completed texts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub magnitude: u64,
    pub trend: Trend,
}

impl Change {
    pub fn between(current: i64, previous: i64) -> Self {
        let delta = current - previous;
        let trend = match delta {
            d if d > 0 => Trend::Up,
            d if d < 0 => Trend::Down,
            _ => Trend::Flat,
        };
        Self {
            magnitude: delta.unsigned_abs(),
            trend,
        }
    }
}

/// Aggregates shown next to the history list
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub completed: usize,
    pub average_wpm: u32,
    pub average_accuracy: u32,
    pub total_errors: usize,
    pub total_secs: f64,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub fewest_errors: usize,
    pub fastest_secs: f64,
    pub wpm_change: Option<Change>,
    pub accuracy_change: Option<Change>,
    pub errors_change: Option<Change>,
}

impl HistorySummary {
    pub fn from_entries(entries: &[HistoryEntry]) -> Option<Self> {
        let last = entries.last()?;
        let count = entries.len() as f64;

        let wpm_sum: u64 = entries.iter().map(|e| e.wpm as u64).sum();
        let accuracy_sum: u64 = entries.iter().map(|e| e.accuracy as u64).sum();
        let fastest_secs = entries
            .iter()
            .map(|e| e.elapsed_secs)
            .min_by(|a, b| a.total_cmp(b))
            .unwrap_or_default();

        let previous = entries.len().checked_sub(2).map(|i| &entries[i]);
        let change = |f: fn(&HistoryEntry) -> i64| previous.map(|p| Change::between(f(last), f(p)));

        Some(Self {
            completed: entries.len(),
            average_wpm: round_half_up(wpm_sum as f64 / count) as u32,
            average_accuracy: round_half_up(accuracy_sum as f64 / count) as u32,
            total_errors: entries.iter().map(|e| e.errors).sum(),
            total_secs: entries.iter().map(|e| e.elapsed_secs).sum(),
            best_wpm: entries.iter().map(|e| e.wpm).max().unwrap_or_default(),
            best_accuracy: entries.iter().map(|e| e.accuracy).max().unwrap_or_default(),
            fewest_errors: entries.iter().map(|e| e.errors).min().unwrap_or_default(),
            fastest_secs,
            wpm_change: change(|e| e.wpm as i64),
            accuracy_change: change(|e| e.accuracy as i64),
            errors_change: change(|e| e.errors as i64),
        })
    }

    /// Entries per round, ordered by round number
    pub fn per_round(entries: &[HistoryEntry]) -> Vec<(u32, usize)> {
        entries
            .iter()
            .counts_by(|e| e.round)
            .into_iter()
            .sorted()
            .collect()
    }
}
