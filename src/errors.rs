use std::collections::BTreeSet;

/// Character positions of the current text whose first judgment was wrong.
///
/// A fresh value is swapped in whenever the engine moves to another text, so
/// a position never leaks from one text into the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPositions {
    positions: BTreeSet<usize>,
}

impl ErrorPositions {
    /// Marks a position; returns false if it was already marked
    pub fn insert(&mut self, position: usize) -> bool {
        self.positions.insert(position)
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }
}

impl FromIterator<usize> for ErrorPositions {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}
