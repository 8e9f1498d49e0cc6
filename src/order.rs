use rand::Rng;

/// Play order for one round: a permutation of indices into the text pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOrder {
    indices: Vec<usize>,
}

impl RoundOrder {
    /// Unbiased Fisher-Yates shuffle of `0..len`
    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..len).collect();
        for i in (1..len).rev() {
            let j = rng.gen_range(0..=i);
            indices.swap(i, j);
        }
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Text index at a position of the round
    pub fn get(&self, position: usize) -> Option<usize> {
        self.indices.get(position).copied()
    }

    pub fn is_last(&self, position: usize) -> bool {
        !self.indices.is_empty() && position + 1 >= self.indices.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}
