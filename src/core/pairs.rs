//! Unordered pair enumeration for zipdist
//!
//! Produces every index pair (i, j) with i < j exactly once, in ascending
//! (i, j) order. The enumeration order also fixes the canonical key order
//! for stored records: zip1 is always the earlier record in load order.

/// Lazy iterator over all unordered index pairs of an n-element sequence
#[derive(Debug, Clone)]
pub struct PairIndices {
    n: usize,
    i: usize,
    j: usize,
}

impl PairIndices {
    pub fn new(n: usize) -> Self {
        Self { n, i: 0, j: 1 }
    }
}

impl Iterator for PairIndices {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.n < 2 || self.i >= self.n - 1 {
            return None;
        }
        let pair = (self.i, self.j);
        self.j += 1;
        if self.j >= self.n {
            self.i += 1;
            self.j = self.i + 1;
        }
        Some(pair)
    }
}

/// Number of unordered pairs over n elements: n * (n - 1) / 2
pub fn pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_empty_and_singleton_yield_nothing() {
        assert_eq!(PairIndices::new(0).count(), 0);
        assert_eq!(PairIndices::new(1).count(), 0);
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
    }

    #[test]
    fn test_two_elements_yield_one_pair() {
        let pairs: Vec<_> = PairIndices::new(2).collect();
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn test_deterministic_ascending_order() {
        let pairs: Vec<_> = PairIndices::new(4).collect();
        assert_eq!(
            pairs,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn test_yields_exactly_n_choose_two_distinct_pairs() {
        for n in 0..20 {
            let pairs: Vec<_> = PairIndices::new(n).collect();
            assert_eq!(pairs.len() as u64, pair_count(n), "n = {n}");

            let unique: HashSet<_> = pairs.iter().collect();
            assert_eq!(unique.len(), pairs.len(), "duplicate pair for n = {n}");

            for &(i, j) in &pairs {
                assert!(i < j, "self-pair or swapped pair ({i}, {j}) for n = {n}");
                assert!(j < n);
            }
        }
    }

    #[test]
    fn test_restartable() {
        let first: Vec<_> = PairIndices::new(5).collect();
        let second: Vec<_> = PairIndices::new(5).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pair_count_closed_form() {
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(3), 3);
        assert_eq!(pair_count(10), 45);
        assert_eq!(pair_count(1000), 499_500);
    }
}
