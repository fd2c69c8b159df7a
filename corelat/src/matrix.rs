/// Unordered core pairs `(i, j)` with `i < j`, in sweep order.
pub fn pairs(cores: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..cores).flat_map(move |i| (i + 1..cores).map(move |j| (i, j)))
}

/// Best-scoring pair, carrying the raw score recorded before
/// normalization rescales the matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremal {
    pub pair: (usize, usize),
    pub score: f64,
}

/// Square score matrix over logical cores.
///
/// Only the upper triangle is ever populated; a core is never probed
/// against itself and pairing is unordered. The diagonal and lower
/// triangle stay `None` and render as placeholders.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    cores: usize,
    cells: Vec<Option<f64>>,
}

impl ScoreMatrix {
    pub fn new(cores: usize) -> ScoreMatrix {
        ScoreMatrix {
            cores,
            cells: vec![None; cores * cores],
        }
    }

    pub fn cores(&self) -> usize {
        self.cores
    }

    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        self.cells[a * self.cores + b]
    }

    pub fn set(&mut self, a: usize, b: usize, score: f64) {
        assert!(
            a < b && b < self.cores,
            "not an upper-triangle pair: ({a}, {b})"
        );
        self.cells[a * self.cores + b] = Some(score);
    }

    /// Highest-scoring populated cell, or `None` for an empty matrix
    /// (fewer than two cores means there is nothing to measure).
    pub fn best(&self) -> Option<Extremal> {
        let mut best: Option<Extremal> = None;
        for (i, j) in pairs(self.cores) {
            let Some(score) = self.get(i, j) else { continue };
            if best.is_none_or(|b| score > b.score) {
                best = Some(Extremal {
                    pair: (i, j),
                    score,
                });
            }
        }
        best
    }

    /// Rescales every populated cell relative to the maximum, leaving the
    /// populated cells in `(0, 1]` with the best pair at exactly 1.0.
    /// Returns the extremal record with its raw (pre-rescale) score.
    pub fn normalize(&mut self) -> Option<Extremal> {
        let best = self.best()?;
        for cell in self.cells.iter_mut() {
            if let Some(score) = cell {
                *score /= best.score;
            }
        }
        Some(best)
    }
}

#[cfg(test)]
mod test {
    use super::{Extremal, ScoreMatrix, pairs};

    #[test]
    fn pair_order_is_deterministic() {
        let expected = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        assert_eq!(pairs(4).collect::<Vec<_>>(), expected);
        assert_eq!(pairs(1).count(), 0);
        assert_eq!(pairs(0).count(), 0);
    }

    #[test]
    fn sentinel_cells_stay_unset() {
        let mut matrix = ScoreMatrix::new(3);
        matrix.set(0, 2, 42.0);
        assert_eq!(matrix.get(0, 2), Some(42.0));
        assert_eq!(matrix.get(2, 0), None);
        assert_eq!(matrix.get(1, 1), None);
    }

    #[test]
    #[should_panic(expected = "not an upper-triangle pair")]
    fn set_rejects_lower_triangle() {
        ScoreMatrix::new(3).set(2, 0, 1.0);
    }

    #[test]
    fn normalize_rescales_to_unit_interval() {
        let mut matrix = ScoreMatrix::new(3);
        matrix.set(0, 1, 10.0);
        matrix.set(0, 2, 40.0);
        matrix.set(1, 2, 25.0);
        let best = matrix.normalize().unwrap();
        assert_eq!(
            best,
            Extremal {
                pair: (0, 2),
                score: 40.0
            }
        );
        for (i, j) in pairs(3) {
            let score = matrix.get(i, j).unwrap();
            assert!(score > 0.0 && score <= 1.0);
        }
        assert_eq!(matrix.get(0, 1), Some(0.25));
        let at_extremum = pairs(3)
            .filter(|&(i, j)| matrix.get(i, j) == Some(1.0))
            .count();
        assert_eq!(at_extremum, 1);
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut matrix = ScoreMatrix::new(3);
        matrix.set(0, 1, 10.0);
        matrix.set(1, 2, 40.0);
        matrix.normalize().unwrap();
        let once = matrix.clone();
        let best = matrix.normalize().unwrap();
        assert_eq!(best.score, 1.0);
        for (i, j) in pairs(3) {
            assert_eq!(matrix.get(i, j), once.get(i, j));
        }
    }

    #[test]
    fn empty_matrix_has_no_extremum() {
        assert_eq!(ScoreMatrix::new(0).normalize(), None);
        assert_eq!(ScoreMatrix::new(1).normalize(), None);
    }
}
