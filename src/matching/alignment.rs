//! Needleman-Wunsch alignment scoring
//!
//! Global sequence alignment over chars, normalised to `[0, 1]` so it
//! can be compared against a configurable threshold.

/// Substitution and gap weights for the alignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentWeights {
    pub matched: f64,
    pub mismatched: f64,
    pub gap: f64,
}

impl Default for AlignmentWeights {
    fn default() -> Self {
        Self {
            matched: 1.0,
            mismatched: -1.0,
            gap: -2.0,
        }
    }
}

/// Needleman-Wunsch scorer
#[derive(Debug, Clone, Default)]
pub struct AlignmentScorer {
    weights: AlignmentWeights,
}

impl AlignmentScorer {
    pub fn new(weights: AlignmentWeights) -> Self {
        Self { weights }
    }

    /// Raw optimal global alignment score
    pub fn alignment(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let w = &self.weights;

        // Two rows are enough: only the final cell is needed
        let mut prev: Vec<f64> = (0..=b.len()).map(|j| j as f64 * w.gap).collect();
        let mut cur = vec![0.0; b.len() + 1];

        for (i, ca) in a.iter().enumerate() {
            cur[0] = (i + 1) as f64 * w.gap;
            for (j, cb) in b.iter().enumerate() {
                let substitution = if ca == cb { w.matched } else { w.mismatched };
                let diagonal = prev[j] + substitution;
                let up = prev[j + 1] + w.gap;
                let left = cur[j] + w.gap;
                cur[j + 1] = diagonal.max(up).max(left);
            }
            std::mem::swap(&mut prev, &mut cur);
        }

        prev[b.len()]
    }

    /// Alignment score normalised to `[0, 1]`; `1.0` only for identical input
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let longest = a.chars().count().max(b.chars().count());
        if longest == 0 {
            return 1.0;
        }

        let n = longest as f64;
        let best = n * self.weights.matched;
        let worst = n * self.weights.mismatched.min(self.weights.gap);
        if best <= worst {
            return 0.0;
        }

        ((self.alignment(a, b) - worst) / (best - worst)).clamp(0.0, 1.0)
    }
}
