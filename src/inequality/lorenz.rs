/// Cumulative totals of a distribution sorted ascending, starting at 0.
///
/// `cumulative[k]` is the amount held by the bottom `k` entities, so the
/// sequence has `n + 1` points and ends at the grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct LorenzCurve {
    cumulative: Vec<f64>,
}

impl LorenzCurve {
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mut cumulative = Vec::with_capacity(sorted.len() + 1);
        cumulative.push(0.0);
        let mut running = 0.0;
        for value in sorted {
            running += value;
            cumulative.push(running);
        }
        Self { cumulative }
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.cumulative.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Cumulative shares of the total; `None` when the total is zero
    pub fn shares(&self) -> Option<Vec<f64>> {
        let total = self.total();
        if total == 0.0 {
            return None;
        }
        Some(self.cumulative.iter().map(|c| c / total).collect())
    }

    /// k / n for k = 0..=n
    pub fn population_shares(&self) -> Vec<f64> {
        let n = self.len();
        if n == 0 {
            return vec![0.0];
        }
        (0..=n).map(|k| k as f64 / n as f64).collect()
    }

    /// (population share, value share) pairs ready to plot
    pub fn points(&self) -> Option<Vec<(f64, f64)>> {
        let shares = self.shares()?;
        Some(self.population_shares().into_iter().zip(shares).collect())
    }
}
