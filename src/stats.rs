//! Per-gate placement counters and their display percentages.

use crate::catalog::{self, GATES};
use crate::error::GridResult;

#[derive(Clone, Debug)]
pub struct UsageStats {
    counts: Vec<usize>,
    percentages: Vec<f64>,
    total: usize,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageStats {
    pub fn new() -> Self {
        UsageStats {
            counts: vec![0; GATES.len()],
            percentages: vec![0.0; GATES.len()],
            total: 0,
        }
    }

    /// Counts one placed cell of `symbol` and refreshes every percentage.
    pub fn increment(&mut self, symbol: &str) -> GridResult<()> {
        let gate = catalog::lookup(symbol)?;
        self.counts[catalog::index_of(gate)] += 1;
        self.total += 1;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        let total = self.total;
        for (pct, &count) in self.percentages.iter_mut().zip(&self.counts) {
            *pct = if total == 0 {
                0.0
            } else {
                100.0 * count as f64 / total as f64
            };
        }
    }

    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.percentages.fill(0.0);
        self.total = 0;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, symbol: &str) -> usize {
        catalog::lookup(symbol)
            .map(|g| self.counts[catalog::index_of(g)])
            .unwrap_or(0)
    }

    pub fn percentage(&self, symbol: &str) -> f64 {
        catalog::lookup(symbol)
            .map(|g| self.percentages[catalog::index_of(g)])
            .unwrap_or(0.0)
    }

    /// Percentages for every catalog gate, in catalog order.
    pub fn percentages(&self) -> Vec<(&'static str, f64)> {
        GATES
            .iter()
            .zip(&self.percentages)
            .map(|(g, &p)| (g.symbol, p))
            .collect()
    }
}

/// Bar label text, e.g. `33%`.
pub fn format_percent(pct: f64) -> String {
    format!("{pct:.0}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_are_zero() {
        let stats = UsageStats::new();
        assert_eq!(stats.total(), 0);
        assert!(stats.percentages().iter().all(|&(_, p)| p == 0.0));
        assert_eq!(stats.percentages().len(), GATES.len());
    }

    #[test]
    fn percentages_track_counts() {
        let mut stats = UsageStats::new();
        stats.increment("H").unwrap();
        stats.increment("CX").unwrap();
        stats.increment("CX").unwrap();
        stats.increment("cx").unwrap();

        assert_eq!(stats.count("CX"), 3);
        assert_eq!(stats.percentage("H"), 25.0);
        assert_eq!(stats.percentage("CX"), 75.0);
        assert_eq!(stats.percentage("T"), 0.0);
        let sum: f64 = stats.percentages().iter().map(|&(_, p)| p).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_symbol_is_rejected_without_counting() {
        let mut stats = UsageStats::new();
        assert!(stats.increment("MEASURE").is_err());
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut stats = UsageStats::new();
        stats.increment("BARRIER").unwrap();
        stats.reset();
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.percentage("BARRIER"), 0.0);
    }

    #[test]
    fn formats_labels_without_decimals() {
        assert_eq!(format_percent(100.0 / 3.0), "33%");
        assert_eq!(format_percent(0.0), "0%");
    }
}
