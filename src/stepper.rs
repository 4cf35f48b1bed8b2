//! Column-by-column walk over the grid.
//!
//! Nothing is computed here: a step only describes which gates sit in the
//! current column.

use std::fmt;

use crate::grid::CircuitGrid;

/// Gates found in one column, top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub column: usize,
    pub entries: Vec<(&'static str, usize)>,
}

impl StepReport {
    /// Entries joined as `H(q0) | CX(q1)`.
    pub fn tensor_terms(&self) -> String {
        self.entries
            .iter()
            .map(|(symbol, row)| format!("{symbol}(q{row})"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            write!(f, "Tensor Product:")
        } else {
            write!(f, "Tensor Product: {}", self.tensor_terms())
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct StepSimulator {
    current_column: usize,
    last_report: Option<StepReport>,
}

impl StepSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_column(&self) -> usize {
        self.current_column
    }

    pub fn last_report(&self) -> Option<&StepReport> {
        self.last_report.as_ref()
    }

    pub fn is_finished(&self, grid: &CircuitGrid) -> bool {
        self.current_column >= grid.cols()
    }

    /// Describes the current column and moves past it.
    ///
    /// Returns `None` once every column has been visited.
    pub fn advance(&mut self, grid: &CircuitGrid) -> Option<StepReport> {
        if self.is_finished(grid) {
            return None;
        }
        let column = self.current_column;
        let report = StepReport {
            column,
            entries: grid.column(column).map(|(row, g)| (g.symbol, row)).collect(),
        };
        self.current_column += 1;
        self.last_report = Some(report.clone());
        Some(report)
    }

    pub fn reset(&mut self) {
        self.current_column = 0;
        self.last_report = None;
    }

    /// Progress label, e.g. `Steps 2/5`.
    pub fn label(&self, grid: &CircuitGrid) -> String {
        format!("Steps {}/{}", self.current_column, grid.cols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lookup;

    fn sample() -> CircuitGrid {
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        grid.set(0, 0, lookup("H").unwrap()).unwrap();
        grid.set(1, 1, lookup("CX").unwrap()).unwrap();
        grid.set(2, 1, lookup("CX").unwrap()).unwrap();
        grid
    }

    #[test]
    fn visits_columns_in_order_then_stops() {
        let grid = sample();
        let mut sim = StepSimulator::new();
        for expected in 0..grid.cols() {
            let report = sim.advance(&grid).unwrap();
            assert_eq!(report.column, expected);
        }
        assert!(sim.is_finished(&grid));
        assert_eq!(sim.advance(&grid), None);
        assert_eq!(sim.current_column(), grid.cols());
        assert_eq!(sim.label(&grid), "Steps 5/5");
    }

    #[test]
    fn reports_gates_in_row_order() {
        let grid = sample();
        let mut sim = StepSimulator::new();
        assert_eq!(sim.advance(&grid).unwrap().to_string(), "Tensor Product: H(q0)");
        let second = sim.advance(&grid).unwrap();
        assert_eq!(second.entries, vec![("CX", 1), ("CX", 2)]);
        assert_eq!(second.to_string(), "Tensor Product: CX(q1) | CX(q2)");
        assert_eq!(sim.advance(&grid).unwrap().to_string(), "Tensor Product:");
    }

    #[test]
    fn reset_rewinds_and_drops_report() {
        let grid = sample();
        let mut sim = StepSimulator::new();
        sim.advance(&grid);
        sim.advance(&grid);
        assert!(sim.last_report().is_some());
        sim.reset();
        assert_eq!(sim.current_column(), 0);
        assert!(sim.last_report().is_none());
        assert_eq!(sim.advance(&grid).unwrap().column, 0);
    }
}
