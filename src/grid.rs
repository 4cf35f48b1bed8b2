//! The 2-D placement store: rows are qubit lines, columns are time steps.

use crate::catalog::{GateSpec, Span};
use crate::error::{GridError, GridResult};

pub type Cell = Option<&'static GateSpec>;

/// Fixed-size matrix of gate cells.
///
/// The grid only checks bounds. Whether a placement is legal is decided by
/// [`crate::placement::PlacementState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircuitGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl CircuitGrid {
    pub fn new(rows: usize, cols: usize) -> GridResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidGridSize { rows, cols });
        }
        Ok(CircuitGrid {
            rows,
            cols,
            cells: vec![None; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> GridResult<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(self.out_of_bounds(row as i64, col as i64));
        }
        Ok(row * self.cols + col)
    }

    pub fn out_of_bounds(&self, row: i64, col: i64) -> GridError {
        GridError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> GridResult<Cell> {
        let i = self.index(row, col)?;
        Ok(self.cells[i])
    }

    pub fn set(&mut self, row: usize, col: usize, gate: &'static GateSpec) -> GridResult<()> {
        let i = self.index(row, col)?;
        self.cells[i] = Some(gate);
        Ok(())
    }

    pub fn clear(&mut self, row: usize, col: usize) -> GridResult<()> {
        let i = self.index(row, col)?;
        self.cells[i] = None;
        Ok(())
    }

    /// Writes `gate` into every row of `col`.
    pub fn fill_column(&mut self, col: usize, gate: &'static GateSpec) -> GridResult<()> {
        if col >= self.cols {
            return Err(self.out_of_bounds(0, col as i64));
        }
        for row in 0..self.rows {
            self.cells[row * self.cols + col] = Some(gate);
        }
        Ok(())
    }

    /// Changes the size and clears every cell.
    pub fn resize(&mut self, rows: usize, cols: usize) -> GridResult<()> {
        *self = CircuitGrid::new(rows, cols)?;
        Ok(())
    }

    /// Clears every cell, keeping the size.
    pub fn reset_all(&mut self) {
        self.cells.fill(None);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Non-empty cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, &'static GateSpec)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|g| (i / self.cols, i % self.cols, g)))
    }

    /// Non-empty cells of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = (usize, &'static GateSpec)> + '_ {
        (0..self.rows).filter_map(move |row| {
            if col >= self.cols {
                return None;
            }
            self.cells[row * self.cols + col].map(|g| (row, g))
        })
    }

    /// Drawing hints for one cell.
    pub fn cell_info(&self, row: usize, col: usize) -> CellInfo {
        let mut info = CellInfo::default();
        let Ok(Some(gate)) = self.get(row, col) else {
            return info;
        };
        info.gate = Some(gate);
        info.is_barrier = gate.span == Span::Column;

        // Vertical links join adjacent cells of the same multi-qubit gate.
        if gate.span.is_multi() {
            let same = |r: usize| matches!(self.get(r, col), Ok(Some(g)) if g.symbol == gate.symbol);
            info.vert_above = row > 0 && same(row - 1);
            info.vert_below = row + 1 < self.rows && same(row + 1);
        }
        info
    }
}

#[derive(Clone, Debug, Default)]
pub struct CellInfo {
    pub gate: Cell,
    pub is_barrier: bool,
    pub vert_above: bool,
    pub vert_below: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lookup;

    #[test]
    fn rejects_empty_sizes() {
        assert_eq!(
            CircuitGrid::new(0, 5),
            Err(GridError::InvalidGridSize { rows: 0, cols: 5 })
        );
        assert!(CircuitGrid::new(3, 0).is_err());
    }

    #[test]
    fn set_get_clear() {
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        let h = lookup("H").unwrap();
        grid.set(2, 4, h).unwrap();
        assert_eq!(grid.get(2, 4), Ok(Some(h)));
        assert_eq!(grid.occupied_count(), 1);
        grid.clear(2, 4).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn out_of_bounds_leaves_grid_untouched() {
        let mut grid = CircuitGrid::new(2, 2).unwrap();
        let before = grid.clone();
        let err = grid.set(2, 0, lookup("X").unwrap()).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 2
            }
        );
        assert!(grid.set(0, 9, lookup("X").unwrap()).is_err());
        assert!(grid.get(5, 5).is_err());
        assert!(grid.clear(0, 2).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn resize_and_reset_clear_contents() {
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        grid.set(0, 0, lookup("H").unwrap()).unwrap();
        grid.reset_all();
        assert!(grid.is_empty());
        assert_eq!((grid.rows(), grid.cols()), (3, 5));

        grid.set(1, 1, lookup("H").unwrap()).unwrap();
        grid.resize(4, 2).unwrap();
        assert!(grid.is_empty());
        assert_eq!((grid.rows(), grid.cols()), (4, 2));
        assert!(grid.resize(0, 1).is_err());
        assert_eq!((grid.rows(), grid.cols()), (4, 2));
    }

    #[test]
    fn fill_column_and_iterators() {
        let mut grid = CircuitGrid::new(3, 4).unwrap();
        let barrier = lookup("BARRIER").unwrap();
        grid.fill_column(2, barrier).unwrap();
        grid.set(0, 0, lookup("H").unwrap()).unwrap();
        assert!(grid.fill_column(4, barrier).is_err());

        let cells: Vec<_> = grid.occupied().map(|(r, c, g)| (r, c, g.symbol)).collect();
        assert_eq!(
            cells,
            vec![(0, 0, "H"), (0, 2, "BARRIER"), (1, 2, "BARRIER"), (2, 2, "BARRIER")]
        );
        assert_eq!(grid.column(2).count(), 3);
        assert_eq!(grid.column(1).count(), 0);
        assert_eq!(grid.column(7).count(), 0);
    }

    #[test]
    fn cell_info_links_multi_qubit_cells() {
        let mut grid = CircuitGrid::new(3, 2).unwrap();
        let cx = lookup("CX").unwrap();
        grid.set(1, 1, cx).unwrap();
        grid.set(2, 1, cx).unwrap();

        let top = grid.cell_info(1, 1);
        assert!(!top.vert_above && top.vert_below);
        let bottom = grid.cell_info(2, 1);
        assert!(bottom.vert_above && !bottom.vert_below);
        assert!(grid.cell_info(0, 0).gate.is_none());
    }
}
