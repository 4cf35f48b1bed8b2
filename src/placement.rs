//! Gate selection and cell-click state machine.

use tracing::debug;

use crate::catalog::{self, GateSpec, Rgb, Span};
use crate::error::{GridError, GridResult};
use crate::grid::CircuitGrid;

/// Where the user is in placing a gate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PlacementState {
    #[default]
    Idle,
    Selected {
        gate: &'static GateSpec,
        color: Rgb,
    },
    /// First cell of a multi-qubit gate is down; more clicks are expected
    /// in `anchor_column`.
    MultiPending {
        gate: &'static GateSpec,
        color: Rgb,
        remaining: usize,
        anchor_column: usize,
        placed_rows: Vec<usize>,
    },
}

/// Cells written by one successful click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub gate: &'static GateSpec,
    pub color: Rgb,
    pub cells: Vec<(usize, usize)>,
    /// Cells of the logical gate still to place after this click.
    pub remaining: usize,
}

impl Placement {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

impl PlacementState {
    /// Chooses a gate, abandoning any pending multi-qubit placement.
    pub fn select_gate(&mut self, symbol: &str, color: Rgb) -> GridResult<()> {
        let gate = catalog::lookup(symbol)?;
        if let PlacementState::MultiPending { gate: old, remaining, .. } = self {
            debug!(gate = old.symbol, remaining = *remaining, "abandoning pending placement");
        }
        *self = PlacementState::Selected { gate, color };
        Ok(())
    }

    pub fn selected_gate(&self) -> Option<&'static GateSpec> {
        match self {
            PlacementState::Idle => None,
            PlacementState::Selected { gate, .. } | PlacementState::MultiPending { gate, .. } => {
                Some(*gate)
            }
        }
    }

    pub fn remaining(&self) -> usize {
        match self {
            PlacementState::MultiPending { remaining, .. } => *remaining,
            _ => 0,
        }
    }

    pub fn anchor_column(&self) -> Option<usize> {
        match self {
            PlacementState::MultiPending { anchor_column, .. } => Some(*anchor_column),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = PlacementState::Idle;
    }

    /// Applies a click at `(row, col)`.
    ///
    /// On error neither the grid nor the state changes.
    pub fn place_cell(
        &mut self,
        grid: &mut CircuitGrid,
        row: usize,
        col: usize,
    ) -> GridResult<Placement> {
        if !grid.contains(row as i64, col as i64) {
            return Err(grid.out_of_bounds(row as i64, col as i64));
        }

        match std::mem::take(self) {
            PlacementState::Idle => Err(GridError::NoGateSelected),
            PlacementState::Selected { gate, color } => match gate.span {
                Span::Column => {
                    grid.fill_column(col, gate)?;
                    Ok(Placement {
                        gate,
                        color,
                        cells: (0..grid.rows()).map(|r| (r, col)).collect(),
                        remaining: 0,
                    })
                }
                Span::Single => {
                    grid.set(row, col, gate)?;
                    Ok(Placement {
                        gate,
                        color,
                        cells: vec![(row, col)],
                        remaining: 0,
                    })
                }
                Span::Double | Span::Triple => {
                    let needed = gate.span.cells().unwrap_or(1);
                    if needed > grid.rows() {
                        *self = PlacementState::Selected { gate, color };
                        return Err(GridError::SpanExceedsGrid {
                            symbol: gate.symbol,
                            needed,
                            rows: grid.rows(),
                        });
                    }
                    grid.set(row, col, gate)?;
                    let remaining = needed - 1;
                    *self = PlacementState::MultiPending {
                        gate,
                        color,
                        remaining,
                        anchor_column: col,
                        placed_rows: vec![row],
                    };
                    Ok(Placement {
                        gate,
                        color,
                        cells: vec![(row, col)],
                        remaining,
                    })
                }
            },
            PlacementState::MultiPending {
                gate,
                color,
                remaining,
                anchor_column,
                mut placed_rows,
            } => {
                let rejection = if col != anchor_column {
                    Some(GridError::OffAnchorColumn {
                        symbol: gate.symbol,
                        anchor: anchor_column,
                        col,
                    })
                } else if placed_rows.contains(&row) {
                    Some(GridError::DuplicateRow {
                        symbol: gate.symbol,
                        row,
                    })
                } else {
                    None
                };
                if let Some(err) = rejection {
                    *self = PlacementState::MultiPending {
                        gate,
                        color,
                        remaining,
                        anchor_column,
                        placed_rows,
                    };
                    return Err(err);
                }

                grid.set(row, col, gate)?;
                placed_rows.push(row);
                let remaining = remaining - 1;
                if remaining > 0 {
                    *self = PlacementState::MultiPending {
                        gate,
                        color,
                        remaining,
                        anchor_column,
                        placed_rows,
                    };
                }
                Ok(Placement {
                    gate,
                    color,
                    cells: vec![(row, col)],
                    remaining,
                })
            }
        }
    }
}
