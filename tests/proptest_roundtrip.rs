//! Property-based tests for the grid encodings, placement arity, statistics
//! and step walking.

use proptest::prelude::*;
use q_grid::catalog::{GATES, lookup};
use q_grid::{CircuitGrid, Encoding, PlacementState, Session, Span, StepSimulator};

/// Random grid with any subset of cells filled by catalog gates.
fn arb_grid() -> impl Strategy<Value = CircuitGrid> {
    (1_usize..=6, 1_usize..=8).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::option::of(0..GATES.len()), rows * cols).prop_map(
            move |cells| {
                let mut grid = CircuitGrid::new(rows, cols).unwrap();
                for (i, cell) in cells.into_iter().enumerate() {
                    if let Some(g) = cell {
                        grid.set(i / cols, i % cols, &GATES[g]).unwrap();
                    }
                }
                grid
            },
        )
    })
}

fn fresh_like(grid: &CircuitGrid) -> CircuitGrid {
    CircuitGrid::new(grid.rows(), grid.cols()).unwrap()
}

proptest! {
    #[test]
    fn cell_lines_roundtrip(grid in arb_grid()) {
        let text = Encoding::Cells.encode(&grid, "");
        prop_assert_eq!(text.lines().count(), grid.occupied_count());

        let mut back = fresh_like(&grid);
        let decoded = Encoding::Cells.decode(&mut back, &text);
        prop_assert!(decoded.is_clean());
        prop_assert_eq!(back, grid);
    }

    #[test]
    fn command_script_roundtrip(grid in arb_grid(), trailer in "[ -~\n]{0,40}") {
        let text = Encoding::Script.encode(&grid, &trailer);

        let mut back = fresh_like(&grid);
        let decoded = Encoding::Script.decode(&mut back, &text);
        prop_assert!(decoded.is_clean(), "{:?}", decoded.diagnostics);
        prop_assert_eq!(decoded.trailer.as_deref(), Some(trailer.as_str()));
        prop_assert_eq!(back, grid);
    }

    #[test]
    fn out_of_range_set_never_mutates(grid in arb_grid(), row in 0_usize..12, col in 0_usize..12) {
        prop_assume!(row >= grid.rows() || col >= grid.cols());
        let mut after = grid.clone();
        prop_assert!(after.set(row, col, lookup("H").unwrap()).is_err());
        prop_assert_eq!(after, grid);
    }

    #[test]
    fn placement_arity(symbol in prop::sample::select(vec!["CX", "SWAP", "CU", "CCX"]),
                       col in 0_usize..5,
                       clicks in 1_usize..=3) {
        let gate = lookup(symbol).unwrap();
        let span = gate.span.cells().unwrap();
        let clicks = clicks.min(span);

        let mut grid = CircuitGrid::new(3, 5).unwrap();
        let mut state = PlacementState::Idle;
        state.select_gate(symbol, gate.default_color).unwrap();
        for row in 0..clicks {
            state.place_cell(&mut grid, row, col).unwrap();
        }

        prop_assert_eq!(grid.column(col).filter(|(_, g)| g.symbol == symbol).count(), clicks);
        if clicks == span {
            prop_assert_eq!(state, PlacementState::Idle);
        } else {
            prop_assert_eq!(state.remaining(), span - clicks);
        }
    }

    #[test]
    fn percentages_sum_to_zero_or_hundred(picks in prop::collection::vec((0..GATES.len(), 0_usize..3, 0_usize..4), 0..20)) {
        let mut session = Session::new(3, 4).unwrap();
        let mut placed = std::collections::HashSet::new();
        for (g, row, col) in picks {
            let gate = &GATES[g];
            session.on_gate_selected(gate.symbol, gate.default_color).unwrap();
            if session.on_cell_clicked(row, col).is_ok() {
                placed.insert(gate.symbol);
            }
        }

        let pcts = session.stats().percentages();
        let sum: f64 = pcts.iter().map(|&(_, p)| p).sum();
        prop_assert!(sum == 0.0 || (sum - 100.0).abs() < 1e-6);
        for (symbol, p) in pcts {
            if !placed.contains(&symbol) {
                prop_assert_eq!(p, 0.0);
            }
        }
    }

    #[test]
    fn stepping_visits_every_column_once(grid in arb_grid()) {
        let mut sim = StepSimulator::new();
        for expected in 0..grid.cols() {
            let report = sim.advance(&grid).unwrap();
            prop_assert_eq!(report.column, expected);
            prop_assert_eq!(report.entries.len(), grid.column(expected).count());
        }
        prop_assert!(sim.advance(&grid).is_none());
        sim.reset();
        prop_assert_eq!(sim.current_column(), 0);
    }
}

#[test]
fn barrier_span_is_whole_column() {
    assert_eq!(lookup("BARRIER").unwrap().span, Span::Column);
}
