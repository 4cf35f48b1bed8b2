//! Single owner of the grid, placement state, colors, statistics and stepper.
//!
//! Front ends drive everything through the `on_*` methods. Problems are
//! written to the message log and to `tracing`; none of them abort the
//! session.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::catalog::{self, ColorMap, Rgb};
use crate::codec::{self, Decoded, Encoding};
use crate::error::{GridError, GridResult};
use crate::grid::CircuitGrid;
use crate::placement::{Placement, PlacementState};
use crate::stats::UsageStats;
use crate::stepper::{StepReport, StepSimulator};

pub const DEFAULT_ROWS: usize = 3;
pub const DEFAULT_COLS: usize = 5;

#[derive(Clone, Debug)]
pub struct Session {
    grid: CircuitGrid,
    placement: PlacementState,
    colors: ColorMap,
    stats: UsageStats,
    stepper: StepSimulator,
    messages: Vec<String>,
}

impl Session {
    pub fn new(rows: usize, cols: usize) -> GridResult<Self> {
        Ok(Session {
            grid: CircuitGrid::new(rows, cols)?,
            placement: PlacementState::Idle,
            colors: ColorMap::new(),
            stats: UsageStats::new(),
            stepper: StepSimulator::new(),
            messages: Vec::new(),
        })
    }

    pub fn grid(&self) -> &CircuitGrid {
        &self.grid
    }

    pub fn placement(&self) -> &PlacementState {
        &self.placement
    }

    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    pub fn stepper(&self) -> &StepSimulator {
        &self.stepper
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    fn note(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    fn report(&mut self, err: &GridError) {
        warn!("{err}");
        self.note(format!("Error: {err}"));
    }

    /// Color the grid shows for `symbol`, honoring user overrides.
    pub fn color_of(&self, symbol: &str) -> Option<Rgb> {
        catalog::lookup(symbol).ok().map(|g| self.colors.color_of(g))
    }

    pub fn set_gate_color(&mut self, symbol: &str, color: Rgb) -> GridResult<()> {
        let res = self.colors.set(symbol, color);
        if let Err(e) = &res {
            self.report(e);
        }
        res
    }

    pub fn on_gate_selected(&mut self, symbol: &str, color: Rgb) -> GridResult<()> {
        let res = self.placement.select_gate(symbol, color);
        if let Err(e) = &res {
            self.report(e);
        }
        res
    }

    /// Places the selected gate at `(row, col)` and counts every written cell.
    pub fn on_cell_clicked(&mut self, row: usize, col: usize) -> GridResult<Placement> {
        let placed = match self.placement.place_cell(&mut self.grid, row, col) {
            Ok(p) => p,
            Err(e) => {
                self.report(&e);
                return Err(e);
            }
        };

        for _ in &placed.cells {
            // The symbol came from the catalog, so counting cannot fail.
            let _ = self.stats.increment(placed.gate.symbol);
        }
        info!(gate = placed.gate.symbol, row, col, remaining = placed.remaining, "placed");
        if placed.remaining > 0 {
            let anchor = self.placement.anchor_column().unwrap_or(col);
            self.note(format!(
                "Place the next part of the {} gate in column {anchor} ({} left)",
                placed.gate.symbol, placed.remaining
            ));
        }
        Ok(placed)
    }

    /// Drops the current selection and any pending multi-qubit gate.
    pub fn cancel_selection(&mut self) {
        self.placement.cancel();
    }

    /// Writes the grid to `out`. `trailer` is only used by the script encoding.
    pub fn on_save<W: Write>(&self, out: W, encoding: Encoding, trailer: &str) -> io::Result<()> {
        let mut out = BufWriter::new(out);
        out.write_all(encoding.encode(&self.grid, trailer).as_bytes())?;
        out.flush()
    }

    /// Replaces the grid contents with the decoded text from `input`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected, so it surfaces as a
    /// diagnostic on the affected line.
    pub fn on_load<R: Read>(&mut self, mut input: R, encoding: Encoding) -> io::Result<Decoded> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        Ok(self.load_text(&String::from_utf8_lossy(&bytes), encoding))
    }

    pub fn load_text(&mut self, text: &str, encoding: Encoding) -> Decoded {
        self.placement.cancel();
        let decoded = encoding.decode(&mut self.grid, text);
        for d in &decoded.diagnostics {
            self.note(format!("Error: {d}"));
        }
        decoded
    }

    pub fn save_to_path(&mut self, path: &Path, encoding: Encoding, trailer: &str) -> io::Result<()> {
        let res = File::create(path).and_then(|f| self.on_save(f, encoding, trailer));
        match &res {
            Ok(()) => {
                info!(path = %path.display(), %encoding, "saved circuit");
                self.note(format!("Circuit saved to {}", file_name(path)));
            }
            Err(e) => self.note(format!("Error saving file: {e}")),
        }
        res
    }

    pub fn load_from_path(&mut self, path: &Path, encoding: Encoding) -> io::Result<Decoded> {
        let res = File::open(path).and_then(|f| self.on_load(f, encoding));
        match &res {
            Ok(decoded) => {
                info!(path = %path.display(), %encoding, applied = decoded.applied, "loaded circuit");
                self.note(format!("Circuit loaded from {}", file_name(path)));
            }
            Err(e) => self.note(format!("Error loading file: {e}")),
        }
        res
    }

    pub fn on_step(&mut self) -> Option<StepReport> {
        let report = self.stepper.advance(&self.grid)?;
        self.note(report.to_string());
        Some(report)
    }

    pub fn on_reset_steps(&mut self) {
        self.stepper.reset();
    }

    pub fn on_new_circuit(&mut self) {
        self.grid.reset_all();
        self.placement.cancel();
        self.stats.reset();
        self.stepper.reset();
        self.colors.reset();
        self.messages.clear();
        info!("new circuit");
    }

    /// Resizes the grid; contents, statistics and the step cursor are cleared.
    pub fn resize(&mut self, rows: usize, cols: usize) -> GridResult<()> {
        if let Err(e) = self.grid.resize(rows, cols) {
            self.report(&e);
            return Err(e);
        }
        self.placement.cancel();
        self.stats.reset();
        self.stepper.reset();
        Ok(())
    }

    /// Command script body for the live preview.
    pub fn command_preview(&self) -> String {
        codec::script_body(&self.grid)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
