//! Text encodings of a [`CircuitGrid`].
//!
//! Two encodings share one interface ([`Encoding`]):
//!
//! * **Cells**: one `row,col,symbol` line per non-empty cell. This is the
//!   exact inverse pair used for plain saves.
//! * **Script**: one `op(args...)` command per non-empty cell, followed by a
//!   `# Code Box` sentinel line and an opaque trailer that is carried
//!   verbatim. Multi-qubit gates shift their column arguments by one
//!   (`cx(row, col+1)`, `ccx(row, col+1, col+2)`).
//!
//! Decoding is best effort: every bad line becomes a [`Diagnostic`] and the
//! remaining lines are still applied.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::catalog::{self, GateSpec, Span};
use crate::error::{GridError, GridResult};
use crate::grid::CircuitGrid;

pub const SCRIPT_HEADER: &str = "# Circuit grid gates";
pub const TRAILER_SENTINEL: &str = "# Code Box";

// ── Lazy-compiled regex patterns ──────────────────────────────────────────────

fn command_re() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"^(?:qc\.)?([A-Za-z]\w*)\s*\(([^()]*)\)\s*;?$").unwrap())
}

fn sentinel_re() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(?m)^# Code Box[ \t]*\r?$").unwrap())
}

// ── Decode results ────────────────────────────────────────────────────────────

/// One rejected line. `line` is 1-based; 0 means the file as a whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub error: GridError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.error)
        } else {
            write!(f, "line {}: {}", self.line, self.error)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Lines written into the grid.
    pub applied: usize,
    /// Text after the sentinel line, for script input that has one.
    pub trailer: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Decoded {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn report(&mut self, line: usize, error: GridError) {
        warn!(line, "{error}");
        self.diagnostics.push(Diagnostic { line, error });
    }
}

// ── Encoding selector ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Cells,
    Script,
}

impl Encoding {
    /// `.qc` files hold scripts; `.cells`, `.txt` and `.csv` hold cell lines.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "qc" => Some(Encoding::Script),
            "cells" | "txt" | "csv" => Some(Encoding::Cells),
            _ => None,
        }
    }

    /// Guesses the encoding of `text`.
    pub fn detect(text: &str) -> Self {
        if sentinel_re().is_match(text) {
            return Encoding::Script;
        }
        let has_command = text
            .lines()
            .map(str::trim)
            .any(|l| !l.starts_with('#') && command_re().is_match(l));
        if has_command {
            Encoding::Script
        } else {
            Encoding::Cells
        }
    }

    /// Renders `grid`. The cell encoding carries no trailer.
    pub fn encode(self, grid: &CircuitGrid, trailer: &str) -> String {
        match self {
            Encoding::Cells => encode_cells(grid),
            Encoding::Script => encode_script(grid, trailer),
        }
    }

    /// Clears `grid` and fills it from `text`.
    pub fn decode(self, grid: &mut CircuitGrid, text: &str) -> Decoded {
        match self {
            Encoding::Cells => decode_cells(grid, text),
            Encoding::Script => decode_script(grid, text),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Cells => write!(f, "cells"),
            Encoding::Script => write!(f, "script"),
        }
    }
}

// ── Cell lines ────────────────────────────────────────────────────────────────

pub fn encode_cells(grid: &CircuitGrid) -> String {
    let mut out = String::new();
    for (row, col, gate) in grid.occupied() {
        out.push_str(&format!("{row},{col},{}\n", gate.symbol));
    }
    out
}

pub fn decode_cells(grid: &mut CircuitGrid, text: &str) -> Decoded {
    grid.reset_all();
    let mut decoded = Decoded::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_cell_line(line).and_then(|(row, col, gate)| write_cell(grid, row, col, gate)) {
            Ok(()) => decoded.applied += 1,
            Err(e) => decoded.report(idx + 1, e),
        }
    }

    debug!(applied = decoded.applied, skipped = decoded.diagnostics.len(), "decoded cell lines");
    decoded
}

fn parse_cell_line(line: &str) -> GridResult<(i64, i64, &'static GateSpec)> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let [row, col, symbol] = parts.as_slice() else {
        return Err(GridError::MalformedLine(format!(
            "expected row,col,symbol, got '{line}'"
        )));
    };
    Ok((parse_int(row, line)?, parse_int(col, line)?, catalog::lookup(symbol)?))
}

// ── Command script ────────────────────────────────────────────────────────────

/// One command for a cell holding `gate` at `(row, col)`.
pub fn command_for(gate: &GateSpec, row: usize, col: usize) -> String {
    let op = gate.command_name();
    match gate.span {
        Span::Single | Span::Column => format!("{op}({row},{col})"),
        Span::Double => format!("{op}({row},{})", col + 1),
        Span::Triple => format!("{op}({row},{},{})", col + 1, col + 2),
    }
}

/// Header plus one command per non-empty cell, without the trailer.
pub fn script_body(grid: &CircuitGrid) -> String {
    let mut out = String::new();
    out.push_str(SCRIPT_HEADER);
    out.push('\n');
    for (row, col, gate) in grid.occupied() {
        out.push_str(&command_for(gate, row, col));
        out.push('\n');
    }
    out
}

pub fn encode_script(grid: &CircuitGrid, trailer: &str) -> String {
    let mut out = script_body(grid);
    out.push('\n');
    out.push_str(TRAILER_SENTINEL);
    out.push('\n');
    out.push_str(trailer);
    out
}

/// Splits `text` at the sentinel line into the gate section and the trailer.
pub fn split_trailer(text: &str) -> (&str, Option<&str>) {
    let Some(m) = sentinel_re().find(text) else {
        return (text, None);
    };
    let rest = &text[m.end()..];
    let trailer = rest.strip_prefix('\n').unwrap_or(rest);
    (&text[..m.start()], Some(trailer))
}

pub fn decode_script(grid: &mut CircuitGrid, text: &str) -> Decoded {
    grid.reset_all();
    let mut decoded = Decoded::default();

    let (gates, trailer) = split_trailer(text);
    match trailer {
        Some(t) => decoded.trailer = Some(t.to_string()),
        None => decoded.report(0, GridError::MissingTrailerSentinel),
    }

    for (idx, raw) in gates.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_command(line).and_then(|(row, col, gate)| write_cell(grid, row, col, gate)) {
            Ok(()) => decoded.applied += 1,
            Err(e) => decoded.report(idx + 1, e),
        }
    }

    debug!(applied = decoded.applied, skipped = decoded.diagnostics.len(), "decoded command script");
    decoded
}

/// Parses `op(args...)` back into the stored `(row, col)` of the cell.
pub fn parse_command(line: &str) -> GridResult<(i64, i64, &'static GateSpec)> {
    let caps = command_re()
        .captures(line)
        .ok_or_else(|| GridError::MalformedLine(format!("expected op(args...), got '{line}'")))?;
    let gate = catalog::from_command(&caps[1])?;

    let args = caps[2]
        .split(',')
        .map(|tok| parse_int(tok.trim(), line))
        .collect::<GridResult<Vec<i64>>>()?;
    let arity = gate.span.command_arity();
    // `u` may carry a trailing angle argument, which is ignored.
    let optional = usize::from(gate.symbol == "U");
    if args.len() < arity || args.len() > arity + optional {
        return Err(GridError::MalformedLine(format!(
            "{} expects {arity} arguments, got {} in '{line}'",
            &caps[1],
            args.len()
        )));
    }
    if gate.span == Span::Triple && args[1].checked_add(1) != Some(args[2]) {
        return Err(GridError::MalformedLine(format!(
            "{} targets must be adjacent columns in '{line}'",
            &caps[1]
        )));
    }

    let row = args[0];
    let mut col = args[1]
        .checked_sub(gate.span.command_offset())
        .ok_or_else(|| GridError::MalformedLine(format!("column out of range in '{line}'")))?;
    if col < 0 {
        // Lenient: a target column below the offset maps to column 0.
        debug!(line, "clamping negative column to 0");
        col = 0;
    }
    Ok((row, col, gate))
}

// ── Shared helpers ────────────────────────────────────────────────────────────

fn parse_int(tok: &str, line: &str) -> GridResult<i64> {
    tok.parse::<i64>().map_err(|_| {
        GridError::MalformedLine(format!("bad integer '{tok}' in '{line}'"))
    })
}

fn write_cell(grid: &mut CircuitGrid, row: i64, col: i64, gate: &'static GateSpec) -> GridResult<()> {
    if !grid.contains(row, col) {
        return Err(grid.out_of_bounds(row, col));
    }
    grid.set(row as usize, col as usize, gate)
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
    fn encodes_cell_lines() {
        assert_eq!(encode_cells(&sample()), "0,0,H\n1,1,CX\n2,1,CX\n");
    }

    #[test]
    fn encodes_commands_with_arity_offsets() {
        let h = lookup("H").unwrap();
        let cx = lookup("CX").unwrap();
        let ccx = lookup("CCX").unwrap();
        let barrier = lookup("BARRIER").unwrap();
        assert_eq!(command_for(h, 0, 0), "h(0,0)");
        assert_eq!(command_for(cx, 1, 1), "cx(1,2)");
        assert_eq!(command_for(ccx, 2, 3), "ccx(2,4,5)");
        assert_eq!(command_for(barrier, 1, 4), "barrier(1,4)");
        assert_eq!(
            script_body(&sample()),
            "# Circuit grid gates\nh(0,0)\ncx(1,2)\ncx(2,2)\n"
        );
    }

    #[test]
    fn both_encodings_reproduce_the_sample() {
        let grid = sample();
        for enc in [Encoding::Cells, Encoding::Script] {
            let text = enc.encode(&grid, "notes");
            let mut back = CircuitGrid::new(3, 5).unwrap();
            back.set(0, 4, lookup("Z").unwrap()).unwrap();
            let decoded = enc.decode(&mut back, &text);
            assert!(decoded.is_clean(), "{enc}: {:?}", decoded.diagnostics);
            assert_eq!(decoded.applied, 3);
            assert_eq!(back, grid);
        }
    }

    #[test]
    fn malformed_cell_line_is_skipped() {
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        let decoded = decode_cells(&mut grid, "0,0,H\n1,H\n2,x,Z\n9,9,X\n1,1,RZ\n2,2,T\n");
        assert_eq!(decoded.applied, 2);
        let lines: Vec<usize> = decoded.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 3, 4, 5]);
        assert!(matches!(decoded.diagnostics[0].error, GridError::MalformedLine(_)));
        assert!(matches!(decoded.diagnostics[1].error, GridError::MalformedLine(_)));
        assert!(matches!(decoded.diagnostics[2].error, GridError::OutOfBounds { .. }));
        assert_eq!(
            decoded.diagnostics[3].error,
            GridError::UnknownGateSymbol("RZ".to_string())
        );
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    fn trailer_is_carried_verbatim() {
        let trailer = "from qiskit import QuantumCircuit\n  # Code Box lookalike\n\nqc = QuantumCircuit(3)";
        let text = encode_script(&sample(), trailer);
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        let decoded = decode_script(&mut grid, &text);
        assert_eq!(decoded.trailer.as_deref(), Some(trailer));
        assert!(decoded.is_clean());
    }

    #[test]
    fn missing_sentinel_is_reported_but_gates_load() {
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        let decoded = decode_script(&mut grid, "h(0,0)\nx(2,4)\n");
        assert_eq!(decoded.trailer, None);
        assert_eq!(decoded.applied, 2);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic {
                line: 0,
                error: GridError::MissingTrailerSentinel
            }]
        );
    }

    #[test]
    fn command_decoding_is_lenient_where_documented() {
        let text = "qc.ID(0, 1)\nCX(2,0)\nccx(0,a,2)\nrzz(0,0)\nh(0)\nswap(5,1)\nnot a command\n\n# Code Box\n";
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        let decoded = decode_script(&mut grid, text);

        assert_eq!(grid.get(0, 1).unwrap().map(|g| g.symbol), Some("I"));
        // cx target column 0 clamps to stored column 0.
        assert_eq!(grid.get(2, 0).unwrap().map(|g| g.symbol), Some("CX"));
        assert_eq!(decoded.applied, 2);

        let errs: Vec<(usize, &GridError)> =
            decoded.diagnostics.iter().map(|d| (d.line, &d.error)).collect();
        assert_eq!(errs.len(), 5);
        assert!(matches!(errs[0], (3, GridError::MalformedLine(_))));
        assert!(matches!(errs[1], (4, GridError::UnknownGateSymbol(_))));
        assert!(matches!(errs[2], (5, GridError::MalformedLine(_))));
        assert!(matches!(errs[3], (6, GridError::OutOfBounds { row: 5, col: 0, .. })));
        assert!(matches!(errs[4], (7, GridError::MalformedLine(_))));
    }

    #[test]
    fn extreme_columns_are_reported_not_panicked() {
        let text = "h(0,0)\ncx(0,-9223372036854775808)\nx(1,1)\n\n# Code Box\n";
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        let decoded = decode_script(&mut grid, text);

        assert_eq!(decoded.applied, 2);
        assert_eq!(grid.get(1, 1).unwrap().map(|g| g.symbol), Some("X"));
        assert_eq!(decoded.diagnostics.len(), 1);
        assert!(matches!(decoded.diagnostics[0], Diagnostic { line: 2, error: GridError::MalformedLine(_) }));
    }

    #[test]
    fn u_accepts_trailing_angle() {
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        let decoded = decode_script(&mut grid, "qc.u(1, 2, 0)\nu(0,3)\nu(0,1,0,0)\nh(2,2,0)\n\n# Code Box\n");

        assert_eq!(grid.get(1, 2).unwrap().map(|g| g.symbol), Some("U"));
        assert_eq!(grid.get(0, 3).unwrap().map(|g| g.symbol), Some("U"));
        assert_eq!(decoded.applied, 2);
        let lines: Vec<usize> = decoded.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn ccx_targets_must_be_adjacent() {
        let mut grid = CircuitGrid::new(3, 5).unwrap();
        let decoded = decode_script(&mut grid, "ccx(0,2,9)\nccx(1,2,3)\n\n# Code Box\n");

        assert_eq!(grid.get(0, 1).unwrap(), None);
        assert_eq!(grid.get(1, 1).unwrap().map(|g| g.symbol), Some("CCX"));
        assert_eq!(decoded.diagnostics.len(), 1);
        assert!(matches!(decoded.diagnostics[0], Diagnostic { line: 1, error: GridError::MalformedLine(_) }));
    }

    #[test]
    fn detects_encodings() {
        assert_eq!(Encoding::detect("0,0,H\n"), Encoding::Cells);
        assert_eq!(Encoding::detect("h(0,0)\n"), Encoding::Script);
        assert_eq!(Encoding::detect("\n# Code Box\n"), Encoding::Script);
        assert_eq!(Encoding::from_path(Path::new("a.qc")), Some(Encoding::Script));
        assert_eq!(Encoding::from_path(Path::new("a.CELLS")), Some(Encoding::Cells));
        assert_eq!(Encoding::from_path(Path::new("a")), None);
    }

    #[test]
    fn crlf_sentinel_is_recognized() {
        let (gates, trailer) = split_trailer("h(0,0)\r\n\r\n# Code Box\r\nabc");
        assert_eq!(gates, "h(0,0)\r\n\r\n");
        assert_eq!(trailer, Some("abc"));
    }
}
