//! Error types for the circuit grid core.

use thiserror::Error;

/// Errors reported by grid, placement and codec operations.
///
/// None of these are fatal: callers log them and carry on with the next
/// click or the next script line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GridError {
    /// Symbol has no entry in the gate catalog.
    #[error("Unrecognized gate: {0}")]
    UnknownGateSymbol(String),

    /// Coordinates fall outside the grid.
    #[error("Gate position out of bounds (row: {row}, col: {col}) for a {rows}x{cols} grid")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    /// A cell was clicked with no gate selected.
    #[error("No gate selected")]
    NoGateSelected,

    /// A follow-up click of a multi-qubit gate landed outside its anchor column.
    #[error("Place the next part of the {symbol} gate in column {anchor} (clicked column {col})")]
    OffAnchorColumn {
        symbol: &'static str,
        anchor: usize,
        col: usize,
    },

    /// A follow-up click of a multi-qubit gate hit a row it already occupies.
    #[error("Row {row} already holds part of the {symbol} gate")]
    DuplicateRow { symbol: &'static str, row: usize },

    /// A script line could not be parsed.
    #[error("Malformed line: {0}")]
    MalformedLine(String),

    /// A command script has no `# Code Box` sentinel line.
    #[error("Invalid file format: missing trailer sentinel")]
    MissingTrailerSentinel,

    /// A multi-qubit gate needs more rows than the grid has.
    #[error("The {symbol} gate needs {needed} qubit rows but the grid has {rows}")]
    SpanExceedsGrid {
        symbol: &'static str,
        needed: usize,
        rows: usize,
    },

    /// Grid dimensions must both be at least one.
    #[error("Grid size must be positive integers (got {rows}x{cols})")]
    InvalidGridSize { rows: usize, cols: usize },
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
