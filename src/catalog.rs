//! Static gate catalog: symbols, qubit spans and default colors.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{GridError, GridResult};

/// Number of grid rows a gate occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Span {
    Single,
    Double,
    Triple,
    /// Fills every row of the clicked column.
    Column,
}

impl Span {
    /// Cells written by one logical gate, `None` for whole-column gates.
    pub fn cells(self) -> Option<usize> {
        match self {
            Span::Single => Some(1),
            Span::Double => Some(2),
            Span::Triple => Some(3),
            Span::Column => None,
        }
    }

    pub fn is_multi(self) -> bool {
        matches!(self, Span::Double | Span::Triple)
    }

    /// Column offset of the first command argument after the row.
    pub fn command_offset(self) -> i64 {
        if self.is_multi() { 1 } else { 0 }
    }

    /// Number of integer arguments in a command line.
    pub fn command_arity(self) -> usize {
        match self {
            Span::Triple => 3,
            _ => 2,
        }
    }
}

/// 24-bit color, written as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #rrggbb, got '{s}'"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("bad hex color '{s}'"))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateSpec {
    pub symbol: &'static str,
    pub name: &'static str,
    pub span: Span,
    pub default_color: Rgb,
}

impl GateSpec {
    /// Operation name used in command scripts.
    pub fn command_name(&self) -> String {
        self.symbol.to_ascii_lowercase()
    }
}

pub static GATES: &[GateSpec] = &[
    GateSpec { symbol: "I",       name: "Identity",  span: Span::Single, default_color: Rgb(0xff, 0xad, 0xad) },
    GateSpec { symbol: "X",       name: "Pauli-X",   span: Span::Single, default_color: Rgb(0xff, 0xd6, 0xa5) },
    GateSpec { symbol: "Y",       name: "Pauli-Y",   span: Span::Single, default_color: Rgb(0xfd, 0xff, 0xb6) },
    GateSpec { symbol: "Z",       name: "Pauli-Z",   span: Span::Single, default_color: Rgb(0xca, 0xff, 0xbf) },
    GateSpec { symbol: "H",       name: "Hadamard",  span: Span::Single, default_color: Rgb(0x9b, 0xf6, 0xff) },
    GateSpec { symbol: "S",       name: "Phase (S)", span: Span::Single, default_color: Rgb(0xa0, 0xc4, 0xff) },
    GateSpec { symbol: "T",       name: "T Gate",    span: Span::Single, default_color: Rgb(0xbd, 0xb2, 0xff) },
    GateSpec { symbol: "U",       name: "Universal", span: Span::Single, default_color: Rgb(0xff, 0xc6, 0xff) },
    GateSpec { symbol: "CX",      name: "CNOT",      span: Span::Double, default_color: Rgb(0xd0, 0xf4, 0xde) },
    GateSpec { symbol: "SWAP",    name: "SWAP",      span: Span::Double, default_color: Rgb(0xfe, 0xf9, 0xc7) },
    GateSpec { symbol: "CU",      name: "Controlled-U", span: Span::Double, default_color: Rgb(0xfc, 0xd5, 0xce) },
    GateSpec { symbol: "CCX",     name: "Toffoli",   span: Span::Triple, default_color: Rgb(0xcd, 0xb4, 0xdb) },
    GateSpec { symbol: "BARRIER", name: "Barrier",   span: Span::Column, default_color: Rgb(0xca, 0xcc, 0xcb) },
];

/// Finds a gate by symbol, ignoring ASCII case.
pub fn lookup(symbol: &str) -> GridResult<&'static GateSpec> {
    let symbol = symbol.trim();
    GATES
        .iter()
        .find(|g| g.symbol.eq_ignore_ascii_case(symbol))
        .ok_or_else(|| GridError::UnknownGateSymbol(symbol.to_string()))
}

pub fn qubit_span(symbol: &str) -> GridResult<Span> {
    lookup(symbol).map(|g| g.span)
}

/// Finds a gate by its command-script operation name (`id` is accepted for `I`).
pub fn from_command(op: &str) -> GridResult<&'static GateSpec> {
    if op.eq_ignore_ascii_case("id") {
        return lookup("I");
    }
    lookup(op)
}

/// Position of a gate in [`GATES`].
pub fn index_of(gate: &GateSpec) -> usize {
    GATES
        .iter()
        .position(|g| g.symbol == gate.symbol)
        .unwrap_or_default()
}

/// User color overrides, kept apart from [`GateSpec`].
#[derive(Clone, Debug, Default)]
pub struct ColorMap {
    overrides: HashMap<&'static str, Rgb>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_of(&self, gate: &GateSpec) -> Rgb {
        self.overrides
            .get(gate.symbol)
            .copied()
            .unwrap_or(gate.default_color)
    }

    pub fn set(&mut self, symbol: &str, color: Rgb) -> GridResult<()> {
        let gate = lookup(symbol)?;
        self.overrides.insert(gate.symbol, color);
        Ok(())
    }

    pub fn is_overridden(&self, symbol: &str) -> bool {
        lookup(symbol).is_ok_and(|g| self.overrides.contains_key(g.symbol))
    }

    pub fn reset(&mut self) {
        self.overrides.clear();
    }
}
