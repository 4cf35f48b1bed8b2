use q_grid::catalog::{self, GateSpec};

#[derive(Clone, Debug)]
pub struct MenuItem {
    pub name: &'static str,
    pub symbol: &'static str,
    pub glyph: &'static str,
    pub key: char,
}

impl MenuItem {
    pub fn gate(&self) -> Option<&'static GateSpec> {
        catalog::lookup(self.symbol).ok()
    }
}

#[derive(Clone, Debug)]
pub struct MenuCategory {
    pub name: &'static str,
    pub items: &'static [MenuItem],
}

pub static GATE_MENU: &[MenuCategory] = &[
    MenuCategory {
        name: "Single Qubit",
        items: &[
            MenuItem { name: "Identity",      symbol: "I", glyph: "I", key: 'i' },
            MenuItem { name: "Pauli-X (NOT)", symbol: "X", glyph: "X", key: 'x' },
            MenuItem { name: "Pauli-Y",       symbol: "Y", glyph: "Y", key: 'y' },
            MenuItem { name: "Pauli-Z",       symbol: "Z", glyph: "Z", key: 'z' },
            MenuItem { name: "Hadamard",      symbol: "H", glyph: "H", key: 'h' },
            MenuItem { name: "Phase (S)",     symbol: "S", glyph: "S", key: 's' },
            MenuItem { name: "T Gate",        symbol: "T", glyph: "T", key: 't' },
            MenuItem { name: "Universal U",   symbol: "U", glyph: "U", key: 'u' },
        ],
    },
    MenuCategory {
        name: "Multi Qubit",
        items: &[
            MenuItem { name: "CNOT",          symbol: "CX",   glyph: "●─⊕",   key: 'c' },
            MenuItem { name: "SWAP",          symbol: "SWAP", glyph: "×─×",   key: 'w' },
            MenuItem { name: "Controlled-U",  symbol: "CU",   glyph: "●─U",   key: 'v' },
            MenuItem { name: "Toffoli (CCX)", symbol: "CCX",  glyph: "●─●─⊕", key: 'o' },
        ],
    },
    MenuCategory {
        name: "Special",
        items: &[
            MenuItem { name: "Barrier", symbol: "BARRIER", glyph: "┃", key: 'b' },
        ],
    },
];

/// Palette entry bound to hotkey `key`.
pub fn item_for_key(key: char) -> Option<&'static MenuItem> {
    GATE_MENU
        .iter()
        .flat_map(|cat| cat.items.iter())
        .find(|item| item.key == key)
}
