use std::fs;
use std::path::PathBuf;

use q_grid::{Encoding, Session};

use crate::menu::{GATE_MENU, MenuItem};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Focus {
    Circuit,
    Menu,
    Notes,
}

pub struct App {
    pub session: Session,
    pub file: PathBuf,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub width: u16,
    pub height: u16,
    pub focus: Focus,
    pub status_msg: String,

    // Code Box editor state (the script trailer)
    pub notes_text: String,
    pub notes_cursor: usize, // byte offset into notes_text
    pub notes_scroll: u16,   // vertical scroll offset (lines)

    // Menu state
    pub menu_cat: usize,
    pub menu_item: usize,
}

impl App {
    pub fn new(session: Session, file: PathBuf) -> Self {
        App {
            session,
            file,
            cursor_row: 0,
            cursor_col: 0,
            width: 80,
            height: 24,
            focus: Focus::Circuit,
            status_msg: String::new(),
            notes_text: String::new(),
            notes_cursor: 0,
            notes_scroll: 0,
            menu_cat: 0,
            menu_item: 0,
        }
    }

    /// Shows the newest session message in the status line.
    fn sync_status(&mut self) {
        if let Some(msg) = self.session.messages().last() {
            self.status_msg = msg.clone();
        }
    }

    pub fn select_item(&mut self, item: &MenuItem) {
        let Some(color) = self.session.color_of(item.symbol) else {
            return;
        };
        if self.session.on_gate_selected(item.symbol, color).is_ok() {
            self.status_msg = format!("{} selected", item.name);
        } else {
            self.sync_status();
        }
    }

    pub fn select_menu_item(&mut self) {
        let item = &GATE_MENU[self.menu_cat].items[self.menu_item];
        self.select_item(item);
        self.focus = Focus::Circuit;
    }

    pub fn place_at_cursor(&mut self) {
        match self.session.on_cell_clicked(self.cursor_row, self.cursor_col) {
            Ok(placed) if placed.is_complete() => {
                self.status_msg = format!(
                    "Placed {} at q[{}], step {}",
                    placed.gate.symbol, self.cursor_row, self.cursor_col
                );
            }
            _ => self.sync_status(),
        }
    }

    pub fn step(&mut self) {
        if self.session.on_step().is_some() {
            self.sync_status();
        } else {
            self.status_msg = "All steps done".to_string();
        }
    }

    pub fn reset_steps(&mut self) {
        self.session.on_reset_steps();
        self.status_msg = "Steps reset".to_string();
    }

    pub fn new_circuit(&mut self) {
        self.session.on_new_circuit();
        self.notes_text.clear();
        self.notes_cursor = 0;
        self.notes_scroll = 0;
        self.status_msg = "New circuit".to_string();
    }

    pub fn resize(&mut self, d_rows: isize, d_cols: isize) {
        let rows = self.session.grid().rows().saturating_add_signed(d_rows);
        let cols = self.session.grid().cols().saturating_add_signed(d_cols);
        if self.session.resize(rows, cols).is_ok() {
            self.cursor_row = self.cursor_row.min(rows - 1);
            self.cursor_col = self.cursor_col.min(cols - 1);
            self.status_msg = format!("Grid resized to {rows}x{cols}; cells cleared");
        } else {
            self.sync_status();
        }
    }

    pub fn encoding(&self) -> Encoding {
        Encoding::from_path(&self.file).unwrap_or(Encoding::Script)
    }

    pub fn save_circuit(&mut self) {
        let enc = self.encoding();
        let file = self.file.clone();
        let _ = self.session.save_to_path(&file, enc, &self.notes_text);
        self.sync_status();
    }

    pub fn load_circuit(&mut self) {
        let file = self.file.clone();
        let decoded = match Encoding::from_path(&file) {
            Some(enc) => self.session.load_from_path(&file, enc).ok(),
            None => match fs::read(&file) {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    Some(self.session.load_text(&text, Encoding::detect(&text)))
                }
                Err(e) => {
                    self.status_msg = format!("Error loading file: {e}");
                    return;
                }
            },
        };
        if let Some(decoded) = decoded {
            if let Some(trailer) = decoded.trailer {
                self.notes_text = trailer;
                self.notes_cursor = self.notes_text.len();
                self.notes_scroll = 0;
            }
            self.status_msg = if decoded.diagnostics.is_empty() {
                format!("Loaded {} gates", decoded.applied)
            } else {
                format!(
                    "Loaded {} gates, skipped {} lines (see messages)",
                    decoded.applied,
                    decoded.diagnostics.len()
                )
            };
        } else {
            self.sync_status();
        }
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let grid = self.session.grid();
        self.cursor_row = self
            .cursor_row
            .saturating_add_signed(d_row)
            .min(grid.rows() - 1);
        self.cursor_col = self
            .cursor_col
            .saturating_add_signed(d_col)
            .min(grid.cols() - 1);
    }

    pub fn notes_insert_char(&mut self, ch: char) {
        self.notes_text.insert(self.notes_cursor, ch);
        self.notes_cursor += ch.len_utf8();
    }

    pub fn notes_backspace(&mut self) {
        if self.notes_cursor == 0 { return; }
        let mut pos = self.notes_cursor - 1;
        while pos > 0 && !self.notes_text.is_char_boundary(pos) { pos -= 1; }
        self.notes_text.remove(pos);
        self.notes_cursor = pos;
    }

    pub fn notes_delete_forward(&mut self) {
        if self.notes_cursor >= self.notes_text.len() { return; }
        self.notes_text.remove(self.notes_cursor);
    }

    pub fn notes_cursor_row_col(&self) -> (usize, usize) {
        let cursor = self.notes_cursor.min(self.notes_text.len());
        let before = &self.notes_text[..cursor];
        let row = before.bytes().filter(|&b| b == b'\n').count();
        let col = match before.rfind('\n') {
            Some(p) => before.len() - p - 1,
            None => before.len(),
        };
        (row, col)
    }

    pub fn notes_move_left(&mut self) {
        if self.notes_cursor == 0 { return; }
        let mut pos = self.notes_cursor - 1;
        while pos > 0 && !self.notes_text.is_char_boundary(pos) { pos -= 1; }
        self.notes_cursor = pos;
    }

    pub fn notes_move_right(&mut self) {
        if let Some(ch) = self.notes_text[self.notes_cursor..].chars().next() {
            self.notes_cursor += ch.len_utf8();
        }
    }

    fn line_start_offset(lines: &[&str], row: usize) -> usize {
        lines[..row].iter().map(|l| l.len() + 1).sum()
    }

    fn clamp_to_char_boundary(&self, mut pos: usize) -> usize {
        while pos > 0 && !self.notes_text.is_char_boundary(pos) { pos -= 1; }
        pos
    }

    pub fn notes_move_up(&mut self) {
        let (row, col) = self.notes_cursor_row_col();
        if row == 0 { return; }
        let lines: Vec<&str> = self.notes_text.split('\n').collect();
        let target_col = col.min(lines[row - 1].len());
        let off = Self::line_start_offset(&lines, row - 1) + target_col;
        self.notes_cursor = self.clamp_to_char_boundary(off);
    }

    pub fn notes_move_down(&mut self) {
        let (row, col) = self.notes_cursor_row_col();
        let lines: Vec<&str> = self.notes_text.split('\n').collect();
        if row + 1 >= lines.len() { return; }
        let target_col = col.min(lines[row + 1].len());
        let off = Self::line_start_offset(&lines, row + 1) + target_col;
        self.notes_cursor = self.clamp_to_char_boundary(off);
    }

    pub fn notes_move_home(&mut self) {
        let cursor = self.notes_cursor.min(self.notes_text.len());
        let before = &self.notes_text[..cursor];
        self.notes_cursor = match before.rfind('\n') {
            Some(p) => p + 1,
            None => 0,
        };
    }

    pub fn notes_move_end(&mut self) {
        let cursor = self.notes_cursor.min(self.notes_text.len());
        self.notes_cursor = self.notes_text[cursor..]
            .find('\n')
            .map(|p| cursor + p)
            .unwrap_or(self.notes_text.len());
    }
}
