use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use q_grid::catalog::{GATES, Rgb};
use q_grid::grid::CellInfo;
use q_grid::stats::format_percent;
use q_grid::PlacementState;

use crate::app::{App, Focus};
use crate::menu::GATE_MENU;

// ── Colors ─────────────────────────────────────────────────────────────────

const BLUE: Color = Color::Rgb(122, 162, 247);
const PURPLE: Color = Color::Rgb(187, 154, 247);
const GREEN: Color = Color::Rgb(158, 206, 106);
const ORANGE: Color = Color::Rgb(255, 158, 100);
const CYAN: Color = Color::Rgb(115, 218, 202);
const YELLOW: Color = Color::Rgb(224, 175, 104);
const DIM: Color = Color::Rgb(86, 95, 137);
const RED: Color = Color::Rgb(247, 118, 142);
const DARK_BLUE: Color = Color::Rgb(192, 202, 245);

// ── Layout constants ────────────────────────────────────────────────────────

const CELL_W: usize = 11;
const LABEL_W: usize = 7; // "q[N]  ──"
const GATE_NAME_W: usize = 5;

fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

// ── Main render entry point ─────────────────────────────────────────────────

pub fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();
    app.width = size.width;
    app.height = size.height;

    let ctrl_height = 3u16;
    let avail_h = size.height.saturating_sub(ctrl_height);

    // Left/Right split
    let side_w = ((size.width / 3) as usize).max(30).min(size.width.saturating_sub(20) as usize) as u16;
    let left_w = size.width.saturating_sub(side_w);

    let usage_h = (GATES.len() as u16 + 3).min(avail_h / 2);
    let circuit_h = avail_h.saturating_sub(usage_h).max(1);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(avail_h), Constraint::Length(ctrl_height)])
        .split(size);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(left_w), Constraint::Min(side_w)])
        .split(main_chunks[0]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(circuit_h), Constraint::Min(usage_h)])
        .split(top_chunks[0]);

    // Right column: [script preview, code box, messages]
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(top_chunks[1]);

    render_circuit_panel(f, app, left_chunks[0]);
    render_usage_panel(f, app, left_chunks[1]);
    render_script_panel(f, app, right_chunks[0]);
    render_notes_panel(f, app, right_chunks[1]);
    render_messages_panel(f, app, right_chunks[2]);
    render_controls_panel(f, app, main_chunks[1]);

    if app.focus == Focus::Menu {
        render_menu_overlay(f, app);
    }
}

// ── Circuit Panel ─────────────────────────────────────────────────────────────

fn render_circuit_panel(f: &mut Frame, app: &App, area: Rect) {
    let active = app.focus != Focus::Notes;
    let border_color = if active { ORANGE } else { BLUE };
    let title = format!(
        "Quantum Circuit  {}",
        app.session.stepper().label(app.session.grid())
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(title, Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = build_circuit_lines(app, inner.width as usize);
    f.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn build_circuit_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let grid = app.session.grid();
    let mut lines: Vec<Line> = Vec::new();

    let avail = width.saturating_sub(LABEL_W + 2);
    let max_steps = (avail / CELL_W).max(1);
    let start_col = (app.cursor_col + 1).saturating_sub(max_steps);
    let end_col = (start_col + max_steps).min(grid.cols());

    // Last column reported by the stepper
    let stepped = app.session.stepper().last_report().map(|r| r.column);
    let anchor = app.session.placement().anchor_column();

    let mut step_hdr = " ".repeat(LABEL_W);
    for col in start_col..end_col {
        step_hdr.push_str(&pad_center(&format!("{col}"), CELL_W));
    }
    lines.push(Line::styled(step_hdr, Style::default().fg(DIM)));

    for row in 0..grid.rows() {
        let label = format!("{:<5}──", format!("q[{row}]"));
        let mut top: Vec<Span> = vec![Span::raw(" ".repeat(LABEL_W))];
        let mut mid: Vec<Span> = vec![Span::styled(label, Style::default().fg(DARK_BLUE))];
        let mut bot: Vec<Span> = vec![Span::raw(" ".repeat(LABEL_W))];

        for col in start_col..end_col {
            let info = grid.cell_info(row, col);
            let is_cursor = app.focus != Focus::Notes && row == app.cursor_row && col == app.cursor_col;
            let (t, m, b) = render_cell(&info, is_cursor);

            let style = if stepped == Some(col) {
                Style::default().fg(RED).add_modifier(Modifier::BOLD)
            } else if is_cursor {
                Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)
            } else if let Some(gate) = info.gate {
                Style::default().fg(rgb(app.session.colors().color_of(gate)))
            } else if anchor == Some(col) {
                Style::default().fg(YELLOW)
            } else {
                Style::default().fg(DIM)
            };
            top.push(Span::styled(t, style));
            mid.push(Span::styled(m, style));
            bot.push(Span::styled(b, style));
        }

        lines.push(Line::from(top));
        lines.push(Line::from(mid));
        lines.push(Line::from(bot));
    }

    let mut status = match app.session.placement() {
        PlacementState::Idle => "  No gate selected".to_string(),
        PlacementState::Selected { gate, .. } => format!("  Selected {}", gate.symbol),
        PlacementState::MultiPending { gate, remaining, anchor_column, .. } => format!(
            "  Placing {}: {remaining} more in column {anchor_column}",
            gate.symbol
        ),
    };
    status.push_str(&format!("  │  Position: q[{}], step {}", app.cursor_row, app.cursor_col));
    if !app.status_msg.is_empty() {
        status.push_str(&format!("  │  {}", app.status_msg));
    }
    lines.push(Line::styled(status, Style::default().fg(YELLOW)));

    lines
}

fn render_cell(info: &CellInfo, is_cursor: bool) -> (String, String, String) {
    let empty = " ".repeat(CELL_W);
    let half = CELL_W / 2;
    let vert_row = " ".repeat(half) + "│" + &" ".repeat(CELL_W - half - 1);

    let dash_l = (CELL_W - 1) / 2;
    let dash_r = CELL_W - dash_l - 1;

    if info.is_barrier {
        let mid = "─".repeat(dash_l) + "┃" + &"─".repeat(dash_r);
        let edge = " ".repeat(half) + "┃" + &" ".repeat(CELL_W - half - 1);
        return (edge.clone(), mid, edge);
    }

    if is_cursor {
        let inner_w = CELL_W - 2;
        let top = format!("╔{}╗", "═".repeat(inner_w));
        let bot = format!("╚{}╝", "═".repeat(inner_w));
        let mid = match info.gate {
            Some(gate) => format!("║─┤{}├─║", pad_center(gate.symbol, GATE_NAME_W)),
            None => format!("║{}║", "─".repeat(inner_w)),
        };
        return (top, mid, bot);
    }

    let Some(gate) = info.gate else {
        return (empty.clone(), "─".repeat(CELL_W), empty);
    };

    let margin = (CELL_W - GATE_NAME_W - 2) / 2;
    let rmargin = CELL_W - margin - GATE_NAME_W - 2;
    let name = pad_center(gate.symbol, GATE_NAME_W);
    let box_top = " ".repeat(margin) + "┌" + &"─".repeat(GATE_NAME_W) + "┐" + &" ".repeat(rmargin);
    let box_bot = " ".repeat(margin) + "└" + &"─".repeat(GATE_NAME_W) + "┘" + &" ".repeat(rmargin);
    let mid = "─".repeat(margin) + "┤" + &name + "├" + &"─".repeat(rmargin);

    // Cells of one multi-qubit gate are joined by a vertical wire.
    let top = if info.vert_above { vert_row.clone() } else { box_top };
    let bot = if info.vert_below { vert_row } else { box_bot };
    (top, mid, bot)
}

fn pad_center(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.chars().take(width).collect();
    }
    let total = width - len;
    let left = total / 2;
    let right = total - left;
    " ".repeat(left) + s + &" ".repeat(right)
}

// ── Usage Panel ───────────────────────────────────────────────────────────────

fn render_usage_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(RED))
        .title(Span::styled("Gate Usage", Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let stats = app.session.stats();
    let bar_width = (inner.width as usize).saturating_sub(20).max(10);

    let mut text_lines: Vec<Line> = Vec::new();
    for (gate, (symbol, pct)) in GATES.iter().zip(stats.percentages()) {
        let fill = ((pct / 100.0 * bar_width as f64).round() as usize).min(bar_width);
        let bar = "█".repeat(fill) + &"░".repeat(bar_width - fill);
        let color = rgb(app.session.colors().color_of(gate));
        text_lines.push(Line::from(vec![
            Span::styled(format!("{symbol:<8}"), Style::default().fg(DARK_BLUE)),
            Span::styled(bar, Style::default().fg(color)),
            Span::styled(format!(" {:>4}", format_percent(pct)), Style::default().fg(YELLOW)),
        ]));
    }
    text_lines.push(Line::styled(
        format!("Total placements: {}", stats.total()),
        Style::default().fg(DIM),
    ));

    f.render_widget(Paragraph::new(Text::from(text_lines)), inner);
}

// ── Script Preview Panel ──────────────────────────────────────────────────────

fn render_script_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PURPLE))
        .title(Span::styled("Command Script", Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)));

    let p = Paragraph::new(app.session.command_preview())
        .style(Style::default().fg(DARK_BLUE))
        .block(block);
    f.render_widget(p, area);
}

// ── Code Box Panel ────────────────────────────────────────────────────────────

fn render_notes_panel(f: &mut Frame, app: &mut App, area: Rect) {
    let active = app.focus == Focus::Notes;
    let border_color = if active { ORANGE } else { PURPLE };
    let title = if active { "Code Box [ACTIVE]" } else { "Code Box" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(title, Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let inner_h = inner.height as usize;

    if !active {
        let p = Paragraph::new(app.notes_text.as_str())
            .style(Style::default().fg(DARK_BLUE))
            .scroll((app.notes_scroll, 0));
        f.render_widget(p, inner);
        return;
    }

    let (cursor_row, cursor_col) = app.notes_cursor_row_col();

    // Keep cursor in view
    if cursor_row < app.notes_scroll as usize {
        app.notes_scroll = cursor_row as u16;
    }
    if inner_h > 0 && cursor_row >= app.notes_scroll as usize + inner_h {
        app.notes_scroll = (cursor_row + 1 - inner_h) as u16;
    }
    let scroll = app.notes_scroll as usize;

    let mut lines: Vec<Line> = Vec::new();
    for (i, line_str) in app.notes_text.split('\n').enumerate().skip(scroll).take(inner_h) {
        if i != cursor_row {
            lines.push(Line::styled(line_str, Style::default().fg(DARK_BLUE)));
            continue;
        }
        let safe_col = cursor_col.min(line_str.len());
        let before = &line_str[..safe_col];
        let (cur_ch, after) = match line_str[safe_col..].chars().next() {
            Some(ch) => {
                let end = safe_col + ch.len_utf8();
                (&line_str[safe_col..end], &line_str[end..])
            }
            None => (" ", ""),
        };
        lines.push(Line::from(vec![
            Span::styled(before, Style::default().fg(DARK_BLUE)),
            Span::styled(cur_ch, Style::default().fg(Color::Black).bg(DARK_BLUE)),
            Span::styled(after, Style::default().fg(DARK_BLUE)),
        ]));
    }

    f.render_widget(Paragraph::new(Text::from(lines)), inner);
}

// ── Messages Panel ────────────────────────────────────────────────────────────

fn render_messages_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(CYAN))
        .title(Span::styled("Messages", Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    // Newest messages at the bottom
    let messages = app.session.messages();
    let skip = messages.len().saturating_sub(inner.height as usize);
    let lines: Vec<Line> = messages
        .iter()
        .skip(skip)
        .map(|m| {
            let color = if m.starts_with("Error") { RED } else { DARK_BLUE };
            Line::styled(m.as_str(), Style::default().fg(color))
        })
        .collect();

    f.render_widget(Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }), inner);
}

// ── Controls Panel ─────────────────────────────────────────────────────────────

fn render_controls_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GREEN));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let help = match app.focus {
        Focus::Notes => "Code Box:  Tab Exit editor  Type to edit".to_string(),
        _ => "↑↓←→ Move  ⏎/Space Place  a Gates  p Step  r Reset steps  n New  +/- Rows  ]/[ Cols  Tab Code Box  Ctrl+S Save  Ctrl+O Load  q Quit".to_string(),
    };

    f.render_widget(Paragraph::new(Span::styled(help, Style::default().fg(YELLOW))), inner);
}

// ── Menu Overlay ──────────────────────────────────────────────────────────────

fn render_menu_overlay(f: &mut Frame, app: &App) {
    let area = overlay_rect(f.area(), 60, 14);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ORANGE))
        .title(Span::styled("Select Gate", Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    // Category tabs
    let mut cat_line: Vec<Span> = Vec::new();
    for (i, cat) in GATE_MENU.iter().enumerate() {
        let name = format!(" {} ", cat.name);
        if i == app.menu_cat {
            cat_line.push(Span::styled(name, Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)));
        } else {
            cat_line.push(Span::styled(name, Style::default().fg(DIM)));
        }
        if i < GATE_MENU.len() - 1 {
            cat_line.push(Span::styled("│", Style::default().fg(DIM)));
        }
    }
    lines.push(Line::from(cat_line));
    lines.push(Line::styled("─".repeat(42), Style::default().fg(DIM)));

    let cat = &GATE_MENU[app.menu_cat];
    for (i, item) in cat.items.iter().enumerate() {
        let color = item
            .gate()
            .map(|g| rgb(app.session.colors().color_of(g)))
            .unwrap_or(DIM);
        let mut spans: Vec<Span> = Vec::new();
        if i == app.menu_item {
            spans.push(Span::styled(" ▸ ", Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)));
            spans.push(Span::styled(
                format!("{:<18}", item.name),
                Style::default().fg(ORANGE).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(format!("{:<18}", item.name), Style::default().fg(DARK_BLUE)));
        }
        spans.push(Span::styled(format!("{:<8}", item.glyph), Style::default().fg(color)));
        spans.push(Span::styled(format!("[{}]", item.key), Style::default().fg(DIM)));
        lines.push(Line::from(spans));
    }

    lines.push(Line::styled("↑↓ Select  ←→ Cat  ⏎ Ok  Esc ✕", Style::default().fg(DIM)));

    f.render_widget(Paragraph::new(Text::from(lines)), inner);
}

// ── Overlay rect helper ────────────────────────────────────────────────────────

fn overlay_rect(screen: Rect, min_w: u16, min_h: u16) -> Rect {
    let w = min_w.min(screen.width.saturating_sub(4));
    let h = min_h.min(screen.height.saturating_sub(4));
    Rect {
        x: 2,
        y: 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use q_grid::catalog::lookup;

    #[test]
    fn cells_have_fixed_width() {
        let h = lookup("H").unwrap();
        let infos = [
            CellInfo::default(),
            CellInfo { gate: Some(h), ..Default::default() },
            CellInfo { gate: Some(lookup("BARRIER").unwrap()), is_barrier: true, ..Default::default() },
            CellInfo { gate: Some(lookup("CX").unwrap()), vert_below: true, ..Default::default() },
        ];
        for info in &infos {
            for cursor in [false, true] {
                let (t, m, b) = render_cell(info, cursor);
                for part in [t, m, b] {
                    assert_eq!(part.chars().count(), CELL_W, "{part:?}");
                }
            }
        }
    }

    #[test]
    fn pads_and_truncates() {
        assert_eq!(pad_center("H", 5), "  H  ");
        assert_eq!(pad_center("BARRIER", 5), "BARRI");
    }
}
