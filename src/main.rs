//! q-grid: terminal editor for quantum-gate grid layouts.
//!
//! Without a subcommand the interactive editor starts; `convert` and `steps`
//! run headless against circuit files.

pub mod app;
pub mod menu;
pub mod render;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use q_grid::session::{DEFAULT_COLS, DEFAULT_ROWS};
use q_grid::{Decoded, Encoding, Session};

use app::{App, Focus};

/// Lay out quantum gates on a grid and export them as a command script
#[derive(Parser)]
#[command(name = "q-grid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of qubit rows
    #[arg(long, global = true, env = "QGRID_ROWS", default_value_t = DEFAULT_ROWS as u16, value_parser = clap::value_parser!(u16).range(1..))]
    rows: u16,

    /// Number of time-step columns
    #[arg(long, global = true, env = "QGRID_COLS", default_value_t = DEFAULT_COLS as u16, value_parser = clap::value_parser!(u16).range(1..))]
    cols: u16,

    /// Circuit file used by save (Ctrl+S) and load (Ctrl+O)
    #[arg(short, long, env = "QGRID_FILE", default_value = "circuit.qc")]
    file: PathBuf,

    /// Write logs to this file while the editor is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a circuit file between the cell list and the command script
    Convert {
        /// Input file (.qc, .cells, or detected from content)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Output encoding; defaults to the output file's extension
        #[arg(long)]
        to: Option<Format>,
    },

    /// Walk a circuit column by column and print each step
    Steps {
        /// Input file (.qc, .cells, or detected from content)
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Script,
    Cells,
}

impl From<Format> for Encoding {
    fn from(f: Format) -> Self {
        match f {
            Format::Script => Encoding::Script,
            Format::Cells => Encoding::Cells,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let rows = usize::from(cli.rows);
    let cols = usize::from(cli.cols);

    match cli.command {
        Some(command) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(filter))
                .with_target(false)
                .with_writer(io::stderr)
                .init();
            match command {
                Commands::Convert { input, output, to } => convert(&input, &output, to, rows, cols),
                Commands::Steps { input } => steps(&input, rows, cols),
            }
        }
        None => {
            if let Some(path) = &cli.log_file {
                let file = File::create(path)
                    .with_context(|| format!("cannot open log file {}", path.display()))?;
                tracing_subscriber::fmt()
                    .with_env_filter(EnvFilter::new(filter))
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
            let session = Session::new(rows, cols)?;
            run_tui(App::new(session, cli.file))
        }
    }
}

// ── Headless commands ───────────────────────────────────────────────────────────

fn load_file(path: &Path, rows: usize, cols: usize) -> Result<(Session, Decoded)> {
    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let encoding = Encoding::from_path(path).unwrap_or_else(|| Encoding::detect(&text));
    debug!(path = %path.display(), %encoding, "decoding circuit file");

    let mut session = Session::new(rows, cols)?;
    let decoded = session.load_text(&text, encoding);
    for diag in &decoded.diagnostics {
        eprintln!("{}: {diag}", path.display());
    }
    Ok((session, decoded))
}

fn convert(input: &Path, output: &Path, to: Option<Format>, rows: usize, cols: usize) -> Result<()> {
    let encoding = match to.map(Encoding::from).or_else(|| Encoding::from_path(output)) {
        Some(enc) => enc,
        None => bail!(
            "cannot infer output encoding from {}; pass --to script|cells",
            output.display()
        ),
    };

    let (mut session, decoded) = load_file(input, rows, cols)?;
    let trailer = decoded.trailer.unwrap_or_default();
    session
        .save_to_path(output, encoding, &trailer)
        .with_context(|| format!("cannot write {}", output.display()))?;

    info!(applied = decoded.applied, %encoding, "converted");
    println!(
        "{} -> {} ({encoding}, {} gates)",
        input.display(),
        output.display(),
        decoded.applied
    );
    Ok(())
}

fn steps(input: &Path, rows: usize, cols: usize) -> Result<()> {
    let (mut session, _) = load_file(input, rows, cols)?;
    while let Some(report) = session.on_step() {
        println!("{}  {report}", session.stepper().label(session.grid()));
    }
    Ok(())
}

// ── Interactive editor ───────────────────────────────────────────────────────────

fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("editor loop failed")
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), io::Error> {
    loop {
        terminal.draw(|f| render::render(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let code = key.code;
        let mods = key.modifiers;

        // Global: Ctrl+C always quits
        if code == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
            return Ok(());
        }

        match app.focus {
            Focus::Circuit => {
                if handle_circuit_keys(app, code, mods) {
                    return Ok(());
                }
            }
            Focus::Menu => handle_menu_keys(app, code),
            Focus::Notes => handle_notes_keys(app, code),
        }
    }
}

// ── Focus::Circuit ─────────────────────────────────────────────────────────────

fn handle_circuit_keys(app: &mut App, code: KeyCode, mods: KeyModifiers) -> bool {
    if mods.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('s') => app.save_circuit(),
            KeyCode::Char('o') => app.load_circuit(),
            _ => {}
        }
        return false;
    }

    match code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => app.focus = Focus::Notes,
        KeyCode::Up => app.move_cursor(-1, 0),
        KeyCode::Down => app.move_cursor(1, 0),
        KeyCode::Left => app.move_cursor(0, -1),
        KeyCode::Right => app.move_cursor(0, 1),
        KeyCode::Enter | KeyCode::Char(' ') => app.place_at_cursor(),
        KeyCode::Esc => {
            app.session.cancel_selection();
            app.status_msg = "Selection cleared".to_string();
        }
        KeyCode::Char('a') => {
            app.focus = Focus::Menu;
            app.menu_cat = 0;
            app.menu_item = 0;
        }
        KeyCode::Char('n') => app.new_circuit(),
        KeyCode::Char('p') => app.step(),
        KeyCode::Char('r') => app.reset_steps(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.resize(1, 0),
        KeyCode::Char('-') => app.resize(-1, 0),
        KeyCode::Char(']') => app.resize(0, 1),
        KeyCode::Char('[') => app.resize(0, -1),
        KeyCode::Char(c) => {
            if let Some(item) = menu::item_for_key(c) {
                app.select_item(item);
            }
        }
        _ => {}
    }
    false
}

// ── Focus::Menu ────────────────────────────────────────────────────────────────

fn handle_menu_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.focus = Focus::Circuit,
        KeyCode::Up => {
            if app.menu_item > 0 {
                app.menu_item -= 1;
            }
        }
        KeyCode::Down => {
            let max = menu::GATE_MENU[app.menu_cat].items.len().saturating_sub(1);
            if app.menu_item < max {
                app.menu_item += 1;
            }
        }
        KeyCode::Left => {
            if app.menu_cat > 0 {
                app.menu_cat -= 1;
                app.menu_item = 0;
            }
        }
        KeyCode::Right => {
            if app.menu_cat + 1 < menu::GATE_MENU.len() {
                app.menu_cat += 1;
                app.menu_item = 0;
            }
        }
        KeyCode::Enter => app.select_menu_item(),
        KeyCode::Char(c) => {
            if let Some(item) = menu::item_for_key(c) {
                app.select_item(item);
                app.focus = Focus::Circuit;
            }
        }
        _ => {}
    }
}

// ── Focus::Notes ───────────────────────────────────────────────────────────────

fn handle_notes_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Esc => app.focus = Focus::Circuit,
        KeyCode::Left => app.notes_move_left(),
        KeyCode::Right => app.notes_move_right(),
        KeyCode::Up => app.notes_move_up(),
        KeyCode::Down => app.notes_move_down(),
        KeyCode::Home => app.notes_move_home(),
        KeyCode::End => app.notes_move_end(),
        KeyCode::Backspace => app.notes_backspace(),
        KeyCode::Delete => app.notes_delete_forward(),
        KeyCode::Enter => app.notes_insert_char('\n'),
        KeyCode::Char(c) => app.notes_insert_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "q-grid", "convert", "--input", "a.cells", "--output", "b.qc", "--rows", "4", "--cols", "7",
        ])
        .unwrap();
        assert_eq!((cli.rows, cli.cols), (4, 7));
        assert!(matches!(cli.command, Some(Commands::Convert { .. })));

        let cli = Cli::try_parse_from(["q-grid", "--rows", "2", "steps", "--input", "a.qc"]).unwrap();
        assert_eq!(cli.rows, 2);
    }

    #[test]
    fn zero_rows_are_rejected() {
        assert!(Cli::try_parse_from(["q-grid", "--rows", "0"]).is_err());
    }
}
