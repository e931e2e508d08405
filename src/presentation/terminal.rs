// Terminal frontend - crossterm surface and the foreground event loop
use std::fmt::Write as _;
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tokio::sync::mpsc;
use tracing::debug;

use crate::application::poller::{PollerHandle, RenderUpdate};
use crate::domain::highlight::HighlightSet;
use crate::domain::AppContext;
use crate::presentation::render::{fleet_report, DashboardView, Layout, RenderSurface, ViewId};

const INPUT_TICK: Duration = Duration::from_millis(50);

/// Render surface backed by the real terminal in raw mode on the
/// alternate screen. Dropping it restores the terminal.
pub struct TerminalSurface {
    out: Stdout,
    layout: Layout,
}

impl TerminalSurface {
    pub fn new(layout: Layout) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self { out, layout })
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl RenderSurface for TerminalSurface {
    fn write_cell(&mut self, row: u16, col: u16, text: &str) {
        let _ = queue!(self.out, MoveTo(col, row), Print(text));
    }

    fn clear_region(&mut self, view: ViewId) {
        let (row0, col0, rows, cols) = self.layout.region(view);
        let blank = " ".repeat(cols as usize);
        for row in row0..row0 + rows {
            let _ = queue!(self.out, MoveTo(col0, row), Print(&blank));
        }
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Redraw,
}

fn map_key(key: KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(KeyAction::Quit),
        (KeyCode::Char('q'), _) => Some(KeyAction::Quit),
        (KeyCode::Esc, _) => Some(KeyAction::Quit),
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Some(KeyAction::Redraw),
        _ => None,
    }
}

fn poll_key() -> io::Result<Option<KeyAction>> {
    if !event::poll(Duration::ZERO)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(map_key(key)),
        _ => Ok(None),
    }
}

fn status_hint(show_refresh_hint: bool) -> String {
    let mut hint = "Press q or Ctrl+C to exit.".to_string();
    if show_refresh_hint {
        hint.push_str(" | Press Ctrl+R to refresh.");
    }
    hint
}

/// Foreground loop: applies render updates in the order the poller
/// produced them and watches for the quit keys. On quit the poller is
/// stopped and joined before the terminal is restored.
pub async fn run_dashboard(
    context: AppContext,
    mut updates: mpsc::Receiver<RenderUpdate>,
    poller: PollerHandle,
    show_refresh_hint: bool,
) -> anyhow::Result<()> {
    let view = DashboardView::new(context.grid);
    let mut surface = TerminalSurface::new(view.layout())?;
    let hint = status_hint(show_refresh_hint);

    view.draw_map(&mut surface, &HighlightSet::default());
    view.draw_status(&mut surface, &hint);
    surface.flush()?;

    'outer: loop {
        let mut dirty = false;
        while let Some(action) = poll_key()? {
            match action {
                KeyAction::Quit => break 'outer,
                KeyAction::Redraw => {
                    view.draw_status(&mut surface, &format!("refreshing... | {hint}"));
                    dirty = true;
                }
            }
        }

        while let Ok(update) = updates.try_recv() {
            dirty = true;
            match update {
                RenderUpdate::Refresh {
                    snapshot,
                    highlights,
                    stats,
                } => {
                    view.draw_map(&mut surface, &highlights);
                    view.draw_fleet(&mut surface, &snapshot);
                    let mut status = format!("Updated: {}", snapshot.timestamp);
                    if let Some(stats) = stats {
                        let _ = write!(
                            status,
                            " ({} ms, HTTP {})",
                            stats.latency.as_millis(),
                            stats.status
                        );
                    }
                    let _ = write!(status, " | {hint}");
                    view.draw_status(&mut surface, &status);
                }
                // Transient error line; the previous map and fleet panel
                // stay on screen.
                RenderUpdate::Status(message) => {
                    view.draw_status(&mut surface, &format!("{message} | {hint}"));
                }
            }
        }
        if dirty {
            surface.flush()?;
        }

        tokio::time::sleep(INPUT_TICK).await;
    }

    // Shutdown barrier: no terminal teardown until the worker has exited.
    poller.stop();
    poller.join().await;
    debug!("Poller joined, restoring terminal");
    Ok(())
}

/// Plain-stdout fallback for non-TTY environments: prints the static map
/// once, then a text report per update until Ctrl+C.
pub async fn run_headless(
    context: AppContext,
    mut updates: mpsc::Receiver<RenderUpdate>,
    poller: PollerHandle,
) -> anyhow::Result<()> {
    print!("{}", context.grid.render_plain());
    println!("Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,

            update = updates.recv() => match update {
                Some(RenderUpdate::Refresh { snapshot, highlights, stats }) => {
                    print!("{}", fleet_report(&snapshot));
                    if highlights.is_empty() {
                        println!("No vehicles located on the map");
                    }
                    for (pos, vehicle) in highlights.iter() {
                        if let Some(region) = context.registry.lookup_by_cell(pos.row, pos.col) {
                            println!("{} <- {}", region.full_name, vehicle);
                        }
                    }
                    if let Some(stats) = stats {
                        println!(
                            "fetched in {} ms (HTTP {})",
                            stats.latency.as_millis(),
                            stats.status
                        );
                    }
                }
                Some(RenderUpdate::Status(message)) => println!("{message}"),
                None => break,
            },
        }
    }

    poller.stop();
    poller.join().await;
    Ok(())
}
