// Render surface seam and the dashboard view that paints onto it
use std::fmt::Write as _;

use crate::domain::fleet::FleetSnapshot;
use crate::domain::grid::{GridCell, GridModel};
use crate::domain::highlight::HighlightSet;
use crate::domain::region::{ANSI_RESET, CELL_WIDTH};

/// The three panels of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    Map,
    FleetInfo,
    Status,
}

/// Minimal surface the core draws through; the host owns cursor and
/// window management.
pub trait RenderSurface {
    fn write_cell(&mut self, row: u16, col: u16, text: &str);
    fn clear_region(&mut self, view: ViewId);
}

/// Panel placement derived from the grid dimensions: map top-left, fleet
/// info to its right, status line underneath.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub map_rows: u16,
    pub map_cols: u16,
    pub fleet_col: u16,
    pub fleet_width: u16,
    pub status_row: u16,
}

impl Layout {
    pub const FLEET_WIDTH: u16 = 64;

    pub fn for_grid(grid: &GridModel) -> Self {
        let (rows, cols) = grid.dimensions();
        Self {
            map_rows: rows,
            map_cols: cols,
            fleet_col: cols + 2,
            fleet_width: Self::FLEET_WIDTH,
            status_row: rows + 1,
        }
    }

    /// Bounding box of a view as `(row, col, rows, cols)`.
    pub fn region(&self, view: ViewId) -> (u16, u16, u16, u16) {
        match view {
            ViewId::Map => (0, 0, self.map_rows, self.map_cols),
            ViewId::FleetInfo => (0, self.fleet_col, self.map_rows, self.fleet_width),
            ViewId::Status => (
                self.status_row,
                0,
                1,
                self.fleet_col + self.fleet_width,
            ),
        }
    }
}

/// Paints the grid, the fleet info panel and the status line onto a
/// render surface. Holds no mutable state; every draw is a full repaint
/// of its panel.
pub struct DashboardView {
    grid: &'static GridModel,
    layout: Layout,
}

impl DashboardView {
    pub fn new(grid: &'static GridModel) -> Self {
        Self {
            grid,
            layout: Layout::for_grid(grid),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Repaints the province map, marking highlighted cells.
    pub fn draw_map(&self, surface: &mut dyn RenderSurface, highlights: &HighlightSet) {
        surface.clear_region(ViewId::Map);
        for row in 0..self.grid.row_count() {
            for col in 0..(self.layout.map_cols / CELL_WIDTH) {
                let text = cell_text(self.grid.cell(row, col), highlights.contains(row, col));
                surface.write_cell(row, col * CELL_WIDTH, &text);
            }
        }
    }

    /// Repaints the fleet info panel from a snapshot.
    pub fn draw_fleet(&self, surface: &mut dyn RenderSurface, snapshot: &FleetSnapshot) {
        surface.clear_region(ViewId::FleetInfo);
        let (row0, col0, rows, _) = self.layout.region(ViewId::FleetInfo);
        for (offset, line) in fleet_report(snapshot).lines().take(rows as usize).enumerate() {
            surface.write_cell(row0 + offset as u16, col0, line);
        }
    }

    /// Replaces the one-line status panel.
    pub fn draw_status(&self, surface: &mut dyn RenderSurface, message: &str) {
        surface.clear_region(ViewId::Status);
        let (row, col, _, _) = self.layout.region(ViewId::Status);
        surface.write_cell(row, col, message);
    }
}

/// Text for one map cell: highlighted cells show `{short}*`, occupied
/// cells a bracketed colored label, empty cells blank padding.
fn cell_text(cell: Option<&GridCell>, highlighted: bool) -> String {
    match cell {
        Some(cell) if highlighted => format!("{}* ", cell.short_name),
        Some(cell) => format!("[{}{}]", cell.colored_label(), ANSI_RESET),
        None => " ".repeat(CELL_WIDTH as usize),
    }
}

/// Plain-text report of a snapshot for the fleet info panel: timestamp
/// header, then one block per vehicle in snapshot order.
pub fn fleet_report(snapshot: &FleetSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Timestamp: {}", snapshot.timestamp);
    for vehicle in &snapshot.vehicles {
        let _ = writeln!(out, "Vehicle: {}", vehicle.display_name);
        let _ = writeln!(
            out,
            " Lat: {:.6}|Lon: {:.6}",
            vehicle.latitude, vehicle.longitude
        );
        let _ = writeln!(
            out,
            " Speed: {} km/hr|Status: {}|Battery: {}v",
            vehicle.speed, vehicle.engine, vehicle.external_batt
        );
        let _ = writeln!(out, " Address: {}", vehicle.address);
        let _ = writeln!(
            out,
            " Last Updated: {}|GPS: {}",
            vehicle.last_update, vehicle.gps_signal
        );
    }
    out
}
