// Grid model - the fixed 2-D label layout derived from the province table
use std::sync::OnceLock;

use crate::domain::region::{Region, Zone, ANSI_RESET, CELL_WIDTH, MAX_COLS, PROVINCE_TABLE};

/// One occupied cell of the display grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub short_name: &'static str,
    pub zone: Zone,
}

impl GridCell {
    /// Colored label for this cell, SGR color followed by the short name.
    pub fn colored_label(&self) -> String {
        format!("{}{}", self.zone.ansi(), self.short_name)
    }
}

/// Rectangular `(max_row + 1) x MAX_COLS` table of province labels.
///
/// Built once from the province table and immutable afterwards; the table
/// is static, so recomputing is never required. Entries whose column falls
/// outside `MAX_COLS` are silently dropped. When two entries claim the
/// same cell the first-registered one wins.
#[derive(Debug)]
pub struct GridModel {
    rows: Vec<[Option<GridCell>; MAX_COLS as usize]>,
}

static GRID: OnceLock<GridModel> = OnceLock::new();

impl GridModel {
    /// Process-wide grid over the compiled province table.
    pub fn shared() -> &'static GridModel {
        GRID.get_or_init(|| Self::build(PROVINCE_TABLE))
    }

    pub(crate) fn build(table: &[Region]) -> Self {
        let max_row = table.iter().map(|r| r.pos.row).max().unwrap_or(0);
        let mut rows = vec![[None; MAX_COLS as usize]; max_row as usize + 1];
        for entry in table {
            if entry.pos.col >= MAX_COLS {
                continue;
            }
            let slot = &mut rows[entry.pos.row as usize][entry.pos.col as usize];
            if slot.is_none() {
                *slot = Some(GridCell {
                    short_name: entry.short_name,
                    zone: entry.zone,
                });
            }
        }
        Self { rows }
    }

    /// Grid size as `(rows, display columns)`, where the column count is a
    /// terminal-width hint of `MAX_COLS * CELL_WIDTH`.
    pub fn dimensions(&self) -> (u16, u16) {
        (self.rows.len() as u16, MAX_COLS * CELL_WIDTH)
    }

    pub fn row_count(&self) -> u16 {
        self.rows.len() as u16
    }

    /// Cell at `(row, col)`, `None` when empty or out of range.
    pub fn cell(&self, row: u16, col: u16) -> Option<&GridCell> {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .and_then(|c| c.as_ref())
    }

    /// Plain-text dump of the whole grid, one line per row, colored labels
    /// bracketed and empty cells padded to the cell width.
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for cell in row {
                match cell {
                    Some(cell) => {
                        out.push('[');
                        out.push_str(&cell.colored_label());
                        out.push_str(ANSI_RESET);
                        out.push(']');
                    }
                    None => out.push_str(&" ".repeat(CELL_WIDTH as usize)),
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::region::Position;

    fn entry(short: &'static str, zone: Zone, row: u16, col: u16, full: &'static str) -> Region {
        Region {
            full_name: full,
            short_name: short,
            zone,
            pos: Position { row, col },
        }
    }

    #[test]
    fn dimensions_follow_max_row() {
        let grid = GridModel::shared();
        let max_row = PROVINCE_TABLE.iter().map(|r| r.pos.row).max().unwrap();
        assert_eq!(grid.dimensions(), (max_row + 1, MAX_COLS * CELL_WIDTH));
    }

    #[test]
    fn every_in_range_entry_lands_on_its_cell() {
        let grid = GridModel::shared();
        for entry in PROVINCE_TABLE {
            let cell = grid.cell(entry.pos.row, entry.pos.col).unwrap();
            assert_eq!(cell.short_name, entry.short_name);
            assert_eq!(cell.zone, entry.zone);
        }
    }

    #[test]
    fn unoccupied_and_out_of_range_cells_are_empty() {
        let grid = GridModel::shared();
        assert!(grid.cell(0, 0).is_none());
        assert!(grid.cell(2, 9).is_none());
        assert!(grid.cell(999, 0).is_none());
        assert!(grid.cell(0, 999).is_none());
    }

    #[test]
    fn out_of_range_columns_are_dropped_from_the_build() {
        let table = [
            entry("กท", Zone::Central, 0, 3, "กรุงเทพมหานคร"),
            entry("ชร", Zone::North, 1, 99, "เชียงราย"),
        ];
        let grid = GridModel::build(&table);

        assert_eq!(grid.dimensions(), (2, MAX_COLS * CELL_WIDTH));
        assert!(grid.cell(0, 3).is_some());
        for col in 0..MAX_COLS {
            assert!(grid.cell(1, col).is_none());
        }
    }

    #[test]
    fn first_registered_entry_wins_a_contested_cell() {
        let table = [
            entry("ชร", Zone::North, 0, 0, "เชียงราย"),
            entry("ชม", Zone::North, 0, 0, "เชียงใหม่"),
        ];
        let grid = GridModel::build(&table);
        assert_eq!(grid.cell(0, 0).unwrap().short_name, "ชร");
    }

    #[test]
    fn render_plain_has_one_line_per_row() {
        let grid = GridModel::shared();
        let dump = grid.render_plain();
        assert_eq!(dump.lines().count(), grid.row_count() as usize);
        assert!(dump.contains("ชร"));
    }
}
