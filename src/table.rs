//! Table grid layout
//!
//! HTML tables describe cells row by row and let any cell claim several
//! columns (`colspan`) and rows (`rowspan`). The page engine only understands
//! explicit placements, so this module resolves every cell to a
//! `(column, row, column_span, row_span)` tuple.
//!
//! # Algorithm
//!
//! 1. Collect every `tr` anywhere under the table, nested tables included,
//!    and each row's direct `td`/`th` children. Rows without cells stay in
//!    the list so row indices line up with the markup.
//! 2. The grid is as wide as the widest row, counting each cell's colspan
//!    (at least 1). A table without cells has no grid.
//! 3. Cells are placed in document order. A cell starts at the first column
//!    of its row not yet claimed by an earlier cell (a rowspan from above
//!    claims columns in later rows). If the row is already full, the cell is
//!    put in the last column instead of being dropped.
//! 4. The cell claims every free slot in its footprint. Slots past the last
//!    column are not claimed, and a slot is never claimed twice.
//!
//! Placements are 1-based; the occupancy grid is 0-based.
//!
//! # Example
//!
//! ```text
//! <tr><td colspan=2>A</td></tr>      A -> (col 1, row 1, span 2x1)
//! <tr><td>B</td><td>C</td></tr>      B -> (col 1, row 2), C -> (col 2, row 2)
//! ```

use serde::Serialize;

use crate::classify::{is_table_cell, is_table_row};
use crate::tree::{MarkupTree, NodeId};

/// Largest colspan honored, as in HTML
pub const MAX_COLSPAN: i64 = 1000;

/// Largest rowspan honored, as in HTML
pub const MAX_ROWSPAN: i64 = 65534;

const DEFAULT_BORDER: f32 = 1.0;
const DEFAULT_CELL_PADDING: f32 = 5.0;
const DEFAULT_CELL_SPACING: f32 = 0.0;

/// 1-based cell placement on the output grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridPlacement {
    pub column: u32,
    pub row: u32,
    pub column_span: u32,
    pub row_span: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedCell {
    pub node: NodeId,
    pub placement: GridPlacement,
}

/// Which grid slots have been claimed so far
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    columns: usize,
    rows: Vec<Vec<bool>>,
}

impl OccupancyGrid {
    fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    fn ensure_rows(&mut self, count: usize) {
        while self.rows.len() < count {
            self.rows.push(vec![false; self.columns]);
        }
    }

    fn first_free(&self, row: usize) -> Option<usize> {
        self.rows
            .get(row)
            .and_then(|slots| slots.iter().position(|claimed| !claimed))
    }

    /// Claim a slot; returns `false` if it was already claimed
    fn claim(&mut self, row: usize, column: usize) -> bool {
        let slot = &mut self.rows[row][column];
        if *slot {
            return false;
        }
        *slot = true;
        true
    }

    pub fn is_occupied(&self, row: usize, column: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|slots| slots.get(column))
            .copied()
            .unwrap_or(false)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }
}

/// Every row under `table` in document order, each with its direct cells
///
/// Rows of a nested table are flattened into the outer table's row list.
pub fn table_rows(tree: &MarkupTree, table: NodeId) -> Vec<Vec<NodeId>> {
    tree.descendants(table)
        .into_iter()
        .filter(|id| is_table_row(tree, *id))
        .map(|row| {
            tree.children(row)
                .iter()
                .copied()
                .filter(|child| is_table_cell(tree, *child))
                .collect()
        })
        .collect()
}

fn clamp_span(declared: i64, max: i64) -> u32 {
    // `max` is well inside u32 range
    u32::try_from(declared.clamp(1, max)).unwrap_or(1)
}

/// `(colspan, rowspan)` of a cell, each defaulting to 1 and at least 1
pub fn cell_spans(tree: &MarkupTree, cell: NodeId) -> (u32, u32) {
    let node = tree.node(cell);
    (
        clamp_span(node.attribute_or("colspan", 1i64), MAX_COLSPAN),
        clamp_span(node.attribute_or("rowspan", 1i64), MAX_ROWSPAN),
    )
}

/// Widest row, counting each cell's colspan
pub fn max_columns(tree: &MarkupTree, rows: &[Vec<NodeId>]) -> usize {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell_spans(tree, *cell).0 as usize)
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0)
}

/// Resolved grid of one table
#[derive(Debug, Clone)]
pub struct TableGrid {
    pub columns: u32,
    pub cells: Vec<PlacedCell>,
    occupancy: OccupancyGrid,
}

impl TableGrid {
    /// Place every cell of `table`; `None` if the table has no cells
    pub fn layout(tree: &MarkupTree, table: NodeId) -> Option<TableGrid> {
        let rows = table_rows(tree, table);
        let max_columns = max_columns(tree, &rows);
        if max_columns == 0 {
            log::debug!("Table has no cells, skipping grid layout");
            return None;
        }

        let mut occupancy = OccupancyGrid::new(max_columns);
        let mut cells = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            for cell in row {
                let (column_span, row_span) = cell_spans(tree, *cell);
                occupancy.ensure_rows(row_index + 1);

                let column = occupancy.first_free(row_index).unwrap_or_else(|| {
                    log::warn!(
                        "Table row {} is full; placing cell in last column {}",
                        row_index + 1,
                        max_columns
                    );
                    max_columns - 1
                });

                // Rows past the last one are never consulted for placement
                let last_row = (row_index + row_span as usize).min(rows.len());
                occupancy.ensure_rows(last_row);
                let last_column = (column + column_span as usize).min(max_columns);

                let mut collisions = 0usize;
                for target_row in row_index..last_row {
                    for target_column in column..last_column {
                        if !occupancy.claim(target_row, target_column) {
                            collisions += 1;
                        }
                    }
                }
                if collisions > 0 {
                    log::warn!(
                        "Table cell at row {} overlaps {} already claimed slot(s)",
                        row_index + 1,
                        collisions
                    );
                }

                if column + 1 > max_columns {
                    continue;
                }

                let placement = GridPlacement {
                    column: (column + 1) as u32,
                    row: (row_index + 1) as u32,
                    column_span,
                    row_span,
                };
                log::trace!("Placed table cell {:?}", placement);
                cells.push(PlacedCell {
                    node: *cell,
                    placement,
                });
            }
        }

        Some(TableGrid {
            columns: max_columns as u32,
            cells,
            occupancy,
        })
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }
}

/// Presentation attributes read from a `table` element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableAttributes {
    /// `border`, default 1, never negative
    pub border: f32,
    /// `cellpadding`, default 5, never negative
    pub cell_padding: f32,
    /// `cellspacing`, default 0, never negative. Parsed but not applied:
    /// the page engine has no spacing between bordered cells.
    pub cell_spacing: f32,
    /// `dir="rtl"`. Parsed but not propagated to cell content.
    pub right_to_left: bool,
}

fn length_attribute(tree: &MarkupTree, node: NodeId, name: &str, default: f32) -> f32 {
    let value = tree.node(node).attribute_or(name, default);
    if value.is_finite() { value.max(0.0) } else { default }
}

impl TableAttributes {
    pub fn from_node(tree: &MarkupTree, table: NodeId) -> Self {
        let right_to_left = tree
            .node(table)
            .attribute("dir")
            .is_some_and(|dir| dir.trim().eq_ignore_ascii_case("rtl"));

        Self {
            border: length_attribute(tree, table, "border", DEFAULT_BORDER),
            cell_padding: length_attribute(tree, table, "cellpadding", DEFAULT_CELL_PADDING),
            cell_spacing: length_attribute(tree, table, "cellspacing", DEFAULT_CELL_SPACING),
            right_to_left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::is_table;
    use crate::parser::parse_html;
    use proptest::prelude::*;

    fn first_table(tree: &MarkupTree) -> NodeId {
        tree.descendants(tree.root())
            .into_iter()
            .find(|id| is_table(tree, *id))
            .expect("table element")
    }

    fn placements(html: &str) -> (u32, Vec<GridPlacement>) {
        let tree = parse_html(html);
        let grid = TableGrid::layout(&tree, first_table(&tree)).expect("grid");
        (grid.columns, grid.cells.iter().map(|c| c.placement).collect())
    }

    fn at(column: u32, row: u32, column_span: u32, row_span: u32) -> GridPlacement {
        GridPlacement {
            column,
            row,
            column_span,
            row_span,
        }
    }

    #[test]
    fn test_colspan_header_row() {
        let (columns, cells) = placements(
            "<table><tr><td colspan=2>A</td></tr><tr><td>B</td><td>C</td></tr></table>",
        );
        assert_eq!(columns, 2);
        assert_eq!(cells, vec![at(1, 1, 2, 1), at(1, 2, 1, 1), at(2, 2, 1, 1)]);
    }

    #[test]
    fn test_rowspan_pushes_later_cells_right() {
        let (columns, cells) = placements(
            "<table>\
               <tr><td rowspan=2>A</td><td>B</td></tr>\
               <tr><td>C</td></tr>\
             </table>",
        );
        assert_eq!(columns, 2);
        assert_eq!(cells, vec![at(1, 1, 1, 2), at(2, 1, 1, 1), at(2, 2, 1, 1)]);
    }

    #[test]
    fn test_invalid_spans_become_one() {
        let (columns, cells) = placements(
            "<table><tr><td colspan=0>A</td><td colspan=-3 rowspan=x>B</td></tr></table>",
        );
        assert_eq!(columns, 2);
        assert_eq!(cells, vec![at(1, 1, 1, 1), at(2, 1, 1, 1)]);
    }

    #[test]
    fn test_overflowing_row_clamps_to_last_column() {
        // Row 2 has three cells but the rowspan leaves only one free slot
        let (columns, cells) = placements(
            "<table>\
               <tr><td rowspan=2>A</td><td>B</td><td>C</td></tr>\
               <tr><td>D</td><td>E</td><td>F</td></tr>\
             </table>",
        );
        assert_eq!(columns, 3);
        assert_eq!(cells[3], at(2, 2, 1, 1));
        assert_eq!(cells[4], at(3, 2, 1, 1));
        // F finds no free slot and is clamped into the last column
        assert_eq!(cells[5], at(3, 2, 1, 1));
    }

    #[test]
    fn test_empty_rows_keep_indices() {
        let (_, cells) = placements("<table><tr></tr><tr><td>A</td></tr></table>");
        assert_eq!(cells, vec![at(1, 2, 1, 1)]);
    }

    #[test]
    fn test_table_without_cells_has_no_grid() {
        let tree = parse_html("<table><tr></tr></table>");
        assert!(TableGrid::layout(&tree, first_table(&tree)).is_none());

        let tree = parse_html("<table></table>");
        assert!(TableGrid::layout(&tree, first_table(&tree)).is_none());
    }

    #[test]
    fn test_nested_table_rows_flattened() {
        let tree = parse_html(
            "<table><tr><td>outer<table><tr><td>i1</td><td>i2</td><td>i3</td></tr></table></td></tr></table>",
        );
        let outer = first_table(&tree);
        assert_eq!(table_rows(&tree, outer).len(), 2);

        let grid = TableGrid::layout(&tree, outer).expect("grid");
        assert_eq!(grid.columns, 3);
        assert_eq!(grid.cells.len(), 4);
        let cells: Vec<GridPlacement> = grid.cells.iter().map(|c| c.placement).collect();
        assert_eq!(
            cells,
            vec![at(1, 1, 1, 1), at(1, 2, 1, 1), at(2, 2, 1, 1), at(3, 2, 1, 1)]
        );
        assert_eq!(grid.occupancy().column_count(), 3);
    }

    #[test]
    fn test_header_cells_count() {
        let (columns, cells) =
            placements("<table><thead><tr><th>H1</th><th>H2</th></tr></thead><tbody><tr><td>1</td><td>2</td></tr></tbody></table>");
        assert_eq!(columns, 2);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[3], at(2, 2, 1, 1));
    }

    #[test]
    fn test_occupancy_marks_rowspan_footprint() {
        let tree = parse_html("<table><tr><td rowspan=3 colspan=2>A</td></tr><tr></tr><tr></tr></table>");
        let grid = TableGrid::layout(&tree, first_table(&tree)).expect("grid");
        let occupancy = grid.occupancy();
        assert_eq!(occupancy.row_count(), 3);
        for row in 0..3 {
            assert!(occupancy.is_occupied(row, 0));
            assert!(occupancy.is_occupied(row, 1));
        }
    }

    #[test]
    fn test_table_attributes() {
        let tree = parse_html(r#"<table border="2.5" cellpadding="-4" cellspacing="3" dir=" RTL "></table>"#);
        let attrs = TableAttributes::from_node(&tree, first_table(&tree));
        assert_eq!(attrs.border, 2.5);
        assert_eq!(attrs.cell_padding, 0.0);
        assert_eq!(attrs.cell_spacing, 3.0);
        assert!(attrs.right_to_left);

        let tree = parse_html(r#"<table border="thick"></table>"#);
        let attrs = TableAttributes::from_node(&tree, first_table(&tree));
        assert_eq!(attrs.border, 1.0);
        assert_eq!(attrs.cell_padding, 5.0);
        assert_eq!(attrs.cell_spacing, 0.0);
        assert!(!attrs.right_to_left);
    }

    fn build_table(spans: &[Vec<(i64, i64)>]) -> (MarkupTree, NodeId) {
        let mut tree = MarkupTree::new();
        let table = tree.append_element(tree.root(), "table", &[]);
        for row in spans {
            let tr = tree.append_element(table, "tr", &[]);
            for (colspan, rowspan) in row {
                let colspan = colspan.to_string();
                let rowspan = rowspan.to_string();
                tree.append_element(
                    tr,
                    "td",
                    &[("colspan", colspan.as_str()), ("rowspan", rowspan.as_str())],
                );
            }
        }
        (tree, table)
    }

    proptest! {
        #[test]
        fn prop_grid_width_is_widest_row(
            spans in prop::collection::vec(
                prop::collection::vec((-2i64..5, -1i64..4), 0..5),
                1..6,
            ),
        ) {
            let (tree, table) = build_table(&spans);
            let expected: usize = spans
                .iter()
                .map(|row| row.iter().map(|(c, _)| (*c).max(1) as usize).sum::<usize>())
                .max()
                .unwrap_or(0);

            match TableGrid::layout(&tree, table) {
                Some(grid) => prop_assert_eq!(grid.columns as usize, expected),
                None => prop_assert_eq!(expected, 0),
            }
        }

        #[test]
        fn prop_no_slot_claimed_twice(
            spans in prop::collection::vec(
                prop::collection::vec((1i64..4, 1i64..4), 0..5),
                1..6,
            ),
        ) {
            let (tree, table) = build_table(&spans);
            let Some(grid) = TableGrid::layout(&tree, table) else {
                return Ok(());
            };

            // Recompute which placements would claim each slot, skipping slots
            // an earlier placement already holds; every slot the grid reports
            // occupied must be covered by at least one placement footprint.
            let rows = grid.occupancy().row_count();
            let columns = grid.columns as usize;
            let mut owner: Vec<Vec<Option<usize>>> = vec![vec![None; columns]; rows];
            for (index, cell) in grid.cells.iter().enumerate() {
                let p = cell.placement;
                let row_end = ((p.row - 1 + p.row_span) as usize).min(rows);
                let col_end = ((p.column - 1 + p.column_span) as usize).min(columns);
                for r in (p.row - 1) as usize..row_end {
                    for c in (p.column - 1) as usize..col_end {
                        if owner[r][c].is_none() {
                            owner[r][c] = Some(index);
                        }
                    }
                }
            }
            for r in 0..rows {
                for c in 0..columns {
                    prop_assert_eq!(grid.occupancy().is_occupied(r, c), owner[r][c].is_some());
                }
            }

            for cell in &grid.cells {
                prop_assert!(cell.placement.column >= 1);
                prop_assert!(cell.placement.column <= grid.columns);
            }
        }

        #[test]
        fn prop_non_overlapping_when_rows_fit(
            widths in prop::collection::vec(1usize..4, 1..6),
        ) {
            // Every row declares the same total width, so no cell ever overflows
            let spans: Vec<Vec<(i64, i64)>> = widths
                .iter()
                .map(|w| {
                    let mut row = vec![(*w as i64, 1i64)];
                    row.extend(std::iter::repeat_n((1i64, 1i64), 4 - *w));
                    row
                })
                .collect();
            let (tree, table) = build_table(&spans);
            let grid = TableGrid::layout(&tree, table).expect("grid");
            prop_assert_eq!(grid.columns, 4);

            let mut seen = vec![vec![false; 4]; spans.len()];
            for cell in &grid.cells {
                let p = cell.placement;
                for r in (p.row - 1)..(p.row - 1 + p.row_span) {
                    for c in (p.column - 1)..(p.column - 1 + p.column_span) {
                        let slot = &mut seen[r as usize][c as usize];
                        prop_assert!(!*slot, "slot ({}, {}) placed twice", r, c);
                        *slot = true;
                    }
                }
            }
        }
    }
}
