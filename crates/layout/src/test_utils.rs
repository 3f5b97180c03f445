use crate::nodes::SectionRole;
use crate::tree::BoxTree;
use std::sync::Arc;
use tabula_style::BoxStyle;
use tabula_types::BoxId;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn plain() -> Arc<BoxStyle> {
    Arc::new(BoxStyle::default())
}

pub fn styled(style: BoxStyle) -> Arc<BoxStyle> {
    Arc::new(style)
}

/// Ids of a table built by [`build_grid`].
pub struct Grid {
    pub table: BoxId,
    pub section: BoxId,
    pub rows: Vec<BoxId>,
    pub cells: Vec<Vec<BoxId>>,
}

/// Builds an open table with one body section. Each row is a list of
/// `(col_span, row_span)` pairs.
pub fn build_grid(tree: &mut BoxTree, table_style: Arc<BoxStyle>, rows: &[&[(usize, usize)]]) -> Grid {
    let table = tree.new_table(table_style);
    let section = tree.new_section(SectionRole::Body, plain());
    let mut row_ids = Vec::new();
    let mut cells = Vec::new();
    for spans in rows {
        let row = tree.new_row(plain());
        let mut row_cells = Vec::new();
        for &(col_span, row_span) in spans.iter() {
            let cell = tree.new_cell(plain(), col_span, row_span);
            tree.add_child(row, cell).unwrap();
            row_cells.push(cell);
        }
        tree.add_child(section, row).unwrap();
        row_ids.push(row);
        cells.push(row_cells);
    }
    tree.add_child(table, section).unwrap();
    Grid {
        table,
        section,
        rows: row_ids,
        cells,
    }
}
