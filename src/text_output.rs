//! Plain-text output: one line per grid row, fields separated by `|`.
//!
//! Covered and hidden positions print as empty fields, so every line of a
//! table has the same number of fields. Loose content wrapped into a row
//! (text outside any cell) prints as a line of its own after that row.

use crate::document::LoadedTable;
use crate::error::TabulaError;
use std::collections::HashMap;
use std::io::Write;
use tabula_layout::{CellStatus, GridItem, GridSlot, NodeKind, PageSlice};
use tabula_types::BoxId;

const DELIMITER: &str = "|";

fn escape(field: &str) -> String {
    field.replace('\\', "\\\\").replace('|', "\\|").replace('\n', " ")
}

fn field(loaded: &LoadedTable, item: &GridItem) -> Result<String, TabulaError> {
    match (&item.slot, item.slot.status()) {
        (GridSlot::Origin(cell), CellStatus::Ready) => Ok(escape(&loaded.text_of(cell.cell)?)),
        (GridSlot::Origin(cell), CellStatus::Pending) => Err(TabulaError::Document(format!(
            "cell {} has not been laid out",
            cell.cell
        ))),
        _ => Ok(String::new()),
    }
}

/// Text of the non-cell children of `row`, and whether the row holds any cells.
fn loose_text(loaded: &LoadedTable, row: BoxId) -> Result<(Option<String>, bool), TabulaError> {
    let mut parts = Vec::new();
    let mut has_cells = false;
    for &child in loaded.tree.children(row)? {
        if loaded.tree.node_kind(child)? == NodeKind::Cell {
            has_cells = true;
            continue;
        }
        let text = loaded.text_of(child)?;
        if !text.is_empty() {
            parts.push(text);
        }
    }
    let text = if parts.is_empty() {
        None
    } else {
        Some(escape(&parts.join(" ")))
    };
    Ok((text, has_cells))
}

/// Writes the rows of each page, headers first.
pub fn write_pages<W: Write>(
    loaded: &LoadedTable,
    pages: &[PageSlice],
    out: &mut W,
) -> Result<(), TabulaError> {
    let view = loaded.view()?;
    let mut by_row: HashMap<BoxId, Vec<GridItem>> = HashMap::new();
    for item in view.grid()? {
        let item = item?;
        by_row.entry(item.row).or_default().push(item);
    }

    for page in pages {
        writeln!(out, "--- page {} ---", page.page_offset + 1)?;
        for row in page.header_rows.iter().chain(&page.rows) {
            let (loose, has_cells) = loose_text(loaded, *row)?;
            if let Some(items) = by_row.get(row).filter(|_| has_cells || loose.is_none()) {
                let fields = items
                    .iter()
                    .map(|item| field(loaded, item))
                    .collect::<Result<Vec<_>, _>>()?;
                writeln!(out, "{}", fields.join(DELIMITER))?;
            }
            if let Some(text) = loose {
                writeln!(out, "{}", text)?;
            }
        }
    }
    Ok(())
}
