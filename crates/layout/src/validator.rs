//! Structure validation of closed tables.
//!
//! One pass per mutation epoch:
//! 1. column definitions get their column indices,
//! 2. each section's rows are placed cell by cell,
//! 3. effective borders are resolved,
//! 4. the table is flagged as validated.
//!
//! Results are only written back once every step has succeeded, so a failed
//! pass leaves the tree as it was.

use crate::LayoutError;
use crate::borders::{self, CellBorder};
use crate::model::{CellRequest, ColumnModel, PlacementPolicy, RowModel};
use crate::node_kind::NodeKind;
use crate::nodes::{CellPlacement, SectionRole};
use crate::tree::BoxTree;
use log::debug;
use std::collections::HashMap;
use tabula_types::BoxId;

struct PlacedCell {
    cell: BoxId,
    placement: CellPlacement,
    body_section: bool,
}

fn assign_columns(
    tree: &BoxTree,
    table: BoxId,
    columns: &mut ColumnModel,
) -> Result<Vec<(BoxId, usize)>, LayoutError> {
    let mut indices = Vec::new();
    for &child in tree.children(table)? {
        let node = tree.get(child)?;
        let span = node.kind().as_column().map_or(1, |c| c.span());
        match node.node_kind() {
            NodeKind::Column => {
                indices.push((child, columns.add_column(child, None, span)));
            }
            NodeKind::ColumnGroup => {
                let members = tree.children_of_kind(child, NodeKind::Column)?;
                if members.is_empty() {
                    indices.push((child, columns.add_column(child, None, span)));
                    continue;
                }
                let mut first = None;
                for member in members {
                    let member_span = tree.get(member)?.kind().as_column().map_or(1, |c| c.span());
                    let index = columns.add_column(member, Some(child), member_span);
                    first.get_or_insert(index);
                    indices.push((member, index));
                }
                if let Some(first) = first {
                    indices.push((child, first));
                }
            }
            _ => {}
        }
    }
    Ok(indices)
}

fn place_section(
    tree: &BoxTree,
    section: BoxId,
    columns: &mut ColumnModel,
    policy: &PlacementPolicy,
    placed: &mut Vec<PlacedCell>,
) -> Result<RowModel, LayoutError> {
    let body_section = tree.section(section)?.role() == SectionRole::Body;
    let mut model = RowModel::default();
    let first = placed.len();

    for row in tree.children_of_kind(section, NodeKind::Row)? {
        let mut requests = Vec::new();
        for cell in tree.children_of_kind(row, NodeKind::Cell)? {
            let data = tree.cell(cell)?;
            requests.push(CellRequest {
                cell,
                col_span: data.col_span(),
                row_span: data.row_span(),
            });
        }

        let placements = model.place_row(row, &requests, columns, policy)?;
        for (request, p) in requests.iter().zip(placements) {
            placed.push(PlacedCell {
                cell: p.cell,
                placement: CellPlacement {
                    column_index: p.column_index,
                    col_span: p.col_span,
                    row_span: request.row_span,
                },
                body_section,
            });
        }
    }

    for (cell, missing) in model.finish() {
        if let Some(entry) = placed[first..].iter_mut().find(|p| p.cell == cell) {
            entry.placement.row_span -= missing;
        }
    }
    Ok(model)
}

/// Validates the structure of a closed table. A no-op when already validated.
pub fn validate_table(tree: &mut BoxTree, table: BoxId) -> Result<(), LayoutError> {
    let data = tree.table_data(table)?;
    if tree.get(table)?.is_open() {
        return Err(LayoutError::TableNotClosed(table));
    }
    if data.is_validated() {
        debug!("Table {} is already validated.", table);
        return Ok(());
    }

    let info = *data.info();
    let config = *tree.config();
    let policy = PlacementPolicy {
        auto_layout: info.auto_layout,
        overflow: config.span_overflow,
        max_columns: config.max_columns,
    };

    let mut columns = ColumnModel::default();
    let column_indices = assign_columns(tree, table, &mut columns)?;
    if columns.declared_count() > policy.max_columns {
        return Err(LayoutError::TooManyColumns {
            required: columns.declared_count(),
            max: policy.max_columns,
        });
    }

    let mut placed = Vec::new();
    let mut models = Vec::new();
    for section in tree.children_of_kind(table, NodeKind::Section)? {
        let model = place_section(tree, section, &mut columns, &policy, &mut placed)?;
        models.push((section, model));
    }
    let column_count = columns.column_count();
    for (_, model) in &mut models {
        model.pad_to(column_count);
    }

    let resolved: Vec<(BoxId, CellBorder)> = if info.is_collapsed() {
        let sections: Vec<(BoxId, &RowModel)> = models.iter().map(|(s, m)| (*s, m)).collect();
        let spans: HashMap<BoxId, CellPlacement> =
            placed.iter().map(|p| (p.cell, p.placement)).collect();
        borders::resolve_collapsed(tree, table, &columns, &sections, &spans)?
    } else {
        let mut out = Vec::with_capacity(placed.len());
        for p in &placed {
            out.push((p.cell, tree.cell(p.cell)?.specified_border().to_cell_border()));
        }
        out
    };

    for p in &placed {
        let cell = tree.cell_mut(p.cell)?;
        cell.placement = Some(p.placement);
        cell.body_section = p.body_section;
    }
    for (cell, border) in resolved {
        tree.cell_mut(cell)?.effective_border = Some(border);
    }
    for (column, index) in column_indices {
        tree.column_mut(column)?.column_index = Some(index);
    }
    for (section, model) in models {
        tree.section_mut(section)?.row_model = model;
    }
    let data = tree.table_data_mut(table)?;
    data.column_model = columns;
    data.structure_validated = true;

    debug!(
        "Validated table {}: {} columns, {} cells ({} borders).",
        table,
        column_count,
        placed.len(),
        if info.is_collapsed() { "collapsed" } else { "separate" }
    );
    Ok(())
}
