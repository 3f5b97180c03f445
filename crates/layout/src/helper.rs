//! Upward navigation from table parts to their enclosing row, section and table.
//!
//! The walk is strict: a cell's parent must be a row, a row's parent a
//! section and a section's parent a table. Anything else means the tree was
//! built wrong upstream and is reported as `LayoutError::MissingAncestor`.

use crate::LayoutError;
use crate::node_kind::NodeKind;
use crate::tree::BoxTree;
use tabula_types::BoxId;

pub struct TableHelper;

impl TableHelper {
    fn expect_parent(tree: &BoxTree, id: BoxId, expected: NodeKind) -> Result<BoxId, LayoutError> {
        let missing = || -> Result<LayoutError, LayoutError> {
            Ok(LayoutError::MissingAncestor {
                node: id,
                kind: tree.node_kind(id)?,
                expected,
            })
        };
        match tree.parent(id)? {
            Some(parent) if tree.node_kind(parent)? == expected => Ok(parent),
            _ => Err(missing()?),
        }
    }

    /// Content boxes resolve through the nearest table part above them.
    fn nearest_table_part(tree: &BoxTree, id: BoxId) -> Result<BoxId, LayoutError> {
        let mut current = id;
        loop {
            match tree.node_kind(current)? {
                NodeKind::Cell
                | NodeKind::Row
                | NodeKind::Section
                | NodeKind::Table
                | NodeKind::Column
                | NodeKind::ColumnGroup => return Ok(current),
                _ => {}
            }
            current = tree.parent(current)?.ok_or(LayoutError::MissingAncestor {
                node: id,
                kind: tree.node_kind(id)?,
                expected: NodeKind::Table,
            })?;
        }
    }

    /// The row holding `cell`.
    pub fn enclosing_row(tree: &BoxTree, cell: BoxId) -> Result<BoxId, LayoutError> {
        let part = Self::nearest_table_part(tree, cell)?;
        match tree.node_kind(part)? {
            NodeKind::Cell => Self::expect_parent(tree, part, NodeKind::Row),
            NodeKind::Row => Ok(part),
            other => Err(LayoutError::KindMismatch(NodeKind::Cell, other)),
        }
    }

    /// The section holding a cell or row. A section is its own enclosing section.
    pub fn enclosing_section(tree: &BoxTree, id: BoxId) -> Result<BoxId, LayoutError> {
        let part = Self::nearest_table_part(tree, id)?;
        match tree.node_kind(part)? {
            NodeKind::Section => Ok(part),
            NodeKind::Cell | NodeKind::Row => {
                let row = Self::enclosing_row(tree, part)?;
                Self::expect_parent(tree, row, NodeKind::Section)
            }
            other => Err(LayoutError::KindMismatch(NodeKind::Section, other)),
        }
    }

    /// The table holding `id`. A table is its own enclosing table.
    pub fn enclosing_table(tree: &BoxTree, id: BoxId) -> Result<BoxId, LayoutError> {
        let part = Self::nearest_table_part(tree, id)?;
        match tree.node_kind(part)? {
            NodeKind::Table => Ok(part),
            NodeKind::ColumnGroup => Self::expect_parent(tree, part, NodeKind::Table),
            NodeKind::Column => match tree.parent(part)? {
                Some(parent) if tree.node_kind(parent)? == NodeKind::ColumnGroup => {
                    Self::expect_parent(tree, parent, NodeKind::Table)
                }
                _ => Self::expect_parent(tree, part, NodeKind::Table),
            },
            _ => {
                let section = Self::enclosing_section(tree, part)?;
                Self::expect_parent(tree, section, NodeKind::Table)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_grid, plain};

    #[test]
    fn test_walks_up_from_cell_and_content() {
        let mut tree = BoxTree::default();
        let grid = build_grid(&mut tree, plain(), &[&[(1, 1)]]);
        let cell = grid.cells[0][0];
        let text = tree.new_inline(plain());
        tree.add_child(cell, text).unwrap();

        assert_eq!(TableHelper::enclosing_row(&tree, cell).unwrap(), grid.rows[0]);
        assert_eq!(TableHelper::enclosing_section(&tree, cell).unwrap(), grid.section);
        assert_eq!(TableHelper::enclosing_table(&tree, cell).unwrap(), grid.table);
        assert_eq!(TableHelper::enclosing_table(&tree, text).unwrap(), grid.table);
        assert_eq!(TableHelper::enclosing_table(&tree, grid.table).unwrap(), grid.table);
    }

    #[test]
    fn test_columns_reach_their_table() {
        let mut tree = BoxTree::default();
        let table = tree.new_table(plain());
        let group = tree.new_column_group(plain(), 1);
        let column = tree.new_column(plain(), 1);
        tree.add_child(group, column).unwrap();
        tree.add_child(table, group).unwrap();
        assert_eq!(TableHelper::enclosing_table(&tree, column).unwrap(), table);
    }

    #[test]
    fn test_detached_cell_is_a_structural_error() {
        let mut tree = BoxTree::default();
        let cell = tree.new_cell(plain(), 1, 1);
        let err = TableHelper::enclosing_table(&tree, cell).unwrap_err();
        assert_eq!(
            err,
            LayoutError::MissingAncestor {
                node: cell,
                kind: NodeKind::Cell,
                expected: NodeKind::Row
            }
        );
        assert!(err.is_structural());

        // A row directly under a generic box has no section.
        let generic = tree.new_generic(plain());
        let row = tree.new_row(plain());
        tree.add_child(generic, row).unwrap();
        tree.add_child(row, cell).unwrap();
        assert!(matches!(
            TableHelper::enclosing_section(&tree, cell),
            Err(LayoutError::MissingAncestor {
                expected: NodeKind::Section,
                ..
            })
        ));
    }
}
