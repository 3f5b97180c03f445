use tabula_types::{BoxId, GeometryError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    // --- Structural inconsistencies (upstream construction bugs) ---
    #[error("Structural inconsistency: {kind} {node} has no {expected} ancestor.")]
    MissingAncestor {
        node: BoxId,
        kind: NodeKind,
        expected: NodeKind,
    },
    #[error("Structural inconsistency: row {row} needs {required} columns but the fixed layout has {available}.")]
    ColumnOverflow {
        row: usize,
        required: usize,
        available: usize,
    },
    #[error("Structural inconsistency: table needs {required} columns, the limit is {max}.")]
    TooManyColumns { required: usize, max: usize },

    // --- Usage errors ---
    #[error("Unknown box {0}.")]
    UnknownBox(BoxId),
    #[error("Box {0} is closed and cannot be modified.")]
    ClosedBox(BoxId),
    #[error("Table {0} must be closed before it can be validated.")]
    TableNotClosed(BoxId),
    #[error("Table {0} has not been structure-validated.")]
    NotValidated(BoxId),
    #[error("Box {child} is already attached to {parent}.")]
    AlreadyAttached { child: BoxId, parent: BoxId },
    #[error("Attaching {child} under {parent} would create a cycle.")]
    CyclicAttach { parent: BoxId, child: BoxId },
    #[error("A {parent_kind} box ({parent}) cannot hold a {child_kind} child.")]
    RejectedChild {
        parent: BoxId,
        parent_kind: NodeKind,
        child_kind: NodeKind,
    },
    #[error("Kind mismatch: Expected {0} box, got {1}.")]
    KindMismatch(NodeKind, NodeKind),
    #[error("Expected {expected} column widths, got {found}.")]
    ColumnWidthsMismatch { expected: usize, found: usize },
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

impl LayoutError {
    /// Structural inconsistencies point at a construction bug upstream of the tree.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            LayoutError::MissingAncestor { .. }
                | LayoutError::ColumnOverflow { .. }
                | LayoutError::TooManyColumns { .. }
        )
    }

    /// Usage errors are raised at the point where the tree is misused.
    pub fn is_usage(&self) -> bool {
        !self.is_structural()
    }
}

pub mod algorithms;
pub mod borders;
pub mod config;
pub mod helper;
pub mod model;
pub mod node_kind;
pub mod nodes;
pub mod output;
pub mod transaction;
pub mod tree;
pub mod validator;

pub use self::algorithms::pagination::{PageSlice, RowMeasurer, TablePaginator};
pub use self::borders::{CellBorder, EdgeBorder, SpecifiedBorder};
pub use self::config::{SpanOverflow, TableConfig};
pub use self::helper::TableHelper;
pub use self::model::{ColumnInfo, ColumnModel, RowInfo, RowModel, Slot};
pub use self::node_kind::NodeKind;
pub use self::nodes::{BoxKind, CellData, MarkerKind, SectionRole, TableLayoutInfo};
pub use self::output::{CellStatus, CellView, GridCursor, GridItem, GridSlot, SectionView, TableView};
pub use self::transaction::{BoxState, Transactional};
pub use self::tree::{BoxTree, RenderBox};

// Re-export geometry types used throughout the tree
pub use tabula_types::geometry::{Bounds, Dimension, Micro, Point};

#[cfg(test)]
mod test_utils;
