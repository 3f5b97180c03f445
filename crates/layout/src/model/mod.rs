//! Column and row bookkeeping computed by structure validation.

pub mod column_model;
pub mod row_model;

pub use column_model::{ColumnInfo, ColumnModel};
pub use row_model::{CellRequest, Placement, PlacementPolicy, RowInfo, RowModel, Slot};
