use crate::model::ColumnModel;
use tabula_style::{BorderCollapse, EmptyCells, TableLayout, TableStyle};
use tabula_types::Micro;

/// Table-wide settings captured from the table's style at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayoutInfo {
    pub row_spacing: Micro,
    pub border_collapse: BorderCollapse,
    pub auto_layout: bool,
    pub display_empty_cells: bool,
}

impl Default for TableLayoutInfo {
    fn default() -> Self {
        Self::from(&TableStyle::default())
    }
}

impl From<&TableStyle> for TableLayoutInfo {
    fn from(style: &TableStyle) -> Self {
        Self {
            row_spacing: Micro::from_external(style.row_spacing as f64),
            border_collapse: style.border_collapse,
            auto_layout: style.table_layout == TableLayout::Auto,
            display_empty_cells: style.empty_cells == EmptyCells::Show,
        }
    }
}

impl TableLayoutInfo {
    pub fn is_collapsed(&self) -> bool {
        self.border_collapse == BorderCollapse::Collapse
    }

    /// Row spacing as applied between rows; the collapsing model has none.
    pub fn effective_row_spacing(&self) -> Micro {
        if self.is_collapsed() {
            Micro::ZERO
        } else {
            self.row_spacing
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableData {
    pub(crate) info: TableLayoutInfo,
    pub(crate) column_model: ColumnModel,
    pub(crate) structure_validated: bool,
}

impl TableData {
    pub fn new(info: TableLayoutInfo) -> Self {
        Self {
            info,
            column_model: ColumnModel::default(),
            structure_validated: false,
        }
    }

    pub fn info(&self) -> &TableLayoutInfo {
        &self.info
    }

    pub(crate) fn column_model(&self) -> &ColumnModel {
        &self.column_model
    }

    pub fn is_validated(&self) -> bool {
        self.structure_validated
    }

    pub(crate) fn invalidate(&mut self) {
        self.structure_validated = false;
    }
}
