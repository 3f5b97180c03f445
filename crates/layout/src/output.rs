//! Read-only access for output consumers.
//!
//! Everything here reads the committed (`applied`) layout state of a validated
//! table. A [`GridCursor`] walks the grid row by row and classifies each slot,
//! so a writer can tell empty positions, positions covered by a span and
//! cells ready to be emitted apart.

use crate::LayoutError;
use crate::borders::CellBorder;
use crate::helper::TableHelper;
use crate::model::{RowInfo, Slot};
use crate::node_kind::NodeKind;
use crate::nodes::{SectionRole, TableLayoutInfo};
use crate::tree::BoxTree;
use tabula_types::{Bounds, BoxId, Micro};

/// A committed cell, as seen by consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub cell: BoxId,
    pub column_index: usize,
    pub col_span: usize,
    pub row_span: usize,
    pub effective_border: CellBorder,
    pub bounds: Bounds,
    pub finished: bool,
    /// False for empty cells hidden by `empty-cells: hide` in the separate model.
    pub visible: bool,
    pub body_section: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    /// Nothing to emit at this position.
    Empty,
    /// Covered by a cell that starts elsewhere.
    SpannedOver,
    /// The cell starts here but its layout is not committed yet.
    Pending,
    /// The cell starts here and is finished.
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridSlot {
    Empty,
    Covered(BoxId),
    Origin(CellView),
}

impl GridSlot {
    pub fn status(&self) -> CellStatus {
        match self {
            GridSlot::Empty => CellStatus::Empty,
            GridSlot::Covered(_) => CellStatus::SpannedOver,
            GridSlot::Origin(view) if !view.visible => CellStatus::Empty,
            GridSlot::Origin(view) if view.finished => CellStatus::Ready,
            GridSlot::Origin(_) => CellStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridItem {
    pub section: BoxId,
    pub row: BoxId,
    pub row_number: usize,
    pub column: usize,
    pub slot: GridSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionView {
    pub section: BoxId,
    pub role: SectionRole,
    pub row_count: usize,
}

/// Consumer handle on a validated table.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'t> {
    tree: &'t BoxTree,
    table: BoxId,
    info: TableLayoutInfo,
    column_count: usize,
}

impl<'t> TableView<'t> {
    pub fn new(tree: &'t BoxTree, table: BoxId) -> Result<Self, LayoutError> {
        if !tree.is_validated(table)? {
            return Err(LayoutError::NotValidated(table));
        }
        let data = tree.table_data(table)?;
        Ok(Self {
            tree,
            table,
            info: *data.info(),
            column_count: data.column_model().column_count(),
        })
    }

    pub fn table(&self) -> BoxId {
        self.table
    }

    pub fn info(&self) -> &TableLayoutInfo {
        &self.info
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn sections(&self) -> Result<Vec<SectionView>, LayoutError> {
        let mut out = Vec::new();
        for section in self.tree.children_of_kind(self.table, NodeKind::Section)? {
            let data = self.tree.section(section)?;
            out.push(SectionView {
                section,
                role: data.role(),
                row_count: data.row_model().rows().len(),
            });
        }
        Ok(out)
    }

    /// Committed header shift of a section on the page at `page_offset`: the
    /// height of the header block body rows start below.
    pub fn header_shift(&self, section: BoxId, page_offset: u32) -> Result<Option<Micro>, LayoutError> {
        self.tree.applied_header_shift(section, page_offset)
    }

    pub fn cell(&self, cell: BoxId) -> Result<CellView, LayoutError> {
        if TableHelper::enclosing_table(self.tree, cell)? != self.table {
            return Err(LayoutError::UnknownBox(cell));
        }
        let node = self.tree.get(cell)?;
        let data = self.tree.cell(cell)?;
        let placement = data.placement().ok_or(LayoutError::NotValidated(self.table))?;
        let effective_border = data
            .effective_border()
            .copied()
            .ok_or(LayoutError::NotValidated(self.table))?;
        let applied = node.state.applied();

        let hidden = !self.info.display_empty_cells
            && !self.info.is_collapsed()
            && node.children().is_empty();

        Ok(CellView {
            cell,
            column_index: placement.column_index,
            col_span: placement.col_span,
            row_span: placement.row_span,
            effective_border,
            bounds: applied.bounds(),
            finished: applied.is_finished(),
            visible: !hidden,
            body_section: data.is_body_cell(),
        })
    }

    /// Cursor over one section.
    pub fn section_grid(&self, section: BoxId) -> Result<GridCursor<'t>, LayoutError> {
        if self.tree.parent(section)? != Some(self.table) {
            return Err(LayoutError::UnknownBox(section));
        }
        let rows = self.tree.section(section)?.row_model().rows();
        Ok(GridCursor::new(*self, vec![(section, rows)]))
    }

    /// Cursor over every section, in document order.
    pub fn grid(&self) -> Result<GridCursor<'t>, LayoutError> {
        let mut sections = Vec::new();
        for section in self.tree.children_of_kind(self.table, NodeKind::Section)? {
            sections.push((section, self.tree.section(section)?.row_model().rows()));
        }
        Ok(GridCursor::new(*self, sections))
    }
}

/// Row-major walk over grid slots. Cheap to create and can be reset, so a
/// consumer may walk the grid again after each pagination attempt.
pub struct GridCursor<'t> {
    view: TableView<'t>,
    sections: Vec<(BoxId, &'t [RowInfo])>,
    section: usize,
    row: usize,
    column: usize,
}

impl<'t> GridCursor<'t> {
    fn new(view: TableView<'t>, sections: Vec<(BoxId, &'t [RowInfo])>) -> Self {
        Self {
            view,
            sections,
            section: 0,
            row: 0,
            column: 0,
        }
    }

    pub fn reset(&mut self) {
        self.section = 0;
        self.row = 0;
        self.column = 0;
    }
}

impl<'t> Iterator for GridCursor<'t> {
    type Item = Result<GridItem, LayoutError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (section, rows) = *self.sections.get(self.section)?;
            let Some(info) = rows.get(self.row) else {
                self.section += 1;
                self.row = 0;
                self.column = 0;
                continue;
            };
            if self.column >= self.view.column_count {
                self.row += 1;
                self.column = 0;
                continue;
            }

            let column = self.column;
            self.column += 1;
            let slot = match info.slots.get(column).copied().unwrap_or_default() {
                Slot::Vacant => GridSlot::Empty,
                Slot::Covered(cell) => GridSlot::Covered(cell),
                Slot::Origin(cell) => match self.view.cell(cell) {
                    Ok(view) => GridSlot::Origin(view),
                    Err(e) => return Some(Err(e)),
                },
            };
            return Some(Ok(GridItem {
                section,
                row: info.row,
                row_number: info.row_number,
                column,
                slot,
            }));
        }
    }
}
