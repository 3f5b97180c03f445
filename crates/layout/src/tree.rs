//! The retained box tree.
//!
//! Boxes live in an arena and refer to each other by [`BoxId`]. Parents own
//! their children through the arena; parent links are navigational only.
//! Detached subtrees stay in the arena and can be attached again.

use crate::LayoutError;
use crate::borders::SpecifiedBorder;
use crate::config::TableConfig;
use crate::node_kind::NodeKind;
use crate::nodes::cell::clamp_span;
use crate::nodes::{
    Acceptance, BoxKind, CellData, ColumnData, MarkerKind, SectionData, SectionRole, TableData,
    TableLayoutInfo,
};
use crate::transaction::{BoxState, Transactional};
use crate::validator;
use log::{debug, trace};
use std::sync::Arc;
use tabula_style::{BorderCollapse, BoxStyle};
use tabula_types::{BoxId, Micro};

#[derive(Debug, Clone)]
pub struct RenderBox {
    id: BoxId,
    kind: BoxKind,
    style: Arc<BoxStyle>,
    parent: Option<BoxId>,
    children: Vec<BoxId>,
    open: bool,
    synthetic: bool,
    pub(crate) dirty: bool,
    pub(crate) state: Transactional<BoxState>,
}

impl RenderBox {
    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    pub fn node_kind(&self) -> NodeKind {
        self.kind.node_kind()
    }

    pub fn style(&self) -> &Arc<BoxStyle> {
        &self.style
    }

    pub fn parent(&self) -> Option<BoxId> {
        self.parent
    }

    pub fn children(&self) -> &[BoxId] {
        &self.children
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Inserted by the tree to repair a grammar violation.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoxTree {
    boxes: Vec<RenderBox>,
    config: TableConfig,
    default_style: Arc<BoxStyle>,
}

impl BoxTree {
    pub fn new(config: TableConfig) -> Self {
        Self {
            boxes: Vec::new(),
            config,
            default_style: Arc::new(BoxStyle::default()),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn alloc(&mut self, kind: BoxKind, style: Arc<BoxStyle>, synthetic: bool) -> BoxId {
        let id = BoxId::new(self.boxes.len() as u32);
        self.boxes.push(RenderBox {
            id,
            kind,
            style,
            parent: None,
            children: Vec::new(),
            open: true,
            synthetic,
            dirty: false,
            state: Transactional::default(),
        });
        id
    }

    // --- Constructors ---

    /// Creates a table box; table-wide settings are read from the style once.
    pub fn new_table(&mut self, style: Arc<BoxStyle>) -> BoxId {
        let info = TableLayoutInfo::from(&style.table);
        self.alloc(BoxKind::Table(TableData::new(info)), style, false)
    }

    pub fn new_section(&mut self, role: SectionRole, style: Arc<BoxStyle>) -> BoxId {
        self.alloc(BoxKind::Section(SectionData::new(role)), style, false)
    }

    pub fn new_row(&mut self, style: Arc<BoxStyle>) -> BoxId {
        self.alloc(BoxKind::Row, style, false)
    }

    /// Creates a cell. Spans of zero are clamped to one.
    pub fn new_cell(&mut self, style: Arc<BoxStyle>, col_span: usize, row_span: usize) -> BoxId {
        let border = SpecifiedBorder::from_style(&style);
        let data = CellData::new(col_span, row_span, border);
        self.alloc(BoxKind::Cell(data), style, false)
    }

    pub fn new_column(&mut self, style: Arc<BoxStyle>, span: usize) -> BoxId {
        self.alloc(BoxKind::Column(ColumnData::new(span)), style, false)
    }

    /// Creates a column group. `span` only counts when the group has no columns.
    pub fn new_column_group(&mut self, style: Arc<BoxStyle>, span: usize) -> BoxId {
        self.alloc(BoxKind::ColumnGroup(ColumnData::new(span)), style, false)
    }

    pub fn new_generic(&mut self, style: Arc<BoxStyle>) -> BoxId {
        self.alloc(BoxKind::Generic, style, false)
    }

    pub fn new_inline(&mut self, style: Arc<BoxStyle>) -> BoxId {
        self.alloc(BoxKind::Inline, style, false)
    }

    pub fn new_spacer(&mut self) -> BoxId {
        let style = self.default_style.clone();
        self.alloc(BoxKind::Spacer, style, false)
    }

    pub fn new_marker(&mut self, marker: MarkerKind) -> BoxId {
        let style = self.default_style.clone();
        self.alloc(BoxKind::Marker(marker), style, false)
    }

    fn new_synthetic(&mut self, kind: NodeKind) -> Result<BoxId, LayoutError> {
        let payload = match kind {
            NodeKind::Section => BoxKind::Section(SectionData::new(SectionRole::Body)),
            NodeKind::Row => BoxKind::Row,
            other => return Err(LayoutError::KindMismatch(NodeKind::Section, other)),
        };
        let style = self.default_style.clone();
        Ok(self.alloc(payload, style, true))
    }

    // --- Access ---

    pub fn get(&self, id: BoxId) -> Result<&RenderBox, LayoutError> {
        self.boxes.get(id.index()).ok_or(LayoutError::UnknownBox(id))
    }

    pub(crate) fn get_mut(&mut self, id: BoxId) -> Result<&mut RenderBox, LayoutError> {
        self.boxes.get_mut(id.index()).ok_or(LayoutError::UnknownBox(id))
    }

    pub fn node_kind(&self, id: BoxId) -> Result<NodeKind, LayoutError> {
        Ok(self.get(id)?.node_kind())
    }

    pub fn parent(&self, id: BoxId) -> Result<Option<BoxId>, LayoutError> {
        Ok(self.get(id)?.parent)
    }

    pub fn children(&self, id: BoxId) -> Result<&[BoxId], LayoutError> {
        Ok(&self.get(id)?.children)
    }

    /// Children of `id` with the given kind, in order.
    pub fn children_of_kind(&self, id: BoxId, kind: NodeKind) -> Result<Vec<BoxId>, LayoutError> {
        let mut found = Vec::new();
        for child in self.children(id)? {
            if self.node_kind(*child)? == kind {
                found.push(*child);
            }
        }
        Ok(found)
    }

    /// `root` and everything below it, in pre-order.
    pub fn descendants(&self, root: BoxId) -> Result<Vec<BoxId>, LayoutError> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id)?.iter().rev());
        }
        Ok(out)
    }

    fn is_ancestor(&self, ancestor: BoxId, mut node: BoxId) -> Result<bool, LayoutError> {
        while let Some(parent) = self.parent(node)? {
            if parent == ancestor {
                return Ok(true);
            }
            node = parent;
        }
        Ok(false)
    }

    pub(crate) fn table_data(&self, id: BoxId) -> Result<&TableData, LayoutError> {
        let node = self.get(id)?;
        node.kind
            .as_table()
            .ok_or(LayoutError::KindMismatch(NodeKind::Table, node.node_kind()))
    }

    pub(crate) fn table_data_mut(&mut self, id: BoxId) -> Result<&mut TableData, LayoutError> {
        let node = self.get_mut(id)?;
        let kind = node.kind.node_kind();
        node.kind
            .as_table_mut()
            .ok_or(LayoutError::KindMismatch(NodeKind::Table, kind))
    }

    pub fn section(&self, id: BoxId) -> Result<&SectionData, LayoutError> {
        let node = self.get(id)?;
        node.kind
            .as_section()
            .ok_or(LayoutError::KindMismatch(NodeKind::Section, node.node_kind()))
    }

    pub(crate) fn section_mut(&mut self, id: BoxId) -> Result<&mut SectionData, LayoutError> {
        let node = self.get_mut(id)?;
        let kind = node.kind.node_kind();
        node.kind
            .as_section_mut()
            .ok_or(LayoutError::KindMismatch(NodeKind::Section, kind))
    }

    pub(crate) fn cell(&self, id: BoxId) -> Result<&CellData, LayoutError> {
        let node = self.get(id)?;
        node.kind
            .as_cell()
            .ok_or(LayoutError::KindMismatch(NodeKind::Cell, node.node_kind()))
    }

    pub(crate) fn cell_mut(&mut self, id: BoxId) -> Result<&mut CellData, LayoutError> {
        let node = self.get_mut(id)?;
        let kind = node.kind.node_kind();
        node.kind
            .as_cell_mut()
            .ok_or(LayoutError::KindMismatch(NodeKind::Cell, kind))
    }

    pub(crate) fn column_mut(&mut self, id: BoxId) -> Result<&mut ColumnData, LayoutError> {
        let node = self.get_mut(id)?;
        let kind = node.kind.node_kind();
        node.kind
            .as_column_mut()
            .ok_or(LayoutError::KindMismatch(NodeKind::Column, kind))
    }

    /// Whether the table's structure has been validated for the current epoch.
    pub fn is_validated(&self, table: BoxId) -> Result<bool, LayoutError> {
        Ok(self.table_data(table)?.structure_validated)
    }

    pub fn table_info(&self, table: BoxId) -> Result<TableLayoutInfo, LayoutError> {
        Ok(self.table_data(table)?.info)
    }

    /// Position of a row among the rows of its section.
    pub fn row_index(&self, row: BoxId) -> Result<usize, LayoutError> {
        let kind = self.node_kind(row)?;
        if kind != NodeKind::Row {
            return Err(LayoutError::KindMismatch(NodeKind::Row, kind));
        }
        let parent = self.parent(row)?.ok_or(LayoutError::MissingAncestor {
            node: row,
            kind,
            expected: NodeKind::Section,
        })?;
        let rows = self.children_of_kind(parent, NodeKind::Row)?;
        rows.iter()
            .position(|r| *r == row)
            .ok_or(LayoutError::UnknownBox(row))
    }

    // --- Structure ---

    /// Attaches `child` under `parent`, repairing grammar violations by
    /// wrapping the child in synthetic sections and rows.
    ///
    /// Returns the box that actually became a child of `parent`.
    pub fn add_child(&mut self, parent: BoxId, child: BoxId) -> Result<BoxId, LayoutError> {
        let parent_box = self.get(parent)?;
        if !parent_box.open {
            return Err(LayoutError::ClosedBox(parent));
        }
        let child_box = self.get(child)?;
        if let Some(existing) = child_box.parent {
            return Err(LayoutError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if parent == child || self.is_ancestor(child, parent)? {
            return Err(LayoutError::CyclicAttach { parent, child });
        }

        let child_kind = child_box.node_kind();
        let parent_kind = parent_box.node_kind();
        match parent_box.kind.accepts(child_kind) {
            Acceptance::Accept => {
                self.attach(parent, child)?;
                Ok(child)
            }
            Acceptance::Reject => Err(LayoutError::RejectedChild {
                parent,
                parent_kind,
                child_kind,
            }),
            Acceptance::Wrap(kind) => {
                let wrapper = self.new_synthetic(kind)?;
                trace!(
                    "Wrapping {} {} in synthetic {} {} under {}.",
                    child_kind, child, kind, wrapper, parent
                );
                self.add_child(wrapper, child)?;
                self.get_mut(wrapper)?.open = false;
                self.attach(parent, wrapper)?;
                Ok(wrapper)
            }
        }
    }

    fn attach(&mut self, parent: BoxId, child: BoxId) -> Result<(), LayoutError> {
        self.get_mut(child)?.parent = Some(parent);
        let node = self.get_mut(parent)?;
        node.children.push(child);
        node.dirty = true;
        self.invalidate_enclosing_table(parent)
    }

    /// Detaches `child` from `parent`. The subtree stays in the arena.
    pub fn remove_child(&mut self, parent: BoxId, child: BoxId) -> Result<(), LayoutError> {
        if self.get(child)?.parent != Some(parent) {
            return Err(LayoutError::UnknownBox(child));
        }
        let node = self.get_mut(parent)?;
        node.children.retain(|c| *c != child);
        node.dirty = true;
        self.get_mut(child)?.parent = None;
        self.invalidate_enclosing_table(parent)
    }

    /// Closes a box against further children. Closing a table validates it.
    pub fn close(&mut self, id: BoxId) -> Result<(), LayoutError> {
        let node = self.get_mut(id)?;
        node.open = false;
        if node.node_kind() == NodeKind::Table {
            self.validate(id)?;
        }
        Ok(())
    }

    /// Runs structure validation on a closed table.
    pub fn validate(&mut self, table: BoxId) -> Result<(), LayoutError> {
        validator::validate_table(self, table)
    }

    /// Clears the dirty flag of `root` and its subtree once laid out.
    pub fn clear_dirty(&mut self, root: BoxId) -> Result<(), LayoutError> {
        for id in self.descendants(root)? {
            self.get_mut(id)?.dirty = false;
        }
        Ok(())
    }

    /// Resets the validation flag of the nearest table at or above `from`.
    pub(crate) fn invalidate_enclosing_table(&mut self, from: BoxId) -> Result<(), LayoutError> {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = self.get_mut(id)?;
            if let BoxKind::Table(data) = &mut node.kind {
                if data.structure_validated {
                    debug!("Table {} changed, structure validation reset.", id);
                }
                data.invalidate();
                return Ok(());
            }
            current = node.parent;
        }
        Ok(())
    }

    // --- Mutation of table settings ---

    /// Changes the spans of a cell. Zero spans are clamped to one.
    pub fn set_cell_spans(
        &mut self,
        cell: BoxId,
        col_span: usize,
        row_span: usize,
    ) -> Result<(), LayoutError> {
        let data = self.cell_mut(cell)?;
        data.col_span = clamp_span(col_span, "col-span");
        data.row_span = clamp_span(row_span, "row-span");
        self.invalidate_enclosing_table(cell)
    }

    pub fn set_border_collapse(
        &mut self,
        table: BoxId,
        collapse: BorderCollapse,
    ) -> Result<(), LayoutError> {
        let data = self.table_data_mut(table)?;
        data.info.border_collapse = collapse;
        data.invalidate();
        Ok(())
    }

    pub fn set_row_spacing(&mut self, table: BoxId, spacing: Micro) -> Result<(), LayoutError> {
        let data = self.table_data_mut(table)?;
        data.info.row_spacing = spacing;
        data.invalidate();
        Ok(())
    }

    pub fn set_auto_layout(&mut self, table: BoxId, auto_layout: bool) -> Result<(), LayoutError> {
        let data = self.table_data_mut(table)?;
        data.info.auto_layout = auto_layout;
        data.invalidate();
        Ok(())
    }

    pub fn set_display_empty_cells(&mut self, table: BoxId, show: bool) -> Result<(), LayoutError> {
        let data = self.table_data_mut(table)?;
        data.info.display_empty_cells = show;
        data.invalidate();
        Ok(())
    }
}
