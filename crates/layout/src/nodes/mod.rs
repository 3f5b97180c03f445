//! Per-kind payloads of render boxes and the table containment grammar.

pub mod cell;
pub mod column;
pub mod section;
pub mod table;

pub use cell::{CellData, CellPlacement};
pub use column::ColumnData;
pub use section::{SectionData, SectionRole};
pub use table::{TableData, TableLayoutInfo};

use crate::node_kind::NodeKind;

/// Markers are zero-size boxes carrying a signal for the pagination driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    PageBreak,
    Progress,
    AutoLayout,
}

/// The closed set of render box variants.
#[derive(Debug, Clone)]
pub enum BoxKind {
    Table(TableData),
    Section(SectionData),
    Row,
    Cell(CellData),
    Column(ColumnData),
    ColumnGroup(ColumnData),
    Generic,
    Inline,
    Spacer,
    Marker(MarkerKind),
}

/// How a container reacts to a prospective child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Accept,
    /// Wrap the child in a synthetic container of this kind first.
    Wrap(NodeKind),
    Reject,
}

impl BoxKind {
    pub fn node_kind(&self) -> NodeKind {
        match self {
            BoxKind::Table(_) => NodeKind::Table,
            BoxKind::Section(_) => NodeKind::Section,
            BoxKind::Row => NodeKind::Row,
            BoxKind::Cell(_) => NodeKind::Cell,
            BoxKind::Column(_) => NodeKind::Column,
            BoxKind::ColumnGroup(_) => NodeKind::ColumnGroup,
            BoxKind::Generic => NodeKind::Generic,
            BoxKind::Inline => NodeKind::Inline,
            BoxKind::Spacer => NodeKind::Spacer,
            BoxKind::Marker(_) => NodeKind::Marker,
        }
    }

    /// The containment grammar. Tables hold sections and column
    /// definitions, sections hold rows; everything else gets wrapped.
    pub fn accepts(&self, child: NodeKind) -> Acceptance {
        match self {
            BoxKind::Table(_) => match child {
                NodeKind::Section | NodeKind::Column | NodeKind::ColumnGroup => Acceptance::Accept,
                k if k.is_passthrough() => Acceptance::Accept,
                _ => Acceptance::Wrap(NodeKind::Section),
            },
            BoxKind::Section(_) => match child {
                NodeKind::Row => Acceptance::Accept,
                k if k.is_passthrough() => Acceptance::Accept,
                _ => Acceptance::Wrap(NodeKind::Row),
            },
            BoxKind::ColumnGroup(_) => match child {
                NodeKind::Column => Acceptance::Accept,
                _ => Acceptance::Reject,
            },
            BoxKind::Column(_) | BoxKind::Spacer | BoxKind::Marker(_) => Acceptance::Reject,
            BoxKind::Row
            | BoxKind::Cell(_)
            | BoxKind::Generic
            | BoxKind::Inline => Acceptance::Accept,
        }
    }

    pub fn as_table(&self) -> Option<&TableData> {
        match self {
            BoxKind::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut TableData> {
        match self {
            BoxKind::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&SectionData> {
        match self {
            BoxKind::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_section_mut(&mut self) -> Option<&mut SectionData> {
        match self {
            BoxKind::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&CellData> {
        match self {
            BoxKind::Cell(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cell_mut(&mut self) -> Option<&mut CellData> {
        match self {
            BoxKind::Cell(c) => Some(c),
            _ => None,
        }
    }

    /// Column data for both single columns and column groups.
    pub fn as_column(&self) -> Option<&ColumnData> {
        match self {
            BoxKind::Column(c) | BoxKind::ColumnGroup(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_column_mut(&mut self) -> Option<&mut ColumnData> {
        match self {
            BoxKind::Column(c) | BoxKind::ColumnGroup(c) => Some(c),
            _ => None,
        }
    }
}
