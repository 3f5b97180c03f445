use std::fmt;

/// The kind of a render box, without its payload.
///
/// Used in errors, logging and grammar checks, where comparing a `Copy` tag
/// is cheaper than matching on the full `BoxKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Table,
    Section,
    Row,
    Cell,
    Column,
    ColumnGroup,
    Generic,
    Inline,
    Spacer,
    Marker,
}

impl NodeKind {
    /// Returns a string representation, primarily for debugging or error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Table => "Table",
            NodeKind::Section => "Section",
            NodeKind::Row => "Row",
            NodeKind::Cell => "Cell",
            NodeKind::Column => "Column",
            NodeKind::ColumnGroup => "ColumnGroup",
            NodeKind::Generic => "Generic",
            NodeKind::Inline => "Inline",
            NodeKind::Spacer => "Spacer",
            NodeKind::Marker => "Marker",
        }
    }

    /// Spacers and markers are accepted by every container.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, NodeKind::Spacer | NodeKind::Marker)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
