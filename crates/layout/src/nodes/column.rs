/// Payload shared by column and column-group boxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnData {
    pub(crate) span: usize,
    pub(crate) column_index: Option<usize>,
}

impl ColumnData {
    pub fn new(span: usize) -> Self {
        Self {
            span: span.max(1),
            column_index: None,
        }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    /// The first grid column this definition covers, once validated.
    pub fn column_index(&self) -> Option<usize> {
        self.column_index
    }
}
