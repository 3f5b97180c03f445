use crate::borders::{CellBorder, SpecifiedBorder};
use log::warn;

/// Where validation placed a cell in its section's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub column_index: usize,
    /// Columns actually covered, after any clamping.
    pub col_span: usize,
    /// Rows actually covered, after truncation at the section end.
    pub row_span: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CellData {
    pub(crate) col_span: usize,
    pub(crate) row_span: usize,
    pub(crate) specified_border: SpecifiedBorder,
    pub(crate) effective_border: Option<CellBorder>,
    pub(crate) placement: Option<CellPlacement>,
    pub(crate) body_section: bool,
}

pub(crate) fn clamp_span(span: usize, what: &str) -> usize {
    if span == 0 {
        warn!("Cell {} of 0 is invalid, using 1.", what);
        1
    } else {
        span
    }
}

impl CellData {
    pub fn new(col_span: usize, row_span: usize, specified_border: SpecifiedBorder) -> Self {
        Self {
            col_span: clamp_span(col_span, "col-span"),
            row_span: clamp_span(row_span, "row-span"),
            specified_border,
            effective_border: None,
            placement: None,
            body_section: false,
        }
    }

    /// The declared column span.
    pub fn col_span(&self) -> usize {
        self.col_span
    }

    /// The declared row span.
    pub fn row_span(&self) -> usize {
        self.row_span
    }

    pub fn specified_border(&self) -> &SpecifiedBorder {
        &self.specified_border
    }

    pub(crate) fn placement(&self) -> Option<CellPlacement> {
        self.placement
    }

    pub(crate) fn column_index(&self) -> Option<usize> {
        self.placement.map(|p| p.column_index)
    }

    pub(crate) fn effective_border(&self) -> Option<&CellBorder> {
        self.effective_border.as_ref()
    }

    /// Whether the cell sits in a body section rather than a header or footer.
    pub fn is_body_cell(&self) -> bool {
        self.body_section
    }
}
