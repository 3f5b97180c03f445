use serde::{Deserialize, Serialize};

/// What to do with a cell whose column span runs past the column count of a
/// fixed-layout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpanOverflow {
    /// Raise `LayoutError::ColumnOverflow`.
    #[default]
    Reject,
    /// Shrink the span to the columns that remain. A cell that starts past the
    /// last column is still rejected.
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    /// Policy for spans overflowing a fixed column count. Auto-layout tables
    /// grow instead.
    ///
    /// Defaults to `Reject`.
    pub span_overflow: SpanOverflow,
    /// Upper bound on the number of columns any table may grow to.
    ///
    /// Defaults to `1024`.
    pub max_columns: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            span_overflow: SpanOverflow::Reject,
            max_columns: 1024,
        }
    }
}
