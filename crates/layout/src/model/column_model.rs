use tabula_types::BoxId;

/// A column definition resolved to its grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnInfo {
    /// The column (or childless column group) box.
    pub column: BoxId,
    /// The enclosing column group, if any.
    pub group: Option<BoxId>,
    pub index: usize,
    pub span: usize,
}

impl ColumnInfo {
    pub fn covers(&self, index: usize) -> bool {
        index >= self.index && index < self.end()
    }

    /// One past the last covered column.
    pub fn end(&self) -> usize {
        self.index.saturating_add(self.span)
    }
}

/// Per-table column bookkeeping.
///
/// `declared` counts columns given by explicit definitions; `count` is the
/// effective column count, which auto-layout tables grow as cells demand.
#[derive(Debug, Clone, Default)]
pub struct ColumnModel {
    columns: Vec<ColumnInfo>,
    declared: usize,
    count: usize,
}

impl ColumnModel {
    /// Registers a definition at the next free column and returns its index.
    pub fn add_column(&mut self, column: BoxId, group: Option<BoxId>, span: usize) -> usize {
        let index = self.declared;
        let span = span.max(1);
        self.columns.push(ColumnInfo {
            column,
            group,
            index,
            span,
        });
        self.declared = self.declared.saturating_add(span);
        self.count = self.count.max(self.declared);
        index
    }

    pub fn declared_count(&self) -> usize {
        self.declared
    }

    pub fn column_count(&self) -> usize {
        self.count
    }

    pub fn ensure_columns(&mut self, count: usize) {
        self.count = self.count.max(count);
    }

    /// The column limit a fixed-layout table enforces: the declared count, or
    /// the width established by the rows placed so far when nothing was
    /// declared (no limit while the first row is placed). Auto-layout tables
    /// have no limit.
    pub fn fixed_limit(&self, auto_layout: bool) -> Option<usize> {
        if auto_layout {
            None
        } else if self.declared > 0 {
            Some(self.declared)
        } else if self.count > 0 {
            Some(self.count)
        } else {
            None
        }
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// The definition covering grid column `index`.
    pub fn column_at(&self, index: usize) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.covers(index))
    }
}
