//! JSON description of a table, built into a [`BoxTree`] through the regular
//! producer calls. Loose content is therefore repaired exactly as it would be
//! for any other producer.
//!
//! ```json
//! {
//!   "config": { "spanOverflow": "clamp" },
//!   "styles": { "grid": { "border": "1pt solid #000", "borderCollapse": "collapse" } },
//!   "table": {
//!     "class": ["grid"],
//!     "columns": [{ "span": 2 }, { "group": true, "columns": [{}, {}] }],
//!     "sections": [
//!       { "role": "header", "rows": [{ "cells": [{ "text": "Name", "colSpan": 2 }] }] },
//!       { "rows": [{ "cells": [{ "text": "a" }, { "text": "b", "css": { "border-left": "2pt double" } }] }] }
//!     ],
//!     "content": [{ "type": "text", "text": "loose" }]
//!   }
//! }
//! ```

use crate::error::TabulaError;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tabula_layout::{
    BoxTree, MarkerKind, NodeKind, PageSlice, SectionRole, TableConfig, TablePaginator, TableView,
};
use tabula_style::parsers::apply_style_property;
use tabula_style::{BoxStyle, Stylesheet};
use tabula_types::{BoxId, Micro};

fn one() -> i64 {
    1
}

/// Converts a span read from the document. Values below one are treated as one.
fn span(value: i64, what: &str) -> usize {
    if value < 1 {
        warn!("Ignoring {} of {}; using 1.", what, value);
        return 1;
    }
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Style references shared by every element of the document.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct StyleRef {
    /// Named styles from the stylesheet, applied in order.
    #[serde(default)]
    pub class: Vec<String>,
    /// Inline style applied after the classes.
    #[serde(default)]
    pub style: Option<BoxStyle>,
    /// CSS-like properties applied last, e.g. `"border-top": "1pt solid"`.
    #[serde(default)]
    pub css: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    #[serde(flatten)]
    pub style: StyleRef,
    #[serde(default = "one")]
    pub span: i64,
    #[serde(default)]
    pub group: bool,
    /// Member columns of a group.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CellSpec {
    #[serde(flatten)]
    pub style: StyleRef,
    #[serde(default = "one")]
    pub col_span: i64,
    #[serde(default = "one")]
    pub row_span: i64,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RowSpec {
    #[serde(flatten)]
    pub style: StyleRef,
    #[serde(default)]
    pub cells: Vec<CellSpec>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SectionSpec {
    #[serde(flatten)]
    pub style: StyleRef,
    #[serde(default)]
    pub role: SectionRole,
    #[serde(default)]
    pub rows: Vec<RowSpec>,
}

/// Content attached directly to the table, wrapped as needed.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentSpec {
    Section(SectionSpec),
    Row(RowSpec),
    Cell(CellSpec),
    Text { text: String },
    Spacer,
    PageBreak,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    #[serde(flatten)]
    pub style: StyleRef,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    /// Appended after `sections`, in order.
    #[serde(default)]
    pub content: Vec<ContentSpec>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableDocument {
    #[serde(default)]
    pub config: TableConfig,
    #[serde(flatten)]
    pub stylesheet: Stylesheet,
    pub table: TableSpec,
}

/// A built and validated table plus the text of its inline boxes.
#[derive(Debug)]
pub struct LoadedTable {
    pub tree: BoxTree,
    pub table: BoxId,
    pub texts: HashMap<BoxId, String>,
}

struct Builder<'d> {
    tree: BoxTree,
    stylesheet: &'d Stylesheet,
    texts: HashMap<BoxId, String>,
}

impl<'d> Builder<'d> {
    fn resolve(&self, style: &StyleRef) -> Result<Arc<BoxStyle>, TabulaError> {
        let mut resolved = self.stylesheet.resolve(&style.class, style.style.as_ref());
        for (property, value) in &style.css {
            apply_style_property(&mut resolved, property, value)?;
        }
        Ok(Arc::new(resolved))
    }

    fn column(&mut self, spec: &ColumnSpec) -> Result<BoxId, TabulaError> {
        let style = self.resolve(&spec.style)?;
        let count = span(spec.span, "column span");
        if !spec.group && spec.columns.is_empty() {
            return Ok(self.tree.new_column(style, count));
        }
        let group = self.tree.new_column_group(style, count);
        for member in &spec.columns {
            let column = self.column(member)?;
            self.tree.add_child(group, column)?;
        }
        Ok(group)
    }

    fn text(&mut self, text: &str) -> BoxId {
        let inline = self.tree.new_inline(Arc::new(BoxStyle::default()));
        self.texts.insert(inline, text.to_string());
        inline
    }

    fn cell(&mut self, spec: &CellSpec) -> Result<BoxId, TabulaError> {
        let style = self.resolve(&spec.style)?;
        let cell = self.tree.new_cell(
            style,
            span(spec.col_span, "colSpan"),
            span(spec.row_span, "rowSpan"),
        );
        if let Some(text) = &spec.text {
            let inline = self.text(text);
            self.tree.add_child(cell, inline)?;
        }
        self.tree.close(cell)?;
        Ok(cell)
    }

    fn row(&mut self, spec: &RowSpec) -> Result<BoxId, TabulaError> {
        let style = self.resolve(&spec.style)?;
        let row = self.tree.new_row(style);
        for cell in &spec.cells {
            let cell = self.cell(cell)?;
            self.tree.add_child(row, cell)?;
        }
        self.tree.close(row)?;
        Ok(row)
    }

    fn section(&mut self, spec: &SectionSpec) -> Result<BoxId, TabulaError> {
        let style = self.resolve(&spec.style)?;
        let section = self.tree.new_section(spec.role, style);
        for row in &spec.rows {
            let row = self.row(row)?;
            self.tree.add_child(section, row)?;
        }
        self.tree.close(section)?;
        Ok(section)
    }

    fn content(&mut self, spec: &ContentSpec) -> Result<BoxId, TabulaError> {
        match spec {
            ContentSpec::Section(section) => self.section(section),
            ContentSpec::Row(row) => self.row(row),
            ContentSpec::Cell(cell) => self.cell(cell),
            ContentSpec::Text { text } => Ok(self.text(text)),
            ContentSpec::Spacer => Ok(self.tree.new_spacer()),
            ContentSpec::PageBreak => Ok(self.tree.new_marker(MarkerKind::PageBreak)),
        }
    }
}

impl TableDocument {
    pub fn from_json(json: &str) -> Result<Self, TabulaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the box tree and closes the table, which validates it.
    pub fn build(&self) -> Result<LoadedTable, TabulaError> {
        let mut builder = Builder {
            tree: BoxTree::new(self.config),
            stylesheet: &self.stylesheet,
            texts: HashMap::new(),
        };

        let style = builder.resolve(&self.table.style)?;
        let table = builder.tree.new_table(style);
        for column in &self.table.columns {
            let column = builder.column(column)?;
            builder.tree.add_child(table, column)?;
        }
        for section in &self.table.sections {
            let section = builder.section(section)?;
            builder.tree.add_child(table, section)?;
        }
        for content in &self.table.content {
            let child = builder.content(content)?;
            let attached = builder.tree.add_child(table, child)?;
            if attached != child {
                debug!("Loose {} content wrapped into {}.", builder.tree.node_kind(child)?, attached);
            }
        }
        builder.tree.close(table)?;

        Ok(LoadedTable {
            tree: builder.tree,
            table,
            texts: builder.texts,
        })
    }
}

impl LoadedTable {
    pub fn view(&self) -> Result<TableView<'_>, TabulaError> {
        Ok(TableView::new(&self.tree, self.table)?)
    }

    /// Text of all inline boxes below `id`, joined by spaces.
    pub fn text_of(&self, id: BoxId) -> Result<String, TabulaError> {
        let mut parts = Vec::new();
        for node in self.tree.descendants(id)? {
            if self.tree.node_kind(node)? == NodeKind::Inline {
                if let Some(text) = self.texts.get(&node) {
                    parts.push(text.as_str());
                }
            }
        }
        Ok(parts.join(" "))
    }

    /// Paginates with the same width for every column and the same height for every row.
    pub fn paginate_uniform(
        &mut self,
        page_height: Micro,
        column_width: Micro,
        row_height: Micro,
    ) -> Result<Vec<PageSlice>, TabulaError> {
        let columns = self.view()?.column_count();
        let widths = vec![column_width; columns];
        let pages = TablePaginator::new(&mut self.tree, self.table, &widths, page_height, |_: BoxId| {
            row_height
        })?
        .run()?;
        Ok(pages)
    }
}
