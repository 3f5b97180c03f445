use serde_json::{Value, json};

/// A document with the given table and no styles.
pub fn document(table: Value) -> Value {
    json!({ "table": table })
}

/// A document with a stylesheet.
pub fn document_with_styles(styles: Value, table: Value) -> Value {
    json!({ "styles": styles, "table": table })
}

/// A document with a layout configuration.
pub fn document_with_config(config: Value, table: Value) -> Value {
    json!({ "config": config, "table": table })
}

pub fn cell(text: &str) -> Value {
    json!({ "text": text })
}

pub fn span_cell(text: &str, col_span: usize, row_span: usize) -> Value {
    json!({ "text": text, "colSpan": col_span, "rowSpan": row_span })
}

pub fn row(cells: Vec<Value>) -> Value {
    json!({ "cells": cells })
}

pub fn section(role: &str, rows: Vec<Value>) -> Value {
    json!({ "role": role, "rows": rows })
}

/// A table with one body section.
pub fn body_table(rows: Vec<Value>) -> Value {
    json!({ "sections": [section("body", rows)] })
}

/// Rows of `columns` cells named `r{row}c{column}`, numbered from `first`.
pub fn numbered_rows(first: usize, count: usize, columns: usize) -> Vec<Value> {
    (first..first + count)
        .map(|r| row((0..columns).map(|c| cell(&format!("r{}c{}", r, c))).collect()))
        .collect()
}
