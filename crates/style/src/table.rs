//! Table-level style properties, read once when a table box is created.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum BorderCollapse {
    #[default]
    Separate,
    Collapse,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum TableLayout {
    #[default]
    Auto,
    Fixed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum EmptyCells {
    #[default]
    Show,
    Hide,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TableStyle {
    pub border_collapse: BorderCollapse,
    /// Vertical gap between rows, in points. Ignored by the collapsing model.
    pub row_spacing: f32,
    pub table_layout: TableLayout,
    pub empty_cells: EmptyCells,
}

impl TableStyle {
    /// Overlays every property of `other` that differs from its default, so
    /// styles setting different table properties combine.
    pub fn merge(&mut self, other: &TableStyle) {
        if other.border_collapse != BorderCollapse::default() {
            self.border_collapse = other.border_collapse;
        }
        if other.row_spacing != 0.0 {
            self.row_spacing = other.row_spacing;
        }
        if other.table_layout != TableLayout::default() {
            self.table_layout = other.table_layout;
        }
        if other.empty_cells != EmptyCells::default() {
            self.empty_cells = other.empty_cells;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_css_initial_values() {
        let style = TableStyle::default();
        assert_eq!(style.border_collapse, BorderCollapse::Separate);
        assert_eq!(style.table_layout, TableLayout::Auto);
        assert_eq!(style.empty_cells, EmptyCells::Show);
        assert_eq!(style.row_spacing, 0.0);
    }

    #[test]
    fn test_deserialize_partial_table_style() {
        let style: TableStyle =
            serde_json::from_str(r#"{ "borderCollapse": "collapse", "tableLayout": "fixed" }"#)
                .unwrap();
        assert_eq!(style.border_collapse, BorderCollapse::Collapse);
        assert_eq!(style.table_layout, TableLayout::Fixed);
        assert_eq!(style.empty_cells, EmptyCells::Show);
    }
}
