mod common;

use common::fixtures::*;
use common::{TestResult, load};
use serde_json::json;
use tabula::layout::{CellStatus, CellView, GridSlot, LayoutError, NodeKind, SectionRole, TableHelper, TableView};
use tabula::style::BorderStyle;
use tabula::types::Micro;
use tabula::{TableDocument, TabulaError};

fn origins(view: &TableView<'_>) -> Result<Vec<CellView>, LayoutError> {
    let mut cells = Vec::new();
    for item in view.grid()? {
        if let GridSlot::Origin(cell) = item?.slot {
            cells.push(cell);
        }
    }
    Ok(cells)
}

#[test]
fn test_colspan_then_two_cells() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let loaded = load(&document(body_table(vec![
        row(vec![span_cell("wide", 2, 1)]),
        row(vec![cell("left"), cell("right")]),
    ])))?;
    let view = loaded.view()?;
    assert_eq!(view.column_count(), 2);

    let items = view.grid()?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(items.len(), 4);
    assert_eq!(items[1].slot.status(), CellStatus::SpannedOver);
    assert_eq!((items[2].row_number, items[2].column), (1, 0));

    let columns: Vec<usize> = origins(&view)?.iter().map(|c| c.column_index).collect();
    assert_eq!(columns, vec![0, 0, 1]);
    Ok(())
}

#[test]
fn test_loose_text_is_wrapped_in_body_section_and_row() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let loaded = load(&document(json!({
        "content": [{ "type": "text", "text": "stray" }]
    })))?;
    let tree = &loaded.tree;

    let sections = tree.children(loaded.table)?;
    assert_eq!(sections.len(), 1);
    let section = tree.get(sections[0])?;
    assert!(section.is_synthetic());
    assert_eq!(tree.section(section.id())?.role(), SectionRole::Body);

    let rows = section.children();
    assert_eq!(rows.len(), 1);
    let row = tree.get(rows[0])?;
    assert_eq!(row.node_kind(), NodeKind::Row);
    assert!(row.is_synthetic());
    assert!(!row.is_open());

    let text = row.children()[0];
    assert_eq!(tree.node_kind(text)?, NodeKind::Inline);
    assert_eq!(loaded.text_of(text)?, "stray");
    assert_eq!(TableHelper::enclosing_table(tree, text)?, loaded.table);
    Ok(())
}

#[test]
fn test_loose_cell_gets_its_own_row() -> TestResult {
    let loaded = load(&document(json!({
        "sections": [section("body", vec![row(vec![cell("a")])])],
        "content": [
            { "type": "cell", "text": "b" },
            { "type": "cell", "text": "c" }
        ]
    })))?;
    let view = loaded.view()?;
    let sections = view.sections()?;
    assert_eq!(sections.len(), 3);
    assert!(sections.iter().all(|s| s.role == SectionRole::Body && s.row_count == 1));
    assert_eq!(view.column_count(), 1);
    Ok(())
}

#[test]
fn test_sections_keep_their_roles() -> TestResult {
    let loaded = load(&document(json!({
        "sections": [
            section("header", vec![row(vec![cell("H")])]),
            section("body", vec![row(vec![cell("B1")]), row(vec![cell("B2")])]),
            section("footer", vec![row(vec![cell("F")])]),
        ]
    })))?;
    let view = loaded.view()?;
    let roles: Vec<_> = view.sections()?.iter().map(|s| (s.role, s.row_count)).collect();
    assert_eq!(
        roles,
        vec![(SectionRole::Header, 1), (SectionRole::Body, 2), (SectionRole::Footer, 1)]
    );

    let body: Vec<bool> = origins(&view)?.iter().map(|c| c.body_section).collect();
    assert_eq!(body, vec![false, true, true, false]);
    Ok(())
}

#[test]
fn test_rowspans_push_cells_right_and_stop_at_section_end() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let loaded = load(&document(body_table(vec![
        row(vec![span_cell("tall", 1, 9), cell("a")]),
        row(vec![cell("b")]),
    ])))?;
    let cells = origins(&loaded.view()?)?;
    assert_eq!(cells.len(), 3);
    assert_eq!(cells[0].row_span, 2);
    assert_eq!(cells[2].column_index, 1);
    Ok(())
}

#[test]
fn test_column_groups_count_towards_columns() -> TestResult {
    let loaded = load(&document(json!({
        "columns": [
            { "span": 2 },
            { "group": true, "columns": [{}, { "span": 2 }] }
        ],
        "sections": [section("body", vec![row(vec![cell("x")])])]
    })))?;
    let view = loaded.view()?;
    assert_eq!(view.column_count(), 5);

    let statuses = view
        .grid()?
        .map(|item| item.map(|i| i.slot.status()))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(statuses.len(), 5);
    assert_eq!(statuses[0], CellStatus::Pending);
    assert!(statuses[1..].iter().all(|s| *s == CellStatus::Empty));
    Ok(())
}

#[test]
fn test_fixed_layout_overflow_is_structural() -> TestResult {
    let table = json!({
        "style": { "tableLayout": "fixed" },
        "columns": [{ "span": 2 }],
        "sections": [section("body", vec![row(vec![cell("a"), span_cell("b", 2, 1)])])]
    });

    match load(&document(table.clone())) {
        Err(TabulaError::Layout(e)) => {
            assert!(e.is_structural());
            assert_eq!(
                e,
                LayoutError::ColumnOverflow {
                    row: 0,
                    required: 3,
                    available: 2
                }
            );
        }
        other => panic!("expected a column overflow, got {:?}", other.map(|l| l.table)),
    }

    let clamped = load(&document_with_config(json!({ "spanOverflow": "clamp" }), table))?;
    let view = clamped.view()?;
    assert_eq!(view.column_count(), 2);
    let spans: Vec<usize> = origins(&view)?.iter().map(|c| c.col_span).collect();
    assert_eq!(spans, vec![1, 1]);
    Ok(())
}

#[test]
fn test_fixed_layout_without_columns_takes_first_row_width() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let fixed = |rows: Vec<serde_json::Value>| {
        json!({ "style": { "tableLayout": "fixed" }, "sections": [section("body", rows)] })
    };
    let loaded = load(&document(fixed(vec![
        row(vec![cell("a"), cell("b"), cell("c")]),
        row(vec![span_cell("wide", 2, 1), cell("d")]),
    ])))?;
    let view = loaded.view()?;
    assert_eq!(view.column_count(), 3);
    let columns: Vec<usize> = origins(&view)?.iter().map(|c| c.column_index).collect();
    assert_eq!(columns, vec![0, 1, 2, 0, 2]);

    let result = load(&document(fixed(vec![
        row(vec![cell("a"), cell("b")]),
        row(vec![span_cell("too wide", 3, 1)]),
    ])));
    assert!(matches!(
        result,
        Err(TabulaError::Layout(LayoutError::ColumnOverflow {
            row: 1,
            required: 3,
            available: 2
        }))
    ));
    Ok(())
}

#[test]
fn test_non_positive_spans_count_as_one() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let loaded = load(&document(json!({
        "columns": [{ "span": 0 }],
        "sections": [section("body", vec![
            row(vec![json!({ "text": "a", "colSpan": -1, "rowSpan": 0 }), cell("b")]),
            row(vec![cell("c"), cell("d")]),
        ])]
    })))?;
    let view = loaded.view()?;
    assert_eq!(view.column_count(), 2);
    let cells = origins(&view)?;
    assert_eq!(cells.len(), 4);
    assert_eq!((cells[0].col_span, cells[0].row_span), (1, 1));
    assert_eq!(cells[2].column_index, 0);
    Ok(())
}

#[test]
fn test_max_columns_limit() {
    let result = load(&document_with_config(
        json!({ "maxColumns": 3 }),
        body_table(vec![row(vec![span_cell("wide", 4, 1)])]),
    ));
    assert!(matches!(
        result,
        Err(TabulaError::Layout(LayoutError::TooManyColumns { required: 4, max: 3 }))
    ));

    let huge = load(&document_with_config(
        json!({ "maxColumns": 3 }),
        body_table(vec![row(vec![cell("a"), json!({ "text": "b", "colSpan": 9_000_000_000_i64 })])]),
    ));
    assert!(matches!(
        huge,
        Err(TabulaError::Layout(LayoutError::TooManyColumns { required: 9_000_000_001, max: 3 }))
    ));
}

#[test]
fn test_collapsed_borders_from_stylesheet() -> TestResult {
    let loaded = load(&document_with_styles(
        json!({
            "grid": { "border": "3pt double #000", "borderCollapse": "collapse" },
            "accent": { "borderLeft": "1pt solid #f00" }
        }),
        json!({
            "class": ["grid"],
            "sections": [section("body", vec![row(vec![
                cell("a"),
                json!({ "text": "b", "class": ["accent"] })
            ])])]
        }),
    ))?;
    let view = loaded.view()?;
    assert!(view.info().is_collapsed());
    let cells = origins(&view)?;

    // Outer edges come from the table.
    assert_eq!(cells[0].effective_border.left.style, BorderStyle::Double);
    assert_eq!(cells[0].effective_border.top.width, Micro::from_units(3));
    // A border set on a cell beats the wider table border on an inner edge.
    assert_eq!(cells[1].effective_border.left.style, BorderStyle::Solid);
    assert_eq!(cells[1].effective_border.left.width, Micro::from_units(1));
    Ok(())
}

#[test]
fn test_separate_borders_are_the_cell_borders() -> TestResult {
    let loaded = load(&document(json!({
        "style": { "border": "3pt double #000" },
        "sections": [section("body", vec![row(vec![
            json!({ "text": "a", "css": { "border-right": "2pt dashed" } })
        ])])]
    })))?;
    let cells = origins(&loaded.view()?)?;
    assert_eq!(cells[0].effective_border.right.style, BorderStyle::Dashed);
    assert_eq!(cells[0].effective_border.left.style, BorderStyle::None);
    Ok(())
}

#[test]
fn test_hidden_empty_cells() -> TestResult {
    let loaded = load(&document(json!({
        "style": { "emptyCells": "hide" },
        "sections": [section("body", vec![row(vec![cell("a"), json!({})])])]
    })))?;
    let cells = origins(&loaded.view()?)?;
    assert!(cells[0].visible);
    assert!(!cells[1].visible);
    assert_eq!(GridSlot::Origin(cells[1].clone()).status(), CellStatus::Empty);
    Ok(())
}

#[test]
fn test_invalid_documents_are_reported() {
    assert!(matches!(
        TableDocument::from_json(r#"{ "table": [] }"#),
        Err(TabulaError::Json(_))
    ));

    let unknown = load(&document(json!({ "css": { "font-size": "12pt" } })));
    assert!(matches!(unknown, Err(TabulaError::Style(_))));

    let bad_value = load(&document(json!({ "css": { "table-layout": "sideways" } })));
    assert!(matches!(bad_value, Err(TabulaError::Style(_))));
}
