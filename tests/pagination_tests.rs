mod common;

use common::fixtures::*;
use common::{TestResult, load, paginate, render_document};
use serde_json::json;
use tabula::layout::{CellStatus, GridSlot, LayoutError, SectionRole, TablePaginator};
use tabula::types::{BoxId, Micro};
use tabula::TabulaError;

fn header_table(body_rows: usize) -> serde_json::Value {
    json!({
        "sections": [
            section("header", vec![row(vec![cell("Name"), cell("Qty")])]),
            section("body", numbered_rows(0, body_rows, 2)),
        ]
    })
}

#[test]
fn test_single_page_when_everything_fits() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let rendered = render_document(&document(header_table(3)), 100.0)?;
    assert_page_count!(rendered, 1);
    assert_page_lines!(rendered, 0, ["Name|Qty", "r0c0|r0c1", "r1c0|r1c1", "r2c0|r2c1"]);
    assert_eq!(rendered.pages[0].used_height, Micro::from_units(40));
    Ok(())
}

#[test]
fn test_headers_repeat_on_every_page() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let rendered = render_document(&document(header_table(5)), 35.0)?;
    assert_page_count!(rendered, 3);
    assert_page_lines!(rendered, 0, ["Name|Qty", "r0c0|r0c1", "r1c0|r1c1"]);
    assert_page_lines!(rendered, 1, ["Name|Qty", "r2c0|r2c1", "r3c0|r3c1"]);
    assert_page_lines!(rendered, 2, ["Name|Qty", "r4c0|r4c1"]);

    let header_rows = &rendered.pages[0].header_rows;
    assert!(rendered.pages.iter().all(|p| &p.header_rows == header_rows));
    Ok(())
}

#[test]
fn test_committed_geometry_and_header_shift() -> TestResult {
    let mut loaded = load(&document(header_table(5)))?;
    let rendered = paginate(&mut loaded, 35.0)?;

    let view = loaded.view()?;
    let header = view
        .sections()?
        .into_iter()
        .find(|s| s.role == SectionRole::Header)
        .ok_or("no header section")?
        .section;
    // Every page's body starts below the 10pt header.
    for page in 0..rendered.page_count() as u32 {
        assert_eq!(view.header_shift(header, page)?, Some(Micro::from_units(10)));
    }
    assert_eq!(view.header_shift(header, 7)?, None);

    // The first row of page two sits right below the repeated header.
    let row = rendered.pages[1].rows[0];
    assert_eq!(loaded.tree.bounds(row)?.y(), Micro::from_units(10));

    for item in view.grid()? {
        let item = item?;
        if let GridSlot::Origin(cell) = &item.slot {
            assert_eq!(item.slot.status(), CellStatus::Ready);
            assert_eq!(cell.bounds.width(), Micro::from_units(100));
            assert_eq!(cell.bounds.height(), Micro::from_units(10));
        }
    }
    Ok(())
}

#[test]
fn test_header_shift_covers_all_header_sections() -> TestResult {
    let mut loaded = load(&document(json!({
        "sections": [
            section("header", vec![row(vec![cell("Title")])]),
            section("header", vec![row(vec![cell("Name")])]),
            section("body", numbered_rows(0, 4, 1)),
        ]
    })))?;
    let rendered = paginate(&mut loaded, 45.0)?;
    assert_page_count!(rendered, 2);
    assert_page_lines!(rendered, 1, ["Title", "Name", "r2c0", "r3c0"]);

    let view = loaded.view()?;
    let headers: Vec<BoxId> = view
        .sections()?
        .into_iter()
        .filter(|s| s.role == SectionRole::Header)
        .map(|s| s.section)
        .collect();
    assert_eq!(headers.len(), 2);
    for header in headers {
        for page in 0..2 {
            assert_eq!(view.header_shift(header, page)?, Some(Micro::from_units(20)));
        }
    }
    assert_eq!(loaded.tree.bounds(rendered.pages[1].rows[0])?.y(), Micro::from_units(20));
    Ok(())
}

#[test]
fn test_loose_text_is_written_on_its_own_line() -> TestResult {
    let rendered = render_document(
        &document(json!({
            "sections": [section("body", vec![row(vec![cell("a"), cell("b")])])],
            "content": [{ "type": "text", "text": "stray | note" }]
        })),
        100.0,
    )?;
    assert_page_lines!(rendered, 0, ["a|b", "stray \\| note"]);

    let only_text = render_document(
        &document(json!({ "content": [{ "type": "text", "text": "stray" }] })),
        100.0,
    )?;
    assert_output_contains_line!(only_text, "stray");
    Ok(())
}

#[test]
fn test_rowspan_group_moves_to_next_page_whole() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let rendered = render_document(
        &document(body_table(vec![
            row(vec![cell("a"), cell("b")]),
            row(vec![span_cell("tall", 1, 2), cell("c")]),
            row(vec![cell("d")]),
            row(vec![cell("e"), cell("f")]),
        ])),
        25.0,
    )?;
    assert_page_count!(rendered, 3);
    assert_page_lines!(rendered, 0, ["a|b"]);
    assert_page_lines!(rendered, 1, ["tall|c", "|d"]);
    assert_page_lines!(rendered, 2, ["e|f"]);
    Ok(())
}

#[test]
fn test_oversized_group_is_placed_anyway() -> TestResult {
    let rendered = render_document(
        &document(body_table(vec![row(vec![span_cell("huge", 1, 3)]), row(vec![]), row(vec![])])),
        15.0,
    )?;
    assert_page_count!(rendered, 1);
    assert_eq!(rendered.pages[0].rows.len(), 3);
    assert_eq!(rendered.pages[0].used_height, Micro::from_units(30));
    Ok(())
}

#[test]
fn test_page_break_marker_and_footer_order() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let rendered = render_document(
        &document(json!({
            "sections": [
                section("footer", vec![row(vec![cell("total")])]),
                section("body", vec![row(vec![cell("first")])]),
            ],
            "content": [
                { "type": "pageBreak" },
                { "type": "section", "rows": [row(vec![cell("second")])] }
            ]
        })),
        500.0,
    )?;
    assert_page_count!(rendered, 2);
    assert_page_lines!(rendered, 0, ["first"]);
    assert_page_lines!(rendered, 1, ["second", "total"]);
    Ok(())
}

#[test]
fn test_row_spacing_between_rows() -> TestResult {
    let rendered = render_document(
        &document(json!({
            "style": { "rowSpacing": 5.0 },
            "sections": [section("body", numbered_rows(0, 3, 1))]
        })),
        100.0,
    )?;
    // Every row is followed by the spacing, the last one included.
    assert_eq!(rendered.pages[0].used_height, Micro::from_units(45));
    Ok(())
}

#[test]
fn test_output_escapes_delimiters() -> TestResult {
    let rendered = render_document(
        &document(body_table(vec![row(vec![cell("a|b"), cell("multi\nline")])])),
        100.0,
    )?;
    assert_output_contains_line!(rendered, "a\\|b|multi line");
    Ok(())
}

#[test]
fn test_unpaginated_output_is_refused() -> TestResult {
    let loaded = load(&document(body_table(vec![row(vec![cell("x")])])))?;
    let mut out = Vec::new();
    tabula::write_pages(&loaded, &[], &mut out)?;
    assert!(out.is_empty());

    let row = loaded.tree.children(loaded.tree.children(loaded.table)?[0])?[0];
    let page = tabula::layout::PageSlice {
        page_offset: 0,
        header_rows: Vec::new(),
        rows: vec![row],
        used_height: Micro::ZERO,
    };
    let result = tabula::write_pages(&loaded, &[page], &mut out);
    assert!(matches!(result, Err(TabulaError::Document(_))));
    Ok(())
}

#[test]
fn test_paginator_rejects_wrong_column_widths() -> TestResult {
    let mut loaded = load(&document(body_table(numbered_rows(0, 1, 2))))?;
    let widths = [Micro::from_units(50)];
    let result = TablePaginator::new(
        &mut loaded.tree,
        loaded.table,
        &widths,
        Micro::from_units(100),
        |_: BoxId| Micro::from_units(10),
    );
    assert!(matches!(
        result.err(),
        Some(LayoutError::ColumnWidthsMismatch { expected: 2, found: 1 })
    ));
    Ok(())
}
