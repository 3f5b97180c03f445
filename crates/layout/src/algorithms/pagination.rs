//! Reference pagination driver for validated tables.
//!
//! Rows bound together by row spans form a group that is never split. Each
//! group is placed tentatively; if it overflows the page it is rolled back
//! and placed again at the top of the next page, after the repeated header
//! sections.

use crate::LayoutError;
use crate::nodes::{BoxKind, MarkerKind, SectionRole};
use crate::model::{RowInfo, Slot};
use crate::tree::BoxTree;
use log::{debug, warn};
use std::ops::Range;
use tabula_types::{Bounds, BoxId, Micro};

pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: Micro,
}

/// Checks whether a child of `child_height` fits below `cursor_y` in a
/// container of height `available`.
pub fn check_child_fit(cursor_y: Micro, child_height: Micro, available: Micro) -> BreakAnalysis {
    let remaining = (available - cursor_y).max(Micro::ZERO);
    BreakAnalysis {
        should_break: child_height > remaining,
        remaining_height: remaining,
    }
}

/// Supplies row heights to the paginator.
pub trait RowMeasurer {
    fn row_height(&self, row: BoxId) -> Micro;
}

impl<F: Fn(BoxId) -> Micro> RowMeasurer for F {
    fn row_height(&self, row: BoxId) -> Micro {
        self(row)
    }
}

/// The rows placed on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    pub page_offset: u32,
    /// Header rows repeated at the top of this page.
    pub header_rows: Vec<BoxId>,
    /// Body and footer rows, in order.
    pub rows: Vec<BoxId>,
    pub used_height: Micro,
}

impl PageSlice {
    fn new(page_offset: u32) -> Self {
        Self {
            page_offset,
            header_rows: Vec::new(),
            rows: Vec::new(),
            used_height: Micro::ZERO,
        }
    }
}

enum Item {
    Group { section: BoxId, rows: Range<usize> },
    PageBreak,
}

pub struct TablePaginator<'t, 'w, M: RowMeasurer> {
    tree: &'t mut BoxTree,
    table: BoxId,
    column_x: Vec<Micro>,
    column_widths: &'w [Micro],
    page_height: Micro,
    first_page_height: Micro,
    row_spacing: Micro,
    measurer: M,
}

impl<'t, 'w, M: RowMeasurer> TablePaginator<'t, 'w, M> {
    pub fn new(
        tree: &'t mut BoxTree,
        table: BoxId,
        column_widths: &'w [Micro],
        page_height: Micro,
        measurer: M,
    ) -> Result<Self, LayoutError> {
        if !tree.is_validated(table)? {
            return Err(LayoutError::NotValidated(table));
        }
        let data = tree.table_data(table)?;
        let expected = data.column_model().column_count();
        if column_widths.len() != expected {
            return Err(LayoutError::ColumnWidthsMismatch {
                expected,
                found: column_widths.len(),
            });
        }
        let row_spacing = data.info().effective_row_spacing();

        let mut column_x = Vec::with_capacity(column_widths.len() + 1);
        let mut x = Micro::ZERO;
        column_x.push(x);
        for width in column_widths {
            x += *width;
            column_x.push(x);
        }

        Ok(Self {
            tree,
            table,
            column_x,
            column_widths,
            page_height,
            first_page_height: page_height,
            row_spacing,
            measurer,
        })
    }

    /// Space left on the first page, when the table does not start at the top.
    pub fn with_first_page_height(mut self, height: Micro) -> Self {
        self.first_page_height = height;
        self
    }

    fn rows(&self, section: BoxId) -> Result<Vec<RowInfo>, LayoutError> {
        Ok(self.tree.section(section)?.row_model().rows().to_vec())
    }

    fn row_span_of(&self, cell: BoxId) -> Result<usize, LayoutError> {
        Ok(self
            .tree
            .cell(cell)?
            .placement()
            .map_or(1, |p| p.row_span))
    }

    /// Splits a section's rows into groups that row spans tie together.
    fn groups(&self, rows: &[RowInfo]) -> Result<Vec<Range<usize>>, LayoutError> {
        let mut groups = Vec::new();
        let mut start = 0;
        while start < rows.len() {
            let mut end = start + 1;
            let mut r = start;
            while r < end {
                for slot in &rows[r].slots {
                    if let Slot::Origin(cell) = slot {
                        end = end.max(r + self.row_span_of(*cell)?).min(rows.len());
                    }
                }
                r += 1;
            }
            groups.push(start..end);
            start = end;
        }
        Ok(groups)
    }

    fn stack_height(&self, rows: &[RowInfo]) -> Micro {
        let heights: Micro = rows.iter().map(|r| self.measurer.row_height(r.row)).sum();
        let gaps = rows.len().saturating_sub(1) as i64;
        heights + self.row_spacing * gaps
    }

    /// Writes working bounds for the rows and their origin cells, top at `y`.
    fn place_rows(&mut self, rows: &[RowInfo], y: Micro) -> Result<Micro, LayoutError> {
        let table_width = self.column_x.last().copied().unwrap_or(Micro::ZERO);
        let mut row_y = y;
        for (i, info) in rows.iter().enumerate() {
            let height = self.measurer.row_height(info.row);
            self.tree
                .set_bounds(info.row, Bounds::new(Micro::ZERO, row_y, table_width, height))?;
            self.tree.set_finished(info.row, true)?;

            for (column, slot) in info.slots.iter().enumerate() {
                let Slot::Origin(cell) = slot else {
                    continue;
                };
                let placement = self.tree.cell(*cell)?.placement();
                let (col_span, row_span) = placement.map_or((1, 1), |p| (p.col_span, p.row_span));
                let spanned = &rows[i..(i + row_span).min(rows.len())];
                let end = (column + col_span).min(self.column_widths.len());
                let width: Micro = self.column_widths[column..end].iter().sum();
                let bounds = Bounds::new(self.column_x[column], row_y, width, self.stack_height(spanned));
                self.tree.set_bounds(*cell, bounds)?;
                self.tree.set_finished(*cell, true)?;
            }
            row_y += height + self.row_spacing;
        }
        Ok(self.stack_height(rows))
    }

    fn settle(&mut self, ids: &[BoxId]) -> Result<(), LayoutError> {
        for id in ids {
            self.tree.mark_seen(*id)?;
            self.tree.commit(*id)?;
            self.tree.clear_dirty(*id)?;
        }
        Ok(())
    }

    /// Repeats the header sections at the top of `page`.
    ///
    /// Header rows are only given bounds on the first page; every page records
    /// the height of the header block, which is where its body rows start.
    fn start_page(
        &mut self,
        page: &mut PageSlice,
        headers: &[BoxId],
        first: bool,
    ) -> Result<Micro, LayoutError> {
        let mut cursor = Micro::ZERO;
        for &header in headers {
            let rows = self.rows(header)?;
            self.tree.set_active(header, true)?;
            let height = if first {
                self.place_rows(&rows, cursor)?
            } else {
                self.stack_height(&rows)
            };
            if !rows.is_empty() {
                cursor += height + self.row_spacing;
            }
            page.header_rows.extend(rows.iter().map(|r| r.row));
        }
        for &header in headers {
            self.tree.set_header_shift(header, page.page_offset, cursor)?;
            self.settle(&[header])?;
        }
        Ok(cursor)
    }

    fn items(&self) -> Result<(Vec<BoxId>, Vec<Item>), LayoutError> {
        let mut headers = Vec::new();
        let mut items = Vec::new();
        let mut footers = Vec::new();
        for &child in self.tree.children(self.table)? {
            let node = self.tree.get(child)?;
            match node.kind() {
                BoxKind::Section(data) => match data.role() {
                    SectionRole::Header => headers.push(child),
                    SectionRole::Body => {
                        for rows in self.groups(data.row_model().rows())? {
                            items.push(Item::Group { section: child, rows });
                        }
                    }
                    SectionRole::Footer => footers.push(child),
                },
                BoxKind::Marker(MarkerKind::PageBreak) => items.push(Item::PageBreak),
                _ => {}
            }
        }
        for footer in footers {
            for rows in self.groups(self.tree.section(footer)?.row_model().rows())? {
                items.push(Item::Group { section: footer, rows });
            }
        }
        Ok((headers, items))
    }

    /// Lays the table out over as many pages as it needs.
    pub fn run(mut self) -> Result<Vec<PageSlice>, LayoutError> {
        let (headers, items) = self.items()?;

        let mut pages = Vec::new();
        let mut page = PageSlice::new(0);
        let mut available = self.first_page_height;
        let mut cursor = self.start_page(&mut page, &headers, true)?;

        for item in items {
            let (section, range) = match item {
                Item::PageBreak => {
                    if !page.rows.is_empty() {
                        debug!("Forced page break after page {}.", page.page_offset);
                        let next = page.page_offset + 1;
                        page.used_height = cursor;
                        pages.push(std::mem::replace(&mut page, PageSlice::new(next)));
                        available = self.page_height;
                        cursor = self.start_page(&mut page, &headers, false)?;
                    }
                    continue;
                }
                Item::Group { section, rows } => (section, rows),
            };

            let all_rows = self.rows(section)?;
            let group = &all_rows[range];
            let ids: Vec<BoxId> = group.iter().map(|r| r.row).collect();

            let mut height = self.place_rows(group, cursor)?;
            let fit = check_child_fit(cursor, height, available);
            if fit.should_break && !page.rows.is_empty() {
                debug!(
                    "Row group starting at {} needs {} but {} is left on page {}, breaking.",
                    ids[0], height, fit.remaining_height, page.page_offset
                );
                for id in &ids {
                    self.tree.rollback(*id, true)?;
                }
                let next = page.page_offset + 1;
                page.used_height = cursor;
                pages.push(std::mem::replace(&mut page, PageSlice::new(next)));
                available = self.page_height;
                cursor = self.start_page(&mut page, &headers, false)?;
                height = self.place_rows(group, cursor)?;
            }
            if check_child_fit(cursor, height, available).should_break {
                warn!(
                    "Row group starting at {} is taller than page {} ({} > {}), placing it anyway.",
                    ids[0],
                    page.page_offset,
                    height,
                    available - cursor
                );
            }

            self.settle(&ids)?;
            page.rows.extend(ids);
            cursor += height + self.row_spacing;
        }

        page.used_height = cursor;
        pages.push(page);
        debug!("Table {} paginated onto {} page(s).", self.table, pages.len());
        Ok(pages)
    }
}
