use crate::LayoutError;
use crate::config::SpanOverflow;
use crate::model::ColumnModel;
use log::{debug, warn};
use tabula_types::BoxId;

/// The occupancy of one grid position in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Vacant,
    /// The cell starts here.
    Origin(BoxId),
    /// Covered by a cell starting to the left or in an earlier row.
    Covered(BoxId),
}

impl Slot {
    pub fn is_vacant(&self) -> bool {
        matches!(self, Slot::Vacant)
    }

    /// The cell occupying this slot, whether it starts here or not.
    pub fn owner(&self) -> Option<BoxId> {
        match self {
            Slot::Vacant => None,
            Slot::Origin(id) | Slot::Covered(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowInfo {
    pub row: BoxId,
    /// Position of the row within its section.
    pub row_number: usize,
    pub slots: Vec<Slot>,
    pub validation_done: bool,
}

/// A cell waiting to be placed, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRequest {
    pub cell: BoxId,
    pub col_span: usize,
    pub row_span: usize,
}

/// Where a requested cell ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub cell: BoxId,
    pub column_index: usize,
    pub col_span: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPolicy {
    pub auto_layout: bool,
    pub overflow: SpanOverflow,
    pub max_columns: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reservation {
    cell: BoxId,
    rows_left: usize,
}

/// Slot layout of one section.
///
/// Rows are placed one at a time; cells spanning down reserve their columns
/// in the following rows until their span runs out or the section ends.
#[derive(Debug, Clone, Default)]
pub struct RowModel {
    rows: Vec<RowInfo>,
    pending: Vec<Option<Reservation>>,
}

/// The leftmost start at or after `cursor` where `span` slots are vacant.
/// Positions past the end of `slots` are vacant, so only the occupied prefix
/// is scanned.
fn first_fit(slots: &[Slot], cursor: usize, span: usize) -> usize {
    let mut start = cursor;
    while start < slots.len() {
        let end = start.saturating_add(span).min(slots.len());
        match slots[start..end].iter().rposition(|s| !s.is_vacant()) {
            Some(taken) => start += taken + 1,
            None => return start,
        }
    }
    start
}

impl RowModel {
    pub fn rows(&self) -> &[RowInfo] {
        &self.rows
    }

    pub fn row(&self, row_number: usize) -> Option<&RowInfo> {
        self.rows.get(row_number)
    }

    pub fn row_of(&self, row: BoxId) -> Option<&RowInfo> {
        self.rows.iter().find(|r| r.row == row)
    }

    /// Places the cells of the next row.
    ///
    /// Each cell takes the leftmost run of `col_span` vacant slots at or after
    /// the end of the previous cell.
    pub fn place_row(
        &mut self,
        row: BoxId,
        cells: &[CellRequest],
        columns: &mut ColumnModel,
        policy: &PlacementPolicy,
    ) -> Result<Vec<Placement>, LayoutError> {
        let row_number = self.rows.len();
        let mut slots = vec![Slot::Vacant; self.pending.len()];

        for (col, pending) in self.pending.iter_mut().enumerate() {
            if let Some(res) = pending {
                slots[col] = Slot::Covered(res.cell);
                res.rows_left -= 1;
                if res.rows_left == 0 {
                    *pending = None;
                }
            }
        }

        // Fixed only once the row starts, so the first row of a table without
        // column definitions sets the width instead of being held to it.
        let limit = columns.fixed_limit(policy.auto_layout);

        let mut placements = Vec::with_capacity(cells.len());
        let mut cursor = 0;
        for request in cells {
            let mut span = request.col_span.max(1);
            let start = first_fit(&slots, cursor, span);

            if let Some(limit) = limit.filter(|limit| start.saturating_add(span) > *limit) {
                match policy.overflow {
                    SpanOverflow::Clamp if start < limit => {
                        warn!(
                            "Cell {} in row {} spans past column {}, clamping span {} to {}.",
                            request.cell,
                            row_number,
                            limit,
                            span,
                            limit - start
                        );
                        span = limit - start;
                    }
                    _ => {
                        return Err(LayoutError::ColumnOverflow {
                            row: row_number,
                            required: start.saturating_add(span),
                            available: limit,
                        });
                    }
                }
            }

            let end = match start.checked_add(span) {
                Some(end) if end <= policy.max_columns => end,
                _ => {
                    return Err(LayoutError::TooManyColumns {
                        required: start.saturating_add(span),
                        max: policy.max_columns,
                    });
                }
            };
            columns.ensure_columns(end);

            if slots.len() < end {
                slots.resize(end, Slot::Vacant);
            }
            slots[start] = Slot::Origin(request.cell);
            for slot in &mut slots[start + 1..end] {
                *slot = Slot::Covered(request.cell);
            }

            if request.row_span > 1 {
                if self.pending.len() < end {
                    self.pending.resize(end, None);
                }
                for pending in &mut self.pending[start..end] {
                    *pending = Some(Reservation {
                        cell: request.cell,
                        rows_left: request.row_span - 1,
                    });
                }
            }

            placements.push(Placement {
                cell: request.cell,
                column_index: start,
                col_span: span,
            });
            cursor = end;
        }

        self.rows.push(RowInfo {
            row,
            row_number,
            slots,
            validation_done: true,
        });
        Ok(placements)
    }

    /// Ends the section. Returns each cell whose row span was cut short,
    /// with the number of rows it could not cover.
    pub fn finish(&mut self) -> Vec<(BoxId, usize)> {
        let mut truncated: Vec<(BoxId, usize)> = Vec::new();
        for res in self.pending.drain(..).flatten() {
            if !truncated.iter().any(|(cell, _)| *cell == res.cell) {
                debug!(
                    "Row span of cell {} truncated at section end ({} rows missing).",
                    res.cell, res.rows_left
                );
                truncated.push((res.cell, res.rows_left));
            }
        }
        truncated
    }

    /// Extends every row to `count` slots.
    pub fn pad_to(&mut self, count: usize) {
        for info in &mut self.rows {
            if info.slots.len() < count {
                info.slots.resize(count, Slot::Vacant);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> BoxId {
        BoxId::new(n)
    }

    fn req(cell: u32, col_span: usize, row_span: usize) -> CellRequest {
        CellRequest {
            cell: id(cell),
            col_span,
            row_span,
        }
    }

    fn auto() -> PlacementPolicy {
        PlacementPolicy {
            auto_layout: true,
            overflow: SpanOverflow::Reject,
            max_columns: 64,
        }
    }

    #[test]
    fn test_colspan_continuations_are_covered() {
        let mut model = RowModel::default();
        let mut cols = ColumnModel::default();
        model.place_row(id(100), &[req(1, 2, 1)], &mut cols, &auto()).unwrap();
        let placed = model
            .place_row(id(101), &[req(2, 1, 1), req(3, 1, 1)], &mut cols, &auto())
            .unwrap();

        assert_eq!(model.rows()[0].slots, vec![Slot::Origin(id(1)), Slot::Covered(id(1))]);
        assert_eq!(placed[0].column_index, 0);
        assert_eq!(placed[1].column_index, 1);
        assert_eq!(cols.column_count(), 2);
    }

    #[test]
    fn test_rowspan_pushes_later_cells_right() {
        let mut model = RowModel::default();
        let mut cols = ColumnModel::default();
        model
            .place_row(id(100), &[req(1, 1, 3), req(2, 1, 1)], &mut cols, &auto())
            .unwrap();
        let second = model.place_row(id(101), &[req(3, 1, 1)], &mut cols, &auto()).unwrap();
        let third = model.place_row(id(102), &[req(4, 1, 1)], &mut cols, &auto()).unwrap();
        let fourth = model.place_row(id(103), &[req(5, 1, 1)], &mut cols, &auto()).unwrap();

        assert_eq!(second[0].column_index, 1);
        assert_eq!(third[0].column_index, 1);
        assert_eq!(fourth[0].column_index, 0);
        assert_eq!(model.rows()[2].slots[0], Slot::Covered(id(1)));
        assert!(model.finish().is_empty());
    }

    #[test]
    fn test_finish_reports_truncated_rowspans() {
        let mut model = RowModel::default();
        let mut cols = ColumnModel::default();
        model.place_row(id(100), &[req(1, 2, 4)], &mut cols, &auto()).unwrap();
        model.place_row(id(101), &[], &mut cols, &auto()).unwrap();
        assert_eq!(model.finish(), vec![(id(1), 2)]);
    }

    #[test]
    fn test_fixed_layout_overflow_policies() {
        let fixed = |overflow| PlacementPolicy {
            auto_layout: false,
            overflow,
            max_columns: 64,
        };

        let mut cols = ColumnModel::default();
        cols.add_column(id(50), None, 2);
        let mut model = RowModel::default();
        let err = model
            .place_row(id(100), &[req(1, 1, 1), req(2, 2, 1)], &mut cols, &fixed(SpanOverflow::Reject))
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::ColumnOverflow {
                row: 0,
                required: 3,
                available: 2
            }
        );

        let mut model = RowModel::default();
        let placed = model
            .place_row(id(100), &[req(1, 1, 1), req(2, 2, 1)], &mut cols, &fixed(SpanOverflow::Clamp))
            .unwrap();
        assert_eq!(placed[1].col_span, 1);
        assert_eq!(cols.column_count(), 2);
    }

    #[test]
    fn test_fixed_layout_without_definitions_takes_first_row_width() {
        let fixed = PlacementPolicy {
            auto_layout: false,
            ..auto()
        };
        let mut cols = ColumnModel::default();
        let mut model = RowModel::default();
        let first = model
            .place_row(id(100), &[req(1, 1, 1), req(2, 1, 1), req(3, 1, 1)], &mut cols, &fixed)
            .unwrap();
        assert_eq!(first[2].column_index, 2);
        assert_eq!(cols.column_count(), 3);

        let second = model
            .place_row(id(101), &[req(4, 2, 1), req(5, 1, 1)], &mut cols, &fixed)
            .unwrap();
        assert_eq!(second[1].column_index, 2);

        let err = model
            .place_row(id(102), &[req(6, 1, 1), req(7, 3, 1)], &mut cols, &fixed)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::ColumnOverflow {
                row: 2,
                required: 4,
                available: 3
            }
        );
    }

    #[test]
    fn test_huge_spans_fail_fast() {
        let mut model = RowModel::default();
        let mut cols = ColumnModel::default();
        let err = model
            .place_row(id(100), &[req(1, 1, 1), req(2, usize::MAX, 1)], &mut cols, &auto())
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::TooManyColumns {
                required: usize::MAX,
                max: 64
            }
        );

        let err = model
            .place_row(id(101), &[req(3, 500_000_000, 1)], &mut cols, &auto())
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::TooManyColumns {
                required: 500_000_000,
                max: 64
            }
        );
        assert_eq!(cols.column_count(), 1);
    }

    #[test]
    fn test_first_fit_skips_occupied_runs() {
        let a = Slot::Covered(id(1));
        let slots = [a, Slot::Vacant, a, Slot::Vacant, Slot::Vacant];
        assert_eq!(first_fit(&slots, 0, 1), 1);
        assert_eq!(first_fit(&slots, 0, 2), 3);
        assert_eq!(first_fit(&slots, 0, 3), 3);
        assert_eq!(first_fit(&slots, 0, usize::MAX), 3);
        assert_eq!(first_fit(&slots, 7, 2), 7);
    }

    #[test]
    fn test_max_columns_is_enforced() {
        let mut model = RowModel::default();
        let mut cols = ColumnModel::default();
        let policy = PlacementPolicy {
            max_columns: 3,
            ..auto()
        };
        let err = model.place_row(id(100), &[req(1, 4, 1)], &mut cols, &policy).unwrap_err();
        assert_eq!(err, LayoutError::TooManyColumns { required: 4, max: 3 });
    }
}
