//! Border values carried by cells and the collapsing border model.
//!
//! In the separate model a cell's effective border is its specified border.
//! In the collapsing model each cell edge is shared with whatever lies on the
//! other side (a neighbour cell, or the row, section, column and table edges
//! at boundaries) and a single winner is picked per edge.

use crate::LayoutError;
use crate::model::{ColumnModel, RowModel};
use crate::nodes::CellPlacement;
use crate::tree::BoxTree;
use std::collections::HashMap;
use tabula_style::{Border, BorderStyle, BoxStyle, Side};
use tabula_types::{BoxId, Color, Micro};

/// A single resolved border edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeBorder {
    pub width: Micro,
    pub style: BorderStyle,
    pub color: Color,
}

impl EdgeBorder {
    pub const NONE: EdgeBorder = EdgeBorder {
        width: Micro::ZERO,
        style: BorderStyle::None,
        color: Color::BLACK,
    };

    pub fn is_visible(&self) -> bool {
        self.style.is_visible() && self.width > Micro::ZERO
    }
}

impl Default for EdgeBorder {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<Border> for EdgeBorder {
    fn from(border: Border) -> Self {
        Self {
            width: Micro::from_external(border.width as f64),
            style: border.style,
            color: border.color,
        }
    }
}

/// All four edges of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellBorder {
    pub top: EdgeBorder,
    pub right: EdgeBorder,
    pub bottom: EdgeBorder,
    pub left: EdgeBorder,
}

impl CellBorder {
    pub fn uniform(edge: EdgeBorder) -> Self {
        Self {
            top: edge,
            right: edge,
            bottom: edge,
            left: edge,
        }
    }

    pub fn get(&self, side: Side) -> EdgeBorder {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set(&mut self, side: Side, edge: EdgeBorder) {
        match side {
            Side::Top => self.top = edge,
            Side::Right => self.right = edge,
            Side::Bottom => self.bottom = edge,
            Side::Left => self.left = edge,
        }
    }
}

/// Border sides as given by a style; `None` means not set on that box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecifiedBorder {
    pub top: Option<EdgeBorder>,
    pub right: Option<EdgeBorder>,
    pub bottom: Option<EdgeBorder>,
    pub left: Option<EdgeBorder>,
}

impl SpecifiedBorder {
    pub fn from_style(style: &BoxStyle) -> Self {
        let side = |s| style.border_side(s).map(EdgeBorder::from);
        Self {
            top: side(Side::Top),
            right: side(Side::Right),
            bottom: side(Side::Bottom),
            left: side(Side::Left),
        }
    }

    pub fn get(&self, side: Side) -> Option<EdgeBorder> {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// The border as drawn in the separate model.
    pub fn to_cell_border(&self) -> CellBorder {
        CellBorder {
            top: self.top.unwrap_or_default(),
            right: self.right.unwrap_or_default(),
            bottom: self.bottom.unwrap_or_default(),
            left: self.left.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BorderOrigin {
    Table,
    ColumnGroup,
    Column,
    Section,
    Row,
    Cell,
}

impl BorderOrigin {
    fn priority(self) -> u8 {
        match self {
            BorderOrigin::Cell => 6,
            BorderOrigin::Row => 5,
            BorderOrigin::Section => 4,
            BorderOrigin::Column => 3,
            BorderOrigin::ColumnGroup => 2,
            BorderOrigin::Table => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    edge: EdgeBorder,
    origin: BorderOrigin,
}

/// Picks the winning edge among the candidates of one cell edge.
///
/// Cell candidates are explicit settings; when any exists, inherited
/// candidates do not compete. Then: hidden wins, none loses, wider wins,
/// higher style rank wins, higher origin priority wins, earlier wins.
fn resolve_candidates(candidates: &[Candidate]) -> EdgeBorder {
    let explicit: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.origin == BorderOrigin::Cell)
        .collect();
    let pool: Vec<&Candidate> = if explicit.is_empty() {
        candidates.iter().collect()
    } else {
        explicit
    };

    if let Some(hidden) = pool.iter().find(|c| c.edge.style == BorderStyle::Hidden) {
        return EdgeBorder {
            width: Micro::ZERO,
            ..hidden.edge
        };
    }

    let mut best: Option<&Candidate> = None;
    for candidate in pool.into_iter().filter(|c| c.edge.style != BorderStyle::None) {
        let key = |c: &Candidate| (c.edge.width, c.edge.style.rank(), c.origin.priority());
        match best {
            Some(current) if key(candidate) <= key(current) => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|c| c.edge).unwrap_or(EdgeBorder::NONE)
}

/// One row of the table-wide grid, across all sections in order.
struct GridRow {
    row: BoxId,
    section: BoxId,
    first_in_section: bool,
    last_in_section: bool,
    owners: Vec<Option<BoxId>>,
}

struct Collector<'a> {
    tree: &'a BoxTree,
    table: BoxId,
    columns: &'a ColumnModel,
    grid: Vec<GridRow>,
    column_count: usize,
}

impl<'a> Collector<'a> {
    fn style_side(&self, id: BoxId, side: Side) -> Result<Option<EdgeBorder>, LayoutError> {
        Ok(self.tree.get(id)?.style().border_side(side).map(EdgeBorder::from))
    }

    fn cell_side(&self, cell: BoxId, side: Side) -> Result<Option<EdgeBorder>, LayoutError> {
        Ok(self.tree.cell(cell)?.specified_border.get(side))
    }

    fn push(
        &self,
        out: &mut Vec<Candidate>,
        edge: Option<EdgeBorder>,
        origin: BorderOrigin,
    ) {
        if let Some(edge) = edge {
            out.push(Candidate { edge, origin });
        }
    }

    fn push_box(
        &self,
        out: &mut Vec<Candidate>,
        id: BoxId,
        side: Side,
        origin: BorderOrigin,
    ) -> Result<(), LayoutError> {
        let edge = self.style_side(id, side)?;
        self.push(out, edge, origin);
        Ok(())
    }

    /// Cells on the other side of an edge, without duplicates or `cell` itself.
    fn neighbours(&self, cell: BoxId, positions: impl Iterator<Item = (usize, usize)>) -> Vec<BoxId> {
        let mut found = Vec::new();
        for (r, c) in positions {
            let owner = self.grid.get(r).and_then(|row| row.owners.get(c).copied().flatten());
            if let Some(owner) = owner.filter(|o| *o != cell && !found.contains(o)) {
                found.push(owner);
            }
        }
        found
    }

    fn group_range(&self, group: BoxId) -> Option<(usize, usize)> {
        let members = self.columns.columns().iter().filter(|c| c.group == Some(group));
        members.fold(None, |acc, c| match acc {
            None => Some((c.index, c.end())),
            Some((start, end)) => Some((start.min(c.index), end.max(c.end()))),
        })
    }

    /// Column and column-group candidates for the vertical line at `boundary`.
    fn push_column_line(&self, out: &mut Vec<Candidate>, boundary: usize) -> Result<(), LayoutError> {
        let before = boundary
            .checked_sub(1)
            .and_then(|c| self.columns.column_at(c))
            .filter(|info| info.end() == boundary);
        if let Some(info) = before {
            self.push_box(out, info.column, Side::Right, BorderOrigin::Column)?;
            let group_end = info.group.filter(|g| {
                self.group_range(*g).map(|(_, end)| end) == Some(boundary)
            });
            if let Some(group) = group_end {
                self.push_box(out, group, Side::Right, BorderOrigin::ColumnGroup)?;
            }
        }

        let after = self
            .columns
            .column_at(boundary)
            .filter(|info| info.index == boundary);
        if let Some(info) = after {
            self.push_box(out, info.column, Side::Left, BorderOrigin::Column)?;
            let group_start = info.group.filter(|g| {
                self.group_range(*g).map(|(start, _)| start) == Some(boundary)
            });
            if let Some(group) = group_start {
                self.push_box(out, group, Side::Left, BorderOrigin::ColumnGroup)?;
            }
        }
        Ok(())
    }

    /// Column and group candidates on the table's outer top or bottom edge.
    fn push_column_caps(
        &self,
        out: &mut Vec<Candidate>,
        cols: std::ops::Range<usize>,
        side: Side,
    ) -> Result<(), LayoutError> {
        let mut seen: Vec<BoxId> = Vec::new();
        for c in cols {
            if let Some(info) = self.columns.column_at(c) {
                if !seen.contains(&info.column) {
                    seen.push(info.column);
                    self.push_box(out, info.column, side, BorderOrigin::Column)?;
                }
                if let Some(group) = info.group.filter(|g| !seen.contains(g)) {
                    seen.push(group);
                    self.push_box(out, group, side, BorderOrigin::ColumnGroup)?;
                }
            }
        }
        Ok(())
    }

    fn edge(
        &self,
        cell: BoxId,
        r0: usize,
        c0: usize,
        row_span: usize,
        col_span: usize,
        side: Side,
    ) -> Result<EdgeBorder, LayoutError> {
        let last_row = r0 + row_span - 1;
        let end_col = c0 + col_span;
        let mut out = Vec::new();

        self.push(&mut out, self.cell_side(cell, side)?, BorderOrigin::Cell);

        match side {
            Side::Top | Side::Bottom => {
                let (here, across) = if side == Side::Top {
                    (r0, r0.checked_sub(1))
                } else {
                    (last_row, Some(last_row + 1).filter(|r| *r < self.grid.len()))
                };
                if let Some(across) = across {
                    for n in self.neighbours(cell, (c0..end_col).map(|c| (across, c))) {
                        self.push(&mut out, self.cell_side(n, side.opposite())?, BorderOrigin::Cell);
                    }
                }

                let row = &self.grid[here];
                self.push_box(&mut out, row.row, side, BorderOrigin::Row)?;
                if let Some(across) = across {
                    self.push_box(&mut out, self.grid[across].row, side.opposite(), BorderOrigin::Row)?;
                }

                let at_section_edge = if side == Side::Top {
                    row.first_in_section
                } else {
                    row.last_in_section
                };
                if at_section_edge {
                    self.push_box(&mut out, row.section, side, BorderOrigin::Section)?;
                    if let Some(across) = across {
                        let other = self.grid[across].section;
                        self.push_box(&mut out, other, side.opposite(), BorderOrigin::Section)?;
                    }
                }

                if across.is_none() {
                    self.push_column_caps(&mut out, c0..end_col, side)?;
                    self.push_box(&mut out, self.table, side, BorderOrigin::Table)?;
                }
            }
            Side::Left | Side::Right => {
                let (boundary, across) = if side == Side::Left {
                    (c0, c0.checked_sub(1))
                } else {
                    (end_col, Some(end_col).filter(|c| *c < self.column_count))
                };
                if let Some(across) = across {
                    for n in self.neighbours(cell, (r0..=last_row).map(|r| (r, across))) {
                        self.push(&mut out, self.cell_side(n, side.opposite())?, BorderOrigin::Cell);
                    }
                }

                if across.is_none() {
                    for r in r0..=last_row {
                        self.push_box(&mut out, self.grid[r].row, side, BorderOrigin::Row)?;
                    }
                    let mut sections: Vec<BoxId> = Vec::new();
                    for r in r0..=last_row {
                        if !sections.contains(&self.grid[r].section) {
                            sections.push(self.grid[r].section);
                        }
                    }
                    for section in sections {
                        self.push_box(&mut out, section, side, BorderOrigin::Section)?;
                    }
                }

                self.push_column_line(&mut out, boundary)?;

                if across.is_none() {
                    self.push_box(&mut out, self.table, side, BorderOrigin::Table)?;
                }
            }
        }

        Ok(resolve_candidates(&out))
    }
}

/// Resolves the collapsed border of every placed cell in `sections`. Spans
/// come from `placements` since nothing has been written to the tree yet.
pub(crate) fn resolve_collapsed(
    tree: &BoxTree,
    table: BoxId,
    columns: &ColumnModel,
    sections: &[(BoxId, &RowModel)],
    placements: &HashMap<BoxId, CellPlacement>,
) -> Result<Vec<(BoxId, CellBorder)>, LayoutError> {
    let column_count = columns.column_count();
    let mut grid = Vec::new();
    for (section, model) in sections {
        let rows = model.rows();
        for (i, info) in rows.iter().enumerate() {
            let mut owners: Vec<Option<BoxId>> = info.slots.iter().map(|s| s.owner()).collect();
            owners.resize(column_count, None);
            grid.push(GridRow {
                row: info.row,
                section: *section,
                first_in_section: i == 0,
                last_in_section: i + 1 == rows.len(),
                owners,
            });
        }
    }

    let mut origins: HashMap<BoxId, (usize, usize)> = HashMap::new();
    let mut order = Vec::new();
    let mut global = 0;
    for (_, model) in sections {
        for info in model.rows() {
            for (c, slot) in info.slots.iter().enumerate() {
                if let crate::model::Slot::Origin(cell) = slot {
                    origins.insert(*cell, (global, c));
                    order.push(*cell);
                }
            }
            global += 1;
        }
    }

    let collector = Collector {
        tree,
        table,
        columns,
        grid,
        column_count,
    };

    let mut resolved = Vec::with_capacity(order.len());
    for cell in order {
        let Some(&(r0, c0)) = origins.get(&cell) else {
            continue;
        };
        let Some(placement) = placements.get(&cell) else {
            continue;
        };
        let mut border = CellBorder::default();
        for side in Side::ALL {
            let edge = collector.edge(cell, r0, c0, placement.row_span, placement.col_span, side)?;
            border.set(side, edge);
        }
        resolved.push((cell, border));
    }
    Ok(resolved)
}
