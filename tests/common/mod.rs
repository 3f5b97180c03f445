pub mod fixtures;
pub mod page_assertions;

use serde_json::Value;
use tabula::layout::PageSlice;
use tabula::types::Micro;
use tabula::{LoadedTable, TableDocument, TabulaError};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Width given to every column by [`paginate`].
pub const COLUMN_WIDTH_PT: i64 = 100;
/// Height given to every row by [`paginate`].
pub const ROW_HEIGHT_PT: i64 = 10;

/// A paginated table together with its plain-text rendering.
pub struct RenderedPages {
    pub pages: Vec<PageSlice>,
    pub text: String,
}

impl RenderedPages {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The data lines of page `index` (zero based), without the page marker.
    pub fn page_lines(&self, index: usize) -> Vec<&str> {
        let marker = format!("--- page {} ---", index + 1);
        self.text
            .lines()
            .skip_while(|line| *line != marker)
            .skip(1)
            .take_while(|line| !line.starts_with("--- page "))
            .collect()
    }
}

/// Builds a table from a JSON document.
pub fn load(document: &Value) -> Result<LoadedTable, TabulaError> {
    let document: TableDocument = serde_json::from_value(document.clone())?;
    document.build()
}

/// Paginates with uniform column widths and row heights, then renders the pages to text.
pub fn paginate(loaded: &mut LoadedTable, page_height_pt: f64) -> Result<RenderedPages, TabulaError> {
    let pages = loaded.paginate_uniform(
        Micro::from_external(page_height_pt),
        Micro::from_units(COLUMN_WIDTH_PT),
        Micro::from_units(ROW_HEIGHT_PT),
    )?;
    let mut out = Vec::new();
    tabula::write_pages(loaded, &pages, &mut out)?;
    let text = String::from_utf8(out).map_err(|e| TabulaError::Document(e.to_string()))?;
    Ok(RenderedPages { pages, text })
}

/// Loads and paginates in one step.
pub fn render_document(document: &Value, page_height_pt: f64) -> Result<RenderedPages, TabulaError> {
    let mut loaded = load(document)?;
    paginate(&mut loaded, page_height_pt)
}
