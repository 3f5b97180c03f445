use log::info;
use std::env;
use std::fs;
use std::io::{self, Write};
use tabula::types::Micro;
use tabula::{TableDocument, TabulaError, write_pages};

/// US Letter height minus one-inch margins, in points.
const DEFAULT_PAGE_HEIGHT: f64 = 648.0;
const COLUMN_WIDTH: f64 = 72.0;
const ROW_HEIGHT: f64 = 14.0;

/// Loads a table document, paginates it and prints each page as delimited text.
fn main() -> Result<(), TabulaError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Lays out a JSON table description and prints it page by page.");
        eprintln!();
        eprintln!("Usage: {} <path/to/table.json> [page-height-pt]", args[0]);
        std::process::exit(1);
    }

    let page_height = match args.get(2) {
        Some(value) => value
            .parse::<f64>()
            .map_err(|e| TabulaError::Document(format!("invalid page height '{}': {}", value, e)))?,
        None => DEFAULT_PAGE_HEIGHT,
    };

    info!("Loading table from {}", args[1]);
    let json = fs::read_to_string(&args[1])?;
    let document = TableDocument::from_json(&json)?;
    let mut loaded = document.build()?;

    let pages = loaded.paginate_uniform(
        Micro::from_external(page_height),
        Micro::from_external(COLUMN_WIDTH),
        Micro::from_external(ROW_HEIGHT),
    )?;
    info!("Table laid out on {} page(s)", pages.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_pages(&loaded, &pages, &mut out)?;
    out.flush()?;
    Ok(())
}
