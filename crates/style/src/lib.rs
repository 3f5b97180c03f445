pub mod border;
pub mod parsers;
pub mod stylesheet;
pub mod table;

pub use border::{Border, BorderStyle, Side};
pub use parsers::StyleParseError;
pub use stylesheet::{BoxStyle, Stylesheet};
pub use table::{BorderCollapse, EmptyCells, TableLayout, TableStyle};
