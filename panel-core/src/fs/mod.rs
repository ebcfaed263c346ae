pub mod loader;
pub mod source;

pub use loader::{load_panel, panel_from_table};
pub use source::{RawTable, SourceFormat};
