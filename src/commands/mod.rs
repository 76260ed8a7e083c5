pub mod inspect;
pub mod report;
pub mod sqlite_inspector;

pub use inspect::inspect;
pub use report::{OutputFormat, Reporter};
pub use sqlite_inspector::SqliteInspector;
