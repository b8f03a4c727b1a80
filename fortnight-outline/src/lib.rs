//! fortnight-outline: read and write the tab-indented markdown to-do outline.

pub mod error;
pub mod parse;
pub mod render;
pub mod types;

pub use error::{OutlineError, Result};
pub use parse::parse_outline;
pub use render::{ordering_changed, ranking, render_outline};
pub use types::{EventEntry, Heading, Outline, TaskEntry};
