pub mod format_resolver;

pub use format_resolver::{DEFAULT_FORMATS, FormatResolver};
