pub mod format;

pub use format::format_number;
