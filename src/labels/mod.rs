//! Tick label formats, styles and rendering.

pub mod format;
pub mod formatter;

pub use format::{LabelFormat, LabelStyle, ScalarFormat};
pub use formatter::format_tick;
