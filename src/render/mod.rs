//! Presentation layer.
//!
//! Pure functions from panel state to display text. Nothing in this module
//! performs I/O or holds state; the host decides where the lines go.

mod format;
mod view;

pub use format::{clock_time, day_heading, due_text, duration_text, short_date};
pub use view::render_panel;
