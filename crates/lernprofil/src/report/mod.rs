//! Human-readable renderings of a scored profile.

mod text;

pub use text::render_text_report;
