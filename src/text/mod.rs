//! Text wrapping and measurement.

mod font;
mod wrap;

pub use font::{Font, FontSource, MonoFont, MonoFonts, TextMetrics};
pub use wrap::{TextElem, WordWrap};
