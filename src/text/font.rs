//! Font handles and text measurement.
//!
//! Fonts are backend capabilities: the engine never rasterizes anything,
//! it only asks a [`Font`] how wide a line would be and how lines stack.
//! Handles are `Arc`s so nodes can reference a backend-owned font without
//! owning it; dropping the last reference (on tree clear or rebuild)
//! releases it.

use std::fmt;
use std::sync::Arc;

use unicode_width::UnicodeWidthStr;

use crate::error::{Error, Result};
use crate::types::Length;

/// Metrics for one run of text in a given font.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Rendered width of the measured run.
    pub width: Length,
    /// Height of a single line.
    pub line_height: Length,
    /// Vertical distance between the tops of consecutive lines.
    pub line_spacing: Length,
}

/// A loaded font, measured by the backend that owns it.
pub trait Font: Send + Sync {
    fn measure(&self, text: &str) -> TextMetrics;
}

impl fmt::Debug for dyn Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Font")
    }
}

/// Resolves font descriptors to handles during tree building.
pub trait FontSource: Send + Sync {
    fn load(&self, descriptor: &str) -> Result<Arc<dyn Font>>;
}

// =============================================================================
// Monospace fonts
// =============================================================================

/// Fixed-advance font: every cell is `advance` units wide, lines are
/// `advance` units tall and stack `advance` apart.
///
/// This is enough for headless embeddings (layout without a rendering
/// backend) and gives tests exact, predictable geometry. Width is the
/// Unicode display width, so CJK and emoji count double.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoFont {
    pub advance: Length,
}

impl Font for MonoFont {
    fn measure(&self, text: &str) -> TextMetrics {
        TextMetrics {
            width: text.width() as Length * self.advance,
            line_height: self.advance,
            line_spacing: self.advance,
        }
    }
}

/// Font source over [`MonoFont`], accepting `"size:<advance>"`
/// descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoFonts;

impl FontSource for MonoFonts {
    fn load(&self, descriptor: &str) -> Result<Arc<dyn Font>> {
        let advance = descriptor
            .strip_prefix("size:")
            .and_then(|n| n.parse::<Length>().ok())
            .filter(|n| n.is_finite() && *n > 0.0)
            .ok_or_else(|| Error::FontLoad {
                descriptor: descriptor.to_owned(),
                reason: "expected \"size:<advance>\"".to_owned(),
            })?;
        Ok(Arc::new(MonoFont { advance }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_measures_per_cell() {
        let font = MonoFont { advance: 10.0 };
        let tm = font.measure("Hello, world");
        assert_eq!(tm.width, 120.0);
        assert_eq!(tm.line_height, 10.0);
        assert_eq!(tm.line_spacing, 10.0);
        assert_eq!(font.measure("").width, 0.0);
    }

    #[test]
    fn source_parses_size_descriptors() {
        let font = MonoFonts.load("size:12").unwrap();
        assert_eq!(font.measure("ab").width, 24.0);
    }

    #[test]
    fn source_rejects_garbage() {
        assert!(matches!(
            MonoFonts.load("comic-sans"),
            Err(Error::FontLoad { .. })
        ));
        assert!(MonoFonts.load("size:nope").is_err());
        assert!(MonoFonts.load("size:-3").is_err());
    }
}
