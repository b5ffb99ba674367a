//! Conversion options (§6): the small configuration surface a caller can tune per page.
//!
//! Built as a builder-method struct in the same idiom as `PdfDocumentReference`'s
//! `with_title`/`with_author`/... methods, adapted to a read-oriented options record instead
//! of a document-metadata builder.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::font::FontDescriptor;

/// A caller-pluggable callback resolving a font descriptor this crate cannot embed (not
/// present in the PDF, or a format we can't parse) to a substitute to use for layout and
/// glyph shaping. Returning `None` falls back to a generic builtin metric-compatible font.
pub type FontResolver = Arc<dyn Fn(&FontDescriptor) -> Option<Vec<u8>> + Send + Sync>;

/// A simple atomic flag the caller can raise from another thread to abort an in-progress
/// conversion. Checked between content-stream operators and between top-level parsed objects.
#[derive(Clone, Default)]
pub struct CancellationSignal(Arc<AtomicBool>);

impl CancellationSignal {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-page conversion options. Unknown keys reaching this struct via a caller-facing
/// deserialization layer (not part of this crate's core) should be rejected with
/// [`crate::errors::Error::InvalidArgument`] before construction.
#[derive(Clone)]
pub struct ConversionOptions {
    pub(crate) min_stroke_width: f32,
    pub(crate) include_hidden_text: bool,
    pub(crate) font_resolver: Option<FontResolver>,
    pub(crate) cancellation: Option<CancellationSignal>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            min_stroke_width: 0.0,
            include_hidden_text: false,
            font_resolver: None,
            cancellation: None,
        }
    }
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamps every emitted stroke width to at least this many user-space units. Useful for
    /// hairline strokes that would otherwise disappear when rasterized at low DPI.
    pub fn with_min_stroke_width(mut self, width: f32) -> Self {
        self.min_stroke_width = width;
        self
    }

    /// Whether text with render mode 3 (invisible, used e.g. for OCR text layers) is still
    /// emitted to the SVG (hidden via `visibility: hidden` or omitted entirely).
    pub fn with_include_hidden_text(mut self, include: bool) -> Self {
        self.include_hidden_text = include;
        self
    }

    pub fn with_font_resolver(mut self, resolver: FontResolver) -> Self {
        self.font_resolver = Some(resolver);
        self
    }

    pub fn with_cancellation(mut self, signal: CancellationSignal) -> Self {
        self.cancellation = Some(signal);
        self
    }

    pub(crate) fn check_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|s| s.is_cancelled())
            .unwrap_or(false)
    }

    /// Asks the caller-supplied font resolver for a substitute font program, if one is set.
    pub(crate) fn resolve_font(&self, descriptor: &FontDescriptor) -> Option<Vec<u8>> {
        self.font_resolver.as_ref().and_then(|resolve| resolve(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_do_not_cancel() {
        let opts = ConversionOptions::new();
        assert!(!opts.check_cancelled());
    }

    #[test]
    fn cancellation_signal_is_observed() {
        let sig = CancellationSignal::new();
        let opts = ConversionOptions::new().with_cancellation(sig.clone());
        assert!(!opts.check_cancelled());
        sig.cancel();
        assert!(opts.check_cancelled());
    }

    #[test]
    fn builder_methods_are_chainable() {
        let opts = ConversionOptions::new()
            .with_min_stroke_width(0.5)
            .with_include_hidden_text(true);
        assert_eq!(opts.min_stroke_width, 0.5);
        assert!(opts.include_hidden_text);
    }
}
