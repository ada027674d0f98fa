//! Callbacks from the content stream interpreter.
//!
//! The interpreter reports every rectangle and every shown string through a
//! [`ContentHandler`]. [`PagePrimitives`] is the handler used to collect a
//! page's primitives for table reconstruction.

use atsmmi_core::ExtractWarning;

/// A rectangle appended to the current path with `re`.
///
/// Coordinates are in page space with the CTM applied, normalised so that
/// `width` and `height` are never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectEvent {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A string shown by `Tj`, `TJ`, `'` or `"`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEvent {
    /// Text origin in page space.
    pub x: f64,
    pub y: f64,
    /// Decoded text of the whole operator.
    pub text: String,
    /// Resource name of the current font (e.g. `"F1"`).
    pub font_name: String,
    pub font_size: f64,
}

/// Receiver of interpreter events.
///
/// All methods default to no-ops so implementors subscribe only to what
/// they need.
pub trait ContentHandler {
    /// Called for each `re` operator.
    fn on_rect(&mut self, _event: RectEvent) {}

    /// Called for each text showing operator.
    fn on_text(&mut self, _event: TextEvent) {}

    /// Called for non-fatal issues; interpretation continues.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}

/// Collects the primitives of one page.
#[derive(Debug, Clone, Default)]
pub struct PagePrimitives {
    /// `(x, y, w, h)` of every rectangle.
    pub rects: Vec<(f64, f64, f64, f64)>,
    /// `(x, y, text)` of every text run.
    pub texts: Vec<(f64, f64, String)>,
    pub warnings: Vec<ExtractWarning>,
}

impl PagePrimitives {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentHandler for PagePrimitives {
    fn on_rect(&mut self, event: RectEvent) {
        self.rects.push((event.x, event.y, event.width, event.height));
    }

    fn on_text(&mut self, event: TextEvent) {
        self.texts.push((event.x, event.y, event.text));
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        self.warnings.push(warning);
    }
}
