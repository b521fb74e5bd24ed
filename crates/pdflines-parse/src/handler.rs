//! Content handler callback trait for content stream interpretation.
//!
//! The interpreter reports every text-showing operator through a
//! [`ContentHandler`]; backends collect those events into raw items.

/// One text-showing operator (`Tj`, `TJ`, `'`, `"`) after decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRunEvent {
    /// Decoded text of the whole run.
    pub text: String,
    /// Text rendering matrix at the start of the run, device space.
    /// Elements 4 and 5 are the horizontal and vertical position.
    pub matrix: [f64; 6],
    /// Font name with any subset prefix removed.
    pub font_name: String,
    /// Font size in text space units.
    pub font_size: f64,
}

/// Receives events while a content stream is interpreted.
pub trait ContentHandler {
    /// Called once per text-showing operator.
    fn on_text_run(&mut self, event: TextRunEvent);

    /// Called for recoverable problems (e.g. a missing font resource).
    /// The default implementation ignores them.
    fn on_warning(&mut self, _message: String) {}
}

/// Handler that stores every event.
#[derive(Debug, Default)]
pub struct CollectingHandler {
    pub runs: Vec<TextRunEvent>,
    pub warnings: Vec<String>,
}

impl ContentHandler for CollectingHandler {
    fn on_text_run(&mut self, event: TextRunEvent) {
        self.runs.push(event);
    }

    fn on_warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}
