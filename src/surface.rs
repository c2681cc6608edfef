//! Display surface: where the widget writes its text, status and labels.

use std::collections::HashMap;

use crate::settings::Control;

pub trait Surface {
    /// Overwrite the animated text.
    fn set_text(&mut self, text: &str);

    fn set_status(&mut self, status: &str);

    /// Toggle the visual typo marker (the `error` CSS class in a browser).
    fn set_error_marker(&mut self, on: bool);

    fn set_label(&mut self, control: Control, label: &str);
}

/// Surface that keeps every write, for tests and headless use.
#[derive(Debug, Default)]
pub struct MemorySurface {
    pub text: String,
    pub status: String,
    pub error_marker: bool,
    pub labels: HashMap<Control, String>,
    /// Every value written to the text, in order.
    pub text_history: Vec<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        MemorySurface::default()
    }

    pub fn label(&self, control: Control) -> Option<&str> {
        self.labels.get(&control).map(String::as_str)
    }
}

impl Surface for MemorySurface {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.text_history.push(self.text.clone());
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    fn set_error_marker(&mut self, on: bool) {
        self.error_marker = on;
    }

    fn set_label(&mut self, control: Control, label: &str) {
        self.labels.insert(control, label.to_string());
    }
}
