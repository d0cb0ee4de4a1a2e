//! Console message capture for engine sessions.
//!
//! The synthesized page does not log through the console; its sink is a page
//! global read back after the run. Console traffic is captured alongside so
//! that page-level errors (syntax errors, failed resources) show up in
//! diagnostics when a probe produces unexpected output.

use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

/// The severity level of a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Info,
    Warning,
    Error,
    Debug,
    /// Catch-all for other console APIs
    Other,
}

impl ConsoleLevel {
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, ConsoleLevel::Error)
    }
}

impl From<&EventConsoleApiCalled> for ConsoleLevel {
    fn from(event: &EventConsoleApiCalled) -> Self {
        use chromiumoxide::cdp::js_protocol::runtime::ConsoleApiCalledType;

        match event.r#type {
            ConsoleApiCalledType::Log => ConsoleLevel::Log,
            ConsoleApiCalledType::Info => ConsoleLevel::Info,
            ConsoleApiCalledType::Warning => ConsoleLevel::Warning,
            ConsoleApiCalledType::Error => ConsoleLevel::Error,
            ConsoleApiCalledType::Debug => ConsoleLevel::Debug,
            _ => ConsoleLevel::Other,
        }
    }
}

/// A captured console message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,

    /// The formatted message text. Multiple arguments are joined with spaces.
    pub text: String,

    /// Source location if available (e.g., "data:text/html:12:5").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ConsoleMessage {
    #[must_use]
    pub fn new(level: ConsoleLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }
}

/// Thread-safe console message accumulator.
///
/// Cheaply cloneable; the CDP listener task pushes while the session drains
/// after each probe. Messages keep arrival order.
#[derive(Debug, Clone, Default)]
pub struct ConsoleCapture {
    messages: Arc<Mutex<Vec<ConsoleMessage>>>,
}

impl ConsoleCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message. A poisoned lock drops the message; the panic that
    /// poisoned it is the failure worth reporting.
    pub(crate) fn push(&self, message: ConsoleMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }

    /// Removes and returns everything captured so far.
    pub fn drain(&self) -> Vec<ConsoleMessage> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.level.is_error())
            .count()
    }

    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }
}

/// Converts a CDP `Runtime.consoleAPICalled` event into a [`ConsoleMessage`].
///
/// String arguments are used verbatim; other primitives use their JSON form
/// and objects fall back to the remote object description.
pub(crate) fn parse_console_event(event: &EventConsoleApiCalled) -> ConsoleMessage {
    let level = ConsoleLevel::from(event);

    let text = event
        .args
        .iter()
        .map(|arg| match &arg.value {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => arg
                .description
                .clone()
                .unwrap_or_else(|| "<object>".to_string()),
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut message = ConsoleMessage::new(level, text);

    if let Some(frame) = event
        .stack_trace
        .as_ref()
        .and_then(|trace| trace.call_frames.first())
    {
        message = message.with_source(format!(
            "{}:{}:{}",
            frame.url, frame.line_number, frame.column_number
        ));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_buffer_in_order() {
        let capture = ConsoleCapture::new();
        capture.push(ConsoleMessage::new(ConsoleLevel::Log, "first"));
        capture.push(ConsoleMessage::new(ConsoleLevel::Error, "second"));

        let drained = capture.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].text, "first");
        assert_eq!(drained[1].level, ConsoleLevel::Error);
        assert!(capture.drain().is_empty());
    }

    #[test]
    fn clones_share_the_buffer() {
        let capture = ConsoleCapture::new();
        let listener = capture.clone();
        listener.push(ConsoleMessage::new(ConsoleLevel::Error, "Uncaught SyntaxError"));

        assert_eq!(capture.error_count(), 1);

        capture.clear();
        assert_eq!(listener.error_count(), 0);
        assert!(listener.drain().is_empty());
    }

    #[test]
    fn serializes_level_in_lowercase() {
        let message = ConsoleMessage::new(ConsoleLevel::Warning, "careful")
            .with_source("data:text/html:3:1".to_string());
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["source"], "data:text/html:3:1");
    }
}
