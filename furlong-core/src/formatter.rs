//! The formatter abstraction shared by all value formatters

use crate::Value;

/// Converts values to display text and back.
///
/// Implementations are configured once and then used read-only, so a single
/// instance can be shared across threads. Failures come back as
/// `Value::Error`, never as panics.
pub trait Formatter: Send + Sync {
    /// Short identifier, e.g. "length"
    fn name(&self) -> &'static str;

    /// Render a value as display text (`Value::Text` on success)
    fn format_value(&self, value: &Value) -> Value;

    /// Parse display text back into a structured value
    fn parse_text(&self, text: &str) -> Value;

    /// Both directions at once: parse, then render the parsed value again
    fn normalize(&self, text: &str) -> Value {
        match self.parse_text(text) {
            Value::Error(e) => Value::Error(e),
            parsed => self.format_value(&parsed),
        }
    }
}
