//! Evaluation Context

use crate::PluginRegistry;
use std::sync::Arc;

/// Default locale when the host does not pick one
pub const DEFAULT_LOCALE: &str = "en";

/// Evaluation context passed to plugins
///
/// Carries the host's formatting preferences; plugins build their
/// formatters from it on each call.
#[derive(Clone)]
pub struct EvalContext {
    /// Maximum fraction digits shown in formatted numbers
    pub precision: u32,
    /// Locale identifier, e.g. "en_US" or "de"
    pub locale: String,
    pub registry: Arc<PluginRegistry>,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            precision: 2,
            locale: DEFAULT_LOCALE.to_string(),
            registry,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}
