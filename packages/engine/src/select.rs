//! Interactive-selection capability.
//!
//! The orchestrator never touches a terminal directly; it asks an injected
//! `PluginSelector` for the user's choice, so batch logic stays testable
//! without one.

use crate::error::PluginError;

/// One selectable row in a plugin menu.
#[derive(Debug, Clone)]
pub struct SelectItem {
    /// Identifier returned when the row is chosen.
    pub identifier: String,
    /// Short label shown to the user.
    pub label: String,
    /// Supporting description shown next to the label.
    pub description: String,
}

/// Multi-selection over plugin menus.
///
/// Implementations return the chosen identifiers. An empty vector means the
/// user selected nothing or cancelled; callers treat that as a non-error
/// "nothing selected" outcome.
pub trait PluginSelector {
    fn select(&self, prompt: &str, items: &[SelectItem]) -> Result<Vec<String>, PluginError>;
}
