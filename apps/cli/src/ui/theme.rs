use console::style;
use std::fmt;

/// The central color palette for the Slipstream CLI.
pub struct Theme;

impl Theme {
    /// Primary color (Cyan) - structure, informational output.
    pub fn primary(text: impl fmt::Display) -> String {
        format!("{}", style(text).cyan().bold())
    }

    /// Success color (Green)
    pub fn success(text: impl fmt::Display) -> String {
        format!("{}", style(text).green().bold())
    }

    /// Warning color (Yellow)
    pub fn warning(text: impl fmt::Display) -> String {
        format!("{}", style(text).yellow().bold())
    }

    /// Error color (Red)
    pub fn error(text: impl fmt::Display) -> String {
        format!("{}", style(text).red().bold())
    }

    /// Muted/dimmed color - metadata, hints.
    pub fn muted(text: impl fmt::Display) -> String {
        format!("{}", style(text).dim())
    }
}
