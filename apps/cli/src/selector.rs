use slipstream_engine::{PluginError, PluginSelector, SelectItem};

/// `PluginSelector` backed by an interactive terminal menu.
pub struct TerminalSelector;

impl PluginSelector for TerminalSelector {
    fn select(&self, prompt: &str, items: &[SelectItem]) -> Result<Vec<String>, PluginError> {
        let mut menu = cliclack::multiselect(prompt).required(false);
        for item in items {
            menu = menu.item(
                item.identifier.clone(),
                item.label.clone(),
                item.description.clone(),
            );
        }
        match menu.interact() {
            Ok(chosen) => Ok(chosen),
            // Cancellation (Esc / ctrl-c) is "nothing selected", not an error.
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => Ok(Vec::new()),
            Err(err) => Err(PluginError::Io(err)),
        }
    }
}
