use serde::{Deserialize, Serialize};

/// All user intents (actions) that can be performed in the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Quit the application
    Quit,

    /// Switch to next tab
    NextTab,

    /// Switch to previous tab
    PrevTab,

    /// Jump straight to a tab by position
    SelectTab(usize),

    /// Switch to next color scheme
    SwitchTheme,

    /// Save current configuration
    SaveConfig,

    /// No operation
    Tick,
}
