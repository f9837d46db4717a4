use serde::{Deserialize, Serialize};

/// A user-configured shortcut and the text it expands to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub shortcut: String,
    pub expansion: String,
}

impl Trigger {
    pub fn new(shortcut: impl Into<String>, expansion: impl Into<String>) -> Self {
        Self {
            shortcut: shortcut.into(),
            expansion: expansion.into(),
        }
    }

    /// Case-insensitive substring match over both fields
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.shortcut.to_lowercase().contains(&query)
            || self.expansion.to_lowercase().contains(&query)
    }

    /// Number of chars the shortcut occupies before the caret
    pub fn shortcut_len(&self) -> usize {
        self.shortcut.chars().count()
    }
}

/// Triggers written to a fresh store on first run
pub fn default_triggers() -> Vec<Trigger> {
    vec![
        Trigger::new(";m", "user@example.com"),
        Trigger::new(";n", "John Doe"),
        Trigger::new(";t", "+1 234 567 890"),
    ]
}
