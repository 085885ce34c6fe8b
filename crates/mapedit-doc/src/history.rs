//! Undo/redo history entries.
//!
//! Only the entry record lives here. Entries are allocated one at a time
//! from the document's history pool so that holders can keep them for as
//! long as the history needs; what gets recorded and when is up to the
//! editor.

use crate::element::FixedStr;

/// One recorded editor action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    action: FixedStr<64>,
    description: FixedStr<64>,
}

impl HistoryEntry {
    /// Set the short action label, truncated to 63 bytes.
    pub fn set_action(&mut self, action: &str) {
        self.action.set(action);
    }

    /// Set the longer description, truncated to 63 bytes.
    pub fn set_description(&mut self, description: &str) {
        self.description.set(description);
    }

    /// The action label.
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// The description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}
