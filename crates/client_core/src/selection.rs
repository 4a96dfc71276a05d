use std::collections::HashSet;

use shared::domain::Username;
use tracing::debug;

/// Tri-state of a "select all" checkbox derived from the selection size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl SelectAllState {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Unchecked => "[ ]",
            Self::Indeterminate => "[-]",
            Self::Checked => "[x]",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    members: HashSet<Username>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `username` if absent, removes it otherwise. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, username: &Username) -> bool {
        let selected = if self.members.remove(username.as_str()) {
            false
        } else {
            self.members.insert(username.clone());
            true
        };
        debug!(%username, selected, "selection toggled");
        selected
    }

    /// Replaces the membership with exactly `universe`.
    pub fn select_all<'a, I>(&mut self, universe: I)
    where
        I: IntoIterator<Item = &'a Username>,
    {
        self.members = universe.into_iter().cloned().collect();
        debug!(size = self.members.len(), "selection set to universe");
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn remove(&mut self, username: &str) -> bool {
        self.members.remove(username)
    }

    pub fn is_selected(&self, username: &str) -> bool {
        self.members.contains(username)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn tri_state(&self, universe_len: usize) -> SelectAllState {
        match self.size() {
            0 => SelectAllState::Unchecked,
            n if n >= universe_len => SelectAllState::Checked,
            _ => SelectAllState::Indeterminate,
        }
    }
}
