//! Per-tab activation state and toolbar appearance.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::domain::model::{ActivationMessage, ActivationState};
use crate::infra::config::{Activation, Config};

/// Browser tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u32);

/// Everything a tab needs after its state changed: toolbar icon and title for
/// that tab, and the message to deliver to its content script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabUpdate {
    pub tab: TabId,
    pub state: ActivationState,
    pub icon: BTreeMap<String, String>,
    pub title: String,
    pub message: ActivationMessage,
}

/// Tracks which tabs have counting enabled.
///
/// State is kept separately per tab; a tab is active iff it is in the active
/// set. Updates are only produced for tabs that are currently open.
#[derive(Debug, Clone)]
pub struct ActivationController {
    appearance: Activation,
    open_tabs: BTreeSet<TabId>,
    active_tabs: BTreeSet<TabId>,
}

impl ActivationController {
    pub fn new(appearance: Activation) -> Self {
        Self {
            appearance,
            open_tabs: BTreeSet::new(),
            active_tabs: BTreeSet::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.activation.clone())
    }

    pub fn open_tab(&mut self, tab: TabId) {
        self.open_tabs.insert(tab);
    }

    pub fn state(&self, tab: TabId) -> ActivationState {
        ActivationState::from(self.active_tabs.contains(&tab))
    }

    pub fn active_tabs(&self) -> impl Iterator<Item = TabId> + '_ {
        self.active_tabs.iter().copied()
    }

    /// Record `state` for `tab` and describe the resulting update, if the tab is open.
    pub fn set_state(&mut self, tab: TabId, state: ActivationState) -> Option<TabUpdate> {
        match state {
            ActivationState::Active => self.active_tabs.insert(tab),
            ActivationState::Inactive => self.active_tabs.remove(&tab),
        };

        if !self.open_tabs.contains(&tab) {
            debug!(tab = tab.0, ?state, "ignoring update for closed tab");
            return None;
        }

        debug!(tab = tab.0, ?state, "tab activation changed");
        Some(TabUpdate {
            tab,
            state,
            icon: self.appearance.icon(state).clone(),
            title: self.appearance.title(state).to_owned(),
            message: ActivationMessage::from(state),
        })
    }

    /// Toolbar button pressed while `tab` is focused.
    pub fn toggle(&mut self, tab: TabId) -> Option<TabUpdate> {
        let next = self.state(tab).toggled();
        self.set_state(tab, next)
    }

    /// An extension message arrived on behalf of `tab`.
    pub fn on_message(&mut self, tab: TabId, message: ActivationMessage) -> Option<TabUpdate> {
        self.set_state(tab, message.state())
    }

    /// A tab reloaded or navigated. Active tabs get their state re-sent so the
    /// fresh page resumes counting.
    pub fn on_tab_updated(&mut self, tab: TabId) -> Option<TabUpdate> {
        self.open_tab(tab);
        match self.state(tab) {
            ActivationState::Active => self.set_state(tab, ActivationState::Active),
            ActivationState::Inactive => None,
        }
    }

    /// A tab or its window was closed.
    pub fn on_tab_removed(&mut self, tab: TabId) {
        self.open_tabs.remove(&tab);
        self.set_state(tab, ActivationState::Inactive);
    }
}

impl Default for ActivationController {
    fn default() -> Self {
        Self::new(Activation::default())
    }
}
