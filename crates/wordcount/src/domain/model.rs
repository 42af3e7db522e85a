//! Domain models for selection snapshots, change notifications, and activation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Immutable capture of a text selection at one observation instant.
///
/// Instances are only produced for a non-empty, single-range selection. The
/// absence of a selection is modelled as `Option::None`, never as a snapshot
/// with zero counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot {
    text: String,
    word_count: usize,
    character_count: usize,
}

impl SelectionSnapshot {
    pub(crate) fn new(text: String, word_count: usize, character_count: usize) -> Self {
        Self {
            text,
            word_count,
            character_count,
        }
    }

    /// Raw selected text at capture time.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn character_count(&self) -> usize {
        self.character_count
    }

    /// Field-wise equality against a possibly absent snapshot.
    ///
    /// Text is compared alongside the counts so two different selections with
    /// identical counts are still seen as a change.
    pub fn is_equal(&self, other: Option<&SelectionSnapshot>) -> bool {
        other.is_some_and(|other| {
            self.word_count == other.word_count
                && self.character_count == other.character_count
                && self.text == other.text
        })
    }
}

/// A single emission of the change notification stream.
///
/// `selection` is `None` when a previously observed selection went away (or the
/// watcher stopped).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SelectionChange {
    pub selection: Option<SelectionSnapshot>,
}

impl SelectionChange {
    pub fn selected(snapshot: SelectionSnapshot) -> Self {
        Self {
            selection: Some(snapshot),
        }
    }

    pub fn cleared() -> Self {
        Self { selection: None }
    }

    /// Word count carried by the notification, zero when cleared.
    pub fn word_count(&self) -> usize {
        self.selection
            .as_ref()
            .map_or(0, SelectionSnapshot::word_count)
    }
}

/// Signals that cause the watcher to re-evaluate the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    PointerMove,
    PointerDown,
    PointerUp,
    KeyDown,
    KeyUp,
    Scroll,
    /// Internal re-check, raised on start and shortly after pointer presses.
    Recheck,
}

impl Trigger {
    /// Every trigger the watcher subscribes to while listening.
    pub const ALL: [Trigger; 7] = [
        Trigger::PointerMove,
        Trigger::PointerDown,
        Trigger::PointerUp,
        Trigger::KeyDown,
        Trigger::KeyUp,
        Trigger::Scroll,
        Trigger::Recheck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::PointerMove => "pointer-move",
            Trigger::PointerDown => "pointer-down",
            Trigger::PointerUp => "pointer-up",
            Trigger::KeyDown => "key-down",
            Trigger::KeyUp => "key-up",
            Trigger::Scroll => "scroll",
            Trigger::Recheck => "recheck",
        }
    }

    /// Pointer presses may finish changing the selection after the event is
    /// dispatched, so they warrant a deferred re-check.
    pub fn schedules_recheck(&self) -> bool {
        matches!(self, Trigger::PointerDown | Trigger::PointerUp)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses page-originated triggers. The synthetic re-check is rejected.
impl FromStr for Trigger {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let trigger = match normalized.as_str() {
            "pointer-move" | "mousemove" => Trigger::PointerMove,
            "pointer-down" | "mousedown" => Trigger::PointerDown,
            "pointer-up" | "mouseup" => Trigger::PointerUp,
            "key-down" | "keydown" => Trigger::KeyDown,
            "key-up" | "keyup" => Trigger::KeyUp,
            "scroll" => Trigger::Scroll,
            "recheck" => return Err(DomainError::SyntheticTrigger(normalized)),
            other => return Err(DomainError::UnknownTrigger(other.to_string())),
        };
        Ok(trigger)
    }
}

/// Extension-wide activation state of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivationState {
    Active,
    #[default]
    Inactive,
}

impl ActivationState {
    pub fn is_active(&self) -> bool {
        matches!(self, ActivationState::Active)
    }

    pub fn toggled(&self) -> Self {
        match self {
            ActivationState::Active => ActivationState::Inactive,
            ActivationState::Inactive => ActivationState::Active,
        }
    }
}

impl From<bool> for ActivationState {
    fn from(active: bool) -> Self {
        if active {
            ActivationState::Active
        } else {
            ActivationState::Inactive
        }
    }
}

/// Message exchanged between extension components, `{ "active": bool }` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationMessage {
    pub active: bool,
}

impl ActivationMessage {
    pub fn state(&self) -> ActivationState {
        ActivationState::from(self.active)
    }
}

impl From<ActivationState> for ActivationMessage {
    fn from(state: ActivationState) -> Self {
        Self {
            active: state.is_active(),
        }
    }
}
