//! Deciding what the on-page count label shows.

use serde::Serialize;

use crate::domain::model::SelectionChange;
use crate::infra::config::Config;

/// Visibility and text of the count label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LabelState {
    #[default]
    Hidden,
    Visible(String),
}

impl LabelState {
    pub fn message(&self) -> Option<&str> {
        match self {
            LabelState::Hidden => None,
            LabelState::Visible(message) => Some(message.as_str()),
        }
    }
}

/// Maps change notifications onto a [`LabelState`].
#[derive(Debug, Clone)]
pub struct DisplayAdapter {
    noun: String,
    label: LabelState,
}

impl DisplayAdapter {
    pub fn new(noun: impl Into<String>) -> Self {
        Self {
            noun: noun.into(),
            label: LabelState::Hidden,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.display.noun.clone())
    }

    pub fn label(&self) -> &LabelState {
        &self.label
    }

    /// Update the label for `change`. Zero words and cleared selections hide it.
    pub fn apply(&mut self, change: &SelectionChange) -> &LabelState {
        self.label = match change.word_count() {
            0 => LabelState::Hidden,
            count => LabelState::Visible(self.message(count)),
        };
        &self.label
    }

    /// Format `count` with the counted noun, e.g. "3 words".
    pub fn message(&self, count: usize) -> String {
        format!("{count} {}", pluralize(&self.noun, count))
    }
}

impl Default for DisplayAdapter {
    fn default() -> Self {
        Self::new("word")
    }
}

/// English plural of `noun` unless `count` is exactly one.
pub fn pluralize(noun: &str, count: usize) -> String {
    if count == 1 || noun.is_empty() {
        return noun.to_owned();
    }

    let lower = noun.to_ascii_lowercase();
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{noun}es");
    }

    let mut chars = lower.chars().rev();
    if let (Some('y'), Some(before)) = (chars.next(), chars.next())
        && !"aeiou".contains(before)
    {
        return format!("{}ies", &noun[..noun.len() - 1]);
    }

    format!("{noun}s")
}
