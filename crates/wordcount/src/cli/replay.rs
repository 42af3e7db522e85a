//! Replaying scripted page sessions through a [`ContentScript`].
//!
//! A script lists the page's nodes and a sequence of steps:
//!
//! ```json
//! {
//!   "nodes": [{ "kind": "text", "text": "Hello " }, { "kind": "text", "text": "world" }],
//!   "steps": [
//!     "toggle",
//!     { "select": { "anchor": [0, 0], "focus": [1, 5] } },
//!     { "event": "pointer-up" },
//!     { "advance": { "ms": 20 } },
//!     { "key": "Escape" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::activation::{ActivationController, TabId};
use crate::app::content::{ContentScript, PageEvent};
use crate::app::display::LabelState;
use crate::app::platform::{Endpoint, NodeId};
use crate::domain::model::{ActivationMessage, Trigger};
use crate::infra::config::Config;
use crate::infra::document::Document;

/// The page being replayed is the only open tab.
const REPLAY_TAB: TabId = TabId(0);

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeSpec {
    Text { text: String },
    Element,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Activation message sent to the background process on behalf of the page.
    Message(ActivationMessage),
    /// Toolbar button pressed.
    Toggle,
    /// Select from `anchor` to `focus`, each `[node index, offset]`.
    Select {
        anchor: [usize; 2],
        focus: [usize; 2],
    },
    /// Override the flattened text of the current selection.
    ReportedText(String),
    /// Mark the selection as spanning several ranges.
    Ranges(usize),
    Clear,
    /// Page event by trigger name, e.g. `"pointer-up"`.
    Event(String),
    /// Key-down of a named key.
    Key(String),
    Advance {
        ms: u64,
    },
}

/// One label change observed while replaying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayLine {
    /// Zero-based index of the step that caused the change.
    pub step: usize,
    pub label: LabelState,
}

impl ReplayScript {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read replay script {}", path.display()))?;
        Self::from_json(&data)
            .with_context(|| format!("invalid replay script {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).context("failed to parse replay script")
    }

    fn document(&self) -> Document {
        let mut document = Document::new();
        for node in &self.nodes {
            match node {
                NodeSpec::Text { text } => document.push_text(text.clone()),
                NodeSpec::Element => document.push_element(),
            };
        }
        document
    }
}

/// Run `script` against a fresh page and collect every label change.
///
/// Activation goes through a background [`ActivationController`] holding the
/// page as its single tab, so an Escape key press deactivates the tab there
/// before the page is told to stop.
pub fn replay(script: &ReplayScript, config: &Config) -> Result<Vec<ReplayLine>> {
    let mut session = Session {
        content: ContentScript::new(script.document(), config),
        controller: ActivationController::from_config(config),
    };
    session.controller.open_tab(REPLAY_TAB);
    let mut lines = Vec::new();

    for (index, step) in script.steps.iter().enumerate() {
        session
            .run_step(step)
            .with_context(|| format!("step {index} failed"))?;
        lines.extend(
            session
                .content
                .drain_label_updates()
                .into_iter()
                .map(|label| ReplayLine { step: index, label }),
        );
    }

    info!(steps = script.steps.len(), changes = lines.len(), "replay finished");
    Ok(lines)
}

struct Session {
    content: ContentScript,
    controller: ActivationController,
}

impl Session {
    fn run_step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Message(message) => self.deliver(*message),
            Step::Toggle => {
                if let Some(update) = self.controller.toggle(REPLAY_TAB) {
                    self.content.on_message(update.message);
                }
            }
            Step::Select { anchor, focus } => {
                self.content
                    .document_mut()
                    .select(endpoint(*anchor), endpoint(*focus))?;
            }
            Step::ReportedText(text) => {
                self.content.document_mut().set_reported_text(text.clone());
            }
            Step::Ranges(count) => self.content.document_mut().set_range_count(*count)?,
            Step::Clear => self.content.document_mut().clear_selection(),
            Step::Event(name) => {
                let trigger: Trigger = name.parse()?;
                self.dispatch(&PageEvent::new(trigger));
            }
            Step::Key(key) => self.dispatch(&PageEvent::key_down(key.clone())),
            Step::Advance { ms } => self.content.advance(Duration::from_millis(*ms)),
        }
        Ok(())
    }

    fn dispatch(&mut self, event: &PageEvent) {
        if let Some(message) = self.content.dispatch(event) {
            self.deliver(message);
        }
    }

    /// Record `message` for the tab and forward the resulting update to the page.
    fn deliver(&mut self, message: ActivationMessage) {
        if let Some(update) = self.controller.on_message(REPLAY_TAB, message) {
            self.content.on_message(update.message);
        }
    }
}

fn endpoint([node, offset]: [usize; 2]) -> Endpoint {
    Endpoint::new(NodeId(node), offset)
}
