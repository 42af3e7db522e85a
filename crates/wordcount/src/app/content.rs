//! Per-page wiring of the watcher, the count label, and activation messages.

use std::time::Duration;

use tracing::debug;

use crate::app::display::{DisplayAdapter, LabelState};
use crate::app::platform::SignalTarget;
use crate::app::watcher::{Lifecycle, SelectionWatcher};
use crate::domain::model::{ActivationMessage, Trigger};
use crate::infra::config::Config;
use crate::infra::document::Document;
use crate::infra::page::PageHost;

const ESCAPE_KEY: &str = "Escape";

/// A raw event raised by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEvent {
    pub trigger: Trigger,
    /// Key name for keyboard events.
    pub key: Option<String>,
}

impl PageEvent {
    pub fn new(trigger: Trigger) -> Self {
        Self { trigger, key: None }
    }

    pub fn key_down(key: impl Into<String>) -> Self {
        Self {
            trigger: Trigger::KeyDown,
            key: Some(key.into()),
        }
    }

    fn is_escape(&self) -> bool {
        self.trigger == Trigger::KeyDown && self.key.as_deref() == Some(ESCAPE_KEY)
    }
}

/// The page side of the extension.
#[derive(Debug)]
pub struct ContentScript {
    watcher: SelectionWatcher<PageHost>,
    display: DisplayAdapter,
    label_updates: Vec<LabelState>,
}

impl ContentScript {
    pub fn new(document: Document, config: &Config) -> Self {
        Self {
            watcher: SelectionWatcher::from_config(PageHost::new(document), config),
            display: DisplayAdapter::from_config(config),
            label_updates: Vec::new(),
        }
    }

    pub fn watcher(&self) -> &SelectionWatcher<PageHost> {
        &self.watcher
    }

    pub fn document(&self) -> &Document {
        &self.watcher.host().document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.watcher.host_mut().document
    }

    pub fn label(&self) -> &LabelState {
        self.display.label()
    }

    /// Label states produced since the last call, in emission order.
    pub fn drain_label_updates(&mut self) -> Vec<LabelState> {
        std::mem::take(&mut self.label_updates)
    }

    /// Start or stop counting as instructed by the background process.
    pub fn on_message(&mut self, message: ActivationMessage) {
        debug!(active = message.active, "activation message received");
        if message.active {
            self.watcher.start();
        } else {
            self.watcher.stop();
        }
        self.flush();
    }

    /// Deliver a page event. Returns a message for the background process when
    /// the event asks to deactivate (Escape).
    pub fn dispatch(&mut self, event: &PageEvent) -> Option<ActivationMessage> {
        if self.watcher.host().is_subscribed(event.trigger) {
            self.watcher.handle(event.trigger);
            self.flush();
        }

        event
            .is_escape()
            .then_some(ActivationMessage { active: false })
    }

    /// Let `by` elapse on the page clock and run every deferred trigger that fell due.
    pub fn advance(&mut self, by: Duration) {
        let due = self.watcher.host_mut().advance(by);
        for trigger in due {
            if self.watcher.host().is_subscribed(trigger) {
                self.watcher.handle(trigger);
            }
        }
        self.flush();
    }

    fn flush(&mut self) {
        for change in self.watcher.host_mut().drain_changes() {
            let label = self.display.apply(&change).clone();
            self.label_updates.push(label);
        }
    }
}
