//! Headless page combining a document, its event subscriptions, a timer queue,
//! and an outbox of change notifications.

use std::time::Duration;

use crate::app::platform::{
    ChangeSink, DocumentPosition, NodeId, NodeKind, PlatformError, RawSelection, Scheduler,
    SelectionPlatform, SignalTarget,
};
use crate::domain::model::{SelectionChange, Trigger};
use crate::infra::document::Document;
use crate::infra::events::{EventRegistry, TimerQueue};

#[derive(Debug, Clone, Default)]
pub struct PageHost {
    pub document: Document,
    pub events: EventRegistry,
    pub timers: TimerQueue,
    outbox: Vec<SelectionChange>,
}

impl PageHost {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Take every notification emitted since the last drain.
    pub fn drain_changes(&mut self) -> Vec<SelectionChange> {
        std::mem::take(&mut self.outbox)
    }

    pub fn advance(&mut self, by: Duration) -> Vec<Trigger> {
        self.timers.advance(by)
    }
}

impl SelectionPlatform for PageHost {
    fn selection(&self) -> Result<Option<RawSelection>, PlatformError> {
        self.document.selection()
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.document.node_kind(node)
    }

    fn text_data(&self, node: NodeId) -> Option<&str> {
        self.document.text_data(node)
    }

    fn compare_document_position(&self, reference: NodeId, other: NodeId) -> DocumentPosition {
        self.document.compare_document_position(reference, other)
    }
}

impl SignalTarget for PageHost {
    fn subscribe(&mut self, trigger: Trigger) {
        self.events.subscribe(trigger);
    }

    fn unsubscribe(&mut self, trigger: Trigger) {
        self.events.unsubscribe(trigger);
    }

    fn is_subscribed(&self, trigger: Trigger) -> bool {
        self.events.is_subscribed(trigger)
    }
}

impl Scheduler for PageHost {
    fn schedule(&mut self, delay: Duration, trigger: Trigger) {
        self.timers.schedule(delay, trigger);
    }
}

impl ChangeSink for PageHost {
    fn emit(&mut self, change: SelectionChange) {
        self.outbox.emit(change);
    }
}
