//! Platform abstraction traits for selection observation.
//!
//! These traits define the interface between the counting engine and the host
//! page (browser DOM, a headless document model, etc.). The watcher only talks
//! to the page through them.

use std::sync::mpsc::Sender;
use std::time::Duration;

use thiserror::Error;

use crate::domain::model::{SelectionChange, Trigger};

/// Error raised by a platform when reading the selection fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("platform error: {0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Opaque handle to a node in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Element,
}

/// Position of one node relative to a reference node in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPosition {
    Same,
    Preceding,
    Following,
    Disconnected,
}

/// One end of a selection: a node and an offset into it.
///
/// For text nodes the offset counts characters into the node's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub node: NodeId,
    pub offset: usize,
}

impl Endpoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The platform's current selection as read in a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSelection {
    /// Flattened selection text.
    pub text: String,
    pub anchor: Endpoint,
    pub focus: Endpoint,
    pub range_count: usize,
}

/// Read access to the host's selection and document structure.
pub trait SelectionPlatform {
    /// Current selection, `Ok(None)` when the page has no selection object.
    fn selection(&self) -> Result<Option<RawSelection>, PlatformError>;

    /// Kind of a node, `None` if the node no longer exists.
    fn node_kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Character data of a text node.
    fn text_data(&self, node: NodeId) -> Option<&str>;

    /// Where `other` sits relative to `reference` in document order.
    fn compare_document_position(&self, reference: NodeId, other: NodeId) -> DocumentPosition;
}

/// Explicit observer registration for trigger signals on a page.
pub trait SignalTarget {
    fn subscribe(&mut self, trigger: Trigger);

    fn unsubscribe(&mut self, trigger: Trigger);

    fn is_subscribed(&self, trigger: Trigger) -> bool;
}

/// Deferred delivery of a trigger. Best effort; scheduled work is never cancelled.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, trigger: Trigger);
}

/// Consumer of the change notification stream.
pub trait ChangeSink {
    fn emit(&mut self, change: SelectionChange);
}

impl ChangeSink for Vec<SelectionChange> {
    fn emit(&mut self, change: SelectionChange) {
        self.push(change);
    }
}

impl ChangeSink for Sender<SelectionChange> {
    fn emit(&mut self, change: SelectionChange) {
        // A closed receiver just means nobody is displaying counts anymore.
        let _ = self.send(change);
    }
}

/// Everything a [`SelectionWatcher`](crate::app::watcher::SelectionWatcher) needs from its page.
pub trait WatcherHost: SelectionPlatform + SignalTarget + Scheduler + ChangeSink {}

impl<T> WatcherHost for T where T: SelectionPlatform + SignalTarget + Scheduler + ChangeSink {}
