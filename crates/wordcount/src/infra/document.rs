//! In-memory document model implementing [`SelectionPlatform`].
//!
//! Nodes are stored flat in document order. Text nodes carry character data,
//! element nodes only mark structure and contribute no text to a selection.

use thiserror::Error;

use crate::app::platform::{
    DocumentPosition, Endpoint, NodeId, NodeKind, PlatformError, RawSelection, SelectionPlatform,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("offset {offset} is out of range for node {node:?} of length {len}")]
    OffsetOutOfRange {
        node: NodeId,
        offset: usize,
        len: usize,
    },
    #[error("a selection must contain at least one range")]
    NoRanges,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    data: String,
}

#[derive(Debug, Clone)]
struct DocumentSelection {
    anchor: Endpoint,
    focus: Endpoint,
    range_count: usize,
    reported_text: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    selection: Option<DocumentSelection>,
    unavailable: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text node and return its handle.
    pub fn push_text(&mut self, data: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text, data.into())
    }

    /// Append an element node and return its handle.
    pub fn push_element(&mut self) -> NodeId {
        self.push(NodeKind::Element, String::new())
    }

    fn push(&mut self, kind: NodeKind, data: String) -> NodeId {
        self.nodes.push(Node { kind, data });
        NodeId(self.nodes.len() - 1)
    }

    /// Select a single range from `anchor` to `focus`. Either order is accepted.
    pub fn select(&mut self, anchor: Endpoint, focus: Endpoint) -> Result<(), DocumentError> {
        self.validate(anchor)?;
        self.validate(focus)?;
        self.selection = Some(DocumentSelection {
            anchor,
            focus,
            range_count: 1,
            reported_text: None,
        });
        Ok(())
    }

    /// Collapse the selection to a caret at `at`.
    pub fn collapse(&mut self, at: Endpoint) -> Result<(), DocumentError> {
        self.select(at, at)
    }

    /// Remove the selection entirely.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Pretend the current selection spans `count` ranges.
    pub fn set_range_count(&mut self, count: usize) -> Result<(), DocumentError> {
        if count == 0 {
            return Err(DocumentError::NoRanges);
        }
        if let Some(selection) = self.selection.as_mut() {
            selection.range_count = count;
        }
        Ok(())
    }

    /// Override the flattened text reported for the current selection, emulating
    /// browsers whose selection stringification drifts from the selected range.
    /// Reset by the next [`Document::select`].
    pub fn set_reported_text(&mut self, text: impl Into<String>) {
        if let Some(selection) = self.selection.as_mut() {
            selection.reported_text = Some(text.into());
        }
    }

    /// Make selection reads fail with `reason` until cleared with `None`.
    pub fn set_unavailable(&mut self, reason: Option<String>) {
        self.unavailable = reason;
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn validate(&self, endpoint: Endpoint) -> Result<(), DocumentError> {
        let node = self
            .node(endpoint.node)
            .ok_or(DocumentError::UnknownNode(endpoint.node))?;
        let len = match node.kind {
            NodeKind::Text => node.data.chars().count(),
            NodeKind::Element => 1,
        };
        if endpoint.offset > len {
            return Err(DocumentError::OffsetOutOfRange {
                node: endpoint.node,
                offset: endpoint.offset,
                len,
            });
        }
        Ok(())
    }

    /// Text covered between two endpoints, in document order.
    fn flatten(&self, anchor: Endpoint, focus: Endpoint) -> String {
        let (start, end) = if (anchor.node, anchor.offset) <= (focus.node, focus.offset) {
            (anchor, focus)
        } else {
            (focus, anchor)
        };

        let mut text = String::new();
        for index in start.node.0..=end.node.0 {
            let Some(node) = self.nodes.get(index) else {
                break;
            };
            if node.kind != NodeKind::Text {
                continue;
            }
            let from = if index == start.node.0 { start.offset } else { 0 };
            let to = if index == end.node.0 {
                end.offset
            } else {
                usize::MAX
            };
            text.extend(node.data.chars().skip(from).take(to.saturating_sub(from)));
        }
        text
    }
}

impl SelectionPlatform for Document {
    fn selection(&self) -> Result<Option<RawSelection>, PlatformError> {
        if let Some(reason) = &self.unavailable {
            return Err(PlatformError(reason.clone()));
        }

        Ok(self.selection.as_ref().map(|selection| RawSelection {
            text: selection
                .reported_text
                .clone()
                .unwrap_or_else(|| self.flatten(selection.anchor, selection.focus)),
            anchor: selection.anchor,
            focus: selection.focus,
            range_count: selection.range_count,
        }))
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).map(|node| node.kind)
    }

    fn text_data(&self, node: NodeId) -> Option<&str> {
        self.node(node)
            .filter(|node| node.kind == NodeKind::Text)
            .map(|node| node.data.as_str())
    }

    fn compare_document_position(&self, reference: NodeId, other: NodeId) -> DocumentPosition {
        if self.node(reference).is_none() || self.node(other).is_none() {
            return DocumentPosition::Disconnected;
        }
        match other.cmp(&reference) {
            std::cmp::Ordering::Less => DocumentPosition::Preceding,
            std::cmp::Ordering::Equal => DocumentPosition::Same,
            std::cmp::Ordering::Greater => DocumentPosition::Following,
        }
    }
}
