//! Change events for the canvas and details panel
//!
//! The session reports every change it makes so a frontend can redraw
//! without diffing the whole graph.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::types::{EdgeId, NodeId, Position, WorkflowEdge, WorkflowNode};

/// Trait for receiving designer events
///
/// This abstracts over the transport (IPC channel, mpsc, test buffer, ...).
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered (e.g., channel closed)
    fn send(&self, event: DesignerEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Events emitted by a designer session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DesignerEvent {
    /// A node was appended to the graph
    NodeAdded { node: WorkflowNode },

    /// A node's data changed
    NodeUpdated { node: WorkflowNode },

    /// A node was moved on the canvas
    #[serde(rename_all = "camelCase")]
    NodeMoved { node_id: NodeId, position: Position },

    /// A node and its edges were removed
    #[serde(rename_all = "camelCase")]
    NodeRemoved {
        node_id: NodeId,
        removed_edges: Vec<EdgeId>,
    },

    /// An edge was recorded
    EdgeAdded { edge: WorkflowEdge },

    /// An edge was removed
    #[serde(rename_all = "camelCase")]
    EdgeRemoved { edge_id: EdgeId },

    /// The selected node changed
    #[serde(rename_all = "camelCase")]
    SelectionChanged { node_id: Option<NodeId> },

    /// A simulation produced a report
    SimulationCompleted { log: Vec<String> },

    /// A simulation found structural errors
    SimulationFailed { error: String },
}

/// Event sink that buffers events in memory
///
/// Useful for headless consumers and tests.
#[derive(Debug, Clone, Default)]
pub struct VecEventSink {
    events: Arc<Mutex<Vec<DesignerEvent>>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered events, leaving the buffer empty
    pub fn drain(&self) -> Vec<DesignerEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: DesignerEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}
