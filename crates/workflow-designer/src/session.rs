//! Designer session
//!
//! The single owner of a workflow graph, the current selection and the
//! last simulation result. Every user interaction goes through a method on
//! [`DesignerSession`]; nothing else holds a mutable handle to the graph.
//!
//! Share a session between threads only through [`SharedSession`], whose
//! lock serializes writers.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::DesignerConfig;
use crate::constants::sample;
use crate::events::{DesignerEvent, EventSink};
use crate::graph::WorkflowGraph;
use crate::registry::{FieldDefinition, NodeTypeDefinition, NodeTypeRegistry};
use crate::selection::{FieldValue, Selection};
use crate::simulation::{run_simulation, SimulationOutcome};
use crate::types::{
    fields, NodeData, NodeId, NodeType, Position, WorkflowEdge, WorkflowNode,
};

/// A session shared across threads
pub type SharedSession = Arc<RwLock<DesignerSession>>;

/// State behind one designer window
pub struct DesignerSession {
    graph: WorkflowGraph,
    selection: Selection,
    registry: NodeTypeRegistry,
    config: DesignerConfig,
    /// Lines of the last successful simulation
    simulation_log: Vec<String>,
    /// Combined message of the last failed simulation
    simulation_error: Option<String>,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl DesignerSession {
    /// Create a session, seeding the sample node if configured
    pub fn new(config: DesignerConfig) -> Self {
        let mut graph = WorkflowGraph::new();
        if config.seed_sample_node {
            let data = NodeData::new(NodeType::Task).with_label(sample::LABEL);
            graph.insert_node(WorkflowNode::new(
                sample::ID,
                Position::new(sample::X, sample::Y),
                data,
            ));
        }

        Self {
            graph,
            selection: Selection::new(),
            registry: NodeTypeRegistry::new(),
            config,
            simulation_log: Vec::new(),
            simulation_error: None,
            event_sink: None,
        }
    }

    /// Attach a sink that receives every change event
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Wrap the session for sharing across threads
    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    fn emit(&self, event: DesignerEvent) {
        if let Some(sink) = &self.event_sink {
            if let Err(e) = sink.send(event) {
                log::warn!("Failed to deliver designer event: {}", e);
            }
        }
    }

    fn emit_node_updated(&self, node_id: &str) {
        if let Some(node) = self.graph.find_node(node_id) {
            self.emit(DesignerEvent::NodeUpdated { node: node.clone() });
        }
    }

    // =========================================================================
    // Graph interactions
    // =========================================================================

    /// Add a node from the palette
    pub fn add_node(&mut self, node_type: NodeType) -> NodeId {
        let id = self
            .graph
            .add_node(&self.registry, &self.config.layout, node_type);
        if let Some(node) = self.graph.find_node(&id) {
            self.emit(DesignerEvent::NodeAdded { node: node.clone() });
        }
        id
    }

    /// Record a connection drawn on the canvas
    pub fn connect(&mut self, source: &str, target: &str) -> bool {
        if !self.graph.connect(source, target) {
            return false;
        }
        if let Some(edge) = self.graph.edges().last() {
            self.emit(DesignerEvent::EdgeAdded { edge: edge.clone() });
        }
        true
    }

    /// Store a position reported by the canvas
    pub fn move_node(&mut self, node_id: &str, position: Position) -> bool {
        if !self.graph.move_node(node_id, position) {
            return false;
        }
        self.emit(DesignerEvent::NodeMoved {
            node_id: node_id.to_string(),
            position,
        });
        true
    }

    /// Remove a node and its edges
    ///
    /// A selection pointing at the removed node is cleared.
    pub fn remove_node(&mut self, node_id: &str) -> Option<WorkflowNode> {
        let removed_edges = self.graph.edges_touching(node_id);
        let node = self.graph.remove_node(node_id)?;
        self.emit(DesignerEvent::NodeRemoved {
            node_id: node.id.clone(),
            removed_edges,
        });
        if self.selection.is_selected(node_id) {
            self.clear_selection();
        }
        Some(node)
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, edge_id: &str) -> Option<WorkflowEdge> {
        let edge = self.graph.remove_edge(edge_id)?;
        self.emit(DesignerEvent::EdgeRemoved {
            edge_id: edge.id.clone(),
        });
        Some(edge)
    }

    /// Merge field changes into any node's data
    pub fn patch_node_data<I, K, V>(&mut self, node_id: &str, changes: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        if !self.graph.patch_node_data(node_id, changes) {
            return false;
        }
        self.emit_node_updated(node_id);
        true
    }

    // =========================================================================
    // Selection and details panel
    // =========================================================================

    /// Select the clicked node
    pub fn node_clicked(&mut self, node_id: &str) {
        self.selection.select(node_id);
        self.emit(DesignerEvent::SelectionChanged {
            node_id: Some(node_id.to_string()),
        });
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.emit(DesignerEvent::SelectionChanged { node_id: None });
    }

    /// Merge field changes into the selected node
    ///
    /// No-op without a resolvable selection.
    pub fn patch_selected<I, K, V>(&mut self, changes: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        if !self.selection.patch_selected(&mut self.graph, changes) {
            return false;
        }
        if let Some(id) = self.selection.selected_id() {
            self.emit_node_updated(id);
        }
        true
    }

    /// Apply a single field edit from the details panel
    ///
    /// Returns false when nothing resolves as selected or the field does not
    /// belong to the selected node's type.
    pub fn edit_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let applies = self
            .selected_node()
            .is_some_and(|node| node.data.get(field).is_some());
        if !applies {
            log::debug!("Ignoring edit of '{}': not a field of the selection", field);
            return false;
        }
        let value: String = value.into();
        self.patch_selected([(field, value)])
    }

    /// Rename the selected node
    pub fn edit_label(&mut self, label: impl Into<String>) -> bool {
        self.edit_field(fields::LABEL, label)
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Run a simulation and keep its result for display
    ///
    /// A completed run replaces the log and clears the error; a failed run
    /// sets the error and clears the log.
    pub fn run_simulation(&mut self) -> SimulationOutcome {
        let outcome = run_simulation(&self.graph);
        match outcome.error_message() {
            Some(error) => {
                self.simulation_log.clear();
                self.simulation_error = Some(error.clone());
                self.emit(DesignerEvent::SimulationFailed { error });
            }
            None => {
                self.simulation_log = outcome.log();
                self.simulation_error = None;
                self.emit(DesignerEvent::SimulationCompleted {
                    log: self.simulation_log.clone(),
                });
            }
        }
        outcome
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &[WorkflowNode] {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[WorkflowEdge] {
        self.graph.edges()
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    /// Node types in palette order
    pub fn palette(&self) -> &[NodeTypeDefinition] {
        self.registry.palette()
    }

    /// Raw selected id, which may not resolve
    pub fn selected_node_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    pub fn selected_node(&self) -> Option<&WorkflowNode> {
        self.selection.resolve(&self.graph)
    }

    /// Editable fields of the selected node, `label` first
    pub fn selected_fields(&self) -> Vec<FieldDefinition> {
        self.selection.fields(&self.graph, &self.registry)
    }

    /// Editable fields of the selected node with their values
    pub fn selected_field_values(&self) -> Vec<FieldValue> {
        self.selection.field_values(&self.graph, &self.registry)
    }

    pub fn simulation_log(&self) -> &[String] {
        &self.simulation_log
    }

    pub fn simulation_error(&self) -> Option<&str> {
        self.simulation_error.as_deref()
    }
}

impl Default for DesignerSession {
    fn default() -> Self {
        Self::new(DesignerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VecEventSink;

    fn empty_session() -> DesignerSession {
        DesignerSession::new(DesignerConfig {
            seed_sample_node: false,
            ..DesignerConfig::default()
        })
    }

    #[test]
    fn test_default_session_has_sample_node() {
        let session = DesignerSession::default();
        assert_eq!(session.nodes().len(), 1);

        let node = &session.nodes()[0];
        assert_eq!(node.id, "1");
        assert_eq!(node.data.label, "Sample Task Node");
        assert_eq!(node.node_type(), Some(NodeType::Task));
        assert_eq!(node.position, Position::new(250.0, 100.0));
    }

    #[test]
    fn test_added_nodes_follow_sample() {
        let mut session = DesignerSession::default();
        let id = session.add_node(NodeType::Start);
        assert_eq!(id, "2");
        assert_eq!(session.nodes()[1].position, Position::new(250.0, 150.0));
    }

    #[test]
    fn test_edit_selected_node() {
        let mut session = empty_session();
        let task = session.add_node(NodeType::Task);

        assert!(!session.edit_label("ignored"));
        session.node_clicked(&task);
        assert!(session.edit_label("Collect documents"));
        assert!(session.edit_field("dueDate", "2024-05-01"));

        let node = session.selected_node().unwrap();
        assert_eq!(node.data.label, "Collect documents");
        assert_eq!(node.data.get("dueDate"), Some("2024-05-01"));
        assert_eq!(node.data.get("assignee"), Some(""));
    }

    #[test]
    fn test_edit_field_rejects_foreign_fields() {
        let mut session = empty_session();
        let end = session.add_node(NodeType::End);
        session.node_clicked(&end);

        assert!(!session.edit_field("assignee", "bob"));
        assert!(!session.edit_field("nodeType", "start"));
        assert!(session.edit_field("message", "Welcome aboard"));

        let node = session.selected_node().unwrap();
        assert_eq!(node.node_type(), Some(NodeType::End));
        assert_eq!(node.data.get("message"), Some("Welcome aboard"));
        assert_eq!(node.data.get("assignee"), None);
    }

    #[test]
    fn test_stale_selection_is_tolerated() {
        let mut session = empty_session();
        session.node_clicked("5");
        assert_eq!(session.selected_node_id(), Some("5"));
        assert!(session.selected_node().is_none());
        assert!(session.selected_fields().is_empty());
        assert!(!session.edit_label("x"));
    }

    #[test]
    fn test_remove_selected_node_clears_selection() {
        let mut session = empty_session();
        let a = session.add_node(NodeType::Start);
        let b = session.add_node(NodeType::End);
        session.connect(&a, &b);
        session.node_clicked(&a);

        let removed = session.remove_node(&a).unwrap();
        assert_eq!(removed.id, a);
        assert!(session.edges().is_empty());
        assert_eq!(session.selected_node_id(), None);
    }

    #[test]
    fn test_simulation_state_is_exclusive() {
        let mut session = empty_session();
        session.add_node(NodeType::Task);

        let outcome = session.run_simulation();
        assert!(!outcome.is_valid());
        assert_eq!(
            session.simulation_error(),
            Some("No Start node found. No End node found.")
        );
        assert!(session.simulation_log().is_empty());

        session.add_node(NodeType::Start);
        session.add_node(NodeType::End);
        let outcome = session.run_simulation();
        assert!(outcome.is_valid());
        assert_eq!(session.simulation_error(), None);
        assert_eq!(
            session.simulation_log(),
            &["Step 1: START - Start Node", "Step 2: TASK - Task Node", "Step 3: END - End Node"]
        );
    }

    #[test]
    fn test_events_emitted() {
        let sink = Arc::new(VecEventSink::new());
        let mut session = empty_session().with_event_sink(sink.clone());

        let a = session.add_node(NodeType::Start);
        let b = session.add_node(NodeType::End);
        session.connect(&a, &b);
        session.connect(&a, "missing");
        session.node_clicked(&b);
        session.edit_field("message", "All done");
        session.edit_field("assignee", "bob");
        session.move_node(&a, Position::new(0.0, 0.0));
        session.run_simulation();

        let kinds: Vec<_> = sink.drain().iter().map(event_kind).collect();
        assert_eq!(
            kinds,
            vec!["added", "added", "edge", "selected", "updated", "moved", "completed"]
        );

        // Editing a node that is not selected, then tearing the graph down.
        assert!(session.patch_node_data(&a, [("notes", "Kickoff call")]));
        assert!(session.remove_edge("e1-2").is_some());
        assert!(session.remove_edge("e1-2").is_none());
        session.connect(&a, &b);
        session.remove_node(&b);
        session.run_simulation();

        let events = sink.drain();
        let kinds: Vec<_> = events.iter().map(event_kind).collect();
        assert_eq!(
            kinds,
            vec!["updated", "edge_removed", "edge", "removed", "selected", "failed"]
        );

        let DesignerEvent::NodeUpdated { node } = &events[0] else {
            panic!("expected a node update");
        };
        assert_eq!(node.id, a);
        assert_eq!(node.data.get("notes"), Some("Kickoff call"));
        assert_eq!(
            events[1],
            DesignerEvent::EdgeRemoved {
                edge_id: "e1-2".to_string()
            }
        );
        assert_eq!(
            events[3],
            DesignerEvent::NodeRemoved {
                node_id: b.clone(),
                removed_edges: vec!["e1-2".to_string()],
            }
        );
        assert_eq!(events[4], DesignerEvent::SelectionChanged { node_id: None });
        assert_eq!(
            events[5],
            DesignerEvent::SimulationFailed {
                error: "No End node found.".to_string()
            }
        );
    }

    fn event_kind(event: &DesignerEvent) -> &'static str {
        match event {
            DesignerEvent::NodeAdded { .. } => "added",
            DesignerEvent::NodeUpdated { .. } => "updated",
            DesignerEvent::NodeMoved { .. } => "moved",
            DesignerEvent::NodeRemoved { .. } => "removed",
            DesignerEvent::EdgeAdded { .. } => "edge",
            DesignerEvent::EdgeRemoved { .. } => "edge_removed",
            DesignerEvent::SelectionChanged { .. } => "selected",
            DesignerEvent::SimulationCompleted { .. } => "completed",
            DesignerEvent::SimulationFailed { .. } => "failed",
        }
    }

    #[test]
    fn test_shared_session() {
        let shared = empty_session().into_shared();
        let writer = {
            let shared = shared.clone();
            std::thread::spawn(move || {
                let mut session = shared.write();
                session.add_node(NodeType::Start);
                session.add_node(NodeType::End);
            })
        };
        writer.join().unwrap();

        let session = shared.read();
        assert_eq!(session.nodes().len(), 2);
    }
}
