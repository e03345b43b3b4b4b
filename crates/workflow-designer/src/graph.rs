//! Workflow graph store
//!
//! The mutable collection of nodes and edges behind the canvas. Nodes keep
//! their insertion order, which the simulation relies on. Operations that
//! reference a missing node are silent no-ops: the canvas is the only caller
//! and a stale id is not worth failing an interaction over.

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::registry::NodeTypeRegistry;
use crate::types::{fields, EdgeId, NodeId, NodeType, Position, WorkflowEdge, WorkflowNode};

/// A workflow graph: insertion-ordered nodes plus the edges between them
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGraph {
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    /// Next numeric id to hand out. Only ever increases.
    #[serde(skip)]
    next_id: u64,
}

impl WorkflowGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_id: 1,
        }
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[WorkflowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[WorkflowEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    fn find_node_mut(&mut self, id: &str) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.find_node(id).is_some()
    }

    /// Find an edge by ID
    pub fn find_edge(&self, id: &str) -> Option<&WorkflowEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Allocate an id no current or past node has used
    fn fresh_id(&mut self) -> NodeId {
        // Skip any ids claimed through insert_node.
        while self.contains_node(&self.next_id.to_string()) {
            self.next_id += 1;
        }
        let id = self.next_id.to_string();
        // Wraps only after every u64 has been handed out; the loop above
        // still guarantees uniqueness.
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Add a node of the given type below the existing ones
    ///
    /// Always succeeds and returns the new node's id.
    pub fn add_node(
        &mut self,
        registry: &NodeTypeRegistry,
        layout: &LayoutConfig,
        node_type: NodeType,
    ) -> NodeId {
        let id = self.fresh_id();
        let position = layout.position_for(self.nodes.len());
        let data = registry.default_data(node_type);

        log::debug!("Adding {} node '{}' at ({}, {})", node_type, id, position.x, position.y);
        self.nodes.push(WorkflowNode::new(id.clone(), position, data));
        id
    }

    /// Append a fully built node
    ///
    /// Returns false, leaving the graph unchanged, if the id is already taken.
    pub fn insert_node(&mut self, node: WorkflowNode) -> bool {
        if self.contains_node(&node.id) {
            log::debug!("Ignoring insert of duplicate node id '{}'", node.id);
            return false;
        }
        if let Some(next) = node.id.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
            self.next_id = self.next_id.max(next);
        }
        self.nodes.push(node);
        true
    }

    /// Connect two nodes
    ///
    /// The edge is recorded only if both endpoints exist and the same
    /// connection is not already present. Returns whether an edge was added.
    pub fn connect(&mut self, source: &str, target: &str) -> bool {
        if !self.contains_node(source) || !self.contains_node(target) {
            log::debug!("Ignoring connection {} -> {}: unknown endpoint", source, target);
            return false;
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return false;
        }

        let edge = WorkflowEdge::new(source, target);
        log::debug!("Connecting {} -> {} as '{}'", source, target, edge.id);
        self.edges.push(edge);
        true
    }

    /// Merge field changes into a node's data
    ///
    /// Only the named fields are overwritten. Fields that do not belong to
    /// the node's type, and `nodeType` itself, are ignored. Returns false if
    /// the node does not exist, in which case nothing changes.
    pub fn patch_node_data<I, K, V>(&mut self, node_id: &str, changes: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let Some(node) = self.find_node_mut(node_id) else {
            log::debug!("Ignoring patch for unknown node '{}'", node_id);
            return false;
        };

        for (field, value) in changes {
            let field = field.as_ref();
            if !node.data.set(field, value) {
                if field == fields::NODE_TYPE {
                    log::debug!("Node '{}': node type is fixed at creation", node_id);
                } else {
                    log::debug!("Node '{}': ignoring unknown field '{}'", node_id, field);
                }
            }
        }
        true
    }

    /// Store a new canvas position for a node
    pub fn move_node(&mut self, node_id: &str, position: Position) -> bool {
        match self.find_node_mut(node_id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, node_id: &str) -> Option<WorkflowNode> {
        let pos = self.nodes.iter().position(|n| n.id == node_id)?;
        let node = self.nodes.remove(pos);
        self.edges.retain(|e| !e.touches(node_id));
        log::debug!("Removed node '{}'", node_id);
        Some(node)
    }

    /// Remove an edge by ID
    pub fn remove_edge(&mut self, edge_id: &str) -> Option<WorkflowEdge> {
        let pos = self.edges.iter().position(|e| e.id == edge_id)?;
        Some(self.edges.remove(pos))
    }

    /// IDs of edges leaving or entering a node
    pub fn edges_touching(&self, node_id: &str) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|e| e.touches(node_id))
            .map(|e| e.id.clone())
            .collect()
    }
}

impl Default for WorkflowGraph {
    fn default() -> Self {
        Self::new()
    }
}
