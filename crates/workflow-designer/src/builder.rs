//! Fluent builder for workflow graphs
//!
//! Builds a graph through the same operations the canvas uses, so node ids
//! and positions come out exactly as they would in a session.

use crate::config::LayoutConfig;
use crate::graph::WorkflowGraph;
use crate::registry::NodeTypeRegistry;
use crate::types::{fields, NodeAttributes, NodeData, NodeType, WorkflowNode};

/// Fluent builder for constructing workflow graphs
///
/// # Example
///
/// ```
/// use workflow_designer::{NodeType, WorkflowBuilder};
///
/// let graph = WorkflowBuilder::new()
///     .add(NodeType::Start, "Begin")
///     .add(NodeType::Task, "Collect documents")
///     .add(NodeType::End, "Finish")
///     .connect("1", "2")
///     .connect("2", "3")
///     .build();
///
/// assert_eq!(graph.nodes().len(), 3);
/// ```
pub struct WorkflowBuilder {
    graph: WorkflowGraph,
    registry: NodeTypeRegistry,
    layout: LayoutConfig,
}

impl WorkflowBuilder {
    /// Create a new builder with the default layout
    pub fn new() -> Self {
        Self {
            graph: WorkflowGraph::new(),
            registry: NodeTypeRegistry::new(),
            layout: LayoutConfig::default(),
        }
    }

    /// Use a custom layout for subsequently added nodes
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Add a node of the given type with a custom label
    pub fn add(mut self, node_type: NodeType, label: impl Into<String>) -> Self {
        let label: String = label.into();
        let id = self.graph.add_node(&self.registry, &self.layout, node_type);
        self.graph.patch_node_data(&id, [(fields::LABEL, label)]);
        self
    }

    /// Add a node of the given type with its default label
    pub fn add_default(mut self, node_type: NodeType) -> Self {
        self.graph.add_node(&self.registry, &self.layout, node_type);
        self
    }

    /// Add a node whose type tag is not recognized
    pub fn add_unrecognized(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        let position = self.layout.position_for(self.graph.len());
        let data = NodeData {
            label: label.into(),
            attributes: NodeAttributes::Unrecognized,
        };
        self.graph.insert_node(WorkflowNode::new(id, position, data));
        self
    }

    /// Connect two nodes by id
    pub fn connect(mut self, source: &str, target: &str) -> Self {
        self.graph.connect(source, target);
        self
    }

    /// Finish building
    pub fn build(self) -> WorkflowGraph {
        self.graph
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
