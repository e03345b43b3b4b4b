//! Selection controller
//!
//! Tracks the single node open in the details panel. The selection is just
//! an id; it may point at a node that does not exist (yet, or any more), so
//! every lookup goes through the graph and tolerates a miss.

use serde::Serialize;

use crate::graph::WorkflowGraph;
use crate::registry::{FieldDefinition, NodeTypeRegistry};
use crate::types::{NodeId, WorkflowNode};

/// Current value of an editable field, for binding to an input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub field: FieldDefinition,
    pub value: String,
}

/// The node currently selected for editing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a node by id. The id is not checked against the graph.
    pub fn select(&mut self, node_id: impl Into<String>) {
        self.selected = Some(node_id.into());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, node_id: &str) -> bool {
        self.selected.as_deref() == Some(node_id)
    }

    /// Resolve the selected node, if it exists in the graph
    pub fn resolve<'g>(&self, graph: &'g WorkflowGraph) -> Option<&'g WorkflowNode> {
        self.selected.as_deref().and_then(|id| graph.find_node(id))
    }

    /// Editable fields for the selected node, `label` first
    ///
    /// Empty when nothing resolves.
    pub fn fields(&self, graph: &WorkflowGraph, registry: &NodeTypeRegistry) -> Vec<FieldDefinition> {
        self.resolve(graph)
            .map(|node| registry.fields_for(node.node_type()))
            .unwrap_or_default()
    }

    /// Editable fields for the selected node with their current values
    pub fn field_values(
        &self,
        graph: &WorkflowGraph,
        registry: &NodeTypeRegistry,
    ) -> Vec<FieldValue> {
        let Some(node) = self.resolve(graph) else {
            return Vec::new();
        };
        registry
            .fields_for(node.node_type())
            .into_iter()
            .map(|field| {
                let value = node.data.get(field.name).unwrap_or_default().to_string();
                FieldValue { field, value }
            })
            .collect()
    }

    /// Patch the selected node's data
    ///
    /// No-op without a selection or when the selected node does not exist.
    pub fn patch_selected<I, K, V>(&self, graph: &mut WorkflowGraph, changes: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        match self.selected.as_deref() {
            Some(id) => graph.patch_node_data(id, changes),
            None => false,
        }
    }
}
