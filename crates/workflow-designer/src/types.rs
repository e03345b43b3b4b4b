//! Core types for workflow graphs
//!
//! These types define the nodes and edges of a workflow graph and the
//! per-type attribute records each node carries. The serialized shape
//! matches what the canvas frontend binds to: a node's `data` is a flat
//! object with `label`, `nodeType` and the type's own fields.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DesignerError;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Attribute names as they appear in node data
pub mod fields {
    pub const LABEL: &str = "label";
    pub const NODE_TYPE: &str = "nodeType";
    pub const NOTES: &str = "notes";
    pub const DESCRIPTION: &str = "description";
    pub const ASSIGNEE: &str = "assignee";
    pub const DUE_DATE: &str = "dueDate";
    pub const APPROVER_ROLE: &str = "approverRole";
    pub const AUTO_AFTER_DAYS: &str = "autoAfterDays";
    pub const ACTION_NAME: &str = "actionName";
    pub const ACTION_PARAM: &str = "actionParam";
    pub const MESSAGE: &str = "message";
}

/// Report tag used for nodes whose type is not recognized
pub const FALLBACK_TYPE_TAG: &str = "node";

/// The kind of step a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Entry point of the workflow. Exactly one per valid graph.
    Start,
    /// Manual task assigned to a person
    Task,
    /// Approval step performed by a role
    Approval,
    /// Automated action with a single parameter
    Automated,
    /// Exit point of the workflow. Exactly one per valid graph.
    End,
}

impl NodeType {
    /// All node types, in palette order
    pub const ALL: [NodeType; 5] = [
        NodeType::Start,
        NodeType::Task,
        NodeType::Approval,
        NodeType::Automated,
        NodeType::End,
    ];

    /// The lowercase tag used in node data
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::Task => "task",
            NodeType::Approval => "approval",
            NodeType::Automated => "automated",
            NodeType::End => "end",
        }
    }

    /// Capitalized name, used to derive default labels
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Start => "Start",
            NodeType::Task => "Task",
            NodeType::Approval => "Approval",
            NodeType::Automated => "Automated",
            NodeType::End => "End",
        }
    }

    /// Label given to a freshly created node of this type
    pub fn default_label(&self) -> String {
        format!("{} Node", self.label())
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = DesignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DesignerError::UnknownNodeType(s.to_string()))
    }
}

/// Position of a node on the canvas
///
/// Owned by the canvas; the designer stores it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Type-specific attributes of a node, tagged by `nodeType`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "lowercase")]
pub enum NodeAttributes {
    Start {
        #[serde(default)]
        notes: String,
    },
    #[serde(rename_all = "camelCase")]
    Task {
        #[serde(default)]
        description: String,
        #[serde(default)]
        assignee: String,
        #[serde(default)]
        due_date: String,
    },
    #[serde(rename_all = "camelCase")]
    Approval {
        #[serde(default)]
        approver_role: String,
        /// Kept as entered; the form binds it to a numeric input
        #[serde(default)]
        auto_after_days: String,
    },
    #[serde(rename_all = "camelCase")]
    Automated {
        #[serde(default)]
        action_name: String,
        #[serde(default)]
        action_param: String,
    },
    End {
        #[serde(default)]
        message: String,
    },
    /// A type tag this designer does not know. Carries no attributes.
    #[serde(other)]
    Unrecognized,
}

impl NodeAttributes {
    /// Empty attribute record for a node type
    pub fn defaults_for(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Start => NodeAttributes::Start {
                notes: String::new(),
            },
            NodeType::Task => NodeAttributes::Task {
                description: String::new(),
                assignee: String::new(),
                due_date: String::new(),
            },
            NodeType::Approval => NodeAttributes::Approval {
                approver_role: String::new(),
                auto_after_days: String::new(),
            },
            NodeType::Automated => NodeAttributes::Automated {
                action_name: String::new(),
                action_param: String::new(),
            },
            NodeType::End => NodeAttributes::End {
                message: String::new(),
            },
        }
    }

    /// The node type these attributes belong to, if recognized
    pub fn node_type(&self) -> Option<NodeType> {
        match self {
            NodeAttributes::Start { .. } => Some(NodeType::Start),
            NodeAttributes::Task { .. } => Some(NodeType::Task),
            NodeAttributes::Approval { .. } => Some(NodeType::Approval),
            NodeAttributes::Automated { .. } => Some(NodeType::Automated),
            NodeAttributes::End { .. } => Some(NodeType::End),
            NodeAttributes::Unrecognized => None,
        }
    }

    /// Get a type-specific field by its data key
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match (self, field) {
            (NodeAttributes::Start { notes }, fields::NOTES) => notes,
            (NodeAttributes::Task { description, .. }, fields::DESCRIPTION) => description,
            (NodeAttributes::Task { assignee, .. }, fields::ASSIGNEE) => assignee,
            (NodeAttributes::Task { due_date, .. }, fields::DUE_DATE) => due_date,
            (NodeAttributes::Approval { approver_role, .. }, fields::APPROVER_ROLE) => {
                approver_role
            }
            (NodeAttributes::Approval { auto_after_days, .. }, fields::AUTO_AFTER_DAYS) => {
                auto_after_days
            }
            (NodeAttributes::Automated { action_name, .. }, fields::ACTION_NAME) => action_name,
            (NodeAttributes::Automated { action_param, .. }, fields::ACTION_PARAM) => {
                action_param
            }
            (NodeAttributes::End { message }, fields::MESSAGE) => message,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Mutable access to a type-specific field by its data key
    fn get_mut(&mut self, field: &str) -> Option<&mut String> {
        let value = match (self, field) {
            (NodeAttributes::Start { notes }, fields::NOTES) => notes,
            (NodeAttributes::Task { description, .. }, fields::DESCRIPTION) => description,
            (NodeAttributes::Task { assignee, .. }, fields::ASSIGNEE) => assignee,
            (NodeAttributes::Task { due_date, .. }, fields::DUE_DATE) => due_date,
            (NodeAttributes::Approval { approver_role, .. }, fields::APPROVER_ROLE) => {
                approver_role
            }
            (NodeAttributes::Approval { auto_after_days, .. }, fields::AUTO_AFTER_DAYS) => {
                auto_after_days
            }
            (NodeAttributes::Automated { action_name, .. }, fields::ACTION_NAME) => action_name,
            (NodeAttributes::Automated { action_param, .. }, fields::ACTION_PARAM) => {
                action_param
            }
            (NodeAttributes::End { message }, fields::MESSAGE) => message,
            _ => return None,
        };
        Some(value)
    }
}

/// Data carried by a node: its label plus type-tagged attributes
///
/// Deserializing tolerates a missing or null `label` (empty) and a missing
/// or null `nodeType` ([`NodeAttributes::Unrecognized`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    /// User-editable label, seeded from the node type on creation
    pub label: String,
    #[serde(flatten)]
    pub attributes: NodeAttributes,
}

impl NodeData {
    /// Default data for a freshly created node
    pub fn new(node_type: NodeType) -> Self {
        Self {
            label: node_type.default_label(),
            attributes: NodeAttributes::defaults_for(node_type),
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn node_type(&self) -> Option<NodeType> {
        self.attributes.node_type()
    }

    /// Get any editable field, including `label`
    pub fn get(&self, field: &str) -> Option<&str> {
        if field == fields::LABEL {
            return Some(self.label.as_str());
        }
        self.attributes.get(field)
    }

    /// Overwrite a single field
    ///
    /// Returns false when the field does not belong to this node's type.
    /// `nodeType` is never writable.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        if field == fields::LABEL {
            self.label = value.into();
            return true;
        }
        match self.attributes.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }
}

impl<'de> Deserialize<'de> for NodeData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = serde_json::Map::<String, Value>::deserialize(deserializer)?;

        let label = match map.remove(fields::LABEL) {
            Some(Value::String(label)) => label,
            Some(Value::Null) | None => String::new(),
            Some(other) => return Err(D::Error::custom(format!("invalid label: {}", other))),
        };

        let has_type = map
            .get(fields::NODE_TYPE)
            .is_some_and(|tag| !tag.is_null());
        let attributes = if has_type {
            NodeAttributes::deserialize(Value::Object(map)).map_err(D::Error::custom)?
        } else {
            NodeAttributes::Unrecognized
        };

        Ok(Self { label, attributes })
    }
}

/// A node instance in a workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Unique identifier, never reused
    pub id: NodeId,
    /// Canvas position
    pub position: Position,
    /// Label and type-specific attributes
    pub data: NodeData,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            position,
            data,
        }
    }

    pub fn node_type(&self) -> Option<NodeType> {
        self.data.node_type()
    }

    /// Type tag for reports, `"node"` when the type is not recognized
    pub fn type_tag(&self) -> &str {
        self.node_type()
            .map(|t| t.as_str())
            .unwrap_or(FALLBACK_TYPE_TAG)
    }

    /// Label for reports, the node id when the label is empty
    pub fn display_label(&self) -> &str {
        if self.data.label.is_empty() {
            &self.id
        } else {
            &self.data.label
        }
    }
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
}

impl WorkflowEdge {
    /// Create an edge with an id derived from its endpoints
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e{}-{}", source, target),
            source,
            target,
        }
    }

    /// Check if this edge touches a node
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
