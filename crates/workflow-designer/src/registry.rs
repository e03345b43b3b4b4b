//! Node type registry
//!
//! Maps each recognized node type to its default data, the ordered set of
//! editable fields the details panel renders, and its palette entry.
//! The set of node types is fixed, so the registry is built once with every
//! definition in palette order.

use serde::{Deserialize, Serialize};

use crate::types::{fields, NodeData, NodeType};

/// Input widget used to edit a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldWidget {
    /// Single-line text input
    Text,
    /// Multi-line text area
    TextArea { rows: u32 },
    /// Date picker
    Date,
    /// Numeric input with a lower bound
    Number { min: u32 },
}

/// Definition of an editable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Key in node data (e.g. "dueDate")
    pub name: &'static str,
    /// Label shown next to the input
    pub label: &'static str,
    pub widget: FieldWidget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

impl FieldDefinition {
    pub fn new(name: &'static str, label: &'static str, widget: FieldWidget) -> Self {
        Self {
            name,
            label,
            widget,
            placeholder: None,
        }
    }

    /// Set a placeholder hint
    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

/// Definition of a node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDefinition {
    pub node_type: NodeType,
    /// Name shown in the node palette
    pub palette_label: &'static str,
    /// Type-specific fields, in form order. `label` is not included.
    pub fields: Vec<FieldDefinition>,
}

/// The label field every node type starts its form with
pub fn label_field() -> FieldDefinition {
    FieldDefinition::new(fields::LABEL, "Label / Title", FieldWidget::Text)
}

/// Registry of the recognized node types
#[derive(Debug, Clone)]
pub struct NodeTypeRegistry {
    definitions: Vec<NodeTypeDefinition>,
}

impl NodeTypeRegistry {
    /// Create a registry with every node type registered
    pub fn new() -> Self {
        let definitions = NodeType::ALL.into_iter().map(Self::definition).collect();
        Self { definitions }
    }

    fn definition(node_type: NodeType) -> NodeTypeDefinition {
        let (palette_label, fields) = match node_type {
            NodeType::Start => (
                "Start",
                vec![FieldDefinition::new(
                    fields::NOTES,
                    "Notes",
                    FieldWidget::TextArea { rows: 3 },
                )],
            ),
            NodeType::Task => (
                "Task",
                vec![
                    FieldDefinition::new(
                        fields::DESCRIPTION,
                        "Description",
                        FieldWidget::TextArea { rows: 3 },
                    ),
                    FieldDefinition::new(fields::ASSIGNEE, "Assignee", FieldWidget::Text),
                    FieldDefinition::new(fields::DUE_DATE, "Due Date", FieldWidget::Date),
                ],
            ),
            NodeType::Approval => (
                "Approval",
                vec![
                    FieldDefinition::new(fields::APPROVER_ROLE, "Approver Role", FieldWidget::Text),
                    FieldDefinition::new(
                        fields::AUTO_AFTER_DAYS,
                        "Auto-Approve After (days)",
                        FieldWidget::Number { min: 0 },
                    ),
                ],
            ),
            NodeType::Automated => (
                "Automated Step",
                vec![
                    FieldDefinition::new(fields::ACTION_NAME, "Action Name", FieldWidget::Text)
                        .with_placeholder("e.g. send_email"),
                    FieldDefinition::new(fields::ACTION_PARAM, "Parameter", FieldWidget::Text)
                        .with_placeholder("e.g. to=hr@example.com"),
                ],
            ),
            NodeType::End => (
                "End",
                vec![FieldDefinition::new(
                    fields::MESSAGE,
                    "End Message",
                    FieldWidget::TextArea { rows: 2 },
                )],
            ),
        };

        NodeTypeDefinition {
            node_type,
            palette_label,
            fields,
        }
    }

    /// Get the definition for a node type
    pub fn get_definition(&self, node_type: NodeType) -> &NodeTypeDefinition {
        // Registered in declaration order, so the discriminant is the index.
        &self.definitions[node_type as usize]
    }

    /// Default data for a newly created node
    pub fn default_data(&self, node_type: NodeType) -> NodeData {
        NodeData::new(node_type)
    }

    /// Ordered editable fields for a node type, `label` first
    ///
    /// `None` means the type is not recognized; only the label is editable.
    pub fn fields_for(&self, node_type: Option<NodeType>) -> Vec<FieldDefinition> {
        let mut result = vec![label_field()];
        if let Some(node_type) = node_type {
            result.extend(self.get_definition(node_type).fields.iter().cloned());
        }
        result
    }

    /// Ordered field names for a node type, `label` first
    pub fn field_names(&self, node_type: Option<NodeType>) -> Vec<&'static str> {
        self.fields_for(node_type).into_iter().map(|f| f.name).collect()
    }

    /// All definitions in palette order
    pub fn palette(&self) -> &[NodeTypeDefinition] {
        &self.definitions
    }
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
