//! Workflow simulation
//!
//! Validates the structure of a workflow and orders its nodes into a
//! step-by-step report. The order is purely type-based: the Start node, then
//! every other node in insertion order, then the End node. Edges are not
//! consulted.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::graph::WorkflowGraph;
use crate::types::{NodeId, NodeType, WorkflowNode, FALLBACK_TYPE_TAG};

/// Structural problem that prevents a simulation
///
/// The display string of each variant is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("No nodes in the workflow. Please add some nodes.")]
    EmptyWorkflow,
    #[error("No Start node found.")]
    MissingStartNode,
    #[error("More than one Start node found.")]
    MultipleStartNodes,
    #[error("No End node found.")]
    MissingEndNode,
    #[error("More than one End node found.")]
    MultipleEndNodes,
}

/// One line of a simulation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStep {
    /// 1-based position in the report
    pub step: usize,
    pub node_id: NodeId,
    /// `None` for nodes whose type is not recognized
    pub node_type: Option<NodeType>,
    /// Node label, or the node id when the label is empty
    pub label: String,
}

impl SimulationStep {
    fn new(step: usize, node: &WorkflowNode) -> Self {
        Self {
            step,
            node_id: node.id.clone(),
            node_type: node.node_type(),
            label: node.display_label().to_string(),
        }
    }
}

impl fmt::Display for SimulationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self
            .node_type
            .map(|t| t.as_str())
            .unwrap_or(FALLBACK_TYPE_TAG);
        write!(f, "Step {}: {} - {}", self.step, tag.to_uppercase(), self.label)
    }
}

/// Result of a simulation: either the errors or the ordered steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationOutcome {
    /// The graph is invalid. Never empty.
    Invalid(Vec<SimulationError>),
    /// The graph is valid; steps in report order
    Completed(Vec<SimulationStep>),
}

impl SimulationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, SimulationOutcome::Completed(_))
    }

    /// Validation errors, empty for a completed simulation
    pub fn errors(&self) -> &[SimulationError] {
        match self {
            SimulationOutcome::Invalid(errors) => errors.as_slice(),
            SimulationOutcome::Completed(_) => &[],
        }
    }

    /// Report lines, empty for an invalid graph
    pub fn log(&self) -> Vec<String> {
        match self {
            SimulationOutcome::Invalid(_) => Vec::new(),
            SimulationOutcome::Completed(steps) => steps.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// All error messages joined by a single space
    pub fn error_message(&self) -> Option<String> {
        match self {
            SimulationOutcome::Invalid(errors) => Some(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            SimulationOutcome::Completed(_) => None,
        }
    }
}

/// Nodes split by role, each group in insertion order
struct Partition<'a> {
    starts: Vec<&'a WorkflowNode>,
    middles: Vec<&'a WorkflowNode>,
    ends: Vec<&'a WorkflowNode>,
}

impl<'a> Partition<'a> {
    fn new(nodes: &'a [WorkflowNode]) -> Self {
        let mut partition = Partition {
            starts: Vec::new(),
            middles: Vec::new(),
            ends: Vec::new(),
        };
        for node in nodes {
            match node.node_type() {
                Some(NodeType::Start) => partition.starts.push(node),
                Some(NodeType::End) => partition.ends.push(node),
                _ => partition.middles.push(node),
            }
        }
        partition
    }

    fn ordered(self) -> impl Iterator<Item = &'a WorkflowNode> {
        self.starts
            .into_iter()
            .chain(self.middles)
            .chain(self.ends)
    }
}

/// Check Start/End node counts
///
/// Returns all errors found (not just the first), in a fixed order.
fn validate_start_end(partition: &Partition<'_>, errors: &mut Vec<SimulationError>) {
    match partition.starts.len() {
        0 => errors.push(SimulationError::MissingStartNode),
        1 => {}
        _ => errors.push(SimulationError::MultipleStartNodes),
    }
    match partition.ends.len() {
        0 => errors.push(SimulationError::MissingEndNode),
        1 => {}
        _ => errors.push(SimulationError::MultipleEndNodes),
    }
}

/// Validate a workflow's structure
///
/// An empty workflow yields only [`SimulationError::EmptyWorkflow`].
pub fn validate_workflow(graph: &WorkflowGraph) -> Vec<SimulationError> {
    if graph.is_empty() {
        return vec![SimulationError::EmptyWorkflow];
    }
    let mut errors = Vec::new();
    validate_start_end(&Partition::new(graph.nodes()), &mut errors);
    errors
}

/// Run a simulation over the graph's current nodes
///
/// Pure: the graph is not modified and edges are ignored.
pub fn run_simulation(graph: &WorkflowGraph) -> SimulationOutcome {
    let errors = validate_workflow(graph);
    if !errors.is_empty() {
        log::info!("Simulation rejected with {} error(s)", errors.len());
        return SimulationOutcome::Invalid(errors);
    }

    let steps: Vec<SimulationStep> = Partition::new(graph.nodes())
        .ordered()
        .enumerate()
        .map(|(i, node)| SimulationStep::new(i + 1, node))
        .collect();

    log::info!("Simulation completed with {} step(s)", steps.len());
    SimulationOutcome::Completed(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use serde_json::json;

    #[test]
    fn test_empty_workflow() {
        let graph = WorkflowBuilder::new().build();
        let outcome = run_simulation(&graph);
        assert_eq!(outcome.errors(), &[SimulationError::EmptyWorkflow]);
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("No nodes in the workflow. Please add some nodes.")
        );
        assert!(outcome.log().is_empty());
    }

    #[test]
    fn test_start_and_end_only() {
        let graph = WorkflowBuilder::new()
            .add(NodeType::Start, "Begin")
            .add(NodeType::End, "Finish")
            .build();

        let outcome = run_simulation(&graph);
        assert!(outcome.is_valid());
        assert_eq!(outcome.log(), vec!["Step 1: START - Begin", "Step 2: END - Finish"]);
        assert_eq!(outcome.error_message(), None);
    }

    #[test]
    fn test_missing_start() {
        let graph = WorkflowBuilder::new()
            .add(NodeType::Task, "Fill form")
            .add(NodeType::End, "Done")
            .build();

        let outcome = run_simulation(&graph);
        assert_eq!(outcome.errors(), &[SimulationError::MissingStartNode]);
        assert_eq!(outcome.error_message().as_deref(), Some("No Start node found."));
    }

    #[test]
    fn test_multiple_starts() {
        let graph = WorkflowBuilder::new()
            .add(NodeType::Start, "A")
            .add(NodeType::Start, "B")
            .add(NodeType::End, "C")
            .build();

        let outcome = run_simulation(&graph);
        assert_eq!(outcome.errors(), &[SimulationError::MultipleStartNodes]);
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("More than one Start node found.")
        );
    }

    #[test]
    fn test_four_step_report() {
        let graph = WorkflowBuilder::new()
            .add(NodeType::Start, "S")
            .add(NodeType::Task, "T1")
            .add(NodeType::Approval, "A1")
            .add(NodeType::End, "E")
            .build();

        assert_eq!(
            run_simulation(&graph).log(),
            vec![
                "Step 1: START - S",
                "Step 2: TASK - T1",
                "Step 3: APPROVAL - A1",
                "Step 4: END - E",
            ]
        );
    }

    #[test]
    fn test_collects_all_errors_in_order() {
        let graph = WorkflowBuilder::new()
            .add_default(NodeType::Task)
            .add_default(NodeType::Automated)
            .build();
        let outcome = run_simulation(&graph);
        assert_eq!(
            outcome.errors(),
            &[SimulationError::MissingStartNode, SimulationError::MissingEndNode]
        );
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("No Start node found. No End node found.")
        );

        let graph = WorkflowBuilder::new()
            .add_default(NodeType::End)
            .add_default(NodeType::Start)
            .add_default(NodeType::End)
            .add_default(NodeType::Start)
            .build();
        assert_eq!(
            run_simulation(&graph).errors(),
            &[SimulationError::MultipleStartNodes, SimulationError::MultipleEndNodes]
        );
    }

    #[test]
    fn test_order_is_type_based_not_insertion_or_edges() {
        // End inserted first, edges pointing the "wrong" way.
        let graph = WorkflowBuilder::new()
            .add(NodeType::End, "Done")
            .add(NodeType::Automated, "Email")
            .add(NodeType::Task, "Review")
            .add(NodeType::Start, "Kickoff")
            .connect("3", "2")
            .connect("1", "4")
            .build();

        assert_eq!(
            run_simulation(&graph).log(),
            vec![
                "Step 1: START - Kickoff",
                "Step 2: AUTOMATED - Email",
                "Step 3: TASK - Review",
                "Step 4: END - Done",
            ]
        );
    }

    #[test]
    fn test_label_and_type_fallbacks() {
        let graph = WorkflowBuilder::new()
            .add(NodeType::Start, "")
            .add_unrecognized("legacy-7", "Imported step")
            .add_unrecognized("legacy-8", "")
            .add(NodeType::End, "Finish")
            .build();

        assert_eq!(
            run_simulation(&graph).log(),
            vec![
                "Step 1: START - 1",
                "Step 2: NODE - Imported step",
                "Step 3: NODE - legacy-8",
                "Step 4: END - Finish",
            ]
        );
    }

    #[test]
    fn test_untyped_node_is_a_middle_step() {
        let untyped: WorkflowNode = serde_json::from_value(json!({
            "id": "9",
            "position": {"x": 0.0, "y": 0.0},
            "data": {"label": "NoType"},
        }))
        .unwrap();
        let mut graph = WorkflowBuilder::new()
            .add(NodeType::End, "Finish")
            .add(NodeType::Start, "Begin")
            .build();
        assert!(graph.insert_node(untyped));

        assert_eq!(
            run_simulation(&graph).log(),
            vec!["Step 1: START - Begin", "Step 2: NODE - NoType", "Step 3: END - Finish"]
        );
    }

    #[test]
    fn test_simulation_does_not_mutate() {
        let graph = WorkflowBuilder::new()
            .add(NodeType::Start, "Begin")
            .add(NodeType::End, "Finish")
            .connect("1", "2")
            .build();
        let before = graph.clone();

        let first = run_simulation(&graph);
        let second = run_simulation(&graph);
        assert_eq!(first, second);
        assert_eq!(graph.nodes(), before.nodes());
        assert_eq!(graph.edges(), before.edges());
    }

    #[test]
    fn test_steps_carry_node_ids() {
        let graph = WorkflowBuilder::new()
            .add(NodeType::Task, "Middle")
            .add(NodeType::Start, "Begin")
            .add(NodeType::End, "Finish")
            .build();

        let SimulationOutcome::Completed(steps) = run_simulation(&graph) else {
            panic!("expected a completed simulation");
        };
        let ids: Vec<_> = steps.iter().map(|s| s.node_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
        assert_eq!(steps[1].node_type, Some(NodeType::Task));
    }
}
