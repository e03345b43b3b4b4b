//! Workflow Designer - graph model and simulation for HR workflows
//!
//! This crate is the core behind a visual workflow designer. A frontend
//! draws the canvas and forms; this crate owns everything they display:
//!
//! - A fixed set of node types (Start, Task, Approval, Automated, End),
//!   each with its own attribute record and form fields
//! - The workflow graph: insertion-ordered nodes plus the edges drawn
//!   between them
//! - The single selected node and its editable fields
//! - A simulation that validates the graph and lists its steps
//!
//! # Architecture
//!
//! - `DesignerSession`: owns the graph, selection and last simulation result;
//!   every user interaction is a method call on it
//! - `NodeTypeRegistry`: default data, form fields and palette entries
//! - `run_simulation`: pure function from a graph to a step report or errors
//! - `EventSink`: receives change events for redrawing
//!
//! # Example
//!
//! ```
//! use workflow_designer::{DesignerConfig, DesignerSession, NodeType};
//!
//! let mut session = DesignerSession::new(DesignerConfig {
//!     seed_sample_node: false,
//!     ..DesignerConfig::default()
//! });
//!
//! let start = session.add_node(NodeType::Start);
//! session.node_clicked(&start);
//! session.edit_label("Begin");
//! session.add_node(NodeType::End);
//!
//! session.run_simulation();
//! assert_eq!(
//!     session.simulation_log(),
//!     &["Step 1: START - Begin", "Step 2: END - End Node"]
//! );
//! ```

pub mod builder;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod graph;
pub mod registry;
pub mod selection;
pub mod session;
pub mod simulation;
pub mod types;

// Re-export key types
pub use builder::WorkflowBuilder;
pub use config::{DesignerConfig, LayoutConfig};
pub use error::{DesignerError, Result};
pub use events::{DesignerEvent, EventError, EventSink, VecEventSink};
pub use graph::WorkflowGraph;
pub use registry::{FieldDefinition, FieldWidget, NodeTypeDefinition, NodeTypeRegistry};
pub use selection::{FieldValue, Selection};
pub use session::{DesignerSession, SharedSession};
pub use simulation::{
    run_simulation, validate_workflow, SimulationError, SimulationOutcome, SimulationStep,
};
pub use types::{
    EdgeId, NodeAttributes, NodeData, NodeId, NodeType, Position, WorkflowEdge, WorkflowNode,
};
