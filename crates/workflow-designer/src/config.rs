//! Designer configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes.

use serde::{Deserialize, Serialize};

use crate::constants::layout;
use crate::error::Result;
use crate::types::Position;

/// Placement of newly added nodes
///
/// Node `n` (0-based, counted at the time it is added) lands at
/// `(x, base_y + n * spacing_y)`, one row below the previous node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub x: f64,
    pub base_y: f64,
    pub spacing_y: f64,
}

impl LayoutConfig {
    /// Position for a node added when `existing` nodes are already present
    pub fn position_for(&self, existing: usize) -> Position {
        Position::new(self.x, self.base_y + existing as f64 * self.spacing_y)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x: layout::NODE_X,
            base_y: layout::BASE_Y,
            spacing_y: layout::SPACING_Y,
        }
    }
}

/// Configuration for a designer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignerConfig {
    pub layout: LayoutConfig,
    /// Start new sessions with the sample task node on the canvas
    pub seed_sample_node: bool,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            seed_sample_node: true,
        }
    }
}

impl DesignerConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
