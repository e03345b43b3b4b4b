//! Designer-wide constants
//!
//! Single source of truth for layout numbers and the seeded sample node.

/// Canvas placement for new nodes
pub mod layout {
    /// Horizontal position of every new node
    pub const NODE_X: f64 = 250.0;
    /// Vertical position of the first node
    pub const BASE_Y: f64 = 80.0;
    /// Vertical gap between consecutive nodes
    pub const SPACING_Y: f64 = 70.0;
}

/// The task node a fresh session starts with
pub mod sample {
    pub const ID: &str = "1";
    pub const LABEL: &str = "Sample Task Node";
    pub const X: f64 = 250.0;
    pub const Y: f64 = 100.0;
}
