//! Force-directed graph view.
//!
//! Renders a dataset of nodes and links as an SVG with:
//! - A force simulation (link, charge and center forces) positioning the nodes
//! - Layers redrawn on every simulation tick: link lines, link labels, node
//!   circles, wrapped node labels
//! - Pointer dragging (mouse, pen or touch) that pins the node under the pointer
//!   while the drag lasts
//!
//! # Example
//!
//! ```ignore
//! use concept_graph::{GraphConfig, GraphData, GraphLink, GraphNode, GraphView};
//!
//! let data = GraphData {
//!     nodes: vec![GraphNode::new("A"), GraphNode::new("B")],
//!     links: vec![GraphLink::new("A", "B")],
//! };
//!
//! view! { <GraphView data=data config=GraphConfig::default() /> }
//! ```

mod component;
pub mod config;
pub mod loader;
pub mod render;
pub mod simulation;
pub mod state;
pub mod theme;
mod types;

pub use component::GraphView;
pub use config::GraphConfig;
pub use loader::{LoadError, load_graph_data};
pub use render::Scene;
pub use simulation::{Simulation, SimulationConfig};
pub use state::{DragState, GraphState};
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode};
