//! Graph state and drag interaction tracking.
//!
//! Wraps the force simulation with the per-gesture drag state. Created once when
//! the view mounts, then mutated by the animation loop and the pointer handlers.

use log::trace;

use super::simulation::{Simulation, SimulationConfig};
use super::types::GraphData;

/// Drag gesture state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
	#[default]
	Idle,
	/// Node `node` is pinned under the pointer.
	Dragging { node: usize },
}

/// Simulation plus interaction state for one view.
pub struct GraphState {
	pub simulation: Simulation,
	pub drag: DragState,
	pub width: f64,
	pub height: f64,
	drag_alpha_target: f64,
}

impl GraphState {
	pub fn new(data: &GraphData, config: &SimulationConfig, width: f64, height: f64) -> Self {
		Self {
			simulation: Simulation::new(data, config, width, height),
			drag: DragState::Idle,
			width,
			height,
			drag_alpha_target: config.drag_alpha_target,
		}
	}

	/// Advance one animation frame. Returns whether the layout moved.
	pub fn tick(&mut self) -> bool {
		self.simulation.step()
	}

	/// Begin dragging `node`, pinning it where it currently is.
	///
	/// Ignored for unknown nodes. A drag already in progress is ended first.
	pub fn drag_start(&mut self, node: usize) {
		let Some(position) = self.simulation.node(node).map(|n| (n.x, n.y)) else {
			return;
		};
		if self.drag != DragState::Idle {
			self.drag_end();
		}
		// Only one pointer gesture exists at a time, so every drag wakes the layout.
		self.simulation.set_alpha_target(self.drag_alpha_target);
		self.simulation.restart();
		if let Some(n) = self.simulation.node_mut(node) {
			n.fx = Some(position.0);
			n.fy = Some(position.1);
		}
		self.drag = DragState::Dragging { node };
		trace!("concept-graph: drag start on node {node}");
	}

	/// Move the dragged node's fixed position to the pointer.
	pub fn drag_move(&mut self, x: f64, y: f64) {
		let DragState::Dragging { node } = self.drag else {
			return;
		};
		if let Some(n) = self.simulation.node_mut(node) {
			n.fx = Some(x);
			n.fy = Some(y);
		}
	}

	/// Release the dragged node so the forces move it again.
	pub fn drag_end(&mut self) {
		let DragState::Dragging { node } = self.drag else {
			return;
		};
		self.simulation.set_alpha_target(0.0);
		if let Some(n) = self.simulation.node_mut(node) {
			n.fx = None;
			n.fy = None;
		}
		self.drag = DragState::Idle;
		trace!("concept-graph: drag end on node {node}");
	}

	/// Whether a drag is in progress.
	pub fn is_dragging(&self) -> bool {
		matches!(self.drag, DragState::Dragging { .. })
	}

	/// Whether the animation loop should schedule another frame.
	///
	/// False once the layout has settled with no drag in progress; a
	/// [`drag_start`](Self::drag_start) makes it true again.
	pub fn needs_frame(&self) -> bool {
		self.simulation.is_running() || self.is_dragging()
	}
}
