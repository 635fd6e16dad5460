//! Force simulation that lays out the graph.
//!
//! Each tick moves the energy parameter `alpha` toward `alpha_target`, lets
//! every registered force adjust node velocities (or positions) scaled by
//! `alpha`, then integrates velocities with friction. Nodes with a fixed
//! position are snapped to it. Once `alpha` falls below `alpha_min` the
//! simulation stops until [`Simulation::restart`] is called.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;
use serde::Deserialize;

use super::types::GraphData;

/// Distance of the first node from the layout center on placement.
const INITIAL_RADIUS: f64 = 10.0;

/// Tunable simulation parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Starting energy.
	pub alpha: f64,
	/// Energy floor. The simulation stops once alpha drops below it.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed each tick.
	pub alpha_decay: f64,
	/// Energy the simulation converges to.
	pub alpha_target: f64,
	/// Fraction of velocity lost each tick (friction).
	pub velocity_decay: f64,
	/// Target separation of linked nodes.
	pub link_distance: f64,
	/// Pairwise node charge. Negative values repel.
	pub charge_strength: f64,
	/// Energy target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			alpha: 1.0,
			alpha_min: 0.001,
			// Reaches alpha_min from 1.0 in 300 ticks.
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			alpha_target: 0.0,
			velocity_decay: 0.4,
			link_distance: 100.0,
			charge_strength: -400.0,
			drag_alpha_target: 0.3,
		}
	}
}

/// A node as seen by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	/// Position in the dataset's node list.
	pub index: usize,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Fixed x position. While set, `x` is pinned to it.
	pub fx: Option<f64>,
	/// Fixed y position. While set, `y` is pinned to it.
	pub fy: Option<f64>,
}

impl SimNode {
	/// Place node `index` on a phyllotaxis spiral around `(cx, cy)`.
	fn placed(index: usize, cx: f64, cy: f64) -> Self {
		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
		let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
		let angle = index as f64 * golden_angle;
		Self {
			index,
			x: cx + radius * angle.cos(),
			y: cy + radius * angle.sin(),
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	/// Whether the node is pinned on either axis.
	pub fn is_fixed(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// A link resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimLink {
	/// Position of the link in the dataset's link list.
	pub index: usize,
	pub source: usize,
	pub target: usize,
}

/// Deterministic linear congruential generator used to separate coincident nodes.
#[derive(Clone, Debug)]
pub struct Lcg(u32);

impl Default for Lcg {
	fn default() -> Self {
		Self(1)
	}
}

impl Lcg {
	/// Next value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	/// Tiny non-zero offset.
	pub fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// A force acting on the simulation's nodes.
pub trait Force {
	/// Called when the force is registered. Precompute per-node or per-link state here.
	fn initialize(&mut self, _nodes: &[SimNode], _links: &[SimLink]) {}

	/// Apply the force for one tick at energy `alpha`.
	fn apply(&mut self, nodes: &mut [SimNode], links: &[SimLink], alpha: f64, random: &mut Lcg);
}

/// Spring force pulling linked nodes toward a target distance.
#[derive(Clone, Debug)]
pub struct LinkForce {
	distance: f64,
	iterations: usize,
	strengths: Vec<f64>,
	bias: Vec<f64>,
}

impl LinkForce {
	pub fn new(distance: f64) -> Self {
		Self {
			distance,
			iterations: 1,
			strengths: Vec::new(),
			bias: Vec::new(),
		}
	}
}

impl Force for LinkForce {
	fn initialize(&mut self, nodes: &[SimNode], links: &[SimLink]) {
		let mut degree = vec![0usize; nodes.len()];
		for link in links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		// Weaker springs on hubs, and the lighter end moves more.
		self.strengths = links
			.iter()
			.map(|l| 1.0 / degree[l.source].min(degree[l.target]) as f64)
			.collect();
		self.bias = links
			.iter()
			.map(|l| degree[l.source] as f64 / (degree[l.source] + degree[l.target]) as f64)
			.collect();
	}

	fn apply(&mut self, nodes: &mut [SimNode], links: &[SimLink], alpha: f64, random: &mut Lcg) {
		for _ in 0..self.iterations {
			for (i, link) in links.iter().enumerate() {
				let (source, target) = (&nodes[link.source], &nodes[link.target]);
				let mut x = target.x + target.vx - source.x - source.vx;
				if x == 0.0 {
					x = random.jiggle();
				}
				let mut y = target.y + target.vy - source.y - source.vy;
				if y == 0.0 {
					y = random.jiggle();
				}
				let len = (x * x + y * y).sqrt();
				let l = (len - self.distance) / len * alpha * self.strengths[i];
				let (x, y) = (x * l, y * l);
				let b = self.bias[i];

				let target = &mut nodes[link.target];
				target.vx -= x * b;
				target.vy -= y * b;
				let source = &mut nodes[link.source];
				source.vx += x * (1.0 - b);
				source.vy += y * (1.0 - b);
			}
		}
	}
}

/// Pairwise charge between every pair of nodes.
#[derive(Clone, Debug)]
pub struct ManyBodyForce {
	strength: f64,
	distance_min2: f64,
	distance_max2: f64,
}

impl ManyBodyForce {
	pub fn new(strength: f64) -> Self {
		Self {
			strength,
			distance_min2: 1.0,
			distance_max2: f64::INFINITY,
		}
	}
}

impl Force for ManyBodyForce {
	fn apply(&mut self, nodes: &mut [SimNode], _links: &[SimLink], alpha: f64, random: &mut Lcg) {
		for i in 0..nodes.len() {
			let (xi, yi) = (nodes[i].x, nodes[i].y);
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for (j, other) in nodes.iter().enumerate() {
				if i == j {
					continue;
				}
				let (mut x, mut y) = (other.x - xi, other.y - yi);
				let mut l = x * x + y * y;
				if l >= self.distance_max2 {
					continue;
				}
				if x == 0.0 {
					x = random.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = random.jiggle();
					l += y * y;
				}
				if l < self.distance_min2 {
					l = (self.distance_min2 * l).sqrt();
				}
				let w = self.strength * alpha / l;
				dvx += x * w;
				dvy += y * w;
			}
			nodes[i].vx += dvx;
			nodes[i].vy += dvy;
		}
	}
}

/// Translates all nodes so their centroid sits on `(x, y)`.
#[derive(Clone, Debug)]
pub struct CenterForce {
	x: f64,
	y: f64,
	strength: f64,
}

impl CenterForce {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y, strength: 1.0 }
	}
}

impl Force for CenterForce {
	fn apply(&mut self, nodes: &mut [SimNode], _links: &[SimLink], _alpha: f64, _random: &mut Lcg) {
		if nodes.is_empty() {
			return;
		}
		let n = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (sx, sy) = (
			(sx / n - self.x) * self.strength,
			(sy / n - self.y) * self.strength,
		);
		for node in nodes.iter_mut() {
			node.x -= sx;
			node.y -= sy;
		}
	}
}

/// Force simulation over a fixed set of nodes and links.
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	forces: Vec<(String, Box<dyn Force>)>,
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	/// Velocity retained per tick (`1 - velocity_decay`).
	velocity_retention: f64,
	running: bool,
	random: Lcg,
}

impl Simulation {
	/// Build a running simulation with `link`, `charge` and `center` forces.
	///
	/// Links naming an unknown node id are dropped.
	pub fn new(data: &GraphData, config: &SimulationConfig, width: f64, height: f64) -> Self {
		let (cx, cy) = (width / 2.0, height / 2.0);
		let nodes: Vec<SimNode> = (0..data.nodes.len())
			.map(|i| SimNode::placed(i, cx, cy))
			.collect();

		let id_to_idx: HashMap<&str, usize> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), i))
			.collect();

		let links = data
			.links
			.iter()
			.enumerate()
			.filter_map(|(index, link)| {
				match (
					id_to_idx.get(link.source.as_str()),
					id_to_idx.get(link.target.as_str()),
				) {
					(Some(&source), Some(&target)) => Some(SimLink {
						index,
						source,
						target,
					}),
					_ => {
						debug!(
							"concept-graph: dropping link {} -> {}: unknown node id",
							link.source, link.target
						);
						None
					}
				}
			})
			.collect();

		let mut simulation = Self {
			nodes,
			links,
			forces: Vec::new(),
			alpha: config.alpha,
			alpha_min: config.alpha_min,
			alpha_decay: config.alpha_decay,
			alpha_target: config.alpha_target,
			velocity_retention: 1.0 - config.velocity_decay,
			running: true,
			random: Lcg::default(),
		};
		simulation.set_force("link", Box::new(LinkForce::new(config.link_distance)));
		simulation.set_force("charge", Box::new(ManyBodyForce::new(config.charge_strength)));
		simulation.set_force("center", Box::new(CenterForce::new(cx, cy)));
		simulation
	}

	/// Register `force` under `name`, replacing any force with that name in place.
	pub fn set_force(&mut self, name: &str, mut force: Box<dyn Force>) {
		force.initialize(&self.nodes, &self.links);
		match self.forces.iter_mut().find(|(n, _)| n == name) {
			Some(slot) => slot.1 = force,
			None => self.forces.push((name.to_string(), force)),
		}
	}

	/// Remove the force registered under `name`. Returns whether one existed.
	pub fn remove_force(&mut self, name: &str) -> bool {
		let before = self.forces.len();
		self.forces.retain(|(n, _)| n != name);
		self.forces.len() != before
	}

	/// Registered force names in application order.
	pub fn force_names(&self) -> impl Iterator<Item = &str> {
		self.forces.iter().map(|(n, _)| n.as_str())
	}

	/// Advance the simulation by one tick, regardless of whether it is running.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		for (_, force) in self.forces.iter_mut() {
			force.apply(&mut self.nodes, &self.links, self.alpha, &mut self.random);
		}

		for node in self.nodes.iter_mut() {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= self.velocity_retention;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= self.velocity_retention;
					node.y += node.vy;
				}
			}
		}
	}

	/// One scheduled step: tick if running, and stop once settled.
	///
	/// Returns whether a tick happened.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.alpha_min {
			self.running = false;
			debug!("concept-graph: simulation settled");
		}
		true
	}

	/// Resume stepping.
	pub fn restart(&mut self) {
		self.running = true;
	}

	/// Stop stepping. Positions are left as they are.
	pub fn stop(&mut self) {
		self.running = false;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	pub fn alpha_min(&self) -> f64 {
		self.alpha_min
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, index: usize) -> Option<&SimNode> {
		self.nodes.get(index)
	}

	pub fn node_mut(&mut self, index: usize) -> Option<&mut SimNode> {
		self.nodes.get_mut(index)
	}

	/// Links whose endpoints both exist.
	pub fn links(&self) -> &[SimLink] {
		&self.links
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn data(nodes: &[&str], links: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: nodes.iter().map(|id| GraphNode::new(*id)).collect(),
			links: links.iter().map(|(s, t)| GraphLink::new(*s, *t)).collect(),
		}
	}

	fn new_sim(data: &GraphData) -> Simulation {
		Simulation::new(data, &SimulationConfig::default(), 800.0, 600.0)
	}

	fn distance(a: &SimNode, b: &SimNode) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn registers_forces_in_order() {
		let sim = new_sim(&data(&["A"], &[]));
		assert_eq!(sim.force_names().collect::<Vec<_>>(), ["link", "charge", "center"]);
	}

	#[test]
	fn drops_dangling_links() {
		let sim = new_sim(&data(&["A", "B"], &[("A", "B"), ("A", "Z"), ("Y", "B")]));
		assert_eq!(
			sim.links(),
			&[SimLink {
				index: 0,
				source: 0,
				target: 1
			}]
		);
	}

	#[test]
	fn duplicate_ids_resolve_to_last_node() {
		let sim = new_sim(&data(&["A", "B", "A"], &[("B", "A")]));
		assert_eq!(sim.nodes().len(), 3);
		assert_eq!(
			sim.links(),
			&[SimLink {
				index: 0,
				source: 1,
				target: 2
			}]
		);
	}

	#[test]
	fn initial_placement_is_distinct_and_near_center() {
		let sim = new_sim(&data(&["A", "B", "C", "D"], &[]));
		for (i, a) in sim.nodes().iter().enumerate() {
			assert!(distance(a, &SimNode::placed(0, 400.0, 300.0)) < 50.0);
			for b in &sim.nodes()[i + 1..] {
				assert!(distance(a, b) > 1.0);
			}
		}
	}

	#[test]
	fn alpha_decays_and_simulation_stops() {
		let mut sim = new_sim(&data(&["A", "B"], &[("A", "B")]));
		let mut previous = sim.alpha();
		let mut ticks = 0;
		while sim.step() {
			assert!(sim.alpha() < previous);
			previous = sim.alpha();
			ticks += 1;
			assert!(ticks <= 400, "simulation never settled");
		}
		assert!(sim.alpha() < sim.alpha_min());
		assert!(!sim.is_running());
		assert!((295..=305).contains(&ticks), "settled after {ticks} ticks");
		assert!(!sim.step());
	}

	#[test]
	fn restart_with_target_raises_alpha() {
		let mut sim = new_sim(&data(&["A"], &[]));
		while sim.step() {}
		sim.set_alpha_target(0.3);
		sim.restart();
		let settled = sim.alpha();
		for _ in 0..10 {
			assert!(sim.step());
		}
		assert!(sim.alpha() > settled);
		assert!(sim.alpha() < 0.3);
	}

	#[test]
	fn linked_pair_settles_near_link_distance() {
		let mut sim = new_sim(&data(&["A", "B"], &[("A", "B")]));
		while sim.step() {}
		let d = distance(&sim.nodes()[0], &sim.nodes()[1]);
		assert!(d > 50.0 && d < 300.0, "distance {d}");
	}

	#[test]
	fn charge_pushes_unlinked_nodes_apart() {
		let mut sim = new_sim(&data(&["A", "B"], &[]));
		let before = distance(&sim.nodes()[0], &sim.nodes()[1]);
		for _ in 0..20 {
			sim.tick();
		}
		assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) > before);
	}

	#[test]
	fn center_force_keeps_centroid_on_canvas_center() {
		let mut sim = new_sim(&data(&["A", "B", "C"], &[("A", "B"), ("B", "C")]));
		for _ in 0..50 {
			sim.tick();
		}
		// Centering runs before velocity integration, so undo the last move.
		let n = sim.nodes().len() as f64;
		let cx = sim.nodes().iter().map(|n| n.x - n.vx).sum::<f64>() / n;
		let cy = sim.nodes().iter().map(|n| n.y - n.vy).sum::<f64>() / n;
		assert!((cx - 400.0).abs() < 1e-6, "cx {cx}");
		assert!((cy - 300.0).abs() < 1e-6, "cy {cy}");
	}

	#[test]
	fn fixed_node_stays_pinned() {
		let mut sim = new_sim(&data(&["A", "B"], &[("A", "B")]));
		let node = sim.node_mut(0).unwrap();
		node.fx = Some(123.0);
		node.fy = Some(45.0);
		for _ in 0..30 {
			sim.tick();
			let node = sim.node(0).unwrap();
			assert_eq!((node.x, node.y), (123.0, 45.0));
			assert_eq!((node.vx, node.vy), (0.0, 0.0));
		}
	}

	#[test]
	fn coincident_nodes_are_separated() {
		let mut sim = new_sim(&data(&["A", "B"], &[]));
		for node in 0..2 {
			let n = sim.node_mut(node).unwrap();
			n.x = 400.0;
			n.y = 300.0;
		}
		sim.tick();
		assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) > 0.0);
	}

	#[test]
	fn empty_simulation_runs_to_completion() {
		let mut sim = new_sim(&GraphData::default());
		while sim.step() {}
		assert!(sim.nodes().is_empty());
		assert!(sim.links().is_empty());
	}

	#[test]
	fn set_force_replaces_in_place_and_remove_drops() {
		let mut sim = new_sim(&data(&["A"], &[]));
		sim.set_force("charge", Box::new(ManyBodyForce::new(-30.0)));
		assert_eq!(sim.force_names().collect::<Vec<_>>(), ["link", "charge", "center"]);
		assert!(sim.remove_force("charge"));
		assert!(!sim.remove_force("charge"));
		assert_eq!(sim.force_names().collect::<Vec<_>>(), ["link", "center"]);
	}

	#[test]
	fn lcg_is_deterministic_and_in_range() {
		let (mut a, mut b) = (Lcg::default(), Lcg::default());
		for _ in 0..100 {
			let v = a.next_f64();
			assert_eq!(v, b.next_f64());
			assert!((0.0..1.0).contains(&v));
		}
	}
}
