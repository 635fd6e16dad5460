//! Render model for the SVG layers.
//!
//! The scene is rebuilt from [`GraphState`] after every simulation tick and
//! published to the view, which only copies its values into SVG attributes.
//! Layers draw in order:
//! 1. Link lines
//! 2. Link labels
//! 3. Node markers
//! 4. Node labels

use super::state::GraphState;
use super::theme::Theme;
use super::types::GraphData;

/// A link line between two node centers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineShape {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

/// A node marker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Marker {
	pub cx: f64,
	pub cy: f64,
	pub r: f64,
}

/// A node label anchored next to its marker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Label {
	pub x: f64,
	pub y: f64,
	pub text: String,
	/// `text` wrapped to the theme's line width.
	pub lines: Vec<String>,
}

/// Text centered on a labelled link.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkLabel {
	pub x: f64,
	pub y: f64,
	pub text: String,
}

/// Greedy word wrap to at most `width` characters per line.
///
/// Words longer than `width` are split across lines. A `width` of zero keeps
/// the text on one line.
pub fn wrap_label(text: &str, width: usize) -> Vec<String> {
	if width == 0 {
		return vec![text.to_string()];
	}
	let mut lines = Vec::new();
	let mut line = String::new();
	for word in text.split_whitespace() {
		let mut chars: Vec<char> = word.chars().collect();
		let line_len = line.chars().count();
		if !line.is_empty() && line_len + 1 + chars.len() <= width {
			line.push(' ');
			line.extend(chars);
			continue;
		}
		if !line.is_empty() {
			lines.push(std::mem::take(&mut line));
		}
		while chars.len() > width {
			lines.push(chars.drain(..width).collect());
		}
		line.extend(chars);
	}
	if !line.is_empty() {
		lines.push(line);
	}
	lines
}

/// Everything the view draws for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub lines: Vec<LineShape>,
	pub link_labels: Vec<LinkLabel>,
	pub markers: Vec<Marker>,
	pub labels: Vec<Label>,
}

impl Scene {
	/// Build the scene for the current node positions.
	///
	/// `data` supplies label text; it must be the dataset `state` was built from.
	pub fn build(state: &GraphState, data: &GraphData, theme: &Theme) -> Self {
		let nodes = state.simulation.nodes();
		let links = state.simulation.links();

		let lines = links
			.iter()
			.map(|link| {
				let (s, t) = (&nodes[link.source], &nodes[link.target]);
				LineShape {
					x1: s.x,
					y1: s.y,
					x2: t.x,
					y2: t.y,
				}
			})
			.collect();

		let link_labels = links
			.iter()
			.filter_map(|link| {
				let text = data.links.get(link.index)?.label.clone()?;
				let (s, t) = (&nodes[link.source], &nodes[link.target]);
				Some(LinkLabel {
					x: (s.x + t.x) / 2.0,
					y: (s.y + t.y) / 2.0,
					text,
				})
			})
			.collect();

		let markers = nodes
			.iter()
			.map(|n| Marker {
				cx: n.x,
				cy: n.y,
				r: theme.node.radius,
			})
			.collect();

		let labels = nodes
			.iter()
			.zip(&data.nodes)
			.map(|(n, node)| Label {
				x: n.x + theme.label.dx,
				y: n.y + theme.label.dy,
				text: node.display_text().to_string(),
				lines: wrap_label(node.display_text(), theme.label.wrap_width),
			})
			.collect();

		Self {
			width: state.width,
			height: state.height,
			lines,
			link_labels,
			markers,
			labels,
		}
	}

	/// Copy positions from a scene with the same shape, leaving label text as is.
	///
	/// Returns whether any coordinate changed.
	pub fn update_positions(&mut self, next: &Scene) -> bool {
		let mut changed = false;
		for (line, new) in self.lines.iter_mut().zip(&next.lines) {
			if line != new {
				*line = new.clone();
				changed = true;
			}
		}
		for (label, new) in self.link_labels.iter_mut().zip(&next.link_labels) {
			if (label.x, label.y) != (new.x, new.y) {
				label.x = new.x;
				label.y = new.y;
				changed = true;
			}
		}
		for (marker, new) in self.markers.iter_mut().zip(&next.markers) {
			if marker != new {
				*marker = new.clone();
				changed = true;
			}
		}
		for (label, new) in self.labels.iter_mut().zip(&next.labels) {
			if (label.x, label.y) != (new.x, new.y) {
				label.x = new.x;
				label.y = new.y;
				changed = true;
			}
		}
		changed
	}
}
