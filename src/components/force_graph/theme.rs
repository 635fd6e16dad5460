//! Visual theming for the graph view.
//!
//! Colors are CSS color strings and are written to SVG attributes as-is.

use serde::Deserialize;

/// Node marker styling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
	/// Circle radius in surface units.
	pub radius: f64,
	/// Circle fill.
	pub fill: String,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			radius: 10.0,
			fill: "lightblue".to_string(),
		}
	}
}

/// Link line styling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
	/// Line stroke.
	pub stroke: String,
	/// Line stroke width.
	pub width: f64,
	/// Fill of link label text.
	pub label_fill: String,
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			stroke: "#aaa".to_string(),
			width: 1.0,
			label_fill: "red".to_string(),
		}
	}
}

/// Label styling. Labels sit at the node position plus `(dx, dy)`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
	pub dx: f64,
	pub dy: f64,
	/// CSS font shorthand applied to the label layer.
	pub font: String,
	pub fill: String,
	/// Maximum characters per label line; `0` keeps labels on one line.
	pub wrap_width: usize,
}

impl Default for LabelStyle {
	fn default() -> Self {
		Self {
			dx: 15.0,
			dy: 5.0,
			font: "12px sans-serif".to_string(),
			fill: "#333".to_string(),
			wrap_width: 15,
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
	pub node: NodeStyle,
	pub link: LinkStyle,
	pub label: LabelStyle,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_override_keeps_other_defaults() {
		let theme: Theme = serde_json::from_str(r#"{"node":{"fill":"tomato"}}"#).unwrap();
		assert_eq!(theme.node.fill, "tomato");
		assert_eq!(theme.node.radius, 10.0);
		assert_eq!(theme.link, LinkStyle::default());
		assert_eq!((theme.label.dx, theme.label.dy), (15.0, 5.0));
		assert_eq!(theme.label.wrap_width, 15);
	}
}
