//! Dataset structures loaded from the graph JSON file.

use serde::{Deserialize, Serialize};

/// A node in the dataset.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Optional display text. The label layer falls back to `id` when unset.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

impl GraphNode {
	/// Node with only an id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: None,
		}
	}

	/// Text shown next to the node marker.
	pub fn display_text(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.id)
	}
}

/// A directed edge between two nodes, referenced by id.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Optional text drawn at the middle of the line.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

impl GraphLink {
	/// Link from `source` to `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			label: None,
		}
	}

	/// Attach a line label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}

/// Complete dataset: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	/// Nodes in file order.
	pub nodes: Vec<GraphNode>,
	/// Links in file order.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parse a dataset from its JSON text.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}
