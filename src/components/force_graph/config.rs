//! View configuration.
//!
//! Every value has a default, and a page may override any subset through a JSON
//! script element:
//!
//! ```html
//! <script type="application/json" id="graph-config">
//!   { "width": 1024, "simulation": { "charge_strength": -250 } }
//! </script>
//! ```

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use super::simulation::SimulationConfig;
use super::theme::Theme;

/// Id of the optional configuration script element.
pub const CONFIG_ELEMENT_ID: &str = "graph-config";

/// Default dataset location, relative to the page.
pub const DEFAULT_DATA_URL: &str = "static/js/graph_data.json";

/// Complete view configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Dataset URL.
	pub data_url: String,
	/// Drawing surface width in logical units.
	pub width: f64,
	/// Drawing surface height in logical units.
	pub height: f64,
	pub simulation: SimulationConfig,
	pub theme: Theme,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			data_url: DEFAULT_DATA_URL.to_string(),
			width: 800.0,
			height: 600.0,
			simulation: SimulationConfig::default(),
			theme: Theme::default(),
		}
	}
}

impl GraphConfig {
	/// Parse an override document. Missing fields keep their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Read the configuration from the page, falling back to defaults when the
	/// element is absent or malformed.
	pub fn from_page() -> Self {
		let Some(text) = config_element_text() else {
			return Self::default();
		};
		match Self::from_json(&text) {
			Ok(config) => {
				info!("concept-graph: loaded configuration from #{CONFIG_ELEMENT_ID}");
				config
			}
			Err(e) => {
				warn!("concept-graph: ignoring invalid configuration: {}", e);
				Self::default()
			}
		}
	}
}

fn config_element_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_presentation_constants() {
		let config = GraphConfig::default();
		assert_eq!((config.width, config.height), (800.0, 600.0));
		assert_eq!(config.data_url, "static/js/graph_data.json");
		assert_eq!(config.simulation.link_distance, 100.0);
		assert_eq!(config.simulation.charge_strength, -400.0);
		assert_eq!(config.theme.node.radius, 10.0);
	}

	#[test]
	fn nested_override_keeps_siblings() {
		let config =
			GraphConfig::from_json(r#"{"width":1024,"simulation":{"charge_strength":-250}}"#)
				.unwrap();
		assert_eq!(config.width, 1024.0);
		assert_eq!(config.height, 600.0);
		assert_eq!(config.simulation.charge_strength, -250.0);
		assert_eq!(config.simulation.link_distance, 100.0);
	}

	#[test]
	fn malformed_override_is_an_error() {
		assert!(GraphConfig::from_json(r#"{"width":"wide"}"#).is_err());
	}
}
