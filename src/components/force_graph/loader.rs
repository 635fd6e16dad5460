//! Asynchronous dataset loading.

use log::info;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::types::GraphData;

/// Why the dataset could not be loaded.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("no browser window available")]
	NoWindow,
	#[error("request for {url} failed: {message}")]
	Network { url: String, message: String },
	#[error("{url} answered with HTTP {status}")]
	Status { url: String, status: u16 },
	#[error("could not read response body: {0}")]
	Body(String),
	#[error("invalid graph data: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Best-effort text for a rejected JS promise.
fn describe(value: &JsValue) -> String {
	value
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.or_else(|| value.as_string())
		.unwrap_or_else(|| format!("{value:?}"))
}

/// Fetch and parse the dataset at `url`.
pub async fn load_graph_data(url: &str) -> Result<GraphData, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let network_error = |e: JsValue| LoadError::Network {
		url: url.to_string(),
		message: describe(&e),
	};

	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(network_error)?
		.dyn_into()
		.map_err(network_error)?;
	if !response.ok() {
		return Err(LoadError::Status {
			url: url.to_string(),
			status: response.status(),
		});
	}

	let body = response.text().map_err(|e| LoadError::Body(describe(&e)))?;
	let text = JsFuture::from(body)
		.await
		.map_err(|e| LoadError::Body(describe(&e)))?
		.as_string()
		.ok_or_else(|| LoadError::Body("response body is not text".to_string()))?;

	let data = GraphData::from_json(&text)?;
	info!(
		"concept-graph: loaded {} nodes, {} links from {}",
		data.nodes.len(),
		data.links.len(),
		url
	);
	Ok(data)
}
