//! concept-graph: interactive force-directed concept graph for the browser.
//!
//! This crate provides a WASM graph view that loads a JSON dataset of nodes and
//! links, lays it out with a force simulation and renders it as SVG with
//! draggable nodes. The [`concept_tree`] module builds such datasets from a
//! title catalogue.

// Used only by the generate-graph-data binary.
use clap as _;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, error, info};

pub mod components;
pub mod concept_tree;

pub use components::force_graph::{
	GraphConfig, GraphData, GraphLink, GraphNode, GraphView, LoadError, load_graph_data,
};

/// Id of the page element the view is mounted into.
pub const GRAPH_ELEMENT_ID: &str = "graph";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("concept-graph: logging initialized");
}

/// Main application component.
/// Fetches the dataset and renders the graph once it has loaded. A failed load
/// is logged and leaves the page empty.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = GraphConfig::from_page();
	let graph_data = RwSignal::new(None::<GraphData>);

	let url = config.data_url.clone();
	spawn_local(async move {
		match load_graph_data(&url).await {
			Ok(data) => graph_data.set(Some(data)),
			Err(e) => error!("concept-graph: failed to load graph data: {}", e),
		}
	});

	view! {
		<Title text="Concept Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		{move || {
			graph_data
				.get()
				.map(|data| view! { <GraphView data=data config=config.clone() /> })
		}}
	}
}
