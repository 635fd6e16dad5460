//! Client entrypoint for the CSR build.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use concept_graph::{App, GRAPH_ELEMENT_ID, init_logging};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

fn main() {
	init_logging();

	let target = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(GRAPH_ELEMENT_ID))
		.and_then(|e| e.dyn_into::<HtmlElement>().ok());

	match target {
		Some(parent) => leptos::mount::mount_to(parent, || view! { <App /> }).forget(),
		None => mount_to_body(|| view! { <App /> }),
	}
}
