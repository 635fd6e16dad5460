//! End-to-end checks of the view pipeline: dataset → simulation → scene.

// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use concept_graph::components::force_graph::{
	DragState, GraphData, GraphState, Scene, SimulationConfig, Theme,
};

fn load(json: &str) -> (GraphData, GraphState) {
	let data = GraphData::from_json(json).expect("valid dataset");
	let state = GraphState::new(&data, &SimulationConfig::default(), 800.0, 600.0);
	(data, state)
}

fn settle(state: &mut GraphState) -> usize {
	let mut ticks = 0;
	while state.tick() {
		ticks += 1;
		assert!(ticks < 2_000, "layout never settled");
	}
	ticks
}

#[test]
fn two_linked_nodes_render_two_markers_one_line_two_labels() {
	let (data, mut state) =
		load(r#"{"nodes":[{"id":"A"},{"id":"B"}],"links":[{"source":"A","target":"B"}]}"#);
	settle(&mut state);
	let scene = Scene::build(&state, &data, &Theme::default());

	assert_eq!(scene.markers.len(), 2);
	assert_eq!(scene.lines.len(), 1);
	assert_eq!(scene.labels.len(), 2);

	let (a, b) = (&scene.markers[0], &scene.markers[1]);
	let separation = ((a.cx - b.cx).powi(2) + (a.cy - b.cy).powi(2)).sqrt();
	assert!(
		(50.0..250.0).contains(&separation),
		"separation {separation} not near the link distance"
	);
}

#[test]
fn empty_dataset_initializes_and_renders_nothing() {
	let (data, mut state) = load(r#"{"nodes":[],"links":[]}"#);
	settle(&mut state);
	let scene = Scene::build(&state, &data, &Theme::default());
	assert!(scene.markers.is_empty());
	assert!(scene.lines.is_empty());
}

#[test]
fn link_to_missing_node_is_omitted() {
	let (data, mut state) =
		load(r#"{"nodes":[{"id":"A"},{"id":"B"}],"links":[{"source":"A","target":"Z"}]}"#);
	state.tick();
	let scene = Scene::build(&state, &data, &Theme::default());
	assert_eq!(scene.markers.len(), 2);
	assert!(scene.lines.is_empty());
}

#[test]
fn settled_layout_rerenders_identically() {
	let (data, mut state) = load(
		r#"{"nodes":[{"id":"A"},{"id":"B"},{"id":"C"}],
		    "links":[{"source":"A","target":"B"},{"source":"B","target":"C"}]}"#,
	);
	settle(&mut state);
	let theme = Theme::default();
	let mut first = Scene::build(&state, &data, &theme);
	assert!(!state.tick());
	let second = Scene::build(&state, &data, &theme);
	assert!(!first.update_positions(&second));
}

#[test]
fn drag_pins_to_pointer_then_releases() {
	let (data, mut state) =
		load(r#"{"nodes":[{"id":"A"},{"id":"B"}],"links":[{"source":"A","target":"B"}]}"#);
	settle(&mut state);

	state.drag_start(0);
	assert!(state.simulation.is_running());
	for (x, y) in [(200.0, 150.0), (220.0, 160.0), (640.0, 480.0)] {
		state.drag_move(x, y);
		state.tick();
		let node = &state.simulation.nodes()[0];
		assert_eq!((node.fx, node.fy), (Some(x), Some(y)));
		let scene = Scene::build(&state, &data, &Theme::default());
		assert_eq!((scene.markers[0].cx, scene.markers[0].cy), (x, y));
	}

	state.drag_end();
	assert_eq!(state.drag, DragState::Idle);
	let node = &state.simulation.nodes()[0];
	assert_eq!((node.fx, node.fy), (None, None));
	settle(&mut state);
	assert!(!state.simulation.is_running());
}

#[test]
fn animation_pauses_when_settled_and_resumes_for_a_drag() {
	let (_, mut state) =
		load(r#"{"nodes":[{"id":"A"},{"id":"B"}],"links":[{"source":"A","target":"B"}]}"#);
	settle(&mut state);
	assert!(!state.needs_frame());

	state.drag_start(1);
	assert!(state.needs_frame());
	state.drag_move(-30.0, 700.0);
	assert!(state.tick());
	let node = &state.simulation.nodes()[1];
	assert_eq!((node.x, node.y), (-30.0, 700.0));
}

#[test]
fn labels_wrap_and_category_links_are_named() {
	let (data, state) = load(
		r#"{"nodes":[{"id":"Inception"},{"id":"Genre"},{"id":"Mad Max: Fury Road"}],
		    "links":[{"source":"Inception","target":"Genre","label":"Genre"},
		             {"source":"Genre","target":"Mad Max: Fury Road"}]}"#,
	);
	let scene = Scene::build(&state, &data, &Theme::default());
	assert_eq!(scene.labels[2].lines, ["Mad Max: Fury", "Road"]);
	assert_eq!(scene.link_labels.len(), 1);
	assert_eq!(scene.link_labels[0].text, "Genre");
}
