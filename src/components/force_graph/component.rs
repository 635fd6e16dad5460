//! Leptos component rendering the force-directed graph as SVG.
//!
//! The component creates a fixed-size SVG with four layers (links, link labels,
//! nodes, node labels) and wires up pointer handlers for node dragging. An
//! animation loop runs via `requestAnimationFrame`, stepping the simulation and
//! publishing the new [`Scene`] each frame the layout moved. The loop pauses
//! once the layout settles, resumes on drag, and is torn down with the
//! component.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{Element, PointerEvent};

use super::config::GraphConfig;
use super::render::Scene;
use super::state::GraphState;
use super::types::GraphData;

fn attr(value: Option<f64>) -> String {
	value.map(|v| v.to_string()).unwrap_or_default()
}

/// `requestAnimationFrame` scheduling with at most one pending frame.
///
/// The frame callback captures the loop itself; [`cancel`](Self::cancel) drops
/// it, releasing everything it holds.
#[derive(Default)]
struct FrameLoop {
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
	pending: Cell<Option<i32>>,
}

impl FrameLoop {
	fn request(&self) {
		if self.pending.get().is_some() {
			return;
		}
		let callback = self.callback.borrow();
		let (Some(cb), Some(window)) = (callback.as_ref(), web_sys::window()) else {
			return;
		};
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(handle) => self.pending.set(Some(handle)),
			Err(e) => warn!("concept-graph: could not schedule frame: {e:?}"),
		}
	}

	fn cancel(&self) {
		if let (Some(handle), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
		self.callback.borrow_mut().take();
	}
}

/// Renders an interactive force-directed graph for `data`.
///
/// The dataset shape is fixed for the lifetime of the component; only positions
/// change. Drag a circle with a mouse, pen or finger to pin its node under the
/// pointer.
#[component]
pub fn GraphView(data: GraphData, #[prop(optional)] config: GraphConfig) -> impl IntoView {
	let GraphConfig {
		width,
		height,
		simulation,
		theme,
		..
	} = config;

	let state = Rc::new(RefCell::new(GraphState::new(&data, &simulation, width, height)));
	let scene = RwSignal::new(Scene::build(&state.borrow(), &data, &theme));
	let link_stroke = theme.link.stroke.clone();
	let link_width = theme.link.width.to_string();
	let link_label_fill = theme.link.label_fill.clone();
	let node_fill = theme.node.fill.clone();
	let label_fill = theme.label.fill.clone();
	let label_style = format!(
		"font: {}; pointer-events: none; user-select: none;",
		theme.label.font
	);
	let link_label_style = label_style.clone();

	let svg_ref = NodeRef::<leptos::svg::Svg>::new();
	let frames = Rc::new(FrameLoop::default());

	let (state_cb, frames_cb) = (state.clone(), frames.clone());
	*frames.callback.borrow_mut() = Some(Closure::new(move || {
		frames_cb.pending.set(None);
		let (next, again) = {
			let mut state = state_cb.borrow_mut();
			let next = state.tick().then(|| Scene::build(&state, &data, &theme));
			(next, state.needs_frame())
		};
		if let Some(next) = next {
			scene.maybe_update(|current| current.update_positions(&next));
		}
		if again {
			frames_cb.request();
		} else {
			debug!("concept-graph: layout settled, animation paused");
		}
	}));

	let frames_start = frames.clone();
	Effect::new(move |_| frames_start.request());

	let teardown = SendWrapper::new((frames.clone(), state.clone()));
	on_cleanup(move || {
		let (frames, state) = &*teardown;
		frames.cancel();
		state.borrow_mut().simulation.stop();
		debug!("concept-graph: animation loop stopped");
	});

	// Pointer position in surface coordinates.
	let pointer = move |ev: &PointerEvent| -> Option<(f64, f64)> {
		let svg = svg_ref.get()?;
		let rect = svg.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_pm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		if !ev.is_primary() {
			return;
		}
		let mut state = state_pm.borrow_mut();
		if !state.is_dragging() {
			return;
		}
		if let Some((x, y)) = pointer(&ev) {
			state.drag_move(x, y);
		}
	};

	let state_pu = state.clone();
	let on_pointerup = move |ev: PointerEvent| {
		if ev.is_primary() {
			state_pu.borrow_mut().drag_end();
		}
	};

	let state_pc = state.clone();
	let on_pointercancel = move |ev: PointerEvent| {
		if ev.is_primary() {
			state_pc.borrow_mut().drag_end();
		}
	};

	let (line_count, marker_count) = scene.with_untracked(|s| (s.lines.len(), s.markers.len()));

	let lines = (0..line_count)
		.map(|i| {
			view! {
				<line
					x1=move || scene.with(|s| attr(s.lines.get(i).map(|l| l.x1)))
					y1=move || scene.with(|s| attr(s.lines.get(i).map(|l| l.y1)))
					x2=move || scene.with(|s| attr(s.lines.get(i).map(|l| l.x2)))
					y2=move || scene.with(|s| attr(s.lines.get(i).map(|l| l.y2)))
				/>
			}
		})
		.collect_view();

	let link_labels = scene
		.with_untracked(|s| s.link_labels.iter().map(|l| l.text.clone()).collect::<Vec<_>>())
		.into_iter()
		.enumerate()
		.map(|(i, text)| {
			view! {
				<text
					x=move || scene.with(|s| attr(s.link_labels.get(i).map(|l| l.x)))
					y=move || scene.with(|s| attr(s.link_labels.get(i).map(|l| l.y)))
				>
					{text}
				</text>
			}
		})
		.collect_view();

	let markers = (0..marker_count)
		.map(|i| {
			let (state_pd, frames_pd) = (state.clone(), frames.clone());
			let on_pointerdown = move |ev: PointerEvent| {
				if !ev.is_primary() {
					return;
				}
				ev.prevent_default();
				// Capture keeps move and up events coming after the pointer leaves the SVG.
				if let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) {
					let _ = target.set_pointer_capture(ev.pointer_id());
				}
				state_pd.borrow_mut().drag_start(i);
				frames_pd.request();
			};
			view! {
				<circle
					cx=move || scene.with(|s| attr(s.markers.get(i).map(|m| m.cx)))
					cy=move || scene.with(|s| attr(s.markers.get(i).map(|m| m.cy)))
					r=move || scene.with(|s| attr(s.markers.get(i).map(|m| m.r)))
					on:pointerdown=on_pointerdown
				/>
			}
		})
		.collect_view();

	let labels = scene
		.with_untracked(|s| s.labels.iter().map(|l| l.lines.clone()).collect::<Vec<_>>())
		.into_iter()
		.enumerate()
		.map(|(i, lines)| {
			let x = move || scene.with(|s| attr(s.labels.get(i).map(|l| l.x)));
			let spans = lines
				.into_iter()
				.enumerate()
				.map(|(k, line)| {
					let dy = if k == 0 { "0" } else { "1.2em" };
					view! {
						<tspan x=x dy=dy>
							{line}
						</tspan>
					}
				})
				.collect_view();
			view! {
				<text x=x y=move || scene.with(|s| attr(s.labels.get(i).map(|l| l.y)))>
					{spans}
				</text>
			}
		})
		.collect_view();

	view! {
		<svg
			node_ref=svg_ref
			class="concept-graph"
			width=width.to_string()
			height=height.to_string()
			style="touch-action: none;"
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointercancel=on_pointercancel
		>
			<g class="links" stroke=link_stroke stroke-width=link_width>
				{lines}
			</g>
			<g
				class="link-labels"
				fill=link_label_fill
				text-anchor="middle"
				style=link_label_style
			>
				{link_labels}
			</g>
			<g class="nodes" fill=node_fill style="cursor: grab;">
				{markers}
			</g>
			<g class="labels" fill=label_fill style=label_style>
				{labels}
			</g>
		</svg>
	}
}
