//! garden-graph: Interactive force-directed graph of a digital garden.
//!
//! This crate provides a WASM-based graph visualization component that lays
//! out notes with an alpha-cooled force simulation, lets nodes be dragged,
//! and reports node clicks so the page can show the selected note.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod sample;

pub use components::force_graph::{
	ConstructionError, ForceGraphCanvas, ForceGraphState, Graph, GraphData, GraphLink, GraphNode, ManyBodyStrategy,
	NodeIdx, Pin, Point, Release, Simulation, SimulationConfig, Size, Theme, ThemeName,
};

/// Page-level configuration read from `<script id="graph-config">`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Physics parameters.
	pub simulation: SimulationConfig,
	/// Visual preset.
	pub theme: ThemeName,
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("garden-graph: logging initialized");
}

/// Parse the JSON body of a `<script>` element, if present and valid.
fn load_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("garden-graph: failed to parse #{id}: {e}");
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let data = load_script_json::<GraphData>("graph-data")?;
	info!(
		"garden-graph: loaded {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Some(data)
}

/// Main application component.
/// Loads graph data and config from the DOM and renders the garden graph with
/// a details panel for the last clicked node.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(|| {
		info!("garden-graph: no embedded graph data, using sample garden");
		sample::garden()
	});
	let config = load_script_json::<GraphConfig>("graph-config").unwrap_or_default();

	let selected = RwSignal::new(None::<String>);
	let on_node_click = Callback::new(move |id: String| {
		info!("garden-graph: selected {id}");
		selected.set(Some(id));
	});

	let panel_data = graph_data.clone();
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Digital Garden" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="garden">
			<header>
				<h1>"Digital Garden"</h1>
				<p class="subtitle">"Drag nodes to rearrange. Click a node to see its details."</p>
			</header>
			<div class="garden-graph">
				<ForceGraphCanvas
					data=graph_signal
					on_node_click=on_node_click
					config=config.simulation
					theme=Theme::from(config.theme)
					height=Some(500.0)
				/>
			</div>
			{move || {
				let id = selected.get()?;
				let node = panel_data.node(&id)?;
				Some(view! {
					<aside class="node-details">
						<h2>{node.title.clone()}</h2>
						<dl>
							<dt>"ID"</dt>
							<dd>{node.id.clone()}</dd>
							<dt>"Group"</dt>
							<dd>{node.group}</dd>
							<dt>"Connections"</dt>
							<dd>{panel_data.connection_count(&id)}</dd>
						</dl>
					</aside>
				})
			}}
		</main>
	}
}
