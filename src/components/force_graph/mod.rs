//! Force-directed graph visualization component.
//!
//! Renders an interactive force-directed graph on an HTML canvas with:
//! - An alpha-cooled force simulation (link springs, many-body repulsion, centering)
//! - Node dragging that pins the held node and reheats the layout
//! - Click reporting for nodes pressed and released in place
//!
//! Everything except [`ForceGraphCanvas`] is plain Rust and runs off the browser.
//!
//! # Example
//!
//! ```ignore
//! use garden_graph::{ForceGraphCanvas, GraphData, GraphNode, GraphLink};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "a".into(), title: "Node A".into(), group: 1 },
//!         GraphNode { id: "b".into(), title: "Node B".into(), group: 2 },
//!     ],
//!     links: vec![
//!         GraphLink { source: "a".into(), target: "b".into(), value: 1.0 },
//!     ],
//! };
//!
//! view! { <ForceGraphCanvas data=data.into() on_node_click=|id: String| log::info!("{id}") /> }
//! ```

mod component;
pub mod forces;
pub mod geometry;
pub mod graph;
pub mod interaction;
pub mod quadtree;
pub mod render;
pub mod simulation;
pub mod state;
pub mod theme;
mod types;

pub use component::ForceGraphCanvas;
pub use forces::ManyBodyStrategy;
pub use geometry::{Point, Size};
pub use graph::{ConstructionError, Graph, NodeIdx};
pub use interaction::{Gesture, Release};
pub use simulation::{Pin, Positions, Simulation, SimulationConfig, StopHandle};
pub use state::ForceGraphState;
pub use theme::{Theme, ThemeName};
pub use types::{GraphData, GraphLink, GraphNode};
