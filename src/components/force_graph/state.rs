//! Graph simulation state and interaction tracking.
//!
//! Ties the validated [`Graph`], its [`Simulation`] and the current pointer
//! [`Gesture`] together, and tracks hover plus a redraw flag so the animation
//! loop only repaints when something changed.

use std::cell::Cell;
use std::rc::Rc;

use log::info;

use super::geometry::{Point, Size};
use super::graph::{ConstructionError, Graph, NodeIdx};
use super::interaction::{Gesture, Release};
use super::simulation::{Simulation, SimulationConfig};
use super::theme::Theme;
use super::types::GraphData;

/// Core graph state combining physics simulation with interaction tracking.
///
/// Created once when the component mounts, then mutated each frame by the
/// animation loop and by pointer handlers.
pub struct ForceGraphState {
	pub graph: Graph,
	pub sim: Simulation,
	pub gesture: Gesture,
	/// Node under the pointer.
	pub hovered: Option<NodeIdx>,
	pub width: f64,
	pub height: f64,
	hit_radius: f64,
	dirty: Rc<Cell<bool>>,
}

impl ForceGraphState {
	/// Validate `data` and start a simulation centered in a `width` x `height` canvas.
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		config: SimulationConfig,
		theme: &Theme,
	) -> Result<Self, ConstructionError> {
		let graph = Graph::try_from(data)?;
		let mut sim = Simulation::start(&graph, Size::new(width, height), config);

		let dirty = Rc::new(Cell::new(true));
		let flag = dirty.clone();
		sim.on_tick(move |_| flag.set(true));

		info!(
			"force graph: {} nodes, {} links on {width}x{height}",
			graph.len(),
			graph.links().len()
		);

		Ok(Self {
			graph,
			sim,
			gesture: Gesture::default(),
			hovered: None,
			width,
			height,
			hit_radius: theme.hit_radius(),
			dirty,
		})
	}

	/// Topmost node under the point. Later nodes are drawn over earlier ones,
	/// so the last hit wins.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeIdx> {
		let pointer = Point::new(sx, sy);
		let positions = self.sim.positions();
		self.graph
			.indices()
			.filter(|&idx| positions.get(idx).distance(pointer) <= self.hit_radius)
			.last()
	}

	/// Returns `true` if the hovered node changed.
	pub fn set_hover(&mut self, node: Option<NodeIdx>) -> bool {
		if self.hovered == node {
			return false;
		}
		self.hovered = node;
		self.dirty.set(true);
		true
	}

	/// Advance the simulation by one tick. Returns `true` while it wants more.
	pub fn tick(&mut self) -> bool {
		self.sim.step()
	}

	/// Whether a repaint is due. Clears the flag.
	pub fn take_redraw(&self) -> bool {
		self.dirty.replace(false)
	}

	/// Press at canvas coordinates. Returns `true` if a node was grabbed.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> bool {
		let Some(node) = self.node_at_position(sx, sy) else {
			return false;
		};
		self.gesture.press(&mut self.sim, node, Point::new(sx, sy));
		self.dirty.set(true);
		true
	}

	/// Drag the held node, or update hover when nothing is held.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.gesture.held_node().is_some() {
			if self.gesture.drag_to(&mut self.sim, Point::new(sx, sy)) {
				self.dirty.set(true);
			}
			return;
		}
		let hit = self.node_at_position(sx, sy);
		self.set_hover(hit);
	}

	/// Finish the current gesture. A click reports the node's id to `on_click`.
	pub fn pointer_up(&mut self, mut on_click: impl FnMut(&str)) -> Release {
		let release = self.gesture.release(&mut self.sim);
		if let Release::Click(idx) = release {
			on_click(&self.graph.node(idx).id);
		}
		release
	}

	/// Pointer left the canvas: drop any held node without a click and clear hover.
	pub fn pointer_leave(&mut self) {
		self.gesture.cancel(&mut self.sim);
		self.set_hover(None);
	}

	/// CSS cursor for the canvas.
	pub fn cursor(&self) -> &'static str {
		if self.gesture.is_dragging() {
			"grabbing"
		} else if self.hovered.is_some() {
			"pointer"
		} else {
			"default"
		}
	}

	/// Track a new canvas size and move the centering target with it.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.set_center(Size::new(width, height).center());
		self.dirty.set(true);
	}

	/// Stop the simulation for good.
	pub fn stop(&self) {
		self.sim.stop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::simulation::Pin;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn data() -> GraphData {
		GraphData {
			nodes: ["A", "B", "C"]
				.map(|id| GraphNode {
					id: id.to_string(),
					title: format!("Node {id}"),
					group: 1,
				})
				.to_vec(),
			links: [("A", "B"), ("B", "C")]
				.map(|(s, t)| GraphLink {
					source: s.to_string(),
					target: t.to_string(),
					value: 1.0,
				})
				.to_vec(),
		}
	}

	fn state() -> ForceGraphState {
		let mut state =
			ForceGraphState::new(&data(), 600.0, 400.0, SimulationConfig::default(), &Theme::default()).unwrap();
		state.sim.run_until_settled(1_000);
		state
	}

	fn snapshot(state: &ForceGraphState) -> Vec<Point> {
		state.sim.positions().iter().collect()
	}

	#[test]
	fn invalid_data_is_rejected() {
		let mut bad = data();
		bad.links[0].target = "Z".to_string();
		let err = ForceGraphState::new(&bad, 100.0, 100.0, SimulationConfig::default(), &Theme::default())
			.err()
			.unwrap();
		assert!(matches!(err, ConstructionError::DanglingLink { .. }));
	}

	#[test]
	fn hit_test_uses_node_radius_plus_slop() {
		let state = state();
		let b = state.graph.lookup("B").unwrap();
		let p = state.sim.position(b);

		assert_eq!(state.node_at_position(p.x + 11.5, p.y), Some(b));
		assert_eq!(state.node_at_position(p.x + 12.5, p.y), None);
	}

	#[test]
	fn click_reports_id_and_moves_nothing() {
		let mut state = state();
		let b = state.graph.lookup("B").unwrap();
		let at = state.sim.position(b);
		let before = snapshot(&state);

		let mut clicked = Vec::new();
		assert!(state.pointer_down(at.x + 1.0, at.y - 1.0));
		state.pointer_move(at.x + 2.0, at.y);
		let release = state.pointer_up(|id| clicked.push(id.to_string()));

		assert_eq!(release, Release::Click(b));
		assert_eq!(clicked, ["B"]);
		assert_eq!(before, snapshot(&state));
	}

	#[test]
	fn drag_does_not_click() {
		let mut state = state();
		let a = state.graph.lookup("A").unwrap();
		let at = state.sim.position(a);

		state.pointer_down(at.x, at.y);
		state.pointer_move(50.0, 50.0);
		assert_eq!(state.cursor(), "grabbing");
		let Pin::At(pinned) = state.sim.pin_of(a) else {
			panic!("dragged node should be pinned");
		};
		assert!(pinned.distance(Point::new(50.0, 50.0)) < 1e-9);

		let mut clicked = false;
		assert_eq!(state.pointer_up(|_| clicked = true), Release::DragEnd(a));
		assert!(!clicked);
		assert_eq!(state.sim.pin_of(a), Pin::None);
	}

	#[test]
	fn press_on_empty_space_is_ignored() {
		let mut state = state();
		assert!(!state.pointer_down(-500.0, -500.0));
		assert_eq!(state.pointer_up(|_| panic!("no click expected")), Release::None);
	}

	#[test]
	fn hover_sets_cursor_and_requests_redraw() {
		let mut state = state();
		state.take_redraw();
		let c = state.graph.lookup("C").unwrap();
		let at = state.sim.position(c);

		state.pointer_move(at.x, at.y);
		assert_eq!(state.hovered, Some(c));
		assert_eq!(state.cursor(), "pointer");
		assert!(state.take_redraw());
		assert!(!state.take_redraw());

		state.pointer_leave();
		assert_eq!(state.hovered, None);
		assert_eq!(state.cursor(), "default");
	}

	#[test]
	fn ticks_mark_redraw() {
		let mut state =
			ForceGraphState::new(&data(), 600.0, 400.0, SimulationConfig::default(), &Theme::default()).unwrap();
		state.take_redraw();
		assert!(state.tick());
		assert!(state.take_redraw());
	}

	#[test]
	fn pressing_another_node_unpins_the_first() {
		let mut state = state();
		let (a, c) = (state.graph.lookup("A").unwrap(), state.graph.lookup("C").unwrap());

		let at_a = state.sim.position(a);
		state.pointer_down(at_a.x, at_a.y);
		state.pointer_move(at_a.x + 40.0, at_a.y);
		for _ in 0..20 {
			state.tick();
		}
		let at_c = state.sim.position(c);
		state.pointer_down(at_c.x, at_c.y);
		assert_eq!(state.sim.pin_of(a), Pin::None);

		assert_eq!(state.pointer_up(|_| {}), Release::Click(c));
		for idx in state.graph.indices().collect::<Vec<_>>() {
			assert_eq!(state.sim.pin_of(idx), Pin::None);
		}

		let held = state.sim.position(a);
		for _ in 0..100 {
			state.tick();
		}
		assert!(state.sim.position(a).distance(held) > 1e-3);
	}

	#[test]
	fn empty_graph_never_ticks() {
		let mut state = ForceGraphState::new(
			&GraphData::default(),
			600.0,
			400.0,
			SimulationConfig::default(),
			&Theme::default(),
		)
		.unwrap();

		assert!(state.take_redraw());
		assert!(!state.tick());
		assert!(!state.take_redraw());
		assert!(!state.pointer_down(300.0, 200.0));
		assert_eq!(state.node_at_position(300.0, 200.0), None);
	}

	#[test]
	fn resize_moves_center() {
		let mut state = state();
		state.resize(1000.0, 200.0);
		assert_eq!(state.sim.center(), Point::new(500.0, 100.0));
	}
}
