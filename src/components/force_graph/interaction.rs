//! Pointer gesture handling: press, drag, release and click.
//!
//! A press on a node pins it where it already is and heats the simulation.
//! Pointer motion beyond [`CLICK_SLOP`] turns the press into a drag, after
//! which the pin follows the pointer. Releasing clears the pin and lets the
//! layout cool; a release that never became a drag is reported as a click.

use log::debug;

use super::geometry::Point;
use super::graph::NodeIdx;
use super::simulation::{Pin, Simulation};

/// Pointer travel (in pixels) below which a press still counts as a click.
pub const CLICK_SLOP: f64 = 3.0;

/// Current pointer gesture. Only one node can be held at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	/// No node is held.
	Idle,
	/// A node is held by the pointer.
	Pressed {
		node: NodeIdx,
		/// Pointer position at press.
		origin: Point,
		/// Node position at press.
		node_origin: Point,
		/// Pointer travelled beyond [`CLICK_SLOP`].
		dragged: bool,
	},
}

/// What a pointer release amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
	/// Nothing was held.
	None,
	/// A drag of this node ended.
	DragEnd(NodeIdx),
	/// The node was pressed and released in place.
	Click(NodeIdx),
}

impl Gesture {
	/// Whether the held node has moved beyond [`CLICK_SLOP`].
	pub fn is_dragging(&self) -> bool {
		matches!(self, Gesture::Pressed { dragged: true, .. })
	}

	/// Node currently pressed, if any.
	pub fn held_node(&self) -> Option<NodeIdx> {
		match *self {
			Gesture::Pressed { node, .. } => Some(node),
			Gesture::Idle => None,
		}
	}

	/// Begin holding `node`. Reheats the simulation and pins the node in place.
	/// A node still held from an earlier press is let go first.
	pub fn press(&mut self, sim: &mut Simulation, node: NodeIdx, pointer: Point) {
		self.cancel(sim);
		let node_origin = sim.position(node);
		sim.reheat(sim.config().drag_alpha_target);
		sim.pin(node, Pin::At(node_origin));
		*self = Gesture::Pressed {
			node,
			origin: pointer,
			node_origin,
			dragged: false,
		};
	}

	/// Follow the pointer. Returns `true` if a pin moved.
	pub fn drag_to(&mut self, sim: &mut Simulation, pointer: Point) -> bool {
		let Gesture::Pressed {
			node,
			origin,
			node_origin,
			ref mut dragged,
		} = *self
		else {
			return false;
		};

		if !*dragged {
			if origin.distance(pointer) <= CLICK_SLOP {
				return false;
			}
			debug!("interaction: drag started on node {}", node.index());
			*dragged = true;
		}
		sim.pin(node, Pin::At(node_origin + (pointer - origin)));
		true
	}

	/// End the gesture: unpin, let the layout cool, and classify the release.
	pub fn release(&mut self, sim: &mut Simulation) -> Release {
		let outcome = match *self {
			Gesture::Idle => return Release::None,
			Gesture::Pressed { node, dragged, .. } => {
				sim.pin(node, Pin::None);
				sim.cool();
				if dragged {
					Release::DragEnd(node)
				} else {
					Release::Click(node)
				}
			}
		};
		debug!("interaction: {outcome:?}");
		*self = Gesture::Idle;
		outcome
	}

	/// Abandon the gesture without producing a click (pointer left the canvas).
	pub fn cancel(&mut self, sim: &mut Simulation) {
		if let Gesture::Pressed { node, .. } = *self {
			sim.pin(node, Pin::None);
			sim.cool();
		}
		*self = Gesture::Idle;
	}
}
