//! Alpha-cooled force simulation.
//!
//! Owns every node's position, velocity and pin. The host calls [`Simulation::step`]
//! once per animation frame; each call performs exactly one tick and reports
//! whether another is wanted. Energy (`alpha`) moves toward `alpha_target`
//! by `alpha_decay` per tick, so with a zero target the layout cools to rest
//! in roughly 300 ticks.

use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use serde::Deserialize;

use super::forces::{self, Bodies, LinkForce, Lcg, ManyBodyForce, ManyBodyStrategy};
use super::geometry::{Point, Size};
use super::graph::{Graph, NodeIdx};

/// Hard position constraint used while a node is dragged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Pin {
	#[default]
	None,
	At(Point),
}

/// Tunable physics parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Many-body strength. Negative repels.
	pub charge_strength: f64,
	/// Barnes-Hut accuracy; cells smaller than `theta * distance` are aggregated.
	pub theta: f64,
	/// Pair distances below this are softened to avoid huge kicks.
	pub distance_min: f64,
	/// Pairs farther apart than this do not interact. Unbounded when unset.
	pub distance_max: Option<f64>,
	pub many_body: ManyBodyStrategy,
	/// Fraction of the centroid offset removed per tick.
	pub center_strength: f64,
	/// Strength of the per-axis pull toward the canvas midlines.
	pub axis_strength: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	pub alpha: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Target alpha held while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			link_distance: 100.0,
			charge_strength: -300.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: None,
			many_body: ManyBodyStrategy::BarnesHut,
			center_strength: 1.0,
			axis_strength: 0.1,
			velocity_decay: 0.4,
			alpha: 1.0,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			drag_alpha_target: 0.3,
		}
	}
}

/// Shared cancellation flag. Cloning yields a handle to the same flag, so a
/// tick callback can stop the simulation that is invoking it.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
	/// Stop every simulation sharing this handle.
	pub fn stop(&self) {
		self.0.set(true);
	}

	/// Whether [`StopHandle::stop`] has been called.
	pub fn is_stopped(&self) -> bool {
		self.0.get()
	}
}

/// Read-only view of node positions after a tick.
#[derive(Clone, Copy, Debug)]
pub struct Positions<'a> {
	x: &'a [f64],
	y: &'a [f64],
}

impl<'a> Positions<'a> {
	/// Position of one node.
	pub fn get(&self, idx: NodeIdx) -> Point {
		Point::new(self.x[idx.index()], self.y[idx.index()])
	}

	pub fn len(&self) -> usize {
		self.x.len()
	}

	pub fn is_empty(&self) -> bool {
		self.x.is_empty()
	}

	/// Positions in node order.
	pub fn iter(self) -> impl Iterator<Item = Point> + 'a {
		self.x.iter().zip(self.y).map(|(&x, &y)| Point::new(x, y))
	}

	/// Mean position, or `None` for an empty graph.
	pub fn centroid(&self) -> Option<Point> {
		if self.is_empty() {
			return None;
		}
		let n = self.len() as f64;
		Some(Point::new(
			self.x.iter().sum::<f64>() / n,
			self.y.iter().sum::<f64>() / n,
		))
	}
}

type TickCallback = Box<dyn FnMut(Positions<'_>)>;

/// Alpha-cooled force layout over a fixed [`Graph`].
///
/// Each [`Simulation::step`] applies link, many-body, centering and axis forces
/// scaled by the current alpha, then integrates velocities. Pinned nodes are
/// held in place.
pub struct Simulation {
	config: SimulationConfig,
	center: Point,
	bodies: Bodies,
	links: LinkForce,
	many_body: ManyBodyForce,
	alpha: f64,
	alpha_target: f64,
	rng: Lcg,
	stop: StopHandle,
	on_tick: Option<TickCallback>,
	ticks: u64,
}

impl Simulation {
	/// Place every node of `graph` around the canvas center and start hot.
	pub fn start(graph: &Graph, canvas: Size, config: SimulationConfig) -> Self {
		let center = canvas.center();
		debug!(
			"simulation: starting with {} nodes, {} links",
			graph.len(),
			graph.links().len()
		);

		Self {
			center,
			bodies: Bodies::spiral(graph.len(), center),
			links: LinkForce::new(graph, config.link_distance),
			many_body: ManyBodyForce {
				strength: config.charge_strength,
				theta: config.theta,
				distance_min: config.distance_min,
				distance_max: config.distance_max,
				strategy: config.many_body,
			},
			alpha: config.alpha,
			alpha_target: 0.0,
			rng: Lcg::default(),
			stop: StopHandle::default(),
			on_tick: None,
			ticks: 0,
			config,
		}
	}

	/// Register the per-tick observer, replacing any previous one.
	pub fn on_tick(&mut self, callback: impl FnMut(Positions<'_>) + 'static) {
		self.on_tick = Some(Box::new(callback));
	}

	/// Advance one tick. Returns `true` while further ticks are wanted.
	pub fn step(&mut self) -> bool {
		if !self.is_running() {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.links.apply(&mut self.bodies, alpha, &mut self.rng);
		self.many_body.apply(&mut self.bodies, alpha, &mut self.rng);
		forces::apply_centering(&mut self.bodies, self.center, self.config.center_strength);
		forces::apply_axis_x(&mut self.bodies, self.center.x, self.config.axis_strength, alpha);
		forces::apply_axis_y(&mut self.bodies, self.center.y, self.config.axis_strength, alpha);
		self.integrate();
		self.ticks += 1;

		if let Some(callback) = self.on_tick.as_mut() {
			callback(Positions {
				x: &self.bodies.x,
				y: &self.bodies.y,
			});
		}

		if self.is_settled() {
			debug!("simulation: settled after {} ticks", self.ticks);
		}
		self.is_running()
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		let b = &mut self.bodies;
		for i in 0..b.len() {
			match b.pins[i] {
				Pin::At(p) => {
					b.x[i] = p.x;
					b.y[i] = p.y;
					b.vx[i] = 0.0;
					b.vy[i] = 0.0;
				}
				Pin::None => {
					b.vx[i] *= keep;
					b.vy[i] *= keep;
					b.x[i] += b.vx[i];
					b.y[i] += b.vy[i];
				}
			}
		}
	}

	/// Step until settled, stopped, or `max_steps` ticks. Returns ticks run.
	pub fn run_until_settled(&mut self, max_steps: usize) -> usize {
		let mut steps = 0;
		while steps < max_steps && self.is_running() {
			self.step();
			steps += 1;
		}
		steps
	}

	/// Raise (or lower) the energy the simulation heads toward.
	pub fn reheat(&mut self, target_alpha: f64) {
		self.alpha_target = target_alpha;
	}

	/// Let the simulation cool back to rest.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Set or clear a node's pin. A new pin takes effect immediately and is
	/// re-applied on every tick until cleared.
	pub fn pin(&mut self, idx: NodeIdx, pin: Pin) {
		let i = idx.index();
		self.bodies.pins[i] = pin;
		if let Pin::At(p) = pin {
			self.bodies.x[i] = p.x;
			self.bodies.y[i] = p.y;
			self.bodies.vx[i] = 0.0;
			self.bodies.vy[i] = 0.0;
		}
	}

	/// Current pin of a node.
	pub fn pin_of(&self, idx: NodeIdx) -> Pin {
		self.bodies.pins[idx.index()]
	}

	/// Halt for good. Later [`Simulation::step`] calls do nothing.
	pub fn stop(&self) {
		if !self.stop.is_stopped() {
			debug!("simulation: stopped after {} ticks", self.ticks);
		}
		self.stop.stop();
	}

	/// Handle that can stop this simulation from elsewhere, including its own tick callback.
	pub fn stop_handle(&self) -> StopHandle {
		self.stop.clone()
	}

	/// Snapshot of all node positions.
	pub fn positions(&self) -> Positions<'_> {
		Positions {
			x: &self.bodies.x,
			y: &self.bodies.y,
		}
	}

	pub fn position(&self, idx: NodeIdx) -> Point {
		self.positions().get(idx)
	}

	/// Move the centering target, e.g. after the canvas is resized.
	pub fn set_center(&mut self, center: Point) {
		self.center = center;
	}

	/// Current centering target.
	pub fn center(&self) -> Point {
		self.center
	}

	/// Current energy; forces scale with it.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Energy the simulation decays toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Ticks run since start.
	pub fn tick_count(&self) -> u64 {
		self.ticks
	}

	pub fn is_stopped(&self) -> bool {
		self.stop.is_stopped()
	}

	/// Cooled below `alpha_min` with nothing heating it back up.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
	}

	/// Whether [`Simulation::step`] would do any work.
	pub fn is_running(&self) -> bool {
		!self.is_stopped() && !self.is_settled() && !self.bodies.is_empty()
	}
}
