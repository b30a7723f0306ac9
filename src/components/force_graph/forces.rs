//! The force set applied each tick.
//!
//! Forces read positions from [`Bodies`] and accumulate into velocities,
//! except centering, which translates positions directly.

use serde::Deserialize;

use super::geometry::Point;
use super::graph::Graph;
use super::quadtree::{QuadTree, Repulsion, pair_force};
use super::simulation::Pin;

/// Deterministic linear congruential generator used to separate coincident
/// nodes. Same constants as the classic Numerical Recipes LCG.
#[derive(Clone, Debug)]
pub struct Lcg {
	state: u32,
}

impl Default for Lcg {
	fn default() -> Self {
		Self { state: 1 }
	}
}

impl Lcg {
	/// Uniform value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.state as f64 / 4_294_967_296.0
	}

	/// A tiny random offset centered on zero.
	pub fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// Structure-of-arrays body state. Only the simulation holds one.
#[derive(Clone, Debug, Default)]
pub struct Bodies {
	pub x: Vec<f64>,
	pub y: Vec<f64>,
	pub vx: Vec<f64>,
	pub vy: Vec<f64>,
	pub pins: Vec<Pin>,
}

impl Bodies {
	/// Phyllotaxis placement around `center`, zero velocity, no pins.
	pub fn spiral(n: usize, center: Point) -> Self {
		const INITIAL_RADIUS: f64 = 10.0;
		let initial_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());

		let mut bodies = Self {
			x: Vec::with_capacity(n),
			y: Vec::with_capacity(n),
			vx: vec![0.0; n],
			vy: vec![0.0; n],
			pins: vec![Pin::None; n],
		};
		for i in 0..n {
			let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let angle = i as f64 * initial_angle;
			bodies.x.push(center.x + radius * angle.cos());
			bodies.y.push(center.y + radius * angle.sin());
		}
		bodies
	}

	/// Number of bodies.
	pub fn len(&self) -> usize {
		self.x.len()
	}

	pub fn is_empty(&self) -> bool {
		self.x.is_empty()
	}
}

/// Spring force pulling linked nodes toward a rest distance.
#[derive(Clone, Debug)]
pub struct LinkForce {
	endpoints: Vec<(usize, usize)>,
	strengths: Vec<f64>,
	biases: Vec<f64>,
	distance: f64,
}

impl LinkForce {
	/// Per-link strength and bias follow endpoint degree, so hubs are not
	/// yanked around by their many leaves.
	pub fn new(graph: &Graph, distance: f64) -> Self {
		let mut endpoints = Vec::with_capacity(graph.links().len());
		let mut strengths = Vec::with_capacity(graph.links().len());
		let mut biases = Vec::with_capacity(graph.links().len());

		for link in graph.links() {
			let ds = graph.degree(link.source) as f64;
			let dt = graph.degree(link.target) as f64;
			endpoints.push((link.source.index(), link.target.index()));
			strengths.push(1.0 / ds.min(dt));
			biases.push(ds / (ds + dt));
		}

		Self {
			endpoints,
			strengths,
			biases,
			distance,
		}
	}

	/// Nudge linked velocities toward the rest distance.
	pub fn apply(&self, bodies: &mut Bodies, alpha: f64, rng: &mut Lcg) {
		for (i, &(s, t)) in self.endpoints.iter().enumerate() {
			let mut dx = bodies.x[t] + bodies.vx[t] - bodies.x[s] - bodies.vx[s];
			let mut dy = bodies.y[t] + bodies.vy[t] - bodies.y[s] - bodies.vy[s];
			if dx == 0.0 {
				dx = rng.jiggle();
			}
			if dy == 0.0 {
				dy = rng.jiggle();
			}
			let l = (dx * dx + dy * dy).sqrt();
			let k = (l - self.distance) / l * alpha * self.strengths[i];
			let (fx, fy) = (dx * k, dy * k);
			let bias = self.biases[i];

			bodies.vx[t] -= fx * bias;
			bodies.vy[t] -= fy * bias;
			bodies.vx[s] += fx * (1.0 - bias);
			bodies.vy[s] += fy * (1.0 - bias);
		}
	}
}

/// How pairwise repulsion is computed. Both strategies honor the same
/// per-pair formula; Barnes-Hut aggregates distant cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManyBodyStrategy {
	/// Exact O(n^2) sum. Fine for tens of nodes.
	Direct,
	/// Quadtree approximation, O(n log n).
	#[default]
	BarnesHut,
}

/// Charge force: every node repels (or attracts, for positive strength)
/// every other node.
#[derive(Clone, Debug)]
pub struct ManyBodyForce {
	pub strength: f64,
	pub theta: f64,
	pub distance_min: f64,
	pub distance_max: Option<f64>,
	pub strategy: ManyBodyStrategy,
}

impl ManyBodyForce {
	fn params(&self, alpha: f64) -> Repulsion {
		Repulsion {
			strength: self.strength * alpha,
			theta2: self.theta * self.theta,
			distance_min2: self.distance_min * self.distance_min,
			distance_max2: self.distance_max.map_or(f64::INFINITY, |d| d * d),
		}
	}

	pub fn apply(&self, bodies: &mut Bodies, alpha: f64, rng: &mut Lcg) {
		let params = self.params(alpha);
		let n = bodies.len();

		match self.strategy {
			ManyBodyStrategy::Direct => {
				for i in 0..n {
					let (mut dvx, mut dvy) = (0.0, 0.0);
					for j in 0..n {
						if i == j {
							continue;
						}
						let (fx, fy) = pair_force(
							bodies.x[j] - bodies.x[i],
							bodies.y[j] - bodies.y[i],
							params.strength,
							params,
							rng,
						);
						dvx += fx;
						dvy += fy;
					}
					bodies.vx[i] += dvx;
					bodies.vy[i] += dvy;
				}
			}
			ManyBodyStrategy::BarnesHut => {
				let Some(tree) = QuadTree::build(&bodies.x, &bodies.y) else {
					return;
				};
				for i in 0..n {
					let (dvx, dvy) = tree.repel(i, &bodies.x, &bodies.y, params, rng);
					bodies.vx[i] += dvx;
					bodies.vy[i] += dvy;
				}
			}
		}
	}
}

/// Translate every node so the centroid moves toward `center`.
pub fn apply_centering(bodies: &mut Bodies, center: Point, strength: f64) {
	let n = bodies.len();
	if n == 0 {
		return;
	}
	let sx = (bodies.x.iter().sum::<f64>() / n as f64 - center.x) * strength;
	let sy = (bodies.y.iter().sum::<f64>() / n as f64 - center.y) * strength;
	for x in &mut bodies.x {
		*x -= sx;
	}
	for y in &mut bodies.y {
		*y -= sy;
	}
}

/// Pull each node toward the vertical midline (`target = center.x`).
pub fn apply_axis_x(bodies: &mut Bodies, target: f64, strength: f64, alpha: f64) {
	for (x, vx) in bodies.x.iter().zip(bodies.vx.iter_mut()) {
		*vx += (target - x) * strength * alpha;
	}
}

/// Pull each node toward the horizontal midline (`target = center.y`).
pub fn apply_axis_y(bodies: &mut Bodies, target: f64, strength: f64, alpha: f64) {
	for (y, vy) in bodies.y.iter().zip(bodies.vy.iter_mut()) {
		*vy += (target - y) * strength * alpha;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn two_nodes(ax: f64, bx: f64) -> Bodies {
		Bodies {
			x: vec![ax, bx],
			y: vec![0.0, 0.0],
			vx: vec![0.0; 2],
			vy: vec![0.0; 2],
			pins: vec![Pin::None; 2],
		}
	}

	fn pair_graph() -> Graph {
		let nodes = ["a", "b"].map(|id| GraphNode {
			id: id.to_string(),
			title: id.to_string(),
			group: 0,
		});
		let links = [GraphLink {
			source: "a".to_string(),
			target: "b".to_string(),
			value: 1.0,
		}];
		Graph::build(&nodes, &links).unwrap()
	}

	#[test]
	fn lcg_is_deterministic_and_bounded() {
		let mut a = Lcg::default();
		let mut b = Lcg::default();
		for _ in 0..100 {
			let v = a.next_f64();
			assert_eq!(v, b.next_f64());
			assert!((0.0..1.0).contains(&v));
		}
		assert!(a.jiggle().abs() <= 5e-7);
	}

	#[test]
	fn spiral_places_nodes_around_center() {
		let bodies = Bodies::spiral(10, Point::new(200.0, 100.0));
		assert_eq!(bodies.len(), 10);
		for i in 0..10 {
			let d = Point::new(bodies.x[i], bodies.y[i]).distance(Point::new(200.0, 100.0));
			assert!((d - 10.0 * (0.5 + i as f64).sqrt()).abs() < 1e-9);
		}
	}

	#[test]
	fn stretched_link_pulls_endpoints_together() {
		let graph = pair_graph();
		let mut bodies = two_nodes(0.0, 300.0);
		LinkForce::new(&graph, 100.0).apply(&mut bodies, 1.0, &mut Lcg::default());

		assert!(bodies.vx[0] > 0.0);
		assert!(bodies.vx[1] < 0.0);
	}

	#[test]
	fn compressed_link_pushes_endpoints_apart() {
		let graph = pair_graph();
		let mut bodies = two_nodes(0.0, 20.0);
		LinkForce::new(&graph, 100.0).apply(&mut bodies, 1.0, &mut Lcg::default());

		assert!(bodies.vx[0] < 0.0);
		assert!(bodies.vx[1] > 0.0);
	}

	#[test]
	fn negative_charge_repels() {
		let force = ManyBodyForce {
			strength: -300.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: None,
			strategy: ManyBodyStrategy::Direct,
		};
		let mut bodies = two_nodes(0.0, 10.0);
		force.apply(&mut bodies, 1.0, &mut Lcg::default());

		// -300 / 100 * 10 = -30 toward the other node, i.e. 30 away from it.
		assert!((bodies.vx[0] + 30.0).abs() < 1e-9);
		assert!((bodies.vx[1] - 30.0).abs() < 1e-9);
	}

	#[test]
	fn strategies_agree_on_small_graphs() {
		let mut direct = Bodies::spiral(30, Point::default());
		let mut approx = direct.clone();
		let mut force = ManyBodyForce {
			strength: -300.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: None,
			strategy: ManyBodyStrategy::Direct,
		};
		force.apply(&mut direct, 1.0, &mut Lcg::default());
		force.strategy = ManyBodyStrategy::BarnesHut;
		force.apply(&mut approx, 1.0, &mut Lcg::default());

		let scale = (0..30)
			.map(|i| direct.vx[i].hypot(direct.vy[i]))
			.fold(0.0, f64::max);
		for i in 0..30 {
			let err = (direct.vx[i] - approx.vx[i]).hypot(direct.vy[i] - approx.vy[i]);
			assert!(err < 0.15 * scale, "node {i} diverges by {err} (scale {scale})");
		}
	}

	#[test]
	fn distance_max_cuts_off_far_pairs() {
		let force = ManyBodyForce {
			strength: -300.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: Some(50.0),
			strategy: ManyBodyStrategy::Direct,
		};
		let mut bodies = two_nodes(0.0, 100.0);
		force.apply(&mut bodies, 1.0, &mut Lcg::default());
		assert_eq!(bodies.vx, vec![0.0, 0.0]);
	}

	#[test]
	fn centering_moves_centroid_onto_center() {
		let mut bodies = two_nodes(10.0, 30.0);
		apply_centering(&mut bodies, Point::new(100.0, 50.0), 1.0);

		assert!((bodies.x[0] - 90.0).abs() < 1e-9);
		assert!((bodies.x[1] - 110.0).abs() < 1e-9);
		assert!((bodies.y[0] - 50.0).abs() < 1e-9);
	}

	#[test]
	fn axis_forces_pull_toward_midlines() {
		let mut bodies = two_nodes(0.0, 200.0);
		apply_axis_x(&mut bodies, 100.0, 0.1, 1.0);
		apply_axis_y(&mut bodies, 40.0, 0.1, 0.5);

		assert!((bodies.vx[0] - 10.0).abs() < 1e-9);
		assert!((bodies.vx[1] + 10.0).abs() < 1e-9);
		assert!((bodies.vy[0] - 2.0).abs() < 1e-9);
	}
}
