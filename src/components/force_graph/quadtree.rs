//! Barnes-Hut quadtree for approximate many-body repulsion.
//!
//! Cells are stored in a flat arena. Children are always pushed after their
//! parent, so a reverse walk over the arena visits every child before its
//! parent when accumulating centroids.

use super::forces::Lcg;

/// Leaves deeper than this keep all remaining points instead of splitting,
/// so nearly-coincident points cannot recurse without bound.
const MAX_DEPTH: usize = 32;

#[derive(Clone, Debug)]
struct Cell {
	x0: f64,
	y0: f64,
	size: f64,
	children: [Option<usize>; 4],
	/// Body indices held by a leaf.
	bodies: Vec<usize>,
	count: usize,
	cx: f64,
	cy: f64,
}

impl Cell {
	fn new(x0: f64, y0: f64, size: f64) -> Self {
		Self {
			x0,
			y0,
			size,
			children: [None; 4],
			bodies: Vec::new(),
			count: 0,
			cx: 0.0,
			cy: 0.0,
		}
	}

	fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	fn quadrant(&self, x: f64, y: f64) -> usize {
		let half = self.size / 2.0;
		let right = (x >= self.x0 + half) as usize;
		let bottom = (y >= self.y0 + half) as usize;
		right | (bottom << 1)
	}
}

/// Spatial index over body positions, rebuilt every tick.
#[derive(Clone, Debug)]
pub struct QuadTree {
	cells: Vec<Cell>,
}

/// Parameters for a single repulsion pass.
#[derive(Clone, Copy, Debug)]
pub struct Repulsion {
	/// Per-body strength already multiplied by alpha.
	pub strength: f64,
	pub theta2: f64,
	pub distance_min2: f64,
	pub distance_max2: f64,
}

impl QuadTree {
	/// Build a tree over the given coordinates. Returns `None` for no points.
	pub fn build(xs: &[f64], ys: &[f64]) -> Option<Self> {
		if xs.is_empty() {
			return None;
		}

		let (mut x0, mut y0, mut x1, mut y1) = (xs[0], ys[0], xs[0], ys[0]);
		for (&x, &y) in xs.iter().zip(ys) {
			x0 = x0.min(x);
			y0 = y0.min(y);
			x1 = x1.max(x);
			y1 = y1.max(y);
		}
		// Pad so points on the max edge still fall inside the half-open cells.
		let size = (x1 - x0).max(y1 - y0).max(1.0) * (1.0 + 1e-9) + 1e-9;

		let mut tree = Self {
			cells: vec![Cell::new(x0, y0, size)],
		};
		for i in 0..xs.len() {
			tree.insert(i, xs, ys);
		}
		tree.accumulate(xs, ys);
		Some(tree)
	}

	fn insert(&mut self, i: usize, xs: &[f64], ys: &[f64]) {
		let (x, y) = (xs[i], ys[i]);
		let mut c = 0;
		let mut depth = 0;

		loop {
			if self.cells[c].is_leaf() {
				let Some(&first) = self.cells[c].bodies.first() else {
					self.cells[c].bodies.push(i);
					return;
				};
				let coincident = xs[first] == x && ys[first] == y;
				if coincident || depth >= MAX_DEPTH {
					self.cells[c].bodies.push(i);
					return;
				}
				// Split: push the resident bodies one level down, then retry.
				let resident = std::mem::take(&mut self.cells[c].bodies);
				let q = self.cells[c].quadrant(xs[first], ys[first]);
				let child = self.child(c, q);
				self.cells[child].bodies = resident;
			} else {
				let q = self.cells[c].quadrant(x, y);
				c = self.child(c, q);
				depth += 1;
			}
		}
	}

	fn child(&mut self, parent: usize, q: usize) -> usize {
		if let Some(existing) = self.cells[parent].children[q] {
			return existing;
		}
		let cell = &self.cells[parent];
		let half = cell.size / 2.0;
		let x0 = cell.x0 + if q & 1 == 1 { half } else { 0.0 };
		let y0 = cell.y0 + if q & 2 == 2 { half } else { 0.0 };
		let idx = self.cells.len();
		self.cells.push(Cell::new(x0, y0, half));
		self.cells[parent].children[q] = Some(idx);
		idx
	}

	fn accumulate(&mut self, xs: &[f64], ys: &[f64]) {
		for c in (0..self.cells.len()).rev() {
			let (count, sx, sy) = if self.cells[c].is_leaf() {
				let bodies = &self.cells[c].bodies;
				bodies.iter().fold((0, 0.0, 0.0), |(n, sx, sy), &b| {
					(n + 1, sx + xs[b], sy + ys[b])
				})
			} else {
				self.cells[c]
					.children
					.iter()
					.flatten()
					.fold((0, 0.0, 0.0), |(n, sx, sy), &child| {
						let ch = &self.cells[child];
						(
							n + ch.count,
							sx + ch.cx * ch.count as f64,
							sy + ch.cy * ch.count as f64,
						)
					})
			};
			let cell = &mut self.cells[c];
			cell.count = count;
			if count > 0 {
				cell.cx = sx / count as f64;
				cell.cy = sy / count as f64;
			}
		}
	}

	/// Velocity change on body `i` from every other body.
	pub fn repel(&self, i: usize, xs: &[f64], ys: &[f64], params: Repulsion, rng: &mut Lcg) -> (f64, f64) {
		let (px, py) = (xs[i], ys[i]);
		let (mut dvx, mut dvy) = (0.0, 0.0);
		let mut stack = vec![0];

		while let Some(c) = stack.pop() {
			let cell = &self.cells[c];
			if cell.count == 0 {
				continue;
			}

			if cell.is_leaf() {
				for &j in &cell.bodies {
					if j == i {
						continue;
					}
					let (fx, fy) = pair_force(xs[j] - px, ys[j] - py, params.strength, params, rng);
					dvx += fx;
					dvy += fy;
				}
				continue;
			}

			let (dx, dy) = (cell.cx - px, cell.cy - py);
			let l = dx * dx + dy * dy;
			if cell.size * cell.size / params.theta2 < l {
				let (fx, fy) = pair_force(dx, dy, params.strength * cell.count as f64, params, rng);
				dvx += fx;
				dvy += fy;
				continue;
			}
			if l >= params.distance_max2 {
				continue;
			}
			stack.extend(cell.children.iter().flatten());
		}

		(dvx, dvy)
	}
}

/// Contribution of a (possibly aggregated) body at offset `(dx, dy)`.
pub fn pair_force(mut dx: f64, mut dy: f64, strength: f64, params: Repulsion, rng: &mut Lcg) -> (f64, f64) {
	if dx == 0.0 {
		dx = rng.jiggle();
	}
	if dy == 0.0 {
		dy = rng.jiggle();
	}
	let mut l = dx * dx + dy * dy;
	if l >= params.distance_max2 {
		return (0.0, 0.0);
	}
	if l < params.distance_min2 {
		l = (params.distance_min2 * l).sqrt();
	}
	let w = strength / l;
	(dx * w, dy * w)
}
