#![allow(unused_crate_dependencies)]

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use garden_graph::components::force_graph::forces::{Bodies, Lcg, ManyBodyForce};
use garden_graph::{Graph, GraphData, GraphLink, GraphNode, ManyBodyStrategy, Point, Simulation, SimulationConfig, Size};
use std::hint::black_box;
use std::time::Duration;

fn repulsion(strategy: ManyBodyStrategy) -> ManyBodyForce {
	ManyBodyForce {
		strength: -300.0,
		theta: 0.9,
		distance_min: 1.0,
		distance_max: None,
		strategy,
	}
}

/// A ring with a few chords so the layout has both springs and clusters.
fn ring_data(n: usize) -> GraphData {
	let nodes = (0..n)
		.map(|i| GraphNode {
			id: format!("n{i}"),
			title: format!("Node {i}"),
			group: (i % 5) as i32,
		})
		.collect();
	let mut links: Vec<GraphLink> = (0..n)
		.map(|i| GraphLink {
			source: format!("n{i}"),
			target: format!("n{}", (i + 1) % n),
			value: 1.0,
		})
		.collect();
	links.extend((0..n).step_by(7).map(|i| GraphLink {
		source: format!("n{i}"),
		target: format!("n{}", (i + n / 2) % n),
		value: 2.0,
	}));
	GraphData { nodes, links }
}

fn bench_many_body(c: &mut Criterion) {
	let mut group = c.benchmark_group("many_body");
	group.measurement_time(Duration::from_secs(5));

	for n in [100usize, 500, 2_000] {
		let bodies = Bodies::spiral(n, Point::new(400.0, 300.0));
		for strategy in [ManyBodyStrategy::Direct, ManyBodyStrategy::BarnesHut] {
			let force = repulsion(strategy);
			group.bench_with_input(BenchmarkId::new(format!("{strategy:?}"), n), &bodies, |b, bodies| {
				b.iter_batched(
					|| bodies.clone(),
					|mut bodies| {
						force.apply(black_box(&mut bodies), 1.0, &mut Lcg::default());
						black_box(bodies.vx[0]);
					},
					BatchSize::LargeInput,
				)
			});
		}
	}

	group.finish();
}

fn bench_settle(c: &mut Criterion) {
	let mut group = c.benchmark_group("settle");
	group.sample_size(10);

	for n in [50usize, 300] {
		let graph = Graph::try_from(&ring_data(n)).unwrap();
		group.bench_with_input(BenchmarkId::new("run_until_settled", n), &graph, |b, graph| {
			b.iter(|| {
				let mut sim = Simulation::start(graph, Size::new(800.0, 600.0), SimulationConfig::default());
				black_box(sim.run_until_settled(1_000));
			})
		});
	}

	group.finish();
}

criterion_group!(benches, bench_many_body, bench_settle);
criterion_main!(benches);
