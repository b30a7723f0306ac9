//! Built-in sample garden, shown when the page embeds no graph data.

use crate::components::force_graph::{GraphData, GraphLink, GraphNode};

const NODES: [(&str, &str, i32); 10] = [
	("node-01", "FLOAT Log", 1),
	("node-02", "Resonance Capture", 1),
	("node-03", "Engage Float Engine", 2),
	("node-04", "Ghostline Active", 2),
	("node-05", "SSO For Joy", 3),
	("node-06", "Memory Systems", 1),
	("node-07", "Digital Gardens", 1),
	("node-08", "Authentication", 3),
	("node-09", "User Experience", 3),
	("node-10", "Techno Ruins", 2),
];

const LINKS: [(&str, &str, f64); 12] = [
	("node-01", "node-02", 2.0),
	("node-01", "node-06", 3.0),
	("node-01", "node-07", 2.0),
	("node-02", "node-03", 2.0),
	("node-02", "node-04", 1.0),
	("node-03", "node-04", 3.0),
	("node-03", "node-10", 1.0),
	("node-04", "node-10", 2.0),
	("node-05", "node-08", 3.0),
	("node-05", "node-09", 2.0),
	("node-07", "node-06", 1.0),
	("node-08", "node-09", 2.0),
];

/// Built-in sample garden shown when the page supplies no data.
pub fn garden() -> GraphData {
	GraphData {
		nodes: NODES
			.iter()
			.map(|&(id, title, group)| GraphNode {
				id: id.to_string(),
				title: title.to_string(),
				group,
			})
			.collect(),
		links: LINKS
			.iter()
			.map(|&(source, target, value)| GraphLink {
				source: source.to_string(),
				target: target.to_string(),
				value,
			})
			.collect(),
	}
}
