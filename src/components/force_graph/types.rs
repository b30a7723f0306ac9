//! Graph data structures for input to the force graph component.

use serde::Deserialize;

/// A node in the graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links and
	/// reported back through the click callback.
	pub id: String,
	/// Display label drawn next to the node.
	pub title: String,
	/// Classification used for coloring only.
	#[serde(default)]
	pub group: i32,
}

/// An undirected, weighted edge between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Link weight. Drives stroke width only, not spring stiffness.
	#[serde(default = "default_link_value")]
	pub value: f64,
}

fn default_link_value() -> f64 {
	1.0
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Find a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Number of links touching the node with the given id.
	pub fn connection_count(&self, id: &str) -> usize {
		self.links
			.iter()
			.filter(|l| l.source == id || l.target == id)
			.count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_graph_json() {
		let json = r#"{
			"nodes": [
				{ "id": "a", "title": "Alpha", "group": 2 },
				{ "id": "b", "title": "Beta" }
			],
			"links": [
				{ "source": "a", "target": "b", "value": 3 },
				{ "source": "b", "target": "a" }
			]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].group, 2);
		assert_eq!(data.nodes[1].group, 0);
		assert_eq!(data.links[0].value, 3.0);
		assert_eq!(data.links[1].value, 1.0);
	}

	#[test]
	fn counts_connections_in_either_direction() {
		let data: GraphData = serde_json::from_str(
			r#"{
				"nodes": [
					{ "id": "a", "title": "A" },
					{ "id": "b", "title": "B" },
					{ "id": "c", "title": "C" }
				],
				"links": [
					{ "source": "a", "target": "b" },
					{ "source": "c", "target": "a" }
				]
			}"#,
		)
		.unwrap();

		assert_eq!(data.connection_count("a"), 2);
		assert_eq!(data.connection_count("b"), 1);
		assert_eq!(data.node("c").map(|n| n.title.as_str()), Some("C"));
		assert!(data.node("missing").is_none());
	}
}
