//! Validated, immutable graph model.
//!
//! Node ids are resolved to dense indices once at build time so the
//! simulation and renderer never look up strings per tick.

use std::collections::HashMap;

use thiserror::Error;

use super::types::{GraphData, GraphLink, GraphNode};

/// Dense index of a node inside a [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(usize);

impl NodeIdx {
	/// Position in the graph's node list.
	pub fn index(self) -> usize {
		self.0
	}
}

/// Reasons a data set cannot become a [`Graph`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConstructionError {
	/// Two nodes share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNodeId(String),
	/// A link endpoint names no node.
	#[error("link #{link} references unknown node `{id}`")]
	DanglingLink { link: usize, id: String },
}

/// Immutable per-node metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeMeta {
	pub id: String,
	pub title: String,
	pub group: i32,
}

/// A link with endpoints resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub source: NodeIdx,
	pub target: NodeIdx,
	pub value: f64,
}

/// Validated nodes and links with ids resolved to [`NodeIdx`].
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<NodeMeta>,
	links: Vec<Link>,
	index: HashMap<String, NodeIdx>,
	degrees: Vec<usize>,
}

impl Graph {
	/// Validate nodes and links and build the id index.
	pub fn build(nodes: &[GraphNode], links: &[GraphLink]) -> Result<Self, ConstructionError> {
		let mut index = HashMap::with_capacity(nodes.len());
		let mut metas = Vec::with_capacity(nodes.len());

		for (i, node) in nodes.iter().enumerate() {
			if index.insert(node.id.clone(), NodeIdx(i)).is_some() {
				return Err(ConstructionError::DuplicateNodeId(node.id.clone()));
			}
			metas.push(NodeMeta {
				id: node.id.clone(),
				title: node.title.clone(),
				group: node.group,
			});
		}

		let resolve = |link: usize, id: &str| {
			index
				.get(id)
				.copied()
				.ok_or_else(|| ConstructionError::DanglingLink {
					link,
					id: id.to_string(),
				})
		};

		let mut resolved = Vec::with_capacity(links.len());
		let mut degrees = vec![0; metas.len()];
		for (i, link) in links.iter().enumerate() {
			let source = resolve(i, &link.source)?;
			let target = resolve(i, &link.target)?;
			degrees[source.0] += 1;
			degrees[target.0] += 1;
			resolved.push(Link {
				source,
				target,
				value: link.value,
			});
		}

		Ok(Self {
			nodes: metas,
			links: resolved,
			index,
			degrees,
		})
	}

	/// Index of the node with this id.
	pub fn lookup(&self, id: &str) -> Option<NodeIdx> {
		self.index.get(id).copied()
	}

	/// Metadata of a node.
	pub fn node(&self, idx: NodeIdx) -> &NodeMeta {
		&self.nodes[idx.0]
	}

	pub fn nodes(&self) -> &[NodeMeta] {
		&self.nodes
	}

	/// Iterate node indices in input order.
	pub fn indices(&self) -> impl Iterator<Item = NodeIdx> + '_ {
		(0..self.nodes.len()).map(NodeIdx)
	}

	/// Resolved links in input order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Number of link endpoints at this node. A self-link counts twice.
	pub fn degree(&self, idx: NodeIdx) -> usize {
		self.degrees[idx.0]
	}

	/// Nodes sharing a link with `idx`, in link order, without duplicates.
	pub fn neighbors(&self, idx: NodeIdx) -> Vec<NodeIdx> {
		let mut out = Vec::new();
		for link in &self.links {
			let other = if link.source == idx {
				link.target
			} else if link.target == idx {
				link.source
			} else {
				continue;
			};
			if other != idx && !out.contains(&other) {
				out.push(other);
			}
		}
		out
	}
}

impl TryFrom<&GraphData> for Graph {
	type Error = ConstructionError;

	fn try_from(data: &GraphData) -> Result<Self, Self::Error> {
		Graph::build(&data.nodes, &data.links)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			title: id.to_uppercase(),
			group: 1,
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.to_string(),
			target: target.to_string(),
			value: 1.0,
		}
	}

	#[test]
	fn builds_valid_graph_with_resolved_links() {
		let graph = Graph::build(
			&[node("a"), node("b"), node("c")],
			&[link("a", "b"), link("b", "c")],
		)
		.unwrap();

		assert_eq!(graph.len(), 3);
		let (a, b, c) = (
			graph.lookup("a").unwrap(),
			graph.lookup("b").unwrap(),
			graph.lookup("c").unwrap(),
		);
		assert_eq!(graph.links()[0].source, a);
		assert_eq!(graph.links()[0].target, b);
		assert_eq!(graph.links()[1].target, c);
		assert_eq!(graph.node(b).title, "B");
	}

	#[test]
	fn rejects_duplicate_ids() {
		let err = Graph::build(&[node("a"), node("b"), node("a")], &[]).unwrap_err();
		assert_eq!(err, ConstructionError::DuplicateNodeId("a".to_string()));
	}

	#[test]
	fn rejects_dangling_source_and_target() {
		let nodes = [node("a"), node("b")];

		let err = Graph::build(&nodes, &[link("a", "b"), link("x", "a")]).unwrap_err();
		assert_eq!(
			err,
			ConstructionError::DanglingLink {
				link: 1,
				id: "x".to_string()
			}
		);

		let err = Graph::build(&nodes, &[link("a", "zz")]).unwrap_err();
		assert!(matches!(err, ConstructionError::DanglingLink { link: 0, ref id } if id == "zz"));
	}

	#[test]
	fn empty_graph_is_valid() {
		let graph = Graph::build(&[], &[]).unwrap();
		assert!(graph.is_empty());
		assert_eq!(graph.indices().count(), 0);
	}

	#[test]
	fn degree_and_neighbors_follow_links() {
		let graph = Graph::build(
			&[node("a"), node("b"), node("c")],
			&[link("a", "b"), link("b", "c"), link("c", "b")],
		)
		.unwrap();
		let b = graph.lookup("b").unwrap();

		assert_eq!(graph.degree(b), 3);
		assert_eq!(
			graph.neighbors(b),
			vec![graph.lookup("a").unwrap(), graph.lookup("c").unwrap()]
		);
	}

	#[test]
	fn error_messages_name_the_offending_id() {
		let err = Graph::build(&[node("a")], &[link("a", "ghost")]).unwrap_err();
		assert_eq!(err.to_string(), "link #0 references unknown node `ghost`");
	}
}
