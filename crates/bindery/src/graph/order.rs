use std::cmp::Ordering;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use thiserror::Error;

use super::cycle::find_cycle;
use super::{DependencyGraph, NodeId};
use crate::assembled::AssembledScope;
use crate::bind::ObjectRef;
use crate::scope::ObjectIndex;

/// Participants of a dependency cycle, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cycle {
	participants: Vec<Arc<str>>,
}

impl Cycle {
	fn from_nodes(graph: &DependencyGraph, nodes: &[NodeId]) -> Self {
		let mut participants: Vec<Arc<str>> = nodes.iter().map(|&id| Arc::clone(&graph.node(id).name)).collect();
		participants.sort();
		participants.dedup();
		Self { participants }
	}

	pub fn participants(&self) -> &[Arc<str>] {
		&self.participants
	}

	/// Participants joined for a diagnostic, e.g. `A, B and C`.
	pub fn describe(&self) -> String {
		match self.participants.as_slice() {
			[] => String::new(),
			[only] => only.to_string(),
			[init @ .., last] => {
				let init: Vec<&str> = init.iter().map(|name| &**name).collect();
				format!("{} and {last}", init.join(", "))
			}
		}
	}
}

impl std::fmt::Display for Cycle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "cyclic dependency between {}", self.describe())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
	#[error("object {0} is not part of any given scope")]
	UnknownObject(ObjectIndex),
	#[error("no object named '{0}'")]
	UnknownName(Arc<str>),
	#[error("{0}")]
	Cycle(Cycle),
}

/// Reachable sets of `members`, indexed like `members`.
fn closures(graph: &DependencyGraph, members: &[NodeId]) -> Vec<FxHashSet<NodeId>> {
	members.iter().map(|&id| graph.reachable_from(id)).collect()
}

/// Dependency-first order of `roots` and their closure.
///
/// A dependency precedes every object that reaches it. Unrelated objects are
/// ordered by ascending closure size, then by `(scope, index)`.
pub(crate) fn dependency_first(graph: &DependencyGraph, roots: &[NodeId]) -> Result<Vec<NodeId>, Cycle> {
	let members = graph.closure_of(roots);
	if let Some(cycle) = find_cycle(graph, &members) {
		return Err(Cycle::from_nodes(graph, &cycle));
	}

	let reach = closures(graph, &members);
	let mut order: Vec<usize> = (0..members.len()).collect();
	order.sort_by(|&x, &y| {
		let (x_id, y_id) = (members[x], members[y]);
		if reach[y].contains(&x_id) {
			return Ordering::Less;
		}
		if reach[x].contains(&y_id) {
			return Ordering::Greater;
		}
		let (x_node, y_node) = (graph.node(x_id), graph.node(y_id));
		reach[x]
			.len()
			.cmp(&reach[y].len())
			.then_with(|| (x_node.scope, x_node.position).cmp(&(y_node.scope, y_node.position)))
			.then_with(|| x_id.cmp(&y_id))
	});

	let order: Vec<NodeId> = order.into_iter().map(|position| members[position]).collect();
	tracing::trace!(len = order.len(), "dependency-first order");
	Ok(order)
}

/// Dependents-first order over `members`.
///
/// An object precedes every object it reaches. Unrelated objects are ordered
/// by descending closure size, then by case-insensitive name.
pub(crate) fn dependents_first(graph: &DependencyGraph, members: &[NodeId]) -> Result<Vec<NodeId>, Cycle> {
	if let Some(cycle) = find_cycle(graph, members) {
		return Err(Cycle::from_nodes(graph, &cycle));
	}

	let reach = closures(graph, members);
	let mut order: Vec<usize> = (0..members.len()).collect();
	order.sort_by(|&x, &y| {
		let (x_id, y_id) = (members[x], members[y]);
		if reach[x].contains(&y_id) {
			return Ordering::Less;
		}
		if reach[y].contains(&x_id) {
			return Ordering::Greater;
		}
		let (x_name, y_name) = (&graph.node(x_id).name, &graph.node(y_id).name);
		reach[y]
			.len()
			.cmp(&reach[x].len())
			.then_with(|| compare_names(x_name, y_name))
			.then_with(|| x_id.cmp(&y_id))
	});

	let order: Vec<NodeId> = order.into_iter().map(|position| members[position]).collect();
	tracing::trace!(len = order.len(), "dependents-first order");
	Ok(order)
}

fn compare_names(a: &str, b: &str) -> Ordering {
	a.chars()
		.flat_map(char::to_lowercase)
		.cmp(b.chars().flat_map(char::to_lowercase))
		.then_with(|| a.cmp(b))
}

/// Orders `roots` and their closure across assembled scopes, dependencies first.
///
/// `scopes` must list every scope a root or one of its dependencies lives in.
pub fn order_required(scopes: &[&AssembledScope], roots: &[ObjectIndex]) -> Result<Vec<ObjectIndex>, OrderError> {
	let graph = DependencyGraph::from_scopes(scopes);
	let mut nodes = Vec::with_capacity(roots.len());
	for &root in roots {
		let id = graph.node_of(ObjectRef::Enclosing(root)).ok_or(OrderError::UnknownObject(root))?;
		nodes.push(id);
	}

	let order = dependency_first(&graph, &nodes).map_err(OrderError::Cycle)?;
	Ok(order
		.into_iter()
		.filter_map(|id| match graph.node(id).object {
			ObjectRef::Enclosing(index) => Some(index),
			ObjectRef::Local(_) => None,
		})
		.collect())
}
