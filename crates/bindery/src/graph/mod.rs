#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Dependency graph and the two ordering passes.
//!
//! # Purpose
//!
//! Resolved dependency slots form the edge set. The edge set is never
//! persisted; a [`DependencyGraph`] is derived on demand because the two
//! passes need different root sets.
//!
//! # Mental Model
//!
//! 1. **Arena:** every local object and every object of the enclosing chain
//!    becomes a dense [`NodeId`]. Edges point from a dependent to each
//!    dependency of any of its candidate instances (a conservative superset).
//! 2. **Closure:** transitive reachability is an explicit worklist over a
//!    visited set, never recursion.
//! 3. **Cycle pre-pass:** a three-color depth-first search over the nodes of
//!    interest returns the cycle participants before any sort is attempted.
//! 4. **Sort:** with cycles excluded, each pass sorts with a total comparator.
//!
//! # Passes
//!
//! | Pass | Roots | Preference | Tie-break |
//! |------|-------|------------|-----------|
//! | [`dependency_first`] | one consumer's roots plus their closure | dependency before dependent | ascending closure size, then (scope, index) |
//! | [`dependents_first`] | every local object | dependent before dependency | descending closure size, then case-insensitive name |
//!
//! # Invariants
//!
//! - Must order a dependency before its dependent in the coordination pass.
//!   - Enforced in: [`order::dependency_first`].
//!   - Tested by: `graph::tests::chain_orders_dependency_first`
//!   - Failure symptom: a coordinated object observes an unready dependency.
//! - Must order a dependent before its dependency in the whole-scope pass.
//!   - Enforced in: [`order::dependents_first`].
//!   - Tested by: `graph::tests::chain_orders_dependents_first`
//!   - Failure symptom: reverse-order teardown releases a dependency while a dependent is live.
//! - Must report a cycle instead of an order.
//!   - Enforced in: [`cycle::find_cycle`].
//!   - Tested by: `graph::tests::mutual_dependency_is_a_cycle_in_both_passes`
//!   - Failure symptom: indices assigned from an inconsistent edge set.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::assembled::AssembledScope;
use crate::bind::{EnclosingScopes, ObjectRef};
use crate::collect::BoundRegistry;
use crate::scope::{ObjectIndex, Scope};

mod closure;
mod cycle;
mod order;


pub use order::{Cycle, OrderError, order_required};
pub(crate) use order::{dependency_first, dependents_first};

/// Dense arena handle of a graph node.
pub type NodeId = u32;

#[derive(Debug, Clone)]
pub(crate) struct GraphNode {
	pub(crate) name: Arc<str>,
	pub(crate) scope: Scope,
	/// Assigned index, or declaration position for local objects not yet indexed.
	pub(crate) position: u32,
	pub(crate) object: ObjectRef,
}

/// Arena-backed dependency graph over one assembly call.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
	nodes: Vec<GraphNode>,
	edges: Vec<Vec<NodeId>>,
	local_len: usize,
	enclosing: FxHashMap<ObjectIndex, NodeId>,
}

impl DependencyGraph {
	/// Builds the graph for a local registry and its enclosing chain.
	pub(crate) fn build(scope: Scope, registry: &BoundRegistry, enclosing: &EnclosingScopes<'_>) -> Self {
		let mut graph = Self::default();
		for (position, object) in registry.values().enumerate() {
			graph.nodes.push(GraphNode {
				name: Arc::clone(&object.name),
				scope,
				position: object.assigned_index.unwrap_or(position as u32),
				object: ObjectRef::Local(position),
			});
		}
		graph.local_len = graph.nodes.len();
		graph.push_assembled(enclosing.scopes());

		let mut edges = Vec::with_capacity(graph.nodes.len());
		for object in registry.values() {
			let targets = object.instances.iter().flat_map(|instance| instance.resolved_dependencies());
			edges.push(graph.dedup_targets(targets));
		}
		for assembled in enclosing.scopes() {
			for object in assembled.objects() {
				let targets = object
					.instances()
					.iter()
					.flat_map(|instance| instance.dependencies().iter().copied().map(ObjectRef::Enclosing));
				edges.push(graph.dedup_targets(targets));
			}
		}
		graph.edges = edges;
		graph
	}

	/// Builds the graph over already-assembled scopes only.
	pub fn from_scopes(scopes: &[&AssembledScope]) -> Self {
		let mut enclosing = EnclosingScopes::new();
		for scope in scopes {
			enclosing.push(scope);
		}
		Self::build(Scope::Function, &BoundRegistry::default(), &enclosing)
	}

	fn push_assembled(&mut self, scopes: &[&AssembledScope]) {
		for assembled in scopes {
			for object in assembled.objects() {
				let id = self.nodes.len() as NodeId;
				self.enclosing.insert(object.index(), id);
				self.nodes.push(GraphNode {
					name: Arc::clone(object.name_arc()),
					scope: object.index().scope,
					position: object.index().index,
					object: ObjectRef::Enclosing(object.index()),
				});
			}
		}
	}

	fn dedup_targets(&self, targets: impl Iterator<Item = ObjectRef>) -> Vec<NodeId> {
		let mut ids: Vec<NodeId> = Vec::new();
		for target in targets {
			if let Some(id) = self.node_of(target)
				&& !ids.contains(&id)
			{
				ids.push(id);
			}
		}
		ids
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Node ids of the local registry objects, in registry order.
	pub(crate) fn local_nodes(&self) -> Vec<NodeId> {
		(0..self.local_len as NodeId).collect()
	}

	pub(crate) fn node_of(&self, object: ObjectRef) -> Option<NodeId> {
		match object {
			ObjectRef::Local(position) => (position < self.local_len).then_some(position as NodeId),
			ObjectRef::Enclosing(index) => self.enclosing.get(&index).copied(),
		}
	}

	/// Resolves a name the way dependency targets resolve: local nodes first,
	/// then enclosing nodes innermost first.
	pub(crate) fn find(&self, name: &str) -> Option<NodeId> {
		let local = &self.nodes[..self.local_len];
		let enclosing = &self.nodes[self.local_len..];
		if let Some(position) = local.iter().position(|node| &*node.name == name) {
			return Some(position as NodeId);
		}
		enclosing
			.iter()
			.position(|node| &*node.name == name)
			.map(|position| (self.local_len + position) as NodeId)
	}

	pub(crate) fn node(&self, id: NodeId) -> &GraphNode {
		&self.nodes[id as usize]
	}

	pub(crate) fn successors(&self, id: NodeId) -> &[NodeId] {
		&self.edges[id as usize]
	}

	/// Records the index assigned to a local node by the whole-scope pass.
	pub(crate) fn set_position(&mut self, id: NodeId, position: u32) {
		if let Some(node) = self.nodes.get_mut(id as usize) {
			node.position = position;
		}
	}
}
