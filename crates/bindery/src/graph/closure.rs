use rustc_hash::FxHashSet;

use super::{DependencyGraph, NodeId};

impl DependencyGraph {
	/// Nodes reachable from `root` through at least one edge.
	///
	/// `root` itself is only included when it lies on a cycle.
	pub(crate) fn reachable_from(&self, root: NodeId) -> FxHashSet<NodeId> {
		let mut visited: FxHashSet<NodeId> = FxHashSet::default();
		let mut worklist: Vec<NodeId> = self.successors(root).to_vec();
		while let Some(id) = worklist.pop() {
			if visited.insert(id) {
				worklist.extend_from_slice(self.successors(id));
			}
		}
		visited
	}

	/// `roots` plus everything reachable from them, in discovery order.
	pub(crate) fn closure_of(&self, roots: &[NodeId]) -> Vec<NodeId> {
		let mut visited: FxHashSet<NodeId> = FxHashSet::default();
		let mut members = Vec::new();
		let mut worklist: Vec<NodeId> = roots.iter().rev().copied().collect();
		while let Some(id) = worklist.pop() {
			if !visited.insert(id) {
				continue;
			}
			members.push(id);
			worklist.extend(self.successors(id).iter().rev().copied());
		}
		members
	}
}
