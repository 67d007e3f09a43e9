use bindery::{BoundObjectDecl, Scope};
use proptest::prelude::*;

use crate::common::{assemble, object};

/// Random acyclic dependency lists: object `i` may only depend on objects with
/// a smaller index, and declarations are shuffled so that declaration order
/// carries no hint of the dependency order.
fn arb_dag() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<usize>)> {
	(1..10usize)
		.prop_flat_map(|len| {
			let edges = proptest::collection::vec(proptest::collection::vec(any::<bool>(), len), len);
			let order = Just((0..len).collect::<Vec<_>>()).prop_shuffle();
			(edges, order)
		})
		.prop_map(|(matrix, order)| {
			let deps: Vec<Vec<usize>> = matrix
				.iter()
				.enumerate()
				.map(|(node, row)| (0..node).filter(|&target| row[target]).collect())
				.collect();
			(deps, order)
		})
}

fn name(node: usize) -> String {
	format!("obj{node}")
}

fn decls(deps: &[Vec<usize>], order: &[usize]) -> Vec<BoundObjectDecl> {
	order
		.iter()
		.map(|&node| {
			let targets: Vec<String> = deps[node].iter().map(|&target| name(target)).collect();
			let targets: Vec<&str> = targets.iter().map(String::as_str).collect();
			object(&name(node), &targets)
		})
		.collect()
}

fn closure(deps: &[Vec<usize>], root: usize) -> Vec<usize> {
	let mut seen = vec![false; deps.len()];
	let mut worklist = deps[root].clone();
	while let Some(node) = worklist.pop() {
		if !seen[node] {
			seen[node] = true;
			worklist.extend(&deps[node]);
		}
	}
	(0..deps.len()).filter(|&node| seen[node]).collect()
}

proptest! {
	/// Whole-scope indices put every dependent before its dependencies.
	#[test]
	fn prop_whole_scope_indices_put_dependents_first((deps, order) in arb_dag()) {
		let binding = assemble(Scope::Process, decls(&deps, &order));
		prop_assert!(binding.issues().is_empty());

		let index_of = |node: usize| binding.get(&name(node)).and_then(|object| object.assigned_index());
		for (node, targets) in deps.iter().enumerate() {
			for &target in targets {
				let (dependent, dependency) = (index_of(node), index_of(target));
				prop_assert!(dependent.is_some() && dependency.is_some());
				prop_assert!(dependent < dependency, "{} -> {}", name(node), name(target));
			}
		}

		let assembled = binding.into_assembled().unwrap();
		let teardown: Vec<&str> = assembled.teardown_order().map(|object| object.name()).collect();
		for (node, targets) in deps.iter().enumerate() {
			let dependent = teardown.iter().position(|&n| n == name(node));
			for &target in targets {
				prop_assert!(dependent < teardown.iter().position(|&n| n == name(target)));
			}
		}
	}

	/// A consumer order places every object after its whole closure.
	#[test]
	fn prop_consumer_order_puts_closure_first((deps, order) in arb_dag(), root in any::<prop::sample::Index>()) {
		let root = root.index(deps.len());
		let binding = assemble(Scope::Process, decls(&deps, &order));
		let root_name = name(root);
		let consumer = binding.order_for(&[root_name.as_str()]).unwrap();

		let mut expected = closure(&deps, root);
		expected.push(root);
		prop_assert_eq!(consumer.len(), expected.len());

		let position = |node: usize| consumer.iter().position(|n| **n == *name(node));
		for &member in &expected {
			let at = position(member);
			prop_assert!(at.is_some());
			for dependency in closure(&deps, member) {
				prop_assert!(position(dependency) < at, "{} before {}", name(dependency), name(member));
			}
		}
	}
}
