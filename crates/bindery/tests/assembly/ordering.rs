use std::sync::Arc;

use bindery::{AssemblyError, IssueKind, ObjectIndex, OrderPass, Scope};
use pretty_assertions::assert_eq;

use crate::common::{assemble, object};

fn names<'a>(objects: impl Iterator<Item = &'a bindery::ManagedObjectMetaData>) -> Vec<&'a str> {
	objects.map(|object| object.name()).collect()
}

#[test]
fn chain_whole_scope_order_is_dependents_first() {
	let binding = assemble(Scope::Process, vec![object("C", &[]), object("A", &["B"]), object("B", &["C"])]);

	assert!(binding.issues().is_empty());
	assert_eq!(binding.whole_scope_order(), Some(vec!["A", "B", "C"]));
	assert_eq!(binding.get("A").unwrap().assigned_index(), Some(0));
	assert_eq!(binding.get("B").unwrap().assigned_index(), Some(1));
	assert_eq!(binding.get("C").unwrap().assigned_index(), Some(2));

	let assembled = binding.into_assembled().unwrap();
	assert_eq!(names(assembled.teardown_order()), ["A", "B", "C"]);
	assert_eq!(names(assembled.startup_order()), ["C", "B", "A"]);
}

#[test]
fn chain_consumer_order_is_dependency_first() {
	let binding = assemble(Scope::Process, vec![object("A", &["B"]), object("B", &["C"]), object("C", &[])]);

	let order = binding.order_for(&["A"]).unwrap();
	assert_eq!(order, [Arc::<str>::from("C"), Arc::from("B"), Arc::from("A")]);

	let assembled = binding.into_assembled().unwrap();
	let a = assembled.get("A").unwrap().default_instance();
	assert_eq!(a.dependencies(), [ObjectIndex::new(Scope::Process, 1)]);
	assert_eq!(a.coordination(), [ObjectIndex::new(Scope::Process, 2), ObjectIndex::new(Scope::Process, 1)]);
}

#[test]
fn mutual_dependency_reports_one_cycle_per_pass_and_assigns_no_index() {
	let binding = assemble(Scope::Process, vec![object("B", &["A"]), object("A", &["B"]), object("C", &[])]);
	let issues = binding.issues();

	assert_eq!(issues.count(IssueKind::CyclicDependency(OrderPass::WholeScope)), 1);
	assert_eq!(issues.count(IssueKind::CyclicDependency(OrderPass::Coordination)), 1);
	for issue in issues {
		assert!(issue.message.contains("A and B"), "{issue}");
	}

	assert_eq!(binding.whole_scope_order(), None);
	for name in ["A", "B", "C"] {
		assert_eq!(binding.get(name).unwrap().assigned_index(), None);
	}
	assert!(binding.get("C").unwrap().instances()[0].coordination().is_some());
	assert!(binding.get("A").unwrap().instances()[0].coordination().is_none());
	assert!(binding.order_for(&["A"]).is_err());

	match binding.into_assembled() {
		Err(AssemblyError::Rejected { scope, issues }) => {
			assert_eq!(scope, Scope::Process);
			assert_eq!(issues.len(), 2);
		}
		other => panic!("expected rejection, got {other:?}"),
	}
}

#[test]
fn transitive_cycle_is_reported_once_for_every_consumer() {
	let binding = assemble(
		Scope::Process,
		vec![object("A", &["B"]), object("B", &["C"]), object("C", &["A"]), object("D", &["A"])],
	);
	let issues = binding.issues();

	assert_eq!(issues.count(IssueKind::CyclicDependency(OrderPass::WholeScope)), 1);
	assert_eq!(issues.count(IssueKind::CyclicDependency(OrderPass::Coordination)), 1);
	let cycle = issues.of_kind(IssueKind::CyclicDependency(OrderPass::WholeScope)).next().unwrap();
	assert!(cycle.message.contains("A, B and C"));
	assert!(!cycle.message.contains('D'));
}

#[test]
fn unresolved_dependency_never_enters_a_closure() {
	let binding = assemble(Scope::Process, vec![object("A", &["ghost"]), object("B", &["A"])]);

	assert_eq!(binding.issues().len(), 1);
	assert_eq!(binding.issues().count(IssueKind::UnresolvedDependency), 1);
	assert_eq!(binding.whole_scope_order(), Some(vec!["B", "A"]));
	assert_eq!(binding.order_for(&["B"]).unwrap(), [Arc::<str>::from("A"), Arc::from("B")]);
	assert!(binding.order_for(&["ghost"]).is_err());
	assert!(binding.into_assembled().is_err());
}

#[test]
fn unrelated_objects_tie_break_by_closure_size_then_name() {
	let binding = assemble(
		Scope::Process,
		vec![object("zed", &[]), object("Beta", &[]), object("alpha", &[]), object("top", &["zed"])],
	);

	assert_eq!(binding.whole_scope_order(), Some(vec!["top", "alpha", "Beta", "zed"]));
}
