use std::sync::Arc;

use bindery::admin::AdministeredObject;
use bindery::{
	AdministrationSpec, BinderConfig, BoundObjectDecl, GovernanceRegistry, IssueKind, ObjectIndex, Scope, ScopeAssembler, TypeCatalog,
};
use pretty_assertions::assert_eq;

use crate::common::{init_tracing, object, source};

fn catalog() -> TypeCatalog {
	TypeCatalog::new().declare("StrictAudit", ["Audit"])
}

fn governances() -> GovernanceRegistry {
	let mut governances = GovernanceRegistry::new();
	governances.register("audit", "Audit");
	governances
}

fn audited(name: &str) -> BoundObjectDecl {
	let source = source(name, "Resource").with_extension("Metrics").with_extension("Audit").with_extension("StrictAudit");
	BoundObjectDecl::new(name, Arc::new(source)).governed_by("audit")
}

#[test]
fn governance_is_bound_into_assembled_metadata() {
	init_tracing();
	let types = catalog();
	let governances = governances();
	let assembled = ScopeAssembler::new(Scope::Process, &types)
		.with_governances(&governances)
		.with_objects([audited("ledger")])
		.assemble()
		.into_assembled()
		.unwrap();

	let governance = assembled.get("ledger").unwrap().default_instance().governance();
	assert_eq!(governance.len(), 1);
	assert_eq!(&*governance[0].governance, "audit");
	assert_eq!(governance[0].extension_index, 1);
}

#[test]
fn ambiguous_governance_is_rejected_by_configuration() {
	init_tracing();
	let types = catalog();
	let governances = governances();
	let config = BinderConfig::from_toml_str("extension_selection = \"reject_ambiguous\"").unwrap();
	let binding = ScopeAssembler::new(Scope::Process, &types)
		.with_governances(&governances)
		.with_config(config)
		.with_objects([audited("ledger")])
		.assemble();

	assert_eq!(binding.issues().count(IssueKind::AmbiguousExtension), 1);
	assert!(binding.into_assembled().is_err());
}

#[test]
fn unknown_governance_without_registry_is_reported() {
	init_tracing();
	let types = catalog();
	let binding = ScopeAssembler::new(Scope::Process, &types).with_objects([audited("ledger")]).assemble();

	assert_eq!(binding.issues().count(IssueKind::UnknownGovernance), 1);
}

#[test]
fn administration_requires_administered_closure_dependency_first() {
	init_tracing();
	let types = catalog();
	let store = source("store", "Resource").with_extension("Audit");
	let assembled = ScopeAssembler::new(Scope::Process, &types)
		.with_objects([
			object("loader", &[]).administered_by(AdministrationSpec::new("preload", "Audit").administering(["store"])),
			BoundObjectDecl::new("store", Arc::new(store.with_dependency(bindery::DependencyType::new("Resource")))).depends_on(0, "disk"),
			object("disk", &[]),
		])
		.assemble()
		.into_assembled()
		.unwrap();

	let store = assembled.get("store").unwrap().index();
	let disk = assembled.get("disk").unwrap().index();
	let duty = &assembled.get("loader").unwrap().default_instance().administration()[0];
	assert_eq!(&*duty.name, "preload");
	assert_eq!(
		duty.administered,
		[AdministeredObject {
			object: store,
			extension_index: 0,
		}]
	);
	assert_eq!(duty.required, [disk, store]);
	assert_eq!(disk, ObjectIndex::new(Scope::Process, 1));
}

#[test]
fn issue_limit_caps_recorded_issues() {
	init_tracing();
	let types = catalog();
	let config = BinderConfig::default().with_issue_limit(2);
	let binding = ScopeAssembler::new(Scope::Process, &types)
		.with_config(config)
		.with_objects([object("a", &["x"]), object("b", &["y"]), object("c", &["z"])])
		.assemble();

	assert_eq!(binding.issues().len(), 2);
	assert_eq!(binding.issues().suppressed(), 1);
	assert!(!binding.issues().is_empty());
}
