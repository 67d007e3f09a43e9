use std::sync::Arc;

use bindery::{
	BoundObjectDecl, DependencyType, InputObjectDecl, IssueCategory, IssueKind, ObjectIndex, OrderError, Scope, ScopeAssembler, TypeCatalog,
	order_required,
};
use pretty_assertions::assert_eq;

use crate::common::{assemble, init_tracing, object, source};

#[test]
fn thread_scope_resolves_process_objects_by_index() {
	let process = assemble(Scope::Process, vec![object("pool", &["config"]), object("config", &[])])
		.into_assembled()
		.unwrap();
	let types = TypeCatalog::new();
	let thread = ScopeAssembler::new(Scope::Thread, &types)
		.with_enclosing(&process)
		.with_objects([object("session", &["pool"])])
		.assemble()
		.into_assembled()
		.unwrap();

	let pool = process.get("pool").unwrap().index();
	let config = process.get("config").unwrap().index();
	let session = thread.get("session").unwrap();
	assert_eq!(session.index(), ObjectIndex::new(Scope::Thread, 0));
	assert_eq!(session.default_instance().dependencies(), [pool]);
	assert_eq!(session.default_instance().coordination(), [config, pool]);

	let order = order_required(&[&thread, &process], &[session.index()]).unwrap();
	assert_eq!(order, [config, pool, session.index()]);
}

#[test]
fn order_required_rejects_objects_outside_the_given_scopes() {
	let process = assemble(Scope::Process, vec![object("config", &[])]).into_assembled().unwrap();
	let missing = ObjectIndex::new(Scope::Thread, 0);
	assert_eq!(order_required(&[&process], &[missing]), Err(OrderError::UnknownObject(missing)));
}

#[test]
fn narrower_scope_is_not_visible_to_wider_scope() {
	init_tracing();
	let thread = assemble(Scope::Thread, vec![object("session", &[])]).into_assembled().unwrap();
	let types = TypeCatalog::new();
	let binding = ScopeAssembler::new(Scope::Process, &types)
		.with_enclosing(&thread)
		.with_objects([object("pool", &["session"])])
		.assemble();

	assert_eq!(binding.issues().count(IssueKind::UnresolvedDependency), 1);
}

#[test]
fn local_object_shadows_enclosing_object() {
	let process = assemble(Scope::Process, vec![object("config", &[])]).into_assembled().unwrap();
	let types = TypeCatalog::new();
	let function = ScopeAssembler::new(Scope::Function, &types)
		.with_enclosing(&process)
		.with_objects([object("handler", &["config"]), object("config", &[])])
		.assemble()
		.into_assembled()
		.unwrap();

	let config = function.get("config").unwrap().index();
	assert_eq!(config.scope, Scope::Function);
	assert_eq!(function.get("handler").unwrap().default_instance().dependencies(), [config]);
}

fn input(name: &str, source_name: &str) -> InputObjectDecl {
	InputObjectDecl::new(BoundObjectDecl::new(name, Arc::new(source(source_name, "Request"))))
}

#[test]
fn input_objects_merge_and_select_default_source() {
	init_tracing();
	let types = TypeCatalog::new();
	let assembled = ScopeAssembler::new(Scope::Function, &types)
		.with_inputs([
			input("request", "http"),
			input("request", "http"),
			input("request", "grpc").with_default_source("grpc"),
		])
		.assemble()
		.into_assembled()
		.unwrap();

	let request = assembled.get("request").unwrap();
	assert!(request.is_input());
	assert_eq!(request.instances().len(), 2);
	assert_eq!(&*request.default_instance().source().name, "grpc");
}

#[test]
fn input_without_default_source_rejects_the_scope() {
	init_tracing();
	let types = TypeCatalog::new();
	let binding = ScopeAssembler::new(Scope::Function, &types)
		.with_inputs([input("request", "http"), input("request", "grpc")])
		.with_objects([object("handler", &["request"])])
		.assemble();

	let issues = binding.issues();
	assert_eq!(issues.count(IssueKind::MissingDefaultSource), 1);
	assert_eq!(issues.count(IssueKind::UnresolvedDependency), 1);
	assert!(issues.has_category(IssueCategory::Structural));
	assert!(issues.has_category(IssueCategory::Wiring));
	assert!(binding.get("request").is_none());
	assert!(binding.into_assembled().is_err());
}

#[test]
fn incompatible_candidate_is_reported_per_instance() {
	init_tracing();
	let types = TypeCatalog::new().declare("HttpRequest", ["Request"]);
	let consumer = source("handler", "Handler").with_dependency(DependencyType::new("HttpRequest"));
	let binding = ScopeAssembler::new(Scope::Function, &types)
		.with_inputs([
			InputObjectDecl::new(BoundObjectDecl::new("request", Arc::new(source("http", "HttpRequest")))),
			InputObjectDecl::new(BoundObjectDecl::new("request", Arc::new(source("grpc", "GrpcRequest")))).with_default_source("http"),
		])
		.with_objects([BoundObjectDecl::new("handler", Arc::new(consumer)).depends_on(0, "request")])
		.assemble();

	let issues = binding.issues();
	assert_eq!(issues.len(), 1);
	let issue = issues.of_kind(IssueKind::IncompatibleDependency).next().unwrap();
	assert!(issue.message.contains("'grpc'"));
	assert_eq!(binding.get("handler").unwrap().instances()[0].slots()[0].resolved, None);
}
