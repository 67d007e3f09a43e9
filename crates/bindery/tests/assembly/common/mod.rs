//! Shared builders for assembly integration tests.

use std::any::Any;
use std::sync::Arc;

use bindery::{
	BoundObjectDecl, DependencyType, FactoryError, ManagedObjectFactory, ManagedObjectSource, Scope, ScopeAssembler, ScopeBinding,
	TypeCatalog,
};

pub struct Noop;

impl ManagedObjectFactory for Noop {
	fn create(&self) -> Result<Box<dyn Any + Send>, FactoryError> {
		Ok(Box::new(()))
	}
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

pub fn source(name: &str, object_type: &str) -> ManagedObjectSource {
	ManagedObjectSource::new(name, object_type, Arc::new(Noop))
}

/// Object `name` of type `Resource` with one slot per dependency, mapped in order.
pub fn object(name: &str, dependencies: &[&str]) -> BoundObjectDecl {
	let source = dependencies
		.iter()
		.fold(source(name, "Resource"), |source, _| source.with_dependency(DependencyType::new("Resource")));
	dependencies
		.iter()
		.enumerate()
		.fold(BoundObjectDecl::new(name, Arc::new(source)), |decl, (index, target)| decl.depends_on(index, target))
}

pub fn assemble(scope: Scope, objects: Vec<BoundObjectDecl>) -> ScopeBinding {
	init_tracing();
	ScopeAssembler::new(scope, &TypeCatalog::new()).with_objects(objects).assemble()
}
