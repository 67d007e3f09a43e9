use std::any::Any;
use std::sync::Arc;

use crate::source::{DependencyType, FactoryError, ManagedObjectFactory, ManagedObjectSource};

pub(crate) struct NoopFactory;

impl ManagedObjectFactory for NoopFactory {
	fn create(&self) -> Result<Box<dyn Any + Send>, FactoryError> {
		Ok(Box::new(()))
	}
}

/// Source `name` producing `object_type`, with no slots or extensions.
pub(crate) fn source(name: &str, object_type: &str) -> ManagedObjectSource {
	ManagedObjectSource::new(name, object_type, Arc::new(NoopFactory))
}

/// Source with one unkeyed slot per entry of `dependencies`.
pub(crate) fn source_with_deps(name: &str, object_type: &str, dependencies: &[&str]) -> Arc<ManagedObjectSource> {
	let source = dependencies
		.iter()
		.fold(source(name, object_type), |source, required| source.with_dependency(DependencyType::new(*required)));
	Arc::new(source)
}
