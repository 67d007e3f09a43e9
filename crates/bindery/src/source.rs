//! Source descriptors: what a producer of a managed object declares about itself.

use std::any::Any;
use std::sync::Arc;

use crate::types::{TypeCatalog, TypeName};

/// Error raised by a [`ManagedObjectFactory`] when the live resource cannot be created.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
	#[error("source '{source_name}' failed to create object: {message}")]
	Create { source_name: Arc<str>, message: String },
	#[error("source '{0}' is not available")]
	Unavailable(Arc<str>),
}

/// Handle used by the execution engine to instantiate a live resource.
///
/// The binding engine only forwards this handle; it never calls it.
pub trait ManagedObjectFactory: Send + Sync {
	fn create(&self) -> Result<Box<dyn Any + Send>, FactoryError>;
}

/// A dependency slot declared by a source.
///
/// The slot index is its position in [`ManagedObjectSource::dependencies`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyType {
	pub key: Option<Arc<str>>,
	pub required_type: TypeName,
}

impl DependencyType {
	pub fn new(required_type: impl Into<TypeName>) -> Self {
		Self {
			key: None,
			required_type: required_type.into(),
		}
	}

	pub fn keyed(key: &str, required_type: impl Into<TypeName>) -> Self {
		Self {
			key: Some(Arc::from(key)),
			required_type: required_type.into(),
		}
	}
}

/// A capability a source offers to governances and administration duties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
	pub extension_type: TypeName,
}

impl ExtensionDescriptor {
	pub fn new(extension_type: impl Into<TypeName>) -> Self {
		Self {
			extension_type: extension_type.into(),
		}
	}

	/// Returns true if this extension can be used where `required` is expected.
	pub fn is_compatible(&self, types: &TypeCatalog, required: &TypeName) -> bool {
		types.is_assignable(&self.extension_type, required)
	}
}

/// Producer of a managed object.
///
/// Identity (for clash resolution and default-source selection) is the `name`.
#[derive(Clone)]
pub struct ManagedObjectSource {
	pub name: Arc<str>,
	pub object_type: TypeName,
	pub dependencies: Vec<DependencyType>,
	pub extensions: Vec<ExtensionDescriptor>,
	pub factory: Arc<dyn ManagedObjectFactory>,
}

impl ManagedObjectSource {
	pub fn new(name: &str, object_type: impl Into<TypeName>, factory: Arc<dyn ManagedObjectFactory>) -> Self {
		Self {
			name: Arc::from(name),
			object_type: object_type.into(),
			dependencies: Vec::new(),
			extensions: Vec::new(),
			factory,
		}
	}

	pub fn with_dependency(mut self, dependency: DependencyType) -> Self {
		self.dependencies.push(dependency);
		self
	}

	pub fn with_extension(mut self, extension: impl Into<TypeName>) -> Self {
		self.extensions.push(ExtensionDescriptor::new(extension));
		self
	}

	pub fn is_same_source(&self, other: &ManagedObjectSource) -> bool {
		self.name == other.name
	}
}

impl std::fmt::Debug for ManagedObjectSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ManagedObjectSource")
			.field("name", &self.name)
			.field("object_type", &self.object_type)
			.field("dependencies", &self.dependencies)
			.field("extensions", &self.extensions)
			.finish_non_exhaustive()
	}
}
