//! Declarations consumed from the configuration front end.

use std::sync::Arc;

use serde::Deserialize;

use crate::source::ManagedObjectSource;
use crate::types::TypeName;

/// Configured wiring of one dependency slot to a bound object name.
///
/// Matched against a declared slot by `key` when the slot is keyed, otherwise
/// by `index`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencyMapping {
	pub index: usize,
	#[serde(default)]
	pub key: Option<String>,
	pub target: String,
}

impl DependencyMapping {
	pub fn indexed(index: usize, target: &str) -> Self {
		Self {
			index,
			key: None,
			target: target.to_string(),
		}
	}

	pub fn keyed(index: usize, key: &str, target: &str) -> Self {
		Self {
			index,
			key: Some(key.to_string()),
			target: target.to_string(),
		}
	}

	pub(crate) fn describe(&self) -> String {
		match &self.key {
			Some(key) => format!("key '{key}'"),
			None => format!("index {}", self.index),
		}
	}
}

/// An administration duty that must run before the owning object is used.
///
/// An empty `administered` list administers the owning object itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdministrationSpec {
	pub name: String,
	pub extension_type: TypeName,
	#[serde(default)]
	pub administered: Vec<String>,
}

impl AdministrationSpec {
	pub fn new(name: &str, extension_type: impl Into<TypeName>) -> Self {
		Self {
			name: name.to_string(),
			extension_type: extension_type.into(),
			administered: Vec::new(),
		}
	}

	pub fn administering<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.administered.extend(names.into_iter().map(Into::into));
		self
	}
}

/// Declaration of an ordinary bound object.
#[derive(Debug, Clone)]
pub struct BoundObjectDecl {
	pub bound_name: String,
	pub source: Arc<ManagedObjectSource>,
	pub dependencies: Vec<DependencyMapping>,
	pub governances: Vec<String>,
	pub administration: Vec<AdministrationSpec>,
	pub thread_local: Option<String>,
}

impl BoundObjectDecl {
	pub fn new(bound_name: &str, source: Arc<ManagedObjectSource>) -> Self {
		Self {
			bound_name: bound_name.to_string(),
			source,
			dependencies: Vec::new(),
			governances: Vec::new(),
			administration: Vec::new(),
			thread_local: None,
		}
	}

	pub fn depends_on(mut self, index: usize, target: &str) -> Self {
		self.dependencies.push(DependencyMapping::indexed(index, target));
		self
	}

	pub fn depends_on_key(mut self, index: usize, key: &str, target: &str) -> Self {
		self.dependencies.push(DependencyMapping::keyed(index, key, target));
		self
	}

	pub fn governed_by(mut self, governance: &str) -> Self {
		self.governances.push(governance.to_string());
		self
	}

	pub fn administered_by(mut self, spec: AdministrationSpec) -> Self {
		self.administration.push(spec);
		self
	}

	pub fn thread_local(mut self, export: &str) -> Self {
		self.thread_local = Some(export.to_string());
		self
	}
}

/// Declaration of an input object: a bound object that may be fed by several
/// producers sharing one name.
#[derive(Debug, Clone)]
pub struct InputObjectDecl {
	pub object: BoundObjectDecl,
	/// Source name to use when several producers share the bound name.
	pub default_source: Option<String>,
}

impl InputObjectDecl {
	pub fn new(object: BoundObjectDecl) -> Self {
		Self {
			object,
			default_source: None,
		}
	}

	pub fn with_default_source(mut self, source: &str) -> Self {
		self.default_source = Some(source.to_string());
		self
	}
}
