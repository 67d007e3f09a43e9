//! Immutable snapshot handed to the execution engine.
//!
//! An [`AssembledScope`] is only produced from an assembly that recorded no
//! issues. Array position equals the assigned index, so the engine stores and
//! retrieves live resources by [`ObjectIndex`] alone.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::admin::AdministrationMetaData;
use crate::governance::GovernanceBinding;
use crate::scope::{ObjectIndex, Scope};
use crate::source::{ManagedObjectFactory, ManagedObjectSource};
use crate::types::TypeName;

/// Resolved metadata of one candidate instance.
#[derive(Debug, Clone)]
pub struct InstanceMetaData {
	pub(crate) source: Arc<ManagedObjectSource>,
	pub(crate) dependencies: Vec<ObjectIndex>,
	pub(crate) coordination: Vec<ObjectIndex>,
	pub(crate) governance: Vec<GovernanceBinding>,
	pub(crate) administration: Vec<AdministrationMetaData>,
}

impl InstanceMetaData {
	pub fn source(&self) -> &Arc<ManagedObjectSource> {
		&self.source
	}

	pub fn object_type(&self) -> &TypeName {
		&self.source.object_type
	}

	/// Dependency handles in slot order.
	pub fn dependencies(&self) -> &[ObjectIndex] {
		&self.dependencies
	}

	/// The dependency closure, dependencies first. Every entry must be ready
	/// before this instance is coordinated.
	pub fn coordination(&self) -> &[ObjectIndex] {
		&self.coordination
	}

	pub fn governance(&self) -> &[GovernanceBinding] {
		&self.governance
	}

	pub fn administration(&self) -> &[AdministrationMetaData] {
		&self.administration
	}

	pub fn factory(&self) -> &Arc<dyn ManagedObjectFactory> {
		&self.source.factory
	}
}

/// An indexed managed object.
#[derive(Debug, Clone)]
pub struct ManagedObjectMetaData {
	pub(crate) name: Arc<str>,
	pub(crate) index: ObjectIndex,
	pub(crate) is_input: bool,
	pub(crate) default_instance: usize,
	pub(crate) thread_local: Option<Arc<str>>,
	pub(crate) instances: Vec<InstanceMetaData>,
}

impl ManagedObjectMetaData {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn name_arc(&self) -> &Arc<str> {
		&self.name
	}

	pub fn index(&self) -> ObjectIndex {
		self.index
	}

	pub fn is_input(&self) -> bool {
		self.is_input
	}

	pub fn thread_local(&self) -> Option<&str> {
		self.thread_local.as_deref()
	}

	pub fn instances(&self) -> &[InstanceMetaData] {
		&self.instances
	}

	pub fn default_instance_index(&self) -> usize {
		self.default_instance
	}

	pub fn default_instance(&self) -> &InstanceMetaData {
		&self.instances[self.default_instance]
	}

	pub fn object_type(&self) -> &TypeName {
		self.default_instance().object_type()
	}
}

/// The indexed objects of one scope.
#[derive(Debug, Clone)]
pub struct AssembledScope {
	scope: Scope,
	objects: Vec<ManagedObjectMetaData>,
	by_name: FxHashMap<Arc<str>, u32>,
}

impl AssembledScope {
	/// `objects` must be sorted by assigned index.
	pub(crate) fn new(scope: Scope, objects: Vec<ManagedObjectMetaData>) -> Self {
		debug_assert!(objects.iter().enumerate().all(|(position, object)| object.index.index as usize == position));
		let by_name = objects.iter().map(|object| (Arc::clone(&object.name), object.index.index)).collect();
		Self { scope, objects, by_name }
	}

	pub fn scope(&self) -> Scope {
		self.scope
	}

	pub fn objects(&self) -> &[ManagedObjectMetaData] {
		&self.objects
	}

	pub fn len(&self) -> usize {
		self.objects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.objects.is_empty()
	}

	pub fn get(&self, name: &str) -> Option<&ManagedObjectMetaData> {
		self.by_name.get(name).and_then(|&index| self.get_index(index))
	}

	pub fn get_index(&self, index: u32) -> Option<&ManagedObjectMetaData> {
		self.objects.get(index as usize)
	}

	/// Objects in creation order, the whole-scope order replayed in reverse:
	/// every dependency before its dependents.
	pub fn startup_order(&self) -> impl Iterator<Item = &ManagedObjectMetaData> {
		self.objects.iter().rev()
	}

	/// Objects in release order, the reverse of [`startup_order`](Self::startup_order):
	/// every dependent before its dependencies.
	pub fn teardown_order(&self) -> impl Iterator<Item = &ManagedObjectMetaData> {
		self.objects.iter()
	}
}
