//! Two-tier name lookup.
//!
//! # Resolution Order
//!
//! 1. Objects newly bound in the current call (the local registry)
//! 2. Objects already bound in enclosing scopes, innermost first
//!
//! Local names shadow same-named enclosing objects. Neither tier is mutated or
//! merged; the lookup only borrows immutable snapshots.

use crate::assembled::{AssembledScope, ManagedObjectMetaData};
use crate::collect::BoundRegistry;
use crate::scope::{ObjectIndex, Scope};
use crate::source::ExtensionDescriptor;
use crate::types::TypeName;

/// Reference to a resolvable bound object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRef {
	/// Position in the local registry of the current call.
	Local(usize),
	/// An object already assembled in an enclosing scope.
	Enclosing(ObjectIndex),
}

/// Ordered chain of already-assembled enclosing scopes, innermost first.
#[derive(Debug, Clone, Default)]
pub struct EnclosingScopes<'a> {
	scopes: Vec<&'a AssembledScope>,
}

impl<'a> EnclosingScopes<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an outer scope. Scopes must be pushed innermost first.
	pub fn push(&mut self, scope: &'a AssembledScope) {
		self.scopes.push(scope);
	}

	/// Drops every scope the `current` scope cannot depend on, and every scope
	/// whose tier is already present closer in the chain.
	///
	/// Enclosing objects are addressed by [`ObjectIndex`], which is only unique
	/// while each tier appears at most once.
	pub(crate) fn retain_reachable(&mut self, current: Scope) {
		let mut seen: Vec<Scope> = Vec::with_capacity(self.scopes.len());
		self.scopes.retain(|enclosing| {
			let tier = enclosing.scope();
			if !current.can_reach(tier) {
				tracing::warn!(%current, enclosing = %tier, "ignoring scope that cannot enclose the assembled scope");
				return false;
			}
			if seen.contains(&tier) {
				tracing::warn!(%current, enclosing = %tier, "ignoring second enclosing scope of the same tier");
				return false;
			}
			seen.push(tier);
			true
		});
	}

	pub fn scopes(&self) -> &[&'a AssembledScope] {
		&self.scopes
	}

	pub fn find(&self, name: &str) -> Option<&'a ManagedObjectMetaData> {
		self.scopes.iter().find_map(|scope| scope.get(name))
	}

	pub fn get(&self, index: ObjectIndex) -> Option<&'a ManagedObjectMetaData> {
		self.scopes
			.iter()
			.find(|scope| scope.scope() == index.scope)
			.and_then(|scope| scope.get_index(index.index))
	}
}

/// Pure lookup over the local registry and the enclosing chain.
#[derive(Clone, Copy)]
pub(crate) struct ScopeLookup<'r, 'a> {
	local: &'r BoundRegistry,
	enclosing: &'r EnclosingScopes<'a>,
}

impl<'r, 'a> ScopeLookup<'r, 'a> {
	pub(crate) fn new(local: &'r BoundRegistry, enclosing: &'r EnclosingScopes<'a>) -> Self {
		Self { local, enclosing }
	}

	pub(crate) fn resolve(&self, name: &str) -> Option<ObjectRef> {
		if let Some(position) = self.local.get_index_of(name) {
			return Some(ObjectRef::Local(position));
		}
		self.enclosing.find(name).map(|object| ObjectRef::Enclosing(object.index()))
	}

	/// Name of the referenced object.
	pub(crate) fn name_of(&self, target: ObjectRef) -> Option<&'r str> {
		match target {
			ObjectRef::Local(position) => self.local.get_index(position).map(|(name, _)| &**name),
			ObjectRef::Enclosing(index) => self.enclosing.get(index).map(ManagedObjectMetaData::name),
		}
	}

	/// `(source name, produced type)` for every candidate instance of the target.
	pub(crate) fn candidate_types(&self, target: ObjectRef) -> Vec<(&'r str, &'r TypeName)> {
		match target {
			ObjectRef::Local(position) => self
				.local
				.get_index(position)
				.map(|(_, object)| object.candidate_types().collect())
				.unwrap_or_default(),
			ObjectRef::Enclosing(index) => self
				.enclosing
				.get(index)
				.map(|object| {
					object
						.instances()
						.iter()
						.map(|instance| (&*instance.source().name, instance.object_type()))
						.collect()
				})
				.unwrap_or_default(),
		}
	}

	/// Extensions offered by the instance consumers see under the target's name.
	pub(crate) fn default_extensions(&self, target: ObjectRef) -> Option<&'r [ExtensionDescriptor]> {
		match target {
			ObjectRef::Local(position) => self
				.local
				.get_index(position)
				.and_then(|(_, object)| object.default_instance())
				.map(|instance| instance.source.extensions.as_slice()),
			ObjectRef::Enclosing(index) => self
				.enclosing
				.get(index)
				.map(ManagedObjectMetaData::default_instance)
				.map(|instance| instance.source().extensions.as_slice()),
		}
	}
}
