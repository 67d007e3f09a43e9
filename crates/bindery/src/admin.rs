//! Pre-load administration duties.
//!
//! An administration duty declared on a candidate instance administers a set
//! of objects (the owning object when none are named). Binding resolves each
//! administered name through the two-tier lookup and selects a compatible
//! extension on it. The duty's coordination set, every administered object
//! plus its dependency closure in dependency-first order, is computed later by
//! the coordination pass once the dependency graph exists.

use std::sync::Arc;

use crate::bind::{EnclosingScopes, ObjectRef, ScopeLookup};
use crate::collect::BoundRegistry;
use crate::config::ExtensionSelection;
use crate::decl::AdministrationSpec;
use crate::governance::{ExtensionMatch, select_extension};
use crate::issues::{IssueKind, Issues};
use crate::scope::{ObjectIndex, Scope};
use crate::source::ExtensionDescriptor;
use crate::types::{TypeCatalog, TypeName};


/// An administered object with the extension selected for the duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdministeredRef {
	pub object: ObjectRef,
	pub extension_index: usize,
}

/// A bound administration duty prior to index assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdministrationBinding {
	pub name: Arc<str>,
	pub extension_type: TypeName,
	pub administered: Vec<AdministeredRef>,
	pub(crate) required: Option<Vec<ObjectRef>>,
}

impl AdministrationBinding {
	/// Dependency-first order of the objects that must be ready before the duty runs.
	pub fn required(&self) -> Option<&[ObjectRef]> {
		self.required.as_deref()
	}

	pub(crate) fn roots(&self) -> Vec<ObjectRef> {
		self.administered.iter().map(|administered| administered.object).collect()
	}
}

/// An administered object in the assembled snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdministeredObject {
	pub object: ObjectIndex,
	pub extension_index: usize,
}

/// Administration metadata handed to the execution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdministrationMetaData {
	pub name: Arc<str>,
	pub extension_type: TypeName,
	pub administered: Vec<AdministeredObject>,
	/// Objects to make ready, dependency-first, before the duty may run.
	pub required: Vec<ObjectIndex>,
}

/// Binds the administration duties of every candidate instance.
pub(crate) fn bind_administration(
	scope: Scope,
	registry: &mut BoundRegistry,
	enclosing: &EnclosingScopes<'_>,
	types: &TypeCatalog,
	selection: ExtensionSelection,
	issues: &mut Issues,
) {
	let mut bound: Vec<(usize, usize, Vec<AdministrationBinding>)> = Vec::new();
	{
		let lookup = ScopeLookup::new(registry, enclosing);
		for (position, object) in registry.values().enumerate() {
			for instance in &object.instances {
				let label = object.label(instance);
				let bindings = instance
					.administration_specs
					.iter()
					.map(|spec| {
						let owner = AdministrationOwner {
							position,
							name: &object.name,
							label: &label,
							extensions: &instance.source.extensions,
						};
						bind_spec(scope, &lookup, &owner, spec, types, selection, issues)
					})
					.collect();
				bound.push((position, instance.instance_index, bindings));
			}
		}
	}

	for (position, instance_index, bindings) in bound {
		if let Some((_, object)) = registry.get_index_mut(position)
			&& let Some(instance) = object.instances.get_mut(instance_index)
		{
			instance.administration = bindings;
		}
	}
}

struct AdministrationOwner<'o> {
	position: usize,
	name: &'o str,
	label: &'o str,
	extensions: &'o [ExtensionDescriptor],
}

fn bind_spec(
	scope: Scope,
	lookup: &ScopeLookup<'_, '_>,
	owner: &AdministrationOwner<'_>,
	spec: &AdministrationSpec,
	types: &TypeCatalog,
	selection: ExtensionSelection,
	issues: &mut Issues,
) -> AdministrationBinding {
	let names: Vec<&str> = if spec.administered.is_empty() {
		vec![owner.name]
	} else {
		spec.administered.iter().map(|name| name.trim()).collect()
	};

	let mut administered = Vec::with_capacity(names.len());
	for name in names {
		let Some(object) = lookup.resolve(name) else {
			issues.push(
				scope,
				owner.name,
				IssueKind::UnknownAdministeredObject,
				format!("Administration '{}' of {} administers unknown object '{name}'", spec.name, owner.label),
			);
			continue;
		};

		// The owning instance offers its own extensions, not the default instance's.
		let extensions = if object == ObjectRef::Local(owner.position) {
			Some(owner.extensions)
		} else {
			lookup.default_extensions(object)
		};

		match select_extension(extensions.unwrap_or_default(), &spec.extension_type, types, selection) {
			ExtensionMatch::Selected(extension_index) => administered.push(AdministeredRef { object, extension_index }),
			ExtensionMatch::NoneCompatible => issues.push(
				scope,
				owner.name,
				IssueKind::NoCompatibleExtension,
				format!(
					"No compatible extension available on '{name}' for administration '{}' (requires {}) of {}",
					spec.name, spec.extension_type, owner.label
				),
			),
			ExtensionMatch::Ambiguous(positions) => issues.push(
				scope,
				owner.name,
				IssueKind::AmbiguousExtension,
				format!(
					"Administration '{}' (requires {}) of {} matches extensions {positions:?} on '{name}'",
					spec.name, spec.extension_type, owner.label
				),
			),
		}
	}

	AdministrationBinding {
		name: Arc::from(spec.name.trim()),
		extension_type: spec.extension_type.clone(),
		administered,
		required: None,
	}
}
