use std::sync::Arc;

use super::lookup::ScopeLookup;
use crate::collect::{BoundObject, BoundRegistry, CandidateInstance, DependencySlot};
use crate::decl::DependencyMapping;
use crate::issues::{IssueKind, Issues};
use crate::scope::Scope;
use crate::source::DependencyType;
use crate::types::TypeCatalog;

/// Resolves the declared dependency slots of every candidate instance.
///
/// Slots are computed against an immutable view of the registry and written
/// back afterwards, so resolution never observes partially bound state.
pub(crate) fn bind_dependencies(scope: Scope, registry: &mut BoundRegistry, lookup_scopes: &super::EnclosingScopes<'_>, types: &TypeCatalog, issues: &mut Issues) {
	let mut bound: Vec<(usize, usize, Vec<DependencySlot>)> = Vec::new();
	{
		let lookup = ScopeLookup::new(registry, lookup_scopes);
		let binder = SlotBinder { scope, lookup, types };
		for (position, object) in registry.values().enumerate() {
			for instance in &object.instances {
				let slots = binder.bind_instance(object, instance, issues);
				bound.push((position, instance.instance_index, slots));
			}
		}
	}

	for (position, instance_index, slots) in bound {
		if let Some((_, object)) = registry.get_index_mut(position)
			&& let Some(instance) = object.instances.get_mut(instance_index)
		{
			instance.slots = slots;
		}
	}
}

struct SlotBinder<'r, 'a> {
	scope: Scope,
	lookup: ScopeLookup<'r, 'a>,
	types: &'r TypeCatalog,
}

impl SlotBinder<'_, '_> {
	fn bind_instance(&self, object: &BoundObject, instance: &CandidateInstance, issues: &mut Issues) -> Vec<DependencySlot> {
		let label = object.label(instance);
		let mut consumed = vec![false; instance.mappings.len()];
		let mut slots = Vec::with_capacity(instance.source.dependencies.len());

		for (index, declared) in instance.source.dependencies.iter().enumerate() {
			let mut slot = DependencySlot {
				index,
				key: declared.key.clone(),
				required_type: declared.required_type.clone(),
				target: None,
				resolved: None,
			};

			let Some(mapping_position) = find_mapping(&instance.mappings, &consumed, index, declared) else {
				let slot_desc = describe_slot(index, declared);
				issues.push(
					self.scope,
					&object.name,
					IssueKind::MissingDependencyMapping,
					format!("No mapping configured for dependency {slot_desc} of {label}"),
				);
				slots.push(slot);
				continue;
			};
			consumed[mapping_position] = true;

			let mapping = &instance.mappings[mapping_position];
			let target_name = mapping.target.trim();
			slot.target = Some(Arc::from(target_name));
			slot.resolved = self.resolve_slot(&object.name, &label, &slot, target_name, issues);
			slots.push(slot);
		}

		for (mapping, used) in instance.mappings.iter().zip(&consumed) {
			if !used {
				issues.push(
					self.scope,
					&object.name,
					IssueKind::ExtraDependencyMapping,
					format!(
						"Extra dependency configured for {label}: {} -> '{}' matches no declared dependency",
						mapping.describe(),
						mapping.target
					),
				);
			}
		}

		slots
	}

	fn resolve_slot(&self, subject: &str, label: &str, slot: &DependencySlot, target_name: &str, issues: &mut Issues) -> Option<super::ObjectRef> {
		let Some(target) = self.lookup.resolve(target_name) else {
			issues.push(
				self.scope,
				subject,
				IssueKind::UnresolvedDependency,
				format!("Unresolved dependency '{target_name}' for slot {} of {label}", slot.index),
			);
			return None;
		};

		let mut usable = true;
		for (source_name, produced) in self.lookup.candidate_types(target) {
			if !self.types.is_assignable(produced, &slot.required_type) {
				usable = false;
				issues.push(
					self.scope,
					subject,
					IssueKind::IncompatibleDependency,
					format!(
						"Dependency '{target_name}' (source '{source_name}') produces {produced}, which is not assignable to {} required by slot {} of {label}",
						slot.required_type, slot.index
					),
				);
			}
		}

		usable.then_some(target)
	}
}

/// Finds the first unconsumed mapping for a declared slot: by key for keyed
/// slots, by ordinal position otherwise.
fn find_mapping(mappings: &[DependencyMapping], consumed: &[bool], index: usize, declared: &DependencyType) -> Option<usize> {
	mappings.iter().enumerate().position(|(position, mapping)| {
		!consumed[position]
			&& match &declared.key {
				Some(key) => mapping.key.as_deref() == Some(&**key),
				None => mapping.key.is_none() && mapping.index == index,
			}
	})
}

fn describe_slot(index: usize, declared: &DependencyType) -> String {
	match &declared.key {
		Some(key) => format!("'{key}' (index {index}, type {})", declared.required_type),
		None => format!("{index} (type {})", declared.required_type),
	}
}
