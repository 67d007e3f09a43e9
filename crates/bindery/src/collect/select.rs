use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::BoundRegistry;
use crate::issues::{IssueKind, Issues};
use crate::scope::Scope;

/// Resolves the default candidate instance of every registered object.
///
/// Objects with several candidates need a configured default source matching
/// exactly one candidate; otherwise they are removed from the registry.
pub(super) fn select_instances(scope: Scope, registry: &mut BoundRegistry, defaults: &FxHashMap<Arc<str>, Arc<str>>, issues: &mut Issues) {
	registry.retain(|name, object| {
		if object.instances.len() <= 1 {
			object.default_instance = 0;
			return true;
		}

		let sources = object
			.instances
			.iter()
			.map(|instance| format!("'{}'", instance.source.name))
			.collect::<Vec<_>>()
			.join(", ");

		let Some(default) = defaults.get(name) else {
			issues.push(
				scope,
				name,
				IssueKind::MissingDefaultSource,
				format!("Must specify default source for input object '{name}' bound by multiple sources ({sources})"),
			);
			return false;
		};

		let mut matching = object
			.instances
			.iter()
			.enumerate()
			.filter(|(_, instance)| *instance.source.name == **default)
			.map(|(position, _)| position);
		match (matching.next(), matching.next()) {
			(Some(position), None) => {
				object.default_instance = position;
				true
			}
			_ => {
				issues.push(
					scope,
					name,
					IssueKind::UnknownDefaultSource,
					format!("Default source '{default}' for input object '{name}' does not match exactly one of {sources}"),
				);
				false
			}
		}
	});
}
