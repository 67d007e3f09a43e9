//! Governance binding and extension selection.
//!
//! A governance is a named cross-cutting control requiring one extension type.
//! Each declared governance name of a candidate instance is looked up in the
//! [`GovernanceRegistry`] and bound to a compatible extension offered by the
//! instance's source.
//!
//! # Selection Contract
//!
//! Offered extensions are scanned in declaration order. With
//! [`ExtensionSelection::FirstCompatible`] the first compatible extension wins,
//! even if later ones are compatible too. With
//! [`ExtensionSelection::RejectAmbiguous`] more than one compatible extension
//! is an issue.
//!
//! - Enforced in: [`select_extension`]
//! - Tested by: `governance::tests::first_compatible_extension_wins`

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::collect::BoundRegistry;
use crate::config::ExtensionSelection;
use crate::issues::{IssueKind, Issues};
use crate::scope::Scope;
use crate::source::ExtensionDescriptor;
use crate::types::{TypeCatalog, TypeName};


/// A registered governance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceDef {
	pub name: Arc<str>,
	pub extension_type: TypeName,
}

/// Named governances, in registration order.
#[derive(Debug, Clone, Default)]
pub struct GovernanceRegistry {
	defs: IndexMap<Arc<str>, GovernanceDef, FxBuildHasher>,
}

impl GovernanceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a governance. A later registration of the same name replaces
	/// the earlier one but keeps its position.
	pub fn register(&mut self, name: &str, extension_type: impl Into<TypeName>) -> &mut Self {
		let def = GovernanceDef {
			name: Arc::from(name),
			extension_type: extension_type.into(),
		};
		if self.defs.insert(Arc::clone(&def.name), def).is_some() {
			tracing::debug!(governance = name, "governance re-registered");
		}
		self
	}

	pub fn get(&self, name: &str) -> Option<(usize, &GovernanceDef)> {
		self.defs.get_full(name).map(|(position, _, def)| (position, def))
	}

	pub fn len(&self) -> usize {
		self.defs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.defs.is_empty()
	}
}

/// A governance matched to one extension of a candidate instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceBinding {
	pub governance: Arc<str>,
	/// Position of the governance in its registry.
	pub governance_index: usize,
	/// Position of the selected extension in the source's extension list.
	pub extension_index: usize,
	pub extension_type: TypeName,
}

/// Outcome of scanning offered extensions for a required type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionMatch {
	Selected(usize),
	NoneCompatible,
	Ambiguous(Vec<usize>),
}

pub(crate) fn select_extension(extensions: &[ExtensionDescriptor], required: &TypeName, types: &TypeCatalog, selection: ExtensionSelection) -> ExtensionMatch {
	let mut compatible = extensions
		.iter()
		.enumerate()
		.filter(|(_, extension)| extension.is_compatible(types, required))
		.map(|(position, _)| position);

	let Some(first) = compatible.next() else {
		return ExtensionMatch::NoneCompatible;
	};
	match selection {
		ExtensionSelection::FirstCompatible => ExtensionMatch::Selected(first),
		ExtensionSelection::RejectAmbiguous => {
			let rest: Vec<usize> = compatible.collect();
			if rest.is_empty() {
				ExtensionMatch::Selected(first)
			} else {
				ExtensionMatch::Ambiguous(std::iter::once(first).chain(rest).collect())
			}
		}
	}
}

/// Binds the declared governances of every candidate instance.
pub(crate) fn bind_governance(
	scope: Scope,
	registry: &mut BoundRegistry,
	governances: &GovernanceRegistry,
	types: &TypeCatalog,
	selection: ExtensionSelection,
	issues: &mut Issues,
) {
	for object in registry.values_mut() {
		let multiple = object.instances.len() > 1;
		for instance in &mut object.instances {
			let label = if multiple {
				format!("{} (source '{}')", object.name, instance.source.name)
			} else {
				object.name.to_string()
			};

			let mut bindings = Vec::with_capacity(instance.governance_names.len());
			for governance_name in &instance.governance_names {
				let Some((governance_index, def)) = governances.get(governance_name.trim()) else {
					issues.push(
						scope,
						&object.name,
						IssueKind::UnknownGovernance,
						format!("Unknown governance '{governance_name}' for {label}"),
					);
					continue;
				};

				match select_extension(&instance.source.extensions, &def.extension_type, types, selection) {
					ExtensionMatch::Selected(extension_index) => bindings.push(GovernanceBinding {
						governance: Arc::clone(&def.name),
						governance_index,
						extension_index,
						extension_type: instance.source.extensions[extension_index].extension_type.clone(),
					}),
					ExtensionMatch::NoneCompatible => issues.push(
						scope,
						&object.name,
						IssueKind::NoCompatibleExtension,
						format!(
							"No compatible extension available for governance '{}' (requires {}) on {label}",
							def.name, def.extension_type
						),
					),
					ExtensionMatch::Ambiguous(positions) => issues.push(
						scope,
						&object.name,
						IssueKind::AmbiguousExtension,
						format!(
							"Governance '{}' (requires {}) matches extensions {positions:?} of {label}",
							def.name, def.extension_type
						),
					),
				}
			}
			instance.governance = bindings;
		}
	}
}
