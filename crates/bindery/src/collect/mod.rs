//! Declaration collection and instance selection.
//!
//! # Mental Model
//!
//! 1. **Ordinary declarations** are registered by bound name in declaration
//!    order. Blank and duplicate names are reported; the first declaration of a
//!    name is kept.
//! 2. **Input declarations** either join an existing input object as another
//!    candidate instance, collapse into an existing instance with the same
//!    source, or clash with an ordinary object of the same name (unless both
//!    use the same source, in which case they are the same object).
//! 3. **Instance selection** picks the default candidate for every object; an
//!    input object with several producers and no usable default source is
//!    removed from the registry.
//!
//! # Invariants
//!
//! - Registry iteration order equals first-declaration order.
//!   - Enforced in: [`collect`] (insertion into an [`IndexMap`]; removals keep relative order).
//!   - Tested by: `collect::tests::registry_preserves_declaration_order`
//! - Every registered object has a valid `default_instance`.
//!   - Enforced in: [`select::select_instances`].
//!   - Tested by: `collect::tests::multiple_sources_without_default_are_removed`

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::admin::AdministrationBinding;
use crate::bind::ObjectRef;
use crate::decl::{AdministrationSpec, BoundObjectDecl, DependencyMapping, InputObjectDecl};
use crate::governance::GovernanceBinding;
use crate::issues::{IssueKind, Issues};
use crate::scope::Scope;
use crate::source::ManagedObjectSource;
use crate::types::TypeName;

mod select;


/// Name-keyed registry of bound objects in first-declaration order.
///
/// The position of an object in the registry is its local handle.
pub type BoundRegistry = IndexMap<Arc<str>, BoundObject, FxBuildHasher>;

/// A named, scope-resident resource slot.
#[derive(Debug, Clone)]
pub struct BoundObject {
	pub(crate) name: Arc<str>,
	pub(crate) scope: Scope,
	pub(crate) is_input: bool,
	pub(crate) instances: Vec<CandidateInstance>,
	pub(crate) default_instance: usize,
	pub(crate) assigned_index: Option<u32>,
	pub(crate) thread_local: Option<Arc<str>>,
}

impl BoundObject {
	fn new(name: Arc<str>, scope: Scope, is_input: bool) -> Self {
		Self {
			name,
			scope,
			is_input,
			instances: Vec::new(),
			default_instance: 0,
			assigned_index: None,
			thread_local: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn scope(&self) -> Scope {
		self.scope
	}

	pub fn is_input(&self) -> bool {
		self.is_input
	}

	pub fn instances(&self) -> &[CandidateInstance] {
		&self.instances
	}

	pub fn default_instance_index(&self) -> usize {
		self.default_instance
	}

	/// The instance external consumers see when they refer to this object by name.
	pub fn default_instance(&self) -> Option<&CandidateInstance> {
		self.instances.get(self.default_instance)
	}

	/// Index assigned by the whole-scope order, if that pass succeeded.
	pub fn assigned_index(&self) -> Option<u32> {
		self.assigned_index
	}

	pub fn thread_local(&self) -> Option<&str> {
		self.thread_local.as_deref()
	}

	/// Types produced by every candidate instance.
	pub(crate) fn candidate_types(&self) -> impl Iterator<Item = (&str, &TypeName)> {
		self.instances.iter().map(|instance| (&*instance.source.name, &instance.source.object_type))
	}

	pub(crate) fn label(&self, instance: &CandidateInstance) -> String {
		if self.instances.len() > 1 {
			format!("{} (source '{}')", self.name, instance.source.name)
		} else {
			self.name.to_string()
		}
	}
}

/// One concrete producer configuration able to supply a bound object.
#[derive(Debug, Clone)]
pub struct CandidateInstance {
	pub(crate) owner: Arc<str>,
	pub(crate) instance_index: usize,
	pub(crate) source: Arc<ManagedObjectSource>,
	pub(crate) mappings: Vec<DependencyMapping>,
	pub(crate) governance_names: Vec<String>,
	pub(crate) administration_specs: Vec<AdministrationSpec>,
	pub(crate) slots: Vec<DependencySlot>,
	pub(crate) governance: Vec<GovernanceBinding>,
	pub(crate) administration: Vec<AdministrationBinding>,
	pub(crate) coordination: Option<Vec<ObjectRef>>,
}

impl CandidateInstance {
	fn from_decl(owner: Arc<str>, instance_index: usize, decl: &BoundObjectDecl) -> Self {
		Self {
			owner,
			instance_index,
			source: Arc::clone(&decl.source),
			mappings: decl.dependencies.clone(),
			governance_names: decl.governances.clone(),
			administration_specs: decl.administration.clone(),
			slots: Vec::new(),
			governance: Vec::new(),
			administration: Vec::new(),
			coordination: None,
		}
	}

	pub fn owner(&self) -> &str {
		&self.owner
	}

	pub fn instance_index(&self) -> usize {
		self.instance_index
	}

	pub fn source(&self) -> &Arc<ManagedObjectSource> {
		&self.source
	}

	pub fn slots(&self) -> &[DependencySlot] {
		&self.slots
	}

	/// Usable resolved dependencies, in slot order.
	pub fn resolved_dependencies(&self) -> impl Iterator<Item = ObjectRef> + '_ {
		self.slots.iter().filter_map(|slot| slot.resolved)
	}

	/// Returns true if every declared slot resolved to a usable target.
	pub fn is_fully_resolved(&self) -> bool {
		self.slots.len() == self.source.dependencies.len() && self.slots.iter().all(|slot| slot.resolved.is_some())
	}

	pub fn governance(&self) -> &[GovernanceBinding] {
		&self.governance
	}

	pub fn administration(&self) -> &[AdministrationBinding] {
		&self.administration
	}

	/// Dependency-first order of this instance's dependency closure, if it was computed.
	pub fn coordination(&self) -> Option<&[ObjectRef]> {
		self.coordination.as_deref()
	}
}

/// A declared, typed reference from one resource to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySlot {
	pub index: usize,
	pub key: Option<Arc<str>>,
	pub required_type: TypeName,
	/// Configured target name, if a mapping was found.
	pub target: Option<Arc<str>>,
	/// Resolved target, if the name resolved and every candidate type is assignable.
	pub resolved: Option<ObjectRef>,
}

/// Builds the name-keyed registry from ordinary and input declarations.
pub fn collect(scope: Scope, objects: &[BoundObjectDecl], inputs: &[InputObjectDecl], issues: &mut Issues) -> BoundRegistry {
	let mut registry = BoundRegistry::default();

	for decl in objects {
		let Some(name) = checked_name(scope, &decl.bound_name, issues) else {
			continue;
		};
		if registry.contains_key(&*name) {
			issues.push(
				scope,
				&name,
				IssueKind::DuplicateName,
				format!("Duplicate bound object name '{name}' (source '{}')", decl.source.name),
			);
			continue;
		}

		let mut object = BoundObject::new(Arc::clone(&name), scope, false);
		object.instances.push(CandidateInstance::from_decl(Arc::clone(&name), 0, decl));
		object.thread_local = decl.thread_local.as_deref().map(Arc::from);
		registry.insert(name, object);
	}

	let mut default_sources: FxHashMap<Arc<str>, Arc<str>> = FxHashMap::default();
	for input in inputs {
		let decl = &input.object;
		let Some(name) = checked_name(scope, &decl.bound_name, issues) else {
			continue;
		};

		match registry.get_mut(&*name) {
			Some(existing) if !existing.is_input => {
				let same_source = existing.instances.iter().any(|instance| instance.source.is_same_source(&decl.source));
				if !same_source {
					issues.push(
						scope,
						&name,
						IssueKind::InputNameClash,
						format!(
							"Input object '{name}' (source '{}') clashes with bound object of the same name (source '{}')",
							decl.source.name,
							existing.instances.first().map(|instance| &*instance.source.name).unwrap_or_default()
						),
					);
				}
				continue;
			}
			Some(existing) => {
				if !existing.instances.iter().any(|instance| instance.source.is_same_source(&decl.source)) {
					let instance_index = existing.instances.len();
					existing.instances.push(CandidateInstance::from_decl(Arc::clone(&name), instance_index, decl));
				}
				if existing.thread_local.is_none() {
					existing.thread_local = decl.thread_local.as_deref().map(Arc::from);
				}
			}
			None => {
				let mut object = BoundObject::new(Arc::clone(&name), scope, true);
				object.instances.push(CandidateInstance::from_decl(Arc::clone(&name), 0, decl));
				object.thread_local = decl.thread_local.as_deref().map(Arc::from);
				registry.insert(Arc::clone(&name), object);
			}
		}

		if let Some(default) = input.default_source.as_deref().map(str::trim) {
			match default_sources.get(&*name) {
				Some(existing) if **existing != *default => issues.push(
					scope,
					&name,
					IssueKind::UnknownDefaultSource,
					format!("Conflicting default sources '{existing}' and '{default}' for input object '{name}'"),
				),
				Some(_) => {}
				None => {
					default_sources.insert(name, Arc::from(default));
				}
			}
		}
	}

	select::select_instances(scope, &mut registry, &default_sources, issues);
	validate_thread_locals(scope, &mut registry, issues);
	registry
}

fn checked_name(scope: Scope, bound_name: &str, issues: &mut Issues) -> Option<Arc<str>> {
	let trimmed = bound_name.trim();
	if trimmed.is_empty() {
		issues.push(scope, "<unnamed>", IssueKind::BlankName, "Bound object declared without a name");
		return None;
	}
	Some(Arc::from(trimmed))
}

/// Drops blank or clashing thread-local exports, reporting each.
fn validate_thread_locals(scope: Scope, registry: &mut BoundRegistry, issues: &mut Issues) {
	let mut exported: FxHashMap<Arc<str>, Arc<str>> = FxHashMap::default();
	for object in registry.values_mut() {
		let Some(export) = object.thread_local.take() else {
			continue;
		};
		let trimmed = export.trim();
		if trimmed.is_empty() {
			issues.push(scope, &object.name, IssueKind::InvalidThreadLocal, "Thread-local export declared without a name");
			continue;
		}
		if let Some(owner) = exported.get(trimmed) {
			issues.push(
				scope,
				&object.name,
				IssueKind::InvalidThreadLocal,
				format!("Thread-local export '{trimmed}' is already used by '{owner}'"),
			);
			continue;
		}
		let export: Arc<str> = Arc::from(trimmed);
		exported.insert(Arc::clone(&export), Arc::clone(&object.name));
		object.thread_local = Some(export);
	}
}
