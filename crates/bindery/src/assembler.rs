//! Assembly pipeline driver.
//!
//! [`ScopeAssembler`] runs every stage over one scope's declarations, in order:
//!
//! 1. collect declarations and select default instances
//! 2. bind dependency slots through the two-tier lookup
//! 3. bind governances and administration duties
//! 4. assign indices with the whole-scope (dependents-first) order
//! 5. compute coordination orders (dependency-first) per instance and per duty
//!
//! Every stage reports to one [`Issues`] sink and keeps going. The resulting
//! [`ScopeBinding`] is always inspectable; only a binding with an empty sink
//! converts into an [`AssembledScope`].

use std::sync::Arc;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::admin::{AdministeredObject, AdministrationBinding, AdministrationMetaData, bind_administration};
use crate::assembled::{AssembledScope, InstanceMetaData, ManagedObjectMetaData};
use crate::bind::{EnclosingScopes, ObjectRef, bind_dependencies};
use crate::collect::{BoundObject, BoundRegistry, collect};
use crate::config::BinderConfig;
use crate::decl::{BoundObjectDecl, InputObjectDecl};
use crate::governance::{GovernanceRegistry, bind_governance};
use crate::graph::{Cycle, DependencyGraph, NodeId, OrderError, dependency_first, dependents_first};
use crate::issues::{IssueKind, Issues, OrderPass};
use crate::scope::{ObjectIndex, Scope};
use crate::types::TypeCatalog;

/// Error returned when a binding cannot become an [`AssembledScope`].
#[derive(Debug, Error)]
pub enum AssemblyError {
	#[error("{scope} scope has {} assembly issue(s); refusing to start", .issues.len() + .issues.suppressed())]
	Rejected { scope: Scope, issues: Issues },
	#[error("{scope} object '{name}' has no assigned index")]
	Unindexed { scope: Scope, name: Arc<str> },
}

/// Builder for one assembly call.
pub struct ScopeAssembler<'a> {
	scope: Scope,
	types: &'a TypeCatalog,
	objects: Vec<BoundObjectDecl>,
	inputs: Vec<InputObjectDecl>,
	enclosing: EnclosingScopes<'a>,
	governances: Option<&'a GovernanceRegistry>,
	config: BinderConfig,
}

impl<'a> ScopeAssembler<'a> {
	pub fn new(scope: Scope, types: &'a TypeCatalog) -> Self {
		Self {
			scope,
			types,
			objects: Vec::new(),
			inputs: Vec::new(),
			enclosing: EnclosingScopes::new(),
			governances: None,
			config: BinderConfig::default(),
		}
	}

	pub fn with_objects(mut self, objects: impl IntoIterator<Item = BoundObjectDecl>) -> Self {
		self.objects.extend(objects);
		self
	}

	pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = InputObjectDecl>) -> Self {
		self.inputs.extend(inputs);
		self
	}

	/// Adds an enclosing scope. Call innermost first.
	pub fn with_enclosing(mut self, enclosing: &'a AssembledScope) -> Self {
		self.enclosing.push(enclosing);
		self
	}

	pub fn with_governances(mut self, governances: &'a GovernanceRegistry) -> Self {
		self.governances = Some(governances);
		self
	}

	pub fn with_config(mut self, config: BinderConfig) -> Self {
		self.config = config;
		self
	}

	pub fn assemble(self) -> ScopeBinding {
		let Self {
			scope,
			types,
			objects,
			inputs,
			mut enclosing,
			governances,
			config,
		} = self;
		tracing::debug!(%scope, objects = objects.len(), inputs = inputs.len(), "assembling scope");

		let mut issues = Issues::with_limit(config.issue_limit);
		let mut registry = collect(scope, &objects, &inputs, &mut issues);
		enclosing.retain_reachable(scope);

		let empty = GovernanceRegistry::new();
		let governances = governances.unwrap_or(&empty);
		bind_dependencies(scope, &mut registry, &enclosing, types, &mut issues);
		bind_governance(scope, &mut registry, governances, types, config.extension_selection, &mut issues);
		bind_administration(scope, &mut registry, &enclosing, types, config.extension_selection, &mut issues);

		let mut graph = DependencyGraph::build(scope, &registry, &enclosing);
		let whole_scope = assign_indices(scope, &mut registry, &mut graph, &mut issues);
		coordinate(scope, &mut registry, &graph, &mut issues);

		issues.report(scope);
		ScopeBinding {
			scope,
			registry,
			graph,
			whole_scope,
			issues,
		}
	}
}

/// Runs the whole-scope pass and records each object's index on success.
fn assign_indices(scope: Scope, registry: &mut BoundRegistry, graph: &mut DependencyGraph, issues: &mut Issues) -> Option<Vec<usize>> {
	let order = match dependents_first(graph, &graph.local_nodes()) {
		Ok(order) => order,
		Err(cycle) => {
			report_cycle(scope, &cycle, OrderPass::WholeScope, issues);
			return None;
		}
	};

	let mut positions = Vec::with_capacity(order.len());
	for (index, id) in order.into_iter().enumerate() {
		let position = id as usize;
		if let Some((name, object)) = registry.get_index_mut(position) {
			object.assigned_index = Some(index as u32);
			tracing::debug!(%scope, object = %name, index, "assigned index");
		}
		graph.set_position(id, index as u32);
		positions.push(position);
	}
	Some(positions)
}

/// Computes the coordination order of every instance and administration duty.
///
/// Each distinct cycle is reported once for the whole pass.
fn coordinate(scope: Scope, registry: &mut BoundRegistry, graph: &DependencyGraph, issues: &mut Issues) {
	let mut reported: FxHashSet<Cycle> = FxHashSet::default();
	let mut order_roots = |roots: &[ObjectRef], issues: &mut Issues| -> Option<Vec<ObjectRef>> {
		let nodes: Vec<NodeId> = roots.iter().filter_map(|&root| graph.node_of(root)).collect();
		match dependency_first(graph, &nodes) {
			Ok(order) => Some(order.into_iter().map(|id| graph.node(id).object).collect()),
			Err(cycle) => {
				if reported.insert(cycle.clone()) {
					report_cycle(scope, &cycle, OrderPass::Coordination, issues);
				}
				None
			}
		}
	};

	for object in registry.values_mut() {
		for instance in &mut object.instances {
			let roots: Vec<ObjectRef> = instance.resolved_dependencies().collect();
			instance.coordination = order_roots(&roots, issues);
			for duty in &mut instance.administration {
				duty.required = order_roots(&duty.roots(), issues);
			}
		}
	}
}

fn report_cycle(scope: Scope, cycle: &Cycle, pass: OrderPass, issues: &mut Issues) {
	let subject = cycle.participants().first().map(|name| &**name).unwrap_or_default();
	let pass_name = match pass {
		OrderPass::Coordination => "coordination",
		OrderPass::WholeScope => "whole-scope",
	};
	issues.push(
		scope,
		subject,
		IssueKind::CyclicDependency(pass),
		format!("Cyclic dependency between {} ({pass_name} order)", cycle.describe()),
	);
}

/// Outcome of one assembly call.
#[derive(Debug, Clone)]
pub struct ScopeBinding {
	scope: Scope,
	registry: BoundRegistry,
	graph: DependencyGraph,
	whole_scope: Option<Vec<usize>>,
	issues: Issues,
}

impl ScopeBinding {
	pub fn scope(&self) -> Scope {
		self.scope
	}

	pub fn issues(&self) -> &Issues {
		&self.issues
	}

	pub fn objects(&self) -> &BoundRegistry {
		&self.registry
	}

	pub fn get(&self, name: &str) -> Option<&BoundObject> {
		self.registry.get(name)
	}

	/// Names in assigned-index order, if the whole-scope pass succeeded.
	pub fn whole_scope_order(&self) -> Option<Vec<&str>> {
		let positions = self.whole_scope.as_ref()?;
		Some(
			positions
				.iter()
				.filter_map(|&position| self.registry.get_index(position))
				.map(|(name, _)| &**name)
				.collect(),
		)
	}

	/// Dependency-first order of the named roots and their closure.
	///
	/// Names resolve locally first, then through the enclosing scopes.
	pub fn order_for(&self, roots: &[&str]) -> Result<Vec<Arc<str>>, OrderError> {
		let mut nodes = Vec::with_capacity(roots.len());
		for &root in roots {
			let id = self.graph.find(root.trim()).ok_or_else(|| OrderError::UnknownName(Arc::from(root)))?;
			nodes.push(id);
		}
		let order = dependency_first(&self.graph, &nodes).map_err(OrderError::Cycle)?;
		Ok(order.into_iter().map(|id| Arc::clone(&self.graph.node(id).name)).collect())
	}

	/// Converts into the engine-facing snapshot.
	///
	/// Fails if any issue was recorded: indices and closures derived from an
	/// invalid edge set are not guaranteed to be consistent.
	pub fn into_assembled(self) -> Result<AssembledScope, AssemblyError> {
		let Self { scope, registry, issues, .. } = self;
		if !issues.is_empty() {
			return Err(AssemblyError::Rejected { scope, issues });
		}

		let mut indices = Vec::with_capacity(registry.len());
		for object in registry.values() {
			let index = object.assigned_index.ok_or_else(|| AssemblyError::Unindexed {
				scope,
				name: Arc::clone(&object.name),
			})?;
			indices.push(index);
		}
		let resolve = |object: ObjectRef| match object {
			ObjectRef::Local(position) => indices.get(position).map(|&index| ObjectIndex::new(scope, index)),
			ObjectRef::Enclosing(index) => Some(index),
		};

		let mut objects: Vec<ManagedObjectMetaData> = registry
			.into_values()
			.zip(indices.iter().copied())
			.map(|(object, index)| ManagedObjectMetaData {
				index: ObjectIndex::new(scope, index),
				is_input: object.is_input,
				default_instance: object.default_instance,
				thread_local: object.thread_local,
				instances: object
					.instances
					.into_iter()
					.map(|instance| InstanceMetaData {
						dependencies: instance.slots.iter().filter_map(|slot| slot.resolved).filter_map(resolve).collect(),
						coordination: instance.coordination.unwrap_or_default().into_iter().filter_map(resolve).collect(),
						administration: instance
							.administration
							.into_iter()
							.map(|duty| administration_metadata(duty, resolve))
							.collect(),
						governance: instance.governance,
						source: instance.source,
					})
					.collect(),
				name: object.name,
			})
			.collect();
		objects.sort_by_key(|object| object.index.index);

		tracing::debug!(%scope, objects = objects.len(), "scope assembled");
		Ok(AssembledScope::new(scope, objects))
	}
}

fn administration_metadata(duty: AdministrationBinding, resolve: impl Fn(ObjectRef) -> Option<ObjectIndex>) -> AdministrationMetaData {
	AdministrationMetaData {
		administered: duty
			.administered
			.iter()
			.filter_map(|administered| {
				resolve(administered.object).map(|object| AdministeredObject {
					object,
					extension_index: administered.extension_index,
				})
			})
			.collect(),
		required: duty.required.unwrap_or_default().into_iter().filter_map(&resolve).collect(),
		name: duty.name,
		extension_type: duty.extension_type,
	}
}
