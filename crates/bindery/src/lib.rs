#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Managed-object dependency resolution and binding.
//!
//! Turns declarative, scoped managed-object declarations into a validated,
//! indexed snapshot an execution engine can run against.
//!
//! # Main Types
//!
//! - [`ScopeAssembler`] - builder running one assembly call over a scope
//! - [`ScopeBinding`] - inspectable outcome: bound objects, orders and [`Issues`]
//! - [`AssembledScope`] - immutable, index-addressed snapshot for the engine
//!
//! # Pipeline
//!
//! ```text
//! declarations ─► collect ─► bind dependencies ─► bind governance/administration
//!                                                        │
//!              AssembledScope ◄─ coordination order ◄─ whole-scope order (indices)
//! ```
//!
//! Every stage reports to a shared [`Issues`] sink instead of failing. A host
//! must not start on a non-empty sink; [`ScopeBinding::into_assembled`]
//! enforces this.

pub mod admin;
pub mod assembled;
pub mod assembler;
pub mod bind;
pub mod collect;
pub mod config;
pub mod decl;
pub mod governance;
pub mod graph;
pub mod issues;
pub mod scope;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use assembled::{AssembledScope, InstanceMetaData, ManagedObjectMetaData};
pub use assembler::{AssemblyError, ScopeAssembler, ScopeBinding};
pub use config::{BinderConfig, ConfigError, ExtensionSelection};
pub use decl::{AdministrationSpec, BoundObjectDecl, DependencyMapping, InputObjectDecl};
pub use governance::GovernanceRegistry;
pub use graph::{Cycle, OrderError, order_required};
pub use issues::{Issue, IssueCategory, IssueKind, Issues, OrderPass};
pub use scope::{ObjectIndex, Scope};
pub use source::{DependencyType, FactoryError, ManagedObjectFactory, ManagedObjectSource};
pub use types::{TypeCatalog, TypeName};
