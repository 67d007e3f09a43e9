//! Diagnostics sink.
//!
//! Every check reports here instead of failing: an entry that cannot continue
//! is marked invalid on its own, and the rest of the run proceeds so a single
//! assembly attempt surfaces as many problems as possible. A host must refuse
//! to start on a non-empty sink.

use std::sync::Arc;

use crate::scope::Scope;

/// Taxonomy bucket of an [`IssueKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCategory {
	/// Names and instance selection.
	Structural,
	/// Dependency slot mapping and type checks.
	Wiring,
	/// Governance and administration extension matching.
	CrossCutting,
	/// Ordering passes.
	Graph,
}

/// Which ordering pass detected a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderPass {
	/// Dependency-first order of one consumer's closure.
	Coordination,
	/// Dependent-first order over the whole scope.
	WholeScope,
}

/// Classification of an assembly issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
	BlankName,
	DuplicateName,
	InputNameClash,
	MissingDefaultSource,
	UnknownDefaultSource,
	InvalidThreadLocal,
	MissingDependencyMapping,
	ExtraDependencyMapping,
	UnresolvedDependency,
	IncompatibleDependency,
	UnknownGovernance,
	NoCompatibleExtension,
	AmbiguousExtension,
	UnknownAdministeredObject,
	CyclicDependency(OrderPass),
}

impl IssueKind {
	pub const fn category(self) -> IssueCategory {
		match self {
			Self::BlankName
			| Self::DuplicateName
			| Self::InputNameClash
			| Self::MissingDefaultSource
			| Self::UnknownDefaultSource
			| Self::InvalidThreadLocal => IssueCategory::Structural,
			Self::MissingDependencyMapping | Self::ExtraDependencyMapping | Self::UnresolvedDependency | Self::IncompatibleDependency => {
				IssueCategory::Wiring
			}
			Self::UnknownGovernance | Self::NoCompatibleExtension | Self::AmbiguousExtension | Self::UnknownAdministeredObject => {
				IssueCategory::CrossCutting
			}
			Self::CyclicDependency(_) => IssueCategory::Graph,
		}
	}
}

/// A problem encountered during assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
	pub kind: IssueKind,
	pub scope: Scope,
	/// Bound name (or declaration label) the issue is attached to.
	pub subject: Arc<str>,
	pub message: String,
}

impl std::fmt::Display for Issue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{} {}] {}", self.scope, self.subject, self.message)
	}
}

/// Accumulating, non-throwing issue sink.
#[derive(Debug, Clone, Default)]
pub struct Issues {
	items: Vec<Issue>,
	limit: Option<usize>,
	suppressed: usize,
}

impl Issues {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a sink that stores at most `limit` issues.
	pub fn with_limit(limit: Option<usize>) -> Self {
		Self {
			limit,
			..Self::default()
		}
	}

	pub fn push(&mut self, scope: Scope, subject: &str, kind: IssueKind, message: impl Into<String>) {
		let message = message.into();
		tracing::debug!(%scope, subject, ?kind, %message, "assembly issue");
		if self.limit.is_some_and(|limit| self.items.len() >= limit) {
			self.suppressed += 1;
			return;
		}
		self.items.push(Issue {
			kind,
			scope,
			subject: Arc::from(subject),
			message,
		});
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty() && self.suppressed == 0
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Issues dropped because the configured limit was reached.
	pub fn suppressed(&self) -> usize {
		self.suppressed
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
		self.items.iter()
	}

	pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
		self.items.iter().filter(move |issue| issue.kind == kind)
	}

	pub fn count(&self, kind: IssueKind) -> usize {
		self.of_kind(kind).count()
	}

	pub fn has_category(&self, category: IssueCategory) -> bool {
		self.items.iter().any(|issue| issue.kind.category() == category)
	}

	pub fn into_vec(self) -> Vec<Issue> {
		self.items
	}

	pub(crate) fn report(&self, scope: Scope) {
		if self.is_empty() {
			return;
		}
		let samples: Vec<_> = self.items.iter().take(5).map(ToString::to_string).collect();
		tracing::warn!(%scope, count = self.items.len(), suppressed = self.suppressed, ?samples, "assembly issues");
	}
}

impl<'a> IntoIterator for &'a Issues {
	type Item = &'a Issue;
	type IntoIter = std::slice::Iter<'a, Issue>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}
