//! Lifetime tiers and stable object handles.

use serde::Deserialize;

#[cfg(test)]
mod tests;

/// Lifetime tier a managed object is bound to.
///
/// Ordering follows declaration order (`Function < Thread < Process`) and is
/// used as the first tie-break key when objects from different scopes are
/// ordered together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
	/// Bound for the duration of a single function invocation.
	Function,
	/// Bound for the duration of a thread of execution.
	Thread,
	/// Bound for the lifetime of the process.
	Process,
}

impl Scope {
	/// Returns true if objects of `self` may depend on objects bound in `outer`.
	///
	/// A scope may only reach scopes that live strictly longer than it does.
	pub const fn can_reach(self, outer: Scope) -> bool {
		(self as u8) < (outer as u8)
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Function => "function",
			Self::Thread => "thread",
			Self::Process => "process",
		}
	}
}

impl std::fmt::Display for Scope {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Stable handle of an assembled object: its scope plus the index assigned by
/// the whole-scope order.
///
/// The execution engine stores and retrieves live resources by this handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectIndex {
	pub scope: Scope,
	pub index: u32,
}

impl ObjectIndex {
	pub const fn new(scope: Scope, index: u32) -> Self {
		Self { scope, index }
	}
}

impl std::fmt::Display for ObjectIndex {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}#{}", self.scope, self.index)
	}
}
