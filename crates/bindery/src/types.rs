//! Type tags and the assignability predicate.
//!
//! Object types, dependency requirements and extension descriptors are all
//! described by [`TypeName`] tags. Compatibility is an explicit relation held in
//! a [`TypeCatalog`] snapshot: a type is assignable to itself and to every
//! supertype reachable through declared edges.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;


/// Interned type tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct TypeName(Arc<str>);

impl TypeName {
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for TypeName {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl std::fmt::Display for TypeName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// Immutable snapshot of declared subtype edges.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
	supertypes: FxHashMap<TypeName, Vec<TypeName>>,
}

impl TypeCatalog {
	/// Creates a catalog with no declared edges (only identity assignability).
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares that `ty` is assignable to each of `supertypes`.
	pub fn declare<I, T>(mut self, ty: impl Into<TypeName>, supertypes: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<TypeName>,
	{
		let entry = self.supertypes.entry(ty.into()).or_default();
		for sup in supertypes {
			let sup = sup.into();
			if !entry.contains(&sup) {
				entry.push(sup);
			}
		}
		self
	}

	/// Direct supertypes declared for `ty`.
	pub fn supertypes(&self, ty: &TypeName) -> &[TypeName] {
		self.supertypes.get(ty).map(Vec::as_slice).unwrap_or_default()
	}

	/// Returns true if a value of type `from` may be used where `to` is required.
	pub fn is_assignable(&self, from: &TypeName, to: &TypeName) -> bool {
		if from == to {
			return true;
		}

		let mut visited: FxHashSet<&TypeName> = FxHashSet::default();
		let mut worklist: Vec<&TypeName> = vec![from];
		while let Some(ty) = worklist.pop() {
			if !visited.insert(ty) {
				continue;
			}
			for sup in self.supertypes(ty) {
				if sup == to {
					return true;
				}
				worklist.push(sup);
			}
		}
		false
	}
}
