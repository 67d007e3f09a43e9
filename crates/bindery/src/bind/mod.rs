//! Dependency binding.
//!
//! For every candidate instance, each slot declared by the instance's own
//! source is matched to a configured mapping (by key, else by ordinal),
//! resolved through the two-tier [`lookup`], and type-checked against every
//! candidate instance of the target. Failures are reported per slot: a failed
//! slot stays unresolved while the rest of the instance, and its siblings,
//! continue. Mappings that match no declared slot are reported afterwards.

mod dependencies;
mod lookup;


pub(crate) use dependencies::bind_dependencies;
pub(crate) use lookup::ScopeLookup;
pub use lookup::{EnclosingScopes, ObjectRef};
