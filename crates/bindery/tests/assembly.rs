#![allow(unused_crate_dependencies)]

#[path = "assembly/common/mod.rs"]
mod common;

#[path = "assembly/ordering.rs"]
mod ordering;

#[path = "assembly/scopes.rs"]
mod scopes;

#[path = "assembly/extensions.rs"]
mod extensions;

#[path = "assembly/properties.rs"]
mod properties;
