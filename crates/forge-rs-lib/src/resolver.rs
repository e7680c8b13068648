//! Expanding requested packages into their full dependency tree.
//!
//! # Usage
//! 1. Collect the caller's `identifier:version` pairs into one
//!    comma-separated string.
//! 1. Call [`resolve_tree`] with a [`Catalog`](crate::catalog::Catalog)
//!    implementation.
//! 1. Walk the returned [`TreeNode`] list. Nodes with
//!    [`TreeNode::conflict`] set carry mutually incompatible requirements;
//!    every variant is kept so the caller can surface the situation.
//!
//! Pairs that are well formed but match nothing visible are dropped and the
//! remainder resolves normally; an empty or wholly malformed request is a
//! validation error.

use chrono::Utc;

use crate::catalog::Catalog;

pub(crate) mod targets;
pub use targets::InstallTarget;

mod tree;
pub use tree::TreeResolver;
pub use tree::TreeNode;
pub use tree::VersionSummary;

mod dedup;
pub use dedup::ConstraintAccumulator;

/// Resolves a raw pair list into the dependency trees of the requested
/// versions, deduplicated and conflict-annotated.
pub fn resolve_tree<C: Catalog>(catalog: &C, raw: &str) -> crate::Result<Vec<TreeNode>> {
	let now = Utc::now();
	let targets = targets::parse_targets(raw)?;
	let roots = targets::resolve_targets(catalog, now, &targets)?;
	let mut resolver = TreeResolver::new(catalog, now);
	resolver.resolve(roots.iter().map(|(_, version)| version))
}
