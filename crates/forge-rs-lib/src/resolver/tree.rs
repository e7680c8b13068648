//! Recursive expansion of package versions into resolved dependency trees.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::*;

use super::dedup;
use super::dedup::ConstraintAccumulator;

/// One resolved dependency in a response tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
	pub id: PackageId,
	pub guid: String,
	pub name: String,
	pub slug: String,
	pub latest_compatible_version: VersionSummary,
	/// Set when the requirements collected for this package are mutually
	/// unsatisfiable; every variant is kept in that case.
	pub conflict: bool,
	pub dependencies: Vec<TreeNode>,
}

/// The release record echoed inside a [`TreeNode`].
#[derive(Debug, Clone, Serialize)]
pub struct VersionSummary {
	pub id: VersionId,
	pub version: Version,
	pub link: String,
	pub download_size: u64,
	pub latest_spt_compatible: bool,
}

impl From<&PackageVersion> for VersionSummary {
	fn from(version: &PackageVersion) -> Self {
		VersionSummary {
			id: version.id,
			version: version.version.clone(),
			link: version.download_link.clone(),
			download_size: version.download_size,
			latest_spt_compatible: version.latest_spt_compatible,
		}
	}
}

/// Walks declared dependencies depth first, collecting requirements as it
/// goes and collapsing duplicates at every level.
pub struct TreeResolver<'db, C: Catalog> {
	catalog: &'db C,
	now: DateTime<Utc>,
	constraints: ConstraintAccumulator,
}

impl<'db, C: Catalog> TreeResolver<'db, C> {
	pub fn new(catalog: &'db C, now: DateTime<Utc>) -> Self {
		TreeResolver {
			catalog,
			now,
			constraints: Default::default(),
		}
	}

	/// Expands every root in order and collapses duplicates across the
	/// combined result.
	///
	/// Requirements recorded under one root take part in duplicate collapse
	/// under every other; the response lists the dependencies of the roots,
	/// not the roots themselves.
	pub fn resolve<'a>(&mut self, roots: impl IntoIterator<Item = &'a PackageVersion>) -> crate::Result<Vec<TreeNode>> {
		let mut nodes = Vec::<TreeNode>::new();
		for root in roots {
			nodes.extend(self.expand(root.id, &HashSet::new())?);
		}
		Ok(dedup::deduplicate(nodes, &self.constraints))
	}

	/// Everything recorded against each package over the whole traversal.
	pub fn constraints(&self) -> &ConstraintAccumulator {
		&self.constraints
	}

	/// Expands one version's declarations into child nodes.
	///
	/// `visited` is scoped to the path from the root to this call so a
	/// diamond-shaped dependency still expands on every path; only a true
	/// cycle back to an ancestor is truncated.
	fn expand(&mut self, root: VersionId, visited: &HashSet<VersionId>) -> crate::Result<Vec<TreeNode>> {
		if visited.contains(&root) {
			log::trace!("dependency cycle at version {}, truncating", root);
			return Ok(Vec::new());
		}
		let mut visited = visited.clone();
		visited.insert(root);

		let Some(owner) = self.catalog.version_by_id(root)? else {
			return Ok(Vec::new());
		};

		/* Per target package, the representative candidate is the most
		recently resolved (highest id) visible version across every
		declaration naming that package. Requirements are recorded for every
		declaration, candidates or not. */
		let mut order = Vec::<PackageId>::new();
		let mut representatives = HashMap::<PackageId, PackageVersion>::new();
		for declaration in &owner.dependencies {
			self.constraints.record(declaration.target_package_id, &declaration.constraint);
			if !order.contains(&declaration.target_package_id) {
				order.push(declaration.target_package_id);
			}
			for candidate in self.catalog.candidates_for_declaration(declaration.id)? {
				let Some(version) = self.catalog.version_by_id(candidate.version_id)? else {
					continue;
				};
				if version.package_id != declaration.target_package_id {
					/* Stale precomputation pointing at the wrong package */
					continue;
				}
				if !version.is_visible_at(self.now) {
					continue;
				}
				match representatives.get(&declaration.target_package_id) {
					Some(existing) if existing.id >= version.id => {},
					_ => { representatives.insert(declaration.target_package_id, version); },
				}
			}
		}

		let mut nodes = Vec::<TreeNode>::new();
		for target in order {
			let Some(version) = representatives.remove(&target) else { continue };
			let Some(package) = self.catalog.package_by_id(target)? else { continue };
			if !package.is_visible_at(self.now) {
				continue;
			}
			let dependencies = self.expand(version.id, &visited)?;
			nodes.push(TreeNode {
				id: package.id,
				guid: package.guid,
				name: package.name,
				slug: package.slug,
				latest_compatible_version: VersionSummary::from(&version),
				conflict: false,
				dependencies,
			});
		}

		Ok(dedup::deduplicate(nodes, &self.constraints))
	}
}
