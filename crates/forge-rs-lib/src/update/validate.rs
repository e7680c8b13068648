//! The gates a candidate upgrade must pass before being offered.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::*;
use crate::catalog::iterator::*;
use crate::resolver::TreeResolver;

/// Why a candidate upgrade cannot be adopted. Serialized as `reason` plus a
/// `detail` object on blocked update records.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum BlockReason {
	/// Another installed package pins this one with a range the candidate
	/// falls outside of.
	DependencyConstraintViolation {
		package_id: PackageId,
		guid: String,
		name: String,
		version: Version,
		constraint: String,
		candidate_version: Version,
	},
	/// A direct requirement of the candidate has no visible satisfying
	/// version on the target SPT release.
	MissingDependency {
		package_id: PackageId,
		constraint: String,
	},
	/// Something in the candidate's dependency closure rejects an installed
	/// version.
	ChainDependencyConflict {
		package_id: PackageId,
		guid: String,
		name: String,
		version: Version,
		constraint: String,
	},
}

/// Runs the three checks in order, stopping at the first failure.
///
/// 1. Every requirement other installed packages place on this package must
///    accept the candidate's version.
/// 2. Every direct requirement of the candidate must be fulfillable by some
///    visible version compatible with the target SPT release.
/// 3. Nothing in the candidate's transitive closure may reject a currently
///    installed version.
///
/// `None` means the upgrade is safe to offer.
pub(crate) fn validate_candidate<C: Catalog>(
	catalog: &C,
	now: DateTime<Utc>,
	current: &PackageVersion,
	candidate: &PackageVersion,
	target: &SptVersion,
	installed: &[(Package, PackageVersion)],
) -> crate::Result<Option<BlockReason>> {
	for (other_package, other) in installed {
		if other.id == current.id {
			continue;
		}
		for declaration in &other.dependencies {
			if declaration.target_package_id != current.package_id {
				continue;
			}
			if !satisfies(&candidate.version, &declaration.constraint) {
				return Ok(Some(BlockReason::DependencyConstraintViolation {
					package_id: other_package.id,
					guid: other_package.guid.clone(),
					name: other_package.name.clone(),
					version: other.version.clone(),
					constraint: declaration.constraint.clone(),
					candidate_version: candidate.version.clone(),
				}));
			}
		}
	}

	for declaration in &candidate.dependencies {
		let target_visible = match catalog.package_by_id(declaration.target_package_id)? {
			Some(package) => package.is_visible_at(now),
			None => false,
		};
		let fulfillable = target_visible && catalog.versions_of_package(declaration.target_package_id)?
			.iter()
			.visible_at(now)
			.spt_matches(target.id)
			.any(|version| satisfies(&version.version, &declaration.constraint));
		if !fulfillable {
			return Ok(Some(BlockReason::MissingDependency {
				package_id: declaration.target_package_id,
				constraint: declaration.constraint.clone(),
			}));
		}
	}

	/* Build the candidate's full tree purely for its requirement
	accumulator; the nodes themselves are not reported here. */
	let mut resolver = TreeResolver::new(catalog, now);
	resolver.resolve([candidate])?;
	let accumulated = resolver.constraints();
	for (package, version) in installed {
		for expr in accumulated.constraints_for(version.package_id) {
			if !satisfies(&version.version, expr) {
				return Ok(Some(BlockReason::ChainDependencyConflict {
					package_id: package.id,
					guid: package.guid.clone(),
					name: package.name.clone(),
					version: version.version.clone(),
					constraint: expr.clone(),
				}));
			}
		}
	}

	Ok(None)
}
