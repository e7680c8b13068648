//! Checking installed packages for safe updates.
//!
//! # Usage
//! 1. Collect the caller's installed mod and server-mod lists as two
//!    comma-separated `identifier:version` strings (either may be empty,
//!    not both).
//! 1. Call [`check_updates`] with a [`Catalog`](crate::catalog::Catalog)
//!    implementation and the target SPT version.
//! 1. Read the four buckets of the returned [`UpdateReport`]; every resolved
//!    installed package lands in exactly one.
//!
//! A package with an upgrade candidate is validated against the rest of the
//! installed set before being offered; candidates that would break another
//! package, or whose own requirements cannot be met, land in
//! [`UpdateReport::blocked_updates`] with the first failed gate attached.

use chrono::Utc;
use serde::Serialize;

use crate::catalog::*;
use crate::resolver::targets;
use crate::resolver::VersionSummary;

mod candidate;
mod validate;
pub use validate::BlockReason;

/// The categorized outcome of one update check.
#[derive(Debug, Serialize)]
pub struct UpdateReport {
	pub target_platform_version: String,
	pub updates: Vec<AvailableUpdate>,
	pub blocked_updates: Vec<BlockedUpdate>,
	pub up_to_date: Vec<UpToDateEntry>,
	pub incompatible_with_platform: Vec<IncompatibleEntry>,
}

/// An upgrade that passed every gate.
#[derive(Debug, Serialize)]
pub struct AvailableUpdate {
	pub id: PackageId,
	pub guid: String,
	pub name: String,
	pub current_version: Version,
	pub update: VersionSummary,
}

/// An upgrade exists but adopting it would violate a requirement.
#[derive(Debug, Serialize)]
pub struct BlockedUpdate {
	pub id: PackageId,
	pub guid: String,
	pub name: String,
	pub current_version: Version,
	pub update: VersionSummary,
	#[serde(flatten)]
	pub block: BlockReason,
}

/// Nothing newer exists and the install runs on the target release.
#[derive(Debug, Serialize)]
pub struct UpToDateEntry {
	pub guid: String,
	pub version: Version,
}

/// Nothing newer exists and the install does not run on the target release.
#[derive(Debug, Serialize)]
pub struct IncompatibleEntry {
	pub guid: String,
	pub name: String,
	pub version: Version,
	pub reason: IncompatibleReason,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompatibleReason {
	NoVersionForSpt,
}

/// Checks every resolved installed package against the target SPT release.
///
/// `mods` and `server_mods` are parsed and resolved into one de-duplicated
/// installed set; requirements from either list constrain upgrades in both.
pub fn check_updates<C: Catalog>(
	catalog: &C,
	mods: &str,
	server_mods: &str,
	spt_version: &str,
) -> crate::Result<UpdateReport> {
	let now = Utc::now();

	let target = catalog.spt_version_by_name(spt_version)?
		.filter(|spt| spt.is_visible_at(now))
		.ok_or_else(|| crate::Error::Validation(format!("unknown SPT version `{}`", spt_version)))?;

	let targets = targets::parse_target_lists(&[mods, server_mods])?;
	let installed = targets::resolve_targets(catalog, now, &targets)?;

	let mut report = UpdateReport {
		target_platform_version: target.version.to_string(),
		updates: Vec::new(),
		blocked_updates: Vec::new(),
		up_to_date: Vec::new(),
		incompatible_with_platform: Vec::new(),
	};

	for (package, version) in &installed {
		match candidate::find_update_candidate(catalog, now, version, &target)? {
			None => {
				if version.supports_spt(target.id) {
					report.up_to_date.push(UpToDateEntry {
						guid: package.guid.clone(),
						version: version.version.clone(),
					});
				} else {
					report.incompatible_with_platform.push(IncompatibleEntry {
						guid: package.guid.clone(),
						name: package.name.clone(),
						version: version.version.clone(),
						reason: IncompatibleReason::NoVersionForSpt,
					});
				}
			},
			Some(update) => {
				let block = validate::validate_candidate(catalog, now, version, &update, &target, &installed)?;
				match block {
					None => report.updates.push(AvailableUpdate {
						id: package.id,
						guid: package.guid.clone(),
						name: package.name.clone(),
						current_version: version.version.clone(),
						update: VersionSummary::from(&update),
					}),
					Some(block) => report.blocked_updates.push(BlockedUpdate {
						id: package.id,
						guid: package.guid.clone(),
						name: package.name.clone(),
						current_version: version.version.clone(),
						update: VersionSummary::from(&update),
						block,
					}),
				}
			},
		}
	}

	Ok(report)
}
