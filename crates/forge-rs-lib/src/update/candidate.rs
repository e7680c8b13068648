//! Selecting the best available upgrade for an installed version.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::catalog::*;
use crate::catalog::iterator::*;

/// Picks the preferred upgrade for `current` on the target SPT release.
///
/// Candidates are visible versions of the same package declaring
/// compatibility with `target`; a stable install is never offered a
/// prerelease. `None` when nothing newer qualifies.
pub(crate) fn find_update_candidate<C: Catalog>(
	catalog: &C,
	now: DateTime<Utc>,
	current: &PackageVersion,
	target: &SptVersion,
) -> crate::Result<Option<PackageVersion>> {
	let versions = catalog.versions_of_package(current.package_id)?;
	let mut candidates: Vec<&PackageVersion> = versions.iter()
		.visible_at(now)
		.spt_matches(target.id)
		.filter(|candidate| current.is_prerelease() || !candidate.is_prerelease())
		.filter(|candidate| is_newer(&current.version, &candidate.version))
		.collect();

	candidates.sort_by(|a, b| preference(&a.version, &b.version));
	Ok(candidates.first().map(|candidate| (*candidate).clone()))
}

/// Whether `candidate` counts as an upgrade over `current`.
///
/// Triple-wise greater always does. At an identical triple only a prerelease
/// install can move: to the stable build or to a lexicographically later
/// label.
fn is_newer(current: &Version, candidate: &Version) -> bool {
	match candidate.cmp_triple(current) {
		Ordering::Greater => true,
		Ordering::Less => false,
		Ordering::Equal => {
			if !current.is_prerelease() {
				return false;
			}
			!candidate.is_prerelease() || candidate.labels() > current.labels()
		},
	}
}

/* Highest release triple first, the stable build before any prerelease of
the same triple, then the earliest acceptable label. Everything reaching this
sort is already newer than the install, so the earliest label is the least
bump. */
fn preference(a: &Version, b: &Version) -> Ordering {
	b.cmp_triple(a)
		.then_with(|| a.is_prerelease().cmp(&b.is_prerelease()))
		.then_with(|| a.labels().cmp(b.labels()))
}

#[cfg(test)]
mod test {
	use super::*;

	fn v(s: &str) -> Version { Version::new(s).unwrap() }

	#[test] fn patch_bump_is_newer() { assert!(is_newer(&v("1.0.0"), &v("1.0.1"))) }
	#[test] fn same_version_is_not_newer() { assert!(!is_newer(&v("1.0.0"), &v("1.0.0"))) }
	#[test] fn lower_triple_is_not_newer() { assert!(!is_newer(&v("1.2.0"), &v("1.1.9"))) }
	#[test] fn stable_never_moves_within_its_triple() { assert!(!is_newer(&v("1.0.0"), &v("1.0.0-rc.1"))) }
	#[test] fn prerelease_moves_to_stable_of_its_triple() { assert!(is_newer(&v("1.0.0-beta.1"), &v("1.0.0"))) }
	#[test] fn prerelease_moves_to_later_label() { assert!(is_newer(&v("1.0.0-beta.1"), &v("1.0.0-beta.2"))) }
	#[test] fn prerelease_does_not_move_to_earlier_label() { assert!(!is_newer(&v("1.0.0-beta.2"), &v("1.0.0-beta.1"))) }

	#[test]
	fn preference_ranks_stable_above_prerelease_at_equal_triple() {
		let mut versions = [v("1.0.0-beta.2"), v("1.0.0")];
		versions.sort_by(preference);
		assert_eq!(versions[0], v("1.0.0"));
	}

	#[test]
	fn preference_ranks_higher_triple_first() {
		let mut versions = [v("1.1.0"), v("2.0.0")];
		versions.sort_by(preference);
		assert_eq!(versions[0], v("2.0.0"));
	}

	#[test]
	fn preference_takes_the_earliest_label_within_a_triple() {
		let mut versions = [v("1.1.0-beta.3"), v("1.1.0-beta.2")];
		versions.sort_by(preference);
		assert_eq!(versions[0], v("1.1.0-beta.2"));
	}
}
