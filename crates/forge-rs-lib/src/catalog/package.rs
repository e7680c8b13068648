//! Catalog records for packages and their released versions.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use super::version::Version;

pub type PackageId = i64;
pub type VersionId = i64;
pub type DeclarationId = i64;
pub type SptVersionId = i64;

/// Publication gate shared by every catalog record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
	pub published_at: Option<DateTime<Utc>>,
	pub disabled: bool,
}

impl Visibility {
	/// Published at some point in the past and not disabled.
	pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
		match self.published_at {
			Some(at) => at <= now && !self.disabled,
			None => false,
		}
	}
}

/// A distributable mod in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
	pub id: PackageId,
	pub guid: String,
	pub name: String,
	pub slug: String,
	pub visibility: Visibility,
}

impl Package {
	pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
		self.visibility.is_visible_at(now)
	}
}

/// One released version of a [`Package`].
///
/// Only visible on its own terms when the gate below holds; callers must also
/// check the owning package's gate before exposing the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageVersion {
	pub id: VersionId,
	pub package_id: PackageId,
	pub version: Version,
	pub visibility: Visibility,
	/// SPT releases this version declares itself to run on.
	pub spt_versions: Vec<SptVersionId>,
	pub download_link: String,
	pub download_size: u64,
	/// Denormalized by the import pipeline: whether this version runs on the
	/// newest published SPT release. Echoed verbatim in tree responses.
	pub latest_spt_compatible: bool,
	pub dependencies: Vec<DependencyDeclaration>,
}

impl PackageVersion {
	pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
		self.visibility.is_visible_at(now)
	}

	pub fn is_prerelease(&self) -> bool {
		self.version.is_prerelease()
	}

	pub fn supports_spt(&self, spt: SptVersionId) -> bool {
		self.spt_versions.contains(&spt)
	}
}

/// A requirement a [`PackageVersion`] places on another package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyDeclaration {
	pub id: DeclarationId,
	pub target_package_id: PackageId,
	/// Raw range expression as published. Parsed lazily and fail-closed.
	pub constraint: String,
}

/// Precomputed by the resolution batch job: this version currently satisfies
/// that declaration. Read-only here; re-filtered for visibility regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCandidate {
	pub declaration_id: DeclarationId,
	pub version_id: VersionId,
}

#[cfg(test)]
mod test {
	use super::*;
	use chrono::Duration;

	fn past() -> DateTime<Utc> { Utc::now() - Duration::hours(1) }

	#[test]
	fn unpublished_is_invisible() {
		let visibility = Visibility { published_at: None, disabled: false };
		assert!(!visibility.is_visible_at(Utc::now()));
	}

	#[test]
	fn future_publication_is_invisible() {
		let visibility = Visibility { published_at: Some(Utc::now() + Duration::hours(1)), disabled: false };
		assert!(!visibility.is_visible_at(Utc::now()));
	}

	#[test]
	fn disabled_is_invisible_even_when_published() {
		let visibility = Visibility { published_at: Some(past()), disabled: true };
		assert!(!visibility.is_visible_at(Utc::now()));
	}

	#[test]
	fn published_and_enabled_is_visible() {
		let visibility = Visibility { published_at: Some(past()), disabled: false };
		assert!(visibility.is_visible_at(Utc::now()));
	}
}
