//! Helpers for assembling catalog fixtures in tests.
//!
//! Row ids are generated; tests hold on to the returned ids to wire
//! declarations, candidates and assertions together.

use chrono::{Duration, Utc};

use forge_rs::catalog::*;

/// Published an hour ago, enabled.
pub fn published() -> Visibility {
	Visibility { published_at: Some(Utc::now() - Duration::hours(1)), disabled: false }
}

/// No publication date at all.
pub fn unpublished() -> Visibility {
	Visibility { published_at: None, disabled: false }
}

/// Published but switched off.
pub fn disabled() -> Visibility {
	Visibility { published_at: Some(Utc::now() - Duration::hours(1)), disabled: true }
}

/// Publication date still in the future.
pub fn scheduled() -> Visibility {
	Visibility { published_at: Some(Utc::now() + Duration::hours(1)), disabled: false }
}

/// Builds a [`CatalogSnapshot`] one record at a time.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
	packages: Vec<Package>,
	versions: Vec<PackageVersion>,
	candidates: Vec<ResolvedCandidate>,
	spt_versions: Vec<SptVersion>,
	next_id: i64,
}

impl CatalogBuilder {
	pub fn new() -> Self {
		Default::default()
	}

	fn next_id(&mut self) -> i64 {
		self.next_id += 1;
		self.next_id
	}

	pub fn spt_version(&mut self, version: &str) -> SptVersionId {
		self.spt_version_with_visibility(version, published())
	}

	pub fn spt_version_with_visibility(&mut self, version: &str, visibility: Visibility) -> SptVersionId {
		let id = self.next_id();
		self.spt_versions.push(SptVersion {
			id,
			version: Version::new(version).expect("bad SPT version in fixture"),
			visibility,
		});
		id
	}

	pub fn package(&mut self, guid: &str, name: &str) -> PackageId {
		self.package_with_visibility(guid, name, published())
	}

	pub fn package_with_visibility(&mut self, guid: &str, name: &str, visibility: Visibility) -> PackageId {
		let id = self.next_id();
		self.packages.push(Package {
			id,
			guid: guid.to_string(),
			name: name.to_string(),
			slug: name.to_lowercase().replace(' ', "-"),
			visibility,
		});
		id
	}

	pub fn version(&mut self, package: PackageId, version: &str, spt_versions: &[SptVersionId]) -> VersionId {
		self.version_with_visibility(package, version, spt_versions, published())
	}

	pub fn version_with_visibility(
		&mut self,
		package: PackageId,
		version: &str,
		spt_versions: &[SptVersionId],
		visibility: Visibility,
	) -> VersionId {
		let id = self.next_id();
		self.versions.push(PackageVersion {
			id,
			package_id: package,
			version: Version::new(version).expect("bad version in fixture"),
			visibility,
			spt_versions: spt_versions.to_vec(),
			download_link: format!("https://forge.test/download/{}", id),
			download_size: 1024,
			latest_spt_compatible: true,
			dependencies: Vec::new(),
		});
		id
	}

	/// Adds a dependency declaration to an already-added version.
	pub fn depends(&mut self, owner: VersionId, target: PackageId, constraint: &str) -> DeclarationId {
		let id = self.next_id();
		let owner = self.versions.iter_mut()
			.find(|v| v.id == owner)
			.expect("unknown owner version in fixture");
		owner.dependencies.push(DependencyDeclaration {
			id,
			target_package_id: target,
			constraint: constraint.to_string(),
		});
		id
	}

	/// Marks `version` as a precomputed satisfying candidate of `declaration`.
	pub fn candidate(&mut self, declaration: DeclarationId, version: VersionId) {
		self.candidates.push(ResolvedCandidate { declaration_id: declaration, version_id: version });
	}

	/// Declaration plus its candidate rows in one call.
	pub fn depends_resolved(
		&mut self,
		owner: VersionId,
		target: PackageId,
		constraint: &str,
		candidates: &[VersionId],
	) -> DeclarationId {
		let declaration = self.depends(owner, target, constraint);
		for version in candidates {
			self.candidate(declaration, *version);
		}
		declaration
	}

	pub fn build(self) -> CatalogSnapshot {
		let mut snapshot = CatalogSnapshot::new();
		for package in self.packages {
			snapshot.add_package(package);
		}
		for version in self.versions {
			snapshot.add_version(version);
		}
		for candidate in self.candidates {
			snapshot.add_candidate(candidate);
		}
		for spt_version in self.spt_versions {
			snapshot.add_spt_version(spt_version);
		}
		snapshot
	}
}
