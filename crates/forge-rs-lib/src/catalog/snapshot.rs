//! An in-memory catalog snapshot.
//!
//! The hosted catalog lives in a relational store; this implementation exists
//! for tests, tooling and small deployments. Records are kept in insertion
//! order so traversals stay deterministic, and a populated snapshot can be
//! cached to disk in a binary format far cheaper to reload than the JSON it
//! was imported from.

use serde::{Serialize, Deserialize};

use super::Catalog;
use super::package::*;
use super::spt_version::SptVersion;
use super::version::Version;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
	packages: Vec<Package>,
	versions: Vec<PackageVersion>,
	candidates: Vec<ResolvedCandidate>,
	spt_versions: Vec<SptVersion>,
}

impl CatalogSnapshot {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn add_package(&mut self, package: Package) {
		self.packages.push(package);
	}

	pub fn add_version(&mut self, version: PackageVersion) {
		self.versions.push(version);
	}

	pub fn add_candidate(&mut self, candidate: ResolvedCandidate) {
		self.candidates.push(candidate);
	}

	pub fn add_spt_version(&mut self, spt_version: SptVersion) {
		self.spt_versions.push(spt_version);
	}

	/// Imports a snapshot from its JSON interchange form.
	pub fn read_from_json(reader: impl std::io::Read) -> crate::Result<Self> {
		Ok(serde_json::from_reader(reader)?)
	}

	pub fn save_to_disk(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		let data = bincode::serialize(self)?;
		std::fs::write(path, data)?;
		Ok(())
	}

	pub fn load_from_disk(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let data = std::fs::read(path)?;
		Ok(bincode::deserialize(&data)?)
	}
}

impl Catalog for CatalogSnapshot {
	fn package_by_id(&self, id: PackageId) -> crate::Result<Option<Package>> {
		Ok(self.packages.iter().find(|p| p.id == id).cloned())
	}

	fn package_by_guid(&self, guid: &str) -> crate::Result<Option<Package>> {
		Ok(self.packages.iter().find(|p| p.guid == guid).cloned())
	}

	fn version_by_id(&self, id: VersionId) -> crate::Result<Option<PackageVersion>> {
		Ok(self.versions.iter().find(|v| v.id == id).cloned())
	}

	fn version_of_package(&self, package: PackageId, version: &str) -> crate::Result<Option<PackageVersion>> {
		let Ok(wanted) = Version::new(version) else {
			/* An unparseable request version can't match a stored record */
			return Ok(None);
		};
		Ok(self.versions.iter()
			.find(|v| v.package_id == package && v.version == wanted)
			.cloned())
	}

	fn versions_of_package(&self, package: PackageId) -> crate::Result<Vec<PackageVersion>> {
		Ok(self.versions.iter()
			.filter(|v| v.package_id == package)
			.cloned()
			.collect())
	}

	fn candidates_for_declaration(&self, declaration: DeclarationId) -> crate::Result<Vec<ResolvedCandidate>> {
		Ok(self.candidates.iter()
			.filter(|c| c.declaration_id == declaration)
			.copied()
			.collect())
	}

	fn spt_version_by_name(&self, version: &str) -> crate::Result<Option<SptVersion>> {
		let Ok(wanted) = Version::new(version) else {
			return Ok(None);
		};
		Ok(self.spt_versions.iter().find(|s| s.version == wanted).cloned())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use chrono::Utc;

	fn sample() -> CatalogSnapshot {
		let mut snapshot = CatalogSnapshot::new();
		snapshot.add_package(Package {
			id: 1,
			guid: "com.example.one".to_string(),
			name: "One".to_string(),
			slug: "one".to_string(),
			visibility: Visibility { published_at: Some(Utc::now()), disabled: false },
		});
		snapshot.add_version(PackageVersion {
			id: 10,
			package_id: 1,
			version: Version::new("1.2.3").unwrap(),
			visibility: Visibility { published_at: Some(Utc::now()), disabled: false },
			spt_versions: vec![100],
			download_link: "https://forge.test/download/10".to_string(),
			download_size: 2048,
			latest_spt_compatible: true,
			dependencies: vec![DependencyDeclaration { id: 20, target_package_id: 2, constraint: "^1.0.0".to_string() }],
		});
		snapshot.add_candidate(ResolvedCandidate { declaration_id: 20, version_id: 30 });
		snapshot
	}

	#[test]
	fn lookups_match_exactly() {
		let snapshot = sample();
		assert!(snapshot.package_by_guid("com.example.one").unwrap().is_some());
		assert!(snapshot.package_by_guid("com.example.two").unwrap().is_none());
		assert!(snapshot.version_of_package(1, "1.2.3").unwrap().is_some());
		assert!(snapshot.version_of_package(1, "1.2.4").unwrap().is_none());
		assert!(snapshot.version_of_package(1, "not-a-version").unwrap().is_none());
	}

	#[test]
	fn save_and_load_round_trip() {
		let snapshot = sample();
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("catalog.bin");
		snapshot.save_to_disk(&path).unwrap();
		let reloaded = CatalogSnapshot::load_from_disk(&path).unwrap();
		assert_eq!(reloaded.versions.len(), 1);
		assert_eq!(reloaded.candidates_for_declaration(20).unwrap().len(), 1);
	}

	#[test]
	fn json_import() {
		let snapshot = sample();
		let json = serde_json::to_vec(&snapshot).unwrap();
		let reloaded = CatalogSnapshot::read_from_json(json.as_slice()).unwrap();
		assert_eq!(reloaded.packages.len(), 1);
	}
}
