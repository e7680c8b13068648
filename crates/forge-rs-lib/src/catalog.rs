//! # The Forge catalog
//!
//! Read-only records describing mods ([`Package`]), their released versions
//! ([`PackageVersion`]), the requirements those versions declare on each
//! other ([`DependencyDeclaration`]) and the platform releases they target
//! ([`SptVersion`]).
//!
//! The engine consumes all of this through the [`Catalog`] trait so the host
//! can back it with whatever store holds the live catalog; [`CatalogSnapshot`]
//! is the bundled in-memory implementation.

mod version;
pub use version::Version;

mod constraint;
pub use constraint::Constraint;
pub use constraint::satisfies;
pub use constraint::highest_satisfying;

mod package;
pub use package::PackageId;
pub use package::VersionId;
pub use package::DeclarationId;
pub use package::SptVersionId;
pub use package::Visibility;
pub use package::Package;
pub use package::PackageVersion;
pub use package::DependencyDeclaration;
pub use package::ResolvedCandidate;

mod spt_version;
pub use spt_version::SptVersion;

mod snapshot;
pub use snapshot::CatalogSnapshot;

pub mod iterator;

/// The repository the engine reads from.
///
/// Every method is a point lookup or a bounded list; the engine does all
/// filtering and ranking itself so implementations stay dumb. Returning `Err`
/// from any method aborts the request and surfaces to the caller unchanged.
pub trait Catalog {
	fn package_by_id(&self, id: PackageId) -> crate::Result<Option<Package>>;
	fn package_by_guid(&self, guid: &str) -> crate::Result<Option<Package>>;
	fn version_by_id(&self, id: VersionId) -> crate::Result<Option<PackageVersion>>;
	/// Exact version match against `package`'s releases.
	fn version_of_package(&self, package: PackageId, version: &str) -> crate::Result<Option<PackageVersion>>;
	/// Every release of `package`, in a stable order.
	fn versions_of_package(&self, package: PackageId) -> crate::Result<Vec<PackageVersion>>;
	/// The precomputed satisfying versions for one declaration.
	fn candidates_for_declaration(&self, declaration: DeclarationId) -> crate::Result<Vec<ResolvedCandidate>>;
	fn spt_version_by_name(&self, version: &str) -> crate::Result<Option<SptVersion>>;
}
