//! Turning raw `identifier:version` request strings into catalog records.

use chrono::{DateTime, Utc};

use crate::catalog::*;

/// One parsed request pair. The identifier is either a numeric package id or
/// a package guid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
	pub identifier: String,
	pub version: String,
}

/// Parses one comma-separated pair list. See [`parse_target_lists`].
pub(crate) fn parse_targets(raw: &str) -> crate::Result<Vec<InstallTarget>> {
	parse_target_lists(&[raw])
}

/// Parses several pair lists into one de-duplicated target list.
///
/// Malformed pairs (not exactly one colon, empty identifier or version) are
/// dropped without failing the request; the whole request only fails when
/// nothing was supplied at all or nothing survived parsing.
pub(crate) fn parse_target_lists(raws: &[&str]) -> crate::Result<Vec<InstallTarget>> {
	if raws.iter().all(|raw| raw.trim().is_empty()) {
		return Err(crate::Error::Validation("no packages supplied".to_string()));
	}

	let mut targets = Vec::<InstallTarget>::new();
	for raw in raws {
		for pair in raw.split(',') {
			let pair = pair.trim();
			if pair.is_empty() {
				continue;
			}
			let Some((identifier, version)) = pair.split_once(':') else {
				log::debug!("dropping malformed pair `{}`: no version separator", pair);
				continue;
			};
			if version.contains(':') {
				log::debug!("dropping malformed pair `{}`: multiple separators", pair);
				continue;
			}
			let identifier = identifier.trim();
			let version = version.trim();
			if identifier.is_empty() || version.is_empty() {
				log::debug!("dropping malformed pair `{}`: empty identifier or version", pair);
				continue;
			}
			let target = InstallTarget { identifier: identifier.to_string(), version: version.to_string() };
			if !targets.contains(&target) {
				targets.push(target);
			}
		}
	}

	if targets.is_empty() {
		return Err(crate::Error::Validation("no parseable packages in request".to_string()));
	}
	Ok(targets)
}

/// Resolves targets against the visible catalog.
///
/// Pairs that match nothing visible are dropped silently: an unknown package
/// is an empty answer, not an error. The result is de-duplicated by version
/// id and keeps request order.
pub(crate) fn resolve_targets<C: Catalog>(
	catalog: &C,
	now: DateTime<Utc>,
	targets: &[InstallTarget],
) -> crate::Result<Vec<(Package, PackageVersion)>> {
	let mut resolved = Vec::<(Package, PackageVersion)>::new();
	for target in targets {
		let package = if target.identifier.chars().all(|c| c.is_ascii_digit()) {
			match target.identifier.parse::<PackageId>() {
				Ok(id) => catalog.package_by_id(id)?,
				Err(_) => None,
			}
		} else {
			catalog.package_by_guid(&target.identifier)?
		};
		let Some(package) = package else {
			log::debug!("no package for identifier `{}`", target.identifier);
			continue;
		};
		if !package.is_visible_at(now) {
			continue;
		}
		let Some(version) = catalog.version_of_package(package.id, &target.version)? else {
			log::debug!("no version `{}` for package `{}`", target.version, package.guid);
			continue;
		};
		if !version.is_visible_at(now) {
			continue;
		}
		if !resolved.iter().any(|(_, v)| v.id == version.id) {
			resolved.push((package, version));
		}
	}
	Ok(resolved)
}
