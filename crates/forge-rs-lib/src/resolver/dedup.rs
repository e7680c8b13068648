//! Collapsing duplicate dependency nodes and flagging genuine conflicts.

use std::collections::HashMap;

use crate::catalog::{highest_satisfying, PackageId, Version};

use super::tree::TreeNode;

/// Every range expression seen against a package id during one traversal.
///
/// Accumulation is global to the whole traversal rather than per branch: a
/// requirement discovered under one root takes part in duplicate collapse
/// everywhere that package shows up. Scoping lives entirely behind this type,
/// so narrowing it to per-branch later is a local change.
#[derive(Debug, Default, Clone)]
pub struct ConstraintAccumulator {
	by_package: HashMap<PackageId, Vec<String>>,
}

impl ConstraintAccumulator {
	pub(crate) fn record(&mut self, package: PackageId, expr: &str) {
		self.by_package.entry(package).or_default().push(expr.to_string());
	}

	/// Everything recorded against `package` so far, in discovery order.
	pub fn constraints_for(&self, package: PackageId) -> &[String] {
		self.by_package.get(&package).map(Vec::as_slice).unwrap_or(&[])
	}
}

/// Collapses same-level nodes targeting the same package.
///
/// - A lone node is kept untouched.
/// - Duplicates with no recorded requirements are interchangeable: the first
///   encountered wins.
/// - Otherwise the highest version satisfying every recorded requirement
///   wins; when no version does, every variant is kept and flagged
///   [`TreeNode::conflict`] so the caller sees the incompatibility instead of
///   a silent pick.
///
/// Children are expected to be deduplicated already; this pass does not
/// recurse.
pub(crate) fn deduplicate(nodes: Vec<TreeNode>, constraints: &ConstraintAccumulator) -> Vec<TreeNode> {
	let mut order = Vec::<PackageId>::new();
	let mut groups = HashMap::<PackageId, Vec<TreeNode>>::new();
	for node in nodes {
		if !groups.contains_key(&node.id) {
			order.push(node.id);
		}
		groups.entry(node.id).or_default().push(node);
	}

	let mut out = Vec::<TreeNode>::new();
	for id in order {
		let Some(group) = groups.remove(&id) else { continue };
		if group.len() == 1 {
			out.extend(group);
			continue;
		}

		let exprs = constraints.constraints_for(id);
		if exprs.is_empty() {
			if let Some(first) = group.into_iter().next() {
				out.push(first);
			}
			continue;
		}

		let versions: Vec<Version> = group.iter()
			.map(|node| node.latest_compatible_version.version.clone())
			.collect();
		match highest_satisfying(&versions, exprs) {
			Some(best) => {
				if let Some(node) = group.into_iter().find(|n| n.latest_compatible_version.version == best) {
					out.push(node);
				}
			},
			None => {
				log::debug!("conflicting requirements on package {}, keeping all {} variants", id, group.len());
				for mut node in group {
					node.conflict = true;
					out.push(node);
				}
			},
		}
	}
	out
}

#[cfg(test)]
mod test {
	use super::*;
	use super::super::tree::VersionSummary;

	fn node(package: PackageId, version: &str) -> TreeNode {
		TreeNode {
			id: package,
			guid: format!("com.example.{}", package),
			name: format!("Package {}", package),
			slug: format!("package-{}", package),
			latest_compatible_version: VersionSummary {
				id: package * 10,
				version: Version::new(version).unwrap(),
				link: String::new(),
				download_size: 0,
				latest_spt_compatible: true,
			},
			conflict: false,
			dependencies: Vec::new(),
		}
	}

	#[test]
	fn lone_nodes_pass_through_untouched() {
		let deduped = deduplicate(vec![node(1, "1.0.0"), node(2, "2.0.0")], &ConstraintAccumulator::default());
		assert_eq!(deduped.len(), 2);
		assert!(deduped.iter().all(|n| !n.conflict));
	}

	#[test]
	fn unconstrained_duplicates_keep_the_first_seen() {
		let deduped = deduplicate(vec![node(1, "1.0.0"), node(1, "2.0.0")], &ConstraintAccumulator::default());
		assert_eq!(deduped.len(), 1);
		assert_eq!(deduped[0].latest_compatible_version.version, Version::new("1.0.0").unwrap());
		assert!(!deduped[0].conflict);
	}

	#[test]
	fn satisfiable_duplicates_collapse_to_the_highest() {
		let mut constraints = ConstraintAccumulator::default();
		constraints.record(1, "^1.0.0");
		constraints.record(1, "^1.5.0");
		let deduped = deduplicate(
			vec![node(1, "1.0.0"), node(1, "1.5.0"), node(1, "1.8.0")],
			&constraints,
		);
		assert_eq!(deduped.len(), 1);
		assert_eq!(deduped[0].latest_compatible_version.version, Version::new("1.8.0").unwrap());
		assert!(!deduped[0].conflict);
	}

	#[test]
	fn disjoint_duplicates_are_all_kept_and_flagged() {
		let mut constraints = ConstraintAccumulator::default();
		constraints.record(1, "^1.0.0");
		constraints.record(1, "^2.0.0");
		let deduped = deduplicate(vec![node(1, "1.0.0"), node(1, "2.0.0")], &constraints);
		assert_eq!(deduped.len(), 2);
		assert!(deduped.iter().all(|n| n.conflict));
	}

	#[test]
	fn first_encounter_order_is_preserved() {
		let deduped = deduplicate(vec![node(2, "1.0.0"), node(1, "1.0.0")], &ConstraintAccumulator::default());
		let ids: Vec<PackageId> = deduped.iter().map(|n| n.id).collect();
		assert_eq!(ids, vec![2, 1]);
	}
}
