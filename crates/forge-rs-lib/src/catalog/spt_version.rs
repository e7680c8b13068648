use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use super::package::{SptVersionId, Visibility};
use super::version::Version;

/// One release of the game platform that mods target.
///
/// Compatibility is membership: a package version runs on an SPT release iff
/// its declared set contains the release's id and the release is visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SptVersion {
	pub id: SptVersionId,
	pub version: Version,
	pub visibility: Visibility,
}

impl SptVersion {
	pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
		self.visibility.is_visible_at(now)
	}
}
