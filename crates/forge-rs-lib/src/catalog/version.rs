use serde::{Deserialize, Serialize, Serializer, Deserializer};

/// A semantic version as stored on package releases.
///
/// An empty `labels` string marks a stable release. A stable release always
/// ranks above every prerelease sharing its `(major, minor, patch)` triple;
/// prerelease labels compare lexicographically.
#[derive(Debug, Clone, Eq)]
pub struct Version {
	major: u64,
	minor: u64,
	patch: u64,
	labels: String,
}

impl Version {
	pub fn new(version: &str) -> crate::Result<Self> {
		let (parsed, precision) = Self::new_partial(version)?;
		if precision != 3 {
			return Err(crate::Error::Parse(format!("incomplete version `{}`", version)));
		}
		Ok(parsed)
	}

	/// Parses a version that may omit trailing components, returning how many
	/// numeric components were present. Missing components are zero.
	///
	/// Build metadata (`+...`) is accepted and discarded, as is a leading `v`.
	pub(crate) fn new_partial(version: &str) -> crate::Result<(Self, usize)> {
		let s = version.trim();
		let s = s.strip_prefix('v').unwrap_or(s);
		let s = match s.split_once('+') {
			Some((head, _)) => head,
			None => s,
		};
		let (numbers, labels) = match s.split_once('-') {
			Some((numbers, labels)) => (numbers, labels),
			None => (s, ""),
		};
		if numbers.is_empty() {
			return Err(crate::Error::Parse(format!("empty version `{}`", version)));
		}
		if s.contains('-') && labels.is_empty() {
			return Err(crate::Error::Parse(format!("dangling prerelease separator in `{}`", version)));
		}

		let mut components = [0u64; 3];
		let mut precision = 0;
		for (i, part) in numbers.split('.').enumerate() {
			if i >= 3 {
				return Err(crate::Error::Parse(format!("too many components in `{}`", version)));
			}
			components[i] = part.parse::<u64>()
				.map_err(|_| crate::Error::Parse(format!("bad version component `{}` in `{}`", part, version)))?;
			precision = i + 1;
		}

		Ok((Version {
			major: components[0],
			minor: components[1],
			patch: components[2],
			labels: labels.to_string(),
		}, precision))
	}

	/// A stable version with no prerelease label.
	pub(crate) fn release(major: u64, minor: u64, patch: u64) -> Self {
		Version { major, minor, patch, labels: String::new() }
	}

	pub fn major(&self) -> u64 { self.major }
	pub fn minor(&self) -> u64 { self.minor }
	pub fn patch(&self) -> u64 { self.patch }
	pub fn labels(&self) -> &str { &self.labels }

	pub fn is_prerelease(&self) -> bool {
		!self.labels.is_empty()
	}

	pub(crate) fn triple(&self) -> (u64, u64, u64) {
		(self.major, self.minor, self.patch)
	}

	/// Orders by `(major, minor, patch)` alone, ignoring prerelease labels.
	pub(crate) fn cmp_triple(&self, other: &Self) -> std::cmp::Ordering {
		self.triple().cmp(&other.triple())
	}
}

impl TryFrom<String> for Version {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.cmp_triple(other).then_with(|| {
			match (self.labels.is_empty(), other.labels.is_empty()) {
				(true, true) => std::cmp::Ordering::Equal,
				/* A stable release outranks any prerelease of its triple */
				(true, false) => std::cmp::Ordering::Greater,
				(false, true) => std::cmp::Ordering::Less,
				(false, false) => self.labels.cmp(&other.labels),
			}
		})
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::hash::Hash for Version {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.major.hash(state);
		self.minor.hash(state);
		self.patch.hash(state);
		self.labels.hash(state);
	}
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.labels.is_empty() {
			write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
		} else {
			write!(f, "{}.{}.{}-{}", self.major, self.minor, self.patch, self.labels)
		}
	}
}

impl Serialize for Version {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Version {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Version::new(&s).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn version_numeric_precedence() { assert!(Version::new("1.2.4").unwrap() < Version::new("1.2.10").unwrap()) }
	#[test] fn version_major_dominates() { assert!(Version::new("1.9.9").unwrap() < Version::new("2.0.0").unwrap()) }
	#[test] fn version_identical_are_eq() { assert!(Version::new("1.2.3").unwrap() == Version::new("1.2.3").unwrap()) }
	#[test] fn version_stable_outranks_prerelease() { assert!(Version::new("1.0.0-rc.1").unwrap() < Version::new("1.0.0").unwrap()) }
	#[test] fn version_labels_compare_lexically() { assert!(Version::new("1.0.0-alpha").unwrap() < Version::new("1.0.0-beta").unwrap()) }
	#[test] fn version_prefix_is_supported() { assert!(Version::new("v1.2.3").unwrap() == Version::new("1.2.3").unwrap()) }
	#[test] fn version_build_metadata_is_ignored() { assert!(Version::new("1.2.3+40").unwrap() == Version::new("1.2.3").unwrap()) }
	#[test] fn version_incomplete_is_rejected() { assert!(Version::new("1.2").is_err()) }
	#[test] fn version_garbage_is_rejected() { assert!(Version::new("latest").is_err()) }
	#[test] fn version_dangling_separator_is_rejected() { assert!(Version::new("1.2.3-").is_err()) }

	#[test]
	fn version_display_round_trips() {
		for s in ["0.1.0", "1.2.3", "1.0.0-beta.1"] {
			assert_eq!(Version::new(s).unwrap().to_string(), s);
		}
	}

	#[test]
	fn version_partial_reports_precision() {
		let (v, precision) = Version::new_partial("1.2").unwrap();
		assert_eq!(precision, 2);
		assert!(v == Version::new("1.2.0").unwrap());
	}
}
