//! Iterator adapters for the filters applied over and over on version lists.

use chrono::{DateTime, Utc};

use super::package::{PackageVersion, SptVersionId};

pub struct VisibleAt<'a, I>
where
	I: Iterator<Item = &'a PackageVersion>,
{
	now: DateTime<Utc>,
	underlying: I,
}

impl<'a, I> Iterator for VisibleAt<'a, I>
where
	I: Iterator<Item = &'a PackageVersion>,
{
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		for version in self.underlying.by_ref() {
			if version.is_visible_at(self.now) {
				return Some(version)
			}
		}
		None
	}
}

pub trait VisibleAtExt<'a>: Iterator<Item = &'a PackageVersion>
{
	/// Filters the iterator to versions whose own publication gate holds.
	///
	/// The owning package's gate is a separate check.
	fn visible_at(self, now: DateTime<Utc>) -> VisibleAt<'a, Self>
	where
		Self: Sized,
	{
		VisibleAt { underlying: self, now }
	}
}

impl<'a, I: Iterator<Item = &'a PackageVersion>> VisibleAtExt<'a> for I {}


pub struct SptMatches<'a, I>
where
	I: Iterator<Item = &'a PackageVersion>,
{
	spt: SptVersionId,
	underlying: I,
}

impl<'a, I> Iterator for SptMatches<'a, I>
where
	I: Iterator<Item = &'a PackageVersion>,
{
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		for version in self.underlying.by_ref() {
			if version.supports_spt(self.spt) {
				return Some(version)
			}
		}
		None
	}
}

pub trait SptMatchesExt<'a>: Iterator<Item = &'a PackageVersion>
{
	/// Filters the iterator to versions declaring compatibility with `spt`.
	fn spt_matches(self, spt: SptVersionId) -> SptMatches<'a, Self>
	where
		Self: Sized,
	{
		SptMatches { underlying: self, spt }
	}
}

impl<'a, I: Iterator<Item = &'a PackageVersion>> SptMatchesExt<'a> for I {}
