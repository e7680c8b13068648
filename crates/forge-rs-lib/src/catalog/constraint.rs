//! Range expressions declared on package dependencies.
//!
//! The grammar covers what mod authors actually publish: exact versions,
//! caret and tilde ranges, comparison operators, wildcard components and
//! space-separated conjunctions (`>=1.0.0 <2.0.0`).
//!
//! Catalog data is not trusted: an expression that fails to parse is treated
//! as matching nothing rather than aborting the request.

use super::version::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparator {
	Less,
	LessEq,
	Greater,
	GreaterEq,
}

#[derive(Debug, Clone, PartialEq)]
enum Term {
	Exact(Version),
	/// `^1.2.3`: anything compatible within the leading non-zero component.
	Caret(Version),
	/// `~1.2.3`: anything within the same minor.
	Tilde(Version),
	Cmp(Comparator, Version),
	/// `*`, `1.*` or `1.2.*`. Both bounds `None` matches everything.
	Wildcard { major: Option<u64>, minor: Option<u64> },
}

/// A parsed range expression: the conjunction of its terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
	terms: Vec<Term>,
}

impl Constraint {
	pub fn parse(expr: &str) -> crate::Result<Self> {
		let terms = expr.split_whitespace()
			.map(parse_term)
			.collect::<crate::Result<Vec<_>>>()?;
		if terms.is_empty() {
			return Err(crate::Error::Parse("empty constraint".to_string()));
		}
		Ok(Constraint { terms })
	}

	pub fn matches(&self, version: &Version) -> bool {
		self.terms.iter().all(|term| term.matches(version))
	}
}

impl std::str::FromStr for Constraint {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl Term {
	fn matches(&self, version: &Version) -> bool {
		match self {
			Term::Exact(wanted) => version == wanted,
			/* The synthetic upper bounds below compare on the release triple so
			a prerelease of the first excluded triple (`2.0.0-alpha` against
			`^1.2.0`) stays out. */
			Term::Caret(base) => version >= base && version.triple() < caret_upper(base),
			Term::Tilde(base) => version >= base && version.triple() < (base.major(), base.minor() + 1, 0),
			Term::Cmp(op, bound) => match op {
				Comparator::Less => version < bound,
				Comparator::LessEq => version <= bound,
				Comparator::Greater => version > bound,
				Comparator::GreaterEq => version >= bound,
			},
			Term::Wildcard { major: None, .. } => true,
			Term::Wildcard { major: Some(major), minor: None } => {
				*version >= Version::release(*major, 0, 0) && version.triple() < (major + 1, 0, 0)
			},
			Term::Wildcard { major: Some(major), minor: Some(minor) } => {
				*version >= Version::release(*major, *minor, 0) && version.triple() < (*major, minor + 1, 0)
			},
		}
	}
}

fn caret_upper(base: &Version) -> (u64, u64, u64) {
	if base.major() > 0 {
		(base.major() + 1, 0, 0)
	} else if base.minor() > 0 {
		(0, base.minor() + 1, 0)
	} else {
		(0, 0, base.patch() + 1)
	}
}

fn parse_term(term: &str) -> crate::Result<Term> {
	if term == "*" || term.eq_ignore_ascii_case("x") {
		return Ok(Term::Wildcard { major: None, minor: None });
	}
	if let Some(rest) = term.strip_prefix('^') {
		return Ok(Term::Caret(partial_version(rest)?));
	}
	if let Some(rest) = term.strip_prefix('~') {
		return Ok(Term::Tilde(partial_version(rest)?));
	}
	if let Some(rest) = term.strip_prefix(">=") {
		return Ok(Term::Cmp(Comparator::GreaterEq, partial_version(rest)?));
	}
	if let Some(rest) = term.strip_prefix("<=") {
		return Ok(Term::Cmp(Comparator::LessEq, partial_version(rest)?));
	}
	if let Some(rest) = term.strip_prefix('>') {
		return Ok(Term::Cmp(Comparator::Greater, partial_version(rest)?));
	}
	if let Some(rest) = term.strip_prefix('<') {
		return Ok(Term::Cmp(Comparator::Less, partial_version(rest)?));
	}
	if let Some(rest) = term.strip_prefix('=') {
		return Ok(Term::Exact(Version::new(rest)?));
	}
	if term.split('.').any(|part| part == "*" || part.eq_ignore_ascii_case("x")) {
		return parse_wildcard(term);
	}
	Ok(Term::Exact(Version::new(term)?))
}

fn parse_wildcard(term: &str) -> crate::Result<Term> {
	let parts: Vec<&str> = term.split('.').collect();
	if parts.len() > 3 {
		return Err(crate::Error::Parse(format!("too many components in `{}`", term)));
	}

	let mut numbers = Vec::<u64>::new();
	let mut wild = false;
	for part in parts {
		if part == "*" || part.eq_ignore_ascii_case("x") {
			wild = true;
			continue;
		}
		if wild {
			/* `1.*.3` pins a component below a wildcard, which is meaningless */
			return Err(crate::Error::Parse(format!("component after wildcard in `{}`", term)));
		}
		numbers.push(part.parse::<u64>()
			.map_err(|_| crate::Error::Parse(format!("bad version component `{}` in `{}`", part, term)))?);
	}

	match numbers.as_slice() {
		[] => Ok(Term::Wildcard { major: None, minor: None }),
		[major] => Ok(Term::Wildcard { major: Some(*major), minor: None }),
		[major, minor] => Ok(Term::Wildcard { major: Some(*major), minor: Some(*minor) }),
		_ => Err(crate::Error::Parse(format!("unusable wildcard `{}`", term))),
	}
}

/// Range terms may name partial versions (`^1.2`); missing components are zero.
fn partial_version(s: &str) -> crate::Result<Version> {
	Ok(Version::new_partial(s)?.0)
}

/// Fail-closed satisfaction test for raw catalog expressions.
///
/// A malformed expression never matches; resolution keeps going and at worst
/// reports a spurious conflict instead of aborting on bad catalog data.
pub fn satisfies(version: &Version, expr: &str) -> bool {
	match Constraint::parse(expr) {
		Ok(constraint) => constraint.matches(version),
		Err(e) => {
			log::warn!("treating malformed constraint `{}` as unsatisfiable: {}", expr, e);
			false
		}
	}
}

/// The highest version satisfying every expression at once.
///
/// `None` when the intersection is empty or any expression fails to parse.
pub fn highest_satisfying(versions: &[Version], exprs: &[String]) -> Option<Version> {
	let mut constraints = Vec::with_capacity(exprs.len());
	for expr in exprs {
		match Constraint::parse(expr) {
			Ok(constraint) => constraints.push(constraint),
			Err(e) => {
				log::warn!("treating malformed constraint `{}` as unsatisfiable: {}", expr, e);
				return None;
			}
		}
	}
	versions.iter()
		.filter(|v| constraints.iter().all(|c| c.matches(v)))
		.max()
		.cloned()
}
