//! Versions, version ranges, and version lists.
//!
//! Versions are split into numeric and alphabetic segments, so `1.2rc1`
//! becomes `[1, 2, rc, 1]`. A version used as a constraint matches every
//! version it is a prefix of, which is why `1.2` matches `1.2.8` and the
//! range `1.2:1.4` contains `1.4.3`.
//!
//! # Examples
//!
//! ```
//! use pkgpref_spec::{Satisfies, Version, VersionList};
//!
//! let list = VersionList::parse("1.2:1.4,2.0").unwrap();
//! assert!(Version::parse("1.4.3").unwrap().satisfies(&list));
//! assert!(!Version::parse("1.5").unwrap().satisfies(&list));
//!
//! let concrete = VersionList::parse("1.2.8").unwrap();
//! assert!(concrete.is_concrete());
//! assert!(concrete.satisfies(&VersionList::parse("1.2:").unwrap()));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::Satisfies;
use crate::error::{Error, Result};

/// The version that compares greater than every other version.
const DEVELOP: &str = "develop";

/// One run of digits or letters inside a version string.
///
/// Variant order matters: at the same position a numeric segment is
/// greater than an alphabetic one (`1.0` > `1.a`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Segment {
    Alpha(String),
    Numeric(u64),
}

/// A single version such as `1.2.8`, `2.0rc1`, or `develop`.
///
/// Equality, ordering, and hashing look at the parsed segments only, so
/// `1.2-3` and `1.2.3` are the same version.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<Segment>,
}

impl Version {
    /// Parse a version string.
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(Error::version(input, "empty version"));
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut numeric = false;

        let mut flush = |current: &mut String, numeric: bool| -> Result<()> {
            if current.is_empty() {
                return Ok(());
            }
            let segment = if numeric {
                let value = current
                    .parse::<u64>()
                    .map_err(|e| Error::version(input, format!("segment '{current}': {e}")))?;
                Segment::Numeric(value)
            } else {
                Segment::Alpha(current.clone())
            };
            segments.push(segment);
            current.clear();
            Ok(())
        };

        for c in raw.chars() {
            if c.is_ascii_digit() || c.is_ascii_alphabetic() {
                let is_digit = c.is_ascii_digit();
                if !current.is_empty() && is_digit != numeric {
                    flush(&mut current, numeric)?;
                }
                numeric = is_digit;
                current.push(c);
            } else if matches!(c, '.' | '-' | '_') {
                flush(&mut current, numeric)?;
            } else {
                return Err(Error::version(input, format!("unexpected character '{c}'")));
            }
        }
        flush(&mut current, numeric)?;

        if segments.is_empty() {
            return Err(Error::version(input, "no version segments"));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The version string as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this is the special `develop` version.
    pub fn is_develop(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::Alpha(s)] if s == DEVELOP)
    }

    /// Whether every segment of `self` matches the start of `other`.
    pub fn is_prefix_of(&self, other: &Version) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a == b)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_develop(), other.is_develop()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            // Vec ordering: first differing segment, then length.
            (false, false) => self.segments.cmp(&other.segments),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A `lo:hi` range. Either bound may be open; the upper bound is
/// prefix-inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    start: Option<Version>,
    end: Option<Version>,
}

impl VersionRange {
    pub fn new(start: Option<Version>, end: Option<Version>) -> Self {
        Self { start, end }
    }

    /// The range containing every version.
    pub fn any() -> Self {
        Self::new(None, None)
    }

    pub fn start(&self) -> Option<&Version> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&Version> {
        self.end.as_ref()
    }

    pub fn is_any(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a single version lies inside the range.
    pub fn contains(&self, version: &Version) -> bool {
        let above = self.start.as_ref().is_none_or(|s| version >= s);
        let below = self
            .end
            .as_ref()
            .is_none_or(|e| version <= e || e.is_prefix_of(version));
        above && below
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = &self.start {
            write!(f, "{start}")?;
        }
        f.write_str(":")?;
        if let Some(end) = &self.end {
            write!(f, "{end}")?;
        }
        Ok(())
    }
}

/// One element of a [`VersionList`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionItem {
    Exact(Version),
    Range(VersionRange),
}

impl VersionItem {
    fn lower(&self) -> Option<&Version> {
        match self {
            Self::Exact(v) => Some(v),
            Self::Range(r) => r.start(),
        }
    }

    fn upper(&self) -> Option<&Version> {
        match self {
            Self::Exact(v) => Some(v),
            Self::Range(r) => r.end(),
        }
    }

    /// Whether every version described by `self` is also described by
    /// `other`.
    fn is_within(&self, other: &VersionItem) -> bool {
        let lower_ok = match (self.lower(), other.lower()) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(s), Some(o)) => s >= o,
        };
        let upper_ok = match (self.upper(), other.upper()) {
            (_, None) => true,
            (None, Some(_)) => false,
            // `1.4` as an upper bound covers all of `1.4.*`, so a shorter
            // bound only fits under a longer one when it is not its prefix.
            (Some(s), Some(o)) => o.is_prefix_of(s) || (s < o && !s.is_prefix_of(o)),
        };
        lower_ok && upper_ok
    }

    fn parse(input: &str) -> Result<Self> {
        match input.split_once(':') {
            Some((lo, hi)) => {
                let bound = |s: &str| -> Result<Option<Version>> {
                    let s = s.trim();
                    if s.is_empty() {
                        Ok(None)
                    } else {
                        Version::parse(s).map(Some)
                    }
                };
                let range = VersionRange::new(bound(lo)?, bound(hi)?);
                if let (Some(s), Some(e)) = (range.start(), range.end()) {
                    if s > e && !e.is_prefix_of(s) {
                        return Err(Error::version(input, "range start is after its end"));
                    }
                }
                Ok(Self::Range(range))
            }
            None => Version::parse(input).map(Self::Exact),
        }
    }
}

/// Open lower bounds sort first, open upper bounds sort last, and an exact
/// version sorts before the equivalent `v:v` range.
impl Ord for VersionItem {
    fn cmp(&self, other: &Self) -> Ordering {
        let upper = |item: &VersionItem, other: &VersionItem| match (item.upper(), other.upper()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        };
        let kind = |item: &VersionItem| matches!(item, VersionItem::Range(_));

        self.lower()
            .cmp(&other.lower())
            .then_with(|| upper(self, other))
            .then_with(|| kind(self).cmp(&kind(other)))
    }
}

impl PartialOrd for VersionItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::Range(r) => write!(f, "{r}"),
        }
    }
}

/// A comma-separated list of versions and ranges, e.g. `1.2:1.4,1.6`.
///
/// Items are kept sorted and deduplicated so that equal lists compare
/// equal regardless of how they were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionList {
    items: Vec<VersionItem>,
}

impl VersionList {
    /// The unconstrained list (`:`).
    pub fn any() -> Self {
        Self {
            items: vec![VersionItem::Range(VersionRange::any())],
        }
    }

    /// A list holding exactly one version.
    pub fn exact(version: Version) -> Self {
        Self {
            items: vec![VersionItem::Exact(version)],
        }
    }

    /// Parse a version list. An empty string or `:` is [`VersionList::any`].
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::any());
        }

        let mut items = Vec::new();
        for part in trimmed.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(Error::version(input, "empty list element"));
            }
            items.push(VersionItem::parse(part)?);
        }
        items.sort();
        items.dedup();

        Ok(Self { items })
    }

    pub fn items(&self) -> &[VersionItem] {
        &self.items
    }

    /// Whether the list accepts every version.
    pub fn is_any(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, VersionItem::Range(r) if r.is_any()))
    }

    /// Whether the list names exactly one version.
    pub fn is_concrete(&self) -> bool {
        self.concrete_version().is_some()
    }

    /// The single version of a concrete list.
    pub fn concrete_version(&self) -> Option<&Version> {
        match self.items.as_slice() {
            [VersionItem::Exact(v)] => Some(v),
            _ => None,
        }
    }

    /// Whether a single version is described by any item of the list.
    pub fn contains(&self, version: &Version) -> bool {
        let item = VersionItem::Exact(version.clone());
        self.items.iter().any(|other| item.is_within(other))
    }
}

impl Default for VersionList {
    fn default() -> Self {
        Self::any()
    }
}

impl From<Version> for VersionList {
    fn from(version: Version) -> Self {
        Self::exact(version)
    }
}

impl Satisfies for VersionList {
    /// Containment: every item of `self` lies inside some item of the
    /// constraint.
    fn satisfies(&self, constraint: &VersionList) -> bool {
        self.items
            .iter()
            .all(|item| constraint.items.iter().any(|other| item.is_within(other)))
    }
}

impl Satisfies<VersionList> for Version {
    fn satisfies(&self, constraint: &VersionList) -> bool {
        constraint.contains(self)
    }
}

impl fmt::Display for VersionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl FromStr for VersionList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
