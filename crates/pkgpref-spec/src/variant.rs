//! Build variants: `+debug`, `~shared`, `mode=fast`, `langs=c,fortran`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::Satisfies;

/// The value of a single variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariantValue {
    Bool(bool),
    Single(String),
    Multi(BTreeSet<String>),
}

impl VariantValue {
    /// Interpret the right-hand side of `name=value`.
    ///
    /// `true`/`false` become booleans and comma-separated values become a
    /// multi-valued variant. A list that names one distinct value is that
    /// single value, so the display form parses back to the same variant.
    /// Returns `None` if a list has an empty element.
    pub fn from_assignment(value: &str) -> Option<Self> {
        match value {
            "true" | "True" => Some(Self::Bool(true)),
            "false" | "False" => Some(Self::Bool(false)),
            v if v.contains(',') => {
                let values = v
                    .split(',')
                    .map(str::trim)
                    .map(|s| (!s.is_empty()).then(|| s.to_string()))
                    .collect::<Option<BTreeSet<String>>>()?;
                if values.len() == 1 {
                    values.into_iter().next().map(Self::Single)
                } else {
                    Some(Self::Multi(values))
                }
            }
            v => Some(Self::Single(v.to_string())),
        }
    }

    fn values(&self) -> Option<BTreeSet<&str>> {
        match self {
            Self::Bool(_) => None,
            Self::Single(v) => Some(std::iter::once(v.as_str()).collect()),
            Self::Multi(vs) => Some(vs.iter().map(String::as_str).collect()),
        }
    }

    /// Whether `self`, as a candidate's value, fulfils the `constraint`.
    fn fulfils(&self, constraint: &VariantValue) -> bool {
        match (self, constraint) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (have, want) => match (have.values(), want.values()) {
                (Some(have), Some(want)) => want.is_subset(&have),
                _ => false,
            },
        }
    }

    fn fmt_named(&self, name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "+{name}"),
            Self::Bool(false) => write!(f, "~{name}"),
            Self::Single(v) => write!(f, "{name}={v}"),
            Self::Multi(vs) => {
                let joined: Vec<&str> = vs.iter().map(String::as_str).collect();
                write!(f, "{name}={}", joined.join(","))
            }
        }
    }
}

/// Variants keyed by name, kept sorted so display and ordering are
/// canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantMap(BTreeMap<String, VariantValue>);

impl VariantMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variant, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: VariantValue) -> Option<VariantValue> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&VariantValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariantValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the variants whose name passes `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|name, _| keep(name));
    }

    pub fn into_inner(self) -> BTreeMap<String, VariantValue> {
        self.0
    }
}

impl Satisfies for VariantMap {
    /// Every variant named by the constraint must be set on `self` to a
    /// compatible value.
    fn satisfies(&self, constraint: &VariantMap) -> bool {
        constraint.0.iter().all(|(name, want)| {
            self.0
                .get(name)
                .is_some_and(|have| have.fulfils(want))
        })
    }
}

impl FromIterator<(String, VariantValue)> for VariantMap {
    fn from_iter<I: IntoIterator<Item = (String, VariantValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for VariantMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            value.fmt_named(name, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn map(entries: &[(&str, VariantValue)]) -> VariantMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[rstest]
    #[case("true", VariantValue::Bool(true))]
    #[case("false", VariantValue::Bool(false))]
    #[case("fast", VariantValue::Single("fast".into()))]
    #[case("c,fortran", VariantValue::Multi(["c".to_string(), "fortran".to_string()].into()))]
    #[case("c,c", VariantValue::Single("c".into()))]
    fn test_from_assignment(#[case] input: &str, #[case] expected: VariantValue) {
        assert_eq!(VariantValue::from_assignment(input), Some(expected));
    }

    #[rstest]
    #[case("c,")]
    #[case(",")]
    #[case("c,,fortran")]
    fn test_from_assignment_rejects_empty_elements(#[case] input: &str) {
        assert_eq!(VariantValue::from_assignment(input), None);
    }

    #[test]
    fn test_display_is_sorted() {
        let variants = map(&[
            ("shared", VariantValue::Bool(false)),
            ("debug", VariantValue::Bool(true)),
            ("mode", VariantValue::Single("fast".into())),
        ]);
        assert_eq!(variants.to_string(), "+debug mode=fast ~shared");
    }

    #[test]
    fn test_satisfies_requires_constrained_variants() {
        let candidate = map(&[
            ("debug", VariantValue::Bool(true)),
            ("langs", VariantValue::from_assignment("c,cxx,fortran").unwrap()),
        ]);

        assert!(candidate.satisfies(&VariantMap::new()));
        assert!(candidate.satisfies(&map(&[("debug", VariantValue::Bool(true))])));
        assert!(!candidate.satisfies(&map(&[("debug", VariantValue::Bool(false))])));
        assert!(!candidate.satisfies(&map(&[("shared", VariantValue::Bool(true))])));
        assert!(candidate.satisfies(&map(&[("langs", VariantValue::from_assignment("c,fortran").unwrap())])));
        assert!(candidate.satisfies(&map(&[("langs", VariantValue::Single("cxx".into()))])));
        assert!(!candidate.satisfies(&map(&[("langs", VariantValue::Single("go".into()))])));
    }

    #[test]
    fn test_retain() {
        let mut variants = map(&[
            ("debug", VariantValue::Bool(true)),
            ("bogus", VariantValue::Bool(true)),
        ]);
        variants.retain(|name| name != "bogus");
        assert_eq!(variants.len(), 1);
        assert!(variants.contains("debug"));
    }
}
