//! Pairwise preference comparisons.
//!
//! Every comparison returns [`Ordering::Less`] when `a` is preferred over
//! `b`. Two flavours exist:
//!
//! - **component** comparisons look values up in the raw preference list
//!   by their display string (variants, architectures);
//! - **spec** comparisons match values against the compiled list, so a
//!   configured range or partial spec covers many candidates (versions,
//!   compilers, providers).

use std::cmp::Ordering;
use std::fmt;

use pkgpref_spec::{Architecture, CompilerSpec, Spec, VariantMap, VersionList};

use crate::Result;
use crate::category::Category;
use crate::constraint::Candidate;
use crate::context::PreferenceContext;
use crate::index::match_position;

/// How a spec comparison orders inputs that are absent, or abstract when no
/// sub-key is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbsentPolicy {
    /// An absent `a` sorts first; otherwise an absent `b` sorts last. When
    /// both are absent `a` still sorts first, so the result is not
    /// antisymmetric.
    #[default]
    Asymmetric,
    /// Absent inputs sort before present ones.
    Minimal,
    /// Absent inputs sort after present ones.
    Maximal,
}

impl AbsentPolicy {
    /// The ordering implied by absence alone. `None` when neither input is
    /// absent, or when both are and the policy is symmetric.
    fn order(self, a_absent: bool, b_absent: bool) -> Option<Ordering> {
        match (self, a_absent, b_absent) {
            (_, false, false) => None,
            (Self::Asymmetric, true, _) => Some(Ordering::Less),
            (Self::Asymmetric, false, true) => Some(Ordering::Greater),
            (_, true, true) => None,
            (Self::Minimal, true, false) => Some(Ordering::Less),
            (Self::Minimal, false, true) => Some(Ordering::Greater),
            (Self::Maximal, true, false) => Some(Ordering::Greater),
            (Self::Maximal, false, true) => Some(Ordering::Less),
        }
    }
}

/// Three-way comparisons driven by a [`PreferenceContext`].
#[derive(Debug, Clone, Copy)]
pub struct Comparator<'a> {
    context: &'a PreferenceContext,
}

impl<'a> Comparator<'a> {
    pub fn new(context: &'a PreferenceContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &'a PreferenceContext {
        self.context
    }

    /// Compare two values by literal membership in the preference list.
    ///
    /// An absent value sorts first. Listed values sort before unlisted
    /// ones and among themselves by position; two unlisted values fall
    /// back to their natural order.
    pub fn component_compare<T: Ord + fmt::Display>(
        &self,
        package: &str,
        category: Category,
        a: Option<&T>,
        b: Option<&T>,
        sub_key: Option<&str>,
    ) -> Result<Ordering> {
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            (a, b) => return Ok(a.is_some().cmp(&b.is_some())),
        };

        let order = self.context.cached_order(package, category, sub_key)?;
        let position = |value: &T| {
            let value = value.to_string();
            order.raw.iter().position(|entry| *entry == value)
        };

        Ok(match (position(a), position(b)) {
            (Some(i), Some(j)) => i.cmp(&j),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        })
    }

    /// Compare two values by the first compiled preference each is
    /// compatible with.
    ///
    /// Absent inputs are ordered by `policy`; without a `sub_key`,
    /// abstract inputs count as absent. The earlier match wins. Two values
    /// matching the same entry are ordered by descending natural order.
    /// Values matching nothing sort last, by natural order, reversed when
    /// `reverse_tiebreak` is set.
    #[allow(clippy::too_many_arguments)]
    pub fn spec_compare<C: Candidate>(
        &self,
        package: &str,
        category: Category,
        a: Option<&C>,
        b: Option<&C>,
        reverse_tiebreak: bool,
        sub_key: Option<&str>,
        policy: AbsentPolicy,
    ) -> Result<Ordering> {
        let present = |c: &&C| sub_key.is_some() || c.is_concrete();
        let (a, b) = match (a.filter(|c| present(c)), b.filter(|c| present(c))) {
            (Some(a), Some(b)) => (a, b),
            (pa, pb) => {
                return Ok(policy
                    .order(pa.is_none(), pb.is_none())
                    .unwrap_or_else(|| a.cmp(&b)));
            }
        };

        let order = self.context.compiled_order(package, category, sub_key)?;
        Ok(match (match_position(&order, a), match_position(&order, b)) {
            (Some(i), Some(j)) if i == j => b.cmp(a),
            (Some(i), Some(j)) => i.cmp(&j),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) if reverse_tiebreak => b.cmp(a),
            (None, None) => a.cmp(b),
        })
    }

    /// Compare two providers of `vpkg` for `package`.
    ///
    /// `provider_compare("scorep", "mpi", mvapich, openmpi)` is `Less` when
    /// scorep prefers mvapich.
    pub fn provider_compare(&self, package: &str, vpkg: &str, a: &Spec, b: &Spec) -> Result<Ordering> {
        self.provider_compare_with_policy(package, vpkg, a, b, AbsentPolicy::default())
    }

    pub fn provider_compare_with_policy(
        &self,
        package: &str,
        vpkg: &str,
        a: &Spec,
        b: &Spec,
        policy: AbsentPolicy,
    ) -> Result<Ordering> {
        self.spec_compare(package, Category::Providers, Some(a), Some(b), false, Some(vpkg), policy)
    }

    /// Compare two versions of `package`. Unlisted versions sort newest
    /// first.
    pub fn version_compare(
        &self,
        package: &str,
        a: Option<&VersionList>,
        b: Option<&VersionList>,
    ) -> Result<Ordering> {
        self.version_compare_with_policy(package, a, b, AbsentPolicy::default())
    }

    pub fn version_compare_with_policy(
        &self,
        package: &str,
        a: Option<&VersionList>,
        b: Option<&VersionList>,
        policy: AbsentPolicy,
    ) -> Result<Ordering> {
        self.spec_compare(package, Category::Version, a, b, true, None, policy)
    }

    /// Compare two compilers for `package`. Unlisted compilers sort in
    /// natural order.
    pub fn compiler_compare(
        &self,
        package: &str,
        a: Option<&CompilerSpec>,
        b: Option<&CompilerSpec>,
    ) -> Result<Ordering> {
        self.compiler_compare_with_policy(package, a, b, AbsentPolicy::default())
    }

    pub fn compiler_compare_with_policy(
        &self,
        package: &str,
        a: Option<&CompilerSpec>,
        b: Option<&CompilerSpec>,
        policy: AbsentPolicy,
    ) -> Result<Ordering> {
        self.spec_compare(package, Category::Compiler, a, b, false, None, policy)
    }

    pub fn variant_compare(&self, package: &str, a: &VariantMap, b: &VariantMap) -> Result<Ordering> {
        self.component_compare(package, Category::Variants, Some(a), Some(b), None)
    }

    pub fn architecture_compare(
        &self,
        package: &str,
        a: Option<&Architecture>,
        b: Option<&Architecture>,
    ) -> Result<Ordering> {
        self.component_compare(package, Category::Architecture, a, b, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgpref_config::{PackageEntry, PackagesConfig};
    use rstest::rstest;

    fn vl(s: &str) -> VersionList {
        VersionList::parse(s).unwrap()
    }

    fn cs(s: &str) -> CompilerSpec {
        CompilerSpec::parse(s).unwrap()
    }

    fn context(entry: PackageEntry) -> PreferenceContext {
        PreferenceContext::new(PackagesConfig::new().with_package("mpileaks", entry))
    }

    fn version_context(order: &[&str]) -> PreferenceContext {
        context(PackageEntry {
            version: order.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_repeated_compares_share_one_cached_list() {
        let context = version_context(&["1.2.8", "1.3:"]);
        let cmp = context.comparator();
        for _ in 0..3 {
            assert_eq!(
                cmp.version_compare("mpileaks", Some(&vl("1.4")), Some(&vl("1.2.8"))).unwrap(),
                Ordering::Greater
            );
        }
        assert_eq!(context.cache_len(), 1);
    }

    #[rstest]
    #[case(AbsentPolicy::Asymmetric, true, true, Some(Ordering::Less))]
    #[case(AbsentPolicy::Asymmetric, true, false, Some(Ordering::Less))]
    #[case(AbsentPolicy::Asymmetric, false, true, Some(Ordering::Greater))]
    #[case(AbsentPolicy::Minimal, true, true, None)]
    #[case(AbsentPolicy::Minimal, true, false, Some(Ordering::Less))]
    #[case(AbsentPolicy::Minimal, false, true, Some(Ordering::Greater))]
    #[case(AbsentPolicy::Maximal, true, true, None)]
    #[case(AbsentPolicy::Maximal, true, false, Some(Ordering::Greater))]
    #[case(AbsentPolicy::Maximal, false, true, Some(Ordering::Less))]
    #[case(AbsentPolicy::Maximal, false, false, None)]
    fn test_absent_policy(
        #[case] policy: AbsentPolicy,
        #[case] a_absent: bool,
        #[case] b_absent: bool,
        #[case] expected: Option<Ordering>,
    ) {
        assert_eq!(policy.order(a_absent, b_absent), expected);
    }

    #[test]
    fn test_version_preference_order() {
        let context = version_context(&["1.2.8", "1.3:"]);
        let cmp = context.comparator();

        let ord = cmp.version_compare("mpileaks", Some(&vl("1.2.8")), Some(&vl("1.4"))).unwrap();
        assert_eq!(ord, Ordering::Less);
        let ord = cmp.version_compare("mpileaks", Some(&vl("1.4")), Some(&vl("1.2.8"))).unwrap();
        assert_eq!(ord, Ordering::Greater);
    }

    #[test]
    fn test_same_entry_prefers_naturally_greater() {
        let context = version_context(&["1.3:"]);
        let cmp = context.comparator();

        let ord = cmp.version_compare("mpileaks", Some(&vl("1.5")), Some(&vl("1.4"))).unwrap();
        assert_eq!(ord, Ordering::Less);
        let ord = cmp.version_compare("mpileaks", Some(&vl("1.4")), Some(&vl("1.5"))).unwrap();
        assert_eq!(ord, Ordering::Greater);
    }

    #[test]
    fn test_listed_beats_unlisted() {
        let context = version_context(&["1.2.8"]);
        let cmp = context.comparator();

        let ord = cmp.version_compare("mpileaks", Some(&vl("2.0")), Some(&vl("1.2.8"))).unwrap();
        assert_eq!(ord, Ordering::Greater);
    }

    #[test]
    fn test_unlisted_tiebreak_direction() {
        let context = PreferenceContext::new(PackagesConfig::new());
        let cmp = context.comparator();

        // Versions: newest first.
        let ord = cmp.version_compare("zlib", Some(&vl("1.2.8")), Some(&vl("1.2.11"))).unwrap();
        assert_eq!(ord, Ordering::Greater);

        // Compilers: natural order.
        let ord = cmp.compiler_compare("zlib", Some(&cs("clang@3.8")), Some(&cs("gcc@5.4"))).unwrap();
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn test_abstract_inputs_follow_policy() {
        let context = version_context(&["1.2.8"]);
        let cmp = context.comparator();
        let abstract_version = vl("1.2:");
        let concrete = vl("1.2.8");

        let ord = cmp
            .version_compare("mpileaks", Some(&abstract_version), Some(&concrete))
            .unwrap();
        assert_eq!(ord, Ordering::Less);
        let ord = cmp
            .version_compare("mpileaks", Some(&concrete), Some(&abstract_version))
            .unwrap();
        assert_eq!(ord, Ordering::Greater);
        let ord = cmp.version_compare("mpileaks", None, None).unwrap();
        assert_eq!(ord, Ordering::Less);

        let ord = cmp
            .version_compare_with_policy("mpileaks", Some(&abstract_version), Some(&concrete), AbsentPolicy::Maximal)
            .unwrap();
        assert_eq!(ord, Ordering::Greater);
        let ord = cmp
            .version_compare_with_policy("mpileaks", None, None, AbsentPolicy::Minimal)
            .unwrap();
        assert_eq!(ord, Ordering::Equal);
        let ord = cmp
            .version_compare_with_policy("mpileaks", None, Some(&abstract_version), AbsentPolicy::Minimal)
            .unwrap();
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn test_compiler_preference() {
        let context = context(PackageEntry {
            compiler: vec!["gcc@4.9:".into(), "clang".into()],
            ..Default::default()
        });
        let cmp = context.comparator();

        let ord = cmp
            .compiler_compare("mpileaks", Some(&cs("clang@3.8")), Some(&cs("gcc@5.4")))
            .unwrap();
        assert_eq!(ord, Ordering::Greater);
        let ord = cmp
            .compiler_compare("mpileaks", Some(&cs("gcc@4.8")), Some(&cs("intel@16")))
            .unwrap();
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn test_provider_compare_allows_abstract_specs() {
        let mut entry = PackageEntry::default();
        entry
            .providers
            .insert("mpi".into(), vec!["mvapich".into(), "openmpi".into()]);
        let context = PreferenceContext::new(PackagesConfig::new().with_package("scorep", entry));
        let cmp = context.comparator();

        let mvapich = Spec::parse("mvapich").unwrap();
        let openmpi = Spec::parse("openmpi").unwrap();
        assert_eq!(cmp.provider_compare("scorep", "mpi", &mvapich, &openmpi).unwrap(), Ordering::Less);
        assert_eq!(cmp.provider_compare("scorep", "mpi", &openmpi, &mvapich).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_component_compare_by_literal_membership() {
        let context = context(PackageEntry {
            architecture: vec!["linux-rhel7-x86_64".into(), "linux-rhel6-x86_64".into()],
            ..Default::default()
        });
        let cmp = context.comparator();
        let arch = |s: &str| Architecture::parse(s).unwrap();

        let rhel6 = arch("linux-rhel6-x86_64");
        let rhel7 = arch("linux-rhel7-x86_64");
        let ubuntu = arch("linux-ubuntu16-x86_64");
        let darwin = arch("darwin-sierra-x86_64");

        assert_eq!(cmp.architecture_compare("mpileaks", Some(&rhel7), Some(&rhel6)).unwrap(), Ordering::Less);
        assert_eq!(cmp.architecture_compare("mpileaks", Some(&ubuntu), Some(&rhel6)).unwrap(), Ordering::Greater);
        assert_eq!(cmp.architecture_compare("mpileaks", Some(&ubuntu), Some(&darwin)).unwrap(), Ordering::Greater);
        // A prefix of a listed entry is not a member.
        let partial = arch("linux-rhel7");
        assert_eq!(cmp.architecture_compare("mpileaks", Some(&partial), Some(&rhel6)).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_component_compare_absent() {
        let context = PreferenceContext::new(PackagesConfig::new());
        let cmp = context.comparator();
        let arch = Architecture::parse("linux").unwrap();

        assert_eq!(cmp.architecture_compare("zlib", None, Some(&arch)).unwrap(), Ordering::Less);
        assert_eq!(cmp.architecture_compare("zlib", Some(&arch), None).unwrap(), Ordering::Greater);
        assert_eq!(cmp.architecture_compare("zlib", None, None).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_variant_compare() {
        let context = context(PackageEntry {
            variants: Some(pkgpref_config::VariantsSetting::Many(vec!["+debug".into(), "~debug".into()])),
            ..Default::default()
        });
        let cmp = context.comparator();
        let variants = |s: &str| Spec::parse(s).unwrap().variants;

        let ord = cmp.variant_compare("mpileaks", &variants("~debug"), &variants("+debug")).unwrap();
        assert_eq!(ord, Ordering::Greater);
        let ord = cmp.variant_compare("mpileaks", &variants("+debug"), &variants("+debug")).unwrap();
        assert_eq!(ord, Ordering::Equal);
    }
}
