//! Namespace version ordering.
//!
//! Schema documents carry no dependency graph, so recency is derived from the
//! qualified names alone: `Vendor.v1_2_0.Type` sorts after `Vendor.v1_0_3.Type`
//! and every versioned name sorts after the unversioned `Vendor.Type`.

use std::cmp::Ordering;

/// Parsed `vMAJOR[_MINOR[_REVISION]]` namespace segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NamespaceVersion {
    /// Major version.
    pub major: i64,
    /// Minor version.
    pub minor: i64,
    /// Revision.
    pub revision: i64,
}

impl NamespaceVersion {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: i64, minor: i64, revision: i64) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Parses a version segment such as `v1_2_0`.
    ///
    /// The leading `v` is optional and missing parts default to zero. A part
    /// that is not a number is read as zero together with every part after it.
    #[must_use]
    pub fn parse(segment: &str) -> Self {
        let digits = segment.strip_prefix('v').unwrap_or(segment);
        let mut parts = digits.splitn(3, '_');
        let mut version = Self::default();

        let Some(Ok(major)) = parts.next().map(str::parse::<i64>) else {
            return version;
        };
        version.major = major;

        let Some(Ok(minor)) = parts.next().map(str::parse::<i64>) else {
            return version;
        };
        version.minor = minor;

        if let Some(Ok(revision)) = parts.next().map(str::parse::<i64>) {
            version.revision = revision;
        }
        version
    }
}

/// Splits a qualified name into `(vendor, middle, rest)` at its first two dots.
///
/// Missing components are empty; `rest` keeps any further dots.
#[must_use]
pub fn split_qualified(name: &str) -> (&str, &str, &str) {
    let Some((vendor, tail)) = name.split_once('.') else {
        return (name, "", "");
    };
    match tail.split_once('.') {
        Some((middle, rest)) => (vendor, middle, rest),
        None => (vendor, tail, ""),
    }
}

/// Returns the vendor prefix of a qualified name or namespace.
#[must_use]
pub fn vendor_of(name: &str) -> &str {
    split_qualified(name).0
}

/// Returns `(vendor, bare type name)` with any version segment removed.
///
/// `Vendor.v1_0_0.Widget` and `Vendor.Widget` both yield `("Vendor", "Widget")`.
#[must_use]
pub fn unversioned(name: &str) -> (&str, &str) {
    match split_qualified(name) {
        (vendor, middle, "") => (vendor, middle),
        (vendor, _, rest) => (vendor, rest),
    }
}

/// Compares two qualified type names, oldest first.
///
/// Vendors compare lexicographically. Unversioned names sort before versioned
/// ones of the same vendor and compare by their second component. Versioned
/// names compare by major, minor and revision numerically, then by type name.
/// Remaining ties are broken by the full string, so distinct names never
/// compare equal.
#[must_use]
pub fn compare_qualified(a: &str, b: &str) -> Ordering {
    let (a_vendor, a_middle, a_rest) = split_qualified(a);
    let (b_vendor, b_middle, b_rest) = split_qualified(b);

    a_vendor
        .cmp(b_vendor)
        .then_with(|| match (a_rest.is_empty(), b_rest.is_empty()) {
            (true, true) => a_middle.cmp(b_middle),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => NamespaceVersion::parse(a_middle)
                .cmp(&NamespaceVersion::parse(b_middle))
                .then_with(|| a_rest.cmp(b_rest)),
        })
        .then_with(|| a.cmp(b))
}

/// Sorts qualified names in place, oldest first.
pub fn sort_qualified<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_qualified(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(NamespaceVersion::parse("v1_2_3"), NamespaceVersion::new(1, 2, 3));
        assert_eq!(NamespaceVersion::parse("v2"), NamespaceVersion::new(2, 0, 0));
        assert_eq!(NamespaceVersion::parse("v1_4"), NamespaceVersion::new(1, 4, 0));
        assert_eq!(NamespaceVersion::parse("1_0_1"), NamespaceVersion::new(1, 0, 1));
        assert_eq!(NamespaceVersion::parse("Chassis"), NamespaceVersion::default());
        assert_eq!(NamespaceVersion::parse("v1_x_3"), NamespaceVersion::new(1, 0, 0));
        assert_eq!(NamespaceVersion::parse("v1_2_x"), NamespaceVersion::new(1, 2, 0));
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(
            split_qualified("Chassis.v1_0_0.Chassis"),
            ("Chassis", "v1_0_0", "Chassis")
        );
        assert_eq!(split_qualified("Chassis.Chassis"), ("Chassis", "Chassis", ""));
        assert_eq!(split_qualified("Chassis"), ("Chassis", "", ""));
        assert_eq!(split_qualified("A.v1.B.C"), ("A", "v1", "B.C"));
    }

    #[test]
    fn test_unversioned() {
        assert_eq!(unversioned("Vendor.v1_0_0.Widget"), ("Vendor", "Widget"));
        assert_eq!(unversioned("Vendor.Widget"), ("Vendor", "Widget"));
        assert_eq!(vendor_of("Vendor.v2_3_1.Widget"), "Vendor");
    }

    #[test]
    fn test_revision_order() {
        assert_eq!(
            compare_qualified("Widget.v1_0_0.Widget", "Widget.v1_0_2.Widget"),
            Ordering::Less
        );
        assert_eq!(
            compare_qualified("Widget.v2_0_0.Widget", "Widget.v1_0_2.Widget"),
            Ordering::Greater
        );
        assert_eq!(
            compare_qualified("Widget.v2_0_0.Widget", "Widget.v1_0_0.Widget"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert_eq!(
            compare_qualified("Widget.v1_10_0.Widget", "Widget.v1_9_0.Widget"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_vendor_first() {
        assert_eq!(
            compare_qualified("Alpha.v9_0_0.Widget", "Beta.v1_0_0.Widget"),
            Ordering::Less
        );
    }

    #[test]
    fn test_unversioned_before_versioned() {
        assert_eq!(
            compare_qualified("Chassis.Chassis", "Chassis.v1_0_0.Chassis"),
            Ordering::Less
        );
        assert_eq!(
            compare_qualified("Chassis.v1_0_0.Chassis", "Chassis.Chassis"),
            Ordering::Greater
        );
        assert_eq!(
            compare_qualified("Chassis.Chassis", "Chassis.Links"),
            Ordering::Less
        );
    }

    #[test]
    fn test_type_name_after_version() {
        assert_eq!(
            compare_qualified("Chassis.v1_0_0.Links", "Chassis.v1_0_0.Chassis"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_reflexive_and_distinct() {
        assert_eq!(compare_qualified("A.v1_0_0.B", "A.v1_0_0.B"), Ordering::Equal);
        assert_ne!(compare_qualified("A.v1_0.B", "A.v1_0_0.B"), Ordering::Equal);
    }

    #[test]
    fn test_total_order_over_sample() {
        let names = [
            "Chassis.Chassis",
            "Chassis.v1_0_0.Chassis",
            "Chassis.v1_10_0.Chassis",
            "Chassis.v1_9_0.Chassis",
            "Chassis.v1_9_0.Links",
            "Chassis.v2",
            "Chassis.z",
            "Chassis.v1x.T",
            "Chassis",
            "Resource.v1_0_0.Resource",
            "Resource.Resource",
            "Resource.v1_0.Resource",
        ];
        for a in names {
            assert_eq!(compare_qualified(a, a), Ordering::Equal);
            for b in names {
                assert_eq!(compare_qualified(a, b), compare_qualified(b, a).reverse());
                for c in names {
                    if compare_qualified(a, b) == Ordering::Less
                        && compare_qualified(b, c) == Ordering::Less
                    {
                        assert_eq!(compare_qualified(a, c), Ordering::Less, "{a} {b} {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_sort_qualified() {
        let mut names = vec![
            "Widget.v2_0_0.Widget",
            "Widget.Widget",
            "Widget.v1_0_2.Widget",
            "Widget.v1_0_0.Widget",
        ];
        sort_qualified(&mut names);
        assert_eq!(
            names,
            vec![
                "Widget.Widget",
                "Widget.v1_0_0.Widget",
                "Widget.v1_0_2.Widget",
                "Widget.v2_0_0.Widget",
            ]
        );
    }
}
