//! Numeric-aware ordering for registry instance version strings.

use crate::contract::ServiceInstance;
use std::cmp::Ordering;

/// Compares two version strings segment-wise on `.` boundaries.
///
/// Segments that both parse as integers compare numerically, otherwise
/// lexicographically; a longer version with an equal prefix compares greater.
pub(crate) fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l_num), Ok(r_num)) => l_num.cmp(&r_num),
                    _ => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Selects the highest-versioned instance; the first encountered wins ties.
pub(crate) fn max_by_version(instances: Vec<ServiceInstance>) -> Option<ServiceInstance> {
    let mut best: Option<ServiceInstance> = None;
    for candidate in instances {
        match &best {
            Some(current) if compare_versions(&candidate.version, &current.version) != Ordering::Greater => {}
            _ => best = Some(candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::{compare_versions, max_by_version};
    use crate::contract::ServiceInstance;
    use std::cmp::Ordering;

    fn instance(name: &str, version: &str) -> ServiceInstance {
        ServiceInstance {
            name: name.to_string(),
            version: version.to_string(),
            endpoint_uri: format!("https://{name}.example.org"),
        }
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        assert_eq!(compare_versions("0.0.2", "0.0.1"), Ordering::Greater);
        assert_eq!(compare_versions("0.10", "0.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.0.0", "1.0.0"), Ordering::Equal);
    }

    #[test]
    fn longer_version_with_equal_prefix_wins() {
        assert_eq!(compare_versions("1.0.1", "1.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.0", "1.0.1"), Ordering::Less);
    }

    #[test]
    fn non_numeric_segments_fall_back_to_lexicographic() {
        assert_eq!(compare_versions("1.0-rc2", "1.0-rc1"), Ordering::Greater);
    }

    #[test]
    fn max_by_version_selects_highest() {
        let selected = max_by_version(vec![
            instance("old", "0.0.1"),
            instance("new", "0.0.2"),
            instance("older", "0.0.1"),
        ])
        .expect("non-empty input");

        assert_eq!(selected.name, "new");
    }

    #[test]
    fn max_by_version_first_encountered_wins_ties() {
        let selected = max_by_version(vec![instance("first", "1.0"), instance("second", "1.0")])
            .expect("non-empty input");

        assert_eq!(selected.name, "first");
    }

    #[test]
    fn max_by_version_of_empty_is_none() {
        assert!(max_by_version(Vec::new()).is_none());
    }
}
