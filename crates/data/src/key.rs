use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::error::TransformError;
use crate::error::TransformResult;

const KEY_SEPARATOR: &str = ", ";

/// How the members of a composite key are ordered before joining.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "order", content = "names")]
pub enum KeyOrder {
    #[default]
    Lexicographic,
    /// Position in the given list; names that are not listed go last.
    Reference(Vec<String>),
}

/// Builds the lookup key for a set of independent selections.
///
/// The result does not depend on the order in which the members were
/// selected.
pub fn composite_key<S: AsRef<str>>(selected: &[S], order: &KeyOrder) -> TransformResult<String> {
    if selected.is_empty() {
        return Err(TransformError::EmptySelection(String::from(
            "Please select at least one app!",
        )));
    }

    let mut members: Vec<&str> = selected.iter().map(|s| s.as_ref()).collect();

    match order {
        KeyOrder::Lexicographic => members.sort_unstable(),
        KeyOrder::Reference(reference) => {
            let rank = |name: &str| reference.iter().position(|r| r == name).unwrap_or(usize::MAX);
            members.sort_unstable_by(|a, b| rank(*a).cmp(&rank(*b)).then_with(|| a.cmp(b)));
        }
    }
    members.dedup();

    Ok(members.join(KEY_SEPARATOR))
}

/// Orders bucket keys numerically when both parse as numbers, otherwise
/// lexicographically. Years therefore sort chronologically.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_is_independent_of_selection_order() {
        let order = KeyOrder::Lexicographic;

        let a = composite_key(&["TikTok", "Instagram"], &order).unwrap();
        let b = composite_key(&["Instagram", "TikTok"], &order).unwrap();

        assert_eq!(a, "Instagram, TikTok");
        assert_eq!(a, b);
    }

    #[test]
    fn composite_key_follows_reference_order() {
        let order = KeyOrder::Reference(
            ["TikTok", "Instagram", "Netflix", "YouTube", "Gaming"]
                .map(String::from)
                .to_vec(),
        );

        let key = composite_key(&["Gaming", "Instagram", "TikTok"], &order).unwrap();

        assert_eq!(key, "TikTok, Instagram, Gaming");
    }

    #[test]
    fn unknown_members_go_last() {
        let order = KeyOrder::Reference(vec![String::from("Netflix")]);

        let key = composite_key(&["Zoom", "Netflix", "Discord"], &order).unwrap();

        assert_eq!(key, "Netflix, Discord, Zoom");
    }

    #[test]
    fn empty_selection_is_an_error() {
        let selected: [&str; 0] = [];

        let error = composite_key(&selected, &KeyOrder::Lexicographic).unwrap_err();

        assert!(matches!(error, TransformError::EmptySelection(_)));
    }

    #[test]
    fn duplicates_are_collapsed() {
        let key = composite_key(&["Netflix", "Netflix"], &KeyOrder::Lexicographic).unwrap();

        assert_eq!(key, "Netflix");
    }

    #[test]
    fn keys_sort_chronologically() {
        let mut keys = vec!["2000", "1990", "995", "total"];
        keys.sort_by(|a, b| compare_keys(a, b));

        assert_eq!(keys, vec!["995", "1990", "2000", "total"]);
    }
}
