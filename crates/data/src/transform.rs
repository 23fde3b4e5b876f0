//! Strategies that reshape a raw dataset into normalized items or trees.

mod fields;
mod hierarchy;
mod records;

use serde::Deserialize;
use serde::Serialize;

pub use crate::transform::fields::MultiFieldSum;
pub use crate::transform::hierarchy::HierarchyReshape;
pub use crate::transform::hierarchy::PathSegment;
pub use crate::transform::records::GroupSum;
pub use crate::transform::records::Passthrough;

use crate::dataset::RawDataset;
use crate::error::TransformResult;
use crate::filter::FilterSpec;
use crate::item::Normalized;
use crate::item::NormalizedItem;
use crate::key::compare_keys;

/// Reshapes a raw dataset according to the current control state.
///
/// An empty result is not an error: it is returned as an empty
/// [`Normalized`] and renders as an empty scene.
pub trait Transformer: Send + Sync {
    fn normalize(&self, raw: &RawDataset, filter: &FilterSpec) -> TransformResult<Normalized>;
}

/// The order of the emitted items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    /// Keep the order in which the items were first seen.
    Source,
    /// Ascending by key; numeric keys sort chronologically.
    #[default]
    KeyAscending,
    /// Descending by value (ranked). Ties break on the key.
    ValueDescending,
}

impl Order {
    pub fn apply(self, items: &mut [NormalizedItem]) {
        match self {
            Order::Source => {}
            Order::KeyAscending => items.sort_by(|a, b| compare_keys(&a.key, &b.key)),
            Order::ValueDescending => items.sort_by(|a, b| {
                b.value
                    .total_cmp(&a.value)
                    .then_with(|| compare_keys(&a.key, &b.key))
            }),
        }
    }
}

/// A transformer described by configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TransformSpec {
    Passthrough(Passthrough),
    GroupSum(GroupSum),
    MultiFieldSum(MultiFieldSum),
    Hierarchy(HierarchyReshape),
}

impl Transformer for TransformSpec {
    fn normalize(&self, raw: &RawDataset, filter: &FilterSpec) -> TransformResult<Normalized> {
        match self {
            TransformSpec::Passthrough(t) => t.normalize(raw, filter),
            TransformSpec::GroupSum(t) => t.normalize(raw, filter),
            TransformSpec::MultiFieldSum(t) => t.normalize(raw, filter),
            TransformSpec::Hierarchy(t) => t.normalize(raw, filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranked_order_breaks_ties_on_key() {
        let mut items = vec![
            NormalizedItem::new("b", 1.0),
            NormalizedItem::new("c", 5.0),
            NormalizedItem::new("a", 1.0),
        ];

        Order::ValueDescending.apply(&mut items);

        let keys: Vec<_> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn transform_spec_from_config() {
        let spec: TransformSpec = serde_json::from_value(serde_json::json!({
            "kind": "group-sum",
            "key_field": "jahr",
            "value_field": "emission",
        }))
        .unwrap();

        assert!(matches!(spec, TransformSpec::GroupSum(_)));
    }
}
