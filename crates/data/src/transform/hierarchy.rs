use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use crate::dataset::RawDataset;
use crate::dataset::as_number;
use crate::error::TransformError;
use crate::error::TransformResult;
use crate::filter::FilterSpec;
use crate::item::HierarchicalNode;
use crate::item::Normalized;
use crate::key::KeyOrder;
use crate::key::composite_key;
use crate::transform::Transformer;

const ROOT_NAME: &str = "root";

/// One step of the walk down to the mapping that becomes the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathSegment {
    Literal(String),
    /// The selected bucket, translated through `bucket_map`.
    Bucket,
    /// The composite key of the selected combination.
    Combination,
}

/// Wraps a `name -> value` mapping as the children of a synthetic root.
///
/// Nested mappings become branches, so deeper documents keep their shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyReshape {
    pub path: Vec<PathSegment>,
    /// Control values to document keys, e.g. `less3 -> less_than_3_hours`.
    pub bucket_map: BTreeMap<String, String>,
    pub key_order: KeyOrder,
    /// Document names to display names, e.g. `Ice Cream -> ice_cream`.
    pub names: BTreeMap<String, String>,
    /// Round leaf values to whole numbers.
    pub round: bool,
    /// Keep only the highlighted child when a highlight is selected.
    pub highlight: bool,
}

impl HierarchyReshape {
    pub fn new(path: Vec<PathSegment>) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    fn resolve_path(&self, filter: &FilterSpec) -> TransformResult<Vec<String>> {
        self.path
            .iter()
            .map(|segment| match segment {
                PathSegment::Literal(literal) => Ok(literal.clone()),
                PathSegment::Bucket => {
                    let bucket = filter.bucket.as_ref().ok_or_else(|| {
                        TransformError::EmptySelection(String::from("Please select an option!"))
                    })?;
                    Ok(self.bucket_map.get(bucket).unwrap_or(bucket).clone())
                }
                PathSegment::Combination => composite_key(filter.combination.as_slice(), &self.key_order),
            })
            .collect()
    }

    fn node(&self, name: &str, value: &Value) -> TransformResult<HierarchicalNode> {
        let display = self.names.get(name).map_or(name, String::as_str);

        match value {
            Value::Object(map) => Ok(HierarchicalNode::branch(display, self.children(map)?)),
            value => {
                let number = as_number(value)
                    .ok_or_else(|| TransformError::field(name, format!("is not numeric: {value}")))?;
                let number = if self.round { number.round() } else { number };

                Ok(HierarchicalNode::leaf(display, number))
            }
        }
    }

    fn children(&self, map: &Map<String, Value>) -> TransformResult<Vec<HierarchicalNode>> {
        map.iter().map(|(name, value)| self.node(name, value)).collect()
    }
}

impl Transformer for HierarchyReshape {
    fn normalize(&self, raw: &RawDataset, filter: &FilterSpec) -> TransformResult<Normalized> {
        let path = self.resolve_path(filter)?;
        debug!(path = %path.join("/"), "looking up hierarchy");

        let mapping = raw.lookup(path.as_slice())?;
        let Value::Object(map) = mapping else {
            return Err(TransformError::field(
                path.last().map_or(ROOT_NAME, String::as_str),
                "must be a mapping of names to values",
            ));
        };

        let mut children = self.children(map)?;

        if self.highlight {
            if let Some(ref highlight) = filter.highlight {
                children.retain(|child| &child.name == highlight);
            }
        }

        Ok(Normalized::Tree(HierarchicalNode::branch(ROOT_NAME, children)))
    }
}
