use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::dataset::RawDataset;
use crate::dataset::key;
use crate::dataset::number;
use crate::error::TransformResult;
use crate::filter::FieldMatch;
use crate::filter::FilterSpec;
use crate::filter::matches_all;
use crate::item::Normalized;
use crate::item::NormalizedItem;
use crate::transform::Order;
use crate::transform::Transformer;

/// Keeps the records that match every predicate and emits one item per
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passthrough {
    #[serde(default, rename = "filter")]
    pub predicates: Vec<FieldMatch>,
    pub key_field: String,
    pub value_field: String,
    #[serde(default = "source_order")]
    pub order: Order,
}

fn source_order() -> Order {
    Order::Source
}

impl Transformer for Passthrough {
    fn normalize(&self, raw: &RawDataset, _filter: &FilterSpec) -> TransformResult<Normalized> {
        let mut items = raw
            .records()?
            .filter(|record| matches_all(&self.predicates, record))
            .map(|record| {
                Ok(NormalizedItem::new(
                    key(record, &self.key_field)?,
                    number(record, &self.value_field)?,
                ))
            })
            .collect::<TransformResult<Vec<_>>>()?;

        debug!(items = items.len(), "passthrough records kept");
        self.order.apply(&mut items);

        Ok(Normalized::Items(items))
    }
}

/// Partitions the matching records by `key_field` and sums `value_field`
/// per partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSum {
    #[serde(default, rename = "filter")]
    pub predicates: Vec<FieldMatch>,
    pub key_field: String,
    pub value_field: String,
    #[serde(default)]
    pub order: Order,
}

impl GroupSum {
    pub fn new(key_field: impl Into<String>, value_field: impl Into<String>) -> Self {
        Self {
            predicates: Vec::new(),
            key_field: key_field.into(),
            value_field: value_field.into(),
            order: Order::KeyAscending,
        }
    }

    pub fn filter(mut self, predicate: FieldMatch) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }
}

impl Transformer for GroupSum {
    fn normalize(&self, raw: &RawDataset, _filter: &FilterSpec) -> TransformResult<Normalized> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut items: Vec<NormalizedItem> = Vec::new();

        for record in raw.records()? {
            if !matches_all(&self.predicates, record) {
                continue;
            }

            let bucket = key(record, &self.key_field)?;
            let value = number(record, &self.value_field)?;

            match index.entry(bucket) {
                Entry::Occupied(entry) => items[*entry.get()].value += value,
                Entry::Vacant(entry) => {
                    items.push(NormalizedItem::new(entry.key().clone(), value));
                    entry.insert(items.len() - 1);
                }
            }
        }

        debug!(buckets = items.len(), key = %self.key_field, "grouped records");
        self.order.apply(&mut items);

        Ok(Normalized::Items(items))
    }
}
