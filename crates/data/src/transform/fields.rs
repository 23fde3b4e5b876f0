use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::dataset::RawDataset;
use crate::dataset::RawRecord;
use crate::dataset::number;
use crate::error::TransformError;
use crate::error::TransformResult;
use crate::filter::FilterSpec;
use crate::item::Component;
use crate::item::Normalized;
use crate::item::NormalizedItem;
use crate::transform::Order;
use crate::transform::Transformer;

/// Sums a fixed set of numeric sub-fields of every entry into one total,
/// keeping the sub-fields as components.
///
/// The dataset is a mapping of names to records. A name may also map to a
/// list of records, in which case the first one is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiFieldSum {
    pub fields: Vec<String>,
    #[serde(default = "ranked")]
    pub order: Order,
}

fn ranked() -> Order {
    Order::ValueDescending
}

impl MultiFieldSum {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            order: Order::ValueDescending,
        }
    }

    fn record<'a>(name: &str, value: &'a Value) -> TransformResult<&'a RawRecord> {
        let record = match value {
            Value::Array(records) => records.first(),
            value => Some(value),
        };

        record
            .and_then(Value::as_object)
            .ok_or_else(|| TransformError::field(name, "must hold a record"))
    }
}

impl Transformer for MultiFieldSum {
    fn normalize(&self, raw: &RawDataset, _filter: &FilterSpec) -> TransformResult<Normalized> {
        let mut items = raw
            .entries()?
            .map(|(name, value)| {
                let record = Self::record(name, value)?;
                let components = self
                    .fields
                    .iter()
                    .map(|field| Ok(Component::new(field.clone(), number(record, field)?)))
                    .collect::<TransformResult<Vec<_>>>()?;

                Ok(NormalizedItem::with_components(name.clone(), components))
            })
            .collect::<TransformResult<Vec<_>>>()?;

        self.order.apply(&mut items);

        Ok(Normalized::Items(items))
    }
}
