use serde_json::Map;
use serde_json::Value;

use crate::error::TransformError;
use crate::error::TransformResult;

/// A single record of a dataset: field names mapped to JSON values.
pub type RawRecord = Map<String, Value>;

/// A JSON document as retrieved from a data source.
///
/// The dataset has no fixed schema. Exercises either read a flat array of
/// records or walk a nested mapping down to the values they need.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    document: Value,
}

impl RawDataset {
    pub fn new(document: Value) -> RawDataset {
        Self { document }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Returns the records of a top-level array, skipping non-object entries.
    pub fn records(&self) -> TransformResult<impl Iterator<Item = &RawRecord>> {
        match self.document {
            Value::Array(ref items) => Ok(items.iter().filter_map(Value::as_object)),
            _ => Err(TransformError::field(
                "<root>",
                "must be an array of records",
            )),
        }
    }

    /// Returns the entries of a top-level mapping.
    pub fn entries(&self) -> TransformResult<impl Iterator<Item = (&String, &Value)>> {
        match self.document {
            Value::Object(ref map) => Ok(map.iter()),
            _ => Err(TransformError::field("<root>", "must be a JSON object")),
        }
    }

    /// Walks the nested mapping along `path`.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> TransformResult<&Value> {
        let mut walked: Vec<String> = Vec::with_capacity(path.len());
        let mut current = &self.document;

        for segment in path {
            let segment = segment.as_ref();
            current = current
                .as_object()
                .and_then(|map| map.get(segment))
                .ok_or_else(|| TransformError::lookup(segment, &walked))?;
            walked.push(segment.to_owned());
        }

        Ok(current)
    }
}

impl From<Value> for RawDataset {
    fn from(document: Value) -> Self {
        RawDataset::new(document)
    }
}

/// Reads a numeric field. Numeric strings are accepted as well.
pub fn number(record: &RawRecord, field: &str) -> TransformResult<f64> {
    match record.get(field) {
        Some(value) => as_number(value).ok_or_else(|| {
            TransformError::field(field, format!("is not numeric: {value}"))
        }),
        None => Err(TransformError::field(field, "is missing")),
    }
}

/// Reads a field as a bucket key. Numbers are formatted without a trailing `.0`.
pub fn key(record: &RawRecord, field: &str) -> TransformResult<String> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(value) => Err(TransformError::field(
            field,
            format!("cannot be used as a key: {value}"),
        )),
        None => Err(TransformError::field(field, "is missing")),
    }
}

pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
