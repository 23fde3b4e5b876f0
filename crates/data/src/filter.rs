use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::dataset::RawRecord;
use crate::dataset::as_number;

/// The resolved state of the page controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// The selected time or category bucket (radio buttons).
    pub bucket: Option<String>,
    /// The selected members of a combination (checkboxes).
    #[serde(default)]
    pub combination: Vec<String>,
    /// The single highlighted category (buttons).
    pub highlight: Option<String>,
}

impl FilterSpec {
    pub fn new(bucket: Option<String>, combination: Vec<String>, highlight: Option<String>) -> Self {
        Self {
            bucket,
            combination,
            highlight,
        }
    }

    pub fn with_highlight(&self, highlight: impl Into<String>) -> FilterSpec {
        Self {
            highlight: Some(highlight.into()),
            ..self.clone()
        }
    }
}

/// An exact-match predicate on one record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: String,
    pub equals: Value,
}

impl FieldMatch {
    pub fn new(field: impl Into<String>, equals: impl Into<Value>) -> FieldMatch {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }

    /// Numbers compare by value, so `1990` matches `1990.0`.
    pub fn matches(&self, record: &RawRecord) -> bool {
        match (record.get(&self.field), &self.equals) {
            (Some(Value::Number(_)), Value::Number(_)) => {
                record.get(&self.field).and_then(as_number) == as_number(&self.equals)
            }
            (Some(value), expected) => value == expected,
            (None, _) => false,
        }
    }
}

/// Returns `true` when the record satisfies every predicate.
pub fn matches_all(predicates: &[FieldMatch], record: &RawRecord) -> bool {
    predicates.iter().all(|p| p.matches(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exact_match_on_several_fields() {
        let record = json!({ "thg": "CO2", "untergruppe": "Abfallverbrennung", "jahr": 1990 });
        let record = record.as_object().unwrap();

        let predicates = vec![
            FieldMatch::new("thg", "CO2"),
            FieldMatch::new("untergruppe", "Abfallverbrennung"),
        ];
        assert!(matches_all(&predicates, record));

        let predicates = vec![FieldMatch::new("thg", "CH4")];
        assert!(!matches_all(&predicates, record));
    }

    #[test]
    fn numbers_compare_by_value() {
        let record = json!({ "jahr": 1990 });
        let record = record.as_object().unwrap();

        assert!(FieldMatch::new("jahr", 1990.0).matches(record));
        assert!(!FieldMatch::new("jahr", "1990").matches(record));
        assert!(!FieldMatch::new("missing", 1).matches(record));
    }
}
