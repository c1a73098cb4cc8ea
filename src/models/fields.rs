//! Response projection driven by the repeatable `fields` query parameter
use std::collections::HashSet;

use serde::Serialize;
use serde_json::{self, Value};

use models::QueryParams;

pub const FIELDS_PARAM: &str = "fields";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSelector {
    fields: Option<HashSet<String>>,
}

impl FieldSelector {
    pub fn from_query(params: &QueryParams) -> Self {
        let fields: HashSet<String> = params
            .get_all(FIELDS_PARAM)
            .into_iter()
            .flat_map(|value| value.split(',').map(|field| field.trim().to_string()).collect::<Vec<_>>())
            .filter(|field| !field.is_empty())
            .collect();
        Self {
            fields: if fields.is_empty() { None } else { Some(fields) },
        }
    }

    /// Keeps only the selected top-level keys of an object, anything else passes through
    pub fn project(&self, value: Value) -> Value {
        match (value, &self.fields) {
            (Value::Object(map), &Some(ref fields)) => Value::Object(map.into_iter().filter(|&(ref key, _)| fields.contains(key)).collect()),
            (value, _) => value,
        }
    }

    /// Serializes `item` and projects it
    pub fn apply<T: Serialize>(&self, item: &T) -> Result<Value, serde_json::Error> {
        serde_json::to_value(item).map(|value| self.project(value))
    }
}
