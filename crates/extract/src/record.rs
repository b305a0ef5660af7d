use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use corpus::{Category, Intent};

use crate::normalizer::ValueNormalizer;
use crate::schema::{FieldSchema, FieldSpec, ValueShape};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown field '{field}' for {category} form")]
    UnknownField { field: String, category: Category },
    #[error("field '{field}' expects a {expected:?} value")]
    ShapeMismatch { field: String, expected: ValueShape },
    #[error("'{value}' is not an accepted value for '{field}'")]
    InvalidChoice { field: String, value: String },
}

/// A single form value. Absent fields have no `FieldValue` at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
    Records(Vec<BTreeMap<String, String>>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Flag(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
            FieldValue::Records(rows) => rows.iter().all(|r| r.values().all(|v| v.trim().is_empty())),
        }
    }

    /// Human-readable rendering for documents.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Flag(true) => "Yes".to_string(),
            FieldValue::Flag(false) => "No".to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Records(rows) => rows
                .iter()
                .map(|row| {
                    let name = row.get("name").map(String::as_str).unwrap_or("(unnamed)");
                    match row.get("age") {
                        Some(age) if !age.is_empty() => format!("{} (age {})", name, age),
                        _ => name.to_string(),
                    }
                })
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// Read a JSON value for `spec`. `null` means absent. Strings are
    /// accepted for flags only as yes/no.
    pub fn from_json(spec: &FieldSpec, value: &Value) -> Result<Option<FieldValue>, SchemaError> {
        let mismatch = || SchemaError::ShapeMismatch {
            field: spec.id.to_string(),
            expected: spec.shape,
        };

        let parsed = match (spec.shape, value) {
            (_, Value::Null) => return Ok(None),
            (ValueShape::Text, Value::String(s)) => FieldValue::Text(s.clone()),
            (ValueShape::Text, Value::Number(n)) => FieldValue::Text(n.to_string()),
            (ValueShape::Text, Value::Bool(b)) => FieldValue::Text(if *b { "Yes" } else { "No" }.to_string()),
            (ValueShape::Flag, Value::Bool(b)) => FieldValue::Flag(*b),
            (ValueShape::Flag, Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "yes" | "true" => FieldValue::Flag(true),
                "no" | "false" => FieldValue::Flag(false),
                _ => return Err(mismatch()),
            },
            (ValueShape::List, Value::Array(items)) => FieldValue::List(
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string).ok_or_else(mismatch))
                    .collect::<Result<_, _>>()?,
            ),
            (ValueShape::Nested, Value::Array(items)) => {
                let mut rows = Vec::with_capacity(items.len());
                for item in items {
                    let object = item.as_object().ok_or_else(mismatch)?;
                    let mut row = BTreeMap::new();
                    for (key, v) in object {
                        match v {
                            Value::Null => {}
                            Value::String(s) => {
                                row.insert(key.clone(), s.clone());
                            }
                            Value::Number(n) => {
                                row.insert(key.clone(), n.to_string());
                            }
                            _ => return Err(mismatch()),
                        }
                    }
                    rows.push(row);
                }
                FieldValue::Records(rows)
            }
            _ => return Err(mismatch()),
        };

        Ok(Some(parsed))
    }
}

/// Map a free-text entry onto one of `choices`.
fn canonical_choice(entry: &str, choices: &[&'static str]) -> Option<&'static str> {
    let lowered = entry.trim().to_lowercase();
    let lowered = match lowered.as_str() {
        "mental" | "psychological" => "emotional".to_string(),
        "financial" => "economic".to_string(),
        _ => lowered,
    };
    choices
        .iter()
        .find(|c| lowered.starts_with(&c.to_lowercase()))
        .copied()
}

/// Check `value` against `spec` and bring it into canonical form.
/// Returns `None` when nothing is left after normalization.
fn conform(
    spec: &FieldSpec,
    value: FieldValue,
    normalizer: &ValueNormalizer,
) -> Result<Option<FieldValue>, SchemaError> {
    let mismatch = || SchemaError::ShapeMismatch {
        field: spec.id.to_string(),
        expected: spec.shape,
    };

    let conformed = match (spec.shape, value) {
        (ValueShape::Text, FieldValue::Text(s)) => FieldValue::Text(normalizer.normalize(&s)),
        (ValueShape::Flag, FieldValue::Flag(b)) => FieldValue::Flag(b),
        (ValueShape::List, FieldValue::List(items)) => {
            let mut out: Vec<String> = Vec::new();
            for item in items {
                let item = normalizer.normalize(&item);
                if item.is_empty() {
                    continue;
                }
                let item = if spec.choices.is_empty() {
                    item
                } else {
                    canonical_choice(&item, spec.choices)
                        .ok_or_else(|| SchemaError::InvalidChoice {
                            field: spec.id.to_string(),
                            value: item.clone(),
                        })?
                        .to_string()
                };
                if !out.contains(&item) {
                    out.push(item);
                }
            }
            FieldValue::List(out)
        }
        (ValueShape::Nested, FieldValue::Records(rows)) => FieldValue::Records(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|(k, v)| (k, normalizer.normalize(&v)))
                        .filter(|(_, v)| !v.is_empty())
                        .collect::<BTreeMap<_, _>>()
                })
                .filter(|row| !row.is_empty())
                .collect(),
        ),
        (ValueShape::Nested, FieldValue::List(items)) if items.is_empty() => return Ok(None),
        _ => return Err(mismatch()),
    };

    Ok((!conformed.is_empty()).then_some(conformed))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingField {
    pub field: &'static str,
    pub question: &'static str,
}

/// Form fields gathered so far for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormRecord {
    #[serde(rename = "intent")]
    category: Category,
    values: BTreeMap<String, FieldValue>,
}

impl FormRecord {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            values: BTreeMap::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn intent(&self) -> Intent {
        Intent::from(self.category)
    }

    pub fn schema(&self) -> &'static FieldSchema {
        FieldSchema::for_category(self.category)
    }

    fn spec(&self, field: &str) -> Result<&'static FieldSpec, SchemaError> {
        self.schema().field(field).ok_or_else(|| SchemaError::UnknownField {
            field: field.to_string(),
            category: self.category,
        })
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Set or clear a field. Empty values clear it.
    pub fn set(&mut self, field: &str, value: Option<FieldValue>) -> Result<(), SchemaError> {
        let spec = self.spec(field)?;
        let conformed = match value {
            Some(value) => conform(spec, value, &ValueNormalizer::new())?,
            None => None,
        };

        match conformed {
            Some(value) => {
                self.values.insert(spec.id.to_string(), value);
            }
            None => {
                self.values.remove(spec.id);
            }
        }
        Ok(())
    }

    pub fn set_json(&mut self, field: &str, value: &Value) -> Result<(), SchemaError> {
        let spec = self.spec(field)?;
        let value = FieldValue::from_json(spec, value)?;
        self.set(field, value)
    }

    /// Required fields with no value, in schema order.
    pub fn missing(&self) -> Vec<MissingField> {
        self.schema()
            .required()
            .filter(|spec| !self.values.contains_key(spec.id))
            .map(|spec| MissingField {
                field: spec.id,
                question: spec.question,
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Every schema field in order, with `None` for absent values.
    pub fn entries(&self) -> impl Iterator<Item = (&'static FieldSpec, Option<&FieldValue>)> + '_ {
        self.schema()
            .fields
            .iter()
            .map(|spec| (spec, self.values.get(spec.id)))
    }

    pub fn filled(&self) -> usize {
        self.values.len()
    }

    /// JSON object with every schema field; absent fields are `null`.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries()
            .map(|(spec, value)| {
                let json = value
                    .and_then(|v| serde_json::to_value(v).ok())
                    .unwrap_or(Value::Null);
                (spec.id.to_string(), json)
            })
            .collect();
        Value::Object(map)
    }
}
