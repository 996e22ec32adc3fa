//! Declarative validation of loosely typed request payloads.
//!
//! A request declares a schema as a list of [`FieldRules`] and a table of
//! message overrides keyed by `"{field}.{rule}"`. [`validate`] checks every
//! field, coerces accepted values to their canonical JSON form and returns
//! only the declared fields.

pub mod quiz;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

pub type Payload = serde_json::Map<String, Value>;

/// Message overrides, `("title.required", "...")`.
pub type Messages = &'static [(&'static str, &'static str)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present, not null and not a blank string.
    Required,
    /// Missing, null or blank values are accepted as null.
    Nullable,
    String,
    Integer,
    Boolean,
}

impl Rule {
    pub fn key(self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Nullable => "nullable",
            Rule::String => "string",
            Rule::Integer => "integer",
            Rule::Boolean => "boolean",
        }
    }

    fn default_message(self, field: &str) -> String {
        match self {
            Rule::Required => format!("The {field} field is required."),
            Rule::Nullable => format!("The {field} field is invalid."),
            Rule::String => format!("The {field} field must be a string."),
            Rule::Integer => format!("The {field} field must be an integer."),
            Rule::Boolean => format!("The {field} field must be true or false."),
        }
    }

    /// Checks `value` against the rule, returning its coerced form.
    fn apply(self, value: &Value) -> Option<Value> {
        match self {
            Rule::Required | Rule::Nullable => Some(value.clone()),
            Rule::String => value.is_string().then(|| value.clone()),
            Rule::Integer => match value {
                Value::Number(number) => number.as_i64().map(Value::from).or_else(|| {
                    // Whole floats such as `15.0` count as integers.
                    number
                        .as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                        .map(|f| Value::from(f as i64))
                }),
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
                _ => None,
            },
            Rule::Boolean => match value {
                Value::Bool(b) => Some(Value::Bool(*b)),
                Value::Number(number) => match number.as_i64() {
                    Some(0) => Some(Value::Bool(false)),
                    Some(1) => Some(Value::Bool(true)),
                    _ => None,
                },
                Value::String(s) => match s.trim() {
                    "1" => Some(Value::Bool(true)),
                    "0" => Some(Value::Bool(false)),
                    _ => None,
                },
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// Failed rules keyed by field name, messages in rule order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: String) {
        self.0.entry(field.to_owned()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

pub fn message_for(messages: Messages, field: &str, rule: Rule) -> String {
    let key = format!("{field}.{}", rule.key());
    messages
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, message)| (*message).to_owned())
        .unwrap_or_else(|| rule.default_message(field))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn validate(
    payload: &Payload,
    schema: &[FieldRules],
    messages: Messages,
) -> Result<Payload, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut data = Payload::new();

    for FieldRules { field, rules } in schema {
        let value = match payload.get(*field) {
            Some(value) if !is_blank(value) => value,
            raw => {
                if rules.contains(&Rule::Required) {
                    errors.add(field, message_for(messages, field, Rule::Required));
                } else if raw.is_some() && rules.contains(&Rule::Nullable) {
                    data.insert((*field).to_owned(), Value::Null);
                }
                continue;
            }
        };

        let mut coerced = value.clone();
        let mut passed = true;
        for rule in rules.iter() {
            match rule.apply(&coerced) {
                Some(value) => coerced = value,
                None => {
                    errors.add(field, message_for(messages, field, *rule));
                    passed = false;
                }
            }
        }
        if passed {
            data.insert((*field).to_owned(), coerced);
        }
    }

    if errors.is_empty() {
        Ok(data)
    } else {
        Err(errors)
    }
}
