//! Declarative request-body schemas.
//!
//! A [`Schema`] is an ordered list of [`Field`] rules. Validation walks the
//! fields in declaration order and reports one message per broken constraint,
//! so clients see every problem with a body in a single 400 response.

pub mod schemas;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Integer,
    Number,
    StringArray,
}

impl Kind {
    fn type_name(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::StringArray => "array",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Integer => value.is_i64(),
            Kind::Number => value.is_number(),
            Kind::StringArray => value.is_array(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Calendar date, `YYYY-MM-DD`
    Date,
}

#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    kind: Kind,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    minimum: Option<i64>,
    maximum: Option<i64>,
    format: Option<Format>,
}

impl Field {
    fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            format: None,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, Kind::String)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, Kind::Integer)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, Kind::Number)
    }

    pub fn string_array(name: &'static str) -> Self {
        Self::new(name, Kind::StringArray)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Minimum length in characters
    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    /// Maximum length in characters
    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn minimum(mut self, n: i64) -> Self {
        self.minimum = Some(n);
        self
    }

    pub fn maximum(mut self, n: i64) -> Self {
        self.maximum = Some(n);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    fn check(&self, value: &Value, errors: &mut Vec<String>) {
        let path = format!("instance.{}", self.name);

        if !self.kind.matches(value) {
            errors.push(format!("{} is not of a type(s) {}", path, self.kind.type_name()));
            return;
        }

        match value {
            Value::String(s) => {
                let len = s.chars().count();
                if let Some(min) = self.min_length.filter(|min| len < *min) {
                    errors.push(format!("{} does not meet minimum length of {}", path, min));
                }
                if let Some(max) = self.max_length.filter(|max| len > *max) {
                    errors.push(format!("{} does not meet maximum length of {}", path, max));
                }
                if self.format == Some(Format::Date) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                    errors.push(format!("{} does not conform to the \"date\" format", path));
                }
            }
            Value::Number(n) => {
                let n = n.as_f64().unwrap_or_default();
                if let Some(min) = self.minimum.filter(|min| n < *min as f64) {
                    errors.push(format!("{} must be greater than or equal to {}", path, min));
                }
                if let Some(max) = self.maximum.filter(|max| n > *max as f64) {
                    errors.push(format!("{} must be less than or equal to {}", path, max));
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        errors.push(format!("{}[{}] is not of a type(s) string", path, i));
                    }
                }
            }
            _ => {}
        }
    }
}

/// An object schema that rejects properties it does not declare
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Collect every violation, in declaration order, followed by any
    /// undeclared properties in key order.
    pub fn violations(&self, instance: &Value) -> Vec<String> {
        let Some(object) = instance.as_object() else {
            return vec!["instance is not of a type(s) object".to_string()];
        };

        let mut errors = Vec::new();
        for field in &self.fields {
            match object.get(field.name) {
                // Optional fields treat an explicit null as absent
                None | Some(Value::Null) if !field.required => {}
                None => errors.push(format!("instance requires property \"{}\"", field.name)),
                Some(value) => field.check(value, &mut errors),
            }
        }
        self.check_additional(object, &mut errors);
        errors
    }

    fn check_additional(&self, object: &Map<String, Value>, errors: &mut Vec<String>) {
        for key in object.keys() {
            if !self.fields.iter().any(|f| f.name == key) {
                errors.push(format!(
                    "instance is not allowed to have the additional property \"{}\"",
                    key
                ));
            }
        }
    }

    pub fn validate(&self, instance: &Value) -> Result<(), ApiError> {
        let errors = self.violations(instance);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(errors))
        }
    }
}

/// Parse a numeric path identifier. Only ASCII digits are accepted so the
/// value is known to be an integer before it reaches any query.
pub fn parse_id(field: &str, raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request(format!("Invalid {}: {}", field, raw)));
    }
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid {}: {}", field, raw)))
}
