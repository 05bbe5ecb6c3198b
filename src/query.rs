//! Query extraction for RPC calls
//!
//! Every call carries at most one meaningful positional argument: a key/value
//! object. [`Query`] is that object, or an empty one when the call has none.

use serde_json::{Map, Value};

/// Key/value view of a call's arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    fields: Map<String, Value>,
}

impl Query {
    /// Build a query from raw JSON-RPC params.
    ///
    /// Positional params use only their first element; later elements are
    /// ignored, not merged. A by-name params object is taken as is. Anything
    /// else, including a first element that is not an object, yields an empty
    /// query.
    pub fn from_params(params: Option<&Value>) -> Self {
        let fields = match params {
            Some(Value::Array(args)) => match args.first() {
                Some(Value::Object(map)) => map.clone(),
                _ => Map::new(),
            },
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The value under `key` as text. Strings are returned verbatim, numbers
    /// and booleans are rendered; other shapes have no text form.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric coercion of the value under `key`.
    ///
    /// Strings are trimmed and an empty string coerces to zero. Values that do
    /// not coerce to a finite number return `None`.
    pub fn number(&self, key: &str) -> Option<f64> {
        let n = match self.fields.get(key)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse::<f64>().ok()?
                }
            }
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Presence check for arguments that name something by text, such as a
    /// block hash. Absent keys, `null`, `false` and empty strings are unset;
    /// a string that happens to read as zero is still set.
    pub fn has_text(&self, key: &str) -> bool {
        match self.fields.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Presence check for numeric arguments.
    ///
    /// Absent keys, `null`, `false`, empty strings and zero values (numeric
    /// zero or a string that coerces to zero) all count as unset.
    pub fn is_set(&self, key: &str) -> bool {
        match self.fields.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) if s.is_empty() => false,
            Some(Value::String(_)) | Some(Value::Number(_)) => self.number(key) != Some(0.0),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    /// The whole query as a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
