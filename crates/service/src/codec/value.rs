use std::collections::BTreeMap;

/// A decoded object: field name to value.
pub type JsonObject = BTreeMap<String, JsonValue>;

/// Untyped value produced by the document decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(JsonObject),
    /// A nested object whose every value is an array of strings, e.g. a
    /// student's `progress` map.
    Progress(BTreeMap<String, Vec<String>>),
}

impl JsonValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_progress(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            JsonValue::Progress(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Scalars rendered as text. Strings are returned as-is; arrays, objects
    /// and null have no scalar text.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Integer(i) => Some(i.to_string()),
            JsonValue::Real(r) => Some(r.to_string()),
            JsonValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// View any object-shaped value as a generic object. A `Progress` value
    /// is widened back into an object of string arrays.
    pub fn to_object(&self) -> Option<JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o.clone()),
            JsonValue::Progress(p) => Some(
                p.iter()
                    .map(|(k, items)| {
                        let arr = items.iter().cloned().map(JsonValue::String).collect();
                        (k.clone(), JsonValue::Array(arr))
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}
