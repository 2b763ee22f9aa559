use alloc::string::{String, ToString};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record decoded from JSON. Its identity is the `id` field, string or number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonRecord(pub Value);

impl JsonRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for JsonRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl remote_model::Record for JsonRecord {
    type Id = String;

    fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
