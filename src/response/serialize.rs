//! Serializer capability
//!
//! Narrow seam for turning values into response text. Resolved once at
//! startup; the default implementation produces JSON via serde_json, and a
//! caller wanting XML or any other text encoding injects its own.

use crate::error::EmitError;
use serde_json::Value;

/// Object-to-text serialization capability.
pub trait Serializer: Send + Sync {
    fn serialize(&self, value: &Value) -> Result<String, EmitError>;

    /// Content type of the produced text.
    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// Default serializer: compact JSON.
#[derive(Debug, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<String, EmitError> {
        Ok(serde_json::to_string(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Payload {
        name: &'static str,
        count: u32,
    }

    #[test]
    fn test_json_serializer() {
        let serializer = JsonSerializer;
        let value = serde_json::to_value(Payload { name: "a", count: 2 }).unwrap();
        let text = serializer.serialize(&value).unwrap();
        assert_eq!(text, r#"{"name":"a","count":2}"#);
        assert_eq!(serializer.content_type(), "application/json");
    }
}
