//! Tracked events and the property maps attached to them.
//!
//! An [`Event`] records one user action together with arbitrary structured
//! properties. Events are immutable once created; the request state only
//! ever appends them.

use crate::error::{LandmarkError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// A JSON object of traits or event properties.
pub type Properties = Map<String, Value>;

/// Convert any serializable value into a [`Properties`] map.
///
/// `call` names the operation the value is destined for and appears in the
/// error message.
///
/// # Errors
///
/// Returns [`LandmarkError::ContractViolation`] if the value fails to
/// serialize or serializes to anything other than a JSON object.
///
/// # Example
///
/// ```
/// use landmark_core::event::properties;
/// use serde_json::json;
///
/// let props = properties("track", &json!({"plan": "pro"})).unwrap();
/// assert_eq!(props["plan"], "pro");
///
/// assert!(properties("track", &42).is_err());
/// ```
pub fn properties<T>(call: &'static str, value: &T) -> Result<Properties>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(LandmarkError::contract_violation(
            call,
            format!("expected a JSON object, got {}", kind(&other)),
        )),
        Err(err) => Err(LandmarkError::contract_violation(call, err.to_string())),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One tracked user action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    action: String,
    properties: Properties,
}

impl Event {
    /// Create a new event.
    #[must_use]
    pub fn new(action: impl Into<String>, properties: Properties) -> Self {
        Self {
            action: action.into(),
            properties,
        }
    }

    /// The action name, e.g. a page path or `"Signed Up"`.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The properties recorded with the action.
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Purchase {
        sku: &'static str,
        quantity: u32,
    }

    #[test]
    fn test_properties_from_struct() {
        let props = properties("track", &Purchase { sku: "A-1", quantity: 2 }).unwrap();
        assert_eq!(props["sku"], "A-1");
        assert_eq!(props["quantity"], 2);
    }

    #[test]
    fn test_properties_rejects_non_objects() {
        for (value, expected) in [
            (json!(null), "null"),
            (json!(true), "a boolean"),
            (json!(1.5), "a number"),
            (json!("x"), "a string"),
            (json!([1, 2]), "an array"),
        ] {
            let err = properties("identify", &value).unwrap_err();
            assert_eq!(
                err,
                LandmarkError::contract_violation(
                    "identify",
                    format!("expected a JSON object, got {expected}")
                )
            );
        }
    }

    #[test]
    fn test_properties_rejects_unserializable_keys() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1_u8], "value");
        assert!(properties("track", &map).is_err());
    }

    #[test]
    fn test_event_accessors() {
        let event = Event::new("/", Properties::new());
        assert_eq!(event.action(), "/");
        assert!(event.properties().is_empty());
    }
}
