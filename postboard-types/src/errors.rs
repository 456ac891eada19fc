use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keys the backend uses for errors that do not belong to a single field
pub const GENERAL_ERROR_KEYS: [&str; 2] = ["non_field_errors", "detail"];

/// Validation errors keyed by form field, as returned with a 400 response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a backend error body.
    ///
    /// Accepts `{"field": ["msg", ...]}` as well as `{"field": "msg"}`.
    /// Returns `None` when the body is not an object of messages.
    pub fn from_json(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let mut errors = BTreeMap::new();
        for (field, value) in object {
            let messages = match value {
                Value::String(msg) => vec![msg.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect(),
                _ => continue,
            };
            if !messages.is_empty() {
                errors.insert(field.clone(), messages);
            }
        }
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages for one field; empty if the field has no errors
    pub fn field(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Messages not tied to a specific field
    pub fn general(&self) -> Vec<&str> {
        GENERAL_ERROR_KEYS
            .iter()
            .flat_map(|key| self.field(key))
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_keyed_lists() {
        let errors = FieldErrors::from_json(&json!({
            "title": ["This field may not be blank."],
            "image": ["Image height larger than 4096px!", "Unsupported type"]
        }))
        .unwrap();

        assert_eq!(errors.field("title"), ["This field may not be blank."]);
        assert_eq!(errors.field("image").len(), 2);
        assert!(errors.field("content").is_empty());
    }

    #[test]
    fn test_detail_string_is_general() {
        let errors = FieldErrors::from_json(&json!({ "detail": "Not allowed." })).unwrap();
        assert_eq!(errors.general(), vec!["Not allowed."]);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(FieldErrors::from_json(&json!(["oops"])).is_none());
        assert!(FieldErrors::from_json(&json!({})).is_none());
    }
}
