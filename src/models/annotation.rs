//! Free-form user annotations attached to tracks.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A single annotation field value.
///
/// Strings and string lists are the shapes clients normally write. Anything
/// else is kept as raw JSON so unknown client data survives a round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnnotationValue {
    Null,
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl AnnotationValue {
    /// Split comma separated text into a trimmed list, dropping empty items.
    pub fn list_from_text(text: &str) -> Self {
        AnnotationValue::List(
            text.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Human readable form; lists are joined with `", "`.
    pub fn display(&self) -> String {
        match self {
            AnnotationValue::Null => String::new(),
            AnnotationValue::Text(text) => text.clone(),
            AnnotationValue::List(items) => items.join(", "),
            AnnotationValue::Other(value) => value.to_string(),
        }
    }
}

/// Annotation document for one track, keyed by field name.
///
/// A `null` document reads as an empty one.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct AnnotationDocument(pub BTreeMap<String, AnnotationValue>);

impl<'de> Deserialize<'de> for AnnotationDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Option::<BTreeMap<String, AnnotationValue>>::deserialize(deserializer)?;
        Ok(Self(fields.unwrap_or_default()))
    }
}

impl AnnotationDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: AnnotationValue) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply a text edit to one field.
    ///
    /// If the field currently holds a list, the text is split on commas.
    /// Otherwise it is stored as plain text.
    pub fn apply_edit(&mut self, key: &str, text: &str) {
        let value = match self.0.get(key) {
            Some(AnnotationValue::List(_)) => AnnotationValue::list_from_text(text),
            _ => AnnotationValue::Text(text.to_string()),
        };
        self.0.insert(key.to_string(), value);
    }
}
