//! The response envelope shared by every Slurm REST endpoint.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::WireResult;

/// One entry of an envelope's `errors` or `warnings` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    /// Human readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Numeric Slurm error code.
    #[serde(default)]
    pub error_number: Option<i64>,
    /// Symbolic Slurm error, e.g. `Invalid job id specified`.
    #[serde(default)]
    pub error: Option<String>,
    /// Component that raised it.
    #[serde(default)]
    pub source: Option<String>,
}

impl ApiMessage {
    /// Best single-line rendering of the message.
    #[must_use]
    pub fn text(&self) -> String {
        match (&self.error, &self.description) {
            (Some(error), Some(description)) if !description.is_empty() => {
                format!("{error}: {description}")
            }
            (Some(error), _) => error.clone(),
            (None, Some(description)) => description.clone(),
            (None, None) => self
                .error_number
                .map_or_else(|| "unknown error".to_string(), |n| format!("error {n}")),
        }
    }
}

/// Release information reported in `meta.slurm`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SlurmMeta {
    /// `{major, minor, micro}`; strings in some versions, numbers in others.
    #[serde(default)]
    pub version: Option<Map<String, Value>>,
    /// Release string such as `24.11.1`.
    #[serde(default)]
    pub release: Option<String>,
    /// Cluster name.
    #[serde(default)]
    pub cluster: Option<String>,
}

impl SlurmMeta {
    /// The release string, built from the version parts when `release` is
    /// missing.
    #[must_use]
    pub fn release(&self) -> Option<String> {
        if let Some(release) = self.release.as_ref().filter(|r| !r.is_empty()) {
            return Some(release.clone());
        }
        let version = self.version.as_ref()?;
        let parts: Option<Vec<String>> = ["major", "minor", "micro"]
            .iter()
            .map(|key| match version.get(*key)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect();
        parts.map(|p| p.join("."))
    }
}

/// Envelope metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Meta {
    /// Controller release information.
    #[serde(default)]
    pub slurm: Option<SlurmMeta>,
}

/// A decoded response body.
///
/// Known envelope keys are parsed; the payload keys stay as raw JSON until a
/// caller takes them, so one bad item never poisons the rest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseEnvelope {
    /// Errors reported by the server.
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    /// Warnings reported by the server.
    #[serde(default)]
    pub warnings: Vec<ApiMessage>,
    /// Release metadata.
    #[serde(default)]
    pub meta: Option<Meta>,
    /// Every other top-level key.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ResponseEnvelope {
    /// Parse a response body. An empty body is an empty envelope.
    pub fn parse(body: &[u8]) -> WireResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(body)?)
    }

    /// Remove a payload key.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.payload.remove(key)
    }

    /// Remove a payload key and decode every element independently.
    ///
    /// A missing or null key yields no items; a non-array value is treated
    /// as a single item.
    pub fn take_items<T: DeserializeOwned>(
        &mut self,
        key: &str,
    ) -> Vec<Result<T, serde_json::Error>> {
        match self.take(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.into_iter().map(serde_json::from_value).collect(),
            Some(other) => vec![serde_json::from_value(other)],
        }
    }

    /// Remove a payload key and decode it as one object.
    pub fn take_object<T: DeserializeOwned>(
        &mut self,
        key: &str,
    ) -> Option<Result<T, serde_json::Error>> {
        match self.take(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)),
        }
    }

    /// Decode the whole remaining payload as one object.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.payload.clone()))
    }

    /// First reported error.
    #[must_use]
    pub fn first_error(&self) -> Option<&ApiMessage> {
        self.errors.first()
    }

    /// Warning texts.
    #[must_use]
    pub fn warning_texts(&self) -> Vec<String> {
        self.warnings.iter().map(ApiMessage::text).collect()
    }

    /// Controller release, from `meta.slurm`.
    #[must_use]
    pub fn slurm_release(&self) -> Option<String> {
        self.meta.as_ref()?.slurm.as_ref()?.release()
    }

    /// Cluster name, from `meta.slurm`.
    #[must_use]
    pub fn cluster(&self) -> Option<String> {
        self.meta.as_ref()?.slurm.as_ref()?.cluster.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_empty_body() {
        let envelope = ResponseEnvelope::parse(b"  ").unwrap();
        assert!(envelope.errors.is_empty());
        assert!(envelope.payload.is_empty());
    }

    #[test]
    fn test_take_items_best_effort() {
        let body = br#"{"jobs": [{"name": "a"}, {"name": 5}, {"name": "c"}]}"#;
        let mut envelope = ResponseEnvelope::parse(body).unwrap();
        let items: Vec<Result<Item, _>> = envelope.take_items("jobs");
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
        assert!(items[2].is_ok());
        assert!(envelope.take("jobs").is_none());
    }

    #[test]
    fn test_take_items_missing_and_null() {
        let mut envelope = ResponseEnvelope::parse(br#"{"nodes": null}"#).unwrap();
        assert!(envelope.take_items::<Item>("nodes").is_empty());
        assert!(envelope.take_items::<Item>("absent").is_empty());
    }

    #[test]
    fn test_errors_and_warnings() {
        let body = br#"{
            "errors": [{"error": "Invalid job id specified", "error_number": 2017, "description": "job 9 not found"}],
            "warnings": [{"description": "deprecated field"}]
        }"#;
        let envelope = ResponseEnvelope::parse(body).unwrap();
        assert_eq!(
            envelope.first_error().unwrap().text(),
            "Invalid job id specified: job 9 not found"
        );
        assert_eq!(envelope.warning_texts(), vec!["deprecated field".to_string()]);
    }

    #[test]
    fn test_meta_release_from_parts() {
        let body = br#"{"meta": {"slurm": {"version": {"major": "24", "minor": 11, "micro": "1"}, "cluster": "linux"}}}"#;
        let envelope = ResponseEnvelope::parse(body).unwrap();
        assert_eq!(envelope.slurm_release().as_deref(), Some("24.11.1"));
        assert_eq!(envelope.cluster().as_deref(), Some("linux"));
    }

    #[test]
    fn test_meta_release_string_wins() {
        let body = br#"{"meta": {"slurm": {"release": "25.05.0", "version": {"major": 1}}}}"#;
        let envelope = ResponseEnvelope::parse(body).unwrap();
        assert_eq!(envelope.slurm_release().as_deref(), Some("25.05.0"));
    }

    #[test]
    fn test_message_text_fallbacks() {
        let numbered = ApiMessage {
            error_number: Some(7),
            ..ApiMessage::default()
        };
        assert_eq!(numbered.text(), "error 7");
        assert_eq!(ApiMessage::default().text(), "unknown error");
    }
}
