//! Binding declarations
//!
//! Config wire shape is a JSON/YAML object with exactly one recognized key:
//!
//! ```yaml
//! bindings:
//!   GREETING: { value: "hello" }
//!   API_TOKEN: { secret: "s3cr3t" }
//!   SESSIONS: { kvNamespace: "sessions-dev" }
//!   COUNTER: { doNamespace: "local:Counter" }
//!   ASSETS: { bucketName: "assets" }
//!   EVENTS: { dataset: "events_v1" }
//!   DB: { d1DatabaseUuid: "2f6a7b1e-0000-4000-8000-000000000000" }
//! ```

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::EnvError;

/// Binding name → declaration
pub type BindingsMap = FxHashMap<String, Binding>;

/// One named resource a worker script expects in its environment
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Binding {
    Text {
        value: String,
    },
    Secret {
        secret: String,
    },
    KvNamespace {
        #[serde(rename = "kvNamespace")]
        name: String,
    },
    DoNamespace {
        #[serde(rename = "doNamespace")]
        name: String,
    },
    R2Bucket {
        #[serde(rename = "bucketName")]
        bucket_name: String,
    },
    AnalyticsEngine {
        dataset: String,
    },
    D1Database {
        #[serde(rename = "d1DatabaseUuid")]
        uuid: String,
    },
}

/// The seven recognized binding kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Text,
    Secret,
    KvNamespace,
    DoNamespace,
    R2Bucket,
    AnalyticsEngine,
    D1Database,
}

impl BindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Secret => "secret",
            Self::KvNamespace => "kv-namespace",
            Self::DoNamespace => "do-namespace",
            Self::R2Bucket => "r2-bucket",
            Self::AnalyticsEngine => "analytics-engine",
            Self::D1Database => "d1-database",
        }
    }

    /// True for kinds resolved through a provider
    pub fn needs_provider(self) -> bool {
        !matches!(self, Self::Text | Self::Secret)
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Text { .. } => BindingKind::Text,
            Self::Secret { .. } => BindingKind::Secret,
            Self::KvNamespace { .. } => BindingKind::KvNamespace,
            Self::DoNamespace { .. } => BindingKind::DoNamespace,
            Self::R2Bucket { .. } => BindingKind::R2Bucket,
            Self::AnalyticsEngine { .. } => BindingKind::AnalyticsEngine,
            Self::D1Database { .. } => BindingKind::D1Database,
        }
    }

    /// Provider key for backend kinds, `None` for literals
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Text { .. } | Self::Secret { .. } => None,
            Self::KvNamespace { name } | Self::DoNamespace { name } => Some(name),
            Self::R2Bucket { bucket_name } => Some(bucket_name),
            Self::AnalyticsEngine { dataset } => Some(dataset),
            Self::D1Database { uuid } => Some(uuid),
        }
    }

    /// Classify a raw config value
    ///
    /// The value must be an object with exactly one recognized key whose value is a string.
    /// Anything else fails with `UnsupportedBindingKind` carrying the serialized input.
    pub fn from_value(value: &Value) -> Result<Self, EnvError> {
        let unsupported = || EnvError::UnsupportedBindingKind {
            binding: value.to_string(),
        };

        let Some(object) = value.as_object() else {
            return Err(unsupported());
        };
        let mut fields = object.iter();
        let (Some((field, Value::String(inner))), None) = (fields.next(), fields.next()) else {
            return Err(unsupported());
        };
        let inner = inner.clone();

        let binding = match field.as_str() {
            "value" => Self::Text { value: inner },
            "secret" => Self::Secret { secret: inner },
            "kvNamespace" => Self::KvNamespace { name: inner },
            "doNamespace" => Self::DoNamespace { name: inner },
            "bucketName" => Self::R2Bucket { bucket_name: inner },
            "dataset" => Self::AnalyticsEngine { dataset: inner },
            "d1DatabaseUuid" => Self::D1Database { uuid: inner },
            _ => return Err(unsupported()),
        };
        Ok(binding)
    }

    /// Serialized config form (used in diagnostics)
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl<'de> Deserialize<'de> for Binding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Binding::from_value(&raw).map_err(serde::de::Error::custom)
    }
}

/// Secrets are redacted
impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret { .. } => f.debug_struct("Secret").field("secret", &"<redacted>").finish(),
            Self::Text { value } => f.debug_struct("Text").field("value", value).finish(),
            Self::KvNamespace { name } => f.debug_struct("KvNamespace").field("name", name).finish(),
            Self::DoNamespace { name } => f.debug_struct("DoNamespace").field("name", name).finish(),
            Self::R2Bucket { bucket_name } => {
                f.debug_struct("R2Bucket").field("bucket_name", bucket_name).finish()
            }
            Self::AnalyticsEngine { dataset } => {
                f.debug_struct("AnalyticsEngine").field("dataset", dataset).finish()
            }
            Self::D1Database { uuid } => f.debug_struct("D1Database").field("uuid", uuid).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_every_config_shape() {
        let cases = [
            (json!({"value": "hello"}), BindingKind::Text),
            (json!({"secret": "XYZ"}), BindingKind::Secret),
            (json!({"kvNamespace": "SESSIONS"}), BindingKind::KvNamespace),
            (json!({"doNamespace": "local:Counter"}), BindingKind::DoNamespace),
            (json!({"bucketName": "assets"}), BindingKind::R2Bucket),
            (json!({"dataset": "events"}), BindingKind::AnalyticsEngine),
            (json!({"d1DatabaseUuid": "0000-1111"}), BindingKind::D1Database),
        ];

        for (raw, kind) in cases {
            let binding = Binding::from_value(&raw).unwrap();
            assert_eq!(binding.kind(), kind);
            assert_eq!(binding.to_value(), raw);
        }
    }

    #[test]
    fn key_is_none_for_literals() {
        assert_eq!(Binding::Text { value: "a".into() }.key(), None);
        assert_eq!(Binding::Secret { secret: "b".into() }.key(), None);
        assert_eq!(
            Binding::R2Bucket { bucket_name: "assets".into() }.key(),
            Some("assets")
        );
    }

    #[test]
    fn unknown_key_is_unsupported() {
        let raw = json!({"queue": "jobs"});
        let err = Binding::from_value(&raw).unwrap_err();
        match err {
            EnvError::UnsupportedBindingKind { binding } => {
                assert_eq!(binding, r#"{"queue":"jobs"}"#);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ambiguous_or_malformed_shapes_are_unsupported() {
        for raw in [
            json!({"value": "a", "secret": "b"}),
            json!({}),
            json!({"value": 42}),
            json!("just a string"),
            json!(null),
        ] {
            assert!(matches!(
                Binding::from_value(&raw),
                Err(EnvError::UnsupportedBindingKind { .. })
            ));
        }
    }

    #[test]
    fn deserializes_from_yaml() {
        let binding: Binding = serde_yaml::from_str("kvNamespace: SESSIONS").unwrap();
        assert_eq!(binding, Binding::KvNamespace { name: "SESSIONS".into() });

        let err = serde_yaml::from_str::<Binding>("queue: jobs").unwrap_err();
        assert!(err.to_string().contains("WENV-010"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let binding = Binding::Secret { secret: "XYZ".into() };
        let rendered = format!("{binding:?}");
        assert!(!rendered.contains("XYZ"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn kind_names() {
        assert_eq!(BindingKind::KvNamespace.to_string(), "kv-namespace");
        assert!(BindingKind::D1Database.needs_provider());
        assert!(!BindingKind::Secret.needs_provider());
    }
}
