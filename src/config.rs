//! Worker config loading
//!
//! ```yaml
//! script: worker.js
//! bindings:
//!   SESSIONS: { kvNamespace: sessions-dev }
//!   API_TOKEN: { secret: s3cr3t }
//! ```
//!
//! Binding entries stay raw until [`WorkerConfig::bindings`] so an unknown shape is
//! reported as `UnsupportedBindingKind` with the offending entry, not as a parse error.
//! Duplicate binding names are rejected while parsing.

use std::fmt;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::binding::{validate_binding_name, Binding, BindingsMap};
use crate::error::EnvError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerConfig {
    /// Script path, relative to the config file
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default, deserialize_with = "unique_bindings")]
    pub bindings: FxHashMap<String, Value>,
}

impl WorkerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EnvError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, EnvError> {
        serde_json::from_str(json).map_err(EnvError::JsonParse)
    }

    /// Load from disk; `.json` files are JSON, everything else YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse_for(path, &text)
    }

    /// Parse `text` as the format implied by `path`'s extension
    pub fn parse_for(path: &Path, text: &str) -> Result<Self, EnvError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(text),
            _ => Self::from_yaml_str(text),
        }
    }

    /// Classify every entry
    pub fn bindings(&self) -> Result<BindingsMap, EnvError> {
        self.bindings
            .iter()
            .map(|(name, raw)| Ok((name.clone(), Binding::from_value(raw)?)))
            .collect()
    }

    /// Classify every entry and check every name
    pub fn validate(&self) -> Result<BindingsMap, EnvError> {
        let mut names: Vec<&String> = self.bindings.keys().collect();
        names.sort();
        for name in names {
            validate_binding_name(name)?;
        }
        self.bindings()
    }
}

fn unique_bindings<'de, D>(deserializer: D) -> Result<FxHashMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueBindings;

    impl<'de> Visitor<'de> for UniqueBindings {
        type Value = FxHashMap<String, Value>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of binding name to binding")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut bindings = FxHashMap::default();
            while let Some((name, raw)) = access.next_entry::<String, Value>()? {
                if bindings.contains_key(&name) {
                    return Err(serde::de::Error::custom(format!(
                        "duplicate binding name '{name}'"
                    )));
                }
                bindings.insert(name, raw);
            }
            Ok(bindings)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(FxHashMap::default())
        }
    }

    deserializer.deserialize_map(UniqueBindings)
}
