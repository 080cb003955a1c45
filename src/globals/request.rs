//! Incoming requests and the `cf` metadata attachment
//!
//! The platform attaches a non-standard `cf` object (colo, geo, TLS details...) to every
//! incoming request. Standard duplication does not know about it, so once the
//! environment is installed, cloning goes through [`clone_preserving_cf`] instead.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::EnvError;

/// A request as seen by the script
#[derive(Debug, PartialEq)]
pub struct WorkerRequest<M = Value> {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    /// Non-standard metadata attachment
    pub cf: Option<M>,
}

impl<M> WorkerRequest<M> {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            cf: None,
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_cf(mut self, cf: M) -> Self {
        self.cf = Some(cf);
        self
    }

    /// Standard duplication: every standard field, no `cf`
    pub fn duplicate(&self) -> Self {
        Self {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            cf: None,
        }
    }
}

/// Deep, non-aliasing copy through a JSON round trip
///
/// Values JSON cannot represent (non-string map keys, non-finite floats read back as
/// numbers...) fail with [`EnvError::StructuredClone`].
pub fn structured_clone<T>(value: &T) -> Result<T, EnvError>
where
    T: Serialize + DeserializeOwned,
{
    let encoded = serde_json::to_value(value).map_err(EnvError::StructuredClone)?;
    serde_json::from_value(encoded).map_err(EnvError::StructuredClone)
}

/// Standard duplication plus a structured clone of `cf`
pub fn clone_preserving_cf<M>(request: &WorkerRequest<M>) -> Result<WorkerRequest<M>, EnvError>
where
    M: Serialize + DeserializeOwned,
{
    let mut duplicate = request.duplicate();
    duplicate.cf = request.cf.as_ref().map(structured_clone).transpose()?;
    Ok(duplicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;
    use serde_json::json;
    use std::collections::HashMap;

    fn request() -> WorkerRequest {
        WorkerRequest::new(Method::POST, Url::parse("https://example.com/api").unwrap())
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body(r#"{"ok":true}"#)
    }

    #[test]
    fn duplicate_drops_cf() {
        let original = request().with_cf(json!({"colo": "AMS"}));
        let copy = original.duplicate();

        assert_eq!(copy.method, Method::POST);
        assert_eq!(copy.url, original.url);
        assert_eq!(copy.headers, original.headers);
        assert_eq!(copy.body, original.body);
        assert!(copy.cf.is_none());
    }

    #[test]
    fn clone_preserving_cf_is_independent() {
        let mut original = request().with_cf(json!({"a": 1}));
        let mut copy = clone_preserving_cf(&original).unwrap();

        assert_eq!(copy.cf, Some(json!({"a": 1})));

        original.cf.as_mut().unwrap()["a"] = json!(2);
        assert_eq!(copy.cf, Some(json!({"a": 1})));

        copy.cf.as_mut().unwrap()["b"] = json!(3);
        assert_eq!(original.cf, Some(json!({"a": 2})));
    }

    #[test]
    fn missing_cf_stays_missing() {
        let copy = clone_preserving_cf(&request()).unwrap();
        assert!(copy.cf.is_none());
        assert_eq!(copy.body.as_deref(), Some(br#"{"ok":true}"#.as_slice()));
    }

    #[test]
    fn non_cloneable_attachment_fails() {
        let mut cf: HashMap<(u8, u8), u8> = HashMap::new();
        cf.insert((1, 2), 3);
        let original = WorkerRequest::new(Method::GET, Url::parse("https://example.com").unwrap())
            .with_cf(cf);

        let err = clone_preserving_cf(&original).unwrap_err();
        assert!(matches!(err, EnvError::StructuredClone(_)));
        assert!(err.to_string().contains("WENV-030"));
    }

    #[test]
    fn typed_attachments_round_trip() {
        #[derive(Debug, PartialEq, Serialize, serde::Deserialize)]
        struct Cf {
            colo: String,
            asn: u32,
        }

        let original = WorkerRequest::new(Method::GET, Url::parse("https://example.com").unwrap())
            .with_cf(Cf { colo: "CDG".into(), asn: 13335 });

        let copy = clone_preserving_cf(&original).unwrap();
        assert_eq!(copy.cf, original.cf);
    }
}
