//! Response construction
//!
//! The host's standard response only accepts statuses 200..=599 and has no socket field.
//! Workers answer upgrade requests with `new Response(null, { status: 101, webSocket })`,
//! so the installed constructor is [`ResponseConstructor::Worker`], which allows exactly that.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::error::EnvError;

/// Which constructor the script's global `Response` currently refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseConstructor {
    #[default]
    Standard,
    Worker,
}

/// Second argument of the response constructor
#[derive(Debug)]
pub struct ResponseInit<S> {
    pub status: u16,
    pub status_text: Option<String>,
    pub headers: HeaderMap,
    pub web_socket: Option<S>,
}

impl<S> Default for ResponseInit<S> {
    fn default() -> Self {
        Self {
            status: 200,
            status_text: None,
            headers: HeaderMap::new(),
            web_socket: None,
        }
    }
}

impl<S> ResponseInit<S> {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// `{ status: 101, webSocket: client }`
    pub fn upgrade(client: S) -> Self {
        Self {
            status: 101,
            web_socket: Some(client),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct WorkerResponse<S> {
    status: StatusCode,
    status_text: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    web_socket: Option<S>,
    constructor: ResponseConstructor,
}

impl<S> WorkerResponse<S> {
    /// Construct with `constructor`'s validation rules
    pub fn construct(
        constructor: ResponseConstructor,
        body: Option<Vec<u8>>,
        init: ResponseInit<S>,
    ) -> Result<Self, EnvError> {
        let status = init.status;
        let invalid = |reason| EnvError::InvalidResponseStatus { status, reason };

        match constructor {
            ResponseConstructor::Standard => {
                if !(200..=599).contains(&status) {
                    return Err(invalid("must be in 200..=599"));
                }
                if init.web_socket.is_some() {
                    return Err(invalid("webSocket is only supported by the worker Response"));
                }
            }
            ResponseConstructor::Worker => match (status, init.web_socket.is_some()) {
                (101, true) => {}
                (101, false) => return Err(invalid("status 101 requires a webSocket")),
                (_, true) => return Err(invalid("webSocket requires status 101")),
                (200..=599, false) => {}
                _ => return Err(invalid("must be in 200..=599, or 101 with a webSocket")),
            },
        }

        if body.is_some() && matches!(status, 101 | 204 | 205 | 304) {
            return Err(invalid("null body status cannot have a body"));
        }

        let status = StatusCode::from_u16(status).map_err(|_| invalid("not a valid status code"))?;
        let status_text = init
            .status_text
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

        Ok(Self {
            status,
            status_text,
            headers: init.headers,
            body,
            web_socket: init.web_socket,
            constructor,
        })
    }

    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn web_socket(&self) -> Option<&S> {
        self.web_socket.as_ref()
    }

    /// Hand the client endpoint over to the host's upgrade handling
    pub fn take_web_socket(&mut self) -> Option<S> {
        self.web_socket.take()
    }

    /// Constructor identity, for `instanceof`-style checks
    pub fn constructed_by(&self) -> ResponseConstructor {
        self.constructor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(body: Option<&str>, init: ResponseInit<&'static str>) -> Result<WorkerResponse<&'static str>, EnvError> {
        WorkerResponse::construct(ResponseConstructor::Worker, body.map(Into::into), init)
    }

    #[test]
    fn worker_accepts_upgrade() {
        let mut response = worker(None, ResponseInit::upgrade("client")).unwrap();

        assert_eq!(response.status(), 101);
        assert_eq!(response.status_text(), "Switching Protocols");
        assert_eq!(response.web_socket(), Some(&"client"));
        assert_eq!(response.take_web_socket(), Some("client"));
        assert_eq!(response.web_socket(), None);
        assert_eq!(response.constructed_by(), ResponseConstructor::Worker);
    }

    #[test]
    fn standard_rejects_upgrade() {
        let err = WorkerResponse::construct(
            ResponseConstructor::Standard,
            None,
            ResponseInit::upgrade("client"),
        )
        .unwrap_err();
        assert!(matches!(err, EnvError::InvalidResponseStatus { status: 101, .. }));
    }

    #[test]
    fn standard_rejects_socket_even_with_ok_status() {
        let init = ResponseInit {
            web_socket: Some("client"),
            ..ResponseInit::default()
        };
        let err = WorkerResponse::construct(ResponseConstructor::Standard, None, init).unwrap_err();
        assert!(err.to_string().contains("only supported by the worker Response"));
    }

    #[test]
    fn worker_rejects_mismatched_socket_and_status() {
        assert!(worker(None, ResponseInit::status(101)).is_err());

        let init = ResponseInit {
            status: 200,
            web_socket: Some("client"),
            ..ResponseInit::default()
        };
        assert!(worker(None, init).is_err());
    }

    #[test]
    fn out_of_range_statuses() {
        for status in [0, 199, 600, 999] {
            assert!(worker(None, ResponseInit::status(status)).is_err(), "{status}");
        }
    }

    #[test]
    fn null_body_statuses_reject_bodies() {
        let err = worker(Some("content"), ResponseInit::status(204)).unwrap_err();
        assert!(err.to_string().contains("null body status"));
        assert!(worker(None, ResponseInit::status(204)).is_ok());
    }

    #[test]
    fn plain_response() {
        let response = worker(Some("hello"), ResponseInit::default()).unwrap();
        assert!(response.ok());
        assert_eq!(response.status_text(), "OK");
        assert_eq!(response.body(), Some(b"hello".as_slice()));
    }

    #[test]
    fn custom_status_text() {
        let init = ResponseInit {
            status: 418,
            status_text: Some("Short and stout".into()),
            ..ResponseInit::default()
        };
        let response = worker(None, init).unwrap();
        assert_eq!(response.status_text(), "Short and stout");
        assert!(!response.ok());
    }
}
