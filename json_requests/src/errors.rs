//! Error types for the request sender.
//!
//! Failures fall into two groups. [`ResponseError`] covers the cases where a
//! complete HTTP response came back but could not be handed to the caller:
//! the body was not JSON, or it was JSON with an error status. Everything
//! else (bad input, the transport itself failing) is a different [`Error`]
//! variant, so callers can tell "the server answered badly" apart from "we
//! never got an answer".

use std::error::Error as StdError;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Errors that can occur when sending a JSON request.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A caller-supplied header had an invalid name or value.
    #[error("Invalid header {name:?}")]
    InvalidHeader { name: String },
    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request body")]
    Serialize(#[source] serde_json::Error),
    /// The transport failed (DNS, connection, TLS, timeout, reading the body).
    #[error("Request failed")]
    Transport(#[from] reqwest::Error),
    /// The server answered, but with a malformed body or an error status.
    #[error(transparent)]
    Response(#[from] ResponseError),
    /// The response was valid JSON with a success status, but did not fit the
    /// requested type.
    #[error("Failed to decode {status_code} response")]
    Decode {
        status_code: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Returns the [`ResponseError`] if this is one.
    pub fn response_error(&self) -> Option<&ResponseError> {
        match self {
            Error::Response(err) => Some(err),
            _ => None,
        }
    }

    /// True if the server answered and the answer was classified as a failure.
    pub fn is_response_error(&self) -> bool {
        self.response_error().is_some()
    }

    /// True for a valid JSON body with a status of 400 or above.
    pub fn is_http_error(&self) -> bool {
        self.response_error().is_some_and(ResponseError::is_http_error)
    }

    /// True for a response body that was not valid JSON.
    pub fn is_json_error(&self) -> bool {
        self.response_error().is_some_and(ResponseError::is_json_error)
    }
}

/// Stable, programmatic name for a [`ResponseError`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "HTTP_ERROR")]
    Http,
    #[serde(rename = "JSON_PARSE_ERROR")]
    JsonParse,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Http => "HTTP_ERROR",
            ErrorCode::JsonParse => "JSON_PARSE_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete response that could not be returned as a success.
///
/// The body type is tied to the variant: a response that failed to parse
/// keeps the raw text, a parsed response keeps the JSON value.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// The body parsed as JSON but the status was 400 or above.
    ///
    /// The message re-serializes `body` with `serde_json`, so numbers keep
    /// their parsed form: `1.0` and `1e2` print as `1.0` and `100.0`.
    #[error("Got a {status_code} response with body {body}")]
    Http { status_code: u16, body: Value },
    /// The body was not valid JSON. Checked before the status code.
    #[error("invalid json response body: \"{body}\"")]
    JsonParse { status_code: u16, body: String },
}

/// Borrowed view of a [`ResponseError`] body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResponseBody<'a> {
    Json(&'a Value),
    Text(&'a str),
}

impl ResponseError {
    /// Human-readable description, same text as the `Display` impl.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ResponseError::Http { .. } => ErrorCode::Http,
            ResponseError::JsonParse { .. } => ErrorCode::JsonParse,
        }
    }

    /// The HTTP status of the response.
    pub fn status_code(&self) -> u16 {
        match self {
            ResponseError::Http { status_code, .. }
            | ResponseError::JsonParse { status_code, .. } => *status_code,
        }
    }

    pub fn body(&self) -> ResponseBody<'_> {
        match self {
            ResponseError::Http { body, .. } => ResponseBody::Json(body),
            ResponseError::JsonParse { body, .. } => ResponseBody::Text(body),
        }
    }

    pub fn is_http_error(&self) -> bool {
        matches!(self, ResponseError::Http { .. })
    }

    pub fn is_json_error(&self) -> bool {
        matches!(self, ResponseError::JsonParse { .. })
    }
}

impl Serialize for ResponseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResponseError", 4)?;
        state.serialize_field("message", &self.message())?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("statusCode", &self.status_code())?;
        match self {
            ResponseError::Http { body, .. } => state.serialize_field("body", body)?,
            ResponseError::JsonParse { body, .. } => state.serialize_field("body", body)?,
        }
        state.end()
    }
}

/// Finds a [`ResponseError`] in an arbitrary error value.
///
/// Accepts either a bare `ResponseError` or an [`Error::Response`]. Works on
/// anything that derefs to a `dyn Error`, e.g. `anyhow::Error::as_ref()`.
pub fn as_response_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ResponseError> {
    if let Some(err) = err.downcast_ref::<ResponseError>() {
        return Some(err);
    }
    err.downcast_ref::<Error>().and_then(Error::response_error)
}

/// True iff `err` is a [`ResponseError`], as opposed to any other failure.
pub fn is_response_error(err: &(dyn StdError + 'static)) -> bool {
    as_response_error(err).is_some()
}

/// True iff `err` is a [`ResponseError::Http`].
pub fn is_http_error(err: &(dyn StdError + 'static)) -> bool {
    as_response_error(err).is_some_and(ResponseError::is_http_error)
}

/// True iff `err` is a [`ResponseError::JsonParse`].
pub fn is_json_error(err: &(dyn StdError + 'static)) -> bool {
    as_response_error(err).is_some_and(ResponseError::is_json_error)
}
