//! Per-request options: extra headers and query parameters.

use std::fmt;

/// A scalar query parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::String(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{}", n),
            // f64's Display already drops the fractional part for whole numbers
            QueryValue::Float(n) => write!(f, "{}", n),
            QueryValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => QueryValue::Int(n),
            Err(_) => QueryValue::String(value.to_string()),
        }
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

/// Headers and query parameters for a single request.
///
/// Both lists keep insertion order. The sender only reads them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    /// Extra request headers. `content-type` and `accept` are always
    /// overridden with `application/json`.
    pub headers: Vec<(String, String)>,
    /// Query parameters merged into the URL. Keys already present in the
    /// URL keep the URL's value.
    pub query: Vec<(String, QueryValue)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}
