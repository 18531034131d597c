//! HTTP client that speaks JSON in both directions.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::{options::Options, query::merge_query, Error, ResponseError};

const JSON_MIME: &str = "application/json";

/// Pass as the body of [`post_json`]/[`patch_json`] to send no body at all.
pub const NO_BODY: Option<&'static Value> = None;

/// HTTP methods the sender issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Sends JSON requests and classifies the responses.
///
/// Cloning is cheap; clones share the underlying connection pool. The client
/// holds no per-request state.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
}

/// Configures the transport behind a [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Total time allowed for a request, including reading the body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let http = builder.build().map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::Transport(e)
        })?;
        Ok(Client { http })
    }
}

impl Client {
    /// Creates a client with the transport's default settings.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Wraps an already configured `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Issues a GET request and decodes the JSON response.
    pub async fn get_json<T>(&self, url: &str, options: Option<&Options>) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.send_request::<T, Value>(Method::Get, url, None, options)
            .await
    }

    /// Issues a POST request. `body` is required at the call site; pass
    /// [`NO_BODY`] (or any `None`) to send nothing.
    pub async fn post_json<T, B>(
        &self,
        url: &str,
        body: Option<&B>,
        options: Option<&Options>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_request(Method::Post, url, body, options).await
    }

    /// Issues a PATCH request. Body handling matches [`Client::post_json`].
    pub async fn patch_json<T, B>(
        &self,
        url: &str,
        body: Option<&B>,
        options: Option<&Options>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_request(Method::Patch, url, body, options).await
    }

    /// Sends a request and classifies the response.
    ///
    /// The body is always parsed as JSON first, whatever the status. A body
    /// that fails to parse is a [`ResponseError::JsonParse`] even on a 500; a
    /// parsed body with status >= 400 is a [`ResponseError::Http`]. Anything
    /// else is decoded into `T`. No shape checking happens beyond what
    /// deserializing into `T` needs, so `T = serde_json::Value` accepts any
    /// JSON document.
    pub async fn send_request<T, B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        options: Option<&Options>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = build_url(url, options)?;
        let headers = build_headers(options)?;
        let payload = serialize_body(body)?;

        tracing::debug!("{:?} {}", method, url);
        let mut request = self.http.request(method.into(), url).headers(headers);
        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to send request: {}", e);
            Error::Transport(e)
        })?;
        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Transport(e)
        })?;
        tracing::debug!("Got a {} response ({} bytes)", status, text.len());

        let value = classify(status, text)?;
        serde_json::from_value(value).map_err(|e| {
            tracing::error!("Response did not match the expected type: {}", e);
            Error::Decode {
                status_code: status,
                source: e,
            }
        })
    }
}

/// Issues a GET request with a default [`Client`].
///
/// Each call builds its own transport; reuse a [`Client`] to share a
/// connection pool across requests.
pub async fn get_json<T>(url: &str, options: Option<&Options>) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    Client::new()?.get_json(url, options).await
}

/// Issues a POST request with a default [`Client`].
pub async fn post_json<T, B>(
    url: &str,
    body: Option<&B>,
    options: Option<&Options>,
) -> Result<T, Error>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    Client::new()?.post_json(url, body, options).await
}

/// Issues a PATCH request with a default [`Client`].
pub async fn patch_json<T, B>(
    url: &str,
    body: Option<&B>,
    options: Option<&Options>,
) -> Result<T, Error>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    Client::new()?.patch_json(url, body, options).await
}

/// Sends a request of any supported method with a default [`Client`].
pub async fn send_request<T, B>(
    method: Method,
    url: &str,
    body: Option<&B>,
    options: Option<&Options>,
) -> Result<T, Error>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    Client::new()?.send_request(method, url, body, options).await
}

fn build_url(url: &str, options: Option<&Options>) -> Result<Url, Error> {
    let url = Url::parse(url).map_err(|e| {
        tracing::error!("Invalid URL {:?}: {}", url, e);
        Error::InvalidUrl(e)
    })?;
    Ok(match options {
        Some(options) => merge_query(&url, &options.query),
        None => url,
    })
}

fn build_headers(options: Option<&Options>) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    for (name, value) in options.map(|o| o.headers.as_slice()).unwrap_or_default() {
        let invalid = || Error::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.insert(header_name, header_value);
    }

    // JSON only, whatever the caller asked for
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME));
    Ok(headers)
}

fn serialize_body<B>(body: Option<&B>) -> Result<Option<String>, Error>
where
    B: Serialize + ?Sized,
{
    let Some(body) = body else {
        return Ok(None);
    };
    let value = serde_json::to_value(body).map_err(Error::Serialize)?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::to_string(&value).map(Some).map_err(Error::Serialize)
}

/// Splits a complete response into success or one of the two response errors.
fn classify(status: u16, text: String) -> Result<Value, ResponseError> {
    let value = match serde_json::from_str::<Value>(&text) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(
                "Failed to parse {} response as JSON: {} | body: {}",
                status,
                e,
                truncate_body(&text)
            );
            return Err(ResponseError::JsonParse {
                status_code: status,
                body: text,
            });
        }
    };

    if status >= 400 {
        let err = ResponseError::Http {
            status_code: status,
            body: value,
        };
        tracing::error!("{}", truncate_body(&err.message()));
        return Err(err);
    }

    Ok(value)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
