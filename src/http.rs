//! REST API transport.

use std::{future::Future, time::Duration};

use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Single API call: method, endpoint path relative to the base URL,
/// query parameters and optional JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a percent-encoded path segment, e.g. a caller supplied symbol.
    pub fn segment(mut self, value: &str) -> Self {
        // form encoding escapes '+' itself, so any '+' left stands for a space
        let encoded = url::form_urlencoded::byte_serialize(value.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        self.path = format!("{}/{encoded}", self.path.trim_end_matches('/'));
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Full request URL under the given base.
    pub fn url(&self, base: &Url) -> Result<Url, Error> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        ))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Value of the query parameter, if present.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Executes API requests and returns the parsed JSON response.
///
/// Business errors are returned as regular JSON values, only transport
/// level failures (connection, non-JSON body) produce `Err`.
pub trait Transport: Clone + Send + Sync + 'static {
    fn execute(&self, request: ApiRequest) -> impl Future<Output = Result<Value, Error>> + Send;
}

/// [`Transport`] over HTTPS.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    base_url: Url,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport with the reqwest client defaults, a `timeout` caps each
    /// request when given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: Url::parse(base_url)?,
            timeout,
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, Error> {
        let url = request.url(&self.base_url)?;
        debug!(method = %request.method, path = %request.path, "Sending API request");

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!(%status, len = body.len(), "Received API response");

        // Error payloads are JSON too, status alone is not decisive
        Ok(serde_json::from_str(&body)?)
    }
}

/// Extracts the business error reported by the API, if any.
pub fn api_error(value: &Value) -> Option<&str> {
    value.get("error").and_then(Value::as_str)
}

/// Turns a known API error into [`Error::Api`], passing other responses through.
pub fn check(value: Value) -> Result<Value, Error> {
    match api_error(&value) {
        Some(message) => Err(Error::Api(message.to_string())),
        None => Ok(value),
    }
}
