use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use graylog_core::{GraylogError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;

const JSON: &str = "application/json";

/// HTTP methods the Graylog API is driven with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated JSON client for `<endpoint>/api/<path>`.
///
/// Cloning is cheap: clones share the connection pool and configuration.
#[derive(Clone)]
pub struct GraylogClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl GraylogClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GraylogError::transport("failed to build HTTP client", e))?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.config.endpoint.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method.to_reqwest(), url)
            .basic_auth(&self.config.auth_name, Some(&self.config.auth_password))
            .header("X-Requested-By", &self.config.x_requested_by)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
    }

    /// Send one request and decode the JSON response.
    ///
    /// An empty 2xx body decodes as `Value::Null`. Any non-2xx status is
    /// returned as [`GraylogError::Api`] with the raw body.
    pub async fn call<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.api_url(path);
        let mut req = self.request(method, &url);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| GraylogError::transport("failed to marshal request body", e))?;
            req = req.body(bytes);
        }

        let started = Instant::now();
        let resp = req
            .send()
            .await
            .map_err(|e| GraylogError::transport("failed to execute request", e))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| GraylogError::transport("failed to read response body", e))?;

        tracing::debug!(
            method = %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "graylog request"
        );

        if !status.is_success() {
            return Err(GraylogError::api(
                status.as_u16(),
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| GraylogError::transport("failed to decode response", e))
    }

    /// Send one request and decode the response into `T`.
    pub async fn call_json<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let value = self.call(method, path, body).await?;
        decode(value)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call_json(Method::Get, path, None::<&()>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call_json(Method::Post, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call_json(Method::Put, path, Some(body)).await
    }

    /// Issue a DELETE, discarding whatever 2xx body comes back.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.call(Method::Delete, path, None::<&()>).await?;
        Ok(())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| GraylogError::transport("failed to decode response", e))
}
