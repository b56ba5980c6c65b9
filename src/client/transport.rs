//! Transport layer of the API client

use std::fmt::Display;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, IF_MATCH};
use reqwest::Url;
use tracing::debug;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        })
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Revision sent as `If-Match`
    pub if_match: Option<i64>,
}

impl ApiRequest {
    pub fn new<P: Into<String>>(method: Method, path: P) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            if_match: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_revision(mut self, revision: i64) -> Self {
        self.if_match = Some(revision);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new<B: Into<String>>(status: u16, body: B) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send a request and get back the raw response, whatever its status code
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// [`Transport`] over HTTPS
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    logging: bool,
}

impl HttpTransport {
    pub fn new(
        endpoint: &str,
        api_key: &str,
        user_email: Option<&str>,
        logging: bool,
    ) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        if api_key.is_empty() {
            return Err(anyhow!("API key must not be empty"));
        }

        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        if let Some(user_email) = user_email.filter(|email| !email.is_empty()) {
            headers.insert("X-User-Email", HeaderValue::from_str(user_email)?);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(300))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            logging,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }
}

/// Check the endpoint is an absolute http(s) URL
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|err| anyhow!("Invalid endpoint `{endpoint}`: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(anyhow!(
            "Invalid endpoint `{endpoint}`: unsupported scheme `{scheme}`"
        )),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path)?;
        let mut builder = self
            .http
            .request(request.method.into(), url)
            .query(&request.query);
        if let Some(revision) = request.if_match {
            builder = builder.header(IF_MATCH, revision.to_string());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        if self.logging {
            debug!(
                method = %request.method,
                path = %request.path,
                query = ?request.query,
                body = ?request.body,
                "MetalCloud request"
            );
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if self.logging {
            debug!(
                method = %request.method,
                path = %request.path,
                status,
                body = %body,
                "MetalCloud response"
            );
        }

        Ok(ApiResponse { status, body })
    }
}
