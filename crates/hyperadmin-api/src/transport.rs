// Transport boundary
//
// A single request/response capability over which the rest of the
// workspace talks to the API. `HttpTransport` is the reqwest-backed
// implementation; tests substitute scripted transports through the
// `Transport` trait.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::media::{Document, MediaType, TemplateEnvelope};

const ACCEPT_HYPERMEDIA: &str =
    "application/vnd.collection+json, application/hal+json;q=0.9, application/json;q=0.8";

// ── Request / response values ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One request across the transport boundary.
///
/// `url` may be relative; the transport resolves it against its base.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub url: String,
    pub method: Method,
    pub body: Option<Value>,
    pub content_type: Option<MediaType>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            body: None,
            content_type: None,
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            ..Self::get(url)
        }
    }

    /// POST a write template as Collection+JSON.
    pub fn post_template(
        url: impl Into<String>,
        envelope: &TemplateEnvelope,
    ) -> Result<Self, Error> {
        Self::with_template(url, Method::Post, envelope)
    }

    /// PUT a write template as Collection+JSON.
    pub fn put_template(
        url: impl Into<String>,
        envelope: &TemplateEnvelope,
    ) -> Result<Self, Error> {
        Self::with_template(url, Method::Put, envelope)
    }

    fn with_template(
        url: impl Into<String>,
        method: Method,
        envelope: &TemplateEnvelope,
    ) -> Result<Self, Error> {
        let url = url.into();
        let body = serde_json::to_value(envelope).map_err(|source| Error::Serialization {
            url: url.clone(),
            source,
        })?;
        Ok(Self {
            url,
            method,
            body: Some(body),
            content_type: Some(MediaType::CollectionJson),
        })
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub url: String,
    pub status: u16,
    /// `Location` header, set on 201 Created.
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as one of the hypermedia formats.
    pub fn document(&self) -> Result<Document, Error> {
        Document::parse(self.content_type.as_deref(), &self.body)
    }
}

// ── Transport capability ────────────────────────────────────────────

/// Abstract HTTP exchange.
///
/// Implementations return `Err(Error::Status)` for every non-2xx status so
/// callers only ever see successful responses on the `Ok` side.
pub trait Transport: Send + Sync + 'static {
    fn request(&self, request: ApiRequest)
    -> impl Future<Output = Result<ApiResponse, Error>> + Send;

    /// GET a URL and parse the body into a [`Document`].
    fn get_document(&self, url: &str) -> impl Future<Output = Result<Document, Error>> + Send {
        let request = ApiRequest::get(url);
        async move { self.request(request).await?.document() }
    }
}

// ── Configuration ───────────────────────────────────────────────────

/// Shared configuration for building the reqwest client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// The API defines no timeouts; `None` waits for the server.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: concat!("hyperadmin/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(Error::Transport)
    }
}

// ── reqwest implementation ──────────────────────────────────────────

/// Error body shape used by the forum API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP transport rooted at the API's base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            base_url,
        })
    }

    /// Create a transport with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a possibly-relative URL against the base.
    pub fn resolve(&self, url: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(url)?)
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let url = self.resolve(&request.url)?;
        debug!(method = request.method.as_str(), %url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.http.get(url.clone()),
            Method::Post => self.http.post(url.clone()),
            Method::Put => self.http.put(url.clone()),
            Method::Delete => self.http.delete(url.clone()),
        }
        .header(ACCEPT, ACCEPT_HYPERMEDIA);

        if let Some(body) = request.body {
            let content_type = request.content_type.unwrap_or(MediaType::Json);
            builder = builder
                .header(CONTENT_TYPE, content_type.as_str())
                .body(body.to_string());
        }

        let resp = builder.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        let location = header_string(&resp, LOCATION.as_str());
        let content_type = header_string(&resp, CONTENT_TYPE.as_str());
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            debug!(status = status.as_u16(), %url, "request failed");
            return Err(Error::Status {
                url: request.url,
                status: status.as_u16(),
                message,
            });
        }

        Ok(ApiResponse {
            url: request.url,
            status: status.as_u16(),
            location,
            content_type,
            body,
        })
    }
}

impl Transport for HttpTransport {
    fn request(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, Error>> + Send {
        self.send(request)
    }
}

fn header_string(resp: &reqwest::Response, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::media::{AttributeEntry, WriteTemplate};

    #[test]
    fn relative_urls_resolve_against_base() {
        let transport = HttpTransport::with_client(
            reqwest::Client::new(),
            Url::parse("http://localhost:5000/").unwrap(),
        );
        assert_eq!(
            transport.resolve("/forum/api/users/").unwrap().as_str(),
            "http://localhost:5000/forum/api/users/"
        );
        assert_eq!(
            transport.resolve("http://other:8000/x").unwrap().as_str(),
            "http://other:8000/x"
        );
    }

    #[test]
    fn template_requests_declare_collection_json() {
        let envelope =
            WriteTemplate::new(vec![AttributeEntry::scalar("nickname", "Mystery")]).into_envelope();
        let request = ApiRequest::put_template("/forum/api/users/Mystery/", &envelope).unwrap();

        assert_eq!(request.method, Method::Put);
        assert_eq!(request.content_type, Some(MediaType::CollectionJson));
        assert_eq!(
            request.body,
            Some(serde_json::json!({
                "template": {"data": [{"name": "nickname", "value": "Mystery"}]}
            }))
        );
    }
}
