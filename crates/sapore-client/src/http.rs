//! # REST Transport
//!
//! One `ApiClient` per process. Every endpoint module goes through
//! [`ApiClient::send`], which owns authentication and error mapping.
//!
//! ## One Request
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  build request ──► token = session.token()   (read fresh every time)    │
//! │                        │                                                │
//! │                        ├── Some(t) → Authorization: Bearer t            │
//! │                        └── None    → sent without auth                  │
//! │                        ▼                                                │
//! │                     response                                            │
//! │                        │                                                │
//! │       ┌────────────────┼─────────────────────┐                          │
//! │       ▼                ▼                     ▼                          │
//! │     2xx           401 / 403              other status                   │
//! │   decode body    clear token           Api { status, message }          │
//! │                  Api { status, .. }                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried and nothing is queued.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Error body shapes the backend is known to send.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Handle to the REST backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        config.validate()?;

        let mut base_url = Url::parse(&config.api.base_url)?;
        // Url::join replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(ApiClient {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path such as `/customers/7` against the base URL.
    pub fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        Ok(self.http.request(method, self.url(path)?))
    }

    /// Sends a request with the session token attached and checks the status.
    pub(crate) async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request = match self.session.token()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        let start = Instant::now();
        let response = self.http.execute(request).await?;
        let status = response.status();

        debug!(
            %method,
            path = url.path(),
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Backend request"
        );

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "Session rejected by backend, clearing token");
            self.session.clear()?;
        }

        let text = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(&text),
        })
    }

    // =========================================================================
    // Typed Helpers
    // =========================================================================

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        decode(response).await
    }

    pub(crate) async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let response = self.send(self.request(Method::GET, path)?.query(query)).await?;
        decode(response).await
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(method, path)?.json(body)).await?;
        decode(response).await
    }

    /// Sends a body and ignores whatever comes back.
    pub(crate) async fn send_json_empty<B>(&self, method: Method, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(method, path)?.json(body)).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Pulls a human message out of an error body: `{"message"}`, `{"error"}`,
/// or the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            error: Some(error), ..
        }) => error,
        _ => body.trim().to_string(),
    }
}
