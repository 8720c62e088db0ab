//! HTTP client implementation

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use reqwest::{header, multipart::Form, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use openapi_client::models::ApiResponse;

use crate::authn::session::SessionStore;
use crate::errors::SeedError;

/// Message used when the backend rejects a request without saying why
pub const GENERIC_ERROR: &str = "The request could not be completed. Please try again.";

/// Empty query string
pub const NO_QUERY: &[(&str, &str)] = &[];

/// Path suffix of the token refresh endpoint
const REFRESH_PATH: &str = "/token/refresh";

/// HTTP client for the SEED backend
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: Option<Arc<dyn SessionStore>>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SeedError> {
        Url::parse(base_url)
            .map_err(|e| SeedError::ConfigError(format!("Invalid backend URL '{}': {}", base_url, e)))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: None,
        })
    }

    /// Attach credentials to every request
    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn session(&self) -> Option<&Arc<dyn SessionStore>> {
        self.session.as_ref()
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    /// Attach credentials. Nothing is attached without an access token; the
    /// refresh endpoint gets the refresh token instead of the bearer token.
    async fn authorize(&self, path: &str, request: RequestBuilder) -> RequestBuilder {
        let Some(session) = &self.session else {
            return request;
        };
        let Some(access_token) = session.access_token().await else {
            return request;
        };

        if path_of(path).ends_with(REFRESH_PATH) {
            match session.refresh_token().await {
                Some(refresh_token) => request.header("Refresh", refresh_token),
                None => request,
            }
        } else {
            request.header(header::AUTHORIZATION, format!("Bearer {}", access_token))
        }
    }

    /// Send a request, failing on non-2xx responses
    pub(crate) async fn send(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Response, SeedError> {
        let response = self.authorize(path, request).await.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("HTTP request to {} failed: {} - {}", path, status, body);
            if status == StatusCode::UNAUTHORIZED {
                return Err(SeedError::AuthError(
                    "Session expired or invalid. Run `seedctl login` again.".to_string(),
                ));
            }
            return Err(SeedError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Send a request and accept an envelope without data
    pub(crate) async fn send_void(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<(), SeedError> {
        let response = self.send(path, request).await?;
        decode_void(response).await
    }

    /// GET an enveloped JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SeedError> {
        let response = self.send(path, self.request(Method::GET, path)).await?;
        require_data(decode_envelope(response).await?)
    }

    /// GET an enveloped JSON resource with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, SeedError> {
        let request = self.request(Method::GET, path).query(query);
        let response = self.send(path, request).await?;
        require_data(decode_envelope(response).await?)
    }

    /// GET a JSON resource that is not wrapped in an envelope
    pub async fn get_bare<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, SeedError> {
        let request = self.request(Method::GET, path).query(query);
        let response = self.send(path, request).await?;
        Ok(response.json().await?)
    }

    /// GET a plain-text resource
    pub async fn get_text(&self, path: &str) -> Result<String, SeedError> {
        let response = self.send(path, self.request(Method::GET, path)).await?;
        Ok(response.text().await?)
    }

    /// POST a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, SeedError> {
        let request = self.request(Method::POST, path).json(body);
        let response = self.send(path, request).await?;
        decode_envelope(response).await
    }

    /// POST a multipart form
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<Option<T>, SeedError> {
        let request = self.request(Method::POST, path).multipart(form);
        let response = self.send(path, request).await?;
        decode_envelope(response).await
    }

    /// PUT a JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, SeedError> {
        let request = self.request(Method::PUT, path).json(body);
        let response = self.send(path, request).await?;
        decode_envelope(response).await
    }

    /// Send a request whose envelope carries no data
    pub async fn execute<Q: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &Q,
    ) -> Result<(), SeedError> {
        let request = self.request(method, path).query(query);
        self.send_void(path, request).await
    }
}

/// Path without the query string
fn path_of(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

/// Apply the envelope rule: `success == false` is an error
pub fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> Result<Option<T>, SeedError> {
    if !envelope.success {
        let message = if envelope.message.trim().is_empty() {
            GENERIC_ERROR.to_string()
        } else {
            envelope.message
        };
        return Err(SeedError::ApiError(message));
    }
    Ok(envelope.data)
}

async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<Option<T>, SeedError> {
    let envelope: ApiResponse<T> = response.json().await?;
    unwrap_envelope(envelope)
}

/// Accept an empty body or an envelope without data
async fn decode_void(response: Response) -> Result<(), SeedError> {
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
        Ok(envelope) => unwrap_envelope(envelope).map(|_| ()),
        // Some endpoints answer with a plain confirmation string
        Err(_) => Ok(()),
    }
}

fn require_data<T>(data: Option<T>) -> Result<T, SeedError> {
    data.ok_or_else(|| SeedError::ApiError("The server returned no data".to_string()))
}
