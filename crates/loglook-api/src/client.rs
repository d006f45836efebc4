// LogLook backend HTTP client
//
// Wraps `reqwest::Client` with URL construction, the `x-user-id` identity
// header, and `{detail}` error-envelope handling. Endpoint groups (logs,
// troubles) are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::ErrorEnvelope;

/// Raw HTTP client for the LogLook backend.
///
/// Every request carries the acting user in the `x-user-id` header.
/// Non-2xx responses are mapped through the backend's `{detail}`
/// envelope before the caller sees them.
#[derive(Debug)]
pub struct LogClient {
    http: reqwest::Client,
    base_url: Url,
    user_id: String,
    default_timeout: Duration,
}

impl LogClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` should be the backend root (e.g.
    /// `https://logs.example.com`).
    pub fn new(
        base_url: Url,
        user_id: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            user_id: user_id.into(),
            default_timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        user_id: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url,
            user_id: user_id.into(),
            default_timeout: TransportConfig::default().timeout,
        })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The acting user identity sent with every request.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path relative to the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request with query parameters and decode the body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .query(query)
            .header("x-user-id", &self.user_id)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_body(resp).await
    }

    /// Send a POST request with a JSON body and decode the response.
    ///
    /// `timeout` overrides the transport default for slow endpoints.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
        timeout: Option<Duration>,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let effective = self.effective_timeout(timeout);

        let mut req = self
            .http
            .post(url)
            .json(body)
            .header("x-user-id", &self.user_id);

        if let Some(t) = timeout {
            req = req.timeout(t);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: effective.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })?;

        Self::parse_body(resp).await
    }

    /// The timeout actually governing a request: the per-request
    /// override when given, otherwise the transport default.
    fn effective_timeout(&self, requested: Option<Duration>) -> Duration {
        requested.unwrap_or(self.default_timeout)
    }

    /// Send a PUT request with a JSON body and decode the response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("PUT {}", url);

        let resp = self
            .http
            .put(url)
            .json(body)
            .header("x-user-id", &self.user_id)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_body(resp).await
    }

    /// Send a DELETE request, ignoring the response body.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);

        let resp = self
            .http
            .delete(url)
            .header("x-user-id", &self.user_id)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp).await.map(|_| ())
    }

    /// Decode a 2xx body as JSON, or map the error envelope.
    async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = Self::check_status(resp).await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Return the body text on success, or an error mapped from the
    /// status code and the `{detail}` envelope.
    async fn check_status(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: detail_or(&body, "missing or unknown user identity"),
            });
        }

        if !status.is_success() {
            return Err(Error::Api {
                message: detail_or(&body, status.as_str()),
                status: status.as_u16(),
            });
        }

        Ok(body)
    }
}

/// Extract the `detail` message from an error body, with a fallback.
fn detail_or(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.detail)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn effective_timeout_falls_back_to_the_transport_default() {
        let transport = TransportConfig::default().with_timeout(Duration::from_secs(12));
        let client = LogClient::new(
            Url::parse("http://localhost:9/").unwrap(),
            "tester",
            &transport,
        )
        .unwrap();

        assert_eq!(client.effective_timeout(None), Duration::from_secs(12));
        assert_eq!(
            client.effective_timeout(Some(Duration::from_secs(60))),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn detail_or_prefers_the_envelope_message() {
        assert_eq!(detail_or(r#"{"detail": "nope"}"#, "fallback"), "nope");
        assert_eq!(detail_or("not json", "fallback"), "fallback");
        assert_eq!(detail_or(r"{}", "fallback"), "fallback");
    }
}
