//! The remote sync endpoint.
//!
//! [`Remote`] is the seam the reconciler talks to. [`HttpRemote`] speaks the
//! JSON API over reqwest.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{PushResponse, SyncEnvelope, SyncError, SyncResult};

/// Operations the remote endpoint supports.
pub trait Remote {
    /// Exchange credentials for a bearer token.
    fn login(&self, email: &str, password: &str) -> impl Future<Output = SyncResult<String>> + Send;

    /// Invalidate `token` on the remote.
    fn logout(&self, token: &str) -> impl Future<Output = SyncResult<()>> + Send;

    /// Fetch the remote's full envelope.
    fn fetch(&self, token: &str) -> impl Future<Output = SyncResult<SyncEnvelope>> + Send;

    /// Offer `envelope`; the remote accepts it unless its own copy is newer.
    fn push(
        &self,
        token: &str,
        envelope: &SyncEnvelope,
    ) -> impl Future<Output = SyncResult<PushResponse>> + Send;
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct PushAccepted {
    #[serde(rename = "updatedAt")]
    updated_at: i64,
}

/// HTTP client for the sync API.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport(err: reqwest::Error) -> SyncError {
    SyncError::Transport(err.to_string())
}

/// Map non-success statuses to errors; 401 is `Unauthorized`.
async fn expect_success(response: reqwest::Response) -> SyncResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(SyncError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> SyncResult<T> {
    response
        .json()
        .await
        .map_err(|e| SyncError::InvalidResponse(e.to_string()))
}

impl Remote for HttpRemote {
    async fn login(&self, email: &str, password: &str) -> SyncResult<String> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(transport)?;

        let body: LoginResponse = decode(expect_success(response).await?).await?;
        if body.token.trim().is_empty() {
            return Err(SyncError::InvalidResponse("empty token".to_string()));
        }
        Ok(body.token)
    }

    async fn logout(&self, token: &str) -> SyncResult<()> {
        let response = self
            .client
            .post(self.url("/api/logout"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;

        expect_success(response).await?;
        Ok(())
    }

    async fn fetch(&self, token: &str) -> SyncResult<SyncEnvelope> {
        let response = self
            .client
            .get(self.url("/api/data"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;

        decode(expect_success(response).await?).await
    }

    async fn push(&self, token: &str, envelope: &SyncEnvelope) -> SyncResult<PushResponse> {
        let response = self
            .client
            .post(self.url("/api/data"))
            .bearer_auth(token)
            .json(envelope)
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::CONFLICT {
            debug!("Remote rejected push as stale");
            return Ok(PushResponse::Conflict(decode(response).await?));
        }

        let accepted: PushAccepted = decode(expect_success(response).await?).await?;
        Ok(PushResponse::Accepted {
            updated_at: accepted.updated_at,
        })
    }
}
