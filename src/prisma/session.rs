// SPDX-License-Identifier: GPL-3.0-only
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use url::Url;

use crate::prisma::console::ComputeConsole;
use crate::prisma::error::PrismaError;

/// Front-door client for the Prisma Cloud SaaS API.
///
/// Only used to obtain a session token and discover the compute console URL;
/// all registry work happens on the [`ComputeConsole`] handed out by
/// [`establish`].
pub struct SaasGateway {
    client: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

#[derive(Deserialize)]
struct MetaInfoResponse {
    #[serde(rename = "twistlockUrl")]
    twistlock_url: Option<String>,
}

impl SaasGateway {
    /// Build a gateway for the configured API URL. A bare host is accepted
    /// and assumed to be https.
    pub fn new(api_url: &str) -> Result<Self, PrismaError> {
        let normalized = if api_url.starts_with("http://") || api_url.starts_with("https://") {
            api_url.to_string()
        } else {
            format!("https://{}", api_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| PrismaError::InvalidUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("ghcr-prisma-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Exchange the access key pair for a front-door session token.
    pub async fn login(&self, access_key: &str, secret_key: &str) -> Result<String, PrismaError> {
        let url = self.endpoint("login");
        info!(url = %url, "Logging in to Prisma Cloud");

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest {
                username: access_key,
                password: secret_key,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Front-door login failed");
            return Err(PrismaError::Api {
                operation: "login",
                status,
                body,
            });
        }

        let login: LoginResponse = response.json().await?;
        login.token.ok_or(PrismaError::MissingToken)
    }

    /// Discover the compute console base URL via `meta_info`.
    pub async fn compute_console_url(&self, token: &str) -> Result<String, PrismaError> {
        let url = self.endpoint("meta_info");
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Compute console discovery failed");
            return Err(PrismaError::Api {
                operation: "meta_info",
                status,
                body,
            });
        }

        let meta: MetaInfoResponse = response.json().await?;
        let compute_url = meta.twistlock_url.ok_or(PrismaError::MissingComputeUrl)?;
        debug!(compute_url = %compute_url, "Discovered compute console");
        Ok(compute_url)
    }
}

/// Run the full two-plane handshake: front-door login, compute console
/// discovery, compute authentication. Each step is checked; a failure at any
/// point aborts the chain.
pub async fn establish(
    api_url: &str,
    access_key: &str,
    secret_key: &str,
) -> Result<ComputeConsole, PrismaError> {
    let gateway = SaasGateway::new(api_url)?;
    let session_token = gateway.login(access_key, secret_key).await?;
    let compute_url = gateway.compute_console_url(&session_token).await?;
    ComputeConsole::authenticate(compute_url, access_key, secret_key).await
}
