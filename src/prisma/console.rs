// SPDX-License-Identifier: GPL-3.0-only
use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use tracing::{debug, error, info};

use crate::prisma::error::PrismaError;
use crate::prisma::models::{ApiToken, CredentialPayload, RegistrySettings, ScannedImage};
use crate::prisma::traits::RegistryConsole;

// Query value is sent pre-encoded, the console expects the literal '+'.
const CONSOLE_PROJECT: &str = "Central+Console";

/// Authenticated client for the compute console API.
#[derive(Debug, Clone)]
pub struct ComputeConsole {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: Option<String>,
}

impl ComputeConsole {
    /// Authenticate against the compute console and return a ready client.
    pub async fn authenticate(
        base_url: String,
        access_key: &str,
        secret_key: &str,
    ) -> Result<Self, PrismaError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("ghcr-prisma-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let url = format!("{}/api/v1/authenticate", base_url);
        info!(url = %url, "Authenticating against compute console");

        let response = client
            .post(&url)
            .json(&AuthRequest {
                username: access_key,
                password: secret_key,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Compute console authentication failed");
            return Err(PrismaError::Api {
                operation: "authenticate",
                status,
                body,
            });
        }

        let auth: AuthResponse = response.json().await?;
        let token = auth.token.ok_or(PrismaError::MissingToken)?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn build_request(&self, method: Method, path_and_query: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path_and_query);
        self.client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.token))
    }
}

#[async_trait]
impl RegistryConsole for ComputeConsole {
    async fn upsert_credential(&self, name: &str, secret: &str) -> Result<(), PrismaError> {
        info!(credential = %name, "Upserting GitHub token credential");

        let payload = CredentialPayload {
            id: name.to_string(),
            credential_type: "gitlabToken".to_string(),
            api_token: ApiToken {
                encrypted: String::new(),
                plain: secret.to_string(),
            },
            service_account: Map::new(),
            description: format!("Managed by {}", env!("CARGO_PKG_NAME")),
            url: String::new(),
            skip_verify: false,
        };

        let response = self
            .build_request(Method::POST, "/api/v1/credentials")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Credential upsert failed");
            return Err(PrismaError::Api {
                operation: "upsert_credential",
                status,
                body,
            });
        }

        debug!(credential = %name, "Credential stored");
        Ok(())
    }

    async fn registry_settings(&self) -> Result<RegistrySettings, PrismaError> {
        let path = format!("/api/v1/settings/registry?project={}", CONSOLE_PROJECT);
        let response = self.build_request(Method::GET, &path).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Fetching registry settings failed");
            return Err(PrismaError::Api {
                operation: "registry_settings",
                status,
                body,
            });
        }

        let settings: RegistrySettings = response.json().await?;
        debug!(count = settings.specifications.len(), "Fetched registry specifications");
        Ok(settings)
    }

    async fn put_registry_settings(&self, settings: &RegistrySettings) -> Result<(), PrismaError> {
        info!(count = settings.specifications.len(), "Writing registry specifications");

        let path = format!(
            "/api/v1/settings/registry?project={}&scanLater=false",
            CONSOLE_PROJECT
        );
        let response = self
            .build_request(Method::PUT, &path)
            .json(settings)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Writing registry settings failed");
            return Err(PrismaError::Api {
                operation: "put_registry_settings",
                status,
                body,
            });
        }

        info!("Registry specifications written");
        Ok(())
    }

    async fn image_counts_by_registry(&self) -> Result<Vec<(String, usize)>, PrismaError> {
        let path = format!("/api/v1/registry?compact=true&project={}", CONSOLE_PROJECT);
        let response = self.build_request(Method::GET, &path).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Fetching scanned images failed");
            return Err(PrismaError::Api {
                operation: "image_counts",
                status,
                body,
            });
        }

        let images: Vec<ScannedImage> = response.json().await?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for image in &images {
            for tag in &image.tags {
                *counts.entry(tag.registry.clone()).or_insert(0) += 1;
            }
        }

        let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }
}
