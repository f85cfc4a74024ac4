// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::github::models::ContainerPackage;
use crate::github::traits::PackageLister;

const GITHUB_API_URL: &str = "https://api.github.com";
const PAGE_SIZE: usize = 100;

pub struct GithubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(token: String) -> anyhow::Result<Self> {
        Self::with_base_url(GITHUB_API_URL.to_string(), token)
    }

    /// Client against a non-default API base, used by tests.
    pub fn with_base_url(base_url: String, token: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("ghcr-prisma-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

#[async_trait]
impl PackageLister for GithubClient {
    async fn list_container_packages(
        &self,
        organization: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<ContainerPackage>> {
        let mut packages = Vec::new();
        let mut page = 1u32;

        while limit == 0 || packages.len() < limit {
            let url = format!(
                "{}/orgs/{}/packages?package_type=container&page={}&per_page={}",
                self.base_url, organization, page, PAGE_SIZE
            );
            info!(url = %url, "Fetching package page");

            let response = self
                .client
                .get(&url)
                .header("Accept", "application/vnd.github+json")
                .header("Authorization", format!("Bearer {}", self.token))
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %body, "Package listing failed, keeping what was fetched so far");
                break;
            }

            let batch: Vec<ContainerPackage> = response.json().await?;
            if batch.is_empty() {
                break;
            }

            for package in batch {
                // The endpoint already filters by package_type; keep the check
                // so a listing change cannot leak foreign package kinds in.
                if package.package_type != "container" {
                    debug!(name = %package.name, package_type = %package.package_type, "Skipping non-container package");
                    continue;
                }

                packages.push(package);
                if limit != 0 && packages.len() == limit {
                    break;
                }
            }

            page += 1;
        }

        info!(count = packages.len(), organization, "Package listing complete");
        Ok(packages)
    }
}
