// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use crate::github::models::ContainerPackage;

#[async_trait]
pub trait PackageLister: Send + Sync {
    /// List container-type packages owned by the organization.
    ///
    /// `limit` caps the number of returned records; 0 means unbounded.
    async fn list_container_packages(
        &self,
        organization: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<ContainerPackage>>;
}
