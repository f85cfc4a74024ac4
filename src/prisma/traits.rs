// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;

use crate::prisma::error::PrismaError;
use crate::prisma::models::RegistrySettings;

#[async_trait]
pub trait RegistryConsole: Send + Sync {
    /// Overwrite the named credential slot with the given secret.
    async fn upsert_credential(&self, name: &str, secret: &str) -> Result<(), PrismaError>;

    /// Fetch the current registry scanning configuration.
    async fn registry_settings(&self) -> Result<RegistrySettings, PrismaError>;

    /// Replace the registry scanning configuration wholesale.
    async fn put_registry_settings(&self, settings: &RegistrySettings) -> Result<(), PrismaError>;

    /// Count scanned images per registry host, sorted by count descending.
    async fn image_counts_by_registry(&self) -> Result<Vec<(String, usize)>, PrismaError>;
}
