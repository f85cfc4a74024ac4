// SPDX-License-Identifier: GPL-3.0-only
pub mod reconciler;

pub use reconciler::merge_missing_packages;

use tracing::{info, warn};

use crate::github::traits::PackageLister;
use crate::prisma::traits::RegistryConsole;

/// Inputs for one synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// GitHub organization owning the container packages
    pub organization: String,

    /// Prisma Cloud credential slot that stores the GitHub token
    pub credential_name: String,

    /// Secret stored into that slot
    pub credential_secret: String,

    /// Package cap, 0 for unbounded
    pub limit: usize,
}

#[derive(Debug)]
pub struct SyncSummary {
    /// Container packages found at the source
    pub discovered: usize,

    /// Repository keys newly registered this run
    pub added: Vec<String>,

    /// Specification count after the write
    pub total: usize,
}

/// One full synchronization pass: list source packages, upsert the pull
/// credential, merge missing repositories into the registry settings, and
/// write the merged document back.
///
/// The write replaces the whole specification list, so a concurrent writer
/// mutating the console between the fetch and the write loses its update.
/// The endpoint offers no conditional-write token; the race is accepted.
pub async fn run(
    lister: &dyn PackageLister,
    console: &dyn RegistryConsole,
    options: &SyncOptions,
) -> anyhow::Result<SyncSummary> {
    let packages = lister
        .list_container_packages(&options.organization, options.limit)
        .await?;

    // A failed credential write is not fatal: the entries are still worth
    // registering and will reference the slot once it exists.
    if let Err(e) = console
        .upsert_credential(&options.credential_name, &options.credential_secret)
        .await
    {
        warn!(error = %e, credential = %options.credential_name, "Credential upsert failed, continuing");
    }

    let mut settings = console.registry_settings().await?;
    let added = merge_missing_packages(
        &mut settings,
        &packages,
        &options.organization,
        &options.credential_name,
    );
    console.put_registry_settings(&settings).await?;

    info!(
        discovered = packages.len(),
        added = added.len(),
        total = settings.specifications.len(),
        "Registry synchronization complete"
    );

    Ok(SyncSummary {
        discovered: packages.len(),
        added,
        total: settings.specifications.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use crate::github::models::ContainerPackage;
    use crate::prisma::error::PrismaError;
    use crate::prisma::models::{RegistrySettings, RegistrySpec};

    struct FixedLister(Vec<ContainerPackage>);

    #[async_trait]
    impl PackageLister for FixedLister {
        async fn list_container_packages(
            &self,
            _organization: &str,
            _limit: usize,
        ) -> anyhow::Result<Vec<ContainerPackage>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingConsole {
        settings: Mutex<RegistrySettings>,
        written: Mutex<Option<RegistrySettings>>,
        credentials: Mutex<Vec<(String, String)>>,
        fail_credential: bool,
        fail_put: bool,
    }

    #[async_trait]
    impl RegistryConsole for RecordingConsole {
        async fn upsert_credential(&self, name: &str, secret: &str) -> Result<(), PrismaError> {
            if self.fail_credential {
                return Err(PrismaError::Api {
                    operation: "upsert_credential",
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: String::new(),
                });
            }
            self.credentials
                .lock()
                .unwrap()
                .push((name.to_string(), secret.to_string()));
            Ok(())
        }

        async fn registry_settings(&self) -> Result<RegistrySettings, PrismaError> {
            Ok(self.settings.lock().unwrap().clone())
        }

        async fn put_registry_settings(
            &self,
            settings: &RegistrySettings,
        ) -> Result<(), PrismaError> {
            if self.fail_put {
                return Err(PrismaError::Api {
                    operation: "put_registry_settings",
                    status: StatusCode::BAD_GATEWAY,
                    body: String::new(),
                });
            }
            *self.written.lock().unwrap() = Some(settings.clone());
            Ok(())
        }

        async fn image_counts_by_registry(&self) -> Result<Vec<(String, usize)>, PrismaError> {
            Ok(Vec::new())
        }
    }

    fn package(name: &str) -> ContainerPackage {
        ContainerPackage {
            name: name.to_string(),
            visibility: "private".to_string(),
            package_type: "container".to_string(),
        }
    }

    fn options() -> SyncOptions {
        SyncOptions {
            organization: "acme".to_string(),
            credential_name: "gh-token".to_string(),
            credential_secret: "ghp_secret".to_string(),
            limit: 0,
        }
    }

    #[tokio::test]
    async fn test_run_registers_missing_packages() {
        let lister = FixedLister(vec![package("svc-a"), package("svc-b")]);
        let console = RecordingConsole::default();
        console
            .settings
            .lock()
            .unwrap()
            .specifications
            .push(RegistrySpec::ghcr("acme/svc-a".into(), "gh-token".into()));

        let summary = run(&lister, &console, &options()).await.unwrap();

        assert_eq!(summary.discovered, 2);
        assert_eq!(summary.added, vec!["acme/svc-b".to_string()]);
        assert_eq!(summary.total, 2);

        let written = console.written.lock().unwrap().clone().unwrap();
        assert_eq!(written.specifications.len(), 2);
        assert_eq!(written.specifications[1].repository, "acme/svc-b");

        assert_eq!(
            console.credentials.lock().unwrap().as_slice(),
            &[("gh-token".to_string(), "ghp_secret".to_string())]
        );
    }

    #[tokio::test]
    async fn test_run_survives_credential_failure() {
        let lister = FixedLister(vec![package("svc-a")]);
        let console = RecordingConsole {
            fail_credential: true,
            ..Default::default()
        };

        let summary = run(&lister, &console, &options()).await.unwrap();

        assert_eq!(summary.added, vec!["acme/svc-a".to_string()]);
        assert!(console.written.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_run_propagates_write_failure() {
        let lister = FixedLister(vec![package("svc-a")]);
        let console = RecordingConsole {
            fail_put: true,
            ..Default::default()
        };

        let result = run(&lister, &console, &options()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_writes_even_when_nothing_added() {
        let lister = FixedLister(vec![package("svc-a")]);
        let console = RecordingConsole::default();
        console
            .settings
            .lock()
            .unwrap()
            .specifications
            .push(RegistrySpec::ghcr("acme/svc-a".into(), "gh-token".into()));

        let summary = run(&lister, &console, &options()).await.unwrap();

        assert!(summary.added.is_empty());
        assert_eq!(summary.total, 1);
        assert!(console.written.lock().unwrap().is_some());
    }
}
