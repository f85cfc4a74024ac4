// SPDX-License-Identifier: GPL-3.0-only
use std::collections::HashSet;

use tracing::{debug, info};

use crate::github::models::ContainerPackage;
use crate::prisma::models::{RegistrySettings, RegistrySpec};

/// De-duplication key: lowercased `organization/name` repository path.
pub fn repository_key(organization: &str, name: &str) -> String {
    format!("{}/{}", organization.to_lowercase(), name.to_lowercase())
}

/// Append a specification for every source package not already present,
/// matched case-insensitively by repository path.
///
/// Existing entries are never touched; duplicate source names collapse to a
/// single new entry. Returns the repository keys that were added.
pub fn merge_missing_packages(
    settings: &mut RegistrySettings,
    packages: &[ContainerPackage],
    organization: &str,
    credential_id: &str,
) -> Vec<String> {
    let mut known: HashSet<String> = settings
        .specifications
        .iter()
        .map(|spec| spec.repository.to_lowercase())
        .collect();

    let mut added = Vec::new();
    for package in packages {
        let repository = repository_key(organization, &package.name);
        if known.insert(repository.clone()) {
            info!(repository = %repository, "Registry to be added");
            settings
                .specifications
                .push(RegistrySpec::ghcr(repository.clone(), credential_id.to_string()));
            added.push(repository);
        } else {
            debug!(repository = %repository, "Registry already present");
        }
    }

    added
}
