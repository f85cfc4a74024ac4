// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};

/// One package entry from the GitHub organization packages listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPackage {
    /// Package name, without the organization prefix
    pub name: String,

    /// "public", "private" or "internal"
    pub visibility: String,

    /// Package ecosystem, "container" for GHCR images
    pub package_type: String,
}
