// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One registry entry in the compute console's scanning configuration.
///
/// Entries owned by other writers can carry fields this tool does not know
/// about; `#[serde(default)]` plus the flattened `extra` map keep a
/// fetch-then-replace cycle from dropping them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySpec {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub registry: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub tag: String,
    #[serde(rename = "credentialID", default)]
    pub credential_id: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub harbor_deployment_security: bool,
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default)]
    pub cap: u32,
    #[serde(default)]
    pub scanners: u32,
    #[serde(default)]
    pub version_pattern: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegistrySpec {
    /// Fixed scanning policy for a newly registered GHCR repository.
    pub fn ghcr(repository: String, credential_id: String) -> Self {
        Self {
            version: "gitlab".to_string(),
            registry: "ghcr.io".to_string(),
            namespace: String::new(),
            repository,
            tag: String::new(),
            credential_id,
            os: "linux".to_string(),
            harbor_deployment_security: false,
            collections: vec!["All".to_string()],
            cap: 2,
            scanners: 10,
            version_pattern: String::new(),
            extra: Map::new(),
        }
    }
}

/// The console's registry settings document. Only `specifications` is
/// interpreted; sibling fields round-trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySettings {
    #[serde(default)]
    pub specifications: Vec<RegistrySpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    pub api_token: ApiToken,
    pub service_account: Map<String, Value>,
    pub description: String,
    pub url: String,
    pub skip_verify: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiToken {
    pub encrypted: String,
    pub plain: String,
}

/// One scanned image from the compact registry listing.
#[derive(Debug, Deserialize)]
pub struct ScannedImage {
    #[serde(default)]
    pub tags: Vec<ImageTag>,
}

#[derive(Debug, Deserialize)]
pub struct ImageTag {
    #[serde(default)]
    pub registry: String,
}
