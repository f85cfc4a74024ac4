// SPDX-License-Identifier: GPL-3.0-only
use clap::Parser;
use std::path::PathBuf;

/// Registers a GitHub organization's GHCR container repositories in Prisma
/// Cloud's registry scanning configuration.
#[derive(Debug, Parser)]
#[command(name = "ghcr-prisma-sync", version)]
pub struct Cli {
    /// GitHub organization whose container packages are synchronized.
    #[arg(short, long)]
    pub organization: String,

    /// Name of the Prisma Cloud credential that stores the GitHub token.
    #[arg(short = 't', long)]
    pub ghcr_token_name: String,

    /// Maximum number of packages to fetch; 0 fetches everything.
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Log file appended to in addition to console output.
    #[arg(long, default_value = "ghcr-sync.log")]
    pub log_file: PathBuf,

    /// Log per-registry image counts after the sync completes.
    #[arg(long)]
    pub image_counts: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Credentials and endpoints read from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prisma Cloud SaaS API base, scheme optional
    pub prisma_api_url: String,

    /// Access key used for both the front door and the compute console
    pub prisma_access_key: String,

    /// Secret key paired with the access key
    pub prisma_secret_key: String,

    /// GitHub token used for listing and stored as the scan credential
    pub github_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            prisma_api_url: require("PRISMA_API_URL")?,
            prisma_access_key: require("PRISMA_ACCESS_KEY")?,
            prisma_secret_key: require("PRISMA_SECRET_KEY")?,
            github_token: require("GITHUB_TOKEN")?,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}
