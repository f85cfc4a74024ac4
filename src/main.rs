// SPDX-License-Identifier: GPL-3.0-only
mod config;
mod github;
mod logging;
mod prisma;
mod sync;

use clap::Parser;
use tracing::{error, info, warn};

use config::{Cli, Config};
use github::GithubClient;
use logging::setup_logging;
use prisma::RegistryConsole;
use sync::SyncOptions;

// Failure categories map to distinct exit codes; clap uses 2 for usage
// errors, so configuration problems share it.
const EXIT_SYNC: i32 = 1;
const EXIT_CONFIG: i32 = 2;
const EXIT_AUTH: i32 = 3;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // A local .env file fills in whatever the environment lacks.
    let _ = dotenvy::dotenv();

    if let Err(e) = setup_logging(cli.debug, &cli.log_file) {
        eprintln!("failed to initialize logging: {e:#}");
        std::process::exit(EXIT_CONFIG);
    }

    info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration incomplete");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let console = match prisma::session::establish(
        &config.prisma_api_url,
        &config.prisma_access_key,
        &config.prisma_secret_key,
    )
    .await
    {
        Ok(console) => console,
        Err(e) => {
            error!(error = %e, "Unable to authenticate against Prisma Cloud");
            std::process::exit(EXIT_AUTH);
        }
    };

    let lister = match GithubClient::new(config.github_token.clone()) {
        Ok(lister) => lister,
        Err(e) => {
            error!(error = %e, "Unable to build GitHub client");
            std::process::exit(EXIT_SYNC);
        }
    };

    let options = SyncOptions {
        organization: cli.organization,
        credential_name: cli.ghcr_token_name,
        credential_secret: config.github_token,
        limit: cli.limit,
    };

    match sync::run(&lister, &console, &options).await {
        Ok(summary) => {
            info!(
                discovered = summary.discovered,
                added = summary.added.len(),
                total = summary.total,
                "Synchronization finished"
            );
        }
        Err(e) => {
            error!(error = %e, "Synchronization failed");
            std::process::exit(EXIT_SYNC);
        }
    }

    if cli.image_counts {
        match console.image_counts_by_registry().await {
            Ok(counts) => {
                for (registry, images) in counts {
                    info!(registry = %registry, images, "Scanned image count");
                }
            }
            Err(e) => warn!(error = %e, "Unable to fetch image counts"),
        }
    }
}
