// SPDX-License-Identifier: GPL-3.0-only
use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum PrismaError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid Prisma Cloud API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{operation} returned HTTP {status}: {body}")]
    Api {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("authentication response did not contain a token")]
    MissingToken,

    #[error("meta_info response did not contain a compute console URL")]
    MissingComputeUrl,
}
