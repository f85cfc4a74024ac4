// SPDX-License-Identifier: GPL-3.0-only
pub mod client;
pub mod models;
pub mod traits;

pub use client::GithubClient;
pub use models::ContainerPackage;
pub use traits::PackageLister;
