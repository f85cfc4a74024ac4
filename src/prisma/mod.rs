// SPDX-License-Identifier: GPL-3.0-only
pub mod console;
pub mod error;
pub mod models;
pub mod session;
pub mod traits;

pub use console::ComputeConsole;
pub use error::PrismaError;
pub use models::{RegistrySettings, RegistrySpec};
pub use traits::RegistryConsole;
