// SPDX-License-Identifier: GPL-3.0-only
//! Software-center adapter for the FuriOS Android store service.
//!
//! The store service owns the F-Droid catalog and performs installs and
//! upgrades; this crate exposes it to a software-center host as a plugin
//! that lists repositories, installed apps, updates and search results and
//! drives each app through its install/remove state machine.

pub mod cache;
pub mod config;
pub mod decoder;
pub mod error;
pub mod logging;
pub mod model;
pub mod plugin;
pub mod remote;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::Config;
pub use error::{PluginError, PluginResult, RemoteError};
pub use model::{App, AppState, PluginEvent, Query};
pub use plugin::{AndroidPlugin, StorePlugin};
