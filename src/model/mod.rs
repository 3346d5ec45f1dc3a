// SPDX-License-Identifier: GPL-3.0-only
pub mod app;
pub mod events;
pub mod flags;
pub mod query;
pub mod state;

pub use app::{App, AppInfo, AppKind, BundleKind, Kudo, NameQuality, Quirk, RemoteIcon, Scope};
pub use events::{PluginEvent, PluginStatus};
pub use flags::{
    InstallAppsFlags, LaunchFlags, ListAppsFlags, ManageRepositoryFlags, RefreshMetadataFlags,
    UninstallAppsFlags, UpdateAppsFlags,
};
pub use query::{Query, QueryKind, Tristate};
pub use state::AppState;
