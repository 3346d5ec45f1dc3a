// SPDX-License-Identifier: GPL-3.0-only
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;
use url::Url;

use crate::model::state::{AppState, StateCell};

/// Host metadata key holding the sort priority of repositories
pub const METADATA_SORT_KEY: &str = "GnomeSoftware::SortKey";
/// Host metadata key naming the packaging format
pub const METADATA_PACKAGING_FORMAT: &str = "GnomeSoftware::PackagingFormat";
/// Host metadata key naming the plugin that created the app
pub const METADATA_CREATOR: &str = "GnomeSoftware::Creator";
/// Metadata key holding a repository's source URL
pub const METADATA_REPO_URL: &str = "fdroid::repo-url";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppKind {
    #[default]
    DesktopApp,
    Repository,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BundleKind {
    #[default]
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    System,
}

/// Confidence in an app's display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NameQuality {
    Lowest,
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quirk {
    HasSource,
    NotLaunchable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kudo {
    SandboxedSecure,
}

/// Icon fetched over HTTP(S) by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIcon {
    pub url: Url,
}

/// Immutable description of an app or repository
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub id: String,
    pub kind: AppKind,
    pub bundle_kind: BundleKind,
    pub scope: Scope,
    pub name: Option<String>,
    pub name_quality: NameQuality,

    /// Name the store service knows the package by
    pub package_name: Option<String>,

    /// Repository the app comes from
    pub repository: Option<String>,
    pub version: Option<String>,
    pub update_version: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub developer_name: Option<String>,
    pub homepage: Option<String>,

    /// Origin label shown by the host
    pub origin_ui: Option<String>,
    pub icons: Vec<RemoteIcon>,
    pub sources: Vec<String>,
    pub quirks: Vec<Quirk>,
    pub kudos: Vec<Kudo>,

    /// Plugin responsible for state transitions of this app
    pub management_plugin: Option<String>,
    pub allow_cancel: bool,
    pub metadata: BTreeMap<String, String>,
}

impl AppInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AppKind::default(),
            bundle_kind: BundleKind::default(),
            scope: Scope::default(),
            name: None,
            name_quality: NameQuality::default(),
            package_name: None,
            repository: None,
            version: None,
            update_version: None,
            summary: None,
            description: None,
            license: None,
            developer_name: None,
            homepage: None,
            origin_ui: None,
            icons: Vec::new(),
            sources: Vec::new(),
            quirks: Vec::new(),
            kudos: Vec::new(),
            management_plugin: None,
            allow_cancel: true,
            metadata: BTreeMap::new(),
        }
    }
}

struct AppInner {
    info: AppInfo,
    state: RwLock<StateCell>,
}

/// Shared handle to an app; clones observe the same state
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

impl App {
    pub fn new(info: AppInfo, state: AppState) -> Self {
        Self {
            inner: Arc::new(AppInner {
                info,
                state: RwLock::new(StateCell::new(state)),
            }),
        }
    }

    pub fn info(&self) -> &AppInfo {
        &self.inner.info
    }

    pub fn id(&self) -> &str {
        &self.inner.info.id
    }

    pub fn kind(&self) -> AppKind {
        self.inner.info.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.info.name.as_deref()
    }

    pub fn package_name(&self) -> Option<&str> {
        self.inner.info.package_name.as_deref()
    }

    pub fn has_management_plugin(&self, plugin_name: &str) -> bool {
        self.inner.info.management_plugin.as_deref() == Some(plugin_name)
    }

    pub fn has_quirk(&self, quirk: Quirk) -> bool {
        self.inner.info.quirks.contains(&quirk)
    }

    pub fn has_kudo(&self, kudo: Kudo) -> bool {
        self.inner.info.kudos.contains(&kudo)
    }

    pub fn metadata_item(&self, key: &str) -> Option<&str> {
        self.inner.info.metadata.get(key).map(String::as_str)
    }

    pub fn state(&self) -> AppState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
    }

    /// Move to `next`; disallowed transitions are logged and ignored
    pub fn set_state(&self, next: AppState) -> bool {
        let mut cell = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
        let previous = cell.current();
        let changed = cell.set(next);
        if !changed {
            warn!(app = %self.id(), from = %previous, to = %next, "Refusing invalid state transition");
        }
        changed
    }

    /// Drop back to the last stable state after a failed or cancelled operation
    pub fn recover_state(&self) -> AppState {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .recover()
    }

    pub fn ptr_eq(&self, other: &App) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.inner.info.id)
            .field("kind", &self.inner.info.kind)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned_app(state: AppState) -> App {
        let mut info = AppInfo::new("org.example.app");
        info.package_name = Some("org.example.app".to_string());
        info.management_plugin = Some("android".to_string());
        App::new(info, state)
    }

    #[test]
    fn test_app_info_defaults() {
        let info = AppInfo::new("org.example.app");
        assert_eq!(info.kind, AppKind::DesktopApp);
        assert_eq!(info.bundle_kind, BundleKind::Package);
        assert_eq!(info.scope, Scope::System);
        assert!(info.allow_cancel);
        assert!(info.management_plugin.is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let app = owned_app(AppState::Available);
        let handle = app.clone();

        assert!(app.set_state(AppState::Installing));
        assert_eq!(handle.state(), AppState::Installing);
        assert!(app.ptr_eq(&handle));
    }

    #[test]
    fn test_recover_state_after_failed_install() {
        let app = owned_app(AppState::Available);
        app.set_state(AppState::Installing);
        assert_eq!(app.recover_state(), AppState::Available);
        assert_eq!(app.state(), AppState::Available);
    }

    #[test]
    fn test_invalid_transition_keeps_state() {
        let app = owned_app(AppState::Available);
        assert!(!app.set_state(AppState::Removing));
        assert_eq!(app.state(), AppState::Available);
    }

    #[test]
    fn test_management_plugin() {
        let app = owned_app(AppState::Installed);
        assert!(app.has_management_plugin("android"));
        assert!(!app.has_management_plugin("flatpak"));

        let foreign = App::new(AppInfo::new("org.other.app"), AppState::Installed);
        assert!(!foreign.has_management_plugin("android"));
    }
}
