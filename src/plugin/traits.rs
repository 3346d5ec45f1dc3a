// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::PluginResult;
use crate::model::{
    App, InstallAppsFlags, LaunchFlags, ListAppsFlags, ManageRepositoryFlags, Query,
    RefreshMetadataFlags, UninstallAppsFlags, UpdateAppsFlags,
};

/// Capability surface a software-center host drives
#[async_trait]
pub trait StorePlugin: Send + Sync {
    /// Name used to mark apps this plugin manages
    fn name(&self) -> &str;

    /// Connect to the backing service, replacing any previous connection
    async fn setup(&self, cancellable: &CancellationToken) -> PluginResult<()>;

    /// Ask the backing service to refresh its catalog
    async fn refresh_metadata(
        &self,
        cache_age: Duration,
        flags: RefreshMetadataFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<bool>;

    /// List repositories, installed apps, updates or search results
    async fn list_apps(
        &self,
        query: Option<&Query>,
        flags: ListAppsFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<Vec<App>>;

    async fn install_apps(
        &self,
        apps: &[App],
        flags: InstallAppsFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()>;

    async fn uninstall_apps(
        &self,
        apps: &[App],
        flags: UninstallAppsFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()>;

    async fn remove_repository(
        &self,
        repository: &App,
        flags: ManageRepositoryFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()>;

    async fn update_apps(
        &self,
        apps: &[App],
        flags: UpdateAppsFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()>;

    async fn launch(
        &self,
        app: &App,
        flags: LaunchFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()>;

    /// Release the connection and every cached entity
    async fn dispose(&self);
}
