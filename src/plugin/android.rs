// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::AppCache;
use crate::config::Config;
use crate::decoder::{
    decode_installed, decode_repositories, decode_search, decode_upgradable, DecodeContext,
};
use crate::error::{PluginError, PluginResult};
use crate::model::app::METADATA_REPO_URL;
use crate::model::{
    App, AppKind, AppState, InstallAppsFlags, LaunchFlags, ListAppsFlags, ManageRepositoryFlags,
    PluginEvent, PluginStatus, Query, QueryKind, RefreshMetadataFlags, UninstallAppsFlags,
    UpdateAppsFlags,
};
use crate::plugin::launch::{accept_desktop_file, DesktopFileLauncher, Launcher};
use crate::plugin::traits::StorePlugin;
use crate::remote::{dispatch, Connector, DbusConnector, ServiceHandle, StoreProxy};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Adapter between the software-center host and the Android store service
pub struct AndroidPlugin {
    ctx: DecodeContext,
    connector: Arc<dyn Connector>,
    launcher: Arc<dyn Launcher>,
    handle: ServiceHandle,
    cache: RwLock<AppCache>,
    events: broadcast::Sender<PluginEvent>,
}

impl AndroidPlugin {
    pub fn new(config: &Config, connector: Arc<dyn Connector>, launcher: Arc<dyn Launcher>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            ctx: DecodeContext::from_config(config),
            connector,
            launcher,
            handle: ServiceHandle::new(),
            cache: RwLock::new(AppCache::new()),
            events,
        }
    }

    /// Plugin talking to the configured D-Bus service
    pub fn with_dbus(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(DbusConnector::from_config(config)),
            Arc::new(DesktopFileLauncher::from_config(config)),
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PluginEvent> {
        self.events.subscribe()
    }

    pub async fn installed_apps(&self) -> Vec<App> {
        self.cache.read().await.installed().to_vec()
    }

    pub async fn updatable_apps(&self) -> Vec<App> {
        self.cache.read().await.updatable().to_vec()
    }

    /// Entry of the keyed cache, e.g. a repository by its URL
    pub async fn cached(&self, key: &str) -> Option<App> {
        self.cache.read().await.lookup(key)
    }

    fn emit(&self, event: PluginEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn owns(&self, app: &App) -> bool {
        app.has_management_plugin(&self.ctx.plugin_name)
    }

    /// Owned, non-repository targets with a package name
    fn package_targets<'a>(&self, apps: &'a [App]) -> Vec<&'a App> {
        apps.iter()
            .filter(|app| {
                if app.kind() == AppKind::Repository {
                    debug!(repository = %app.id(), "Skipping repository in app batch");
                    return false;
                }
                if !self.owns(app) {
                    debug!(app = %app.id(), "Skipping app not managed by this plugin");
                    return false;
                }
                if app.package_name().is_none() {
                    debug!(app = %app.id(), "Skipping app without package name");
                    return false;
                }
                true
            })
            .collect()
    }

    /// Exactly one target, or the whole batch is rejected untouched.
    /// Repositories are a caller bug for single-app operations.
    fn single_target<'a>(&self, apps: &'a [App], message: &str) -> PluginResult<&'a App> {
        for app in apps {
            assert!(
                app.kind() != AppKind::Repository,
                "repository {} passed as an app",
                app.id()
            );
        }
        match self.package_targets(apps).as_slice() {
            [app] => Ok(*app),
            _ => Err(PluginError::not_supported(message)),
        }
    }

    /// Run a single-app operation: `pending` while the call runs, `done` on success,
    /// back to the last stable state on failure or cancellation
    async fn transition<F, Fut>(
        &self,
        app: &App,
        pending: AppState,
        done: AppState,
        cancellable: &CancellationToken,
        call: F,
    ) -> PluginResult<()>
    where
        F: FnOnce(Arc<dyn StoreProxy>) -> Fut,
        Fut: std::future::Future<Output = PluginResult<()>>,
    {
        let proxy = self.handle.get().await?;
        if cancellable.is_cancelled() {
            return Err(PluginError::Cancelled);
        }

        app.set_state(pending);
        match call(proxy).await {
            Ok(()) => {
                app.set_state(done);
                Ok(())
            }
            Err(e) => {
                let restored = app.recover_state();
                debug!(app = %app.id(), state = %restored, error = %e, "Rolled back app state");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl StorePlugin for AndroidPlugin {
    fn name(&self) -> &str {
        &self.ctx.plugin_name
    }

    async fn setup(&self, cancellable: &CancellationToken) -> PluginResult<()> {
        debug!(version = env!("CARGO_PKG_VERSION"), "Android plugin version");

        let proxy = dispatch("Connect", cancellable, self.connector.connect())
            .await
            .map_err(|e| match e {
                PluginError::Remote(err) => PluginError::Connection(err),
                other => other,
            })?;

        if self.handle.replace(proxy).await.is_some() {
            debug!("Replaced previous store connection");
        }
        info!("Connected to Android store service");
        Ok(())
    }

    async fn refresh_metadata(
        &self,
        cache_age: Duration,
        _flags: RefreshMetadataFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<bool> {
        let proxy = self.handle.get().await?;
        debug!(cache_age_secs = cache_age.as_secs(), "Refreshing Android store metadata");

        self.emit(PluginEvent::Status(PluginStatus::Downloading));
        let updated = dispatch("UpdateCache", cancellable, proxy.update_cache()).await?;

        info!(success = updated, "Android store cache refreshed");
        self.emit(PluginEvent::UpdatesChanged);
        Ok(updated)
    }

    async fn list_apps(
        &self,
        query: Option<&Query>,
        _flags: ListAppsFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<Vec<App>> {
        let Some(query) = query else {
            return Err(PluginError::not_supported("Unsupported query"));
        };
        let kind = query.classify()?;
        let proxy = self.handle.get().await?;

        match kind {
            QueryKind::Sources => {
                let records = dispatch("GetRepositories", cancellable, proxy.get_repositories()).await?;
                let repositories = decode_repositories(&self.ctx, records);

                let mut cache = self.cache.write().await;
                for repository in &repositories {
                    if let Some(url) = repository.metadata_item(METADATA_REPO_URL) {
                        cache.add(url, repository.clone());
                    }
                }
                Ok(repositories)
            }
            QueryKind::Installed => {
                let fields = dispatch("GetInstalledApps", cancellable, proxy.get_installed_apps()).await?;
                let apps = decode_installed(&self.ctx, fields);
                self.cache.write().await.replace_installed(&apps);
                Ok(apps)
            }
            QueryKind::Updates => {
                let fields = dispatch("GetUpgradable", cancellable, proxy.get_upgradable()).await?;
                let apps = decode_upgradable(&self.ctx, fields);
                self.cache.write().await.append_updatable(&apps);
                Ok(apps)
            }
            QueryKind::Search(keywords) => {
                let search = keywords.join(" ");
                debug!(query = %search, "Searching Android store");
                let document = dispatch("Search", cancellable, proxy.search(&search)).await?;
                let cache = self.cache.read().await;
                decode_search(&self.ctx, &document, &cache)
            }
        }
    }

    async fn install_apps(
        &self,
        apps: &[App],
        flags: InstallAppsFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()> {
        if !flags.is_supported() {
            return Err(PluginError::not_supported("Unsupported flags"));
        }
        let app = self.single_target(apps, "Can only install one app at a time")?;
        let package_name = app.package_name().unwrap_or_default().to_string();

        info!(package = %package_name, "Installing Android app");
        self.transition(app, AppState::Installing, AppState::Installed, cancellable, |proxy| async move {
            dispatch("Install", cancellable, proxy.install(&package_name)).await
        })
        .await?;

        self.emit(PluginEvent::UpdatesChanged);
        Ok(())
    }

    async fn uninstall_apps(
        &self,
        apps: &[App],
        _flags: UninstallAppsFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()> {
        let app = self.single_target(apps, "Can only uninstall one app at a time")?;
        let package_name = app.package_name().unwrap_or_default().to_string();

        info!(package = %package_name, "Uninstalling Android app");
        self.transition(app, AppState::Removing, AppState::Available, cancellable, |proxy| async move {
            dispatch("UninstallApp", cancellable, proxy.uninstall_app(&package_name)).await
        })
        .await?;

        self.emit(PluginEvent::UpdatesChanged);
        Ok(())
    }

    async fn remove_repository(
        &self,
        repository: &App,
        _flags: ManageRepositoryFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()> {
        assert_eq!(
            repository.kind(),
            AppKind::Repository,
            "{} is not a repository",
            repository.id()
        );
        if !self.owns(repository) {
            debug!(repository = %repository.id(), "Skipping repository not managed by this plugin");
            return Ok(());
        }

        let repository_id = repository.id().to_string();
        info!(repository = %repository_id, "Removing F-Droid repository");
        self.transition(repository, AppState::Removing, AppState::Available, cancellable, |proxy| async move {
            dispatch("RemoveRepository", cancellable, proxy.remove_repository(&repository_id)).await
        })
        .await
    }

    async fn update_apps(
        &self,
        apps: &[App],
        flags: UpdateAppsFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()> {
        if flags.no_apply {
            debug!("Download-only update requested, nothing to apply");
            return Ok(());
        }

        let targets = self.package_targets(apps);
        if targets.is_empty() {
            debug!("No Android apps to update");
            return Ok(());
        }
        let proxy = self.handle.get().await?;

        let package_names: Vec<String> = targets
            .iter()
            .filter_map(|app| app.package_name().map(str::to_string))
            .collect();

        self.emit(PluginEvent::Status(PluginStatus::Waiting));
        for app in &targets {
            app.set_state(AppState::Installing);
        }

        info!(count = package_names.len(), "Upgrading Android apps");
        // Targets stay Installing when the batch fails
        let upgraded = dispatch("UpgradePackages", cancellable, proxy.upgrade_packages(&package_names)).await?;
        if !upgraded {
            return Err(PluginError::Failed("Failed to upgrade packages".to_string()));
        }

        for app in &targets {
            app.set_state(AppState::Installed);
        }
        self.emit(PluginEvent::UpdatesChanged);
        Ok(())
    }

    async fn launch(
        &self,
        app: &App,
        flags: LaunchFlags,
        cancellable: &CancellationToken,
    ) -> PluginResult<()> {
        self.launcher
            .launch(app, flags, accept_desktop_file, cancellable)
            .await
    }

    async fn dispose(&self) {
        self.handle.release().await;
        self.cache.write().await.clear();
        debug!("Android plugin disposed");
    }
}
