// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::config::Config;
use crate::decoder::{decode_repositories, DecodeContext};
use crate::error::RemoteError;
use crate::model::{App, AppInfo, AppState};
use crate::remote::{Connector, FieldMap, RepositoryRecord, StoreProxy};

/// Scripted store service that records every call it receives
pub struct MockStore {
    repositories: Mutex<Vec<RepositoryRecord>>,
    installed: Mutex<Vec<FieldMap>>,
    upgradable: Mutex<Vec<FieldMap>>,
    search_document: Mutex<String>,
    update_cache_result: Mutex<bool>,
    upgrade_result: Mutex<bool>,
    failures: Mutex<HashMap<&'static str, RemoteError>>,
    calls: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
    /// Signalled whenever a call reaches the store
    pub started: Notify,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            repositories: Mutex::new(Vec::new()),
            installed: Mutex::new(Vec::new()),
            upgradable: Mutex::new(Vec::new()),
            search_document: Mutex::new("[]".to_string()),
            update_cache_result: Mutex::new(true),
            upgrade_result: Mutex::new(true),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
            started: Notify::new(),
        }
    }

    pub fn set_repositories(&self, records: Vec<RepositoryRecord>) {
        *self.repositories.lock().unwrap() = records;
    }

    pub fn set_installed(&self, fields: Vec<FieldMap>) {
        *self.installed.lock().unwrap() = fields;
    }

    pub fn set_upgradable(&self, fields: Vec<FieldMap>) {
        *self.upgradable.lock().unwrap() = fields;
    }

    pub fn set_search_document(&self, document: impl Into<String>) {
        *self.search_document.lock().unwrap() = document.into();
    }

    pub fn set_update_cache_result(&self, success: bool) {
        *self.update_cache_result.lock().unwrap() = success;
    }

    pub fn set_upgrade_result(&self, success: bool) {
        *self.upgrade_result.lock().unwrap() = success;
    }

    /// Make `method` fail with `error` until cleared
    pub fn fail(&self, method: &'static str, error: RemoteError) {
        self.failures.lock().unwrap().insert(method, error);
    }

    /// Hold every call until `gate` is notified
    pub fn hold_calls(&self, gate: Arc<Notify>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, method: &'static str, argument: Option<String>) -> Result<(), RemoteError> {
        let call = match argument {
            Some(argument) => format!("{method}:{argument}"),
            None => method.to_string(),
        };
        self.calls.lock().unwrap().push(call);
        self.started.notify_one();

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.failures.lock().unwrap().get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreProxy for MockStore {
    async fn update_cache(&self) -> Result<bool, RemoteError> {
        self.enter("UpdateCache", None).await?;
        Ok(*self.update_cache_result.lock().unwrap())
    }

    async fn get_repositories(&self) -> Result<Vec<RepositoryRecord>, RemoteError> {
        self.enter("GetRepositories", None).await?;
        Ok(self.repositories.lock().unwrap().clone())
    }

    async fn get_installed_apps(&self) -> Result<Vec<FieldMap>, RemoteError> {
        self.enter("GetInstalledApps", None).await?;
        Ok(self.installed.lock().unwrap().clone())
    }

    async fn get_upgradable(&self) -> Result<Vec<FieldMap>, RemoteError> {
        self.enter("GetUpgradable", None).await?;
        Ok(self.upgradable.lock().unwrap().clone())
    }

    async fn search(&self, query: &str) -> Result<String, RemoteError> {
        self.enter("Search", Some(query.to_string())).await?;
        Ok(self.search_document.lock().unwrap().clone())
    }

    async fn install(&self, package_name: &str) -> Result<(), RemoteError> {
        self.enter("Install", Some(package_name.to_string())).await
    }

    async fn uninstall_app(&self, package_name: &str) -> Result<(), RemoteError> {
        self.enter("UninstallApp", Some(package_name.to_string())).await
    }

    async fn remove_repository(&self, repository_id: &str) -> Result<(), RemoteError> {
        self.enter("RemoveRepository", Some(repository_id.to_string())).await
    }

    async fn upgrade_packages(&self, package_names: &[String]) -> Result<bool, RemoteError> {
        self.enter("UpgradePackages", Some(package_names.join(","))).await?;
        Ok(*self.upgrade_result.lock().unwrap())
    }
}

/// Hands out the same `MockStore` on every connect, or a scripted failure
pub struct MockConnector {
    store: Arc<MockStore>,
    failure: Mutex<Option<RemoteError>>,
    connects: Mutex<usize>,
}

impl MockConnector {
    pub fn new(store: Arc<MockStore>) -> Self {
        Self {
            store,
            failure: Mutex::new(None),
            connects: Mutex::new(0),
        }
    }

    pub fn fail_with(&self, error: Option<RemoteError>) {
        *self.failure.lock().unwrap() = error;
    }

    pub fn connects(&self) -> usize {
        *self.connects.lock().unwrap()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self) -> Result<Arc<dyn StoreProxy>, RemoteError> {
        *self.connects.lock().unwrap() += 1;
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(Arc::clone(&self.store) as Arc<dyn StoreProxy>)
    }
}

/// Create a test configuration with temporary application directories
pub fn create_test_config(applications_dir: &std::path::Path) -> Config {
    Config {
        applications_dirs: vec![applications_dir.to_path_buf()],
        log_level: "error".to_string(),
        ..Config::default()
    }
}

pub fn field_map(entries: &[(&str, &str)]) -> FieldMap {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// App managed by the default plugin name, with package name equal to its id
pub fn owned_app(id: &str, state: AppState) -> App {
    let mut info = AppInfo::new(id);
    info.package_name = Some(id.to_string());
    info.management_plugin = Some(DecodeContext::default().plugin_name);
    info.sources.push(id.to_string());
    App::new(info, state)
}

pub fn installed_app(package_name: &str) -> App {
    owned_app(package_name, AppState::Installed)
}

/// App owned by some other plugin
pub fn foreign_app(id: &str, state: AppState) -> App {
    let mut info = AppInfo::new(id);
    info.package_name = Some(id.to_string());
    info.management_plugin = Some("flatpak".to_string());
    App::new(info, state)
}

pub fn repository_app(name: &str, url: &str) -> App {
    let record = RepositoryRecord {
        name: name.to_string(),
        url: url.to_string(),
    };
    decode_repositories(&DecodeContext::default(), vec![record])
        .pop()
        .unwrap()
}

pub fn search_element(id: &str, icon_url: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": "Example Maps",
        "summary": "Offline maps",
        "description": "Maps you can use offline",
        "license": "GPL-3.0-or-later",
        "author": "Example Dev",
        "web_url": "https://example.org",
        "repository": "F-Droid",
        "package": {
            "version": "2.4.1",
            "icon_url": icon_url,
        },
    })
}
