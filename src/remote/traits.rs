// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RemoteError;

/// Flat record of named string fields, as returned by the installed and upgradable listings
pub type FieldMap = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub name: String,
    pub url: String,
}

impl From<(String, String)> for RepositoryRecord {
    fn from((name, url): (String, String)) -> Self {
        Self { name, url }
    }
}

/// Method surface of the remote store service
#[async_trait]
pub trait StoreProxy: Send + Sync {
    /// Refresh the service's catalog; returns whether it succeeded
    async fn update_cache(&self) -> Result<bool, RemoteError>;

    /// List configured repositories as (name, url) pairs
    async fn get_repositories(&self) -> Result<Vec<RepositoryRecord>, RemoteError>;

    /// List installed apps
    async fn get_installed_apps(&self) -> Result<Vec<FieldMap>, RemoteError>;

    /// List installed apps with a newer version available
    async fn get_upgradable(&self) -> Result<Vec<FieldMap>, RemoteError>;

    /// Search the catalog; the reply is a JSON document
    async fn search(&self, query: &str) -> Result<String, RemoteError>;

    async fn install(&self, package_name: &str) -> Result<(), RemoteError>;

    async fn uninstall_app(&self, package_name: &str) -> Result<(), RemoteError>;

    async fn remove_repository(&self, repository_id: &str) -> Result<(), RemoteError>;

    /// Upgrade all given packages in one transaction
    async fn upgrade_packages(&self, package_names: &[String]) -> Result<bool, RemoteError>;
}

/// Establishes a fresh connection to the store service
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn StoreProxy>, RemoteError>;
}
