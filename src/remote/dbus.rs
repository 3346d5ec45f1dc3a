// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use zbus::zvariant::{OwnedValue, Value};
use zbus::{Connection, DBusError, Proxy};

use crate::config::{BusKind, Config};
use crate::error::RemoteError;
use crate::remote::traits::{Connector, FieldMap, RepositoryRecord, StoreProxy};

impl From<zbus::Error> for RemoteError {
    fn from(err: zbus::Error) -> Self {
        match err {
            zbus::Error::MethodError(name, detail, _) => {
                let message = detail.unwrap_or_else(|| name.to_string());
                RemoteError::new(Some(name.to_string()), message)
            }
            zbus::Error::FDO(fdo) => RemoteError::new(
                Some(fdo.name().to_string()),
                fdo.description().unwrap_or_default(),
            ),
            other => RemoteError::from_message(&other.to_string()),
        }
    }
}

/// Connects to the store service over D-Bus
#[derive(Debug, Clone)]
pub struct DbusConnector {
    bus: BusKind,
    service_name: String,
    object_path: String,
    interface: String,
}

impl DbusConnector {
    pub fn new(bus: BusKind, service_name: String, object_path: String, interface: String) -> Self {
        Self {
            bus,
            service_name,
            object_path,
            interface,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.bus,
            config.service_name.clone(),
            config.object_path.clone(),
            config.interface.clone(),
        )
    }
}

#[async_trait]
impl Connector for DbusConnector {
    async fn connect(&self) -> Result<Arc<dyn StoreProxy>, RemoteError> {
        let connection = match self.bus {
            BusKind::Session => Connection::session().await?,
            BusKind::System => Connection::system().await?,
        };

        let proxy: Proxy<'static> = Proxy::new(
            &connection,
            self.service_name.clone(),
            self.object_path.clone(),
            self.interface.clone(),
        )
        .await?;

        info!(
            service = %self.service_name,
            path = %self.object_path,
            interface = %self.interface,
            "Connected to store service"
        );
        Ok(Arc::new(DbusStore { proxy }))
    }
}

/// `StoreProxy` backed by a dynamic D-Bus proxy
pub struct DbusStore {
    proxy: Proxy<'static>,
}

impl DbusStore {
    async fn call_list(&self, method: &'static str) -> Result<Vec<FieldMap>, RemoteError> {
        let entries: Vec<HashMap<String, OwnedValue>> = self.proxy.call(method, &()).await?;
        Ok(entries.into_iter().map(string_fields).collect())
    }
}

/// Keep only string-typed entries of an `a{sv}` record
fn string_fields(entry: HashMap<String, OwnedValue>) -> FieldMap {
    entry
        .into_iter()
        .filter_map(|(key, value)| match &*value {
            Value::Str(text) => Some((key, text.to_string())),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl StoreProxy for DbusStore {
    async fn update_cache(&self) -> Result<bool, RemoteError> {
        Ok(self.proxy.call("UpdateCache", &()).await?)
    }

    async fn get_repositories(&self) -> Result<Vec<RepositoryRecord>, RemoteError> {
        let pairs: Vec<(String, String)> = self.proxy.call("GetRepositories", &()).await?;
        Ok(pairs.into_iter().map(RepositoryRecord::from).collect())
    }

    async fn get_installed_apps(&self) -> Result<Vec<FieldMap>, RemoteError> {
        self.call_list("GetInstalledApps").await
    }

    async fn get_upgradable(&self) -> Result<Vec<FieldMap>, RemoteError> {
        self.call_list("GetUpgradable").await
    }

    async fn search(&self, query: &str) -> Result<String, RemoteError> {
        Ok(self.proxy.call("Search", &(query,)).await?)
    }

    async fn install(&self, package_name: &str) -> Result<(), RemoteError> {
        self.proxy.call_method("Install", &(package_name,)).await?;
        Ok(())
    }

    async fn uninstall_app(&self, package_name: &str) -> Result<(), RemoteError> {
        self.proxy.call_method("UninstallApp", &(package_name,)).await?;
        Ok(())
    }

    async fn remove_repository(&self, repository_id: &str) -> Result<(), RemoteError> {
        self.proxy.call_method("RemoveRepository", &(repository_id,)).await?;
        Ok(())
    }

    async fn upgrade_packages(&self, package_names: &[String]) -> Result<bool, RemoteError> {
        Ok(self.proxy.call("UpgradePackages", &(package_names,)).await?)
    }
}
