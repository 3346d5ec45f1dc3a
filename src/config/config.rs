// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Message bus the store service is reachable on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusKind {
    Session,
    System,
}

impl FromStr for BusKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "session" => Ok(Self::Session),
            "system" => Ok(Self::System),
            other => Err(anyhow::anyhow!("Unknown bus kind: {} (expected session or system)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bus the store service is registered on
    pub bus: BusKind,

    /// Well-known bus name of the store service
    pub service_name: String,

    /// Object path exporting the store interface
    pub object_path: String,

    /// Interface name of the store methods
    pub interface: String,

    /// Name this adapter marks its managed apps with
    pub plugin_name: String,

    /// Origin label shown for repositories
    pub origin_label: String,

    /// Sort priority hint attached to repositories
    pub repository_sort_key: String,

    /// Directories searched for desktop files when launching apps
    pub applications_dirs: Vec<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("ANDROID_STORE_CONFIG")
            .unwrap_or_else(|_| "android-store.toml".to_string());

        let mut config: Config = if std::path::Path::new(&config_path).exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            Config::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(val) = std::env::var("ANDROID_STORE_BUS") {
            self.bus = val.parse()?;
        }
        if let Ok(val) = std::env::var("ANDROID_STORE_SERVICE_NAME") {
            self.service_name = val;
        }
        if let Ok(val) = std::env::var("ANDROID_STORE_OBJECT_PATH") {
            self.object_path = val;
        }
        if let Ok(val) = std::env::var("ANDROID_STORE_INTERFACE") {
            self.interface = val;
        }
        if let Ok(val) = std::env::var("ANDROID_STORE_PLUGIN_NAME") {
            self.plugin_name = val;
        }
        if let Ok(val) = std::env::var("ANDROID_STORE_ORIGIN_LABEL") {
            self.origin_label = val;
        }
        if let Ok(val) = std::env::var("ANDROID_STORE_LOG_LEVEL") {
            self.log_level = val;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus: BusKind::Session,
            service_name: String::from("io.FuriOS.AndroidStore"),
            object_path: String::from("/fdroid"),
            interface: String::from("io.FuriOS.AndroidStore.fdroid"),
            plugin_name: String::from("android"),
            origin_label: String::from("F-Droid (Android)"),
            repository_sort_key: String::from("300"),
            applications_dirs: vec![
                PathBuf::from("/usr/share/applications"),
                PathBuf::from("/usr/local/share/applications"),
            ],
            log_level: String::from("info"),
        }
    }
}
