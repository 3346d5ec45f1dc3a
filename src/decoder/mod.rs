// SPDX-License-Identifier: GPL-3.0-only
pub mod document;
pub mod field_map;
pub mod icon;
pub mod repository;

pub use document::{decode_search, PackageInfo, SearchRecord};
pub use field_map::{decode_installed, decode_upgradable, PackageRecord};
pub use icon::{parse_icon_url, IconUrlError};
pub use repository::decode_repositories;

use crate::config::Config;

/// Adapter-wide values stamped onto every decoded entity
#[derive(Debug, Clone)]
pub struct DecodeContext {
    pub plugin_name: String,
    pub origin_label: String,
    pub repository_sort_key: String,
}

impl DecodeContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            plugin_name: config.plugin_name.clone(),
            origin_label: config.origin_label.clone(),
            repository_sort_key: config.repository_sort_key.clone(),
        }
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
