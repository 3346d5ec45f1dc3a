// SPDX-License-Identifier: GPL-3.0-only
use std::collections::HashMap;
use tracing::debug;

use crate::model::App;

/// In-memory state kept between listings for the lifetime of the adapter
#[derive(Debug, Default)]
pub struct AppCache {
    installed: Vec<App>,
    updatable: Vec<App>,
    entries: HashMap<String, App>,
}

impl AppCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installed(&self) -> &[App] {
        &self.installed
    }

    pub fn updatable(&self) -> &[App] {
        &self.updatable
    }

    /// Drop the previous installed set and keep exactly `apps`
    pub fn replace_installed(&mut self, apps: &[App]) {
        self.installed.clear();
        self.installed.extend(apps.iter().cloned());
        debug!(count = self.installed.len(), "Replaced installed apps cache");
    }

    /// Add `apps` after whatever earlier refreshes left behind
    pub fn append_updatable(&mut self, apps: &[App]) {
        self.updatable.extend(apps.iter().cloned());
        debug!(count = self.updatable.len(), "Extended updatable apps cache");
    }

    /// Whether an installed entry carries this package name
    pub fn is_package_installed(&self, package_name: &str) -> bool {
        self.installed
            .iter()
            .any(|app| app.package_name() == Some(package_name))
    }

    /// Insert or overwrite the entry stored under `key`
    pub fn add(&mut self, key: impl Into<String>, app: App) {
        self.entries.insert(key.into(), app);
    }

    pub fn lookup(&self, key: &str) -> Option<App> {
        self.entries.get(key).cloned()
    }

    /// Number of keyed entries; the installed and updatable lists are not counted
    pub fn entries_len(&self) -> usize {
        self.entries.len()
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.installed.clear();
        self.updatable.clear();
        self.entries.clear();
    }
}
