// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{PluginError, PluginResult};
use crate::model::{App, LaunchFlags};

const DESKTOP_ENTRY_GROUP: &str = "Desktop Entry";

/// Path fragments of other packaging systems' exported desktop files
const FOREIGN_PATH_MARKERS: &[&str] = &["/snapd/", "/snap/", "/flatpak/"];

/// Keys other packaging systems add to their desktop entries
const FOREIGN_ENTRY_KEYS: &[&str] = &["X-Flatpak", "X-SnapInstanceName"];

/// Decides whether a desktop file may be used to launch an app
pub type DesktopFileFilter = fn(&Path, &KeyFile) -> bool;

/// Parsed `.desktop` key file
#[derive(Debug, Clone, Default)]
pub struct KeyFile {
    groups: HashMap<String, HashMap<String, String>>,
}

impl KeyFile {
    pub fn parse(contents: &str) -> Self {
        let mut groups: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;

        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(group) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                groups.entry(group.to_string()).or_default();
                current = Some(group.to_string());
                continue;
            }
            // Entries before the first group header are not valid
            let (Some(group), Some((key, value))) = (&current, line.split_once('=')) else {
                continue;
            };
            groups
                .entry(group.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }

        Self { groups }
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    pub fn has_key(&self, group: &str, key: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|entries| entries.contains_key(key))
    }

    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.groups
            .get(group)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }
}

/// Accept only native desktop entries, never ones exported by snap or flatpak
pub fn accept_desktop_file(path: &Path, key_file: &KeyFile) -> bool {
    let path = path.to_string_lossy();

    !FOREIGN_PATH_MARKERS.iter().any(|marker| path.contains(marker))
        && key_file.has_group(DESKTOP_ENTRY_GROUP)
        && !FOREIGN_ENTRY_KEYS
            .iter()
            .any(|key| key_file.has_key(DESKTOP_ENTRY_GROUP, key))
}

/// Starts an app from a desktop file accepted by `filter`
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(
        &self,
        app: &App,
        flags: LaunchFlags,
        filter: DesktopFileFilter,
        cancellable: &CancellationToken,
    ) -> PluginResult<()>;
}

/// Looks up `<app id>.desktop` in the application directories and starts it with `gio launch`
#[derive(Debug, Clone)]
pub struct DesktopFileLauncher {
    applications_dirs: Vec<PathBuf>,
}

impl DesktopFileLauncher {
    pub fn new(applications_dirs: Vec<PathBuf>) -> Self {
        Self { applications_dirs }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.applications_dirs.clone())
    }

    /// First desktop file for `app` that passes `filter`
    pub async fn find_desktop_file(&self, app: &App, filter: DesktopFileFilter) -> Option<PathBuf> {
        let file_name = format!("{}.desktop", app.id());

        for dir in &self.applications_dirs {
            let path = dir.join(&file_name);
            let Ok(contents) = tokio::fs::read_to_string(&path).await else {
                continue;
            };
            if filter(&path, &KeyFile::parse(&contents)) {
                return Some(path);
            }
            debug!(path = %path.display(), "Desktop file rejected by filter");
        }
        None
    }
}

#[async_trait]
impl Launcher for DesktopFileLauncher {
    async fn launch(
        &self,
        app: &App,
        _flags: LaunchFlags,
        filter: DesktopFileFilter,
        cancellable: &CancellationToken,
    ) -> PluginResult<()> {
        let Some(path) = self.find_desktop_file(app, filter).await else {
            return Err(PluginError::not_supported(format!(
                "No launchable desktop file for {}",
                app.id()
            )));
        };
        if cancellable.is_cancelled() {
            return Err(PluginError::Cancelled);
        }

        info!(app = %app.id(), path = %path.display(), "Launching app");
        let status = Command::new("gio")
            .arg("launch")
            .arg(&path)
            .kill_on_drop(true)
            .status();

        let status = tokio::select! {
            _ = cancellable.cancelled() => return Err(PluginError::Cancelled),
            status = status => status.map_err(|e| {
                PluginError::Failed(format!("Failed to launch {}: {}", app.id(), e))
            })?,
        };

        if !status.success() {
            return Err(PluginError::Failed(format!(
                "Launcher for {} exited with {}",
                app.id(),
                status
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppState;
    use crate::test_helpers::{create_test_config, owned_app};
    use tempfile::TempDir;

    const NATIVE_ENTRY: &str = "\
[Desktop Entry]
# Installed by the store
Name=Example
Exec=example %U
Type=Application
";

    #[test]
    fn test_parse_key_file() {
        let key_file = KeyFile::parse(NATIVE_ENTRY);
        assert!(key_file.has_group("Desktop Entry"));
        assert_eq!(key_file.get("Desktop Entry", "Name"), Some("Example"));
        assert_eq!(key_file.get("Desktop Entry", "Exec"), Some("example %U"));
        assert!(!key_file.has_key("Desktop Entry", "Icon"));
    }

    #[test]
    fn test_parse_ignores_entries_before_group() {
        let key_file = KeyFile::parse("Name=Orphan\n[Desktop Entry]\nType=Application\n");
        assert!(!key_file.has_key("Desktop Entry", "Name"));
        assert!(key_file.has_key("Desktop Entry", "Type"));
    }

    #[test]
    fn test_accepts_native_entry() {
        let key_file = KeyFile::parse(NATIVE_ENTRY);
        assert!(accept_desktop_file(Path::new("/usr/share/applications/org.example.desktop"), &key_file));
    }

    #[test]
    fn test_rejects_foreign_paths() {
        let key_file = KeyFile::parse(NATIVE_ENTRY);
        for path in [
            "/var/lib/snapd/desktop/applications/example.desktop",
            "/snap/example/current/example.desktop",
            "/var/lib/flatpak/exports/share/applications/org.example.desktop",
        ] {
            assert!(!accept_desktop_file(Path::new(path), &key_file), "{path}");
        }
    }

    #[test]
    fn test_rejects_missing_desktop_entry_group() {
        let key_file = KeyFile::parse("[Desktop Action new]\nName=New\n");
        assert!(!accept_desktop_file(Path::new("/usr/share/applications/x.desktop"), &key_file));
    }

    #[test]
    fn test_rejects_foreign_marker_keys() {
        let path = Path::new("/usr/share/applications/x.desktop");
        let flatpak = KeyFile::parse("[Desktop Entry]\nName=X\nX-Flatpak=org.example\n");
        let snap = KeyFile::parse("[Desktop Entry]\nName=X\nX-SnapInstanceName=example\n");
        assert!(!accept_desktop_file(path, &flatpak));
        assert!(!accept_desktop_file(path, &snap));
    }

    #[tokio::test]
    async fn test_find_desktop_file_skips_rejected() {
        let rejected = TempDir::new().unwrap();
        let accepted = TempDir::new().unwrap();
        std::fs::write(
            rejected.path().join("org.example.desktop"),
            "[Desktop Entry]\nX-Flatpak=org.example\n",
        )
        .unwrap();
        std::fs::write(accepted.path().join("org.example.desktop"), NATIVE_ENTRY).unwrap();

        let launcher = DesktopFileLauncher::new(vec![
            rejected.path().to_path_buf(),
            accepted.path().to_path_buf(),
        ]);
        let app = owned_app("org.example", AppState::Installed);

        let found = launcher.find_desktop_file(&app, accept_desktop_file).await;
        assert_eq!(found, Some(accepted.path().join("org.example.desktop")));
    }

    #[tokio::test]
    async fn test_launch_without_desktop_file_is_not_supported() {
        let empty = TempDir::new().unwrap();
        let launcher = DesktopFileLauncher::from_config(&create_test_config(empty.path()));
        let app = owned_app("org.missing", AppState::Installed);

        let result = launcher
            .launch(&app, LaunchFlags::default(), accept_desktop_file, &CancellationToken::new())
            .await;
        assert!(result.unwrap_err().is_not_supported());
    }
}
