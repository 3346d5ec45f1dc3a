// SPDX-License-Identifier: GPL-3.0-only
use serde::Deserialize;
use tracing::debug;

use crate::decoder::DecodeContext;
use crate::model::app::METADATA_PACKAGING_FORMAT;
use crate::model::{App, AppInfo, AppState, Kudo, NameQuality, Quirk};
use crate::remote::FieldMap;

/// One entry of the installed or upgradable listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    pub package_name: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub current_version: Option<String>,
    pub available_version: Option<String>,
    pub repository: Option<String>,
}

impl PackageRecord {
    pub fn from_field_map(fields: FieldMap) -> Result<Self, serde_json::Error> {
        let object = fields
            .into_iter()
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object))
    }

    /// Display name, falling back to the package name at lowest quality
    fn display_name(&self, package_name: &str) -> (String, NameQuality) {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => (name.to_string(), NameQuality::Normal),
            _ => (package_name.to_string(), NameQuality::Lowest),
        }
    }
}

/// Fields shared by installed and upgradable entries
fn base_info(ctx: &DecodeContext, id: &str, record: &PackageRecord, package_name: &str) -> AppInfo {
    let (name, name_quality) = record.display_name(package_name);

    let mut info = AppInfo::new(id);
    info.name = Some(name);
    info.name_quality = name_quality;
    info.allow_cancel = false;
    info.management_plugin = Some(ctx.plugin_name.clone());
    info.kudos.push(Kudo::SandboxedSecure);
    info.sources.push(id.to_string());
    info
}

/// Parse entries, skipping those without a package name
fn usable_records(fields: Vec<FieldMap>) -> impl Iterator<Item = (String, String, PackageRecord)> {
    fields.into_iter().filter_map(|entry| {
        let record = match PackageRecord::from_field_map(entry) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable store record");
                return None;
            }
        };
        let Some(package_name) = record.package_name.clone() else {
            debug!(id = ?record.id, "Skipping store record without packageName");
            return None;
        };
        let id = record.id.clone().unwrap_or_else(|| package_name.clone());
        Some((id, package_name, record))
    })
}

/// Build entities for the installed-apps listing
pub fn decode_installed(ctx: &DecodeContext, fields: Vec<FieldMap>) -> Vec<App> {
    usable_records(fields)
        .map(|(id, package_name, record)| {
            let mut info = base_info(ctx, &id, &record, &package_name);
            info.quirks.push(Quirk::HasSource);
            info.package_name = Some(package_name.clone());

            let app = App::new(info, AppState::Installed);
            debug!(name = ?app.name(), package = %package_name, "Added installed Android app");
            app
        })
        .collect()
}

/// Build entities for the upgradable-apps listing
pub fn decode_upgradable(ctx: &DecodeContext, fields: Vec<FieldMap>) -> Vec<App> {
    let apps: Vec<App> = usable_records(fields)
        .map(|(id, package_name, record)| {
            let mut info = base_info(ctx, &id, &record, &package_name);
            // The service identifies upgrade targets by id
            info.package_name = Some(id.clone());
            info.repository = record.repository.clone();
            info.version = record.current_version.clone();
            info.update_version = record.available_version.clone();
            info.metadata
                .insert(METADATA_PACKAGING_FORMAT.to_string(), "apk".to_string());

            debug!(
                package = %package_name,
                current = record.current_version.as_deref().unwrap_or("unknown"),
                available = record.available_version.as_deref().unwrap_or("unknown"),
                "Found upgrade"
            );
            App::new(info, AppState::Updatable)
        })
        .collect();

    if apps.is_empty() {
        debug!("No upgradable Android apps found");
    } else {
        debug!(count = apps.len(), "Found upgradable Android apps");
    }
    apps
}
