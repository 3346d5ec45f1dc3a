// SPDX-License-Identifier: GPL-3.0-only
use serde::Deserialize;
use tracing::debug;

use crate::cache::AppCache;
use crate::decoder::{parse_icon_url, DecodeContext};
use crate::error::PluginError;
use crate::model::app::METADATA_CREATOR;
use crate::model::{App, AppInfo, AppState, Kudo, NameQuality, Quirk};

/// One element of the search reply document
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRecord {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub license: String,
    pub author: String,
    pub web_url: String,
    pub repository: String,
    pub package: Option<PackageInfo>,
}

/// Latest package published for a search result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageInfo {
    pub version: Option<String>,
    pub icon_url: Option<String>,
}

/// Decode the JSON array returned by `Search`.
///
/// A document that is not valid JSON, or whose root is not an array, fails the
/// whole search. Individual elements that do not match the record schema are
/// skipped. Apps whose id matches the package name of an entry in the
/// installed cache are reported as installed.
pub fn decode_search(
    ctx: &DecodeContext,
    document: &str,
    cache: &AppCache,
) -> Result<Vec<App>, PluginError> {
    let elements: Vec<serde_json::Value> = serde_json::from_str(document)?;

    let apps = elements
        .into_iter()
        .filter_map(|element| match SearchRecord::deserialize(element) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "Skipping malformed search result");
                None
            }
        })
        .map(|record| build_search_app(ctx, record, cache))
        .collect();

    Ok(apps)
}

fn build_search_app(ctx: &DecodeContext, record: SearchRecord, cache: &AppCache) -> App {
    let is_installed = cache.is_package_installed(&record.id);
    let package = record.package.unwrap_or_default();

    let mut info = AppInfo::new(record.id.clone());
    info.quirks.push(Quirk::HasSource);
    info.metadata
        .insert(METADATA_CREATOR.to_string(), ctx.plugin_name.clone());
    info.management_plugin = Some(ctx.plugin_name.clone());
    info.package_name = Some(record.id.clone());
    info.repository = Some(record.repository);
    info.sources.push(record.id.clone());
    info.name_quality = NameQuality::Normal;
    info.summary = Some(record.summary);
    info.description = Some(record.description);
    info.version = package.version;
    info.license = Some(record.license);
    info.developer_name = Some(record.author);
    info.homepage = Some(record.web_url);
    info.kudos.push(Kudo::SandboxedSecure);

    if let Some(icon_url) = package.icon_url {
        match parse_icon_url(&icon_url) {
            Ok(icon) => info.icons.push(icon),
            Err(e) => debug!(app = %record.name, icon_url = %icon_url, error = %e, "App has invalid icon URL"),
        }
    }
    info.name = Some(record.name);

    let state = if is_installed { AppState::Installed } else { AppState::Available };
    App::new(info, state)
}
