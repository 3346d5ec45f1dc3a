// SPDX-License-Identifier: GPL-3.0-only
use tracing::debug;

use crate::decoder::DecodeContext;
use crate::model::app::{METADATA_REPO_URL, METADATA_SORT_KEY};
use crate::model::{App, AppInfo, AppKind, AppState, NameQuality, Quirk};
use crate::remote::RepositoryRecord;

/// Build repository entities; repositories are always installed once listed
pub fn decode_repositories(ctx: &DecodeContext, records: Vec<RepositoryRecord>) -> Vec<App> {
    records
        .into_iter()
        .map(|record| {
            debug!(name = %record.name, url = %record.url, "Processing F-Droid repository");

            let mut info = AppInfo::new(record.name.clone());
            info.kind = AppKind::Repository;
            info.quirks.push(Quirk::NotLaunchable);
            info.name = Some(record.name);
            info.name_quality = NameQuality::Normal;
            info.homepage = Some(record.url.clone());
            info.metadata.insert(METADATA_REPO_URL.to_string(), record.url);
            info.metadata
                .insert(METADATA_SORT_KEY.to_string(), ctx.repository_sort_key.clone());
            info.management_plugin = Some(ctx.plugin_name.clone());
            info.origin_ui = Some(ctx.origin_label.clone());

            App::new(info, AppState::Installed)
        })
        .collect()
}
