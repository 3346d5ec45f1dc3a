// SPDX-License-Identifier: GPL-3.0-only
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use android_store_adapter::config::Config;
use android_store_adapter::logging::setup_logging;
use android_store_adapter::model::{
    App, InstallAppsFlags, LaunchFlags, ListAppsFlags, ManageRepositoryFlags, Query,
    RefreshMetadataFlags, UninstallAppsFlags, UpdateAppsFlags,
};
use android_store_adapter::model::app::METADATA_REPO_URL;
use android_store_adapter::plugin::{AndroidPlugin, StorePlugin};

#[derive(Parser)]
#[command(name = "android-store-adapter")]
#[command(about = "Manage Android apps through the FuriOS Android store service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh the store catalog
    Refresh,
    /// List configured F-Droid repositories
    Repos,
    /// List installed Android apps
    Installed,
    /// List apps with pending upgrades
    Updates,
    /// Search the catalog
    Search {
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// Install an app by id
    Install { id: String },
    /// Uninstall an installed app by id
    Uninstall { id: String },
    /// Upgrade the given apps, or every upgradable app
    Update { ids: Vec<String> },
    /// Remove a repository by name
    RemoveRepo { name: String },
    /// Launch an installed app
    Launch { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    setup_logging(&config.log_level)?;

    info!("Starting android-store-adapter v{}", env!("CARGO_PKG_VERSION"));

    let plugin = AndroidPlugin::with_dbus(&config);
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                warn!("Received Ctrl+C, cancelling");
                canceller.cancel();
            }
            Err(err) => error!(error = %err, "Unable to listen for shutdown signal"),
        }
    });

    plugin
        .setup(&token)
        .await
        .context("Failed to connect to the Android store service")?;

    let result = run(&plugin, cli.command, &token).await;
    plugin.dispose().await;

    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }
    result
}

async fn run(plugin: &AndroidPlugin, command: Command, token: &CancellationToken) -> anyhow::Result<()> {
    let list = ListAppsFlags::default();

    match command {
        Command::Refresh => {
            let updated = plugin
                .refresh_metadata(Duration::ZERO, RefreshMetadataFlags::default(), token)
                .await?;
            println!("Cache updated: {updated}");
        }
        Command::Repos => {
            for repository in plugin.list_apps(Some(&Query::sources()), list, token).await? {
                println!(
                    "{}\t{}",
                    repository.id(),
                    repository.metadata_item(METADATA_REPO_URL).unwrap_or("-")
                );
            }
        }
        Command::Installed => {
            print_apps(&plugin.list_apps(Some(&Query::installed()), list, token).await?);
        }
        Command::Updates => {
            print_apps(&plugin.list_apps(Some(&Query::for_update()), list, token).await?);
        }
        Command::Search { keywords } => {
            print_apps(&plugin.list_apps(Some(&Query::search(keywords)), list, token).await?);
        }
        Command::Install { id } => {
            let results = plugin.list_apps(Some(&Query::search([id.as_str()])), list, token).await?;
            let app = find_app(results, &id)?;
            plugin.install_apps(&[app], InstallAppsFlags::default(), token).await?;
            println!("Installed {id}");
        }
        Command::Uninstall { id } => {
            let installed = plugin.list_apps(Some(&Query::installed()), list, token).await?;
            let app = find_app(installed, &id)?;
            plugin.uninstall_apps(&[app], UninstallAppsFlags::default(), token).await?;
            println!("Uninstalled {id}");
        }
        Command::Update { ids } => {
            let mut apps = plugin.list_apps(Some(&Query::for_update()), list, token).await?;
            if !ids.is_empty() {
                apps.retain(|app| ids.iter().any(|id| matches_id(app, id)));
            }
            if apps.is_empty() {
                println!("Nothing to update");
                return Ok(());
            }
            plugin.update_apps(&apps, UpdateAppsFlags::default(), token).await?;
            println!("Updated {} app(s)", apps.len());
        }
        Command::RemoveRepo { name } => {
            let repositories = plugin.list_apps(Some(&Query::sources()), list, token).await?;
            let repository = find_app(repositories, &name)?;
            plugin
                .remove_repository(&repository, ManageRepositoryFlags::default(), token)
                .await?;
            println!("Removed repository {name}");
        }
        Command::Launch { id } => {
            let installed = plugin.list_apps(Some(&Query::installed()), list, token).await?;
            let app = find_app(installed, &id)?;
            plugin.launch(&app, LaunchFlags::default(), token).await?;
        }
    }
    Ok(())
}

fn matches_id(app: &App, id: &str) -> bool {
    app.id() == id || app.package_name() == Some(id)
}

fn find_app(apps: Vec<App>, id: &str) -> anyhow::Result<App> {
    apps.into_iter()
        .find(|app| matches_id(app, id))
        .ok_or_else(|| anyhow!("No app found for '{}'", id))
}

fn print_apps(apps: &[App]) {
    for app in apps {
        let info = app.info();
        println!(
            "{}\t{}\t{}\t{}",
            app.id(),
            app.state(),
            app.name().unwrap_or("-"),
            info.update_version
                .as_deref()
                .or(info.version.as_deref())
                .unwrap_or("-")
        );
    }
}
