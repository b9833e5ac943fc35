mod adapters;
mod config;
mod core;
mod ports;

use crate::adapters::config::file_store::JsonFileConfigAdapter;
use crate::adapters::octane::client::OctaneClient;
use crate::config::models::{LogFormat, LoggingConfig};
use crate::core::bulk_update::run_bulk_update;
use crate::core::module_resolver::resolve_application_module;
use crate::core::release_resolver::resolve_release;
use crate::core::types::CommentFilter;
use crate::ports::{ConfigurationStore, OctaneApi};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct CliArgs {
    #[clap(
        value_name = "RELEASE",
        help = "Release id or name (same as --release)"
    )]
    release_positional: Option<String>,

    #[clap(
        short = 'r',
        long = "release",
        value_name = "RELEASE",
        conflicts_with = "release_positional",
        help = "Release id or name; defaults to the platform's current release"
    )]
    release: Option<String>,

    #[clap(
        short = 'a',
        long = "appModule",
        value_name = "MODULE",
        help = "Application module id, or one of: unassigned, root, all"
    )]
    app_module: Option<String>,

    #[clap(
        short = 's',
        long = "useStrictAppModule",
        action,
        help = "Match the exact application module, excluding descendants"
    )]
    use_strict_app_module: bool,

    #[clap(long, value_name = "PATH", help = "Path to the configuration file")]
    config: Option<PathBuf>,
}

fn init_logger(logging_config: &LoggingConfig, terminal_colors_enabled: bool) {
    let env_filter_str = std::env::var("RUST_LOG").unwrap_or_else(|_| logging_config.level.clone());
    let env_filter = EnvFilter::try_new(&env_filter_str).unwrap_or_else(|e| {
        eprintln!(
            "[LOGGER WARN] Failed to parse RUST_LOG/config log level '{env_filter_str}': {e}. Defaulting to 'info'."
        );
        EnvFilter::new("info")
    });

    let subscriber_builder = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false);

    match logging_config.format {
        LogFormat::Pretty => {
            let pretty_fmt = subscriber_builder
                .pretty()
                .with_ansi(terminal_colors_enabled);
            let _ = tracing::subscriber::set_global_default(pretty_fmt.finish());
        }
        LogFormat::Json => {
            let _ = tracing::subscriber::set_global_default(subscriber_builder.json().finish());
        }
        LogFormat::Compact => {
            let compact_fmt = subscriber_builder
                .compact()
                .with_ansi(terminal_colors_enabled);
            let _ = tracing::subscriber::set_global_default(compact_fmt.finish());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli_args = CliArgs::parse();

    let config_path = match &cli_args.config {
        Some(path) => path.clone(),
        None => config::find_config_file()?,
    };

    let config_store: Arc<dyn ConfigurationStore> = Arc::new(JsonFileConfigAdapter::new());
    let app_config = match config_store.load_app_config_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[CRITICAL] Failed to load configuration: {e}. Exiting.");
            return Err(e.into());
        }
    };

    let console_supports_color = supports_color::on(supports_color::Stream::Stdout).is_some();
    init_logger(&app_config.logging, console_supports_color);

    let release_arg = cli_args
        .release
        .or(cli_args.release_positional)
        .or(app_config.release.clone());
    let module_arg = cli_args.app_module.or(app_config.app_module.clone());
    let use_strict_app_module =
        cli_args.use_strict_app_module || app_config.use_strict_app_module;
    let comment_filter = CommentFilter::from_config(&app_config.version_to_update);

    let client = OctaneClient::new(app_config.server.clone())?;
    if let Err(e) = client.sign_in(&app_config.authentication).await {
        error!("Failed to authenticate. Error: {}", e);
        return Err(e.into());
    }
    info!("Logged in successfully");

    let api: Arc<dyn OctaneApi> = Arc::new(client);

    let release = match resolve_release(api.as_ref(), release_arg.as_deref()).await {
        Ok(release) => release,
        Err(e) => {
            error!("{}", e);
            error!("Could not get the release reference. Exiting...");
            return Err(e.into());
        }
    };

    let scope = match resolve_application_module(
        api.as_ref(),
        module_arg.as_deref(),
        use_strict_app_module,
    )
    .await
    {
        Ok(scope) => scope,
        Err(e) => {
            error!("{}", e);
            error!("Could not get the application module reference. Exiting...");
            return Err(e.into());
        }
    };

    if comment_filter == CommentFilter::Any {
        info!("No comment filter configured; considering test versions with any comment");
    } else {
        info!(
            "Will consider test versions with the comment: \"{}\"",
            app_config.version_to_update
        );
    }

    let cancel_token = CancellationToken::new();
    let signal_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received. Finishing the current record and stopping...");
            signal_token.cancel();
        }
    });

    let stats = run_bulk_update(
        api.as_ref(),
        &release,
        &scope,
        &comment_filter,
        app_config.max_page_size,
        &cancel_token,
    )
    .await;

    if cancel_token.is_cancelled() {
        info!("Run was cancelled before completing the whole collection");
    }
    info!(
        "Run finished: {} page(s), {} test version(s) scanned, {} updated, {} already had the release, {} skipped for an empty comment, {} update(s) failed",
        stats.pages,
        stats.scanned,
        stats.updated,
        stats.already_tagged,
        stats.skipped_empty_comment,
        stats.failed_updates
    );

    Ok(())
}
