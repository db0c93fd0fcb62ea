//! Backend Latency Probe - HTTP service entry point
//!
//! Loads configuration, builds the logger and probe runner, and serves
//! `GET /` until interrupted.

use backend_latency_probe::{
    cli::Cli,
    client::{ClientSettings, ReqwestConnector},
    config::{display_config_summary, load_config, EnvManager},
    error::Result,
    executor::ProbeRunner,
    logging::Logger,
    server::{self, HttpState},
    PKG_NAME, VERSION,
};
use clap::{CommandFactory, FromArgMatches};
use std::{error::Error, process, sync::Arc};
use uuid::Uuid;

#[tokio::main]
async fn main() {
    let matches = Cli::command()
        .after_help(EnvManager::display_env_help())
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    let use_color = !cli.no_color;

    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e.format_for_console(use_color));

        if let Some(source) = e.source() {
            eprintln!("Caused by: {}", source);
        }

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let config = load_config(cli)?;

    let logger = Logger::with_config("MAIN".to_string(), &config);
    logger.set_session_id(Uuid::new_v4().to_string()).await;

    logger.info(&format!("{} v{} starting", PKG_NAME, VERSION))
        .field("build_time", option_env!("BUILD_TIME").unwrap_or("unknown"))
        .field("git_commit", option_env!("GIT_COMMIT").unwrap_or("unknown"))
        .field("target", option_env!("TARGET_TRIPLE").unwrap_or("unknown"))
        .log()
        .await;

    if config.debug {
        for line in display_config_summary(&config).lines() {
            logger.debug(line).log().await;
        }
    }

    let connector = Arc::new(ReqwestConnector::new(ClientSettings::from(&config)));
    let runner = ProbeRunner::from_config(&config, connector, logger.named("PROBE"))?;

    let state = HttpState {
        runner: Arc::new(runner),
        logger: logger.named("HTTP"),
    };

    let listener = server::bind(config.bind_addr()?).await?;
    server::serve(listener, server::create_router(state), &logger, server::shutdown_signal()).await
}
