//! Application entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the command line.
//! 3. Load [`AppConfig`] (from `--config` or the platform settings file).
//! 4. Create the [`tokio`] runtime.
//! 5. Dispatch the subcommand. `serve` and `score` load the
//!    [`ModelContext`] first; failing to load it is fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use spoofcheck::{
    cli::{Cli, Commands},
    client::PredictClient,
    config::{AppConfig, AppPaths},
    pipeline::{ModelContext, PipelineOrchestrator, UploadedFile},
    server,
};

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Command line
    let cli = Cli::parse();
    let settings_file = cli
        .config
        .clone()
        .unwrap_or_else(|| AppPaths::new().settings_file);

    // `init-config` must work even when the existing file is broken.
    if let Commands::InitConfig { force } = cli.command {
        return init_config(&settings_file, force);
    }

    // 3. Configuration
    let mut config = AppConfig::load_from(&settings_file)
        .with_context(|| format!("loading settings from {}", settings_file.display()))?;

    // 4. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 5. Dispatch
    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let context = Arc::new(ModelContext::load(&config.model)?);
            rt.block_on(server::run(&config.server, context))
        }
        Commands::Score { files } => {
            let context = Arc::new(ModelContext::load(&config.model)?);
            score_local(context, &files)
        }
        Commands::Submit { url, files } => {
            let entries = rt.block_on(PredictClient::new(url).submit(&files))?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
            Ok(())
        }
        Commands::InitConfig { .. } => Ok(()),
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    AppConfig::default().save_to(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Run one batch in-process and print the response array.
fn score_local(context: Arc<ModelContext>, paths: &[PathBuf]) -> Result<()> {
    let files = paths
        .iter()
        .map(|path| {
            let bytes =
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(UploadedFile::new(filename, bytes))
        })
        .collect::<Result<Vec<_>>>()?;

    let report = PipelineOrchestrator::new(context).process_batch(&files);
    log::info!(
        "Scored {} file(s): {} succeeded, {} failed",
        report.items.len(),
        report.succeeded(),
        report.failed()
    );
    println!("{}", serde_json::to_string_pretty(&report.into_entries())?);
    Ok(())
}
