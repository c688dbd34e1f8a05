mod app;
mod ui;

use crate::app::{App, Cli};
use anyhow::{Context, Result};
use clap::Parser;
use opc_da_properties::{
    MemoryAdapter, OpcError, PropertyGateway, TagPropertyProvider, friendly_com_hint,
};
use std::{io, sync::Arc};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_filter(filter))
        .init();

    tracing::info!("Starting OPC CLI");

    let provider: Option<Arc<dyn TagPropertyProvider>> = match &cli.source {
        Some(path) => {
            let adapter = MemoryAdapter::from_path(path)
                .with_context(|| format!("Failed to load data source '{}'", path.display()))?;
            Some(Arc::new(PropertyGateway::new(adapter)))
        }
        None => None,
    };

    let app = App::new(provider, cli.format);
    let mut stdout = io::stdout().lock();
    if let Err(err) = app.execute(&cli.command, &mut stdout).await {
        let hint = err.downcast_ref::<OpcError>().and_then(friendly_com_hint);
        tracing::error!(error = ?err, hint, "Command failed");
        if let Some(hint) = hint {
            return Err(err.context(hint));
        }
        return Err(err);
    }

    Ok(())
}
