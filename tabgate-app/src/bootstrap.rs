use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use tabgate_core::Host;
use tabgate_facade::OperationFacade;
use tabgate_policy::DeclaredCapabilities;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Safe to call more than once; only
/// the first call takes effect.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Load the declared capabilities and wire the facade against `host`.
pub async fn build_facade<H>(config: &AppConfig, host: Arc<H>) -> Result<OperationFacade>
where
    H: Host + 'static,
{
    let manifest = config.manifest_path();
    let declared = DeclaredCapabilities::load(&manifest)
        .await
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;

    info!(
        "Declared optional capabilities: {:?}",
        declared.iter().map(|n| n.as_str()).collect::<Vec<_>>()
    );

    OperationFacade::new(host, declared, config.facade.clone()).context("Invalid facade config")
}
