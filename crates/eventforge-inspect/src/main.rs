//! Catalogue inspector for the eventforge synthesis engine.
//!
//! Loads an interface catalogue, resolves every interface through a
//! fresh descriptor cache, and prints each descriptor as JSON. Any
//! interface that fails to resolve is logged and makes the run fail, so
//! the inspector doubles as a catalogue linter.
//!
//! # Usage
//!
//! ```text
//! eventforge-inspect <catalog.yaml> [eventforge-config.yaml]
//! ```
//!
//! Without a config argument, `eventforge-config.yaml` in the working
//! directory is used when present, otherwise defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use eventforge_core::{DescriptorCache, SynthesisConfig, TypeRegistry};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG: &str = "eventforge-config.yaml";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let Some(catalog_path) = args.next() else {
        bail!("usage: eventforge-inspect <catalog.yaml> [eventforge-config.yaml]");
    };
    let config = load_config(args.next().as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let registry = TypeRegistry::from_catalog_file(&catalog_path)
        .with_context(|| format!("loading catalogue {}", catalog_path.display()))?;
    info!(
        catalogue = %catalog_path.display(),
        interfaces = registry.interface_count(),
        "catalogue loaded"
    );

    let cache = DescriptorCache::new(Arc::new(registry), config.naming.convention());
    let mut failures = 0_usize;
    for (interface, resolved) in cache.resolve_all() {
        match resolved {
            Ok(descriptor) => {
                let json = serde_json::to_string_pretty(descriptor.as_ref())
                    .with_context(|| format!("serializing descriptor for {interface}"))?;
                println!("{json}");
            }
            Err(err) => {
                error!(%interface, error = %err, "interface does not resolve");
                failures = failures.saturating_add(1);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} interfaces failed to resolve", cache.len());
    }
    info!(interfaces = cache.len(), "all interfaces resolved");
    Ok(())
}

/// Load the configuration named on the command line, or the project
/// default when present.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<SynthesisConfig> {
    let path = match explicit {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => return Ok(SynthesisConfig::default()),
    };
    SynthesisConfig::from_file(path).with_context(|| format!("loading config {}", path.display()))
}
