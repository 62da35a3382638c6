use std::path::PathBuf;

use anyhow::Context;
use spanmark::HighlightConfig;

use crate::ConfigArgs;

/// Returns the config file to use, if any exists
pub fn resolve_path(args: &ConfigArgs) -> Option<PathBuf> {
    match &args.config {
        Some(path) => Some(path.clone()),
        None => spanmark::config_path().filter(|path| path.exists()),
    }
}

/// Loads the config named by `args`, or the defaults when there is none
pub fn load(args: &ConfigArgs) -> anyhow::Result<HighlightConfig> {
    match resolve_path(args) {
        Some(path) => HighlightConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(HighlightConfig::default()),
    }
}
