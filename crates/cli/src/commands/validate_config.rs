use std::fs;

use anyhow::Context;
use spanmark::HighlightConfig;

use crate::{ConfigArgs, config};

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let Some(path) = config::resolve_path(&args) else {
        println!("Status: No config file (using defaults)");
        println!("Result: Valid");
        return Ok(());
    };

    println!("Config file: {}", path.display());

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = HighlightConfig::from_contents(&contents);

    if config.warnings.is_empty() {
        println!("Result: Valid");
        return Ok(());
    }

    println!();
    println!("Warnings:");
    for warning in &config.warnings {
        println!("  Line {}: {}", warning.line_number, warning.message);
    }
    println!();
    println!("Result: Invalid");
    std::process::exit(1);
}
