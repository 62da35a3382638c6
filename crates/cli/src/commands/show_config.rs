use spanmark::HighlightConfig;

use crate::{ConfigArgs, config};

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match config::resolve_path(&args) {
        Some(path) => println!("# Config file: {}", path.display()),
        None => println!("# No config file found (using defaults)"),
    }
    println!();

    let config = config::load(&args)?;
    print!("{}", HighlightConfig::render(&config.options));
    Ok(())
}
