use anyhow::{bail, Result};
use std::env;
use tracing::info;

use crate::Config;

pub async fn run(force: bool) -> Result<()> {
    let root = env::current_dir()?;

    if Config::is_initialized(&root) && !force {
        bail!(
            "symdex is already initialized in {:?} (use --force to overwrite)",
            Config::symdex_dir(&root)
        );
    }

    let config = Config::default();
    config.save(&root)?;

    info!("Initialized symdex in {:?}", Config::symdex_dir(&root));
    println!(
        "✓ Created {} with default configuration",
        Config::symdex_dir(&root).display()
    );
    println!("\nNext steps:");
    println!("  1. Edit .symdex/config.toml to customize settings");
    println!("  2. Run 'symdex scan' to index your project");
    println!("  3. Run 'symdex watch' to keep the index live");

    Ok(())
}
