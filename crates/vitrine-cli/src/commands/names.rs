use anyhow::{Context, Result};
use vitrine_core::Catalog;

use crate::config::Config;

/// Print the names a user can ask recommendations for.
pub fn list_names(config: &Config, limit: Option<usize>) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load catalog from {}",
            config.catalog_path.display()
        )
    })?;

    let names = catalog.all_names();
    let shown = limit.unwrap_or(names.len()).min(names.len());

    for name in &names[..shown] {
        println!("{name}");
    }
    if shown < names.len() {
        eprintln!("... {} of {} names shown", shown, names.len());
    }

    Ok(())
}
