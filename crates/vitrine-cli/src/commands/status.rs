use anyhow::{Context, Result};
use vitrine_core::Catalog;
use vitrine_search::Snapshot;

use crate::config::Config;

/// How many ambiguous names to list before summarizing.
const MAX_DUPLICATES_SHOWN: usize = 10;

pub fn show_status(config: &Config) -> Result<()> {
    let snapshot = Snapshot::load(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load catalog from {}",
            config.catalog_path.display()
        )
    })?;
    let catalog = snapshot.catalog();
    let stats = snapshot.index().stats();

    println!("\n📊 Vitrine Status\n");
    println!("  Catalog: {}", catalog.source());
    println!("  Loaded at: {}", catalog.loaded_at().to_rfc3339());
    println!("  Items: {}", stats.items);
    println!("  Selectable names: {}", catalog.all_names().len());
    println!("  Vocabulary size: {}", stats.vocabulary_size);
    println!("  Non-zero weights: {}", stats.nonzero_weights);
    println!(
        "  Items without usable tags: {} ({} blank)",
        stats.degenerate_items, stats.untagged_items
    );

    let duplicates = catalog.duplicate_names();
    if !duplicates.is_empty() {
        println!(
            "\n  {} names are shared by several items; lookups by name use the first:",
            duplicates.len()
        );
        for name in duplicates.iter().take(MAX_DUPLICATES_SHOWN) {
            println!("    - {}", duplicate_line(catalog, name));
        }
        if duplicates.len() > MAX_DUPLICATES_SHOWN {
            println!("    ... and {} more", duplicates.len() - MAX_DUPLICATES_SHOWN);
        }
        println!("\n  Use `vitrine recommend --id <ID>` to pick a specific item");
    }

    Ok(())
}

/// A shared name followed by the ids of every item carrying it.
fn duplicate_line(catalog: &Catalog, name: &str) -> String {
    let ids: Vec<String> = catalog
        .items()
        .iter()
        .filter(|item| item.name == name)
        .map(|item| item.id.to_string())
        .collect();
    format!("{name} (ids {})", ids.join(", "))
}
