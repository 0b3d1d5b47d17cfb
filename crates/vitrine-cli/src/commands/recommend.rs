use anyhow::{Context, Result};
use vitrine_core::ItemId;
use vitrine_search::{Recommendation, Snapshot};

use crate::config::Config;

/// What to recommend for: a display name or a stable item id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Name(String),
    Id(ItemId),
}

pub fn run_recommend(config: &Config, target: Target, top_n: usize, json: bool) -> Result<()> {
    let snapshot = Snapshot::load(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load catalog from {}",
            config.catalog_path.display()
        )
    })?;

    let recommendations = lookup(&snapshot, &target, top_n)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_recommendations(&snapshot, &target, &recommendations);
    }

    Ok(())
}

/// Run the query, turning not-found into a message the user can act on.
pub fn lookup(snapshot: &Snapshot, target: &Target, top_n: usize) -> Result<Vec<Recommendation>> {
    let result = match target {
        Target::Name(name) => snapshot.recommend(name, top_n),
        Target::Id(id) => snapshot.recommend_by_id(*id, top_n),
    };

    match result {
        Ok(recommendations) => Ok(recommendations),
        Err(e) if e.is_not_found() => {
            anyhow::bail!(
                "❌ {} not found in {}",
                describe(target),
                snapshot.catalog().source()
            )
        }
        Err(e) => Err(e.into()),
    }
}

pub fn print_recommendations(
    snapshot: &Snapshot,
    target: &Target,
    recommendations: &[Recommendation],
) {
    if recommendations.is_empty() {
        println!("No recommendations found 😞");
        return;
    }

    let label = match target {
        Target::Name(name) => format!("{name:?}"),
        Target::Id(id) => snapshot
            .catalog()
            .find_by_id(*id)
            .map(|item| format!("{:?} (id {id})", item.name))
            .unwrap_or_else(|_| format!("id {id}")),
    };

    println!("\nRecommended items for {label}\n");
    for (rank, rec) in recommendations.iter().enumerate() {
        println!("  {:>2}. {} [id {}]", rank + 1, rec.name, rec.id);
        println!(
            "      Brand: {} | Rating: {} ⭐ | Reviews: {} | Score: {:.3}",
            display_or_dash(&rec.brand),
            rec.rating,
            rec.review_count,
            rec.score
        );
        if !rec.image_url.is_empty() {
            println!("      Image: {}", rec.image_url);
        }
    }
}

fn describe(target: &Target) -> String {
    match target {
        Target::Name(name) => format!("Item {name:?}"),
        Target::Id(id) => format!("Item with id {id}"),
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
