//! Interactive recommendation loop.
//!
//! Each input line names an item. Reloads run on a blocking worker and
//! swap the catalog in when done, so queries keep being answered against
//! the previous catalog meanwhile.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use vitrine_core::ItemId;
use vitrine_search::Recommender;

use super::recommend::{lookup, print_recommendations, Target};
use crate::config::Config;

/// How many names `:names` lists.
const NAMES_SHOWN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Quit,
    Help,
    Names,
    Reload,
    Query(Target),
    Invalid(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Self::Query(Target::Name(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("q" | "quit" | "exit"), None) => Self::Quit,
            (Some("h" | "help"), None) => Self::Help,
            (Some("names"), None) => Self::Names,
            (Some("reload"), None) => Self::Reload,
            (Some("id"), Some(raw)) if parts.next().is_none() => match raw.parse::<ItemId>() {
                Ok(id) => Self::Query(Target::Id(id)),
                Err(_) => Self::Invalid(format!("not an item id: {raw}")),
            },
            _ => Self::Invalid(format!("unknown command: {line}")),
        }
    }
}

pub async fn run_shell(config: &Config, top_n: usize) -> Result<()> {
    let recommender = Arc::new(Recommender::load(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load catalog from {}",
            config.catalog_path.display()
        )
    })?);
    let reloading = Arc::new(AtomicBool::new(false));

    println!(
        "Loaded {} items. Type a product name, or :help.",
        recommender.snapshot().catalog().len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ShellCommand::parse(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => print_help(),
            ShellCommand::Names => {
                let snapshot = recommender.snapshot();
                for name in snapshot.catalog().all_names().into_iter().take(NAMES_SHOWN) {
                    println!("  {name}");
                }
            }
            ShellCommand::Reload => spawn_reload(&recommender, &reloading),
            ShellCommand::Query(target) => {
                let snapshot = recommender.snapshot();
                match lookup(&snapshot, &target, top_n) {
                    Ok(recs) => print_recommendations(&snapshot, &target, &recs),
                    Err(e) => println!("{e}"),
                }
            }
            ShellCommand::Invalid(message) => println!("{message} (try :help)"),
        }
    }

    Ok(())
}

fn spawn_reload(recommender: &Arc<Recommender>, reloading: &Arc<AtomicBool>) {
    if reloading.swap(true, Ordering::SeqCst) {
        println!("A reload is already running");
        return;
    }

    println!("Reloading in the background...");
    let recommender = Arc::clone(recommender);
    let reloading = Arc::clone(reloading);
    tokio::spawn(async move {
        let outcome = tokio::task::spawn_blocking(move || recommender.reload()).await;
        match outcome {
            Ok(Ok(snapshot)) => println!("\n✓ Reloaded {} items", snapshot.catalog().len()),
            Ok(Err(e)) => eprintln!("\n✗ Reload failed, still serving the previous catalog: {e}"),
            Err(e) => eprintln!("\n✗ Reload task failed: {e}"),
        }
        reloading.store(false, Ordering::SeqCst);
    });
}

async fn prompt() -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"vitrine> ").await?;
    stdout.flush().await?;
    Ok(())
}

fn print_help() {
    println!("  <product name>   recommend items similar to this product");
    println!("  :id <n>          recommend by item id");
    println!("  :names           list some product names");
    println!("  :reload          reload the catalog without interrupting queries");
    println!("  :quit            leave the shell");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        assert_eq!(
            ShellCommand::parse("  Red Shoe "),
            ShellCommand::Query(Target::Name("Red Shoe".to_string()))
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse(""), ShellCommand::Empty);
        assert_eq!(ShellCommand::parse(":q"), ShellCommand::Quit);
        assert_eq!(ShellCommand::parse(":quit"), ShellCommand::Quit);
        assert_eq!(ShellCommand::parse(":help"), ShellCommand::Help);
        assert_eq!(ShellCommand::parse(":names"), ShellCommand::Names);
        assert_eq!(ShellCommand::parse(":reload"), ShellCommand::Reload);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(
            ShellCommand::parse(":id 4"),
            ShellCommand::Query(Target::Id(ItemId::new(4)))
        );
        assert!(matches!(ShellCommand::parse(":id four"), ShellCommand::Invalid(_)));
        assert!(matches!(ShellCommand::parse(":id 1 2"), ShellCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(ShellCommand::parse(":frobnicate"), ShellCommand::Invalid(_)));
    }
}
