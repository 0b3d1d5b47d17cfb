use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{self, Config};

/// Keys `config get` and `config set` understand.
const KEYS: &[&str] = &["catalog_path", "top_n", "logging.level", "logging.coloured"];

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    for key in KEYS {
        println!("  {key}: {}", value_of(&config, key)?);
    }

    println!("\nPriority: CLI args > ENV vars (VITRINE_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole config file.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;
        println!("{}", value_of(&config, &key)?);
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'vitrine config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value, preserving the rest of the file.
pub fn set_config(key: String, value: String) -> Result<()> {
    let config_path = config::config_file_path();
    write_setting(&config_path, &key, &value)?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure vitrine.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

fn value_of(config: &Config, key: &str) -> Result<String> {
    Ok(match key {
        "catalog_path" => config.catalog_path.display().to_string(),
        "top_n" => config.top_n.to_string(),
        "logging.level" => config.logging.level.clone(),
        "logging.coloured" => config.logging.coloured.to_string(),
        _ => unknown_key(key)?,
    })
}

/// Update one key in the config file at `config_path`, creating the file first if needed.
fn write_setting(config_path: &Path, key: &str, value: &str) -> Result<()> {
    config::ensure_config_file_at(config_path)?;

    let contents = std::fs::read_to_string(config_path).context("Failed to read config file")?;
    let updated = apply_setting(&contents, key, value)?;

    std::fs::write(config_path, updated).context("Failed to write config file")
}

/// Rewrite one key in a TOML document, validating the value's type.
fn apply_setting(contents: &str, key: &str, value: &str) -> Result<String> {
    let mut doc: toml_edit::DocumentMut =
        contents.parse().context("Config file is not valid TOML")?;

    match key {
        "catalog_path" => doc["catalog_path"] = toml_edit::value(value),
        "top_n" => {
            let top_n: i64 = value
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("top_n must be a positive integer, got {value:?}"))?;
            doc["top_n"] = toml_edit::value(top_n);
        }
        "logging.level" => doc["logging"]["level"] = toml_edit::value(value),
        "logging.coloured" => {
            let coloured: bool = value.parse().with_context(|| {
                format!("logging.coloured must be true or false, got {value:?}")
            })?;
            doc["logging"]["coloured"] = toml_edit::value(coloured);
        }
        _ => {
            unknown_key(key)?;
        }
    }

    Ok(doc.to_string())
}

fn unknown_key(key: &str) -> Result<String> {
    anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, KEYS.join(", "))
}
