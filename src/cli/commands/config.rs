//! Config command handler

use crate::args::ConfigSubcommand;
use ir_metrics::config::{ColumnConfig, Config};
use ir_metrics::info;
use ir_metrics::logger::Level;
use std::io::{self, Write};

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    match subcommand {
        None => handle_config_get(config, None),
        Some(ConfigSubcommand::Get { key }) => handle_config_get(config, key),
        Some(ConfigSubcommand::Set { key, value }) => handle_config_set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => handle_config_unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => handle_config_reset(),
    }
}

fn unknown_key(key: &str) -> ! {
    eprintln!("✗ Unknown config key: '{key}'");
    eprintln!("  Column keys: {}", ColumnConfig::KEYS.join(", "));
    std::process::exit(1);
}

fn save_or_exit(config: &Config) {
    if let Err(e) = config.save() {
        eprintln!("✗ Failed to save config: {e}");
        std::process::exit(1);
    }
    info!("Config saved to {}", Config::get_config_file_path().display());
}

/// Handle the config get subcommand
pub fn handle_config_get(config: &Config, key: Option<String>) {
    if let Some(k) = key {
        match config.get(&k) {
            Some(value) => println!("{value}"),
            None => unknown_key(&k),
        }
    } else {
        println!("\n=== Configuration ({}) ===\n", Config::get_config_file_path().display());
        print!("{config}");
    }
}

/// Handle the config set subcommand
///
/// Log levels are checked here so a typo cannot silently disable logging on
/// the next run.
pub fn handle_config_set(config: &mut Config, key: &str, value: &str) {
    if key == "level" && Level::parse(value).is_none() {
        eprintln!("✗ Invalid log level '{value}'. Allowed values: error, warn, info, debug");
        std::process::exit(1);
    }

    let Some(previous) = config.get(key) else {
        unknown_key(key);
    };
    if let Err(e) = config.set(key, value) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
    save_or_exit(config);

    println!("✓ Set {key} = {value} (was {previous})");
}

/// Handle the config unset subcommand
pub fn handle_config_unset(config: &mut Config, defaults: &Config, key: &str) {
    if let Err(e) = config.unset(key, defaults) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
    save_or_exit(config);

    let restored = config.get(key).unwrap_or_default();
    println!("✓ Reset {key} to default ({restored})");
}

/// Handle the config reset subcommand
pub fn handle_config_reset() {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return;
    }

    print!("Reset every setting, including column names, to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    if response.trim().eq_ignore_ascii_case("y") || response.trim().eq_ignore_ascii_case("yes") {
        if let Err(e) = Config::reset() {
            eprintln!("✗ Failed to remove config file: {e}");
            std::process::exit(1);
        }
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
}
