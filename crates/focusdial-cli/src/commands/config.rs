use clap::Subcommand;
use focusdial_core::Config;

use super::print_json;
use crate::state::{open_engine, save_engine};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.focus_minutes", "feedback.sound_enabled")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List {
        /// One `key = value` line per setting instead of JSON
        #[arg(long)]
        flat: bool,
    },
    /// Print the config file location
    Path,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            if key.starts_with("timer.") {
                apply_durations(&config)?;
            }
            println!("ok");
        }
        ConfigAction::List { flat } => {
            let config = Config::load_or_default();
            if flat {
                for (key, value) in config.entries() {
                    println!("{key} = {value}");
                }
            } else {
                print_json(&config)?;
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            apply_durations(&config)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// New durations reach an idle timer sitting at the start of that phase.
fn apply_durations(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, _) = open_engine()?;
    engine.set_focus_minutes(config.timer.focus_minutes);
    engine.set_break_minutes(config.timer.break_minutes);
    save_engine(&mut engine)
}
