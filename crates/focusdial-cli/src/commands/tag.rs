use clap::Subcommand;
use focusdial_core::stats::Rgba;
use focusdial_core::{Config, Tag};
use serde_json::json;

use super::print_json;
use crate::state::{open_engine, save_tag};

#[derive(Subcommand)]
pub enum TagAction {
    /// Attribute the next focus completions to a tag
    Select {
        name: String,
        /// Hourly color for this tag, #RRGGBB or #RRGGBBAA
        #[arg(long)]
        color: Option<Rgba>,
    },
    /// Stop attributing completions to a tag
    Clear,
    /// Print the selected tag
    Show,
}

pub fn run(action: TagAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, _) = open_engine()?;

    match action {
        TagAction::Select { name, color } => {
            let name = name.trim();
            if name.is_empty() {
                return Err("tag name must not be empty".into());
            }
            let color = color.unwrap_or_else(|| Config::load_or_default().default_color());
            engine.select_tag(Some(Tag::new(name, color)));
            save_tag(&mut engine)?;
            print_json(&engine.selected_tag())?;
        }
        TagAction::Clear => {
            engine.select_tag(None);
            save_tag(&mut engine)?;
            print_json(&json!(null))?;
        }
        TagAction::Show => print_json(&engine.selected_tag())?,
    }
    Ok(())
}
