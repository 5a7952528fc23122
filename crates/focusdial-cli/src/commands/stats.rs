use chrono::NaiveDate;
use clap::Subcommand;
use focusdial_core::feedback::{SystemClock, WallClock};
use focusdial_core::stats::Statistics;
use focusdial_core::storage::{Config, Database};
use serde_json::json;

use super::print_json;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's completions
    Today,
    /// One day (YYYY-MM-DD)
    Day {
        date: NaiveDate,
    },
    /// One calendar month (YYYY-MM)
    Month {
        #[arg(value_parser = parse_month)]
        month: (i32, u32),
    },
    /// One calendar year
    Year {
        year: i32,
    },
    /// Zero the statistics of a day, or of a range with --to
    Reset {
        date: NaiveDate,
        /// Last day of the range, inclusive
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM but got '{s}'"))?;
    let year = year.parse().map_err(|_| format!("invalid year in '{s}'"))?;
    let month = month.parse().map_err(|_| format!("invalid month in '{s}'"))?;
    if !(1..=12).contains(&month) {
        return Err(format!("month out of range in '{s}'"));
    }
    Ok((year, month))
}

fn open_statistics() -> Result<Statistics, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    Ok(Statistics::new(Database::open()?).with_default_color(config.default_color()))
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut stats = open_statistics()?;

    match action {
        StatsAction::Today => {
            let today = SystemClock.now().date();
            print_json(&stats.day(today))?;
        }
        StatsAction::Day { date } => print_json(&stats.day(date))?,
        StatsAction::Month { month: (year, month) } => {
            let summary = stats
                .month(year, month)
                .ok_or_else(|| format!("invalid month: {year}-{month:02}"))?;
            print_json(&summary)?;
        }
        StatsAction::Year { year } => {
            let summary = stats.year(year).ok_or_else(|| format!("invalid year: {year}"))?;
            print_json(&summary)?;
        }
        StatsAction::Reset { date, to } => {
            let to = to.unwrap_or(date);
            if to < date {
                return Err(format!("--to {to} is before {date}").into());
            }
            let days = stats.reset_range(date, to);
            print_json(&json!({
                "reset_days": days,
                "from": date,
                "to": to,
            }))?;
        }
    }
    Ok(())
}
