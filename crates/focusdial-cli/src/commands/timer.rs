use std::time::Duration;

use clap::Subcommand;
use focusdial_core::timer::{minutes_to_secs, run_until_idle, TimerState, DEFAULT_RESOLUTION};
use focusdial_core::Event;

use super::print_json;
use crate::state::{open_engine, save_engine};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown, or resume a paused one
    Start,
    /// Pause the countdown
    Pause,
    /// Reset to the full length of the current phase
    Reset,
    /// End the current phase now and switch to the other one
    Skip,
    /// Set the countdown length (1-60 minutes) while idle or paused
    Set {
        /// Minutes
        minutes: f64,
    },
    /// Print current timer state as JSON
    Status,
    /// Count down in the foreground until the period completes
    Run {
        /// Wake-up interval in milliseconds
        #[arg(long, default_value_t = DEFAULT_RESOLUTION.as_millis() as u64)]
        resolution_ms: u64,
    },
}

/// Events worth showing when a saved timer is caught up.
fn is_milestone(event: &Event) -> bool {
    !matches!(event, Event::Tick { .. } | Event::CompletionCue { .. })
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, caught_up) = open_engine()?;
    for event in caught_up.iter().filter(|e| is_milestone(e)) {
        print_json(event)?;
    }

    match action {
        TimerAction::Start => match engine.start() {
            Some(event) => print_json(&event)?,
            None => print_json(&engine.snapshot())?,
        },
        TimerAction::Pause => match engine.pause() {
            Some(event) => print_json(&event)?,
            None => print_json(&engine.snapshot())?,
        },
        TimerAction::Reset => match engine.reset() {
            Some(event) => print_json(&event)?,
            None => print_json(&engine.snapshot())?,
        },
        TimerAction::Skip => match engine.skip() {
            Some(event) => print_json(&event)?,
            None => print_json(&engine.snapshot())?,
        },
        TimerAction::Set { minutes } => {
            if !minutes.is_finite() || minutes <= 0.0 {
                return Err(format!("invalid minutes: {minutes}").into());
            }
            match engine.set_time_remaining(minutes_to_secs(minutes)) {
                Some(event) => print_json(&event)?,
                None => print_json(&engine.snapshot())?,
            }
        }
        TimerAction::Status => print_json(&engine.snapshot())?,
        TimerAction::Run { resolution_ms } => {
            if engine.state() != TimerState::Running {
                if let Some(event) = engine.start() {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            // Saved first so an interrupted run resumes on the next command.
            save_engine(&mut engine)?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let mut write_error = None;
            runtime.block_on(run_until_idle(
                &mut engine,
                Duration::from_millis(resolution_ms),
                |event| {
                    if write_error.is_some() {
                        return;
                    }
                    match serde_json::to_string(event) {
                        Ok(line) => println!("{line}"),
                        Err(e) => write_error = Some(e),
                    }
                },
            ));
            if let Some(e) = write_error {
                return Err(e.into());
            }
        }
    }

    save_engine(&mut engine)?;
    Ok(())
}
