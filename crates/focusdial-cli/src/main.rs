use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod state;
mod terminal;

#[derive(Parser)]
#[command(name = "focusdial", version, about = "Focus/break dial timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Set the countdown by dragging across the dial
    Dial(commands::dial::DialArgs),
    /// Completion statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Tag attached to completed focus sessions
    Tag {
        #[command(subcommand)]
        action: commands::tag::TagAction,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("FOCUSDIAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Dial(args) => commands::dial::run(args),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Tag { action } => commands::tag::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
