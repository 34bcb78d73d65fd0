use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "timeblox-cli", version, about = "TimeBlox CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show, copy, clear and export days
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Edit the blocks of one day
    Block {
        #[command(subcommand)]
        action: commands::block::BlockAction,
    },
    /// Month markers and month paste
    Month {
        #[command(subcommand)]
        action: commands::month::MonthAction,
    },
    /// Master day templates
    Master {
        #[command(subcommand)]
        action: commands::master::MasterAction,
    },
    /// Activity category registry
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Text-to-schedule generation
    Generate {
        #[command(subcommand)]
        action: commands::generate::GenerateAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TIMEBLOX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Day { action } => commands::day::run(action),
        Commands::Block { action } => commands::block::run(action),
        Commands::Month { action } => commands::month::run(action),
        Commands::Master { action } => commands::master::run(action),
        Commands::Category { action } => commands::category::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Generate { action } => commands::generate::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "timeblox-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
