//! Automation Exercise CLI - Test runner and data tools.
//!
//! # Usage
//!
//! ```bash
//! # Run every browser scenario
//! ae-cli test --project e2e
//!
//! # Run one scenario file with a visible browser
//! ae-cli test --project e2e --pattern cart --headed
//!
//! # Run the API group
//! ae-cli test --project api
//!
//! # Print a generated shopper profile
//! ae-cli user --reveal
//! ```
//!
//! # Commands
//!
//! - `test` - Run the integration suite through cargo
//! - `user` - Print a generated profile as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::test::Project;

#[derive(Parser)]
#[command(name = "ae-cli")]
#[command(author, version, about = "Automation Exercise test suite tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the integration suite
    Test {
        /// Which group to run
        #[arg(short, long, value_enum, default_value = "e2e")]
        project: Project,

        /// Scenario file stem for e2e (`cart`), test name filter for api
        #[arg(long)]
        pattern: Option<String>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },
    /// Print a freshly generated user profile
    User {
        /// Print password and card details instead of redacting them
        #[arg(long)]
        reveal: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Test {
            project,
            pattern,
            headed,
        } => {
            commands::test::run(project, pattern.as_deref(), headed).await?;
        }
        Commands::User { reveal } => commands::user::print_profile(reveal)?,
    }
    Ok(())
}
