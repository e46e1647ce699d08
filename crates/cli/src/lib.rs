pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "kilo",
    about = "KILO operator CLI",
    long_about = "Operate the KILO chat backend: migrations, readiness checks, knowledge seeding and offline intent tagging.",
    after_help = "Examples:\n  kilo doctor --json\n  kilo seed --store-id 1\n  kilo tag \"can my team order custom hoodies?\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic knowledge-base dataset for a store")]
    Seed {
        #[arg(long, default_value_t = 1, help = "Store id that owns the seeded documents")]
        store_id: i64,
    },
    #[command(about = "Validate config, LLM key readiness, and DB connectivity checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run the intent tagger on a message and print the tagged actions")]
    Tag {
        #[arg(help = "Customer message to tag")]
        message: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed { store_id } => commands::seed::run(store_id),
        Command::Doctor { json } => {
            let (output, passed) = commands::doctor::run(json);
            commands::CommandResult { exit_code: if passed { 0 } else { 1 }, output }
        }
        Command::Tag { message } => commands::tag::run(&message),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
