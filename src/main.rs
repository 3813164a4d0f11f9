mod cmd;
mod core;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Individual income tax return assessment
#[derive(Parser, Debug)]
#[command(name = "taxret", version, about)]
struct Cli {
    /// Assessment parameters (JSON). Defaults to the built-in table for the return's tax year.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assess a return: reliefs, tax by band, credits and balance
    Assess(cmd::assess::AssessCommand),
    /// Per-source income overview, available before the return is complete
    Income(cmd::income::IncomeCommand),
    /// Check source records for data quality issues
    Validate(cmd::validate::ValidateCommand),
    /// Generate an HTML return
    Html(cmd::html::HtmlCommand),
    /// Print input and configuration formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    // a broken configuration is fatal before any input is read
    let config = cli.config.as_deref().map(cmd::read_config).transpose()?;

    match cli.command {
        Command::Assess(c) => c.exec(config.as_ref()),
        Command::Income(c) => c.exec(config.as_ref()),
        Command::Validate(c) => c.exec(config.as_ref()),
        Command::Html(c) => c.exec(config.as_ref()),
        Command::Schema(c) => c.exec(),
    }
}
