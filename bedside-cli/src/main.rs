use std::{path::PathBuf, process::ExitCode};

use bedside_lib::{Error, Repository, repository::{CoreConfig, StorageError}};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod export;
mod patient;

#[derive(Parser, Debug)]
#[command(name = "bedside")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Use this roster file instead of the configured one
    #[arg(short, long, global = true)]
    roster: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    #[command(flatten)]
    Patient(patient::Command),
    /// Print patients as text or write them to a PDF
    Export(export::Args),
    /// Show the configuration file
    Config,
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {e}");
    }

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            exit_code(&e).into()
        }
    }
}

fn run(cli: &Cli) -> bedside_lib::Result<()> {
    let mut cfg = CoreConfig::load()?;
    if let Some(roster) = &cli.roster {
        cfg.set_roster_file(roster.clone());
    }

    match &cli.command {
        Command::Config => {
            println!("{}", CoreConfig::path()?.display().to_string().bold());
            print!("{}", cfg.to_toml()?);
            Ok(())
        }
        Command::Patient(cmd) => {
            let mut repo = Repository::from_config(&cfg)?;
            patient::handle(&mut repo, cmd)
        }
        Command::Export(args) => {
            let repo = Repository::from_config(&cfg)?;
            export::handle(&repo, &cfg, args)
        }
    }
}

fn exit_code(e: &Error) -> sysexits::ExitCode {
    use sysexits::ExitCode::*;

    match e {
        Error::Storage(StorageError::Read { .. }) => IoErr,
        Error::Storage(StorageError::Write { .. }) => CantCreat,
        Error::Storage(_) | Error::DuplicateId(_) => DataErr,
        Error::Config { .. } | Error::CreateDir { .. } | Error::Document { .. } => CantCreat,
        Error::NotFound(_)
        | Error::AmbiguousId(_)
        | Error::UnknownField(_)
        | Error::FieldType { .. } => Usage,
        Error::NoHome => OsFile,
        Error::ConfigSerialize(_) => Software,
    }
}
