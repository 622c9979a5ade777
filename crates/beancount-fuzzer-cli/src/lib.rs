mod config;
mod show;

use std::path::PathBuf;

use anyhow::Result;
use beancount_fuzzer::{Fuzzer, ledger};
use clap::{Args as ClapArgs, CommandFactory as _, Parser, Subcommand};

use crate::config::{Config, Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "beancount-fuzzer",
    about = "Complete imported beancount transactions from similar ones in your journal"
)]
#[command(disable_help_subcommand = true)]
struct Args {
    #[command(flatten)]
    files: FileArgs,

    #[command(flatten)]
    matching: MatchArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(ClapArgs)]
struct FileArgs {
    /// Partial beancount file to complete
    infile: PathBuf,

    /// Beancount file to use as a template for predictions [default: master.beancount]
    #[arg(short, long)]
    training: Option<PathBuf>,

    /// Config file [default: beancount-fuzzer.toml, if present]
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(ClapArgs)]
struct MatchArgs {
    /// Only use fuzz scores better than this [default: 86]
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Tag to strip from completed transactions, may be repeated [default: john, fiona]
    #[arg(long = "block-tag")]
    blocked_tags: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the completed file to stdout (default)
    Complete,
    /// Show which journal entry each transaction was completed from
    Explain,
}

pub fn run(args: impl IntoIterator<Item = String>) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "beancount_fuzzer=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    clap_complete::CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse_from(args);

    let config = match &args.files.config {
        Some(path) => Some(Config::load_from_file(path)?),
        None => Config::find_and_load()?,
    };
    let settings = Settings::resolve(
        config,
        Overrides {
            training: args.files.training,
            threshold: args.matching.threshold,
            blocked_tags: args.matching.blocked_tags,
        },
    );
    tracing::debug!("Using {settings:?}");

    let importing = ledger::read_importing(&args.files.infile)?;
    let history = ledger::read_history(&settings.training)?;
    let completion = Fuzzer::new(settings.fuzzer).complete(&history, importing);

    match args.command.unwrap_or(Commands::Complete) {
        Commands::Complete => show::print_completion(completion),
        Commands::Explain => show::show_explain(completion),
    }
}
