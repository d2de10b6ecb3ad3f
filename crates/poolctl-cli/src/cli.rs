//! Command-line parsing and dispatch for the poolctl binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use poolctl_attr::catalog::ValueKind;
use poolctl_telemetry::LoggingConfig;

use crate::commands;
use crate::context::{CliError, CliResult, open_store};

const DEFAULT_DB_PATH: &str = "/var/lib/pool/attributes.db";

/// Parses CLI arguments, executes the requested command, and maps errors to
/// the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(err) = poolctl_telemetry::init_logging(&LoggingConfig::default()) {
        eprintln!("warning: {err:#}");
    }

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Add(args) => {
            let store = open_store(&cli.db).await?;
            commands::attrs::add(&store, &args.keyword, args.kind.value_kind(), &args.value).await
        }
        Command::Del(args) => {
            let value = pair_value_kind(args.value.as_deref(), args.kind)?;
            let store = open_store(&cli.db).await?;
            commands::attrs::del(&store, &args.keyword, value).await
        }
        Command::Ls => {
            let store = open_store(&cli.db).await?;
            commands::attrs::list(&store, cli.output).await
        }
        Command::Keywords => {
            commands::catalog::keywords();
            Ok(())
        }
    }
}

#[derive(Parser)]
#[command(
    name = "poolctl",
    about = "Administrative CLI for pool configuration attributes"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "POOLCTL_DB",
        default_value = DEFAULT_DB_PATH,
        help = "Path to the pool database"
    )]
    db: PathBuf,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a configuration attribute.
    Add(AddArgs),
    /// Delete matching configuration attributes.
    Del(DelArgs),
    /// List stored attributes ordered by type code.
    Ls,
    /// Show the supported attribute keywords.
    Keywords,
}

#[derive(Args)]
struct AddArgs {
    #[arg(help = "Attribute keyword or numeric type code")]
    keyword: String,
    #[arg(help = "Raw attribute value")]
    value: String,
    #[arg(long, value_enum, help = "Value kind of the supplied value")]
    kind: KindArg,
}

#[derive(Args)]
struct DelArgs {
    #[arg(help = "Attribute keyword or numeric type code")]
    keyword: String,
    #[arg(help = "Raw attribute value; omit to match every record of the keyword")]
    value: Option<String>,
    #[arg(long, value_enum, help = "Value kind of the supplied value")]
    kind: Option<KindArg>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum KindArg {
    String,
    Hex,
    Addr,
    Subnet,
}

impl KindArg {
    const fn value_kind(self) -> ValueKind {
        match self {
            Self::String => ValueKind::String,
            Self::Hex => ValueKind::Hex,
            Self::Addr => ValueKind::Address,
            Self::Subnet => ValueKind::Subnet,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn pair_value_kind(
    value: Option<&str>,
    kind: Option<KindArg>,
) -> CliResult<Option<(ValueKind, &str)>> {
    match (value, kind) {
        (Some(value), Some(kind)) => Ok(Some((kind.value_kind(), value))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(CliError::validation(
            "a value requires --kind to declare how to encode it",
        )),
        (None, Some(_)) => Err(CliError::validation("--kind requires a value to encode")),
    }
}
