use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "wellplan - plan mastermixes and well allocations for liquid-handling protocols.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a mastermix described by a request file and print the resulting plan.
    Mastermix(MastermixArgs),
    /// List the available container types.
    Types(TypesArgs),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Toml,
    Json,
}

/// Arguments for the `mastermix` subcommand.
#[derive(Args, Debug)]
pub struct MastermixArgs {
    /// Path to the mastermix request file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub request: PathBuf,

    /// Additional container types, merged over the built-in ones.
    #[arg(long, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Output format of the plan.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Toml)]
    pub format: OutputFormat,

    /// Write the plan to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `types` subcommand.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Additional container types, merged over the built-in ones.
    #[arg(long, value_name = "PATH")]
    pub registry: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mastermix_with_defaults() {
        let cli = Cli::parse_from(["wellplan", "mastermix", "-r", "request.toml"]);
        match cli.command {
            Commands::Mastermix(args) => {
                assert_eq!(args.request, PathBuf::from("request.toml"));
                assert_eq!(args.format, OutputFormat::Toml);
                assert!(args.registry.is_none());
                assert!(args.output.is_none());
            }
            other => panic!("Expected 'mastermix' subcommand, got {:?}", other),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn global_flags_apply_after_the_subcommand() {
        let cli = Cli::parse_from([
            "wellplan", "types", "-vv", "--log-file", "run.log", "--registry", "extra.toml",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        assert!(matches!(cli.command, Commands::Types(TypesArgs { registry: Some(_) })));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["wellplan", "types", "-q", "-v"]).is_err());
    }

    #[test]
    fn json_format_is_accepted() {
        let cli = Cli::parse_from(["wellplan", "mastermix", "-r", "r.toml", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Commands::Mastermix(MastermixArgs { format: OutputFormat::Json, .. })
        ));
    }
}
