use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tarifa_store::Table;

#[derive(Parser)]
#[command(
    name = "tarifa",
    about = "Tarifa: vehicle price-list normalizer and reconciler",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the stored tables (overrides the config file)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a workbook into a table, replacing its contents
    Load(LoadArgs),
    /// Transform the stored new price list in place
    Apply,
    /// Transform a new price list workbook and write the result
    Transform(TransformArgs),
    /// Compare a new price list against a base price list
    Diff(DiffArgs),
    /// Compare the stored new price list against the stored base
    DiffStored,
    /// Write a workbook without its Temp column
    Export(ExportArgs),
    /// Show the latest record of a table
    Show(ShowArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TableArg {
    Base,
    New,
}

impl From<TableArg> for Table {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Base => Table::Base,
            TableArg::New => Table::New,
        }
    }
}

#[derive(Args)]
pub struct LoadArgs {
    pub file: PathBuf,
    #[arg(short, long, value_enum)]
    pub table: TableArg,
}

#[derive(Args)]
pub struct TransformArgs {
    pub file: PathBuf,
    /// Output workbook (default: <FILE stem>.transformed.xlsx)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct DiffArgs {
    pub base: PathBuf,
    pub new: PathBuf,
    /// Compare NEW as loaded, without transforming it first
    #[arg(long)]
    pub raw_new: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    pub file: PathBuf,
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(short, long, value_enum)]
    pub table: TableArg,
    /// Maximum number of rows to print
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_diff_with_globals() {
        let cli = Cli::try_parse_from([
            "tarifa", "diff", "base.xlsx", "new.xlsx", "--raw-new", "--format", "json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Diff(args) => {
                assert!(args.raw_new);
                assert_eq!(args.new, PathBuf::from("new.xlsx"));
            }
            _ => panic!("expected diff"),
        }
    }

    #[test]
    fn load_requires_table() {
        assert!(Cli::try_parse_from(["tarifa", "load", "x.xlsx"]).is_err());
        let cli = Cli::try_parse_from(["tarifa", "load", "x.xlsx", "--table", "base"]).unwrap();
        match cli.command {
            Command::Load(args) => assert_eq!(Table::from(args.table), Table::Base),
            _ => panic!("expected load"),
        }
    }

    #[test]
    fn diff_stored_is_kebab_case() {
        let cli = Cli::try_parse_from(["tarifa", "diff-stored", "--store", "/tmp/t"]).unwrap();
        assert!(matches!(cli.command, Command::DiffStored));
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/t")));
    }
}
