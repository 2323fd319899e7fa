//! Command-line interface for inspecting and rewriting shapefile networks.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use netshape_core::{Crs, PropertyValue, select_nodes_by_attribute};
use netshape_data::{BatchReprojector, FailurePolicy, read_crs, read_graph, read_schema, write_graph};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

mod error;

pub use error::CliError;

const ARG_INPUT_DIR: &str = "input-dir";
const ARG_OUTPUT_DIR: &str = "output-dir";
const ARG_EPSG: &str = "epsg";
const ENV_INPUT_DIR: &str = "NETSHAPE_CMDS_REPROJECT_INPUT_DIR";
const ENV_OUTPUT_DIR: &str = "NETSHAPE_CMDS_REPROJECT_OUTPUT_DIR";
const ENV_EPSG: &str = "NETSHAPE_CMDS_REPROJECT_EPSG";

/// Run the netshape CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when parsing, configuration or the command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let stdout = std::io::stdout();
    execute(cli.command, &mut stdout.lock())
}

fn execute(command: Command, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Inspect(args) => run_inspect(&args, out),
        Command::Rebuild(args) => run_rebuild(&args, out),
        Command::Select(args) => run_select(&args, out),
        Command::Reproject(args) => run_reproject(&args.into_config()?, out),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "netshape",
    about = "Load point and line shapefiles as graphs and write them back",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a layer's schema and CRS.
    Inspect(InspectArgs),
    /// Read a layer into a graph and write it back out.
    Rebuild(RebuildArgs),
    /// List the nodes whose attribute equals a value.
    Select(SelectArgs),
    /// Re-tag every shapefile in a directory with a new CRS.
    Reproject(ReprojectArgs),
}

#[derive(Debug, Clone, Args)]
struct InspectArgs {
    /// Shapefile to inspect.
    #[arg(long, value_name = "shp")]
    input: Utf8PathBuf,
}

#[derive(Debug, Clone, Args)]
struct RebuildArgs {
    /// Source shapefile.
    #[arg(long, value_name = "shp")]
    input: Utf8PathBuf,
    /// Destination shapefile; parent directories are created.
    #[arg(long, value_name = "shp")]
    output: Utf8PathBuf,
}

#[derive(Debug, Clone, Args)]
struct SelectArgs {
    /// Shapefile to search.
    #[arg(long, value_name = "shp")]
    input: Utf8PathBuf,
    /// Attribute field to compare.
    #[arg(long)]
    field: String,
    /// Value to look for; numeric text compares as a number.
    #[arg(long)]
    value: String,
}

/// CLI arguments for the `reproject` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "reproject",
    long_about = "Copy every shapefile in a directory into another, tagged \
                  with a new CRS. Options can come from CLI flags, \
                  configuration files, or environment variables.",
    about = "Re-tag a directory of shapefiles with a new CRS"
)]
#[ortho_config(prefix = "NETSHAPE")]
struct ReprojectArgs {
    /// Directory holding the source shapefiles.
    #[arg(long = ARG_INPUT_DIR, value_name = "dir")]
    #[serde(default)]
    input_dir: Option<Utf8PathBuf>,
    /// Existing directory receiving the copies.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    output_dir: Option<Utf8PathBuf>,
    /// EPSG code of the target CRS.
    #[arg(long = ARG_EPSG, value_name = "code")]
    #[serde(default)]
    epsg: Option<u32>,
    /// Carry on past files that fail, reporting them at the end.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "bool")]
    #[serde(default)]
    skip_failures: Option<bool>,
}

impl ReprojectArgs {
    fn into_config(self) -> Result<ReprojectConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReprojectConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReprojectConfig {
    input_dir: Utf8PathBuf,
    output_dir: Utf8PathBuf,
    epsg: u32,
    policy: FailurePolicy,
}

impl TryFrom<ReprojectArgs> for ReprojectConfig {
    type Error = CliError;

    fn try_from(args: ReprojectArgs) -> Result<Self, Self::Error> {
        let input_dir = args.input_dir.ok_or(CliError::MissingArgument {
            field: ARG_INPUT_DIR,
            env: ENV_INPUT_DIR,
        })?;
        let output_dir = args.output_dir.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT_DIR,
            env: ENV_OUTPUT_DIR,
        })?;
        let epsg = args.epsg.ok_or(CliError::MissingArgument {
            field: ARG_EPSG,
            env: ENV_EPSG,
        })?;
        let policy = if args.skip_failures.unwrap_or(false) {
            FailurePolicy::SkipFailures
        } else {
            FailurePolicy::AbortOnFirstFailure
        };
        Ok(Self {
            input_dir,
            output_dir,
            epsg,
            policy,
        })
    }
}

fn run_inspect(args: &InspectArgs, out: &mut impl Write) -> Result<(), CliError> {
    let schema = read_schema(&args.input)?;
    let crs = read_crs(&args.input)?;
    let json = serde_json::to_string_pretty(&schema).map_err(CliError::SerializeSchema)?;
    writeln!(out, "{json}")?;
    match crs {
        Some(crs) => writeln!(out, "crs: {crs}")?,
        None => writeln!(out, "crs: none")?,
    }
    Ok(())
}

fn run_rebuild(args: &RebuildArgs, out: &mut impl Write) -> Result<(), CliError> {
    let (graph, _) = read_graph(&args.input)?;
    let schema = read_schema(&args.input)?;
    let crs = read_crs(&args.input)?;
    let summary = write_graph(&args.output, &graph, Some(&schema), crs.as_ref())?;
    writeln!(
        out,
        "rebuilt {} from {} node(s) and {} edge(s): {} {} feature(s)",
        summary.path,
        graph.node_count(),
        graph.edge_count(),
        summary.features,
        summary.geometry
    )?;
    Ok(())
}

/// Interpret command-line text as the most specific property value.
fn parse_value(text: &str) -> PropertyValue {
    if let Ok(integer) = text.parse::<i64>() {
        PropertyValue::Integer(integer)
    } else if let Ok(number) = text.parse::<f64>() {
        PropertyValue::Number(number)
    } else {
        PropertyValue::from(text)
    }
}

fn run_select(args: &SelectArgs, out: &mut impl Write) -> Result<(), CliError> {
    let (graph, _) = read_graph(&args.input)?;
    let value = parse_value(&args.value);
    for node in select_nodes_by_attribute(&graph, &args.field, &value) {
        writeln!(out, "{}", node.key())?;
    }
    Ok(())
}

fn run_reproject(config: &ReprojectConfig, out: &mut impl Write) -> Result<(), CliError> {
    let crs = Crs::from_epsg(config.epsg)?;
    let report = BatchReprojector::new(crs)
        .with_policy(config.policy)
        .run(&config.input_dir, &config.output_dir)?;
    for file in &report.written {
        writeln!(out, "wrote {} ({} feature(s))", file.destination, file.features)?;
    }
    for file in &report.skipped {
        writeln!(out, "skipped {}: {}", file.source, file.error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
