//! Command-line surface of the churn-label and churn-extract binaries.

use crate::exit_codes::ExitCode;
use crate::label::LabelParams;
use crate::logging::{init_logging, LogFormat};
use crate::pipeline::{run_extractor, run_labeler, ExtractJob, LabelJob};
use churn_common::{OutputFormat, Result, RunId};
use churn_config::{resolve_config, validate_config, PipelineConfig};
use clap::{Args, Parser};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{error, info};

/// Options shared by both binaries.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Pipeline config file (JSON); overrides CHURNPREP_CONFIG
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run summary format on stdout (text, json)
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Create the list of churned customer-product combinations.
#[derive(Parser, Debug)]
#[command(name = "churn-label", version, about)]
pub struct LabelCli {
    /// Raw order export (CSV)
    pub input: PathBuf,

    /// Filtered order table with a leading customer-product id column
    pub data_file: PathBuf,

    /// Mapping of customer-product ids to label (churned: True)
    pub label_file: PathBuf,

    /// Days after which a customer-product combination counts as churned [default: 365]
    #[arg(long, alias = "churn_threshold", value_name = "DAYS")]
    pub churn_threshold: Option<u32>,

    /// Orders a customer-product combination needs to be labeled [default: 10]
    #[arg(long, alias = "inclusion_threshold", value_name = "COUNT")]
    pub inclusion_threshold: Option<usize>,

    /// Also write the ids dropped by the inclusion threshold
    #[arg(long, value_name = "PATH")]
    pub rejected_file: Option<PathBuf>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Extract customer-product time series into a churned/not_churned tree.
#[derive(Parser, Debug)]
#[command(name = "churn-extract", version, about)]
pub struct ExtractCli {
    /// Labeled order table written by churn-label
    pub input: PathBuf,

    /// Label file written by churn-label
    pub label_file: PathBuf,

    /// Root folder for the time series
    pub out_dir: PathBuf,

    /// Pad every series to one row per calendar day
    #[arg(long)]
    pub pad: bool,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl LabelCli {
    /// Combine the resolved config with command-line overrides and validate
    /// the result.
    pub fn job(&self, config: &PipelineConfig) -> Result<LabelJob> {
        let mut config = config.clone();
        if let Some(days) = self.churn_threshold {
            config.labeler.churn_window_days = days;
        }
        if let Some(count) = self.inclusion_threshold {
            config.labeler.inclusion_threshold = count;
        }
        validate_config(&config)?;
        Ok(LabelJob {
            input: self.input.clone(),
            data_out: self.data_file.clone(),
            label_out: self.label_file.clone(),
            rejected_out: self.rejected_file.clone(),
            params: LabelParams {
                churn_window_days: config.labeler.churn_window_days,
                inclusion_threshold: config.labeler.inclusion_threshold,
            },
            columns: config.columns,
            delimiter: config.csv.delimiter_byte(),
            decimal: config.labeler.input_decimal,
        })
    }
}

impl ExtractCli {
    /// Combine the resolved config with command-line overrides.
    pub fn job(&self, config: &PipelineConfig) -> ExtractJob {
        ExtractJob {
            input: self.input.clone(),
            labels: self.label_file.clone(),
            out_dir: self.out_dir.clone(),
            pad: self.pad || config.extractor.pad,
            columns: config.columns.clone(),
            delimiter: config.csv.delimiter_byte(),
            decimal: config.extractor.input_decimal,
        }
    }
}

fn load_config(global: &GlobalArgs) -> Result<PipelineConfig> {
    let resolved = resolve_config(global.config.as_deref())?;
    info!(source = %resolved.source, "configuration loaded");
    Ok(resolved.config)
}

fn report<S: Serialize + Display>(summary: &S, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{summary}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
    }
    Ok(())
}

fn finish(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Clean,
        Err(e) => {
            let code = ExitCode::for_error(&e);
            error!(error = %e, code = e.code(), "run failed");
            eprintln!("error: {e}");
            code
        }
    }
}

fn label(cli: &LabelCli, run_id: &RunId) -> Result<()> {
    let config = load_config(&cli.global)?;
    let summary = run_labeler(&cli.job(&config)?, run_id)?;
    report(&summary, cli.global.format)
}

fn extract(cli: &ExtractCli, run_id: &RunId) -> Result<()> {
    let config = load_config(&cli.global)?;
    let summary = run_extractor(&cli.job(&config), run_id)?;
    report(&summary, cli.global.format)
}

/// Entry point of churn-label.
pub fn run_label(cli: LabelCli) -> ExitCode {
    init_logging(cli.global.log_format, cli.global.verbose, cli.global.quiet);
    finish(label(&cli, &RunId::new()))
}

/// Entry point of churn-extract.
pub fn run_extract(cli: ExtractCli) -> ExitCode {
    init_logging(cli.global.log_format, cli.global.verbose, cli.global.quiet);
    finish(extract(&cli, &RunId::new()))
}
