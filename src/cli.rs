//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvTradeLogAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::analysis::{AnalysisConfig, InputConfig};
use crate::domain::config_validation::{
    read_number, validate_analysis_config, validate_input_config, validate_report_format,
};
use crate::domain::error::TradelogError;
use crate::domain::metrics::MetricsReport;
use crate::domain::trade::TradeLog;
use crate::ports::config_port::{ConfigPort, EmptyConfig};
use crate::ports::report_port::ReportPort;
use crate::ports::trade_log_port::TradeLogPort;

#[derive(Parser, Debug)]
#[command(
    name = "tradelog",
    about = "Trade log performance analytics and execute decision"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute metrics and the execute decision for a trade log
    Analyze(AnalyzeArgs),
    /// Show the columns, missing values and rows of a trade log
    Inspect {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        trades: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Trade log CSV (overrides [input] trade_log)
    #[arg(short, long)]
    pub trades: Option<PathBuf>,
    /// Starting portfolio value (overrides [analysis] initial_portfolio_value)
    #[arg(long)]
    pub initial_value: Option<f64>,
    /// Risk-free rate (overrides [analysis] risk_free_rate)
    #[arg(long, allow_negative_numbers = true)]
    pub risk_free_rate: Option<f64>,
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Html,
    Json,
}

pub fn run(cli: Cli) -> ExitCode {
    let mut stdout = io::stdout().lock();
    let result = match cli.command {
        Command::Analyze(args) => run_analyze(&args, &mut stdout).map(|_| ()),
        Command::Inspect { config, trades } => {
            run_inspect(config.as_deref(), trades.as_deref(), &mut stdout).map(|_| ())
        }
        Command::Validate { config } => run_validate(&config, &mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load the INI file when one is given; otherwise every key takes its default.
pub fn load_config(path: Option<&Path>) -> Result<Box<dyn ConfigPort>, TradelogError> {
    match path {
        Some(p) => {
            info!("Loading config from {}", p.display());
            Ok(Box::new(FileConfigAdapter::from_file(p)?))
        }
        None => Ok(Box::new(EmptyConfig)),
    }
}

pub fn build_analysis_config(
    config: &dyn ConfigPort,
    initial_value: Option<f64>,
    risk_free_rate: Option<f64>,
) -> Result<AnalysisConfig, TradelogError> {
    let defaults = AnalysisConfig::default();
    let initial_portfolio_value = match initial_value {
        Some(v) => v,
        None => read_number(
            config,
            "analysis",
            "initial_portfolio_value",
            defaults.initial_portfolio_value,
        )?,
    };
    let risk_free_rate = match risk_free_rate {
        Some(v) => v,
        None => read_number(config, "analysis", "risk_free_rate", defaults.risk_free_rate)?,
    };

    let analysis = AnalysisConfig {
        initial_portfolio_value,
        risk_free_rate,
    };
    validate_analysis_config(&analysis)?;
    Ok(analysis)
}

pub fn build_input_config(
    config: &dyn ConfigPort,
    trades_override: Option<&Path>,
) -> Result<InputConfig, TradelogError> {
    let defaults = InputConfig::default();
    let input = InputConfig {
        trade_log: trades_override
            .map(Path::to_path_buf)
            .or_else(|| config.get_value("input", "trade_log").map(PathBuf::from))
            .unwrap_or(defaults.trade_log),
        entry_column: config
            .get_value("input", "entry_column")
            .unwrap_or(defaults.entry_column),
        exit_column: config
            .get_value("input", "exit_column")
            .unwrap_or(defaults.exit_column),
    };
    validate_input_config(&input)?;
    Ok(input)
}

pub fn resolve_report_format(
    config: &dyn ConfigPort,
    format_override: Option<ReportFormat>,
) -> Result<ReportFormat, TradelogError> {
    if let Some(format) = format_override {
        return Ok(format);
    }
    match config.get_value("report", "format") {
        None => Ok(ReportFormat::Text),
        Some(raw) => {
            validate_report_format(&raw)?;
            ReportFormat::from_str(&raw, true).map_err(|reason| TradelogError::ConfigInvalid {
                section: "report".into(),
                key: "format".into(),
                reason,
            })
        }
    }
}

pub fn report_adapter(format: ReportFormat) -> Result<Box<dyn ReportPort>, TradelogError> {
    match format {
        ReportFormat::Text => Ok(Box::new(TextReportAdapter::new())),
        ReportFormat::Json => Ok(Box::new(JsonReportAdapter::new())),
        #[cfg(feature = "html")]
        ReportFormat::Html => Ok(Box::new(
            crate::adapters::html_report_adapter::HtmlReportAdapter::new(),
        )),
        #[cfg(not(feature = "html"))]
        ReportFormat::Html => Err(TradelogError::Report {
            reason: "html feature is required for HTML reports".into(),
        }),
    }
}

pub fn load_trade_log(input: &InputConfig) -> Result<TradeLog, TradelogError> {
    info!("Loading trades from {}", input.trade_log.display());
    CsvTradeLogAdapter::from_input_config(input).load_trade_log()
}

/// Load, compute and render. The report goes to `output` if configured,
/// otherwise to `out`.
pub fn run_analyze(args: &AnalyzeArgs, out: &mut dyn Write) -> Result<MetricsReport, TradelogError> {
    // Stage 1: configuration, validated before the trade log is touched
    let config = load_config(args.config.as_deref())?;
    let analysis = build_analysis_config(config.as_ref(), args.initial_value, args.risk_free_rate)?;
    let input = build_input_config(config.as_ref(), args.trades.as_deref())?;
    let format = resolve_report_format(config.as_ref(), args.format)?;
    let output = args
        .output
        .clone()
        .or_else(|| config.get_value("report", "output").map(PathBuf::from));

    // Stage 2: trade log
    let log = load_trade_log(&input)?;
    info!(
        "Analyzing {} trades (initial value {}, risk-free rate {})",
        log.len(),
        analysis.initial_portfolio_value,
        analysis.risk_free_rate
    );

    // Stage 3: metrics
    let report = MetricsReport::compute(&log.trades, &analysis);
    for failure in report.failures() {
        warn!("{failure}");
    }
    info!("Decision: {}", report.decision);

    // Stage 4: report
    let adapter = report_adapter(format)?;
    match output {
        Some(path) => {
            adapter.write(&log, &report, &analysis, &path)?;
            info!("Report written to {}", path.display());
        }
        None => {
            let rendered = adapter.render(&log, &report, &analysis)?;
            out.write_all(rendered.as_bytes())?;
        }
    }

    Ok(report)
}

pub fn run_inspect(
    config_path: Option<&Path>,
    trades: Option<&Path>,
    out: &mut dyn Write,
) -> Result<TradeLog, TradelogError> {
    let config = load_config(config_path)?;
    let input = build_input_config(config.as_ref(), trades)?;
    let log = load_trade_log(&input)?;

    writeln!(out, "Columns: {}", log.columns().join(", "))?;
    writeln!(out, "Rows: {}", log.len())?;
    writeln!(out, "\nMissing values:")?;
    for (column, count) in log.missing_values() {
        writeln!(out, "  {column}: {count}")?;
    }

    writeln!(out)?;
    writeln!(out, "{}", log.columns().join("\t"))?;
    for row in log.rows() {
        writeln!(out, "{}", row.join("\t"))?;
    }
    Ok(log)
}

pub fn run_validate(config_path: &Path, out: &mut dyn Write) -> Result<(), TradelogError> {
    info!("Validating config {}", config_path.display());
    let config = FileConfigAdapter::from_file(config_path)?;
    for section in config.sections() {
        if !["analysis", "input", "report"].contains(&section.as_str()) {
            warn!("Ignoring unknown section [{section}]");
        }
    }

    let analysis = build_analysis_config(&config, None, None)?;
    let input = build_input_config(&config, None)?;
    let format = resolve_report_format(&config, None)?;

    writeln!(out, "[analysis]")?;
    writeln!(
        out,
        "  initial_portfolio_value = {}",
        analysis.initial_portfolio_value
    )?;
    writeln!(out, "  risk_free_rate = {}", analysis.risk_free_rate)?;
    writeln!(out, "[input]")?;
    writeln!(out, "  trade_log = {}", input.trade_log.display())?;
    writeln!(out, "  entry_column = {}", input.entry_column)?;
    writeln!(out, "  exit_column = {}", input.exit_column)?;
    writeln!(out, "[report]")?;
    writeln!(out, "  format = {format:?}")?;
    writeln!(out, "\nConfiguration is valid.")?;
    Ok(())
}
