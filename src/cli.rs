//! CLI definition and dispatch.

use chrono::{Duration, Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::price_cache::CachedPricePort;
use crate::domain::backtest::{run_backtest, BacktestParams, BacktestResult};
use crate::domain::config_validation::{
    read_backtest_params, read_date_range, read_symbol, read_threshold, validate_backtest_config,
    validate_strategy_config, ThresholdSetting,
};
use crate::domain::error::HorizonError;
use crate::domain::price::PriceBar;
use crate::domain::price_stats::PriceStats;
use crate::domain::strategy::StrategyKind;
use crate::domain::sweep::{best_by_total_pnl, run_sweep, SweepGrid, SweepOutcome};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "horizon", version, about = "Fixed-horizon strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Command-line replacements for `[backtest]` values.
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    #[arg(long)]
    pub symbol: Option<String>,
    /// Start date, YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// End date, YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
        #[arg(long)]
        hold_days: Option<usize>,
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
        /// Validate and print the resolved settings without running
        #[arg(long)]
        dry_run: bool,
    },
    /// Run many parameter sets against the same prices in parallel
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
        /// Holding periods to try, e.g. 1,5,10
        #[arg(long, value_delimiter = ',')]
        hold_days: Vec<usize>,
        /// Fast SMA periods (sma strategies only)
        #[arg(long, value_delimiter = ',')]
        fast: Vec<usize>,
        /// Slow SMA periods (sma strategies only)
        #[arg(long, value_delimiter = ',')]
        slow: Vec<usize>,
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },
    /// Print price statistics and a suggested breakout threshold
    Peek {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available from the configured data source
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the stored data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Load a CSV price file into the SQLite store
    Ingest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        csv: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    fn extension(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            output,
            overrides,
            hold_days,
            format,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, &overrides, hold_days)
            } else {
                run_backtest_command(&config, output.as_deref(), &overrides, hold_days, format)
            }
        }
        Command::Sweep {
            config,
            output,
            overrides,
            hold_days,
            fast,
            slow,
            format,
        } => {
            let grid = SweepGrid {
                hold_days,
                fast,
                slow,
            };
            run_sweep_command(&config, output.as_deref(), &overrides, &grid, format)
        }
        Command::Peek { config, overrides } => run_peek(&config, &overrides),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::Ingest {
            config,
            symbol,
            csv,
        } => run_ingest(&config, &symbol, &csv),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(hint) = error_hint(&e) {
                eprintln!("{hint}");
            }
            (&e).into()
        }
    }
}

/// Follow-up advice printed under an error message.
pub fn error_hint(err: &HorizonError) -> Option<&'static str> {
    if err.is_configuration() {
        Some("hint: check the file with `horizon validate -c <config>`")
    } else if matches!(err, HorizonError::NoData { .. }) {
        Some("hint: `horizon list-symbols -c <config>` shows the available symbols")
    } else {
        None
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, HorizonError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn apply_overrides(adapter: &mut FileConfigAdapter, overrides: &Overrides) {
    if let Some(symbol) = &overrides.symbol {
        adapter.set("backtest", "symbol", symbol.as_str());
    }
    if let Some(start) = &overrides.start {
        adapter.set("backtest", "start_date", start.as_str());
    }
    if let Some(end) = &overrides.end {
        adapter.set("backtest", "end_date", end.as_str());
    }
}

fn load_with_overrides(
    path: &Path,
    overrides: &Overrides,
    hold_days: Option<usize>,
) -> Result<FileConfigAdapter, HorizonError> {
    let mut adapter = load_config(path)?;
    apply_overrides(&mut adapter, overrides);
    if let Some(hold) = hold_days {
        adapter.set("backtest", "hold_days", hold.to_string());
    }
    Ok(adapter)
}

/// Clamps `end` to the day before `today` (today's bar may be partial) and
/// `start` to at most `end`. The flag reports whether anything changed.
pub fn clamp_date_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate, bool) {
    let yesterday = today.checked_sub_signed(Duration::days(1)).unwrap_or(today);
    let clamped_end = end.min(yesterday);
    let clamped_start = start.min(clamped_end);
    let changed = clamped_start != start || clamped_end != end;
    (clamped_start, clamped_end, changed)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The configured price source behind a TTL cache.
pub fn open_price_port(
    config: &dyn ConfigPort,
) -> Result<CachedPricePort<Box<dyn PricePort>>, HorizonError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string())
        .to_lowercase();

    let inner: Box<dyn PricePort> = match source.as_str() {
        "csv" => Box::new(CsvAdapter::from_config(config)?),
        "sqlite" => open_sqlite(config)?,
        other => {
            return Err(HorizonError::ConfigInvalid {
                section: "data".into(),
                key: "source".into(),
                reason: format!("unknown source '{other}' (expected csv | sqlite)"),
            })
        }
    };
    info!("price source: {source}");
    Ok(CachedPricePort::from_config(inner, config))
}

#[cfg(feature = "sqlite")]
fn open_sqlite(config: &dyn ConfigPort) -> Result<Box<dyn PricePort>, HorizonError> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;
    Ok(Box::new(SqliteAdapter::from_config(config)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_config: &dyn ConfigPort) -> Result<Box<dyn PricePort>, HorizonError> {
    Err(HorizonError::ConfigInvalid {
        section: "data".into(),
        key: "source".into(),
        reason: "built without the sqlite feature".into(),
    })
}

/// Report format from the flag, else `[report] format`, else JSON.
pub fn report_format(
    config: &dyn ConfigPort,
    flag: Option<ReportFormat>,
) -> Result<ReportFormat, HorizonError> {
    if let Some(format) = flag {
        return Ok(format);
    }
    match config.get_string("report", "format") {
        None => Ok(ReportFormat::Json),
        Some(raw) => ReportFormat::from_str(raw.trim(), true).map_err(|_| {
            HorizonError::ConfigInvalid {
                section: "report".into(),
                key: "format".into(),
                reason: format!("unknown format '{raw}' (expected json | csv)"),
            }
        }),
    }
}

pub fn report_adapter(format: ReportFormat) -> Box<dyn ReportPort> {
    match format {
        ReportFormat::Json => Box::new(JsonReportAdapter::new()),
        ReportFormat::Csv => Box::new(CsvReportAdapter::new()),
    }
}

/// Everything a run needs once configuration and prices are loaded.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub bars: Vec<PriceBar>,
    pub params: BacktestParams,
}

pub fn prepare_run(
    port: &dyn PricePort,
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<PreparedRun, HorizonError> {
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;

    let symbol = read_symbol(config)?;
    let (bars, start, end) = fetch_clamped(port, config, &symbol, today)?;
    let params = read_backtest_params(config, &bars)?;

    Ok(PreparedRun {
        symbol,
        start,
        end,
        bars,
        params,
    })
}

fn fetch_clamped(
    port: &dyn PricePort,
    config: &dyn ConfigPort,
    symbol: &str,
    today: NaiveDate,
) -> Result<(Vec<PriceBar>, NaiveDate, NaiveDate), HorizonError> {
    let (start, end) = read_date_range(config)?;
    let (start, end, clamped) = clamp_date_range(start, end, today);
    if clamped {
        eprintln!("Date range clamped to {start} .. {end}");
    }

    let bars = port.fetch_prices(symbol, start, end)?;
    if bars.is_empty() {
        return Err(HorizonError::NoData {
            symbol: symbol.to_string(),
        });
    }
    eprintln!("Loaded {} bars for {} ({} to {})", bars.len(), symbol, start, end);
    Ok((bars, start, end))
}

pub fn run_backtest_pipeline(
    port: &dyn PricePort,
    config: &dyn ConfigPort,
    report: &dyn ReportPort,
    output_path: &Path,
    today: NaiveDate,
) -> Result<(PreparedRun, BacktestResult), HorizonError> {
    let run = prepare_run(port, config, today)?;

    eprintln!(
        "Running {} on {}: hold {} bars, {}, {} signals",
        run.params.strategy,
        run.symbol,
        run.params.hold_days,
        run.params.position_mode,
        run.params.signal_mode
    );
    let result = run_backtest(&run.bars, &run.params)?;
    print_summary(&run, &result);

    report.write(&run.symbol, &run.params, &result, &output_path.to_string_lossy())?;
    eprintln!("\nReport written to: {}", output_path.display());
    Ok((run, result))
}

pub fn run_sweep_pipeline(
    port: &dyn PricePort,
    config: &dyn ConfigPort,
    grid: &SweepGrid,
    report: &dyn ReportPort,
    output_path: &Path,
    today: NaiveDate,
) -> Result<Vec<SweepOutcome>, HorizonError> {
    let run = prepare_run(port, config, today)?;
    let param_sets = grid.generate(&run.params);
    eprintln!(
        "Sweeping {} parameter sets on {} ({} bars)",
        param_sets.len(),
        run.symbol,
        run.bars.len()
    );

    let outcomes = run_sweep(&run.bars, &param_sets);
    print_sweep_summary(&outcomes);

    report.write_sweep(&run.symbol, &outcomes, &output_path.to_string_lossy())?;
    eprintln!("\nReport written to: {}", output_path.display());
    Ok(outcomes)
}

pub fn print_summary(run: &PreparedRun, result: &BacktestResult) {
    let m = &result.metrics;
    eprintln!("\n=== {} {} ===", run.symbol, run.params.strategy);
    eprintln!("Period:           {} to {} ({} bars)", run.start, run.end, run.bars.len());
    eprintln!(
        "Signals:          {} ({} kept, {:.1}%)",
        m.signals_total,
        m.signals_kept,
        m.signal_keep_rate() * 100.0
    );
    eprintln!("Trades:           {}", m.trade_count);
    eprintln!("Total P&L:        {:.2}", m.total_pnl);
    eprintln!("Win Rate:         {:.1}%", m.win_rate * 100.0);
    eprintln!("Avg Trade Return: {:.2}%", m.avg_trade_return * 100.0);
    eprintln!("Max Drawdown:     {:.1}%", m.max_drawdown * 100.0);
    eprintln!("Total Return:     {:.2}%", m.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", m.annualized_return * 100.0);
    eprintln!("Final Equity:     {:.2}", m.final_equity);
}

fn print_sweep_summary(outcomes: &[SweepOutcome]) {
    eprintln!("\n=== Sweep Results ===");
    for outcome in outcomes {
        match &outcome.result {
            Ok(r) => eprintln!(
                "  {} hold {}:  {} trades, {:.1}% win rate, pnl {:.2}",
                outcome.params.strategy,
                outcome.params.hold_days,
                r.metrics.trade_count,
                r.metrics.win_rate * 100.0,
                r.metrics.total_pnl
            ),
            Err(e) => eprintln!(
                "  {} hold {}:  failed: {}",
                outcome.params.strategy, outcome.params.hold_days, e
            ),
        }
    }
    if let Some(best) = best_by_total_pnl(outcomes) {
        let params = &outcomes[best].params;
        eprintln!("Best: {} hold {}", params.strategy, params.hold_days);
    }
}

fn output_or_default(output: Option<&Path>, stem: &str, format: ReportFormat) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{stem}.{}", format.extension())))
}

fn run_backtest_command(
    config_path: &Path,
    output: Option<&Path>,
    overrides: &Overrides,
    hold_days: Option<usize>,
    format: Option<ReportFormat>,
) -> Result<(), HorizonError> {
    let config = load_with_overrides(config_path, overrides, hold_days)?;
    let format = report_format(&config, format)?;
    let port = open_price_port(&config)?;
    let output = output_or_default(output, "report", format);

    let (run, result) = run_backtest_pipeline(
        &port,
        &config,
        report_adapter(format).as_ref(),
        &output,
        today(),
    )?;
    record_run(&config, &run, &result);
    Ok(())
}

#[cfg(feature = "sqlite")]
fn record_run(config: &dyn ConfigPort, run: &PreparedRun, result: &BacktestResult) {
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    if config.get_string("sqlite", "path").is_none()
        || !config.get_bool("sqlite", "record_runs", true)
    {
        return;
    }
    match SqliteAdapter::from_config(config)
        .and_then(|db| db.record_backtest(&run.symbol, run.start, run.end, &run.params, result))
    {
        Ok(id) => info!("recorded backtest run {id}"),
        Err(e) => log::warn!("failed to record backtest run: {e}"),
    }
}

#[cfg(not(feature = "sqlite"))]
fn record_run(_config: &dyn ConfigPort, _run: &PreparedRun, _result: &BacktestResult) {}

fn run_sweep_command(
    config_path: &Path,
    output: Option<&Path>,
    overrides: &Overrides,
    grid: &SweepGrid,
    format: Option<ReportFormat>,
) -> Result<(), HorizonError> {
    let config = load_with_overrides(config_path, overrides, None)?;
    let format = report_format(&config, format)?;
    let port = open_price_port(&config)?;
    let output = output_or_default(output, "sweep", format);

    run_sweep_pipeline(
        &port,
        &config,
        grid,
        report_adapter(format).as_ref(),
        &output,
        today(),
    )?;
    Ok(())
}

pub fn run_dry_run(
    config_path: &Path,
    overrides: &Overrides,
    hold_days: Option<usize>,
) -> Result<(), HorizonError> {
    let config = load_with_overrides(config_path, overrides, hold_days)?;
    validate_backtest_config(&config)?;
    validate_strategy_config(&config)?;
    eprintln!("Config validated successfully");

    let (start, end) = read_date_range(&config)?;
    let (start, end, clamped) = clamp_date_range(start, end, today());
    eprintln!("\nBacktest:");
    eprintln!("  symbol: {}", read_symbol(&config)?);
    eprintln!(
        "  range:  {} to {}{}",
        start,
        end,
        if clamped { " (clamped)" } else { "" }
    );
    describe_strategy(&config)?;

    eprintln!("\nDry run complete: configuration is valid");
    Ok(())
}

fn describe_strategy(config: &dyn ConfigPort) -> Result<(), HorizonError> {
    let kind = config.get_string("strategy", "kind").unwrap_or_default();
    eprintln!("\nStrategy:");
    eprintln!("  kind:        {kind}");
    if kind.parse::<StrategyKind>() == Ok(StrategyKind::Breakout)
        && read_threshold(config)? == ThresholdSetting::Auto
    {
        eprintln!("  threshold:   auto (75th percentile of closes)");
    }
    for key in [
        "signal_mode",
        "threshold",
        "fast",
        "slow",
        "lookback",
        "k_sigma",
        "method",
        "drop_pct",
    ] {
        if let Some(value) = config.get_string("strategy", key) {
            eprintln!("  {key:<12} {value}");
        }
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), HorizonError> {
    let config = load_config(config_path)?;
    validate_backtest_config(&config)?;
    validate_strategy_config(&config)?;
    describe_strategy(&config)?;
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_peek(config_path: &Path, overrides: &Overrides) -> Result<(), HorizonError> {
    let config = load_with_overrides(config_path, overrides, None)?;
    let symbol = read_symbol(&config)?;
    let port = open_price_port(&config)?;
    let (bars, start, end) = fetch_clamped(&port, &config, &symbol, today())?;

    let stats = PriceStats::compute(&bars).ok_or_else(|| HorizonError::NoData {
        symbol: symbol.clone(),
    })?;
    let doc = serde_json::json!({
        "symbol": symbol,
        "start": start,
        "end": end,
        "stats": stats,
    });
    let encoded = serde_json::to_string_pretty(&doc).map_err(|e| HorizonError::Report {
        reason: e.to_string(),
    })?;
    println!("{encoded}");
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), HorizonError> {
    let config = load_config(config_path)?;
    let port = open_price_port(&config)?;

    let symbols = port.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> Result<(), HorizonError> {
    let config = load_config(config_path)?;
    let symbol = match symbol {
        Some(s) => s.to_uppercase(),
        None => read_symbol(&config)?,
    };
    let port = open_price_port(&config)?;

    match port.get_data_range(&symbol)? {
        Some((min_date, max_date, count)) => {
            println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
            Ok(())
        }
        None => Err(HorizonError::NoData { symbol }),
    }
}

#[cfg(feature = "sqlite")]
fn run_ingest(config_path: &Path, symbol: &str, csv_path: &Path) -> Result<(), HorizonError> {
    use crate::adapters::csv_adapter::read_price_file;
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let config = load_config(config_path)?;
    let store = SqliteAdapter::from_config(&config)?;

    let bars = read_price_file(csv_path)?;
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return Err(HorizonError::NoData {
            symbol: symbol.to_uppercase(),
        });
    };
    let (first, last) = (first.date, last.date);

    let upserted = store.upsert_prices(symbol, &bars, "csv")?;
    store.record_coverage(symbol, first, last)?;
    println!(
        "{}",
        serde_json::json!({ "ok": true, "rows": bars.len(), "upserted": upserted, "source": "csv" })
    );
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
fn run_ingest(_config_path: &Path, _symbol: &str, _csv_path: &Path) -> Result<(), HorizonError> {
    Err(HorizonError::ConfigInvalid {
        section: "data".into(),
        key: "source".into(),
        reason: "ingest requires the sqlite feature".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn clamp_leaves_past_ranges_alone() {
        let (s, e, changed) = clamp_date_range(d(2020, 1, 1), d(2020, 6, 30), d(2024, 5, 10));
        assert_eq!((s, e, changed), (d(2020, 1, 1), d(2020, 6, 30), false));
    }

    #[test]
    fn clamp_moves_end_to_yesterday() {
        let (s, e, changed) = clamp_date_range(d(2024, 1, 1), d(2024, 12, 31), d(2024, 5, 10));
        assert_eq!((s, e, changed), (d(2024, 1, 1), d(2024, 5, 9), true));
    }

    #[test]
    fn clamp_pulls_start_back_to_end() {
        let (s, e, changed) = clamp_date_range(d(2024, 6, 1), d(2024, 6, 30), d(2024, 5, 10));
        assert_eq!((s, e, changed), (d(2024, 5, 9), d(2024, 5, 9), true));
    }

    #[test]
    fn cli_parses_sweep_lists() {
        let cli = Cli::try_parse_from([
            "horizon", "sweep", "-c", "cfg.ini", "--hold-days", "1,5,10", "--fast", "5,10",
        ])
        .unwrap();
        match cli.command {
            Command::Sweep {
                hold_days, fast, slow, ..
            } => {
                assert_eq!(hold_days, vec![1, 5, 10]);
                assert_eq!(fast, vec![5, 10]);
                assert!(slow.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parses_backtest_overrides() {
        let cli = Cli::try_parse_from([
            "horizon", "backtest", "-c", "cfg.ini", "--symbol", "qqq", "--hold-days", "3",
            "--format", "csv",
        ])
        .unwrap();
        match cli.command {
            Command::Backtest {
                overrides,
                hold_days,
                format,
                dry_run,
                ..
            } => {
                assert_eq!(overrides.symbol.as_deref(), Some("qqq"));
                assert_eq!(hold_days, Some(3));
                assert_eq!(format, Some(ReportFormat::Csv));
                assert!(!dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn report_format_resolution() {
        let config = FileConfigAdapter::from_string("[report]\nformat = CSV\n").unwrap();
        assert_eq!(report_format(&config, None).unwrap(), ReportFormat::Csv);
        assert_eq!(
            report_format(&config, Some(ReportFormat::Json)).unwrap(),
            ReportFormat::Json
        );

        let empty = FileConfigAdapter::from_string("[report]\n").unwrap();
        assert_eq!(report_format(&empty, None).unwrap(), ReportFormat::Json);

        let bad = FileConfigAdapter::from_string("[report]\nformat = pdf\n").unwrap();
        assert!(matches!(
            report_format(&bad, None),
            Err(HorizonError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn hints_follow_error_class() {
        let config_error = HorizonError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        };
        assert!(error_hint(&config_error).unwrap().contains("validate"));
        assert!(error_hint(&HorizonError::invalid_parameter("slow", "too small")).is_some());
        assert!(error_hint(&HorizonError::NoData { symbol: "SPY".into() })
            .unwrap()
            .contains("list-symbols"));
        assert_eq!(
            error_hint(&HorizonError::Report {
                reason: "disk full".into()
            }),
            None
        );
    }

    #[test]
    fn unknown_source_rejected() {
        let config = FileConfigAdapter::from_string("[data]\nsource = parquet\n").unwrap();
        assert!(matches!(
            open_price_port(&config),
            Err(HorizonError::ConfigInvalid { key, .. }) if key == "source"
        ));
    }
}
