//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::backtest::{DEFAULT_INITIAL_BALANCE, DEFAULT_TRADE_FEE};
use crate::domain::config_validation::{
    parse_indicator_list, validate_backtest_config, validate_signal_config,
};
use crate::domain::error::SigtraderError;
use crate::domain::indicator::{bollinger, macd, rsi};
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{generate_signals, IndicatorBundle, Signal, SignalParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SYMBOL: &str = "BTC/USDT";
pub const DEFAULT_TIMEFRAME: &str = "1h";

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Indicator-vote signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over cached candles
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        timeframe: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Write the per-period result table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of trailing rows to print
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Print the most recent signals
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        timeframe: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long, default_value_t = 20)]
        tail: usize,
    },
    /// List cached symbols for a timeframe
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        timeframe: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Where candles come from, after applying command-line overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub dir: PathBuf,
    pub symbol: String,
    pub timeframe: String,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            timeframe,
            data_dir,
            output,
            tail,
        } => run_backtest(
            &config,
            symbol.as_deref(),
            timeframe.as_deref(),
            data_dir,
            output.as_ref(),
            tail,
        ),
        Command::Signals {
            config,
            symbol,
            timeframe,
            data_dir,
            tail,
        } => run_signals(
            &config,
            symbol.as_deref(),
            timeframe.as_deref(),
            data_dir,
            tail,
        ),
        Command::ListSymbols { config, timeframe } => {
            run_list_symbols(&config, timeframe.as_deref())
        }
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: &SigtraderError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, SigtraderError> {
    log::info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SigtraderError> {
    validate_backtest_config(adapter)?;
    let config = BacktestConfig {
        initial_balance: adapter.get_double("backtest", "initial_balance", DEFAULT_INITIAL_BALANCE),
        trade_fee: adapter.get_double("backtest", "trade_fee", DEFAULT_TRADE_FEE),
    };
    config.validate()?;
    Ok(config)
}

pub fn build_signal_params(adapter: &dyn ConfigPort) -> Result<SignalParams, SigtraderError> {
    validate_signal_config(adapter)?;
    let period = |key: &str, default: usize| adapter.get_int("signals", key, default as i64) as usize;

    Ok(SignalParams {
        indicators: parse_indicator_list(adapter)?,
        rsi_period: period("rsi_period", rsi::DEFAULT_PERIOD),
        macd_fast: period("macd_fast", macd::DEFAULT_FAST),
        macd_slow: period("macd_slow", macd::DEFAULT_SLOW),
        macd_signal: period("macd_signal", macd::DEFAULT_SIGNAL),
        bollinger_window: period("bollinger_window", bollinger::DEFAULT_WINDOW),
        bollinger_std: adapter.get_double("signals", "bollinger_std", bollinger::DEFAULT_NUM_STD),
    })
}

pub fn resolve_data_source(
    adapter: &dyn ConfigPort,
    symbol: Option<&str>,
    timeframe: Option<&str>,
    data_dir: Option<PathBuf>,
) -> DataSource {
    let from_config = |key: &str, default: &str| {
        adapter
            .get_string("data", key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    DataSource {
        dir: data_dir.unwrap_or_else(|| PathBuf::from(from_config("dir", DEFAULT_DATA_DIR))),
        symbol: symbol
            .map(str::to_string)
            .unwrap_or_else(|| from_config("symbol", DEFAULT_SYMBOL))
            .to_uppercase(),
        timeframe: timeframe
            .map(str::to_string)
            .unwrap_or_else(|| from_config("timeframe", DEFAULT_TIMEFRAME)),
    }
}

/// Candles → signals → backtest.
pub fn run_pipeline(
    prices: &PriceSeries,
    params: &SignalParams,
    bt_config: &BacktestConfig,
) -> Result<(Vec<Signal>, BacktestResult), SigtraderError> {
    let closes = prices.closes();
    let indicators: Vec<String> = params
        .indicator_types()
        .iter()
        .map(|t| t.to_string())
        .collect();
    log::info!(
        "generating signals over {} periods with [{}]",
        closes.len(),
        indicators.join(", ")
    );

    let signals = generate_signals(&closes, IndicatorBundle::default(), params)?;
    let result = backtest_engine::run_backtest(prices.candles(), &signals, bt_config)?;
    Ok((signals, result))
}

fn fetch_prices(data_port: &dyn DataPort, source: &DataSource) -> Result<PriceSeries, SigtraderError> {
    let prices = data_port.fetch_candles(&source.symbol, &source.timeframe)?;
    if let Some((start, end)) = prices.range() {
        log::info!(
            "{} {}: {} candles, {} to {}",
            source.symbol,
            source.timeframe,
            prices.len(),
            start,
            end
        );
    }
    Ok(prices)
}

fn run_backtest(
    config_path: &PathBuf,
    symbol: Option<&str>,
    timeframe: Option<&str>,
    data_dir: Option<PathBuf>,
    output_path: Option<&PathBuf>,
    tail: usize,
) -> ExitCode {
    // Stage 1: Load and validate config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let params = match build_signal_params(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    // Stage 2: Load candles
    let source = resolve_data_source(&adapter, symbol, timeframe, data_dir);
    let data_port = CsvAdapter::new(source.dir.clone());
    let prices = match fetch_prices(&data_port, &source) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    // Stage 3: Signals and simulation
    let result = match run_pipeline(&prices, &params, &bt_config) {
        Ok((_, r)) => r,
        Err(e) => return fail(&e),
    };

    // Stage 4: Console summary
    print_summary(&source, &result, tail);

    // Stage 5: Result table
    if let Some(path) = output_path {
        if let Err(e) = CsvReportAdapter.write(&result, &path.to_string_lossy()) {
            return fail(&e);
        }
        println!("\nResult table written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

pub fn print_summary(source: &DataSource, result: &BacktestResult, tail: usize) {
    let metrics = Metrics::compute(result);

    println!(
        "{:<20} {:>10} {:>6} {:>8} {:>16} {:>18} {:>10}",
        "datetime", "close", "signal", "position", "strategy_return", "equity", "cum_return"
    );
    let skip = result.rows.len().saturating_sub(tail);
    for row in result.rows.iter().skip(skip) {
        println!(
            "{:<20} {:>10.2} {:>6} {:>8} {:>16.6} {:>18.2} {:>10.6}",
            row.timestamp.format("%Y-%m-%d %H:%M:%S"),
            row.close,
            row.signal,
            row.position,
            row.strategy_return,
            row.equity,
            row.cumulative_return,
        );
    }

    println!("\n=== {} {} ===", source.symbol, source.timeframe);
    println!("Periods:          {}", metrics.periods);
    println!("Initial Balance:  {:.0}", result.config.initial_balance);
    println!("Final Equity:     {:.0}", metrics.final_equity);
    println!("Final Return:     {:.2}%", metrics.total_return * 100.0);
    println!("Buy & Hold:       {:.2}%", metrics.market_return * 100.0);
    println!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
    println!("Trades:           {}", metrics.total_trades);
    println!("Fees Charged:     {:.2}%", metrics.total_fees * 100.0);
    println!("Exposure:         {:.1}%", metrics.exposure * 100.0);
}

fn run_signals(
    config_path: &PathBuf,
    symbol: Option<&str>,
    timeframe: Option<&str>,
    data_dir: Option<PathBuf>,
    tail: usize,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let params = match build_signal_params(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let source = resolve_data_source(&adapter, symbol, timeframe, data_dir);
    let data_port = CsvAdapter::new(source.dir.clone());
    let prices = match fetch_prices(&data_port, &source) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let signals = match generate_signals(&prices.closes(), IndicatorBundle::default(), &params) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    let counts = |s: Signal| signals.iter().filter(|&&x| x == s).count();
    println!(
        "buy: {}, hold: {}, sell: {}",
        counts(Signal::Buy),
        counts(Signal::Hold),
        counts(Signal::Sell)
    );

    let skip = signals.len().saturating_sub(tail);
    for (candle, signal) in prices.candles().iter().zip(&signals).skip(skip) {
        println!(
            "{}  {:>12.2}  {:>2}",
            candle.timestamp.format("%Y-%m-%d %H:%M:%S"),
            candle.close,
            signal
        );
    }
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf, timeframe: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let source = resolve_data_source(&adapter, None, timeframe, None);
    let data_port = CsvAdapter::new(source.dir.clone());

    let symbols = match data_port.list_symbols(&source.timeframe) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        eprintln!(
            "No cached symbols for {} in {}",
            source.timeframe,
            source.dir.display()
        );
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let params = match build_signal_params(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let source = resolve_data_source(&adapter, None, None, None);

    println!("Backtest:");
    println!("  initial_balance: {}", bt_config.initial_balance);
    println!("  trade_fee:       {}", bt_config.trade_fee);
    println!("\nIndicators:");
    for indicator in params.indicator_types() {
        println!("  {}", indicator);
    }
    println!("\nData:");
    println!("  {} {} from {}", source.symbol, source.timeframe, source.dir.display());
    println!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
