//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::jsonl_run_log::JsonlRunLog;
use crate::domain::config_validation::validate_advisor_config;
use crate::domain::decision::DecisionPolicy;
use crate::domain::engine::{run_analysis, AdvisorPolicy};
use crate::domain::error::AdvisorError;
use crate::domain::features::FeatureParams;
use crate::domain::period::Period;
use crate::domain::risk::RiskPolicy;
use crate::domain::signal::SignalPolicy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::run_log_port::{AnalysisRecord, RunLogPort};

#[derive(Parser, Debug)]
#[command(name = "stockadvisor", about = "Rule-based stock analysis advisor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a ticker and print the trading recommendation as JSON
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticker: String,
        /// Lookback period, e.g. 5d, 6mo, 1y, max
        #[arg(short, long)]
        period: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List tickers available in the configured data directory
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the available data range for a ticker
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticker: String,
    },
    /// Validate configuration without running an analysis
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the HTTP API server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            ticker,
            period,
            output,
        } => run_analyze(&config, &ticker, period.as_deref(), output.as_ref()),
        Command::ListTickers { config } => run_list_tickers(&config),
        Command::Info { config, ticker } => run_info(&config, &ticker),
        Command::Validate { config } => run_validate(&config),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Rolling-window lengths from `[analysis]`, assuming validated config.
pub fn build_feature_params(config: &dyn ConfigPort) -> FeatureParams {
    let defaults = FeatureParams::default();
    FeatureParams {
        sma_short: config.get_int("analysis", "sma_short", defaults.sma_short as i64) as usize,
        sma_long: config.get_int("analysis", "sma_long", defaults.sma_long as i64) as usize,
        volatility_window: config.get_int(
            "analysis",
            "volatility_window",
            defaults.volatility_window as i64,
        ) as usize,
    }
}

/// Classifier and aggregation tunables from `[signal]`, `[risk]` and
/// `[decision]`, assuming validated config.
pub fn build_advisor_policy(config: &dyn ConfigPort) -> AdvisorPolicy {
    let signal_defaults = SignalPolicy::default();
    let risk_defaults = RiskPolicy::default();

    AdvisorPolicy {
        signal: SignalPolicy {
            base_confidence: config.get_double(
                "signal",
                "base_confidence",
                signal_defaults.base_confidence,
            ),
            confidence_cap: config.get_double(
                "signal",
                "confidence_cap",
                signal_defaults.confidence_cap,
            ),
            neutral_confidence: config.get_double(
                "signal",
                "neutral_confidence",
                signal_defaults.neutral_confidence,
            ),
        },
        risk: RiskPolicy {
            volatility_ceiling: config.get_double(
                "risk",
                "volatility_ceiling",
                risk_defaults.volatility_ceiling,
            ),
            low_threshold: config.get_double("risk", "low_threshold", risk_defaults.low_threshold),
            high_threshold: config.get_double(
                "risk",
                "high_threshold",
                risk_defaults.high_threshold,
            ),
        },
        decision: DecisionPolicy::default_table(
            config.get_double("decision", "trend_factor", 1.1),
            config.get_double("decision", "confidence_cap", 0.95),
            config.get_double("decision", "hold_floor", 0.4),
            config.get_double("decision", "fallback_confidence", 0.5),
        ),
    }
}

/// CLI flag wins over `[analysis] default_period`; `1y` otherwise.
pub fn resolve_period(
    override_period: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Period, AdvisorError> {
    match override_period {
        Some(raw) => raw.parse(),
        None => config
            .get_string("analysis", "default_period")
            .as_deref()
            .unwrap_or("1y")
            .parse(),
    }
}

pub fn build_run_log(config: &dyn ConfigPort) -> Option<JsonlRunLog> {
    config
        .get_string("runlog", "path")
        .map(|path| JsonlRunLog::new(PathBuf::from(path)))
}

fn build_data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, AdvisorError> {
    let csv_dir = config
        .get_string("data", "csv_dir")
        .ok_or_else(|| AdvisorError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(csv_dir)))
}

fn run_analyze(
    config_path: &PathBuf,
    ticker: &str,
    period_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_advisor_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Resolve analysis inputs
    let params = build_feature_params(&config);
    let policy = build_advisor_policy(&config);
    let period = match resolve_period(period_override, &config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        eprintln!("error: ticker must not be empty");
        return ExitCode::from(2);
    }

    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Run the pipeline
    eprintln!("Analyzing {ticker} over {period}");
    let end_date = chrono::Utc::now().date_naive();
    let analysis = match run_analysis(&data_port, &ticker, period, end_date, &params, &policy) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Record the run when a log is configured
    if let Some(run_log) = build_run_log(&config) {
        let record = AnalysisRecord {
            timestamp: chrono::Utc::now(),
            ticker: ticker.clone(),
            period: period.to_string(),
            snapshot: analysis.snapshot,
            decision: analysis.decision.clone(),
        };
        if let Err(e) = run_log.record(&record) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    // Stage 5: Emit the decision
    let json = match serde_json::to_string_pretty(&analysis.decision) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: failed to serialize decision: {e}");
            return ExitCode::from(1);
        }
    };

    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, format!("{json}\n")) {
            eprintln!("error: failed to write {}: {e}", path.display());
            return ExitCode::from(1);
        }
        eprintln!("Decision written to {}", path.display());
    } else {
        println!("{json}");
    }

    eprintln!(
        "{}: {} (confidence {:.2})",
        ticker, analysis.decision.action, analysis.decision.confidence
    );
    ExitCode::SUCCESS
}

fn run_list_tickers(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.list_tickers() {
        Ok(tickers) => {
            for ticker in tickers {
                println!("{ticker}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf, ticker: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let ticker = ticker.trim().to_uppercase();
    match data_port.data_range(&ticker) {
        Ok(Some((first, last, bars))) => {
            println!("{ticker}: {bars} bars from {first} to {last}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            let e = AdvisorError::NoData { ticker };
            eprintln!("error: {e}");
            (&e).into()
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match validate_advisor_config(&config) {
        Ok(()) => {
            eprintln!("Configuration OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use std::net::SocketAddr;
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };
        if let Err(e) = validate_advisor_config(&config) {
            eprintln!("error: {e}");
            return (&e).into();
        }

        let data_port = match build_data_port(&config) {
            Ok(p) => Arc::new(p) as Arc<dyn DataPort + Send + Sync>,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let default_period = match resolve_period(None, &config) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let addr: SocketAddr = config
            .get_string("server", "bind")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:8080".parse().unwrap());

        let state = AppState {
            data_port,
            policy: build_advisor_policy(&config),
            params: build_feature_params(&config),
            default_period,
            run_log: build_run_log(&config)
                .map(|log| Arc::new(log) as Arc<dyn RunLogPort + Send + Sync>),
        };

        eprintln!("Starting API server on {addr}");
        let router = build_router(state);

        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async {
                let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
                axum::serve(listener, router).await.unwrap();
            });

        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
