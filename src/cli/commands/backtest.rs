//! Backtest command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use algotrade_backtest::{BacktestReport, BudgetSimulator, SimulatorConfig};
use algotrade_config::AppConfig;
use algotrade_data::CsvDataSource;
use algotrade_strategies::StrategyRegistry;
use serde_json::{Map, Value};

use crate::cli::{app_config, BacktestArgs, OutputFormat};

pub fn run(args: BacktestArgs, config_path: &Path) -> Result<()> {
    let config = app_config(config_path)?;
    let registry = StrategyRegistry::new();

    let name = match args.strategy.as_deref().or(config.strategy.name.as_deref()) {
        Some(name) => name.to_string(),
        None => bail!("No strategy selected; pass --strategy or set strategy.name"),
    };
    if !registry.exists(&name) {
        bail!(
            "Unknown strategy '{}'. Available: {}",
            name,
            registry.names().join(", ")
        );
    }
    info!("Starting backtest for strategy: {}", name);

    let params = strategy_params(&args, &config, &name, &registry)?;
    let strategy = registry
        .create(&name, params)
        .context("Failed to create strategy")?;

    let symbol = args.symbol.clone().unwrap_or_else(|| symbol_from_path(&args.data));
    let series = CsvDataSource::new(&args.data)
        .with_context(|| {
            format!(
                "Data file '{}' does not exist. Provide a CSV file with --data",
                args.data.display()
            )
        })?
        .with_fill(config.backtest.fill_value)
        .load(&symbol)
        .context("Failed to load data")?;
    info!("Loaded {} bars for {}", series.len(), symbol);

    let budget = args.budget.unwrap_or(config.backtest.initial_budget);
    let simulator_config = SimulatorConfig {
        initial_position: config.backtest.initial_position,
    };
    let mut simulator = BudgetSimulator::with_config(strategy, simulator_config);
    simulator
        .apply_strategy(&series, Some(budget))
        .context("Simulation failed")?;

    let report = BacktestReport::from_run(&simulator, &symbol, budget);

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        let is_csv = save_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let contents = if is_csv {
            report.trades_to_csv()
        } else {
            report.to_json()?
        };
        std::fs::write(save_path, contents)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}

/// Strategy configuration from the first available source, with `--param`
/// overrides applied on top.
///
/// Sources in order: `--strategy-config`, the `[strategy]` section when it
/// names the same strategy, the registry example.
fn strategy_params(
    args: &BacktestArgs,
    config: &AppConfig,
    name: &str,
    registry: &StrategyRegistry,
) -> Result<Value> {
    let base = if let Some(path) = &args.strategy_config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str::<Value>(&text)
            .with_context(|| format!("Invalid strategy configuration {}", path.display()))?
    } else if config.strategy.name.as_deref() == Some(name) {
        config.strategy.params.clone()
    } else {
        registry
            .get(name)
            .map(|info| info.example_config.clone())
            .unwrap_or_else(|| Value::Object(Map::new()))
    };

    let Value::Object(mut params) = base else {
        bail!("Strategy configuration must be a JSON object");
    };
    for param in &args.params {
        let (key, value) = parse_param(param)?;
        params.insert(key, value);
    }
    Ok(Value::Object(params))
}

/// Parse `key=value`; the value is JSON when it parses, otherwise a string.
fn parse_param(param: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = param.split_once('=') else {
        bail!("Invalid parameter '{}', expected key=value", param);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid parameter '{}', empty key", param);
    }
    let raw = raw.trim();
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn symbol_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| "DATA".to_string())
}
