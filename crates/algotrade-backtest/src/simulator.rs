//! Position/budget simulation over a strategy's signals.

use algotrade_core::error::SimulationError;
use algotrade_core::traits::Strategy;
use algotrade_core::types::{positions_from_signals, BarSeries, Position, SignalSeries};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::statistics::TradeRecord;

/// Simulator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Position assumed before the first bar when its signal is `Hold`
    pub initial_position: Position,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_position: Position::Held,
        }
    }
}

/// Result of walking one position timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Simulation {
    pub final_budget: f64,
    pub trade_pnls: Vec<f64>,
    pub trades: Vec<TradeRecord>,
}

struct OpenTrade {
    index: usize,
    close: f64,
    capital: f64,
    shares: f64,
}

/// Walk `(position, close)` pairs, committing the whole budget on each
/// `Flat -> Held` transition and liquidating on `Held -> Flat`.
///
/// A trade still open after the last pair is liquidated at the last close.
pub fn simulate(
    positions: &[Position],
    closes: &[f64],
    timestamps: &[i64],
    initial_budget: f64,
) -> Result<Simulation, SimulationError> {
    if positions.len() != closes.len() || closes.len() != timestamps.len() {
        return Err(SimulationError::MisalignedOutput {
            signals: positions.len(),
            closes: closes.len(),
        });
    }

    let mut budget = initial_budget;
    let mut open: Option<OpenTrade> = None;
    let mut sim = Simulation::default();

    let mut close_trade = |trade: OpenTrade, index: usize, forced: bool, budget: &mut f64| {
        let exit_close = closes[index];
        let liquidation = exit_close * trade.shares;
        let pnl = liquidation - trade.capital;
        debug!(
            "Trade closed at bar {}: {:.2} -> {:.2} (P&L {:.2})",
            index, trade.capital, liquidation, pnl
        );
        sim.trade_pnls.push(pnl);
        sim.trades.push(TradeRecord {
            entry_index: trade.index,
            exit_index: index,
            entry_timestamp: timestamps[trade.index],
            exit_timestamp: timestamps[index],
            entry_close: trade.close,
            exit_close,
            capital: trade.capital,
            shares: trade.shares,
            liquidation,
            pnl,
            forced_exit: forced,
        });
        *budget = liquidation;
    };

    for (i, (&position, &close)) in positions.iter().zip(closes).enumerate() {
        match (position, open.is_some()) {
            (Position::Held, false) => {
                if !(close.is_finite() && close > 0.0) {
                    return Err(SimulationError::DivisionDomain { index: i, price: close });
                }
                debug!("Trade opened at bar {}: {:.2} at close {:.4}", i, budget, close);
                open = Some(OpenTrade {
                    index: i,
                    close,
                    capital: budget,
                    shares: budget / close,
                });
                budget = 0.0;
            }
            (Position::Flat, true) => {
                if let Some(trade) = open.take() {
                    close_trade(trade, i, false, &mut budget);
                }
            }
            _ => {}
        }
    }

    if let Some(trade) = open.take() {
        close_trade(trade, closes.len() - 1, true, &mut budget);
    }

    sim.final_budget = budget;
    Ok(sim)
}

/// Runs a strategy and carries the resulting budget between runs.
///
/// The budget starts at zero unless set with [`BudgetSimulator::with_budget`]
/// or passed to [`BudgetSimulator::apply_strategy`]. A single instance must
/// not be shared between concurrent runs.
pub struct BudgetSimulator {
    strategy: Box<dyn Strategy>,
    config: SimulatorConfig,
    budget: f64,
    trade_pnls: Vec<f64>,
    trades: Vec<TradeRecord>,
    positions: Vec<Position>,
    output: SignalSeries,
}

impl BudgetSimulator {
    /// Create a simulator with a zero budget.
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Self::with_config(strategy, SimulatorConfig::default())
    }

    pub fn with_config(strategy: Box<dyn Strategy>, config: SimulatorConfig) -> Self {
        Self {
            strategy,
            config,
            budget: 0.0,
            trade_pnls: Vec::new(),
            trades: Vec::new(),
            positions: Vec::new(),
            output: SignalSeries::default(),
        }
    }

    /// Set the starting budget.
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run the strategy over `series` and simulate its trades.
    ///
    /// Starts from `initial_budget` when given, otherwise from the budget
    /// left by the previous run. On error the previous results are kept.
    pub fn apply_strategy(
        &mut self,
        series: &BarSeries,
        initial_budget: Option<f64>,
    ) -> Result<(), SimulationError> {
        let output = self.strategy.generate(series)?;
        if output.signals.len() != output.closes.len() {
            return Err(SimulationError::MisalignedOutput {
                signals: output.signals.len(),
                closes: output.closes.len(),
            });
        }

        let positions = positions_from_signals(&output.signals, self.config.initial_position);
        let budget = initial_budget.unwrap_or(self.budget);
        let sim = simulate(&positions, &output.closes, &output.timestamps, budget)?;

        info!(
            "{} on {}: {} trades, budget {:.2} -> {:.2}",
            self.strategy.name(),
            series.symbol,
            sim.trades.len(),
            budget,
            sim.final_budget
        );

        self.budget = sim.final_budget;
        self.trade_pnls = sim.trade_pnls;
        self.trades = sim.trades;
        self.positions = positions;
        self.output = output;
        Ok(())
    }

    /// Final budget and per-trade P&L of the last run.
    pub fn metrics(&self) -> (f64, &[f64]) {
        (self.budget, &self.trade_pnls)
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    /// Position timeline of the last run, aligned with [`Self::signals`].
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Strategy output of the last run.
    pub fn signals(&self) -> &SignalSeries {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algotrade_core::error::StrategyError;
    use algotrade_core::types::{Bar, Signal};

    use Position::{Flat, Held};

    /// Replays a fixed signal sequence.
    struct Scripted(Vec<Signal>);

    impl Strategy for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
            self.ensure_warmed_up(series)?;
            Ok(SignalSeries::new(
                self.0.clone(),
                series.closes(),
                series.timestamps(),
            ))
        }

        fn warmup_period(&self) -> usize {
            self.0.len()
        }

        fn parameters(&self) -> serde_json::Value {
            serde_json::Value::Null
        }
    }

    fn series(closes: &[f64]) -> BarSeries {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c, c, c, 1.0))
            .collect()
    }

    fn signals(values: &[i8]) -> Vec<Signal> {
        values
            .iter()
            .map(|&v| Signal::try_from(v).unwrap())
            .collect()
    }

    #[test]
    fn test_single_trade() {
        let sim = simulate(&[Held, Held, Flat], &[10.0, 12.0, 15.0], &[0, 1, 2], 100.0).unwrap();

        assert_eq!(sim.trade_pnls.len(), 1);
        assert!((sim.trade_pnls[0] - 50.0).abs() < 1e-10);
        assert!((sim.final_budget - 150.0).abs() < 1e-10);

        let trade = &sim.trades[0];
        assert_eq!((trade.entry_index, trade.exit_index), (0, 2));
        assert!((trade.shares - 10.0).abs() < 1e-10);
        assert!(!trade.forced_exit);
    }

    #[test]
    fn test_open_trade_force_closed() {
        let sim = simulate(&[Flat, Held, Held], &[5.0, 10.0, 8.0], &[0, 1, 2], 100.0).unwrap();

        assert!((sim.final_budget - 80.0).abs() < 1e-10);
        assert!((sim.trade_pnls[0] + 20.0).abs() < 1e-10);
        assert!(sim.trades[0].forced_exit);
        assert_eq!(sim.trades[0].exit_index, 2);
    }

    #[test]
    fn test_zero_close_is_domain_error() {
        let err = simulate(&[Flat, Held], &[5.0, 0.0], &[0, 1], 100.0).unwrap_err();
        assert!(matches!(err, SimulationError::DivisionDomain { index: 1, .. }));
    }

    #[test]
    fn test_misaligned_input() {
        let err = simulate(&[Held], &[1.0, 2.0], &[0, 1], 1.0).unwrap_err();
        assert!(matches!(err, SimulationError::MisalignedOutput { .. }));
    }

    #[test]
    fn test_apply_strategy_scenario() {
        let strategy = Scripted(signals(&[1, 0, -1]));
        let mut simulator = BudgetSimulator::new(Box::new(strategy));

        simulator
            .apply_strategy(&series(&[10.0, 12.0, 15.0]), Some(100.0))
            .unwrap();

        let (budget, pnls) = simulator.metrics();
        assert!((budget - 150.0).abs() < 1e-10);
        assert_eq!(pnls.len(), 1);
        assert_eq!(simulator.positions(), &[Held, Held, Flat]);
        assert_eq!(simulator.signals().len(), 3);
    }

    #[test]
    fn test_first_hold_defaults_to_held() {
        let strategy = Scripted(signals(&[0, 0, -1]));
        let mut simulator = BudgetSimulator::new(Box::new(strategy)).with_budget(100.0);

        simulator.apply_strategy(&series(&[10.0, 12.0, 15.0]), None).unwrap();
        assert_eq!(simulator.positions(), &[Held, Held, Flat]);
        assert!((simulator.budget() - 150.0).abs() < 1e-10);
    }

    #[test]
    fn test_initial_position_override() {
        let strategy = Scripted(signals(&[0, 0, -1]));
        let config = SimulatorConfig {
            initial_position: Flat,
        };
        let mut simulator = BudgetSimulator::with_config(Box::new(strategy), config);

        simulator.apply_strategy(&series(&[10.0, 12.0, 15.0]), Some(100.0)).unwrap();
        assert_eq!(simulator.positions(), &[Flat, Flat, Flat]);
        assert!(simulator.trades().is_empty());
        assert_eq!(simulator.budget(), 100.0);
    }

    #[test]
    fn test_budget_carries_between_runs() {
        let strategy = Scripted(signals(&[1, -1]));
        let mut simulator = BudgetSimulator::new(Box::new(strategy)).with_budget(100.0);

        simulator.apply_strategy(&series(&[10.0, 20.0]), None).unwrap();
        assert!((simulator.budget() - 200.0).abs() < 1e-10);

        simulator.apply_strategy(&series(&[10.0, 5.0]), None).unwrap();
        assert!((simulator.budget() - 100.0).abs() < 1e-10);

        simulator.apply_strategy(&series(&[10.0, 5.0]), Some(40.0)).unwrap();
        assert!((simulator.budget() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_budget_by_default() {
        let strategy = Scripted(signals(&[1, -1]));
        let mut simulator = BudgetSimulator::new(Box::new(strategy));

        simulator.apply_strategy(&series(&[10.0, 20.0]), None).unwrap();
        let (budget, pnls) = simulator.metrics();
        assert_eq!(budget, 0.0);
        assert_eq!(pnls, &[0.0]);
    }

    #[test]
    fn test_strategy_error_keeps_previous_results() {
        let strategy = Scripted(signals(&[1, -1]));
        let mut simulator = BudgetSimulator::new(Box::new(strategy)).with_budget(100.0);
        simulator.apply_strategy(&series(&[10.0, 20.0]), None).unwrap();

        let err = simulator.apply_strategy(&series(&[10.0]), None).unwrap_err();
        assert!(matches!(err, SimulationError::Strategy(_)));
        assert!((simulator.budget() - 200.0).abs() < 1e-10);
    }
}
