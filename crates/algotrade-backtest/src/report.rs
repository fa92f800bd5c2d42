//! Backtest report generation.

use serde::{Deserialize, Serialize};

use crate::simulator::BudgetSimulator;
use crate::statistics::{TradeRecord, TradeStatistics};

/// Complete report of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Strategy name
    pub strategy: String,
    /// Strategy configuration used
    pub parameters: serde_json::Value,
    pub symbol: String,
    /// Bars in the strategy output
    pub bars: usize,
    /// Non-Hold signals emitted
    pub signals: usize,
    pub initial_budget: f64,
    pub final_budget: f64,
    pub trade_pnls: Vec<f64>,
    pub trades: Vec<TradeRecord>,
    pub statistics: TradeStatistics,
}

impl BacktestReport {
    /// Build a report from the last run of `simulator`, which started from
    /// `initial_budget`.
    pub fn from_run(simulator: &BudgetSimulator, symbol: &str, initial_budget: f64) -> Self {
        let (final_budget, trade_pnls) = simulator.metrics();
        let strategy = simulator.strategy();

        Self {
            strategy: strategy.name().to_string(),
            parameters: strategy.parameters(),
            symbol: symbol.to_string(),
            bars: simulator.signals().len(),
            signals: simulator.signals().trigger_count(),
            initial_budget,
            final_budget,
            trade_pnls: trade_pnls.to_vec(),
            trades: simulator.trades().to_vec(),
            statistics: TradeStatistics::from_trades(initial_budget, simulator.trades()),
        }
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let stats = &self.statistics;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Strategy:            {}\n", self.strategy));
        s.push_str(&format!("  Symbol:              {}\n", self.symbol));
        s.push_str(&format!("  Parameters:          {}\n", self.parameters));
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Initial Budget:      ${:.2}\n", self.initial_budget));
        s.push_str(&format!("  Final Budget:        ${:.2}\n", self.final_budget));
        s.push_str(&format!("  Total Return:        {:.2}%\n", stats.total_return_pct));
        s.push_str(&format!("  Max Drawdown:        {:.2}%\n", stats.max_drawdown_pct));
        s.push_str(&format!("  Profit Factor:       {:.2}\n", stats.profit_factor));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total Trades:        {}\n", stats.total_trades));
        s.push_str(&format!("  Winning Trades:      {}\n", stats.winning_trades));
        s.push_str(&format!("  Losing Trades:       {}\n", stats.losing_trades));
        s.push_str(&format!("  Breakeven Trades:    {}\n", stats.breakeven_trades));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", stats.win_rate_pct));
        s.push_str(&format!("  Avg Win:             ${:.2}\n", stats.avg_win));
        s.push_str(&format!("  Avg Loss:            ${:.2}\n", stats.avg_loss));
        s.push_str(&format!("  Avg Bars Held:       {:.1}\n", stats.avg_bars_held));
        s.push('\n');

        s.push_str("EXECUTION\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Bars Processed:      {}\n", self.bars));
        s.push_str(&format!("  Signals Emitted:     {}\n", self.signals));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export trades to CSV.
    pub fn trades_to_csv(&self) -> String {
        let mut csv = String::from(
            "entry_timestamp,exit_timestamp,entry_close,exit_close,capital,liquidation,pnl,forced_exit\n",
        );
        for t in &self.trades {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                t.entry_timestamp,
                t.exit_timestamp,
                t.entry_close,
                t.exit_close,
                t.capital,
                t.liquidation,
                t.pnl,
                t.forced_exit
            ));
        }
        csv
    }
}
