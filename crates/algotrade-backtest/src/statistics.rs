//! Trade records and summary statistics.

use serde::{Deserialize, Serialize};

/// Record of a single completed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Index into the strategy output where capital was committed
    pub entry_index: usize,
    /// Index where the position was liquidated
    pub exit_index: usize,
    pub entry_timestamp: i64,
    pub exit_timestamp: i64,
    pub entry_close: f64,
    pub exit_close: f64,
    /// Budget committed at entry
    pub capital: f64,
    /// Units of the asset bought with `capital`
    pub shares: f64,
    /// Value of `shares` at the exit close
    pub liquidation: f64,
    pub pnl: f64,
    /// Closed because the series ended while holding
    pub forced_exit: bool,
}

impl TradeRecord {
    /// Return on the committed capital in percent; zero for an empty trade.
    pub fn return_pct(&self) -> f64 {
        if self.capital > 0.0 {
            self.pnl / self.capital * 100.0
        } else {
            0.0
        }
    }

    /// Bars between entry and exit.
    pub fn bars_held(&self) -> usize {
        self.exit_index - self.entry_index
    }
}

/// Summary statistics over the trades of one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStatistics {
    /// Budget before the first trade
    pub initial_budget: f64,
    /// Budget after the last trade
    pub final_budget: f64,
    /// Total return percentage
    pub total_return_pct: f64,
    /// Sum of all trade P&L
    pub total_pnl: f64,
    /// Total number of trades
    pub total_trades: usize,
    /// Number of winning trades
    pub winning_trades: usize,
    /// Number of losing trades
    pub losing_trades: usize,
    /// Trades that returned exactly their capital
    pub breakeven_trades: usize,
    /// Win rate percentage
    pub win_rate_pct: f64,
    /// Average profit per winning trade
    pub avg_win: f64,
    /// Average loss per losing trade (positive)
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    /// Profit factor (gross profit / gross loss); zero without losses
    pub profit_factor: f64,
    /// Maximum drawdown percentage of the budget sampled at each trade close
    pub max_drawdown_pct: f64,
    /// Mean bars between entry and exit
    pub avg_bars_held: f64,
}

impl TradeStatistics {
    /// Compute statistics for trades run from `initial_budget`.
    pub fn from_trades(initial_budget: f64, trades: &[TradeRecord]) -> Self {
        let mut stats = Self {
            initial_budget,
            final_budget: initial_budget,
            total_trades: trades.len(),
            ..Default::default()
        };

        let mut gross_profit = 0.0;
        let mut gross_loss = 0.0;
        let mut budget = initial_budget;
        let mut peak = initial_budget;

        for trade in trades {
            if trade.pnl > 0.0 {
                stats.winning_trades += 1;
                gross_profit += trade.pnl;
                stats.largest_win = stats.largest_win.max(trade.pnl);
            } else if trade.pnl < 0.0 {
                stats.losing_trades += 1;
                gross_loss += trade.pnl.abs();
                stats.largest_loss = stats.largest_loss.max(trade.pnl.abs());
            } else {
                stats.breakeven_trades += 1;
            }

            budget += trade.pnl;
            peak = peak.max(budget);
            if peak > 0.0 {
                let drawdown = (peak - budget) / peak * 100.0;
                stats.max_drawdown_pct = stats.max_drawdown_pct.max(drawdown);
            }
        }

        stats.total_pnl = gross_profit - gross_loss;
        stats.final_budget = budget;

        if initial_budget > 0.0 {
            stats.total_return_pct = (budget - initial_budget) / initial_budget * 100.0;
        }

        // Win rate
        if stats.total_trades > 0 {
            stats.win_rate_pct = stats.winning_trades as f64 * 100.0 / stats.total_trades as f64;
            let held: usize = trades.iter().map(TradeRecord::bars_held).sum();
            stats.avg_bars_held = held as f64 / stats.total_trades as f64;
        }

        // Average win/loss
        if stats.winning_trades > 0 {
            stats.avg_win = gross_profit / stats.winning_trades as f64;
        }
        if stats.losing_trades > 0 {
            stats.avg_loss = gross_loss / stats.losing_trades as f64;
        }

        // Profit factor
        if gross_loss > 0.0 {
            stats.profit_factor = gross_profit / gross_loss;
        }

        stats
    }
}
