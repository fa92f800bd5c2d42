//! Position/budget simulation, trade statistics and reports.

mod report;
mod simulator;
mod statistics;

pub use report::BacktestReport;
pub use simulator::{simulate, BudgetSimulator, Simulation, SimulatorConfig};
pub use statistics::{TradeRecord, TradeStatistics};
