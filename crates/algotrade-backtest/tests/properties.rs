//! Property tests over every registered strategy and the budget simulator.

use algotrade_backtest::{simulate, BudgetSimulator};
use algotrade_core::types::{positions_from_signals, Bar, BarSeries, Position, Signal};
use algotrade_strategies::StrategyRegistry;
use proptest::prelude::*;

/// Random walk with a strictly non-zero relative move every bar, so no
/// indicator window is ever flat.
fn bar_series() -> impl Strategy<Value = BarSeries> {
    (80usize..160).prop_flat_map(|n| {
        (
            prop::collection::vec((0.001f64..0.03, any::<bool>()), n),
            prop::collection::vec(0.1f64..2.0, n),
        )
            .prop_map(|(moves, spreads)| {
                let mut close = 100.0;
                moves
                    .iter()
                    .zip(&spreads)
                    .enumerate()
                    .map(|(i, (&(size, up), spread))| {
                        let open = close;
                        close *= if up { 1.0 + size } else { 1.0 - size };
                        Bar::new(
                            i as i64 * 86_400,
                            open,
                            open.max(close) + spread,
                            open.min(close) - spread,
                            close,
                            1_000.0,
                        )
                    })
                    .collect::<BarSeries>()
            })
    })
}

fn signal() -> impl Strategy<Value = Signal> {
    prop_oneof![Just(Signal::Sell), Just(Signal::Hold), Just(Signal::Buy)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn strategy_output_is_aligned(series in bar_series()) {
        let registry = StrategyRegistry::new();
        for name in registry.names() {
            let strategy = registry.create_example(name).unwrap();
            let output = strategy.generate(&series);
            prop_assert!(output.is_ok(), "{} failed: {:?}", name, output.as_ref().err());
            let output = output.unwrap();

            // Strategies may drop leading bars; the output covers the tail
            let closes = series.closes();
            let timestamps = series.timestamps();
            prop_assert_eq!(output.signals.len(), output.closes.len());
            prop_assert_eq!(output.timestamps.len(), output.closes.len());
            prop_assert!(output.closes.len() <= closes.len());
            prop_assert!(closes.ends_with(&output.closes), "{} closes are not a suffix", name);
            prop_assert!(timestamps.ends_with(&output.timestamps));
        }
    }

    #[test]
    fn triggers_alternate_direction(series in bar_series()) {
        let registry = StrategyRegistry::new();
        for name in registry.names() {
            let output = registry.create_example(name).unwrap().generate(&series).unwrap();
            let triggers: Vec<Signal> = output
                .signals
                .iter()
                .copied()
                .filter(|s| s.is_trigger())
                .collect();

            for pair in triggers.windows(2) {
                prop_assert_ne!(pair[0], pair[1], "{} repeated a direction", name);
            }
        }
    }

    #[test]
    fn generation_is_deterministic(series in bar_series()) {
        let registry = StrategyRegistry::new();
        for name in registry.names() {
            let strategy = registry.create_example(name).unwrap();
            let first = strategy.generate(&series).unwrap();
            let second = strategy.generate(&series).unwrap();
            prop_assert_eq!(first.signals, second.signals);
        }
    }

    #[test]
    fn positions_change_only_on_triggers(
        signals in prop::collection::vec(signal(), 1..100),
        held in any::<bool>(),
    ) {
        let initial = if held { Position::Held } else { Position::Flat };
        let positions = positions_from_signals(&signals, initial);

        prop_assert_eq!(positions.len(), signals.len());
        for (i, (&signal, &position)) in signals.iter().zip(&positions).enumerate() {
            match signal {
                Signal::Buy => prop_assert_eq!(position, Position::Held),
                Signal::Sell => prop_assert_eq!(position, Position::Flat),
                Signal::Hold if i > 0 => prop_assert_eq!(position, positions[i - 1]),
                Signal::Hold => prop_assert_eq!(position, initial),
            }
        }
    }

    #[test]
    fn budget_equals_initial_plus_trade_pnl(
        signals in prop::collection::vec(signal(), 1..100),
        closes_seed in prop::collection::vec(1.0f64..500.0, 100),
        budget in 1.0f64..1_000_000.0,
    ) {
        let closes = &closes_seed[..signals.len()];
        let timestamps: Vec<i64> = (0..signals.len() as i64).collect();
        let positions = positions_from_signals(&signals, Position::Held);

        let sim = simulate(&positions, closes, &timestamps, budget).unwrap();
        let total: f64 = sim.trade_pnls.iter().sum();

        prop_assert!((sim.final_budget - (budget + total)).abs() <= 1e-6 * sim.final_budget.max(budget));
        prop_assert!(sim.final_budget > 0.0);
        prop_assert_eq!(sim.trade_pnls.len(), sim.trades.len());
        if positions[0] == Position::Held {
            prop_assert!(!sim.trades.is_empty());
        }
    }

    #[test]
    fn simulator_runs_are_repeatable(series in bar_series()) {
        let registry = StrategyRegistry::new();
        let mut simulator = BudgetSimulator::new(registry.create_example("sma_crossover").unwrap());

        simulator.apply_strategy(&series, Some(10_000.0)).unwrap();
        let first = simulator.budget();
        let first_pnls = simulator.metrics().1.to_vec();

        simulator.apply_strategy(&series, Some(10_000.0)).unwrap();
        prop_assert_eq!(simulator.budget(), first);
        prop_assert_eq!(simulator.metrics().1, first_pnls.as_slice());
    }
}
