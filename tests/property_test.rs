//! Property tests for the backtest engine.

mod common;

use common::*;
use horizon::domain::backtest::{run_backtest, BacktestParams};
use horizon::domain::calendar::count_business_days;
use horizon::domain::matcher::PositionMode;
use horizon::domain::price::PriceBar;
use horizon::domain::signal::SignalMode;
use horizon::domain::strategy::Strategy as TradeStrategy;
use proptest::prelude::*;

fn closes_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..200.0, 0..120)
}

fn trade_strategy() -> impl Strategy<Value = TradeStrategy> {
    prop_oneof![
        (1.0f64..200.0).prop_map(|threshold| TradeStrategy::Breakout { threshold }),
        (1usize..6, 6usize..20).prop_map(|(fast, slow)| TradeStrategy::SmaCrossover { fast, slow }),
        (2usize..15, 0.1f64..2.5)
            .prop_map(|(lookback, k_sigma)| TradeStrategy::ZScoreReversion { lookback, k_sigma }),
        (0.1f64..10.0).prop_map(|drop_pct| TradeStrategy::PercentDrop { drop_pct }),
    ]
}

fn index_of(bars: &[PriceBar], date: chrono::NaiveDate) -> usize {
    bars.iter().position(|b| b.date == date).unwrap()
}

proptest! {
    #[test]
    fn curve_covers_business_days(
        closes in closes_strategy(),
        strategy in trade_strategy(),
        hold in 0usize..8,
    ) {
        let bars = business_day_bars(date(2023, 1, 2), &closes);
        let params = BacktestParams::new(strategy, hold, 10_000.0);
        let result = run_backtest(&bars, &params).unwrap();

        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => {
                prop_assert_eq!(result.equity_curve.len(), count_business_days(first.date, last.date));
            }
            _ => prop_assert!(result.equity_curve.is_empty()),
        }
        prop_assert!(result.equity_curve.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn stacking_trades_hold_exactly(
        closes in closes_strategy(),
        strategy in trade_strategy(),
        hold in 1usize..8,
        cross in any::<bool>(),
    ) {
        let bars = business_day_bars(date(2023, 1, 2), &closes);
        let params = BacktestParams {
            signal_mode: if cross { SignalMode::Cross } else { SignalMode::EveryBar },
            ..BacktestParams::new(strategy, hold, 10_000.0)
        };
        let result = run_backtest(&bars, &params).unwrap();

        for trade in &result.trades {
            let entry = index_of(&bars, trade.entry_date);
            let exit = index_of(&bars, trade.exit_date);
            prop_assert_eq!(exit - entry, hold);
        }
        prop_assert!(result.metrics.signals_kept <= result.metrics.signals_total);
    }

    #[test]
    fn single_trades_never_overlap(
        closes in closes_strategy(),
        strategy in trade_strategy(),
        hold in 1usize..8,
    ) {
        let bars = business_day_bars(date(2023, 1, 2), &closes);
        let params = BacktestParams {
            position_mode: PositionMode::Single,
            ..BacktestParams::new(strategy, hold, 10_000.0)
        };
        let result = run_backtest(&bars, &params).unwrap();

        let last_index = bars.len().saturating_sub(1);
        for (i, trade) in result.trades.iter().enumerate() {
            let entry = index_of(&bars, trade.entry_date);
            let exit = index_of(&bars, trade.exit_date);
            prop_assert!(exit - entry <= hold);
            if exit - entry < hold {
                prop_assert_eq!(exit, last_index);
                prop_assert_eq!(i, result.trades.len() - 1);
            }
        }
        for pair in result.trades.windows(2) {
            prop_assert!(pair[0].exit_date < pair[1].entry_date);
        }
    }

    #[test]
    fn drawdown_and_round_trip(
        closes in closes_strategy(),
        strategy in trade_strategy(),
        hold in 0usize..8,
        size in 0.0f64..2.0,
    ) {
        let bars = business_day_bars(date(2023, 1, 2), &closes);
        let params = BacktestParams {
            position_size: size,
            ..BacktestParams::new(strategy, hold, 1_000_000.0)
        };
        let result = run_backtest(&bars, &params).unwrap();
        let m = &result.metrics;

        prop_assert!(m.max_drawdown <= 0.0);
        let non_decreasing = result.equity_curve.windows(2).all(|w| w[1].equity >= w[0].equity);
        prop_assert_eq!(m.max_drawdown == 0.0, non_decreasing);

        let pnl: f64 = result.trades.iter().map(|t| t.pnl).sum();
        prop_assert!((pnl - (m.final_equity - m.initial_equity)).abs() < 1e-6);
    }

    #[test]
    fn signals_never_depend_on_later_closes(
        steps in prop::collection::vec(-3.0f64..3.0, 0..150),
        strategy in trade_strategy(),
        cross in any::<bool>(),
    ) {
        let mut level = 100.0;
        let closes: Vec<f64> = steps
            .iter()
            .map(|step| {
                level = (level + step).max(1.0);
                level
            })
            .collect();
        let mode = if cross { SignalMode::Cross } else { SignalMode::EveryBar };
        let full = strategy.signals(&closes, mode);

        for k in 0..=closes.len() {
            prop_assert_eq!(&strategy.signals(&closes[..k], mode)[..], &full[..k], "prefix {}", k);
        }
    }

    #[test]
    fn runs_are_deterministic(
        closes in closes_strategy(),
        strategy in trade_strategy(),
        hold in 0usize..8,
    ) {
        let bars = business_day_bars(date(2023, 1, 2), &closes);
        let params = BacktestParams::new(strategy, hold, 10_000.0);
        prop_assert_eq!(run_backtest(&bars, &params).unwrap(), run_backtest(&bars, &params).unwrap());
    }
}
