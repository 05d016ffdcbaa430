//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Price parsing: numeric prefix extracted exactly, non-numeric residue dropped
//! 2. Assembly: output ordered for any input order, idempotent on sorted input
//! 3. Trend state: above exactly when sma30 > sma200
//! 4. Crossings: only on trend flips, never more events than flips, none on a constant series
//! 5. Bollinger: lower <= middle <= upper, all equal on a constant window
//! 6. Determinism: same series, same rows

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use tasalab_core::assemble::assemble;
use tasalab_core::domain::{PricePoint, SignalEvent, TrendState};
use tasalab_core::normalize::{parse_price, Normalizer};
use tasalab_core::Pipeline;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_decimal() -> impl Strategy<Value = String> {
    "[0-9]{1,6}(\\.[0-9]{1,4})?"
}

fn arb_annotation() -> impl Strategy<Value = String> {
    "[ -~]{0,24}"
}

fn arb_prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0), 0..max_len)
}

fn day(i: usize) -> NaiveDateTime {
    (NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + Duration::days(i as i64))
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn series_points(prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(day(i), p))
        .collect()
}

// ── 1. Price parsing ─────────────────────────────────────────────────

proptest! {
    /// The numeric prefix before the marker is extracted exactly.
    #[test]
    fn annotated_price_prefix(num in arb_decimal(), note in arb_annotation()) {
        let raw = format!("{num}JS:{note}");
        let expected: f64 = num.parse().unwrap();
        prop_assert_eq!(parse_price(&raw, "JS:"), Some(expected));
    }

    /// Surrounding whitespace does not matter.
    #[test]
    fn padded_price(num in arb_decimal(), left in " {0,3}", right in " {0,3}") {
        let raw = format!("{left}{num}{right}");
        prop_assert_eq!(parse_price(&raw, "JS:"), num.parse::<f64>().ok());
    }

    /// Residue with any non-digit character drops the record, not the run.
    #[test]
    fn non_numeric_residue_drops_record(junk in "[0-9]{0,3}[a-zA-Z/_-][a-zA-Z0-9/ ]{0,5}") {
        prop_assert_eq!(parse_price(&junk, "JS:"), None);

        let raw = serde_json::json!([
            {"_id": "2024-01-01", "median": junk},
            {"_id": "2024-01-02", "median": "310.5"},
        ]);
        let out = Normalizer::default().normalize(&raw).unwrap();
        prop_assert_eq!(out.points.len(), 1);
        prop_assert_eq!(out.rejected.len(), 1);
    }
}

// ── 2. Assembly ──────────────────────────────────────────────────────

proptest! {
    /// Any permutation assembles into a strictly increasing series.
    #[test]
    fn assembly_orders_any_permutation(
        prices in arb_prices(80),
        keys in prop::collection::vec(any::<u32>(), 80),
    ) {
        let mut points = series_points(&prices);
        // Shuffle deterministically by sorting on random keys.
        let mut keyed: Vec<_> = points.drain(..).zip(keys).collect();
        keyed.sort_by_key(|(_, k)| *k);
        let shuffled: Vec<PricePoint> = keyed.into_iter().map(|(p, _)| p).collect();

        let series = assemble(shuffled).series;
        prop_assert_eq!(series.len(), prices.len());
        prop_assert!(series.points().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    /// Assembling an already-assembled series changes nothing.
    #[test]
    fn assembly_is_idempotent(prices in arb_prices(80), dup_days in prop::collection::vec(0usize..80, 0..10)) {
        let mut points = series_points(&prices);
        for d in dup_days {
            points.push(PricePoint::new(day(d), 1.0));
        }
        let once = assemble(points).series;
        let twice = assemble(once.points().to_vec());
        prop_assert_eq!(twice.duplicates, 0);
        prop_assert_eq!(twice.series, once);
    }
}

// ── 3-6. Indicator and signal invariants ─────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// trend_state = above <=> sma30 > sma200, on every row.
    #[test]
    fn trend_state_matches_averages(prices in arb_prices(300)) {
        let series = assemble(series_points(&prices)).series;
        for row in Pipeline::default().indicator_rows(&series) {
            let (fast, slow) = (row.sma30.unwrap(), row.sma200.unwrap());
            prop_assert_eq!(row.trend_state == Some(TrendState::Above), fast > slow);
        }
    }

    /// Crossings fire exactly on trend flips.
    #[test]
    fn crossings_only_on_flips(prices in arb_prices(300)) {
        let series = assemble(series_points(&prices)).series;
        let rows = Pipeline::default().indicator_rows(&series);

        let mut flips = 0;
        let mut events = 0;
        for (i, row) in rows.iter().enumerate() {
            let prev = i.checked_sub(1).and_then(|p| rows[p].trend_state);
            let expected = match (prev, row.trend_state) {
                (Some(TrendState::Below), Some(TrendState::Above)) => SignalEvent::BuyCross,
                (Some(TrendState::Above), Some(TrendState::Below)) => SignalEvent::SellCross,
                _ => SignalEvent::None,
            };
            prop_assert_eq!(row.signal_event, expected);
            if prev.is_some() && prev != row.trend_state {
                flips += 1;
            }
            if row.signal_event.is_cross() {
                events += 1;
            }
        }
        prop_assert!(events <= flips);
    }

    /// Bands bracket the middle line wherever defined.
    #[test]
    fn bollinger_ordering(prices in arb_prices(120)) {
        let series = assemble(series_points(&prices)).series;
        for row in Pipeline::default().indicator_rows(&series) {
            if let (Some(l), Some(m), Some(u)) = (row.lower_band, row.sma20, row.upper_band) {
                prop_assert!(l <= m && m <= u, "band order violated: {l} {m} {u}");
            }
        }
    }

    /// Constant window collapses the bands onto the middle line.
    #[test]
    fn bollinger_constant_window(price in 1.0..1000.0_f64, len in 20usize..60) {
        let series = assemble(series_points(&vec![price; len])).series;
        for row in Pipeline::default().indicator_rows(&series).iter().skip(19) {
            prop_assert_eq!(row.sma20, Some(price));
            prop_assert_eq!(row.upper_band, row.sma20);
            prop_assert_eq!(row.lower_band, row.sma20);
        }
    }

    /// A constant series never crosses: both averages equal the price.
    #[test]
    fn constant_series_never_crosses(price in 0.01..1000.0_f64, len in 1usize..300) {
        let series = assemble(series_points(&vec![price; len])).series;
        for row in Pipeline::default().indicator_rows(&series) {
            prop_assert_eq!(row.sma30, row.sma200);
            prop_assert_eq!(row.trend_state, Some(TrendState::Below));
            prop_assert_eq!(row.signal_event, SignalEvent::None);
        }
    }

    /// RSI stays in [0, 100] and is never NaN.
    #[test]
    fn rsi_bounded(prices in arb_prices(200)) {
        let series = assemble(series_points(&prices)).series;
        for row in Pipeline::default().indicator_rows(&series) {
            if let Some(rsi) = row.rsi {
                prop_assert!((0.0..=100.0).contains(&rsi));
            }
        }
    }

    /// Same series, same rows, same fingerprint.
    #[test]
    fn pipeline_is_deterministic(prices in arb_prices(260)) {
        let series = assemble(series_points(&prices)).series;
        let pipeline = Pipeline::default();
        let a = pipeline.indicator_rows(&series);
        let b = pipeline.indicator_rows(&series);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(
            pipeline.analyze(&series).fingerprint(),
            pipeline.analyze(&series).fingerprint()
        );
    }

    /// Every Output Series row is a complete row, in date order.
    #[test]
    fn output_rows_are_complete_and_ordered(prices in arb_prices(260)) {
        let series = assemble(series_points(&prices)).series;
        let output = Pipeline::default().analyze(&series);
        prop_assert!(output.len() <= series.len().saturating_sub(19));
        prop_assert!(output.rows.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        for row in &output.rows {
            prop_assert!(row.rsi.is_finite() && row.volatility_pct.is_finite());
        }
    }
}
