//! Crossover signal derivation.
//!
//! Compares each row's trend state with the previous row's:
//! - below → above emits `BuyCross` (golden cross)
//! - above → below emits `SellCross` (death cross)
//! - unchanged, first row, or either side undefined emits `None`

use crate::domain::{IndicatorRow, SignalEvent, TrendState};

/// Event for a single transition.
pub fn crossing(prev: Option<TrendState>, cur: Option<TrendState>) -> SignalEvent {
    match (prev, cur) {
        (Some(TrendState::Below), Some(TrendState::Above)) => SignalEvent::BuyCross,
        (Some(TrendState::Above), Some(TrendState::Below)) => SignalEvent::SellCross,
        _ => SignalEvent::None,
    }
}

/// Events for a whole trend-state column.
pub fn signal_events(trend: &[Option<TrendState>]) -> Vec<SignalEvent> {
    let mut events = Vec::with_capacity(trend.len());
    let mut prev = None;
    for &state in trend {
        events.push(crossing(prev, state));
        prev = state;
    }
    events
}

/// Fill in `signal_event` on indicator rows.
pub fn apply_signals(mut rows: Vec<IndicatorRow>) -> Vec<IndicatorRow> {
    let trend: Vec<Option<TrendState>> = rows.iter().map(|r| r.trend_state).collect();
    for (row, event) in rows.iter_mut().zip(signal_events(&trend)) {
        row.signal_event = event;
    }
    rows
}
