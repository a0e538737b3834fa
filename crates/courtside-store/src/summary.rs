//! Read-only aggregations over a state snapshot, for dashboards and
//! profile pages.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::state::AppState;
use crate::storage::ReservationStatus;

/// Name used for reservations whose court is not in the mirror.
pub const UNKNOWN_COURT: &str = "Desconocida";

/// Reservation counts derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReservationSummary {
    pub total: usize,
    /// Keyed by `YYYY-MM-DD`, ascending.
    pub per_day: BTreeMap<String, usize>,
    /// Keyed by court name.
    pub per_court: BTreeMap<String, usize>,
    /// Keyed by the hour part of `HH:MM`.
    pub per_hour: BTreeMap<String, usize>,
    pub per_status: BTreeMap<&'static str, usize>,
    /// Sum of the hourly price of each reserved court. Unpriced or
    /// unknown courts add nothing.
    pub revenue: f64,
}

impl ReservationSummary {
    /// Summarize the mirrored reservations dated within `[from, to]`
    /// (inclusive, `YYYY-MM-DD`; `None` leaves that side open).
    pub fn from_state(state: &AppState, from: Option<&str>, to: Option<&str>) -> Self {
        let mut summary = Self::default();

        let in_range = |date: &str| {
            from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
        };

        for reservation in state.reservations.iter().filter(|r| in_range(&r.date)) {
            summary.total += 1;
            *summary.per_day.entry(reservation.date.clone()).or_default() += 1;

            let court = state.court(&reservation.court_id);
            let name = court.map_or(UNKNOWN_COURT, |c| c.name.as_str());
            *summary.per_court.entry(name.to_string()).or_default() += 1;
            summary.revenue += court.and_then(|c| c.price_per_hour).unwrap_or(0.0);

            let hour = reservation
                .time
                .split_once(':')
                .map_or(reservation.time.as_str(), |(hour, _)| hour);
            *summary.per_hour.entry(hour.to_string()).or_default() += 1;

            *summary
                .per_status
                .entry(reservation.status.as_str())
                .or_default() += 1;
        }

        summary
    }

    pub fn count(&self, status: ReservationStatus) -> usize {
        self.per_status.get(status.as_str()).copied().unwrap_or(0)
    }
}
