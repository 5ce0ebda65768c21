use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Trailing time window ending at the start of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    cutoff: i64,
}

impl TimeWindow {
    /// Window covering the `days` days before `started_at`.
    pub fn trailing(started_at: DateTime<Utc>, days: u32) -> Self {
        // windows reaching past chrono's range cover everything
        let cutoff = started_at
            .checked_sub_signed(Duration::days(i64::from(days)))
            .map_or(i64::MIN, |cutoff| cutoff.timestamp());
        Self { cutoff }
    }

    /// Cutoff as unix seconds; messages at or after it are in scope.
    pub fn cutoff(&self) -> i64 {
        self.cutoff
    }

    /// Whether a Slack `ts` (e.g. `"1767636991.559059"`) is in scope.
    ///
    /// The fractional part is dropped before comparing. An unparseable `ts`
    /// reads as the epoch and falls outside any window.
    pub fn contains_ts(&self, ts: &str) -> bool {
        slack_ts_seconds(ts) >= self.cutoff
    }
}

fn slack_ts_seconds(ts: &str) -> i64 {
    // `as` saturates and maps NaN to 0
    ts.trim().parse::<f64>().map(|secs| secs.trunc() as i64).unwrap_or(0)
}
