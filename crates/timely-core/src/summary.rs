//! Day summary derived from a ledger and a daily target.

use chrono::{Duration, NaiveDateTime};

use crate::ledger::Ledger;

/// Figures shown for the current day.
///
/// Always recomputed from scratch; nothing here is carried between ledger
/// changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Time in closed intervals only.
    pub total: Duration,

    /// Time including an open interval closed at `now`.
    pub provisional: Duration,

    /// `total - target`; negative while the target is not reached.
    pub overtime: Duration,

    /// Latest entry plus the time still missing to reach the target.
    pub planned_finish: Option<NaiveDateTime>,

    /// Share of the target already reached, clamped to `0.0..=1.0`.
    pub progress: f64,
}

impl Summary {
    /// Computes the summary of `ledger` against `target` at the instant `now`.
    pub fn compute(ledger: &Ledger, target: Duration, now: NaiveDateTime) -> Self {
        let provisional = ledger.sum_paired_durations_with_now(Some(now));
        let total = ledger.sum_paired_durations_with_now(None);
        let remaining = target - total;

        Self {
            total,
            provisional,
            overtime: total - target,
            planned_finish: ledger.last().map(|last| last + remaining),
            progress: progress(total, target),
        }
    }

    /// Whether the closed intervals already cover the target.
    pub fn target_reached(&self) -> bool {
        self.overtime >= Duration::zero()
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "minute counts within a day are far below f64 precision limits"
)]
fn progress(total: Duration, target: Duration) -> f64 {
    let target_minutes = target.num_minutes();
    if target_minutes <= 0 {
        return 1.0;
    }
    let ratio = total.num_minutes() as f64 / target_minutes as f64;
    ratio.clamp(0.0, 1.0)
}
