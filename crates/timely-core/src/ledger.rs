//! The time ledger: sorted clock-in/clock-out timestamps.
//!
//! Entries at even indices start a tracked interval, entries at odd indices
//! end it. Every operation returns a new ledger and leaves the receiver
//! untouched, so a ledger can be shared freely between readers.

use chrono::{Duration, Local, NaiveDateTime};

use crate::format::format_time;

/// An ordered collection of clock-in/clock-out timestamps.
///
/// The entries are always sorted ascending. Duplicates are allowed and are
/// treated as independent entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<NaiveDateTime>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a ledger from entries given in any order.
    pub fn from_entries(entries: impl IntoIterator<Item = NaiveDateTime>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort();
        Self { entries }
    }

    /// Returns the entries in ascending order.
    pub fn entries(&self) -> &[NaiveDateTime] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a new ledger with `entry` added in its sorted position.
    ///
    /// The sort is stable, so an entry equal to existing ones lands after them.
    #[must_use]
    pub fn insert(&self, entry: NaiveDateTime) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        entries.sort();
        Self { entries }
    }

    /// Returns a new ledger without the entry at `index`.
    ///
    /// An out-of-range index yields an identical copy of the ledger.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        if index >= self.entries.len() {
            return self.clone();
        }
        let mut entries = self.entries.clone();
        entries.remove(index);
        Self { entries }
    }

    /// Returns the chronologically latest entry.
    pub fn last(&self) -> Option<NaiveDateTime> {
        self.entries.last().copied()
    }

    /// Formats every entry as `HH:MM`, in ledger order.
    pub fn render_strings(&self) -> Vec<String> {
        self.entries.iter().map(format_time).collect()
    }

    /// Sums the durations of consecutive `(start, end)` pairs.
    ///
    /// With an odd number of entries the trailing start is closed by `now`
    /// when one is given, and dropped otherwise. The working copy is re-sorted
    /// after `now` is appended, so a `now` earlier than the latest entry pairs
    /// with whatever neighbour it sorts next to. Pairs whose end is not
    /// strictly after their start contribute nothing.
    pub fn sum_paired_durations_with_now(&self, now: Option<NaiveDateTime>) -> Duration {
        if self.entries.is_empty() {
            return Duration::zero();
        }

        let mut working = self.entries.clone();
        if let Some(now) = now.filter(|_| working.len() % 2 == 1) {
            working.push(now);
        }
        working.sort();

        let total = working
            .chunks_exact(2)
            .map(|pair| pair[1] - pair[0])
            .filter(|span| *span > Duration::zero())
            .fold(Duration::zero(), |total, span| total + span);

        tracing::trace!(
            entries = self.entries.len(),
            with_now = now.is_some(),
            total_minutes = total.num_minutes(),
            "summed paired durations"
        );
        total
    }

    /// Sums paired durations, closing an open interval at the current local time.
    pub fn sum_paired_durations(&self) -> Duration {
        self.sum_paired_durations_with_now(Some(Local::now().naive_local()))
    }
}
