use std::collections::VecDeque;

use super::{Duration, TimeDomain, Timestamp};
use crate::error::CoreError;

/// A bounded, append-only ring of `(timestamp, value)` pairs with nearest-key
/// lookup. Keys must be strictly increasing; eviction keeps the buffer within
/// both a maximum entry count and a maximum age relative to the newest entry.
pub struct TimestampedHistoryBuffer<D: TimeDomain, V> {
    entries: VecDeque<(Timestamp<D>, V)>,
    max_entries: usize,
    maximum_entry_age: Duration,
}

impl<D: TimeDomain, V> TimestampedHistoryBuffer<D, V> {
    pub fn new(max_entries: usize, maximum_entry_age: Duration) -> Self {
        TimestampedHistoryBuffer {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
            maximum_entry_age,
        }
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn oldest_timestamp(&self) -> Option<Timestamp<D>> {
        self.entries.front().map(|(t, _)| *t)
    }

    pub fn latest_timestamp(&self) -> Option<Timestamp<D>> {
        self.entries.back().map(|(t, _)| *t)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Appends `(t, v)`. Fails with [`CoreError::EntryTooOld`] if `t` is not
    /// strictly newer than the current newest key; the buffer is left
    /// unchanged in that case.
    pub fn add(&mut self, t: Timestamp<D>, v: V) -> Result<(), CoreError> {
        if let Some(newest) = self.latest_timestamp() {
            if t <= newest {
                return Err(CoreError::EntryTooOld(t.micros()));
            }
        }
        self.entries.push_back((t, v));

        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
        while let (Some((oldest, _)), Some((newest, _))) =
            (self.entries.front(), self.entries.back())
        {
            if (*newest - *oldest) > self.maximum_entry_age {
                self.entries.pop_front();
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Returns the entry whose key is nearest `t`, ties broken toward the
    /// later entry. Returns `None` if `t` lies outside `[oldest, newest]`.
    pub fn search(&self, t: Timestamp<D>) -> Option<&V> {
        let oldest = self.oldest_timestamp()?;
        let newest = self.latest_timestamp()?;
        if t < oldest || t > newest {
            return None;
        }

        let mut best: Option<(Duration, &(Timestamp<D>, V))> = None;
        for entry in &self.entries {
            let dist = (entry.0 - t).abs();
            best = match best {
                None => Some((dist, entry)),
                Some((best_dist, best_entry)) => {
                    if dist <= best_dist {
                        if dist < best_dist || entry.0 > best_entry.0 {
                            Some((dist, entry))
                        } else {
                            Some((best_dist, best_entry))
                        }
                    } else {
                        Some((best_dist, best_entry))
                    }
                }
            };
        }
        best.map(|(_, (_, v))| v)
    }
}
