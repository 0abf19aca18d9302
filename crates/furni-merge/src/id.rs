use std::sync::atomic::{AtomicU64, Ordering};

/// Source of identifiers for newly added items.
///
/// Ids are millisecond timestamps, bumped when needed so that every id handed
/// out by one generator is strictly greater than the previous one, even for
/// adds landing in the same millisecond.
#[derive(Debug)]
pub struct IdGenerator {
    /// Smallest id the next call may return.
    next: AtomicU64,
    wall_clock: bool,
}

impl IdGenerator {
    /// Wall-clock based generator.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
            wall_clock: true,
        }
    }

    /// Deterministic generator yielding `first`, `first + 1`, ...
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
            wall_clock: false,
        }
    }

    pub fn next_id(&self) -> u64 {
        let now = if self.wall_clock {
            u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
        } else {
            0
        };
        let prev = self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                Some(now.max(next).saturating_add(1))
            })
            .unwrap_or_else(|next| next);
        now.max(prev)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
