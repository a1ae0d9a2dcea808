//! Resizing slot collections to a target capacity.
//!
//! Growth appends default slots; shrinking truncates from the tail. Retained
//! slots are never touched, so any prefix survives a grow/shrink round trip.

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    pub added: usize,
    pub removed: usize,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Resize `slots` to exactly `target` entries.
///
/// Shrinking is lossy: dropped slots are gone. Callers decide beforehand
/// whether that loss is acceptable.
pub fn reconcile<T>(
    slots: &mut Vec<T>,
    target: usize,
    make_default: impl FnMut() -> T,
) -> ReconcileOutcome {
    let len = slots.len();
    if len < target {
        slots.extend(std::iter::repeat_with(make_default).take(target - len));
        ReconcileOutcome {
            added: target - len,
            removed: 0,
        }
    } else if len > target {
        slots.truncate(target);
        ReconcileOutcome {
            added: 0,
            removed: len - target,
        }
    } else {
        ReconcileOutcome::default()
    }
}

/// Grow `slots` to at least `min` entries. Never shrinks.
pub fn ensure_min_len<T>(
    slots: &mut Vec<T>,
    min: usize,
    make_default: impl FnMut() -> T,
) -> ReconcileOutcome {
    if slots.len() >= min {
        return ReconcileOutcome::default();
    }
    reconcile(slots, min, make_default)
}

/// How many slots past `target` satisfy `is_filled`, i.e. what a shrink to
/// `target` would discard.
pub fn filled_beyond<T>(slots: &[T], target: usize, is_filled: impl Fn(&T) -> bool) -> usize {
    slots.iter().skip(target).filter(|slot| is_filled(slot)).count()
}
