//! The scheduled-timer handle and its wheel-side storage.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared occupied-slot counter, kept outside the bucket storage so
/// `pending_count` is O(1) instead of a full bucket scan.
pub(crate) type PendingCounter = Rc<Cell<usize>>;

/// A timer's lifecycle state. Expiration is terminal without a state
/// transition: a fired timer is simply unreferenced from the wheel and
/// observationally stays [`TimerState::Active`] unless the owner also
/// cancels it. This is deliberately preserved source behavior — see
/// the crate's design notes — not an oversight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Scheduled. May still be sitting in its bucket slot, or may
    /// already have fired (the wheel does not distinguish the two).
    Active,
    /// Cancelled via [`Timer::cancel`]; will never fire.
    Cancelled,
}

/// Wheel-side storage for one scheduled timer. Lives inside a bucket
/// slot until it fires or is cancelled.
pub(crate) struct TimerInner {
    pub(crate) deadline: i64,
    #[allow(dead_code)]
    pub(crate) wheel_index: u64,
    pub(crate) remaining_rounds: i64,
    pub(crate) task: Box<dyn FnOnce()>,
}

pub(crate) type Slot = Rc<RefCell<Option<TimerInner>>>;

/// A handle to a scheduled timer, returned by
/// [`crate::TimerWheel::new_timeout`].
pub struct Timer {
    pub(crate) slot: Slot,
    pub(crate) state: Rc<Cell<TimerState>>,
    pub(crate) deadline: i64,
    pub(crate) pending: PendingCounter,
}

impl Timer {
    /// Absolute deadline, in nanoseconds since the owning wheel's
    /// start time.
    #[must_use]
    pub fn deadline(&self) -> i64 {
        self.deadline
    }

    /// Current observed state. Note: a fired timer's state remains
    /// [`TimerState::Active`] unless also cancelled (see crate docs).
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state.get()
    }

    /// Convenience check; equivalent to `state() == TimerState::Cancelled`.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.get() == TimerState::Cancelled
    }

    /// Cancel the timer. Idempotent; always succeeds. If it is still
    /// occupying its bucket slot, the slot is nulled immediately so a
    /// later `new_timeout` call may reuse the index. A timer already
    /// removed by `expire_timers` (or by a previous `cancel`) is
    /// unaffected — this is a no-op, not an error.
    pub fn cancel(&self) {
        self.state.set(TimerState::Cancelled);
        if self.slot.borrow_mut().take().is_some() {
            self.pending.set(self.pending.get() - 1);
        }
    }
}
