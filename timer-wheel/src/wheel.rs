//! The hashed timing wheel.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::clock::{Clock, MonotonicClock};
use crate::config::WheelConfig;
use crate::error::WheelResult;
use crate::timer::{PendingCounter, Slot, Timer, TimerInner, TimerState};

/// A single-threaded hashed wheel scheduler. All scheduling,
/// cancellation, and expiration must happen on the owner thread — no
/// internal synchronization is provided.
pub struct TimerWheel<C: Clock = MonotonicClock> {
    clock: C,
    start_time: i64,
    config: WheelConfig,
    buckets: Vec<Vec<Slot>>,
    current_tick: u64,
    pending: PendingCounter,
}

impl TimerWheel<MonotonicClock> {
    /// Construct a wheel using the platform's monotonic clock.
    ///
    /// # Errors
    ///
    /// See [`WheelConfig::validate`].
    pub fn new(tick_duration_nanos: i64, ticks_per_wheel: u64) -> WheelResult<Self> {
        Self::with_clock(
            WheelConfig::new(tick_duration_nanos, ticks_per_wheel),
            MonotonicClock::new(),
        )
    }
}

impl<C: Clock> TimerWheel<C> {
    /// Construct a wheel with an injected clock (tests use this for
    /// deterministic time).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::WheelError::TicksPerWheelNotPowerOfTwo`]
    /// or [`crate::error::WheelError::DurationOverflow`] if `config` is
    /// invalid.
    pub fn with_clock(config: WheelConfig, clock: C) -> WheelResult<Self> {
        config.validate()?;

        let start_time = clock.now_nanos();
        let buckets = (0..config.ticks_per_wheel)
            .map(|_| {
                (0..config.initial_tick_depth)
                    .map(|_| Rc::new(RefCell::new(None)))
                    .collect()
            })
            .collect();

        debug!(
            tick_duration_nanos = config.tick_duration_nanos,
            ticks_per_wheel = config.ticks_per_wheel,
            "timer wheel constructed"
        );

        Ok(Self {
            clock,
            start_time,
            config,
            buckets,
            current_tick: 0,
            pending: Rc::new(Cell::new(0)),
        })
    }

    /// Nanoseconds since the wheel was constructed.
    #[must_use]
    pub fn current_time(&self) -> i64 {
        self.clock.now_nanos() - self.start_time
    }

    /// Tick index the wheel is currently positioned at.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Total number of timers still occupying a slot (active, or fired
    /// but not yet overwritten by a later schedule). O(1): a running
    /// counter maintained alongside slot claims and removals, not a
    /// bucket scan.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.get()
    }

    /// Schedule `task` to run after `delay`.
    ///
    /// A `delay` that has already elapsed (or is zero/negative in the
    /// wheel's nanosecond arithmetic) lands in the current tick's slot
    /// and fires on the very next [`TimerWheel::expire_timers`].
    pub fn new_timeout(&mut self, delay: Duration, task: impl FnOnce() + 'static) -> Timer {
        let deadline = self.current_time() + delay.as_nanos() as i64;
        let calculated_index = deadline / self.config.tick_duration_nanos;
        let ticks = calculated_index.max(self.current_tick as i64);
        let wheel_index = (ticks as u64) & self.config.mask();
        let remaining_rounds =
            (calculated_index - self.current_tick as i64) / self.config.ticks_per_wheel as i64;

        let state = Rc::new(Cell::new(TimerState::Active));
        let inner = TimerInner {
            deadline,
            wheel_index,
            remaining_rounds,
            task: Box::new(task),
        };

        let slot = self.place_in_bucket(wheel_index, inner);
        self.pending.set(self.pending.get() + 1);

        trace!(deadline, wheel_index, remaining_rounds, "timer scheduled");

        Timer {
            slot,
            state,
            deadline,
            pending: self.pending.clone(),
        }
    }

    fn place_in_bucket(&mut self, wheel_index: u64, inner: TimerInner) -> Slot {
        let bucket = &mut self.buckets[wheel_index as usize];
        let mut entry = Some(inner);

        for slot in bucket.iter_mut() {
            if slot.borrow().is_none() {
                let taken = entry.take().expect("loop body runs at most once before returning");
                let fresh = Rc::new(RefCell::new(Some(taken)));
                *slot = fresh.clone();
                return fresh;
            }
        }

        let fresh = Rc::new(RefCell::new(entry));
        bucket.push(fresh.clone());
        fresh
    }

    /// Milliseconds until the next tick boundary. May be zero or
    /// negative when the wheel is behind; callers typically treat
    /// non-positive values as "tick now".
    #[must_use]
    pub fn calculate_delay_in_msec(&self) -> i64 {
        let next_tick_deadline = self.config.tick_duration_nanos * (self.current_tick as i64 + 1);
        let delta = next_tick_deadline - self.current_time();
        (delta + 999_999) / 1_000_000
    }

    /// Process the current tick's slot: fire every timer with no
    /// rounds remaining whose deadline has passed, decrement the rest,
    /// then advance `current_tick`.
    ///
    /// A timer whose `remaining_rounds` has reached zero but whose
    /// `deadline` is still in the future is removed *without* firing:
    /// it does not get rescheduled for a later revolution.
    ///
    /// # Panics
    ///
    /// Propagates any panic from a timer's task; timers after the
    /// panicking one in the same slot are left unprocessed.
    pub fn expire_timers(&mut self) {
        let now = self.current_time();
        let idx = (self.current_tick & self.config.mask()) as usize;
        let bucket = &self.buckets[idx];

        for slot_rc in bucket {
            let mut slot = slot_rc.borrow_mut();
            let should_fire = match slot.as_ref() {
                Some(entry) if entry.remaining_rounds <= 0 => true,
                Some(_) => false,
                None => continue,
            };

            if should_fire {
                let entry = slot.take().expect("checked Some above");
                drop(slot);
                self.pending.set(self.pending.get() - 1);
                if entry.deadline <= now {
                    (entry.task)();
                }
            } else if let Some(entry) = slot.as_mut() {
                entry.remaining_rounds -= 1;
            }
        }

        self.current_tick += 1;
    }
}
