//! One-second countdown timers for the preparation and recording windows

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::domain::interview::TimerKind;
use crate::domain::recording::Duration;

const TICK: StdDuration = StdDuration::from_secs(1);

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one started countdown. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Delivered to `on_tick` once per elapsed second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub timer: TimerId,
    pub kind: TimerKind,
    pub remaining: u64,
}

/// Owning reference to a running countdown.
///
/// Dropping the handle cancels the countdown.
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    kind: TimerKind,
    done: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Start a countdown of `duration` whole seconds.
    ///
    /// `on_tick` runs once per second with the remaining count, which goes
    /// `d-1, d-2, .., 0`. `on_expire` runs exactly once right after the tick
    /// that reaches zero. A zero-length countdown expires without ticking.
    pub fn spawn<T, E>(kind: TimerKind, duration: Duration, mut on_tick: T, on_expire: E) -> Self
    where
        T: FnMut(Tick) + Send + 'static,
        E: FnOnce(TimerId) + Send + 'static,
    {
        let id = TimerId::fresh();
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        let mut remaining = duration.as_secs();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while remaining > 0 {
                ticker.tick().await;
                if flag.load(Ordering::SeqCst) {
                    return;
                }
                remaining -= 1;
                on_tick(Tick {
                    timer: id,
                    kind,
                    remaining,
                });
            }

            if !flag.swap(true, Ordering::SeqCst) {
                on_expire(id);
            }
        });

        Self {
            id,
            kind,
            done,
            task,
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// True until the countdown expires or is cancelled
    pub fn is_active(&self) -> bool {
        !self.done.load(Ordering::SeqCst) && !self.task.is_finished()
    }

    /// Stop ticking now. No-op on an expired or already cancelled timer.
    pub fn cancel(&self) {
        self.done.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Slot holding at most one countdown.
///
/// Starting a countdown cancels whatever the slot held before, so two
/// timers can never tick at once.
#[derive(Debug, Default)]
pub struct PhaseTimer {
    current: Option<TimerHandle>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current countdown with a new one
    pub fn start<T, E>(&mut self, kind: TimerKind, duration: Duration, on_tick: T, on_expire: E) -> TimerId
    where
        T: FnMut(Tick) + Send + 'static,
        E: FnOnce(TimerId) + Send + 'static,
    {
        self.cancel();
        let handle = TimerHandle::spawn(kind, duration, on_tick, on_expire);
        let id = handle.id();
        tracing::debug!(?id, %kind, secs = duration.as_secs(), "timer started");
        self.current = Some(handle);
        id
    }

    /// Cancel and forget the current countdown, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            if handle.is_active() {
                tracing::debug!(id = ?handle.id(), kind = %handle.kind(), "timer cancelled");
            }
            handle.cancel();
        }
    }

    /// Whether `id` is the countdown this slot currently holds.
    ///
    /// Events from replaced timers fail this check and must be dropped.
    pub fn owns(&self, id: TimerId) -> bool {
        self.current.as_ref().is_some_and(|h| h.id() == id)
    }

    /// A countdown is still running
    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(TimerHandle::is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    struct Probe {
        ticks: Arc<Mutex<Vec<u64>>>,
        expired: Arc<AtomicUsize>,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                ticks: Arc::new(Mutex::new(Vec::new())),
                expired: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn callbacks(&self) -> (impl FnMut(Tick) + Send + 'static, impl FnOnce(TimerId) + Send + 'static) {
            let ticks = Arc::clone(&self.ticks);
            let expired = Arc::clone(&self.expired);
            (
                move |tick: Tick| ticks.lock().unwrap().push(tick.remaining),
                move |_id: TimerId| {
                    expired.fetch_add(1, Ordering::SeqCst);
                },
            )
        }

        fn ticks(&self) -> Vec<u64> {
            self.ticks.lock().unwrap().clone()
        }

        fn expired(&self) -> usize {
            self.expired.load(Ordering::SeqCst)
        }
    }

    async fn advance_secs(secs: u64) {
        tokio::time::sleep(StdDuration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_then_expires_once() {
        for d in [1u64, 3, 20] {
            let probe = Probe::new();
            let (on_tick, on_expire) = probe.callbacks();
            let mut timer = PhaseTimer::new();
            timer.start(TimerKind::Preparation, Duration::from_secs(d), on_tick, on_expire);

            advance_secs(d + 5).await;

            let expected: Vec<u64> = (0..d).rev().collect();
            assert_eq!(probe.ticks(), expected, "duration {d}");
            assert_eq!(probe.expired(), 1, "duration {d}");
            assert!(!timer.is_active());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second() {
        let probe = Probe::new();
        let (on_tick, on_expire) = probe.callbacks();
        let mut timer = PhaseTimer::new();
        timer.start(TimerKind::Recording, Duration::from_secs(5), on_tick, on_expire);

        tokio::time::sleep(StdDuration::from_millis(2500)).await;
        assert_eq!(probe.ticks(), vec![4, 3]);
        assert_eq!(probe.expired(), 0);
        assert!(timer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_expires_without_ticks() {
        let probe = Probe::new();
        let (on_tick, on_expire) = probe.callbacks();
        let _handle = TimerHandle::spawn(TimerKind::Preparation, Duration::from_secs(0), on_tick, on_expire);

        advance_secs(1).await;
        assert!(probe.ticks().is_empty());
        assert_eq!(probe.expired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn starting_second_timer_silences_first() {
        let first = Probe::new();
        let second = Probe::new();
        let mut timer = PhaseTimer::new();

        let (on_tick, on_expire) = first.callbacks();
        let first_id = timer.start(TimerKind::Preparation, Duration::from_secs(5), on_tick, on_expire);
        tokio::time::sleep(StdDuration::from_millis(2500)).await;

        let (on_tick, on_expire) = second.callbacks();
        let second_id = timer.start(TimerKind::Recording, Duration::from_secs(2), on_tick, on_expire);
        assert!(!timer.owns(first_id));
        assert!(timer.owns(second_id));

        advance_secs(10).await;

        assert_eq!(first.ticks(), vec![4, 3]);
        assert_eq!(first.expired(), 0);
        assert_eq!(second.ticks(), vec![1, 0]);
        assert_eq!(second.expired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let probe = Probe::new();
        let (on_tick, on_expire) = probe.callbacks();
        let handle = TimerHandle::spawn(TimerKind::Preparation, Duration::from_secs(3), on_tick, on_expire);

        handle.cancel();
        handle.cancel();
        advance_secs(5).await;

        assert!(probe.ticks().is_empty());
        assert_eq!(probe.expired(), 0);
        assert!(!handle.is_active());

        // Cancelling after expiry is also a no-op
        let probe = Probe::new();
        let (on_tick, on_expire) = probe.callbacks();
        let handle = TimerHandle::spawn(TimerKind::Preparation, Duration::from_secs(1), on_tick, on_expire);
        advance_secs(2).await;
        handle.cancel();
        assert_eq!(probe.expired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_cancels() {
        let probe = Probe::new();
        let (on_tick, on_expire) = probe.callbacks();
        let mut timer = PhaseTimer::new();
        timer.start(TimerKind::Preparation, Duration::from_secs(3), on_tick, on_expire);
        drop(timer);

        advance_secs(5).await;
        assert!(probe.ticks().is_empty());
        assert_eq!(probe.expired(), 0);
    }

    #[test]
    fn timer_ids_are_unique() {
        assert_ne!(TimerId::fresh(), TimerId::fresh());
    }
}
