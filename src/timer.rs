//! Per-question countdown.
//!
//! The countdown runs as a tokio task ticking once per second. Every tick
//! publishes a [`TimerSnapshot`] on a watch channel so the UI can redraw the
//! gauge without polling. When the countdown hits zero the timer stops itself
//! first and only then calls the timeout callback, so the callback may call
//! [`Timer::restart`] directly.
//!
//! Each `start` bumps a generation counter under the same lock that owns the
//! task handle. A tick that was already scheduled when `stop` ran sees a newer
//! generation and is discarded instead of touching the new countdown.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Seconds per question unless configured otherwise.
pub const DEFAULT_SECONDS: u32 = 15;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Progress above which the countdown is shown as calm.
const CALM_THRESHOLD: f64 = 0.6;
/// Progress above which the countdown is shown as a warning.
const WARNING_THRESHOLD: f64 = 0.3;

/// Observable countdown state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerSnapshot {
    pub seconds_remaining: u32,
    /// `seconds_remaining / duration`, from 1.0 down to 0.0.
    pub progress: f64,
}

impl TimerSnapshot {
    fn at(seconds_remaining: u32, duration: u32) -> Self {
        Self {
            seconds_remaining,
            progress: f64::from(seconds_remaining) / f64::from(duration),
        }
    }
}

/// How close the countdown is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUrgency {
    Calm,
    Warning,
    Critical,
}

impl TimerUrgency {
    pub fn from_progress(progress: f64) -> Self {
        if progress > CALM_THRESHOLD {
            Self::Calm
        } else if progress > WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

type TimeoutCallback = Box<dyn FnMut() + Send + 'static>;

#[derive(Default)]
struct Countdown {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Countdown {
    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

enum Tick {
    Stale,
    Running,
    Expired,
}

struct Shared {
    duration: u32,
    state: watch::Sender<TimerSnapshot>,
    countdown: Mutex<Countdown>,
    on_timeout: Mutex<Option<TimeoutCallback>>,
}

impl Shared {
    fn countdown(&self) -> MutexGuard<'_, Countdown> {
        self.countdown.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn callback(&self) -> MutexGuard<'_, Option<TimeoutCallback>> {
        self.on_timeout.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(&self, generation: u64) -> Tick {
        let mut countdown = self.countdown();
        if countdown.generation != generation {
            return Tick::Stale;
        }

        let remaining = self.state.borrow().seconds_remaining.saturating_sub(1);
        self.state
            .send_replace(TimerSnapshot::at(remaining, self.duration));

        if remaining > 0 {
            return Tick::Running;
        }

        // Stopped before notifying: the task must not abort itself here.
        countdown.generation = countdown.generation.wrapping_add(1);
        countdown.task = None;
        Tick::Expired
    }

    fn fire_timeout(&self) {
        let callback = self.callback().take();
        if let Some(mut callback) = callback {
            callback();
            let mut slot = self.callback();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

/// Cancelable one-tick-per-second countdown.
///
/// Cloning yields another handle to the same countdown. Starting requires a
/// tokio runtime.
#[derive(Clone)]
pub struct Timer {
    shared: Arc<Shared>,
}

impl Timer {
    pub fn new(duration_seconds: u32) -> Self {
        let duration = duration_seconds.max(1);
        let (state, _) = watch::channel(TimerSnapshot::at(duration, duration));

        Self {
            shared: Arc::new(Shared {
                duration,
                state,
                countdown: Mutex::new(Countdown::default()),
                on_timeout: Mutex::new(None),
            }),
        }
    }

    /// Cancel any running countdown and begin a fresh one from full time.
    pub fn start(&self) {
        let mut countdown = self.shared.countdown();
        countdown.cancel();

        let generation = countdown.generation;
        let duration = self.shared.duration;
        self.shared
            .state
            .send_replace(TimerSnapshot::at(duration, duration));

        let shared = Arc::clone(&self.shared);
        countdown.task = Some(tokio::spawn(run_countdown(shared, generation)));
        tracing::debug!(duration, generation, "timer started");
    }

    /// Cancel the countdown. Does nothing when it is not running.
    pub fn stop(&self) {
        let mut countdown = self.shared.countdown();
        if countdown.task.is_some() {
            tracing::debug!(generation = countdown.generation, "timer stopped");
        }
        countdown.cancel();
    }

    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    /// Register the timeout callback, replacing any previous one.
    pub fn set_on_timeout<F>(&self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        *self.shared.callback() = Some(Box::new(callback));
    }

    /// Receive every change of the countdown state.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.shared.state.subscribe()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        *self.shared.state.borrow()
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.snapshot().seconds_remaining
    }

    pub fn progress(&self) -> f64 {
        self.snapshot().progress
    }

    pub fn urgency(&self) -> TimerUrgency {
        TimerUrgency::from_progress(self.progress())
    }

    pub fn duration(&self) -> u32 {
        self.shared.duration
    }

    pub fn is_running(&self) -> bool {
        self.shared.countdown().task.is_some()
    }
}

async fn run_countdown(shared: Arc<Shared>, generation: u64) {
    let mut ticks = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        ticks.tick().await;

        match shared.tick(generation) {
            Tick::Stale => return,
            Tick::Running => {}
            Tick::Expired => {
                tracing::info!("question timer expired");
                shared.fire_timeout();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_timer(duration: u32) -> (Timer, Arc<AtomicUsize>) {
        let timer = Timer::new(duration);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        timer.set_on_timeout(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (timer, fired)
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_countdown_fires_once() {
        let (timer, fired) = counting_timer(DEFAULT_SECONDS);
        timer.start();
        assert!(timer.is_running());
        assert_eq!(timer.seconds_remaining(), 15);
        assert_eq!(timer.progress(), 1.0);

        time::sleep(Duration::from_millis(15_500)).await;

        assert_eq!(timer.seconds_remaining(), 0);
        assert_eq!(timer.progress(), 0.0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!timer.is_running());

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timeout() {
        let (timer, fired) = counting_timer(15);
        timer.start();
        time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(timer.seconds_remaining(), 10);

        timer.stop();
        timer.stop();
        time::sleep(Duration::from_secs(20)).await;

        assert_eq!(timer.seconds_remaining(), 10);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_countdown() {
        let (timer, fired) = counting_timer(15);
        timer.start();
        time::sleep(Duration::from_millis(7_500)).await;
        assert_eq!(timer.seconds_remaining(), 8);

        timer.restart();
        assert_eq!(timer.seconds_remaining(), 15);
        assert_eq!(timer.progress(), 1.0);

        time::sleep(Duration::from_millis(10_250)).await;
        assert_eq!(timer.seconds_remaining(), 5);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_secs(6)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_from_previous_generation_is_ignored() {
        let (timer, fired) = counting_timer(10);
        timer.start();
        let old_generation = timer.shared.countdown().generation;

        timer.restart();
        let generation = timer.shared.countdown().generation;
        assert_ne!(old_generation, generation);

        assert!(matches!(timer.shared.tick(old_generation), Tick::Stale));
        assert_eq!(timer.seconds_remaining(), 10);
        assert!(timer.is_running());

        assert!(matches!(timer.shared.tick(generation), Tick::Running));
        assert_eq!(timer.seconds_remaining(), 9);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_every_tick() {
        let timer = Timer::new(3);
        let mut rx = timer.subscribe();
        timer.start();

        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let snapshot = *rx.borrow_and_update();
            seen.push(snapshot.seconds_remaining);
            if snapshot.seconds_remaining == 0 {
                break;
            }
        }

        assert_eq!(seen, vec![3, 2, 1, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_can_restart_timer() {
        let timer = Timer::new(2);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let handle = timer.clone();
        timer.set_on_timeout(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            handle.restart();
        });

        timer.start();
        time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(timer.is_running());
        assert_eq!(timer.seconds_remaining(), 2);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacing_callback_discards_old_one() {
        let (timer, first) = counting_timer(1);
        let second = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&second);
        timer.set_on_timeout(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        timer.start();
        time::sleep(Duration::from_millis(1_500)).await;

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_urgency_bands() {
        assert_eq!(TimerUrgency::from_progress(1.0), TimerUrgency::Calm);
        assert_eq!(TimerUrgency::from_progress(0.6), TimerUrgency::Warning);
        assert_eq!(TimerUrgency::from_progress(0.31), TimerUrgency::Warning);
        assert_eq!(TimerUrgency::from_progress(0.3), TimerUrgency::Critical);
        assert_eq!(TimerUrgency::from_progress(0.0), TimerUrgency::Critical);
    }

    #[test]
    fn test_zero_duration_is_clamped() {
        let timer = Timer::new(0);
        assert_eq!(timer.duration(), 1);
        assert_eq!(timer.seconds_remaining(), 1);
        assert!(!timer.is_running());
    }
}
