use std::thread;
use std::time::{Duration, Instant};

/// A handle to an active frame subscription.
///
/// Handles are owned: they can't be cloned and handing one back to [FrameClock::unsubscribe] consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct FrameSubscription {
    id: u64,
}

impl FrameSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A source of per-frame ticks.
pub trait FrameClock {
    /// The monotonic time elapsed since this clock's epoch.
    fn now(&self) -> Duration;

    /// Start delivering frames.
    fn subscribe(&mut self) -> FrameSubscription;

    /// Stop delivering frames for the given subscription.
    fn unsubscribe(&mut self, subscription: FrameSubscription);

    /// Wait for the next frame and return its timestamp.
    ///
    /// Returns `None` when there is no active subscription.
    fn wait_frame(&mut self) -> Option<Duration>;
}

/// Keeps track of the subscription currently being served.
#[derive(Debug, Default)]
struct Subscriptions {
    next_id: u64,
    active: Option<u64>,
}

impl Subscriptions {
    fn subscribe(&mut self) -> FrameSubscription {
        let id = self.next_id;
        self.next_id += 1;
        self.active = Some(id);
        FrameSubscription { id }
    }

    fn unsubscribe(&mut self, subscription: FrameSubscription) {
        if self.active == Some(subscription.id) {
            self.active = None;
        }
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

/// A frame clock backed by the system's monotonic clock, paced at a fixed frame rate.
#[derive(Debug)]
pub struct SystemFrameClock {
    epoch: Instant,
    frame_interval: Duration,
    next_frame: Option<Instant>,
    subscriptions: Subscriptions,
}

impl SystemFrameClock {
    pub fn new(frame_rate: u32) -> Self {
        let frame_interval = Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64);
        Self { epoch: Instant::now(), frame_interval, next_frame: None, subscriptions: Default::default() }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// The time left until the next frame is due, if there's an active subscription.
    pub fn time_to_next_frame(&self) -> Option<Duration> {
        let next = self.next_frame?;
        Some(next.saturating_duration_since(Instant::now()))
    }

    /// Mark the current frame as consumed without blocking and return its timestamp.
    ///
    /// This is meant for hosts that multiplex frames with other events and have already waited
    /// [SystemFrameClock::time_to_next_frame].
    pub fn consume_frame(&mut self) -> Option<Duration> {
        let next = self.next_frame.as_mut()?;
        let now = Instant::now();
        if now < *next {
            return None;
        }
        *next += self.frame_interval;
        // Don't try to catch up on frames we missed.
        if *next < now {
            *next = now + self.frame_interval;
        }
        Some(now.duration_since(self.epoch))
    }
}

impl Default for SystemFrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameClock for SystemFrameClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn subscribe(&mut self) -> FrameSubscription {
        self.next_frame = Some(Instant::now());
        self.subscriptions.subscribe()
    }

    fn unsubscribe(&mut self, subscription: FrameSubscription) {
        self.subscriptions.unsubscribe(subscription);
        if !self.subscriptions.is_active() {
            self.next_frame = None;
        }
    }

    fn wait_frame(&mut self) -> Option<Duration> {
        let wait = self.time_to_next_frame()?;
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        self.consume_frame()
    }
}

/// A frame clock that only moves when told to.
///
/// Every call to [FrameClock::wait_frame] advances time by a fixed step, which makes runs driven by this
/// clock fully deterministic.
#[derive(Debug)]
pub struct ManualClock {
    now: Duration,
    step: Duration,
    subscriptions: Subscriptions,
}

impl ManualClock {
    pub fn new(step: Duration) -> Self {
        Self { now: Duration::ZERO, step, subscriptions: Default::default() }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Jump to an absolute time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscriptions.is_active()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn subscribe(&mut self) -> FrameSubscription {
        self.subscriptions.subscribe()
    }

    fn unsubscribe(&mut self, subscription: FrameSubscription) {
        self.subscriptions.unsubscribe(subscription);
    }

    fn wait_frame(&mut self) -> Option<Duration> {
        if !self.subscriptions.is_active() {
            return None;
        }
        self.now += self.step;
        Some(self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_frames_only_while_subscribed() {
        let mut clock = ManualClock::new(Duration::from_millis(10));
        assert_eq!(clock.wait_frame(), None);

        let subscription = clock.subscribe();
        assert_eq!(clock.wait_frame(), Some(Duration::from_millis(10)));
        assert_eq!(clock.wait_frame(), Some(Duration::from_millis(20)));

        clock.unsubscribe(subscription);
        assert_eq!(clock.wait_frame(), None);
        assert_eq!(clock.now(), Duration::from_millis(20));
    }

    #[test]
    fn stale_subscription_does_not_cancel_newer_one() {
        let mut clock = ManualClock::default();
        let first = clock.subscribe();
        let second = clock.subscribe();
        assert_ne!(first.id(), second.id());

        clock.unsubscribe(first);
        assert!(clock.is_subscribed());
        clock.unsubscribe(second);
        assert!(!clock.is_subscribed());
    }

    #[test]
    fn system_clock_paces_frames() {
        let mut clock = SystemFrameClock::new(200);
        assert_eq!(clock.wait_frame(), None);

        let subscription = clock.subscribe();
        let first = clock.wait_frame().expect("no frame");
        let second = clock.wait_frame().expect("no frame");
        assert!(second > first);

        clock.unsubscribe(subscription);
        assert_eq!(clock.time_to_next_frame(), None);
    }
}
