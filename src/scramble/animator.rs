use super::frame::{FrameComposer, FrameSplit};
use super::{Direction, GlyphGenerator, GlyphMode};
use crate::clock::{FrameClock, FrameSubscription};
use crate::sink::DisplaySink;
use std::collections::HashSet;
use std::time::Duration;

/// The default length of a run.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(3);

/// Everything needed to run a decoding animation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    /// The text being revealed.
    pub text: String,
    /// How long it takes to reveal the whole text.
    pub duration: Duration,
    /// The class of glyphs used for scrambled positions.
    pub mode: GlyphMode,
    /// The end of the text that settles first.
    pub direction: Direction,
    /// Characters that are never scrambled.
    pub whitelist: HashSet<char>,
}

impl AnimationConfig {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            duration: DEFAULT_DURATION,
            mode: GlyphMode::default(),
            direction: Direction::default(),
            whitelist: HashSet::new(),
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn mode(mut self, mode: GlyphMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn whitelist<I: IntoIterator<Item = char>>(mut self, whitelist: I) -> Self {
        self.whitelist = whitelist.into_iter().collect();
        self
    }
}

/// The outcome of a single tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayUpdate {
    /// The text displayed for this frame.
    pub text: String,
    /// The number of positions still scrambled.
    pub scrambled: usize,
    /// The state of the run after this frame.
    pub state: RunState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// More frames will follow.
    Running,

    /// This was the final frame, the text is fully settled.
    Done,
}

/// Errors produced when starting an animation.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AnimationError {
    #[error("animation duration must be positive, got {0:?}")]
    InvalidDuration(Duration),
}

/// Transient state of the run in progress.
#[derive(Debug)]
struct ActiveRun {
    start_time: Duration,
    /// Time credited for whitelisted characters that have settled.
    compensation: Duration,
    /// How many whitelisted characters the compensation accounts for.
    credited: usize,
    interval: Duration,
    subscription: FrameSubscription,
}

impl ActiveRun {
    /// The number of positions out of `length` still scrambled `elapsed` into a run that lasts `total`.
    fn scrambled(&self, length: usize, elapsed: Duration, total: Duration) -> usize {
        if elapsed.saturating_add(self.compensation) >= total {
            return 0;
        }
        // Same as dividing `elapsed + compensation` by the interval, as the compensation is a whole number
        // of intervals.
        let settled = (elapsed.as_nanos() / self.interval.as_nanos()) as usize + self.credited;
        length.saturating_sub(settled)
    }

    fn credit(&mut self, whitelisted: usize) {
        self.credited = whitelisted;
        self.compensation = self.interval.saturating_mul(whitelisted as u32);
    }
}

/// Animates a label towards a target text, scrambling the positions that haven't settled yet.
///
/// The animator owns a [FrameClock] it subscribes to while a run is active, and pushes every frame it
/// computes into a [DisplaySink].
pub struct ScrambleAnimator<C: FrameClock, S: DisplaySink> {
    clock: C,
    sink: S,
    glyphs: GlyphGenerator,
    config: Option<AnimationConfig>,
    /// The characters of the configured text.
    content: Vec<char>,
    run: Option<ActiveRun>,
}

impl<C: FrameClock, S: DisplaySink> ScrambleAnimator<C, S> {
    pub fn new(clock: C, sink: S) -> Self {
        Self::with_glyphs(clock, sink, GlyphGenerator::new())
    }

    /// Construct an animator that uses the given glyph generator, e.g. a seeded one.
    pub fn with_glyphs(clock: C, sink: S, glyphs: GlyphGenerator) -> Self {
        Self { clock, sink, glyphs, config: None, content: Vec::new(), run: None }
    }

    /// Start animating towards the given configuration, replacing any run in progress.
    ///
    /// An empty text doesn't start a run: the sink is cleared right away.
    pub fn start(&mut self, config: AnimationConfig) -> Result<(), AnimationError> {
        if config.duration.is_zero() {
            return Err(AnimationError::InvalidDuration(config.duration));
        }
        self.cancel();

        self.content = config.text.chars().collect();
        if self.content.is_empty() {
            tracing::debug!("empty text, nothing to animate");
            self.sink.set_text("");
            self.config = Some(config);
            return Ok(());
        }
        let interval_nanos = (config.duration.as_nanos() / self.content.len() as u128).max(1);
        let interval = Duration::from_nanos(u64::try_from(interval_nanos).unwrap_or(u64::MAX));
        tracing::debug!(
            "starting run: {} characters over {:?}, mode {}, direction {}",
            self.content.len(),
            config.duration,
            config.mode,
            config.direction
        );
        let start_time = self.clock.now();
        let subscription = self.clock.subscribe();
        self.run = Some(ActiveRun { start_time, compensation: Duration::ZERO, credited: 0, interval, subscription });
        self.config = Some(config);
        Ok(())
    }

    /// Stop the run in progress, if any. The last displayed text is left as is.
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            tracing::debug!("cancelling run");
            self.clock.unsubscribe(run.subscription);
        }
    }

    /// Compute the frame for the given timestamp and push it into the sink.
    ///
    /// Returns `None` if there's no run in progress.
    pub fn tick(&mut self, now: Duration) -> Option<DisplayUpdate> {
        let config = self.config.as_ref()?;
        let run = self.run.as_mut()?;
        let total = config.duration;
        let elapsed = now.saturating_sub(run.start_time);
        let length = self.content.len();
        let composer = FrameComposer { content: &self.content, whitelist: &config.whitelist, mode: config.mode };

        // Crediting whitelisted characters can settle more characters, which may be whitelisted too, so
        // keep going until nothing new settles. The settled region only grows so this ends within
        // `length` rounds.
        let split = loop {
            let split = FrameSplit::new(length, run.scrambled(length, elapsed, total), config.direction);
            let whitelisted = composer.settled_whitelisted(&split);
            if whitelisted <= run.credited {
                break split;
            }
            run.credit(whitelisted);
        };
        let done = elapsed.saturating_add(run.compensation) >= total;
        let compensation = run.compensation;

        let text = composer.compose(&split, &mut self.glyphs);
        let scrambled = split.scrambled.len();
        self.sink.set_text(&text);

        let state = if done {
            tracing::debug!("run completed at {now:?} with {compensation:?} of whitelist compensation");
            self.cancel();
            RunState::Done
        } else {
            RunState::Running
        };
        Some(DisplayUpdate { text, scrambled, state })
    }

    /// Drive the run in progress to completion using the clock's frames.
    ///
    /// Returns the final text, or `None` if there was no run in progress.
    pub fn run_to_completion(&mut self) -> Option<String> {
        let mut last = None;
        while self.run.is_some() {
            let now = self.clock.wait_frame()?;
            if let Some(update) = self.tick(now) {
                last = Some(update.text);
            }
        }
        last
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// The configuration of the current or most recent run.
    pub fn config(&self) -> Option<&AnimationConfig> {
        self.config.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Take the animator apart, cancelling any run in progress.
    pub fn into_parts(mut self) -> (C, S) {
        self.cancel();
        (self.clock, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::RecordingSink;
    use rstest::rstest;

    type TestAnimator = ScrambleAnimator<ManualClock, RecordingSink>;

    fn animator() -> TestAnimator {
        ScrambleAnimator::with_glyphs(ManualClock::default(), RecordingSink::default(), GlyphGenerator::with_seed(1337))
    }

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn final_frame_is_the_text() {
        let mut animator = animator();
        animator.start(AnimationConfig::new("decoding").duration(millis(800))).expect("start failed");

        let update = animator.tick(millis(799)).expect("no update");
        assert_eq!(update.state, RunState::Running);
        assert_eq!(update.scrambled, 1);

        let update = animator.tick(millis(800)).expect("no update");
        assert_eq!(update.text, "decoding");
        assert_eq!(update.scrambled, 0);
        assert_eq!(update.state, RunState::Done);
        assert!(!animator.is_running());
        assert!(!animator.clock().is_subscribed());
        assert_eq!(animator.tick(millis(900)), None);
        assert_eq!(animator.sink().last(), Some("decoding"));
    }

    #[test]
    fn everything_scrambled_at_start() {
        let mut animator = animator();
        animator.start(AnimationConfig::new("abcdef").mode(GlyphMode::Digit)).expect("start failed");

        let update = animator.tick(Duration::ZERO).expect("no update");
        assert_eq!(update.scrambled, 6);
        assert!(update.text.chars().all(|c| c.is_ascii_digit()), "{}", update.text);
    }

    #[rstest]
    #[case::first_interval(249, 4)]
    #[case::one_settled(250, 3)]
    #[case::two_settled(600, 2)]
    #[case::three_settled(999, 1)]
    fn settles_one_character_per_interval(#[case] at: u64, #[case] scrambled: usize) {
        let mut animator = animator();
        animator.start(AnimationConfig::new("wxyz").duration(millis(1000))).expect("start failed");
        let update = animator.tick(millis(at)).expect("no update");
        assert_eq!(update.scrambled, scrambled);
        assert!(update.text.starts_with(&"wxyz"[..4 - scrambled]));
    }

    #[test]
    fn disjoint_whitelist_keeps_duration() {
        let mut animator = animator();
        let config = AnimationConfig::new("abc").duration(millis(300)).whitelist(['.', '%']);
        animator.start(config).expect("start failed");

        assert_eq!(animator.tick(millis(299)).expect("no update").state, RunState::Running);
        assert_eq!(animator.tick(millis(300)).expect("no update").state, RunState::Done);
    }

    #[test]
    fn fully_whitelisted_text_is_never_scrambled() {
        let mut animator = animator();
        let config = AnimationConfig::new("...,,").duration(millis(500)).whitelist(['.', ',']);
        animator.start(config).expect("start failed");

        let update = animator.tick(Duration::ZERO).expect("no update");
        assert_eq!(update.text, "...,,");
        assert_eq!(update.state, RunState::Running);

        // The first settled character cascades through the rest of the text.
        let update = animator.tick(millis(100)).expect("no update");
        assert_eq!(update.text, "...,,");
        assert_eq!(update.state, RunState::Done);
    }

    #[test]
    fn whitelisted_characters_do_not_stall() {
        let mut animator = animator();
        let config = AnimationConfig::new("a.b.").duration(millis(400)).whitelist(['.']);
        animator.start(config).expect("start failed");

        let update = animator.tick(millis(100)).expect("no update");
        assert_eq!(update.scrambled, 3);
        assert!(update.text.starts_with('a'));
        assert_eq!(update.text.chars().nth(1), Some('.'));

        // The '.' settling is credited so 'b' settles along with it.
        let update = animator.tick(millis(200)).expect("no update");
        assert_eq!(update.scrambled, 1);
        assert_eq!(update.text, "a.b.");
        assert_eq!(update.state, RunState::Running);

        // Both whitelisted characters are credited, so the run ends before its nominal duration.
        let update = animator.tick(millis(300)).expect("no update");
        assert_eq!(update.text, "a.b.");
        assert_eq!(update.state, RunState::Done);
    }

    #[test]
    fn whitelist_kept_while_scrambled() {
        let mut animator = animator();
        let config =
            AnimationConfig::new("AB1.").duration(millis(2000)).mode(GlyphMode::Digit).whitelist(['.']);
        animator.start(config).expect("start failed");

        let update = animator.tick(Duration::ZERO).expect("no update");
        let output: Vec<char> = update.text.chars().collect();
        assert_eq!(output.len(), 4);
        assert!(output[..3].iter().all(char::is_ascii_digit), "{}", update.text);
        assert_eq!(output[3], '.');
    }

    #[test]
    fn backward_keeps_length() {
        let mut animator = animator();
        let config = AnimationConfig::new("hi").duration(millis(1000)).direction(Direction::Backward);
        animator.start(config).expect("start failed");

        let final_text = animator.run_to_completion().expect("no frames");
        assert_eq!(final_text, "hi");
        let frames = animator.sink().frames();
        assert!(frames.len() > 2);
        assert!(frames.iter().all(|f| f.chars().count() == 2));
    }

    #[test]
    fn backward_settles_tail_first() {
        let mut animator = animator();
        let config =
            AnimationConfig::new("abcd").duration(millis(400)).direction(Direction::Backward).mode(GlyphMode::Digit);
        animator.start(config).expect("start failed");

        let update = animator.tick(millis(250)).expect("no update");
        assert_eq!(update.scrambled, 2);
        assert!(update.text.ends_with("cd"));
        assert!(update.text.chars().take(2).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn directions_split_alike() {
        let mut forward = animator();
        let mut backward = animator();
        forward.start(AnimationConfig::new("symmetric").duration(millis(900))).expect("start failed");
        backward
            .start(AnimationConfig::new("symmetric").duration(millis(900)).direction(Direction::Backward))
            .expect("start failed");

        for at in (0..=900).step_by(37) {
            let left = forward.tick(millis(at));
            let right = backward.tick(millis(at));
            assert_eq!(left.map(|u| u.scrambled), right.map(|u| u.scrambled), "at {at}ms");
        }
    }

    #[rstest]
    #[case::single("x")]
    #[case::ascii("Hello, world!")]
    #[case::wide("解碼中")]
    #[case::mixed("100% done.")]
    fn runs_end_in_text(#[case] text: &str) {
        let mut animator = animator();
        let config = AnimationConfig::new(text).duration(millis(250)).mode(GlyphMode::Cjk).whitelist(['%', '.']);
        animator.start(config).expect("start failed");
        assert_eq!(animator.run_to_completion().as_deref(), Some(text));
    }

    #[test]
    fn empty_text_is_idle() {
        let mut animator = animator();
        animator.sink_mut().set_text("stale");
        animator.start(AnimationConfig::new("")).expect("start failed");

        assert!(!animator.is_running());
        assert!(!animator.clock().is_subscribed());
        assert_eq!(animator.sink().last(), Some(""));
        assert_eq!(animator.tick(millis(10)), None);
        assert_eq!(animator.run_to_completion(), None);
    }

    #[test]
    fn zero_duration_rejected() {
        let mut animator = animator();
        let result = animator.start(AnimationConfig::new("abc").duration(Duration::ZERO));
        assert_eq!(result, Err(AnimationError::InvalidDuration(Duration::ZERO)));
        assert!(!animator.is_running());
    }

    #[test]
    fn restart_replaces_run() {
        let mut animator = animator();
        animator.start(AnimationConfig::new("first").duration(millis(100))).expect("start failed");
        animator.clock_mut().set(millis(50));
        animator.start(AnimationConfig::new("second").duration(millis(600))).expect("start failed");

        // Time is measured from the second start.
        let update = animator.tick(millis(150)).expect("no update");
        assert_eq!(update.scrambled, 5);
        assert!(update.text.starts_with('s'));
        assert_eq!(animator.config().map(|c| c.text.as_str()), Some("second"));
        assert!(animator.clock().is_subscribed());
    }

    #[test]
    fn cancel_stops_ticks() {
        let mut animator = animator();
        animator.start(AnimationConfig::new("abc")).expect("start failed");
        animator.tick(millis(10)).expect("no update");

        animator.cancel();
        assert!(!animator.is_running());
        assert!(!animator.clock().is_subscribed());
        assert_eq!(animator.tick(millis(20)), None);
        assert!(animator.config().is_some());
    }

    #[test]
    fn cancel_resets_compensation() {
        let mut animator = animator();
        let config = AnimationConfig::new(".ab").duration(millis(300)).whitelist(['.']);
        animator.start(config.clone()).expect("start failed");
        assert_eq!(animator.tick(millis(100)).expect("no update").scrambled, 1);

        animator.cancel();
        animator.clock_mut().set(millis(1000));
        animator.start(config).expect("start failed");
        let update = animator.tick(millis(1000)).expect("no update");
        assert_eq!(update.scrambled, 3);
    }
}
