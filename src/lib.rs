//! A terminal label that reveals its text with a "decoding" animation.
//!
//! Positions that haven't settled yet show random glyphs, while settled ones show the target text. See
//! [ScrambleAnimator] for the timing model.

pub mod clock;
pub mod config;
pub mod demo;
pub mod scramble;
pub mod sink;

pub use clock::{FrameClock, FrameSubscription, ManualClock, SystemFrameClock};
pub use config::{Config, ConfigLoadError};
pub use scramble::{AnimationConfig, AnimationError, Direction, DisplayUpdate, GlyphMode, RunState, ScrambleAnimator};
pub use sink::{DisplaySink, RecordingSink, TerminalLine};
