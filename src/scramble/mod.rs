mod animator;
mod frame;
mod glyphs;

pub use animator::{AnimationConfig, AnimationError, DisplayUpdate, RunState, ScrambleAnimator};
pub use glyphs::GlyphGenerator;

use serde::Deserialize;

/// The character class stand-in glyphs are drawn from.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Hash, strum::EnumIter, strum::Display, clap::ValueEnum)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum GlyphMode {
    /// Printable ASCII: letters, digits and symbols.
    #[default]
    #[strum(to_string = "Default")]
    Default,

    /// ASCII digits.
    #[strum(to_string = "Digit")]
    Digit,

    /// ASCII letters, both cases.
    #[strum(to_string = "Latin")]
    Latin,

    /// CJK unified ideographs (extension A and the base block).
    #[strum(to_string = "CJK")]
    Cjk,
}

/// The end of the text that settles first.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Hash, strum::EnumIter, strum::Display, clap::ValueEnum)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Settle from the first character towards the last.
    #[default]
    #[strum(to_string = "First")]
    Forward,

    /// Settle from the last character towards the first.
    #[strum(to_string = "Last")]
    Backward,
}
