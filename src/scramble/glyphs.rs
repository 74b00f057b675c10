use super::GlyphMode;
use std::ops::RangeInclusive;

/// Symbols between 'Z' and 'a', never produced by latin glyphs.
const LATIN_GAP: RangeInclusive<u32> = 91..=96;

impl GlyphMode {
    /// The closed codepoint range glyphs for this mode are drawn from.
    pub fn codepoints(&self) -> RangeInclusive<u32> {
        match self {
            Self::Default => 33..=126,
            Self::Digit => 48..=57,
            Self::Latin => 65..=122,
            Self::Cjk => 13312..=40911,
        }
    }

    fn accepts(&self, codepoint: u32) -> bool {
        match self {
            Self::Latin => !LATIN_GAP.contains(&codepoint),
            _ => true,
        }
    }
}

/// Generates stand-in glyphs for scrambled positions.
#[derive(Debug, Clone)]
pub struct GlyphGenerator {
    rng: fastrand::Rng,
}

impl GlyphGenerator {
    /// Create a generator seeded from the system's entropy.
    pub fn new() -> Self {
        Self { rng: fastrand::Rng::new() }
    }

    /// Create a generator that always yields the same sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: fastrand::Rng::with_seed(seed) }
    }

    /// Draw a single glyph for the given mode.
    pub fn glyph(&mut self, mode: GlyphMode) -> char {
        let range = mode.codepoints();
        loop {
            let codepoint = self.rng.u32(range.clone());
            if !mode.accepts(codepoint) {
                continue;
            }
            // Resample on an invalid codepoint.
            if let Some(ch) = char::from_u32(codepoint) {
                return ch;
            }
        }
    }
}

impl Default for GlyphGenerator {
    fn default() -> Self {
        Self::new()
    }
}
