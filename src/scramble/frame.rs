use super::{Direction, GlyphGenerator, GlyphMode};
use std::collections::HashSet;
use std::ops::Range;

/// The split of a text into its settled and scrambled positions for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FrameSplit {
    pub(crate) settled: Range<usize>,
    pub(crate) scrambled: Range<usize>,
}

impl FrameSplit {
    /// Split `length` characters so that `scrambled` of them are still scrambled.
    ///
    /// Going forward the settled text is the head and the scrambled region the tail, going backward it's
    /// the other way around.
    pub(crate) fn new(length: usize, scrambled: usize, direction: Direction) -> Self {
        let scrambled = scrambled.min(length);
        let boundary = match direction {
            Direction::Forward => length - scrambled,
            Direction::Backward => scrambled,
        };
        match direction {
            Direction::Forward => Self { settled: 0..boundary, scrambled: boundary..length },
            Direction::Backward => Self { settled: boundary..length, scrambled: 0..boundary },
        }
    }
}

/// Builds the display string for a single frame.
pub(crate) struct FrameComposer<'a> {
    pub(crate) content: &'a [char],
    pub(crate) whitelist: &'a HashSet<char>,
    pub(crate) mode: GlyphMode,
}

impl FrameComposer<'_> {
    /// Compose the frame for the given split, drawing glyphs for every scrambled position that isn't
    /// whitelisted.
    pub(crate) fn compose(&self, split: &FrameSplit, glyphs: &mut GlyphGenerator) -> String {
        let mut output = String::with_capacity(self.content.len());
        let settled = &self.content[split.settled.clone()];
        let scrambled = self.content[split.scrambled.clone()].iter().map(|ch| {
            if self.whitelist.contains(ch) { *ch } else { glyphs.glyph(self.mode) }
        });
        // Both regions are contiguous so the output is just the two of them in index order.
        if split.settled.start == 0 {
            output.extend(settled);
            output.extend(scrambled);
        } else {
            output.extend(scrambled);
            output.extend(settled);
        }
        output
    }

    /// The number of whitelisted characters within the settled region.
    pub(crate) fn settled_whitelisted(&self, split: &FrameSplit) -> usize {
        self.content[split.settled.clone()].iter().filter(|ch| self.whitelist.contains(ch)).count()
    }
}
