use super::controls::{DemoAction, DemoControls, Focus};
use crate::clock::SystemFrameClock;
use crate::scramble::{Direction, GlyphGenerator, GlyphMode, ScrambleAnimator};
use crossterm::{
    QueueableCommand,
    cursor::{Hide, MoveTo, Show},
    event::{self, Event},
    execute,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fmt::Display;
use std::io::{self, Write};
use std::time::Duration;
use strum::IntoEnumIterator;
use unicode_width::UnicodeWidthStr;

/// How long to wait for input when nothing is animating.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Puts the terminal in raw mode on an alternate screen and restores it on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter<W: Write>(writer: &mut W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(writer, EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// The interactive screen used to configure and trigger the label's animation.
pub struct DemoScreen<W: Write> {
    writer: W,
    controls: DemoControls,
    animator: ScrambleAnimator<SystemFrameClock, String>,
}

impl<W: Write> DemoScreen<W> {
    pub fn new(writer: W, controls: DemoControls, clock: SystemFrameClock, glyphs: GlyphGenerator) -> Self {
        Self { writer, controls, animator: ScrambleAnimator::with_glyphs(clock, String::new(), glyphs) }
    }

    /// Run the screen until the user quits.
    pub fn run(mut self) -> io::Result<()> {
        let _guard = TerminalGuard::enter(&mut self.writer)?;
        self.draw()?;
        loop {
            let timeout = self.animator.clock().time_to_next_frame().unwrap_or(IDLE_POLL);
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    match self.controls.handle_key(key) {
                        DemoAction::Quit => break,
                        DemoAction::Trigger(config) => {
                            tracing::info!("decoding {:?}", config.text);
                            if let Err(e) = self.animator.start(config) {
                                tracing::warn!("could not start animation: {e}");
                            }
                        }
                        DemoAction::Redraw => (),
                        DemoAction::Nothing => continue,
                    };
                    self.draw()?;
                }
                continue;
            }
            if let Some(now) = self.animator.clock_mut().consume_frame() {
                self.animator.tick(now);
                self.draw()?;
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> io::Result<()> {
        let (columns, _) = terminal::size()?;
        let label = self.animator.sink().clone();
        let padding = (columns as usize).saturating_sub(label.width()) / 2;

        self.writer.queue(Clear(ClearType::All))?;
        self.writer.queue(MoveTo(2, 1))?.queue(Print("decode-label"))?;
        self.writer.queue(MoveTo(padding as u16, 4))?;
        self.writer.queue(SetAttribute(Attribute::Bold))?.queue(Print(&label))?;
        self.writer.queue(SetAttribute(Attribute::Reset))?;

        let focus = self.controls.focus;
        self.draw_segments(7, "Mode", focus == Focus::Mode, GlyphMode::iter(), self.controls.mode)?;
        self.draw_segments(8, "Start", focus == Focus::Direction, Direction::iter(), self.controls.direction)?;

        let slider = slider_bar(self.controls.duration_tenths, 20);
        let duration = format!("{slider} {}", self.controls.duration_label());
        self.draw_row(9, "Duration", focus == Focus::Duration, &duration)?;
        let text = format!("[{}]", self.controls.text);
        self.draw_row(10, "Text", focus == Focus::Text, &text)?;

        self.writer.queue(MoveTo(2, 12))?;
        self.writer.queue(Print("tab: next control  ←/→: adjust  enter: decode  esc: quit"))?;
        self.writer.flush()
    }

    fn draw_row(&mut self, row: u16, name: &str, focused: bool, value: &str) -> io::Result<()> {
        let marker = if focused { '>' } else { ' ' };
        self.writer.queue(MoveTo(2, row))?.queue(Print(format!("{marker} {name:<10}{value}")))?;
        Ok(())
    }

    fn draw_segments<T, I>(&mut self, row: u16, name: &str, focused: bool, segments: I, selected: T) -> io::Result<()>
    where
        T: Display + PartialEq,
        I: Iterator<Item = T>,
    {
        self.draw_row(row, name, focused, "")?;
        for segment in segments {
            self.writer.queue(Print(" "))?;
            if segment == selected {
                self.writer.queue(SetAttribute(Attribute::Reverse))?;
                self.writer.queue(Print(format!(" {segment} ")))?;
                self.writer.queue(SetAttribute(Attribute::Reset))?;
            } else {
                self.writer.queue(Print(format!(" {segment} ")))?;
            }
        }
        Ok(())
    }
}

/// Render the slider's track with its knob at the position for `tenths`.
fn slider_bar(tenths: u32, width: usize) -> String {
    let position = (tenths.saturating_sub(1) as usize * (width - 1)) / 99;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for index in 0..width {
        bar.push(if index == position { '●' } else { '─' });
    }
    bar.push(']');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::minimum(1, "[●───]")]
    #[case::maximum(100, "[───●]")]
    #[case::middle(50, "[─●──]")]
    fn slider(#[case] tenths: u32, #[case] expected: &str) {
        assert_eq!(slider_bar(tenths, 4), expected);
    }
}
