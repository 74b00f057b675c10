use crossterm::{
    QueueableCommand,
    cursor::MoveToColumn,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// Receives the text to be displayed on every frame.
pub trait DisplaySink {
    fn set_text(&mut self, text: &str);
}

impl DisplaySink for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// A sink that keeps every frame it's given.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    frames: Vec<String>,
}

impl RecordingSink {
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl DisplaySink for RecordingSink {
    fn set_text(&mut self, text: &str) {
        self.frames.push(text.to_string());
    }
}

/// A label that occupies the current line of a terminal, redrawn in place on every frame.
pub struct TerminalLine<W: Write> {
    writer: W,
    current: String,
}

impl<W: Write> TerminalLine<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, current: String::new() }
    }

    /// The text that was last drawn.
    pub fn text(&self) -> &str {
        &self.current
    }

    /// Leave the label's line and move to the next one.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.queue(Print("\r\n"))?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.writer.queue(MoveToColumn(0))?;
        self.writer.queue(Clear(ClearType::CurrentLine))?;
        self.writer.queue(Print(&self.current))?;
        self.writer.flush()
    }
}

impl<W: Write> DisplaySink for TerminalLine<W> {
    fn set_text(&mut self, text: &str) {
        self.current.clear();
        self.current.push_str(text);
        // The sink contract is infallible, a broken terminal shows up on the next explicit write.
        if let Err(e) = self.redraw() {
            tracing::warn!("failed to draw label: {e}");
        }
    }
}
