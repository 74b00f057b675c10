use crate::config::Config;
use crate::scramble::{AnimationConfig, Direction, GlyphMode};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashSet;
use std::time::Duration;
use strum::IntoEnumIterator;

/// The slider's range, in tenths of a second.
const MIN_DURATION_TENTHS: u32 = 1;
const MAX_DURATION_TENTHS: u32 = 100;

/// The control that currently receives input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum Focus {
    Mode,
    Direction,
    Duration,
    Text,
}

/// What the screen should do after a key press.
#[derive(Clone, Debug, PartialEq)]
pub enum DemoAction {
    Nothing,
    Redraw,
    Trigger(AnimationConfig),
    Quit,
}

/// The state of every control on the demo screen.
#[derive(Clone, Debug)]
pub struct DemoControls {
    pub(crate) mode: GlyphMode,
    pub(crate) direction: Direction,
    pub(crate) duration_tenths: u32,
    pub(crate) text: String,
    pub(crate) focus: Focus,
    whitelist: HashSet<char>,
}

impl DemoControls {
    pub fn new(config: &Config, whitelist: HashSet<char>) -> Self {
        let tenths = (config.defaults.duration * 10.0).round();
        let tenths = tenths.clamp(MIN_DURATION_TENTHS as f64, MAX_DURATION_TENTHS as f64);
        Self {
            mode: config.defaults.mode,
            direction: config.defaults.direction,
            duration_tenths: tenths as u32,
            text: String::new(),
            focus: Focus::Text,
            whitelist,
        }
    }

    /// Prefill the text field.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_tenths as u64 * 100)
    }

    /// The slider's label, e.g. `2.5 s`.
    pub fn duration_label(&self) -> String {
        format!("{:.1} s", self.duration_tenths as f64 / 10.0)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DemoAction {
        if key.kind != KeyEventKind::Press {
            return DemoAction::Nothing;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => DemoAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => DemoAction::Quit,
            (KeyCode::Enter, _) => self.trigger(),
            (KeyCode::Tab, _) => {
                self.focus = cycle(self.focus, 1);
                DemoAction::Redraw
            }
            (KeyCode::BackTab, _) => {
                self.focus = cycle(self.focus, -1);
                DemoAction::Redraw
            }
            (KeyCode::Left, _) => self.adjust(-1),
            (KeyCode::Right, _) => self.adjust(1),
            (KeyCode::Backspace, _) if self.focus == Focus::Text => {
                self.text.pop();
                DemoAction::Redraw
            }
            (KeyCode::Char(c), modifiers)
                if self.focus == Focus::Text && !modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.text.push(c);
                DemoAction::Redraw
            }
            _ => DemoAction::Nothing,
        }
    }

    fn adjust(&mut self, step: isize) -> DemoAction {
        match self.focus {
            Focus::Mode => self.mode = cycle(self.mode, step),
            Focus::Direction => self.direction = cycle(self.direction, step),
            Focus::Duration => {
                let tenths = self.duration_tenths.saturating_add_signed(step as i32);
                self.duration_tenths = tenths.clamp(MIN_DURATION_TENTHS, MAX_DURATION_TENTHS);
            }
            Focus::Text => return DemoAction::Nothing,
        };
        DemoAction::Redraw
    }

    fn trigger(&self) -> DemoAction {
        if self.text.trim().is_empty() {
            return DemoAction::Nothing;
        }
        let config = AnimationConfig::new(self.text.clone())
            .duration(self.duration())
            .mode(self.mode)
            .direction(self.direction)
            .whitelist(self.whitelist.iter().copied());
        DemoAction::Trigger(config)
    }
}

/// Move `step` positions through an enum's variants, wrapping around at both ends.
fn cycle<T: IntoEnumIterator + PartialEq + Copy>(current: T, step: isize) -> T {
    let variants: Vec<T> = T::iter().collect();
    let index = variants.iter().position(|v| *v == current).unwrap_or(0) as isize;
    let next = (index + step).rem_euclid(variants.len() as isize);
    variants[next as usize]
}
