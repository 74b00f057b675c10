//! The interactive screen used to try out the decoding label.

mod controls;
mod screen;

pub use controls::{DemoAction, DemoControls, Focus};
pub use screen::DemoScreen;
