//! Wizard controller: step sequencing plus the message-rotation and loading-handoff timers.

pub mod controller;
pub mod events;
pub mod scenario;
mod timers;

pub use controller::{Timings, WizardController};
pub use events::{NullSink, TransitionSink, WizardEvent};
