// Transition effects for the terminal wizard
//
// Linear progress only. Each screen slot holds at most one running effect; a new effect on the
// same slot replaces the old one.

use crate::models::state::WizardPhase;
use crate::wizard::WizardEvent;
use ratatui::style::{Color, Style};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const SCALE_DURATION: Duration = Duration::from_millis(350);
pub const SLIDE_DURATION: Duration = Duration::from_millis(300);
pub const FADE_DURATION: Duration = Duration::from_millis(250);

/// Rows a question travels while sliding in.
pub const SLIDE_ROWS: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Scale,
    SlideUp,
    FadeIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Content,
    Overlay,
    Confirm,
}

#[derive(Debug, Clone, Copy)]
pub struct Transition {
    started: Instant,
    duration: Duration,
}

impl Transition {
    pub fn new(effect: Effect, started: Instant) -> Self {
        let duration = match effect {
            Effect::Scale => SCALE_DURATION,
            Effect::SlideUp => SLIDE_DURATION,
            Effect::FadeIn => FADE_DURATION,
        };
        Self { started, duration }
    }

    /// 0.0 at start, 1.0 once the duration has passed.
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= self.duration {
            return 1.0;
        }
        elapsed.as_secs_f32() / self.duration.as_secs_f32()
    }

    pub fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

#[derive(Debug, Default)]
pub struct TransitionTracker {
    active: HashMap<Slot, Transition>,
    confirm_visible: bool,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event(&mut self, event: &WizardEvent, now: Instant) {
        match event {
            WizardEvent::PhaseEntered(WizardPhase::Start) => {
                self.start(Slot::Content, Effect::Scale, now);
            }
            WizardEvent::QuestionShown { .. } => {
                self.start(Slot::Content, Effect::SlideUp, now);
                self.confirm_visible = false;
            }
            WizardEvent::LoadingStarted => {
                self.start(Slot::Overlay, Effect::Scale, now);
            }
            WizardEvent::LoadingCleared => {
                self.active.remove(&Slot::Overlay);
            }
            WizardEvent::PhaseEntered(_) | WizardEvent::PhaseExited(_) => {}
        }
    }

    /// Fades the confirm control in whenever it goes from hidden to shown.
    pub fn note_confirm_visible(&mut self, visible: bool, now: Instant) {
        if visible && !self.confirm_visible {
            self.start(Slot::Confirm, Effect::FadeIn, now);
        }
        self.confirm_visible = visible;
    }

    pub fn start(&mut self, slot: Slot, effect: Effect, now: Instant) {
        self.active.insert(slot, Transition::new(effect, now));
    }

    pub fn progress(&self, slot: Slot, now: Instant) -> f32 {
        self.active.get(&slot).map_or(1.0, |t| t.progress(now))
    }

    /// Drops finished effects.
    pub fn prune(&mut self, now: Instant) {
        self.active.retain(|_, t| !t.is_done(now));
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.active.values().any(|t| !t.is_done(now))
    }
}

/// Scale: reveals the middle of `text` first, widening outward with progress.
pub fn reveal_from_center(text: &str, progress: f32) -> String {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let visible = ((total as f32) * progress.clamp(0.0, 1.0)).round() as usize;
    if visible >= total {
        return text.to_string();
    }
    let hidden = total - visible;
    let left = hidden / 2;
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i >= left && i < left + visible { *c } else { ' ' })
        .collect()
}

/// SlideUp: rows of top padding still to travel.
pub fn slide_offset(progress: f32) -> u16 {
    ((1.0 - progress.clamp(0.0, 1.0)) * SLIDE_ROWS as f32).round() as u16
}

/// FadeIn: dim until halfway.
pub fn fade_style(progress: f32) -> Style {
    if progress < 0.5 {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    }
}
