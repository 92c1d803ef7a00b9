//! Transition signals emitted by the controller for the presentation layer.

use crate::models::state::{QuestionId, WizardPhase};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    PhaseEntered(WizardPhase),
    PhaseExited(WizardPhase),
    QuestionShown { index: usize, id: QuestionId },
    LoadingStarted,
    LoadingCleared,
}

/// Receives transition signals. Called from timer tasks as well as the UI thread.
pub trait TransitionSink: Send + Sync {
    fn signal(&self, event: WizardEvent);
}

/// Discards every signal (headless runs).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TransitionSink for NullSink {
    fn signal(&self, _event: WizardEvent) {}
}

impl TransitionSink for UnboundedSender<WizardEvent> {
    fn signal(&self, event: WizardEvent) {
        // Receiver gone means the UI already shut down.
        let _ = self.send(event);
    }
}
