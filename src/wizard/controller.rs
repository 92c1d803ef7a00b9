// Wizard controller
//
// Owns the wizard state, the two timer tasks and the transition sink. Must be created inside a
// tokio runtime (the rotation timer is spawned on mount).

use super::events::{TransitionSink, WizardEvent};
use super::timers::{self, SharedState};
use crate::models::state::{QuestionId, Transition, WizardPhase, WizardState, QUESTIONS};
use log::{debug, info};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_millis(800);
pub const DEFAULT_LOADING_HANDOFF: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub rotation_interval: Duration,
    pub loading_handoff: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            rotation_interval: DEFAULT_ROTATION_INTERVAL,
            loading_handoff: DEFAULT_LOADING_HANDOFF,
        }
    }
}

pub struct WizardController {
    session_id: Uuid,
    state: SharedState,
    sink: Arc<dyn TransitionSink>,
    timings: Timings,
    teardown: CancellationToken,
    rotation: Option<JoinHandle<()>>,
    handoff: Option<JoinHandle<()>>,
}

impl WizardController {
    /// Mounts a fresh wizard and starts the message rotation timer.
    pub fn mount(timings: Timings, sink: Arc<dyn TransitionSink>) -> Self {
        let session_id = Uuid::new_v4();
        let state: SharedState = Arc::new(Mutex::new(WizardState::new()));
        let teardown = CancellationToken::new();

        let rotation = timers::spawn_message_rotation(
            Arc::clone(&state),
            Instant::now(),
            timings.rotation_interval,
            teardown.child_token(),
        );

        info!(
            "[PHASE: wizard] [STEP: mount] Wizard mounted session_id={} rotation_ms={} handoff_ms={}",
            session_id,
            timings.rotation_interval.as_millis(),
            timings.loading_handoff.as_millis()
        );
        sink.signal(WizardEvent::PhaseEntered(WizardPhase::Start));

        Self {
            session_id,
            state,
            sink,
            timings,
            teardown,
            rotation: Some(rotation),
            handoff: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_cancelled()
    }

    pub fn snapshot(&self) -> WizardState {
        timers::lock(&self.state).clone()
    }

    pub fn can_confirm(&self) -> bool {
        timers::lock(&self.state).can_confirm()
    }

    pub fn begin(&mut self) {
        let transition = self.apply(WizardState::begin);
        if let Some(t) = transition {
            self.after_transition(t);
        }
    }

    pub fn set_answer(&mut self, id: QuestionId, value: impl Into<String>) {
        if self.is_torn_down() {
            return;
        }
        let value = value.into();
        debug!(
            "[PHASE: wizard] [STEP: answer] session_id={} {}={:?}",
            self.session_id,
            id.as_key(),
            value
        );
        timers::lock(&self.state).set_answer(id, value);
    }

    /// Answers the question shown right now. Ignored outside the Query phase.
    pub fn set_current_answer(&mut self, value: impl Into<String>) {
        let current = timers::lock(&self.state).current_question().map(|q| q.id);
        if let Some(id) = current {
            self.set_answer(id, value);
        }
    }

    pub fn confirm_answer(&mut self) {
        let transition = self.apply(WizardState::confirm_answer);
        if let Some(t) = transition {
            self.after_transition(t);
        }
    }

    /// Cancels both timers. No timer mutates the state once this returns.
    pub fn teardown(&mut self) {
        {
            let _guard = timers::lock(&self.state);
            if self.teardown.is_cancelled() {
                return;
            }
            self.teardown.cancel();
        }
        for handle in [self.rotation.take(), self.handoff.take()].into_iter().flatten() {
            handle.abort();
        }
        info!(
            "[PHASE: wizard] [STEP: teardown] Wizard torn down session_id={}",
            self.session_id
        );
    }

    fn apply(
        &mut self,
        f: impl FnOnce(&mut WizardState) -> Option<Transition>,
    ) -> Option<Transition> {
        if self.is_torn_down() {
            debug!("[PHASE: wizard] Ignoring input after teardown");
            return None;
        }
        f(&mut timers::lock(&self.state))
    }

    fn after_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Began => {
                info!(
                    "[PHASE: wizard] [STEP: begin] session_id={} entering query",
                    self.session_id
                );
                self.sink.signal(WizardEvent::PhaseExited(WizardPhase::Start));
                self.sink.signal(WizardEvent::PhaseEntered(WizardPhase::Query));
                self.signal_question(0);
            }
            Transition::Advanced { from, to } => {
                info!(
                    "[PHASE: wizard] [STEP: confirm] session_id={} question {} -> {}",
                    self.session_id, from, to
                );
                self.signal_question(to);
            }
            Transition::Finished => {
                let params = self.snapshot().params;
                info!(
                    "[PHASE: wizard] [STEP: finish] session_id={} final params: {}",
                    self.session_id,
                    serde_json::to_string(&params).unwrap_or_else(|_| "{}".to_string())
                );
                self.sink.signal(WizardEvent::PhaseExited(WizardPhase::Query));
                self.sink
                    .signal(WizardEvent::PhaseEntered(WizardPhase::Finished));
                self.sink.signal(WizardEvent::LoadingStarted);
                self.arm_loading_handoff();
            }
        }
    }

    fn signal_question(&self, index: usize) {
        if let Some(q) = QUESTIONS.get(index) {
            self.sink
                .signal(WizardEvent::QuestionShown { index, id: q.id });
        }
    }

    fn arm_loading_handoff(&mut self) {
        let deadline = Instant::now() + self.timings.loading_handoff;
        self.handoff = Some(timers::spawn_loading_handoff(
            Arc::clone(&self.state),
            Arc::clone(&self.sink),
            deadline,
            self.teardown.child_token(),
        ));
    }
}

impl Drop for WizardController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::state::{CollectedParams, LOADING_MESSAGES};
    use tokio::time::sleep;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<WizardEvent>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<WizardEvent> {
            self.events.lock().unwrap().clone()
        }

        fn count(&self, event: WizardEvent) -> usize {
            self.events().iter().filter(|e| **e == event).count()
        }
    }

    impl TransitionSink for RecordingSink {
        fn signal(&self, event: WizardEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn mount_recording() -> (WizardController, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let controller = WizardController::mount(Timings::default(), sink.clone());
        (controller, sink)
    }

    fn answer_and_confirm(controller: &mut WizardController, value: &str) {
        controller.set_current_answer(value);
        assert!(controller.can_confirm());
        controller.confirm_answer();
    }

    #[tokio::test(start_paused = true)]
    async fn end_to_end_scenario_clears_loading_after_handoff() {
        let (mut controller, sink) = mount_recording();

        controller.begin();
        controller.set_answer(QuestionId::Budget, "1000");
        controller.confirm_answer();
        controller.set_answer(QuestionId::Width, "5");
        controller.confirm_answer();
        controller.set_answer(QuestionId::Length, "5");
        controller.confirm_answer();

        let state = controller.snapshot();
        assert_eq!(state.phase, WizardPhase::Finished);
        assert!(state.loading);
        assert_eq!(
            state.params,
            CollectedParams {
                budget: "1000".to_string(),
                width: "5".to_string(),
                length: "5".to_string(),
            }
        );

        sleep(Duration::from_millis(4999)).await;
        assert!(controller.snapshot().loading, "cleared too early");

        sleep(Duration::from_millis(2)).await;
        assert!(!controller.snapshot().loading);
        assert_eq!(controller.snapshot().phase, WizardPhase::Finished);

        sleep(Duration::from_secs(30)).await;
        assert_eq!(sink.count(WizardEvent::LoadingCleared), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn confirm_on_non_last_question_stays_in_query() {
        let (mut controller, sink) = mount_recording();
        controller.begin();
        answer_and_confirm(&mut controller, "250");

        let state = controller.snapshot();
        assert_eq!(state.phase, WizardPhase::Query);
        assert_eq!(state.question_index, 1);
        assert!(!state.loading);
        assert_eq!(
            sink.events(),
            vec![
                WizardEvent::PhaseEntered(WizardPhase::Start),
                WizardEvent::PhaseExited(WizardPhase::Start),
                WizardEvent::PhaseEntered(WizardPhase::Query),
                WizardEvent::QuestionShown {
                    index: 0,
                    id: QuestionId::Budget
                },
                WizardEvent::QuestionShown {
                    index: 1,
                    id: QuestionId::Width
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn guard_tracks_every_keystroke() {
        let (mut controller, _sink) = mount_recording();
        controller.begin();
        assert!(!controller.can_confirm());
        controller.set_current_answer("1");
        assert!(controller.can_confirm());
        controller.set_current_answer("");
        assert!(!controller.can_confirm());
    }

    #[tokio::test(start_paused = true)]
    async fn finishing_signals_loading_started() {
        let (mut controller, sink) = mount_recording();
        controller.begin();
        for v in ["1000", "5", "5"] {
            answer_and_confirm(&mut controller, v);
        }
        let events = sink.events();
        let tail = &events[events.len() - 3..];
        assert_eq!(
            tail,
            &[
                WizardEvent::PhaseExited(WizardPhase::Query),
                WizardEvent::PhaseEntered(WizardPhase::Finished),
                WizardEvent::LoadingStarted,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rotation_cycles_once_per_period_and_wraps() {
        let (controller, _sink) = mount_recording();
        assert_eq!(controller.snapshot().message_cursor, 0);

        // Sample between ticks so tick and check never share an instant.
        sleep(Duration::from_millis(400)).await;
        assert_eq!(controller.snapshot().message_cursor, 0);

        for step in 1..=LOADING_MESSAGES.len() + 2 {
            sleep(DEFAULT_ROTATION_INTERVAL).await;
            assert_eq!(
                controller.snapshot().message_cursor,
                step % LOADING_MESSAGES.len(),
                "after {} periods",
                step
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rotation_runs_regardless_of_phase() {
        let (mut controller, _sink) = mount_recording();
        controller.begin();
        sleep(Duration::from_millis(1200)).await;
        assert_eq!(controller.snapshot().message_cursor, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_rotation() {
        let (mut controller, _sink) = mount_recording();
        sleep(Duration::from_millis(2000)).await;
        let before = controller.snapshot().message_cursor;
        assert_eq!(before, 2);

        controller.teardown();
        assert!(controller.is_torn_down());
        sleep(Duration::from_secs(10)).await;
        assert_eq!(controller.snapshot().message_cursor, before);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_before_handoff_leaves_loading_untouched() {
        let (mut controller, sink) = mount_recording();
        controller.begin();
        for v in ["1000", "5", "5"] {
            answer_and_confirm(&mut controller, v);
        }
        sleep(Duration::from_millis(1000)).await;
        controller.teardown();

        sleep(Duration::from_secs(10)).await;
        assert!(controller.snapshot().loading);
        assert_eq!(sink.count(WizardEvent::LoadingCleared), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn input_after_teardown_is_ignored() {
        let (mut controller, _sink) = mount_recording();
        controller.teardown();
        controller.begin();
        controller.set_answer(QuestionId::Budget, "1000");
        let state = controller.snapshot();
        assert_eq!(state.phase, WizardPhase::Start);
        assert_eq!(state.params.budget, "");
    }

    #[tokio::test(start_paused = true)]
    async fn custom_timings_are_honored() {
        let sink = Arc::new(RecordingSink::default());
        let timings = Timings {
            rotation_interval: Duration::from_millis(100),
            loading_handoff: Duration::from_millis(300),
        };
        let mut controller = WizardController::mount(timings, sink.clone());
        controller.begin();
        for v in ["1", "2", "3"] {
            answer_and_confirm(&mut controller, v);
        }
        sleep(Duration::from_millis(350)).await;
        let state = controller.snapshot();
        assert!(!state.loading);
        assert_eq!(state.message_cursor, 3);
    }
}
