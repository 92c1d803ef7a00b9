// Timer tasks owned by the wizard controller
//
// Both tasks check their cancellation token while holding the state lock. Teardown cancels the
// token under that same lock, so once teardown returns neither task can touch the state again.

use super::events::{TransitionSink, WizardEvent};
use crate::models::state::WizardState;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub(crate) type SharedState = Arc<Mutex<WizardState>>;

pub(crate) fn lock(state: &Mutex<WizardState>) -> MutexGuard<'_, WizardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `f` against the state unless `token` was cancelled (`None` then).
fn with_live_state<T>(
    state: &Mutex<WizardState>,
    token: &CancellationToken,
    f: impl FnOnce(&mut WizardState) -> T,
) -> Option<T> {
    let mut guard = lock(state);
    if token.is_cancelled() {
        return None;
    }
    Some(f(&mut guard))
}

/// Advances the loading message cursor every `period`, first advance one period after `start`.
pub(crate) fn spawn_message_rotation(
    state: SharedState,
    start: Instant,
    period: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(start + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    if with_live_state(&state, &token, WizardState::advance_message).is_none() {
                        break;
                    }
                }
            }
        }

        debug!("[PHASE: wizard] [STEP: rotation] Message rotation stopped");
    })
}

/// Clears the loading flag once `deadline` passes.
pub(crate) fn spawn_loading_handoff(
    state: SharedState,
    sink: Arc<dyn TransitionSink>,
    deadline: Instant,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("[PHASE: wizard] [STEP: handoff] Loading handoff cancelled before firing");
            }
            _ = time::sleep_until(deadline) => {
                let cleared = with_live_state(&state, &token, WizardState::clear_loading)
                    .unwrap_or(false);
                if cleared {
                    debug!("[PHASE: wizard] [STEP: handoff] Loading flag cleared");
                    sink.signal(WizardEvent::LoadingCleared);
                }
            }
        }
    })
}
