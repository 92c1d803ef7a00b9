// Scripted end-to-end run of the wizard against real timers (used by `--scenario-smoke`).

use super::controller::{Timings, WizardController};
use super::events::NullSink;
use crate::models::state::{CollectedParams, WizardPhase, QUESTIONS};
use anyhow::{bail, Result};
use log::info;
use std::sync::Arc;
use tokio::time::{sleep, Duration};

pub const SCENARIO_ANSWERS: [&str; 3] = ["1000", "5", "5"];

/// Extra wait past the handoff deadline before checking the flag.
const HANDOFF_MARGIN: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub params: CollectedParams,
    pub transcript: Vec<String>,
}

pub async fn run_scenario(timings: Timings) -> Result<ScenarioReport> {
    let mut transcript = Vec::new();
    let mut controller = WizardController::mount(timings, Arc::new(NullSink));
    let mut note = |line: String| {
        info!("[PHASE: scenario] {}", line);
        transcript.push(line);
    };

    controller.begin();
    note(format!("begin -> {:?}", controller.snapshot().phase));

    for (question, answer) in QUESTIONS.iter().zip(SCENARIO_ANSWERS) {
        controller.set_answer(question.id, answer);
        if !controller.can_confirm() {
            bail!("confirm unavailable for {}", question.id.as_key());
        }
        controller.confirm_answer();
        let state = controller.snapshot();
        note(format!(
            "answer {}={:?} -> phase={:?} index={} loading={}",
            question.id.as_key(),
            answer,
            state.phase,
            state.question_index,
            state.loading
        ));
    }

    let state = controller.snapshot();
    if state.phase != WizardPhase::Finished || !state.loading {
        bail!(
            "expected Finished with loading=true, got {:?} loading={}",
            state.phase,
            state.loading
        );
    }

    sleep(timings.loading_handoff + HANDOFF_MARGIN).await;
    let state = controller.snapshot();
    note(format!(
        "after {} ms -> loading={} message={:?}",
        (timings.loading_handoff + HANDOFF_MARGIN).as_millis(),
        state.loading,
        state.loading_message()
    ));
    if state.loading {
        bail!("loading flag still set after handoff delay");
    }

    controller.teardown();
    Ok(ScenarioReport {
        params: state.params,
        transcript,
    })
}
