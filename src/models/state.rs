// Wizard state (in-memory)
//
// NOTE: Nothing here is persisted. The controller owns one `WizardState`; renderers only ever see
// snapshots of it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    Start,
    Query,
    Finished,
}

impl WizardPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardPhase::Start => "start",
            WizardPhase::Query => "query",
            WizardPhase::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    Budget,
    Width,
    Length,
}

impl QuestionId {
    pub fn as_key(&self) -> &'static str {
        match self {
            QuestionId::Budget => "budget",
            QuestionId::Width => "width",
            QuestionId::Length => "length",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "budget" => Some(QuestionId::Budget),
            "width" => Some(QuestionId::Width),
            "length" => Some(QuestionId::Length),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionSpec {
    pub id: QuestionId,
    pub label: &'static str,
    pub placeholder: &'static str,
}

pub const QUESTIONS: [QuestionSpec; 3] = [
    QuestionSpec {
        id: QuestionId::Budget,
        label: "What's your budget like?",
        placeholder: "$0.00",
    },
    QuestionSpec {
        id: QuestionId::Width,
        label: "What’s the location width?",
        placeholder: "5 square feet",
    },
    QuestionSpec {
        id: QuestionId::Length,
        label: "What’s the location length?",
        placeholder: "5 square feet",
    },
];

pub const LOADING_MESSAGES: [&str; 10] = [
    "Shaping the blueprint...",
    "Hearing the walls whisper...",
    "Finding the right angle...",
    "Bringing together the pieces...",
    "Tuning the foundations...",
    "Smoothing out the edges...",
    "Aligning the beams of creativity...",
    "Whistling through the scaffolding...",
    "Building a bridge to somewhere...",
    "Filling the empty spaces...",
];

/// Raw answers keyed by question id. Values are never trimmed, parsed or validated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectedParams {
    pub budget: String,
    pub width: String,
    pub length: String,
}

impl CollectedParams {
    pub fn get(&self, id: QuestionId) -> &str {
        match id {
            QuestionId::Budget => &self.budget,
            QuestionId::Width => &self.width,
            QuestionId::Length => &self.length,
        }
    }

    pub fn set(&mut self, id: QuestionId, value: impl Into<String>) {
        let slot = match id {
            QuestionId::Budget => &mut self.budget,
            QuestionId::Width => &mut self.width,
            QuestionId::Length => &mut self.length,
        };
        *slot = value.into();
    }
}

/// Side effect the owner of the state must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Began,
    Advanced { from: usize, to: usize },
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub phase: WizardPhase,
    pub question_index: usize,
    pub params: CollectedParams,
    pub loading: bool,
    pub message_cursor: usize,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            phase: WizardPhase::Start,
            question_index: 0,
            params: CollectedParams::default(),
            loading: false,
            message_cursor: 0,
        }
    }

    /// Only `Some` while in the Query phase.
    pub fn current_question(&self) -> Option<&'static QuestionSpec> {
        if self.phase != WizardPhase::Query {
            return None;
        }
        QUESTIONS.get(self.question_index)
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.current_question().map(|q| self.params.get(q.id))
    }

    pub fn is_last_question(&self) -> bool {
        self.question_index + 1 >= QUESTIONS.len()
    }

    /// Confirm guard: the current answer is non-empty.
    pub fn can_confirm(&self) -> bool {
        self.current_answer().is_some_and(|a| !a.is_empty())
    }

    pub fn loading_message(&self) -> &'static str {
        LOADING_MESSAGES[self.message_cursor % LOADING_MESSAGES.len()]
    }

    pub fn begin(&mut self) -> Option<Transition> {
        if self.phase != WizardPhase::Start {
            return None;
        }
        self.phase = WizardPhase::Query;
        self.question_index = 0;
        Some(Transition::Began)
    }

    pub fn set_answer(&mut self, id: QuestionId, value: impl Into<String>) {
        self.params.set(id, value);
    }

    /// Advances without re-checking `can_confirm`; callers gate on the guard.
    pub fn confirm_answer(&mut self) -> Option<Transition> {
        if self.phase != WizardPhase::Query {
            return None;
        }
        if self.is_last_question() {
            self.phase = WizardPhase::Finished;
            self.loading = true;
            return Some(Transition::Finished);
        }
        let from = self.question_index;
        self.question_index += 1;
        Some(Transition::Advanced {
            from,
            to: self.question_index,
        })
    }

    pub fn advance_message(&mut self) {
        self.message_cursor = (self.message_cursor + 1) % LOADING_MESSAGES.len();
    }

    /// Returns true only on the call that actually cleared the flag.
    pub fn clear_loading(&mut self) -> bool {
        if self.phase != WizardPhase::Finished || !self.loading {
            return false;
        }
        self.loading = false;
        true
    }
}
