use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::quiz::answers::{AnswerSet, ContactInfo};
use crate::quiz::definition::QuizDefinition;
use crate::quiz::quiz_router;
use crate::quiz::rubric::{
    CONFIDENCE_FINE, FORECAST_OFTEN, FORECAST_SOMETIMES, ROLE_FOUNDER, ROLE_VP_SALES, SIZE_11_50,
    SIZE_51_250, TIMELINE_3_MONTHS, TIMELINE_EXPLORING, TRUST_MOSTLY, TRUST_SOMEWHAT,
};
use crate::quiz::sequencer::QuestionSequencer;
use crate::quiz::service::QuizService;
use crate::quiz::session::{QuizPosition, QuizSession};
use crate::quiz::submission::{LeadSubmission, MemorySink, SinkError, SubmissionSink};
use crate::quiz::variant::{RandomVariantSource, VariantSource};

pub(super) fn definition() -> Arc<QuizDefinition> {
    Arc::new(QuizDefinition::standard())
}

pub(super) fn sequencer() -> QuestionSequencer {
    QuestionSequencer::new(definition())
}

pub(super) fn build_service() -> (Arc<QuizService<MemorySink>>, MemorySink) {
    let sink = MemorySink::default();
    let service = Arc::new(QuizService::new(definition(), Arc::new(sink.clone())));
    (service, sink)
}

pub(super) fn quiz_router_with_service<S>(service: Arc<QuizService<S>>) -> Router
where
    S: SubmissionSink + 'static,
{
    quiz_router(
        service,
        Arc::new(Mutex::new(RandomVariantSource::seeded(7))),
    )
}

pub(super) fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
    pairs.iter().copied().collect()
}

/// Founder at a mid-size company with near-term plans and a forecast that
/// keeps missing.
pub(super) fn tier_a_answers() -> AnswerSet {
    answers(&[
        ("q1", ROLE_FOUNDER),
        ("q2", "We have a dedicated sales team with its own leadership"),
        ("q3", SIZE_51_250),
        ("q4", "HubSpot"),
        ("q5", "It's actively costing us deals"),
        ("q6", TIMELINE_3_MONTHS),
        ("q7", FORECAST_OFTEN),
        ("q8", TRUST_SOMEWHAT),
    ])
}

pub(super) fn tier_b_answers() -> AnswerSet {
    answers(&[
        ("q1", ROLE_VP_SALES),
        ("q2", "We have a few dedicated reps who report to a founder or exec"),
        ("q3", SIZE_11_50),
        ("q4", "Salesforce"),
        ("q5", "It's a constant source of frustration for the team"),
        ("q6", TIMELINE_EXPLORING),
        ("q7", FORECAST_SOMETIMES),
        ("q8", TRUST_MOSTLY),
    ])
}

/// Non-senior respondent who reports no pain anywhere.
pub(super) fn tier_c_answers() -> AnswerSet {
    answers(&[
        ("q1", "Sales Manager / Team Lead"),
        ("q2", "We have a dedicated sales team with its own leadership"),
        ("q3", SIZE_51_250),
        ("q4", "Salesforce"),
        ("q5", CONFIDENCE_FINE),
        ("q6", "We don't have any plans to change it"),
        ("q7", "Rarely \u{2013} it's usually on target"),
        ("q8", "Completely \u{2013} it's our single source of truth"),
    ])
}

/// `base` with one answer replaced.
pub(super) fn with_answer(base: &AnswerSet, question: &str, answer: &str) -> AnswerSet {
    base.iter()
        .map(|(id, value)| {
            if id.as_str() == question {
                (id.as_str(), answer)
            } else {
                (id.as_str(), value)
            }
        })
        .collect()
}

pub(super) fn contact() -> ContactInfo {
    ContactInfo {
        first_name: "Jordan".to_string(),
        last_name: "Blake".to_string(),
        email: "jordan@northwind.test".to_string(),
        company: "Northwind Traders".to_string(),
        phone: Some("+1 515 555 0199".to_string()),
        website: None,
    }
}

/// Walk a fresh session through every question using `answers`.
pub(super) fn walk(sequencer: &QuestionSequencer, answers: &AnswerSet) -> QuizSession {
    let mut session = QuizSession::new();
    sequencer.advance(&mut session, None).expect("start quiz");
    while let QuizPosition::Question(number) = session.position() {
        let id = sequencer
            .definition()
            .question(number)
            .expect("question exists")
            .id
            .clone();
        sequencer
            .advance(&mut session, answers.get(id.as_str()))
            .expect("answer accepted");
    }
    session
}

/// Returns scripted numbers in order and remembers each requested bound.
#[derive(Debug, Default)]
pub(super) struct ScriptedVariants {
    script: Vec<u8>,
    pub(super) requested: Vec<u8>,
}

impl ScriptedVariants {
    pub(super) fn new(script: &[u8]) -> Self {
        Self {
            script: script.to_vec(),
            requested: Vec::new(),
        }
    }
}

impl VariantSource for ScriptedVariants {
    fn pick(&mut self, upper: u8) -> u8 {
        let next = self
            .script
            .get(self.requested.len())
            .copied()
            .unwrap_or(1);
        self.requested.push(upper);
        next
    }
}

#[derive(Debug, Default)]
pub(super) struct UnavailableSink;

impl SubmissionSink for UnavailableSink {
    fn hand_off(&self, _submission: &LeadSubmission) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("crm offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
