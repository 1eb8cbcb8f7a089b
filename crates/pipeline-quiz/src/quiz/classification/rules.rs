use serde::Serialize;

use super::super::answers::AnswerSet;
use super::super::rubric::ScoringRubric;

/// Intermediate flags, each a closed-set test against a raw answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TierSignals {
    pub is_decision_maker: bool,
    pub is_ideal_size: bool,
    pub is_adjacent_size: bool,
    pub has_near_term_intent: bool,
    pub is_exploring: bool,
    pub reports_pain: bool,
    pub severe_experience_pain: bool,
    pub moderate_experience_pain: bool,
}

pub(crate) fn signals_for(answers: &AnswerSet, rubric: &ScoringRubric) -> TierSignals {
    let keys = &rubric.questions;

    let severe_experience_pain = answers
        .is_any_of(&keys.forecast_accuracy, &rubric.severe_forecast_accuracy)
        || answers.is_any_of(&keys.data_trust, &rubric.severe_data_trust);

    let moderate_experience_pain = answers
        .is(&keys.forecast_accuracy, &rubric.moderate_forecast_accuracy)
        || answers.is(&keys.data_trust, &rubric.moderate_data_trust);

    TierSignals {
        is_decision_maker: answers.is_any_of(&keys.role, &rubric.decision_maker_roles),
        is_ideal_size: answers.is_any_of(&keys.company_size, &rubric.ideal_company_sizes),
        is_adjacent_size: answers.is_any_of(&keys.company_size, &rubric.adjacent_company_sizes),
        has_near_term_intent: answers.is_any_of(&keys.timeline, &rubric.near_term_timelines),
        is_exploring: answers.is(&keys.timeline, &rubric.exploring_timeline),
        // An unanswered confidence question still counts as pain.
        reports_pain: !answers.is(&keys.confidence, &rubric.no_pain_confidence),
        severe_experience_pain,
        moderate_experience_pain,
    }
}
