use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;
use super::definition::DisqualificationCopy;
use super::rubric::ScoringRubric;

/// Why a respondent was routed to the exit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisqualificationReason {
    NotDecisionMaker,
    CompanyTooSmall,
    NoDedicatedReps,
}

impl DisqualificationReason {
    pub fn summary(self) -> &'static str {
        match self {
            DisqualificationReason::NotDecisionMaker => "role is not a decision-making role",
            DisqualificationReason::CompanyTooSmall => "company is in the smallest size bracket",
            DisqualificationReason::NoDedicatedReps => "no dedicated sales reps yet",
        }
    }
}

/// Gate run once the last question is answered. Any matching rule disqualifies.
#[derive(Debug, Clone)]
pub struct DisqualificationEvaluator {
    rubric: ScoringRubric,
}

impl DisqualificationEvaluator {
    pub fn new(rubric: ScoringRubric) -> Self {
        Self { rubric }
    }

    pub fn reasons(&self, answers: &AnswerSet) -> Vec<DisqualificationReason> {
        let keys = &self.rubric.questions;
        let rules = &self.rubric.disqualify;

        [
            (
                answers.is(&keys.role, &rules.role),
                DisqualificationReason::NotDecisionMaker,
            ),
            (
                answers.is(&keys.company_size, &rules.company_size),
                DisqualificationReason::CompanyTooSmall,
            ),
            (
                answers.is(&keys.dedicated_reps, &rules.dedicated_reps),
                DisqualificationReason::NoDedicatedReps,
            ),
        ]
        .into_iter()
        .filter_map(|(matched, reason)| matched.then_some(reason))
        .collect()
    }

    pub fn is_disqualified(&self, answers: &AnswerSet) -> bool {
        !self.reasons(answers).is_empty()
    }
}

/// Exit screen payload built from the configured copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisqualificationNotice {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_message: Option<String>,
    pub reasons: Vec<DisqualificationReason>,
}

impl DisqualificationNotice {
    pub fn new(copy: &DisqualificationCopy, reasons: Vec<DisqualificationReason>) -> Self {
        Self {
            message: copy.message().to_string(),
            additional_message: copy.additional_message().map(str::to_string),
            reasons,
        }
    }
}
