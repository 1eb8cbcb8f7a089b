//! Answer literals and question keys that drive disqualification and tiering.
//!
//! Every rule is a closed-set membership test against the raw option label, so the
//! labels here must match the quiz content byte for byte (including the en dashes
//! and non-breaking hyphens used in the published copy).

use serde::{Deserialize, Serialize};

pub const ROLE_VP_SALES: &str = "VP Sales / Head of Sales / CRO";
pub const ROLE_REVOPS: &str = "Head of Revenue Operations / Sales Operations";
pub const ROLE_CIO: &str = "CIO / VP IT / Head of Systems";
pub const ROLE_FOUNDER: &str = "Founder / CEO";
pub const ROLE_OTHER: &str = "Other";

pub const REPS_NONE: &str = "We don't really have dedicated reps yet";

pub const SIZE_2_10: &str = "2-10";
pub const SIZE_11_50: &str = "11-50";
pub const SIZE_51_250: &str = "51-250";
pub const SIZE_250_1000: &str = "250-1,000";
pub const SIZE_1000_PLUS: &str = "1,000+";

pub const CONFIDENCE_FINE: &str = "Honestly, it's working fine for us right now";

pub const TIMELINE_3_MONTHS: &str =
    "We're actively looking for partners to help us in the next 3 months";
pub const TIMELINE_4_6_MONTHS: &str =
    "We're looking for partners to help us in the next 4\u{2013}6 months";
pub const TIMELINE_6_12_MONTHS: &str =
    "We know we need to fix / revamp this in the next 6\u{2013}12 months";
pub const TIMELINE_EXPLORING: &str = "We're exploring options, but no clear plan or budget yet";

pub const FORECAST_EVERY_QUARTER: &str = "Almost every quarter \u{2013} it's way off";
pub const FORECAST_OFTEN: &str = "Often \u{2013} more off than on";
pub const FORECAST_SOMETIMES: &str = "Sometimes \u{2013} a bit off, but manageable";

pub const TRUST_NONE: &str =
    "I don't trust it \u{2013} we double\u{2011}check in spreadsheets or go by gut";
pub const TRUST_SOMEWHAT: &str = "Somewhat \u{2013} we spot\u{2011}check and adjust a lot";
pub const TRUST_MOSTLY: &str = "Mostly \u{2013} we can rely on it for most decisions";

/// Which question each rule reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricQuestions {
    pub role: String,
    pub dedicated_reps: String,
    pub company_size: String,
    pub confidence: String,
    pub timeline: String,
    pub forecast_accuracy: String,
    pub data_trust: String,
}

impl RubricQuestions {
    /// Keys paired with the rule name, for validating a definition.
    pub fn keys(&self) -> [(&'static str, &str); 7] {
        [
            ("role", &self.role),
            ("dedicated_reps", &self.dedicated_reps),
            ("company_size", &self.company_size),
            ("confidence", &self.confidence),
            ("timeline", &self.timeline),
            ("forecast_accuracy", &self.forecast_accuracy),
            ("data_trust", &self.data_trust),
        ]
    }
}

impl Default for RubricQuestions {
    fn default() -> Self {
        Self {
            role: "q1".to_string(),
            dedicated_reps: "q2".to_string(),
            company_size: "q3".to_string(),
            confidence: "q5".to_string(),
            timeline: "q6".to_string(),
            forecast_accuracy: "q7".to_string(),
            data_trust: "q8".to_string(),
        }
    }
}

/// Answers that end the quiz before contact capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisqualificationRules {
    pub role: String,
    pub company_size: String,
    pub dedicated_reps: String,
}

impl Default for DisqualificationRules {
    fn default() -> Self {
        Self {
            role: ROLE_OTHER.to_string(),
            company_size: SIZE_2_10.to_string(),
            dedicated_reps: REPS_NONE.to_string(),
        }
    }
}

/// Rubric configuration shared by the disqualification gate and the tier classifier.
///
/// Deserialized from the optional `scoring` object of a quiz document; omitted
/// fields keep the standard values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRubric {
    pub questions: RubricQuestions,
    pub disqualify: DisqualificationRules,
    pub decision_maker_roles: Vec<String>,
    pub ideal_company_sizes: Vec<String>,
    pub adjacent_company_sizes: Vec<String>,
    pub near_term_timelines: Vec<String>,
    pub exploring_timeline: String,
    pub no_pain_confidence: String,
    pub severe_forecast_accuracy: Vec<String>,
    pub severe_data_trust: Vec<String>,
    pub moderate_forecast_accuracy: String,
    pub moderate_data_trust: String,
}

fn owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

impl Default for ScoringRubric {
    fn default() -> Self {
        Self {
            questions: RubricQuestions::default(),
            disqualify: DisqualificationRules::default(),
            decision_maker_roles: owned(&[ROLE_VP_SALES, ROLE_REVOPS, ROLE_CIO, ROLE_FOUNDER]),
            ideal_company_sizes: owned(&[SIZE_51_250, SIZE_250_1000]),
            adjacent_company_sizes: owned(&[SIZE_11_50, SIZE_1000_PLUS]),
            near_term_timelines: owned(&[
                TIMELINE_3_MONTHS,
                TIMELINE_4_6_MONTHS,
                TIMELINE_6_12_MONTHS,
            ]),
            exploring_timeline: TIMELINE_EXPLORING.to_string(),
            no_pain_confidence: CONFIDENCE_FINE.to_string(),
            severe_forecast_accuracy: owned(&[FORECAST_EVERY_QUARTER, FORECAST_OFTEN]),
            severe_data_trust: owned(&[TRUST_NONE, TRUST_SOMEWHAT]),
            moderate_forecast_accuracy: FORECAST_SOMETIMES.to_string(),
            moderate_data_trust: TRUST_MOSTLY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_standard_values() {
        let rubric: ScoringRubric = serde_json::from_str(
            r#"{ "ideal_company_sizes": ["50-249", "250-999"], "questions": { "company_size": "size" } }"#,
        )
        .expect("rubric parses");

        assert_eq!(rubric.ideal_company_sizes, vec!["50-249", "250-999"]);
        assert_eq!(rubric.questions.company_size, "size");
        assert_eq!(rubric.questions.role, "q1");
        assert_eq!(rubric.disqualify, DisqualificationRules::default());
        assert_eq!(rubric.decision_maker_roles.len(), 4);
    }

    #[test]
    fn labels_keep_published_punctuation() {
        assert!(FORECAST_OFTEN.contains('\u{2013}'));
        assert!(TRUST_NONE.contains("double\u{2011}check"));
        assert!(!TRUST_NONE.contains("double-check"));
    }
}
