use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::answers::QuestionId;
use super::rubric::{self, ScoringRubric};
use super::theme::LeadFormTheme;

/// Step keys that are not questions.
pub const CONTACT_STEP_KEY: &str = "Contact info";
pub const DISQUALIFICATION_STEP_KEY: &str = "DQ";

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
}

impl QuestionDefinition {
    pub fn new(id: &str, prompt: &str, options: &[&str]) -> Self {
        Self {
            id: QuestionId::from(id),
            prompt: prompt.to_string(),
            options: options.iter().map(|option| option.to_string()).collect(),
        }
    }

    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|option| option == label)
    }
}

/// Copy for the exit screen. Both fields are optional in the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisqualificationCopy {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub additional_text: Option<String>,
}

impl DisqualificationCopy {
    pub fn message(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Secondary message; `None` means the element is hidden entirely.
    pub fn additional_message(&self) -> Option<&str> {
        self.additional_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Validated quiz content: ordered questions plus exit copy, theme, and rubric.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDefinition {
    questions: Vec<QuestionDefinition>,
    disqualification: DisqualificationCopy,
    contact_step: Option<Value>,
    theme: LeadFormTheme,
    scoring: ScoringRubric,
}

/// Reasons a quiz definition is refused. Always fatal for initialization.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("failed to read quiz definition {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("quiz definition is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("quiz definition has no `steps` object")]
    MissingSteps,
    #[error("quiz definition contains no questions")]
    NoQuestions,
    #[error("question `{id}` is invalid: {reason}")]
    InvalidQuestion { id: QuestionId, reason: &'static str },
    #[error("scoring rule `{rule}` reads question `{question}`, which the quiz does not define")]
    UnknownRubricQuestion { rule: &'static str, question: String },
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    steps: Option<Map<String, Value>>,
    #[serde(default, rename = "leadForm")]
    lead_form: Option<LeadFormTheme>,
    #[serde(default)]
    scoring: Option<ScoringRubric>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default)]
    question_text: Option<String>,
    #[serde(default)]
    answer_options: Option<Vec<String>>,
}

impl QuizDefinition {
    pub fn new(
        questions: Vec<QuestionDefinition>,
        disqualification: DisqualificationCopy,
        theme: LeadFormTheme,
        scoring: ScoringRubric,
    ) -> Result<Self, DefinitionError> {
        let definition = Self {
            questions,
            disqualification,
            contact_step: None,
            theme,
            scoring,
        };
        definition.validate()?;
        Ok(definition)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DefinitionError> {
        let document: RawDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json(raw: &str) -> Result<Self, DefinitionError> {
        let document: RawDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    fn from_document(document: RawDocument) -> Result<Self, DefinitionError> {
        let steps = document.steps.ok_or(DefinitionError::MissingSteps)?;

        let mut questions = Vec::new();
        let mut disqualification = DisqualificationCopy::default();
        let mut contact_step = None;

        // Document order is navigation order.
        for (key, value) in steps {
            match key.as_str() {
                DISQUALIFICATION_STEP_KEY => {
                    disqualification = serde_json::from_value(value)?;
                }
                CONTACT_STEP_KEY => contact_step = Some(value),
                _ => {
                    let raw: RawQuestion = serde_json::from_value(value)?;
                    let id = QuestionId::new(key);
                    let prompt = raw.question_text.ok_or_else(|| DefinitionError::InvalidQuestion {
                        id: id.clone(),
                        reason: "missing questionText",
                    })?;
                    let options =
                        raw.answer_options
                            .ok_or_else(|| DefinitionError::InvalidQuestion {
                                id: id.clone(),
                                reason: "missing answerOptions",
                            })?;
                    questions.push(QuestionDefinition { id, prompt, options });
                }
            }
        }

        let definition = Self {
            questions,
            disqualification,
            contact_step,
            theme: document.lead_form.unwrap_or_default(),
            scoring: document.scoring.unwrap_or_default(),
        };
        definition.validate()?;

        debug!(
            questions = definition.questions.len(),
            has_dq_copy = definition.disqualification.text.is_some(),
            "quiz definition loaded"
        );
        Ok(definition)
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        if self.questions.is_empty() {
            return Err(DefinitionError::NoQuestions);
        }

        for question in &self.questions {
            let invalid = |reason| DefinitionError::InvalidQuestion {
                id: question.id.clone(),
                reason,
            };
            if question.id.as_str().trim().is_empty() {
                return Err(invalid("blank identifier"));
            }
            if question.prompt.trim().is_empty() {
                return Err(invalid("blank questionText"));
            }
            if question.options.is_empty() {
                return Err(invalid("answerOptions is empty"));
            }
            if question.options.iter().any(|option| option.trim().is_empty()) {
                return Err(invalid("answerOptions contains a blank label"));
            }
            if self
                .questions
                .iter()
                .filter(|other| other.id == question.id)
                .count()
                > 1
            {
                return Err(invalid("identifier is used twice"));
            }
        }

        for (rule, key) in self.scoring.questions.keys() {
            if self.question_by_id(key).is_none() {
                return Err(DefinitionError::UnknownRubricQuestion {
                    rule,
                    question: key.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }

    /// Number of questions (`N`).
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn order(&self) -> impl Iterator<Item = &QuestionId> {
        self.questions.iter().map(|question| &question.id)
    }

    /// 1-based lookup matching quiz positions.
    pub fn question(&self, number: usize) -> Option<&QuestionDefinition> {
        number
            .checked_sub(1)
            .and_then(|index| self.questions.get(index))
    }

    pub fn question_by_id(&self, id: &str) -> Option<&QuestionDefinition> {
        self.questions
            .iter()
            .find(|question| question.id.as_str() == id)
    }

    pub fn disqualification(&self) -> &DisqualificationCopy {
        &self.disqualification
    }

    pub fn contact_step(&self) -> Option<&Value> {
        self.contact_step.as_ref()
    }

    pub fn theme(&self) -> &LeadFormTheme {
        &self.theme
    }

    pub fn scoring(&self) -> &ScoringRubric {
        &self.scoring
    }

    /// The built-in eight-question pipeline health quiz.
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
            disqualification: DisqualificationCopy {
                text: Some(
                    "Thanks for taking the time. Based on your answers, we're probably not the right partner for you just yet."
                        .to_string(),
                ),
                additional_text: Some(
                    "We work best with B2B teams that already have dedicated sales reps and a decision-maker driving the CRM/ERP roadmap. When that's you, we'd love to talk."
                        .to_string(),
                ),
            },
            contact_step: None,
            theme: LeadFormTheme::default(),
            scoring: ScoringRubric::default(),
        }
    }
}

fn standard_questions() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::new(
            "q1",
            "Which best describes your role?",
            &[
                rubric::ROLE_VP_SALES,
                rubric::ROLE_REVOPS,
                rubric::ROLE_CIO,
                rubric::ROLE_FOUNDER,
                "Sales Manager / Team Lead",
                rubric::ROLE_OTHER,
            ],
        ),
        QuestionDefinition::new(
            "q2",
            "How is your sales team set up today?",
            &[
                "We have a dedicated sales team with its own leadership",
                "We have a few dedicated reps who report to a founder or exec",
                rubric::REPS_NONE,
            ],
        ),
        QuestionDefinition::new(
            "q3",
            "How many employees does your company have?",
            &[
                rubric::SIZE_2_10,
                rubric::SIZE_11_50,
                rubric::SIZE_51_250,
                rubric::SIZE_250_1000,
                rubric::SIZE_1000_PLUS,
            ],
        ),
        QuestionDefinition::new(
            "q4",
            "Where does your pipeline live today?",
            &[
                "Salesforce",
                "HubSpot",
                "Microsoft Dynamics, NetSuite, or another CRM/ERP",
                "Spreadsheets and inboxes",
            ],
        ),
        QuestionDefinition::new(
            "q5",
            "How do you feel about your current CRM/ERP setup?",
            &[
                rubric::CONFIDENCE_FINE,
                "It works, but we're starting to outgrow it",
                "It's a constant source of frustration for the team",
                "It's actively costing us deals",
            ],
        ),
        QuestionDefinition::new(
            "q6",
            "When do you expect to improve your CRM/ERP setup?",
            &[
                rubric::TIMELINE_3_MONTHS,
                rubric::TIMELINE_4_6_MONTHS,
                rubric::TIMELINE_6_12_MONTHS,
                rubric::TIMELINE_EXPLORING,
                "We don't have any plans to change it",
            ],
        ),
        QuestionDefinition::new(
            "q7",
            "How often does your forecast miss what actually closes?",
            &[
                rubric::FORECAST_EVERY_QUARTER,
                rubric::FORECAST_OFTEN,
                rubric::FORECAST_SOMETIMES,
                "Rarely \u{2013} it's usually on target",
            ],
        ),
        QuestionDefinition::new(
            "q8",
            "How much do you trust the data in your CRM/ERP?",
            &[
                rubric::TRUST_NONE,
                rubric::TRUST_SOMEWHAT,
                rubric::TRUST_MOSTLY,
                "Completely \u{2013} it's our single source of truth",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r##"{
        "steps": {
            "q1": { "questionText": "Role?", "answerOptions": ["Founder / CEO", "Other"] },
            "Contact info": { "title": "Where should we send your score?" },
            "q2": { "questionText": "Reps?", "answerOptions": ["Yes", "We don't really have dedicated reps yet"] },
            "q3": { "questionText": "Size?", "answerOptions": ["2-10", "51-250"] },
            "q5": { "questionText": "Confidence?", "answerOptions": ["Fine", "Not fine"] },
            "q6": { "questionText": "Timeline?", "answerOptions": ["Soon"] },
            "q7": { "questionText": "Forecast?", "answerOptions": ["Often"] },
            "q8": { "questionText": "Trust?", "answerOptions": ["Low", "Low"] },
            "DQ": { "text": "Not a fit yet." }
        },
        "leadForm": { "progress_bar_color": "#0f766e" }
    }"##;

    #[test]
    fn standard_definition_is_valid() {
        let standard = QuizDefinition::standard();
        standard.validate().expect("standard quiz validates");
        assert_eq!(standard.len(), 8);
        assert_eq!(
            standard.order().map(QuestionId::as_str).collect::<Vec<_>>(),
            vec!["q1", "q2", "q3", "q4", "q5", "q6", "q7", "q8"]
        );
    }

    #[test]
    fn order_follows_document_and_skips_reserved_steps() {
        let definition = QuizDefinition::from_json(MINIMAL).expect("definition loads");

        let order: Vec<_> = definition.order().map(QuestionId::as_str).collect();
        assert_eq!(order, vec!["q1", "q2", "q3", "q5", "q6", "q7", "q8"]);
        assert_eq!(definition.question(1).map(|q| q.prompt.as_str()), Some("Role?"));
        assert!(definition.question(0).is_none());
        assert!(definition.question(8).is_none());
        assert!(definition.contact_step().is_some());
        assert_eq!(
            definition.theme().progress_bar_color.as_deref(),
            Some("#0f766e")
        );
    }

    #[test]
    fn duplicate_option_labels_are_accepted() {
        let definition = QuizDefinition::from_json(MINIMAL).expect("definition loads");
        assert_eq!(
            definition.question_by_id("q8").map(|q| q.options.len()),
            Some(2)
        );
    }

    #[test]
    fn missing_additional_text_hides_secondary_message() {
        let definition = QuizDefinition::from_json(MINIMAL).expect("definition loads");
        assert_eq!(definition.disqualification().message(), "Not a fit yet.");
        assert_eq!(definition.disqualification().additional_message(), None);
    }

    #[test]
    fn missing_dq_step_degrades_to_empty_copy() {
        let raw = MINIMAL.replace(r#""DQ": { "text": "Not a fit yet." }"#, r#""q9": { "questionText": "Extra?", "answerOptions": ["Yes"] }"#);
        let definition = QuizDefinition::from_json(&raw).expect("definition loads");
        assert_eq!(definition.disqualification().message(), "");
        assert_eq!(definition.len(), 8);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            QuizDefinition::from_json("{ not json"),
            Err(DefinitionError::Malformed(_))
        ));
        assert!(matches!(
            QuizDefinition::from_json(r#"{ "leadForm": {} }"#),
            Err(DefinitionError::MissingSteps)
        ));
        assert!(matches!(
            QuizDefinition::from_json(r#"{ "steps": { "DQ": { "text": "bye" } } }"#),
            Err(DefinitionError::NoQuestions)
        ));
    }

    #[test]
    fn rejects_questions_without_options() {
        let raw = MINIMAL.replace(r#"["Soon"]"#, "[]");
        match QuizDefinition::from_json(&raw) {
            Err(DefinitionError::InvalidQuestion { id, reason }) => {
                assert_eq!(id.as_str(), "q6");
                assert!(reason.contains("empty"));
            }
            other => panic!("expected invalid question, got {other:?}"),
        }
    }

    #[test]
    fn rejects_rubric_keys_that_do_not_resolve() {
        let raw = MINIMAL.replace(r#""q7": { "questionText": "Forecast?", "answerOptions": ["Often"] },"#, "");
        match QuizDefinition::from_json(&raw) {
            Err(DefinitionError::UnknownRubricQuestion { rule, question }) => {
                assert_eq!(rule, "forecast_accuracy");
                assert_eq!(question, "q7");
            }
            other => panic!("expected rubric error, got {other:?}"),
        }
    }

    #[test]
    fn from_path_reports_missing_file() {
        match QuizDefinition::from_path("/nonexistent/quiz.json") {
            Err(DefinitionError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/quiz.json"))
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
