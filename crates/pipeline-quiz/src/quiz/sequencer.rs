use std::sync::Arc;

use tracing::{debug, info};

use super::answers::QuestionId;
use super::definition::{QuestionDefinition, QuizDefinition};
use super::disqualification::DisqualificationEvaluator;
use super::session::{QuizPosition, QuizSession, Screen, ScreenUpdate};

/// Navigation failures. None of them changes the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("Please select an answer before continuing.")]
    NoAnswerSelected { question: QuestionId },
    #[error("'{option}' is not an option for question `{question}`")]
    UnknownOption { question: QuestionId, option: String },
    #[error("cannot jump from {from} to {to}")]
    InvalidJump { from: QuizPosition, to: QuizPosition },
    #[error("contact details are needed before the quiz can continue")]
    AwaitingContact,
    #[error("the quiz session has already ended ({position})")]
    SessionClosed { position: QuizPosition },
    #[error("no screen exists for position {index}")]
    UnknownScreen { index: usize },
}

/// Linear state machine over the definition's question order.
#[derive(Debug, Clone)]
pub struct QuestionSequencer {
    definition: Arc<QuizDefinition>,
    evaluator: DisqualificationEvaluator,
}

impl QuestionSequencer {
    pub fn new(definition: Arc<QuizDefinition>) -> Self {
        let evaluator = DisqualificationEvaluator::new(definition.scoring().clone());
        Self {
            definition,
            evaluator,
        }
    }

    pub fn definition(&self) -> &QuizDefinition {
        &self.definition
    }

    pub fn evaluator(&self) -> &DisqualificationEvaluator {
        &self.evaluator
    }

    /// Screen for the session's current position, without transitioning.
    pub fn current(&self, session: &QuizSession) -> Result<ScreenUpdate, SequenceError> {
        self.screen_update(session.position)
    }

    /// Record `selection` for the current question and move forward.
    ///
    /// From the intro this starts the quiz and ignores `selection`. After the
    /// last question the disqualification gate picks between the exit screen and
    /// contact capture.
    pub fn advance(
        &self,
        session: &mut QuizSession,
        selection: Option<&str>,
    ) -> Result<ScreenUpdate, SequenceError> {
        match session.position {
            QuizPosition::Intro => self.enter(session, QuizPosition::Question(1)),
            QuizPosition::Question(number) => {
                let question = self.question_at(number)?;
                let selected = selection
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| SequenceError::NoAnswerSelected {
                        question: question.id.clone(),
                    })?;
                if !question.has_option(selected) {
                    return Err(SequenceError::UnknownOption {
                        question: question.id.clone(),
                        option: selected.to_string(),
                    });
                }

                let mut answers = session.answers.clone();
                answers.record(question.id.clone(), selected.to_string());

                let next = if number < self.definition.len() {
                    QuizPosition::Question(number + 1)
                } else {
                    let reasons = self.evaluator.reasons(&answers);
                    if reasons.is_empty() {
                        QuizPosition::ContactCapture
                    } else {
                        info!(
                            session = %session.id(),
                            ?reasons,
                            "respondent disqualified"
                        );
                        QuizPosition::Disqualified
                    }
                };

                let update = self.screen_update(next)?;
                session.answers = answers;
                session.position = next;
                debug!(session = %session.id(), position = %next, "advanced");
                Ok(update)
            }
            QuizPosition::ContactCapture => Err(SequenceError::AwaitingContact),
            position @ (QuizPosition::Disqualified | QuizPosition::Results) => {
                Err(SequenceError::SessionClosed { position })
            }
        }
    }

    /// Step back one screen, floored at the intro. Answers are kept.
    pub fn retreat(&self, session: &mut QuizSession) -> Result<ScreenUpdate, SequenceError> {
        let previous = match session.position {
            QuizPosition::Intro | QuizPosition::Question(1) => QuizPosition::Intro,
            QuizPosition::Question(number) => QuizPosition::Question(number - 1),
            QuizPosition::ContactCapture => QuizPosition::Question(self.definition.len()),
            position @ (QuizPosition::Disqualified | QuizPosition::Results) => {
                return Err(SequenceError::SessionClosed { position })
            }
        };
        self.enter(session, previous)
    }

    /// Direct jump, allowed only to the intro or to a terminal screen the
    /// session has earned.
    pub fn jump_to(
        &self,
        session: &mut QuizSession,
        target: QuizPosition,
    ) -> Result<ScreenUpdate, SequenceError> {
        let from = session.position;
        if from.is_terminal() {
            return if target == from {
                self.screen_update(from)
            } else {
                Err(SequenceError::SessionClosed { position: from })
            };
        }

        let allowed = match target {
            QuizPosition::Intro => true,
            QuizPosition::Disqualified => {
                self.answered_all(session) && self.evaluator.is_disqualified(&session.answers)
            }
            QuizPosition::Results => from == QuizPosition::ContactCapture,
            QuizPosition::Question(_) | QuizPosition::ContactCapture => false,
        };

        if !allowed {
            return Err(SequenceError::InvalidJump { from, to: target });
        }
        self.enter(session, target)
    }

    pub(crate) fn complete(&self, session: &mut QuizSession) -> Result<ScreenUpdate, SequenceError> {
        self.jump_to(session, QuizPosition::Results)
    }

    pub fn screen_update(&self, position: QuizPosition) -> Result<ScreenUpdate, SequenceError> {
        let total = self.definition.len();
        let (screen, progress) = match position {
            QuizPosition::Intro => (Screen::Intro, 0.0),
            QuizPosition::Question(number) => {
                let question = self.question_at(number)?;
                (
                    Screen::Question {
                        id: question.id.clone(),
                        number,
                        total,
                    },
                    number as f32 / total as f32,
                )
            }
            QuizPosition::ContactCapture => (Screen::ContactForm, 1.0),
            QuizPosition::Disqualified => (Screen::Disqualified, 1.0),
            QuizPosition::Results => (Screen::Results, 1.0),
        };

        Ok(ScreenUpdate {
            screen,
            progress,
            scroll_to_top: true,
        })
    }

    fn enter(
        &self,
        session: &mut QuizSession,
        position: QuizPosition,
    ) -> Result<ScreenUpdate, SequenceError> {
        let update = self.screen_update(position)?;
        session.position = position;
        debug!(session = %session.id(), position = %position, "entered screen");
        Ok(update)
    }

    fn question_at(&self, number: usize) -> Result<&QuestionDefinition, SequenceError> {
        self.definition
            .question(number)
            .ok_or(SequenceError::UnknownScreen { index: number })
    }

    fn answered_all(&self, session: &QuizSession) -> bool {
        self.definition
            .order()
            .all(|id| session.answers.get(id.as_str()).is_some())
    }
}
