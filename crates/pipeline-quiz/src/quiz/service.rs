use std::sync::Arc;

use tracing::info;

use super::answers::{AnswerSet, ContactInfo};
use super::classification::{ClassificationResult, TierClassifier};
use super::content::{result_content, ResultContent};
use super::definition::QuizDefinition;
use super::disqualification::DisqualificationNotice;
use super::sequencer::{QuestionSequencer, SequenceError};
use super::session::{QuizPosition, QuizSession, Screen, ScreenUpdate};
use super::submission::{LeadSubmission, SinkError, SubmissionSink};
use super::variant::VariantSource;

/// Service composing the sequencer, classifier, and lead hand-off.
pub struct QuizService<S> {
    definition: Arc<QuizDefinition>,
    sequencer: QuestionSequencer,
    classifier: TierClassifier,
    sink: Arc<S>,
}

/// Everything produced when a qualified respondent submits their details.
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub classification: ClassificationResult,
    pub content: ResultContent,
    pub screen: ScreenUpdate,
    pub submission: LeadSubmission,
}

/// Result of running a complete answer set through the quiz in one go.
#[derive(Debug, Clone)]
pub enum Evaluation {
    Disqualified(DisqualificationNotice),
    /// The respondent qualifies but no contact details were supplied yet.
    ContactRequired,
    Qualified(Box<QuizOutcome>),
}

impl<S> QuizService<S>
where
    S: SubmissionSink + 'static,
{
    pub fn new(definition: Arc<QuizDefinition>, sink: Arc<S>) -> Self {
        let sequencer = QuestionSequencer::new(Arc::clone(&definition));
        let classifier = TierClassifier::new(definition.scoring().clone());
        Self {
            definition,
            sequencer,
            classifier,
            sink,
        }
    }

    pub fn definition(&self) -> &QuizDefinition {
        &self.definition
    }

    pub fn sequencer(&self) -> &QuestionSequencer {
        &self.sequencer
    }

    pub fn classifier(&self) -> &TierClassifier {
        &self.classifier
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Start a fresh session on the intro screen.
    pub fn begin(&self) -> (QuizSession, ScreenUpdate) {
        let session = QuizSession::new();
        let screen = ScreenUpdate {
            screen: Screen::Intro,
            progress: 0.0,
            scroll_to_top: true,
        };
        info!(session = %session.id(), questions = self.definition.len(), "quiz started");
        (session, screen)
    }

    /// Exit screen payload for a session the gate has disqualified.
    pub fn disqualification_notice(&self, session: &QuizSession) -> DisqualificationNotice {
        DisqualificationNotice::new(
            self.definition.disqualification(),
            self.sequencer.evaluator().reasons(session.answers()),
        )
    }

    /// Classify a session waiting on the contact form and hand the lead off.
    ///
    /// The sink is called once; the session only reaches the results screen
    /// after the hand-off succeeded, so a failed sink can be retried.
    pub fn submit(
        &self,
        session: &mut QuizSession,
        contact: ContactInfo,
        variants: &mut dyn VariantSource,
    ) -> Result<QuizOutcome, QuizServiceError> {
        match session.position() {
            QuizPosition::ContactCapture => {}
            position if position.is_terminal() => {
                return Err(SequenceError::SessionClosed { position }.into())
            }
            position => return Err(SubmissionError::NotReady { position }.into()),
        }

        let missing = contact.missing_fields();
        if !missing.is_empty() {
            return Err(SubmissionError::MissingContactFields(missing).into());
        }

        let classification = self.classifier.classify(session.answers(), variants);
        let submission = LeadSubmission::new(
            session.id().clone(),
            session.answers().clone(),
            contact,
            &classification,
        );

        self.sink.hand_off(&submission)?;
        let screen = self.sequencer.complete(session)?;
        let content = result_content(&classification);

        info!(
            session = %session.id(),
            tier = %classification.tier,
            variant = classification.variant,
            "quiz completed"
        );

        Ok(QuizOutcome {
            classification,
            content,
            screen,
            submission,
        })
    }

    /// Replay `answers` in question order through a fresh session.
    ///
    /// Stops at the first screen that is not a question. Every question has to
    /// be answered with one of its options.
    pub fn replay(&self, answers: &AnswerSet) -> Result<QuizSession, QuizServiceError> {
        let mut session = QuizSession::new();
        self.sequencer.advance(&mut session, None)?;
        while let QuizPosition::Question(number) = session.position() {
            let selection = self
                .definition
                .question(number)
                .and_then(|question| answers.get(question.id.as_str()));
            self.sequencer.advance(&mut session, selection)?;
        }
        Ok(session)
    }

    /// Run a complete answer set to its outcome, submitting when a qualified
    /// respondent brought contact details.
    pub fn evaluate(
        &self,
        answers: &AnswerSet,
        contact: Option<ContactInfo>,
        variants: &mut dyn VariantSource,
    ) -> Result<Evaluation, QuizServiceError> {
        let mut session = self.replay(answers)?;

        if session.position() == QuizPosition::Disqualified {
            return Ok(Evaluation::Disqualified(
                self.disqualification_notice(&session),
            ));
        }

        match contact {
            Some(contact) => {
                let outcome = self.submit(&mut session, contact, variants)?;
                Ok(Evaluation::Qualified(Box::new(outcome)))
            }
            None => Ok(Evaluation::ContactRequired),
        }
    }
}

/// Contact form rejections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("contact details can only be submitted from the contact form (currently at {position})")]
    NotReady { position: QuizPosition },
    #[error("missing required contact fields: {}", .0.join(", "))]
    MissingContactFields(Vec<&'static str>),
}

/// Error raised by the quiz service.
#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl QuizServiceError {
    /// True when the caller sent something it can fix and resend.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            QuizServiceError::Sink(_)
                | QuizServiceError::Sequence(SequenceError::UnknownScreen { .. })
        )
    }
}
