//! Lead-qualification quiz: a configuration-driven question sequence, an
//! early-exit gate for poor-fit respondents, and a rubric that sorts the rest
//! into risk tiers with pre-written result copy.
//!
//! Session state lives in [`QuizSession`] and is owned by the caller; the
//! [`QuestionSequencer`] only transitions it. [`QuizService`] ties the pieces
//! together and hands completed leads to a [`SubmissionSink`].

pub mod answers;
pub mod classification;
pub mod content;
pub mod definition;
pub mod disqualification;
pub mod render;
pub mod router;
pub mod rubric;
pub mod sequencer;
pub mod service;
pub mod session;
pub mod submission;
pub mod theme;
pub mod variant;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSet, ContactInfo, QuestionId};
pub use classification::{ClassificationResult, Tier, TierClassifier, TierSignals};
pub use content::{result_content, CallToAction, Paragraph, ResultContent, Segment};
pub use definition::{DefinitionError, DisqualificationCopy, QuestionDefinition, QuizDefinition};
pub use disqualification::{
    DisqualificationEvaluator, DisqualificationNotice, DisqualificationReason,
};
pub use render::{escape_html, HtmlRenderer, QuizRenderer, TextRenderer};
pub use router::{quiz_router, EvaluateRequest, QuizState};
pub use rubric::ScoringRubric;
pub use sequencer::{QuestionSequencer, SequenceError};
pub use service::{Evaluation, QuizOutcome, QuizService, QuizServiceError, SubmissionError};
pub use session::{QuizPosition, QuizSession, Screen, ScreenUpdate, SessionId};
pub use submission::{CsvSink, LeadSubmission, MemorySink, SinkError, SubmissionSink, TracingSink};
pub use theme::LeadFormTheme;
pub use variant::{RandomVariantSource, VariantSource};
