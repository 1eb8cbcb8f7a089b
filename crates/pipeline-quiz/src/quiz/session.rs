use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::answers::{AnswerSet, QuestionId};

/// Where a respondent is in the quiz.
///
/// The integer view is `0` for the intro, `1..=N` for questions, `N + 1` for
/// contact capture, and `N + 2` for either terminal screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "number", rename_all = "snake_case")]
pub enum QuizPosition {
    Intro,
    Question(usize),
    ContactCapture,
    Disqualified,
    Results,
}

impl QuizPosition {
    pub fn index(self, total_questions: usize) -> usize {
        match self {
            QuizPosition::Intro => 0,
            QuizPosition::Question(number) => number,
            QuizPosition::ContactCapture => total_questions + 1,
            QuizPosition::Disqualified | QuizPosition::Results => total_questions + 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, QuizPosition::Disqualified | QuizPosition::Results)
    }
}

impl fmt::Display for QuizPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizPosition::Intro => f.write_str("intro"),
            QuizPosition::Question(number) => write!(f, "question {number}"),
            QuizPosition::ContactCapture => f.write_str("contact capture"),
            QuizPosition::Disqualified => f.write_str("disqualified"),
            QuizPosition::Results => f.write_str("results"),
        }
    }
}

/// Identifier for one respondent's pass through the quiz.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RUN_TAG: OnceLock<String> = OnceLock::new();

/// Process start time plus a random suffix. Ids must not repeat across
/// restarts that append to the same lead export.
fn run_tag() -> &'static str {
    RUN_TAG.get_or_init(|| {
        format!(
            "{}-{:04x}",
            Utc::now().format("%Y%m%d%H%M%S"),
            rand::random::<u16>()
        )
    })
}

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("quiz-{}-{id:06}", run_tag()))
}

/// All mutable state of a single quiz run. Owned by the caller and handed to
/// the sequencer for every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    id: SessionId,
    pub(crate) position: QuizPosition,
    pub(crate) answers: AnswerSet,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::with_id(next_session_id())
    }

    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            position: QuizPosition::Intro,
            answers: AnswerSet::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn position(&self) -> QuizPosition {
        self.position
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn is_finished(&self) -> bool {
        self.position.is_terminal()
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen the rendering layer should activate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Intro,
    Question {
        id: QuestionId,
        number: usize,
        total: usize,
    },
    ContactForm,
    Disqualified,
    Results,
}

impl Screen {
    /// Element id of the screen container in the site markup.
    pub fn element_id(&self) -> &str {
        match self {
            Screen::Intro => "intro",
            Screen::Question { id, .. } => id.as_str(),
            Screen::ContactForm => "contact-form",
            Screen::Disqualified => "dq",
            Screen::Results => "results",
        }
    }
}

/// Output of every successful transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenUpdate {
    pub screen: Screen,
    /// Progress bar fill in `0.0..=1.0`.
    pub progress: f32,
    /// The content area should scroll back to the top and take focus.
    pub scroll_to_top: bool,
}

impl ScreenUpdate {
    pub fn progress_percent(&self) -> u8 {
        (self.progress.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}
