use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::answers::{AnswerSet, ContactInfo};
use super::render::{HtmlRenderer, QuizRenderer};
use super::service::{Evaluation, QuizService};
use super::submission::SubmissionSink;
use super::variant::{RandomVariantSource, VariantSource};

/// Shared handler state: the service plus the variant generator.
pub struct QuizState<S> {
    pub service: Arc<QuizService<S>>,
    pub variants: Arc<Mutex<RandomVariantSource>>,
}

impl<S> Clone for QuizState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            variants: Arc::clone(&self.variants),
        }
    }
}

/// Draws from the shared generator, locking it only for the pick so the lead
/// hand-off runs unlocked.
struct SharedVariants<'a>(&'a Mutex<RandomVariantSource>);

impl VariantSource for SharedVariants<'_> {
    fn pick(&mut self, upper: u8) -> u8 {
        let mut variants = match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        variants.pick(upper)
    }
}

/// Body accepted by the evaluate endpoint.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub answers: AnswerSet,
    #[serde(default)]
    pub contact: Option<ContactInfo>,
}

/// Router builder exposing the quiz definition and stateless evaluation.
pub fn quiz_router<S>(
    service: Arc<QuizService<S>>,
    variants: Arc<Mutex<RandomVariantSource>>,
) -> Router
where
    S: SubmissionSink + 'static,
{
    Router::new()
        .route("/api/v1/quiz", get(definition_handler::<S>))
        .route("/api/v1/quiz/evaluate", post(evaluate_handler::<S>))
        .with_state(QuizState { service, variants })
}

pub(crate) async fn definition_handler<S>(State(state): State<QuizState<S>>) -> Response
where
    S: SubmissionSink + 'static,
{
    let definition = state.service.definition();
    let total = definition.len();
    let questions: Vec<_> = definition
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            json!({
                "number": index + 1,
                "id": question.id,
                "prompt": question.prompt,
                "options": question.options,
            })
        })
        .collect();
    let variables: serde_json::Map<String, serde_json::Value> = definition
        .theme()
        .css_variables()
        .into_iter()
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect();

    let payload = json!({
        "total": total,
        "order": definition.order().collect::<Vec<_>>(),
        "questions": questions,
        "disqualification": definition.disqualification(),
        "contact_step": definition.contact_step(),
        "theme": {
            "variables": variables,
            "style": definition.theme().style_block(),
        },
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn evaluate_handler<S>(
    State(state): State<QuizState<S>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    S: SubmissionSink + 'static,
{
    let QuizState { service, variants } = state;
    let joined = tokio::task::spawn_blocking(move || {
        let mut variants = SharedVariants(variants.as_ref());
        service.evaluate(&request.answers, request.contact, &mut variants)
    })
    .await;

    let result = match joined {
        Ok(result) => result,
        Err(error) => {
            warn!(error = %error, "quiz evaluation task failed");
            let payload = json!({
                "error": "quiz evaluation failed",
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    match result {
        Ok(Evaluation::Disqualified(notice)) => {
            let payload = json!({
                "outcome": "disqualified",
                "message": notice.message,
                "additional_message": notice.additional_message,
                "reasons": notice.reasons,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(Evaluation::ContactRequired) => {
            let payload = json!({
                "outcome": "contact_required",
                "required_fields": ["firstName", "lastName", "email", "company"],
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(Evaluation::Qualified(outcome)) => {
            let html = HtmlRenderer.result(&outcome.content);
            let classification = &outcome.classification;
            let payload = json!({
                "outcome": "qualified",
                "session_id": outcome.submission.session_id,
                "tier": classification.tier,
                "score": classification.score,
                "label": classification.label,
                "variant": classification.variant,
                "content": outcome.content,
                "html": html,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) if error.is_validation() => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            warn!(error = %other, "quiz evaluation failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
