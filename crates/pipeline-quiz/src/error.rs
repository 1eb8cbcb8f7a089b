use crate::config::ConfigError;
use crate::quiz::{DefinitionError, QuizServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Input {
        path: PathBuf,
        source: serde_json::Error,
    },
    Server(axum::Error),
    Definition(DefinitionError),
    Quiz(QuizServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Input { path, source } => {
                write!(f, "invalid input file {}: {}", path.display(), source)
            }
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Definition(err) => write!(f, "quiz definition error: {}", err),
            AppError::Quiz(err) => write!(f, "quiz error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Input { source, .. } => Some(source),
            AppError::Server(err) => Some(err),
            AppError::Definition(err) => Some(err),
            AppError::Quiz(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Quiz(err) if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Definition(_) | AppError::Input { .. } => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Quiz(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<DefinitionError> for AppError {
    fn from(value: DefinitionError) -> Self {
        Self::Definition(value)
    }
}

impl From<QuizServiceError> for AppError {
    fn from(value: QuizServiceError) -> Self {
        Self::Quiz(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{SequenceError, SubmissionError};

    #[test]
    fn validation_errors_map_to_unprocessable() {
        let error = AppError::from(QuizServiceError::from(
            SubmissionError::MissingContactFields(vec!["email"]),
        ));
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn unknown_screen_is_a_server_error() {
        let error = AppError::from(QuizServiceError::from(SequenceError::UnknownScreen {
            index: 9,
        }));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn malformed_input_file_is_a_bad_request() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let error = AppError::Input {
            path: PathBuf::from("answers.json"),
            source,
        };
        assert!(error.to_string().starts_with("invalid input file answers.json:"));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn display_keeps_the_domain_message() {
        let error = AppError::from(DefinitionError::NoQuestions);
        assert!(error.to_string().starts_with("quiz definition error:"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
