use metrics_exporter_prometheus::PrometheusHandle;
use pipeline_quiz::config::QuizSettings;
use pipeline_quiz::error::AppError;
use pipeline_quiz::quiz::{
    CsvSink, DefinitionError, EvaluateRequest, LeadSubmission, QuizDefinition, SinkError,
    SubmissionSink, TracingSink,
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Lead destination picked from configuration.
#[derive(Debug)]
pub(crate) enum LeadSink {
    Tracing(TracingSink),
    Csv(CsvSink),
}

impl LeadSink {
    pub(crate) fn from_settings(settings: &QuizSettings) -> Self {
        match &settings.leads_csv {
            Some(path) => Self::Csv(CsvSink::new(path)),
            None => Self::Tracing(TracingSink),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            LeadSink::Tracing(_) => "log".to_string(),
            LeadSink::Csv(sink) => format!("csv:{}", sink.path().display()),
        }
    }
}

impl SubmissionSink for LeadSink {
    fn hand_off(&self, submission: &LeadSubmission) -> Result<(), SinkError> {
        match self {
            LeadSink::Tracing(sink) => sink.hand_off(submission),
            LeadSink::Csv(sink) => sink.hand_off(submission),
        }
    }
}

/// The configured quiz document, or the built-in quiz when no path is set.
pub(crate) fn load_definition(path: Option<&Path>) -> Result<QuizDefinition, DefinitionError> {
    match path {
        Some(path) => QuizDefinition::from_path(path),
        None => Ok(QuizDefinition::standard()),
    }
}

/// Answers file in the same shape as the evaluate endpoint body.
pub(crate) fn load_answers(path: &Path) -> Result<EvaluateRequest, AppError> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| AppError::Input {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "pipeline-quiz-api-{name}-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn csv_path_selects_csv_sink() {
        let settings = QuizSettings {
            leads_csv: Some(PathBuf::from("/tmp/leads.csv")),
            ..QuizSettings::default()
        };
        assert_eq!(
            LeadSink::from_settings(&settings).describe(),
            "csv:/tmp/leads.csv"
        );
        assert_eq!(
            LeadSink::from_settings(&QuizSettings::default()).describe(),
            "log"
        );
    }

    #[test]
    fn missing_definition_path_uses_built_in_quiz() {
        let definition = load_definition(None).expect("standard quiz");
        assert_eq!(definition.len(), 8);

        let error = load_definition(Some(Path::new("/nonexistent/quiz.json")))
            .expect_err("missing file");
        assert!(matches!(error, DefinitionError::Io { .. }));
    }

    #[test]
    fn answers_file_accepts_optional_contact() {
        let path = temp_file("answers", r#"{ "answers": { "q1": "Other" } }"#);

        let request = load_answers(&path).expect("answers load");
        assert_eq!(request.answers.get("q1"), Some("Other"));
        assert!(request.contact.is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_answers_file_names_the_file() {
        let path = temp_file("malformed", "{ not json");

        let error = load_answers(&path).expect_err("malformed");
        assert!(matches!(error, AppError::Input { .. }));
        let message = error.to_string();
        assert!(message.starts_with("invalid input file"), "{message}");
        assert!(message.contains(&path.display().to_string()), "{message}");

        let _ = std::fs::remove_file(&path);
    }
}
