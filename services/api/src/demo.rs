use crate::infra::{load_answers, load_definition, LeadSink};
use clap::Args;
use pipeline_quiz::config::AppConfig;
use pipeline_quiz::error::AppError;
use pipeline_quiz::quiz::rubric::{
    CONFIDENCE_FINE, FORECAST_EVERY_QUARTER, FORECAST_OFTEN, FORECAST_SOMETIMES, REPS_NONE,
    ROLE_FOUNDER, ROLE_REVOPS, SIZE_1000_PLUS, SIZE_250_1000, SIZE_2_10, SIZE_51_250,
    TIMELINE_3_MONTHS, TIMELINE_4_6_MONTHS, TIMELINE_EXPLORING, TRUST_MOSTLY, TRUST_NONE,
    TRUST_SOMEWHAT,
};
use pipeline_quiz::quiz::{
    result_content, AnswerSet, ContactInfo, EvaluateRequest, Evaluation, MemorySink,
    QuizDefinition, QuizOutcome, QuizPosition, QuizRenderer, QuizService, QuizServiceError,
    RandomVariantSource, SequenceError, SubmissionSink, TextRenderer, VariantSource,
};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct QuizRunArgs {
    /// Quiz definition JSON (defaults to QUIZ_CONFIG_PATH or the built-in quiz)
    #[arg(long)]
    pub(crate) quiz_config: Option<PathBuf>,
    /// Fixed seed for result copy variants
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct QuizScoreArgs {
    /// JSON file with `answers` keyed by question id and optional `contact`
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Quiz definition JSON (defaults to QUIZ_CONFIG_PATH or the built-in quiz)
    #[arg(long)]
    pub(crate) quiz_config: Option<PathBuf>,
    /// Fixed seed for result copy variants
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Fixed seed for result copy variants
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_quiz(args: QuizRunArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = args.quiz_config.or(config.quiz.definition_path.clone());
    let definition = Arc::new(load_definition(path.as_deref())?);
    let sink = LeadSink::from_settings(&config.quiz);
    let destination = sink.describe();
    let service = QuizService::new(definition, Arc::new(sink));
    let mut variants = RandomVariantSource::from_seed(args.seed.or(config.quiz.variant_seed));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = run_session(&service, &mut variants, &mut stdin.lock(), &mut stdout.lock())?;

    if let Some(outcome) = outcome {
        println!(
            "Lead {} recorded ({destination}).",
            outcome.submission.session_id
        );
    }
    Ok(())
}

/// Drive one session from line input. Returns the outcome when the respondent
/// reached the results screen.
pub(crate) fn run_session<S, R, W>(
    service: &QuizService<S>,
    variants: &mut dyn VariantSource,
    input: &mut R,
    output: &mut W,
) -> Result<Option<QuizOutcome>, AppError>
where
    S: SubmissionSink + 'static,
    R: BufRead,
    W: Write,
{
    let sequencer = service.sequencer();
    let definition = service.definition();
    let total = definition.len();
    let (mut session, _) = service.begin();

    writeln!(
        output,
        "Pipeline health check: {total} questions. Enter an option number, or 'b' to go back.\n"
    )?;

    loop {
        match session.position() {
            QuizPosition::Intro => {
                sequencer
                    .advance(&mut session, None)
                    .map_err(QuizServiceError::from)?;
            }
            QuizPosition::Question(number) => {
                let question = definition
                    .question(number)
                    .ok_or(QuizServiceError::from(SequenceError::UnknownScreen {
                        index: number,
                    }))?;
                write!(output, "{}", TextRenderer.question(question, number, total))?;

                let Some(line) = prompt(input, output, "> ")? else {
                    writeln!(output, "\nQuiz abandoned.")?;
                    return Ok(None);
                };

                let result = if line.eq_ignore_ascii_case("b") {
                    sequencer.retreat(&mut session)
                } else {
                    let selection = if line.is_empty() {
                        None
                    } else {
                        match line.parse::<usize>() {
                            Ok(choice) => choice
                                .checked_sub(1)
                                .and_then(|index| question.options.get(index))
                                .map(String::as_str),
                            Err(_) => Some(line.as_str()),
                        }
                    };
                    sequencer.advance(&mut session, selection)
                };

                match result {
                    Ok(_) => writeln!(output)?,
                    Err(error) => writeln!(output, "{error}\n")?,
                }
            }
            QuizPosition::ContactCapture => {
                writeln!(output, "Almost done. Where should we send your score?")?;
                let Some(contact) = read_contact(input, output)? else {
                    writeln!(output, "\nQuiz abandoned.")?;
                    return Ok(None);
                };

                match service.submit(&mut session, contact, variants) {
                    Ok(outcome) => {
                        write!(output, "\n{}", TextRenderer.result(&outcome.content))?;
                        return Ok(Some(outcome));
                    }
                    Err(QuizServiceError::Submission(error)) => writeln!(output, "{error}\n")?,
                    Err(other) => return Err(other.into()),
                }
            }
            QuizPosition::Disqualified => {
                write!(
                    output,
                    "{}",
                    TextRenderer.disqualified(definition.disqualification())
                )?;
                return Ok(None);
            }
            QuizPosition::Results => return Ok(None),
        }
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<Option<String>, AppError> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn read_contact<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<ContactInfo>, AppError> {
    let labels = [
        "First name: ",
        "Last name: ",
        "Work email: ",
        "Company: ",
        "Phone (optional): ",
        "Website (optional): ",
    ];
    let mut values = Vec::with_capacity(labels.len());
    for label in labels {
        match prompt(input, output, label)? {
            Some(value) => values.push(value),
            None => return Ok(None),
        }
    }

    let mut values = values.into_iter();
    let mut next = || values.next().unwrap_or_default();
    let optional = |value: String| (!value.is_empty()).then_some(value);
    Ok(Some(ContactInfo {
        first_name: next(),
        last_name: next(),
        email: next(),
        company: next(),
        phone: optional(next()),
        website: optional(next()),
    }))
}

pub(crate) fn run_score(args: QuizScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = args.quiz_config.or(config.quiz.definition_path.clone());
    let definition = Arc::new(load_definition(path.as_deref())?);
    let request = load_answers(&args.answers)?;
    let service = QuizService::new(definition, Arc::new(LeadSink::from_settings(&config.quiz)));
    let mut variants = RandomVariantSource::from_seed(args.seed.or(config.quiz.variant_seed));

    print!("{}", score_report(&service, request, &mut variants)?);
    Ok(())
}

pub(crate) fn score_report<S>(
    service: &QuizService<S>,
    request: EvaluateRequest,
    variants: &mut dyn VariantSource,
) -> Result<String, AppError>
where
    S: SubmissionSink + 'static,
{
    let EvaluateRequest { answers, contact } = request;
    let mut report = String::new();

    match service.evaluate(&answers, contact, variants)? {
        Evaluation::Disqualified(notice) => {
            writeln!(report, "Outcome: disqualified").expect("outcome line");
            for reason in &notice.reasons {
                writeln!(report, "  - {}", reason.summary()).expect("reason line");
            }
            writeln!(report, "\n{}", notice.message).expect("dq message");
            if let Some(additional) = &notice.additional_message {
                writeln!(report, "{additional}").expect("dq additional message");
            }
        }
        Evaluation::ContactRequired => {
            let session = service.replay(&answers)?;
            let preview = service.classifier().classify(session.answers(), variants);
            writeln!(
                report,
                "Outcome: qualified (no contact details supplied, lead not submitted)\n"
            )
            .expect("outcome line");
            report.push_str(&TextRenderer.result(&result_content(&preview)));
        }
        Evaluation::Qualified(outcome) => {
            writeln!(
                report,
                "Outcome: qualified, lead {} submitted at {}\n",
                outcome.submission.session_id,
                outcome
                    .submission
                    .completed_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
            )
            .expect("outcome line");
            report.push_str(&TextRenderer.result(&outcome.content));
        }
    }

    Ok(report)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let sink = MemorySink::default();
    let service = QuizService::new(
        Arc::new(QuizDefinition::standard()),
        Arc::new(sink.clone()),
    );
    let mut variants = RandomVariantSource::from_seed(args.seed);

    println!("Pipeline quiz demo");
    for persona in demo_personas() {
        let evaluation =
            service.evaluate(&persona.answers, Some(persona.contact), &mut variants)?;
        let summary = match evaluation {
            Evaluation::Disqualified(notice) => {
                let reasons: Vec<&str> = notice
                    .reasons
                    .iter()
                    .map(|reason| reason.summary())
                    .collect();
                format!("disqualified ({})", reasons.join("; "))
            }
            Evaluation::ContactRequired => "qualified, awaiting contact details".to_string(),
            Evaluation::Qualified(outcome) => format!(
                "tier {} | {} | {} | copy variant {}",
                outcome.classification.tier,
                outcome.content.score_display(),
                outcome.classification.label,
                outcome.classification.variant
            ),
        };
        println!("- {:<28} {summary}", persona.name);
    }

    let records = sink.records();
    println!("\nLeads handed off: {}", records.len());
    for record in records {
        println!(
            "- {} {} <{}> at {}, tier {} at {}",
            record.session_id,
            record.contact.full_name(),
            record.contact.email,
            record.contact.company,
            record.tier,
            record.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}

struct DemoPersona {
    name: &'static str,
    answers: AnswerSet,
    contact: ContactInfo,
}

fn demo_personas() -> Vec<DemoPersona> {
    let contact = |first: &str, last: &str, company: &str| ContactInfo {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@{}.test", first.to_ascii_lowercase(), last.to_ascii_lowercase()),
        company: company.to_string(),
        phone: None,
        website: None,
    };

    vec![
        DemoPersona {
            name: "Founder, forecast misses",
            answers: [
                ("q1", ROLE_FOUNDER),
                ("q2", "We have a dedicated sales team with its own leadership"),
                ("q3", SIZE_51_250),
                ("q4", "HubSpot"),
                ("q5", "It's actively costing us deals"),
                ("q6", TIMELINE_3_MONTHS),
                ("q7", FORECAST_EVERY_QUARTER),
                ("q8", TRUST_NONE),
            ]
            .into_iter()
            .collect(),
            contact: contact("Maya", "Ortiz", "Brightline Logistics"),
        },
        DemoPersona {
            name: "RevOps lead, exploring",
            answers: [
                ("q1", ROLE_REVOPS),
                ("q2", "We have a few dedicated reps who report to a founder or exec"),
                ("q3", SIZE_1000_PLUS),
                ("q4", "Salesforce"),
                ("q5", "It works, but we're starting to outgrow it"),
                ("q6", TIMELINE_EXPLORING),
                ("q7", FORECAST_SOMETIMES),
                ("q8", TRUST_MOSTLY),
            ]
            .into_iter()
            .collect(),
            contact: contact("Sam", "Whitfield", "Copperleaf Health"),
        },
        DemoPersona {
            name: "Team lead, content today",
            answers: [
                ("q1", "Sales Manager / Team Lead"),
                ("q2", "We have a dedicated sales team with its own leadership"),
                ("q3", SIZE_250_1000),
                ("q4", "Microsoft Dynamics, NetSuite, or another CRM/ERP"),
                ("q5", CONFIDENCE_FINE),
                ("q6", "We don't have any plans to change it"),
                ("q7", "Rarely \u{2013} it's usually on target"),
                ("q8", "Completely \u{2013} it's our single source of truth"),
            ]
            .into_iter()
            .collect(),
            contact: contact("Priya", "Nair", "Harbor Analytics"),
        },
        DemoPersona {
            name: "Solo founder, no reps",
            answers: [
                ("q1", ROLE_FOUNDER),
                ("q2", REPS_NONE),
                ("q3", SIZE_2_10),
                ("q4", "Spreadsheets and inboxes"),
                ("q5", "It's a constant source of frustration for the team"),
                ("q6", TIMELINE_4_6_MONTHS),
                ("q7", FORECAST_OFTEN),
                ("q8", TRUST_SOMEWHAT),
            ]
            .into_iter()
            .collect(),
            contact: contact("Leo", "Park", "Parkside Studio"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline_quiz::quiz::Tier;
    use std::io::Cursor;

    struct FixedVariant(u8);

    impl VariantSource for FixedVariant {
        fn pick(&mut self, _upper: u8) -> u8 {
            self.0
        }
    }

    fn service() -> (QuizService<MemorySink>, MemorySink) {
        let sink = MemorySink::default();
        let service = QuizService::new(
            Arc::new(QuizDefinition::standard()),
            Arc::new(sink.clone()),
        );
        (service, sink)
    }

    fn drive(service: &QuizService<MemorySink>, script: &str) -> (Option<QuizOutcome>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let outcome = run_session(service, &mut FixedVariant(1), &mut input, &mut output)
            .expect("session runs");
        (outcome, String::from_utf8(output).expect("utf8 output"))
    }

    #[test]
    fn terminal_session_recovers_from_blank_answers_and_back_steps() {
        let (service, sink) = service();
        let script = "\n5\nb\n5\n1\n3\n1\n1\n5\n4\n4\nJordan\nBlake\njordan@northwind.test\nNorthwind\n\n\n";

        let (outcome, output) = drive(&service, script);

        let outcome = outcome.expect("reached results");
        assert_eq!(outcome.classification.tier, Tier::C);
        assert!(output.contains("Please select an answer before continuing."));
        assert!(output.contains("Pipeline score: 5.6 / 10"));
        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.records()[0].contact.phone, None);
    }

    #[test]
    fn terminal_session_shows_exit_copy_when_disqualified() {
        let (service, sink) = service();

        let (outcome, output) = drive(&service, "6\n1\n3\n1\n1\n1\n1\n1\n");

        assert!(outcome.is_none());
        assert!(output.contains("Thanks for taking the time."));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn incomplete_contact_is_asked_for_again() {
        let (service, sink) = service();
        let script = "4\n1\n3\n1\n2\n1\n2\n2\nAda\nLovelace\n\nAnalytical\n\n\nAda\nLovelace\nada@engine.test\nAnalytical\n\n\n";

        let (outcome, output) = drive(&service, script);

        assert!(output.contains("missing required contact fields: email"));
        assert_eq!(outcome.expect("submitted").classification.tier, Tier::A);
        assert_eq!(sink.records().len(), 1);
    }

    #[test]
    fn end_of_input_abandons_the_quiz() {
        let (service, sink) = service();

        let (outcome, output) = drive(&service, "4\n1\n");

        assert!(outcome.is_none());
        assert!(output.ends_with("Quiz abandoned.\n"));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn score_report_previews_result_without_contact() {
        let (service, sink) = service();
        let persona = demo_personas().remove(1);
        let request = EvaluateRequest {
            answers: persona.answers,
            contact: None,
        };

        let report = score_report(&service, request, &mut FixedVariant(2)).expect("report");

        assert!(report.starts_with("Outcome: qualified (no contact details supplied"));
        assert!(report.contains("4.1 / 10"));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn demo_personas_cover_every_outcome() {
        let (service, _) = service();
        let mut tiers = Vec::new();
        let mut disqualified = 0;

        for persona in demo_personas() {
            match service
                .evaluate(&persona.answers, Some(persona.contact), &mut FixedVariant(1))
                .expect("evaluate")
            {
                Evaluation::Qualified(outcome) => tiers.push(outcome.classification.tier),
                Evaluation::Disqualified(_) => disqualified += 1,
                Evaluation::ContactRequired => panic!("contact was supplied"),
            }
        }

        assert_eq!(tiers, vec![Tier::A, Tier::B, Tier::C]);
        assert_eq!(disqualified, 1);
    }
}
