use crate::demo::{run_demo, run_quiz, run_score, DemoArgs, QuizRunArgs, QuizScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pipeline_quiz::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Pipeline Quiz",
    about = "Serve, take, and score the pipeline health lead-qualification quiz",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Take or score the quiz from the terminal
    Quiz {
        #[command(subcommand)]
        command: QuizCommand,
    },
    /// Run scripted respondents through the quiz and print their outcomes
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum QuizCommand {
    /// Answer the quiz interactively
    Run(QuizRunArgs),
    /// Score a JSON answers file without prompting
    Score(QuizScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Quiz definition JSON (defaults to QUIZ_CONFIG_PATH or the built-in quiz)
    #[arg(long)]
    pub(crate) quiz_config: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quiz {
            command: QuizCommand::Run(args),
        } => run_quiz(args),
        Command::Quiz {
            command: QuizCommand::Score(args),
        } => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
