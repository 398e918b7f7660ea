use crate::commands::{run_score, run_self_check, run_session, ScoreArgs, SessionArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lernprofil::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "lernprofil",
    about = "Score Lernenergie questionnaire exports and serve the scoring API",
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
    /// Score one questionnaire export and print or save the profile
    Score(ScoreArgs),
    /// Run a workflow inside a timestamped session directory
    Session(SessionArgs),
    /// Check instrument and engine consistency
    SelfCheck,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Session(args) => run_session(args).await,
        Command::SelfCheck => run_self_check(),
    }
}
