use crate::infra::profile_id_for;
use crate::session::{SessionRequest, SessionRunner, Workflow, SUMMARY_FILE};
use clap::Args;
use lernprofil::config::AppConfig;
use lernprofil::error::AppError;
use lernprofil::ingest::ResponseImporter;
use lernprofil::report::render_text_report;
use lernprofil::scoring::{compute_profile, Profile};
use lernprofil::self_check::run_self_check as check_engine;
use lernprofil::telemetry;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Questionnaire export with `item_code,rating` columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Profile id (defaults to the CSV file name without extension)
    #[arg(long)]
    pub(crate) id: Option<String>,
    /// Write the profile JSON here instead of printing it
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Also write the plain-text report to this path
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SessionArgs {
    /// Questionnaire export with `item_code,rating` columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Workflow to run
    #[arg(long, value_enum, default_value_t = Workflow::Basic)]
    pub(crate) workflow: Workflow,
    /// Profile id (defaults to the CSV file name without extension)
    #[arg(long)]
    pub(crate) id: Option<String>,
    /// Directory that receives session folders (overrides LERNPROFIL_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Per-stage timeout in seconds (overrides LERNPROFIL_STAGE_TIMEOUT_SECS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) timeout: Option<u64>,
}

fn init_cli() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    init_cli()?;
    let ScoreArgs {
        csv,
        id,
        output,
        report,
    } = args;

    let profile = score_export(&csv, id)?;
    let json = serde_json::to_string_pretty(&profile)?;

    match output {
        Some(path) => {
            write_file(&path, &json)?;
            println!("Profil gespeichert: {}", path.display());
        }
        None => println!("{json}"),
    }

    if let Some(path) = report {
        write_file(&path, &render_text_report(&profile))?;
        println!("Report gespeichert: {}", path.display());
    }

    Ok(())
}

pub(crate) fn score_export(csv: &Path, id: Option<String>) -> Result<Profile, AppError> {
    let profile_id = profile_id_for(csv, id);
    let responses = ResponseImporter::from_path(csv)?;
    let profile = compute_profile(&responses, Some(&profile_id))?;
    info!(
        %profile_id,
        source = %csv.display(),
        quality = profile.response_quality.quality_flag.label(),
        "profile computed"
    );
    Ok(profile)
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

pub(crate) async fn run_session(args: SessionArgs) -> Result<(), AppError> {
    let config = init_cli()?;
    let SessionArgs {
        csv,
        workflow,
        id,
        output_dir,
        timeout,
    } = args;

    let request = SessionRequest {
        profile_id: profile_id_for(&csv, id),
        csv_path: csv,
        output_dir: output_dir.unwrap_or(config.session.output_dir),
        timeout: timeout
            .map(Duration::from_secs)
            .unwrap_or(config.session.stage_timeout),
    };

    let runner = SessionRunner::create(request)?;
    println!("Workflow: {}", workflow.name());
    println!("Session:  {}", runner.session_dir().display());

    let outcome = runner.run(workflow).await?;
    for result in &outcome.results {
        let status = if result.success { "OK" } else { "FEHLER" };
        println!(
            "  [{status}] {} ({:.1}s)",
            result.stage, result.duration_seconds
        );
        if let Some(message) = &result.error_message {
            println!("         {message}");
        }
    }

    match outcome.failed_stage() {
        None => {
            println!("Details: {}", outcome.session_dir.join(SUMMARY_FILE).display());
            Ok(())
        }
        Some(failed) => Err(AppError::Workflow {
            workflow: workflow.name().to_string(),
            stage: failed.stage.clone(),
        }),
    }
}

pub(crate) fn run_self_check() -> Result<(), AppError> {
    init_cli()?;
    let report = check_engine();
    print!("{}", report.render());

    let result = match report.failures().next() {
        None => Ok(()),
        Some(first) => Err(AppError::Workflow {
            workflow: "self-check".to_string(),
            stage: first.name.to_string(),
        }),
    };
    result
}
