use lernprofil::ingest::{ResponseImportError, ResponseImporter};
use lernprofil::report::render_text_report;
use lernprofil::scoring::{compute_profile, ValidationError};
use lernprofil::self_check::run_self_check;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub(crate) const COMPUTE_DIR: &str = "01_compute";
pub(crate) const VALIDATION_DIR: &str = "05_validation";
pub(crate) const PROFILE_FILE: &str = "profil.json";
pub(crate) const REPORT_FILE: &str = "report.txt";
pub(crate) const VALIDATION_FILE: &str = "validation_results.txt";

/// One step of a session workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Compute,
    TextReport,
    SelfCheck,
}

impl Stage {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Compute => "Profil-Berechnung",
            Self::TextReport => "Text-Report",
            Self::SelfCheck => "Validierung",
        }
    }

    /// Directory under the session root that holds the stage's artifacts.
    pub(crate) const fn directory(self) -> Option<&'static str> {
        match self {
            Self::Compute => Some(COMPUTE_DIR),
            Self::TextReport => None,
            Self::SelfCheck => Some(VALIDATION_DIR),
        }
    }
}

/// Inputs handed to a stage on the blocking pool.
#[derive(Debug, Clone)]
pub(crate) struct StageContext {
    pub(crate) csv_path: PathBuf,
    pub(crate) profile_id: String,
    pub(crate) session_dir: PathBuf,
}

impl StageContext {
    pub(crate) fn stage_dir(&self, stage: Stage) -> Option<PathBuf> {
        stage.directory().map(|dir| self.session_dir.join(dir))
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum StageError {
    #[error(transparent)]
    Import(#[from] ResponseImportError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to write stage output")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize profile")]
    Serialization(#[from] serde_json::Error),
    #[error("report.txt nicht gefunden ({})", .0.display())]
    MissingReport(PathBuf),
    #[error("{failed} von {total} Prüfungen fehlgeschlagen\n{details}")]
    SelfCheckFailed {
        failed: usize,
        total: usize,
        details: String,
    },
}

/// Seam between the session runner and the work a stage performs.
pub(crate) trait StageExecutor: Send + Sync + 'static {
    fn execute(&self, stage: Stage, context: &StageContext) -> Result<Vec<PathBuf>, StageError>;
}

/// Runs every stage in-process against the scoring library.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct InProcessStages;

impl StageExecutor for InProcessStages {
    fn execute(&self, stage: Stage, context: &StageContext) -> Result<Vec<PathBuf>, StageError> {
        match stage {
            Stage::Compute => compute(context),
            Stage::TextReport => text_report(context),
            Stage::SelfCheck => self_check(context),
        }
    }
}

fn prepare_dir(context: &StageContext, stage: Stage) -> Result<PathBuf, StageError> {
    let dir = context
        .stage_dir(stage)
        .unwrap_or_else(|| context.session_dir.clone());
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn compute(context: &StageContext) -> Result<Vec<PathBuf>, StageError> {
    let dir = prepare_dir(context, Stage::Compute)?;
    let responses = ResponseImporter::from_path(&context.csv_path)?;
    let profile = compute_profile(&responses, Some(&context.profile_id))?;

    let profile_path = dir.join(PROFILE_FILE);
    fs::write(&profile_path, serde_json::to_string_pretty(&profile)?)?;
    let report_path = dir.join(REPORT_FILE);
    fs::write(&report_path, render_text_report(&profile))?;

    info!(
        profile_id = %profile.profile_id,
        quality = profile.response_quality.quality_flag.label(),
        "profile written"
    );
    Ok(vec![profile_path, report_path])
}

fn text_report(context: &StageContext) -> Result<Vec<PathBuf>, StageError> {
    let report_path = compute_report_path(&context.session_dir);
    if report_path.is_file() {
        Ok(vec![report_path])
    } else {
        Err(StageError::MissingReport(report_path))
    }
}

fn self_check(context: &StageContext) -> Result<Vec<PathBuf>, StageError> {
    let dir = prepare_dir(context, Stage::SelfCheck)?;
    let report = run_self_check();
    let results_path = dir.join(VALIDATION_FILE);
    fs::write(&results_path, report.render())?;

    if report.passed() {
        return Ok(vec![results_path]);
    }

    let details = report
        .failures()
        .map(|outcome| match &outcome.detail {
            Some(detail) => format!("{}: {detail}", outcome.name),
            None => outcome.name.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    Err(StageError::SelfCheckFailed {
        failed: report.failures().count(),
        total: report.outcomes.len(),
        details,
    })
}

pub(crate) fn compute_report_path(session_dir: &Path) -> PathBuf {
    session_dir.join(COMPUTE_DIR).join(REPORT_FILE)
}
