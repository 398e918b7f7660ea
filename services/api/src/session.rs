use crate::stages::{InProcessStages, Stage, StageContext, StageExecutor};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use lernprofil::error::AppError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub(crate) const SUMMARY_FILE: &str = "session_summary.json";
const STDERR_FILE: &str = "stderr.txt";

/// Named sequences of stages a session can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Workflow {
    /// Compute the profile (JSON and text report)
    Minimal,
    /// Compute the profile and confirm the text report exists
    Basic,
    /// Run the engine self-check
    Validate,
}

impl Workflow {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Basic => "basic",
            Self::Validate => "validate",
        }
    }

    pub(crate) const fn stages(self) -> &'static [Stage] {
        match self {
            Self::Minimal => &[Stage::Compute],
            Self::Basic => &[Stage::Compute, Stage::TextReport],
            Self::Validate => &[Stage::SelfCheck],
        }
    }
}

/// Everything a session needs before its directory exists.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionRequest {
    pub(crate) csv_path: PathBuf,
    pub(crate) profile_id: String,
    pub(crate) output_dir: PathBuf,
    #[serde(rename = "timeout_seconds", serialize_with = "serialize_secs")]
    pub(crate) timeout: Duration,
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct StageResult {
    pub(crate) stage: String,
    pub(crate) success: bool,
    pub(crate) duration_seconds: f64,
    pub(crate) output_files: Vec<PathBuf>,
    pub(crate) error_message: Option<String>,
}

impl StageResult {
    fn failed(stage: Stage, duration: Duration, message: String) -> Self {
        Self {
            stage: stage.label().to_string(),
            success: false,
            duration_seconds: duration.as_secs_f64(),
            output_files: Vec::new(),
            error_message: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionSummary<'a> {
    pub(crate) session_dir: &'a Path,
    pub(crate) timestamp: DateTime<Local>,
    pub(crate) workflow: Workflow,
    pub(crate) config: &'a SessionRequest,
    pub(crate) results: &'a [StageResult],
}

/// Outcome of a finished workflow, returned to the CLI.
#[derive(Debug)]
pub(crate) struct SessionOutcome {
    pub(crate) session_dir: PathBuf,
    pub(crate) results: Vec<StageResult>,
}

impl SessionOutcome {
    pub(crate) fn succeeded(&self) -> bool {
        self.results.iter().all(|result| result.success)
    }

    pub(crate) fn failed_stage(&self) -> Option<&StageResult> {
        self.results.iter().find(|result| !result.success)
    }
}

/// Runs the stages of a workflow inside a timestamped session directory.
pub(crate) struct SessionRunner<E = InProcessStages> {
    request: SessionRequest,
    session_dir: PathBuf,
    executor: Arc<E>,
}

impl SessionRunner<InProcessStages> {
    pub(crate) fn create(request: SessionRequest) -> Result<Self, AppError> {
        Self::with_executor(request, InProcessStages)
    }
}

impl<E: StageExecutor> SessionRunner<E> {
    pub(crate) fn with_executor(request: SessionRequest, executor: E) -> Result<Self, AppError> {
        let session_dir = create_session_dir(&request.output_dir, Local::now())?;
        Ok(Self {
            request,
            session_dir,
            executor: Arc::new(executor),
        })
    }

    pub(crate) fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    /// Runs `workflow` until the first failing stage. The summary file is
    /// written whether or not the workflow completes.
    pub(crate) async fn run(&self, workflow: Workflow) -> Result<SessionOutcome, AppError> {
        info!(
            workflow = workflow.name(),
            session = %self.session_dir.display(),
            profile_id = %self.request.profile_id,
            "session started"
        );

        let mut results = Vec::with_capacity(workflow.stages().len());
        for &stage in workflow.stages() {
            let result = self.run_stage(stage).await;
            let success = result.success;
            results.push(result);
            if !success {
                warn!(
                    workflow = workflow.name(),
                    stage = stage.label(),
                    "workflow aborted after failed stage"
                );
                break;
            }
        }

        self.write_summary(workflow, &results)?;
        Ok(SessionOutcome {
            session_dir: self.session_dir.clone(),
            results,
        })
    }

    async fn run_stage(&self, stage: Stage) -> StageResult {
        let context = StageContext {
            csv_path: self.request.csv_path.clone(),
            profile_id: self.request.profile_id.clone(),
            session_dir: self.session_dir.clone(),
        };
        let stage_dir = context.stage_dir(stage);
        let executor = Arc::clone(&self.executor);
        let started = Instant::now();

        let task = tokio::task::spawn_blocking(move || executor.execute(stage, &context));
        let outcome = tokio::time::timeout(self.request.timeout, task).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok(Ok(output_files))) => {
                info!(
                    stage = stage.label(),
                    seconds = elapsed.as_secs_f64(),
                    "stage succeeded"
                );
                StageResult {
                    stage: stage.label().to_string(),
                    success: true,
                    duration_seconds: elapsed.as_secs_f64(),
                    output_files,
                    error_message: None,
                }
            }
            Ok(Ok(Err(err))) => {
                let full = error_chain(&err);
                self.record_stderr(stage_dir.as_deref(), &full);
                error!(stage = stage.label(), error = %err, "stage failed");
                StageResult::failed(stage, elapsed, first_line(&full))
            }
            Ok(Err(join_err)) => {
                let message = format!("Stage abgestürzt: {join_err}");
                self.record_stderr(stage_dir.as_deref(), &message);
                error!(stage = stage.label(), error = %join_err, "stage panicked");
                StageResult::failed(stage, elapsed, message)
            }
            // The blocking task keeps running; its result is discarded.
            Err(_) => {
                let message = format!("Timeout nach {}s", self.request.timeout.as_secs_f64());
                error!(stage = stage.label(), "stage timed out");
                StageResult::failed(stage, elapsed, message)
            }
        }
    }

    fn record_stderr(&self, stage_dir: Option<&Path>, message: &str) {
        let dir = stage_dir.unwrap_or(&self.session_dir);
        let written = fs::create_dir_all(dir).and_then(|()| fs::write(dir.join(STDERR_FILE), message));
        if let Err(err) = written {
            warn!(error = %err, dir = %dir.display(), "could not write stderr.txt");
        }
    }

    fn write_summary(&self, workflow: Workflow, results: &[StageResult]) -> Result<(), AppError> {
        let summary = SessionSummary {
            session_dir: &self.session_dir,
            timestamp: Local::now(),
            workflow,
            config: &self.request,
            results,
        };
        let path = self.session_dir.join(SUMMARY_FILE);
        fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
        Ok(())
    }
}

/// `<output_dir>/session_YYYYMMDD_HHMMSS_ffffff`, with `_N` appended while
/// the name is taken.
pub(crate) fn create_session_dir(output_dir: &Path, now: DateTime<Local>) -> Result<PathBuf, AppError> {
    let stamp = now.format("%Y%m%d_%H%M%S_%6f").to_string();
    let base = output_dir.join(format!("session_{stamp}"));
    let mut candidate = base.clone();
    let mut counter = 1;
    while candidate.exists() {
        candidate = output_dir.join(format!("session_{stamp}_{counter}"));
        counter += 1;
    }
    fs::create_dir_all(&candidate)?;
    Ok(candidate)
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str("\ncaused by: ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn first_line(message: &str) -> String {
    message
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("Unbekannter Fehler")
        .to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::stages::{StageError, COMPUTE_DIR, PROFILE_FILE, VALIDATION_DIR};
    use chrono::TimeZone;
    use lernprofil::instrument::item_registry;
    use std::fmt::Write;

    /// Writes a full 88-item export whose ratings come from `rating_for(index)`.
    pub(crate) fn write_answers(dir: &Path, name: &str, rating_for: impl Fn(usize) -> usize) -> PathBuf {
        let mut csv = String::from("item_code,rating\n");
        for (index, code) in item_registry().codes().enumerate() {
            writeln!(csv, "{code},{}", rating_for(index)).expect("write to string");
        }
        let path = dir.join(name);
        fs::write(&path, csv).expect("write csv");
        path
    }

    fn request(dir: &Path, csv_path: PathBuf, timeout: Duration) -> SessionRequest {
        SessionRequest {
            csv_path,
            profile_id: "session_test".to_string(),
            output_dir: dir.join("reports"),
            timeout,
        }
    }

    fn read_summary(outcome: &SessionOutcome) -> serde_json::Value {
        let raw = fs::read_to_string(outcome.session_dir.join(SUMMARY_FILE)).expect("summary");
        serde_json::from_str(&raw).expect("summary json")
    }

    struct SlowStages(Duration);

    impl StageExecutor for SlowStages {
        fn execute(&self, _stage: Stage, _context: &StageContext) -> Result<Vec<PathBuf>, StageError> {
            std::thread::sleep(self.0);
            Ok(Vec::new())
        }
    }

    #[test]
    fn workflows_map_to_stage_lists() {
        assert_eq!(Workflow::Minimal.stages(), &[Stage::Compute]);
        assert_eq!(Workflow::Basic.stages(), &[Stage::Compute, Stage::TextReport]);
        assert_eq!(Workflow::Validate.stages(), &[Stage::SelfCheck]);
    }

    #[test]
    fn session_dir_gets_counter_on_collision() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let now = Local
            .with_ymd_and_hms(2025, 11, 3, 9, 30, 0)
            .single()
            .expect("valid local time");

        let first = create_session_dir(tmp.path(), now).expect("first dir");
        let second = create_session_dir(tmp.path(), now).expect("second dir");
        let third = create_session_dir(tmp.path(), now).expect("third dir");

        let name = |path: &Path| path.file_name().and_then(|n| n.to_str()).map(str::to_string);
        assert_eq!(name(&first).as_deref(), Some("session_20251103_093000_000000"));
        assert_eq!(name(&second).as_deref(), Some("session_20251103_093000_000000_1"));
        assert_eq!(name(&third).as_deref(), Some("session_20251103_093000_000000_2"));
    }

    #[test]
    fn error_chain_lists_each_cause_once() {
        let err = StageError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        let chain = error_chain(&err);
        assert_eq!(chain, "failed to write stage output\ncaused by: disk full");
        assert_eq!(first_line(&chain), "failed to write stage output");
    }

    #[test]
    fn first_line_skips_blank_lines() {
        assert_eq!(first_line("\nboom\ndetails"), "boom");
        assert_eq!(first_line(""), "Unbekannter Fehler");
    }

    #[tokio::test]
    async fn basic_workflow_writes_profile_and_summary() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let csv = write_answers(tmp.path(), "answers.csv", |index| (index % 5) + 1);
        let runner = SessionRunner::create(request(tmp.path(), csv, Duration::from_secs(30)))
            .expect("session created");

        let outcome = runner.run(Workflow::Basic).await.expect("workflow runs");

        assert!(outcome.succeeded());
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome
            .session_dir
            .join(COMPUTE_DIR)
            .join(PROFILE_FILE)
            .is_file());

        let summary = read_summary(&outcome);
        assert_eq!(summary["workflow"], "basic");
        assert_eq!(summary["config"]["profile_id"], "session_test");
        assert_eq!(summary["config"]["timeout_seconds"], 30);
        assert_eq!(summary["results"][0]["stage"], "Profil-Berechnung");
        assert_eq!(summary["results"][1]["stage"], "Text-Report");
        assert!(summary["results"][1]["error_message"].is_null());
    }

    #[tokio::test]
    async fn failing_stage_aborts_and_keeps_first_error_line() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let csv = write_answers(tmp.path(), "broken.csv", |index| if index == 0 { 7 } else { 3 });
        let runner = SessionRunner::create(request(tmp.path(), csv, Duration::from_secs(30)))
            .expect("session created");

        let outcome = runner.run(Workflow::Basic).await.expect("workflow runs");

        assert!(!outcome.succeeded());
        assert_eq!(outcome.results.len(), 1, "text_report must not run");
        let failed = outcome.failed_stage().expect("failed stage");
        let message = failed.error_message.as_deref().expect("error message");
        assert!(message.contains("außerhalb des erlaubten Bereichs"));
        assert!(!message.contains('\n'));

        let stderr = fs::read_to_string(outcome.session_dir.join(COMPUTE_DIR).join(STDERR_FILE))
            .expect("stderr written");
        assert!(stderr.contains("A1"));
        let summary = read_summary(&outcome);
        assert_eq!(summary["results"][0]["success"], false);
    }

    #[tokio::test]
    async fn validate_workflow_runs_self_check() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let runner = SessionRunner::create(request(
            tmp.path(),
            tmp.path().join("unused.csv"),
            Duration::from_secs(30),
        ))
        .expect("session created");

        let outcome = runner.run(Workflow::Validate).await.expect("workflow runs");

        assert!(outcome.succeeded());
        assert!(runner
            .session_dir()
            .join(VALIDATION_DIR)
            .join("validation_results.txt")
            .is_file());
    }

    #[tokio::test]
    async fn slow_stage_times_out() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let runner = SessionRunner::with_executor(
            request(tmp.path(), tmp.path().join("unused.csv"), Duration::from_millis(50)),
            SlowStages(Duration::from_millis(500)),
        )
        .expect("session created");

        let outcome = runner.run(Workflow::Minimal).await.expect("workflow runs");

        let failed = outcome.failed_stage().expect("timed out stage");
        assert_eq!(failed.error_message.as_deref(), Some("Timeout nach 0.05s"));
        assert!(runner.session_dir().join(SUMMARY_FILE).is_file());
    }
}
