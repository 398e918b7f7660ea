use lernprofil::scoring::DEFAULT_PROFILE_ID;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Profile id for an export file: the explicit id when given, else the file
/// stem (`answers/lea_2025.csv` -> `lea_2025`).
pub(crate) fn profile_id_for(csv_path: &Path, explicit: Option<String>) -> String {
    explicit
        .filter(|id| !id.trim().is_empty())
        .or_else(|| {
            csv_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_PROFILE_ID.to_string())
}
