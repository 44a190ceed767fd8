use chrono::NaiveDate;
use library_core::{
    AppError, CatalogImporter, CirculationPolicy, Clock, LibraryService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the façade and, when a path is given, loads the catalogue from CSV.
pub(crate) fn build_library(
    clock: Arc<dyn Clock>,
    policy: CirculationPolicy,
    catalog_csv: Option<&Path>,
) -> Result<LibraryService, AppError> {
    let mut library = LibraryService::with_clock(clock, policy);
    if let Some(path) = catalog_csv {
        let imported = CatalogImporter::from_path(path, &mut library)?;
        info!(imported, path = %path.display(), "catalogue loaded");
    }
    Ok(library)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
