//! Post-request processing utilities.
//!
//! Handles auto-save, exports, and history refresh after an analysis completes.

use crate::model::{AnalysisOutcome, SavedAnalysis, UploadSelection};
use crate::storage;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Where exports should go, if anywhere.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExportTargets {
    pub json: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

/// Settings that stay fixed across requests in one session.
pub(crate) struct PostProcessOptions<'a> {
    pub history_dir: Option<&'a Path>,
    pub base_url: &'a str,
    pub exports: &'a ExportTargets,
    pub history_load: usize,
    pub auto_save: bool,
}

/// Result of post-request processing, ready for presentation layers.
pub(crate) struct ProcessedOutcome {
    pub saved: Option<SavedAnalysis>,
    pub export_messages: Vec<String>,
    pub history: Vec<SavedAnalysis>,
    pub auto_saved_path: Option<PathBuf>,
}

/// Process a completed request: build the history record, auto-save, export, and
/// reload history. Only successful outcomes are persisted or exported.
pub(crate) fn process_completion(
    opts: &PostProcessOptions<'_>,
    selection: &UploadSelection,
    elapsed: Duration,
    outcome: &AnalysisOutcome,
) -> ProcessedOutcome {
    let PostProcessOptions {
        history_dir,
        base_url,
        exports,
        history_load,
        auto_save,
    } = *opts;
    let saved = outcome
        .result()
        .map(|r| storage::new_record(base_url, selection, elapsed, r.clone()));

    let mut auto_saved_path = None;
    let mut export_messages = Vec::new();

    if let (Some(rec), Some(dir)) = (saved.as_ref(), history_dir) {
        if auto_save {
            match storage::save_analysis_in(dir, rec) {
                Ok(p) => auto_saved_path = Some(p),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "auto-save failed");
                    export_messages.push(format!("Save failed: {e:#}"));
                }
            }
        }
    }

    if let Some(rec) = saved.as_ref() {
        if let Some(export_path) = exports.json.as_deref() {
            match storage::export_json(export_path, rec) {
                Ok(_) => export_messages.push(format!("Exported JSON: {}", export_path.display())),
                Err(e) => export_messages.push(format!("Export JSON failed: {e:#}")),
            }
        }
        if let Some(export_path) = exports.csv.as_deref() {
            match storage::export_csv(export_path, rec) {
                Ok(_) => export_messages.push(format!("Exported CSV: {}", export_path.display())),
                Err(e) => export_messages.push(format!("Export CSV failed: {e:#}")),
            }
        }
    }

    let history = history_dir
        .map(|dir| storage::load_recent_in(dir, history_load).unwrap_or_default())
        .unwrap_or_default();

    ProcessedOutcome {
        saved,
        export_messages,
        history,
        auto_saved_path,
    }
}
