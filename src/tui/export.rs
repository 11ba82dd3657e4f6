use crate::model::SavedAnalysis;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use super::state::UiState;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Save the outcome currently on display to history, unless it already is.
pub fn save_and_show_path(state: &mut UiState) {
    let Some(result) = state.outcome().and_then(|o| o.result()).cloned() else {
        state.info = "No successful analysis to save yet.".into();
        return;
    };
    let Some((selection, elapsed)) = state.last_completed.clone() else {
        state.info = "No successful analysis to save yet.".into();
        return;
    };
    if let Some(saved) = state.last_saved.as_ref() {
        if saved.result == result && saved.file_name == selection.name {
            state.info = "Already saved.".into();
            return;
        }
    }

    let rec = crate::storage::new_record(&state.endpoint, &selection, elapsed, result);
    match crate::storage::save_analysis(&rec) {
        Ok(path) => {
            state.info = format!("Saved: {}", path.display());
            state.last_saved = Some(rec);
            if let Ok(h) = crate::storage::load_recent(state.initial_history_load_size) {
                state.history = h;
                state.clamp_history_cursor();
            }
        }
        Err(e) => state.info = format!("Save failed: {e:#}"),
    }
}

/// `resume-match-<timestamp>-<id>.<ext>` in the current directory.
fn default_export_path(rec: &SavedAnalysis, ext: &str) -> Result<PathBuf> {
    let name = format!(
        "resume-match-{}-{}.{ext}",
        rec.timestamp_utc.replace(':', "-").replace('T', "_"),
        rec.id.chars().take(8).collect::<String>()
    );
    let current_dir = std::env::current_dir().context("get current directory")?;
    Ok(current_dir.join(name))
}

/// Returns the absolute path of the exported file.
pub fn export_result_json(rec: &SavedAnalysis) -> Result<PathBuf> {
    let path = default_export_path(rec, "json")?;
    crate::storage::export_json(&path, rec)?;
    Ok(path)
}

pub fn export_result_csv(rec: &SavedAnalysis) -> Result<PathBuf> {
    let path = default_export_path(rec, "csv")?;
    crate::storage::export_csv(&path, rec)?;
    Ok(path)
}

/// One long-lived thread owns clipboard writes. Each `Clipboard` is held for a
/// moment after writing; dropping it at once loses the contents on X11/Wayland.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();
        std::thread::spawn(move || {
            for text in rx {
                if let Ok(mut clipboard) = arboard::Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });
        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Queue `text` for the clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}
