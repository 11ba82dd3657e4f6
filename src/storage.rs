//! On-disk history of successful analyses, plus JSON/CSV export.

use crate::model::{AnalysisResult, SavedAnalysis, UploadSelection};
use anyhow::{Context, Result};
use rand::RngCore;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const APP_DIR: &str = "resume-match";

/// `<data_dir>/resume-match`
pub fn base_dir() -> Result<PathBuf> {
    let data = dirs::data_dir().context("no data directory for this platform")?;
    Ok(data.join(APP_DIR))
}

pub fn history_dir() -> Result<PathBuf> {
    Ok(base_dir()?.join("history"))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("resume-match.log"))
}

fn gen_id() -> String {
    let mut b = [0u8; 6];
    rand::thread_rng().fill_bytes(&mut b);
    b.iter().map(|x| format!("{x:02x}")).collect()
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into())
}

pub fn new_record(
    base_url: &str,
    selection: &UploadSelection,
    elapsed: Duration,
    result: AnalysisResult,
) -> SavedAnalysis {
    SavedAnalysis {
        id: gen_id(),
        timestamp_utc: now_rfc3339(),
        file_name: selection.name.clone(),
        file_size: selection.size,
        base_url: base_url.to_string(),
        elapsed,
        result,
        source: None,
    }
}

/// File name sorts chronologically: timestamp first, id to break ties.
fn record_file_name(rec: &SavedAnalysis) -> String {
    format!(
        "{}-{}.json",
        rec.timestamp_utc.replace(':', "-"),
        rec.id
    )
}

pub fn save_analysis(rec: &SavedAnalysis) -> Result<PathBuf> {
    save_analysis_in(&history_dir()?, rec)
}

pub fn save_analysis_in(dir: &Path, rec: &SavedAnalysis) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(record_file_name(rec));
    let data = serde_json::to_vec_pretty(rec)?;
    std::fs::write(&path, data).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "analysis saved");
    Ok(path)
}

pub fn load_recent(limit: usize) -> Result<Vec<SavedAnalysis>> {
    load_recent_in(&history_dir()?, limit)
}

/// Newest first. Unreadable entries are skipped.
pub fn load_recent_in(dir: &Path, limit: usize) -> Result<Vec<SavedAnalysis>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("read {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();
    files.reverse();

    let mut out = Vec::new();
    for p in files {
        if out.len() >= limit {
            break;
        }
        match std::fs::read(&p)
            .map_err(anyhow::Error::from)
            .and_then(|b| serde_json::from_slice::<SavedAnalysis>(&b).map_err(Into::into))
        {
            Ok(mut rec) => {
                rec.source = Some(p);
                out.push(rec);
            }
            Err(e) => warn!(path = %p.display(), error = %e, "skipping unreadable history entry"),
        }
    }
    Ok(out)
}

pub fn delete_analysis(rec: &SavedAnalysis) -> Result<()> {
    delete_analysis_in(&history_dir()?, rec)
}

/// Removes the file the entry was loaded from, or its canonical name under `dir`.
pub fn delete_analysis_in(dir: &Path, rec: &SavedAnalysis) -> Result<()> {
    let path = rec
        .source
        .clone()
        .unwrap_or_else(|| dir.join(record_file_name(rec)));
    std::fs::remove_file(&path).with_context(|| format!("delete {}", path.display()))
}

pub fn export_json(path: &Path, rec: &SavedAnalysis) -> Result<()> {
    ensure_parent(path)?;
    let data = serde_json::to_vec_pretty(rec)?;
    std::fs::write(path, data).with_context(|| format!("write {}", path.display()))
}

const CSV_HEADER: &str = "timestamp_utc,file_name,match_percentage,education,skills,experience,tools,overall,skills_match,skills_missing,recommendations";

pub fn export_csv(path: &Path, rec: &SavedAnalysis) -> Result<()> {
    ensure_parent(path)?;
    let r = &rec.result;
    let row = [
        csv_field(&rec.timestamp_utc),
        csv_field(&rec.file_name),
        r.match_percentage.to_string(),
        r.scores.education.to_string(),
        r.scores.skills.to_string(),
        r.scores.experience.to_string(),
        r.scores.tools.to_string(),
        r.scores.overall.to_string(),
        csv_field(&r.analysis.skills_match.join("; ")),
        csv_field(&r.analysis.skills_missing.join("; ")),
        csv_field(&r.recommendations.join("; ")),
    ]
    .join(",");
    std::fs::write(path, format!("{CSV_HEADER}\n{row}\n"))
        .with_context(|| format!("write {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PDF_MIME;

    fn record(ts: &str, pct: f64) -> SavedAnalysis {
        let sel = UploadSelection {
            name: "cv.pdf".into(),
            size: 10,
            mime: PDF_MIME.into(),
            path: "/tmp/cv.pdf".into(),
        };
        let mut rec = new_record(
            "http://localhost:8000",
            &sel,
            Duration::from_secs(2),
            AnalysisResult {
                match_percentage: pct,
                ..Default::default()
            },
        );
        rec.timestamp_utc = ts.into();
        rec
    }

    #[test]
    fn load_recent_is_newest_first_and_limited() {
        let dir = tempfile::tempdir().unwrap();
        save_analysis_in(dir.path(), &record("2026-01-01T10:00:00Z", 10.0)).unwrap();
        save_analysis_in(dir.path(), &record("2026-03-01T10:00:00Z", 30.0)).unwrap();
        save_analysis_in(dir.path(), &record("2026-02-01T10:00:00Z", 20.0)).unwrap();
        std::fs::write(dir.path().join("zzz-garbage.json"), b"{not json").unwrap();

        let all = load_recent_in(dir.path(), 10).unwrap();
        let pcts: Vec<f64> = all.iter().map(|r| r.result.match_percentage).collect();
        assert_eq!(pcts, vec![30.0, 20.0, 10.0]);

        assert_eq!(load_recent_in(dir.path(), 1).unwrap().len(), 1);
    }

    #[test]
    fn missing_history_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_recent_in(&dir.path().join("nope"), 5).unwrap().is_empty());
    }

    #[test]
    fn delete_removes_only_that_entry() {
        let dir = tempfile::tempdir().unwrap();
        let a = record("2026-01-01T10:00:00Z", 10.0);
        let b = record("2026-01-02T10:00:00Z", 20.0);
        save_analysis_in(dir.path(), &a).unwrap();
        save_analysis_in(dir.path(), &b).unwrap();

        delete_analysis_in(dir.path(), &a).unwrap();
        let left = load_recent_in(dir.path(), 10).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, b.id);
    }

    #[test]
    fn delete_works_for_renamed_entry_without_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = record("", 40.0);
        rec.id = "handmade".into();
        let mut value = serde_json::to_value(&rec).unwrap();
        value.as_object_mut().unwrap().remove("timestamp_utc");
        let path = dir.path().join("renamed-by-hand.json");
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

        let listed = load_recent_in(dir.path(), 10).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].timestamp_utc, "");
        assert_eq!(listed[0].source.as_deref(), Some(path.as_path()));

        delete_analysis_in(dir.path(), &listed[0]).unwrap();
        assert!(!path.exists());
        assert!(load_recent_in(dir.path(), 10).unwrap().is_empty());
    }

    #[test]
    fn csv_escapes_separators() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = record("2026-01-01T10:00:00Z", 82.0);
        rec.result.analysis.skills_match = vec!["Python".into(), "SQL, basic".into()];
        let path = dir.path().join("nested/out.csv");
        export_csv(&path, &rec).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        let row = lines.next().unwrap();
        assert!(row.starts_with("2026-01-01T10:00:00Z,cv.pdf,82,"));
        assert!(row.contains("\"Python; SQL, basic\""));
    }

    #[test]
    fn json_export_round_trips_record() {
        let dir = tempfile::tempdir().unwrap();
        let rec = record("2026-01-01T10:00:00Z", 82.0);
        let path = dir.path().join("out.json");
        export_json(&path, &rec).unwrap();
        let back: SavedAnalysis = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(back.id, rec.id);
        assert_eq!(back.elapsed, Duration::from_secs(2));
    }
}
