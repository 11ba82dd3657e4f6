use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const PDF_MIME: &str = "application/pdf";

/// Fallback shown when the server reports a failure without a message.
pub const MSG_ANALYSIS_FAILED: &str = "an error occurred during analysis";
/// Shown for every transport-level failure (DNS, refused, timeout, bad JSON).
pub const MSG_CONNECT_FAILED: &str = "unable to connect to the API";
pub const MSG_UNEXPECTED_SHAPE: &str = "unexpected response shape";
pub const MSG_READ_FAILED: &str = "unable to read the selected file";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout: Duration::from_secs(120),
            user_agent: format!("resume-match-cli/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("cannot inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),
}

/// A single selected file. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSelection {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub path: PathBuf,
}

impl UploadSelection {
    /// Inspect `path` and build a candidate selection. The mime type comes from
    /// the extension, so a non-PDF still yields a candidate the controller can reject.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|source| SelectionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(SelectionError::NotAFile(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf")
            .to_string();
        Ok(Self {
            mime: mime_for_path(path).to_string(),
            name,
            size: meta.len(),
            path: path.to_path_buf(),
        })
    }

    pub fn is_pdf(&self) -> bool {
        self.mime == PDF_MIME
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => PDF_MIME,
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub education: f64,
    pub skills: f64,
    pub experience: f64,
    pub tools: f64,
    /// Always equal to `AnalysisResult::match_percentage`.
    pub overall: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBreakdown {
    pub education_match: Vec<String>,
    pub skills_match: Vec<String>,
    pub skills_missing: Vec<String>,
    pub tools_match: Vec<String>,
    pub tools_missing: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub match_percentage: f64,
    pub scores: Scores,
    pub analysis: AnalysisBreakdown,
    pub recommendations: Vec<String>,
}

/// Outcome of one analysis request. Exactly one variant per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Success(AnalysisResult),
    Failure(String),
    /// 2xx response whose body did not have the expected shape. Holds the raw payload.
    Malformed(serde_json::Value),
}

impl AnalysisOutcome {
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Success(r) => Some(r),
            _ => None,
        }
    }

    /// Message to display for the non-success variants.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Success(_) => None,
            AnalysisOutcome::Failure(msg) => Some(msg),
            AnalysisOutcome::Malformed(_) => Some(MSG_UNEXPECTED_SHAPE),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub required_education: Vec<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub required_tools: Vec<String>,
    #[serde(default)]
    pub preferred_tools: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

/// A successful analysis as persisted in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAnalysis {
    pub id: String,
    #[serde(default)]
    pub timestamp_utc: String,
    pub file_name: String,
    pub file_size: u64,
    pub base_url: String,
    #[serde(with = "humantime_serde", default)]
    pub elapsed: Duration,
    pub result: AnalysisResult,
    /// File this entry was loaded from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Events emitted by the upload session and consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    StateChanged {
        state: crate::orchestrator::UploadState,
    },
    Info(InfoEvent),
    JobLoaded {
        job: Option<JobDescription>,
    },
    ApiStatus {
        reachable: bool,
        detail: String,
    },
    Completed {
        selection: UploadSelection,
        elapsed: Duration,
        // Box to keep UploadEvent small; the outcome carries whole result lists.
        outcome: Box<AnalysisOutcome>,
    },
}

/// Structured info events emitted by the session and consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum InfoEvent {
    Message(String),
    Unreadable(String),
    Submitting { name: String, base_url: String },
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::Unreadable(err) => format!("Cannot select file: {}", err),
            InfoEvent::Submitting { name, base_url } => {
                format!("Analyzing {} via {}", name, base_url)
            }
        }
    }
}
