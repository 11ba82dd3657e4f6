use crate::client::AnalysisClient;
use crate::model::{AnalysisOutcome, ClientConfig, JobDescription, UploadSelection};
use crate::orchestrator::{
    process_completion, ExportTargets, PostProcessOptions, UploadController,
};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::warn;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "resume-match",
    version,
    about = "Score a PDF resume against the target job via the resume analysis API"
)]
pub struct Cli {
    /// Base URL of the resume analysis service
    #[arg(long, env = "RESUME_MATCH_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// PDF resume to select at launch
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Print the outcome as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Give up on a request after this long
    #[arg(long, default_value = "120s")]
    pub timeout: humantime::Duration,

    /// Also fetch and print the target job description (text/JSON modes)
    #[arg(long)]
    pub show_job: bool,

    /// Probe the service health endpoint and exit
    #[arg(long)]
    pub check: bool,

    /// TUI only: start analyzing the --file selection immediately
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub upload_on_launch: bool,

    /// Use --auto-save true or --auto-save false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub auto_save: bool,

    /// Export a successful result as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Export a successful result as CSV
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Log level for this tool (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Whether this invocation takes over the terminal.
    pub fn is_tui(&self) -> bool {
        cfg!(feature = "tui") && !self.json && !self.text && !self.check
    }

    pub fn export_targets(&self) -> ExportTargets {
        ExportTargets {
            json: self.export_json.clone(),
            csv: self.export_csv.clone(),
        }
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.check {
        return run_check(&args).await;
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_one_shot(args, false).await;
        }
    }

    let json = args.json;
    run_one_shot(args, json).await
}

/// Build a `ClientConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: args.api_url.clone(),
        timeout: args.timeout.into(),
        ..Default::default()
    }
}

async fn run_check(args: &Cli) -> Result<()> {
    let client = AnalysisClient::new(&build_config(args))?;
    let status = client
        .health()
        .await
        .with_context(|| format!("analysis service at {} is unreachable", client.base_url()))?;
    println!("{}: {}", client.base_url(), status);
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a UploadSelection,
    outcome: &'a AnalysisOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    job: Option<&'a JobDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_path: Option<String>,
}

/// Select `--file`, analyze it once, print the outcome. A failed outcome is
/// returned as an error so the process exits non-zero.
async fn run_one_shot(args: Cli, json: bool) -> Result<()> {
    let path = args
        .file
        .as_deref()
        .context("--file is required with --json/--text")?;
    let candidate = UploadSelection::from_path(path)?;
    let candidate_name = candidate.name.clone();

    let mut controller = UploadController::new();
    if !controller.select_file(candidate) {
        anyhow::bail!("{candidate_name}: only PDF files are accepted");
    }

    let cfg = build_config(&args);
    let client = AnalysisClient::new(&cfg)?;
    let (out_tx, out_handle) = spawn_output_writer();

    let job = if args.show_job {
        match client.fetch_job_description().await {
            Ok(j) => Some(j),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "job description unavailable");
                let _ = out_tx.send(OutputLine::Stderr(format!(
                    "Job description unavailable: {e:#}"
                )));
                None
            }
        }
    } else {
        None
    };

    if !json {
        let _ = out_tx.send(OutputLine::Stderr(format!(
            "Analyzing {} via {}…",
            candidate_name,
            client.base_url()
        )));
    }

    let started = Instant::now();
    let outcome = controller
        .confirm_upload(&client)
        .await
        .cloned()
        .context("no upload was started")?;
    let elapsed = started.elapsed();
    let selection = controller
        .state()
        .selection()
        .cloned()
        .context("selection lost during upload")?;

    let history_dir = if args.auto_save {
        crate::storage::history_dir().ok()
    } else {
        None
    };
    let exports = args.export_targets();
    let processed = process_completion(
        &PostProcessOptions {
            history_dir: history_dir.as_deref(),
            base_url: client.base_url(),
            exports: &exports,
            history_load: 0,
            auto_save: args.auto_save,
        },
        &selection,
        elapsed,
        &outcome,
    );

    if json {
        let report = JsonReport {
            file: &selection,
            outcome: &outcome,
            job: job.as_ref(),
            saved_path: processed
                .auto_saved_path
                .as_ref()
                .map(|p| p.display().to_string()),
        };
        let _ = out_tx.send(OutputLine::Stdout(serde_json::to_string_pretty(&report)?));
    } else {
        let summary = crate::text_summary::build_text_summary(&selection, &outcome, job.as_ref());
        for line in summary.lines {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }

    if let Some(p) = processed.auto_saved_path.as_ref() {
        let _ = out_tx.send(OutputLine::Stderr(format!("Saved: {}", p.display())));
    }
    for msg in processed.export_messages {
        let _ = out_tx.send(OutputLine::Stderr(msg));
    }

    drop(out_tx);
    let _ = out_handle.await;

    if outcome.is_success() {
        Ok(())
    } else {
        let msg = outcome.error_message().unwrap_or_default();
        Err(anyhow::anyhow!("analysis failed: {msg}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_match_service_contract() {
        let args = Cli::parse_from(["resume-match"]);
        let cfg = build_config(&args);
        assert!(cfg.base_url.starts_with("http"));
        assert_eq!(cfg.timeout, Duration::from_secs(120));
        assert!(args.auto_save);
        assert!(!args.upload_on_launch);
    }

    #[test]
    fn api_url_flag_overrides_default() {
        let args = Cli::parse_from([
            "resume-match",
            "--api-url",
            "https://match.example.com",
            "--timeout",
            "5s",
            "--json",
            "--file",
            "cv.pdf",
        ]);
        let cfg = build_config(&args);
        assert_eq!(cfg.base_url, "https://match.example.com");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert!(!args.is_tui());
    }

    #[tokio::test]
    async fn one_shot_rejects_non_pdf_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cv.docx");
        std::fs::write(&p, b"not a pdf").unwrap();
        let args = Cli::parse_from([
            "resume-match",
            "--text",
            "--api-url",
            "http://127.0.0.1:9",
            "--auto-save",
            "false",
            "--file",
            p.to_str().unwrap(),
        ]);
        let err = run_one_shot(args, false).await.unwrap_err();
        assert!(err.to_string().contains("only PDF files are accepted"));
    }

    #[tokio::test]
    async fn one_shot_without_file_is_an_error() {
        let args = Cli::parse_from(["resume-match", "--json"]);
        let err = run_one_shot(args, true).await.unwrap_err();
        assert!(err.to_string().contains("--file"));
    }
}
