//! Upload session lifecycle.
//!
//! Owns the upload controller, runs at most one analysis request at a time and
//! emits events for presentation layers.

use super::upload::UploadController;
use crate::client::Analyzer;
use crate::model::{
    AnalysisOutcome, InfoEvent, UploadEvent, UploadSelection, MSG_ANALYSIS_FAILED,
};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Commands emitted by UI layers to drive the upload session.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    SelectFile(PathBuf),
    ClearFile,
    Confirm,
    Quit,
}

/// Internal handle for the single in-flight request.
struct RequestCtx {
    in_flight: UploadSelection,
    started: Instant,
    handle: Option<tokio::task::JoinHandle<AnalysisOutcome>>,
}

fn start_request<A: Analyzer>(analyzer: &Arc<A>, selection: UploadSelection) -> RequestCtx {
    let a = analyzer.clone();
    let sel = selection.clone();
    let handle = tokio::spawn(async move { a.analyze(sel).await });
    RequestCtx {
        in_flight: selection,
        started: Instant::now(),
        handle: Some(handle),
    }
}

/// Drive the upload controller from UI commands until the UI quits.
pub(crate) async fn run_session<A: Analyzer>(
    analyzer: Arc<A>,
    endpoint: String,
    event_tx: UnboundedSender<UploadEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut controller = UploadController::new();
    let mut request: Option<RequestCtx> = None;
    // Slow-request watchdog: a hung backend otherwise looks like a frozen UI.
    let mut slow_notice_at: Option<Instant> = None;
    let mut watchdog = tokio::time::interval(Duration::from_millis(500));

    let emit_state = |controller: &UploadController| {
        let _ = event_tx.send(UploadEvent::StateChanged {
            state: controller.state().clone(),
        });
    };

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::SelectFile(path)) => {
                        match UploadSelection::from_path(&path) {
                            Ok(candidate) => {
                                // Non-PDF candidates are dropped silently.
                                if controller.select_file(candidate) {
                                    debug!(path = %path.display(), "file selected");
                                }
                                emit_state(&controller);
                            }
                            Err(e) => {
                                let _ = event_tx.send(UploadEvent::Info(InfoEvent::Unreadable(
                                    e.to_string(),
                                )));
                            }
                        }
                    }
                    Some(UiCommand::ClearFile) => {
                        controller.clear_file();
                        emit_state(&controller);
                    }
                    Some(UiCommand::Confirm) => {
                        if let Some(selection) = controller.begin_upload() {
                            info!(file = %selection.name, "upload confirmed");
                            let _ = event_tx.send(UploadEvent::Info(InfoEvent::Submitting {
                                name: selection.name.clone(),
                                base_url: endpoint.clone(),
                            }));
                            request = Some(start_request(&analyzer, selection));
                            slow_notice_at = Some(Instant::now() + Duration::from_secs(15));
                            emit_state(&controller);
                        } else if controller.is_busy() {
                            debug!("confirm ignored: a request is already in flight");
                        }
                    }
                    Some(UiCommand::Quit) | None => {
                        // Requests are not cancellable; quitting abandons the one in flight.
                        if let Some(ctx) = request.take() {
                            if let Some(h) = ctx.handle {
                                h.abort();
                            }
                        }
                        break Ok(());
                    }
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it can be dropped
            // if another select branch is chosen, and we'll never observe completion.
            maybe_done = async {
                if let Some(ctx) = &mut request {
                    if let Some(h) = ctx.handle.as_mut() {
                        return Some(h.await);
                    }
                }
                futures::future::pending().await
            } => {
                if let (Some(join_res), Some(ctx)) = (maybe_done, request.take()) {
                    let outcome = match join_res {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            error!(error = %e, "analysis task failed");
                            AnalysisOutcome::Failure(MSG_ANALYSIS_FAILED.to_string())
                        }
                    };
                    let elapsed = ctx.started.elapsed();
                    controller.complete_upload(outcome.clone());
                    slow_notice_at = None;
                    let _ = event_tx.send(UploadEvent::Completed {
                        selection: ctx.in_flight,
                        elapsed,
                        outcome: Box::new(outcome),
                    });
                    emit_state(&controller);
                }
            }
            _ = watchdog.tick() => {
                if let Some(at) = slow_notice_at {
                    if Instant::now() >= at && request.is_some() {
                        let _ = event_tx.send(UploadEvent::Info(InfoEvent::Message(
                            "Still waiting for the analysis service…".into(),
                        )));
                        slow_notice_at = None;
                    }
                }
            }
        }
    }
}
