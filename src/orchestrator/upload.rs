//! Upload controller state machine.
//!
//! Owns the single selection slot and guarantees at most one outstanding
//! analysis request. Pure state: the network call is injected by the caller.

use crate::client::Analyzer;
use crate::model::{AnalysisOutcome, UploadSelection};

#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    /// Nothing selected, nothing analyzed yet.
    Idle,
    /// A PDF is selected and no request has completed for this session slot.
    Ready(UploadSelection),
    /// The only busy state. `in_flight` is what is being analyzed; `selection` is the
    /// user's slot, which may be cleared or replaced without touching the request.
    Submitting {
        in_flight: UploadSelection,
        selection: Option<UploadSelection>,
        previous: Option<Box<AnalysisOutcome>>,
    },
    /// Back to interactive after a request finished.
    Done {
        selection: Option<UploadSelection>,
        outcome: Box<AnalysisOutcome>,
    },
}

impl UploadState {
    pub fn label(&self) -> &'static str {
        match self {
            UploadState::Idle => "Idle",
            UploadState::Ready(_) => "Ready",
            UploadState::Submitting { .. } => "Analyzing",
            UploadState::Done { .. } => "Done",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, UploadState::Submitting { .. })
    }

    /// The user's currently selected file, if any.
    pub fn selection(&self) -> Option<&UploadSelection> {
        match self {
            UploadState::Idle => None,
            UploadState::Ready(sel) => Some(sel),
            UploadState::Submitting { selection, .. } | UploadState::Done { selection, .. } => {
                selection.as_ref()
            }
        }
    }

    /// The outcome currently on display. While submitting this is the previous one.
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match self {
            UploadState::Done { outcome, .. } => Some(outcome),
            UploadState::Submitting { previous, .. } => previous.as_deref(),
            _ => None,
        }
    }
}

pub struct UploadController {
    state: UploadState,
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadController {
    pub fn new() -> Self {
        Self {
            state: UploadState::Idle,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Accept `candidate` only if it is a PDF. Anything else is dropped without
    /// touching the current selection. Returns whether it was accepted.
    pub fn select_file(&mut self, candidate: UploadSelection) -> bool {
        if !candidate.is_pdf() {
            return false;
        }
        self.set_selection(Some(candidate));
        true
    }

    /// Empty the selection slot. An in-flight request is unaffected.
    pub fn clear_file(&mut self) {
        self.set_selection(None);
    }

    fn set_selection(&mut self, new: Option<UploadSelection>) {
        let state = std::mem::replace(&mut self.state, UploadState::Idle);
        self.state = match state {
            UploadState::Idle | UploadState::Ready(_) => match new {
                Some(sel) => UploadState::Ready(sel),
                None => UploadState::Idle,
            },
            UploadState::Submitting {
                in_flight,
                previous,
                ..
            } => UploadState::Submitting {
                in_flight,
                selection: new,
                previous,
            },
            UploadState::Done { outcome, .. } => UploadState::Done {
                selection: new,
                outcome,
            },
        };
    }

    /// First half of a confirmation. Returns the file to analyze, or `None` when
    /// there is nothing selected or a request is already outstanding.
    pub fn begin_upload(&mut self) -> Option<UploadSelection> {
        let (sel, previous) = match &self.state {
            UploadState::Ready(sel) => (sel.clone(), None),
            UploadState::Done {
                selection: Some(sel),
                outcome,
            } => (sel.clone(), Some(outcome.clone())),
            _ => return None,
        };
        self.state = UploadState::Submitting {
            in_flight: sel.clone(),
            selection: Some(sel.clone()),
            previous,
        };
        Some(sel)
    }

    /// Second half of a confirmation. Stores `outcome`, replacing whatever was
    /// shown before. Ignored unless a request is in flight.
    pub fn complete_upload(&mut self, outcome: AnalysisOutcome) -> bool {
        let state = std::mem::replace(&mut self.state, UploadState::Idle);
        match state {
            UploadState::Submitting { selection, .. } => {
                self.state = UploadState::Done {
                    selection,
                    outcome: Box::new(outcome),
                };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Run a whole confirmation against `analyzer`. No-op (returns `None`) when
    /// nothing is selected or a request is already in flight.
    pub async fn confirm_upload<A: Analyzer>(&mut self, analyzer: &A) -> Option<&AnalysisOutcome> {
        let sel = self.begin_upload()?;
        let outcome = analyzer.analyze(sel).await;
        self.complete_upload(outcome);
        self.state.outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisResult, PDF_MIME};
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn file(name: &str, mime: &str) -> UploadSelection {
        UploadSelection {
            name: name.into(),
            size: 2048,
            mime: mime.into(),
            path: format!("/tmp/{name}").into(),
        }
    }

    fn pdf(name: &str) -> UploadSelection {
        file(name, PDF_MIME)
    }

    struct CountingAnalyzer {
        calls: AtomicUsize,
    }

    impl Analyzer for CountingAnalyzer {
        fn analyze(&self, _sel: UploadSelection) -> impl Future<Output = AnalysisOutcome> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async { AnalysisOutcome::Success(AnalysisResult::default()) }
        }
    }

    #[test]
    fn non_pdf_never_changes_selection() {
        let mut c = UploadController::new();
        for mime in ["image/png", "text/plain", "application/octet-stream", "", "application/PDF"] {
            assert!(!c.select_file(file("x", mime)));
            assert_eq!(c.state(), &UploadState::Idle);
        }

        c.select_file(pdf("a.pdf"));
        assert!(!c.select_file(file("b.docx", "application/msword")));
        assert_eq!(c.state().selection().map(|s| s.name.as_str()), Some("a.pdf"));
    }

    #[test]
    fn selecting_replaces_and_clearing_empties() {
        let mut c = UploadController::new();
        c.select_file(pdf("a.pdf"));
        c.select_file(pdf("b.pdf"));
        assert_eq!(c.state(), &UploadState::Ready(pdf("b.pdf")));
        c.clear_file();
        assert_eq!(c.state(), &UploadState::Idle);
    }

    #[test]
    fn begin_requires_a_selection() {
        let mut c = UploadController::new();
        assert!(c.begin_upload().is_none());
        assert!(!c.is_busy());
    }

    #[test]
    fn second_begin_while_busy_is_ignored() {
        let mut c = UploadController::new();
        c.select_file(pdf("a.pdf"));
        assert_eq!(c.begin_upload(), Some(pdf("a.pdf")));
        assert!(c.is_busy());

        let before = c.state().clone();
        assert!(c.begin_upload().is_none());
        assert_eq!(c.state(), &before);
    }

    #[test]
    fn clear_during_submit_keeps_request_in_flight() {
        let mut c = UploadController::new();
        c.select_file(pdf("a.pdf"));
        c.begin_upload();
        c.clear_file();

        match c.state() {
            UploadState::Submitting {
                in_flight,
                selection,
                ..
            } => {
                assert_eq!(in_flight, &pdf("a.pdf"));
                assert!(selection.is_none());
            }
            other => panic!("unexpected state {other:?}"),
        }

        assert!(c.complete_upload(AnalysisOutcome::Failure("bad file".into())));
        assert_eq!(
            c.state(),
            &UploadState::Done {
                selection: None,
                outcome: Box::new(AnalysisOutcome::Failure("bad file".into())),
            }
        );
        // No file any more, so a confirmation is a no-op.
        assert!(c.begin_upload().is_none());
    }

    #[test]
    fn completion_overwrites_previous_outcome_and_allows_retry() {
        let mut c = UploadController::new();
        c.select_file(pdf("a.pdf"));
        c.begin_upload();
        c.complete_upload(AnalysisOutcome::Failure("unable to connect to the API".into()));

        // Manual retry from Done keeps showing the last outcome until the new one lands.
        assert_eq!(c.begin_upload(), Some(pdf("a.pdf")));
        assert_eq!(
            c.state().outcome(),
            Some(&AnalysisOutcome::Failure("unable to connect to the API".into()))
        );
        c.complete_upload(AnalysisOutcome::Success(AnalysisResult::default()));
        assert!(c.state().outcome().map(|o| o.is_success()).unwrap_or(false));
        assert!(!c.is_busy());
    }

    #[test]
    fn complete_without_request_is_ignored() {
        let mut c = UploadController::new();
        c.select_file(pdf("a.pdf"));
        assert!(!c.complete_upload(AnalysisOutcome::Failure("late".into())));
        assert_eq!(c.state(), &UploadState::Ready(pdf("a.pdf")));
    }

    #[tokio::test]
    async fn confirm_issues_exactly_one_request() {
        let analyzer = CountingAnalyzer {
            calls: AtomicUsize::new(0),
        };
        let mut c = UploadController::new();

        assert!(c.confirm_upload(&analyzer).await.is_none());
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);

        c.select_file(pdf("a.pdf"));
        assert!(c.confirm_upload(&analyzer).await.is_some());
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);

        c.confirm_upload(&analyzer).await;
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 2);
    }
}
