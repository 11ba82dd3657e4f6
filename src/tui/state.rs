use crate::model::{AnalysisOutcome, JobDescription, SavedAnalysis, UploadSelection};
use crate::orchestrator::UploadState;
use ratatui::{
    style::Color,
    style::Style,
    text::{Line, Span},
};
use std::time::Duration;

pub const TAB_ANALYSIS: usize = 0;
pub const TAB_HISTORY: usize = 1;
pub const TAB_HELP: usize = 2;
pub const TAB_COUNT: usize = 3;

/// What the service health probe reported, once it has answered.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiStatus {
    Unknown,
    Reachable(String),
    Unreachable(String),
}

/// Job description panel contents.
#[derive(Debug, Clone, PartialEq)]
pub enum JobPanel {
    Loading,
    Loaded(JobDescription),
    Unavailable,
}

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub endpoint: String,
    /// Mirror of the session's controller state; updated from events only.
    pub upload: UploadState,
    /// Selection and timing of the outcome on display, for saving it manually.
    pub last_completed: Option<(UploadSelection, Duration)>,
    pub last_saved: Option<SavedAnalysis>,
    pub job: JobPanel,
    pub api: ApiStatus,
    pub auto_save: bool,
    pub spinner_tick: usize,

    // Path prompt opened with `o`.
    pub path_editing: bool,
    pub path_input: String,

    pub history: Vec<SavedAnalysis>,
    pub history_selected: usize, // 0 = most recent
    pub history_scroll_offset: usize,
    pub initial_history_load_size: usize,
    pub last_exported_path: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: TAB_ANALYSIS,
            info: String::new(),
            endpoint: String::new(),
            upload: UploadState::Idle,
            last_completed: None,
            last_saved: None,
            job: JobPanel::Loading,
            api: ApiStatus::Unknown,
            auto_save: true,
            spinner_tick: 0,
            path_editing: false,
            path_input: String::new(),
            history: Vec::new(),
            history_selected: 0,
            history_scroll_offset: 0,
            initial_history_load_size: 50,
            last_exported_path: None,
        }
    }
}

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

impl UiState {
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.upload.outcome()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_tick % SPINNER.len()]
    }

    pub fn selected_history(&self) -> Option<&SavedAnalysis> {
        self.history.get(self.history_selected)
    }

    /// Keep the cursor on a valid row after the list shrank or was replaced.
    pub fn clamp_history_cursor(&mut self) {
        if self.history.is_empty() {
            self.history_selected = 0;
            self.history_scroll_offset = 0;
            return;
        }
        if self.history_selected >= self.history.len() {
            self.history_selected = self.history.len() - 1;
        }
        if self.history_scroll_offset > self.history_selected {
            self.history_scroll_offset = self.history_selected;
        }
    }
}

/// Turn pasted or typed text into a filesystem path. Terminals hand dropped
/// files over quoted, escaped, or as `file://` URLs.
pub fn clean_dropped_path(raw: &str) -> Option<String> {
    let mut s = raw.trim();
    // Several files dropped at once: only the first one counts.
    if let Some(first) = s.lines().next() {
        s = first.trim();
    }
    for q in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            s = &s[1..s.len() - 1];
        }
    }
    let s = s.strip_prefix("file://").unwrap_or(s);
    let cleaned = s.replace("\\ ", " ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

pub fn push_wrapped_status_kv(
    out: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    status_area_width: u16,
) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    // Account for borders (2 chars on each side)
    let usable_width = status_area_width.saturating_sub(4).max(1);
    let label_text = format!("{label}:");
    let label_width = label_text.chars().count() as u16;

    let value_chars: Vec<char> = value.chars().collect();
    let mut remaining = value_chars.as_slice();
    let mut first = true;

    while !remaining.is_empty() {
        let line_width = if first {
            usable_width.saturating_sub(label_width + 1).max(1)
        } else {
            usable_width.saturating_sub(2).max(1)
        };

        let chars_to_take = (remaining.len() as u16).min(line_width) as usize;
        let (line_chars, rest) = remaining.split_at(chars_to_take);
        let line_text: String = line_chars.iter().collect();

        if first {
            out.push(Line::from(vec![
                Span::styled(label_text.clone(), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::raw(line_text),
            ]));
            first = false;
        } else {
            out.push(Line::from(vec![Span::raw("  "), Span::raw(line_text)]));
        }

        remaining = rest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_paths_are_unquoted() {
        assert_eq!(
            clean_dropped_path("'/home/me/My CV.pdf'\n").as_deref(),
            Some("/home/me/My CV.pdf")
        );
        assert_eq!(
            clean_dropped_path("/home/me/My\\ CV.pdf").as_deref(),
            Some("/home/me/My CV.pdf")
        );
        assert_eq!(
            clean_dropped_path("file:///tmp/cv.pdf").as_deref(),
            Some("/tmp/cv.pdf")
        );
        assert_eq!(
            clean_dropped_path("/tmp/a.pdf\n/tmp/b.pdf").as_deref(),
            Some("/tmp/a.pdf")
        );
        assert_eq!(clean_dropped_path("   "), None);
    }

    #[test]
    fn long_values_wrap_with_indent() {
        let mut out = Vec::new();
        push_wrapped_status_kv(&mut out, "Info", &"x".repeat(30), 20);
        assert!(out.len() > 1);
        assert_eq!(out[1].spans[0].content, "  ");
    }

    #[test]
    fn history_cursor_is_clamped() {
        let mut s = UiState {
            history_selected: 4,
            history_scroll_offset: 4,
            ..Default::default()
        };
        s.clamp_history_cursor();
        assert_eq!((s.history_selected, s.history_scroll_offset), (0, 0));
    }
}
