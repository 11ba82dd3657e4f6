mod cards;
mod export;
mod help;
mod state;

use crate::cli::{build_config, Cli};
use crate::client::AnalysisClient;
use crate::model::{AnalysisOutcome, SavedAnalysis, UploadEvent, UploadSelection};
use crate::orchestrator::{self, process_completion, PostProcessOptions, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Terminal,
};
use state::{
    clean_dropped_path, push_wrapped_status_kv, ApiStatus, JobPanel, UiState, TAB_ANALYSIS,
    TAB_COUNT, TAB_HELP, TAB_HISTORY,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

pub async fn run(args: Cli) -> Result<()> {
    // Unbounded channels keep the UI thread from ever blocking on the session.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<UploadEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let client = Arc::new(AnalysisClient::new(&build_config(&args))?);
    let endpoint = client.base_url().to_string();
    spawn_service_probes(client.clone(), event_tx.clone());

    // Launch-time selection goes through the same path as a key press.
    if let Some(path) = args.file.clone() {
        let _ = cmd_tx.send(UiCommand::SelectFile(path));
        if args.upload_on_launch {
            let _ = cmd_tx.send(UiCommand::Confirm);
        }
    }

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_args = args.clone();
    let ui_endpoint = endpoint.clone();
    let ui_handle =
        std::thread::spawn(move || run_threaded(ui_args, ui_endpoint, event_rx, cmd_tx));

    let res = orchestrator::run_session(client, endpoint, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Health and job description are fetched once, off the session loop.
fn spawn_service_probes(client: Arc<AnalysisClient>, tx: UnboundedSender<UploadEvent>) {
    tokio::spawn(async move {
        let status = match client.health().await {
            Ok(s) => UploadEvent::ApiStatus {
                reachable: true,
                detail: s,
            },
            Err(e) => {
                warn!(error = %format!("{e:#}"), "health probe failed");
                UploadEvent::ApiStatus {
                    reachable: false,
                    detail: format!("{e:#}"),
                }
            }
        };
        let _ = tx.send(status);

        let job = match client.fetch_job_description().await {
            Ok(j) => Some(j),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "job description unavailable");
                None
            }
        };
        let _ = tx.send(UploadEvent::JobLoaded { job });
    });
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    args: Cli,
    endpoint: String,
    mut event_rx: UnboundedReceiver<UploadEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let initial_load = terminal
        .size()
        .map(|size| (size.height as usize).saturating_sub(2).max(20))
        .unwrap_or(50);

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState {
        endpoint,
        auto_save: args.auto_save,
        initial_history_load_size: initial_load,
        ..Default::default()
    };
    state.history = crate::storage::load_recent(initial_load).unwrap_or_default();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking to keep UI responsive.
        while let Ok(ev) = event_rx.try_recv() {
            match ev {
                UploadEvent::Completed {
                    selection,
                    elapsed,
                    outcome,
                } => handle_completed(&args, &mut state, selection, elapsed, &outcome),
                other => apply_event(&mut state, other),
            }
        }

        if last_tick.elapsed() >= tick_rate {
            state.spinner_tick = state.spinner_tick.wrapping_add(1);
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(k)) if k.kind == KeyEventKind::Press => {
                    if handle_key(&mut state, &cmd_tx, k) == KeyOutcome::Quit {
                        break Ok(());
                    }
                }
                Ok(Event::Paste(text)) => handle_paste(&mut state, &cmd_tx, &text),
                _ => {}
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen).ok();
    res
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
}

/// A file dropped onto the terminal arrives as pasted text.
fn handle_paste(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>, text: &str) {
    if state.path_editing {
        state.path_input.push_str(text.trim_end_matches(['\r', '\n']));
        return;
    }
    if let Some(path) = clean_dropped_path(text) {
        state.tab = TAB_ANALYSIS;
        let _ = cmd_tx.send(UiCommand::SelectFile(PathBuf::from(path)));
    }
}

fn handle_key(
    state: &mut UiState,
    cmd_tx: &UnboundedSender<UiCommand>,
    k: KeyEvent,
) -> KeyOutcome {
    if state.path_editing {
        match k.code {
            KeyCode::Esc => {
                state.path_editing = false;
                state.path_input.clear();
            }
            KeyCode::Enter => {
                state.path_editing = false;
                if let Some(path) = clean_dropped_path(&state.path_input) {
                    let _ = cmd_tx.send(UiCommand::SelectFile(PathBuf::from(path)));
                }
                state.path_input.clear();
            }
            KeyCode::Backspace => {
                state.path_input.pop();
            }
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = cmd_tx.send(UiCommand::Quit);
                return KeyOutcome::Quit;
            }
            KeyCode::Char(c) => state.path_input.push(c),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match (k.modifiers, k.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            let _ = cmd_tx.send(UiCommand::Quit);
            return KeyOutcome::Quit;
        }
        (_, KeyCode::Char('o')) => {
            state.tab = TAB_ANALYSIS;
            state.path_editing = true;
            state.path_input = state
                .upload
                .selection()
                .map(|s| s.path.display().to_string())
                .unwrap_or_default();
        }
        (_, KeyCode::Enter) | (_, KeyCode::Char('u')) => {
            if state.tab == TAB_ANALYSIS {
                // The session ignores this while a request is in flight.
                let _ = cmd_tx.send(UiCommand::Confirm);
            }
        }
        (_, KeyCode::Char('x')) => {
            if state.tab == TAB_ANALYSIS {
                let _ = cmd_tx.send(UiCommand::ClearFile);
            }
        }
        (_, KeyCode::Char('s')) => {
            if state.tab == TAB_ANALYSIS {
                export::save_and_show_path(state);
            }
        }
        (_, KeyCode::Char('a')) => {
            state.auto_save = !state.auto_save;
            state.info = if state.auto_save {
                "Auto-save enabled".into()
            } else {
                "Auto-save disabled".into()
            };
        }
        (_, KeyCode::Char('r')) => {
            if state.tab == TAB_HISTORY {
                refresh_history(state);
            }
        }
        (_, KeyCode::Char('e')) => {
            if state.tab == TAB_HISTORY {
                if let Some(r) = state.selected_history().cloned() {
                    export_selected(state, &r, "JSON", export::export_result_json);
                }
            }
        }
        (_, KeyCode::Char('c')) => {
            if state.tab == TAB_HISTORY {
                if let Some(r) = state.selected_history().cloned() {
                    export_selected(state, &r, "CSV", export::export_result_csv);
                }
            }
        }
        (_, KeyCode::Char('y')) => {
            if state.tab == TAB_HISTORY {
                copy_exported_path(state);
            }
        }
        (_, KeyCode::Char('d')) => {
            if state.tab == TAB_HISTORY {
                delete_selected(state);
            }
        }
        (_, KeyCode::Tab) => {
            state.tab = (state.tab + 1) % TAB_COUNT;
            if state.tab == TAB_HISTORY {
                state.history_selected = 0;
                state.history_scroll_offset = 0;
            }
        }
        (_, KeyCode::Char('?')) => state.tab = TAB_HELP,
        (_, KeyCode::Up) | (_, KeyCode::Char('k')) => {
            if state.tab == TAB_HISTORY && state.history_selected > 0 {
                state.history_selected -= 1;
                if state.history_selected < state.history_scroll_offset {
                    state.history_scroll_offset = state.history_selected;
                }
            }
        }
        (_, KeyCode::Down) | (_, KeyCode::Char('j')) => {
            if state.tab == TAB_HISTORY
                && state.history_selected < state.history.len().saturating_sub(1)
            {
                state.history_selected += 1;
            }
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn refresh_history(state: &mut UiState) {
    let old_count = state.history.len();
    match crate::storage::load_recent(state.initial_history_load_size.max(old_count)) {
        Ok(h) => {
            state.history = h;
            state.clamp_history_cursor();
            let new_count = state.history.len();
            state.info = match new_count.cmp(&old_count) {
                std::cmp::Ordering::Greater => {
                    format!("Refreshed: {} new result(s)", new_count - old_count)
                }
                std::cmp::Ordering::Less => {
                    format!("Refreshed: {} result(s) removed", old_count - new_count)
                }
                std::cmp::Ordering::Equal => "Refreshed".into(),
            };
        }
        Err(e) => state.info = format!("Refresh failed: {e:#}"),
    }
}

fn export_selected(
    state: &mut UiState,
    rec: &SavedAnalysis,
    kind: &str,
    write: fn(&SavedAnalysis) -> Result<PathBuf>,
) {
    match write(rec) {
        Ok(p) => {
            state.last_exported_path = Some(p.to_string_lossy().to_string());
            state.info = format!("Exported {kind}: {} (press 'y' to copy path)", p.display());
        }
        Err(e) => state.info = format!("{kind} export failed: {e:#}"),
    }
}

fn copy_exported_path(state: &mut UiState) {
    let Some(path) = state.last_exported_path.clone() else {
        state.info = "No exported file path to copy. Export a file first (e/c)".into();
        return;
    };
    match export::copy_to_clipboard(&path) {
        Ok(_) => {
            let shown = if path.chars().count() > 60 {
                let head: String = path.chars().take(57).collect();
                format!("{head}...")
            } else {
                path
            };
            state.info = format!("✓ Copied to clipboard: {shown}");
        }
        Err(e) => state.info = format!("Clipboard copy failed: {e:#}"),
    }
}

fn delete_selected(state: &mut UiState) {
    let Some(to_delete) = state.selected_history().cloned() else {
        return;
    };
    match crate::storage::delete_analysis(&to_delete) {
        Ok(()) => {
            state.history.remove(state.history_selected);
            state.clamp_history_cursor();
            if state.last_saved.as_ref().map(|s| &s.id) == Some(&to_delete.id) {
                state.last_saved = None;
            }
            state.info = "Deleted".into();
        }
        Err(e) => state.info = format!("Delete failed: {e:#}"),
    }
}

fn apply_event(state: &mut UiState, ev: UploadEvent) {
    match ev {
        UploadEvent::StateChanged { state: upload } => state.upload = upload,
        UploadEvent::Info(info) => state.info = info.to_message(),
        UploadEvent::JobLoaded { job } => {
            state.job = match job {
                Some(j) => JobPanel::Loaded(j),
                None => JobPanel::Unavailable,
            };
        }
        UploadEvent::ApiStatus { reachable, detail } => {
            state.api = if reachable {
                ApiStatus::Reachable(detail)
            } else {
                state.info = format!("Analysis service unreachable: {detail}");
                ApiStatus::Unreachable(detail)
            };
        }
        UploadEvent::Completed { .. } => {}
    }
}

fn handle_completed(
    args: &Cli,
    state: &mut UiState,
    selection: UploadSelection,
    elapsed: Duration,
    outcome: &AnalysisOutcome,
) {
    let history_dir = crate::storage::history_dir().ok();
    let exports = args.export_targets();
    let processed = process_completion(
        &PostProcessOptions {
            history_dir: history_dir.as_deref(),
            base_url: &state.endpoint,
            exports: &exports,
            history_load: (state.history.len() + 1).max(state.initial_history_load_size),
            auto_save: state.auto_save,
        },
        &selection,
        elapsed,
        outcome,
    );

    state.info = match outcome.error_message() {
        Some(msg) => format!("Analysis failed: {msg}"),
        None => format!("Analysis complete in {:.1}s", elapsed.as_secs_f64()),
    };
    if let Some(path) = processed.auto_saved_path.as_ref() {
        state.info = format!("Saved: {}", path.display());
        state.last_saved = processed.saved.clone();
    }
    if !processed.export_messages.is_empty() {
        state.info = processed.export_messages.join("; ");
    }
    state.last_completed = Some((selection, elapsed));

    if history_dir.is_some() {
        state.history = processed.history;
        state.clamp_history_cursor();
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![
        Line::from("Analysis"),
        Line::from("History"),
        Line::from("Help"),
    ])
    .select(state.tab)
    .block(Block::default().borders(Borders::ALL).title("resume-match"))
    .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        TAB_ANALYSIS => cards::draw_analysis(chunks[1], f, state),
        TAB_HISTORY => draw_history(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}

/// RFC 3339 UTC timestamp shown in the local offset when it can be determined.
fn local_timestamp(utc: &str) -> String {
    use time::format_description::well_known::Rfc3339;
    let Ok(parsed) = time::OffsetDateTime::parse(utc, &Rfc3339) else {
        return utc.to_string();
    };
    let (dt, suffix) = match time::UtcOffset::current_local_offset() {
        Ok(off) => (parsed.to_offset(off), ""),
        Err(_) => (parsed, " UTC"),
    };
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}{}",
        dt.year(),
        dt.month() as u8,
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        suffix
    )
}

fn draw_history(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let mut lines: Vec<Line> = Vec::new();

    // Header, info, spacer and borders take the rest.
    let max_items = (area.height as usize).saturating_sub(6).max(1);
    let total_count = state.history.len();
    let current_pos = if total_count > 0 {
        state.history_selected + 1
    } else {
        0
    };

    lines.push(Line::from(vec![
        Span::raw(format!("History ({current_pos}/{total_count}) - ")),
        Span::styled("↑/↓/j/k", Style::default().fg(Color::Magenta)),
        Span::raw(": navigate, "),
        Span::styled("r", Style::default().fg(Color::Magenta)),
        Span::raw(": refresh, "),
        Span::styled("d", Style::default().fg(Color::Magenta)),
        Span::raw(": delete, "),
        Span::styled("e", Style::default().fg(Color::Magenta)),
        Span::raw(": export JSON, "),
        Span::styled("c", Style::default().fg(Color::Magenta)),
        Span::raw(": export CSV"),
    ]));

    push_wrapped_status_kv(&mut lines, "Info", &state.info, area.width);
    lines.push(Line::from(""));

    // Keep the selected row visible.
    let scroll_offset = if state.history_selected < state.history_scroll_offset {
        state.history_selected
    } else if state.history_selected >= state.history_scroll_offset + max_items {
        state.history_selected + 1 - max_items
    } else {
        state.history_scroll_offset
    };

    let selected_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::REVERSED);
    for (history_idx, r) in state
        .history
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(max_items)
    {
        let is_selected = history_idx == state.history_selected;
        let pick = |normal: Style| if is_selected { selected_style } else { normal };

        let pct = r.result.match_percentage;
        let pct_color = cards::band_color(crate::metrics::score_band(pct));
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>2}. ", history_idx + 1),
                pick(Style::default().fg(Color::Gray)),
            ),
            Span::styled(if is_selected { "> " } else { "  " }, pick(Style::default())),
            Span::styled(
                local_timestamp(&r.timestamp_utc),
                pick(Style::default().fg(Color::Gray)),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{:>5}%", crate::metrics::format_score(pct)),
                pick(Style::default().fg(pct_color)),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{:>5.1}s", r.elapsed.as_secs_f64()),
                pick(Style::default()),
            ),
            Span::raw("  "),
            Span::styled(r.file_name.clone(), pick(Style::default().fg(Color::Blue))),
        ]));
    }

    if state.history.is_empty() {
        lines.push(Line::from("No saved analyses yet."));
    }

    if let Some(ref path) = state.last_exported_path {
        lines.push(Line::from(""));
        push_wrapped_status_kv(&mut lines, "Last exported", path, area.width);
        lines.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled("y", Style::default().fg(Color::Magenta)),
            Span::styled(
                " to copy path to clipboard",
                Style::default().fg(Color::Gray),
            ),
        ]));
    }

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("History"));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisResult, InfoEvent, JobDescription};
    use crate::orchestrator::UploadState;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_text(state: &UiState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f.area(), f, state)).unwrap();
        let buf = terminal.backend().buffer().clone();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn typed_path_is_sent_as_selection() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = UiState::default();

        handle_key(&mut state, &tx, key(KeyCode::Char('o')));
        assert!(state.path_editing);
        for c in "/tmp/cv.pdf".chars() {
            handle_key(&mut state, &tx, key(KeyCode::Char(c)));
        }
        // 'q' while typing is text, not quit.
        handle_key(&mut state, &tx, key(KeyCode::Char('q')));
        handle_key(&mut state, &tx, key(KeyCode::Backspace));
        handle_key(&mut state, &tx, key(KeyCode::Enter));

        assert!(!state.path_editing);
        match rx.try_recv().unwrap() {
            UiCommand::SelectFile(p) => assert_eq!(p, PathBuf::from("/tmp/cv.pdf")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn paste_selects_dropped_file() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = UiState {
            tab: TAB_HELP,
            ..Default::default()
        };
        handle_paste(&mut state, &tx, "'/home/me/My CV.pdf'");
        assert_eq!(state.tab, TAB_ANALYSIS);
        match rx.try_recv().unwrap() {
            UiCommand::SelectFile(p) => assert_eq!(p, PathBuf::from("/home/me/My CV.pdf")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn confirm_clear_and_quit_keys() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = UiState::default();
        assert_eq!(
            handle_key(&mut state, &tx, key(KeyCode::Char('u'))),
            KeyOutcome::Continue
        );
        assert!(matches!(rx.try_recv().unwrap(), UiCommand::Confirm));
        handle_key(&mut state, &tx, key(KeyCode::Char('x')));
        assert!(matches!(rx.try_recv().unwrap(), UiCommand::ClearFile));
        assert_eq!(
            handle_key(&mut state, &tx, key(KeyCode::Char('q'))),
            KeyOutcome::Quit
        );
        assert!(matches!(rx.try_recv().unwrap(), UiCommand::Quit));
    }

    #[test]
    fn confirm_is_ignored_off_the_analysis_tab() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = UiState {
            tab: TAB_HISTORY,
            ..Default::default()
        };
        handle_key(&mut state, &tx, key(KeyCode::Char('u')));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn events_update_mirrored_state() {
        let mut state = UiState::default();
        apply_event(
            &mut state,
            UploadEvent::JobLoaded {
                job: Some(JobDescription {
                    position: "Data Intern".into(),
                    ..Default::default()
                }),
            },
        );
        assert!(matches!(&state.job, JobPanel::Loaded(j) if j.position == "Data Intern"));

        apply_event(
            &mut state,
            UploadEvent::ApiStatus {
                reachable: false,
                detail: "connection refused".into(),
            },
        );
        assert!(matches!(state.api, ApiStatus::Unreachable(_)));
        assert!(state.info.contains("connection refused"));

        apply_event(
            &mut state,
            UploadEvent::Info(InfoEvent::Unreadable("missing.pdf: not found".into())),
        );
        assert_eq!(state.info, "Cannot select file: missing.pdf: not found");

        let done = UploadState::Done {
            selection: None,
            outcome: Box::new(AnalysisOutcome::Success(AnalysisResult::default())),
        };
        apply_event(&mut state, UploadEvent::StateChanged { state: done.clone() });
        assert_eq!(state.upload, done);
    }

    #[test]
    fn history_tab_renders_rows() {
        let state = UiState {
            tab: TAB_HISTORY,
            history: vec![SavedAnalysis {
                id: "abc".into(),
                timestamp_utc: "not-a-timestamp".into(),
                file_name: "jane.pdf".into(),
                file_size: 10,
                base_url: String::new(),
                elapsed: Duration::from_millis(2500),
                result: AnalysisResult {
                    match_percentage: 64.0,
                    ..Default::default()
                },
                source: None,
            }],
            ..Default::default()
        };
        let screen = screen_text(&state, 100, 20);
        assert!(screen.contains("History (1/1)"));
        assert!(screen.contains("not-a-timestamp"));
        assert!(screen.contains("64%"));
        assert!(screen.contains("2.5s"));
        assert!(screen.contains("jane.pdf"));
    }

    #[test]
    fn help_tab_lists_upload_keys() {
        let state = UiState {
            tab: TAB_HELP,
            ..Default::default()
        };
        let screen = screen_text(&state, 100, 40);
        assert!(screen.contains("Analyze selected resume"));
        assert!(screen.contains("Clear selection"));
    }

    #[test]
    fn local_timestamp_falls_back_to_input() {
        assert_eq!(local_timestamp("garbage"), "garbage");
        assert!(local_timestamp("2026-10-16T09:30:00Z").starts_with("2026-10-1"));
    }
}
