//! Analysis tab: selection panel, score gauges, result cards, job panel.

use super::state::{push_wrapped_status_kv, ApiStatus, JobPanel, UiState};
use crate::metrics::{format_score, gauge_ratio, score_band, skill_coverage, ScoreBand};
use crate::model::{AnalysisOutcome, AnalysisResult, JobDescription};
use crate::orchestrator::UploadState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph, Wrap},
    Frame,
};

pub fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Low => Color::Red,
        ScoreBand::Fair => Color::Yellow,
        ScoreBand::Good => Color::Cyan,
        ScoreBand::Strong => Color::Green,
    }
}

pub fn draw_analysis(area: Rect, f: &mut Frame, state: &UiState) {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5), // Selection
                Constraint::Min(0),    // Results + job
                Constraint::Length(5), // Status
            ]
            .as_ref(),
        )
        .split(area);

    draw_selection(main[0], f, state);

    // Narrow terminals drop the job panel.
    if main[1].width >= 100 {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
            .split(main[1]);
        draw_results(body[0], f, state);
        draw_job(body[1], f, &state.job);
    } else {
        draw_results(main[1], f, state);
    }

    draw_status(main[2], f, state);
}

fn draw_selection(area: Rect, f: &mut Frame, state: &UiState) {
    let gray = Style::default().fg(Color::Gray);
    let mut lines = Vec::new();

    if state.path_editing {
        lines.push(Line::from(vec![
            Span::styled("Path: ", gray),
            Span::raw(state.path_input.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]));
        lines.push(Line::from(Span::styled(
            "Enter to select, Esc to cancel",
            gray,
        )));
    } else {
        let file = match state.upload.selection() {
            Some(sel) => Span::raw(format!("{} ({:.2} MB)", sel.name, sel.size_mb())),
            None => Span::styled("none (press o, or drop a PDF here)", gray),
        };
        lines.push(Line::from(vec![Span::styled("File: ", gray), file]));

        let mut status = vec![Span::styled("State: ", gray)];
        if let UploadState::Submitting { in_flight, .. } = &state.upload {
            status.push(Span::styled(
                format!("{} Analyzing {}…", state.spinner(), in_flight.name),
                Style::default().fg(Color::Yellow),
            ));
        } else {
            status.push(Span::raw(state.upload.label()));
            if state.upload.selection().is_some() {
                status.push(Span::styled("   u", Style::default().fg(Color::Magenta)));
                status.push(Span::raw(" analyze  "));
                status.push(Span::styled("x", Style::default().fg(Color::Magenta)));
                status.push(Span::raw(" clear"));
            }
        }
        lines.push(Line::from(status));
    }

    lines.push(Line::from(vec![
        Span::styled("Service: ", gray),
        Span::raw(state.endpoint.clone()),
    ]));

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Resume"));
    f.render_widget(p, area);
}

fn draw_results(area: Rect, f: &mut Frame, state: &UiState) {
    match state.outcome() {
        Some(AnalysisOutcome::Success(r)) => draw_success(area, f, r),
        Some(other) => {
            let msg = other.error_message().unwrap_or_default();
            let p = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Analysis failed",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(msg.to_string()),
                Line::from(""),
                Line::from(Span::styled(
                    "Press u to try again.",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Result"));
            f.render_widget(p, area);
        }
        None => {
            let hint = if state.upload.is_busy() {
                "Waiting for the analysis service..."
            } else {
                "No analysis yet. Select a PDF resume and press u."
            };
            let p = Paragraph::new(hint)
                .block(Block::default().borders(Borders::ALL).title("Result"));
            f.render_widget(p, area);
        }
    }
}

fn draw_success(area: Rect, f: &mut Frame, r: &AnalysisResult) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(7), // Gauges
                Constraint::Length(6), // Skills / tools
                Constraint::Min(0),    // Strengths / weaknesses / recommendations
            ]
            .as_ref(),
        )
        .split(area);

    draw_gauges(rows[0], f, r);

    let a = &r.analysis;
    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[1]);
    let skills_title = match skill_coverage(&a.skills_match, &a.skills_missing) {
        Some((m, t, pct)) => format!("Skills ({m}/{t}, {pct:.0}%)"),
        None => "Skills".to_string(),
    };
    f.render_widget(
        match_card(&skills_title, &a.skills_match, &a.skills_missing),
        lists[0],
    );
    f.render_widget(match_card("Tools", &a.tools_match, &a.tools_missing), lists[1]);

    let notes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ]
            .as_ref(),
        )
        .split(rows[2]);
    f.render_widget(bullet_card("Strengths", &a.strengths, Color::Green), notes[0]);
    f.render_widget(bullet_card("Weaknesses", &a.weaknesses, Color::Red), notes[1]);
    let recs: Vec<Line> = if r.recommendations.is_empty() {
        vec![Line::from(Span::styled("-", Style::default().fg(Color::Gray)))]
    } else {
        r.recommendations
            .iter()
            .enumerate()
            .map(|(i, rec)| Line::from(format!("{}. {}", i + 1, rec)))
            .collect()
    };
    f.render_widget(
        Paragraph::new(recs)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Recommendations")),
        notes[2],
    );
}

fn draw_gauges(area: Rect, f: &mut Frame, r: &AnalysisResult) {
    let block = Block::default().borders(Borders::ALL).title(Line::from(vec![
        Span::raw("Match "),
        Span::styled(
            format!("{}%", format_score(r.match_percentage)),
            Style::default()
                .fg(band_color(score_band(r.match_percentage)))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" ({})", score_band(r.match_percentage).label())),
    ]));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 5].as_ref())
        .split(inner);
    let s = &r.scores;
    let entries = [
        ("Overall   ", s.overall),
        ("Education ", s.education),
        ("Skills    ", s.skills),
        ("Experience", s.experience),
        ("Tools     ", s.tools),
    ];
    for ((label, score), row) in entries.into_iter().zip(rows.iter()) {
        let color = band_color(score_band(score));
        let g = LineGauge::default()
            .filled_style(Style::default().fg(color))
            .unfilled_style(Style::default().fg(Color::DarkGray))
            .ratio(gauge_ratio(score))
            .label(Line::from(vec![
                Span::raw(label),
                Span::styled(format!(" {:>5} ", format_score(score)), Style::default().fg(color)),
            ]));
        f.render_widget(g, *row);
    }
}

fn match_card<'a>(title: &str, matched: &'a [String], missing: &'a [String]) -> Paragraph<'a> {
    let mut lines = Vec::new();
    if matched.is_empty() && missing.is_empty() {
        lines.push(Line::from(Span::styled("-", Style::default().fg(Color::Gray))));
    }
    for m in matched {
        lines.push(Line::from(vec![
            Span::styled("✓ ", Style::default().fg(Color::Green)),
            Span::raw(m.as_str()),
        ]));
    }
    for m in missing {
        lines.push(Line::from(vec![
            Span::styled("✗ ", Style::default().fg(Color::Red)),
            Span::raw(m.as_str()),
        ]));
    }
    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title.to_string()))
}

fn bullet_card<'a>(title: &'a str, items: &'a [String], color: Color) -> Paragraph<'a> {
    let lines: Vec<Line> = if items.is_empty() {
        vec![Line::from(Span::styled("-", Style::default().fg(Color::Gray)))]
    } else {
        items
            .iter()
            .map(|i| {
                Line::from(vec![
                    Span::styled("• ", Style::default().fg(color)),
                    Span::raw(i.as_str()),
                ])
            })
            .collect()
    };
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title))
}

fn job_lines(job: &JobDescription) -> Vec<Line<'_>> {
    let gray = Style::default().fg(Color::Gray);
    let mut lines = vec![Line::from(Span::styled(
        if job.position.trim().is_empty() {
            "(unnamed position)"
        } else {
            job.position.as_str()
        },
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let sections = [
        ("Education", &job.required_education),
        ("Required skills", &job.required_skills),
        ("Preferred skills", &job.preferred_skills),
        ("Required tools", &job.required_tools),
        ("Preferred tools", &job.preferred_tools),
        ("Responsibilities", &job.responsibilities),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("{title}:"), gray)));
        lines.extend(items.iter().map(|i| Line::from(format!("  - {i}"))));
    }
    lines
}

fn draw_job(area: Rect, f: &mut Frame, job: &JobPanel) {
    let lines = match job {
        JobPanel::Loading => vec![Line::from("Loading job description...")],
        JobPanel::Unavailable => vec![Line::from(Span::styled(
            "job description unavailable",
            Style::default().fg(Color::Gray),
        ))],
        JobPanel::Loaded(j) => job_lines(j),
    };
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Target job"));
    f.render_widget(p, area);
}

fn draw_status(area: Rect, f: &mut Frame, state: &UiState) {
    let gray = Style::default().fg(Color::Gray);
    let api = match &state.api {
        ApiStatus::Unknown => Span::styled("checking…", gray),
        ApiStatus::Reachable(s) => Span::styled(format!("up ({s})"), Style::default().fg(Color::Green)),
        ApiStatus::Unreachable(_) => Span::styled("unreachable", Style::default().fg(Color::Red)),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled("API: ", gray),
        api,
        Span::raw("   "),
        Span::styled("Auto-save: ", gray),
        Span::styled(
            if state.auto_save { "ON" } else { "OFF" },
            if state.auto_save {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            },
        ),
    ])];
    push_wrapped_status_kv(&mut lines, "Info", &state.info, area.width);

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}
