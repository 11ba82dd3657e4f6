//! Text summary builder for CLI output.
//!
//! This module formats human-readable lines for text mode.

use crate::metrics::{format_score, score_band, skill_coverage};
use crate::model::{AnalysisOutcome, AnalysisResult, JobDescription, UploadSelection};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary for one analysis outcome.
pub(crate) fn build_text_summary(
    selection: &UploadSelection,
    outcome: &AnalysisOutcome,
    job: Option<&JobDescription>,
) -> TextSummary {
    let mut lines = Vec::new();

    if let Some(job) = job {
        push_job(&mut lines, job);
        lines.push(String::new());
    }

    lines.push(format!(
        "File: {} ({:.2} MB)",
        selection.name,
        selection.size_mb()
    ));

    match outcome {
        AnalysisOutcome::Success(r) => push_result(&mut lines, r),
        other => {
            // error_message is always Some for the non-success variants.
            let msg = other.error_message().unwrap_or_default();
            lines.push(format!("Analysis failed: {msg}"));
        }
    }

    TextSummary { lines }
}

fn push_result(lines: &mut Vec<String>, r: &AnalysisResult) {
    lines.push(format!(
        "Match: {}% ({})",
        format_score(r.match_percentage),
        score_band(r.match_percentage).label()
    ));
    lines.push(format!(
        "Scores: education {} | skills {} | experience {} | tools {} | overall {}",
        format_score(r.scores.education),
        format_score(r.scores.skills),
        format_score(r.scores.experience),
        format_score(r.scores.tools),
        format_score(r.scores.overall),
    ));

    let a = &r.analysis;
    match skill_coverage(&a.skills_match, &a.skills_missing) {
        Some((matched, total, pct)) => lines.push(format!(
            "Skills matched ({matched}/{total}, {pct:.0}%): {}",
            join_or_dash(&a.skills_match)
        )),
        None => lines.push("Skills matched: -".to_string()),
    }
    lines.push(format!("Skills missing: {}", join_or_dash(&a.skills_missing)));
    lines.push(format!("Tools matched: {}", join_or_dash(&a.tools_match)));
    lines.push(format!("Tools missing: {}", join_or_dash(&a.tools_missing)));

    push_bullets(lines, "Strengths", &a.strengths);
    push_bullets(lines, "Weaknesses", &a.weaknesses);

    if !r.recommendations.is_empty() {
        lines.push("Recommendations:".to_string());
        for (i, rec) in r.recommendations.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, rec));
        }
    }
}

fn push_job(lines: &mut Vec<String>, job: &JobDescription) {
    let position = if job.position.trim().is_empty() {
        "(unnamed position)"
    } else {
        job.position.as_str()
    };
    lines.push(format!("Target position: {position}"));
    if !job.required_education.is_empty() {
        lines.push(format!("  Education: {}", job.required_education.join(", ")));
    }
    if !job.required_skills.is_empty() {
        lines.push(format!("  Required skills: {}", job.required_skills.join(", ")));
    }
    if !job.preferred_skills.is_empty() {
        lines.push(format!("  Preferred skills: {}", job.preferred_skills.join(", ")));
    }
    if !job.required_tools.is_empty() {
        lines.push(format!("  Required tools: {}", job.required_tools.join(", ")));
    }
    if !job.preferred_tools.is_empty() {
        lines.push(format!("  Preferred tools: {}", job.preferred_tools.join(", ")));
    }
}

fn push_bullets(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("{title}:"));
    lines.extend(items.iter().map(|i| format!("  - {i}")));
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
